//! A small fixed-size worker pool over OS threads.
//!
//! Workers pull boxed jobs from a shared channel. Lifecycle is scoped: the
//! owning strategy submits work, then calls [`WorkerPool::shutdown`], which
//! closes the injector (graceful: workers drain everything already queued),
//! waits up to a bounded deadline for every worker to report done, and only
//! then force-cancels whatever is still running. Dropping an un-shut pool
//! takes the forced path immediately, so the pool is released on every exit
//! route, including an error raised while feeding it.
//!
//! Forced cancellation cannot interrupt a job mid-flight; it stops workers at
//! the next job boundary and abandons their threads. Jobs still queued at that
//! point are discarded, which for the fixed-pool strategy means those pages go
//! uncounted. That is the documented trade-off of the bounded wait, not
//! something the pool retries or repairs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// How a shutdown ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    /// Every submitted job ran and every worker exited within the deadline.
    Drained,
    /// The deadline passed first; `stragglers` workers were abandoned and any
    /// jobs they had not reached were dropped.
    ForceCancelled { stragglers: usize },
}

pub struct WorkerPool {
    injector: Option<Sender<Job>>,
    done: Receiver<()>,
    workers: Vec<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawn `size` workers (at least one) pulling from a shared injector.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let (injector, jobs) = crossbeam_channel::unbounded::<Job>();
        let (done_tx, done) = crossbeam_channel::unbounded::<()>();
        let cancel = Arc::new(AtomicBool::new(false));

        let workers = (0..size)
            .map(|i| {
                let jobs = jobs.clone();
                let done_tx = done_tx.clone();
                let cancel = Arc::clone(&cancel);
                thread::Builder::new()
                    .name(format!("wordbench-worker-{i}"))
                    .spawn(move || {
                        while let Ok(job) = jobs.recv() {
                            if cancel.load(Ordering::Relaxed) {
                                break;
                            }
                            job();
                        }
                        let _ = done_tx.send(());
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();

        WorkerPool {
            injector: Some(injector),
            done,
            workers,
            cancel,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue one job. Submissions after `shutdown` are a caller bug and are
    /// silently dropped.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(injector) = &self.injector {
            let _ = injector.send(Box::new(job));
        } else {
            debug_assert!(false, "submit after shutdown");
        }
    }

    /// Close the injector and wait for workers to drain, bounded by `timeout`.
    pub fn shutdown(mut self, timeout: Duration) -> Shutdown {
        // Closing the channel is the graceful signal: workers keep pulling
        // queued jobs until the queue is empty, then exit.
        drop(self.injector.take());

        let deadline = Instant::now() + timeout;
        let total = self.workers.len();
        for finished in 0..total {
            if self.done.recv_deadline(deadline).is_err() {
                self.cancel.store(true, Ordering::Relaxed);
                let stragglers = total - finished;
                tracing::warn!(stragglers, "worker pool deadline passed, force-cancelling");
                // Abandon the remaining threads; they stop at their next job
                // boundary. Drop glue must not wait on them.
                self.workers.clear();
                return Shutdown::ForceCancelled { stragglers };
            }
        }

        // All workers signalled; joins are immediate.
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        Shutdown::Drained
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Reached only when `shutdown` was never called (early return or
        // panic in the owning strategy): release without waiting.
        if self.injector.take().is_some() {
            self.cancel.store(true, Ordering::Relaxed);
        }
    }
}
