use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordbench::config::RunConfig;
use wordbench::corpus::CorpusSource;
use wordbench::metrics::SystemSampler;
use wordbench::report::{JsonReporter, Reporter, StdoutReporter};
use wordbench::runner::Harness;
use wordbench::strategy::StrategyKind;

/// Word-frequency benchmark comparing concurrent execution strategies.
#[derive(Parser)]
#[command(name = "wordbench", version, about, long_about = None)]
struct Cli {
    /// Corpus file: pages are blank-line-delimited blocks of text.
    #[arg(short, long)]
    source: PathBuf,

    /// Stop reading the corpus after this many pages.
    #[arg(long, default_value_t = 100_000)]
    max_pages: usize,

    /// Worker/consumer thread count for the parallel strategies.
    #[arg(short = 't', long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Fork-join subrange size processed sequentially instead of splitting.
    #[arg(long, default_value_t = 1000)]
    threshold: usize,

    /// Bound on the fixed-pool graceful drain before force-cancel, seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Strategies to run, in order. Defaults to all five.
    #[arg(long, value_enum, value_delimiter = ',')]
    strategies: Option<Vec<StrategyKind>>,

    /// Emit the report as JSON instead of the human table.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = RunConfig::builder()
        .source(CorpusSource::file(cli.source.clone(), cli.max_pages))
        .workers(cli.threads.max(1))
        .leaf_threshold(cli.threshold)
        .shutdown_timeout(Duration::from_secs(cli.timeout_secs))
        .build();

    let report = Harness::builder()
        .config(config)
        .strategies(cli.strategies.unwrap_or_else(StrategyKind::all))
        .sampler(SystemSampler::new())
        .build()
        .run();

    let outcome = if cli.json {
        JsonReporter.report(&report)
    } else {
        StdoutReporter.report(&report)
    };
    if let Err(error) = outcome {
        tracing::error!(%error, "failed to emit report");
        return ExitCode::FAILURE;
    }

    // Individual strategy failures are recorded in their rows and do not
    // change the exit status.
    ExitCode::SUCCESS
}
