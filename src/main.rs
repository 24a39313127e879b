//! treebench - ordered-key store harness
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌─────────────────┐    ┌──────────┐
//! │   CLI    │───▶│ Workloads │───▶│ Benchmark (CSV) │───▶│  stdout  │
//! │ + config │    │ (3 perms) │    │  or Regression  │    │          │
//! └──────────┘    └───────────┘    └─────────────────┘    └──────────┘
//!                                          │
//!                                          └──▶ stderr (progress, verdicts)
//! ```

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use treebench::bench::{BenchMode, BenchmarkRunner, RandomSource, Workloads};
use treebench::cli;
use treebench::config::{AppConfig, RunConfig, SizeDefaults};
use treebench::error::CliError;
use treebench::regression::run_regression;
use treebench::store::{BTreeStore, OrderedKeyStore};
use treebench::walkthrough::run_walkthrough;

fn run(config: &RunConfig) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if config.walkthrough {
        run_walkthrough::<BTreeStore, _>(&mut out).context("walkthrough failed")?;
        return Ok(());
    }

    let mut rng = RandomSource::from_wall_clock();
    info!(
        seed = rng.seed(),
        "Generating {} size random insertion, removal and search key arrays...",
        config.test_size
    );
    let workloads = Workloads::generate(config.test_size, &mut rng);

    if config.mode != BenchMode::None {
        let mut store = BTreeStore::new();
        BenchmarkRunner::new(&mut store, &workloads, config.interval)
            .run(config.mode, &mut out)
            .context("benchmark failed")?;
        store.destroy();
    } else {
        let outcome = run_regression::<BTreeStore, _>(config, &workloads, &mut rng, &mut out)?;
        info!(
            final_count = outcome.final_count,
            random_hits = outcome.random_hits,
            sequential_hits = outcome.sequential_hits,
            "Regression run complete"
        );
    }

    info!("Cleaning up... done.");
    Ok(())
}

fn main() -> ExitCode {
    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            if e != CliError::Help {
                eprintln!("treebench: {}", e);
            }
            eprint!("{}", cli::usage(&SizeDefaults::default()));
            return ExitCode::FAILURE;
        }
    };

    let app_config = match AppConfig::load(args.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("treebench: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = treebench::logging::init_logging(&app_config);

    let config = RunConfig::resolve(&args, &app_config.defaults);
    info!(
        build = env!("TREEBENCH_BUILD"),
        width = config.width,
        height = config.height,
        test_size = config.test_size,
        keep_size = config.keep_size,
        break_size = config.break_size,
        interval = config.interval.interval(),
        mode = ?config.mode,
        full_verify = config.full_verify,
        "Starting treebench"
    );

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
