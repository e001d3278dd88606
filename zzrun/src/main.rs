use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use zzrun::{run, RunOptions};

/// Build Z, ZZ and Z + LL candidates for a file of events and report the
/// region yields.
#[derive(Parser, Debug)]
#[command(name = "zzrun", version, about)]
struct Cli {
    /// JSON job configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in run period used when no configuration file is given
    #[arg(long, default_value = "2018")]
    period: String,

    /// Events as a JSON array or JSON lines
    #[arg(long)]
    events: PathBuf,

    /// Where to write the per-event results
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of worker threads (0: all cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let opts = RunOptions {
        config: cli.config,
        period: cli.period,
        events: cli.events,
        output: cli.output,
        threads: cli.threads,
    };

    match run(&opts) {
        Ok(yields) => match serde_json::to_string_pretty(&yields) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
