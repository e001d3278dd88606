// src/lib.rs
pub mod error;
pub mod io;
pub mod summary;

use std::path::PathBuf;

use zzcore::{EventProcessor, RawAnalysisConfig};

use crate::error::Result;
use crate::summary::RegionYields;

/// Options of one batch run.
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// job configuration; the built-in defaults for `period` are used without it
    pub config: Option<PathBuf>,
    pub period: String,
    pub events: PathBuf,
    pub output: Option<PathBuf>,
    /// worker threads, 0 lets rayon decide
    pub threads: usize,
}

/// Configure the pipeline, process every event and write the results.
///
/// Configuration problems are reported before any event is read.
pub fn run(opts: &RunOptions) -> Result<RegionYields> {
    let raw = match &opts.config {
        Some(path) => io::read_config(path)?,
        None => RawAnalysisConfig::for_period(&opts.period),
    };
    let processor = EventProcessor::from_raw(raw)?;

    let events = io::read_events(&opts.events)?;
    log::info!("read {} events from {}", events.len(), opts.events.display());

    let pool = rayon::ThreadPoolBuilder::new().num_threads(opts.threads).build()?;
    let results = pool.install(|| processor.process_all(&events));

    if let Some(path) = &opts.output {
        io::write_results(path, &results)?;
        log::info!("wrote {} results to {}", results.len(), path.display());
    }

    let yields = RegionYields::from_results(&results);
    yields.log();
    Ok(yields)
}
