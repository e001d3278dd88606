use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use zzcore::{Event, EventResult, RawAnalysisConfig};

use crate::error::{Result, RunError};

pub fn read_config(path: &Path) -> Result<RawAnalysisConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| RunError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Read events from a JSON array or a JSON-lines file.
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let text = std::fs::read_to_string(path).map_err(|e| RunError::io(path, e))?;
    parse_events(&text)
}

pub fn parse_events(text: &str) -> Result<Vec<Event>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| serde_json::from_str(line).map_err(|source| RunError::EventLine { line: i + 1, source }))
        .collect()
}

/// Write the per-event results as one JSON array.
pub fn write_results(path: &Path, results: &[EventResult]) -> Result<()> {
    let file = File::create(path).map_err(|e| RunError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, results)?;
    writer.flush().map_err(|e| RunError::io(path, e))?;
    Ok(())
}
