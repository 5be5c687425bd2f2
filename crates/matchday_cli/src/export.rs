//! CSV export of the action log.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use matchday_core::LogEntry;
use std::fs;
use std::io;
use std::path::Path;

pub const CSV_HEADER: [&str; 8] =
    ["periodo", "tiempo", "jugador", "accion", "zona", "resultado", "timestamp", "partido"];

/// Default export file stem: `<event_id>_<YYYYmmdd_HHMM>`.
pub fn default_export_name(event_id: &str, now: NaiveDateTime) -> String {
    format!("{}_{}", event_id, now.format("%Y%m%d_%H%M"))
}

/// Write `entries` as CSV rows (header included). Returns the row count.
pub fn write_log_csv<W: io::Write>(writer: W, entries: &[LogEntry]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for entry in entries {
        let partido = entry
            .match_ref
            .as_ref()
            .map(|m| format!("{} vs {} ({} {})", m.local, m.visitante, m.fecha, m.hora))
            .unwrap_or_default();

        csv.write_record([
            entry.periodo.label(),
            entry.tiempo.as_str(),
            entry.jugador.as_str(),
            entry.accion.label(),
            entry.zona.label(),
            entry.resultado.label(),
            entry.timestamp_text().as_str(),
            partido.as_str(),
        ])?;
    }

    csv.flush()?;
    Ok(entries.len())
}

/// Export to `path`, creating parent directories as needed.
pub fn export_log_csv(path: &Path, entries: &[LogEntry]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory: {}", parent.display()))?;
    }

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let rows = write_log_csv(file, entries)?;

    log::info!("Exported {} log entries to {}", rows, path.display());
    Ok(rows)
}
