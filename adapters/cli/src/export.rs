use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use contagion_core::CellRecord;
use contagion_system_analytics::{OutbreakSummary, TickReport};
use serde::Serialize;

/// Header line of the CSV export.
pub(crate) const CSV_HEADER: &str = "id,state,row,col";

/// File formats the final snapshot can be written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    /// One `id,state,row,col` line per cell with numeric states.
    #[default]
    Csv,
    /// A JSON array of cell records.
    Json,
}

/// Final outbreak summary together with the per-tick analytics of a run.
#[derive(Debug, Serialize)]
pub(crate) struct RunReport<'a> {
    pub(crate) summary: OutbreakSummary,
    pub(crate) ticks: &'a [TickReport],
}

/// Writes `records` to `path`, creating missing parent directories.
pub(crate) fn export(records: &[CellRecord], format: ExportFormat, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    let written = match format {
        ExportFormat::Csv => write_csv(records, &mut writer),
        ExportFormat::Json => write_json(records, &mut writer),
    };
    written.with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

/// Writes `report` as pretty-printed JSON to `path`.
pub(crate) fn export_report(report: &RunReport<'_>, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("failed to write run report to {}", path.display()))?;
    writeln!(writer)?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub(crate) fn write_csv<W: Write>(records: &[CellRecord], out: &mut W) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{}",
            record.id,
            record.state.code(),
            record.row,
            record.column
        )?;
    }
    Ok(())
}

pub(crate) fn write_json<W: Write>(records: &[CellRecord], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contagion_core::{CellState, GridView};
    use tempfile::tempdir;

    fn records() -> Vec<CellRecord> {
        let cells = [
            CellState::Susceptible,
            CellState::Infected,
            CellState::Susceptible,
            CellState::Susceptible,
            CellState::Susceptible,
            CellState::Infected,
        ];
        GridView::new(&cells, 2, 3).records()
    }

    #[test]
    fn csv_lists_cells_in_row_major_order() {
        let mut buffer = Vec::new();
        write_csv(&records(), &mut buffer).expect("writing to memory succeeds");

        let text = String::from_utf8(buffer).expect("csv is utf-8");
        assert_eq!(
            text,
            "id,state,row,col\n0,0,0,0\n1,1,0,1\n2,0,0,2\n3,0,1,0\n4,0,1,1\n5,1,1,2\n"
        );
    }

    #[test]
    fn json_uses_col_for_the_column_field() {
        let mut buffer = Vec::new();
        write_json(&records(), &mut buffer).expect("writing to memory succeeds");

        let parsed: Vec<CellRecord> = serde_json::from_slice(&buffer).expect("json parses back");
        assert_eq!(parsed, records());
        let text = String::from_utf8(buffer).expect("json is utf-8");
        assert!(text.contains("\"col\": 2"));
    }

    #[test]
    fn export_creates_missing_parent_directories() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("nested").join("dir").join("out.csv");

        export(&records(), ExportFormat::Csv, &path).expect("export succeeds");

        let text = fs::read_to_string(&path).expect("exported file exists");
        assert!(text.starts_with("id,state,row,col\n"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn run_report_serializes_summary_and_ticks() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("reports").join("run.json");
        let ticks = [
            TickReport {
                tick: 0,
                seeded: 2,
                ..TickReport::default()
            },
            TickReport {
                tick: 1,
                moved: 1,
                pressured: 3,
                ..TickReport::default()
            },
        ];
        let report = RunReport {
            summary: OutbreakSummary {
                total: 6,
                infected: 6,
                susceptible: 0,
            },
            ticks: &ticks,
        };

        export_report(&report, &path).expect("report written");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("report exists"))
                .expect("report is json");
        assert_eq!(value["summary"]["infected"], 6);
        assert_eq!(value["ticks"][1]["pressured"], 3);
        assert_eq!(value["ticks"].as_array().map(Vec::len), Some(2));
    }
}
