//! Report export

use super::{scan, Engine};
use anyhow::Context;
use colored::Colorize;
use isms_compliance::{EngineConfig, ExportFormat};
use std::fs;
use std::path::Path;

pub async fn handle(
    engine: &Engine,
    config: &EngineConfig,
    output: &Path,
    csv: bool,
    with_scan: bool,
) -> anyhow::Result<()> {
    let scores = if with_scan {
        Some(scan::collect(engine, config, None).await?)
    } else {
        None
    };
    let format = if csv { ExportFormat::Csv } else { ExportFormat::Json };

    let report = engine.report(scores)?;
    let rendered = engine.render_report(&report, format)?;
    fs::write(output, rendered).with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} {} ({}, {} controls, {} gaps)",
        "Report written:".green(),
        output.display(),
        format,
        report.stats.total,
        report.gaps.len()
    );
    Ok(())
}
