//! Journal commands

use super::Engine;
use crate::{output, output::OutputFormat, JournalCommands};
use anyhow::Context;
use colored::Colorize;
use isms_compliance::ExportFormat;
use std::fs;

pub fn handle(action: JournalCommands, engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        JournalCommands::List => {
            let entries = engine.journal()?;
            format.print(&entries, |entries| {
                output::table(
                    &["Date", "Acteur", "Contrôle", "Avant", "Après", "Commentaire"],
                    entries.iter().map(|e| {
                        vec![
                            e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                            e.actor.clone(),
                            e.control_code.clone(),
                            e.previous_status.label().to_string(),
                            e.new_status.label().to_string(),
                            output::optional(e.comment.as_deref()),
                        ]
                    }),
                )
            })?;
        }
        JournalCommands::Verify => {
            let report = engine.verify_journal()?;
            format.print(&report, |r| {
                if r.valid {
                    format!("{} ({} entries checked)", "Journal intact".green().bold(), r.checked_count)
                } else {
                    format!(
                        "{} after {} entries: {}",
                        "Journal broken".red().bold(),
                        r.checked_count,
                        r.error.as_deref().unwrap_or("unknown error")
                    )
                }
            })?;
            if !report.valid {
                anyhow::bail!("journal integrity check failed");
            }
        }
        JournalCommands::Export { csv, output } => {
            let export_format = if csv { ExportFormat::Csv } else { ExportFormat::Json };
            let rendered = engine.export_journal(export_format)?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered).with_context(|| format!("writing {}", path.display()))?;
                    println!("{} {}", "Journal exported:".green(), path.display());
                }
                None => print!("{}", rendered),
            }
        }
    }
    Ok(())
}
