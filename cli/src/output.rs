//! Output formatting

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use isms_compliance::{RateBand, RiskLevel};
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON or YAML, or the table `render` builds from it
    pub fn print<T: Serialize>(&self, data: &T, render: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => println!("{}", render(data)),
        }
        Ok(())
    }
}

/// Rounded table with a header row
pub fn table<R, C>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn band(band: RateBand, text: impl Into<String>) -> ColoredString {
    let text: String = text.into();
    match band {
        RateBand::Satisfactory => text.green().bold(),
        RateBand::InProgress => text.yellow().bold(),
        RateBand::Critical => text.red().bold(),
    }
}

pub fn risk(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => level.label().green(),
        RiskLevel::Elevated => level.label().yellow(),
        RiskLevel::High => level.label().red().bold(),
    }
}

pub fn optional(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_headers_and_rows() {
        let rendered = table(
            &["Code", "Statut"],
            vec![
                vec!["5.1".to_string(), "Conforme".to_string()],
                vec!["8.7".to_string(), "Non conforme".to_string()],
            ],
        );
        assert!(rendered.contains("Code"));
        assert!(rendered.contains("Non conforme"));
        assert_eq!(rendered.lines().filter(|l| l.contains("5.1") || l.contains("8.7")).count(), 2);
    }

    #[test]
    fn test_optional_placeholder() {
        assert_eq!(optional(Some(72u8)), "72");
        assert_eq!(optional(None::<u8>), "-");
    }
}
