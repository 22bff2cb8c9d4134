//! Automated signal scan

use super::Engine;
use crate::output::{self, OutputFormat};
use colored::Colorize;
use isms_compliance::{DomainScores, EngineConfig, RateBand, SystemProbe};

/// Probe this host and score every domain
pub async fn collect(engine: &Engine, config: &EngineConfig, timeout: Option<u64>) -> anyhow::Result<DomainScores> {
    let mut probe_config = config.probe.clone();
    if let Some(secs) = timeout {
        probe_config.signal_timeout_secs = secs;
    }
    probe_config.validate()?;
    let probe = SystemProbe::new(probe_config);
    Ok(engine.run_automated_scoring(&probe).await)
}

pub async fn handle(
    engine: &Engine,
    config: &EngineConfig,
    timeout: Option<u64>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let scores = collect(engine, config, timeout).await?;
    let bands = config.bands;
    format.print(&scores, |s| {
        let rows = s.iter().map(|(domain, score)| {
            vec![
                domain.tag().to_string(),
                domain.label().to_string(),
                score.to_string(),
                RateBand::classify(f64::from(score), &bands).label().to_string(),
            ]
        });
        let average = s.average();
        format!(
            "{}\nMoyenne : {}\n{}",
            output::table(&["Domaine", "Libellé", "Score", "Niveau"], rows),
            output::band(RateBand::classify(average, &bands), format!("{:.1}", average)),
            "Scores indicatifs, à confirmer par une évaluation manuelle.".dimmed(),
        )
    })
}
