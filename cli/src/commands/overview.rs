//! Dashboard figures: stats, category breakdown and gaps

use super::Engine;
use crate::output::{self, OutputFormat};
use isms_common::ConformityStatus;
use isms_compliance::RateBand;

pub fn stats(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    let dashboard = engine.dashboard()?;
    format.print(&dashboard, |d| {
        let stats = &d.stats;
        let rows = ConformityStatus::ALL.iter().rev().map(|status| {
            vec![
                status.label().to_string(),
                stats.count(*status).to_string(),
                format!("{:.2} %", stats.share(*status)),
            ]
        });
        format!(
            "{}\nTaux de conformité pondéré : {}\nRisque : {} ({} contrôles à risque)",
            output::table(&["Statut", "Contrôles", "Part"], rows),
            output::band(d.band, format!("{:.2} % ({})", stats.weighted_rate, d.band.label())),
            output::risk(d.risk),
            stats.at_risk(),
        )
    })
}

pub fn breakdown(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    let breakdown = engine.category_breakdown()?;
    let bands = engine.config().bands;
    format.print(&breakdown, |b| {
        output::table(
            &["Catégorie", "Conformes", "Total", "Taux"],
            b.categories.iter().map(|(category, share)| {
                let band = RateBand::classify(share.percentage, &bands);
                vec![
                    category.label().to_string(),
                    share.conforming.to_string(),
                    share.total.to_string(),
                    format!("{:.1} % ({})", share.percentage, band.label()),
                ]
            }),
        )
    })
}

pub fn gaps(engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    let gaps = engine.gaps()?;
    format.print(&gaps, |gaps| {
        output::table(
            &["Code", "Titre", "Statut", "Priorité", "Échéance"],
            gaps.iter().map(|g| {
                vec![
                    g.code.clone(),
                    g.title.clone(),
                    g.status.label().to_string(),
                    g.priority.label().to_string(),
                    g.due.format("%Y-%m-%d").to_string(),
                ]
            }),
        )
    })
}
