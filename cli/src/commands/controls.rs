//! Control commands

use super::Engine;
use crate::{output, output::OutputFormat, ControlCommands};
use colored::Colorize;
use isms_common::{Category, ConformityStatus, Control, ControlId};
use isms_compliance::ControlFilter;
use serde::Serialize;
use std::path::Path;

const DEFAULT_ACTOR: &str = "cli";

#[derive(Serialize)]
struct ControlDetail {
    #[serde(flatten)]
    control: Control,
    guidance: Option<String>,
}

pub fn init(engine: &Engine, db: &Path) -> anyhow::Result<()> {
    let total = engine.stats()?.total;
    println!("{} {} ({} controls)", "Database ready:".green(), db.display(), total);
    Ok(())
}

pub fn handle(
    action: ControlCommands,
    engine: &Engine,
    format: OutputFormat,
    default_actor: Option<&str>,
) -> anyhow::Result<()> {
    match action {
        ControlCommands::List { category, status, search } => {
            let mut filter = ControlFilter::new();
            if let Some(category) = category {
                filter = filter.category(Category::parse(&category)?);
            }
            if let Some(status) = status {
                filter = filter.status(ConformityStatus::parse(&status)?);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }
            let controls = engine.list_controls(&filter)?;
            format.print(&controls, |controls| {
                output::table(
                    &["ID", "Code", "Titre", "Catégorie", "Statut", "Mise à jour"],
                    controls.iter().map(|c| {
                        vec![
                            c.id.to_string(),
                            c.code.to_string(),
                            c.title.clone(),
                            c.category.label().to_string(),
                            c.status.label().to_string(),
                            c.last_updated.format("%Y-%m-%d").to_string(),
                        ]
                    }),
                )
            })?;
        }
        ControlCommands::Show { id } => {
            let control = engine.get_control(ControlId::new(id))?;
            let guidance = engine.guidance(control.code.as_str());
            let detail = ControlDetail { control, guidance };
            format.print(&detail, |d| {
                let c = &d.control;
                output::table(
                    &["Champ", "Valeur"],
                    vec![
                        vec!["Code".to_string(), c.code.to_string()],
                        vec!["Titre".to_string(), c.title.clone()],
                        vec!["Description".to_string(), c.description.clone()],
                        vec!["Catégorie".to_string(), c.category.label().to_string()],
                        vec!["Statut".to_string(), c.status.label().to_string()],
                        vec!["Commentaire".to_string(), output::optional(c.comment.as_deref())],
                        vec!["Preuve".to_string(), output::optional(c.evidence_ref.as_deref())],
                        vec!["Mise à jour".to_string(), c.last_updated.to_rfc3339()],
                        vec!["Recommandation".to_string(), output::optional(d.guidance.as_deref())],
                    ],
                )
            })?;
        }
        ControlCommands::Evaluate {
            id,
            status,
            comment,
            evidence,
            actor,
        } => {
            let actor = actor.as_deref().or(default_actor).unwrap_or(DEFAULT_ACTOR);
            let control = engine.evaluate(ControlId::new(id), &status, comment, evidence, actor)?;
            println!(
                "{} {} → {}",
                "Evaluated".green(),
                control.code,
                control.status.label().bold()
            );
        }
    }
    Ok(())
}
