//! Directive commands

use super::Engine;
use crate::{output, output::OutputFormat, DirectiveCommands};
use colored::Colorize;
use isms_compliance::{DirectiveKind, Effectiveness, NewDirective};

pub fn handle(action: DirectiveCommands, engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        DirectiveCommands::Add {
            title,
            kind,
            description,
            effectiveness,
            owner,
        } => {
            let mut directive = NewDirective::new(title, DirectiveKind::parse(&kind)?)
                .with_description(description)
                .with_owner(owner);
            if let Some(effectiveness) = effectiveness {
                directive = directive.with_effectiveness(Effectiveness::parse(&effectiveness)?);
            }
            let directive = engine.add_directive(directive)?;
            println!("{} #{} {}", "Directive recorded:".green(), directive.id, directive.title);
        }
        DirectiveCommands::List => {
            let directives = engine.list_directives()?;
            format.print(&directives, |directives| {
                output::table(
                    &["ID", "Titre", "Type", "Efficacité", "Responsable", "Créée le"],
                    directives.iter().map(|d| {
                        vec![
                            d.id.to_string(),
                            d.title.clone(),
                            d.kind.label().to_string(),
                            d.effectiveness.label().to_string(),
                            output::optional(d.owner.as_deref()),
                            d.created_at.format("%Y-%m-%d").to_string(),
                        ]
                    }),
                )
            })?;
        }
        DirectiveCommands::Delete { id } => {
            engine.delete_directive(id)?;
            println!("{} #{}", "Directive deleted:".green(), id);
        }
    }
    Ok(())
}
