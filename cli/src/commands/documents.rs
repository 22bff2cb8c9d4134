//! Policy document commands

use super::Engine;
use crate::{output, output::OutputFormat, DocumentCommands};
use anyhow::Context;
use colored::Colorize;
use isms_compliance::{DocumentRevision, NewDocument};
use std::path::PathBuf;

/// Inline text, else the file's content, else empty
fn read_content(content: Option<String>, from_file: Option<PathBuf>) -> anyhow::Result<String> {
    match (content, from_file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

pub fn handle(action: DocumentCommands, engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        DocumentCommands::Add {
            title,
            category,
            version,
            author,
            content,
            from_file,
            attachment,
        } => {
            let document = NewDocument::new(title, category, version, author)
                .with_content(read_content(content, from_file)?)
                .with_file_path(attachment);
            let document = engine.add_document(document)?;
            println!(
                "{} #{} {} v{}",
                "Document recorded:".green(),
                document.id,
                document.title,
                document.version
            );
        }
        DocumentCommands::List { category } => {
            let documents = engine.list_documents(category.as_deref())?;
            format.print(&documents, |documents| {
                output::table(
                    &["ID", "Titre", "Catégorie", "Version", "Auteur", "Modifié le"],
                    documents.iter().map(|d| {
                        vec![
                            d.id.to_string(),
                            d.title.clone(),
                            d.category.clone(),
                            d.version.clone(),
                            d.author.clone(),
                            d.updated_at.format("%Y-%m-%d").to_string(),
                        ]
                    }),
                )
            })?;
        }
        DocumentCommands::Show { id } => {
            let document = engine.get_document(id)?;
            format.print(&document, |d| {
                format!(
                    "{}\n\n{}",
                    output::table(
                        &["Champ", "Valeur"],
                        vec![
                            vec!["Titre".to_string(), d.title.clone()],
                            vec!["Catégorie".to_string(), d.category.clone()],
                            vec!["Version".to_string(), d.version.clone()],
                            vec!["Auteur".to_string(), d.author.clone()],
                            vec!["Fichier".to_string(), output::optional(d.file_path.as_deref())],
                            vec!["Créé le".to_string(), d.created_at.to_rfc3339()],
                            vec!["Modifié le".to_string(), d.updated_at.to_rfc3339()],
                        ],
                    ),
                    d.content
                )
            })?;
        }
        DocumentCommands::Revise {
            id,
            version,
            content,
            from_file,
        } => {
            let revision = DocumentRevision::new(version, read_content(content, from_file)?);
            let document = engine.revise_document(id, revision)?;
            println!(
                "{} #{} now v{}",
                "Document revised:".green(),
                document.id,
                document.version
            );
        }
    }
    Ok(())
}
