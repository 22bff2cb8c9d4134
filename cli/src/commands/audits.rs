//! Audit commands

use super::Engine;
use crate::{output, output::OutputFormat, AuditCommands};
use colored::Colorize;
use isms_compliance::{AuditState, NewAudit};

pub fn handle(action: AuditCommands, engine: &Engine, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        AuditCommands::Add {
            title,
            date,
            auditor,
            state,
            score,
            comments,
        } => {
            let mut audit = NewAudit::new(title, date, auditor).with_comments(comments);
            if let Some(state) = state {
                audit = audit.with_state(AuditState::parse(&state)?);
            }
            if let Some(score) = score {
                audit = audit.with_score(score);
            }
            let record = engine.add_audit(audit)?;
            println!("{} #{} {}", "Audit recorded:".green(), record.id, record.title);
        }
        AuditCommands::List => {
            let audits = engine.list_audits()?;
            format.print(&audits, |audits| {
                output::table(
                    &["ID", "Date", "Titre", "Auditeur", "État", "Score"],
                    audits.iter().map(|a| {
                        vec![
                            a.id.to_string(),
                            a.audit_date.to_string(),
                            a.title.clone(),
                            a.auditor.clone(),
                            a.state.label().to_string(),
                            output::optional(a.score),
                        ]
                    }),
                )
            })?;
        }
        AuditCommands::Delete { id } => {
            engine.delete_audit(id)?;
            println!("{} #{}", "Audit deleted:".green(), id);
        }
        AuditCommands::History => {
            let history = engine.audit_history()?;
            format.print(&history, |h| {
                if h.count == 0 {
                    return "Aucun audit noté".to_string();
                }
                output::table(
                    &["Audits notés", "Moyenne", "Min", "Max", "Dernier", "Tendance"],
                    vec![vec![
                        h.count.to_string(),
                        format!("{:.1}", h.average),
                        h.min.to_string(),
                        h.max.to_string(),
                        output::optional(h.last),
                        h.trend.label().to_string(),
                    ]],
                )
            })?;
        }
    }
    Ok(())
}
