//! Interactive wizard session: one command per input line.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use autoprov_ai::ResponseGenerator;
use autoprov_core::pdi::DamageType;
use autoprov_core::{Draft, DisputeDraft, PdiDraft, Step};
use autoprov_store::DraftPersistence;
use autoprov_wizard::{GenerationOutcome, Wizard, WizardError};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::command::{self, Command, HELP};
use crate::display;

/// Commands only some tools understand.
pub trait ToolCommands<D: Draft, P: DraftPersistence> {
    /// Handle `cmd` if it belongs to this tool. Returns `false` otherwise.
    async fn handle(
        &self,
        wizard: &mut Wizard<D, P>,
        cmd: &Command,
        out: &mut dyn Write,
        today: NaiveDate,
    ) -> anyhow::Result<bool>;
}

/// For tools with no extra commands.
pub struct NoExtras;

impl<D: Draft, P: DraftPersistence> ToolCommands<D, P> for NoExtras {
    async fn handle(
        &self,
        _: &mut Wizard<D, P>,
        _: &Command,
        _: &mut dyn Write,
        _: NaiveDate,
    ) -> anyhow::Result<bool> {
        Ok(false)
    }
}

/// `generate` for the dispute builder.
pub struct Generation {
    pub generator: Option<Box<dyn ResponseGenerator>>,
}

impl<P: DraftPersistence> ToolCommands<DisputeDraft, P> for Generation {
    async fn handle(
        &self,
        wizard: &mut Wizard<DisputeDraft, P>,
        cmd: &Command,
        out: &mut dyn Write,
        today: NaiveDate,
    ) -> anyhow::Result<bool> {
        if *cmd != Command::Generate {
            return Ok(false);
        }
        let Some(generator) = self.generator.as_deref() else {
            writeln!(out, "No generation service configured; set --endpoint or --gateway")?;
            return Ok(true);
        };

        writeln!(out, "Generating response...")?;
        match wizard.generate(generator, today).await {
            Ok(GenerationOutcome::Merged) => print_generation(out, wizard.draft(), today)?,
            Ok(GenerationOutcome::Discarded) => {
                writeln!(out, "The case changed while generating; reply discarded")?
            }
            Err(e) => writeln!(out, "{e}")?,
        }
        Ok(true)
    }
}

fn print_generation(out: &mut dyn Write, draft: &DisputeDraft, today: NaiveDate) -> std::io::Result<()> {
    let Some(g) = draft.current_generation(today) else {
        return Ok(());
    };
    if let Some(risk) = g.risk_level {
        writeln!(out, "Risk: {}", risk.label())?;
    }
    writeln!(out, "\nEmail:\n{}", g.email_response)?;
    if !g.sms_version.is_empty() {
        writeln!(out, "\nSMS:\n{}", g.sms_version)?;
    }
    if !g.suggested_next_steps.is_empty() {
        writeln!(out, "\nNext steps:")?;
        for (i, s) in g.suggested_next_steps.iter().enumerate() {
            writeln!(out, "  {}. {s}", i + 1)?;
        }
    }
    Ok(())
}

/// `damage add` / `damage remove` for the inspection report.
pub struct DamageEditor;

impl<P: DraftPersistence> ToolCommands<PdiDraft, P> for DamageEditor {
    async fn handle(
        &self,
        wizard: &mut Wizard<PdiDraft, P>,
        cmd: &Command,
        out: &mut dyn Write,
        _: NaiveDate,
    ) -> anyhow::Result<bool> {
        match cmd {
            Command::DamageAdd { panel, view, kind } => {
                let Some(kind) = DamageType::from_key(kind) else {
                    let known: Vec<&str> = DamageType::ALL.iter().map(|t| t.label()).collect();
                    writeln!(out, "unknown damage type '{kind}' ({})", known.join(", "))?;
                    return Ok(true);
                };
                let next = wizard.draft().with_damage(panel, view, kind);
                let id = next.damages.last().map(|d| d.id.clone()).unwrap_or_default();
                wizard.replace_draft(next);
                writeln!(out, "Recorded {} on {panel} ({view}) as {id}", kind.label())?;
            }
            Command::DamageRemove(id) => match wizard.draft().without_damage(id) {
                Ok(next) => {
                    wizard.replace_draft(next);
                    writeln!(out, "Removed {id}")?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Read commands from `input` until it ends or `quit`.
pub async fn run<D, P, T>(
    wizard: &mut Wizard<D, P>,
    tool: &T,
    mut input: impl BufRead,
    out: &mut impl Write,
    today: NaiveDate,
    prompt: bool,
) -> anyhow::Result<()>
where
    D: Draft,
    P: DraftPersistence,
    T: ToolCommands<D, P>,
{
    display::print_status(out, wizard)?;
    let mut line = String::new();
    loop {
        if prompt {
            write!(out, "[{}]> ", wizard.step().number())?;
            out.flush()?;
        }
        line.clear();
        if input.read_line(&mut line).context("reading command")? == 0 {
            break;
        }
        let cmd = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                continue;
            }
        };
        debug!(?cmd, "command");
        if cmd == Command::Quit {
            break;
        }
        execute(wizard, tool, cmd, out, today).await?;
    }
    Ok(())
}

async fn execute<D, P, T>(
    wizard: &mut Wizard<D, P>,
    tool: &T,
    cmd: Command,
    out: &mut impl Write,
    today: NaiveDate,
) -> anyhow::Result<()>
where
    D: Draft,
    P: DraftPersistence,
    T: ToolCommands<D, P>,
{
    match cmd {
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Status => display::print_status(out, wizard)?,
        Command::Steps => display::print_steps(out, wizard)?,
        Command::Show => write!(out, "{}", wizard.draft().document(today))?,
        Command::Json => {
            let json = serde_json::to_string_pretty(wizard.draft())?;
            writeln!(out, "{json}")?;
        }
        Command::Set(change) => {
            if let Err(e) = wizard.set_field(&change) {
                writeln!(out, "{e}")?;
            }
        }
        Command::Next => {
            let on_last = wizard.step().is_last();
            if !wizard.advance() && on_last && wizard.violations().is_empty() {
                writeln!(out, "Already on the last step; use 'export' to finish")?;
            }
            display::print_status(out, wizard)?;
        }
        Command::Back => {
            wizard.retreat();
            display::print_status(out, wizard)?;
        }
        Command::Jump(n) => match wizard.jump_to(n) {
            Ok(()) => display::print_status(out, wizard)?,
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Reset => {
            wizard.reset();
            writeln!(out, "Started a new case")?;
            display::print_status(out, wizard)?;
        }
        Command::Export(dir) => match wizard.export(today) {
            Ok(export) => match dir {
                None => write!(out, "{}", export.document)?,
                Some(dir) => {
                    let text = export.document.to_string();
                    match write_export(Path::new(&dir), &export.filename, &text) {
                        Ok(path) => writeln!(out, "Saved {}", path.display())?,
                        Err(e) => {
                            warn!(error = %e, "export write failed");
                            writeln!(out, "Could not save: {e:#}")?;
                        }
                    }
                }
            },
            Err(WizardError::ExportBlocked(violations)) => {
                writeln!(out, "Cannot export yet.")?;
                display::print_violations(out, &violations)?;
            }
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Quit => {}
        other => {
            if !tool.handle(wizard, &other, out, today).await? {
                writeln!(out, "That command is not available in the {}", D::TOOL.name())?;
            }
        }
    }
    Ok(())
}

fn write_export(dir: &Path, filename: &str, text: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{filename}.txt"));
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
