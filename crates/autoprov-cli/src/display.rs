//! Terminal rendering of wizard state.
//!
//! Everything writes to a caller-supplied writer so sessions can be driven
//! and checked without a terminal.

use std::io::Write;

use autoprov_core::{Draft, Step};
use autoprov_store::DraftPersistence;
use autoprov_wizard::Wizard;

const LABEL_WIDTH: usize = 26;

/// Header line plus any violations blocking the current step.
pub fn print_status<D: Draft, P: DraftPersistence>(
    out: &mut impl Write,
    wizard: &Wizard<D, P>,
) -> std::io::Result<()> {
    let step = wizard.step();
    writeln!(
        out,
        "=== {} · {} ===",
        D::TOOL.name(),
        wizard.draft().id()
    )?;
    writeln!(
        out,
        "Step {} of {}: {}",
        step.number(),
        D::Step::ALL.len(),
        step.label()
    )?;
    print_violations(out, wizard.violations())
}

pub fn print_violations(out: &mut impl Write, violations: &[String]) -> std::io::Result<()> {
    if violations.is_empty() {
        return Ok(());
    }
    writeln!(out, "Please fix the following:")?;
    for v in violations {
        writeln!(out, "  - {v}")?;
    }
    Ok(())
}

/// Progress list: a mark per step, the current one highlighted.
pub fn print_steps<D: Draft, P: DraftPersistence>(
    out: &mut impl Write,
    wizard: &Wizard<D, P>,
) -> std::io::Result<()> {
    let current = wizard.step();
    for step in D::Step::ALL {
        let pointer = if *step == current { ">" } else { " " };
        let mark = if wizard.draft().validate_step(*step).is_empty() {
            "ok"
        } else {
            ".."
        };
        writeln!(
            out,
            "{pointer} {:>2}. {:<width$} {mark}",
            step.number(),
            step.label(),
            width = LABEL_WIDTH
        )?;
    }
    Ok(())
}
