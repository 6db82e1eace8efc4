use autoprov_core::{Document, Draft, FieldChange, Step};
use autoprov_store::{DraftPersistence, DraftStore};
use chrono::NaiveDate;
use tracing::info;

use crate::{WizardError, WizardState};

/// A printable document with its suggested filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub document: Document,
}

/// One tool's wizard: the live draft plus navigation state.
pub struct Wizard<D: Draft, P: DraftPersistence> {
    store: DraftStore<D, P>,
    state: WizardState<D::Step>,
    /// Serial of the outstanding generation, if any.
    pub(crate) in_flight: Option<u64>,
    pub(crate) next_ticket: u64,
}

impl<D: Draft, P: DraftPersistence> Wizard<D, P> {
    /// Open on step 1 with the stored draft, or a fresh one.
    pub fn open(persistence: P) -> Self {
        Self {
            store: DraftStore::open(persistence),
            state: WizardState::new(),
            in_flight: None,
            next_ticket: 0,
        }
    }

    pub fn draft(&self) -> &D {
        self.store.draft()
    }

    pub fn step(&self) -> D::Step {
        self.state.step()
    }

    pub fn state(&self) -> &WizardState<D::Step> {
        &self.state
    }

    /// Violations currently displayed.
    pub fn violations(&self) -> &[String] {
        self.state.violations()
    }

    pub fn set_field(&mut self, change: &FieldChange) -> Result<&D, WizardError> {
        Ok(self.store.set_field(change)?)
    }

    /// Replace the whole draft, e.g. after adding a damage record.
    pub fn replace_draft(&mut self, draft: D) {
        self.store.replace(draft);
    }

    pub(crate) fn store_mut(&mut self) -> &mut DraftStore<D, P> {
        &mut self.store
    }

    /// Validate the current step and move forward if it passes.
    ///
    /// Returns whether the step changed.
    pub fn advance(&mut self) -> bool {
        let before = self.state.step();
        let violations = self.draft().validate_step(before);
        self.state = self.state.advance(violations);
        self.state.step() != before
    }

    pub fn retreat(&mut self) {
        self.state = self.state.retreat();
    }

    pub fn jump(&mut self, step: D::Step) {
        self.state = self.state.jump(step);
    }

    /// Jump by 1-based step number.
    pub fn jump_to(&mut self, number: usize) -> Result<(), WizardError> {
        let step = D::Step::from_number(number).ok_or(WizardError::NoSuchStep(number))?;
        self.jump(step);
        Ok(())
    }

    /// Start a new case: fresh draft with a new identity, back to step 1.
    ///
    /// Any outstanding generation is abandoned; its reply will be discarded.
    pub fn reset(&mut self) {
        let old = self.draft().id().to_string();
        self.store.reset();
        self.state = WizardState::reset();
        self.in_flight = None;
        info!(tool = D::TOOL.name(), old = %old, new = self.draft().id(), "new case started");
    }

    /// Build the printable document if the export gate passes.
    ///
    /// A blocked export leaves its violations displayed.
    pub fn export(&mut self, today: NaiveDate) -> Result<Export, WizardError> {
        let violations = self.draft().export_violations();
        if !violations.is_empty() {
            self.state = self.state.blocked(violations.clone());
            return Err(WizardError::ExportBlocked(violations));
        }
        let draft = self.draft();
        let export = Export {
            filename: draft.export_filename(today),
            document: draft.document(today),
        };
        info!(tool = D::TOOL.name(), filename = %export.filename, "document exported");
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprov_core::{DistanceSaleDraft, DistanceSaleStep, PdiDraft, PdiSection, Tool};
    use autoprov_store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn blocked_advance_lists_violations() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DistanceSaleDraft, _> = Wizard::open(&mem);
        assert!(!w.advance());
        assert_eq!(w.step(), DistanceSaleStep::Dealer);
        assert_eq!(w.violations().len(), 4);
    }

    #[test]
    fn edits_persist_and_survive_reopen() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DistanceSaleDraft, _> = Wizard::open(&mem);
        w.set_field(&FieldChange::new("dealer", "businessName", "Acme Motors"))
            .unwrap();
        let id = w.draft().pack_id.clone();

        let reopened: Wizard<DistanceSaleDraft, _> = Wizard::open(&mem);
        assert_eq!(reopened.draft().pack_id, id);
        assert_eq!(reopened.draft().dealer.business_name, "Acme Motors");
        assert_eq!(reopened.step(), DistanceSaleStep::Dealer);
    }

    #[test]
    fn jump_to_rejects_out_of_range() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DistanceSaleDraft, _> = Wizard::open(&mem);
        assert!(matches!(w.jump_to(0), Err(WizardError::NoSuchStep(0))));
        assert!(matches!(w.jump_to(8), Err(WizardError::NoSuchStep(8))));
        w.jump_to(7).unwrap();
        assert_eq!(w.step(), DistanceSaleStep::RefundPolicy);
    }

    #[test]
    fn reset_returns_to_first_step_with_new_identity() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DistanceSaleDraft, _> = Wizard::open(&mem);
        w.set_field(&FieldChange::new("dealer", "email", "sales@acme.example"))
            .unwrap();
        w.jump(DistanceSaleStep::Delivery);
        let old = w.draft().pack_id.clone();

        w.reset();
        assert_eq!(w.step(), DistanceSaleStep::Dealer);
        assert_ne!(w.draft().pack_id, old);
        assert!(!mem.contains(Tool::DistanceSale.storage_key()));
    }

    #[test]
    fn pdi_sections_are_free_but_export_is_gated() {
        let mem = MemoryStore::new();
        let mut w: Wizard<PdiDraft, _> = Wizard::open(&mem);
        assert!(w.advance());
        assert_eq!(w.step(), PdiSection::Damage);

        let err = w.export(today()).unwrap_err();
        assert!(matches!(err, WizardError::ExportBlocked(ref v) if v.len() == 6));
        assert_eq!(w.violations().len(), 6);

        for (section, field, value) in [
            ("vehicle", "make", "Ford"),
            ("vehicle", "model", "Fiesta"),
            ("vehicle", "registration", "AB12 CDE"),
            ("cra", "craConfirmed", "yes"),
            ("terms", "tcAccepted", "yes"),
            ("tyres", "rr", "5.2"),
        ] {
            w.set_field(&FieldChange::new(section, field, value)).unwrap();
        }
        let export = w.export(today()).unwrap();
        assert_eq!(export.filename, "PDI_Report_AB12CDE_2026-10-19");
        assert_eq!(export.document.title, "Pre-Delivery Inspection Report");
    }

    #[test]
    fn damage_records_go_through_replace() {
        let mem = MemoryStore::new();
        let mut w: Wizard<PdiDraft, _> = Wizard::open(&mem);
        let next = w
            .draft()
            .with_damage("Tailgate", "rear", autoprov_core::pdi::DamageType::Dent);
        w.replace_draft(next);

        let reopened: Wizard<PdiDraft, _> = Wizard::open(&mem);
        assert_eq!(reopened.draft().damages.len(), 1);
    }
}
