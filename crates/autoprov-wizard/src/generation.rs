//! The dispute generation round trip.
//!
//! Generation is split into [`begin_generation`](Wizard::begin_generation)
//! and [`finish_generation`](Wizard::finish_generation) so a front end can
//! keep handling input while the request is outstanding. Only one request
//! may be outstanding at a time, and a reply is merged only into the draft
//! it was requested for.

use autoprov_ai::{DisputeRequest, GenerateError, GeneratedReply, ResponseGenerator};
use autoprov_core::{Draft, DisputeDraft, Timeline};
use autoprov_store::DraftPersistence;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{Wizard, WizardError};

/// An outstanding generation request.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    serial: u64,
    case_id: String,
    basis: String,
    timeline: Timeline,
    pub request: DisputeRequest,
}

impl GenerationTicket {
    pub fn case_id(&self) -> &str {
        &self.case_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The reply was merged into the draft.
    Merged,
    /// The draft was reset or replaced while the request was outstanding.
    Discarded,
}

impl<P: DraftPersistence> Wizard<DisputeDraft, P> {
    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Snapshot the draft into a request and mark generation as in flight.
    pub fn begin_generation(&mut self, today: NaiveDate) -> Result<GenerationTicket, WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::GenerationInFlight);
        }
        let draft = self.draft();
        let ticket = GenerationTicket {
            serial: self.next_ticket,
            case_id: draft.case_id.clone(),
            basis: draft.generation_basis(today),
            timeline: draft.timeline(today),
            request: DisputeRequest::from_draft(draft, today),
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket.serial);
        info!(case_id = %ticket.case_id, timeline = ticket.timeline.as_str(), "generation started");
        Ok(ticket)
    }

    /// Settle a request started with [`begin_generation`](Self::begin_generation).
    ///
    /// A failure leaves the generated section exactly as it was. A success
    /// replaces the whole generated section in one update, storing the locally
    /// computed timeline rather than anything the generator implied.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GeneratedReply, GenerateError>,
    ) -> Result<GenerationOutcome, WizardError> {
        if self.in_flight == Some(ticket.serial) {
            self.in_flight = None;
        }

        if ticket.case_id != self.draft().id() {
            warn!(
                requested_for = %ticket.case_id,
                current = self.draft().id(),
                "discarding reply for a replaced draft"
            );
            return Ok(GenerationOutcome::Discarded);
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!(case_id = %ticket.case_id, error = %e, "generation failed");
                return Err(e.into());
            }
        };

        let generated = reply.into_response(ticket.timeline, ticket.basis);
        let merged = self.draft().with_generated(generated);
        self.store_mut().replace(merged);
        info!(
            case_id = %ticket.case_id,
            timeline = ticket.timeline.as_str(),
            "generation merged"
        );
        Ok(GenerationOutcome::Merged)
    }

    /// Run one generation attempt to completion.
    pub async fn generate(
        &mut self,
        generator: &dyn ResponseGenerator,
        today: NaiveDate,
    ) -> Result<GenerationOutcome, WizardError> {
        let ticket = self.begin_generation(today)?;
        let result = generator.generate(&ticket.request).await;
        self.finish_generation(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprov_core::FieldChange;
    use autoprov_store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn reply(body: &str) -> GeneratedReply {
        GeneratedReply {
            email_response: Some(body.into()),
            sms_version: Some("sms".into()),
            internal_summary: Some("summary".into()),
            risk_level: Some("low".into()),
            suggested_next_steps: Some(vec!["Book inspection".into()]),
        }
    }

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DisputeDraft, _> = Wizard::open(&mem);
        let ticket = w.begin_generation(today()).unwrap();
        assert!(w.is_generating());
        assert!(matches!(
            w.begin_generation(today()),
            Err(WizardError::GenerationInFlight)
        ));

        w.finish_generation(ticket, Ok(reply("first"))).unwrap();
        assert!(!w.is_generating());
        assert!(w.begin_generation(today()).is_ok());
    }

    #[test]
    fn reply_after_reset_is_discarded() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DisputeDraft, _> = Wizard::open(&mem);
        let ticket = w.begin_generation(today()).unwrap();
        w.reset();

        let outcome = w.finish_generation(ticket, Ok(reply("late"))).unwrap();
        assert_eq!(outcome, GenerationOutcome::Discarded);
        assert_eq!(w.draft().generated.email_response, "");
    }

    #[test]
    fn stale_ticket_does_not_release_newer_request() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DisputeDraft, _> = Wizard::open(&mem);
        let old = w.begin_generation(today()).unwrap();
        w.reset();
        let _current = w.begin_generation(today()).unwrap();

        w.finish_generation(old, Ok(reply("late"))).unwrap();
        assert!(w.is_generating());
    }

    #[test]
    fn edit_during_flight_leaves_reply_stale() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DisputeDraft, _> = Wizard::open(&mem);
        let ticket = w.begin_generation(today()).unwrap();
        w.set_field(&FieldChange::new("saleOverview", "saleDate", "2026-10-01"))
            .unwrap();

        let outcome = w.finish_generation(ticket, Ok(reply("for old facts"))).unwrap();
        assert_eq!(outcome, GenerationOutcome::Merged);
        assert_eq!(w.draft().generated.email_response, "for old facts");
        assert!(w.draft().current_generation(today()).is_none());
    }

    #[test]
    fn failure_releases_guard_and_keeps_section() {
        let mem = MemoryStore::new();
        let mut w: Wizard<DisputeDraft, _> = Wizard::open(&mem);
        let before = w.draft().generated.clone();
        let ticket = w.begin_generation(today()).unwrap();
        let err = w
            .finish_generation(ticket, Err(GenerateError::EmptyReply))
            .unwrap_err();
        assert!(matches!(err, WizardError::Generate(GenerateError::EmptyReply)));
        assert_eq!(w.draft().generated, before);
        assert!(!w.is_generating());
    }
}
