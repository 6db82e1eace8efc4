//! Wizard controller: step navigation gated by validation, the draft
//! lifecycle, and the dispute generation round trip.

mod controller;
mod error;
mod generation;
mod state;

pub use controller::{Export, Wizard};
pub use error::WizardError;
pub use generation::{GenerationOutcome, GenerationTicket};
pub use state::WizardState;

use autoprov_core::{DisputeDraft, DistanceSaleDraft, PdiDraft};

pub type DisputeWizard<P> = Wizard<DisputeDraft, P>;
pub type DistanceSaleWizard<P> = Wizard<DistanceSaleDraft, P>;
pub type PdiWizard<P> = Wizard<PdiDraft, P>;
