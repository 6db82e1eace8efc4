//! Core types for AutoProv: draft models, pure helpers, step validation, and print documents.

pub mod checklist;
pub mod dispute;
pub mod distance_sale;
pub mod draft;
pub mod export;
pub mod field;
pub mod id;
pub mod pdi;
pub mod step;
pub mod timeline;
pub mod tool;
pub mod tristate;

pub use checklist::{CheckItem, Checklist};
pub use dispute::{DisputeDraft, DisputeStep, GeneratedResponse, RiskLevel};
pub use distance_sale::{DistanceSaleDraft, DistanceSaleStep};
pub use draft::Draft;
pub use export::Document;
pub use field::{FieldChange, FieldError, FieldKind, FieldValue};
pub use pdi::{PdiDraft, PdiSection};
pub use step::Step;
pub use timeline::{Timeline, days_between, days_since, mileage_since};
pub use tool::Tool;
pub use tristate::TriState;
