//! Wire types for one generation round trip.

use autoprov_core::dispute::{ComplaintType, DisputeDraft, Evidence, GeneratedResponse, RiskLevel};
use autoprov_core::{Timeline, TriState};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every fact the generator needs, flattened from a dispute draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeRequest {
    pub vehicle_registration: String,
    pub sale_date: String,
    pub sale_price: String,
    pub distance_sale: TriState,
    pub warranty_provided: TriState,
    pub finance_involved: TriState,
    pub mileage_at_sale: String,
    pub complaint_type: ComplaintType,
    pub customer_complaint_text: String,
    pub days_since_sale: i64,
    pub current_mileage: String,
    pub mileage_since_sale: u64,
    pub vehicle_drivable: TriState,
    pub repair_attempted: TriState,
    pub legal_timeline: Timeline,
    pub evidence: Evidence,
}

impl DisputeRequest {
    /// Snapshot `draft`, computing day count, usage and timeline as of `today`.
    pub fn from_draft(draft: &DisputeDraft, today: NaiveDate) -> Self {
        let sale = &draft.sale_overview;
        let usage = &draft.time_usage;
        Self {
            vehicle_registration: sale.vehicle_registration.clone(),
            sale_date: sale.sale_date.clone(),
            sale_price: sale.sale_price.clone(),
            distance_sale: sale.distance_sale,
            warranty_provided: sale.warranty_provided,
            finance_involved: sale.finance_involved,
            mileage_at_sale: sale.mileage_at_sale.clone(),
            complaint_type: draft.complaint_details.complaint_type,
            customer_complaint_text: draft.complaint_details.customer_complaint_text.clone(),
            days_since_sale: draft.days_since_sale(today),
            current_mileage: usage.current_mileage.clone(),
            mileage_since_sale: draft.mileage_since_sale(),
            vehicle_drivable: usage.vehicle_drivable,
            repair_attempted: usage.repair_attempted,
            legal_timeline: draft.timeline(today),
            evidence: draft.evidence.clone(),
        }
    }
}

/// The generator's structured answer.
///
/// Every field is optional on the wire; a missing or null field degrades to
/// empty, and an unrecognised risk level to none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedReply {
    pub email_response: Option<String>,
    pub sms_version: Option<String>,
    pub internal_summary: Option<String>,
    pub risk_level: Option<String>,
    pub suggested_next_steps: Option<Vec<String>>,
}

impl GeneratedReply {
    pub fn risk(&self) -> Option<RiskLevel> {
        match self.risk_level.as_deref()?.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "moderate" => Some(RiskLevel::Moderate),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    /// The generated section to store.
    ///
    /// `timeline` is the locally computed bucket; it is stored whatever the
    /// reply says. `basis` identifies the draft revision the request was
    /// built from.
    pub fn into_response(self, timeline: Timeline, basis: String) -> GeneratedResponse {
        let risk_level = self.risk();
        GeneratedResponse {
            email_response: self.email_response.unwrap_or_default(),
            sms_version: self.sms_version.unwrap_or_default(),
            internal_summary: self.internal_summary.unwrap_or_default(),
            risk_level,
            legal_timeline: Some(timeline),
            suggested_next_steps: self.suggested_next_steps.unwrap_or_default(),
            basis,
        }
    }
}
