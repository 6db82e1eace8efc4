//! Dispute Response Builder: sale facts, the customer's complaint, time and
//! usage since sale, supporting evidence, and the generated response.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::draft::{Draft, iso_date, require_text};
use crate::export::{Document, Section, suggested_filename, thousands, yes_no};
use crate::field::{FieldChange, FieldError, FieldValue, unknown_field};
use crate::id::timestamped_id;
use crate::step::Step;
use crate::timeline::{Timeline, days_between, mileage_since, parse_odometer};
use crate::tool::Tool;
use crate::tristate::TriState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeStep {
    SaleOverview,
    Complaint,
    TimeUsage,
    Evidence,
    Generate,
    NextSteps,
    Export,
}

impl Step for DisputeStep {
    const ALL: &'static [Self] = &[
        Self::SaleOverview,
        Self::Complaint,
        Self::TimeUsage,
        Self::Evidence,
        Self::Generate,
        Self::NextSteps,
        Self::Export,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::SaleOverview => "Sale Overview",
            Self::Complaint => "Complaint Details",
            Self::TimeUsage => "Time & Usage",
            Self::Evidence => "Evidence",
            Self::Generate => "AI Response",
            Self::NextSteps => "Next Steps",
            Self::Export => "Export",
        }
    }
}

// ── Choices ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplaintType {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "mechanical-fault")]
    MechanicalFault,
    #[serde(rename = "electrical-fault")]
    ElectricalFault,
    #[serde(rename = "cosmetic-complaint")]
    CosmeticComplaint,
    #[serde(rename = "not-as-described")]
    NotAsDescribed,
    #[serde(rename = "rejection-under-30")]
    RejectionUnder30,
    #[serde(rename = "rejection-over-30")]
    RejectionOver30,
    #[serde(rename = "refund-demand")]
    RefundDemand,
    #[serde(rename = "finance-escalation")]
    FinanceEscalation,
    #[serde(rename = "general-dissatisfaction")]
    GeneralDissatisfaction,
}

impl ComplaintType {
    pub const CHOICES: &'static [Self] = &[
        Self::MechanicalFault,
        Self::ElectricalFault,
        Self::CosmeticComplaint,
        Self::NotAsDescribed,
        Self::RejectionUnder30,
        Self::RejectionOver30,
        Self::RefundDemand,
        Self::FinanceEscalation,
        Self::GeneralDissatisfaction,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::MechanicalFault => "mechanical-fault",
            Self::ElectricalFault => "electrical-fault",
            Self::CosmeticComplaint => "cosmetic-complaint",
            Self::NotAsDescribed => "not-as-described",
            Self::RejectionUnder30 => "rejection-under-30",
            Self::RejectionOver30 => "rejection-over-30",
            Self::RefundDemand => "refund-demand",
            Self::FinanceEscalation => "finance-escalation",
            Self::GeneralDissatisfaction => "general-dissatisfaction",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::MechanicalFault => "Mechanical Fault",
            Self::ElectricalFault => "Electrical Fault",
            Self::CosmeticComplaint => "Cosmetic Complaint",
            Self::NotAsDescribed => "\"Not as Described\" Claim",
            Self::RejectionUnder30 => "Rejection Request (Under 30 Days)",
            Self::RejectionOver30 => "Rejection Request (Over 30 Days)",
            Self::RefundDemand => "Refund Demand",
            Self::FinanceEscalation => "Finance Company Escalation",
            Self::GeneralDissatisfaction => "General Dissatisfaction",
        }
    }

    /// Parse a wire key. The empty string is the unset sentinel.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.is_empty() || key == "unset" {
            return Some(Self::Unset);
        }
        Self::CHOICES.iter().copied().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Legal Exposure",
        }
    }
}

// ── Sections ──

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleOverview {
    pub vehicle_registration: String,
    pub sale_date: String,
    pub sale_price: String,
    pub distance_sale: TriState,
    pub warranty_provided: TriState,
    pub finance_involved: TriState,
    pub mileage_at_sale: String,
}

impl SaleOverview {
    const SECTION: &'static str = "saleOverview";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "vehicleRegistration" => self.vehicle_registration = value.into_text(field)?,
            "saleDate" => self.sale_date = value.into_text(field)?,
            "salePrice" => self.sale_price = value.into_text(field)?,
            "distanceSale" => self.distance_sale = value.into_tri(field)?,
            "warrantyProvided" => self.warranty_provided = value.into_tri(field)?,
            "financeInvolved" => self.finance_involved = value.into_tri(field)?,
            "mileageAtSale" => self.mileage_at_sale = value.into_text(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetails {
    pub complaint_type: ComplaintType,
    pub customer_complaint_text: String,
}

impl ComplaintDetails {
    const SECTION: &'static str = "complaintDetails";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "complaintType" => self.complaint_type = value.into_choice(field, ComplaintType::from_key)?,
            "customerComplaintText" => self.customer_complaint_text = value.into_text(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeUsage {
    /// ISO date the complaint is being assessed on.
    pub current_date: String,
    pub current_mileage: String,
    pub vehicle_drivable: TriState,
    pub repair_attempted: TriState,
}

impl TimeUsage {
    const SECTION: &'static str = "timeUsage";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "currentDate" => self.current_date = value.into_text(field)?,
            "currentMileage" => self.current_mileage = value.into_text(field)?,
            "vehicleDrivable" => self.vehicle_drivable = value.into_tri(field)?,
            "repairAttempted" => self.repair_attempted = value.into_tri(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub signed_pdi_available: bool,
    pub distance_sale_pack_completed: bool,
    pub provenance_report_provided: bool,
    pub service_history_disclosed: bool,
    pub fault_inspection_report_available: bool,
    pub independent_inspection_requested: bool,
    pub customer_refused_inspection: bool,
    pub additional_notes: String,
}

impl Evidence {
    const SECTION: &'static str = "evidence";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "signedPdiAvailable" => self.signed_pdi_available = value.into_flag(field)?,
            "distanceSalePackCompleted" => self.distance_sale_pack_completed = value.into_flag(field)?,
            "provenanceReportProvided" => self.provenance_report_provided = value.into_flag(field)?,
            "serviceHistoryDisclosed" => self.service_history_disclosed = value.into_flag(field)?,
            "faultInspectionReportAvailable" => {
                self.fault_inspection_report_available = value.into_flag(field)?
            }
            "independentInspectionRequested" => {
                self.independent_inspection_requested = value.into_flag(field)?
            }
            "customerRefusedInspection" => self.customer_refused_inspection = value.into_flag(field)?,
            "additionalNotes" => self.additional_notes = value.into_text(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }

    /// Labelled flags in display order.
    pub fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("Signed PDI Available", self.signed_pdi_available),
            ("Distance Sale Pack Completed", self.distance_sale_pack_completed),
            ("Provenance Report Provided", self.provenance_report_provided),
            ("Service History Disclosed", self.service_history_disclosed),
            ("Fault Inspection Report Available", self.fault_inspection_report_available),
            ("Independent Inspection Requested", self.independent_inspection_requested),
            ("Customer Refused Inspection", self.customer_refused_inspection),
        ]
    }
}

/// Populated only by a successful generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedResponse {
    pub email_response: String,
    pub sms_version: String,
    pub internal_summary: String,
    pub risk_level: Option<RiskLevel>,
    pub legal_timeline: Option<Timeline>,
    pub suggested_next_steps: Vec<String>,
    /// Fingerprint of the draft inputs this response was generated from.
    #[serde(default)]
    pub basis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub dealer_name: String,
    pub dealer_email: String,
}

impl ExportMeta {
    const SECTION: &'static str = "exportMeta";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "dealerName" => self.dealer_name = value.into_text(field)?,
            "dealerEmail" => self.dealer_email = value.into_text(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }
}

// ── Draft ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeDraft {
    pub case_id: String,
    pub created_at: String,
    pub sale_overview: SaleOverview,
    pub complaint_details: ComplaintDetails,
    pub time_usage: TimeUsage,
    pub evidence: Evidence,
    pub generated: GeneratedResponse,
    pub export_meta: ExportMeta,
}

impl DisputeDraft {
    pub fn fresh_at(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            case_id: timestamped_id(Tool::Dispute.id_prefix(), now),
            created_at: now.to_rfc3339(),
            sale_overview: SaleOverview::default(),
            complaint_details: ComplaintDetails::default(),
            time_usage: TimeUsage {
                current_date: iso_date(today),
                ..TimeUsage::default()
            },
            evidence: Evidence::default(),
            generated: GeneratedResponse::default(),
            export_meta: ExportMeta::default(),
        }
    }

    pub fn days_since_sale(&self, today: NaiveDate) -> i64 {
        days_between(&self.sale_overview.sale_date, today)
    }

    pub fn mileage_since_sale(&self) -> u64 {
        mileage_since(&self.sale_overview.mileage_at_sale, &self.time_usage.current_mileage)
    }

    /// Statutory timeline computed locally from the sale date.
    pub fn timeline(&self, today: NaiveDate) -> Timeline {
        Timeline::classify(self.days_since_sale(today))
    }

    /// Fingerprint of the facts a generated response depends on.
    ///
    /// Changes whenever the case identity, any input section or the statutory
    /// timeline bucket on `today` changes, so a response generated for an
    /// earlier revision can be recognised as stale.
    pub fn generation_basis(&self, today: NaiveDate) -> String {
        let inputs = (
            &self.case_id,
            self.timeline(today),
            &self.sale_overview,
            &self.complaint_details,
            &self.time_usage,
            &self.evidence,
        );
        let json = serde_json::to_vec(&inputs).unwrap_or_default();
        let digest = Sha256::digest(&json);
        digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
    }

    /// The generated response, if there is one for the draft as it stands.
    pub fn current_generation(&self, today: NaiveDate) -> Option<&GeneratedResponse> {
        let g = &self.generated;
        (!g.email_response.is_empty() && g.basis == self.generation_basis(today)).then_some(g)
    }

    /// Replace the whole generated section in one step.
    pub fn with_generated(&self, generated: GeneratedResponse) -> Self {
        Self {
            generated,
            ..self.clone()
        }
    }
}

pub fn validate_step(step: DisputeStep, draft: &DisputeDraft) -> Vec<String> {
    let mut errs = Vec::new();
    let sale = &draft.sale_overview;
    let complaint = &draft.complaint_details;
    let usage = &draft.time_usage;

    match step {
        DisputeStep::SaleOverview => {
            require_text(&mut errs, &sale.vehicle_registration, "Vehicle Registration is required");
            require_text(&mut errs, &sale.sale_date, "Date of Sale is required");
            require_text(&mut errs, &sale.sale_price, "Sale Price is required");
            require_text(&mut errs, &sale.mileage_at_sale, "Mileage at Sale is required");
            if !sale.distance_sale.is_answered() {
                errs.push("Please indicate if this was a Distance Sale".into());
            }
            if !sale.warranty_provided.is_answered() {
                errs.push("Please indicate if a Warranty was provided".into());
            }
            if !sale.finance_involved.is_answered() {
                errs.push("Please indicate if Finance is involved".into());
            }
        }
        DisputeStep::Complaint => {
            if complaint.complaint_type == ComplaintType::Unset {
                errs.push("Please select a Complaint Type".into());
            }
            require_text(
                &mut errs,
                &complaint.customer_complaint_text,
                "Customer's complaint wording is required",
            );
        }
        DisputeStep::TimeUsage => {
            require_text(&mut errs, &usage.current_mileage, "Current Mileage is required");
            if !usage.vehicle_drivable.is_answered() {
                errs.push("Please indicate if the vehicle is drivable".into());
            }
            if !usage.repair_attempted.is_answered() {
                errs.push("Please indicate if a repair has been attempted".into());
            }
            let at_sale = sale.mileage_at_sale.trim();
            let current = usage.current_mileage.trim();
            if !at_sale.is_empty()
                && !current.is_empty()
                && parse_odometer(current) < parse_odometer(at_sale)
            {
                errs.push("Current Mileage cannot be lower than Mileage at Sale".into());
            }
        }
        DisputeStep::Evidence
        | DisputeStep::Generate
        | DisputeStep::NextSteps
        | DisputeStep::Export => {}
    }
    errs
}

impl Draft for DisputeDraft {
    type Step = DisputeStep;

    const TOOL: Tool = Tool::Dispute;

    fn fresh() -> Self {
        Self::fresh_at(Utc::now(), Local::now().date_naive())
    }

    fn id(&self) -> &str {
        &self.case_id
    }

    fn validate_step(&self, step: DisputeStep) -> Vec<String> {
        validate_step(step, self)
    }

    fn apply(&self, change: &FieldChange) -> Result<Self, FieldError> {
        let mut next = self.clone();
        let (field, value) = (change.field.as_str(), change.value.clone());
        match change.section.as_str() {
            SaleOverview::SECTION => next.sale_overview.set(field, value)?,
            ComplaintDetails::SECTION => next.complaint_details.set(field, value)?,
            TimeUsage::SECTION => next.time_usage.set(field, value)?,
            Evidence::SECTION => next.evidence.set(field, value)?,
            ExportMeta::SECTION => next.export_meta.set(field, value)?,
            "generated" => return Err(FieldError::ReadOnlySection(change.section.clone())),
            other => return Err(FieldError::UnknownSection(other.to_string())),
        }
        Ok(next)
    }

    fn document(&self, today: NaiveDate) -> Document {
        let sale = &self.sale_overview;
        let complaint = &self.complaint_details;
        let usage = &self.time_usage;
        let generation = self.current_generation(today);

        let dealer = if self.export_meta.dealer_name.trim().is_empty() {
            "Dealer Name"
        } else {
            self.export_meta.dealer_name.as_str()
        };
        let mut case = Section::new("Case")
            .row("Issued By", dealer)
            .row("Dealer Email", self.export_meta.dealer_email.as_str())
            .row("Case ID", self.case_id.as_str())
            .row("Vehicle", sale.vehicle_registration.as_str());
        if let Some(risk) = generation.and_then(|g| g.risk_level) {
            case = case.row("Risk", risk.label());
        }

        let price = if sale.sale_price.trim().is_empty() {
            String::new()
        } else {
            format!("£{}", sale.sale_price.trim())
        };
        let sale_section = Section::new("Section 1: Sale Overview")
            .row("Vehicle Registration", sale.vehicle_registration.as_str())
            .row("Date of Sale", sale.sale_date.as_str())
            .row("Sale Price", price)
            .row("Mileage at Sale", sale.mileage_at_sale.as_str())
            .row("Distance Sale", sale.distance_sale.to_string())
            .row("Warranty Provided", sale.warranty_provided.to_string())
            .row("Finance Involved", sale.finance_involved.to_string());

        let complaint_section = Section::new("Section 2: Complaint Details")
            .row("Complaint Type", complaint.complaint_type.label())
            .paragraph("Customer's Complaint (Verbatim)", &complaint.customer_complaint_text);

        let usage_section = Section::new("Section 3: Time & Usage Factors")
            .row("Days Since Sale", self.days_since_sale(today).to_string())
            .row("Miles Since Sale", thousands(self.mileage_since_sale()))
            .row("Current Mileage", usage.current_mileage.as_str())
            .row("Vehicle Drivable", usage.vehicle_drivable.to_string())
            .row("Repair Attempted", usage.repair_attempted.to_string())
            .row("Legal Timeline", self.timeline(today).label());

        let mut evidence_section = Section::new("Section 4: Evidence & Documentation");
        for (label, value) in self.evidence.flags() {
            evidence_section = evidence_section.row(label, yes_no(value));
        }
        let evidence_section =
            evidence_section.paragraph("Additional Notes", &self.evidence.additional_notes);

        let mut doc = Document::new("Dispute Response Pack", self.case_id.as_str(), iso_date(today))
            .subtitle("CRA 2015 & Consumer Contracts Regulations Compliant")
            .section(case)
            .section(sale_section)
            .section(complaint_section)
            .section(usage_section)
            .section(evidence_section);

        if let Some(g) = generation {
            doc = doc
                .section(
                    Section::new("Section 5: Dealer Response (Email)")
                        .paragraph("Email", &g.email_response),
                )
                .section(Section::new("Section 6: SMS Version").paragraph("SMS", &g.sms_version))
                .section(
                    Section::new("Section 7: Suggested Next Steps").numbered(&g.suggested_next_steps),
                )
                .section(
                    Section::new("Internal Case Summary (Audit Use Only)")
                        .paragraph("Summary", &g.internal_summary),
                );
        }

        doc.footer(format!(
            "Dispute Response Pack · Case ID: {} · {}. The content of this report is the responsibility of the issuing business.",
            self.case_id,
            iso_date(today)
        ))
    }

    fn export_filename(&self, today: NaiveDate) -> String {
        suggested_filename(
            "Dispute_Response",
            &self.sale_overview.vehicle_registration,
            "VEHICLE",
            &iso_date(today),
        )
    }
}
