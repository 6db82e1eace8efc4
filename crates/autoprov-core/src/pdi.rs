//! Pre-Delivery Inspection report.
//!
//! Unlike the two wizards, a PDI report is a set of freely navigable
//! sections. Nothing blocks moving between them; the whole report is
//! validated only when it is exported.
//!
//! Field-change sections are named after the report sections:
//!
//! | section      | fields                                                   |
//! |--------------|----------------------------------------------------------|
//! | `vehicle`    | the [`VehicleInfo`] fields                               |
//! | `damage`     | `damageNotes` (records are added with [`PdiDraft::with_damage`]) |
//! | `tyres`      | `fl`, `fr`, `rl`, `rr`, `spare` (tread depth)            |
//! | `brakes`     | `<component>.measured`, `<component>.minimum`            |
//! | `mechanical` | one key per [`MechanicalCheck`], plus `mechanicalNotes`  |
//! | `cra`        | one key per [`CraCheck`], plus `craConfirmed`            |
//! | `terms`      | `tcAccepted`                                             |
//! | `handover`   | the [`Handover`] fields                                  |

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checklist::{CheckItem, Checklist};
use crate::draft::{Draft, iso_date, require_text, require_true};
use crate::export::{Document, Section, suggested_filename, yes_no};
use crate::field::{FieldChange, FieldError, FieldValue, unknown_field};
use crate::id::dated_id;
use crate::step::Step;
use crate::timeline::parse_odometer;
use crate::tool::Tool;

pub const VIN_LENGTH: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdiSection {
    Vehicle,
    Damage,
    Tyres,
    Brakes,
    Mechanical,
    Cra,
    Terms,
    Handover,
}

impl Step for PdiSection {
    const ALL: &'static [Self] = &[
        Self::Vehicle,
        Self::Damage,
        Self::Tyres,
        Self::Brakes,
        Self::Mechanical,
        Self::Cra,
        Self::Terms,
        Self::Handover,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Vehicle => "Vehicle Details",
            Self::Damage => "Damage Diagram",
            Self::Tyres => "Tyres",
            Self::Brakes => "Brakes",
            Self::Mechanical => "Mechanical Checks",
            Self::Cra => "CRA Compliance",
            Self::Terms => "Terms & Conditions",
            Self::Handover => "Customer Handover",
        }
    }
}

// ── Vehicle ──

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub variant: String,
    pub registration: String,
    pub vin: String,
    #[serde(rename = "mileagePDI")]
    pub mileage_pdi: String,
    pub mileage_handover: String,
    pub fuel_type: String,
    pub transmission: String,
    pub engine_size: String,
    #[serde(rename = "datePDI")]
    pub date_pdi: String,
    pub date_handover: String,
    pub technician_name: String,
    pub sales_executive: String,
}

impl VehicleInfo {
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let slot = match field {
            "make" => &mut self.make,
            "model" => &mut self.model,
            "variant" => &mut self.variant,
            "registration" => &mut self.registration,
            "vin" => &mut self.vin,
            "mileagePDI" => &mut self.mileage_pdi,
            "mileageHandover" => &mut self.mileage_handover,
            "fuelType" => &mut self.fuel_type,
            "transmission" => &mut self.transmission,
            "engineSize" => &mut self.engine_size,
            "datePDI" => &mut self.date_pdi,
            "dateHandover" => &mut self.date_handover,
            "technicianName" => &mut self.technician_name,
            "salesExecutive" => &mut self.sales_executive,
            _ => return Err(unknown_field("vehicle", field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

// ── Damage ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    Scratch,
    Dent,
    Chip,
    Scuff,
    Crack,
}

impl DamageType {
    pub const ALL: &'static [Self] = &[Self::Scratch, Self::Dent, Self::Chip, Self::Scuff, Self::Crack];

    pub fn label(self) -> &'static str {
        match self {
            Self::Scratch => "Scratch",
            Self::Dent => "Dent",
            Self::Chip => "Chip",
            Self::Scuff => "Scuff",
            Self::Crack => "Crack",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(key.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub id: String,
    pub panel: String,
    pub view: String,
    #[serde(rename = "type")]
    pub kind: DamageType,
}

// ── Tyres & brakes ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TyrePosition {
    Fl,
    Fr,
    Rl,
    Rr,
    Spare,
}

impl TyrePosition {
    pub const ALL: &'static [Self] = &[Self::Fl, Self::Fr, Self::Rl, Self::Rr, Self::Spare];

    pub fn key(self) -> &'static str {
        match self {
            Self::Fl => "fl",
            Self::Fr => "fr",
            Self::Rl => "rl",
            Self::Rr => "rr",
            Self::Spare => "spare",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fl => "Front Left (FL)",
            Self::Fr => "Front Right (FR)",
            Self::Rl => "Rear Left (RL)",
            Self::Rr => "Rear Right (RR)",
            Self::Spare => "Spare (if fitted)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TyreMeasurement {
    pub position: TyrePosition,
    pub tread_depth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BrakeComponent {
    FrontDiscs,
    RearDiscs,
    FrontPads,
    RearPads,
}

impl BrakeComponent {
    pub const ALL: &'static [Self] = &[Self::FrontDiscs, Self::RearDiscs, Self::FrontPads, Self::RearPads];

    pub fn key(self) -> &'static str {
        match self {
            Self::FrontDiscs => "frontDiscs",
            Self::RearDiscs => "rearDiscs",
            Self::FrontPads => "frontPads",
            Self::RearPads => "rearPads",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FrontDiscs => "Front Discs",
            Self::RearDiscs => "Rear Discs",
            Self::FrontPads => "Front Pads",
            Self::RearPads => "Rear Pads",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakeMeasurement {
    pub component: BrakeComponent,
    pub measured: String,
    pub minimum: String,
}

// ── Checklists ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MechanicalCheck {
    EngineStartsSmoothly,
    NoExcessiveSmoke,
    NoFluidLeaks,
    ClutchOperationCorrect,
    GearboxSmooth,
    SteeringAligned,
    SuspensionQuiet,
    BrakesOperatingCorrectly,
    NoDashboardWarningLights,
    RoadTestCompleted,
}

impl CheckItem for MechanicalCheck {
    const ALL: &'static [Self] = &[
        Self::EngineStartsSmoothly,
        Self::NoExcessiveSmoke,
        Self::NoFluidLeaks,
        Self::ClutchOperationCorrect,
        Self::GearboxSmooth,
        Self::SteeringAligned,
        Self::SuspensionQuiet,
        Self::BrakesOperatingCorrectly,
        Self::NoDashboardWarningLights,
        Self::RoadTestCompleted,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::EngineStartsSmoothly => "engineStartsSmoothly",
            Self::NoExcessiveSmoke => "noExcessiveSmoke",
            Self::NoFluidLeaks => "noFluidLeaks",
            Self::ClutchOperationCorrect => "clutchOperationCorrect",
            Self::GearboxSmooth => "gearboxSmooth",
            Self::SteeringAligned => "steeringAligned",
            Self::SuspensionQuiet => "suspensionQuiet",
            Self::BrakesOperatingCorrectly => "brakesOperatingCorrectly",
            Self::NoDashboardWarningLights => "noDashboardWarningLights",
            Self::RoadTestCompleted => "roadTestCompleted",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::EngineStartsSmoothly => "Engine starts smoothly",
            Self::NoExcessiveSmoke => "No excessive smoke",
            Self::NoFluidLeaks => "No fluid leaks",
            Self::ClutchOperationCorrect => "Clutch operation correct",
            Self::GearboxSmooth => "Gearbox smooth",
            Self::SteeringAligned => "Steering aligned",
            Self::SuspensionQuiet => "Suspension quiet",
            Self::BrakesOperatingCorrectly => "Brakes operating correctly",
            Self::NoDashboardWarningLights => "No dashboard warning lights",
            Self::RoadTestCompleted => "Road test completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CraCheck {
    SatisfactoryQuality,
    FitForPurpose,
    AsDescribed,
    KnownFaultsDisclosed,
    RightToRejectExplained,
    WarrantyTermsExplained,
    FinanceRightsExplained,
    DistanceSaleRightsExplained,
}

impl CheckItem for CraCheck {
    const ALL: &'static [Self] = &[
        Self::SatisfactoryQuality,
        Self::FitForPurpose,
        Self::AsDescribed,
        Self::KnownFaultsDisclosed,
        Self::RightToRejectExplained,
        Self::WarrantyTermsExplained,
        Self::FinanceRightsExplained,
        Self::DistanceSaleRightsExplained,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::SatisfactoryQuality => "satisfactoryQuality",
            Self::FitForPurpose => "fitForPurpose",
            Self::AsDescribed => "asDescribed",
            Self::KnownFaultsDisclosed => "knownFaultsDisclosed",
            Self::RightToRejectExplained => "rightToRejectExplained",
            Self::WarrantyTermsExplained => "warrantyTermsExplained",
            Self::FinanceRightsExplained => "financeRightsExplained",
            Self::DistanceSaleRightsExplained => "distanceSaleRightsExplained",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SatisfactoryQuality => "Vehicle of satisfactory quality (age/mileage considered)",
            Self::FitForPurpose => "Fit for purpose",
            Self::AsDescribed => "As described in advert",
            Self::KnownFaultsDisclosed => "Known faults disclosed",
            Self::RightToRejectExplained => "30-day right to reject explained",
            Self::WarrantyTermsExplained => "Warranty terms explained",
            Self::FinanceRightsExplained => "Finance rights explained (if applicable)",
            Self::DistanceSaleRightsExplained => {
                "Distance sale cancellation rights explained (if applicable)"
            }
        }
    }
}

// ── Handover ──

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handover {
    pub vehicle_inspected: bool,
    pub cosmetic_accepted: bool,
    pub mileage_confirmed: bool,
    pub keys_received: String,
    #[serde(rename = "v5cPresent")]
    pub v5c_present: bool,
    pub service_history_present: bool,
    pub service_history_type: String,
    pub mot_expiry_date: String,
    pub documentation_received: bool,
    pub customer_name: String,
    pub sales_rep_name: String,
    pub customer_signature: String,
    pub sales_rep_signature: String,
}

impl Handover {
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let flag = match field {
            "vehicleInspected" => &mut self.vehicle_inspected,
            "cosmeticAccepted" => &mut self.cosmetic_accepted,
            "mileageConfirmed" => &mut self.mileage_confirmed,
            "v5cPresent" => &mut self.v5c_present,
            "serviceHistoryPresent" => &mut self.service_history_present,
            "documentationReceived" => &mut self.documentation_received,
            _ => {
                let slot = match field {
                    "keysReceived" => &mut self.keys_received,
                    "serviceHistoryType" => &mut self.service_history_type,
                    "motExpiryDate" => &mut self.mot_expiry_date,
                    "customerName" => &mut self.customer_name,
                    "salesRepName" => &mut self.sales_rep_name,
                    "customerSignature" => &mut self.customer_signature,
                    "salesRepSignature" => &mut self.sales_rep_signature,
                    _ => return Err(unknown_field("handover", field)),
                };
                *slot = value.into_text(field)?;
                return Ok(());
            }
        };
        *flag = value.into_flag(field)?;
        Ok(())
    }
}

// ── Draft ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdiDraft {
    pub report_id: String,
    pub report_date: String,
    pub created_at: String,
    pub vehicle: VehicleInfo,
    pub damages: Vec<Damage>,
    pub damage_notes: String,
    pub tyre_measurements: Vec<TyreMeasurement>,
    pub brake_measurements: Vec<BrakeMeasurement>,
    pub mechanical_checks: Checklist<MechanicalCheck>,
    pub mechanical_notes: String,
    pub cra_checks: Checklist<CraCheck>,
    pub cra_confirmed: bool,
    pub tc_accepted: bool,
    pub handover: Handover,
}

impl PdiDraft {
    pub fn fresh_at(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            report_id: dated_id(Tool::Pdi.id_prefix(), today),
            report_date: iso_date(today),
            created_at: now.to_rfc3339(),
            vehicle: VehicleInfo::default(),
            damages: Vec::new(),
            damage_notes: String::new(),
            tyre_measurements: TyrePosition::ALL
                .iter()
                .map(|&position| TyreMeasurement {
                    position,
                    tread_depth: String::new(),
                })
                .collect(),
            brake_measurements: BrakeComponent::ALL
                .iter()
                .map(|&component| BrakeMeasurement {
                    component,
                    measured: String::new(),
                    minimum: String::new(),
                })
                .collect(),
            mechanical_checks: Checklist::default(),
            mechanical_notes: String::new(),
            cra_checks: Checklist::default(),
            cra_confirmed: false,
            tc_accepted: false,
            handover: Handover::default(),
        }
    }

    /// Add a damage record with a newly generated id.
    pub fn with_damage(&self, panel: &str, view: &str, kind: DamageType) -> Self {
        let mut next = self.clone();
        next.damages.push(Damage {
            id: Uuid::new_v4().to_string(),
            panel: panel.to_string(),
            view: view.to_string(),
            kind,
        });
        next
    }

    pub fn without_damage(&self, id: &str) -> Result<Self, FieldError> {
        if !self.damages.iter().any(|d| d.id == id) {
            return Err(FieldError::UnknownDamage(id.to_string()));
        }
        let mut next = self.clone();
        next.damages.retain(|d| d.id != id);
        Ok(next)
    }

    pub fn tread_depth(&self, position: TyrePosition) -> &str {
        self.tyre_measurements
            .iter()
            .find(|t| t.position == position)
            .map(|t| t.tread_depth.as_str())
            .unwrap_or("")
    }

    fn set_tyre(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let position = TyrePosition::ALL
            .iter()
            .copied()
            .find(|p| p.key() == field)
            .ok_or_else(|| unknown_field("tyres", field))?;
        let depth = value.into_text(field)?;
        match self.tyre_measurements.iter_mut().find(|t| t.position == position) {
            Some(t) => t.tread_depth = depth,
            None => self.tyre_measurements.push(TyreMeasurement {
                position,
                tread_depth: depth,
            }),
        }
        Ok(())
    }

    fn set_brake(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let (key, part) = field
            .split_once('.')
            .ok_or_else(|| unknown_field("brakes", field))?;
        let component = BrakeComponent::ALL
            .iter()
            .copied()
            .find(|c| c.key() == key)
            .ok_or_else(|| unknown_field("brakes", field))?;
        if part != "measured" && part != "minimum" {
            return Err(unknown_field("brakes", field));
        }
        let reading = value.into_text(field)?;
        let idx = match self.brake_measurements.iter().position(|b| b.component == component) {
            Some(idx) => idx,
            None => {
                self.brake_measurements.push(BrakeMeasurement {
                    component,
                    measured: String::new(),
                    minimum: String::new(),
                });
                self.brake_measurements.len() - 1
            }
        };
        let brake = &mut self.brake_measurements[idx];
        if part == "measured" {
            brake.measured = reading;
        } else {
            brake.minimum = reading;
        }
        Ok(())
    }
}

/// Whole-report checks run before export.
pub fn validate_report(draft: &PdiDraft) -> Vec<String> {
    let mut errs = Vec::new();
    let v = &draft.vehicle;
    require_text(&mut errs, &v.make, "Vehicle make is required");
    require_text(&mut errs, &v.model, "Vehicle model is required");
    require_text(&mut errs, &v.registration, "Registration is required");

    let vin = v.vin.trim();
    if !vin.is_empty() && vin.chars().count() != VIN_LENGTH {
        errs.push("VIN must be exactly 17 characters".into());
    }

    let (at_pdi, at_handover) = (v.mileage_pdi.trim(), v.mileage_handover.trim());
    if !at_pdi.is_empty()
        && !at_handover.is_empty()
        && parse_odometer(at_handover) < parse_odometer(at_pdi)
    {
        errs.push("Handover mileage cannot be less than PDI mileage".into());
    }

    require_true(&mut errs, draft.cra_confirmed, "CRA 2015 declaration must be confirmed");
    require_true(&mut errs, draft.tc_accepted, "Terms & Conditions must be accepted");

    let any_tyre = draft
        .tyre_measurements
        .iter()
        .any(|t| !t.tread_depth.trim().is_empty());
    require_true(&mut errs, any_tyre, "At least one tyre measurement is required");
    errs
}

fn mm(reading: &str) -> String {
    match reading.trim() {
        "" => String::new(),
        r => format!("{r} mm"),
    }
}

impl Draft for PdiDraft {
    type Step = PdiSection;

    const TOOL: Tool = Tool::Pdi;

    fn fresh() -> Self {
        Self::fresh_at(Utc::now(), Local::now().date_naive())
    }

    fn id(&self) -> &str {
        &self.report_id
    }

    /// Sections are freely navigable.
    fn validate_step(&self, _step: PdiSection) -> Vec<String> {
        Vec::new()
    }

    fn export_violations(&self) -> Vec<String> {
        validate_report(self)
    }

    fn apply(&self, change: &FieldChange) -> Result<Self, FieldError> {
        let mut next = self.clone();
        let (section, field) = (change.section.as_str(), change.field.as_str());
        let value = change.value.clone();
        match section {
            "vehicle" => next.vehicle.set(field, value)?,
            "damage" => match field {
                "damageNotes" => next.damage_notes = value.into_text(field)?,
                _ => return Err(unknown_field(section, field)),
            },
            "tyres" => next.set_tyre(field, value)?,
            "brakes" => next.set_brake(field, value)?,
            "mechanical" => match field {
                "mechanicalNotes" => next.mechanical_notes = value.into_text(field)?,
                key => {
                    let checked = value.into_flag(field)?;
                    next.mechanical_checks.set_by_key(section, key, checked)?;
                }
            },
            "cra" => match field {
                "craConfirmed" => next.cra_confirmed = value.into_flag(field)?,
                key => {
                    let checked = value.into_flag(field)?;
                    next.cra_checks.set_by_key(section, key, checked)?;
                }
            },
            "terms" => match field {
                "tcAccepted" => next.tc_accepted = value.into_flag(field)?,
                _ => return Err(unknown_field(section, field)),
            },
            "handover" => next.handover.set(field, value)?,
            other => return Err(FieldError::UnknownSection(other.to_string())),
        }
        Ok(next)
    }

    fn document(&self, today: NaiveDate) -> Document {
        let v = &self.vehicle;
        let vehicle = Section::new("Vehicle Details")
            .row("Make", v.make.as_str())
            .row("Model", v.model.as_str())
            .row("Variant", v.variant.as_str())
            .row("Registration", v.registration.as_str())
            .row("VIN", v.vin.as_str())
            .row("Mileage at PDI", v.mileage_pdi.as_str())
            .row("Mileage at Handover", v.mileage_handover.as_str())
            .row("Fuel Type", v.fuel_type.as_str())
            .row("Transmission", v.transmission.as_str())
            .row("Engine Size", v.engine_size.as_str())
            .row("Date of PDI", v.date_pdi.as_str())
            .row("Date of Handover", v.date_handover.as_str())
            .row("Technician", v.technician_name.as_str())
            .row("Sales Executive", v.sales_executive.as_str());

        let mut damage = Section::new("Damage Report");
        if self.damages.is_empty() {
            damage = damage.row("Recorded Damage", "None recorded");
        }
        for d in &self.damages {
            damage = damage.row(&format!("{} ({})", d.panel, d.view), d.kind.label());
        }
        let damage = damage.paragraph("Damage Notes", &self.damage_notes);

        let mut tyres = Section::new("Tyre Tread Depths");
        for &position in TyrePosition::ALL {
            tyres = tyres.row(position.label(), mm(self.tread_depth(position)));
        }

        let mut brakes = Section::new("Brake Measurements");
        for b in &self.brake_measurements {
            let reading = match (b.measured.trim(), b.minimum.trim()) {
                ("", "") => String::new(),
                (m, "") => format!("{m} mm"),
                (m, min) => format!("{} (min {min} mm)", if m.is_empty() { "—" } else { m }),
            };
            brakes = brakes.row(b.component.label(), reading);
        }

        let mut mechanical = Section::new("Mechanical Checks");
        for (check, done) in self.mechanical_checks.iter() {
            mechanical = mechanical.check(check.label(), done);
        }
        let mechanical = mechanical.paragraph("Technician Notes", &self.mechanical_notes);

        let mut cra = Section::new("CRA 2015 Compliance");
        for (check, done) in self.cra_checks.iter() {
            cra = cra.check(check.label(), done);
        }
        let cra = cra.check(
            "Dealer confirms the vehicle meets the Consumer Rights Act 2015 standards above",
            self.cra_confirmed,
        );

        let terms = Section::new("Terms & Conditions").check(
            "Customer has read and accepts the dealership Terms & Conditions",
            self.tc_accepted,
        );

        let h = &self.handover;
        let handover = Section::new("Customer Handover")
            .check("Vehicle has been inspected in the presence of the customer", h.vehicle_inspected)
            .check("Cosmetic condition accepted as shown in this report", h.cosmetic_accepted)
            .check("Mileage at handover confirmed and correct", h.mileage_confirmed)
            .check("All documentation received and checked", h.documentation_received)
            .row("Keys Received", h.keys_received.as_str())
            .row("V5C Present", yes_no(h.v5c_present))
            .row("Service History Present", yes_no(h.service_history_present))
            .row("Service History Type", h.service_history_type.as_str())
            .row("MOT Expiry", h.mot_expiry_date.as_str())
            .row("Customer Name", h.customer_name.as_str())
            .row("Customer Signature", h.customer_signature.as_str())
            .row("Sales Representative", h.sales_rep_name.as_str())
            .row("Sales Representative Signature", h.sales_rep_signature.as_str());

        Document::new("Pre-Delivery Inspection Report", self.report_id.as_str(), iso_date(today))
            .subtitle(format!("Report date: {}", self.report_date))
            .section(vehicle)
            .section(damage)
            .section(tyres)
            .section(brakes)
            .section(mechanical)
            .section(cra)
            .section(terms)
            .section(handover)
            .footer(
                "This document forms part of the dealership's compliance audit trail and does not \
                 remove or restrict statutory rights under the Consumer Rights Act 2015.",
            )
    }

    fn export_filename(&self, today: NaiveDate) -> String {
        suggested_filename("PDI_Report", &self.vehicle.registration, "VEHICLE", &iso_date(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn draft() -> PdiDraft {
        PdiDraft::fresh_at(Utc::now(), today())
    }

    fn set(d: &PdiDraft, section: &str, field: &str, value: impl Into<FieldValue>) -> PdiDraft {
        d.apply(&FieldChange::new(section, field, value)).unwrap()
    }

    fn exportable() -> PdiDraft {
        let d = set(&draft(), "vehicle", "make", "Ford");
        let d = set(&d, "vehicle", "model", "Focus");
        let d = set(&d, "vehicle", "registration", "AB12 CDE");
        let d = set(&d, "cra", "craConfirmed", true);
        let d = set(&d, "terms", "tcAccepted", true);
        set(&d, "tyres", "fl", "6.5")
    }

    #[test]
    fn fresh_report_has_fixed_lists() {
        let d = draft();
        assert!(d.report_id.starts_with("PDI-20261019-"));
        assert_eq!(d.tyre_measurements.len(), 5);
        assert_eq!(d.brake_measurements.len(), 4);
        assert!(d.damages.is_empty());
    }

    #[test]
    fn empty_report_lists_every_violation() {
        assert_eq!(
            validate_report(&draft()),
            vec![
                "Vehicle make is required",
                "Vehicle model is required",
                "Registration is required",
                "CRA 2015 declaration must be confirmed",
                "Terms & Conditions must be accepted",
                "At least one tyre measurement is required",
            ]
        );
    }

    #[test]
    fn sections_never_block() {
        let d = draft();
        for section in PdiSection::ALL {
            assert!(d.validate_step(*section).is_empty());
        }
        assert!(!d.export_violations().is_empty());
        assert!(exportable().export_violations().is_empty());
    }

    #[test]
    fn vin_length_only_checked_when_given() {
        let d = set(&exportable(), "vehicle", "vin", "WF0XXXGCDX1234");
        assert_eq!(validate_report(&d), vec!["VIN must be exactly 17 characters"]);
        let d = set(&d, "vehicle", "vin", "WF0XXXGCDX1234567");
        assert!(validate_report(&d).is_empty());
    }

    #[test]
    fn handover_mileage_cross_check() {
        let d = set(&exportable(), "vehicle", "mileagePDI", "21,400");
        let d = set(&d, "vehicle", "mileageHandover", "21,390");
        assert_eq!(
            validate_report(&d),
            vec!["Handover mileage cannot be less than PDI mileage"]
        );
    }

    #[test]
    fn checklist_keys_are_closed() {
        let d = set(&draft(), "mechanical", "roadTestCompleted", true);
        assert!(d.mechanical_checks.is_checked(MechanicalCheck::RoadTestCompleted));
        assert!(matches!(
            d.apply(&FieldChange::new("mechanical", "roadTestCompleteed", true)),
            Err(FieldError::UnknownField { .. })
        ));
        let d = set(&d, "cra", "fitForPurpose", "yes");
        assert!(d.cra_checks.is_checked(CraCheck::FitForPurpose));
    }

    #[test]
    fn brake_readings_by_component() {
        let d = set(&draft(), "brakes", "frontPads.measured", "7");
        let d = set(&d, "brakes", "frontPads.minimum", "3");
        let pads = d
            .brake_measurements
            .iter()
            .find(|b| b.component == BrakeComponent::FrontPads)
            .unwrap();
        assert_eq!((pads.measured.as_str(), pads.minimum.as_str()), ("7", "3"));
        assert!(d.apply(&FieldChange::new("brakes", "frontPads.thickness", "3")).is_err());
        assert!(d.apply(&FieldChange::new("brakes", "frontPads", "3")).is_err());
    }

    #[test]
    fn damage_records_add_and_remove() {
        let d = draft().with_damage("Front Bumper", "front", DamageType::Scratch);
        let d = d.with_damage("Bonnet", "top", DamageType::Chip);
        assert_eq!(d.damages.len(), 2);
        assert_ne!(d.damages[0].id, d.damages[1].id);

        let id = d.damages[0].id.clone();
        let d = d.without_damage(&id).unwrap();
        assert_eq!(d.damages.len(), 1);
        assert_eq!(d.damages[0].panel, "Bonnet");
        assert_eq!(d.without_damage(&id), Err(FieldError::UnknownDamage(id)));
    }

    #[test]
    fn round_trips_through_json() {
        let d = exportable()
            .with_damage("Rear Door", "left", DamageType::Dent)
            .apply(&FieldChange::new("mechanical", "gearboxSmooth", true))
            .unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"mileagePDI\""));
        assert!(json.contains("\"type\":\"dent\""));
        let back: PdiDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn unknown_checklist_key_in_json_is_rejected() {
        let mut json = serde_json::to_value(draft()).unwrap();
        json["craChecks"] = serde_json::json!({ "fitForPurpse": true });
        assert!(serde_json::from_value::<PdiDraft>(json).is_err());
    }

    #[test]
    fn document_and_filename() {
        let d = exportable();
        let doc = d.document(today());
        assert_eq!(doc.sections.len(), 8);
        let tyres = doc.find("Tyre Tread Depths").unwrap();
        assert_eq!(tyres.value("Front Left (FL)"), Some("6.5 mm"));
        assert_eq!(tyres.value("Spare (if fitted)"), Some("—"));
        assert_eq!(
            doc.find("Damage Report").unwrap().value("Recorded Damage"),
            Some("None recorded")
        );
        assert_eq!(d.export_filename(today()), "PDI_Report_AB12CDE_2026-10-19");
    }
}
