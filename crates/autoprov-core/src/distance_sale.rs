//! Distance Sale Pack: the dealer's audit trail for a vehicle sold at a
//! distance, from pre-sale declarations through delivery and refund policy.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, iso_date, require_text, require_true};
use crate::export::{Document, Section, suggested_filename, thousands};
use crate::field::{FieldChange, FieldError, FieldValue, unknown_field};
use crate::id::dated_id;
use crate::step::Step;
use crate::timeline::parse_odometer;
use crate::tool::Tool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSaleStep {
    Dealer,
    Vehicle,
    PreSale,
    Terms,
    CoolingOff,
    Delivery,
    RefundPolicy,
}

impl Step for DistanceSaleStep {
    const ALL: &'static [Self] = &[
        Self::Dealer,
        Self::Vehicle,
        Self::PreSale,
        Self::Terms,
        Self::CoolingOff,
        Self::Delivery,
        Self::RefundPolicy,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Dealer => "Dealer Details",
            Self::Vehicle => "Vehicle Details",
            Self::PreSale => "Pre-Sale Condition",
            Self::Terms => "Distance Sale Terms",
            Self::CoolingOff => "Cooling-Off",
            Self::Delivery => "Delivery Sign-Off",
            Self::RefundPolicy => "Refund Policy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveredBy {
    #[default]
    #[serde(rename = "")]
    Unset,
    Dealer,
    #[serde(rename = "Third Party")]
    ThirdParty,
}

impl DeliveredBy {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Dealer => "Dealer",
            Self::ThirdParty => "Third Party",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "" | "unset" => Some(Self::Unset),
            "dealer" => Some(Self::Dealer),
            "third party" | "third-party" | "thirdparty" => Some(Self::ThirdParty),
            _ => None,
        }
    }
}

// ── Sections ──

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerDetails {
    pub business_name: String,
    pub trading_address: String,
    pub contact_number: String,
    pub email: String,
    pub vat_number: String,
    pub fca_number: String,
}

impl DealerDetails {
    const SECTION: &'static str = "dealer";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let slot = match field {
            "businessName" => &mut self.business_name,
            "tradingAddress" => &mut self.trading_address,
            "contactNumber" => &mut self.contact_number,
            "email" => &mut self.email,
            "vatNumber" => &mut self.vat_number,
            "fcaNumber" => &mut self.fca_number,
            _ => return Err(unknown_field(Self::SECTION, field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub registration: String,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub mileage_at_sale: String,
    pub sale_price: String,
    pub date_of_sale: String,
    pub agreed_delivery_date: String,
}

impl VehicleDetails {
    const SECTION: &'static str = "vehicle";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let slot = match field {
            "registration" => &mut self.registration,
            "vin" => &mut self.vin,
            "make" => &mut self.make,
            "model" => &mut self.model,
            "mileageAtSale" => &mut self.mileage_at_sale,
            "salePrice" => &mut self.sale_price,
            "dateOfSale" => &mut self.date_of_sale,
            "agreedDeliveryDate" => &mut self.agreed_delivery_date,
            _ => return Err(unknown_field(Self::SECTION, field)),
        };
        *slot = value.into_text(field)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSaleCondition {
    pub vehicle_inspected: bool,
    pub known_defects_disclosed: bool,
    pub cosmetic_imperfections_disclosed: bool,
    pub warning_lights_declared: bool,
    pub service_history_explained: bool,
    pub finance_clear_confirmed: bool,
    pub additional_disclosures: String,
    pub inspection_timestamp: String,
    pub dealer_signature: String,
}

impl PreSaleCondition {
    const SECTION: &'static str = "preSale";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let flag = match field {
            "vehicleInspected" => &mut self.vehicle_inspected,
            "knownDefectsDisclosed" => &mut self.known_defects_disclosed,
            "cosmeticImperfectionsDisclosed" => &mut self.cosmetic_imperfections_disclosed,
            "warningLightsDeclared" => &mut self.warning_lights_declared,
            "serviceHistoryExplained" => &mut self.service_history_explained,
            "financeClearConfirmed" => &mut self.finance_clear_confirmed,
            "additionalDisclosures" => {
                self.additional_disclosures = value.into_text(field)?;
                return Ok(());
            }
            "inspectionTimestamp" => {
                self.inspection_timestamp = value.into_text(field)?;
                return Ok(());
            }
            "dealerSignature" => {
                self.dealer_signature = value.into_text(field)?;
                return Ok(());
            }
            _ => return Err(unknown_field(Self::SECTION, field)),
        };
        *flag = value.into_flag(field)?;
        Ok(())
    }

    /// The five declarations required before the pack can proceed.
    fn mandatory_declared(&self) -> bool {
        self.vehicle_inspected
            && self.known_defects_disclosed
            && self.cosmetic_imperfections_disclosed
            && self.warning_lights_declared
            && self.service_history_explained
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceSaleTerms {
    pub terms_presented: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingOffConfirmation {
    pub is_distance_sale: bool,
    #[serde(rename = "customerInformedOf14Days")]
    pub customer_informed_of_14_days: bool,
    pub cooling_off_start_date: String,
    pub return_condition_explained: bool,
    pub return_process_explained: bool,
    pub customer_acknowledges_cooling_off: bool,
}

impl Default for CoolingOffConfirmation {
    fn default() -> Self {
        Self {
            is_distance_sale: true,
            customer_informed_of_14_days: false,
            cooling_off_start_date: String::new(),
            return_condition_explained: false,
            return_process_explained: false,
            customer_acknowledges_cooling_off: false,
        }
    }
}

impl CoolingOffConfirmation {
    const SECTION: &'static str = "coolingOff";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let flag = match field {
            "isDistanceSale" => &mut self.is_distance_sale,
            "customerInformedOf14Days" => &mut self.customer_informed_of_14_days,
            "returnConditionExplained" => &mut self.return_condition_explained,
            "returnProcessExplained" => &mut self.return_process_explained,
            "customerAcknowledgesCoolingOff" => &mut self.customer_acknowledges_cooling_off,
            "coolingOffStartDate" => {
                self.cooling_off_start_date = value.into_text(field)?;
                return Ok(());
            }
            _ => return Err(unknown_field(Self::SECTION, field)),
        };
        *flag = value.into_flag(field)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySignOff {
    pub delivery_date: String,
    pub delivery_mileage: String,
    pub delivered_by: DeliveredBy,
    pub delivered_by_name: String,
    pub customer_confirms_condition: bool,
    pub customer_signature: String,
    pub signature_timestamp: String,
}

impl DeliverySignOff {
    const SECTION: &'static str = "delivery";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "deliveryDate" => self.delivery_date = value.into_text(field)?,
            "deliveryMileage" => self.delivery_mileage = value.into_text(field)?,
            "deliveredBy" => self.delivered_by = value.into_choice(field, DeliveredBy::from_key)?,
            "deliveredByName" => self.delivered_by_name = value.into_text(field)?,
            "customerConfirmsCondition" => self.customer_confirms_condition = value.into_flag(field)?,
            "customerSignature" => self.customer_signature = value.into_text(field)?,
            "signatureTimestamp" => self.signature_timestamp = value.into_text(field)?,
            _ => return Err(unknown_field(Self::SECTION, field)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPolicyAck {
    pub refund_timelines_understood: bool,
    pub repair_first_approach_agreed: bool,
    pub diagnostics_agreed: bool,
    pub third_party_inspection_agreed: bool,
    pub transport_cost_policy_understood: bool,
    pub confirmed: bool,
}

impl RefundPolicyAck {
    const SECTION: &'static str = "refundPolicy";

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        let flag = match field {
            "refundTimelinesUnderstood" => &mut self.refund_timelines_understood,
            "repairFirstApproachAgreed" => &mut self.repair_first_approach_agreed,
            "diagnosticsAgreed" => &mut self.diagnostics_agreed,
            "thirdPartyInspectionAgreed" => &mut self.third_party_inspection_agreed,
            "transportCostPolicyUnderstood" => &mut self.transport_cost_policy_understood,
            "confirmed" => &mut self.confirmed,
            _ => return Err(unknown_field(Self::SECTION, field)),
        };
        *flag = value.into_flag(field)?;
        Ok(())
    }
}

// ── Draft ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceSaleDraft {
    pub pack_id: String,
    pub created_at: String,
    pub dealer: DealerDetails,
    pub vehicle: VehicleDetails,
    pub pre_sale: PreSaleCondition,
    pub terms: DistanceSaleTerms,
    pub cooling_off: CoolingOffConfirmation,
    pub delivery: DeliverySignOff,
    pub refund_policy: RefundPolicyAck,
}

impl DistanceSaleDraft {
    pub fn fresh_at(now: chrono::DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            pack_id: dated_id(Tool::DistanceSale.id_prefix(), today),
            created_at: now.to_rfc3339(),
            dealer: DealerDetails::default(),
            vehicle: VehicleDetails::default(),
            pre_sale: PreSaleCondition::default(),
            terms: DistanceSaleTerms::default(),
            cooling_off: CoolingOffConfirmation::default(),
            delivery: DeliverySignOff::default(),
            refund_policy: RefundPolicyAck::default(),
        }
    }
}

pub fn validate_step(step: DistanceSaleStep, draft: &DistanceSaleDraft) -> Vec<String> {
    let mut errs = Vec::new();
    match step {
        DistanceSaleStep::Dealer => {
            let d = &draft.dealer;
            require_text(&mut errs, &d.business_name, "Business Name is required");
            require_text(&mut errs, &d.trading_address, "Trading Address is required");
            require_text(&mut errs, &d.contact_number, "Contact Number is required");
            require_text(&mut errs, &d.email, "Email is required");
        }
        DistanceSaleStep::Vehicle => {
            let v = &draft.vehicle;
            require_text(&mut errs, &v.registration, "Registration is required");
            require_text(&mut errs, &v.make, "Make is required");
            require_text(&mut errs, &v.model, "Model is required");
            require_text(&mut errs, &v.mileage_at_sale, "Mileage at Sale is required");
            require_text(&mut errs, &v.sale_price, "Sale Price is required");
            require_text(&mut errs, &v.date_of_sale, "Date of Sale is required");
        }
        DistanceSaleStep::PreSale => {
            let p = &draft.pre_sale;
            require_true(
                &mut errs,
                p.mandatory_declared(),
                "All mandatory pre-sale declarations must be confirmed",
            );
            require_text(&mut errs, &p.dealer_signature, "Dealer / Inspector name is required");
        }
        DistanceSaleStep::Terms => {
            require_true(
                &mut errs,
                draft.terms.terms_presented,
                "CRA terms must be confirmed as presented to the customer",
            );
        }
        DistanceSaleStep::CoolingOff => {
            let c = &draft.cooling_off;
            require_text(&mut errs, &c.cooling_off_start_date, "Cooling-off start date is required");
            require_true(
                &mut errs,
                c.customer_acknowledges_cooling_off,
                "Customer cooling-off acknowledgement is required",
            );
        }
        DistanceSaleStep::Delivery => {
            let d = &draft.delivery;
            require_text(&mut errs, &d.delivery_date, "Delivery date is required");
            if d.delivered_by == DeliveredBy::Unset {
                errs.push("Delivered by must be selected".into());
            }
            require_true(
                &mut errs,
                d.customer_confirms_condition,
                "Customer condition confirmation is required",
            );
            let at_sale = draft.vehicle.mileage_at_sale.trim();
            let delivered = d.delivery_mileage.trim();
            if !at_sale.is_empty()
                && !delivered.is_empty()
                && parse_odometer(delivered) < parse_odometer(at_sale)
            {
                errs.push("Delivery Mileage cannot be lower than Mileage at Sale".into());
            }
        }
        DistanceSaleStep::RefundPolicy => {
            require_true(
                &mut errs,
                draft.refund_policy.confirmed,
                "Customer must confirm the refund policy acknowledgement",
            );
        }
    }
    errs
}

fn miles(reading: &str) -> String {
    if reading.trim().is_empty() {
        String::new()
    } else {
        let n = u64::try_from(parse_odometer(reading)).unwrap_or(0);
        format!("{} miles", thousands(n))
    }
}

fn pounds(amount: &str) -> String {
    let amount = amount.trim();
    if amount.is_empty() {
        String::new()
    } else {
        format!("£{amount}")
    }
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() { "N/A" } else { s }
}

impl Draft for DistanceSaleDraft {
    type Step = DistanceSaleStep;

    const TOOL: Tool = Tool::DistanceSale;

    fn fresh() -> Self {
        Self::fresh_at(Utc::now(), Local::now().date_naive())
    }

    fn id(&self) -> &str {
        &self.pack_id
    }

    fn validate_step(&self, step: DistanceSaleStep) -> Vec<String> {
        validate_step(step, self)
    }

    fn apply(&self, change: &FieldChange) -> Result<Self, FieldError> {
        let mut next = self.clone();
        let (field, value) = (change.field.as_str(), change.value.clone());
        match change.section.as_str() {
            DealerDetails::SECTION => next.dealer.set(field, value)?,
            VehicleDetails::SECTION => next.vehicle.set(field, value)?,
            PreSaleCondition::SECTION => next.pre_sale.set(field, value)?,
            "terms" => match field {
                "termsPresented" => next.terms.terms_presented = value.into_flag(field)?,
                _ => return Err(unknown_field("terms", field)),
            },
            CoolingOffConfirmation::SECTION => next.cooling_off.set(field, value)?,
            DeliverySignOff::SECTION => next.delivery.set(field, value)?,
            RefundPolicyAck::SECTION => next.refund_policy.set(field, value)?,
            other => return Err(FieldError::UnknownSection(other.to_string())),
        }
        Ok(next)
    }

    fn document(&self, today: NaiveDate) -> Document {
        let (dealer, vehicle, pre) = (&self.dealer, &self.vehicle, &self.pre_sale);
        let (cooling, delivery, refund) = (&self.cooling_off, &self.delivery, &self.refund_policy);

        let dealer_section = Section::new("1. Dealer Details")
            .row("Business Name", dealer.business_name.as_str())
            .row("Trading Address", dealer.trading_address.as_str())
            .row("Contact Number", dealer.contact_number.as_str())
            .row("Email", dealer.email.as_str())
            .row("VAT Number", or_na(&dealer.vat_number))
            .row("FCA Number", or_na(&dealer.fca_number));

        let vehicle_section = Section::new("2. Vehicle Details")
            .row("Registration", vehicle.registration.as_str())
            .row("VIN", vehicle.vin.as_str())
            .row("Make", vehicle.make.as_str())
            .row("Model", vehicle.model.as_str())
            .row("Mileage at Sale", miles(&vehicle.mileage_at_sale))
            .row("Sale Price", pounds(&vehicle.sale_price))
            .row("Date of Sale", vehicle.date_of_sale.as_str())
            .row("Agreed Delivery Date", vehicle.agreed_delivery_date.as_str());

        let pre_sale_section = Section::new("3. Pre-Sale Condition Declaration")
            .check("Vehicle physically inspected prior to sale", pre.vehicle_inspected)
            .check("All known mechanical defects disclosed to customer", pre.known_defects_disclosed)
            .check("Cosmetic imperfections disclosed to customer", pre.cosmetic_imperfections_disclosed)
            .check("Warning light status declared to customer", pre.warning_lights_declared)
            .check("Service history status explained to customer", pre.service_history_explained)
            .check(
                "Finance settlement status confirmed (clear or disclosed)",
                pre.finance_clear_confirmed,
            )
            .paragraph("Additional Disclosures", &pre.additional_disclosures)
            .row("Inspection Timestamp", pre.inspection_timestamp.as_str())
            .row("Authorised By", pre.dealer_signature.as_str());

        let terms_section = Section::new("4. Consumer Rights Act 2015: Summary Presented to Customer")
            .paragraph("Satisfactory Quality", CRA_SATISFACTORY_QUALITY)
            .paragraph("30-Day Right to Reject", CRA_RIGHT_TO_REJECT)
            .paragraph("Repair or Replace", CRA_REPAIR_OR_REPLACE)
            .paragraph("Wear & Tear", CRA_WEAR_AND_TEAR)
            .paragraph("Fault Reporting", CRA_FAULT_REPORTING)
            .check(
                "Dealer confirms the above CRA 2015 summary has been presented and discussed with the customer",
                self.terms.terms_presented,
            );

        let cooling_section = Section::new("5. 14-Day Cooling-Off Confirmation")
            .row("Cooling-Off Period Start Date", cooling.cooling_off_start_date.as_str())
            .check("Confirmed as a distance sale", cooling.is_distance_sale)
            .check(
                "Customer informed of 14-day cancellation right (Consumer Contracts Regulations 2013)",
                cooling.customer_informed_of_14_days,
            )
            .check("Return condition expectations explained", cooling.return_condition_explained)
            .check(
                "Return process and transport cost responsibility explained",
                cooling.return_process_explained,
            )
            .check(
                "Customer confirms they understand their cooling-off rights",
                cooling.customer_acknowledges_cooling_off,
            );

        let signed = if delivery.customer_signature.trim().is_empty() {
            String::new()
        } else if delivery.signature_timestamp.trim().is_empty() {
            "Signed".to_string()
        } else {
            format!("Signed {}", delivery.signature_timestamp)
        };
        let delivery_section = Section::new("6. Delivery Condition Sign-Off")
            .row("Delivery Date", delivery.delivery_date.as_str())
            .row("Delivery Mileage", miles(&delivery.delivery_mileage))
            .row("Delivered By", delivery.delivered_by.label())
            .row("Driver / Company Name", delivery.delivered_by_name.as_str())
            .check(
                "Customer confirms vehicle received in agreed condition as described prior to sale",
                delivery.customer_confirms_condition,
            )
            .row("Customer Signature", signed);

        let refund_section = Section::new("7. Refund Policy Acknowledgement")
            .check(
                "Refund timelines understood (14 days from return of vehicle)",
                refund.refund_timelines_understood,
            )
            .check(
                "Repair-first approach agreed after 30-day rejection period",
                refund.repair_first_approach_agreed,
            )
            .check(
                "Agrees to allow dealer inspection and diagnostics before remedy",
                refund.diagnostics_agreed,
            )
            .check(
                "Independent third-party inspection process understood",
                refund.third_party_inspection_agreed,
            )
            .check("Return transport cost policy understood", refund.transport_cost_policy_understood)
            .check(
                "Customer confirms they have read and understood all refund and return policies",
                refund.confirmed,
            );

        let business = if dealer.business_name.trim().is_empty() {
            "Dealer"
        } else {
            dealer.business_name.as_str()
        };

        Document::new("Distance Sale Pack", self.pack_id.as_str(), iso_date(today))
            .subtitle(format!("{business} · Consumer Rights Act 2015 & Consumer Contracts Regulations 2013"))
            .section(dealer_section)
            .section(vehicle_section)
            .section(pre_sale_section)
            .section(terms_section)
            .section(cooling_section)
            .section(delivery_section)
            .section(refund_section)
            .footer(format!(
                "AutoProv Digital Distance Sale Pack · {} · Generated {}\n\
                 This document forms part of the dealer's compliance audit trail.",
                self.pack_id,
                iso_date(today)
            ))
    }

    /// Dated by the sale rather than the print date when one is recorded.
    fn export_filename(&self, today: NaiveDate) -> String {
        let date = match self.vehicle.date_of_sale.trim() {
            "" => iso_date(today),
            d => d.to_string(),
        };
        suggested_filename("Distance_Sale_Pack", &self.vehicle.registration, "UNKNOWN", &date)
    }
}

const CRA_SATISFACTORY_QUALITY: &str = "The vehicle must be of satisfactory quality having regard to its age, mileage, and price. The customer is entitled to expect it to be free from minor defects, safe, and durable.";
const CRA_RIGHT_TO_REJECT: &str = "Within 30 days of purchase, if the vehicle is found to have a fault present at time of sale, the customer may be entitled to a full refund subject to fair usage.";
const CRA_REPAIR_OR_REPLACE: &str = "After 30 days and within 6 months, the dealer has the right to attempt one repair before a price reduction or final rejection may apply.";
const CRA_WEAR_AND_TEAR: &str = "Normal wear and tear is not covered. Consumable items (tyres, brakes, wipers, clutch) are excluded unless defective at time of sale.";
const CRA_FAULT_REPORTING: &str = "Faults must be reported promptly and in writing. No third-party repairs without prior written dealer consent.";

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn draft() -> DistanceSaleDraft {
        DistanceSaleDraft::fresh_at(Utc::now(), today())
    }

    fn apply_all(d: DistanceSaleDraft, changes: &[(&str, &str, FieldValue)]) -> DistanceSaleDraft {
        changes.iter().fold(d, |d, (section, field, value)| {
            d.apply(&FieldChange::new(*section, *field, value.clone())).unwrap()
        })
    }

    #[test]
    fn fresh_pack_defaults() {
        let d = draft();
        assert!(d.pack_id.starts_with("DSS-20261019-"));
        assert!(d.cooling_off.is_distance_sale);
        assert_eq!(d.delivery.delivered_by, DeliveredBy::Unset);
    }

    #[test]
    fn pre_sale_declarations_are_one_violation() {
        let d = apply_all(
            draft(),
            &[
                ("preSale", "vehicleInspected", true.into()),
                ("preSale", "dealerSignature", "J. Smith".into()),
            ],
        );
        assert_eq!(
            validate_step(DistanceSaleStep::PreSale, &d),
            vec!["All mandatory pre-sale declarations must be confirmed"]
        );
    }

    #[test]
    fn finance_clear_is_not_mandatory() {
        let d = apply_all(
            draft(),
            &[
                ("preSale", "vehicleInspected", true.into()),
                ("preSale", "knownDefectsDisclosed", true.into()),
                ("preSale", "cosmeticImperfectionsDisclosed", true.into()),
                ("preSale", "warningLightsDeclared", true.into()),
                ("preSale", "serviceHistoryExplained", true.into()),
                ("preSale", "dealerSignature", "J. Smith".into()),
            ],
        );
        assert!(validate_step(DistanceSaleStep::PreSale, &d).is_empty());
    }

    #[test]
    fn delivery_rules_in_order() {
        let d = apply_all(
            draft(),
            &[
                ("vehicle", "mileageAtSale", "32,000".into()),
                ("delivery", "deliveryMileage", "31,990".into()),
            ],
        );
        assert_eq!(
            validate_step(DistanceSaleStep::Delivery, &d),
            vec![
                "Delivery date is required",
                "Delivered by must be selected",
                "Customer condition confirmation is required",
                "Delivery Mileage cannot be lower than Mileage at Sale",
            ]
        );
    }

    #[test]
    fn delivered_by_accepts_display_names() {
        let d = apply_all(draft(), &[("delivery", "deliveredBy", "Third Party".into())]);
        assert_eq!(d.delivery.delivered_by, DeliveredBy::ThirdParty);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["delivery"]["deliveredBy"], "Third Party");
        assert_eq!(json["coolingOff"]["customerInformedOf14Days"], false);
    }

    #[test]
    fn terms_section_has_one_field() {
        let d = draft();
        assert!(matches!(
            d.apply(&FieldChange::new("terms", "termsAccepted", true)),
            Err(FieldError::UnknownField { .. })
        ));
        let d = d.apply(&FieldChange::new("terms", "termsPresented", "yes")).unwrap();
        assert!(validate_step(DistanceSaleStep::Terms, &d).is_empty());
    }

    #[test]
    fn flags_reject_free_text() {
        assert!(matches!(
            draft().apply(&FieldChange::new("refundPolicy", "confirmed", "maybe")),
            Err(FieldError::KindMismatch { .. })
        ));
    }

    #[test]
    fn filename_prefers_date_of_sale() {
        let d = apply_all(
            draft(),
            &[
                ("vehicle", "registration", "XY70 ZZZ".into()),
                ("vehicle", "dateOfSale", "2026-10-02".into()),
            ],
        );
        assert_eq!(d.export_filename(today()), "Distance_Sale_Pack_XY70ZZZ_2026-10-02");
        assert_eq!(draft().export_filename(today()), "Distance_Sale_Pack_UNKNOWN_2026-10-19");
    }

    #[test]
    fn document_formats_vehicle_rows() {
        let d = apply_all(
            draft(),
            &[
                ("vehicle", "mileageAtSale", "32000".into()),
                ("vehicle", "salePrice", "12495".into()),
            ],
        );
        let doc = d.document(today());
        assert_eq!(doc.sections.len(), 7);
        let vehicle = doc.find("2. Vehicle Details").unwrap();
        assert_eq!(vehicle.value("Mileage at Sale"), Some("32,000 miles"));
        assert_eq!(vehicle.value("Sale Price"), Some("£12495"));
        assert_eq!(doc.find("1. Dealer Details").unwrap().value("VAT Number"), Some("N/A"));
    }
}
