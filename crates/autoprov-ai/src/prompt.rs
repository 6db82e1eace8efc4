//! Prompts for the chat-completions gateway.

use autoprov_core::TriState;
use autoprov_core::dispute::Evidence;

use crate::DisputeRequest;

// ── Prompt templates ──

pub const SYSTEM_PROMPT: &str = "\
You are a senior UK automotive compliance advisor specialising in consumer law for used vehicle sales.
You write structured, calm, legally compliant dispute responses for UK used car dealers, written as the dealer.
You are not a lawyer and must not present yourself as one. Do not mention AI or software.

Follow the Consumer Rights Act 2015, the Consumer Contracts Regulations 2013, FCA principles where \
finance is involved, and UK motor trade practice.

Never: use aggressive, dismissive or emotional language; say \"sold as seen\" or \"no refunds\"; deny \
statutory rights; admit liability or promise a refund or repair before inspection; suggest waiving \
consumer rights; criticise the customer; cite case law; threaten legal action.

LEGAL POSITION BY TIMELINE
- Under 30 days: the short-term right to reject may apply. The dealer is entitled to inspect first. \
Neither accept nor deny rejection; emphasise inspection before resolution.
- 30 days to 6 months: the dealer may repair or replace first, with one reasonable opportunity to \
repair. A fault is presumed to have existed at sale unless shown otherwise.
- Over 6 months: the burden of proof shifts to the customer; independent evidence may be required. \
Offer inspection before a decision.
The timeline, CRA position and burden of proof must appear in internalSummary, never argued in the email.

DISTANCE SALES: reference the 14-day cooling-off right and keep cancellation separate from a \
fault-based claim. If the window has expired, say so neutrally.
NOT AS DESCRIBED: refer to the advert and disclosures and propose comparing the evidence.
FINANCE: acknowledge the finance provider may be contacted; never blame the finance company.
Every response proposes a structured inspection with a clear next step and a booking timeframe \
(for example 48 hours).

RISK LEVEL
- high: rejection claim under 30 days, finance with an early complaint, no signed PDI or documentation, \
distance sale without a pack, customer refusing inspection, vehicle not drivable.
- moderate: mechanical fault between 30 and 180 days, partial documentation, vehicle usable but fault claimed.
- low: cosmetic complaint, over 6 months, strong documentation, vehicle drivable.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"emailResponse\": \"full structured email: acknowledgement, legal posture for the timeline, inspection proposal, next step with timeframe, calm closing\",
  \"smsVersion\": \"short SMS, at most 160 characters: acknowledgement, inspection proposal, next step\",
  \"internalSummary\": \"bullet points for dealer eyes only: timeline, CRA position, burden of proof, risk factors, documentation strength, recommended posture\",
  \"riskLevel\": \"low\" | \"moderate\" | \"high\",
  \"suggestedNextSteps\": [\"step 1\", \"step 2\", \"step 3\", \"step 4\"]
}";

fn yes_no_unknown(t: TriState) -> &'static str {
    match t {
        TriState::Yes => "Yes",
        TriState::No => "No",
        TriState::Unset => "Unknown",
    }
}

/// Only an explicit yes counts.
fn yes_no(t: TriState) -> &'static str {
    if t == TriState::Yes { "Yes" } else { "No" }
}

fn or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() { fallback } else { s }
}

/// Evidence the dealer holds, as a `; `-separated list.
pub fn evidence_summary(evidence: &Evidence) -> String {
    let items = [
        (evidence.signed_pdi_available, "Signed PDI is available"),
        (evidence.distance_sale_pack_completed, "Distance Sale Pack has been completed"),
        (evidence.provenance_report_provided, "Provenance report was provided"),
        (evidence.service_history_disclosed, "Service history was disclosed to the customer"),
        (evidence.fault_inspection_report_available, "Fault inspection report is available"),
        (evidence.independent_inspection_requested, "Independent inspection has been requested"),
        (evidence.customer_refused_inspection, "Customer has refused inspection"),
    ];
    items
        .iter()
        .filter(|(held, _)| *held)
        .map(|(_, text)| *text)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn build_user_prompt(req: &DisputeRequest) -> String {
    let complaint = req.complaint_type.key().replace('-', " ").to_uppercase();
    let evidence = evidence_summary(&req.evidence);
    format!(
        "Generate a dispute response for the following case:\n\
         \n\
         VEHICLE: {reg} | Sale Price: £{price} | Mileage at Sale: {mileage}\n\
         SALE DATE: {sale_date} | Days Since Sale: {days}\n\
         DISTANCE SALE: {distance} | WARRANTY PROVIDED: {warranty} | FINANCE INVOLVED: {finance}\n\
         \n\
         COMPLAINT TYPE: {complaint}\n\
         CUSTOMER'S COMPLAINT: \"{text}\"\n\
         \n\
         USAGE SINCE SALE: {since} miles | Current Mileage: {current}\n\
         VEHICLE DRIVABLE: {drivable}\n\
         REPAIR ATTEMPTED: {repair}\n\
         \n\
         LEGAL TIMELINE: {timeline}\n\
         \n\
         EVIDENCE AVAILABLE: {evidence}\n\
         \n\
         Apply the legal posture for this timeline. The email response must acknowledge the \
         customer's contact, state the rights that apply at this point, propose an inspection, \
         stay calm and professional, and give the customer a clear next step.",
        reg = or(&req.vehicle_registration, "Not specified"),
        price = or(&req.sale_price, "N/A"),
        mileage = or(&req.mileage_at_sale, "N/A"),
        sale_date = or(&req.sale_date, "N/A"),
        days = req.days_since_sale,
        distance = yes_no(req.distance_sale),
        warranty = yes_no(req.warranty_provided),
        finance = yes_no(req.finance_involved),
        text = or(&req.customer_complaint_text, "Not provided"),
        since = req.mileage_since_sale,
        current = or(&req.current_mileage, "N/A"),
        drivable = yes_no_unknown(req.vehicle_drivable),
        repair = yes_no_unknown(req.repair_attempted),
        timeline = req.legal_timeline.legal_position(),
        evidence = or(&evidence, "None recorded"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprov_core::dispute::ComplaintType;
    use autoprov_core::Timeline;

    fn request() -> DisputeRequest {
        DisputeRequest {
            vehicle_registration: "AB12 CDE".into(),
            sale_date: "2026-09-09".into(),
            sale_price: "8995".into(),
            distance_sale: TriState::Yes,
            warranty_provided: TriState::No,
            finance_involved: TriState::Unset,
            mileage_at_sale: "45,000".into(),
            complaint_type: ComplaintType::RejectionUnder30,
            customer_complaint_text: "Gearbox whines in third".into(),
            days_since_sale: 40,
            current_mileage: "45,650".into(),
            mileage_since_sale: 650,
            vehicle_drivable: TriState::Unset,
            repair_attempted: TriState::No,
            legal_timeline: Timeline::ThirtyDaysToSixMonths,
            evidence: Evidence::default(),
        }
    }

    #[test]
    fn user_prompt_lists_case_facts() {
        let prompt = build_user_prompt(&request());
        assert!(prompt.contains("VEHICLE: AB12 CDE | Sale Price: £8995"));
        assert!(prompt.contains("COMPLAINT TYPE: REJECTION UNDER 30"));
        assert!(prompt.contains("DISTANCE SALE: Yes | WARRANTY PROVIDED: No | FINANCE INVOLVED: No"));
        assert!(prompt.contains("VEHICLE DRIVABLE: Unknown"));
        assert!(prompt.contains("REPAIR ATTEMPTED: No"));
        assert!(prompt.contains("LEGAL TIMELINE: 30 days to 6 months"));
        assert!(prompt.contains("EVIDENCE AVAILABLE: None recorded"));
    }

    #[test]
    fn evidence_joins_held_items() {
        let evidence = Evidence {
            signed_pdi_available: true,
            customer_refused_inspection: true,
            ..Evidence::default()
        };
        assert_eq!(
            evidence_summary(&evidence),
            "Signed PDI is available; Customer has refused inspection"
        );
    }

    #[test]
    fn system_prompt_demands_json() {
        assert!(SYSTEM_PROMPT.contains("\"riskLevel\""));
        assert!(SYSTEM_PROMPT.contains("Respond ONLY with a JSON object"));
    }
}
