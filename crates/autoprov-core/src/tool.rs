/// The three wizard tools. Each owns one persisted draft under a fixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Dispute,
    DistanceSale,
    Pdi,
}

impl Tool {
    pub const ALL: &'static [Tool] = &[Tool::Dispute, Tool::DistanceSale, Tool::Pdi];

    /// Key under which the tool's draft is persisted.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Dispute => "autoprov_dispute_draft",
            Self::DistanceSale => "autoprov_dss_draft",
            Self::Pdi => "autoprov_pdi_draft",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dispute => "Dispute Response Builder",
            Self::DistanceSale => "Distance Sale Pack",
            Self::Pdi => "Pre-Delivery Inspection",
        }
    }

    /// Short prefix of generated draft identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Dispute => "DRB",
            Self::DistanceSale => "DSS",
            Self::Pdi => "PDI",
        }
    }
}
