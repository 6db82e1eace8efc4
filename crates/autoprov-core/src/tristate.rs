use std::fmt;

use serde::{Deserialize, Serialize};

/// A yes/no answer that may not have been given yet.
///
/// Serialized as JSON `true`, `false` or `null`. "Not yet answered" is kept
/// distinct from "no" because only the former is a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TriState {
    #[default]
    Unset,
    Yes,
    No,
}

impl TriState {
    pub fn is_answered(self) -> bool {
        self != Self::Unset
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }

    /// Parse a user-typed answer. Returns `None` for anything unrecognised.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(Self::Yes),
            "no" | "n" | "false" => Some(Self::No),
            "" | "unset" | "unknown" | "null" => Some(Self::Unset),
            _ => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(v: Option<bool>) -> Self {
        match v {
            None => Self::Unset,
            Some(true) => Self::Yes,
            Some(false) => Self::No,
        }
    }
}

impl From<TriState> for Option<bool> {
    fn from(v: TriState) -> Self {
        v.as_bool()
    }
}

impl From<bool> for TriState {
    fn from(v: bool) -> Self {
        if v { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unset => "—",
            Self::Yes => "Yes",
            Self::No => "No",
        })
    }
}
