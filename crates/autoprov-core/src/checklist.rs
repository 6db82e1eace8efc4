//! Checklists keyed by a closed, enumerated set of items.
//!
//! Keys are enum variants, so a misspelt key cannot silently produce an
//! always-unchecked item: construction from strings and deserialization both
//! reject unknown keys.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::field::{FieldError, unknown_field};

/// An item of a closed checklist.
pub trait CheckItem: Copy + Ord + Serialize + DeserializeOwned + 'static {
    const ALL: &'static [Self];

    /// Stable key used in field paths and persisted JSON.
    fn key(self) -> &'static str;

    /// Human-facing wording.
    fn label(self) -> &'static str;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound(serialize = "", deserialize = ""))]
pub struct Checklist<K: CheckItem> {
    items: BTreeMap<K, bool>,
}

impl<K: CheckItem> Default for Checklist<K> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<K: CheckItem> Checklist<K> {
    /// Build from `(key, checked)` pairs, rejecting keys outside the item set.
    pub fn from_pairs<'a>(
        section: &str,
        pairs: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Result<Self, FieldError> {
        let mut list = Self::default();
        for (key, checked) in pairs {
            let item = K::from_key(key).ok_or_else(|| unknown_field(section, key))?;
            list.set(item, checked);
        }
        Ok(list)
    }

    pub fn is_checked(&self, item: K) -> bool {
        self.items.get(&item).copied().unwrap_or(false)
    }

    pub fn set(&mut self, item: K, checked: bool) {
        self.items.insert(item, checked);
    }

    pub fn toggle(&mut self, item: K) {
        let checked = self.is_checked(item);
        self.set(item, !checked);
    }

    pub fn all_checked(&self) -> bool {
        K::ALL.iter().all(|i| self.is_checked(*i))
    }

    /// Items in declaration order with their state.
    pub fn iter(&self) -> impl Iterator<Item = (K, bool)> + '_ {
        K::ALL.iter().map(|i| (*i, self.is_checked(*i)))
    }

    pub(crate) fn set_by_key(
        &mut self,
        section: &str,
        key: &str,
        checked: bool,
    ) -> Result<(), FieldError> {
        let item = K::from_key(key).ok_or_else(|| unknown_field(section, key))?;
        self.set(item, checked);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    enum Light {
        Brake,
        Indicator,
    }

    impl CheckItem for Light {
        const ALL: &'static [Self] = &[Self::Brake, Self::Indicator];

        fn key(self) -> &'static str {
            match self {
                Self::Brake => "brake",
                Self::Indicator => "indicator",
            }
        }

        fn label(self) -> &'static str {
            match self {
                Self::Brake => "Brake lights working",
                Self::Indicator => "Indicators working",
            }
        }
    }

    #[test]
    fn unset_items_are_unchecked() {
        let list = Checklist::<Light>::default();
        assert!(!list.is_checked(Light::Brake));
        assert!(!list.all_checked());
    }

    #[test]
    fn toggle_flips_state() {
        let mut list = Checklist::<Light>::default();
        list.toggle(Light::Brake);
        assert!(list.is_checked(Light::Brake));
        list.toggle(Light::Brake);
        assert!(!list.is_checked(Light::Brake));
    }

    #[test]
    fn from_pairs_rejects_typo() {
        let err = Checklist::<Light>::from_pairs("lights", [("brake", true), ("indicatr", true)])
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownField {
                section: "lights".into(),
                field: "indicatr".into()
            }
        );
    }

    #[test]
    fn deserialize_rejects_unknown_key() {
        let ok: Checklist<Light> = serde_json::from_str(r#"{"brake": true}"#).unwrap();
        assert!(ok.is_checked(Light::Brake));
        assert!(serde_json::from_str::<Checklist<Light>>(r#"{"brakes": true}"#).is_err());
    }

    #[test]
    fn serializes_as_a_plain_key_map() {
        let list = Checklist::<Light>::from_pairs("lights", [("indicator", true)]).unwrap();
        let text = serde_json::to_string(&list).unwrap();
        assert_eq!(text, r#"{"indicator":true}"#);
        let back: Checklist<Light> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn iter_follows_declaration_order() {
        let list = Checklist::<Light>::from_pairs("lights", [("indicator", true)]).unwrap();
        let items: Vec<(Light, bool)> = list.iter().collect();
        assert_eq!(items, vec![(Light::Brake, false), (Light::Indicator, true)]);
    }
}
