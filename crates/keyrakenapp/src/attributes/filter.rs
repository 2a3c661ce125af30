//! Attribute filtering.
//!
//! A [`Filter`] is a set of exact-equality constraints combined with AND or OR:
//!
//! - one constraint per `(key, value)` pair in the attribute map,
//! - one for the label, if given,
//! - one for the item path, if given.
//!
//! `AND` needs every constraint to hold, `OR` needs at least one. A filter with no
//! constraints matches everything, which is how `list` enumerates a collection.
//!
//! ## Backend search
//!
//! The secret service can only search by exact attribute match, ANDed. Handing it an
//! OR query would quietly turn it into an AND, so [`select`] only pushes the attribute
//! map down under `AND`. Under `OR` (or with no attribute constraints) it enumerates the
//! collection and evaluates everything locally. Either way the full predicate is
//! re-checked on every candidate.

use crate::error::{KeyrakenError, Result};
use crate::model::{Attributes, CollectionRef, ItemRef};
use crate::store::SecretBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// How constraints are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl FromStr for Logic {
    type Err = KeyrakenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            _ => Err(KeyrakenError::InvalidFilter(format!(
                "Unknown logic \"{}\", expected AND or OR",
                s
            ))),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

/// Selection criteria for items in a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub attributes: Attributes,
    pub label: Option<String>,
    pub path: Option<String>,
    pub logic: Logic,
}

impl Filter {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Filter without constraints. Matches every item.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = logic;
        self
    }

    pub fn constraint_count(&self) -> usize {
        self.attributes.len() + usize::from(self.label.is_some()) + usize::from(self.path.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.constraint_count() == 0
    }

    /// Evaluate the filter against an item's metadata.
    pub fn matches(&self, label: &str, path: &str, attributes: &Attributes) -> bool {
        if self.is_empty() {
            return true;
        }

        let attr_hits = self
            .attributes
            .iter()
            .map(|(k, v)| attributes.get(k) == Some(v));
        let label_hit = self.label.as_ref().map(|l| l == label);
        let path_hit = self.path.as_ref().map(|p| p == path);
        let mut results = attr_hits.chain(label_hit).chain(path_hit);

        match self.logic {
            Logic::And => results.all(|hit| hit),
            Logic::Or => results.any(|hit| hit),
        }
    }

    /// The part of the filter the backend can evaluate itself.
    fn backend_query(&self) -> Attributes {
        match self.logic {
            Logic::And => self.attributes.clone(),
            Logic::Or => Attributes::new(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = serde_json::to_string(&self.attributes).map_err(|_| fmt::Error)?;
        write!(f, "attributes={}", attrs)?;
        if let Some(label) = &self.label {
            write!(f, " label=\"{}\"", label)?;
        }
        if let Some(path) = &self.path {
            write!(f, " path=\"{}\"", path)?;
        }
        write!(f, " logic={}", self.logic)
    }
}

/// An item selected by a filter, with the metadata the filter looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedItem {
    pub item: ItemRef,
    pub label: String,
    pub attributes: Attributes,
}

/// Matched items in backend enumeration order.
pub type MatchSet = Vec<MatchedItem>;

/// Apply `filter` to the items of `collection`.
///
/// With `multiple == false` exactly one match is required: none is `NotFound`, more than
/// one is `AmbiguousSelection`. With `multiple == true` every match is returned and an
/// empty result is fine.
pub fn select<B: SecretBackend>(
    backend: &B,
    collection: &CollectionRef,
    filter: &Filter,
    multiple: bool,
) -> Result<MatchSet> {
    let query = filter.backend_query();
    let candidates = backend.search_items(collection, &query)?;

    let mut matches = MatchSet::new();
    for item in candidates {
        let label = backend.get_label(&item)?;
        let attributes = backend.get_attributes(&item)?;
        if filter.matches(&label, &item.path, &attributes) {
            matches.push(MatchedItem {
                item,
                label,
                attributes,
            });
        }
    }

    debug!(
        collection = %collection.label,
        filter = %filter,
        matched = matches.len(),
        "selected items"
    );

    if multiple {
        return Ok(matches);
    }

    match matches.len() {
        0 => Err(KeyrakenError::NotFound(format!(
            "No item in collection '{}' matches {}",
            collection.label, filter
        ))),
        1 => Ok(matches),
        count => Err(KeyrakenError::AmbiguousSelection {
            count,
            filter: filter.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn seeded() -> (MemBackend, CollectionRef) {
        let backend = MemBackend::new();
        let col = backend.add_collection("login", false);
        backend
            .create_item(&col, "mail", &attrs(&[("user", "u"), ("site", "mail")]), b"1")
            .unwrap();
        backend
            .create_item(&col, "chat", &attrs(&[("user", "u"), ("site", "chat")]), b"2")
            .unwrap();
        backend
            .create_item(&col, "bank", &attrs(&[("user", "v"), ("site", "bank")]), b"3")
            .unwrap();
        (backend, col)
    }

    fn labels(matches: &MatchSet) -> Vec<&str> {
        matches.iter().map(|m| m.label.as_str()).collect()
    }

    #[test]
    fn logic_parses_case_insensitively() {
        assert_eq!("AND".parse::<Logic>().unwrap(), Logic::And);
        assert_eq!("or".parse::<Logic>().unwrap(), Logic::Or);
        assert!(matches!(
            "XOR".parse::<Logic>(),
            Err(KeyrakenError::InvalidFilter(_))
        ));
    }

    #[test]
    fn empty_filter_matches_everything_in_order() {
        let (backend, col) = seeded();
        let matches = select(&backend, &col, &Filter::all(), true).unwrap();
        assert_eq!(labels(&matches), vec!["mail", "chat", "bank"]);

        let or_all = select(&backend, &col, &Filter::all().with_logic(Logic::Or), true).unwrap();
        assert_eq!(or_all.len(), 3);
    }

    #[test]
    fn and_requires_every_constraint() {
        let (backend, col) = seeded();
        let filter = Filter::new(attrs(&[("user", "u"), ("site", "chat")]));
        let matches = select(&backend, &col, &filter, true).unwrap();
        assert_eq!(labels(&matches), vec!["chat"]);

        let filter = Filter::new(attrs(&[("user", "u")])).with_label("bank");
        assert!(select(&backend, &col, &filter, true).unwrap().is_empty());
    }

    #[test]
    fn or_requires_any_constraint() {
        let (backend, col) = seeded();
        let filter = Filter::new(attrs(&[("site", "mail")]))
            .with_label("bank")
            .with_logic(Logic::Or);
        let matches = select(&backend, &col, &filter, true).unwrap();
        assert_eq!(labels(&matches), vec!["mail", "bank"]);
    }

    #[test]
    fn and_match_is_also_an_or_match_on_any_single_key() {
        let (backend, col) = seeded();
        let full = attrs(&[("user", "u"), ("site", "mail")]);
        let and_matches = select(&backend, &col, &Filter::new(full.clone()), true).unwrap();
        assert_eq!(and_matches.len(), 1);

        for (k, v) in &full {
            let single = attrs(&[(k.as_str(), v.as_str())]);
            let or_matches =
                select(&backend, &col, &Filter::new(single).with_logic(Logic::Or), true).unwrap();
            assert!(or_matches.iter().any(|m| m.item == and_matches[0].item));
        }
    }

    #[test]
    fn path_constraint_selects_one_item() {
        let (backend, col) = seeded();
        let all = select(&backend, &col, &Filter::all(), true).unwrap();
        let target = all[1].item.path.clone();

        let matches = select(&backend, &col, &Filter::all().with_path(target), false).unwrap();
        assert_eq!(labels(&matches), vec!["chat"]);
    }

    #[test]
    fn single_selection_cardinality() {
        let (backend, col) = seeded();

        let none = select(&backend, &col, &Filter::new(attrs(&[("user", "z")])), false);
        assert!(matches!(none, Err(KeyrakenError::NotFound(_))));

        let many = select(&backend, &col, &Filter::new(attrs(&[("user", "u")])), false);
        match many {
            Err(KeyrakenError::AmbiguousSelection { count, .. }) => assert_eq!(count, 2),
            other => panic!("Expected AmbiguousSelection, got {:?}", other),
        }

        let one = select(&backend, &col, &Filter::new(attrs(&[("user", "v")])), false).unwrap();
        assert_eq!(labels(&one), vec!["bank"]);
    }

    #[test]
    fn multiple_with_no_match_is_empty_not_error() {
        let (backend, col) = seeded();
        let matches = select(&backend, &col, &Filter::new(attrs(&[("user", "z")])), true).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn or_is_never_pushed_down_to_backend() {
        let (backend, col) = seeded();
        let filter = Filter::new(attrs(&[("user", "v"), ("site", "mail")])).with_logic(Logic::Or);
        let matches = select(&backend, &col, &filter, true).unwrap();
        assert_eq!(labels(&matches), vec!["mail", "bank"]);

        let and_filter = Filter::new(attrs(&[("user", "v")]));
        select(&backend, &col, &and_filter, true).unwrap();

        let log = backend.search_log();
        assert!(log[0].is_empty());
        assert_eq!(log[1], attrs(&[("user", "v")]));
    }

    #[test]
    fn display_includes_every_constraint() {
        let filter = Filter::new(attrs(&[("user", "u")]))
            .with_label("mail")
            .with_logic(Logic::Or);
        let text = filter.to_string();
        assert!(text.contains(r#"{"user":"u"}"#));
        assert!(text.contains("label=\"mail\""));
        assert!(text.contains("logic=OR"));
    }
}
