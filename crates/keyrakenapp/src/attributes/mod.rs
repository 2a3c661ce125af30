//! # Attribute System
//!
//! Items in the secret service are found by their attributes: flat string maps such as
//! `{"username": "u", "site": "mail"}`. This module holds everything keyraken does with
//! those maps before they reach the backend:
//!
//! - **Parsing**: user JSON into [`Attributes`](crate::model::Attributes), refusing
//!   anything that is not a plain string value
//! - **Filtering**: AND/OR combination of attribute, label and path constraints
//! - **Selection**: applying a filter to a collection with cardinality rules
//!
//! ## Usage
//!
//! ```ignore
//! let attrs = parse_attribute_map(r#"{"username":"u"}"#, MapRole::Filter)?;
//! let filter = Filter::new(attrs).with_logic(Logic::Or);
//! let matches = select(&backend, &collection, &filter, true)?;
//! ```

mod filter;
mod value;

pub use filter::{select, Filter, Logic, MatchSet, MatchedItem};
pub use value::{parse_attribute_map, MapRole};
