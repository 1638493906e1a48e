//! # feeddiff
//!
//! Structural inspection and comparison of JSON payloads returned by
//! feed-aggregation APIs.
//!
//! Two entry points:
//!
//! - [`compare`] walks two parsed payloads and reports every structural
//!   and value discrepancy as a sequence of [`Diff`] records;
//! - [`describe`] projects one payload into a flat structure report of
//!   [`FieldSummary`] rows.
//!
//! Both are pure functions over [`serde_json::Value`] trees; reading and
//! parsing input is the caller's business. [`salvage::first_object`] is a
//! degraded-mode fallback for captures that fail to parse outright.
//!
//! ```
//! use serde_json::json;
//!
//! let left = json!({"feedTitle": "X", "lang": "en"});
//! let right = json!({"feedTitle": "Y"});
//! let diffs = feeddiff::compare(&left, &right, &Default::default());
//! assert_eq!(diffs.len(), 2);
//! assert_eq!(
//!     diffs[1].to_string(),
//!     "value difference at feedTitle: 'X' vs 'Y'",
//! );
//! ```
mod describe;
mod diff;
mod paths;
pub mod salvage;
mod types;

pub use describe::{describe, FieldSummary};
pub use diff::{compare, compare_at, ComparisonConfig, Diff, DiffKind};
pub use paths::{Location, LocationSegment, PathParseError};
pub use types::JsonType;
