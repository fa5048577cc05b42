//! Planogram compliance: compare an expected shelf layout with one
//! detection snapshot and report what is missing, misplaced or overstocked.

mod compare;
pub mod doctor;
pub mod error;
pub mod geometry;
pub mod policy;
pub mod summary;

pub use compare::{compare, Comparator, InvalidItemPolicy};
pub use error::CompareError;
pub use geometry::{CellRect, ShelfLayout};
pub use policy::{CategoryMismatch, LabelMismatch, MisplacementPolicy};
pub use summary::Summary;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MisplacementMode {
    /// Detector label compared with the product id string.
    #[default]
    Label,
    /// Detector label compared with the product's catalog category.
    Category,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareConfig {
    #[serde(default)]
    pub invalid_items: InvalidItemPolicy,
    #[serde(default)]
    pub misplacement: MisplacementMode,
}
