//! Shared data model for planograms, detections and comparison output.

pub mod detection;
pub mod discrepancy;
pub mod planogram;
pub mod product;

pub use detection::{Detection, NormRect};
pub use discrepancy::{Discrepancy, DiscrepancyKind};
pub use planogram::{Planogram, PlanogramItem};
pub use product::Product;
