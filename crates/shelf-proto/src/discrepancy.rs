use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// No detection landed in the item's cell.
    Missing { planogram_item_id: String },
    /// A detection outside every cell.
    Overstock { detection_id: String },
    /// The detection in the cell looks like a different product. Best effort only.
    Misplaced { planogram_item_id: String, detection_id: String },
}

/// A mismatch between the expected layout and one detection snapshot.
///
/// `id` is the position in the result list, so it is unique within one
/// comparison and stable across repeated comparisons of the same input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub id: u32,
    #[serde(flatten)]
    pub kind: DiscrepancyKind,
}

impl Discrepancy {
    pub fn planogram_item_id(&self) -> Option<&str> {
        match &self.kind {
            DiscrepancyKind::Missing { planogram_item_id }
            | DiscrepancyKind::Misplaced { planogram_item_id, .. } => Some(planogram_item_id),
            DiscrepancyKind::Overstock { .. } => None,
        }
    }

    pub fn detection_id(&self) -> Option<&str> {
        match &self.kind {
            DiscrepancyKind::Overstock { detection_id }
            | DiscrepancyKind::Misplaced { detection_id, .. } => Some(detection_id),
            DiscrepancyKind::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, DiscrepancyKind::Missing { .. })
    }

    pub fn is_overstock(&self) -> bool {
        matches!(self.kind, DiscrepancyKind::Overstock { .. })
    }

    pub fn is_misplaced(&self) -> bool {
        matches!(self.kind, DiscrepancyKind::Misplaced { .. })
    }
}
