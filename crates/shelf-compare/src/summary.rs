use serde::Serialize;
use shelf_proto::{Detection, Discrepancy, PlanogramItem};

/// Counts for one comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub items: usize,
    pub detections: usize,
    /// Items with no discrepancy.
    pub matched: usize,
    pub missing: usize,
    pub misplaced: usize,
    pub overstock: usize,
}

impl Summary {
    pub fn of(items: &[PlanogramItem], detections: &[Detection], discrepancies: &[Discrepancy]) -> Self {
        let mut s = Summary { items: items.len(), detections: detections.len(), ..Default::default() };
        for d in discrepancies {
            if d.is_missing() {
                s.missing += 1;
            } else if d.is_misplaced() {
                s.misplaced += 1;
            } else {
                s.overstock += 1;
            }
        }
        s.matched = s.items.saturating_sub(s.missing + s.misplaced);
        s
    }

    pub fn is_compliant(&self) -> bool {
        self.missing == 0 && self.misplaced == 0 && self.overstock == 0
    }
}
