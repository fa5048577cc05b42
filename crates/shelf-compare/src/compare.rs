use std::collections::HashSet;

use serde::Deserialize;
use shelf_proto::{Detection, Discrepancy, DiscrepancyKind, Planogram, PlanogramItem};
use tracing::{debug, warn};

use crate::geometry::ShelfLayout;
use crate::policy::{LabelMismatch, MisplacementPolicy};
use crate::CompareError;

/// What to do with an item whose `shelf_index` is not a row of the planogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidItemPolicy {
    /// Skip matching for the item and report it `Missing`.
    #[default]
    ReportMissing,
    /// Fail the whole comparison with `InvalidItem`.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct Comparator<P = LabelMismatch> {
    policy: P,
    invalid_items: InvalidItemPolicy,
}

impl Comparator<LabelMismatch> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: MisplacementPolicy> Comparator<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy, invalid_items: InvalidItemPolicy::default() }
    }

    pub fn invalid_items(mut self, invalid_items: InvalidItemPolicy) -> Self {
        self.invalid_items = invalid_items;
        self
    }

    /// Compare one detection snapshot against the planogram.
    ///
    /// Item discrepancies come first in item order, then `Overstock` in
    /// detection order. Each item is matched to the first detection whose
    /// center is inside its cell; detections already matched by an earlier
    /// item are still candidates, matching only removes them from the
    /// overstock sweep.
    pub fn compare(
        &self,
        planogram: &Planogram,
        items: &[PlanogramItem],
        detections: &[Detection],
    ) -> Result<Vec<Discrepancy>, CompareError> {
        let layout = ShelfLayout::from_planogram(planogram)?;

        if self.invalid_items == InvalidItemPolicy::Reject {
            if let Some(bad) = items.iter().find(|i| !layout.has_shelf(i.shelf_index)) {
                return Err(CompareError::InvalidItem {
                    item_id: bad.id.clone(),
                    shelf_index: bad.shelf_index,
                    shelves_count: layout.shelves(),
                });
            }
        }

        let mut out = Vec::new();
        let mut consumed: HashSet<&str> = HashSet::new();

        for item in items {
            if !layout.has_shelf(item.shelf_index) {
                warn!(
                    "planogram {}: item {} has shelf_index {} outside 0..{}, reporting missing",
                    planogram.id,
                    item.id,
                    item.shelf_index,
                    layout.shelves()
                );
                push(&mut out, DiscrepancyKind::Missing { planogram_item_id: item.id.clone() });
                continue;
            }

            let cell = layout.cell(item);
            let found = detections.iter().find(|d| {
                let (cx, cy) = d.center();
                cell.contains(cx, cy)
            });

            let Some(det) = found else {
                push(&mut out, DiscrepancyKind::Missing { planogram_item_id: item.id.clone() });
                continue;
            };

            consumed.insert(det.id.as_str());
            if let Some(label) = det.label() {
                if self.policy.is_misplaced(label, &item.product_id) {
                    push(
                        &mut out,
                        DiscrepancyKind::Misplaced {
                            planogram_item_id: item.id.clone(),
                            detection_id: det.id.clone(),
                        },
                    );
                }
            }
        }

        for det in detections.iter().filter(|d| !consumed.contains(d.id.as_str())) {
            push(&mut out, DiscrepancyKind::Overstock { detection_id: det.id.clone() });
        }

        debug!(
            "compare: planogram={} items={} detections={} discrepancies={}",
            planogram.id,
            items.len(),
            detections.len(),
            out.len()
        );
        Ok(out)
    }
}

fn push(out: &mut Vec<Discrepancy>, kind: DiscrepancyKind) {
    let id = out.len() as u32;
    out.push(Discrepancy { id, kind });
}

/// [`Comparator::compare`] with the label heuristic and invalid items reported missing.
pub fn compare(
    planogram: &Planogram,
    items: &[PlanogramItem],
    detections: &[Detection],
) -> Result<Vec<Discrepancy>, CompareError> {
    Comparator::new().compare(planogram, items, detections)
}
