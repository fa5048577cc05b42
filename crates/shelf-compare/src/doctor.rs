//! Layout sanity checks for input the comparator tolerates but that usually
//! means the planogram was built wrong.

use std::fmt;

use shelf_proto::{Planogram, PlanogramItem};

use crate::geometry::ShelfLayout;
use crate::CompareError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    ForeignItem { item_id: String, planogram_id: String },
    ShelfOutOfRange { item_id: String, shelf_index: i32 },
    NonPositiveWidth { item_id: String, width_mm: i32 },
    ExtentOutsideShelf { item_id: String, x_mm: i32, end_mm: i64 },
    NonPositiveFacings { item_id: String, facings: i32 },
    Overlap { first: String, second: String, shelf_index: i32 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::ForeignItem { item_id, planogram_id } => {
                write!(f, "item {item_id} belongs to planogram {planogram_id}")
            }
            Finding::ShelfOutOfRange { item_id, shelf_index } => {
                write!(f, "item {item_id}: shelf_index {shelf_index} out of range")
            }
            Finding::NonPositiveWidth { item_id, width_mm } => {
                write!(f, "item {item_id}: width_mm {width_mm} must be > 0")
            }
            Finding::ExtentOutsideShelf { item_id, x_mm, end_mm } => {
                write!(f, "item {item_id}: extent {x_mm}..{end_mm}mm outside the shelf")
            }
            Finding::NonPositiveFacings { item_id, facings } => {
                write!(f, "item {item_id}: facings {facings} must be > 0")
            }
            Finding::Overlap { first, second, shelf_index } => {
                write!(f, "items {first} and {second} overlap on shelf {shelf_index}")
            }
        }
    }
}

/// Fails only on a layout the comparator would reject; everything else is a finding.
pub fn check_layout(planogram: &Planogram, items: &[PlanogramItem]) -> Result<Vec<Finding>, CompareError> {
    let layout = ShelfLayout::from_planogram(planogram)?;
    let width = layout.width_mm() as i64;
    let mut findings = Vec::new();

    for item in items {
        let item_id = item.id.clone();
        if item.planogram_id != planogram.id {
            findings.push(Finding::ForeignItem { item_id: item_id.clone(), planogram_id: item.planogram_id.clone() });
        }
        if !layout.has_shelf(item.shelf_index) {
            findings.push(Finding::ShelfOutOfRange { item_id: item_id.clone(), shelf_index: item.shelf_index });
        }
        if item.width_mm <= 0 {
            findings.push(Finding::NonPositiveWidth { item_id: item_id.clone(), width_mm: item.width_mm });
        }
        if item.x_mm < 0 || item.end_mm() > width {
            findings.push(Finding::ExtentOutsideShelf { item_id: item_id.clone(), x_mm: item.x_mm, end_mm: item.end_mm() });
        }
        if item.facings <= 0 {
            findings.push(Finding::NonPositiveFacings { item_id, facings: item.facings });
        }
    }

    // Overlap on the same shelf, touching edges allowed.
    let mut sorted: Vec<&PlanogramItem> = items.iter().filter(|i| i.width_mm > 0).collect();
    sorted.sort_by_key(|i| (i.shelf_index, i.x_mm));
    for (n, a) in sorted.iter().enumerate() {
        for b in sorted[n + 1..]
            .iter()
            .take_while(|b| b.shelf_index == a.shelf_index && (b.x_mm as i64) < a.end_mm())
        {
            findings.push(Finding::Overlap { first: a.id.clone(), second: b.id.clone(), shelf_index: a.shelf_index });
        }
    }

    Ok(findings)
}
