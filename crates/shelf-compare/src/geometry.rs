//! Millimetre placements to normalized cell rectangles.
//!
//! Rows share the image height evenly (`1 / shelves_count` each) and every
//! row uses the same `shelf_width_mm` as horizontal scale. Cells are not
//! clamped to 0..1: an item that sticks out of the shelf produces a cell
//! that sticks out of the image.

use shelf_proto::{Planogram, PlanogramItem};

use crate::CompareError;

/// Validated shelf dimensions of a planogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelfLayout {
    shelves: i32,
    width_mm: i32,
}

impl ShelfLayout {
    pub fn from_planogram(planogram: &Planogram) -> Result<Self, CompareError> {
        if planogram.shelves_count <= 0 || planogram.shelf_width_mm <= 0 {
            return Err(CompareError::InvalidLayout {
                shelves_count: planogram.shelves_count,
                shelf_width_mm: planogram.shelf_width_mm,
            });
        }
        Ok(Self { shelves: planogram.shelves_count, width_mm: planogram.shelf_width_mm })
    }

    pub fn shelves(&self) -> i32 {
        self.shelves
    }

    pub fn width_mm(&self) -> i32 {
        self.width_mm
    }

    pub fn has_shelf(&self, shelf_index: i32) -> bool {
        (0..self.shelves).contains(&shelf_index)
    }

    pub fn cell(&self, item: &PlanogramItem) -> CellRect {
        let w = self.width_mm as f64;
        let s = self.shelves as f64;
        let row = item.shelf_index as f64;
        CellRect {
            left: item.x_mm as f64 / w,
            right: (item.x_mm as f64 + item.width_mm as f64) / w,
            top: row / s,
            bottom: (row + 1.0) / s,
        }
    }
}

/// Normalized rectangle a planogram item is expected to occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CellRect {
    /// Inclusive on all four edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}
