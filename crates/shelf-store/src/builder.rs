//! Grid-based planogram builder.
//!
//! The user assigns products to cells of a `rows x columns` grid. Every
//! column is a fixed 400 mm slot, so the shelf width follows the column
//! count and each filled cell becomes one single-facing item.

use shelf_proto::{Planogram, PlanogramItem};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{new_id, StoreError};

pub const COLUMN_WIDTH_MM: i32 = 400;
pub const MAX_ROWS: usize = 6;
pub const MAX_COLUMNS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanogramDraft {
    cells: Vec<Vec<Option<String>>>,
    columns: usize,
}

impl Default for PlanogramDraft {
    fn default() -> Self {
        Self { cells: vec![vec![None; 4]; 3], columns: 4 }
    }
}

impl PlanogramDraft {
    pub fn new(rows: usize, columns: usize) -> Result<Self, StoreError> {
        check_size(rows, columns)?;
        Ok(Self { cells: vec![vec![None; columns]; rows], columns })
    }

    /// Draft from a grid of product ids, `None` for empty cells. All rows are
    /// padded or cut to the longest row.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Result<Self, StoreError> {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut draft = Self::new(rows.len(), columns)?;
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                draft.cells[r][c] = cell;
            }
        }
        Ok(draft)
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(row)?.get(column)?.as_deref()
    }

    /// Put a product in a cell, or clear it with `None`.
    pub fn set(&mut self, row: usize, column: usize, product_id: Option<String>) -> Result<(), StoreError> {
        let (rows, columns) = (self.rows(), self.columns);
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(StoreError::NoSuchCell { row, column, rows, columns })?;
        *cell = product_id;
        Ok(())
    }

    /// Change dimensions, keeping selections that still fit.
    pub fn resize(&mut self, rows: usize, columns: usize) -> Result<(), StoreError> {
        check_size(rows, columns)?;
        self.cells.resize_with(rows, Vec::new);
        for row in &mut self.cells {
            row.resize(columns, None);
        }
        self.columns = columns;
        Ok(())
    }

    pub fn shelf_width_mm(&self) -> i32 {
        self.columns as i32 * COLUMN_WIDTH_MM
    }

    /// Planogram plus one item per filled cell, row-major.
    pub fn build(&self, name: &str, section: Option<String>) -> (Planogram, Vec<PlanogramItem>) {
        let mut planogram = Planogram::new(new_id(), self.rows() as i32, self.shelf_width_mm());
        planogram.name = name.to_string();
        planogram.section = section;
        planogram.created_at = OffsetDateTime::now_utc().format(&Rfc3339).ok();

        let items = self
            .cells
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, cell)| (r, c, cell)))
            .filter_map(|(r, c, cell)| {
                let product_id = cell.as_ref()?;
                Some(PlanogramItem::new(
                    new_id(),
                    planogram.id.clone(),
                    product_id.clone(),
                    r as i32,
                    c as i32 * COLUMN_WIDTH_MM,
                    COLUMN_WIDTH_MM,
                ))
            })
            .collect();

        (planogram, items)
    }
}

fn check_size(rows: usize, columns: usize) -> Result<(), StoreError> {
    if !(1..=MAX_ROWS).contains(&rows) || !(1..=MAX_COLUMNS).contains(&columns) {
        return Err(StoreError::GridSize { rows, columns, max_rows: MAX_ROWS, max_columns: MAX_COLUMNS });
    }
    Ok(())
}
