//! Planogram data source: a local JSON catalog plus the grid builder that
//! produces new planograms.

pub mod builder;
pub mod catalog;

pub use builder::PlanogramDraft;
pub use catalog::{Catalog, CatalogStore, PlanogramSource};

use serde::Deserialize;
use shelf_proto::Product;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("catalog {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("planogram {0} not found")]
    NotFound(String),

    #[error("planogram {0} already exists")]
    Duplicate(String),

    #[error("grid must be 1..={max_rows} rows and 1..={max_columns} columns, got {rows}x{columns}")]
    GridSize { rows: usize, columns: usize, max_rows: usize, max_columns: usize },

    #[error("cell ({row}, {column}) outside the {rows}x{columns} grid")]
    NoSuchCell { row: usize, column: usize, rows: usize, columns: usize },
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub catalog_path: PathBuf,
    /// Offer placeholder products when the catalog has none.
    #[serde(default = "default_true")]
    pub sample_products: bool,
}

fn default_true() -> bool {
    true
}

/// Random 128-bit id, hex encoded.
pub fn new_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Placeholder products so a fresh catalog can still be used to build planograms.
pub fn sample_products() -> Vec<Product> {
    [("milk", "Milk", 100), ("bread", "Bread", 120), ("cereal", "Cereal", 150), ("juice", "Orange Juice", 200)]
        .into_iter()
        .map(|(sku, name, width_mm)| Product {
            id: new_id(),
            sku: sku.to_string(),
            name: name.to_string(),
            upc: None,
            brand: None,
            category: None,
            width_mm,
            height_mm: None,
            depth_mm: None,
            image_url: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_32_hex_chars_and_distinct() {
        let a = new_id();
        let b = new_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn sample_catalog() {
        let products = sample_products();
        let skus: Vec<&str> = products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["milk", "bread", "cereal", "juice"]);
    }
}
