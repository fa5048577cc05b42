use serde::{Deserialize, Serialize};

/// Catalog product. Mirrors the `products` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub width_mm: i32,
    #[serde(default)]
    pub height_mm: Option<i32>,
    #[serde(default)]
    pub depth_mm: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
}
