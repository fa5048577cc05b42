use serde::{Deserialize, Serialize};

/// A named shelving layout: `shelves_count` rows, each `shelf_width_mm` wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planogram {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub store_id: Option<String>,
    pub shelves_count: i32,
    pub shelf_width_mm: i32,
    #[serde(default)]
    pub shelf_height_mm: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    // RFC 3339
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Planogram {
    pub fn new(id: impl Into<String>, shelves_count: i32, shelf_width_mm: i32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            section: None,
            store_id: None,
            shelves_count,
            shelf_width_mm,
            shelf_height_mm: None,
            image_url: None,
            created_at: None,
        }
    }
}

/// One expected product placement on a shelf row.
///
/// `x_mm` and `width_mm` are measured from the left edge of the row. Nothing
/// here enforces that the placement fits inside the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanogramItem {
    pub id: String,
    pub planogram_id: String,
    pub product_id: String,
    pub shelf_index: i32,
    pub x_mm: i32,
    pub width_mm: i32,
    #[serde(default = "default_facings")]
    pub facings: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_facings() -> i32 {
    1
}

impl PlanogramItem {
    pub fn new(
        id: impl Into<String>,
        planogram_id: impl Into<String>,
        product_id: impl Into<String>,
        shelf_index: i32,
        x_mm: i32,
        width_mm: i32,
    ) -> Self {
        Self {
            id: id.into(),
            planogram_id: planogram_id.into(),
            product_id: product_id.into(),
            shelf_index,
            x_mm,
            width_mm,
            facings: default_facings(),
            notes: None,
        }
    }

    /// Right edge of the placement in millimetres.
    pub fn end_mm(&self) -> i64 {
        self.x_mm as i64 + self.width_mm as i64
    }
}
