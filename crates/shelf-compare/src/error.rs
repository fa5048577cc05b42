use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("invalid layout: shelves_count={shelves_count}, shelf_width_mm={shelf_width_mm} (both must be > 0)")]
    InvalidLayout { shelves_count: i32, shelf_width_mm: i32 },

    #[error("item {item_id}: shelf_index {shelf_index} outside 0..{shelves_count}")]
    InvalidItem { item_id: String, shelf_index: i32, shelves_count: i32 },
}
