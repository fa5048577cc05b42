use serde::{Deserialize, Serialize};
use shelf_proto::{Planogram, PlanogramItem, Product};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::StoreError;

/// Where planograms and their items come from.
pub trait PlanogramSource {
    fn planograms(&self) -> Result<Vec<Planogram>, StoreError>;
    fn planogram(&self, id: &str) -> Result<Planogram, StoreError>;
    /// All items of one planogram, ordered by shelf then x offset.
    fn items(&self, planogram_id: &str) -> Result<Vec<PlanogramItem>, StoreError>;
    fn products(&self) -> Result<Vec<Product>, StoreError>;
}

/// On-disk catalog document: the three tables side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub planograms: Vec<Planogram>,
    #[serde(default)]
    pub planogram_items: Vec<PlanogramItem>,
}

impl PlanogramSource for Catalog {
    fn planograms(&self) -> Result<Vec<Planogram>, StoreError> {
        Ok(self.planograms.clone())
    }

    fn planogram(&self, id: &str) -> Result<Planogram, StoreError> {
        self.planograms.iter().find(|p| p.id == id).cloned().ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn items(&self, planogram_id: &str) -> Result<Vec<PlanogramItem>, StoreError> {
        let mut items: Vec<PlanogramItem> =
            self.planogram_items.iter().filter(|i| i.planogram_id == planogram_id).cloned().collect();
        items.sort_by_key(|i| (i.shelf_index, i.x_mm));
        Ok(items)
    }

    fn products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.clone())
    }
}

/// A [`Catalog`] backed by a JSON file.
pub struct CatalogStore {
    path: PathBuf,
    catalog: Catalog,
}

impl CatalogStore {
    /// A missing file opens as an empty catalog; it is created on first save.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let catalog = match std::fs::read_to_string(&path) {
            Ok(s) => serde_json::from_str(&s).map_err(|source| StoreError::Json { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("catalog: {} not found, starting empty", path.display());
                Catalog::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!(
            "catalog: {} products, {} planograms, {} items",
            catalog.products.len(),
            catalog.planograms.len(),
            catalog.planogram_items.len()
        );
        Ok(Self { path, catalog })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Add a planogram with its items and write the catalog back.
    /// Nothing changes in memory unless the write succeeds.
    pub fn insert_planogram(&mut self, planogram: Planogram, items: Vec<PlanogramItem>) -> Result<(), StoreError> {
        if self.catalog.planograms.iter().any(|p| p.id == planogram.id) {
            return Err(StoreError::Duplicate(planogram.id));
        }
        info!("catalog: inserting planogram {} with {} items", planogram.id, items.len());
        let mut next = self.catalog.clone();
        next.planograms.push(planogram);
        next.planogram_items.extend(items);
        self.commit(next)
    }

    pub fn add_products(&mut self, products: impl IntoIterator<Item = Product>) -> Result<(), StoreError> {
        let mut next = self.catalog.clone();
        next.products.extend(products);
        self.commit(next)
    }

    fn commit(&mut self, next: Catalog) -> Result<(), StoreError> {
        self.save(&next)?;
        self.catalog = next;
        Ok(())
    }

    // Write to a sibling temp file, then rename over the catalog.
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(catalog)
            .map_err(|source| StoreError::Json { path: self.path.clone(), source })?;
        let tmp = self.path.with_extension("json.tmp");
        let io = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io)?;
        }
        std::fs::write(&tmp, json).map_err(io)?;
        std::fs::rename(&tmp, &self.path).map_err(io)?;
        Ok(())
    }
}

impl PlanogramSource for CatalogStore {
    fn planograms(&self) -> Result<Vec<Planogram>, StoreError> {
        self.catalog.planograms()
    }

    fn planogram(&self, id: &str) -> Result<Planogram, StoreError> {
        self.catalog.planogram(id)
    }

    fn items(&self, planogram_id: &str) -> Result<Vec<PlanogramItem>, StoreError> {
        self.catalog.items(planogram_id)
    }

    fn products(&self) -> Result<Vec<Product>, StoreError> {
        self.catalog.products()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_filtered_and_ordered() {
        let catalog = Catalog {
            products: vec![],
            planograms: vec![Planogram::new("p1", 2, 800)],
            planogram_items: vec![
                PlanogramItem::new("c", "p1", "x", 1, 0, 400),
                PlanogramItem::new("b", "p1", "x", 0, 400, 400),
                PlanogramItem::new("z", "p2", "x", 0, 0, 400),
                PlanogramItem::new("a", "p1", "x", 0, 0, 400),
            ],
        };
        let ids: Vec<String> = catalog.items("p1").unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(matches!(catalog.planogram("nope"), Err(StoreError::NotFound(_))));
    }
}
