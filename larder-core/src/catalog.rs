//! Ingredient catalog lookup.
//!
//! The catalog only feeds selection lists in the authoring UI. Ingredient
//! names are never checked against it; free-text names are always allowed.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A named group of ingredient names, e.g. "Dairy & Eggs".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}

/// Read-only source of ingredient categories.
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Items of the named category, or an empty list if there is none.
    async fn items_in(&self, category: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .categories()
            .await?
            .into_iter()
            .find(|c| c.name == category)
            .map(|c| c.items)
            .unwrap_or_default())
    }
}

/// Catalog held in memory, loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<Category>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The catalog shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(include_str!("../data/catalog.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.categories))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[async_trait]
impl IngredientCatalog for StaticCatalog {
    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundled_catalog_loads() {
        let catalog = StaticCatalog::bundled().unwrap();
        let categories = catalog.categories().await.unwrap();
        assert!(!categories.is_empty());
        assert!(categories.iter().all(|c| !c.items.is_empty()));
    }

    #[tokio::test]
    async fn test_items_in_category() {
        let catalog = StaticCatalog::new(vec![Category {
            name: "Produce".to_string(),
            items: vec!["Onion".to_string()],
        }]);
        assert_eq!(catalog.items_in("Produce").await.unwrap(), vec!["Onion"]);
        assert!(catalog.items_in("Frozen").await.unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            StaticCatalog::from_json("{\"categories\": 3}"),
            Err(CatalogError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = StaticCatalog::from_path(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }
}
