//! Recipe persistence.
//!
//! A store accepts a whole recipe (metadata plus full step sequence) for
//! create and replace; steps are never patched individually. Writes by
//! anyone other than the recipe's author are refused.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Rejection, StoreError};
use crate::interchange::{export_recipe, import_recipe};
use crate::types::{renumber, AuthorId, RatingSummary, Recipe, RecipeId, RecipeMetadata, Step};
use crate::validate::validate_step;

/// A recipe ready to be handed to a store.
///
/// Construction checks everything a store relies on: a non-empty title,
/// at least one step, and every step passing validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSubmission {
    metadata: RecipeMetadata,
    steps: Vec<Step>,
}

impl RecipeSubmission {
    /// `author` replaces whatever author the metadata carries.
    pub fn new(
        author: AuthorId,
        mut metadata: RecipeMetadata,
        mut steps: Vec<Step>,
    ) -> Result<Self, Rejection> {
        if metadata.title.trim().is_empty() {
            return Err(Rejection::EmptyTitle);
        }
        if steps.is_empty() {
            return Err(Rejection::NoSteps);
        }
        for step in &steps {
            validate_step(&step.body)?;
        }
        renumber(&mut steps);
        metadata.author = author;
        Ok(Self { metadata, steps })
    }

    /// Build a submission from an already parsed recipe, e.g. an import.
    pub fn from_recipe(recipe: Recipe) -> Result<Self, Rejection> {
        let author = recipe.metadata.author.clone();
        Self::new(author, recipe.metadata, recipe.steps)
    }

    pub fn author(&self) -> &AuthorId {
        &self.metadata.author
    }

    pub fn metadata(&self) -> &RecipeMetadata {
        &self.metadata
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn into_recipe(self, rating: Option<RatingSummary>) -> Recipe {
        Recipe {
            metadata: self.metadata,
            rating,
            steps: self.steps,
        }
    }
}

/// A stored recipe together with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecipe {
    pub id: RecipeId,
    pub recipe: Recipe,
}

/// Refuse writes to `recipe` by anyone but its author.
pub fn ensure_author(recipe: &Recipe, acting: &AuthorId) -> Result<(), StoreError> {
    if recipe.author() == acting {
        Ok(())
    } else {
        Err(StoreError::Unauthorized {
            user: acting.to_string(),
        })
    }
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Store a new recipe and return its identifier.
    async fn create(&self, submission: RecipeSubmission) -> Result<RecipeId, StoreError>;

    /// Replace metadata and steps of an existing recipe. The rating is kept.
    async fn replace(
        &self,
        id: RecipeId,
        acting: &AuthorId,
        submission: RecipeSubmission,
    ) -> Result<(), StoreError>;

    async fn get(&self, id: RecipeId) -> Result<Recipe, StoreError>;

    /// All stored recipes, sorted by title.
    async fn list(&self) -> Result<Vec<StoredRecipe>, StoreError>;

    async fn delete(&self, id: RecipeId, acting: &AuthorId) -> Result<(), StoreError>;

    /// Recipes whose title contains `text`, ignoring case. Blank text is
    /// refused rather than matching everything.
    async fn search(&self, text: &str) -> Result<Vec<StoredRecipe>, StoreError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(StoreError::EmptySearch);
        }
        let mut listing = self.list().await?;
        listing.retain(|stored| stored.recipe.title().to_lowercase().contains(&needle));
        tracing::debug!(text = %needle, hits = listing.len(), "searched recipes");
        Ok(listing)
    }

    /// Recipes written by `author`, sorted by title.
    async fn list_by_author(&self, author: &AuthorId) -> Result<Vec<StoredRecipe>, StoreError> {
        let mut listing = self.list().await?;
        listing.retain(|stored| stored.recipe.author() == author);
        Ok(listing)
    }
}

fn sort_listing(recipes: &mut [StoredRecipe]) {
    recipes.sort_by(|a, b| {
        a.recipe
            .title()
            .to_lowercase()
            .cmp(&b.recipe.title().to_lowercase())
            .then_with(|| a.id.0.cmp(&b.id.0))
    });
}

/// Store that keeps recipes in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    recipes: RwLock<HashMap<RecipeId, Recipe>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn create(&self, submission: RecipeSubmission) -> Result<RecipeId, StoreError> {
        let id = RecipeId::new_random();
        self.recipes
            .write()
            .await
            .insert(id, submission.into_recipe(None));
        Ok(id)
    }

    async fn replace(
        &self,
        id: RecipeId,
        acting: &AuthorId,
        submission: RecipeSubmission,
    ) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write().await;
        let existing = recipes
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        ensure_author(existing, acting)?;
        let rating = existing.rating;
        *existing = submission.into_recipe(rating);
        Ok(())
    }

    async fn get(&self, id: RecipeId) -> Result<Recipe, StoreError> {
        self.recipes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        let mut listing: Vec<StoredRecipe> = self
            .recipes
            .read()
            .await
            .iter()
            .map(|(id, recipe)| StoredRecipe {
                id: *id,
                recipe: recipe.clone(),
            })
            .collect();
        sort_listing(&mut listing);
        Ok(listing)
    }

    async fn delete(&self, id: RecipeId, acting: &AuthorId) -> Result<(), StoreError> {
        let mut recipes = self.recipes.write().await;
        let existing = recipes
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        ensure_author(existing, acting)?;
        recipes.remove(&id);
        Ok(())
    }
}

/// Store that keeps one interchange document per recipe in a directory.
///
/// Layout: `root/{recipe_id}.json`
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn recipe_path(&self, id: RecipeId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    async fn read(&self, id: RecipeId) -> Result<Recipe, StoreError> {
        let path = self.recipe_path(id);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        // Stored documents always carry their author.
        import_recipe(&text, &AuthorId::new(""))
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    async fn write(&self, id: RecipeId, recipe: &Recipe) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let json = export_recipe(recipe).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let path = self.recipe_path(id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::info!(recipe = %id, path = %path.display(), "saved recipe");
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for DirStore {
    async fn create(&self, submission: RecipeSubmission) -> Result<RecipeId, StoreError> {
        let id = RecipeId::new_random();
        self.write(id, &submission.into_recipe(None)).await?;
        Ok(id)
    }

    async fn replace(
        &self,
        id: RecipeId,
        acting: &AuthorId,
        submission: RecipeSubmission,
    ) -> Result<(), StoreError> {
        let existing = self.read(id).await?;
        ensure_author(&existing, acting)?;
        self.write(id, &submission.into_recipe(existing.rating))
            .await
    }

    async fn get(&self, id: RecipeId) -> Result<Recipe, StoreError> {
        self.read(id).await
    }

    async fn list(&self) -> Result<Vec<StoredRecipe>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut listing = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<RecipeId>().ok())
            else {
                tracing::warn!(path = %path.display(), "skipping file with non-recipe name");
                continue;
            };
            match self.read(id).await {
                Ok(recipe) => listing.push(StoredRecipe { id, recipe }),
                Err(e) => tracing::warn!(recipe = %id, error = %e, "skipping unreadable recipe"),
            }
        }

        sort_listing(&mut listing);
        Ok(listing)
    }

    async fn delete(&self, id: RecipeId, acting: &AuthorId) -> Result<(), StoreError> {
        let existing = self.read(id).await?;
        ensure_author(&existing, acting)?;
        tokio::fs::remove_file(self.recipe_path(id)).await?;
        tracing::info!(recipe = %id, "deleted recipe");
        Ok(())
    }
}
