use std::path::Path;

use anyhow::{Context, Result};
use larder_core::{RecipeStore, RecipeSubmission};

use crate::App;

/// Import an interchange document and store it as a new recipe.
///
/// The acting user becomes the author of the stored copy, whatever the
/// document says.
pub async fn import_recipe(app: &App, file: &Path) -> Result<()> {
    let user = app.user()?;
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let recipe = larder_core::import_recipe(&text, user)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    if recipe.author() != user {
        tracing::info!(
            original_author = %recipe.author(),
            user = %user,
            "storing imported recipe under acting user"
        );
    }

    let step_count = recipe.steps.len();
    let title = recipe.metadata.title.clone();
    let submission = RecipeSubmission::new(user.clone(), recipe.metadata, recipe.steps)
        .context("Imported recipe was rejected")?;
    let id = app.store.create(submission).await?;

    println!("Imported {} ({} steps) as {}", title, step_count, id);
    Ok(())
}
