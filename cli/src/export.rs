use std::path::Path;

use anyhow::{Context, Result};
use larder_core::{RecipeId, RecipeStore};

use crate::App;

/// Export a stored recipe to a file, or to stdout when no path is given.
pub async fn export_recipe(app: &App, id: RecipeId, output_path: Option<&Path>) -> Result<()> {
    let recipe = app.store.get(id).await?;
    let json = larder_core::export_recipe(&recipe).context("Failed to serialize recipe")?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            println!(
                "Exported recipe to: {} ({} bytes)",
                path.display(),
                json.len()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
