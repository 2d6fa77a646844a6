//! Read-only recipe commands, plus delete.

use anyhow::Result;
use larder_core::{
    shopping_list_text, AuthorId, IngredientCatalog, RecipeId, RecipeStore, StaticCatalog,
    StoredRecipe,
};
use serde_json::json;

use crate::display::{listing_line, recipe_text};
use crate::App;

pub async fn list(app: &App, author: Option<&str>, as_json: bool) -> Result<()> {
    let recipes = match author {
        Some(author) => app.store.list_by_author(&AuthorId::new(author.trim())).await?,
        None => app.store.list().await?,
    };

    if recipes.is_empty() && !as_json {
        match author {
            Some(author) => println!("No recipes by {}", author.trim()),
            None => println!("No recipes in {}", app.store.root().display()),
        }
        return Ok(());
    }
    print_listing(&recipes, as_json)
}

pub async fn search(app: &App, text: &str, as_json: bool) -> Result<()> {
    let recipes = app.store.search(text).await?;
    if recipes.is_empty() && !as_json {
        println!("No recipe titles contain \"{}\"", text.trim());
        return Ok(());
    }
    print_listing(&recipes, as_json)
}

fn print_listing(recipes: &[StoredRecipe], as_json: bool) -> Result<()> {
    if as_json {
        let listing: Vec<_> = recipes
            .iter()
            .map(|stored| {
                json!({
                    "id": stored.id.to_string(),
                    "title": stored.recipe.metadata.title,
                    "author": stored.recipe.metadata.author.as_str(),
                    "steps": stored.recipe.steps.len(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for stored in recipes {
        println!("{}", listing_line(stored));
    }
    Ok(())
}

pub async fn show(app: &App, id: RecipeId) -> Result<()> {
    let recipe = app.store.get(id).await?;
    println!("{}", recipe_text(&recipe));
    Ok(())
}

pub async fn shopping(app: &App, id: RecipeId) -> Result<()> {
    let recipe = app.store.get(id).await?;
    let list = shopping_list_text(&recipe);
    if list.is_empty() {
        println!("{} needs no ingredients", recipe.metadata.title);
    } else {
        println!("{}", list);
    }
    Ok(())
}

pub async fn catalog(app: &App) -> Result<()> {
    let catalog = match &app.config.catalog_path {
        Some(path) => StaticCatalog::from_path(path)?,
        None => StaticCatalog::bundled()?,
    };

    for category in catalog.categories().await? {
        println!("{}", category.name);
        for item in &category.items {
            println!("  {}", item);
        }
    }
    Ok(())
}

pub async fn delete(app: &App, id: RecipeId) -> Result<()> {
    let user = app.user()?;
    app.store.delete(id, user).await?;
    println!("Deleted {}", id);
    Ok(())
}
