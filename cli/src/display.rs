//! Plain-text rendering of recipes and steps.

use larder_core::{format_duration, IngredientEntry, Recipe, Step, StepBody, StoredRecipe};

/// One-line heading for a step, e.g. `3. Mix: Whisk until smooth (speed 4, 2 min 0 s)`.
pub fn step_heading(step: &Step) -> String {
    match &step.body {
        StepBody::Action(action) => {
            let mut details = Vec::new();
            if let Some(temperature) = action.temperature {
                details.push(format!("{}°C", temperature));
            }
            if let Some(speed) = action.speed {
                details.push(format!("speed {}", speed));
            }
            if let Some(secs) = action.duration_secs {
                details.push(format_duration(i64::from(secs)));
            }

            let mut heading = format!(
                "{}. {}: {}",
                step.order,
                capitalize(action.kind.as_str()),
                action.description
            );
            if !details.is_empty() {
                heading.push_str(&format!(" ({})", details.join(", ")));
            }
            heading
        }
        StepBody::Ingredient(ingredient) => match &ingredient.description {
            Some(description) => format!("{}. Add ingredients: {}", step.order, description),
            None => format!("{}. Add ingredients", step.order),
        },
        StepBody::Description(description) => {
            format!("{}. {}", step.order, description.description)
        }
    }
}

pub fn ingredient_line(entry: &IngredientEntry) -> String {
    match entry.unit {
        Some(unit) => format!("{} {}{}", entry.name, entry.amount, unit),
        None => format!("{} {}", entry.name, entry.amount),
    }
}

/// Full recipe: metadata followed by every step and its ingredients.
pub fn recipe_text(recipe: &Recipe) -> String {
    let mut out = Vec::new();
    out.push(recipe.metadata.title.clone());
    out.push(format!("by {}", recipe.metadata.author));
    if let Some(rating) = recipe.rating.filter(|r| r.count > 0) {
        out.push(format!("rated {:.1}/5 ({} votes)", rating.average, rating.count));
    }
    if !recipe.metadata.description.trim().is_empty() {
        out.push(String::new());
        out.push(recipe.metadata.description.clone());
    }
    out.push(String::new());
    for step in &recipe.steps {
        out.push(step_heading(step));
        for entry in step.ingredients() {
            out.push(format!("   - {}", ingredient_line(entry)));
        }
    }
    out.join("\n")
}

/// One listing row: id, title, step count and author.
pub fn listing_line(stored: &StoredRecipe) -> String {
    format!(
        "{}  {} ({} steps, by {})",
        stored.id,
        stored.recipe.metadata.title,
        stored.recipe.steps.len(),
        stored.recipe.metadata.author
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{
        ActionKind, ActionStep, AuthorId, DescriptionStep, IngredientStep, RecipeId,
        RecipeMetadata, Unit,
    };

    fn toast() -> Recipe {
        Recipe {
            metadata: RecipeMetadata {
                title: "Toast".to_string(),
                description: String::new(),
                author: AuthorId::new("ala"),
                image: None,
            },
            rating: None,
            steps: vec![
                Step::new(
                    1,
                    StepBody::Ingredient(IngredientStep {
                        description: None,
                        ingredients: vec![IngredientEntry::new("Bread", "2", Some(Unit::Pieces))],
                    }),
                ),
                Step::new(
                    2,
                    StepBody::Description(DescriptionStep {
                        description: "Toast it".to_string(),
                    }),
                ),
            ],
        }
    }

    #[test]
    fn test_action_heading() {
        let step = Step::new(
            3,
            StepBody::Action(ActionStep {
                kind: ActionKind::Mix,
                description: "Whisk until smooth".to_string(),
                temperature: None,
                speed: Some(4),
                duration_secs: Some(120),
                ingredients: vec![],
            }),
        );
        assert_eq!(step_heading(&step), "3. Mix: Whisk until smooth (speed 4, 2 min 0 s)");
    }

    #[test]
    fn test_recipe_text() {
        assert_eq!(
            recipe_text(&toast()),
            "Toast\nby ala\n\n1. Add ingredients\n   - Bread 2pcs\n2. Toast it"
        );
    }

    #[test]
    fn test_listing_line() {
        let id: RecipeId = "6f1c2d0e-8a4b-4c7e-9f3a-1b2c3d4e5f60".parse().unwrap();
        let stored = StoredRecipe {
            id,
            recipe: toast(),
        };
        assert_eq!(
            listing_line(&stored),
            "6f1c2d0e-8a4b-4c7e-9f3a-1b2c3d4e5f60  Toast (2 steps, by ala)"
        );
    }
}
