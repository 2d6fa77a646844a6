//! Recipe interchange format (JSON).
//!
//! Document shape:
//!
//! ```json
//! {
//!   "title": "Pancakes",
//!   "description": "Thin ones",
//!   "author": "ala",
//!   "image": "/uploads/pancakes.jpg",
//!   "rating": { "average": 4.5, "count": 2 },
//!   "ingredients": [ { "name": "Milk", "amount": 500, "unit": "ml" } ],
//!   "steps": [
//!     { "order": 1, "type": "ingredient", "ingredients": [ { "name": "Milk", "amount": "500", "unit": "ml" } ] },
//!     { "order": 2, "type": "action", "action": "mix", "description": "Whisk", "speed": 4, "duration": 120 },
//!     { "order": 3, "type": "description", "description": "Serve warm" }
//!   ]
//! }
//! ```
//!
//! `ingredients` at the top level is the aggregated list, written for
//! convenience and ignored on import. Step `order` is likewise ignored on
//! import; steps are numbered by position.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::aggregate::{aggregate, format_amount};
use crate::error::{ExportError, ImportError, Rejection};
use crate::types::{
    ActionStep, AuthorId, DescriptionStep, IngredientEntry, IngredientStep, RatingSummary,
    Recipe, RecipeMetadata, Step, StepBody, StepType, Unit,
};
use crate::validate::{
    admit_entry, check_action_kind, check_description, check_duration_secs, check_speed,
    validate_step,
};

#[derive(Debug, Serialize)]
struct RecipeDocument {
    title: String,
    description: String,
    author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<RatingSummary>,
    ingredients: Vec<AggregatedLine>,
    steps: Vec<WireStep>,
}

#[derive(Debug, Serialize)]
struct AggregatedLine {
    name: String,
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<Unit>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<u32>,
    #[serde(rename = "type")]
    step_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<i32>,
    #[serde(default, alias = "bladeSpeed", skip_serializing_if = "Option::is_none")]
    speed: Option<i32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ingredients: Vec<WireIngredient>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireIngredient {
    #[serde(default)]
    name: String,
    amount: WireAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
}

/// Amounts are written as strings but older exports used JSON numbers.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(serde_json::Number),
    Text(String),
}

impl WireAmount {
    fn to_text(&self) -> String {
        match self {
            WireAmount::Number(n) => n.to_string(),
            WireAmount::Text(s) => s.clone(),
        }
    }
}

/// Serialize a recipe to a pretty-printed interchange document.
///
/// A rating that [`import_recipe`] would refuse is refused here too.
pub fn export_recipe(recipe: &Recipe) -> Result<String, ExportError> {
    if let Some(rating) = &recipe.rating {
        check_rating(rating).map_err(ExportError::InvalidRating)?;
    }

    let document = RecipeDocument {
        title: recipe.metadata.title.clone(),
        description: recipe.metadata.description.clone(),
        author: recipe.metadata.author.to_string(),
        image: recipe.metadata.image.clone(),
        rating: recipe.rating,
        ingredients: aggregate(&recipe.steps)
            .into_iter()
            .map(|entry| AggregatedLine {
                name: entry.name,
                amount: entry.amount,
                unit: entry.unit,
            })
            .collect(),
        steps: recipe.steps.iter().map(step_to_wire).collect(),
    };

    tracing::debug!(
        title = %recipe.metadata.title,
        steps = recipe.steps.len(),
        "exporting recipe"
    );
    Ok(serde_json::to_string_pretty(&document)?)
}

fn step_to_wire(step: &Step) -> WireStep {
    let mut wire = WireStep {
        order: Some(step.order),
        step_type: step.body.step_type().as_str().to_string(),
        action: None,
        description: None,
        temperature: None,
        speed: None,
        duration: None,
        ingredients: step.ingredients().iter().map(entry_to_wire).collect(),
    };

    match &step.body {
        StepBody::Action(action) => {
            wire.action = Some(action.kind.as_str().to_string());
            wire.description = Some(action.description.clone());
            wire.temperature = action.temperature;
            wire.speed = action.speed;
            wire.duration = action.duration_secs.map(i64::from);
        }
        StepBody::Ingredient(step) => wire.description = step.description.clone(),
        StepBody::Description(step) => wire.description = Some(step.description.clone()),
    }
    wire
}

fn entry_to_wire(entry: &IngredientEntry) -> WireIngredient {
    WireIngredient {
        name: entry.name.clone(),
        amount: WireAmount::Text(entry.amount.clone()),
        unit: entry.unit.map(|u| u.symbol().to_string()),
    }
}

/// Parse an interchange document into a recipe.
///
/// The document's `author` is kept when present; otherwise the recipe is
/// attributed to `importer`. Either the whole recipe is produced or an
/// error naming the first problem is returned.
pub fn import_recipe(text: &str, importer: &AuthorId) -> Result<Recipe, ImportError> {
    let document: JsonValue =
        serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let Some(fields) = document.as_object() else {
        return Err(ImportError::WrongShape {
            field: "document".to_string(),
            expected: "an object",
        });
    };

    let title = required_string(fields, "title")?;
    if title.trim().is_empty() {
        return Err(ImportError::MissingField("title"));
    }
    let description = required_string(fields, "description")?;

    let author = match optional_string(fields, "author")? {
        Some(author) if !author.trim().is_empty() => AuthorId::new(author),
        _ => importer.clone(),
    };
    let image = optional_string(fields, "image")?;
    let rating = match fields.get("rating") {
        None | Some(JsonValue::Null) => None,
        Some(value) => Some(parse_rating(value)?),
    };

    let raw_steps = match fields.get("steps") {
        None | Some(JsonValue::Null) => return Err(ImportError::MissingField("steps")),
        Some(JsonValue::Array(steps)) => steps,
        Some(_) => {
            return Err(ImportError::WrongShape {
                field: "steps".to_string(),
                expected: "a list",
            })
        }
    };
    if raw_steps.is_empty() {
        return Err(ImportError::EmptySteps);
    }

    let mut steps = Vec::with_capacity(raw_steps.len());
    for (idx, raw) in raw_steps.iter().enumerate() {
        let position = idx + 1;
        let body = parse_step(raw).map_err(|reason| {
            tracing::debug!(position, %reason, "rejecting imported step");
            ImportError::InvalidStep { position, reason }
        })?;
        steps.push(Step::new(position as u32, body));
    }

    Ok(Recipe {
        metadata: RecipeMetadata {
            title: title.to_string(),
            description: description.to_string(),
            author,
            image: image.map(str::to_string),
        },
        rating,
        steps,
    })
}

fn required_string<'a>(
    fields: &'a serde_json::Map<String, JsonValue>,
    name: &'static str,
) -> Result<&'a str, ImportError> {
    optional_string(fields, name)?.ok_or(ImportError::MissingField(name))
}

fn optional_string<'a>(
    fields: &'a serde_json::Map<String, JsonValue>,
    name: &'static str,
) -> Result<Option<&'a str>, ImportError> {
    match fields.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ImportError::WrongShape {
            field: name.to_string(),
            expected: "a string",
        }),
    }
}

fn parse_rating(value: &JsonValue) -> Result<RatingSummary, ImportError> {
    let rating: RatingSummary = serde_json::from_value(value.clone())
        .map_err(|e| ImportError::InvalidRating(e.to_string()))?;
    check_rating(&rating).map_err(ImportError::InvalidRating)?;
    Ok(rating)
}

/// Shared by export and import. An unrated recipe may carry any finite
/// average; a rated one must average between 1 and 5.
fn check_rating(rating: &RatingSummary) -> Result<(), String> {
    if !rating.average.is_finite() {
        return Err(format!("average {} is not a number", rating.average));
    }
    if rating.count > 0 && !(1.0..=5.0).contains(&rating.average) {
        return Err(format!("average {} is outside 1-5", rating.average));
    }
    Ok(())
}

/// Extract one step's variant fields and check them in rule order.
/// Errors are returned as human-readable reasons.
///
/// Text fields are kept exactly as written so that exported recipes
/// import back unchanged.
fn parse_step(raw: &JsonValue) -> Result<StepBody, String> {
    let wire: WireStep = serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?;
    let step_type = StepType::from_label(&wire.step_type)
        .ok_or_else(|| format!("unknown step type \"{}\"", wire.step_type))?;

    let body = match step_type {
        StepType::Action => action_from_wire(wire),
        StepType::Ingredient => entries_from_wire(&wire.ingredients).and_then(|ingredients| {
            if ingredients.is_empty() {
                return Err(Rejection::NoIngredients);
            }
            Ok(StepBody::Ingredient(IngredientStep {
                description: wire.description,
                ingredients,
            }))
        }),
        StepType::Description => {
            let description = wire.description.unwrap_or_default();
            check_description(&description).map(|()| {
                StepBody::Description(DescriptionStep { description })
            })
        }
    }
    .map_err(|r| r.to_string())?;

    validate_step(&body).map_err(|r| r.to_string())?;
    Ok(body)
}

/// Kind, description, speed, duration, then ingredients.
fn action_from_wire(wire: WireStep) -> Result<StepBody, Rejection> {
    let kind = check_action_kind(wire.action.as_deref().unwrap_or_default())?;
    let description = wire.description.unwrap_or_default();
    check_description(&description)?;
    if let Some(speed) = wire.speed {
        check_speed(speed)?;
    }
    let duration_secs = wire.duration.map(check_duration_secs).transpose()?;
    let ingredients = entries_from_wire(&wire.ingredients)?;

    Ok(StepBody::Action(ActionStep {
        kind,
        description,
        temperature: wire.temperature,
        speed: wire.speed,
        duration_secs,
        ingredients,
    }))
}

fn entries_from_wire(wire: &[WireIngredient]) -> Result<Vec<IngredientEntry>, Rejection> {
    let mut entries: Vec<IngredientEntry> = Vec::with_capacity(wire.len());
    for item in wire {
        let amount = item.amount.to_text();
        let entry = admit_entry(
            &item.name,
            &amount,
            item.unit.as_deref().unwrap_or_default(),
            &entries,
        )?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Plain-text shopping list, one aggregated line per ingredient.
pub fn shopping_list_text(recipe: &Recipe) -> String {
    aggregate(&recipe.steps)
        .iter()
        .map(|entry| match entry.unit {
            Some(unit) => format!("{} {}{}", entry.name, format_amount(entry.amount), unit),
            None => format!("{} {}", entry.name, format_amount(entry.amount)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    fn sample_recipe() -> Recipe {
        Recipe {
            metadata: RecipeMetadata {
                title: "Pancakes".to_string(),
                description: "Thin, Polish style".to_string(),
                author: AuthorId::new("ala"),
                image: Some("/uploads/pancakes.jpg".to_string()),
            },
            rating: Some(RatingSummary {
                average: 4.5,
                count: 2,
            }),
            steps: vec![
                Step::new(
                    1,
                    StepBody::Ingredient(IngredientStep {
                        description: Some("Into the bowl".to_string()),
                        ingredients: vec![
                            IngredientEntry::new("Milk", "500", Some(Unit::Milliliters)),
                            IngredientEntry::new("Egg", "2", None),
                        ],
                    }),
                ),
                Step::new(
                    2,
                    StepBody::Action(ActionStep {
                        kind: ActionKind::Mix,
                        description: "Whisk until smooth".to_string(),
                        temperature: None,
                        speed: Some(4),
                        duration_secs: Some(90),
                        ingredients: vec![IngredientEntry::new("egg", "1", None)],
                    }),
                ),
                Step::new(
                    3,
                    StepBody::Description(DescriptionStep {
                        description: "Serve warm".to_string(),
                    }),
                ),
            ],
        }
    }

    fn importer() -> AuthorId {
        AuthorId::new("importer")
    }

    #[test]
    fn test_round_trip() {
        let recipe = sample_recipe();
        let text = export_recipe(&recipe).unwrap();
        let imported = import_recipe(&text, &importer()).unwrap();
        assert_eq!(imported, recipe);
    }

    #[test]
    fn test_round_trip_keeps_blank_ingredient_step_description() {
        let mut recipe = sample_recipe();
        recipe.steps[0].body = StepBody::Ingredient(IngredientStep {
            description: Some(String::new()),
            ingredients: vec![IngredientEntry::new("Milk", "500", Some(Unit::Milliliters))],
        });
        recipe.steps.push(Step::new(
            4,
            StepBody::Ingredient(IngredientStep {
                description: Some("   ".to_string()),
                ingredients: vec![IngredientEntry::new("Sugar", "20", Some(Unit::Grams))],
            }),
        ));

        let text = export_recipe(&recipe).unwrap();
        let imported = import_recipe(&text, &importer()).unwrap();
        assert_eq!(imported, recipe);
    }

    #[test]
    fn test_export_refuses_rating_import_would_refuse() {
        let mut recipe = sample_recipe();
        recipe.rating = Some(RatingSummary {
            average: 0.0,
            count: 1,
        });
        assert!(matches!(
            export_recipe(&recipe),
            Err(ExportError::InvalidRating(_))
        ));

        recipe.rating = Some(RatingSummary {
            average: f64::NAN,
            count: 0,
        });
        assert!(matches!(
            export_recipe(&recipe),
            Err(ExportError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_unrated_recipe_round_trips() {
        let mut recipe = sample_recipe();
        recipe.rating = Some(RatingSummary {
            average: 0.0,
            count: 0,
        });
        let text = export_recipe(&recipe).unwrap();
        assert_eq!(import_recipe(&text, &importer()).unwrap(), recipe);
    }

    #[test]
    fn test_import_rejects_out_of_range_rating() {
        let text = r#"{
            "title": "Tea", "description": "",
            "rating": {"average": 7.5, "count": 3},
            "steps": [{"type": "description", "description": "Steep"}]
        }"#;
        assert!(matches!(
            import_recipe(text, &importer()),
            Err(ImportError::InvalidRating(_))
        ));
    }

    #[test]
    fn test_export_includes_aggregated_ingredients() {
        let text = export_recipe(&sample_recipe()).unwrap();
        let value: JsonValue = serde_json::from_str(&text).unwrap();
        let ingredients = value["ingredients"].as_array().unwrap();
        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[1]["name"], "Egg");
        assert_eq!(ingredients[1]["amount"], 3.0);
        assert_eq!(value["steps"][1]["type"], "action");
        assert_eq!(value["steps"][1]["duration"], 90);
    }

    #[test]
    fn test_missing_steps_names_the_field() {
        let text = r#"{"title": "Soup", "description": "Hot", "author": "ala"}"#;
        let err = import_recipe(text, &importer()).unwrap_err();
        assert_eq!(err, ImportError::MissingField("steps"));
        assert!(err.to_string().contains("steps"));
    }

    #[test]
    fn test_missing_title_and_description() {
        let text = r#"{"description": "Hot", "steps": []}"#;
        assert_eq!(
            import_recipe(text, &importer()),
            Err(ImportError::MissingField("title"))
        );
        let text = r#"{"title": "Soup", "steps": []}"#;
        assert_eq!(
            import_recipe(text, &importer()),
            Err(ImportError::MissingField("description"))
        );
    }

    #[test]
    fn test_steps_shape() {
        let text = r#"{"title": "Soup", "description": "", "steps": {"type": "action"}}"#;
        assert!(matches!(
            import_recipe(text, &importer()),
            Err(ImportError::WrongShape { .. })
        ));

        let text = r#"{"title": "Soup", "description": "", "steps": []}"#;
        assert_eq!(import_recipe(text, &importer()), Err(ImportError::EmptySteps));
    }

    #[test]
    fn test_invalid_step_rejects_whole_recipe() {
        let text = r#"{
            "title": "Soup", "description": "",
            "steps": [
                {"type": "description", "description": "Fine"},
                {"type": "action", "action": "mix", "description": "Stir", "speed": 11}
            ]
        }"#;
        assert_eq!(
            import_recipe(text, &importer()),
            Err(ImportError::InvalidStep {
                position: 2,
                reason: "agitation speed must be between 0 and 10".to_string()
            })
        );
    }

    #[test]
    fn test_step_rules_checked_in_order() {
        let cases = [
            (
                r#"{"type": "action", "action": "", "description": "", "speed": 11, "duration": 0}"#,
                "action kind is required",
            ),
            (
                r#"{"type": "action", "action": "mix", "description": " ", "speed": 11}"#,
                "step description is required",
            ),
            (
                r#"{"type": "action", "action": "mix", "description": "Stir", "speed": 11, "duration": 0}"#,
                "agitation speed must be between 0 and 10",
            ),
            (
                r#"{"type": "action", "action": "mix", "description": "Stir", "duration": 0,
                    "ingredients": [{"name": "", "amount": "1", "unit": "cups"}]}"#,
                "duration must be greater than 0",
            ),
            (
                r#"{"type": "action", "action": "mix", "description": "Stir",
                    "ingredients": [{"name": "Flour", "amount": "1", "unit": "cups"}]}"#,
                "unit must be one of: g, ml, l, pcs (got \"cups\")",
            ),
        ];

        for (step, expected) in cases {
            let text = format!(
                r#"{{"title": "Soup", "description": "", "steps": [{}]}}"#,
                step
            );
            assert_eq!(
                import_recipe(&text, &importer()),
                Err(ImportError::InvalidStep {
                    position: 1,
                    reason: expected.to_string()
                }),
                "step {}",
                step
            );
        }
    }

    #[test]
    fn test_accepts_legacy_fields() {
        let text = r#"{
            "title": "Kurczak", "description": "Obiad",
            "steps": [
                {"type": "ingredient", "description": "Dodaj kurczaka",
                 "ingredients": [{"name": "Kurczak", "amount": 200, "unit": "g"}]},
                {"type": "action", "action": "siekanie", "description": "Siekaj",
                 "temperature": 100, "bladeSpeed": 3, "duration": 600}
            ]
        }"#;
        let recipe = import_recipe(text, &importer()).unwrap();
        assert_eq!(recipe.author(), &importer());
        assert_eq!(recipe.steps[0].ingredients()[0].amount, "200");
        match &recipe.steps[1].body {
            StepBody::Action(action) => {
                assert_eq!(action.kind, ActionKind::Chop);
                assert_eq!(action.speed, Some(3));
            }
            other => panic!("expected action, got {:?}", other),
        }
    }

    #[test]
    fn test_order_comes_from_position() {
        let text = r#"{
            "title": "Tea", "description": "",
            "steps": [
                {"order": 5, "type": "description", "description": "Boil water"},
                {"order": 2, "type": "description", "description": "Steep"}
            ]
        }"#;
        let recipe = import_recipe(text, &importer()).unwrap();
        let orders: Vec<u32> = recipe.steps.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            import_recipe("{not json", &importer()),
            Err(ImportError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_shopping_list_text() {
        let text = shopping_list_text(&sample_recipe());
        assert_eq!(text, "Milk 500ml\nEgg 3");
    }
}
