//! In-progress step being composed by the author.
//!
//! Draft fields hold raw form text; [`crate::validate::validate_draft`]
//! turns a draft into a typed [`StepBody`].

use crate::error::Rejection;
use crate::ingredient_parser::{choose_ingredient_name, parse_quantity};
use crate::types::{IngredientEntry, StepBody, StepType};

/// Raw input for one ingredient entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientInput {
    pub name: String,
    pub amount: String,
    /// Unit symbol or name; empty for unit-less counts.
    pub unit: String,
}

impl IngredientInput {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }

    /// Build input from the authoring form: a free-text name, a catalog
    /// selection, and a single quantity field such as "200g".
    pub fn from_form(custom_name: &str, selected_name: &str, quantity: &str) -> Result<Self, Rejection> {
        let name = choose_ingredient_name(custom_name, selected_name)?;
        let quantity = parse_quantity(quantity)?;
        Ok(Self {
            name,
            amount: quantity.amount,
            unit: quantity.unit.map(|u| u.symbol().to_string()).unwrap_or_default(),
        })
    }
}

/// The step currently being composed, with its pending ingredient list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDraft {
    pub step_type: StepType,
    /// Action label (action steps only).
    pub action: String,
    pub description: String,
    /// Degrees Celsius (action steps only).
    pub temperature: String,
    /// Agitation speed 0-10 (action steps only).
    pub speed: String,
    /// Duration in minutes; stored as seconds once admitted.
    pub duration_minutes: String,
    /// Entries that already passed the ingredient rule.
    pub ingredients: Vec<IngredientEntry>,
}

impl StepDraft {
    pub fn action(action: &str, description: &str) -> Self {
        Self {
            step_type: StepType::Action,
            action: action.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn ingredient(description: &str) -> Self {
        Self {
            step_type: StepType::Ingredient,
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn description(description: &str) -> Self {
        Self {
            step_type: StepType::Description,
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: &str) -> Self {
        self.temperature = temperature.to_string();
        self
    }

    pub fn with_speed(mut self, speed: &str) -> Self {
        self.speed = speed.to_string();
        self
    }

    pub fn with_duration_minutes(mut self, minutes: &str) -> Self {
        self.duration_minutes = minutes.to_string();
        self
    }

    pub fn with_ingredient(mut self, entry: IngredientEntry) -> Self {
        self.ingredients.push(entry);
        self
    }

    /// Load an admitted step back into draft form for editing.
    ///
    /// Seconds are shown as minutes again; durations that are not whole
    /// minutes become fractional minutes so re-admission is lossless.
    pub fn from_step(body: &StepBody) -> Self {
        match body {
            StepBody::Action(action) => Self {
                step_type: StepType::Action,
                action: action.kind.as_str().to_string(),
                description: action.description.clone(),
                temperature: action.temperature.map(|t| t.to_string()).unwrap_or_default(),
                speed: action.speed.map(|s| s.to_string()).unwrap_or_default(),
                duration_minutes: action.duration_secs.map(seconds_to_minutes).unwrap_or_default(),
                ingredients: action.ingredients.clone(),
            },
            StepBody::Ingredient(step) => Self {
                step_type: StepType::Ingredient,
                description: step.description.clone().unwrap_or_default(),
                ingredients: step.ingredients.clone(),
                ..Self::default()
            },
            StepBody::Description(step) => Self {
                step_type: StepType::Description,
                description: step.description.clone(),
                ..Self::default()
            },
        }
    }
}

fn seconds_to_minutes(seconds: u32) -> String {
    if seconds % 60 == 0 {
        (seconds / 60).to_string()
    } else {
        (f64::from(seconds) / 60.0).to_string()
    }
}
