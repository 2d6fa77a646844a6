//! Recipe and step data model.
//!
//! A recipe is an ordered sequence of [`Step`]s. Each step carries a 1-based
//! `order` that always equals its index in the sequence plus one, and a
//! [`StepBody`] that is exactly one of the three step variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Physical preparation actions an action step can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Chop,
    Mix,
    Knead,
    Boil,
    Steam,
    Bake,
    Fry,
}

impl ActionKind {
    pub const ALL: &'static [ActionKind] = &[
        ActionKind::Chop,
        ActionKind::Mix,
        ActionKind::Knead,
        ActionKind::Boil,
        ActionKind::Steam,
        ActionKind::Bake,
        ActionKind::Fry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Chop => "chop",
            ActionKind::Mix => "mix",
            ActionKind::Knead => "knead",
            ActionKind::Boil => "boil",
            ActionKind::Steam => "steam",
            ActionKind::Bake => "bake",
            ActionKind::Fry => "fry",
        }
    }

    /// Parse an action label, case-insensitively.
    ///
    /// Recipes authored in the Polish UI used Polish labels, so those are
    /// accepted as well.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "chop" | "siekanie" => Some(ActionKind::Chop),
            "mix" | "mieszanie" => Some(ActionKind::Mix),
            "knead" | "wyrabianie" => Some(ActionKind::Knead),
            "boil" | "gotowanie" => Some(ActionKind::Boil),
            "steam" | "gotowanie na parze" => Some(ActionKind::Steam),
            "bake" | "pieczenie" => Some(ActionKind::Bake),
            "fry" | "smażenie" => Some(ActionKind::Fry),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units an ingredient amount may be expressed in.
///
/// Amounts without a unit are plain counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    Milliliters,
    #[serde(rename = "l")]
    Liters,
    #[serde(rename = "pcs")]
    Pieces,
}

impl Unit {
    pub const ALL: &'static [Unit] = &[Unit::Grams, Unit::Milliliters, Unit::Liters, Unit::Pieces];

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Milliliters => "ml",
            Unit::Liters => "l",
            Unit::Pieces => "pcs",
        }
    }

    /// Parse a unit symbol or name, case-insensitively.
    /// Returns `None` for anything outside the allowed set.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Unit::Grams),
            "ml" | "milliliter" | "milliliters" => Some(Unit::Milliliters),
            "l" | "liter" | "liters" | "litre" | "litres" => Some(Unit::Liters),
            "pcs" | "pc" | "piece" | "pieces" | "szt" => Some(Unit::Pieces),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A quantified, named item attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    /// Amount as entered; validated entries always hold a positive number.
    pub amount: String,
    pub unit: Option<Unit>,
}

impl IngredientEntry {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: Option<Unit>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit,
        }
    }

    /// The amount as a real number, if it is one.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Identity used for duplicate detection and merging.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub kind: ActionKind,
    pub description: String,
    /// Degrees Celsius.
    pub temperature: Option<i32>,
    /// Agitation speed on a 0-10 scale.
    pub speed: Option<i32>,
    pub duration_secs: Option<u32>,
    pub ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientStep {
    pub description: Option<String>,
    pub ingredients: Vec<IngredientEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionStep {
    pub description: String,
}

/// The variant-specific content of a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepBody {
    Action(ActionStep),
    Ingredient(IngredientStep),
    Description(DescriptionStep),
}

/// Discriminator of [`StepBody`], used in the interchange format and by drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    #[default]
    Action,
    Ingredient,
    Description,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Action => "action",
            StepType::Ingredient => "ingredient",
            StepType::Description => "description",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "action" => Some(StepType::Action),
            "ingredient" => Some(StepType::Ingredient),
            "description" => Some(StepType::Description),
            _ => None,
        }
    }
}

impl StepBody {
    pub fn step_type(&self) -> StepType {
        match self {
            StepBody::Action(_) => StepType::Action,
            StepBody::Ingredient(_) => StepType::Ingredient,
            StepBody::Description(_) => StepType::Description,
        }
    }

    /// True only for action steps that carry a duration.
    pub fn is_timed(&self) -> bool {
        self.duration_secs().is_some()
    }

    pub fn duration_secs(&self) -> Option<u32> {
        match self {
            StepBody::Action(action) => action.duration_secs,
            _ => None,
        }
    }

    /// Ingredient entries attached to this step; empty for description steps.
    pub fn ingredients(&self) -> &[IngredientEntry] {
        match self {
            StepBody::Action(action) => &action.ingredients,
            StepBody::Ingredient(step) => &step.ingredients,
            StepBody::Description(_) => &[],
        }
    }

    pub fn description(&self) -> &str {
        match self {
            StepBody::Action(action) => &action.description,
            StepBody::Ingredient(step) => step.description.as_deref().unwrap_or(""),
            StepBody::Description(step) => &step.description,
        }
    }
}

/// A step positioned within a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position, maintained by whoever owns the sequence.
    pub order: u32,
    pub body: StepBody,
}

impl Step {
    pub fn new(order: u32, body: StepBody) -> Self {
        Self { order, body }
    }

    pub fn is_timed(&self) -> bool {
        self.body.is_timed()
    }

    pub fn ingredients(&self) -> &[IngredientEntry] {
        self.body.ingredients()
    }
}

/// Rewrite every step's `order` to match its position.
pub fn renumber(steps: &mut [Step]) {
    for (idx, step) in steps.iter_mut().enumerate() {
        step.order = idx as u32 + 1;
    }
}

/// Opaque reference to the user who authored a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to a recipe by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub Uuid);

impl RecipeId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecipeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(RecipeId)
    }
}

/// Average star rating and number of votes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

/// Everything about a recipe except its steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    pub title: String,
    pub description: String,
    pub author: AuthorId,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub metadata: RecipeMetadata,
    pub rating: Option<RatingSummary>,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn author(&self) -> &AuthorId {
        &self.metadata.author
    }
}

/// Render a duration the way the recipe views show it, e.g. "5 min 30 s".
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{} min {} s", seconds / 60, seconds % 60)
}
