use thiserror::Error;

/// Why a candidate step or ingredient entry was not admitted.
///
/// The `Display` text is meant to be shown to the author as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("action kind is required")]
    MissingActionKind,

    #[error("unknown action kind: {0}")]
    UnknownActionKind(String),

    #[error("step description is required")]
    EmptyDescription,

    #[error("temperature must be a whole number of degrees")]
    InvalidTemperature,

    #[error("agitation speed must be a whole number")]
    InvalidSpeed,

    #[error("agitation speed must be between 0 and 10")]
    SpeedOutOfRange,

    #[error("duration must be greater than 0")]
    NonPositiveDuration,

    #[error("duration must be a number of minutes")]
    InvalidDuration,

    #[error("an ingredient step needs at least one ingredient")]
    NoIngredients,

    #[error("ingredient name is required")]
    EmptyIngredientName,

    #[error("amount of {name} must be a positive number")]
    InvalidAmount { name: String },

    #[error("unit must be one of: g, ml, l, pcs (got \"{0}\")")]
    UnknownUnit(String),

    #[error("quantity must be a number followed by an optional unit (g, ml, l, pcs)")]
    InvalidQuantity,

    #[error("ingredient {0} has already been added to this step")]
    DuplicateIngredient(String),

    #[error("recipe title is required")]
    EmptyTitle,

    #[error("add at least one step")]
    NoSteps,
}

/// Why an interchange document could not be turned into a recipe.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} must be {expected}")]
    WrongShape {
        field: String,
        expected: &'static str,
    },

    #[error("Field steps must contain at least one step")]
    EmptySteps,

    #[error("Step {position} is invalid: {reason}")]
    InvalidStep { position: usize, reason: String },

    #[error("Invalid rating: {0}")]
    InvalidRating(String),
}

/// Why a recipe could not be written as an interchange document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contract violations on the editor's index-based operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("step index {index} is out of range for {len} steps")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("ingredient index {index} is out of range for {len} pending ingredients")]
    IngredientIndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("cannot play a recipe without steps")]
    EmptyRecipe,
}

/// Failures reported by a recipe persistence backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("User {user} is not the author of this recipe")]
    Unauthorized { user: String },

    #[error("Recipe rejected: {0}")]
    Rejected(String),

    #[error("Search text is required")]
    EmptySearch,

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored recipe is unreadable: {0}")]
    Corrupt(String),
}

impl From<Rejection> for StoreError {
    fn from(rejection: Rejection) -> Self {
        StoreError::Rejected(rejection.to_string())
    }
}

/// Failures reported by an ingredient catalog source.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid catalog data: {0}")]
    InvalidData(#[from] serde_json::Error),
}
