pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod editor;
pub mod error;
pub mod ingredient_parser;
pub mod interchange;
pub mod playback;
pub mod store;
pub mod types;
pub mod validate;

pub use aggregate::{aggregate, format_amount, AggregatedEntry};
pub use catalog::{Category, IngredientCatalog, StaticCatalog};
pub use config::{ConfigError, LarderConfig};
pub use draft::{IngredientInput, StepDraft};
pub use editor::{MoveDirection, ReinsertPolicy, StepEditor};
pub use error::{
    CatalogError, EditorError, ExportError, ImportError, PlaybackError, Rejection, StoreError,
};
pub use ingredient_parser::{choose_ingredient_name, parse_quantity, Quantity};
pub use interchange::{export_recipe, import_recipe, shopping_list_text};
pub use playback::{Playback, PlaybackClock, PlaybackEvent, PlaybackState, TimerState};
pub use store::{DirStore, InMemoryStore, RecipeStore, RecipeSubmission, StoredRecipe};
pub use types::{
    format_duration, ActionKind, ActionStep, AuthorId, DescriptionStep, IngredientEntry,
    IngredientStep, RatingSummary, Recipe, RecipeId, RecipeMetadata, Step, StepBody, StepType,
    Unit,
};
pub use validate::{validate_draft, validate_step};
