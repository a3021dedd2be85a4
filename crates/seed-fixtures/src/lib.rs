//! Reading, normalizing and decoding of Foodies seed fixtures.
//!
//! Fixture exports are JSON arrays of loosely typed documents that use
//! extended-JSON wrappers for identifiers and dates and several historical
//! field spellings. This crate turns them into typed records without knowing
//! anything about the database they end up in.
//!
//! # Overview
//!
//! - [`FixtureDirectory`] loads the six fixture files, failing open.
//! - [`normalize`] unwraps `$oid` and `$date` encodings recursively.
//! - [`FixtureRecord`] decodes normalized values into typed records.
//! - [`IngredientEntry`] names the four recipe ingredient shapes.
//!
//! # Example
//!
//! ```
//! use seed_fixtures::{FixtureRecord, RecipeRecord, Reference};
//! use serde_json::json;
//!
//! let recipe = RecipeRecord::decode(json!({
//!     "title": "Pizza",
//!     "category": "italian",
//!     "area": "ITALY",
//!     "instructions": "Bake.",
//!     "ingredients": ["cheese"]
//! }))
//! .expect("valid recipe");
//!
//! assert_eq!(recipe.category, Reference::Name("italian".to_owned()));
//! assert_eq!(recipe.ingredients.len(), 1);
//! ```

mod error;
mod ingredient;
mod object_id;
mod reader;
mod records;
mod value;

pub use error::{NormalizeError, ObjectIdError, RecordError};
pub use ingredient::{
    DEFAULT_MEASURE, IngredientEntry, IngredientKey, RecipeIngredient, canonical_ingredients,
};
pub use object_id::{OBJECT_ID_LEN, ObjectId};
pub use reader::{FixtureDirectory, FixtureSet, FixtureSource, InlineFixtures, parse_records};
pub use records::{
    AreaRecord, CategoryRecord, DEFAULT_INSTRUCTIONS, FixtureRecord, IngredientRecord, RecipeRecord, Reference,
    TestimonialRecord, UserRecord,
};
pub use value::{FixtureValue, normalize, normalize_value};
