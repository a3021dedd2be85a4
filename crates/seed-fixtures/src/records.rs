//! Typed views over normalized fixture records.
//!
//! Each record type pulls the fields a seed run needs out of a
//! [`FixtureValue`], accepting the alternative field names the fixture exports
//! use (`thumb`/`image`, `img`/`image`, `testimonial`/`text`). Source `_id`
//! values are never read: inserted documents receive fresh identifiers.
//! Text containing a NUL character makes the record malformed.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::RecordError;
use crate::ingredient::{RecipeIngredient, canonical_ingredients};
use crate::object_id::ObjectId;
use crate::reader::FixtureSet;
use crate::value::{FixtureValue, normalize};

/// Instructions recorded for a recipe whose fixture carries none.
pub const DEFAULT_INSTRUCTIONS: &str = "No instructions provided.";

/// Decoding from a raw fixture record.
pub trait FixtureRecord: Sized {
    /// The fixture file the record type is read from.
    const SET: FixtureSet;

    /// Build the record from a normalized object.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when a required field is absent or mistyped.
    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError>;

    /// Normalize `raw` and decode it.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when normalization fails, the record is not an
    /// object, or [`FixtureRecord::from_fixture`] rejects it.
    fn decode(raw: Value) -> Result<Self, RecordError> {
        let value = normalize(raw)?;
        if !matches!(value, FixtureValue::Object(_)) {
            return Err(RecordError::NotAnObject);
        }
        Self::from_fixture(&value)
    }
}

/// A category record: `{"name": "Dessert"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    /// Category name.
    pub name: String,
}

/// An area (cuisine region) record: `{"name": "Italian"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaRecord {
    /// Area name.
    pub name: String,
}

/// An ingredient record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRecord {
    /// Ingredient name.
    pub name: String,
    /// Image URL from `img` or `image`.
    pub image: Option<String>,
    /// Description from `desc` or `description`.
    pub description: Option<String>,
}

/// A user record. Fixture follower lists are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Display name.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// Plaintext password; `None` when absent or blank.
    pub password: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
}

/// A testimonial record; owners are assigned during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestimonialRecord {
    /// Testimonial text from `testimonial` or `text`.
    pub text: String,
}

/// A category or area reference carried by a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// A human-readable name still to be resolved.
    Name(String),
    /// An identifier, passed through unchanged.
    Id(ObjectId),
}

/// A recipe record before reference resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    /// Recipe title.
    pub title: String,
    /// Description, synthesised from the title when blank.
    pub description: String,
    /// Preparation steps; [`DEFAULT_INSTRUCTIONS`] when blank.
    pub instructions: String,
    /// Image URL from `thumb` or `image`.
    pub image: Option<String>,
    /// Cooking time in minutes from `time` or `cookingTime`.
    pub cooking_time: Option<i64>,
    /// Category reference.
    pub category: Reference,
    /// Area reference.
    pub area: Reference,
    /// Ingredients in stored form, in fixture order.
    pub ingredients: Vec<RecipeIngredient>,
    /// Ingredient entries whose shape was not recognised.
    pub dropped_ingredients: usize,
    /// Creation timestamp carried by the fixture, if any.
    pub created_at: Option<DateTime<Utc>>,
}

impl FixtureRecord for CategoryRecord {
    const SET: FixtureSet = FixtureSet::Categories;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        Ok(Self {
            name: required_text(value, "name")?,
        })
    }
}

impl FixtureRecord for AreaRecord {
    const SET: FixtureSet = FixtureSet::Areas;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        Ok(Self {
            name: required_text(value, "name")?,
        })
    }
}

impl FixtureRecord for IngredientRecord {
    const SET: FixtureSet = FixtureSet::Ingredients;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        Ok(Self {
            name: required_text(value, "name")?,
            image: first_text(value, &["img", "image"])?,
            description: first_text(value, &["desc", "description"])?,
        })
    }
}

impl FixtureRecord for UserRecord {
    const SET: FixtureSet = FixtureSet::Users;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        Ok(Self {
            name: required_text(value, "name")?,
            email: required_text(value, "email")?,
            password: optional_text(value, "password")?,
            avatar: optional_text(value, "avatar")?,
        })
    }
}

impl FixtureRecord for TestimonialRecord {
    const SET: FixtureSet = FixtureSet::Testimonials;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        let text = first_text(value, &["testimonial", "text"])?
            .ok_or_else(|| RecordError::missing("testimonial"))?;
        Ok(Self { text })
    }
}

impl FixtureRecord for RecipeRecord {
    const SET: FixtureSet = FixtureSet::Recipes;

    fn from_fixture(value: &FixtureValue) -> Result<Self, RecordError> {
        let title = required_text(value, "title")?;
        let description = optional_text(value, "description")?
            .unwrap_or_else(|| format!("A delicious {} recipe.", title.to_lowercase()));
        let instructions = optional_text(value, "instructions")?
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_owned());
        let (ingredients, dropped_ingredients) = match value.get("ingredients") {
            None | Some(FixtureValue::Null) => (Vec::new(), 0),
            Some(FixtureValue::Array(items)) => canonical_ingredients(items),
            Some(_) => return Err(RecordError::unexpected("ingredients")),
        };
        Ok(Self {
            description,
            instructions,
            image: first_text(value, &["thumb", "image"])?,
            cooking_time: cooking_time(value),
            category: reference(value, "category")?,
            area: reference(value, "area")?,
            ingredients,
            dropped_ingredients,
            created_at: match value.get("createdAt") {
                Some(FixtureValue::DateTime(at)) => Some(*at),
                _ => None,
            },
            title,
        })
    }
}

fn required_text(value: &FixtureValue, field: &'static str) -> Result<String, RecordError> {
    match value.get(field) {
        Some(FixtureValue::String(text)) if !text.trim().is_empty() => {
            without_nul(text.trim(), field)
        }
        None | Some(FixtureValue::Null | FixtureValue::String(_)) => {
            Err(RecordError::missing(field))
        }
        Some(_) => Err(RecordError::unexpected(field)),
    }
}

fn optional_text(
    value: &FixtureValue,
    field: &'static str,
) -> Result<Option<String>, RecordError> {
    value
        .get(field)
        .and_then(FixtureValue::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| without_nul(text, field))
        .transpose()
}

fn first_text(
    value: &FixtureValue,
    fields: &[&'static str],
) -> Result<Option<String>, RecordError> {
    for field in fields {
        if let Some(text) = optional_text(value, field)? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

fn without_nul(text: &str, field: &'static str) -> Result<String, RecordError> {
    if text.contains('\0') {
        return Err(RecordError::nul(field));
    }
    Ok(text.to_owned())
}

fn reference(value: &FixtureValue, field: &'static str) -> Result<Reference, RecordError> {
    match value.get(field) {
        Some(FixtureValue::ObjectId(id)) => Ok(Reference::Id(*id)),
        Some(FixtureValue::String(name)) if !name.trim().is_empty() => {
            without_nul(name.trim(), field).map(Reference::Name)
        }
        None | Some(FixtureValue::Null | FixtureValue::String(_)) => {
            Err(RecordError::missing(field))
        }
        Some(_) => Err(RecordError::unexpected(field)),
    }
}

/// Minutes from `time` ("45 min", 45) or, failing that, `cookingTime`.
fn cooking_time(value: &FixtureValue) -> Option<i64> {
    ["time", "cookingTime"]
        .iter()
        .find_map(|field| value.get(field).and_then(leading_integer))
}

fn leading_integer(value: &FixtureValue) -> Option<i64> {
    match value {
        FixtureValue::Number(number) => number.as_i64(),
        FixtureValue::String(text) => {
            let trimmed = text.trim_start();
            let (sign, digits_from) = match trimmed.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, trimmed),
            };
            let digits: String = digits_from.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}
