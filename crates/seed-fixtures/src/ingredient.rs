//! Recipe ingredient entries in their historical fixture shapes.
//!
//! Fixture recipes list ingredients in four shapes. [`IngredientEntry`] names
//! each one and [`IngredientEntry::canonical`] maps every variant onto the
//! stored `{ingredientRef, name, measure}` form. Text holding a NUL character
//! is never recognised, so such entries are dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::object_id::ObjectId;
use crate::value::FixtureValue;

/// Measure recorded when an entry does not specify one.
pub const DEFAULT_MEASURE: &str = "1 unit";

const DERIVED_NAME_SUFFIX_LEN: usize = 6;

/// Reference to an ingredient: a resolved identifier or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientKey {
    /// Identifier of an ingredient document.
    Id(ObjectId),
    /// Free-text ingredient name with no matching document.
    Text(String),
}

impl IngredientKey {
    /// Classify a string: 24 hex characters become an identifier.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        ObjectId::parse_str(text).map_or_else(|_| Self::Text(text.to_owned()), Self::Id)
    }

    fn from_value(value: &FixtureValue) -> Option<Self> {
        match value {
            FixtureValue::ObjectId(id) => Some(Self::Id(*id)),
            FixtureValue::String(text) if usable(text) => Some(Self::from_text(text)),
            FixtureValue::Number(number) => Some(Self::Text(number.to_string())),
            _ => None,
        }
    }

    /// The trailing characters of the rendered key.
    fn suffix(&self) -> String {
        let rendered = self.to_string();
        let mut tail: Vec<char> = rendered.chars().rev().take(DERIVED_NAME_SUFFIX_LEN).collect();
        tail.reverse();
        tail.into_iter().collect()
    }
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// The stored form of one recipe ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    /// Ingredient identifier or free-text name.
    pub ingredient_ref: IngredientKey,
    /// Display name.
    pub name: String,
    /// Quantity text, never empty.
    pub measure: String,
}

/// One ingredient entry as it appears in a fixture recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientEntry {
    /// A bare ingredient name: `"cheese"`.
    Plain(String),
    /// An identifier with an optional measure: `{"id": ..., "measure": "2 tbs"}`.
    ById {
        /// Referenced ingredient.
        id: IngredientKey,
        /// Quantity, if given.
        measure: Option<String>,
    },
    /// A named entry: `{"name": "Salt", "measure": "1 tsp"}` or with
    /// `quantity` instead of `measure`.
    ByName {
        /// Ingredient name.
        name: String,
        /// Quantity, if given.
        measure: Option<String>,
    },
    /// An entry already in stored form: `{"ingredient": ..., "name": ...,
    /// "measure": ...}`.
    Canonical {
        /// Referenced ingredient.
        ingredient: IngredientKey,
        /// Display name, if given.
        name: Option<String>,
        /// Quantity, if given.
        measure: Option<String>,
    },
}

impl IngredientEntry {
    /// Recognise the shape of a normalized entry.
    ///
    /// Returns `None` for shapes outside the four known variants; callers
    /// drop those entries and count them.
    #[must_use]
    pub fn from_value(value: &FixtureValue) -> Option<Self> {
        match value {
            FixtureValue::String(text) if usable(text) => Some(Self::Plain(text.trim().to_owned())),
            FixtureValue::Object(_) => Self::from_object(value),
            _ => None,
        }
    }

    fn from_object(value: &FixtureValue) -> Option<Self> {
        let measure = || text_field(value, "measure");
        if let Some(id) = value.get("id").and_then(IngredientKey::from_value) {
            return Some(Self::ById {
                id,
                measure: measure(),
            });
        }
        if let Some(ingredient) = value.get("ingredient").and_then(IngredientKey::from_value) {
            return Some(Self::Canonical {
                ingredient,
                name: text_field(value, "name"),
                measure: measure(),
            });
        }
        text_field(value, "name").map(|name| Self::ByName {
            name,
            measure: measure().or_else(|| text_field(value, "quantity")),
        })
    }

    /// Map the entry to its stored form.
    ///
    /// # Examples
    ///
    /// ```
    /// use seed_fixtures::{IngredientEntry, IngredientKey};
    ///
    /// let stored = IngredientEntry::Plain("cheese".to_owned()).canonical();
    /// assert_eq!(stored.ingredient_ref, IngredientKey::Text("cheese".to_owned()));
    /// assert_eq!(stored.measure, "1 unit");
    /// ```
    #[must_use]
    pub fn canonical(self) -> RecipeIngredient {
        match self {
            Self::Plain(name) => RecipeIngredient {
                ingredient_ref: IngredientKey::Text(name.clone()),
                name,
                measure: DEFAULT_MEASURE.to_owned(),
            },
            Self::ById { id, measure } => RecipeIngredient {
                name: format!("Ingredient {}", id.suffix()),
                ingredient_ref: id,
                measure: measure_or_default(measure),
            },
            Self::ByName { name, measure } => RecipeIngredient {
                ingredient_ref: IngredientKey::Text(name.clone()),
                name,
                measure: measure_or_default(measure),
            },
            Self::Canonical {
                ingredient,
                name,
                measure,
            } => RecipeIngredient {
                name: name.unwrap_or_else(|| ingredient.to_string()),
                ingredient_ref: ingredient,
                measure: measure_or_default(measure),
            },
        }
    }
}

fn measure_or_default(measure: Option<String>) -> String {
    measure.unwrap_or_else(|| DEFAULT_MEASURE.to_owned())
}

fn usable(text: &str) -> bool {
    !text.trim().is_empty() && !text.contains('\0')
}

/// Read a field as trimmed, non-empty text; numbers are rendered.
fn text_field(value: &FixtureValue, key: &str) -> Option<String> {
    match value.get(key)? {
        FixtureValue::String(text) => usable(text).then(|| text.trim().to_owned()),
        FixtureValue::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Decode an ingredient list, returning the stored entries and the number of
/// unrecognised entries that were dropped.
#[must_use]
pub fn canonical_ingredients(values: &[FixtureValue]) -> (Vec<RecipeIngredient>, usize) {
    let mut dropped = 0;
    let entries = values
        .iter()
        .filter_map(|value| {
            let entry = IngredientEntry::from_value(value);
            if entry.is_none() {
                dropped += 1;
            }
            entry
        })
        .map(IngredientEntry::canonical)
        .collect();
    (entries, dropped)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::value::normalize;

    const HEX: &str = "64b1f0a2c3d4e5f601234567";

    fn entry(raw: Value) -> Option<IngredientEntry> {
        IngredientEntry::from_value(&normalize(raw).expect("normalizes"))
    }

    fn hex_id() -> IngredientKey {
        IngredientKey::Id(ObjectId::parse_str(HEX).expect("valid id"))
    }

    #[rstest]
    #[case(json!("cheese"), "cheese", IngredientKey::Text("cheese".to_owned()), "1 unit")]
    #[case(json!({"id": HEX, "measure": "2 tbs"}), "Ingredient 234567", hex_id(), "2 tbs")]
    #[case(json!({"id": {"$oid": HEX}}), "Ingredient 234567", hex_id(), "1 unit")]
    #[case(
        json!({"id": "tomato-01"}),
        "Ingredient ato-01",
        IngredientKey::Text("tomato-01".to_owned()),
        "1 unit"
    )]
    #[case(
        json!({"name": "Salt", "quantity": "pinch"}),
        "Salt",
        IngredientKey::Text("Salt".to_owned()),
        "pinch"
    )]
    #[case(
        json!({"name": "Salt", "measure": "", "quantity": 2}),
        "Salt",
        IngredientKey::Text("Salt".to_owned()),
        "2"
    )]
    #[case(json!({"ingredient": HEX, "name": "Flour", "measure": "1 cup"}), "Flour", hex_id(), "1 cup")]
    #[case(
        json!({"ingredient": "flour"}),
        "flour",
        IngredientKey::Text("flour".to_owned()),
        "1 unit"
    )]
    fn every_shape_maps_to_a_named_measured_entry(
        #[case] raw: Value,
        #[case] name: &str,
        #[case] reference: IngredientKey,
        #[case] measure: &str,
    ) {
        let stored = entry(raw).expect("recognised shape").canonical();
        assert_eq!(stored.name, name);
        assert_eq!(stored.ingredient_ref, reference);
        assert_eq!(stored.measure, measure);
        assert!(!stored.measure.is_empty());
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(42))]
    #[case(json!("   "))]
    #[case(json!({"measure": "2 cups"}))]
    #[case(json!({"id": "", "name": ""}))]
    #[case(json!([["cheese"]]))]
    fn unknown_shapes_are_not_recognised(#[case] raw: Value) {
        assert_eq!(entry(raw), None);
    }

    #[rstest]
    fn canonical_entries_take_precedence_over_names() {
        let recognised = entry(json!({"ingredient": HEX, "name": "Flour"}));
        assert!(matches!(recognised, Some(IngredientEntry::Canonical { .. })));
    }

    #[rstest]
    fn identifiers_take_precedence_over_canonical_keys() {
        let recognised = entry(json!({"id": HEX, "ingredient": "flour"}));
        assert_eq!(
            recognised,
            Some(IngredientEntry::ById {
                id: hex_id(),
                measure: None,
            })
        );
    }

    #[rstest]
    fn entries_with_nul_characters_are_dropped() {
        let values = normalize(json!([
            "ch\u{0}eese",
            {"name": "Sa\u{0}lt"},
            {"ingredient": "fl\u{0}our"},
            "egg"
        ]))
        .expect("normalizes");
        let (entries, dropped) =
            canonical_ingredients(values.as_array().expect("array of entries"));

        assert_eq!(dropped, 3);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["egg"]);
    }

    #[rstest]
    fn nul_measures_fall_back_to_the_default() {
        let stored = entry(json!({"name": "Salt", "measure": "a\u{0}b"}))
            .expect("recognised shape")
            .canonical();
        assert_eq!(stored.measure, DEFAULT_MEASURE);
    }

    #[rstest]
    fn canonical_ingredients_counts_dropped_entries() {
        let values = normalize(json!(["egg", {"unknown": true}, {"name": "Milk"}, 7]))
            .expect("normalizes");
        let (entries, dropped) =
            canonical_ingredients(values.as_array().expect("array of entries"));

        assert_eq!(dropped, 2);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["egg", "Milk"]);
    }

    #[rstest]
    fn stored_form_serializes_in_camel_case() {
        let stored = IngredientEntry::Plain("cheese".to_owned()).canonical();
        assert_eq!(
            serde_json::to_value(stored).expect("serialize"),
            json!({"ingredientRef": "cheese", "name": "cheese", "measure": "1 unit"})
        );
    }
}
