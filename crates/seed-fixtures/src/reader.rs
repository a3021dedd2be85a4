//! Fail-open loading of fixture files.
//!
//! A seed run must be able to proceed when optional fixture files are absent
//! or broken, so every failure here is logged and turned into an empty set.

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde_json::Value;
use tracing::{debug, warn};

/// The named fixture files a seed run reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FixtureSet {
    /// `categories.json`
    Categories,
    /// `areas.json`
    Areas,
    /// `ingredients.json`
    Ingredients,
    /// `users.json`
    Users,
    /// `recipes.json`
    Recipes,
    /// `testimonials.json`
    Testimonials,
}

impl FixtureSet {
    /// Every set in the order a seed run loads them.
    pub const ALL: [Self; 6] = [
        Self::Categories,
        Self::Areas,
        Self::Ingredients,
        Self::Users,
        Self::Recipes,
        Self::Testimonials,
    ];

    /// Short lowercase name of the set.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Areas => "areas",
            Self::Ingredients => "ingredients",
            Self::Users => "users",
            Self::Recipes => "recipes",
            Self::Testimonials => "testimonials",
        }
    }

    /// File name of the set inside a fixture directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for FixtureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that can hand out raw fixture records by set.
pub trait FixtureSource {
    /// Load every raw record of `set`. Never fails; problems yield an empty
    /// sequence.
    fn load(&self, set: FixtureSet) -> Vec<Value>;
}

/// Fixture files read from a directory through a capability handle.
#[derive(Debug)]
pub struct FixtureDirectory {
    root: Utf8PathBuf,
    dir: Option<Dir>,
}

impl FixtureDirectory {
    /// Open `root`. A missing or unreadable directory is logged and behaves
    /// as a directory with no fixture files.
    #[must_use]
    pub fn open(root: &Utf8Path) -> Self {
        let dir = match Dir::open_ambient_dir(root, ambient_authority()) {
            Ok(dir) => Some(dir),
            Err(error) => {
                warn!(path = %root, %error, "fixture directory unavailable; loading empty sets");
                None
            }
        };
        Self {
            root: root.to_path_buf(),
            dir,
        }
    }

    /// Path the directory was opened from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl FixtureSource for FixtureDirectory {
    fn load(&self, set: FixtureSet) -> Vec<Value> {
        let Some(dir) = &self.dir else {
            return Vec::new();
        };
        let file_name = set.file_name();
        match dir.read_to_string(&file_name) {
            Ok(contents) => parse_records(set, &contents),
            Err(error) => {
                warn!(file = %file_name, root = %self.root, %error, "failed to read fixture file");
                Vec::new()
            }
        }
    }
}

/// Fixture sets held in memory, keyed by set.
#[derive(Debug, Clone, Default)]
pub struct InlineFixtures {
    sets: BTreeMap<FixtureSet, Vec<Value>>,
}

impl InlineFixtures {
    /// Create an empty collection; every set loads empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records of `set`.
    #[must_use]
    pub fn with_set(mut self, set: FixtureSet, records: Vec<Value>) -> Self {
        self.sets.insert(set, records);
        self
    }

    /// Replace the records of `set` in place.
    pub fn insert(&mut self, set: FixtureSet, records: Vec<Value>) {
        self.sets.insert(set, records);
    }
}

impl FixtureSource for InlineFixtures {
    fn load(&self, set: FixtureSet) -> Vec<Value> {
        self.sets.get(&set).cloned().unwrap_or_default()
    }
}

/// Parse the contents of a fixture file into its records.
///
/// Invalid JSON or a top level that is not an array is logged and yields an
/// empty sequence.
#[must_use]
pub fn parse_records(set: FixtureSet, contents: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Array(records)) => {
            debug!(file = %set.file_name(), records = records.len(), "parsed fixture file");
            records
        }
        Ok(other) => {
            warn!(
                file = %set.file_name(),
                kind = json_kind(&other),
                "fixture file is not an array"
            );
            Vec::new()
        }
        Err(error) => {
            warn!(file = %set.file_name(), %error, "fixture file is not valid JSON");
            Vec::new()
        }
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
