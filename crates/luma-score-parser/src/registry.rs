//! Pattern definitions the parser validates layers against.
//!
//! The parser only reads from a registry through [`PatternRegistry`], so
//! callers can back it with whatever store they own. [`InMemoryRegistry`]
//! is the stock implementation used by the CLI and the tests.

use crate::ast::ArgValue;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Declared type of a pattern argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ArgType {
    /// Supplied through the parenthesised tag expression, never as `key=value`.
    Selection,
    Color,
    Scalar,
}

impl ArgType {
    /// Static check of a parsed value against the declared type. No coercion:
    /// colours must be hex literals and scalars must be numbers. Identifiers
    /// are only accepted where no stricter type applies.
    pub fn accepts(&self, value: &ArgValue) -> bool {
        match self {
            ArgType::Color => matches!(value, ArgValue::Color { .. }),
            ArgType::Scalar => matches!(value, ArgValue::Number { .. }),
            ArgType::Selection => true,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ArgType::Selection => "a selection",
            ArgType::Color => "a color",
            ArgType::Scalar => "a number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDef {
    pub name: String,
    pub arg_type: ArgType,
}

impl ArgDef {
    pub fn new(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self {
            name: name.into(),
            arg_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatternDef {
    pub name: String,
    #[serde(default)]
    pub args: Vec<ArgDef>,
}

impl PatternDef {
    pub fn new(name: impl Into<String>, args: Vec<ArgDef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn arg(&self, name: &str) -> Option<&ArgDef> {
        self.args.iter().find(|arg| arg.name == name)
    }
}

/// Read-only view of the known patterns.
pub trait PatternRegistry {
    fn get(&self, name: &str) -> Option<&PatternDef>;

    /// Registered pattern names, used for "available patterns" hints.
    fn keys(&self) -> Vec<&str>;

    /// Existence check for callers outside the parser. The parser
    /// itself resolves definitions through [`PatternRegistry::get`].
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pattern `{0}` is defined more than once")]
    Duplicate(String),
}

/// Registry backed by a sorted map, so `keys()` is deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    patterns: BTreeMap<String, PatternDef>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_pattern(mut self, def: PatternDef) -> Self {
        self.insert(def);
        self
    }

    /// Insert a definition, returning the one it replaced.
    pub fn insert(&mut self, def: PatternDef) -> Option<PatternDef> {
        self.patterns.insert(def.name.clone(), def)
    }

    /// Load a JSON array of pattern definitions:
    ///
    /// ```text
    /// [{ "name": "pulse", "args": [{ "name": "color", "argType": "Color" }] }]
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let defs: Vec<PatternDef> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for def in defs {
            let name = def.name.clone();
            if registry.insert(def).is_some() {
                return Err(RegistryError::Duplicate(name));
            }
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl FromIterator<PatternDef> for InMemoryRegistry {
    fn from_iter<I: IntoIterator<Item = PatternDef>>(iter: I) -> Self {
        let mut registry = Self::new();
        for def in iter {
            registry.insert(def);
        }
        registry
    }
}

impl PatternRegistry for InMemoryRegistry {
    fn get(&self, name: &str) -> Option<&PatternDef> {
        self.patterns.get(name)
    }

    fn keys(&self) -> Vec<&str> {
        self.patterns.keys().map(String::as_str).collect()
    }
}
