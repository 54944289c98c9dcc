//! Canonical rule and subagent definitions.
//!
//! An entity is built either directly with [`CanonicalEntity::new`] and the
//! `with_*` builders, or from parsed front matter with
//! [`CanonicalEntity::from_front_matter`]. Both paths enforce the same
//! invariants: a non-empty name, a non-empty body, and a target set that is
//! never empty.

use crate::error::EntityError;
use rulesync_frontmatter::{value_kind, Mapping, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target list entry meaning "every registered target".
pub const WILDCARD: &str = "*";

/// What kind of canonical definition an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Rule,
    Subagent,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Rule, EntityKind::Subagent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Subagent => "subagent",
        }
    }

    /// Plural feature name used on the command line and in config files.
    pub fn feature(&self) -> &'static str {
        match self {
            Self::Rule => "rules",
            Self::Subagent => "subagents",
        }
    }

    /// Parses a feature name (`rules`, `subagents`, singular forms accepted).
    pub fn parse_feature(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("rules") || s.eq_ignore_ascii_case("rule") {
            Some(Self::Rule)
        } else if s.eq_ignore_ascii_case("subagents") || s.eq_ignore_ascii_case("subagent") {
            Some(Self::Subagent)
        } else {
            None
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of targets an entity applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Targets {
    /// Every registered target (`"*"`).
    #[default]
    All,
    /// Only the listed identifiers, in authored order, without duplicates.
    Only(Vec<String>),
}

impl Targets {
    /// Builds a target set from authored identifiers.
    ///
    /// An empty list, or a list containing the wildcard anywhere, means all
    /// targets.
    ///
    /// ```
    /// use rulesync_projection::Targets;
    ///
    /// assert_eq!(Targets::from_ids(["claudecode", "*"]), Targets::All);
    /// assert!(Targets::from_ids(["copilot"]).applies_to("copilot"));
    /// assert!(!Targets::from_ids(["copilot"]).applies_to("opencode"));
    /// ```
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut only: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id == WILDCARD {
                return Self::All;
            }
            if !id.is_empty() && !only.iter().any(|existing| existing == id) {
                only.push(id.to_string());
            }
        }
        if only.is_empty() {
            Self::All
        } else {
            Self::Only(only)
        }
    }

    pub fn applies_to(&self, target_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(ids) => ids.iter().any(|id| id == target_id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// One canonical rule or subagent.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEntity {
    kind: EntityKind,
    name: String,
    description: String,
    targets: Targets,
    globs: Vec<String>,
    body: String,
    /// Non-canonical top-level keys, in authored order.
    extensions: Mapping,
}

impl CanonicalEntity {
    /// Creates an entity applying to all targets, with no description,
    /// globs, or extensions.
    pub fn new(
        kind: EntityKind,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, EntityError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(EntityError::EmptyName { kind });
        }
        let body = body.into();
        if body.trim().is_empty() {
            return Err(EntityError::EmptyBody { kind, name });
        }
        Ok(Self {
            kind,
            name,
            description: String::new(),
            targets: Targets::All,
            globs: Vec::new(),
            body,
            extensions: Mapping::new(),
        })
    }

    /// Builds an entity from a parsed front matter block and body.
    ///
    /// `fallback_name` is used when the front matter carries no `name`
    /// (rules are usually named after their file). The canonical keys are
    /// `name`, `description`, `targets` and `globs`; every other top-level key
    /// becomes an extension entry with its value kept exactly as authored.
    pub fn from_front_matter(
        kind: EntityKind,
        fallback_name: &str,
        front_matter: Mapping,
        body: impl Into<String>,
    ) -> Result<Self, EntityError> {
        let mut name = None;
        let mut description = None;
        let mut targets = Targets::All;
        let mut globs = Vec::new();
        let mut extensions = Mapping::new();

        for (key, value) in front_matter {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(EntityError::NonStringKey {
                        found: value_kind(&other),
                    })
                }
            };
            match key.as_str() {
                "name" => name = optional_string(&key, value)?,
                "description" => description = optional_string(&key, value)?,
                "targets" => targets = Targets::from_ids(string_list(&key, value)?),
                "globs" => globs = string_list(&key, value)?,
                _ => {
                    extensions.insert(Value::String(key), value);
                }
            }
        }

        let name = name.unwrap_or_else(|| fallback_name.to_string());
        let mut entity = Self::new(kind, name, body)?;
        entity.description = description.unwrap_or_default();
        entity.targets = targets;
        entity.globs = globs;
        entity.extensions = extensions;
        Ok(entity)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.globs = globs.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches the sub-document for one target, replacing any previous one.
    pub fn with_extension(mut self, target_id: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(Value::String(target_id.into()), value);
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The authored sub-document for `target_id`, if any.
    pub fn extension(&self, target_id: &str) -> Option<&Value> {
        self.extensions.get(target_id)
    }

    /// All authored target sections, keyed by target id.
    pub fn extensions(&self) -> &Mapping {
        &self.extensions
    }

    /// Whether this entity should be projected for `target_id`.
    pub fn applies_to(&self, target_id: &str) -> bool {
        self.targets.applies_to(target_id)
    }
}

fn optional_string(field: &str, value: Value) -> Result<Option<String>, EntityError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(EntityError::InvalidField {
            field: field.to_string(),
            expected: "a string",
            found: value_kind(&other),
        }),
    }
}

fn string_list(field: &str, value: Value) -> Result<Vec<String>, EntityError> {
    let invalid = |found: &Value| EntityError::InvalidField {
        field: field.to_string(),
        expected: "a string or a list of strings",
        found: value_kind(found),
    };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(invalid(&other)),
            })
            .collect(),
        other => Err(invalid(&other)),
    }
}
