//! Target schemas and the registry that holds them.
//!
//! A [`TargetSchema`] describes, per entity kind, where a target expects its
//! files and how canonical fields map onto the target's front matter. The
//! mapping is data: an ordered list of [`FieldRule`]s interpreted by the
//! projection engine.

use crate::entity::{EntityKind, WILDCARD};
use crate::error::RegistryError;
use crate::targets;
use regex::Regex;
use rulesync_frontmatter::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder substituted with the sanitized entity name in path templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

static TARGET_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid regex"));

/// Canonical entity fields a copy rule can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Name,
    Description,
    /// Globs as a YAML sequence. Emits nothing when no globs are authored.
    Globs,
    /// Globs joined with `,` into one string. Emits nothing when empty.
    GlobsJoined,
}

/// One step of front matter construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Copy a canonical field to the output under a fixed name.
    Copy { from: CanonicalField, to: String },
    /// Copy every key of `extensions[target_id]` verbatim.
    PassThrough,
    /// Emit `field: value` only if nothing upstream supplies `field`.
    Default { field: String, value: Value },
}

impl FieldRule {
    pub fn copy(from: CanonicalField, to: impl Into<String>) -> Self {
        Self::Copy { from, to: to.into() }
    }

    pub fn default_value(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Default {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// How the canonical body is carried into a target document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BodyTemplate {
    #[default]
    Verbatim,
    /// Template with `{{name}}`, `{{description}}` and `{{body}}` placeholders.
    Wrap(String),
}

/// Projection rules for one entity kind on one target.
#[derive(Debug, Clone, PartialEq)]
pub struct KindSchema {
    pub path_template: String,
    pub fields: Vec<FieldRule>,
    pub body: BodyTemplate,
}

impl KindSchema {
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
            fields: Vec::new(),
            body: BodyTemplate::Verbatim,
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn wrap_body(mut self, template: impl Into<String>) -> Self {
        self.body = BodyTemplate::Wrap(template.into());
        self
    }

    /// Whether the rule list includes a pass-through step.
    pub fn passes_through(&self) -> bool {
        self.fields
            .iter()
            .any(|rule| matches!(rule, FieldRule::PassThrough))
    }
}

/// Everything the engine needs to know about one target tool.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSchema {
    pub id: String,
    pub rule: KindSchema,
    pub subagent: KindSchema,
}

impl TargetSchema {
    pub fn new(id: impl Into<String>, rule: KindSchema, subagent: KindSchema) -> Self {
        Self {
            id: id.into(),
            rule,
            subagent,
        }
    }

    pub fn for_kind(&self, kind: EntityKind) -> &KindSchema {
        match kind {
            EntityKind::Rule => &self.rule,
            EntityKind::Subagent => &self.subagent,
        }
    }
}

/// Read-only lookup of target schemas by identifier.
///
/// Built once at startup; iteration follows registration order.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    schemas: Vec<TargetSchema>,
    index: HashMap<String, usize>,
}

impl TargetRegistry {
    /// Registers schemas in order, rejecting repeated or malformed entries.
    pub fn from_schemas<I>(schemas: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = TargetSchema>,
    {
        let mut registry = Self {
            schemas: Vec::new(),
            index: HashMap::new(),
        };
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// The compiled-in set of supported targets.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_schemas(targets::builtin_schemas())
    }

    fn register(&mut self, schema: TargetSchema) -> Result<(), RegistryError> {
        let id = schema.id.trim().to_string();
        if id == WILDCARD || !TARGET_ID_REGEX.is_match(&id) {
            return Err(RegistryError::InvalidTargetId(id));
        }
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateTargetId(id));
        }
        for kind in EntityKind::ALL {
            let template = &schema.for_kind(kind).path_template;
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(RegistryError::InvalidPathTemplate {
                    target: id,
                    kind,
                    template: template.clone(),
                });
            }
        }

        tracing::trace!(target_id = %id, "registered target schema");
        self.index.insert(id.clone(), self.schemas.len());
        self.schemas.push(TargetSchema { id, ..schema });
        Ok(())
    }

    pub fn schema_for(&self, target_id: &str) -> Option<&TargetSchema> {
        self.index.get(target_id).map(|&i| &self.schemas[i])
    }

    pub fn contains(&self, target_id: &str) -> bool {
        self.index.contains_key(target_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.id.as_str())
    }

    pub fn schemas(&self) -> &[TargetSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
