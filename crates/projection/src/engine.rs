//! Projection of canonical entities into target documents.

use crate::entity::{CanonicalEntity, EntityKind};
use crate::error::ProjectionError;
use crate::registry::{BodyTemplate, CanonicalField, FieldRule, KindSchema, TargetRegistry};
use rulesync_frontmatter::{render_document, value_kind, FrontmatterError, Mapping, Value};
use tracing::{debug, warn};

/// Output of projecting one entity for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDocument {
    target: String,
    kind: EntityKind,
    name: String,
    front_matter: Mapping,
    body: String,
}

impl TargetDocument {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Name of the entity this document was projected from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn front_matter(&self) -> &Mapping {
        &self.front_matter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Front matter block followed by the body, as written to disk.
    pub fn render(&self) -> Result<String, FrontmatterError> {
        render_document(&self.front_matter, &self.body)
    }
}

/// Maps entities onto targets using the schemas of a registry.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine<'r> {
    registry: &'r TargetRegistry,
}

impl<'r> ProjectionEngine<'r> {
    pub fn new(registry: &'r TargetRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r TargetRegistry {
        self.registry
    }

    /// Projects `entity` for `target_id`.
    ///
    /// Returns `Ok(None)` when the entity does not list the target. An
    /// applicable entity for an unregistered target is
    /// [`ProjectionError::UnknownTarget`].
    pub fn project(
        &self,
        entity: &CanonicalEntity,
        target_id: &str,
    ) -> Result<Option<TargetDocument>, ProjectionError> {
        if !entity.applies_to(target_id) {
            debug!(
                kind = %entity.kind(),
                name = entity.name(),
                target_id,
                "entity not applicable to target"
            );
            return Ok(None);
        }

        let schema = self
            .registry
            .schema_for(target_id)
            .ok_or_else(|| ProjectionError::unknown_target(target_id))?;
        let kind_schema = schema.for_kind(entity.kind());

        let front_matter = build_front_matter(entity, target_id, kind_schema);
        let body = match &kind_schema.body {
            BodyTemplate::Verbatim => entity.body().to_string(),
            BodyTemplate::Wrap(template) => fill_body_template(template, entity),
        };

        debug!(
            kind = %entity.kind(),
            name = entity.name(),
            target_id,
            fields = front_matter.len(),
            "projected entity"
        );

        Ok(Some(TargetDocument {
            target: schema.id.clone(),
            kind: entity.kind(),
            name: entity.name().to_string(),
            front_matter,
            body,
        }))
    }
}

fn build_front_matter(entity: &CanonicalEntity, target_id: &str, schema: &KindSchema) -> Mapping {
    let extension = authored_extension(entity, target_id);
    let passes_through = schema.passes_through();
    let mut front = Mapping::new();

    for rule in &schema.fields {
        match rule {
            FieldRule::Copy { from, to } => {
                if let Some(value) = canonical_value(entity, *from) {
                    front.insert(Value::String(to.clone()), value);
                }
            }
            FieldRule::PassThrough => {
                if let Some(extension) = extension {
                    for (key, value) in extension {
                        front.insert(key.clone(), value.clone());
                    }
                }
            }
            FieldRule::Default { field, value } => {
                let authored = passes_through
                    && extension.is_some_and(|ext| ext.contains_key(field.as_str()));
                if !authored && !front.contains_key(field.as_str()) {
                    front.insert(Value::String(field.clone()), value.clone());
                }
            }
        }
    }

    front
}

/// The entity's sub-document for `target_id` when it is a mapping.
fn authored_extension<'e>(entity: &'e CanonicalEntity, target_id: &str) -> Option<&'e Mapping> {
    match entity.extension(target_id)? {
        Value::Mapping(mapping) => Some(mapping),
        Value::Null => None,
        other => {
            warn!(
                name = entity.name(),
                target_id,
                found = value_kind(other),
                "ignoring target section that is not a mapping"
            );
            None
        }
    }
}

fn canonical_value(entity: &CanonicalEntity, field: CanonicalField) -> Option<Value> {
    match field {
        CanonicalField::Name => Some(Value::String(entity.name().to_string())),
        CanonicalField::Description => Some(Value::String(entity.description().to_string())),
        CanonicalField::Globs if entity.globs().is_empty() => None,
        CanonicalField::Globs => Some(Value::Sequence(
            entity.globs().iter().cloned().map(Value::String).collect(),
        )),
        CanonicalField::GlobsJoined if entity.globs().is_empty() => None,
        CanonicalField::GlobsJoined => Some(Value::String(entity.globs().join(","))),
    }
}

/// Substitutes `{{name}}`, `{{description}}` and `{{body}}` in one pass, so
/// placeholder text inside substituted values is left alone.
fn fill_body_template(template: &str, entity: &CanonicalEntity) -> String {
    let mut out = String::with_capacity(template.len() + entity.body().len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        match after[..end].trim() {
            "name" => out.push_str(entity.name()),
            "description" => out.push_str(entity.description()),
            "body" => out.push_str(entity.body()),
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
