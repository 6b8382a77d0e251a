//! Catalog domain types
//!
//! Minimal models for catalog entities and locations. Only the fields the
//! tools need are typed; everything else rides along in `spec`/`rest` so
//! round-tripping never drops data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A catalog entity (component, API, resource, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMeta,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,
}

/// Entity metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub annotations: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Entity {
    /// The entity's reference in `kind:namespace/name` form.
    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            kind: self.kind.to_lowercase(),
            namespace: self
                .metadata
                .namespace
                .clone()
                .unwrap_or_else(|| EntityRef::DEFAULT_NAMESPACE.to_string()),
            name: self.metadata.name.clone(),
        }
    }
}

/// Parsed `kind:namespace/name` entity reference.
///
/// The namespace segment is optional in the textual form and defaults to
/// `default`, matching the catalog's own resolution rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    pub const DEFAULT_NAMESPACE: &'static str = "default";

    /// Parse a textual reference. `kind:name` and `kind:namespace/name`
    /// are both accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let (kind, rest) = raw
            .split_once(':')
            .ok_or_else(|| Error::InvalidRef(raw.to_string()))?;
        if kind.trim().is_empty() || rest.trim().is_empty() {
            return Err(Error::InvalidRef(raw.to_string()));
        }
        let (namespace, name) = match rest.split_once('/') {
            Some((ns, name)) => (ns, name),
            None => (Self::DEFAULT_NAMESPACE, rest),
        };
        if namespace.trim().is_empty() || name.trim().is_empty() {
            return Err(Error::InvalidRef(raw.to_string()));
        }
        Ok(Self {
            kind: kind.to_lowercase(),
            namespace: namespace.to_lowercase(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Query options for entity listing.
#[derive(Debug, Clone, Default)]
pub struct EntityQuery {
    /// `key=value` filter expressions, ANDed together by the catalog
    pub filter: Vec<String>,
    /// Restrict the response to these field paths
    pub fields: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl EntityQuery {
    /// Render the query as URL query pairs.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for f in &self.filter {
            pairs.push(("filter", f.clone()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields", self.fields.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// A registered catalog location (a pointer the catalog ingests from).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(rename = "type")]
    pub location_type: String,
    pub target: String,
}

/// Result of validating an entity body against the catalog's schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entity_ref_parse_full() {
        let r = EntityRef::parse("Component:Team-A/website").unwrap();
        assert_eq!(r.kind, "component");
        assert_eq!(r.namespace, "team-a");
        assert_eq!(r.name, "website");
        assert_eq!(r.to_string(), "component:team-a/website");
    }

    #[test]
    fn test_entity_ref_parse_defaults_namespace() {
        let r = EntityRef::parse("api:payments").unwrap();
        assert_eq!(r.namespace, EntityRef::DEFAULT_NAMESPACE);
        assert_eq!(r.to_string(), "api:default/payments");
    }

    #[test]
    fn test_entity_ref_rejects_malformed() {
        assert!(EntityRef::parse("no-colon").is_err());
        assert!(EntityRef::parse(":name").is_err());
        assert!(EntityRef::parse("kind:").is_err());
        assert!(EntityRef::parse("kind:/name").is_err());
        assert!(EntityRef::parse("kind:ns/").is_err());
    }

    #[test]
    fn test_entity_ref_from_entity() {
        let entity = Entity {
            api_version: "catalog/v1".into(),
            kind: "Component".into(),
            metadata: EntityMeta {
                name: "website".into(),
                namespace: None,
                uid: Some("uid-1".into()),
                description: None,
                annotations: Map::new(),
                tags: vec![],
            },
            spec: serde_json::Value::Null,
        };
        assert_eq!(entity.entity_ref().to_string(), "component:default/website");
    }

    #[test]
    fn test_query_pairs_order_and_contents() {
        let query = EntityQuery {
            filter: vec!["kind=component".into(), "spec.type=service".into()],
            fields: vec!["metadata.name".into(), "kind".into()],
            limit: Some(50),
            offset: None,
        };
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("filter", "kind=component".to_string()),
                ("filter", "spec.type=service".to_string()),
                ("fields", "metadata.name,kind".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_entity_deserializes_catalog_payload() {
        let payload = serde_json::json!({
            "apiVersion": "catalog/v1",
            "kind": "Component",
            "metadata": {
                "name": "website",
                "namespace": "default",
                "uid": "d3adb33f",
                "tags": ["frontend"]
            },
            "spec": { "type": "website", "owner": "team-a" }
        });
        let entity: Entity = serde_json::from_value(payload).unwrap();
        assert_eq!(entity.metadata.name, "website");
        assert_eq!(entity.spec["owner"], "team-a");
    }
}
