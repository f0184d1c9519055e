//! # Configuration
//!
//! Declarative custom types, loaded from YAML or JSON:
//!
//! ```yaml
//! types:
//!   entity-id:
//!     pattern: '^[a-z_]+\.[a-z0-9_]+$'
//!     message: "entity id should be in the format 'domain.entity'"
//!   severity:
//!     one_of: [info, warning, error]
//!   short-name:
//!     type: string
//!     pattern: '^.{1,16}$'
//! ```
//!
//! Each entry becomes one registry predicate. Checks run in the order
//! base `type`, `pattern`, `one_of`; the first to fail decides the verdict.
//! A base type may name a built-in or any entry declared earlier in the
//! same file.
//!
//! Schema files use the same loaders: [`read_document`] parses either
//! format into a `serde_json::Value`, which converts into a
//! [`Description`](crate::Description).

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use strukt_core::Value;

use crate::error::SchemaError;
use crate::registry::{Predicate, TypeRegistry, Verdict};

/// Root of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StruktConfig {
    /// Custom types in declaration order.
    #[serde(default)]
    pub types: IndexMap<String, TypeSpec>,
}

/// One declared type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeSpec {
    /// A registry type the value must satisfy first.
    #[serde(default, rename = "type")]
    pub base: Option<String>,
    /// A regular expression string values must match.
    #[serde(default)]
    pub pattern: Option<String>,
    /// The accepted values.
    #[serde(default)]
    pub one_of: Option<Vec<serde_json::Value>>,
    /// Reason reported when `pattern` or `one_of` rejects a value.
    #[serde(default)]
    pub message: Option<String>,
}

impl StruktConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(text).map_err(|e| SchemaError::Load {
            origin: "<inline>".to_string(),
            reason: format!("YAML parse error: {e}"),
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|e| SchemaError::Load {
            origin: "<inline>".to_string(),
            reason: format!("JSON parse error: {e}"),
        })
    }

    /// Load a configuration file; `.json` files are parsed as JSON, all
    /// others as YAML.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let document = read_document(path)?;
        let config: StruktConfig =
            serde_json::from_value(document).map_err(|e| SchemaError::Load {
                origin: path.display().to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!(
            path = %path.display(),
            types = config.types.len(),
            "loaded type config"
        );
        Ok(config)
    }

    /// Build the declared types. `base` resolves `type` references that are
    /// not declared in this configuration; it is not copied into the result.
    pub fn registry(&self, base: &TypeRegistry) -> Result<TypeRegistry, SchemaError> {
        let mut scope = base.clone();
        let mut declared = TypeRegistry::empty();
        for (name, spec) in &self.types {
            let predicate = spec.predicate(name, &scope)?;
            scope.register_predicate(name.clone(), predicate.clone());
            declared.register_predicate(name.clone(), predicate);
        }
        Ok(declared)
    }
}

impl TypeSpec {
    /// Compile this entry into a predicate, resolving the base type in
    /// `scope`.
    pub fn predicate(&self, name: &str, scope: &TypeRegistry) -> Result<Predicate, SchemaError> {
        if self.base.is_none() && self.pattern.is_none() && self.one_of.is_none() {
            return Err(SchemaError::InvalidConfig {
                name: name.to_string(),
                reason: "declares none of `type`, `pattern`, `one_of`".to_string(),
            });
        }
        let base = match &self.base {
            Some(base) => Some(
                scope
                    .get(base)
                    .cloned()
                    .ok_or_else(|| SchemaError::InvalidType(base.clone()))?,
            ),
            None => None,
        };
        let pattern = match &self.pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                name: name.to_string(),
                source,
            })?),
            None => None,
        };
        let one_of: Option<Vec<Value>> = self
            .one_of
            .as_ref()
            .map(|values| values.iter().map(Value::from).collect());

        let name = name.to_string();
        let message = self.message.clone();
        let predicate: Predicate = Arc::new(move |value: &Value, parent: Option<&Value>| {
            if let Some(base) = &base {
                let verdict = base(value, parent);
                if !verdict.is_pass() {
                    return verdict;
                }
            }
            if let Some(pattern) = &pattern {
                let Some(text) = value.as_str() else {
                    return Verdict::Reason(format!("{name} should be a string"));
                };
                if !pattern.is_match(text) {
                    return Verdict::Reason(message.clone().unwrap_or_else(|| {
                        format!("{name} should match `{}`", pattern.as_str())
                    }));
                }
            }
            if let Some(values) = &one_of {
                if !values.iter().any(|v| v.same_value_zero(value)) {
                    return Verdict::Reason(message.clone().unwrap_or_else(|| {
                        let listed: Vec<String> = values.iter().map(Value::stringify).collect();
                        format!("{name} should be one of {}", listed.join(", "))
                    }));
                }
            }
            Verdict::Pass
        });
        Ok(predicate)
    }
}

/// Read a JSON or YAML document: `.json` files are parsed as JSON, all
/// others as YAML.
pub fn read_document(path: &Path) -> Result<serde_json::Value, SchemaError> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
        origin: origin.clone(),
        reason: e.to_string(),
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).map_err(|e| SchemaError::Load {
            origin,
            reason: format!("JSON parse error: {e}"),
        })
    } else {
        serde_yaml::from_str(&content).map_err(|e| SchemaError::Load {
            origin,
            reason: format!("YAML parse error: {e}"),
        })
    }
}
