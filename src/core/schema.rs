use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::collection::{ResolvedCollection, DEFAULT_COLLECTION};
use crate::engine::SchematicEngine;
use crate::error::{Error, ErrorCode, Result};
use crate::utils::suggest;

/// Value shape of a single schematic option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    #[serde(rename = "string")]
    Str,
    Bool,
    List,
}

/// Declared option of a schematic: shape, default, and flag aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    #[serde(default = "OptionSpec::default_kind")]
    pub kind: OptionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub description: String,
}

impl OptionSpec {
    fn default_kind() -> OptionKind {
        OptionKind::Str
    }

    pub fn string(description: &str) -> Self {
        Self {
            kind: OptionKind::Str,
            default: None,
            aliases: Vec::new(),
            description: description.to_string(),
        }
    }

    pub fn boolean(description: &str, default: bool) -> Self {
        Self {
            kind: OptionKind::Bool,
            default: Some(Value::Bool(default)),
            aliases: Vec::new(),
            description: description.to_string(),
        }
    }

    pub fn list(description: &str) -> Self {
        Self {
            kind: OptionKind::List,
            default: None,
            aliases: Vec::new(),
            description: description.to_string(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }
}

/// A schematic's accepted options, fetched from the engine before the
/// command layer binds user flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionSchema {
    #[serde(default)]
    pub options: BTreeMap<String, OptionSpec>,

    /// Anonymous positional option names, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positionals: Vec<String>,
}

impl OptionSchema {
    pub fn option(mut self, name: &str, spec: OptionSpec) -> Self {
        self.options.insert(name.to_string(), spec);
        self
    }

    /// Resolve a flag name or alias to its canonical option name.
    pub fn canonical(&self, key: &str) -> Option<&str> {
        if self.options.contains_key(key) {
            return self.options.get_key_value(key).map(|(k, _)| k.as_str());
        }
        self.options
            .iter()
            .find(|(_, spec)| spec.aliases.iter().any(|a| a == key))
            .map(|(name, _)| name.as_str())
    }

    fn flag_names(&self) -> Vec<String> {
        self.options.keys().map(|k| format!("--{}", k)).collect()
    }
}

/// Fetch the option schema for a resolved collection + schematic pair.
///
/// This is the first point at which an unknown schematic becomes a hard
/// error; the raw engine error is decorated with did-you-mean hints here.
/// The built-in `interface` schematic additionally accepts an anonymous
/// `type` tag (e.g. `armature generate interface user model`).
pub fn load_options(
    engine: &dyn SchematicEngine,
    resolved: &ResolvedCollection,
    schematic: &str,
) -> Result<OptionSchema> {
    let mut schema = engine
        .option_schema(&resolved.collection_id, schematic)
        .map_err(|err| {
            if err.code == ErrorCode::SchematicNotFound {
                let available = engine
                    .list_schematics(&resolved.collection_id)
                    .unwrap_or_default();
                Error::schematic_not_found(
                    schematic,
                    &resolved.collection_id,
                    suggest::similar_names(schematic, &available),
                )
            } else {
                err
            }
        })?;

    if resolved.collection_id == DEFAULT_COLLECTION && schematic == "interface" {
        schema.options.insert(
            "type".to_string(),
            OptionSpec::string("Tag appended to the generated file name (e.g. model)"),
        );
        schema.positionals.push("type".to_string());
    }

    Ok(schema)
}

/// Bind user-supplied flags (and an optional anonymous positional) against
/// a fetched schema, producing the schematic's final options.
///
/// Unknown flags are rejected, values are coerced per declared kind, and
/// schema defaults fill anything left unset.
pub fn bind_options(
    schema: &OptionSchema,
    positional: Option<&str>,
    extra: &[String],
) -> Result<Map<String, Value>> {
    let mut bound = Map::new();

    if let Some(value) = positional {
        let name = schema.positionals.first().ok_or_else(|| {
            Error::validation_invalid_argument(
                "options",
                format!("Unexpected argument '{}'", value),
                Some(value.to_string()),
                None,
            )
        })?;
        bound.insert(name.clone(), Value::String(value.to_string()));
    }

    let mut iter = extra.iter().peekable();
    while let Some(token) = iter.next() {
        let key = token.strip_prefix("--").ok_or_else(|| {
            Error::validation_invalid_argument(
                "options",
                format!("Unexpected argument '{}' (schematic options use --key value)", token),
                Some(token.to_string()),
                None,
            )
        })?;

        let name = schema.canonical(key).ok_or_else(|| {
            Error::validation_invalid_argument(
                key,
                format!("Unknown option '--{}' for this schematic", key),
                None,
                Some(vec![format!(
                    "Available options: {}",
                    schema.flag_names().join(", ")
                )]),
            )
        })?;
        let spec = &schema.options[name];

        match spec.kind {
            OptionKind::Bool => {
                // Bare flag form (`--flat`) when the next token is another flag
                let bare = iter.peek().map_or(true, |next| next.starts_with("--"));
                let value = if bare {
                    true
                } else {
                    match iter.next().map(String::as_str) {
                        Some("true") => true,
                        Some("false") => false,
                        other => {
                            return Err(Error::validation_invalid_argument(
                                name,
                                format!("Expected true or false for --{}", name),
                                other.map(str::to_string),
                                None,
                            ))
                        }
                    }
                };
                bound.insert(name.to_string(), Value::Bool(value));
            }
            OptionKind::Str => {
                let value = iter.next().ok_or_else(|| {
                    Error::validation_invalid_argument(
                        name,
                        format!("Missing value for flag --{}", name),
                        None,
                        None,
                    )
                })?;
                bound.insert(name.to_string(), Value::String(value.clone()));
            }
            OptionKind::List => {
                let value = iter.next().ok_or_else(|| {
                    Error::validation_invalid_argument(
                        name,
                        format!("Missing value for flag --{}", name),
                        None,
                        None,
                    )
                })?;
                let items: Vec<Value> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect();

                // Repeated list flags accumulate
                match bound.get_mut(name) {
                    Some(Value::Array(existing)) => existing.extend(items),
                    _ => {
                        bound.insert(name.to_string(), Value::Array(items));
                    }
                }
            }
        }
    }

    for (name, spec) in &schema.options {
        if !bound.contains_key(name) {
            if let Some(default) = &spec.default {
                bound.insert(name.clone(), default.clone());
            }
        }
    }

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> OptionSchema {
        OptionSchema::default()
            .option("flat", OptionSpec::boolean("Generate without a subdirectory", false))
            .option(
                "implements",
                OptionSpec::list("Guard interfaces to implement"),
            )
            .option(
                "guardType",
                OptionSpec::string("Functional guard type").with_alias("gt"),
            )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_flag_is_rejected_with_available_options() {
        let err = bind_options(&schema(), None, &strings(&["--bogus", "x"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
        assert!(err.message.contains("--bogus"));
        assert!(err.hints[0].message.contains("--flat"));
    }

    #[test]
    fn bool_flags_accept_bare_and_explicit_forms() {
        let bound = bind_options(&schema(), None, &strings(&["--flat"])).unwrap();
        assert_eq!(bound["flat"], json!(true));

        let bound = bind_options(&schema(), None, &strings(&["--flat", "false"])).unwrap();
        assert_eq!(bound["flat"], json!(false));
    }

    #[test]
    fn list_values_split_on_commas() {
        let bound = bind_options(
            &schema(),
            None,
            &strings(&["--implements", "CanActivate, CanDeactivate"]),
        )
        .unwrap();
        assert_eq!(bound["implements"], json!(["CanActivate", "CanDeactivate"]));
    }

    #[test]
    fn repeated_list_flags_accumulate() {
        let bound = bind_options(
            &schema(),
            None,
            &strings(&["--implements", "CanActivate", "--implements", "CanMatch"]),
        )
        .unwrap();
        assert_eq!(bound["implements"], json!(["CanActivate", "CanMatch"]));
    }

    #[test]
    fn aliases_resolve_to_canonical_name() {
        let bound = bind_options(&schema(), None, &strings(&["--gt", "canActivate"])).unwrap();
        assert_eq!(bound["guardType"], json!("canActivate"));
    }

    #[test]
    fn defaults_fill_unset_options() {
        let bound = bind_options(&schema(), None, &[]).unwrap();
        assert_eq!(bound["flat"], json!(false));
        assert!(!bound.contains_key("guardType"));
    }

    #[test]
    fn positional_binds_to_declared_name() {
        let mut with_positional = schema().option("type", OptionSpec::string("Type tag"));
        with_positional.positionals.push("type".to_string());

        let bound = bind_options(&with_positional, Some("model"), &[]).unwrap();
        assert_eq!(bound["type"], json!("model"));
    }

    #[test]
    fn positional_without_declaration_is_rejected() {
        let err = bind_options(&schema(), Some("model"), &[]).unwrap_err();
        assert!(err.message.contains("Unexpected argument"));
    }

    #[test]
    fn missing_string_value_is_rejected() {
        let err = bind_options(&schema(), None, &strings(&["--guardType"])).unwrap_err();
        assert!(err.message.contains("Missing value"));
    }
}
