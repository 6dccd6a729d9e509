use serde::Serialize;
use serde_json::{json, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// Structured CLI error: a stable code, a human message, and JSON details.
///
/// Hints are short follow-up commands or explanations surfaced under the
/// error in the JSON envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input validation
    ValidationInvalidArgument,
    ValidationInvalidJson,
    NameInvalid,
    OptionsConflict,

    // Workspace / configuration lookup
    WorkspaceNotFound,
    AppNotFound,
    ConfigInvalidValue,

    // Schematic resolution and rendering
    CollectionNotFound,
    SchematicNotFound,
    PathOutsideWorkspace,
    GenerationFailed,

    // Internal
    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation_invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation_invalid_json",
            ErrorCode::NameInvalid => "name_invalid",
            ErrorCode::OptionsConflict => "options_conflict",
            ErrorCode::WorkspaceNotFound => "workspace_not_found",
            ErrorCode::AppNotFound => "app_not_found",
            ErrorCode::ConfigInvalidValue => "config_invalid_value",
            ErrorCode::CollectionNotFound => "collection_not_found",
            ErrorCode::SchematicNotFound => "schematic_not_found",
            ErrorCode::PathOutsideWorkspace => "path_outside_workspace",
            ErrorCode::GenerationFailed => "generation_failed",
            ErrorCode::InternalIoError => "internal_io_error",
            ErrorCode::InternalJsonError => "internal_json_error",
            ErrorCode::InternalUnexpected => "internal_unexpected",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn with_hints(mut self, messages: Vec<String>) -> Self {
        self.hints
            .extend(messages.into_iter().map(|message| Hint { message }));
        self
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
        hints: Option<Vec<String>>,
    ) -> Self {
        let field = field.into();
        let err = Self::new(
            ErrorCode::ValidationInvalidArgument,
            message,
            json!({ "field": field, "value": value }),
        );
        match hints {
            Some(hints) => err.with_hints(hints),
            None => err,
        }
    }

    pub fn validation_invalid_json(err: serde_json::Error, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::ValidationInvalidJson,
            format!("Invalid JSON: {}", err),
            json!({ "context": context }),
        )
    }

    pub fn name_invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(
            ErrorCode::NameInvalid,
            message,
            json!({ "name": name }),
        )
    }

    pub fn options_conflict(first: &str, second: &str) -> Self {
        Self::new(
            ErrorCode::OptionsConflict,
            format!(
                "Options \"{}\" and \"{}\" cannot be used together",
                first, second
            ),
            json!({ "options": [first, second] }),
        )
    }

    // ------------------------------------------------------------------
    // Workspace / configuration
    // ------------------------------------------------------------------

    pub fn workspace_not_found(start_dir: impl Into<String>) -> Self {
        let start_dir = start_dir.into();
        Self::new(
            ErrorCode::WorkspaceNotFound,
            "No armature.json found in this directory or any parent",
            json!({ "searched_from": start_dir }),
        )
        .with_hint("Run 'armature init' to create a workspace manifest")
    }

    pub fn app_not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        let name = name.into();
        Self::new(
            ErrorCode::AppNotFound,
            format!("App '{}' is not defined in armature.json", name),
            json!({ "app": name, "available": available }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::ConfigInvalidValue,
            message,
            json!({ "key": key, "value": value }),
        )
    }

    // ------------------------------------------------------------------
    // Schematic resolution and rendering
    // ------------------------------------------------------------------

    pub fn collection_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            ErrorCode::CollectionNotFound,
            format!("Collection '{}' is not installed", id),
            json!({ "collection": id }),
        )
    }

    pub fn schematic_not_found(
        name: impl Into<String>,
        collection: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let name = name.into();
        let collection = collection.into();
        let err = Self::new(
            ErrorCode::SchematicNotFound,
            format!(
                "Collection '{}' has no schematic named '{}'",
                collection, name
            ),
            json!({ "schematic": name, "collection": collection }),
        );
        if suggestions.is_empty() {
            err.with_hint("Run 'armature schematics' to list available schematics")
        } else {
            err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")))
        }
    }

    pub fn path_outside_workspace(
        path: impl Into<String>,
        workspace_root: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let workspace_root = workspace_root.into();
        Self::new(
            ErrorCode::PathOutsideWorkspace,
            format!("Destination '{}' falls outside the workspace root", path),
            json!({ "path": path, "workspace_root": workspace_root }),
        )
    }

    pub fn generation_failed(cause: &Error) -> Self {
        Self::new(
            ErrorCode::GenerationFailed,
            format!("Generation failed: {}", cause.message),
            json!({
                "cause_code": cause.code.as_str(),
                "cause": cause.details,
            }),
        )
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    pub fn internal_io(message: impl Into<String>, operation: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            message,
            json!({ "operation": operation }),
        )
    }

    pub fn internal_json(message: impl Into<String>, operation: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            message,
            json!({ "operation": operation }),
        )
    }

    pub fn internal_unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalUnexpected, message, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schematic_not_found_carries_suggestions() {
        let err = Error::schematic_not_found("guarrd", "standard", vec!["guard".to_string()]);
        assert_eq!(err.code, ErrorCode::SchematicNotFound);
        assert_eq!(err.hints.len(), 1);
        assert!(err.hints[0].message.contains("guard"));
    }

    #[test]
    fn options_conflict_names_both_flags() {
        let err = Error::options_conflict("implements", "guardType");
        assert!(err.message.contains("implements"));
        assert!(err.message.contains("guardType"));
        assert_eq!(err.details["options"], serde_json::json!(["implements", "guardType"]));
    }

    #[test]
    fn generation_failed_preserves_cause() {
        let cause = Error::internal_io("disk full".to_string(), Some("write file".to_string()));
        let err = Error::generation_failed(&cause);
        assert_eq!(err.code, ErrorCode::GenerationFailed);
        assert_eq!(err.details["cause_code"], "internal_io_error");
        assert!(err.message.contains("disk full"));
    }

    #[test]
    fn code_strings_are_snake_case() {
        assert_eq!(ErrorCode::NameInvalid.as_str(), "name_invalid");
        assert_eq!(ErrorCode::GenerationFailed.as_str(), "generation_failed");
    }
}
