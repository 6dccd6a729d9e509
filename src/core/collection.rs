use crate::engine::SchematicEngine;

/// Identifier of the compiled-in collection, used whenever nothing else is
/// requested or the requested collection cannot produce the schematic.
pub const DEFAULT_COLLECTION: &str = "standard";

/// Outcome of collection resolution.
///
/// `is_fallback` is true when the requested (or configured) collection could
/// not produce the schematic and the default collection was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCollection {
    pub collection_id: String,
    pub is_fallback: bool,
}

/// Determine the effective collection for a schematic.
///
/// Stale workspace configuration routinely names a collection that predates
/// a schematic's arrival in the default set, so resolution never fails: an
/// explicit existence check either confirms the candidate or falls back to
/// the default collection. A schematic missing from the default collection
/// too surfaces later, when the option schema is fetched.
pub fn resolve(
    requested: Option<&str>,
    configured_default: Option<&str>,
    schematic: &str,
    engine: &dyn SchematicEngine,
) -> ResolvedCollection {
    let candidate = requested.or(configured_default).unwrap_or(DEFAULT_COLLECTION);

    if candidate == DEFAULT_COLLECTION {
        return ResolvedCollection {
            collection_id: DEFAULT_COLLECTION.to_string(),
            is_fallback: false,
        };
    }

    if engine.has_schematic(candidate, schematic) {
        ResolvedCollection {
            collection_id: candidate.to_string(),
            is_fallback: false,
        }
    } else {
        ResolvedCollection {
            collection_id: DEFAULT_COLLECTION.to_string(),
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FileChange, RenderRequest};
    use crate::error::{Error, Result};
    use crate::schema::OptionSchema;

    /// Engine stub exposing a fixed (collection, schematic) table.
    struct StubEngine {
        known: Vec<(&'static str, &'static str)>,
    }

    impl SchematicEngine for StubEngine {
        fn list_schematics(&self, collection: &str) -> Result<Vec<String>> {
            Ok(self
                .known
                .iter()
                .filter(|(c, _)| *c == collection)
                .map(|(_, s)| s.to_string())
                .collect())
        }

        fn has_schematic(&self, collection: &str, schematic: &str) -> bool {
            self.known.contains(&(collection, schematic))
        }

        fn option_schema(&self, collection: &str, schematic: &str) -> Result<OptionSchema> {
            if self.has_schematic(collection, schematic) {
                Ok(OptionSchema::default())
            } else {
                Err(Error::schematic_not_found(schematic, collection, vec![]))
            }
        }

        fn render(&self, _request: &RenderRequest) -> Result<Vec<FileChange>> {
            Err(Error::internal_unexpected("stub engine cannot render"))
        }
    }

    #[test]
    fn missing_requested_collection_falls_back_to_default() {
        let engine = StubEngine { known: vec![] };
        let resolved = resolve(Some("acme"), None, "guard", &engine);
        assert_eq!(resolved.collection_id, DEFAULT_COLLECTION);
        assert!(resolved.is_fallback);
    }

    #[test]
    fn requested_collection_with_schematic_is_kept() {
        let engine = StubEngine {
            known: vec![("acme", "widget")],
        };
        let resolved = resolve(Some("acme"), None, "widget", &engine);
        assert_eq!(resolved.collection_id, "acme");
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn configured_default_is_consulted_when_nothing_requested() {
        let engine = StubEngine {
            known: vec![("acme", "widget")],
        };
        let resolved = resolve(None, Some("acme"), "widget", &engine);
        assert_eq!(resolved.collection_id, "acme");
        assert!(!resolved.is_fallback);
    }

    #[test]
    fn stale_configured_default_falls_back() {
        let engine = StubEngine {
            known: vec![("acme", "widget")],
        };
        let resolved = resolve(None, Some("acme"), "guard", &engine);
        assert_eq!(resolved.collection_id, DEFAULT_COLLECTION);
        assert!(resolved.is_fallback);
    }

    #[test]
    fn no_input_resolves_to_default_without_fallback_flag() {
        let engine = StubEngine { known: vec![] };
        let resolved = resolve(None, None, "guard", &engine);
        assert_eq!(resolved.collection_id, DEFAULT_COLLECTION);
        assert!(!resolved.is_fallback);
    }
}
