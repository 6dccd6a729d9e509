//! The compiled-in `standard` collection.
//!
//! Schematic schemas are declared here; template bodies are embedded at
//! build time so the default collection works without any installation
//! step.

use crate::schema::{OptionSchema, OptionSpec};

/// One embedded template file: path relative to the template set root
/// (with `__key__` filename tokens), plus its body.
pub type TemplateFile = (&'static str, &'static str);

pub struct BuiltinSchematic {
    pub name: &'static str,
    pub description: &'static str,
    /// Template sets by name; `files` is the conventional single set.
    pub template_sets: &'static [(&'static str, &'static [TemplateFile])],
    schema: fn() -> OptionSchema,
}

impl BuiltinSchematic {
    pub fn schema(&self) -> OptionSchema {
        (self.schema)()
    }

    pub fn template_set(&self, set: &str) -> Option<&'static [TemplateFile]> {
        self.template_sets
            .iter()
            .find(|(name, _)| *name == set)
            .map(|(_, files)| *files)
    }
}

const APP_FILES: &[TemplateFile] = &[
    (
        "armature.json",
        include_str!("../templates/standard/app/files/armature.json.template"),
    ),
    (
        "src/index.ts",
        include_str!("../templates/standard/app/files/src/index.ts.template"),
    ),
];

const COMPONENT_FILES: &[TemplateFile] = &[(
    "__name__.component.ts",
    include_str!("../templates/standard/component/files/__name__.component.ts.template"),
)];

const SERVICE_FILES: &[TemplateFile] = &[(
    "__name__.service.ts",
    include_str!("../templates/standard/service/files/__name__.service.ts.template"),
)];

const MODULE_FILES: &[TemplateFile] = &[(
    "__name__.module.ts",
    include_str!("../templates/standard/module/files/__name__.module.ts.template"),
)];

const INTERFACE_FILES: &[TemplateFile] = &[(
    "__name__.__type__.ts",
    include_str!("../templates/standard/interface/files/__name__.__type__.ts.template"),
)];

const GUARD_TYPE_FILES: &[TemplateFile] = &[(
    "__name__.guard.ts",
    include_str!("../templates/standard/guard/type-files/__name__.guard.ts.template"),
)];

const GUARD_IMPLEMENTS_FILES: &[TemplateFile] = &[(
    "__name__.guard.ts",
    include_str!("../templates/standard/guard/implements-files/__name__.guard.ts.template"),
)];

const SCHEMATICS: &[BuiltinSchematic] = &[
    BuiltinSchematic {
        name: "app",
        description: "Scaffold a new workspace with a starter app",
        template_sets: &[("files", APP_FILES)],
        schema: OptionSchema::default,
    },
    BuiltinSchematic {
        name: "component",
        description: "Generate a component class",
        template_sets: &[("files", COMPONENT_FILES)],
        schema: OptionSchema::default,
    },
    BuiltinSchematic {
        name: "guard",
        description: "Generate a route guard (functional or class-based)",
        template_sets: &[
            ("type-files", GUARD_TYPE_FILES),
            ("implements-files", GUARD_IMPLEMENTS_FILES),
        ],
        schema: guard_schema,
    },
    BuiltinSchematic {
        name: "interface",
        description: "Generate an interface",
        template_sets: &[("files", INTERFACE_FILES)],
        schema: OptionSchema::default,
    },
    BuiltinSchematic {
        name: "module",
        description: "Generate a module class",
        template_sets: &[("files", MODULE_FILES)],
        schema: OptionSchema::default,
    },
    BuiltinSchematic {
        name: "service",
        description: "Generate an injectable service class",
        template_sets: &[("files", SERVICE_FILES)],
        schema: OptionSchema::default,
    },
];

fn guard_schema() -> OptionSchema {
    OptionSchema::default()
        .option(
            "implements",
            OptionSpec::list("Guard interfaces to implement (comma-separated or repeated)"),
        )
        .option(
            "guardType",
            OptionSpec::string("Generate a functional guard of this type (e.g. canActivate)"),
        )
}

pub fn get(name: &str) -> Option<&'static BuiltinSchematic> {
    SCHEMATICS.iter().find(|s| s.name == name)
}

pub fn names() -> Vec<String> {
    SCHEMATICS.iter().map(|s| s.name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_and_include_guard() {
        let names = names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"guard".to_string()));
    }

    #[test]
    fn guard_has_both_template_sets() {
        let guard = get("guard").unwrap();
        assert!(guard.template_set("type-files").is_some());
        assert!(guard.template_set("implements-files").is_some());
        assert!(guard.template_set("files").is_none());
    }

    #[test]
    fn guard_schema_declares_both_options() {
        let schema = get("guard").unwrap().schema();
        assert!(schema.options.contains_key("implements"));
        assert!(schema.options.contains_key("guardType"));
    }

    #[test]
    fn interface_schema_has_no_declared_positional() {
        // The anonymous `type` argument is registered by the option loader,
        // not declared by the schematic itself.
        let schema = get("interface").unwrap().schema();
        assert!(schema.positionals.is_empty());
        assert!(!schema.options.contains_key("type"));
    }
}
