//! String template rendering utilities.

use std::collections::BTreeMap;

/// Substitution variables passed to the rendering engine.
///
/// Ordered so that repeated generation runs produce identical output.
pub type TemplateContext = BTreeMap<String, String>;

pub struct TemplateVars;

impl TemplateVars {
    pub const NAME: &'static str = "name";
    pub const CLASS_NAME: &'static str = "className";
    pub const CAMEL_NAME: &'static str = "camelName";
    pub const PATH: &'static str = "path";
    pub const SOURCE_DIR: &'static str = "sourceDir";
    pub const TYPE: &'static str = "type";
    pub const GUARD_TYPE: &'static str = "guardType";
    pub const IMPLEMENTATIONS: &'static str = "implementations";
    pub const ROUTER_IMPORTS: &'static str = "routerImports";
    pub const LINT_FIX: &'static str = "lintFix";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

pub fn render_map(template: &str, variables: &TemplateContext) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

pub fn is_present(template: &str, key: &str) -> bool {
    let placeholder = format!("{{{{{}}}}}", key);
    template.contains(&placeholder)
}
