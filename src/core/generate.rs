use heck::{ToLowerCamelCase, ToUpperCamelCase};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::collection::{self, DEFAULT_COLLECTION};
use crate::dest_path;
use crate::engine::{FileChange, RenderRequest, SchematicEngine};
use crate::error::{Error, Result};
use crate::guard::{self, GuardKind};
use crate::log_status;
use crate::name;
use crate::schema;
use crate::utils::template::{TemplateContext, TemplateVars};
use crate::workspace::Workspace;

/// Template set used by every schematic without a branching rule.
const FILES_TEMPLATES: &str = "files";

/// One `armature generate` invocation, parsed and immutable.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub schematic: String,
    pub entity_name: String,
    pub collection: Option<String>,
    pub app: Option<String>,
    pub dry_run: bool,
    pub force: bool,
    pub lint_fix: bool,
    /// Third anonymous positional (the built-in `interface` type tag).
    pub type_arg: Option<String>,
    /// Trailing `--key value` schematic options, bound against the schema.
    pub extra: Vec<String>,
}

/// Result of a completed (or previewed) generation run.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub collection: String,
    pub fallback: bool,
    pub schematic: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source_dir: String,
    pub path: String,
    pub dry_run: bool,
    pub files: Vec<FileChange>,
}

/// Schematics that create a workspace instead of generating into one.
pub fn generates_project(schematic: &str) -> bool {
    matches!(schematic, "app" | "lib")
}

/// Run the full generation pipeline for one request.
pub fn run(
    request: &GenerateRequest,
    engine: &dyn SchematicEngine,
    cwd: &Path,
) -> Result<Generated> {
    // Digit-leading entity names are fatal before any engine round trip.
    let entity = name::normalize(&request.entity_name)?;

    let workspace = Workspace::discover(cwd);
    let configured_default = workspace
        .as_ref()
        .ok()
        .and_then(|ws| ws.default_collection())
        .map(str::to_string);

    let resolved = collection::resolve(
        request.collection.as_deref(),
        configured_default.as_deref(),
        &request.schematic,
        engine,
    );
    if resolved.is_fallback {
        log_status!(
            "generate",
            "Requested collection cannot produce '{}'; using '{}'",
            request.schematic,
            resolved.collection_id
        );
    }

    let schema = schema::load_options(engine, &resolved, &request.schematic)?;
    let bound = schema::bind_options(&schema, request.type_arg.as_deref(), &request.extra)?;

    let mut context = TemplateContext::new();
    context.insert(TemplateVars::NAME.to_string(), entity.dasherized.clone());
    context.insert(
        TemplateVars::CLASS_NAME.to_string(),
        entity.dasherized.to_upper_camel_case(),
    );
    context.insert(
        TemplateVars::CAMEL_NAME.to_string(),
        entity.dasherized.to_lower_camel_case(),
    );
    context.insert(
        TemplateVars::LINT_FIX.to_string(),
        request.lint_fix.to_string(),
    );
    for (key, value) in &bound {
        context.insert(key.clone(), stringify(value));
    }

    let (root, dest_rel, source_dir, relative_path) = if generates_project(&request.schematic) {
        // A new project lands in a directory named after the entity.
        (
            cwd.to_path_buf(),
            entity.dasherized.clone(),
            String::new(),
            String::new(),
        )
    } else {
        let ws = workspace?;
        let app = ws.app(request.app.as_deref())?;
        let resolved_path = dest_path::resolve(&ws.root, &app.root, &entity, request.dry_run)?;

        context.insert(
            TemplateVars::PATH.to_string(),
            resolved_path.relative_path.clone(),
        );
        context.insert(
            TemplateVars::SOURCE_DIR.to_string(),
            resolved_path.source_dir.clone(),
        );

        let dest_rel = if resolved_path.relative_path.is_empty() {
            resolved_path.source_dir.clone()
        } else {
            format!(
                "{}/{}",
                resolved_path.source_dir, resolved_path.relative_path
            )
        };
        (
            ws.root.clone(),
            dest_rel,
            resolved_path.source_dir,
            resolved_path.relative_path,
        )
    };

    // Schematic rule: pick the template set and its derived variables.
    let template_set = if resolved.collection_id == DEFAULT_COLLECTION
        && request.schematic == "guard"
    {
        let kind = GuardKind::from_options(&bound)?;
        let (set, vars) = guard::select_template(&kind);
        for (key, value) in vars {
            context.insert(key.to_string(), value);
        }
        set
    } else {
        FILES_TEMPLATES
    };

    let render = RenderRequest {
        collection: resolved.collection_id.clone(),
        schematic: request.schematic.clone(),
        template_set: template_set.to_string(),
        root,
        dest_rel,
        context,
        dry_run: request.dry_run,
        force: request.force,
    };

    log_status!(
        "generate",
        "Rendering {}:{} for '{}'",
        render.collection,
        render.schematic,
        entity.dasherized
    );
    let files = execute(engine, &render)?;

    Ok(Generated {
        collection: resolved.collection_id,
        fallback: resolved.is_fallback,
        schematic: request.schematic.clone(),
        name: entity.dasherized,
        source_dir,
        path: relative_path,
        dry_run: request.dry_run,
        files,
    })
}

/// Hand the prepared request to the engine, wrapping any failure.
pub fn execute(
    engine: &dyn SchematicEngine,
    request: &RenderRequest,
) -> Result<Vec<FileChange>> {
    engine
        .render(request)
        .map_err(|e| Error::generation_failed(&e))
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FileAction, FsEngine};
    use crate::error::ErrorCode;
    use tempfile::tempdir;

    fn request(schematic: &str, entity: &str) -> GenerateRequest {
        GenerateRequest {
            schematic: schematic.to_string(),
            entity_name: entity.to_string(),
            collection: None,
            app: None,
            dry_run: false,
            force: false,
            lint_fix: false,
            type_arg: None,
            extra: Vec::new(),
        }
    }

    fn workspace_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("armature.json"),
            r#"{ "apps": [{ "root": "src" }] }"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn generates_component_into_app_root() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let out = run(&request("component", "LoginForm"), &engine, dir.path()).unwrap();

        assert_eq!(out.name, "login-form");
        assert_eq!(out.path, "");
        assert_eq!(out.files[0].path, "src/login-form.component.ts");
        assert_eq!(out.files[0].action, FileAction::Create);

        let body =
            std::fs::read_to_string(dir.path().join("src/login-form.component.ts")).unwrap();
        assert!(body.contains("export class LoginFormComponent"));
    }

    #[test]
    fn sub_path_is_preserved_and_created() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let out = run(&request("component", "admin/login"), &engine, dir.path()).unwrap();

        assert_eq!(out.path, "admin");
        assert!(dir.path().join("src/admin/login.component.ts").is_file());
    }

    #[test]
    fn dry_run_previews_without_writing() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("service", "auth");
        req.dry_run = true;
        let out = run(&req, &engine, dir.path()).unwrap();

        assert!(out.dry_run);
        assert_eq!(out.files[0].path, "src/auth.service.ts");
        assert!(!dir.path().join("src").exists());
    }

    #[test]
    fn functional_guard_renders_type_alias_template() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("guard", "auth");
        req.extra = vec!["--guardType".to_string(), "canActivate".to_string()];
        let out = run(&req, &engine, dir.path()).unwrap();

        assert_eq!(out.files[0].path, "src/auth.guard.ts");
        let body = std::fs::read_to_string(dir.path().join("src/auth.guard.ts")).unwrap();
        assert!(body.contains("CanActivateFn"));
        assert!(body.contains("export const authGuard"));
    }

    #[test]
    fn class_guard_renders_sorted_imports() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("guard", "auth");
        req.extra = vec![
            "--implements".to_string(),
            "CanActivate,CanDeactivate".to_string(),
        ];
        run(&req, &engine, dir.path()).unwrap();

        let body = std::fs::read_to_string(dir.path().join("src/auth.guard.ts")).unwrap();
        assert!(body.contains(
            "import { ActivatedRouteSnapshot, CanActivate, CanDeactivate, RouterStateSnapshot, UrlTree } from '@angular/router';"
        ));
        assert!(body.contains("implements CanActivate, CanDeactivate<unknown>"));
    }

    #[test]
    fn guard_conflict_surfaces_before_rendering() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("guard", "auth");
        req.extra = vec![
            "--guardType".to_string(),
            "canActivate".to_string(),
            "--implements".to_string(),
            "CanMatch".to_string(),
        ];
        let err = run(&req, &engine, dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::OptionsConflict);
        assert!(!dir.path().join("src/auth.guard.ts").exists());
    }

    #[test]
    fn interface_type_tag_lands_in_file_name() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("interface", "user");
        req.type_arg = Some("model".to_string());
        let out = run(&req, &engine, dir.path()).unwrap();
        assert_eq!(out.files[0].path, "src/user.model.ts");

        let plain = run(&request("interface", "account"), &engine, dir.path()).unwrap();
        assert_eq!(plain.files[0].path, "src/account.ts");
    }

    #[test]
    fn stale_default_collection_falls_back_silently() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("armature.json"),
            r#"{ "apps": [{ "root": "src" }], "defaults": { "collection": "acme" } }"#,
        )
        .unwrap();
        let engine = FsEngine::new();

        let out = run(&request("guard", "auth"), &engine, dir.path()).unwrap();
        assert!(out.fallback);
        assert_eq!(out.collection, DEFAULT_COLLECTION);
    }

    #[test]
    fn app_schematic_works_without_a_workspace() {
        let dir = tempdir().unwrap();
        let engine = FsEngine::new();

        let out = run(&request("app", "My Site"), &engine, dir.path()).unwrap();
        assert_eq!(out.name, "my-site");
        assert!(dir.path().join("my-site/armature.json").is_file());
        assert!(dir.path().join("my-site/src/index.ts").is_file());
    }

    #[test]
    fn missing_workspace_fails_for_non_project_schematics() {
        let dir = tempdir().unwrap();
        let engine = FsEngine::new();

        let err = run(&request("component", "login"), &engine, dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::WorkspaceNotFound);
    }

    #[test]
    fn digit_leading_entity_fails_before_generation() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let err = run(&request("component", "2fa"), &engine, dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NameInvalid);
    }

    #[test]
    fn unknown_schematic_is_a_hard_error_with_hints() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let err = run(&request("guadr", "auth"), &engine, dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::SchematicNotFound);
        assert!(err.hints[0].message.contains("guard"));
    }

    #[test]
    fn unknown_app_is_reported() {
        let dir = workspace_dir();
        let engine = FsEngine::new();

        let mut req = request("component", "login");
        req.app = Some("mobile".to_string());
        let err = run(&req, &engine, dir.path()).unwrap_err();
        assert_eq!(err.code, ErrorCode::AppNotFound);
    }
}
