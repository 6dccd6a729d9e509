use glob::glob;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::builtin;
use crate::collection::DEFAULT_COLLECTION;
use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use crate::log_status;
use crate::paths;
use crate::schema::OptionSchema;
use crate::utils::template::{self, TemplateContext};

/// What the engine did (or would do, under `--dry-run`) to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Create,
    Overwrite,
    Skip,
}

impl FileAction {
    fn label(&self) -> &'static str {
        match self {
            FileAction::Create => "CREATE",
            FileAction::Overwrite => "OVERWRITE",
            FileAction::Skip => "SKIP",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileChange {
    pub path: String,
    pub action: FileAction,
}

/// Everything the engine needs for one rendering pass.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub collection: String,
    pub schematic: String,
    pub template_set: String,
    /// Directory the reported paths are relative to (workspace root, or the
    /// working directory for project-creating schematics).
    pub root: PathBuf,
    /// `/`-separated destination under `root`; empty renders into `root`.
    pub dest_rel: String,
    pub context: TemplateContext,
    pub dry_run: bool,
    pub force: bool,
}

/// Narrow contract to the template host.
///
/// The generate pipeline only ever consults a collection through this
/// trait, which keeps collection resolution testable with stub engines.
pub trait SchematicEngine {
    fn list_schematics(&self, collection: &str) -> Result<Vec<String>>;
    fn has_schematic(&self, collection: &str, schematic: &str) -> bool;
    fn option_schema(&self, collection: &str, schematic: &str) -> Result<OptionSchema>;
    fn render(&self, request: &RenderRequest) -> Result<Vec<FileChange>>;
}

/// Production engine: serves the compiled-in `standard` collection plus
/// collections installed under the config directory. A collection argument
/// that looks like a path (`./...`, `~/...`, contains a separator) is read
/// from that directory instead.
pub struct FsEngine;

impl FsEngine {
    pub fn new() -> Self {
        Self
    }

    fn source(&self, collection: &str) -> Result<Source> {
        if collection == DEFAULT_COLLECTION {
            return Ok(Source::Builtin);
        }

        let dir = if is_path_like(collection) {
            PathBuf::from(shellexpand::tilde(collection).as_ref())
        } else {
            paths::collection(collection)?
        };

        if dir.join("collection.json").is_file() {
            Ok(Source::Installed(dir))
        } else {
            Err(Error::collection_not_found(collection))
        }
    }
}

impl Default for FsEngine {
    fn default() -> Self {
        Self::new()
    }
}

enum Source {
    Builtin,
    Installed(PathBuf),
}

fn is_path_like(collection: &str) -> bool {
    collection.starts_with('.')
        || collection.starts_with('~')
        || collection.contains('/')
        || collection.contains('\\')
}

/// Manifest of an installed collection (`collection.json`).
#[derive(Debug, Clone, Deserialize)]
struct CollectionManifest {
    schematics: BTreeMap<String, SchematicManifest>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchematicManifest {
    /// Template directory, relative to the collection root. Defaults to the
    /// schematic's own name.
    #[serde(default)]
    templates: Option<String>,

    #[serde(flatten)]
    schema: OptionSchema,
}

fn load_manifest(dir: &Path, collection: &str) -> Result<CollectionManifest> {
    let path = dir.join("collection.json");
    let content = local_files::local().read(&path)?;
    serde_json::from_str(&content).map_err(|e| {
        Error::validation_invalid_json(e, Some(format!("parse {} manifest", collection)))
    })
}

impl SchematicEngine for FsEngine {
    fn list_schematics(&self, collection: &str) -> Result<Vec<String>> {
        match self.source(collection)? {
            Source::Builtin => Ok(builtin::names()),
            Source::Installed(dir) => {
                let manifest = load_manifest(&dir, collection)?;
                Ok(manifest.schematics.keys().cloned().collect())
            }
        }
    }

    fn has_schematic(&self, collection: &str, schematic: &str) -> bool {
        match self.source(collection) {
            Ok(Source::Builtin) => builtin::get(schematic).is_some(),
            Ok(Source::Installed(dir)) => load_manifest(&dir, collection)
                .map(|m| m.schematics.contains_key(schematic))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    fn option_schema(&self, collection: &str, schematic: &str) -> Result<OptionSchema> {
        match self.source(collection)? {
            Source::Builtin => builtin::get(schematic)
                .map(|s| s.schema())
                .ok_or_else(|| Error::schematic_not_found(schematic, collection, vec![])),
            Source::Installed(dir) => {
                let manifest = load_manifest(&dir, collection)?;
                manifest
                    .schematics
                    .get(schematic)
                    .map(|s| s.schema.clone())
                    .ok_or_else(|| Error::schematic_not_found(schematic, collection, vec![]))
            }
        }
    }

    fn render(&self, request: &RenderRequest) -> Result<Vec<FileChange>> {
        let templates = self.template_files(request)?;
        let fs = local_files::local();
        let base = join_rel(&request.root, &request.dest_rel);

        let mut changes = Vec::new();
        for (rel, content) in templates {
            let out_rel = substitute_filename(&rel, &request.context);
            let rendered = template::render_map(&content, &request.context);

            let report_path = if request.dest_rel.is_empty() {
                out_rel.clone()
            } else {
                format!("{}/{}", request.dest_rel, out_rel)
            };
            let dest = join_rel(&base, &out_rel);

            let action = if fs.exists(&dest) {
                if fs.read(&dest)? == rendered {
                    FileAction::Skip
                } else if request.force {
                    FileAction::Overwrite
                } else {
                    return Err(Error::validation_invalid_argument(
                        "force",
                        format!("{} already exists; rerun with --force to overwrite", report_path),
                        Some(report_path),
                        None,
                    ));
                }
            } else {
                FileAction::Create
            };

            if !request.dry_run && action != FileAction::Skip {
                if let Some(parent) = dest.parent() {
                    fs.ensure_dir(parent)?;
                }
                fs.write(&dest, &rendered)?;
                log_status!("engine", "{} {}", action.label(), report_path);
            }

            changes.push(FileChange {
                path: report_path,
                action,
            });
        }

        Ok(changes)
    }
}

impl FsEngine {
    fn template_files(&self, request: &RenderRequest) -> Result<Vec<(String, String)>> {
        match self.source(&request.collection)? {
            Source::Builtin => {
                let schematic = builtin::get(&request.schematic).ok_or_else(|| {
                    Error::schematic_not_found(&request.schematic, &request.collection, vec![])
                })?;
                let files = schematic.template_set(&request.template_set).ok_or_else(|| {
                    Error::internal_unexpected(format!(
                        "Schematic '{}' has no template set '{}'",
                        request.schematic, request.template_set
                    ))
                })?;
                Ok(files
                    .iter()
                    .map(|(rel, content)| (rel.to_string(), content.to_string()))
                    .collect())
            }
            Source::Installed(dir) => {
                let manifest = load_manifest(&dir, &request.collection)?;
                let schematic = manifest.schematics.get(&request.schematic).ok_or_else(|| {
                    Error::schematic_not_found(&request.schematic, &request.collection, vec![])
                })?;

                let templates_dir = schematic
                    .templates
                    .clone()
                    .unwrap_or_else(|| request.schematic.clone());
                let set_dir = dir.join(&templates_dir).join(&request.template_set);

                let pattern = format!("{}/**/*", set_dir.display());
                let paths = glob(&pattern).map_err(|e| {
                    Error::internal_unexpected(format!("Invalid template pattern: {}", e))
                })?;

                let fs = local_files::local();
                let mut files = Vec::new();
                for entry in paths.flatten() {
                    if !entry.is_file() {
                        continue;
                    }
                    let rel = entry
                        .strip_prefix(&set_dir)
                        .map_err(|e| Error::internal_unexpected(e.to_string()))?
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/");
                    let rel = rel.strip_suffix(".template").unwrap_or(&rel).to_string();
                    files.push((rel, fs.read(&entry)?));
                }

                if files.is_empty() {
                    return Err(Error::internal_unexpected(format!(
                        "No templates found in {}",
                        set_dir.display()
                    )));
                }

                Ok(files)
            }
        }
    }
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for part in rel.split('/').filter(|p| !p.is_empty()) {
        out.push(part);
    }
    out
}

static FILENAME_TOKEN: OnceLock<Regex> = OnceLock::new();

fn filename_token() -> &'static Regex {
    FILENAME_TOKEN
        .get_or_init(|| Regex::new(r"\.?__([A-Za-z][A-Za-z0-9]*)__").expect("token pattern is valid"))
}

/// Replace `__key__` filename tokens with context values. A token with no
/// (or an empty) value disappears along with its leading dot, so
/// `__name__.__type__.ts` collapses to `user.ts` when no type is set.
fn substitute_filename(rel: &str, context: &TemplateContext) -> String {
    filename_token()
        .replace_all(rel, |caps: &regex::Captures| {
            let dotted = caps[0].starts_with('.');
            match context.get(&caps[1]).filter(|v| !v.is_empty()) {
                Some(value) => {
                    if dotted {
                        format!(".{}", value)
                    } else {
                        value.clone()
                    }
                }
                None => String::new(),
            }
        })
        .into_owned()
}
