use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};

/// Workspace manifest file name, discovered by walking up from the
/// working directory.
pub const MANIFEST_FILE: &str = "armature.json";

/// Root configuration structure for armature.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub apps: Vec<AppConfig>,

    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// One generation target inside the workspace tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// App root directory, relative to the workspace root.
    pub root: String,
}

/// Configurable defaults that can be overridden via armature.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Collection consulted before falling back to the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// A discovered workspace: manifest location plus parsed configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: WorkspaceConfig,
}

impl Workspace {
    /// Walk up from `start` looking for an armature.json manifest.
    pub fn discover(start: &Path) -> Result<Workspace> {
        let mut current = Some(start);

        while let Some(dir) = current {
            if dir.join(MANIFEST_FILE).is_file() {
                return Self::load(dir);
            }
            current = dir.parent();
        }

        Err(Error::workspace_not_found(start.display().to_string()))
    }

    /// Load the manifest from a known workspace root.
    pub fn load(root: &Path) -> Result<Workspace> {
        let path = root.join(MANIFEST_FILE);
        let content = local_files::local().read(&path)?;

        let config: WorkspaceConfig = serde_json::from_str(&content).map_err(|e| {
            Error::validation_invalid_json(e, Some(format!("parse {}", path.display())))
        })?;

        Ok(Workspace {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Write the manifest back to disk.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.config).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize armature.json".to_string()))
        })?;
        local_files::local().write(&self.manifest_path(), &content)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Look up a generation target. `None` selects the first configured app.
    pub fn app(&self, name: Option<&str>) -> Result<&AppConfig> {
        match name {
            None => self.config.apps.first().ok_or_else(|| {
                Error::app_not_found("default", vec![])
                    .with_hint("Add an entry to \"apps\" in armature.json")
            }),
            Some(wanted) => self
                .config
                .apps
                .iter()
                .find(|app| app.name.as_deref() == Some(wanted))
                .ok_or_else(|| Error::app_not_found(wanted, self.app_names())),
        }
    }

    pub fn default_collection(&self) -> Option<&str> {
        self.config.defaults.collection.as_deref()
    }

    fn app_names(&self) -> Vec<String> {
        self.config
            .apps
            .iter()
            .filter_map(|app| app.name.clone())
            .collect()
    }
}

/// Starter manifest written by `armature init`.
pub fn starter_config(app_root: &str) -> WorkspaceConfig {
    WorkspaceConfig {
        apps: vec![AppConfig {
            name: None,
            root: app_root.to_string(),
        }],
        defaults: DefaultsConfig::default(),
    }
}
