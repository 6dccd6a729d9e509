use clap::{Args, Subcommand};
use serde::Serialize;

use armature::utils::validation;
use armature::workspace::{Workspace, WorkspaceConfig};
use armature::Error;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display workspace configuration
    Show,
    /// Set the default schematics collection
    SetCollection {
        /// Collection id (or path) consulted before the built-in one
        collection: String,
    },
    /// Show the path to armature.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<WorkspaceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    updated_fields: Vec<String>,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("read working directory".to_string())))?;
    let workspace = Workspace::discover(&cwd)?;

    match args.command {
        ConfigCommand::Show => Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                config: Some(workspace.config),
                path: None,
                updated_fields: vec![],
            },
            0,
        )),
        ConfigCommand::SetCollection { collection } => set_collection(workspace, collection),
        ConfigCommand::Path => Ok((
            ConfigOutput {
                command: "config.path".to_string(),
                config: None,
                path: Some(workspace.manifest_path().display().to_string()),
                updated_fields: vec![],
            },
            0,
        )),
    }
}

fn set_collection(mut workspace: Workspace, collection: String) -> CmdResult<ConfigOutput> {
    let trimmed =
        validation::require_non_empty(&collection, "collection", "Collection cannot be empty")?;

    workspace.config.defaults.collection = Some(trimmed.to_string());
    workspace.save()?;

    Ok((
        ConfigOutput {
            command: "config.set-collection".to_string(),
            config: Some(workspace.config),
            path: None,
            updated_fields: vec!["defaults.collection".to_string()],
        },
        0,
    ))
}
