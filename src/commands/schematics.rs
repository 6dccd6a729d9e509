use clap::Args;
use serde::Serialize;

use armature::collection::DEFAULT_COLLECTION;
use armature::engine::{FsEngine, SchematicEngine};
use armature::workspace::Workspace;
use armature::Error;

use super::CmdResult;

#[derive(Args)]
pub struct SchematicsArgs {
    /// Collection to list (defaults to the workspace default, then built-in)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SchematicsOutput {
    pub command: String,
    pub collection: String,
    pub schematics: Vec<String>,
}

pub fn run(
    args: SchematicsArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<SchematicsOutput> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("read working directory".to_string())))?;

    let configured_default = Workspace::discover(&cwd)
        .ok()
        .and_then(|ws| ws.default_collection().map(str::to_string));

    let collection = args
        .collection
        .or(configured_default)
        .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

    let engine = FsEngine::new();
    let schematics = engine.list_schematics(&collection)?;

    Ok((
        SchematicsOutput {
            command: "schematics".to_string(),
            collection,
            schematics,
        },
        0,
    ))
}
