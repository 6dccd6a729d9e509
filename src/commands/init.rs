use clap::Args;
use serde::Serialize;

use armature::workspace::{self, Workspace, MANIFEST_FILE};
use armature::Error;

use super::CmdResult;

#[derive(Args)]
pub struct InitArgs {
    /// App root directory recorded in the manifest
    #[arg(long, default_value = "src")]
    pub app_root: String,
}

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub command: String,
    pub path: String,
}

pub fn run(args: InitArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<InitOutput> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("read working directory".to_string())))?;

    let manifest = cwd.join(MANIFEST_FILE);
    if manifest.exists() {
        return Err(Error::validation_invalid_argument(
            "workspace",
            format!("{} already exists in this directory", MANIFEST_FILE),
            Some(manifest.display().to_string()),
            Some(vec![
                "Edit it directly, or use 'armature config set-collection <id>'".to_string(),
            ]),
        ));
    }

    let ws = Workspace {
        root: cwd,
        config: workspace::starter_config(&args.app_root),
    };
    ws.save()?;

    Ok((
        InitOutput {
            command: "init".to_string(),
            path: ws.manifest_path().display().to_string(),
        },
        0,
    ))
}
