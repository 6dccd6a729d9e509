pub type CmdResult<T> = armature::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod config;
pub mod generate;
pub mod init;
pub mod schematics;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (armature::Result<serde_json::Value>, i32) {
    crate::tty::status("armature is working...");

    match command {
        crate::Commands::Generate(args) => dispatch!(args, global, generate),
        crate::Commands::Schematics(args) => dispatch!(args, global, schematics),
        crate::Commands::Config(args) => dispatch!(args, global, config),
        crate::Commands::Init(args) => dispatch!(args, global, init),
    }
}
