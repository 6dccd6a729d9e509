use clap::Args;
use serde::Serialize;

use armature::engine::FsEngine;
use armature::generate::{self, Generated, GenerateRequest};
use armature::Error;

use super::CmdResult;

#[derive(Args)]
pub struct GenerateArgs {
    /// Schematic to run (e.g. component, guard, interface)
    pub schematic: String,

    /// Entity name, optionally prefixed with a sub-path (e.g. admin/login)
    pub name: String,

    /// Schematic options as --key value pairs. The built-in interface
    /// schematic also accepts a leading type tag (e.g. `interface user model`).
    #[arg(
        value_name = "OPTIONS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub options: Vec<String>,

    /// Run through without making any changes
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Force overwriting of existing files
    #[arg(long, short = 'f')]
    pub force: bool,

    /// App name to generate into
    #[arg(long, short = 'a')]
    pub app: Option<String>,

    /// Schematics collection to use (id or path)
    #[arg(long, short = 'c')]
    pub collection: Option<String>,

    /// Use lint to fix files after generation
    #[arg(long = "lint-fix", alias = "lf")]
    pub lint_fix: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub command: String,
    #[serde(flatten)]
    pub result: Generated,
}

pub fn run(mut args: GenerateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<GenerateOutput> {
    // Clap hands everything after the two positionals to `options`, so the
    // built-in flags are honored there too (`armature g component foo -d`).
    let remaining = extract_builtin_flags(std::mem::take(&mut args.options), &mut args)?;
    let (type_arg, extra) = split_anonymous(remaining);

    let request = GenerateRequest {
        schematic: args.schematic,
        entity_name: args.name,
        collection: args.collection,
        app: args.app,
        dry_run: args.dry_run,
        force: args.force,
        lint_fix: args.lint_fix,
        type_arg,
        extra,
    };

    let cwd = std::env::current_dir()
        .map_err(|e| Error::internal_io(e.to_string(), Some("read working directory".to_string())))?;
    let engine = FsEngine::new();
    let result = generate::run(&request, &engine, &cwd)?;

    Ok((
        GenerateOutput {
            command: "generate".to_string(),
            result,
        },
        0,
    ))
}

/// Pull the command's own flags back out of the trailing options.
fn extract_builtin_flags(
    tokens: Vec<String>,
    args: &mut GenerateArgs,
) -> armature::Result<Vec<String>> {
    let mut rest = Vec::new();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token.as_str() {
            "--dry-run" | "-d" => args.dry_run = true,
            "--force" | "-f" => args.force = true,
            "--lint-fix" | "--lf" | "-lf" => args.lint_fix = true,
            "--app" | "-a" => args.app = Some(flag_value(&token, iter.next())?),
            "--collection" | "-c" => args.collection = Some(flag_value(&token, iter.next())?),
            _ => rest.push(token),
        }
    }

    Ok(rest)
}

fn flag_value(flag: &str, value: Option<String>) -> armature::Result<String> {
    value.ok_or_else(|| {
        Error::validation_invalid_argument(
            flag,
            format!("Missing value for flag {}", flag),
            None,
            None,
        )
    })
}

/// Peel a leading non-flag token off the dynamic options; it is the
/// schematic's anonymous positional (only `interface` declares one).
fn split_anonymous(mut options: Vec<String>) -> (Option<String>, Vec<String>) {
    let type_arg = if options.first().is_some_and(|first| !first.starts_with("--")) {
        Some(options.remove(0))
    } else {
        None
    };
    (type_arg, options)
}
