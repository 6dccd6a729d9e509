use std::path::Path;

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use crate::name::NormalizedName;

/// Destination derived for one generation run.
///
/// `relative_path` is always `/`-separated and is empty when the
/// destination is the app root itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub source_dir: String,
    pub relative_path: String,
}

/// Resolve the destination directory for a normalized entity name.
///
/// The candidate directory is the app root joined with the name's directory
/// portion, normalized lexically. Candidates escaping the workspace root are
/// rejected. Unless `dry_run` is set, the candidate directory is created so
/// a failure surfaces here rather than mid-render.
pub fn resolve(
    workspace_root: &Path,
    app_root: &str,
    name: &NormalizedName,
    dry_run: bool,
) -> Result<ResolvedPath> {
    let app_segments = normalize_segments(split(app_root), workspace_root, app_root)?;

    let mut candidate = app_segments.clone();
    for segment in &name.sub_path {
        match segment.as_str() {
            "." => {}
            ".." => {
                if candidate.pop().is_none() {
                    return Err(Error::path_outside_workspace(
                        name.dir_portion(),
                        workspace_root.display().to_string(),
                    ));
                }
            }
            other => candidate.push(other.to_string()),
        }
    }

    let relative_path = relative_to(&app_segments, &candidate);

    if !dry_run {
        let mut dir = workspace_root.to_path_buf();
        for segment in &candidate {
            dir.push(segment);
        }
        local_files::local().ensure_dir(&dir)?;
    }

    Ok(ResolvedPath {
        source_dir: app_root.to_string(),
        relative_path,
    })
}

fn split(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}

fn normalize_segments(
    segments: Vec<String>,
    workspace_root: &Path,
    original: &str,
) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for segment in segments {
        if segment == ".." {
            if out.pop().is_none() {
                return Err(Error::path_outside_workspace(
                    original,
                    workspace_root.display().to_string(),
                ));
            }
        } else {
            out.push(segment);
        }
    }
    Ok(out)
}

/// `/`-joined path of `to` relative to `from`; empty when they are equal.
fn relative_to(from: &[String], to: &[String]) -> String {
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::normalize;
    use tempfile::tempdir;

    #[test]
    fn destination_equal_to_app_root_is_empty() {
        let dir = tempdir().unwrap();
        let name = normalize("loginGuard").unwrap();

        let resolved = resolve(dir.path(), "src", &name, true).unwrap();
        assert_eq!(resolved.source_dir, "src");
        assert_eq!(resolved.relative_path, "");
    }

    #[test]
    fn sub_path_becomes_forward_slash_relative_path() {
        let dir = tempdir().unwrap();
        let name = normalize(r"admin\Session\loginGuard").unwrap();

        let resolved = resolve(dir.path(), "src", &name, true).unwrap();
        assert_eq!(resolved.relative_path, "admin/Session");
    }

    #[test]
    fn resolve_is_idempotent() {
        let dir = tempdir().unwrap();
        let name = normalize("admin/loginGuard").unwrap();

        let first = resolve(dir.path(), "src", &name, false).unwrap();
        let second = resolve(dir.path(), "src", &name, false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn traversal_above_workspace_root_fails() {
        let dir = tempdir().unwrap();
        let name = normalize("../../escape/loginGuard").unwrap();

        let err = resolve(dir.path(), "src", &name, true).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PathOutsideWorkspace);
    }

    #[test]
    fn traversal_within_workspace_is_relative_to_app_root() {
        let dir = tempdir().unwrap();
        let name = normalize("../shared/loginGuard").unwrap();

        let resolved = resolve(dir.path(), "src", &name, true).unwrap();
        assert_eq!(resolved.relative_path, "../shared");
    }

    #[test]
    fn non_dry_run_creates_candidate_directory() {
        let dir = tempdir().unwrap();
        let name = normalize("admin/loginGuard").unwrap();

        resolve(dir.path(), "src", &name, false).unwrap();
        assert!(dir.path().join("src").join("admin").is_dir());
    }

    #[test]
    fn dry_run_performs_no_mutating_probe() {
        let dir = tempdir().unwrap();
        let name = normalize("admin/loginGuard").unwrap();

        resolve(dir.path(), "src", &name, true).unwrap();
        assert!(!dir.path().join("src").exists());
    }
}
