use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base armature config directory (universal ~/.config/armature/ on all platforms)
pub fn armature() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("armature"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("armature"))
    }
}

/// Installed collections directory
pub fn collections() -> Result<PathBuf> {
    Ok(armature()?.join("collections"))
}

/// Directory of a single installed collection
pub fn collection(id: &str) -> Result<PathBuf> {
    Ok(collections()?.join(id))
}
