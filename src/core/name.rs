use heck::ToKebabCase;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

static SEPARATORS: OnceLock<Regex> = OnceLock::new();

fn separators() -> &'static Regex {
    // Entity names accept both separator styles regardless of host OS.
    SEPARATORS.get_or_init(|| Regex::new(r"[/\\]").expect("separator pattern is valid"))
}

/// Canonical form of a user-supplied entity path.
///
/// Only the final segment is dash-cased; intermediate directory segments
/// are preserved verbatim so `admin/LoginGuard` lands in `admin/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub dasherized: String,
    pub sub_path: Vec<String>,
}

impl NormalizedName {
    /// Directory portion of the entity path, `/`-joined. Empty when the
    /// entity name carried no directory prefix.
    pub fn dir_portion(&self) -> String {
        self.sub_path.join("/")
    }
}

/// Normalize a raw entity path into a dash-cased name plus sub-path.
pub fn normalize(raw: &str) -> Result<NormalizedName> {
    if raw.trim().is_empty() {
        return Err(Error::name_invalid(raw, "Entity name cannot be empty"));
    }

    let mut segments: Vec<&str> = separators().split(raw).collect();
    let last = segments.pop().unwrap_or_default();
    let dasherized = last.to_kebab_case();

    if dasherized.is_empty() {
        return Err(Error::name_invalid(
            raw,
            "Entity name must contain at least one letter or number",
        ));
    }

    if dasherized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(Error::name_invalid(
            raw,
            format!("Entity name '{}' cannot begin with a digit", last),
        ));
    }

    let sub_path = segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Ok(NormalizedName {
        dasherized,
        sub_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dasherizes_camel_case() {
        let name = normalize("LoginGuard").unwrap();
        assert_eq!(name.dasherized, "login-guard");
        assert!(name.sub_path.is_empty());
    }

    #[test]
    fn dasherizes_underscores() {
        assert_eq!(normalize("login_guard").unwrap().dasherized, "login-guard");
    }

    #[test]
    fn preserves_directory_prefix_verbatim() {
        let name = normalize("admin/Session/loginGuard").unwrap();
        assert_eq!(name.sub_path, vec!["admin".to_string(), "Session".to_string()]);
        assert_eq!(name.dasherized, "login-guard");
        assert_eq!(name.dir_portion(), "admin/Session");
    }

    #[test]
    fn splits_on_backslashes() {
        let name = normalize(r"admin\loginGuard").unwrap();
        assert_eq!(name.sub_path, vec!["admin".to_string()]);
        assert_eq!(name.dasherized, "login-guard");
    }

    #[test]
    fn empty_name_fails() {
        assert!(normalize("").is_err());
        assert!(normalize("   ").is_err());
    }

    #[test]
    fn trailing_separator_fails() {
        assert!(normalize("admin/").is_err());
    }

    #[test]
    fn digit_leading_name_fails() {
        let err = normalize("2fa-guard").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NameInvalid);
    }

    #[test]
    fn digit_leading_final_segment_fails_with_prefix() {
        assert!(normalize("auth/2fa").is_err());
    }

    #[test]
    fn digit_elsewhere_is_allowed() {
        assert_eq!(normalize("oauth2Callback").unwrap().dasherized, "oauth2-callback");
    }
}
