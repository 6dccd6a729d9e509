use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::utils::template::TemplateVars;

/// Template set for the functional (type-alias) branch.
pub const TYPE_TEMPLATES: &str = "type-files";
/// Template set for the class (interface-implementation) branch.
pub const IMPLEMENTS_TEMPLATES: &str = "implements-files";

const COMMON_ROUTER_IMPORTS: [&str; 2] = ["ActivatedRouteSnapshot", "RouterStateSnapshot"];

/// Router interfaces a class-based guard can implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardInterface {
    CanActivate,
    CanActivateChild,
    CanDeactivate,
    CanLoad,
    CanMatch,
}

impl GuardInterface {
    const ALL: [GuardInterface; 5] = [
        GuardInterface::CanActivate,
        GuardInterface::CanActivateChild,
        GuardInterface::CanDeactivate,
        GuardInterface::CanLoad,
        GuardInterface::CanMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuardInterface::CanActivate => "CanActivate",
            GuardInterface::CanActivateChild => "CanActivateChild",
            GuardInterface::CanDeactivate => "CanDeactivate",
            GuardInterface::CanLoad => "CanLoad",
            GuardInterface::CanMatch => "CanMatch",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == raw)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "implements",
                    format!("'{}' is not a guard interface", raw),
                    Some(raw.to_string()),
                    Some(vec![format!(
                        "Valid interfaces: {}",
                        Self::ALL.map(|i| i.as_str()).join(", ")
                    )]),
                )
            })
    }

    /// `CanDeactivate` is the only parameterized interface; in the
    /// implemented-interfaces list it appears applied to an unknown payload.
    fn implementation(&self) -> &'static str {
        match self {
            GuardInterface::CanDeactivate => "CanDeactivate<unknown>",
            other => other.as_str(),
        }
    }
}

/// The two mutually exclusive shapes of a generated guard.
///
/// Constructing from bound options enforces the exclusion up front, so the
/// template-selection code below never sees an ambiguous combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardKind {
    Functional { fn_type: String },
    ClassBased { implements: Vec<GuardInterface> },
}

impl GuardKind {
    pub fn from_options(options: &Map<String, Value>) -> Result<GuardKind> {
        let implements = parse_implements(options.get("implements"))?;
        let guard_type = options.get("guardType").and_then(Value::as_str);

        match (implements.is_empty(), guard_type) {
            (false, Some(_)) => Err(Error::options_conflict("implements", "guardType")),
            (_, Some(guard_type)) => Ok(GuardKind::Functional {
                fn_type: fn_type_name(guard_type),
            }),
            (true, None) => Ok(GuardKind::ClassBased {
                implements: vec![GuardInterface::CanActivate],
            }),
            (false, None) => Ok(GuardKind::ClassBased { implements }),
        }
    }
}

fn parse_implements(value: Option<&Value>) -> Result<Vec<GuardInterface>> {
    let items: Vec<&str> = match value {
        None => return Ok(Vec::new()),
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().ok_or_else(|| {
                    Error::validation_invalid_argument(
                        "implements",
                        "Guard interfaces must be strings",
                        None,
                        None,
                    )
                })
            })
            .collect::<Result<_>>()?,
        Some(other) => {
            return Err(Error::validation_invalid_argument(
                "implements",
                "Expected a list of guard interfaces",
                Some(other.to_string()),
                None,
            ))
        }
    };

    items.into_iter().map(GuardInterface::parse).collect()
}

/// `canActivate` -> `CanActivateFn`. Only the `can` prefix is capitalized;
/// anything else passes through with the `Fn` suffix appended.
fn fn_type_name(guard_type: &str) -> String {
    let capitalized = match guard_type.strip_prefix("can") {
        Some(rest) => format!("Can{}", rest),
        None => guard_type.to_string(),
    };
    format!("{}Fn", capitalized)
}

/// Select the guard template set and compute its substitution variables.
pub fn select_template(kind: &GuardKind) -> (&'static str, Vec<(&'static str, String)>) {
    match kind {
        GuardKind::Functional { fn_type } => (
            TYPE_TEMPLATES,
            vec![(TemplateVars::GUARD_TYPE, fn_type.clone())],
        ),
        GuardKind::ClassBased { implements } => {
            let implementations = implements
                .iter()
                .map(|i| i.implementation())
                .collect::<Vec<_>>()
                .join(", ");

            let mut imports: Vec<String> =
                implements.iter().map(|i| i.as_str().to_string()).collect();
            imports.push("UrlTree".to_string());

            let load_or_match = implements.iter().any(|i| {
                matches!(i, GuardInterface::CanLoad | GuardInterface::CanMatch)
            });

            if load_or_match {
                imports.push("Route".to_string());
                imports.push("UrlSegment".to_string());

                if implements.len() > 1 {
                    imports.extend(COMMON_ROUTER_IMPORTS.map(String::from));
                }
            } else {
                imports.extend(COMMON_ROUTER_IMPORTS.map(String::from));
            }

            // Canonical ordering so repeated generation is byte-identical
            imports.sort();
            imports.dedup();

            (
                IMPLEMENTS_TEMPLATES,
                vec![
                    (TemplateVars::IMPLEMENTATIONS, implementations),
                    (TemplateVars::ROUTER_IMPORTS, imports.join(", ")),
                ],
            )
        }
    }
}
