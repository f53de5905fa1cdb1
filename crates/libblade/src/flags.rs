//! Resolution of raw invocation arguments into validated flag values
use std::collections::HashMap;

use crate::response::{ErrorCode, Response};
use crate::spec::{ActionSpec, CommandSpec, FlagSpec};

/// Value a switch flag resolves to when it is present
pub const FLAG_SET: &str = "true";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("less parameter: {0}")]
    ParameterLess(String),
}

impl From<FlagError> for Response {
    fn from(err: FlagError) -> Self {
        match err {
            FlagError::ParameterLess(name) => {
                Response::fail(ErrorCode::ParameterLess, ErrorCode::ParameterLess.render(&[&name]))
            }
        }
    }
}

/// Flag values of one invocation, keyed by flag name.
///
/// Flags that were not supplied read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFlags {
    values: HashMap<String, String>,
}

impl ResolvedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Whether a switch flag, or any flag with a non-empty value, is set
    pub fn is_set(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn insert<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.values.insert(name.into(), value.into());
    }
}

impl<N, V> FromIterator<(N, V)> for ResolvedFlags
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut flags = ResolvedFlags::new();
        for (name, value) in iter {
            flags.insert(name, value);
        }
        flags
    }
}

/// Resolves raw arguments against the flags declared by `command` and
/// `action` (command flags, then action matchers, then action flags).
///
/// Arguments whose name is not declared are ignored rather than rejected, so
/// that callers built against a newer flag set keep working against an older
/// action.
pub fn resolve(
    command: &CommandSpec,
    action: &ActionSpec,
    raw: &HashMap<String, String>,
) -> Result<ResolvedFlags, FlagError> {
    let declared = command
        .flags()
        .iter()
        .chain(action.matchers())
        .chain(action.flags());
    resolve_declared(declared, raw)
}

fn resolve_declared<'a, I>(
    declared: I,
    raw: &HashMap<String, String>,
) -> Result<ResolvedFlags, FlagError>
where
    I: IntoIterator<Item = &'a FlagSpec>,
{
    let mut resolved = ResolvedFlags::new();
    for flag in declared {
        let value = match (flag.takes_value(), raw.get(flag.name())) {
            (false, Some(_)) => FLAG_SET.to_owned(),
            (false, None) => String::new(),
            (true, Some(value)) => value.clone(),
            (true, None) => String::new(),
        };
        if flag.is_required() && value.is_empty() {
            tracing::debug!(flag = flag.name(), "required flag is missing");
            return Err(FlagError::ParameterLess(flag.name().to_owned()));
        }
        resolved.insert(flag.name(), value);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn declared() -> Vec<FlagSpec> {
        vec![
            FlagSpec::value("endpoint", "runtime endpoint"),
            FlagSpec::value("container-id", "container id").required(),
            FlagSpec::switch("force", "force remove"),
        ]
    }

    fn resolve_raw(pairs: &[(&str, &str)]) -> Result<ResolvedFlags, FlagError> {
        resolve_declared(&declared(), &raw(pairs))
    }

    #[test]
    fn test_switch_normalization() {
        let flags = resolve_raw(&[("container-id", "abc"), ("force", "")]).unwrap();
        assert_eq!(flags.get("force"), FLAG_SET);

        // any raw value of a switch means "set"
        let flags = resolve_raw(&[("container-id", "abc"), ("force", "false")]).unwrap();
        assert_eq!(flags.get("force"), FLAG_SET);

        let flags = resolve_raw(&[("container-id", "abc")]).unwrap();
        assert_eq!(flags.get("force"), "");
        assert!(!flags.is_set("force"));
    }

    #[test]
    fn test_value_pass_through() {
        let flags = resolve_declared(
            &declared(),
            &raw(&[("container-id", "a76d53933d3f"), ("endpoint", "tcp://10.0.0.1:2375")]),
        )
        .unwrap();
        assert_eq!(flags.get("container-id"), "a76d53933d3f");
        assert_eq!(flags.get("endpoint"), "tcp://10.0.0.1:2375");

        let flags = resolve_declared(&declared(), &raw(&[("container-id", "abc")])).unwrap();
        assert_eq!(flags.get("endpoint"), "");
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            resolve_declared(&declared(), &raw(&[("force", "")])),
            Err(FlagError::ParameterLess("container-id".to_owned()))
        );
        assert_eq!(
            resolve_declared(&declared(), &raw(&[("container-id", "")])),
            Err(FlagError::ParameterLess("container-id".to_owned()))
        );

        let resp: Response = FlagError::ParameterLess("container-id".to_owned()).into();
        assert_eq!(resp.error_code(), Some(ErrorCode::ParameterLess));
        assert!(resp.message().contains("container-id"));
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let flags = resolve_raw(&[("container-id", "abc"), ("timeout", "10")]).unwrap();
        assert_eq!(flags.get("timeout"), "");
        assert_eq!(flags.get("container-id"), "abc");
    }
}
