//! Uniform result of an action execution and the stable error-code table
use std::fmt;

use serde::Serialize;

/// Code rendered for a successful response
pub const SUCCESS_CODE: u32 = 200;

/// Coarse grouping of error codes, used by callers that only care about the
/// class of a failure and not the concrete code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A required flag is missing or malformed
    Parameter,
    /// The container runtime could not be reached
    Connect,
    /// The target resource could not be found or inspected
    Lookup,
    /// The runtime operation itself failed
    Exec,
    /// The invocation does not name a known command or action
    Framework,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParameterLess,
    ParameterInvalid,
    ActionNotFound,
    RuntimeConnectFailed,
    RuntimeExecFailed,
    ContainerNotFound,
}

impl ErrorCode {
    /// Numeric code reported to the caller. These values are part of the
    /// output format and must not change.
    pub fn code(&self) -> u32 {
        match self {
            ErrorCode::ParameterLess => 45000,
            ErrorCode::ParameterInvalid => 45001,
            ErrorCode::ActionNotFound => 45002,
            ErrorCode::RuntimeConnectFailed => 55000,
            ErrorCode::RuntimeExecFailed => 55001,
            ErrorCode::ContainerNotFound => 55002,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ParameterLess | ErrorCode::ParameterInvalid => ErrorCategory::Parameter,
            ErrorCode::ActionNotFound => ErrorCategory::Framework,
            ErrorCode::RuntimeConnectFailed => ErrorCategory::Connect,
            ErrorCode::RuntimeExecFailed => ErrorCategory::Exec,
            ErrorCode::ContainerNotFound => ErrorCategory::Lookup,
        }
    }

    /// Message template of the code. Every `{}` is replaced, in order, by the
    /// arguments passed to [`ErrorCode::render`].
    pub fn template(&self) -> &'static str {
        match self {
            ErrorCode::ParameterLess => "less parameter: {}",
            ErrorCode::ParameterInvalid => "invalid parameter: {}",
            ErrorCode::ActionNotFound => "action not found: {}",
            ErrorCode::RuntimeConnectFailed => "{}: connect to container runtime failed, {}",
            ErrorCode::RuntimeExecFailed => "{}: container runtime exec failed, {}",
            ErrorCode::ContainerNotFound => "container not found: {}",
        }
    }

    /// Renders the message template with the given arguments. Missing
    /// arguments leave the placeholder empty, surplus arguments are dropped.
    pub fn render(&self, args: &[&str]) -> String {
        let mut args = args.iter();
        let mut pieces = self.template().split("{}");
        let mut message = pieces.next().unwrap_or_default().to_owned();
        for piece in pieces {
            message.push_str(args.next().copied().unwrap_or_default());
            message.push_str(piece);
        }
        message
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

/// Result of one action execution.
///
/// A response is built once through [`Response::success`] or
/// [`Response::fail`] and never changed afterwards. Only successful responses
/// carry a result payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    code: u32,
    success: bool,
    #[serde(rename = "err", skip_serializing_if = "String::is_empty")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip)]
    error: Option<ErrorCode>,
}

impl Response {
    /// Successful response carrying the invocation id as its result
    pub fn success(uid: &str) -> Self {
        Self::success_with(serde_json::Value::String(uid.to_owned()))
    }

    pub fn success_with(result: serde_json::Value) -> Self {
        Response {
            code: SUCCESS_CODE,
            success: true,
            message: String::new(),
            result: Some(result),
            error: None,
        }
    }

    pub fn fail<S: Into<String>>(code: ErrorCode, message: S) -> Self {
        Response {
            code: code.code(),
            success: false,
            message: message.into(),
            result: None,
            error: Some(code),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The error code of a failed response, `None` on success
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn result(&self) -> Option<&serde_json::Value> {
        self.result.as_ref()
    }

    /// JSON rendering printed by the command line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error {
            None => write!(f, "success"),
            Some(code) => write!(f, "{}: {}", code, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        assert_eq!(
            ErrorCode::ParameterLess.render(&["container-id"]),
            "less parameter: container-id"
        );
        assert_eq!(
            ErrorCode::RuntimeExecFailed.render(&["ContainerRemove", "device busy"]),
            "ContainerRemove: container runtime exec failed, device busy"
        );
        // missing arguments leave the placeholder empty
        assert_eq!(
            ErrorCode::RuntimeConnectFailed.render(&["GetClient"]),
            "GetClient: connect to container runtime failed, "
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let codes = [
            ErrorCode::ParameterLess,
            ErrorCode::ParameterInvalid,
            ErrorCode::ActionNotFound,
            ErrorCode::RuntimeConnectFailed,
            ErrorCode::RuntimeExecFailed,
            ErrorCode::ContainerNotFound,
        ];
        let mut seen = std::collections::HashSet::new();
        for code in codes {
            assert_ne!(code.code(), SUCCESS_CODE);
            assert!(seen.insert(code.code()), "duplicated code {}", code);
        }
    }

    #[test]
    fn test_failure_has_no_result() {
        let resp = Response::fail(ErrorCode::ContainerNotFound, "container not found: abc");
        assert!(!resp.is_success());
        assert!(resp.result().is_none());
        assert_eq!(resp.error_code(), Some(ErrorCode::ContainerNotFound));
        assert_eq!(resp.code(), 55002);
    }

    #[test]
    fn test_json_rendering() {
        let ok = Response::success("1e3b5c7d9f0a2b4c");
        assert_eq!(
            ok.to_json().unwrap(),
            r#"{"code":200,"success":true,"result":"1e3b5c7d9f0a2b4c"}"#
        );

        let failed = Response::fail(ErrorCode::ParameterLess, "less parameter: container-id");
        assert_eq!(
            failed.to_json().unwrap(),
            r#"{"code":45000,"success":false,"err":"less parameter: container-id"}"#
        );
    }
}
