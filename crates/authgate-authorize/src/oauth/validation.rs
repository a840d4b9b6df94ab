//! Structural validation of authorization requests.
//!
//! Each parameter is checked by an explicit rule in a fixed order. Every
//! violation is collected as a [`FieldError`] so the client sees all of its
//! mistakes at once, and the failure is then mapped onto the two error codes
//! RFC 6749 allows at this stage.

use std::fmt;

use url::Url;

use super::authorize::{
    AuthorizationErrorCode, AuthorizationRequest, CodeChallengeMethod, ResponseType,
};
use super::params::{ParamValue, RequestParams};

/// What was wrong with a single parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required parameter is missing.
    Missing,
    /// A required parameter is present but empty.
    Empty,
    /// The parameter was sent more than once.
    Repeated,
    /// The value does not parse as an absolute URI.
    InvalidUri(String),
    /// The value is not the single literal the endpoint accepts.
    Literal {
        /// The only accepted value.
        expected: &'static str,
    },
}

/// A violation of one field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// Kind of violation.
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn new(field: &'static str, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// Returns `true` if the value was present but not the accepted literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, FieldErrorKind::Literal { .. })
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: field required", self.field),
            FieldErrorKind::Empty => write!(f, "{}: must not be empty", self.field),
            FieldErrorKind::Repeated => write!(f, "{}: must not be repeated", self.field),
            FieldErrorKind::InvalidUri(reason) => {
                write!(f, "{}: must be an absolute URI ({reason})", self.field)
            }
            FieldErrorKind::Literal { expected } => {
                write!(f, "{}: input should be '{expected}'", self.field)
            }
        }
    }
}

/// All field errors found in one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid authorization request: {} field error(s)", .errors.len())]
pub struct ValidationFailure {
    /// Field errors in rule order. Never empty.
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Maps the failure onto an RFC 6749 error code.
    ///
    /// The failure is `unsupported_response_type` when the first literal
    /// violation concerns `response_type`; everything else is
    /// `invalid_request`.
    #[must_use]
    pub fn error_code(&self) -> AuthorizationErrorCode {
        match self.errors.iter().find(|e| e.is_literal()) {
            Some(e) if e.field == "response_type" => {
                AuthorizationErrorCode::UnsupportedResponseType
            }
            _ => AuthorizationErrorCode::InvalidRequest,
        }
    }

    /// Human-readable description, one line per field error.
    #[must_use]
    pub fn description(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Validates raw parameters into an [`AuthorizationRequest`].
///
/// # Errors
///
/// Returns every violated field rule when the request is not structurally
/// valid.
pub fn validate_request(params: &RequestParams) -> Result<AuthorizationRequest, ValidationFailure> {
    let mut errors = Vec::new();

    let client_id = required(params, "client_id", &mut errors);

    let redirect_uri = optional(params, "redirect_uri", &mut errors).and_then(|raw| {
        Url::parse(raw)
            .map_err(|e| {
                errors.push(FieldError::new(
                    "redirect_uri",
                    FieldErrorKind::InvalidUri(e.to_string()),
                ))
            })
            .ok()
    });

    let response_type = required(params, "response_type", &mut errors).and_then(|raw| {
        if raw == ResponseType::Code.as_str() {
            Some(ResponseType::Code)
        } else {
            errors.push(literal_error("response_type", ResponseType::Code.as_str()));
            None
        }
    });

    let code_challenge = required(params, "code_challenge", &mut errors);

    let code_challenge_method =
        optional(params, "code_challenge_method", &mut errors).and_then(|raw| {
            if raw == CodeChallengeMethod::S256.as_str() {
                Some(CodeChallengeMethod::S256)
            } else {
                errors.push(literal_error(
                    "code_challenge_method",
                    CodeChallengeMethod::S256.as_str(),
                ));
                None
            }
        });

    let state = optional(params, "state", &mut errors);
    let scope = optional(params, "scope", &mut errors);
    let resource = optional(params, "resource", &mut errors);

    match (client_id, response_type, code_challenge) {
        (Some(client_id), Some(response_type), Some(code_challenge)) if errors.is_empty() => {
            Ok(AuthorizationRequest {
                client_id: client_id.to_string(),
                redirect_uri,
                response_type,
                code_challenge: code_challenge.to_string(),
                code_challenge_method,
                state: state.map(str::to_string),
                scope: scope.map(str::to_string),
                resource: resource.map(str::to_string),
            })
        }
        _ => Err(ValidationFailure { errors }),
    }
}

fn literal_error(field: &'static str, expected: &'static str) -> FieldError {
    FieldError::new(field, FieldErrorKind::Literal { expected })
}

/// A parameter that must be present exactly once and non-empty.
fn required<'a>(
    params: &'a RequestParams,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match params.lookup(field) {
        ParamValue::Single("") => {
            errors.push(FieldError::new(field, FieldErrorKind::Empty));
            None
        }
        ParamValue::Single(value) => Some(value),
        ParamValue::Absent => {
            errors.push(FieldError::new(field, FieldErrorKind::Missing));
            None
        }
        ParamValue::Repeated => {
            errors.push(FieldError::new(field, FieldErrorKind::Repeated));
            None
        }
    }
}

/// A parameter that may be absent but must not be repeated.
fn optional<'a>(
    params: &'a RequestParams,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    match params.lookup(field) {
        ParamValue::Single(value) => Some(value),
        ParamValue::Absent => None,
        ParamValue::Repeated => {
            errors.push(FieldError::new(field, FieldErrorKind::Repeated));
            None
        }
    }
}
