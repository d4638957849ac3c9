// File: src/bridge.rs
// Purpose: Remote validation bridge — decode, re-validate, respond

use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::token::{ParameterToken, TokenError, TokenSecret};

/// Verdict from the authoritative validator for one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

/// The trusted server-side rule engine. External to this crate; the
/// bridge brokers exactly one rule per request through it. `rule_line`
/// is the canonical `name:p1,p2` form rebuilt from decoded parameters.
pub trait AuthoritativeValidator {
    fn check(&self, field: &str, value: &str, rule_line: &str) -> anyhow::Result<Verdict>;
}

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The parameter token was malformed or failed verification. The
    /// authoritative validator is never invoked in this case, and the
    /// wire response must stay generic so a client cannot probe the
    /// token scheme or forge looser constraints.
    #[error("remote validation request rejected")]
    Decode(#[from] TokenError),
    /// The external validator itself failed. Not retried here; whole-
    /// request retry is the transport's call.
    #[error("authoritative validator failed")]
    Validator(#[source] anyhow::Error),
}

/// Submitted values plus the opaque `params` token, as posted by the
/// client runtime. Field order is preserved so "first failure" is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct RemoteRequest {
    pub params: String,
    pub fields: Vec<(String, String)>,
}

impl RemoteRequest {
    /// Split the reserved `params` entry out of submitted key/value
    /// pairs. A `_token` entry (CSRF, a transport concern) is dropped.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut request = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "params" => request.params = value,
                "_token" => {}
                _ => request.fields.push((key, value)),
            }
        }
        request
    }
}

/// Outcome for the wire: JSON `true` on success, otherwise the first
/// failing field's human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    Valid,
    Invalid(String),
}

impl RemoteOutcome {
    pub fn to_json(&self) -> JsonValue {
        match self {
            RemoteOutcome::Valid => json!(true),
            RemoteOutcome::Invalid(message) => json!(message),
        }
    }
}

/// One-pass request/response bridge: decode the parameter token, re-run
/// the authoritative validator over every submitted value, respond.
///
/// Stateless per call and safe to invoke concurrently for independent
/// requests. This is the trust boundary: the token and field names are
/// client-visible, so only the decoded parameters re-combined with the
/// server-known rule name are treated as ground truth.
pub struct RemoteValidationBridge<'a, V: AuthoritativeValidator + ?Sized> {
    secret: &'a TokenSecret,
    validator: &'a V,
}

impl<'a, V: AuthoritativeValidator + ?Sized> RemoteValidationBridge<'a, V> {
    pub fn new(secret: &'a TokenSecret, validator: &'a V) -> Self {
        Self { secret, validator }
    }

    /// Handle one remote validation request for `rule_name`.
    pub fn handle(
        &self,
        rule_name: &str,
        request: &RemoteRequest,
    ) -> Result<RemoteOutcome, BridgeError> {
        let parameters = ParameterToken::decode(self.secret, &request.params).map_err(|err| {
            tracing::warn!(rule = rule_name, %err, "rejecting remote validation request");
            err
        })?;

        let rule_line = if parameters.is_empty() {
            rule_name.to_string()
        } else {
            format!("{}:{}", rule_name, parameters.join(","))
        };

        for (field, value) in &request.fields {
            match self
                .validator
                .check(field, value, &rule_line)
                .map_err(BridgeError::Validator)?
            {
                Verdict::Pass => {}
                Verdict::Fail(message) => {
                    tracing::debug!(rule = rule_name, field, "remote validation failed");
                    return Ok(RemoteOutcome::Invalid(message));
                }
            }
        }

        Ok(RemoteOutcome::Valid)
    }
}
