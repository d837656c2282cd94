//! Read-only request inputs and the mutable outgoing response.
//!
//! The GraphQL engine itself is an external collaborator; these are the
//! only shapes the governance layer needs from it.

use serde_json::Value;

/// Label used for operations the document does not name.
pub const ANONYMOUS_OPERATION: &str = "anonymous";

/// What the surrounding pipeline knows about a request once the operation
/// has been identified. All fields are read-only inputs to this layer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Operation name, if the document names one
    pub operation_name: Option<String>,
    /// Operation variables, logged on timeout for diagnosis
    pub variables: Option<Value>,
    /// IP-like identifier of the caller
    pub client_ip: Option<String>,
    /// Authenticated identity hint, when the session layer provides one
    pub user_id: Option<String>,
}

impl RequestContext {
    /// Context for a named operation with nothing else known.
    pub fn named(operation_name: &str) -> Self {
        Self {
            operation_name: Some(operation_name.to_string()),
            ..Self::default()
        }
    }

    /// The operation name, or the anonymous placeholder.
    pub fn operation_label(&self) -> &str {
        self.operation_name.as_deref().unwrap_or(ANONYMOUS_OPERATION)
    }
}

/// The outgoing response as the pipeline is about to send it.
#[derive(Debug, Clone, Default)]
pub struct OperationResponse {
    /// Resolver data, if execution produced any
    pub data: Option<Value>,
    /// GraphQL-shaped error objects
    pub errors: Vec<Value>,
}

impl OperationResponse {
    /// A successful response carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Whether execution produced any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_label_fallback() {
        assert_eq!(RequestContext::named("Login").operation_label(), "Login");
        assert_eq!(RequestContext::default().operation_label(), "anonymous");
    }

    #[test]
    fn test_response_error_detection() {
        assert!(!OperationResponse::success(json!({"ok": true})).has_errors());

        let response = OperationResponse {
            data: None,
            errors: vec![json!({"message": "boom"})],
        };
        assert!(response.has_errors());
    }
}
