use async_graphql::*;
use crm::errors::{CoreError, CoreErrorKind};

/// Structured error builder for consistent error handling.
///
/// Messages are passed through unchanged; the `code` extension carries the
/// machine readable category.
pub struct StructuredError;

impl StructuredError {
    /// "<Resource> not found"
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Error {
        Error::new(format!("{} not found", resource)).extend_with(|_, e| {
            e.set("code", "NOT_FOUND");
            e.set("resource", resource);
            e.set("id", id.to_string());
        })
    }

    pub fn unauthorized(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "UNAUTHORIZED");
        })
    }

    pub fn forbidden(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "FORBIDDEN");
        })
    }

    pub fn validation(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "VALIDATION_FAILED");
        })
    }

    pub fn conflict(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "CONFLICT");
        })
    }

    /// An external service the request depends on failed.
    pub fn service(service: &str, message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "SERVICE_ERROR");
            e.set("service", service);
        })
    }

    pub fn internal(message: impl Into<String>) -> Error {
        Error::new(message.into()).extend_with(|_, e| {
            e.set("code", "INTERNAL_ERROR");
        })
    }
}

/// Map a core error onto a GraphQL error, keeping its message and fields.
pub fn core_error_to_graphql_error(err: CoreError) -> Error {
    let message = err.message().to_string();

    let error = match err.kind() {
        CoreErrorKind::NotFound => {
            let fields = err.fields();
            let resource = fields
                .and_then(|f| f.get("entity"))
                .map(String::as_str)
                .unwrap_or("Resource");
            let id = fields
                .and_then(|f| f.get("id"))
                .cloned()
                .unwrap_or_default();
            StructuredError::not_found(resource, id)
        }
        CoreErrorKind::Validation => StructuredError::validation(message),
        CoreErrorKind::Conflict => StructuredError::conflict(message),
        CoreErrorKind::Forbidden => StructuredError::forbidden(message),
        CoreErrorKind::Unauthorized => StructuredError::unauthorized(message),
        CoreErrorKind::Unavailable => {
            tracing::warn!(error = ?err, "Upstream service call failed");
            StructuredError::service("engages", message)
        }
        CoreErrorKind::Internal => {
            tracing::error!(error = ?err, "Internal error while resolving request");
            StructuredError::internal(message)
        }
    };

    match (err.kind(), err.fields()) {
        (CoreErrorKind::NotFound, _) | (_, None) => error,
        (_, Some(fields)) => {
            let fields = fields.clone();
            error.extend_with(move |_, e| {
                for (key, value) in &fields {
                    e.set(key.as_str(), value.as_str());
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_keeps_entity_message() {
        let error = StructuredError::not_found("Customer", "c1");
        assert_eq!(error.message, "Customer not found");
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let error = StructuredError::validation("Cannot change category");
        assert_eq!(error.message, "Cannot change category");
    }
}
