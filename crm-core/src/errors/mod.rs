//! Error types shared by every service in the crate.
//!
//! Services return [`CoreResult`]; the GraphQL layer maps a [`CoreError`] to a
//! response error using its [`CoreErrorKind`] as the extension code and its
//! message verbatim.
//!
//! ```rust
//! use crm::errors::{CoreError, CoreErrorKind};
//!
//! let err = CoreError::not_found("Product", "fakeId");
//! assert_eq!(err.kind(), CoreErrorKind::NotFound);
//! assert_eq!(err.message(), "Product not found");
//! ```

pub mod core_error;

pub use core_error::{CoreError, CoreErrorKind};

/// Result type alias for service operations
pub type CoreResult<T> = Result<T, CoreError>;
