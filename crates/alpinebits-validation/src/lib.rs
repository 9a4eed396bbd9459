//! # AlpineBits Validation
//!
//! The seam through which document rules plug into a chain.
//!
//! - [`Validator`]: checks a value against a validation context
//! - [`ValidationPath`]: where in the document a violation was found
//! - [`Delegate`]: reuses an earlier version's validator unchanged
//! - [`ValidationMiddleware`]: runs a validator as a chain step
//! - [`helper`]: small expectations validators are built from
//!
//! Concrete per-field business rules live outside this crate; [`rules`]
//! holds the few that cross element boundaries.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod helper;
pub mod middleware;
pub mod path;
pub mod rules;
pub mod validator;

pub use error::{ValidationError, ValidationResult};
pub use middleware::ValidationMiddleware;
pub use path::ValidationPath;
pub use validator::{validate_each, Delegate, Validator};
