//! # Quill Shared
//!
//! Request/response types shared between the API server and its clients,
//! including the declarative validation rules for every request body.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ApiResponse, ErrorResponse, FieldError};
pub use validation::Normalize;
