//! # Quill Core
//!
//! The domain layer of the Quill blog.
//! This crate contains the blog's entities, slug and pagination rules, and the
//! ports that infrastructure implements. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
