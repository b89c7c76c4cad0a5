//! # SparkBlog Shared
//!
//! Request/response types spoken between the API server and the HTTP client
//! in `sparkblog-infra`. Kept free of domain logic so both sides can depend on it.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
