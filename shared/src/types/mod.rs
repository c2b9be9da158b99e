//! Type definitions module
//!
//! - `response` - API response wrappers returned to HTTP-layer collaborators

pub mod response;

pub use response::ApiResponse;
