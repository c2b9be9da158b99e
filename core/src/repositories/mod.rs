//! Repository interfaces for external collaborators.

pub mod user;

pub use user::{MockUserRepository, UserRepository};
