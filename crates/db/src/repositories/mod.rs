//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod werkleitung_repo;

pub use werkleitung_repo::WerkleitungRepo;
