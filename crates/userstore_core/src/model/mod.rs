//! Domain model for users and their preferences.
//!
//! # Invariants
//! - Every record is identified by a stable, generated UUID.
//! - `email` uniquely identifies a user; the store enforces it.

pub mod user;
