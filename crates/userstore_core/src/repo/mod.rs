//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data-access contract used by record operations.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate payloads before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `UniqueViolation`)
//!   in addition to DB transport errors.

pub mod user_repo;
