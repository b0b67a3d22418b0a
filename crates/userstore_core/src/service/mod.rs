//! Record operations over the data-access client.
//!
//! # Responsibility
//! - Expose the five user operations as independent units of work.
//! - Keep CLI callers decoupled from storage details.

pub mod user_service;
