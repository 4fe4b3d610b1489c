//! Attendance domain model.
//!
//! # Responsibility
//! - Define the people and attendance records shared by storage and services.
//! - Give role, status and date closed, typed representations.
//!
//! # Invariants
//! - Stored enum words are exactly the ones accepted by the schema CHECKs.
//! - Neither people nor attendance records are mutated after creation.

pub mod attendance;
pub mod person;
