//! Core use-case services.
//!
//! # Responsibility
//! - Turn collaborator input into validated repository calls.
//! - Keep UI/FFI/CLI layers decoupled from storage details.

pub mod attendance_service;
