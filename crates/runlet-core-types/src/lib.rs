//! Core types shared across runlet facilities
//!
//! This crate provides foundational types used by the error, logging and
//! layout code:
//!
//! - **Schema constants**: Canonical field keys and event names
//! - **Platform**: The script namespace a host maps to

pub mod platform;
pub mod schema;

pub use platform::Platform;
