//! runlet Engine - Orchestration layer
//!
//! Provides the handlers behind each `run` subcommand. They parse and
//! validate arguments with runlet-core, drive the index engines in
//! runlet-store, and own the start/end logging for every operation.

pub mod commands;
