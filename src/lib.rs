//! `terragram` - CLI orchestrator that drives an external infrastructure
//! planning engine and turns its output into shareable, secret-free
//! artifacts.
//!
//! See `README.md` for user documentation and `DESIGN.md` for architecture.

pub mod auth;
pub mod bus;
pub mod cli;
pub mod convert;
pub mod errors;
pub mod events;
pub mod exit_codes;
pub mod pipeline;
pub mod progress;
pub mod runner;
pub mod strip;
pub mod ux;
