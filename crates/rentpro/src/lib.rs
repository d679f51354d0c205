//! RentPro preference elicitation and recommendation services.
//!
//! `preferences` owns the AHP consistency engine, the caller-side input models and
//! submission gate, and the authoritative profile service. `recommendations` ranks
//! available properties with TOPSIS using the weights derived from a stored profile.

pub mod config;
pub mod error;
pub mod preferences;
pub mod recommendations;
pub mod telemetry;
