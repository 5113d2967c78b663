//! Core domain types and logic.

pub mod advisory;
pub mod bands;
pub mod config_validation;
pub mod error;
pub mod events;
pub mod patterns;
pub mod plan;
pub mod refresh;
pub mod scoring;
pub mod slice;
pub mod stats;
pub mod trade;
pub mod trailing;
