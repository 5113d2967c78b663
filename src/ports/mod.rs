//! Port traits for external collaborators.

pub mod config_port;
pub mod slice_port;
pub mod trade_port;
