//! Concrete port implementations.

pub mod csv_trade_adapter;
pub mod file_config_adapter;
pub mod json_slice_adapter;
