//! ClaimGraph Core: error type, SRWR tuning parameters, configuration.

pub mod config;
pub mod error;

pub use config::{ParamRanges, PropagationConfig, SrwrParams};
pub use error::{Error, Result};
