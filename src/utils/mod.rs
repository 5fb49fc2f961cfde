//! Utilities module
//!
//! Contains error handling and logging setup

pub mod error;
pub mod logging;
