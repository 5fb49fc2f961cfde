//! Service layer module
//!
//! Contains query validation, the rate provider client, and the currency converter

pub mod client;
pub mod converter;
pub mod validator;

pub use client::{HttpRateProvider, RateProvider};
pub use converter::CurrencyConverter;
