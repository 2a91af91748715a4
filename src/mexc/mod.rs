//! MEXC module - Client implementation for the MEXC spot REST API

pub mod auth;
pub mod messages;
pub mod paper;
pub mod rest;

pub use paper::PaperExchange;
pub use rest::MexcRestClient;
