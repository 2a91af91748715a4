//! Configuration loading and types

pub mod loader;
pub mod types;

pub use loader::load_config;
pub use types::{AppConfig, RiskPolicy, SymbolRules, UndersizePolicy};
