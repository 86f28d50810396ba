//! Core conversion logic and abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod format;
pub mod log;
pub mod orchestrator;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionResult};
pub use currency::{CurrencyDescriptor, CurrencyRateProvider, POPULAR_CURRENCIES, RateTable};
pub use error::ConversionError;
pub use orchestrator::{InteractionState, Orchestrator, Side};
