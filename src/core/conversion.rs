//! Single currency conversion against a rate provider

use super::currency::CurrencyRateProvider;
use super::error::ConversionError;
use anyhow::anyhow;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub source: String,
    pub target: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(source: &str, target: &str, amount: f64) -> Self {
        Self {
            source: source.to_uppercase(),
            target: target.to_uppercase(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub currency: String,
    pub amount: f64,
    pub rate: f64,
}

/// Parses user input into a strictly positive, finite amount.
pub fn parse_amount(text: &str) -> Result<f64, ConversionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConversionError::InvalidAmount);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConversionError::InvalidAmount),
    }
}

#[instrument(
    name = "Convert",
    skip(provider),
    fields(source = %request.source, target = %request.target)
)]
pub async fn convert(
    provider: &dyn CurrencyRateProvider,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConversionError> {
    let table = provider.latest_rates(&request.source).await?;
    // A zero, negative or non-finite quote is as useless as an absent one
    let rate = table
        .rate_for(&request.target)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| ConversionError::MissingRate {
            base: request.source.clone(),
            target: request.target.clone(),
        })?;

    debug!(rate, "Resolved rate");
    let amount = request.amount * rate;
    if !amount.is_finite() {
        return Err(ConversionError::Provider(anyhow!(
            "Converted amount out of range: {} {} at rate {rate} to {}",
            request.amount,
            request.source,
            request.target
        )));
    }

    Ok(ConversionResult {
        currency: request.target.clone(),
        amount,
        rate,
    })
}
