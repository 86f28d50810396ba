use thiserror::Error;

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid amount";
pub const CONVERSION_FAILED_MESSAGE: &str = "Failed to convert currency. Please try again.";

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid amount")]
    InvalidAmount,

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("rate provider failed: {0:#}")]
    Provider(anyhow::Error),

    #[error("no rate for {target} in {base} rate table")]
    MissingRate { base: String, target: String },
}

impl From<anyhow::Error> for ConversionError {
    fn from(err: anyhow::Error) -> Self {
        ConversionError::Provider(err)
    }
}

impl ConversionError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConversionError::InvalidAmount | ConversionError::UnsupportedCurrency(_)
        )
    }

    /// Text shown to the user. Provider details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ConversionError::InvalidAmount => INVALID_AMOUNT_MESSAGE.to_string(),
            ConversionError::UnsupportedCurrency(code) => format!("Unsupported currency: {code}"),
            ConversionError::Provider(_) | ConversionError::MissingRate { .. } => {
                CONVERSION_FAILED_MESSAGE.to_string()
            }
        }
    }
}
