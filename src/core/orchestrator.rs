//! Conversion orchestration over a mutable interaction state.
//!
//! Every call to [`Orchestrator::start_conversion`] is an invocation
//! tagged with a monotonic sequence number. Only the most recent invocation
//! may commit results or release the loading flag; anything older finishes
//! quietly and its results are dropped.

use super::conversion::{ConversionRequest, ConversionResult, convert, parse_amount};
use super::currency::{CurrencyRateProvider, find_currency, popular_targets};
use super::error::ConversionError;
use futures::FutureExt;
use futures::future::{self, BoxFuture, try_join, try_join_all};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub amount: String,
    pub source: String,
    pub target: String,
    pub primary: Option<ConversionResult>,
    pub secondary: Vec<ConversionResult>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl InteractionState {
    pub fn new(amount: &str, source: &str, target: &str) -> Self {
        Self {
            amount: amount.to_string(),
            source: source.to_uppercase(),
            target: target.to_uppercase(),
            primary: None,
            secondary: Vec::new(),
            is_loading: false,
            error_message: None,
        }
    }

    pub fn has_valid_amount(&self) -> bool {
        parse_amount(&self.amount).is_ok()
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new("1", "USD", "EUR")
    }
}

/// Which currency selector a session change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

pub struct Orchestrator {
    provider: Arc<dyn CurrencyRateProvider>,
    state: Mutex<InteractionState>,
    latest: AtomicU64,
}

/// Clears `is_loading` when the owning invocation ends, however it ends.
struct LoadingGuard<'a> {
    orchestrator: &'a Orchestrator,
    seq: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.orchestrator.lock_state();
        if self.orchestrator.is_latest(self.seq) {
            state.is_loading = false;
        }
    }
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CurrencyRateProvider>, initial: InteractionState) -> Self {
        Self {
            provider,
            state: Mutex::new(initial),
            latest: AtomicU64::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, InteractionState> {
        // State is plain data; a panic elsewhere cannot leave it half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_invocation(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    pub fn snapshot(&self) -> InteractionState {
        self.lock_state().clone()
    }

    /// Updates the amount text. Never triggers a fetch.
    pub fn set_amount(&self, text: &str) {
        self.lock_state().amount = text.to_string();
    }

    pub async fn set_source(&self, code: &str) -> Result<bool, ConversionError> {
        self.set_currency(Side::Source, code).await
    }

    pub async fn set_target(&self, code: &str) -> Result<bool, ConversionError> {
        self.set_currency(Side::Target, code).await
    }

    /// Changes one currency selector. Returns whether a conversion was run,
    /// which happens only if the code changed and the amount is valid.
    pub async fn set_currency(&self, side: Side, code: &str) -> Result<bool, ConversionError> {
        let should_run = self.select_currency(side, code)?;
        if should_run {
            self.handle_conversion_request().await;
        }
        Ok(should_run)
    }

    /// Applies a currency selection without converting. Returns whether the
    /// change calls for a conversion.
    pub fn select_currency(&self, side: Side, code: &str) -> Result<bool, ConversionError> {
        let descriptor = find_currency(code)
            .ok_or_else(|| ConversionError::UnsupportedCurrency(code.to_string()))?;

        let mut state = self.lock_state();
        let slot = match side {
            Side::Source => &mut state.source,
            Side::Target => &mut state.target,
        };
        if slot.as_str() == descriptor.code {
            return Ok(false);
        }
        *slot = descriptor.code.to_string();
        Ok(state.has_valid_amount())
    }

    /// Exchanges source and target. Counts as a currency change.
    pub async fn swap_currencies(&self) -> bool {
        let should_run = self.swap_selection();
        if should_run {
            self.handle_conversion_request().await;
        }
        should_run
    }

    /// Swap half of [`Orchestrator::swap_currencies`], without converting.
    pub fn swap_selection(&self) -> bool {
        let mut state = self.lock_state();
        if state.source == state.target {
            return false;
        }
        let state = &mut *state;
        std::mem::swap(&mut state.source, &mut state.target);
        state.has_valid_amount()
    }

    /// Explicit user action.
    pub async fn trigger(&self) -> InteractionState {
        self.handle_conversion_request().await
    }

    pub async fn handle_conversion_request(&self) -> InteractionState {
        match self.start_conversion().await {
            Some(state) => state,
            None => self.snapshot(),
        }
    }

    /// Begins an invocation right away and returns the fetch half as a
    /// future.
    ///
    /// The sequence number, validation and loading flag are settled before
    /// this returns, so a later call supersedes this one even if the
    /// returned future has not been polled yet. The future resolves to the
    /// committed (or rejected) state, or `None` once superseded. Dropping it
    /// releases the loading flag like any other exit.
    pub fn start_conversion(&self) -> BoxFuture<'_, Option<InteractionState>> {
        let seq = self.begin_invocation();

        let (amount, source, target) = {
            let mut state = self.lock_state();
            match parse_amount(&state.amount) {
                Ok(amount) => {
                    state.is_loading = true;
                    state.error_message = None;
                    (amount, state.source.clone(), state.target.clone())
                }
                Err(err) => {
                    debug!(seq, amount = %state.amount, "Rejected conversion request");
                    state.error_message = Some(err.user_message());
                    state.is_loading = false;
                    return future::ready(Some(state.clone())).boxed();
                }
            }
        };
        let loading = LoadingGuard {
            orchestrator: self,
            seq,
        };
        debug!(seq, %source, %target, amount, "Starting conversion");

        async move {
            let _loading = loading;
            let outcome = self.fetch_all(&source, &target, amount).await;

            let mut state = self.lock_state();
            if !self.is_latest(seq) {
                debug!(seq, "Discarding results of superseded conversion");
                return None;
            }

            match outcome {
                Ok((primary, secondary)) => {
                    debug!(seq, results = secondary.len() + 1, "Committing conversion");
                    state.primary = Some(primary);
                    state.secondary = secondary;
                    state.error_message = None;
                }
                Err(err) => {
                    warn!(seq, error = %err, "Conversion failed");
                    state.error_message = Some(err.user_message());
                }
            }
            state.is_loading = false;
            Some(state.clone())
        }
        .boxed()
    }

    async fn fetch_all(
        &self,
        source: &str,
        target: &str,
        amount: f64,
    ) -> Result<(ConversionResult, Vec<ConversionResult>), ConversionError> {
        let provider = self.provider.as_ref();
        let primary_request = ConversionRequest::new(source, target, amount);
        let secondary_requests: Vec<_> = popular_targets(source)
            .map(|c| ConversionRequest::new(source, c.code, amount))
            .collect();

        let primary = convert(provider, &primary_request);
        let secondary = try_join_all(
            secondary_requests
                .iter()
                .map(|request| convert(provider, request)),
        );
        try_join(primary, secondary).await
    }
}
