use super::ui;
use crate::core::currency::find_currency;
use crate::core::format::{format_currency, format_rate};
use crate::core::{ConversionResult, InteractionState, Orchestrator};
use anyhow::{Result, bail};
use comfy_table::Cell;

fn currency_label(code: &str) -> String {
    find_currency(code).map_or(code.to_string(), |c| format!("{} ({})", c.code, c.name))
}

fn secondary_table(results: &[ConversionResult]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
    ]);

    for result in results {
        table.add_row(vec![
            Cell::new(currency_label(&result.currency)),
            ui::amount_cell(format_currency(result.amount, &result.currency)),
            ui::rate_cell(format_rate(result.rate)),
        ]);
    }
    table.to_string()
}

/// Renders the displayed portion of the interaction state.
pub fn render_state(state: &InteractionState) -> String {
    let mut output = String::new();

    if let Some(error) = &state.error_message {
        output.push_str(&ui::style_text(error, ui::StyleType::Error));
        output.push('\n');
    }

    if state.is_loading {
        output.push_str(&ui::style_text("Converting...", ui::StyleType::Subtle));
        output.push('\n');
    }

    if let Some(primary) = &state.primary {
        output.push_str(&format!(
            "\n{}\n{}\n{}\n",
            ui::style_text("Conversion Result", ui::StyleType::Title),
            ui::style_text(
                &format_currency(primary.amount, &primary.currency),
                ui::StyleType::ResultValue
            ),
            ui::style_text(
                &format!(
                    "Exchange Rate: 1 {} = {} {}",
                    state.source,
                    format_rate(primary.rate),
                    primary.currency
                ),
                ui::StyleType::Subtle
            ),
        ));
    }

    if !state.secondary.is_empty() {
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            ui::style_text("Popular Currencies", ui::StyleType::Title),
            secondary_table(&state.secondary)
        ));
    }

    output
}

/// Runs one conversion with a spinner while rates load.
pub async fn run_with_spinner(orchestrator: &Orchestrator) -> InteractionState {
    let spinner = ui::new_spinner("Converting...");
    let state = orchestrator.trigger().await;
    spinner.finish_and_clear();
    state
}

pub async fn run(orchestrator: &Orchestrator) -> Result<()> {
    let state = run_with_spinner(orchestrator).await;
    print!("{}", render_state(&state));

    if let Some(error) = state.error_message {
        bail!(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(currency: &str, amount: f64, rate: f64) -> ConversionResult {
        ConversionResult {
            currency: currency.to_string(),
            amount,
            rate,
        }
    }

    #[test]
    fn test_render_successful_state() {
        let mut state = InteractionState::new("100", "USD", "EUR");
        state.primary = Some(result("EUR", 92.0, 0.92));
        state.secondary = vec![result("EUR", 92.0, 0.92), result("JPY", 15025.0, 150.25)];

        let output = console::strip_ansi_codes(&render_state(&state)).to_string();
        assert!(output.contains("Conversion Result"));
        assert!(output.contains("€92.00"));
        assert!(output.contains("Exchange Rate: 1 USD = 0.9200 EUR"));
        assert!(output.contains("Popular Currencies"));
        assert!(output.contains("JPY (Japanese Yen)"));
        assert!(output.contains("¥15,025.00"));
        assert!(output.contains("150.2500"));
    }

    #[test]
    fn test_render_error_keeps_previous_results() {
        let mut state = InteractionState::new("100", "USD", "EUR");
        state.primary = Some(result("EUR", 92.0, 0.92));
        state.error_message = Some("Failed to convert currency. Please try again.".to_string());

        let output = console::strip_ansi_codes(&render_state(&state)).to_string();
        assert!(output.starts_with("Failed to convert currency. Please try again."));
        assert!(output.contains("€92.00"));
        assert!(!output.contains("Popular Currencies"));
    }

    #[test]
    fn test_render_empty_state() {
        let state = InteractionState::default();
        assert!(render_state(&state).is_empty());
    }

    #[test]
    fn test_render_loading_state() {
        let mut state = InteractionState::default();
        state.is_loading = true;
        let output = console::strip_ansi_codes(&render_state(&state)).to_string();
        assert_eq!(output.trim(), "Converting...");
    }
}
