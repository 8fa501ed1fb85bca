use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

use crate::core::{FormState, RateTable};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn amount_cell(value: Decimal, currency: &str) -> Cell {
    Cell::new(format!("{:.2} {currency}", value.round_dp(2))).set_alignment(CellAlignment::Right)
}

/// Spinner shown while the form waits on its sources.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Renders the outcome of the last evaluation: the result table, the error
/// message, or a hint when nothing has been evaluated yet.
pub fn render_state(state: &FormState) -> String {
    if let Some(error) = &state.error {
        return style_text(&error.to_string(), StyleType::Error);
    }

    let Some(result) = &state.result else {
        return style_text("Nothing to show yet", StyleType::Subtle);
    };

    let from_currency = state.from_account().map_or("", |a| a.currency.as_str());
    let to_currency = state.to_account().map_or("", |a| a.currency.as_str());

    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("You send"),
        header_cell("Rate"),
        header_cell("Fee"),
        header_cell("They receive"),
    ]);
    table.add_row(vec![
        amount_cell(result.from_amount, from_currency),
        Cell::new(result.rate.to_string()).set_alignment(CellAlignment::Right),
        amount_cell(result.fee, from_currency),
        amount_cell(result.to_amount, to_currency),
    ]);

    let mut output = format!(
        "Simulation: {} → {}\n\n",
        style_text(&state.from_account_id, StyleType::Title),
        style_text(&state.to_account_id, StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}: {}",
        style_text("Converted amount", StyleType::TotalLabel),
        style_text(
            &format!("{:.2} {to_currency}", result.to_amount.round_dp(2)),
            StyleType::TotalValue
        )
    ));
    output
}

/// Renders the fetched accounts and the rate table.
pub fn render_sources(state: &FormState) -> String {
    let mut accounts = new_styled_table();
    accounts.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Currency"),
        header_cell("Balance"),
    ]);
    for account in &state.accounts {
        accounts.add_row(vec![
            Cell::new(&account.id),
            Cell::new(&account.name),
            Cell::new(&account.currency),
            Cell::new(format!("{:.2}", account.balance)).set_alignment(CellAlignment::Right),
        ]);
    }

    let mut output = format!("{}\n\n", style_text("Accounts", StyleType::Title));
    output.push_str(&accounts.to_string());
    output.push_str(&format!("\n\n{}\n\n", style_text("Exchange rates", StyleType::Title)));
    output.push_str(&rates_table(&state.rates).to_string());

    if let Some(message) = state.error_message() {
        output.push_str(&format!("\n\n{}", style_text(&message, StyleType::Error)));
    }
    output
}

fn rates_table(rates: &RateTable) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Pair"), header_cell("Rate")]);
    for (pair, rate) in rates.iter() {
        table.add_row(vec![
            Cell::new(pair),
            Cell::new(rate.to_string()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
