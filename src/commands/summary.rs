//! Monthly summary and chart command handlers.

use crate::commands::{Money, Out};
use crate::model::YearMonth;
use crate::summary::{CategoryTotal, DailyFlow, MonthlySummary};
use crate::{Config, Result};
use chrono::Local;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// The widest bar drawn by the chart commands, in characters.
const BAR_WIDTH: u32 = 40;

/// Shows the income, expense, balance and daily budget of `month`.
pub async fn summary(config: Config, month: YearMonth) -> Result<Out<MonthlySummary>> {
    let (summary, money) = compute(&config, month).await?;

    let message = format!(
        "{month}\n  Income:       {:>14}\n  Expense:      {:>14}\n  Balance:      {:>14}\n  \
         Daily budget: {:>14}",
        money.format(summary.income),
        money.format(summary.expense),
        money.format(summary.balance),
        money.format(summary.daily_budget),
    );
    Ok(Out::new(message, summary))
}

/// Shows income and expense per day of `month` as a bar chart.
pub async fn chart_flow(config: Config, month: YearMonth) -> Result<Out<DailyFlow>> {
    let (summary, money) = compute(&config, month).await?;
    let flow = summary.daily_flow;

    let max = flow
        .income
        .iter()
        .chain(flow.expense.iter())
        .copied()
        .max()
        .unwrap_or_default();

    let mut message = format!("Daily flow for {month}");
    for (ix, (income, expense)) in flow.income.iter().zip(flow.expense.iter()).enumerate() {
        let day = ix + 1;
        if !income.is_zero() {
            message.push_str(&format!(
                "\n  {day:>2} + {:>14} {}",
                money.format(*income),
                bar(*income, max, '+')
            ));
        }
        if !expense.is_zero() {
            message.push_str(&format!(
                "\n  {day:>2} - {:>14} {}",
                money.format(*expense),
                bar(*expense, max, '-')
            ));
        }
    }
    Ok(Out::new(message, flow))
}

/// Shows the expenses of `month` grouped by category, with each category's share.
pub async fn chart_categories(config: Config, month: YearMonth) -> Result<Out<Vec<CategoryTotal>>> {
    let (summary, money) = compute(&config, month).await?;
    let totals = summary.expenses_by_category;

    let mut message = format!("Expenses by category for {month}");
    if totals.is_empty() {
        message.push_str("\n  No expenses");
    }
    let width = totals
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or_default();
    for c in &totals {
        message.push_str(&format!(
            "\n  {:<width$}  {:>14}  {:>6}%  {}",
            c.name,
            money.format(c.total),
            c.percent,
            bar(c.percent, Decimal::ONE_HUNDRED, '#'),
        ));
    }
    Ok(Out::new(message, totals))
}

async fn compute(config: &Config, month: YearMonth) -> Result<(MonthlySummary, Money)> {
    let ledger = config.ledger().await?;
    let summary = MonthlySummary::compute(
        ledger.transactions(),
        ledger.categories(),
        month,
        Local::now().date_naive(),
    );
    Ok((summary, Money::new(config, ledger.store()).await))
}

/// A bar of `c` characters whose length is `value` relative to `max`.
fn bar(value: Decimal, max: Decimal, c: char) -> String {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return String::new();
    }
    let len = (value * Decimal::from(BAR_WIDTH) / max)
        .round()
        .to_usize()
        .unwrap_or_default()
        .clamp(1, BAR_WIDTH as usize);
    std::iter::repeat(c).take(len).collect()
}
