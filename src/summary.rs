//! Monthly figures derived from the ledger: balance, daily budget and the two chart series.
//!
//! Everything here is a pure function of the transactions, the categories, the month being
//! viewed and today's date. Nothing is cached; callers recompute after every change.

use crate::model::{Categories, Transaction, TransactionType, YearMonth};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// The figures shown for one month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    /// Income minus expense.
    pub balance: Decimal,
    /// How much can be spent per remaining day of the current month. Zero for other months and
    /// when the balance is not positive.
    pub daily_budget: Decimal,
    pub daily_flow: DailyFlow,
    pub expenses_by_category: Vec<CategoryTotal>,
}

/// Income and expense totals for each day of a month. Index 0 is day 1.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DailyFlow {
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
}

impl DailyFlow {
    pub fn days(&self) -> usize {
        self.income.len()
    }
}

/// Expense total for one category name.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
    /// Share of the month's expenses, in percent, rounded to two places.
    pub percent: Decimal,
}

impl MonthlySummary {
    /// Computes the summary of `month` from `transactions`, which may include transactions from
    /// other months.
    pub fn compute<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        categories: &Categories,
        month: YearMonth,
        today: NaiveDate,
    ) -> Self {
        let in_month: Vec<&Transaction> = transactions
            .into_iter()
            .filter(|t| month.contains(t.date()))
            .collect();

        let income = total(&in_month, TransactionType::Income);
        let expense = total(&in_month, TransactionType::Expense);
        let balance = income - expense;

        Self {
            month,
            income,
            expense,
            balance,
            daily_budget: daily_budget(balance, month, today),
            daily_flow: daily_flow(&in_month, month),
            expenses_by_category: expenses_by_category(&in_month, categories),
        }
    }
}

fn total(transactions: &[&Transaction], kind: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind() == kind)
        .map(|t| t.amount().value())
        .sum()
}

/// Net balance (income minus expense) of `transactions`.
pub fn balance<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions
        .into_iter()
        .fold(Decimal::ZERO, |acc, t| match t.kind() {
            TransactionType::Income => acc + t.amount().value(),
            TransactionType::Expense => acc - t.amount().value(),
        })
}

/// `balance` spread over the days left in the month, today included. Only the current month has
/// a daily budget, and only while the balance is positive.
pub fn daily_budget(balance: Decimal, month: YearMonth, today: NaiveDate) -> Decimal {
    if month != YearMonth::of(today) || balance <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let remaining_days = month.days() as i64 - today.day() as i64 + 1;
    if remaining_days <= 0 {
        return Decimal::ZERO;
    }
    balance / Decimal::from(remaining_days)
}

/// Per-day income and expense sums for `month`, zero-filled.
pub fn daily_flow(transactions: &[&Transaction], month: YearMonth) -> DailyFlow {
    let days = month.days() as usize;
    let mut flow = DailyFlow {
        income: vec![Decimal::ZERO; days],
        expense: vec![Decimal::ZERO; days],
    };
    for t in transactions {
        if !month.contains(t.date()) {
            continue;
        }
        let ix = t.date().day0() as usize;
        let series = match t.kind() {
            TransactionType::Income => &mut flow.income,
            TransactionType::Expense => &mut flow.expense,
        };
        series[ix] += t.amount().value();
    }
    flow
}

/// Expense totals grouped by category name, in the order each name is first seen. References to
/// missing categories are grouped under the placeholder label.
pub fn expenses_by_category(
    transactions: &[&Transaction],
    categories: &Categories,
) -> Vec<CategoryTotal> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        let name = categories.name_of(t.category());
        match groups.iter_mut().find(|(n, _)| n == name) {
            Some((_, sum)) => *sum += t.amount().value(),
            None => groups.push((name.to_string(), t.amount().value())),
        }
    }

    let grand_total: Decimal = groups.iter().map(|(_, sum)| *sum).sum();
    groups
        .into_iter()
        .map(|(name, total)| CategoryTotal {
            percent: percent(total, grand_total),
            name,
            total,
        })
        .collect()
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / whole).round_dp(2)
}
