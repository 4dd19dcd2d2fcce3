//! Transaction command handlers.

use crate::args::TransactionFieldArgs;
use crate::commands::{plural, Money, Out};
use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::model::{sorted_for_display, Transaction, TransactionInput, YearMonth};
use crate::store::KeyValueStore;
use crate::{Config, Result};
use chrono::Local;

/// Lists the transactions of `month`, newest first.
pub async fn list_transactions(config: Config, month: YearMonth) -> Result<Out<Vec<Transaction>>> {
    let ledger = config.ledger().await?;
    let money = Money::new(&config, ledger.store()).await;
    let sorted = sorted_for_display(ledger.transactions_for_month(month));

    let mut message = format!(
        "{} {} in {month}",
        sorted.len(),
        plural(sorted.len(), "transaction", "transactions")
    );
    for t in &sorted {
        message.push_str(&format!(
            "\n  {}  {:>15}  {:<7}  {:>14}  {}",
            t.date(),
            t.id(),
            t.kind(),
            money.format(t.amount().value()),
            ledger.category_name(t.category()),
        ));
        if !t.payment_method().is_empty() {
            message.push_str(&format!("  [{}]", t.payment_method()));
        }
        if let Some(details) = t.details() {
            message.push_str(&format!("  {details}"));
        }
    }

    let structure = sorted.into_iter().cloned().collect();
    Ok(Out::new(message, structure))
}

/// Adds a transaction. The date defaults to today.
///
/// # Errors
/// - `LedgerError::Validation` if a field is missing or malformed, or the category is unknown.
pub async fn add_transaction(
    config: Config,
    fields: TransactionFieldArgs,
) -> Result<Out<Transaction>> {
    let mut ledger = config.ledger().await?;
    let mut input = TransactionInput::default();
    apply(&ledger, &mut input, fields)?;
    if input.date.is_none() {
        input.date = Some(Local::now().date_naive().to_string());
    }

    let transaction = ledger.add_transaction(&input).await?;
    let money = Money::new(&config, ledger.store()).await;
    Ok(Out::new(
        format!(
            "Added {} of {} on {} with ID {}",
            transaction.kind(),
            money.format(transaction.amount().value()),
            transaction.date(),
            transaction.id()
        ),
        transaction,
    ))
}

/// Changes the given fields of transaction `id`, keeping the others.
///
/// # Errors
/// - `LedgerError::TransactionNotFound` if there is no such transaction.
/// - `LedgerError::Validation` if a field is malformed or the category is unknown.
pub async fn update_transaction(
    config: Config,
    id: u64,
    fields: TransactionFieldArgs,
) -> Result<Out<Transaction>> {
    let mut ledger = config.ledger().await?;
    let mut input = ledger
        .get_transaction(id)
        .map(TransactionInput::from)
        .ok_or(LedgerError::TransactionNotFound(id))?;
    apply(&ledger, &mut input, fields)?;

    let transaction = ledger.update_transaction(id, &input).await?;
    Ok(Out::new(format!("Updated transaction {id}"), transaction))
}

/// Deletes transaction `id`.
///
/// # Errors
/// - `LedgerError::TransactionNotFound` if there is no such transaction.
pub async fn delete_transaction(config: Config, id: u64) -> Result<Out<Transaction>> {
    let mut ledger = config.ledger().await?;
    let transaction = ledger
        .delete_transaction(id)
        .await?
        .ok_or(LedgerError::TransactionNotFound(id))?;
    Ok(Out::new(format!("Deleted transaction {id}"), transaction))
}

/// Copies the fields given on the command line into `input`.
fn apply<S>(
    ledger: &Ledger<S>,
    input: &mut TransactionInput,
    fields: TransactionFieldArgs,
) -> Result<()>
where
    S: KeyValueStore,
{
    if let Some(category) = fields.category.as_deref() {
        input.category = Some(resolve_category(ledger, category)?);
    }
    if fields.kind.is_some() {
        input.kind = fields.kind;
    }
    if fields.amount.is_some() {
        input.amount = fields.amount;
    }
    if fields.date.is_some() {
        input.date = fields.date;
    }
    if fields.payment_method.is_some() {
        input.payment_method = fields.payment_method;
    }
    if fields.details.is_some() {
        input.details = fields.details;
    }
    Ok(())
}

/// Finds a category by name, ignoring case, or by ID.
fn resolve_category<S>(ledger: &Ledger<S>, value: &str) -> Result<u64>
where
    S: KeyValueStore,
{
    let value = value.trim();
    if let Some(category) = ledger.categories().find_by_name(value, None) {
        return Ok(category.id());
    }
    if let Ok(id) = value.parse::<u64>() {
        if ledger.categories().get(id).is_some() {
            return Ok(id);
        }
    }
    Err(LedgerError::validation(format!("there is no category named '{value}'")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ledger_error;
    use crate::model::TransactionType;
    use crate::preferences;
    use crate::test::TestEnv;

    fn fields(kind: &str, amount: &str, category: &str, date: &str) -> TransactionFieldArgs {
        TransactionFieldArgs {
            kind: Some(kind.to_string()),
            amount: Some(amount.to_string()),
            category: Some(category.to_string()),
            date: Some(date.to_string()),
            payment_method: None,
            details: None,
        }
    }

    #[tokio::test]
    async fn test_add_transaction_by_category_name() {
        let env = TestEnv::new().await;
        let out = add_transaction(env.config(), fields("expense", "12.5", "comida", "2024-01-05"))
            .await
            .unwrap();
        let t = out.structure().unwrap();
        assert_eq!(t.category(), env.category_id("Comida").await);
        assert!(out.message().contains("$12.50"));
        assert_eq!(env.ledger().await.transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_add_transaction_by_category_id_defaults_date() {
        let env = TestEnv::new().await;
        let id = env.category_id("Sueldo").await;
        let mut f = fields("income", "1000", &id.to_string(), "");
        f.date = None;
        let out = add_transaction(env.config(), f).await.unwrap();
        let t = out.structure().unwrap();
        assert_eq!(t.category(), id);
        assert_eq!(t.date(), Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_add_transaction_unknown_category() {
        let env = TestEnv::new().await;
        let err = add_transaction(env.config(), fields("expense", "1", "Nope", "2024-01-05"))
            .await
            .unwrap_err();
        assert!(matches!(
            ledger_error(&err),
            Some(LedgerError::Validation(_))
        ));
        assert!(env.ledger().await.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_add_transaction_negative_amount() {
        let env = TestEnv::new().await;
        let err = add_transaction(env.config(), fields("expense", "-3", "Ocio", "2024-01-05"))
            .await
            .unwrap_err();
        assert!(matches!(
            ledger_error(&err),
            Some(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_transaction_keeps_other_fields() {
        let env = TestEnv::new().await;
        let id = env
            .insert_test_transaction("expense", "20", "Ocio", "2024-01-10")
            .await;
        let change = TransactionFieldArgs {
            amount: Some("25".to_string()),
            details: Some("Cine".to_string()),
            ..TransactionFieldArgs::default()
        };
        let out = update_transaction(env.config(), id, change).await.unwrap();
        let t = out.structure().unwrap();
        assert_eq!(t.id(), id);
        assert_eq!(t.kind(), TransactionType::Expense);
        assert_eq!(t.amount().value().to_string(), "25");
        assert_eq!(t.date().to_string(), "2024-01-10");
        assert_eq!(t.category(), env.category_id("Ocio").await);
        assert_eq!(t.payment_method(), "Efectivo");
        assert_eq!(t.details(), Some("Cine"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_transaction() {
        let env = TestEnv::new().await;
        let err = update_transaction(env.config(), 7, TransactionFieldArgs::default())
            .await
            .unwrap_err();
        assert_eq!(ledger_error(&err), Some(&LedgerError::TransactionNotFound(7)));

        let err = delete_transaction(env.config(), 7).await.unwrap_err();
        assert_eq!(ledger_error(&err), Some(&LedgerError::TransactionNotFound(7)));
    }

    #[tokio::test]
    async fn test_list_transactions_newest_first_and_masked() {
        let env = TestEnv::new().await;
        let older = env
            .insert_test_transaction("expense", "5", "Comida", "2024-01-02")
            .await;
        let newer = env
            .insert_test_transaction("income", "900", "Sueldo", "2024-01-30")
            .await;
        env.insert_test_transaction("expense", "1", "Comida", "2024-02-01")
            .await;

        let january = YearMonth::new(2024, 1).unwrap();
        let out = list_transactions(env.config(), january).await.unwrap();
        let ids: Vec<u64> = out.structure().unwrap().iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![newer, older]);
        assert!(out.message().contains("$900.00"));

        let ledger = env.ledger().await;
        preferences::set_balance_visible(ledger.store(), false)
            .await
            .unwrap();
        let out = list_transactions(env.config(), january).await.unwrap();
        assert!(!out.message().contains("$900.00"));
        assert!(out.message().contains(crate::commands::MASK));
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let env = TestEnv::new().await;
        let id = env
            .insert_test_transaction("expense", "5", "Comida", "2024-01-02")
            .await;
        let out = delete_transaction(env.config(), id).await.unwrap();
        assert_eq!(out.structure().unwrap().id(), id);
        assert!(env.ledger().await.transactions().is_empty());
    }
}
