//! The ledger: the in-memory transaction list and category registry, kept in sync with a
//! `KeyValueStore`.
//!
//! Every mutation is validated first, then the complete updated list is written to the store,
//! and only after the write succeeds does the in-memory state change. A failed validation or a
//! failed write therefore leaves the ledger exactly as it was.

use crate::error::LedgerError;
use crate::model::{
    Categories, Category, IdGenerator, Transaction, TransactionInput, Transactions, YearMonth,
    DEFAULT_CATEGORIES,
};
use crate::store::{self, KeyValueStore, CATEGORIES_KEY, TRANSACTIONS_KEY};
use crate::Result;
use tracing::{debug, info, warn};

/// The complete set of transactions and categories, owned by whoever opened it.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    transactions: Transactions,
    categories: Categories,
    ids: IdGenerator,
}

impl<S> Ledger<S>
where
    S: KeyValueStore,
{
    /// Loads the ledger from `store`. If there are no categories yet, the default categories are
    /// created and saved.
    ///
    /// Stored records that cannot be read are skipped, and the stored text they came from is
    /// kept under a `_unreadable` key (see [`store::load_list`]).
    pub async fn load(store: S) -> Result<Self> {
        let transactions = Transactions::new(store::load_list(&store, TRANSACTIONS_KEY).await?);
        let categories = Categories::new(store::load_list(&store, CATEGORIES_KEY).await?);
        debug!(
            "Loaded {} transactions and {} categories",
            transactions.len(),
            categories.len()
        );

        let ids = IdGenerator::after(transactions.ids().chain(categories.ids()));
        let mut ledger = Self {
            store,
            transactions,
            categories,
            ids,
        };
        if ledger.categories.is_empty() {
            ledger.seed_categories().await?;
        }
        Ok(ledger)
    }

    async fn seed_categories(&mut self) -> Result<()> {
        let defaults = Categories::new(
            DEFAULT_CATEGORIES
                .iter()
                .map(|name| Category::new(self.ids.next_id(), *name))
                .collect(),
        );
        self.commit_categories(defaults).await?;
        info!("Created {} default categories", self.categories.len());
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transactions(&self) -> &Transactions {
        &self.transactions
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// All categories, in the order they were created.
    pub fn list_categories(&self) -> &[Category] {
        self.categories.data()
    }

    /// The name of category `id`, or the placeholder label if it does not exist.
    pub fn category_name(&self, id: u64) -> &str {
        self.categories.name_of(id)
    }

    pub fn get_transaction(&self, id: u64) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /// Transactions dated within `month`, in storage order.
    pub fn transactions_for_month(&self, month: YearMonth) -> Vec<&Transaction> {
        self.transactions.for_month(month)
    }

    /// Creates a category.
    ///
    /// # Errors
    /// - `LedgerError::Validation` if the trimmed name is empty.
    /// - `LedgerError::DuplicateCategory` if a category with that name exists, ignoring case.
    pub async fn add_category(&mut self, name: &str) -> Result<Category> {
        let name = valid_category_name(name)?;
        if let Some(existing) = self.categories.find_by_name(&name, None) {
            return Err(LedgerError::DuplicateCategory(existing.name().to_string()).into());
        }
        let category = Category::new(self.ids.next_id(), name);
        let mut next = self.categories.clone();
        next.push(category.clone());
        self.commit_categories(next).await?;
        debug!("Added category {} '{}'", category.id(), category.name());
        Ok(category)
    }

    /// Renames category `id`. Returns `Ok(None)` without changing anything if there is no such
    /// category.
    ///
    /// # Errors
    /// - `LedgerError::Validation` if the trimmed name is empty.
    /// - `LedgerError::DuplicateCategory` if another category already has that name, ignoring
    ///   case. Changing only the case of a category's own name is allowed.
    pub async fn rename_category(&mut self, id: u64, name: &str) -> Result<Option<Category>> {
        if self.categories.get(id).is_none() {
            debug!("Rename ignored, no category with ID {id}");
            return Ok(None);
        }
        let name = valid_category_name(name)?;
        if let Some(other) = self.categories.find_by_name(&name, Some(id)) {
            return Err(LedgerError::DuplicateCategory(other.name().to_string()).into());
        }
        let mut next = self.categories.clone();
        let renamed = match next.get_mut(id) {
            Some(category) => {
                category.name = name;
                category.clone()
            }
            None => return Ok(None),
        };
        self.commit_categories(next).await?;
        Ok(Some(renamed))
    }

    /// Deletes category `id` and returns it.
    ///
    /// # Errors
    /// - `LedgerError::CategoryInUse` if any transaction references the category.
    /// - `LedgerError::CategoryNotFound` if there is no such category.
    pub async fn delete_category(&mut self, id: u64) -> Result<Category> {
        let category = self
            .categories
            .get(id)
            .ok_or(LedgerError::CategoryNotFound(id))?;
        let count = self.transactions.count_referencing(id);
        if count > 0 {
            return Err(LedgerError::CategoryInUse {
                name: category.name().to_string(),
                count,
            }
            .into());
        }
        let mut next = self.categories.clone();
        let removed = next.remove(id).ok_or(LedgerError::CategoryNotFound(id))?;
        self.commit_categories(next).await?;
        Ok(removed)
    }

    /// Validates `input` and records it as a new transaction with a fresh ID.
    ///
    /// # Errors
    /// - `LedgerError::Validation` if a field is missing or malformed, or if the category does
    ///   not exist.
    pub async fn add_transaction(&mut self, input: &TransactionInput) -> Result<Transaction> {
        let fields = input.validate()?;
        self.require_category(fields.category)?;
        let transaction = Transaction::from_fields(self.ids.next_id(), fields);
        let mut next = self.transactions.clone();
        next.push(transaction.clone());
        self.commit_transactions(next).await?;
        debug!("Added transaction {}", transaction.id());
        Ok(transaction)
    }

    /// Validates `input` and replaces transaction `id` with it.
    ///
    /// # Errors
    /// - `LedgerError::TransactionNotFound` if there is no such transaction.
    /// - `LedgerError::Validation` as for `add_transaction`.
    pub async fn update_transaction(
        &mut self,
        id: u64,
        input: &TransactionInput,
    ) -> Result<Transaction> {
        if self.transactions.get(id).is_none() {
            return Err(LedgerError::TransactionNotFound(id).into());
        }
        let fields = input.validate()?;
        self.require_category(fields.category)?;
        let transaction = Transaction::from_fields(id, fields);
        let mut next = self.transactions.clone();
        if !next.replace(transaction.clone()) {
            return Err(LedgerError::TransactionNotFound(id).into());
        }
        self.commit_transactions(next).await?;
        debug!("Updated transaction {id}");
        Ok(transaction)
    }

    /// Deletes transaction `id`, returning it, or `Ok(None)` if there was no such transaction.
    pub async fn delete_transaction(&mut self, id: u64) -> Result<Option<Transaction>> {
        let mut next = self.transactions.clone();
        let removed = match next.remove(id) {
            Some(removed) => removed,
            None => return Ok(None),
        };
        self.commit_transactions(next).await?;
        debug!("Deleted transaction {id}");
        Ok(Some(removed))
    }

    /// Replaces the whole ledger and saves both lists. The caller is responsible for having
    /// validated the data.
    ///
    /// Categories are saved first. If the transactions then fail to save, the previous
    /// categories are written back so the store does not mix old and new data.
    pub(crate) async fn replace(
        &mut self,
        transactions: Transactions,
        categories: Categories,
    ) -> Result<()> {
        store::save(&self.store, CATEGORIES_KEY, &categories).await?;
        if let Err(e) = store::save(&self.store, TRANSACTIONS_KEY, &transactions).await {
            if let Err(restore) = store::save(&self.store, CATEGORIES_KEY, &self.categories).await
            {
                warn!("Unable to restore the previous categories: {restore:#}");
            }
            return Err(e);
        }
        for id in transactions.ids().chain(categories.ids()) {
            self.ids.observe(id);
        }
        self.transactions = transactions;
        self.categories = categories;
        Ok(())
    }

    fn require_category(&self, id: u64) -> Result<()> {
        if self.categories.get(id).is_none() {
            return Err(LedgerError::validation(format!("no category exists with ID {id}")).into());
        }
        Ok(())
    }

    async fn commit_transactions(&mut self, next: Transactions) -> Result<()> {
        store::save(&self.store, TRANSACTIONS_KEY, &next).await?;
        self.transactions = next;
        Ok(())
    }

    async fn commit_categories(&mut self, next: Categories) -> Result<()> {
        store::save(&self.store, CATEGORIES_KEY, &next).await?;
        self.categories = next;
        Ok(())
    }
}

/// Trims a category name and rejects it if nothing is left.
fn valid_category_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("the category name cannot be empty").into());
    }
    Ok(name.to_string())
}
