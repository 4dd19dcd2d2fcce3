use crate::error::LedgerError;
use crate::model::{Amount, YearMonth};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Whether a transaction adds money to, or takes money from, the balance.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// A single income or expense record.
///
/// The serialized field names match the data files written by earlier versions of the app:
///
/// ```json
/// {
///   "id": 1704412800000,
///   "type": "expense",
///   "amount": 12.5,
///   "category": 1704412800003,
///   "date": "2024-01-05",
///   "paymentMethod": "Tarjeta",
///   "details": "Almuerzo"
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub(crate) id: u64,
    #[serde(rename = "type")]
    pub(crate) kind: TransactionType,
    pub(crate) amount: Amount,
    #[serde(deserialize_with = "category_ref")]
    pub(crate) category: u64,
    #[serde(with = "date_format")]
    pub(crate) date: NaiveDate,
    #[serde(default, deserialize_with = "string_or_null")]
    pub(crate) payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) details: Option<String>,
}

impl Transaction {
    pub(crate) fn from_fields(id: u64, fields: TransactionFields) -> Self {
        Self {
            id,
            kind: fields.kind,
            amount: fields.amount,
            category: fields.category,
            date: fields.date,
            payment_method: fields.payment_method,
            details: fields.details,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> u64 {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

/// The transaction list. Order is storage order and carries no meaning.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transactions {
    data: Vec<Transaction>,
}

impl Transactions {
    pub fn new(data: Vec<Transaction>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.data.iter().find(|t| t.id == id)
    }

    /// Transactions dated within `month`, in storage order.
    pub fn for_month(&self, month: YearMonth) -> Vec<&Transaction> {
        self.data.iter().filter(|t| month.contains(t.date)).collect()
    }

    /// Counts the transactions that reference `category`.
    pub fn count_referencing(&self, category: u64) -> usize {
        self.data.iter().filter(|t| t.category == category).count()
    }

    pub(crate) fn push(&mut self, transaction: Transaction) {
        self.data.push(transaction);
    }

    /// Replaces the transaction that has the same ID. Returns false if there is none.
    pub(crate) fn replace(&mut self, transaction: Transaction) -> bool {
        match self.data.iter_mut().find(|t| t.id == transaction.id) {
            Some(existing) => {
                *existing = transaction;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<Transaction> {
        let ix = self.data.iter().position(|t| t.id == id)?;
        Some(self.data.remove(ix))
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.iter().map(|t| t.id)
    }
}

impl<'a> IntoIterator for &'a Transactions {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Sorts transactions for display: newest first. Transactions on the same day keep their
/// relative order.
pub fn sorted_for_display<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<&'a Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.into_iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Unvalidated transaction fields as entered by the user.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TransactionInput {
    pub kind: Option<String>,
    pub amount: Option<String>,
    pub category: Option<u64>,
    pub date: Option<String>,
    pub payment_method: Option<String>,
    pub details: Option<String>,
}

impl From<&Transaction> for TransactionInput {
    fn from(t: &Transaction) -> Self {
        Self {
            kind: Some(t.kind.to_string()),
            amount: Some(t.amount.value().to_string()),
            category: Some(t.category),
            date: Some(t.date.format(date_format::FORMAT).to_string()),
            payment_method: Some(t.payment_method.clone()),
            details: t.details.clone(),
        }
    }
}

/// Transaction fields that have passed validation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionFields {
    pub kind: TransactionType,
    pub amount: Amount,
    pub category: u64,
    pub date: NaiveDate,
    pub payment_method: String,
    pub details: Option<String>,
}

impl TransactionInput {
    /// Checks every field and returns the typed values, or a `LedgerError::Validation` naming the
    /// first field that is missing or malformed.
    pub fn validate(&self) -> Result<TransactionFields> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(LedgerError::validation("the transaction type is required").into())
            }
            Some(s) => TransactionType::from_str(&s.to_lowercase()).map_err(|_| {
                LedgerError::validation(format!(
                    "the transaction type must be 'income' or 'expense', got '{s}'"
                ))
            })?,
        };

        let amount = match self.amount.as_deref() {
            None => return Err(LedgerError::validation("the amount is required").into()),
            Some(s) => Amount::from_str(s)
                .and_then(|amount| amount.check_storable().map(|_| amount))
                .map_err(|e| LedgerError::validation(format!("invalid amount: {e}")))?,
        };

        let category = self
            .category
            .ok_or_else(|| LedgerError::validation("the category is required"))?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => return Err(LedgerError::validation("the date is required").into()),
            Some(s) => date_format::parse(s).ok_or_else(|| {
                LedgerError::validation(format!("'{s}' is not a date, expected YYYY-MM-DD"))
            })?,
        };

        let details = self
            .details
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(TransactionFields {
            kind,
            amount,
            category,
            date,
            payment_method: self
                .payment_method
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            details,
        })
    }
}

/// Category references are numbers, but older files may hold them as strings or as `null`.
/// Anything that is not a usable ID becomes 0, which never matches a category and so is shown
/// with the placeholder label.
fn category_ref<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn string_or_null<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serializes dates as `YYYY-MM-DD`. Also reads full ISO-8601 timestamps such as
/// `2024-01-04T23:00:00.000Z`, taking the calendar date in the local timezone.
pub(crate) mod date_format {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%Y-%m-%d";

    pub(crate) fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, FORMAT) {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Local).date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        None
    }

    pub(crate) fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("'{s}' is not a valid date")))
    }
}
