//! Single owner of the transaction list and its persisted copy.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use fintrack_domain::{NewTransaction, Transaction, TransactionPatch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    storage::{KeyValueStore, STORAGE_KEY},
    summary::years_with_data,
    CoreResult,
};

/// Authoritative transaction list backed by a [`KeyValueStore`].
///
/// Every mutation writes the full list through the backend before returning.
/// When the write fails the in-memory list is rolled back, so memory and
/// storage never disagree.
pub struct TransactionStore {
    backend: Box<dyn KeyValueStore>,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Restores the persisted list. Missing, unreadable or malformed data
    /// yields an empty store and a warning; this never fails.
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let transactions = match backend.read(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Transaction>>(&raw) {
                Ok(list) => {
                    let list = retain_valid(list);
                    debug!(count = list.len(), "loaded persisted transactions");
                    list
                }
                Err(err) => {
                    warn!(error = %err, "persisted transactions are malformed; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("no persisted transactions found");
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "failed to read persisted transactions; starting empty");
                Vec::new()
            }
        };
        Self {
            backend,
            transactions,
        }
    }

    /// Validates `candidate`, assigns a fresh id, appends and persists.
    pub fn add(&mut self, candidate: NewTransaction) -> CoreResult<Transaction> {
        candidate.validate()?;
        let txn = candidate.normalized().into_transaction(self.fresh_id());
        self.transactions.push(txn.clone());
        if let Err(err) = self.persist() {
            self.transactions.pop();
            return Err(err);
        }
        debug!(id = %txn.id, "transaction added");
        Ok(txn)
    }

    /// Adds every candidate in order with a single persistence write.
    /// Nothing is applied when any candidate is invalid or the write fails.
    pub fn add_all(&mut self, candidates: Vec<NewTransaction>) -> CoreResult<Vec<Transaction>> {
        for candidate in &candidates {
            candidate.validate()?;
        }
        let previous_len = self.transactions.len();
        let mut added = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let txn = candidate.normalized().into_transaction(self.fresh_id());
            self.transactions.push(txn.clone());
            added.push(txn);
        }
        if let Err(err) = self.persist() {
            self.transactions.truncate(previous_len);
            return Err(err);
        }
        debug!(count = added.len(), "transactions added in batch");
        Ok(added)
    }

    /// Removes the transaction with `id`. An unknown id is a no-op.
    pub fn remove(&mut self, id: Uuid) -> CoreResult<Option<Transaction>> {
        let Some(index) = self.position(id) else {
            debug!(%id, "remove ignored; transaction not found");
            return Ok(None);
        };
        let removed = self.transactions.remove(index);
        if let Err(err) = self.persist() {
            self.transactions.insert(index, removed);
            return Err(err);
        }
        debug!(%id, "transaction removed");
        Ok(Some(removed))
    }

    /// Merges `patch` into the transaction with `id` and re-validates the result.
    /// An unknown id is a no-op.
    pub fn update(&mut self, id: Uuid, patch: TransactionPatch) -> CoreResult<Option<Transaction>> {
        let Some(index) = self.position(id) else {
            debug!(%id, "update ignored; transaction not found");
            return Ok(None);
        };
        let mut merged = self.transactions[index].clone();
        patch.apply_to(&mut merged);
        NewTransaction::from(&merged).validate()?;

        let previous = std::mem::replace(&mut self.transactions[index], merged.clone());
        if let Err(err) = self.persist() {
            self.transactions[index] = previous;
            return Err(err);
        }
        debug!(%id, "transaction updated");
        Ok(Some(merged))
    }

    /// Empties the list and deletes the persisted key entirely.
    pub fn clear(&mut self) -> CoreResult<()> {
        self.backend.delete(STORAGE_KEY)?;
        let count = self.transactions.len();
        self.transactions.clear();
        debug!(count, "all transactions cleared");
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Owned copy of the list for consumers that outlive the borrow.
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Distinct categories in use, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.transactions
            .iter()
            .map(|txn| txn.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Years that have data, newest first. Falls back to the current year.
    pub fn years(&self, today: NaiveDate) -> Vec<i32> {
        years_with_data(&self.transactions, today)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.position(id).is_none() {
                return id;
            }
        }
    }

    fn persist(&self) -> CoreResult<()> {
        let payload = serde_json::to_string(&self.transactions)?;
        self.backend.write(STORAGE_KEY, &payload)
    }
}

/// Drops persisted records that break a transaction invariant or repeat an
/// earlier id. The first record with a given id wins.
fn retain_valid(list: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|txn| {
            if let Err(err) = NewTransaction::from(txn).validate() {
                warn!(id = %txn.id, error = %err, "skipping invalid persisted transaction");
                return false;
            }
            if !seen.insert(txn.id) {
                warn!(id = %txn.id, "skipping persisted transaction with a repeated id");
                return false;
            }
            true
        })
        .collect()
}

impl std::fmt::Debug for TransactionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionStore")
            .field("transactions", &self.transactions.len())
            .finish()
    }
}
