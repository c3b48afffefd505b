//!
//! ledgerd storage module
//! ----------------------
//! In-memory resource store for client records, their notes and their
//! transactions. Client and transaction ids come from two independent
//! monotonically increasing counters starting at 1; ids are never reused
//! and reset only with a process restart. Note and transaction lists are
//! append-only with insertion order preserved.
//!
//! The store holds no access-control logic. Visibility and ownership
//! decisions live in `identity::policy`; handlers apply them after lookup.
//!
//! The public API centers around the `Store` type, wrapped in a thread-safe
//! `SharedStore` (`Arc<RwLock<Store>>`) handle that is cloned into the
//! server state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A managed client record. Append-only once created; the optional
/// bookkeeper/accountant usernames drive the ownership checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bookkeeper: Option<String>,
    #[serde(default)]
    pub accountant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

pub struct Store {
    clients: HashMap<u64, Client>,
    notes: HashMap<u64, Vec<Note>>,
    transactions: HashMap<u64, Vec<Transaction>>,
    next_client_id: u64,
    next_transaction_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            notes: HashMap::new(),
            transactions: HashMap::new(),
            next_client_id: 1,
            next_transaction_id: 1,
        }
    }

    pub fn create_client(
        &mut self,
        username: String,
        name: String,
        bookkeeper: Option<String>,
        accountant: Option<String>,
    ) -> Client {
        let id = self.next_client_id;
        self.next_client_id += 1;
        let client = Client { id, username, name, bookkeeper, accountant };
        debug!(target: "ledgerd::storage", "create_client: id={} username='{}'", id, client.username);
        self.clients.insert(id, client.clone());
        client
    }

    pub fn get_client(&self, id: u64) -> AppResult<Client> {
        self.clients
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("client_not_found", format!("client {} not found", id)))
    }

    /// Full scan over all client records in id order. Visibility filtering
    /// is the caller's job (same ownership predicate as the resource gate).
    pub fn list_clients(&self) -> Vec<Client> {
        let mut clients: Vec<Client> = self.clients.values().cloned().collect();
        clients.sort_by_key(|c| c.id);
        clients
    }

    pub fn add_note(&mut self, client_id: u64, author: String, text: String) -> Note {
        let note = Note { author, text, timestamp: Utc::now() };
        self.notes.entry(client_id).or_default().push(note.clone());
        note
    }

    pub fn notes(&self, client_id: u64) -> Vec<Note> {
        self.notes.get(&client_id).cloned().unwrap_or_default()
    }

    pub fn add_transaction(
        &mut self,
        client_id: u64,
        kind: TransactionKind,
        amount: f64,
        category: String,
        date: Option<NaiveDate>,
    ) -> Transaction {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        let tx = Transaction {
            id,
            kind,
            amount,
            category,
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
        };
        self.transactions.entry(client_id).or_default().push(tx.clone());
        tx
    }

    pub fn transactions(&self, client_id: u64) -> Vec<Transaction> {
        self.transactions.get(&client_id).cloned().unwrap_or_default()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle around `Store`, cloned into every handler.
#[derive(Clone)]
pub struct SharedStore(pub Arc<RwLock<Store>>);

impl SharedStore {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(Store::new())))
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new()
    }
}
