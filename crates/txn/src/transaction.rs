//! Transaction state machine.
//!
//! `Active -> Committed` or `Active -> RolledBack`, exactly once. Every other
//! request against a terminal transaction is either rejected (`commit`,
//! `stage`) or a reported no-op (`rollback`).

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use warden_core::{AppError, AppResult, ALREADY_COMMITTED, ALREADY_ROLLED_BACK};

static NEXT_TX_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxState {
    Active,
    Committed,
    RolledBack,
}

impl TxState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TxState::Active)
    }
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxState::Active => "active",
            TxState::Committed => "committed",
            TxState::RolledBack => "rolled back",
        })
    }
}

/// What a `rollback` request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackOutcome {
    RolledBack,
    /// The transaction had already committed; nothing was undone.
    Skipped,
    AlreadyRolledBack,
}

/// A unit of work with an in-memory journal of staged statements.
///
/// Most units stage a handful of statements, so the journal is a
/// `SmallVec<[String; 8]>`.
#[derive(Debug)]
pub struct Transaction {
    id: String,
    state: TxState,
    statements: SmallVec<[String; 8]>,
}

impl Transaction {
    /// Start a transaction with a process-unique `tx_NNNN` id.
    pub fn begin() -> Self {
        let n = NEXT_TX_ID.fetch_add(1, Ordering::Relaxed);
        Self::begin_with_id(format!("tx_{n:04}"))
    }

    pub fn begin_with_id(id: impl Into<String>) -> Self {
        let tx = Self {
            id: id.into(),
            state: TxState::Active,
            statements: SmallVec::new(),
        };
        tracing::debug!(tx = %tx.id, "begin");
        tx
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    /// Statements staged so far; after commit these are the applied ones.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Record a statement as part of this unit of work.
    pub fn stage(&mut self, statement: impl Into<String>) -> AppResult<()> {
        self.ensure_active("stage")?;
        let statement = statement.into();
        tracing::debug!(tx = %self.id, statement = %statement, "staged");
        self.statements.push(statement);
        Ok(())
    }

    pub fn commit(&mut self) -> AppResult<()> {
        self.ensure_active("commit")?;
        self.state = TxState::Committed;
        tracing::info!(tx = %self.id, statements = self.statements.len(), "commit");
        Ok(())
    }

    /// Never undoes a commit: after `Committed` this reports `Skipped`.
    pub fn rollback(&mut self) -> RollbackOutcome {
        match self.state {
            TxState::Committed => {
                tracing::info!(tx = %self.id, "rollback skipped (already committed)");
                RollbackOutcome::Skipped
            }
            TxState::RolledBack => RollbackOutcome::AlreadyRolledBack,
            TxState::Active => {
                let discarded = self.statements.len();
                self.statements.clear();
                self.state = TxState::RolledBack;
                tracing::info!(tx = %self.id, discarded, "rollback");
                RollbackOutcome::RolledBack
            }
        }
    }

    pub(crate) fn ensure_active(&self, action: &str) -> AppResult<()> {
        let sentinel = match self.state {
            TxState::Active => return Ok(()),
            TxState::Committed => &ALREADY_COMMITTED,
            TxState::RolledBack => &ALREADY_ROLLED_BACK,
        };
        Err(
            AppError::wrap(sentinel, format!("{}: {action} rejected", self.id))
                .with_detail("tx", &self.id),
        )
    }
}
