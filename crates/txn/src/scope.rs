//! Scoped execution: commit on success, rollback on every other exit.

use crate::transaction::{RollbackOutcome, Transaction, TxState};
use warden_core::AppResult;

/// Rolls its transaction back on drop unless it already reached a terminal
/// state. Runs on `?` early returns and during panic unwinding alike.
struct RollbackGuard<'a> {
    tx: &'a mut Transaction,
}

impl Drop for RollbackGuard<'_> {
    fn drop(&mut self) {
        if self.tx.state() != TxState::Active {
            return;
        }
        let outcome = self.tx.rollback();
        if std::thread::panicking() {
            tracing::warn!(tx = %self.tx.id(), ?outcome, "rolled back while unwinding");
        } else {
            debug_assert_eq!(outcome, RollbackOutcome::RolledBack);
            tracing::debug!(tx = %self.tx.id(), ?outcome, "scope exited uncommitted");
        }
    }
}

impl Transaction {
    /// Run `op` inside this transaction.
    ///
    /// On `Ok` the transaction is committed and the commit result decides the
    /// return value. On `Err` the operation's error is returned as-is and the
    /// transaction is rolled back if it has not committed. A terminal
    /// transaction is refused before `op` runs.
    pub fn scope<T, F>(&mut self, op: F) -> AppResult<T>
    where
        F: FnOnce(&mut Transaction) -> AppResult<T>,
    {
        self.ensure_active("scope")?;
        let guard = RollbackGuard { tx: self };
        let value = op(&mut *guard.tx)?;
        guard.tx.commit()?;
        Ok(value)
    }
}

/// Begin a fresh transaction and run `op` in its scope.
pub fn run_in_transaction<T, F>(op: F) -> AppResult<T>
where
    F: FnOnce(&mut Transaction) -> AppResult<T>,
{
    let mut tx = Transaction::begin();
    let result = tx.scope(op);
    debug_assert!(tx.state().is_terminal());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};
    use warden_core::{AppError, ErrorKind, ALREADY_COMMITTED, ALREADY_ROLLED_BACK};

    #[test]
    fn success_commits() {
        let mut tx = Transaction::begin();
        let n = tx
            .scope(|tx| {
                tx.stage("INSERT INTO users")?;
                Ok(1)
            })
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(tx.state(), TxState::Committed);
        assert_eq!(tx.statements().len(), 1);
    }

    #[test]
    fn failure_rolls_back_and_keeps_original_error() {
        let mut tx = Transaction::begin();
        let err = tx
            .scope(|tx| -> AppResult<()> {
                tx.stage("INSERT INTO users")?;
                Err(AppError::validation("duplicate key").with_detail("field", "email"))
            })
            .unwrap_err();

        assert_eq!(tx.state(), TxState::RolledBack);
        assert!(tx.statements().is_empty());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "duplicate key");
        assert_eq!(err.detail("field"), Some("email"));
        assert!(err.cause().is_none());
    }

    #[test]
    fn error_after_manual_commit_never_rolls_back() {
        let mut tx = Transaction::begin();
        let err = tx
            .scope(|tx| -> AppResult<()> {
                tx.commit()?;
                Err(AppError::internal("notify failed"))
            })
            .unwrap_err();
        assert_eq!(err.message(), "notify failed");
        assert_eq!(tx.state(), TxState::Committed);
    }

    #[test]
    fn manual_commit_then_success_reports_already_committed() {
        let mut tx = Transaction::begin();
        let err = tx.scope(|tx| tx.commit()).unwrap_err();
        assert!(err.is(&ALREADY_COMMITTED));
        assert_eq!(tx.state(), TxState::Committed);
    }

    #[test]
    fn manual_rollback_then_success_reports_already_rolled_back() {
        let mut tx = Transaction::begin();
        let err = tx
            .scope(|tx| {
                tx.rollback();
                Ok(())
            })
            .unwrap_err();
        assert!(err.is(&ALREADY_ROLLED_BACK));
        assert_eq!(tx.state(), TxState::RolledBack);
    }

    #[test]
    fn panic_rolls_back_while_unwinding() {
        let mut tx = Transaction::begin();
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            tx.scope(|tx| -> AppResult<()> {
                tx.stage("INSERT INTO users")?;
                panic!("nil pointer dereference");
            })
        }));
        assert!(caught.is_err());
        assert_eq!(tx.state(), TxState::RolledBack);
        assert!(tx.statements().is_empty());
    }

    #[test]
    fn terminal_transaction_refuses_scope() {
        let mut tx = Transaction::begin();
        tx.commit().unwrap();
        let mut ran = false;
        let err = tx
            .scope(|_| {
                ran = true;
                Ok(())
            })
            .unwrap_err();
        assert!(!ran);
        assert!(err.is(&ALREADY_COMMITTED));
    }

    #[test]
    fn run_in_transaction_returns_operation_error() {
        let err = run_in_transaction(|tx| -> AppResult<()> {
            tx.stage("INSERT INTO users")?;
            Err(AppError::wrap(
                AppError::validation("duplicate key"),
                "insert user",
            ))
        })
        .unwrap_err();
        assert_eq!(err.render_chain(), "insert user: duplicate key");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn run_in_transaction_returns_value_on_commit() {
        let value = run_in_transaction(|tx| {
            tx.stage("SELECT 1")?;
            Ok("done")
        })
        .unwrap();
        assert_eq!(value, "done");
    }
}
