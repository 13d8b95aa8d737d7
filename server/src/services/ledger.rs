//! Points ledger service
//!
//! Every balance change goes through here so that each inserted row is
//! validated, logged and announced on the activity hub.

use crate::config::{MAX_MANUAL_ADJUSTMENT, MAX_NOTE_LENGTH, MAX_TRANSACTION_PAGE};
use crate::database::{NewPointChange, PointTransaction, Profile, Repository, TransactionEntry};
use crate::error::{AppError, Result};
use crate::services::activity::{ActivityEvent, ActivityHub};
use chrono::{DateTime, Utc};

/// Actor recorded on rewards granted by learning and quiz flows
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Clone)]
pub struct LedgerService {
    repo: Repository,
    hub: ActivityHub,
}

impl LedgerService {
    pub fn new(repo: Repository, hub: ActivityHub) -> Self {
        Self { repo, hub }
    }

    pub async fn profile(&self) -> Result<Profile> {
        self.repo.get_profile().await
    }

    pub async fn balance(&self) -> Result<i64> {
        self.repo.get_balance().await
    }

    /// Apply a change atomically and announce it
    pub async fn apply(&self, change: &NewPointChange) -> Result<PointTransaction> {
        if let Some(note) = &change.note {
            validate_note(note)?;
        }

        let transaction = self.repo.apply_point_change(change).await?;

        tracing::info!(
            "Points {:+} by {} -> balance {}",
            transaction.amount,
            transaction.created_by,
            transaction.balance_after
        );
        self.announce(&transaction);

        Ok(transaction)
    }

    /// Apply an active rule's fixed amount
    pub async fn apply_rule(&self, rule_id: i64, actor: &str) -> Result<PointTransaction> {
        let rule = self.repo.get_rule(rule_id).await?;
        if !rule.is_active {
            return Err(AppError::RuleInactive(rule_id));
        }

        let change = NewPointChange {
            amount: rule.point_amount,
            note: Some(rule.name),
            rule_id: Some(rule.id),
            created_by: actor.to_string(),
            reverses_id: None,
        };
        self.apply(&change).await
    }

    /// Manual caregiver adjustment, positive or negative
    pub async fn adjust(&self, amount: i64, note: &str, actor: &str) -> Result<PointTransaction> {
        if amount == 0 {
            return Err(AppError::Validation(
                "Adjustment amount must not be zero".to_string(),
            ));
        }
        if amount.abs() > MAX_MANUAL_ADJUSTMENT {
            return Err(AppError::Validation(format!(
                "Adjustment must be within ±{}",
                MAX_MANUAL_ADJUSTMENT
            )));
        }
        if note.trim().is_empty() {
            return Err(AppError::Validation("Note is required".to_string()));
        }

        self.apply(&NewPointChange::new(amount, note.trim(), actor))
            .await
    }

    /// System reward from learning or quiz flows
    pub async fn award(&self, amount: i64, note: &str) -> Result<PointTransaction> {
        if amount <= 0 {
            return Err(AppError::Validation(
                "Award amount must be positive".to_string(),
            ));
        }

        self.apply(&NewPointChange::new(amount, note, SYSTEM_ACTOR))
            .await
    }

    /// Reverse a transaction by appending its negation
    pub async fn cancel(&self, transaction_id: i64, actor: &str) -> Result<PointTransaction> {
        let reversal = self.repo.cancel_transaction(transaction_id, actor).await?;

        tracing::info!(
            "Transaction {} cancelled by {} -> balance {}",
            transaction_id,
            actor,
            reversal.balance_after
        );
        self.announce(&reversal);

        Ok(reversal)
    }

    /// Newest first, limit clamped to a sane page size
    pub async fn transactions(&self, limit: i64) -> Result<Vec<TransactionEntry>> {
        self.repo
            .list_transactions(limit.clamp(1, MAX_TRANSACTION_PAGE))
            .await
    }

    /// Rows with `from <= created_at < to`, oldest first
    pub async fn transactions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TransactionEntry>> {
        if from > to {
            return Err(AppError::Validation(
                "Range start must not be after its end".to_string(),
            ));
        }

        let entries = self.repo.transactions_since(Some(from)).await?;
        Ok(entries.into_iter().filter(|t| t.created_at < to).collect())
    }

    /// Announce a row written outside `apply`, such as a purchase deduction
    pub fn announce(&self, transaction: &PointTransaction) {
        self.hub.publish(ActivityEvent::PointsChanged {
            transaction: transaction.clone(),
            balance: transaction.balance_after,
        });
    }
}

fn validate_note(note: &str) -> Result<()> {
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(AppError::Validation(format!(
            "Note must be at most {} characters",
            MAX_NOTE_LENGTH
        )));
    }
    Ok(())
}
