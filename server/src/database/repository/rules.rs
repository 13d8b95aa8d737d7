//! Rule catalog queries

use super::Repository;
use crate::database::models::{CreateRuleRequest, PointRule, UpdateRuleRequest};
use crate::error::{AppError, Result};
use chrono::Utc;

impl Repository {
    pub async fn create_rule(&self, req: &CreateRuleRequest) -> Result<PointRule> {
        let now = Utc::now();

        let rule = sqlx::query_as::<_, PointRule>(
            r#"
            INSERT INTO point_rules
                (name, description, category, point_amount, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.point_amount)
        .bind(req.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        tracing::debug!("Created rule {}: {}", rule.id, rule.name);
        Ok(rule)
    }

    pub async fn get_rule(&self, id: i64) -> Result<PointRule> {
        sqlx::query_as::<_, PointRule>("SELECT * FROM point_rules WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::RuleNotFound(id))
    }

    /// Rules ordered by category then name
    pub async fn list_rules(&self, active_only: bool) -> Result<Vec<PointRule>> {
        let query = if active_only {
            "SELECT * FROM point_rules WHERE is_active = 1 ORDER BY category, name"
        } else {
            "SELECT * FROM point_rules ORDER BY category, name"
        };

        let rules = sqlx::query_as::<_, PointRule>(query)
            .fetch_all(self.pool())
            .await?;

        Ok(rules)
    }

    /// Update the given fields. Absent fields keep their stored value.
    pub async fn update_rule(&self, id: i64, req: &UpdateRuleRequest) -> Result<PointRule> {
        sqlx::query_as::<_, PointRule>(
            r#"
            UPDATE point_rules SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                point_amount = COALESCE(?, point_amount),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.point_amount)
        .bind(req.is_active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(AppError::RuleNotFound(id))
    }

    /// Delete a rule. Past ledger rows keep their amount but lose the link.
    pub async fn delete_rule(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM point_rules WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::RuleNotFound(id));
        }

        tracing::debug!("Deleted rule: {}", id);
        Ok(())
    }

    pub async fn count_rules(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM point_rules")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::database::models::*;
    use crate::database::repository::tests::create_test_repo;
    use crate::error::AppError;

    fn rule(name: &str, category: &str, amount: i64) -> CreateRuleRequest {
        CreateRuleRequest {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            point_amount: amount,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_rule_crud() {
        let repo = create_test_repo().await;

        let created = repo.create_rule(&rule("양치하기", "생활습관", 500)).await.unwrap();
        assert!(created.is_active);

        let updated = repo
            .update_rule(
                created.id,
                &UpdateRuleRequest {
                    point_amount: Some(700),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "양치하기");
        assert_eq!(updated.point_amount, 700);
        assert!(!updated.is_active);

        assert!(repo.list_rules(true).await.unwrap().is_empty());
        assert_eq!(repo.list_rules(false).await.unwrap().len(), 1);

        repo.delete_rule(created.id).await.unwrap();
        assert!(matches!(
            repo.get_rule(created.id).await,
            Err(AppError::RuleNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_rule_keeps_ledger_row() {
        let repo = create_test_repo().await;

        let created = repo.create_rule(&rule("숙제", "학습독서", 1000)).await.unwrap();
        let change = NewPointChange {
            rule_id: Some(created.id),
            ..NewPointChange::new(1000, "숙제", "parent")
        };
        let transaction = repo.apply_point_change(&change).await.unwrap();

        repo.delete_rule(created.id).await.unwrap();

        let stored = repo.get_transaction(transaction.id).await.unwrap();
        assert_eq!(stored.rule_id, None);
        assert_eq!(stored.amount, 1000);
    }
}
