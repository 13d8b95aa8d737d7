//! Shop items and purchase requests

use super::{write_point_change, Repository};
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::Utc;

const PURCHASE_ENTRY_SELECT: &str = r#"
    SELECT p.id, p.item_id, i.name AS item_name, i.category AS item_category,
           p.point_cost, p.status, p.note, p.decided_by, p.decided_at,
           p.transaction_id, p.created_at
    FROM purchases p
    JOIN shop_items i ON i.id = p.item_id
"#;

impl Repository {
    // ===== Items =====

    pub async fn create_shop_item(&self, req: &CreateShopItemRequest) -> Result<ShopItem> {
        let now = Utc::now();

        let item = sqlx::query_as::<_, ShopItem>(
            r#"
            INSERT INTO shop_items
                (name, description, category, point_cost, is_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.point_cost)
        .bind(req.is_available)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        tracing::debug!("Created shop item {}: {}", item.id, item.name);
        Ok(item)
    }

    pub async fn get_shop_item(&self, id: i64) -> Result<ShopItem> {
        sqlx::query_as::<_, ShopItem>("SELECT * FROM shop_items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::ShopItemNotFound(id))
    }

    /// Items ordered by category then cost
    pub async fn list_shop_items(&self, available_only: bool) -> Result<Vec<ShopItem>> {
        let query = if available_only {
            "SELECT * FROM shop_items WHERE is_available = 1 ORDER BY category, point_cost"
        } else {
            "SELECT * FROM shop_items ORDER BY category, point_cost"
        };

        let items = sqlx::query_as::<_, ShopItem>(query)
            .fetch_all(self.pool())
            .await?;

        Ok(items)
    }

    pub async fn update_shop_item(&self, id: i64, req: &UpdateShopItemRequest) -> Result<ShopItem> {
        sqlx::query_as::<_, ShopItem>(
            r#"
            UPDATE shop_items SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                category = COALESCE(?, category),
                point_cost = COALESCE(?, point_cost),
                is_available = COALESCE(?, is_available),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.category)
        .bind(req.point_cost)
        .bind(req.is_available)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(AppError::ShopItemNotFound(id))
    }

    pub async fn count_shop_items(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM shop_items")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    // ===== Purchases =====

    /// Record a pending request with the item's current cost
    pub async fn create_purchase(&self, item: &ShopItem, note: Option<&str>) -> Result<Purchase> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (item_id, point_cost, status, note, created_at)
            VALUES (?, ?, 'pending', ?, ?)
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.point_cost)
        .bind(note)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        tracing::debug!("Created purchase {} for item {}", purchase.id, item.id);
        Ok(purchase)
    }

    pub async fn get_purchase(&self, id: i64) -> Result<PurchaseEntry> {
        let query = format!("{} WHERE p.id = ?", PURCHASE_ENTRY_SELECT);
        sqlx::query_as::<_, PurchaseEntry>(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::PurchaseNotFound(id))
    }

    /// Purchases newest first, optionally restricted to one status
    pub async fn list_purchases(&self, status: Option<PurchaseStatus>) -> Result<Vec<PurchaseEntry>> {
        let purchases = match status {
            Some(status) => {
                let query = format!(
                    "{} WHERE p.status = ? ORDER BY p.created_at DESC, p.id DESC",
                    PURCHASE_ENTRY_SELECT
                );
                sqlx::query_as::<_, PurchaseEntry>(&query)
                    .bind(status)
                    .fetch_all(self.pool())
                    .await?
            }
            None => {
                let query = format!(
                    "{} ORDER BY p.created_at DESC, p.id DESC",
                    PURCHASE_ENTRY_SELECT
                );
                sqlx::query_as::<_, PurchaseEntry>(&query)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        Ok(purchases)
    }

    /// Approve a pending purchase and deduct its cost in one transaction
    pub async fn approve_purchase(
        &self,
        id: i64,
        decided_by: &str,
    ) -> Result<(PurchaseEntry, PointTransaction)> {
        let mut tx = self.pool().begin().await?;
        let now = Utc::now();

        let rows = sqlx::query(
            r#"
            UPDATE purchases SET status = 'approved', decided_by = ?, decided_at = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(decided_by)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let query = format!("{} WHERE p.id = ?", PURCHASE_ENTRY_SELECT);
        let purchase = sqlx::query_as::<_, PurchaseEntry>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::PurchaseNotFound(id))?;

        if rows == 0 {
            return Err(AppError::InvalidPurchaseState {
                id,
                status: purchase.status.as_str().to_string(),
                expected: PurchaseStatus::Pending.as_str().to_string(),
            });
        }

        let balance: i64 = sqlx::query_scalar("SELECT current_points FROM profile WHERE id = 1")
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::ProfileMissing)?;
        if balance < purchase.point_cost {
            return Err(AppError::InsufficientPoints {
                balance,
                required: purchase.point_cost,
            });
        }

        let change = NewPointChange::new(
            -purchase.point_cost,
            format!("{} 구매", purchase.item_name),
            decided_by,
        );
        let transaction = write_point_change(&mut *tx, &change).await?;

        sqlx::query("UPDATE purchases SET transaction_id = ? WHERE id = ?")
            .bind(transaction.id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Approved purchase {} with transaction {}", id, transaction.id);
        let purchase = self.get_purchase(id).await?;
        Ok((purchase, transaction))
    }

    /// Move a purchase from `from` to `to`, recording who decided
    pub async fn transition_purchase(
        &self,
        id: i64,
        from: PurchaseStatus,
        to: PurchaseStatus,
        decided_by: Option<&str>,
    ) -> Result<PurchaseEntry> {
        let rows = sqlx::query(
            r#"
            UPDATE purchases SET
                status = ?,
                decided_by = COALESCE(?, decided_by),
                decided_at = COALESCE(decided_at, ?)
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(to)
        .bind(decided_by)
        .bind(Utc::now())
        .bind(id)
        .bind(from)
        .execute(self.pool())
        .await?
        .rows_affected();

        let purchase = self.get_purchase(id).await?;
        if rows == 0 {
            return Err(AppError::InvalidPurchaseState {
                id,
                status: purchase.status.as_str().to_string(),
                expected: from.as_str().to_string(),
            });
        }

        tracing::debug!("Purchase {} moved to {}", id, to.as_str());
        Ok(purchase)
    }
}
