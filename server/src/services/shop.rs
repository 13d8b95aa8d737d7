//! Shop service
//!
//! A purchase starts as a pending request. Points leave the balance only
//! when a caregiver approves it.

use crate::catalog::shop::SHOP_CATEGORIES;
use crate::config::{MAX_NAME_LENGTH, MAX_NOTE_LENGTH};
use crate::database::{
    CreateShopItemRequest, PointTransaction, Purchase, PurchaseEntry, PurchaseStatus, Repository,
    ShopItem, UpdateShopItemRequest,
};
use crate::error::{AppError, Result};
use crate::services::activity::{ActivityEvent, ActivityHub};
use crate::services::ledger::LedgerService;

#[derive(Clone)]
pub struct ShopService {
    repo: Repository,
    ledger: LedgerService,
    hub: ActivityHub,
}

impl ShopService {
    pub fn new(repo: Repository, ledger: LedgerService, hub: ActivityHub) -> Self {
        Self { repo, ledger, hub }
    }

    // ===== Items =====

    pub async fn list_items(&self, available_only: bool) -> Result<Vec<ShopItem>> {
        self.repo.list_shop_items(available_only).await
    }

    pub async fn create_item(&self, req: CreateShopItemRequest) -> Result<ShopItem> {
        validate_item_name(&req.name)?;
        validate_category(&req.category)?;
        validate_cost(req.point_cost)?;

        let item = self.repo.create_shop_item(&req).await?;
        tracing::info!("Created shop item {} ({} points)", item.name, item.point_cost);
        Ok(item)
    }

    pub async fn update_item(&self, id: i64, req: UpdateShopItemRequest) -> Result<ShopItem> {
        if let Some(name) = &req.name {
            validate_item_name(name)?;
        }
        if let Some(category) = &req.category {
            validate_category(category)?;
        }
        if let Some(cost) = req.point_cost {
            validate_cost(cost)?;
        }

        let item = self.repo.update_shop_item(id, &req).await?;
        tracing::info!("Updated shop item {}", id);
        Ok(item)
    }

    // ===== Purchases =====

    /// Ask for an item. The balance must cover it now but is not touched.
    pub async fn request_purchase(&self, item_id: i64, note: Option<&str>) -> Result<Purchase> {
        let item = self.repo.get_shop_item(item_id).await?;
        if !item.is_available {
            return Err(AppError::ShopItemUnavailable(item_id));
        }

        let note = note.map(str::trim).filter(|n| !n.is_empty());
        if let Some(note) = note {
            if note.chars().count() > MAX_NOTE_LENGTH {
                return Err(AppError::Validation(format!(
                    "Note must be at most {} characters",
                    MAX_NOTE_LENGTH
                )));
            }
        }

        let balance = self.repo.get_balance().await?;
        if balance < item.point_cost {
            return Err(AppError::InsufficientPoints {
                balance,
                required: item.point_cost,
            });
        }

        let purchase = self.repo.create_purchase(&item, note).await?;
        tracing::info!("Purchase {} requested for {}", purchase.id, item.name);

        self.publish(purchase.id).await;
        Ok(purchase)
    }

    /// Approve and deduct in one step
    pub async fn approve(
        &self,
        purchase_id: i64,
        actor: &str,
    ) -> Result<(PurchaseEntry, PointTransaction)> {
        let (purchase, transaction) = self.repo.approve_purchase(purchase_id, actor).await?;

        tracing::info!(
            "Purchase {} approved by {} -> balance {}",
            purchase_id,
            actor,
            transaction.balance_after
        );
        self.ledger.announce(&transaction);
        self.hub.publish(ActivityEvent::PurchaseUpdated {
            purchase: purchase.clone(),
        });

        Ok((purchase, transaction))
    }

    pub async fn reject(&self, purchase_id: i64, actor: &str) -> Result<PurchaseEntry> {
        let purchase = self
            .repo
            .transition_purchase(
                purchase_id,
                PurchaseStatus::Pending,
                PurchaseStatus::Rejected,
                Some(actor),
            )
            .await?;

        tracing::info!("Purchase {} rejected by {}", purchase_id, actor);
        self.hub.publish(ActivityEvent::PurchaseUpdated {
            purchase: purchase.clone(),
        });
        Ok(purchase)
    }

    /// Mark an approved purchase as handed over
    pub async fn complete(&self, purchase_id: i64) -> Result<PurchaseEntry> {
        let purchase = self
            .repo
            .transition_purchase(
                purchase_id,
                PurchaseStatus::Approved,
                PurchaseStatus::Completed,
                None,
            )
            .await?;

        tracing::info!("Purchase {} completed", purchase_id);
        self.hub.publish(ActivityEvent::PurchaseUpdated {
            purchase: purchase.clone(),
        });
        Ok(purchase)
    }

    pub async fn list_purchases(&self, status: Option<PurchaseStatus>) -> Result<Vec<PurchaseEntry>> {
        self.repo.list_purchases(status).await
    }

    pub async fn get_purchase(&self, id: i64) -> Result<PurchaseEntry> {
        self.repo.get_purchase(id).await
    }

    async fn publish(&self, purchase_id: i64) {
        match self.repo.get_purchase(purchase_id).await {
            Ok(purchase) => self.hub.publish(ActivityEvent::PurchaseUpdated { purchase }),
            Err(e) => tracing::warn!("Could not load purchase {} for activity: {}", purchase_id, e),
        }
    }
}

fn validate_item_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Item name must be 1-{} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if !SHOP_CATEGORIES.contains(&category) {
        return Err(AppError::Validation(format!(
            "Unknown shop category: {}",
            category
        )));
    }
    Ok(())
}

fn validate_cost(cost: i64) -> Result<()> {
    if cost <= 0 {
        return Err(AppError::Validation(
            "Item cost must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;

    async fn setup() -> (ShopService, LedgerService) {
        let repo = create_test_repo().await;
        let hub = ActivityHub::new();
        let ledger = LedgerService::new(repo.clone(), hub.clone());
        (ShopService::new(repo, ledger.clone(), hub), ledger)
    }

    async fn item(service: &ShopService, cost: i64) -> ShopItem {
        service
            .create_item(CreateShopItemRequest {
                name: "아이스크림".to_string(),
                description: None,
                category: "간식음식".to_string(),
                point_cost: cost,
                is_available: true,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_purchase_flow() {
        let (service, ledger) = setup().await;
        ledger.adjust(2000, "용돈", "엄마").await.unwrap();
        let item = item(&service, 1500).await;

        let purchase = service.request_purchase(item.id, Some("주말에")).await.unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Pending);
        assert_eq!(ledger.balance().await.unwrap(), 2000);

        let (approved, tx) = service.approve(purchase.id, "엄마").await.unwrap();
        assert_eq!(approved.status, PurchaseStatus::Approved);
        assert_eq!(tx.amount, -1500);
        assert_eq!(tx.note.as_deref(), Some("아이스크림 구매"));
        assert_eq!(ledger.balance().await.unwrap(), 500);

        let completed = service.complete(purchase.id).await.unwrap();
        assert_eq!(completed.status, PurchaseStatus::Completed);
    }

    #[tokio::test]
    async fn test_request_requires_balance() {
        let (service, _) = setup().await;
        let item = item(&service, 1500).await;

        let result = service.request_purchase(item.id, None).await;
        assert!(matches!(result, Err(AppError::InsufficientPoints { .. })));
    }

    #[tokio::test]
    async fn test_reject_leaves_balance() {
        let (service, ledger) = setup().await;
        ledger.adjust(2000, "용돈", "엄마").await.unwrap();
        let item = item(&service, 1500).await;
        let purchase = service.request_purchase(item.id, None).await.unwrap();

        let rejected = service.reject(purchase.id, "아빠").await.unwrap();

        assert_eq!(rejected.status, PurchaseStatus::Rejected);
        assert_eq!(rejected.decided_by.as_deref(), Some("아빠"));
        assert_eq!(ledger.balance().await.unwrap(), 2000);
        assert!(matches!(
            service.approve(purchase.id, "엄마").await,
            Err(AppError::InvalidPurchaseState { .. })
        ));
    }

    #[tokio::test]
    async fn test_approve_rechecks_balance() {
        let (service, ledger) = setup().await;
        ledger.adjust(2000, "용돈", "엄마").await.unwrap();
        let item = item(&service, 1500).await;
        let purchase = service.request_purchase(item.id, None).await.unwrap();
        ledger.adjust(-1000, "벌점", "엄마").await.unwrap();

        let result = service.approve(purchase.id, "엄마").await;

        assert!(matches!(result, Err(AppError::InsufficientPoints { .. })));
        assert_eq!(
            service.get_purchase(purchase.id).await.unwrap().status,
            PurchaseStatus::Pending
        );
        assert_eq!(ledger.balance().await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_unavailable_item() {
        let (service, ledger) = setup().await;
        ledger.adjust(5000, "용돈", "엄마").await.unwrap();
        let item = item(&service, 100).await;
        service
            .update_item(
                item.id,
                UpdateShopItemRequest {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = service.request_purchase(item.id, None).await;
        assert!(matches!(result, Err(AppError::ShopItemUnavailable(_))));
    }

    #[tokio::test]
    async fn test_complete_requires_approval() {
        let (service, ledger) = setup().await;
        ledger.adjust(5000, "용돈", "엄마").await.unwrap();
        let item = item(&service, 100).await;
        let purchase = service.request_purchase(item.id, None).await.unwrap();

        assert!(service.complete(purchase.id).await.is_err());
    }
}
