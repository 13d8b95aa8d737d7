//! First-run seeding
//!
//! Catalog tables are filled only while empty so caregiver edits survive
//! restarts. Badge definitions are always refreshed from the catalog.

use super::models::{CreateRuleRequest, CreateShopItemRequest};
use super::repository::{BadgeRow, Repository};
use crate::catalog::{badges::BADGES, rules::DEFAULT_RULES, shop::DEFAULT_SHOP_ITEMS, words::DEFAULT_WORDS};
use crate::error::Result;

/// Seed the profile, catalogs and badge definitions
pub async fn seed_defaults(repo: &Repository, profile_name: &str) -> Result<()> {
    repo.ensure_profile(profile_name).await?;

    if repo.count_rules().await? == 0 {
        for &(name, description, category, point_amount) in DEFAULT_RULES {
            repo.create_rule(&CreateRuleRequest {
                name: name.to_string(),
                description: Some(description.to_string()),
                category: category.to_string(),
                point_amount,
                is_active: true,
            })
            .await?;
        }
        tracing::info!("Seeded {} default rules", DEFAULT_RULES.len());
    }

    if repo.count_shop_items().await? == 0 {
        for &(name, description, category, point_cost) in DEFAULT_SHOP_ITEMS {
            repo.create_shop_item(&CreateShopItemRequest {
                name: name.to_string(),
                description: Some(description.to_string()),
                category: category.to_string(),
                point_cost,
                is_available: true,
            })
            .await?;
        }
        tracing::info!("Seeded {} default shop items", DEFAULT_SHOP_ITEMS.len());
    }

    if repo.count_words().await? == 0 {
        for &(word, meaning, category, pronunciation, difficulty) in DEFAULT_WORDS {
            repo.insert_word(word, meaning, category, Some(pronunciation), difficulty)
                .await?;
        }
        tracing::info!("Seeded {} words", DEFAULT_WORDS.len());
    }

    for badge in BADGES {
        repo.upsert_badge(&BadgeRow {
            code: badge.code,
            name: badge.name,
            description: badge.description,
            icon: badge.icon,
            category: badge.category,
            rarity: badge.rarity,
            requirement: badge.requirement,
        })
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;
    use crate::database::UpdateRuleRequest;

    #[tokio::test]
    async fn test_seed_fills_empty_catalogs() {
        let repo = create_test_repo().await;

        seed_defaults(&repo, "주우").await.unwrap();

        assert_eq!(repo.count_rules().await.unwrap(), DEFAULT_RULES.len() as i64);
        assert_eq!(
            repo.count_shop_items().await.unwrap(),
            DEFAULT_SHOP_ITEMS.len() as i64
        );
        assert_eq!(repo.count_words().await.unwrap(), DEFAULT_WORDS.len() as i64);
        assert_eq!(repo.get_balance().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_keeps_caregiver_edits() {
        let repo = create_test_repo().await;
        seed_defaults(&repo, "주우").await.unwrap();

        let rule = &repo.list_rules(false).await.unwrap()[0];
        repo.update_rule(
            rule.id,
            &UpdateRuleRequest {
                point_amount: Some(42),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        seed_defaults(&repo, "주우").await.unwrap();

        assert_eq!(repo.count_rules().await.unwrap(), DEFAULT_RULES.len() as i64);
        assert_eq!(repo.get_rule(rule.id).await.unwrap().point_amount, 42);
    }
}
