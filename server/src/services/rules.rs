//! Rule catalog service

use crate::catalog::rules::RULE_CATEGORIES;
use crate::config::MAX_NAME_LENGTH;
use crate::database::{CreateRuleRequest, PointRule, Repository, UpdateRuleRequest};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct RulesService {
    repo: Repository,
}

impl RulesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<PointRule>> {
        self.repo.list_rules(active_only).await
    }

    pub async fn get(&self, id: i64) -> Result<PointRule> {
        self.repo.get_rule(id).await
    }

    pub async fn create(&self, req: CreateRuleRequest) -> Result<PointRule> {
        validate_name(&req.name)?;
        validate_category(&req.category)?;
        validate_amount(req.point_amount)?;

        let req = CreateRuleRequest {
            name: req.name.trim().to_string(),
            ..req
        };
        let rule = self.repo.create_rule(&req).await?;

        tracing::info!("Created rule {} ({:+})", rule.name, rule.point_amount);
        Ok(rule)
    }

    pub async fn update(&self, id: i64, req: UpdateRuleRequest) -> Result<PointRule> {
        if let Some(name) = &req.name {
            validate_name(name)?;
        }
        if let Some(category) = &req.category {
            validate_category(category)?;
        }
        if let Some(amount) = req.point_amount {
            validate_amount(amount)?;
        }

        let rule = self.repo.update_rule(id, &req).await?;
        tracing::info!("Updated rule {}", id);
        Ok(rule)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete_rule(id).await?;
        tracing::info!("Deleted rule {}", id);
        Ok(())
    }

    pub fn categories(&self) -> &'static [&'static str] {
        RULE_CATEGORIES
    }
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Rule name must be 1-{} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if !RULE_CATEGORIES.contains(&category) {
        return Err(AppError::Validation(format!(
            "Unknown rule category: {}",
            category
        )));
    }
    Ok(())
}

fn validate_amount(amount: i64) -> Result<()> {
    if amount == 0 {
        return Err(AppError::Validation(
            "Rule amount must not be zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;

    fn request(name: &str, category: &str, amount: i64) -> CreateRuleRequest {
        CreateRuleRequest {
            name: name.to_string(),
            description: None,
            category: category.to_string(),
            point_amount: amount,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = RulesService::new(create_test_repo().await);

        service
            .create(request("  설거지 돕기 ", "집안일", 500))
            .await
            .unwrap();
        service
            .create(request("말대꾸", "예의태도", -300))
            .await
            .unwrap();

        let rules = service.list(false).await.unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().any(|r| r.name == "설거지 돕기"));
    }

    #[tokio::test]
    async fn test_validation() {
        let service = RulesService::new(create_test_repo().await);

        assert!(service.create(request("", "집안일", 10)).await.is_err());
        assert!(service.create(request("x", "없는분류", 10)).await.is_err());
        assert!(service.create(request("x", "집안일", 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_active_list() {
        let service = RulesService::new(create_test_repo().await);
        let rule = service
            .create(request("숙제", "학습독서", 1000))
            .await
            .unwrap();

        service
            .update(
                rule.id,
                UpdateRuleRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(service.list(true).await.unwrap().is_empty());
        assert_eq!(service.list(false).await.unwrap().len(), 1);
    }
}
