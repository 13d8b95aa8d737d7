//! Savings goals service

use crate::config::MAX_NAME_LENGTH;
use crate::database::{CreateGoalRequest, Goal, GoalStatus, Repository};
use crate::error::{AppError, Result};
use serde::Serialize;

/// A goal measured against the current balance
#[derive(Debug, Clone, Serialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    /// Balance as a share of the target, capped at 100
    pub balance_percent: i64,
    /// Points still missing, never negative
    pub remaining: i64,
}

impl GoalView {
    pub fn new(goal: Goal, balance: i64) -> Self {
        let balance_percent = if goal.target_points > 0 {
            (balance.max(0) * 100 / goal.target_points).min(100)
        } else {
            0
        };
        let remaining = (goal.target_points - balance).max(0);

        Self {
            goal,
            balance_percent,
            remaining,
        }
    }
}

#[derive(Clone)]
pub struct GoalsService {
    repo: Repository,
}

impl GoalsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, req: CreateGoalRequest) -> Result<Goal> {
        let title = req.title.trim();
        if title.is_empty() || title.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Goal title must be 1-{} characters",
                MAX_NAME_LENGTH
            )));
        }
        if req.target_points <= 0 {
            return Err(AppError::Validation(
                "Goal target must be positive".to_string(),
            ));
        }

        let req = CreateGoalRequest {
            title: title.to_string(),
            ..req
        };
        let goal = self.repo.create_goal(&req).await?;

        tracing::info!("Created goal {}: {} points", goal.title, goal.target_points);
        Ok(goal)
    }

    pub async fn list(&self) -> Result<Vec<GoalView>> {
        let balance = self.repo.get_balance().await?;
        let goals = self.repo.list_goals().await?;

        Ok(goals
            .into_iter()
            .map(|goal| GoalView::new(goal, balance))
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<GoalView> {
        let balance = self.repo.get_balance().await?;
        let goal = self.repo.get_goal(id).await?;
        Ok(GoalView::new(goal, balance))
    }

    pub async fn update_progress(&self, id: i64, progress: i64) -> Result<Goal> {
        if progress < 0 {
            return Err(AppError::Validation(
                "Progress must not be negative".to_string(),
            ));
        }
        self.repo.update_goal_progress(id, progress).await
    }

    pub async fn cancel(&self, id: i64) -> Result<Goal> {
        let goal = self.repo.get_goal(id).await?;
        if goal.status != GoalStatus::Active {
            return Err(AppError::Validation(format!("Goal {} is not active", id)));
        }

        tracing::info!("Cancelling goal {}", id);
        self.repo.set_goal_status(id, GoalStatus::Cancelled).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete_goal(id).await?;
        tracing::info!("Deleted goal {}", id);
        Ok(())
    }
}
