//! Savings goals

use super::Repository;
use crate::database::models::{CreateGoalRequest, Goal, GoalStatus};
use crate::error::{AppError, Result};
use chrono::Utc;

impl Repository {
    pub async fn create_goal(&self, req: &CreateGoalRequest) -> Result<Goal> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (title, description, target_points, current_progress, status, created_at)
            VALUES (?, ?, ?, 0, 'active', ?)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.target_points)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        tracing::debug!("Created goal {}: {}", goal.id, goal.title);
        Ok(goal)
    }

    pub async fn get_goal(&self, id: i64) -> Result<Goal> {
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::GoalNotFound(id))
    }

    /// Active goals first, then newest
    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT * FROM goals
            ORDER BY CASE status WHEN 'active' THEN 0 ELSE 1 END, created_at DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(goals)
    }

    /// Store progress, completing the goal once it reaches the target
    pub async fn update_goal_progress(&self, id: i64, progress: i64) -> Result<Goal> {
        let goal = self.get_goal(id).await?;
        if goal.status != GoalStatus::Active {
            return Err(AppError::Validation(format!("Goal {} is not active", id)));
        }

        let reached = progress >= goal.target_points;
        let updated = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals SET
                current_progress = ?,
                status = ?,
                completed_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(progress)
        .bind(if reached {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        })
        .bind(reached.then(Utc::now))
        .bind(id)
        .fetch_one(self.pool())
        .await?;

        if reached {
            tracing::info!("Goal {} completed", id);
        }
        Ok(updated)
    }

    pub async fn set_goal_status(&self, id: i64, status: GoalStatus) -> Result<Goal> {
        sqlx::query_as::<_, Goal>("UPDATE goals SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::GoalNotFound(id))
    }

    pub async fn delete_goal(&self, id: i64) -> Result<()> {
        let rows = sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::GoalNotFound(id));
        }
        Ok(())
    }
}
