use super::{Database, TeamRequest, User, UserRequest};
use super::users::USER_COLUMNS;

impl Database {
    // ── Team requests (a user asks to join) ───────────────────────────

    pub async fn create_team_request(
        &self,
        team_id: i64,
        team_name: &str,
        user_id: i64,
        user_name: &str,
    ) -> Result<TeamRequest, sqlx::Error> {
        sqlx::query_as::<_, TeamRequest>(
            "INSERT INTO team_requests (team_id, team_name, user_id, user_name) VALUES (?, ?, ?, ?) \
             RETURNING id, team_id, team_name, user_id, user_name, created_at",
        )
        .bind(team_id)
        .bind(team_name)
        .bind(user_id)
        .bind(user_name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_team_request(&self, id: i64) -> Result<Option<TeamRequest>, sqlx::Error> {
        sqlx::query_as::<_, TeamRequest>(
            "SELECT id, team_id, team_name, user_id, user_name, created_at \
             FROM team_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn team_requests(&self, team_id: i64) -> Result<Vec<TeamRequest>, sqlx::Error> {
        sqlx::query_as::<_, TeamRequest>(
            "SELECT id, team_id, team_name, user_id, user_name, created_at \
             FROM team_requests WHERE team_id = ? ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn has_team_request(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_requests WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn delete_team_request(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── User requests (a team invites a user) ─────────────────────────

    pub async fn create_user_request(&self, team_id: i64, user_id: i64) -> Result<UserRequest, sqlx::Error> {
        sqlx::query_as::<_, UserRequest>(
            "INSERT INTO user_requests (team_id, user_id) VALUES (?, ?) \
             RETURNING id, team_id, user_id, created_at",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_user_request(&self, team_id: i64, user_id: i64) -> Result<Option<UserRequest>, sqlx::Error> {
        sqlx::query_as::<_, UserRequest>(
            "SELECT id, team_id, user_id, created_at FROM user_requests \
             WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Pending invitations addressed to a user.
    pub async fn user_invitations(&self, user_id: i64) -> Result<Vec<UserRequest>, sqlx::Error> {
        sqlx::query_as::<_, UserRequest>(
            "SELECT id, team_id, user_id, created_at FROM user_requests \
             WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Users a team has invited and who have not answered yet.
    pub async fn invited_users(&self, team_id: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN \
             (SELECT user_id FROM user_requests WHERE team_id = ?) ORDER BY id"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delete_user_request(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_requests WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
