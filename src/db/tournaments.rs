use chrono::NaiveDate;

use super::users::USER_COLUMNS;
use super::{Database, Team, TeamAccuracy, Tournament, User, UserScore};
use crate::search::{keyname, SearchKind};
use crate::tournament::TournamentKind;

const TOURNAMENT_COLUMNS: &str =
    "id, name, keyname, description, start_date, end_date, kind, created_at";

impl Database {
    // ── Tournament CRUD ───────────────────────────────────────────────

    pub async fn create_tournament(
        &self,
        name: &str,
        description: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        admin_id: i64,
    ) -> Result<Tournament, sqlx::Error> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "INSERT INTO tournaments (name, keyname, description, start_date, end_date) \
             VALUES (?, ?, ?, ?, ?) RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(name)
        .bind(keyname(name))
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        self.add_tournament_admin(tournament.id, admin_id).await?;
        self.index_words(SearchKind::Tournament, tournament.id, name)
            .await?;
        Ok(tournament)
    }

    /// Record what a tournament was seeded from.
    pub async fn set_tournament_kind(&self, id: i64, kind: TournamentKind) -> Result<Tournament, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(&format!(
            "UPDATE tournaments SET kind = ? WHERE id = ? RETURNING {TOURNAMENT_COLUMNS}"
        ))
        .bind(kind)
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_tournament(&self, id: i64) -> Result<Option<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Lookup by name, case and surrounding whitespace ignored.
    pub async fn get_tournament_by_name(&self, name: &str) -> Result<Option<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE keyname = ?"
        ))
        .bind(keyname(name))
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_tournaments(&self) -> Result<Vec<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    pub async fn tournaments_by_ids(&self, ids: &[i64]) -> Result<Vec<Tournament>, sqlx::Error> {
        let mut tournaments = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(t) = self.get_tournament(*id).await? {
                tournaments.push(t);
            }
        }
        Ok(tournaments)
    }

    pub async fn update_tournament(
        &self,
        id: i64,
        name: &str,
        description: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<Tournament>, sqlx::Error> {
        let Some(current) = self.get_tournament(id).await? else {
            return Ok(None);
        };
        sqlx::query(
            "UPDATE tournaments SET name = ?, keyname = ?, description = ?, start_date = ?, end_date = ? \
             WHERE id = ?",
        )
        .bind(name)
        .bind(keyname(name))
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.reindex_words(SearchKind::Tournament, id, &current.name, name)
            .await?;
        self.get_tournament(id).await
    }

    /// Delete a tournament with its matches, groups and national teams.
    pub async fn delete_tournament(&self, id: i64) -> Result<bool, sqlx::Error> {
        let Some(tournament) = self.get_tournament(id).await? else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM tournaments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.unindex_words(SearchKind::Tournament, id, &tournament.name)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Participants ──────────────────────────────────────────────────

    pub async fn add_participant(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tournament_participants (tournament_id, user_id) VALUES (?, ?)",
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_participant(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tournament_participants WHERE tournament_id = ? AND user_id = ?",
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_participant(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tournament_participants WHERE tournament_id = ? AND user_id = ?",
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn participants(&self, tournament_id: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN \
             (SELECT user_id FROM tournament_participants WHERE tournament_id = ?) ORDER BY id"
        ))
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Teams in a tournament ─────────────────────────────────────────

    pub async fn add_tournament_team(&self, tournament_id: i64, team_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tournament_teams (tournament_id, team_id) VALUES (?, ?)",
        )
        .bind(tournament_id)
        .bind(team_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_tournament_team(&self, tournament_id: i64, team_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM tournament_teams WHERE tournament_id = ? AND team_id = ?")
                .bind(tournament_id)
                .bind(team_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn has_tournament_team(&self, tournament_id: i64, team_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tournament_teams WHERE tournament_id = ? AND team_id = ?",
        )
        .bind(tournament_id)
        .bind(team_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn tournament_teams(&self, tournament_id: i64) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            "SELECT t.id, t.name, t.keyname, t.description, t.private, t.accuracy, t.created_at \
             FROM teams t JOIN tournament_teams tt ON tt.team_id = t.id \
             WHERE tt.tournament_id = ? ORDER BY t.id",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Teams the user administers that have not joined the tournament yet.
    pub async fn tournament_candidates(
        &self,
        tournament_id: i64,
        user_id: i64,
    ) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            "SELECT t.id, t.name, t.keyname, t.description, t.private, t.accuracy, t.created_at \
             FROM teams t JOIN team_admins a ON a.team_id = t.id \
             WHERE a.user_id = ? AND t.id NOT IN \
             (SELECT team_id FROM tournament_teams WHERE tournament_id = ?) ORDER BY t.id",
        )
        .bind(user_id)
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Admins ────────────────────────────────────────────────────────

    pub async fn add_tournament_admin(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tournament_admins (tournament_id, user_id) VALUES (?, ?)",
        )
        .bind(tournament_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_tournament_admin(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM tournament_admins WHERE tournament_id = ? AND user_id = ?")
                .bind(tournament_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_tournament_admin(&self, tournament_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tournament_admins WHERE tournament_id = ? AND user_id = ?",
        )
        .bind(tournament_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn count_tournament_admins(&self, tournament_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tournament_admins WHERE tournament_id = ?")
            .bind(tournament_id)
            .fetch_one(&self.pool)
            .await
    }

    // ── Rankings ──────────────────────────────────────────────────────

    /// Participants by points earned in this tournament, best first.
    pub async fn ranking_by_user(&self, tournament_id: i64, limit: i64) -> Result<Vec<UserScore>, sqlx::Error> {
        sqlx::query_as::<_, UserScore>(
            "SELECT u.id, u.username, u.name, \
                    COALESCE((SELECT SUM(s.points) FROM score_entries s \
                              WHERE s.user_id = u.id AND s.tournament_id = p.tournament_id), 0) AS score \
             FROM users u JOIN tournament_participants p ON p.user_id = u.id \
             WHERE p.tournament_id = ? \
             ORDER BY score DESC, u.id LIMIT ?",
        )
        .bind(tournament_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Joined teams by their latest accuracy in this tournament, best first.
    pub async fn ranking_by_team(&self, tournament_id: i64, limit: i64) -> Result<Vec<TeamAccuracy>, sqlx::Error> {
        sqlx::query_as::<_, TeamAccuracy>(
            "SELECT t.id, t.name, \
                    COALESCE((SELECT v.value FROM accuracies a \
                              JOIN accuracy_values v ON v.accuracy_id = a.id \
                              WHERE a.team_id = t.id AND a.tournament_id = tt.tournament_id \
                              ORDER BY v.position DESC LIMIT 1), 0.0) AS accuracy \
             FROM teams t JOIN tournament_teams tt ON tt.team_id = t.id \
             WHERE tt.tournament_id = ? \
             ORDER BY accuracy DESC, t.id LIMIT ?",
        )
        .bind(tournament_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
