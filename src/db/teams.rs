use super::users::USER_COLUMNS;
use super::{AccuracySeries, Database, Price, Team, Tournament, User};
use crate::search::{keyname, SearchKind};

const TEAM_COLUMNS: &str = "id, name, keyname, description, private, accuracy, created_at";

impl Database {
    // ── Team CRUD ─────────────────────────────────────────────────────

    /// Create a team. The creator becomes its first admin and member.
    pub async fn create_team(
        &self,
        name: &str,
        description: &str,
        private: bool,
        admin_id: i64,
    ) -> Result<Team, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (name, keyname, description, private) VALUES (?, ?, ?, ?) \
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(name)
        .bind(keyname(name))
        .bind(description)
        .bind(private)
        .fetch_one(&self.pool)
        .await?;

        self.add_team_admin(team.id, admin_id).await?;
        self.add_team_member(team.id, admin_id).await?;
        self.index_words(SearchKind::Team, team.id, name).await?;
        Ok(team)
    }

    pub async fn get_team(&self, id: i64) -> Result<Option<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams ORDER BY id"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn teams_by_ids(&self, ids: &[i64]) -> Result<Vec<Team>, sqlx::Error> {
        let mut teams = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(t) = self.get_team(*id).await? {
                teams.push(t);
            }
        }
        Ok(teams)
    }

    pub async fn update_team(
        &self,
        id: i64,
        name: &str,
        description: &str,
        private: bool,
    ) -> Result<Option<Team>, sqlx::Error> {
        let Some(current) = self.get_team(id).await? else {
            return Ok(None);
        };
        sqlx::query(
            "UPDATE teams SET name = ?, keyname = ?, description = ?, private = ? WHERE id = ?",
        )
        .bind(name)
        .bind(keyname(name))
        .bind(description)
        .bind(private)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.reindex_words(SearchKind::Team, id, &current.name, name)
            .await?;
        self.get_team(id).await
    }

    /// Delete a team. Memberships, prices and accuracies go with it.
    pub async fn delete_team(&self, id: i64) -> Result<bool, sqlx::Error> {
        let Some(team) = self.get_team(id).await? else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.unindex_words(SearchKind::Team, id, &team.name).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_team_accuracy(&self, id: i64, accuracy: f64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE teams SET accuracy = ? WHERE id = ?")
            .bind(accuracy)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ── Members and admins ────────────────────────────────────────────

    pub async fn team_members(&self, team_id: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN \
             (SELECT user_id FROM team_members WHERE team_id = ?) ORDER BY id"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn team_admins(&self, team_id: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN \
             (SELECT user_id FROM team_admins WHERE team_id = ?) ORDER BY id"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Members ordered by total score, best first.
    pub async fn team_ranking(&self, team_id: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id IN \
             (SELECT user_id FROM team_members WHERE team_id = ?) \
             ORDER BY score DESC, id LIMIT ?"
        ))
        .bind(team_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn is_team_member(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_members WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn is_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM team_admins WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn count_team_admins(&self, team_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM team_admins WHERE team_id = ?")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Returns false when the user already was a member.
    pub async fn add_team_member(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO team_members (team_id, user_id) VALUES (?, ?)")
                .bind(team_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a member, and their admin rights on the team.
    pub async fn remove_team_member(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM team_admins WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn add_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO team_admins (team_id, user_id) VALUES (?, ?)")
                .bind(team_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_team_admin(&self, team_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_admins WHERE team_id = ? AND user_id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Teams the user administers.
    pub async fn admin_teams(&self, user_id: i64) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id IN \
             (SELECT team_id FROM team_admins WHERE user_id = ?) ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn team_tournaments(&self, team_id: i64) -> Result<Vec<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(
            "SELECT t.id, t.name, t.keyname, t.description, t.start_date, t.end_date, t.kind, t.created_at \
             FROM tournaments t JOIN tournament_teams tt ON tt.tournament_id = t.id \
             WHERE tt.team_id = ? ORDER BY t.id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Prices ────────────────────────────────────────────────────────

    pub async fn create_price(
        &self,
        team_id: i64,
        tournament_id: i64,
        tournament_name: &str,
        description: &str,
    ) -> Result<Price, sqlx::Error> {
        sqlx::query_as::<_, Price>(
            "INSERT INTO prices (team_id, tournament_id, tournament_name, description) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(team_id, tournament_id) DO UPDATE SET tournament_name = excluded.tournament_name \
             RETURNING id, team_id, tournament_id, tournament_name, description, created_at",
        )
        .bind(team_id)
        .bind(tournament_id)
        .bind(tournament_name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_price(&self, team_id: i64, tournament_id: i64) -> Result<Option<Price>, sqlx::Error> {
        sqlx::query_as::<_, Price>(
            "SELECT id, team_id, tournament_id, tournament_name, description, created_at \
             FROM prices WHERE team_id = ? AND tournament_id = ?",
        )
        .bind(team_id)
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn team_prices(&self, team_id: i64) -> Result<Vec<Price>, sqlx::Error> {
        sqlx::query_as::<_, Price>(
            "SELECT id, team_id, tournament_id, tournament_name, description, created_at \
             FROM prices WHERE team_id = ? ORDER BY id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update_price(
        &self,
        team_id: i64,
        tournament_id: i64,
        description: &str,
    ) -> Result<Option<Price>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE prices SET description = ? WHERE team_id = ? AND tournament_id = ?",
        )
        .bind(description)
        .bind(team_id)
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_price(team_id, tournament_id).await
    }

    pub async fn delete_price(&self, team_id: i64, tournament_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prices WHERE team_id = ? AND tournament_id = ?")
            .bind(team_id)
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Accuracies ────────────────────────────────────────────────────

    /// Accuracy series id for a team in a tournament. A new series starts
    /// with a zero entry for each match in `prefill`, tagged with that match.
    pub async fn ensure_accuracy(
        &self,
        team_id: i64,
        tournament_id: i64,
        prefill: &[i64],
    ) -> Result<i64, sqlx::Error> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM accuracies WHERE team_id = ? AND tournament_id = ?",
        )
        .bind(team_id)
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(id) = existing {
            return Ok(id);
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO accuracies (team_id, tournament_id) VALUES (?, ?) RETURNING id",
        )
        .bind(team_id)
        .bind(tournament_id)
        .fetch_one(&self.pool)
        .await?;
        for match_id in prefill {
            self.push_accuracy(id, Some(*match_id), 0.0).await?;
        }
        Ok(id)
    }

    pub async fn accuracy_values(&self, accuracy_id: i64) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT value FROM accuracy_values WHERE accuracy_id = ? ORDER BY position",
        )
        .bind(accuracy_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Whether a match already contributed to an accuracy series.
    pub async fn accuracy_has_match(&self, accuracy_id: i64, match_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accuracy_values WHERE accuracy_id = ? AND match_id = ?",
        )
        .bind(accuracy_id)
        .bind(match_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn push_accuracy(
        &self,
        accuracy_id: i64,
        match_id: Option<i64>,
        value: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO accuracy_values (accuracy_id, position, match_id, value) \
             VALUES (?, (SELECT COUNT(*) FROM accuracy_values WHERE accuracy_id = ?), ?, ?)",
        )
        .bind(accuracy_id)
        .bind(accuracy_id)
        .bind(match_id)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn team_accuracies(&self, team_id: i64) -> Result<Vec<AccuracySeries>, sqlx::Error> {
        let rows: Vec<(i64, i64, String)> = sqlx::query_as(
            "SELECT a.id, a.tournament_id, t.name FROM accuracies a \
             JOIN tournaments t ON t.id = a.tournament_id \
             WHERE a.team_id = ? ORDER BY a.id",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        let mut series = Vec::with_capacity(rows.len());
        for (id, tournament_id, tournament_name) in rows {
            series.push(AccuracySeries {
                id,
                team_id,
                tournament_id,
                tournament_name,
                values: self.accuracy_values(id).await?,
            });
        }
        Ok(series)
    }

    pub async fn team_accuracy(
        &self,
        team_id: i64,
        tournament_id: i64,
    ) -> Result<Option<AccuracySeries>, sqlx::Error> {
        Ok(self
            .team_accuracies(team_id)
            .await?
            .into_iter()
            .find(|s| s.tournament_id == tournament_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::*;

    #[tokio::test]
    async fn test_create_team_sets_admin_and_member() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let team = db.create_team("Reds", "we are red", false, ana.id).await.unwrap();
        assert_eq!(team.keyname, "reds");
        assert!(!team.private);
        assert!(db.is_team_admin(team.id, ana.id).await.unwrap());
        assert!(db.is_team_member(team.id, ana.id).await.unwrap());
        assert_eq!(db.team_members(team.id).await.unwrap().len(), 1);
        assert_eq!(db.admin_teams(ana.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_team_names_are_unique_case_insensitively() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        db.create_team("Reds", "", false, ana.id).await.unwrap();
        let err = db.create_team("  REDS ", "", false, ana.id).await.unwrap_err();
        assert!(crate::db::is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_update_and_delete_team() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();

        let updated = db
            .update_team(team.id, "Blues", "new", true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Blues");
        assert!(updated.private);
        assert!(db.update_team(999, "x", "", false).await.unwrap().is_none());

        assert!(db.delete_team(team.id).await.unwrap());
        assert!(db.get_team(team.id).await.unwrap().is_none());
        assert!(db.user_teams(ana.id).await.unwrap().is_empty());
        assert!(!db.delete_team(team.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_membership_and_ranking() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();

        assert!(db.add_team_member(team.id, bob.id).await.unwrap());
        assert!(!db.add_team_member(team.id, bob.id).await.unwrap());
        assert!(db.add_team_admin(team.id, bob.id).await.unwrap());
        assert_eq!(db.count_team_admins(team.id).await.unwrap(), 2);

        sqlx::query("UPDATE users SET score = 5 WHERE id = ?")
            .bind(bob.id)
            .execute(&db.pool)
            .await
            .unwrap();
        let ranking = db.team_ranking(team.id, 10).await.unwrap();
        assert_eq!(ranking[0].id, bob.id);

        assert!(db.remove_team_member(team.id, bob.id).await.unwrap());
        assert!(!db.is_team_admin(team.id, bob.id).await.unwrap());
        assert_eq!(db.team_members(team.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prices() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();
        let t = db
            .create_tournament("Cup", "", date("2014-06-12"), date("2014-07-13"), ana.id)
            .await
            .unwrap();

        let price = db.create_price(team.id, t.id, "Cup", "").await.unwrap();
        assert_eq!(price.tournament_name, "Cup");
        let updated = db.update_price(team.id, t.id, "a beer").await.unwrap().unwrap();
        assert_eq!(updated.description, "a beer");
        assert_eq!(db.team_prices(team.id).await.unwrap().len(), 1);

        assert!(db.delete_price(team.id, t.id).await.unwrap());
        assert!(db.get_price(team.id, t.id).await.unwrap().is_none());
        assert!(db.update_price(team.id, t.id, "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_accuracy_series() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();
        let t = db
            .create_tournament("Cup", "", date("2014-06-12"), date("2014-07-13"), ana.id)
            .await
            .unwrap();

        let id = db.ensure_accuracy(team.id, t.id, &[11, 12]).await.unwrap();
        assert_eq!(db.ensure_accuracy(team.id, t.id, &[1, 2, 3, 4, 5]).await.unwrap(), id);
        db.push_accuracy(id, Some(77), 0.5).await.unwrap();
        assert_eq!(db.accuracy_values(id).await.unwrap(), vec![0.0, 0.0, 0.5]);
        assert!(db.accuracy_has_match(id, 77).await.unwrap());
        assert!(db.accuracy_has_match(id, 12).await.unwrap());
        assert!(!db.accuracy_has_match(id, 3).await.unwrap());

        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(series.tournament_name, "Cup");
        assert_eq!(series.values.len(), 3);
        assert!(db.team_accuracy(team.id, 999).await.unwrap().is_none());
    }
}
