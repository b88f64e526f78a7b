use super::{Database, ScoreEntry, Team, Tournament, User};
use crate::search::{keyname, SearchKind};

pub(super) const USER_COLUMNS: &str =
    "id, username, email, name, password_hash, role, score, auth_key, created_at";

/// Text indexed for user search: username and display name.
fn user_search_text(username: &str, name: &str) -> String {
    format!("{username} {name}")
}

impl Database {
    // ── User CRUD ─────────────────────────────────────────────────────

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
        name: &str,
        role: &str,
        auth_key: &str,
    ) -> Result<User, sqlx::Error> {
        let text = user_search_text(username, name);
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, name, keyname, password_hash, role, auth_key) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(name)
        .bind(keyname(&text))
        .bind(password_hash)
        .bind(role)
        .bind(auth_key)
        .fetch_one(&self.pool)
        .await?;

        self.index_words(SearchKind::User, user.id, &text).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, sqlx::Error> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(u) = self.get_user(*id).await? {
                users.push(u);
            }
        }
        Ok(users)
    }

    /// Update display name and email. Search words follow the new name.
    pub async fn update_user(
        &self,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let Some(current) = self.get_user(id).await? else {
            return Ok(None);
        };
        let new_name = name.unwrap_or(&current.name);
        let new_email = email.unwrap_or(&current.email);
        let old_text = user_search_text(&current.username, &current.name);
        let new_text = user_search_text(&current.username, new_name);

        sqlx::query("UPDATE users SET name = ?, email = ?, keyname = ? WHERE id = ?")
            .bind(new_name)
            .bind(new_email)
            .bind(keyname(&new_text))
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.reindex_words(SearchKind::User, id, &old_text, &new_text)
            .await?;
        self.get_user(id).await
    }

    pub async fn set_user_role(&self, id: i64, role: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user with memberships, predictions and requests (cascaded).
    pub async fn delete_user(&self, id: i64) -> Result<bool, sqlx::Error> {
        let Some(user) = self.get_user(id).await? else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        self.unindex_words(
            SearchKind::User,
            id,
            &user_search_text(&user.username, &user.name),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── User relations ────────────────────────────────────────────────

    pub async fn user_teams(&self, user_id: i64) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            "SELECT t.id, t.name, t.keyname, t.description, t.private, t.accuracy, t.created_at \
             FROM teams t JOIN team_members m ON m.team_id = t.id \
             WHERE m.user_id = ? ORDER BY t.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn user_tournaments(&self, user_id: i64) -> Result<Vec<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>(
            "SELECT t.id, t.name, t.keyname, t.description, t.start_date, t.end_date, t.kind, t.created_at \
             FROM tournaments t JOIN tournament_participants p ON p.tournament_id = t.id \
             WHERE p.user_id = ? ORDER BY t.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    // ── Scores ────────────────────────────────────────────────────────

    pub async fn has_score_entry(&self, user_id: i64, match_id: i64) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM score_entries WHERE user_id = ? AND match_id = ?",
        )
        .bind(user_id)
        .bind(match_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Record points earned on a match and add them to the user's total.
    /// Returns false when the match was already scored for this user.
    pub async fn add_score(
        &self,
        user_id: i64,
        tournament_id: i64,
        match_id: i64,
        points: i64,
    ) -> Result<bool, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO score_entries (user_id, tournament_id, match_id, points) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(tournament_id)
        .bind(match_id)
        .bind(points)
        .execute(&self.pool)
        .await?;
        if inserted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET score = score + ? WHERE id = ?")
            .bind(points)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    /// Drop every score entry of a tournament, taking its points back from
    /// the user totals, and empty the tournament's accuracy series.
    pub async fn clear_tournament_scores(&self, tournament_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET score = score - ( \
                SELECT COALESCE(SUM(points), 0) FROM score_entries \
                WHERE score_entries.user_id = users.id AND score_entries.tournament_id = ?) \
             WHERE id IN (SELECT user_id FROM score_entries WHERE tournament_id = ?)",
        )
        .bind(tournament_id)
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        sqlx::query("DELETE FROM score_entries WHERE tournament_id = ?")
            .bind(tournament_id)
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "DELETE FROM accuracy_values \
             WHERE accuracy_id IN (SELECT id FROM accuracies WHERE tournament_id = ?)",
        )
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn user_scores(&self, user_id: i64) -> Result<Vec<ScoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, ScoreEntry>(
            "SELECT id, user_id, tournament_id, match_id, points, created_at \
             FROM score_entries WHERE user_id = ? ORDER BY tournament_id, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::*;
    use crate::search::SearchKind;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = test_db().await;
        let u = user(&db, "ana").await;
        assert_eq!(u.username, "ana");
        assert_eq!(u.role, "user");
        assert_eq!(u.score, 0);

        let fetched = db.get_user_by_username("ana").await.unwrap().unwrap();
        assert_eq!(fetched.id, u.id);
        assert!(db.get_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user_reindexes_name() {
        let db = test_db().await;
        let u = db
            .create_user("jdoe", "j@example.com", None, "John Doe", "user", "k")
            .await
            .unwrap();
        assert_eq!(db.search_ids(SearchKind::User, "john").await.unwrap(), vec![u.id]);

        let updated = db
            .update_user(u.id, Some("Johnny Doe"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Johnny Doe");
        assert_eq!(updated.email, "j@example.com");
        assert!(db.search_ids(SearchKind::User, "john").await.unwrap().is_empty());
        assert_eq!(db.search_ids(SearchKind::User, "johnny doe").await.unwrap(), vec![u.id]);

        assert!(db.update_user(999, Some("x"), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_unindexes() {
        let db = test_db().await;
        let u = user(&db, "gone").await;
        assert!(db.delete_user(u.id).await.unwrap());
        assert!(!db.delete_user(u.id).await.unwrap());
        assert!(db.search_ids(SearchKind::User, "gone").await.unwrap().is_empty());
        assert_eq!(db.word_count(SearchKind::User).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_score_is_idempotent_per_match() {
        let db = test_db().await;
        let u = user(&db, "ana").await;
        let admin = user(&db, "boss").await;
        let t = db
            .create_tournament("Cup", "", date("2014-06-12"), date("2014-07-13"), admin.id)
            .await
            .unwrap();
        let m = db
            .create_match(&crate::db::NewMatch {
                tournament_id: t.id,
                id_number: 1,
                match_date: date("2014-06-12"),
                team1_id: None,
                team2_id: None,
                location: "Rio".into(),
                rule: String::new(),
                ready: true,
                group_id: None,
            })
            .await
            .unwrap();

        assert!(db.add_score(u.id, t.id, m.id, 3).await.unwrap());
        assert!(!db.add_score(u.id, t.id, m.id, 3).await.unwrap());
        assert!(db.has_score_entry(u.id, m.id).await.unwrap());

        let fetched = db.get_user(u.id).await.unwrap().unwrap();
        assert_eq!(fetched.score, 3);
        assert_eq!(db.user_scores(u.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_tournament_scores() {
        let db = test_db().await;
        let u = user(&db, "ana").await;
        let admin = user(&db, "boss").await;
        let mut ids = Vec::new();
        for name in ["Cup", "Other"] {
            let t = db
                .create_tournament(name, "", date("2014-06-12"), date("2014-07-13"), admin.id)
                .await
                .unwrap();
            let m = db
                .create_match(&crate::db::NewMatch {
                    tournament_id: t.id,
                    id_number: 1,
                    match_date: date("2014-06-12"),
                    team1_id: None,
                    team2_id: None,
                    location: String::new(),
                    rule: String::new(),
                    ready: true,
                    group_id: None,
                })
                .await
                .unwrap();
            ids.push((t.id, m.id));
        }
        let (cup, cup_match) = ids[0];
        let (other, other_match) = ids[1];
        db.add_score(u.id, cup, cup_match, 3).await.unwrap();
        db.add_score(u.id, other, other_match, 1).await.unwrap();
        let team = db.create_team("Reds", "", false, u.id).await.unwrap();
        let acc = db.ensure_accuracy(team.id, cup, &[cup_match]).await.unwrap();

        db.clear_tournament_scores(cup).await.unwrap();
        assert_eq!(db.get_user(u.id).await.unwrap().unwrap().score, 1);
        assert!(!db.has_score_entry(u.id, cup_match).await.unwrap());
        assert!(db.has_score_entry(u.id, other_match).await.unwrap());
        assert!(db.accuracy_values(acc).await.unwrap().is_empty());
        assert!(db.add_score(u.id, cup, cup_match, 3).await.unwrap());
    }
}
