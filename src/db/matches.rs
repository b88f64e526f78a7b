use chrono::NaiveDate;

use super::{Database, Group, GroupStanding, Match, Predict, TTeam, Tournament};
use crate::tournament::{Phase, Standing};

const MATCH_COLUMNS: &str = "id, tournament_id, id_number, match_date, team1_id, team2_id, \
     location, rule, result1, result2, finished, ready, can_predict, group_id";

/// A match about to be scheduled.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub tournament_id: i64,
    pub id_number: i64,
    pub match_date: NaiveDate,
    pub team1_id: Option<i64>,
    pub team2_id: Option<i64>,
    pub location: String,
    pub rule: String,
    pub ready: bool,
    pub group_id: Option<i64>,
}

impl Database {
    // ── National teams ────────────────────────────────────────────────

    pub async fn create_tteam(&self, tournament_id: i64, name: &str, iso: &str) -> Result<TTeam, sqlx::Error> {
        sqlx::query_as::<_, TTeam>(
            "INSERT INTO tteams (tournament_id, name, iso) VALUES (?, ?, ?) \
             RETURNING id, tournament_id, name, iso",
        )
        .bind(tournament_id)
        .bind(name)
        .bind(iso)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_tteam(&self, tournament_id: i64, id: i64) -> Result<Option<TTeam>, sqlx::Error> {
        sqlx::query_as::<_, TTeam>(
            "SELECT id, tournament_id, name, iso FROM tteams WHERE id = ? AND tournament_id = ?",
        )
        .bind(id)
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_tteams(&self, tournament_id: i64) -> Result<Vec<TTeam>, sqlx::Error> {
        sqlx::query_as::<_, TTeam>(
            "SELECT id, tournament_id, name, iso FROM tteams WHERE tournament_id = ? ORDER BY id",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update_tteam(
        &self,
        tournament_id: i64,
        id: i64,
        name: &str,
        iso: &str,
    ) -> Result<Option<TTeam>, sqlx::Error> {
        sqlx::query_as::<_, TTeam>(
            "UPDATE tteams SET name = ?, iso = ? WHERE id = ? AND tournament_id = ? \
             RETURNING id, tournament_id, name, iso",
        )
        .bind(name)
        .bind(iso)
        .bind(id)
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await
    }

    // ── Groups ────────────────────────────────────────────────────────

    pub async fn create_group(&self, tournament_id: i64, name: &str) -> Result<Group, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "INSERT INTO tgroups (tournament_id, name) VALUES (?, ?) \
             RETURNING id, tournament_id, name",
        )
        .bind(tournament_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    /// Place a team in a group at its draw position.
    pub async fn add_group_team(&self, group_id: i64, tteam_id: i64, position: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO tgroup_teams (group_id, tteam_id, position) VALUES (?, ?, ?)")
            .bind(group_id)
            .bind(tteam_id)
            .bind(position)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list_groups(&self, tournament_id: i64) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, tournament_id, name FROM tgroups WHERE tournament_id = ? ORDER BY id",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Group table rows in draw order.
    pub async fn group_standings(&self, group_id: i64) -> Result<Vec<GroupStanding>, sqlx::Error> {
        sqlx::query_as::<_, GroupStanding>(
            "SELECT g.group_id, g.tteam_id, g.position, t.name, t.iso, \
                    g.points, g.goals_for, g.goals_against \
             FROM tgroup_teams g JOIN tteams t ON t.id = g.tteam_id \
             WHERE g.group_id = ? ORDER BY g.position",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update_standing(
        &self,
        group_id: i64,
        tteam_id: i64,
        standing: &Standing,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tgroup_teams SET points = ?, goals_for = ?, goals_against = ? \
             WHERE group_id = ? AND tteam_id = ?",
        )
        .bind(standing.points)
        .bind(standing.goals_for)
        .bind(standing.goals_against)
        .bind(group_id)
        .bind(tteam_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn reset_standings(&self, tournament_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tgroup_teams SET points = 0, goals_for = 0, goals_against = 0 \
             WHERE group_id IN (SELECT id FROM tgroups WHERE tournament_id = ?)",
        )
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ── Matches ───────────────────────────────────────────────────────

    /// Schedule a match. Ready matches open for predictions right away.
    pub async fn create_match(&self, m: &NewMatch) -> Result<Match, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!(
            "INSERT INTO tmatches (tournament_id, id_number, match_date, team1_id, team2_id, \
                                   location, rule, seed_rule, ready, can_predict, group_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {MATCH_COLUMNS}"
        ))
        .bind(m.tournament_id)
        .bind(m.id_number)
        .bind(m.match_date)
        .bind(m.team1_id)
        .bind(m.team2_id)
        .bind(&m.location)
        .bind(&m.rule)
        .bind(&m.rule)
        .bind(m.ready)
        .bind(m.ready)
        .bind(m.group_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_match_by_number(
        &self,
        tournament_id: i64,
        id_number: i64,
    ) -> Result<Option<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM tmatches WHERE tournament_id = ? AND id_number = ?"
        ))
        .bind(tournament_id)
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_match(&self, id: i64) -> Result<Option<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!("SELECT {MATCH_COLUMNS} FROM tmatches WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All matches of a tournament ordered by match number.
    pub async fn list_matches(&self, tournament_id: i64) -> Result<Vec<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM tmatches WHERE tournament_id = ? ORDER BY id_number"
        ))
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Matches of one phase of the tournament's layout. Empty when the
    /// layout does not play that phase.
    pub async fn phase_matches(&self, tournament: &Tournament, phase: Phase) -> Result<Vec<Match>, sqlx::Error> {
        let Some((low, high)) = tournament.kind.interval(phase) else {
            return Ok(Vec::new());
        };
        sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM tmatches \
             WHERE tournament_id = ? AND id_number BETWEEN ? AND ? ORDER BY id_number"
        ))
        .bind(tournament.id)
        .bind(low)
        .bind(high)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn group_matches(&self, group_id: i64) -> Result<Vec<Match>, sqlx::Error> {
        sqlx::query_as::<_, Match>(&format!(
            "SELECT {MATCH_COLUMNS} FROM tmatches WHERE group_id = ? ORDER BY id_number"
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn finished_match_count(&self, tournament_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tmatches WHERE tournament_id = ? AND finished = 1")
            .bind(tournament_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Match ids of the finished matches, in match number order.
    pub async fn finished_match_ids(&self, tournament_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM tmatches WHERE tournament_id = ? AND finished = 1 ORDER BY id_number",
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Store a final score. The match is closed for predictions.
    pub async fn update_match_result(&self, id: i64, result1: i64, result2: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tmatches SET result1 = ?, result2 = ?, finished = 1, can_predict = 0 WHERE id = ?",
        )
        .bind(result1)
        .bind(result2)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fill a knockout match with its resolved teams and open it.
    pub async fn set_match_teams(&self, id: i64, team1_id: i64, team2_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tmatches SET team1_id = ?, team2_id = ?, rule = '', ready = 1, can_predict = 1 \
             WHERE id = ?",
        )
        .bind(team1_id)
        .bind(team2_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_can_predict(&self, id: i64, can_predict: bool) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tmatches SET can_predict = ? WHERE id = ?")
            .bind(can_predict)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Mark every match of a phase ready and predictable. Returns the count.
    pub async fn activate_phase(&self, tournament: &Tournament, phase: Phase) -> Result<u64, sqlx::Error> {
        let Some((low, high)) = tournament.kind.interval(phase) else {
            return Ok(0);
        };
        let result = sqlx::query(
            "UPDATE tmatches SET ready = 1, can_predict = 1 \
             WHERE tournament_id = ? AND id_number BETWEEN ? AND ?",
        )
        .bind(tournament.id)
        .bind(low)
        .bind(high)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Zero results and reopen group matches.
    pub async fn reset_group_matches(&self, tournament_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tmatches SET result1 = 0, result2 = 0, finished = 0, ready = 1, can_predict = 1 \
             WHERE tournament_id = ? AND group_id IS NOT NULL",
        )
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Put knockout matches back in their unresolved state. Matches that were
    /// scheduled from a rule get the rule back and lose their teams.
    pub async fn reset_knockout_matches(&self, tournament_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tmatches SET result1 = 0, result2 = 0, finished = 0, ready = 0, can_predict = 0, \
                    rule = seed_rule, \
                    team1_id = CASE WHEN seed_rule = '' THEN team1_id ELSE NULL END, \
                    team2_id = CASE WHEN seed_rule = '' THEN team2_id ELSE NULL END \
             WHERE tournament_id = ? AND group_id IS NULL",
        )
        .bind(tournament_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ── Predictions ───────────────────────────────────────────────────

    /// Create or overwrite a user's prediction. The flag tells whether it is new.
    pub async fn upsert_predict(
        &self,
        user_id: i64,
        match_id: i64,
        result1: i64,
        result2: i64,
    ) -> Result<(Predict, bool), sqlx::Error> {
        let existed = self.get_predict(user_id, match_id).await?.is_some();
        let predict = sqlx::query_as::<_, Predict>(
            "INSERT INTO predicts (user_id, match_id, result1, result2) VALUES (?, ?, ?, ?) \
             ON CONFLICT(user_id, match_id) DO UPDATE SET \
                result1 = excluded.result1, result2 = excluded.result2, updated_at = datetime('now') \
             RETURNING id, user_id, match_id, result1, result2, created_at, updated_at",
        )
        .bind(user_id)
        .bind(match_id)
        .bind(result1)
        .bind(result2)
        .fetch_one(&self.pool)
        .await?;
        Ok((predict, !existed))
    }

    pub async fn get_predict(&self, user_id: i64, match_id: i64) -> Result<Option<Predict>, sqlx::Error> {
        sqlx::query_as::<_, Predict>(
            "SELECT id, user_id, match_id, result1, result2, created_at, updated_at \
             FROM predicts WHERE user_id = ? AND match_id = ?",
        )
        .bind(user_id)
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn predicts_for_match(&self, match_id: i64) -> Result<Vec<Predict>, sqlx::Error> {
        sqlx::query_as::<_, Predict>(
            "SELECT id, user_id, match_id, result1, result2, created_at, updated_at \
             FROM predicts WHERE match_id = ? ORDER BY user_id",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
    }

    /// A user's predictions within one tournament.
    pub async fn user_predicts(&self, user_id: i64, tournament_id: i64) -> Result<Vec<Predict>, sqlx::Error> {
        sqlx::query_as::<_, Predict>(
            "SELECT p.id, p.user_id, p.match_id, p.result1, p.result2, p.created_at, p.updated_at \
             FROM predicts p JOIN tmatches m ON m.id = p.match_id \
             WHERE p.user_id = ? AND m.tournament_id = ? ORDER BY m.id_number",
        )
        .bind(user_id)
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::NewMatch;
    use crate::db::test_support::*;
    use crate::db::{Database, Tournament};
    use crate::tournament::{Phase, Standing, TournamentKind};

    async fn cup(db: &Database) -> i64 {
        cup_tournament(db).await.id
    }

    async fn cup_tournament(db: &Database) -> Tournament {
        let admin = user(db, "admin").await;
        db.create_tournament("Cup", "", date("2014-06-12"), date("2014-07-13"), admin.id)
            .await
            .unwrap()
    }

    fn knockout(tournament_id: i64, id_number: i64, rule: &str) -> NewMatch {
        NewMatch {
            tournament_id,
            id_number,
            match_date: date("2014-06-28"),
            team1_id: None,
            team2_id: None,
            location: "Rio".into(),
            rule: rule.into(),
            ready: false,
            group_id: None,
        }
    }

    #[tokio::test]
    async fn test_groups_and_standings() {
        let db = test_db().await;
        let t = cup(&db).await;
        let g = db.create_group(t, "A").await.unwrap();
        let brazil = db.create_tteam(t, "Brazil", "br").await.unwrap();
        let croatia = db.create_tteam(t, "Croatia", "hr").await.unwrap();
        db.add_group_team(g.id, brazil.id, 0).await.unwrap();
        db.add_group_team(g.id, croatia.id, 1).await.unwrap();

        let won = Standing { points: 3, goals_for: 3, goals_against: 1 };
        db.update_standing(g.id, brazil.id, &won).await.unwrap();
        let rows = db.group_standings(g.id).await.unwrap();
        assert_eq!(rows[0].name, "Brazil");
        assert_eq!(rows[0].points, 3);
        assert_eq!(rows[1].points, 0);

        db.reset_standings(t).await.unwrap();
        assert_eq!(db.group_standings(g.id).await.unwrap()[0].points, 0);
        assert_eq!(db.list_groups(t).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_match_ready_is_predictable() {
        let db = test_db().await;
        let t = cup(&db).await;
        let mut seed = knockout(t, 1, "");
        seed.ready = true;
        let m = db.create_match(&seed).await.unwrap();
        assert!(m.ready && m.can_predict && !m.finished);

        let k = db.create_match(&knockout(t, 49, "1A 2B")).await.unwrap();
        assert!(!k.ready && !k.can_predict);
        assert!(db.create_match(&knockout(t, 49, "")).await.is_err());
    }

    #[tokio::test]
    async fn test_result_and_knockout_resolution() {
        let db = test_db().await;
        let t = cup(&db).await;
        let a = db.create_tteam(t, "Brazil", "br").await.unwrap();
        let b = db.create_tteam(t, "Chile", "cl").await.unwrap();
        let m = db.create_match(&knockout(t, 49, "1A 2B")).await.unwrap();

        db.set_match_teams(m.id, a.id, b.id).await.unwrap();
        let m = db.get_match(m.id).await.unwrap().unwrap();
        assert_eq!((m.team1_id, m.team2_id), (Some(a.id), Some(b.id)));
        assert!(m.rule.is_empty() && m.ready && m.can_predict);

        db.update_match_result(m.id, 2, 1).await.unwrap();
        let m = db.get_match_by_number(t, 49).await.unwrap().unwrap();
        assert!(m.finished && !m.can_predict);
        assert_eq!(db.finished_match_count(t).await.unwrap(), 1);
        assert_eq!(db.finished_match_ids(t).await.unwrap(), vec![m.id]);

        db.reset_knockout_matches(t).await.unwrap();
        let m = db.get_match(m.id).await.unwrap().unwrap();
        assert_eq!(m.rule, "1A 2B");
        assert!(m.team1_id.is_none() && !m.finished && !m.ready);
    }

    #[tokio::test]
    async fn test_activate_phase_only_touches_its_range() {
        let db = test_db().await;
        let cup = cup_tournament(&db).await;
        let t = cup.id;
        db.create_match(&knockout(t, 49, "1A 2B")).await.unwrap();
        db.create_match(&knockout(t, 57, "W49 W50")).await.unwrap();

        assert_eq!(db.activate_phase(&cup, Phase::RoundOf16).await.unwrap(), 1);
        assert!(db.get_match_by_number(t, 49).await.unwrap().unwrap().can_predict);
        assert!(!db.get_match_by_number(t, 57).await.unwrap().unwrap().ready);
        assert_eq!(db.phase_matches(&cup, Phase::QuarterFinals).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_phase_ranges_follow_the_tournament_kind() {
        let db = test_db().await;
        let cup = cup_tournament(&db).await;
        db.create_match(&knockout(cup.id, 49, "W45 W46")).await.unwrap();
        db.create_match(&knockout(cup.id, 51, "W49 W50")).await.unwrap();
        assert_eq!(db.phase_matches(&cup, Phase::RoundOf16).await.unwrap().len(), 2);

        let euro = db.set_tournament_kind(cup.id, TournamentKind::Euro2016).await.unwrap();
        assert_eq!(euro.kind, TournamentKind::Euro2016);
        let semis = db.phase_matches(&euro, Phase::SemiFinals).await.unwrap();
        assert_eq!(semis.len(), 1);
        assert_eq!(semis[0].id_number, 49);
        assert!(db.phase_matches(&euro, Phase::ThirdPlace).await.unwrap().is_empty());
        assert_eq!(db.activate_phase(&euro, Phase::ThirdPlace).await.unwrap(), 0);
        assert_eq!(db.activate_phase(&euro, Phase::Finals).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_predict() {
        let db = test_db().await;
        let t = cup(&db).await;
        let ana = user(&db, "ana").await;
        let mut seed = knockout(t, 1, "");
        seed.ready = true;
        let m = db.create_match(&seed).await.unwrap();

        let (p, created) = db.upsert_predict(ana.id, m.id, 1, 0).await.unwrap();
        assert!(created);
        let (p2, created) = db.upsert_predict(ana.id, m.id, 2, 2).await.unwrap();
        assert!(!created);
        assert_eq!(p.id, p2.id);
        assert_eq!((p2.result1, p2.result2), (2, 2));
        assert_eq!(db.predicts_for_match(m.id).await.unwrap().len(), 1);
        assert_eq!(db.user_predicts(ana.id, t).await.unwrap().len(), 1);
    }
}
