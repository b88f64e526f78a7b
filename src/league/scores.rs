use std::collections::HashMap;

use serde::Serialize;

use super::find_tournament;
use crate::activity::{ActivityEntity, Audience, NewActivity};
use crate::db::{Database, Predict, Tournament, User};
use crate::error::AppError;
use crate::metrics;
use crate::scoring::{match_accuracy, next_running_accuracy, predict_score};

/// Save a user's prediction for an open match. Returns the prediction and
/// whether it was new.
pub async fn predict(
    db: &Database,
    user: &User,
    tournament: &Tournament,
    id_number: i64,
    result1: i64,
    result2: i64,
) -> Result<(Predict, bool), AppError> {
    if !db.is_participant(tournament.id, user.id).await? {
        return Err(AppError::forbidden("join the tournament to predict its matches"));
    }
    let m = db
        .get_match_by_number(tournament.id, id_number)
        .await?
        .ok_or(AppError::NotFound("Match"))?;
    if !m.ready || !m.can_predict || m.finished {
        return Err(AppError::bad_request("match is not open for predictions"));
    }
    if result1 < 0 || result2 < 0 {
        return Err(AppError::bad_request("results must not be negative"));
    }

    let (saved, created) = db.upsert_predict(user.id, m.id, result1, result2).await?;
    let kind = if created { "create" } else { "update" };
    metrics::PREDICTIONS_TOTAL.with_label_values(&[kind]).inc();

    let mut label = format!("match {}", m.id_number);
    if let (Some(t1), Some(t2)) = (m.team1_id, m.team2_id) {
        if let (Some(a), Some(b)) = (
            db.get_tteam(tournament.id, t1).await?,
            db.get_tteam(tournament.id, t2).await?,
        ) {
            label = format!("{} - {}", a.name, b.name);
        }
    }
    db.publish(
        NewActivity::new(
            "predict",
            format!("predicted {result1}-{result2} for match"),
            ActivityEntity::user(user.id, &user.username),
        )
        .object(ActivityEntity::new(m.id, "match", &label))
        .target(ActivityEntity::tournament(tournament.id, &tournament.name)),
        Audience::User(user.id),
    )
    .await?;

    Ok((saved, created))
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScoreUpdate {
    /// Users who earned points on the match.
    pub users_scored: usize,
    /// Teams whose accuracy series moved.
    pub teams_updated: usize,
}

/// Award points for a finished match and move the accuracy of every team in
/// the tournament. Running it twice for the same match changes nothing.
pub async fn update_scores(db: &Database, tournament_id: i64, match_id: i64) -> Result<ScoreUpdate, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    let m = db
        .get_match(match_id)
        .await?
        .filter(|m| m.tournament_id == tournament_id)
        .ok_or(AppError::NotFound("Match"))?;
    if !m.finished {
        return Err(AppError::bad_request("match is not finished"));
    }

    let predicts: HashMap<i64, Predict> = db
        .predicts_for_match(m.id)
        .await?
        .into_iter()
        .map(|p| (p.user_id, p))
        .collect();
    let points_of = |user_id: i64| {
        predicts
            .get(&user_id)
            .map(|p| predict_score((m.result1, m.result2), (p.result1, p.result2)))
            .unwrap_or(0)
    };

    let mut report = ScoreUpdate::default();
    for user in db.participants(tournament.id).await? {
        let points = points_of(user.id);
        if points == 0 {
            continue;
        }
        if !db.add_score(user.id, tournament.id, m.id, points).await? {
            continue;
        }
        report.users_scored += 1;
        let total = db.get_user(user.id).await?.map(|u| u.score).unwrap_or(points);
        db.publish(
            NewActivity::new(
                "score",
                format!("'s score is now {total}"),
                ActivityEntity::user(user.id, &user.username),
            ),
            Audience::User(user.id),
        )
        .await?;
    }

    // zeros for the other finished matches when a series starts here
    let earlier: Vec<i64> = db
        .finished_match_ids(tournament.id)
        .await?
        .into_iter()
        .filter(|id| *id != m.id)
        .collect();
    for team in db.tournament_teams(tournament.id).await? {
        let members = db.team_members(team.id).await?;
        if members.is_empty() {
            continue;
        }
        let accuracy_id = db.ensure_accuracy(team.id, tournament.id, &earlier).await?;
        if db.accuracy_has_match(accuracy_id, m.id).await? {
            continue;
        }

        let sum: i64 = members.iter().map(|u| points_of(u.id)).sum();
        let acc = match_accuracy(sum, members.len());
        let history = db.accuracy_values(accuracy_id).await?;
        let value = next_running_accuracy(&history, acc);
        db.push_accuracy(accuracy_id, Some(m.id), value).await?;
        db.set_team_accuracy(team.id, value).await?;
        report.teams_updated += 1;
    }

    tracing::info!(
        tournament_id,
        match_id,
        users = report.users_scored,
        teams = report.teams_updated,
        "Scores updated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;
    use crate::league::test_support::world_cup;
    use crate::league::{join_tournament, join_tournament_as_team, set_result};
    use crate::tasks::TaskQueue;

    #[tokio::test]
    async fn test_predict_rules() {
        let db = test_db().await;
        let (_, t) = world_cup(&db).await;
        let ana = user(&db, "ana").await;

        let err = predict(&db, &ana, &t, 1, 1, 0).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        join_tournament(&db, &ana, t.id).await.unwrap();
        let (p, created) = predict(&db, &ana, &t, 1, 1, 0).await.unwrap();
        assert!(created);
        let (p2, created) = predict(&db, &ana, &t, 1, 2, 0).await.unwrap();
        assert!(!created);
        assert_eq!(p.id, p2.id);

        assert!(matches!(predict(&db, &ana, &t, 1, -1, 0).await, Err(AppError::BadRequest(_))));
        assert!(matches!(predict(&db, &ana, &t, 49, 1, 0).await, Err(AppError::BadRequest(_))));
        assert!(matches!(predict(&db, &ana, &t, 77, 1, 0).await, Err(AppError::NotFound(_))));

        let feed = db.feed_page(ana.id, 10, 1).await.unwrap();
        assert_eq!(feed[0].verb, "predicted 2-0 for match");
        assert_eq!(feed[0].object.as_ref().unwrap().display_name, "Brazil - Croatia");
    }

    #[tokio::test]
    async fn test_update_scores_awards_points_once() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (root, t) = world_cup(&db).await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        for u in [&ana, &bob] {
            join_tournament(&db, u, t.id).await.unwrap();
        }
        predict(&db, &ana, &t, 1, 3, 1).await.unwrap(); // exact
        predict(&db, &bob, &t, 1, 1, 0).await.unwrap(); // trend

        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();
        db.add_team_member(team.id, bob.id).await.unwrap();
        join_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();
        let _ = root;

        let m = set_result(&db, &tasks, &t, 1, 3, 1).await.unwrap();
        let report = update_scores(&db, t.id, m.id).await.unwrap();
        assert_eq!(report, ScoreUpdate { users_scored: 2, teams_updated: 1 });

        assert_eq!(db.get_user(ana.id).await.unwrap().unwrap().score, 3);
        assert_eq!(db.get_user(bob.id).await.unwrap().unwrap().score, 1);

        // (3 + 1) / (3 * 2)
        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(series.values.len(), 1);
        assert!((series.values[0] - 4.0 / 6.0).abs() < 1e-9);
        let team = db.get_team(team.id).await.unwrap().unwrap();
        assert!((team.accuracy - 4.0 / 6.0).abs() < 1e-9);

        let again = update_scores(&db, t.id, m.id).await.unwrap();
        assert_eq!(again, ScoreUpdate::default());
        assert_eq!(db.get_user(ana.id).await.unwrap().unwrap().score, 3);

        let feed = db.feed_page(ana.id, 1, 1).await.unwrap();
        assert_eq!(feed[0].verb, "'s score is now 3");
    }

    #[tokio::test]
    async fn test_update_scores_needs_finished_match() {
        let db = test_db().await;
        let (_, t) = world_cup(&db).await;
        let m = db.get_match_by_number(t.id, 1).await.unwrap().unwrap();
        assert!(matches!(
            update_scores(&db, t.id, m.id).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            update_scores(&db, t.id, 9999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_late_team_gets_zero_prefill() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;
        let ana = user(&db, "ana").await;

        let first = set_result(&db, &tasks, &t, 1, 0, 0).await.unwrap();
        update_scores(&db, t.id, first.id).await.unwrap();

        let team = db.create_team("Late", "", false, ana.id).await.unwrap();
        join_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();
        predict(&db, &ana, &t, 2, 1, 1).await.unwrap();
        let second = set_result(&db, &tasks, &t, 2, 1, 1).await.unwrap();
        update_scores(&db, t.id, second.id).await.unwrap();

        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(series.values.len(), 2);
        assert_eq!(series.values[0], 0.0);
        // (0 + 1.0) / 2
        assert!((series.values[1] - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rerun_on_match_finished_before_team_joined() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;
        let ana = user(&db, "ana").await;

        let first = set_result(&db, &tasks, &t, 1, 2, 0).await.unwrap();
        update_scores(&db, t.id, first.id).await.unwrap();

        let team = db.create_team("Late", "", false, ana.id).await.unwrap();
        join_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();
        let report = update_scores(&db, t.id, first.id).await.unwrap();
        assert_eq!(report.teams_updated, 0);

        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(series.values, vec![0.0]);
    }
}
