use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;

use super::find_tournament;
use crate::activity::{ActivityEntity, Audience, NewActivity};
use crate::db::{Database, Match, NewMatch, Tournament, User};
use crate::error::AppError;
use crate::metrics;
use crate::scoring::Outcome;
use crate::seeds;
use crate::tasks::{Task, TaskQueue};
use crate::tournament::{
    group_by_phase, group_slots, knockout_slots, last_match_of_phase, parse_rule, rank_group,
    resolve_rule, third_place_groups, third_place_slots, KnockoutResult, Phase, Standing,
    ThirdPlaced, TournamentKind,
};

fn seed_date(s: &str) -> Result<NaiveDate, AppError> {
    seeds::parse_date(s).ok_or_else(|| AppError::bad_request(format!("invalid date {s}")))
}

fn seed_for(kind: TournamentKind) -> Result<&'static seeds::TournamentSeed, AppError> {
    seeds::seed(kind).ok_or_else(|| AppError::bad_request(format!("no seed data for {kind}")))
}

// ── Seeded tournaments ───────────────────────────────────────────────

/// Create a tournament from its seed: national teams, groups and the full
/// schedule. Group matches open for predictions immediately; knockout
/// matches wait for their rules to resolve.
pub async fn create_seeded(db: &Database, admin: &User, kind: TournamentKind) -> Result<Tournament, AppError> {
    let seed = seed_for(kind)?;
    if db.get_tournament_by_name(seed.name).await?.is_some() {
        return Err(AppError::conflict(format!("{} already exists", seed.name)));
    }

    let created = db
        .create_tournament(
            seed.name,
            seed.description,
            seed_date(seed.start_date)?,
            seed_date(seed.end_date)?,
            admin.id,
        )
        .await?;
    let tournament = db.set_tournament_kind(created.id, kind).await?;

    for group_seed in seed.groups {
        let group = db.create_group(tournament.id, group_seed.name).await?;
        let mut tteams: HashMap<&str, i64> = HashMap::new();
        for (position, team) in group_seed.teams.iter().enumerate() {
            let iso = seed.country_code(team).unwrap_or_default();
            let tteam = db.create_tteam(tournament.id, team, iso).await?;
            db.add_group_team(group.id, tteam.id, position as i64).await?;
            tteams.insert(*team, tteam.id);
        }

        for m in &group_seed.matches {
            db.create_match(&NewMatch {
                tournament_id: tournament.id,
                id_number: m.id_number,
                match_date: seed_date(m.date)?,
                team1_id: tteams.get(m.team1).copied(),
                team2_id: tteams.get(m.team2).copied(),
                location: m.location.to_string(),
                rule: String::new(),
                ready: true,
                group_id: Some(group.id),
            })
            .await?;
        }
    }

    for m in seed.knockout {
        db.create_match(&NewMatch {
            tournament_id: tournament.id,
            id_number: m.id_number,
            match_date: seed_date(m.date)?,
            team1_id: None,
            team2_id: None,
            location: m.location.to_string(),
            rule: m.rule(),
            ready: false,
            group_id: None,
        })
        .await?;
    }

    db.publish(
        NewActivity::new(
            "tournament",
            "created a tournament",
            ActivityEntity::user(admin.id, &admin.username),
        )
        .object(ActivityEntity::tournament(tournament.id, &tournament.name)),
        Audience::User(admin.id),
    )
    .await?;

    tracing::info!(tournament_id = tournament.id, kind = %kind, "Seeded tournament created");
    Ok(tournament)
}

pub async fn get_seeded(db: &Database, kind: TournamentKind) -> Result<Tournament, AppError> {
    let seed = seed_for(kind)?;
    db.get_tournament_by_name(seed.name)
        .await?
        .filter(|t| t.kind == kind)
        .ok_or(AppError::NotFound("Tournament"))
}

pub async fn create_world_cup(db: &Database, admin: &User) -> Result<Tournament, AppError> {
    create_seeded(db, admin, TournamentKind::WorldCup2014).await
}

pub async fn get_world_cup(db: &Database) -> Result<Tournament, AppError> {
    get_seeded(db, TournamentKind::WorldCup2014).await
}

// ── Results ──────────────────────────────────────────────────────────

/// Rebuild a group table from its finished matches.
async fn recompute_group(db: &Database, group_id: i64) -> Result<(), AppError> {
    let mut table: HashMap<i64, Standing> = db
        .group_standings(group_id)
        .await?
        .into_iter()
        .map(|row| (row.tteam_id, Standing::default()))
        .collect();

    for m in db.group_matches(group_id).await? {
        if !m.finished {
            continue;
        }
        let (Some(t1), Some(t2)) = (m.team1_id, m.team2_id) else {
            continue;
        };
        if let Some(s) = table.get_mut(&t1) {
            s.record(m.result1, m.result2);
        }
        if let Some(s) = table.get_mut(&t2) {
            s.record(m.result2, m.result1);
        }
    }

    for (tteam_id, standing) in &table {
        db.update_standing(group_id, *tteam_id, standing).await?;
    }
    Ok(())
}

async fn tteam_entity(db: &Database, tournament_id: i64, id: Option<i64>) -> Result<ActivityEntity, AppError> {
    let id = id.ok_or_else(|| AppError::bad_request("match teams are not set yet"))?;
    let tteam = db
        .get_tteam(tournament_id, id)
        .await?
        .ok_or(AppError::NotFound("Team"))?;
    Ok(ActivityEntity::new(tteam.id, "tteam", &tteam.name))
}

/// Set the final score of a match, then update the group table, resolve the
/// next phase when this match closes its phase, publish the result and queue
/// the score update. A bracket that cannot be resolved is reported after the
/// result is stored.
pub async fn set_result(
    db: &Database,
    tasks: &TaskQueue,
    tournament: &Tournament,
    id_number: i64,
    result1: i64,
    result2: i64,
) -> Result<Match, AppError> {
    if result1 < 0 || result2 < 0 {
        return Err(AppError::bad_request("results must not be negative"));
    }
    let m = db
        .get_match_by_number(tournament.id, id_number)
        .await?
        .ok_or(AppError::NotFound("Match"))?;
    let team1 = tteam_entity(db, tournament.id, m.team1_id).await?;
    let team2 = tteam_entity(db, tournament.id, m.team2_id).await?;

    db.update_match_result(m.id, result1, result2).await?;
    metrics::MATCH_RESULTS_TOTAL.inc();
    tracing::info!(tournament_id = tournament.id, id_number, result1, result2, "Result set");

    if let Some(group_id) = m.group_id {
        recompute_group(db, group_id).await?;
    }

    let phases = group_by_phase(&db.list_matches(tournament.id).await?, tournament.kind);
    let advanced = match last_match_of_phase(id_number, &phases) {
        Some(phase) => update_next_phase(db, tournament, phase).await,
        None => Ok(()),
    };

    db.publish(
        NewActivity::new(
            "match",
            Outcome::of(result1, result2).verb(result1, result2),
            ActivityEntity::tournament(tournament.id, &tournament.name),
        )
        .object(team1)
        .target(team2),
        Audience::Participants(tournament.id),
    )
    .await?;

    tasks.enqueue(Task::UpdateScores {
        tournament_id: tournament.id,
        match_id: m.id,
    });

    advanced?;
    db.get_match(m.id).await?.ok_or(AppError::NotFound("Match"))
}

/// Team assignments produced by a completed phase. After the first stage,
/// `third_tokens` lists the best-third slots the next phase asks for.
async fn phase_slots(
    db: &Database,
    tournament: &Tournament,
    phase: Phase,
    third_tokens: &[&str],
) -> Result<HashMap<String, i64>, AppError> {
    if phase == Phase::FirstStage {
        let mut slots = HashMap::new();
        let mut thirds = Vec::new();
        for group in db.list_groups(tournament.id).await? {
            let rows = db.group_standings(group.id).await?;
            let standings: Vec<Standing> = rows
                .iter()
                .map(|r| Standing {
                    points: r.points,
                    goals_for: r.goals_for,
                    goals_against: r.goals_against,
                })
                .collect();
            let order = rank_group(&standings);
            let ranked: Vec<i64> = order.iter().map(|&i| rows[i].tteam_id).collect();
            slots.extend(group_slots(&group.name, &ranked));
            if let Some(&i) = order.get(2) {
                thirds.push(ThirdPlaced {
                    group: group.name.clone(),
                    team_id: rows[i].tteam_id,
                    standing: standings[i],
                });
            }
        }
        if !third_tokens.is_empty() {
            slots.extend(third_place_slots(third_tokens, &thirds));
        }
        return Ok(slots);
    }

    let results: Vec<KnockoutResult> = db
        .phase_matches(tournament, phase)
        .await?
        .into_iter()
        .filter(|m| m.finished)
        .filter_map(|m| {
            Some(KnockoutResult {
                id_number: m.id_number,
                team1: m.team1_id?,
                team2: m.team2_id?,
                result1: m.result1,
                result2: m.result2,
            })
        })
        .collect();
    Ok(knockout_slots(phase, &results))
}

/// Fill the matches that follow `phase` with the teams it produced. Every
/// rule is resolved before any match is written, so a bad rule leaves the
/// next phase untouched.
pub async fn update_next_phase(db: &Database, tournament: &Tournament, phase: Phase) -> Result<(), AppError> {
    let targets = tournament.kind.targets(phase);
    if targets.is_empty() {
        return Ok(());
    }

    let mut pending: Vec<Match> = Vec::new();
    for target in targets {
        pending.extend(
            db.phase_matches(tournament, target)
                .await?
                .into_iter()
                .filter(|m| parse_rule(&m.rule).is_some()),
        );
    }

    let mut third_tokens: Vec<&str> = Vec::new();
    for (a, b) in pending.iter().filter_map(|m| parse_rule(&m.rule)) {
        for token in [a, b] {
            if third_place_groups(token).is_some() && !third_tokens.contains(&token) {
                third_tokens.push(token);
            }
        }
    }

    let slots = phase_slots(db, tournament, phase, &third_tokens).await?;
    let resolved = pending
        .iter()
        .map(|m| resolve_rule(&m.rule, &slots).map(|teams| teams.map(|t| (m.id, t))))
        .collect::<Result<Vec<_>, _>>()?;
    for (id, (team1, team2)) in resolved.into_iter().flatten() {
        db.set_match_teams(id, team1, team2).await?;
    }

    metrics::PHASES_ADVANCED_TOTAL.inc();
    tracing::info!(tournament_id = tournament.id, phase = %phase, "Next phase resolved");
    Ok(())
}

// ── Admin operations ─────────────────────────────────────────────────

/// Clear every result and put the bracket back in its initial state. Points
/// earned in the tournament are taken back so replayed matches score again.
pub async fn reset_tournament(db: &Database, tournament_id: i64) -> Result<(), AppError> {
    find_tournament(db, tournament_id).await?;
    db.clear_tournament_scores(tournament_id).await?;
    db.reset_standings(tournament_id).await?;
    db.reset_group_matches(tournament_id).await?;
    db.reset_knockout_matches(tournament_id).await?;
    tracing::info!(tournament_id, "Tournament reset");
    Ok(())
}

fn require_phase(tournament: &Tournament, phase: Phase) -> Result<(), AppError> {
    if tournament.kind.has_phase(phase) {
        Ok(())
    } else {
        Err(AppError::bad_request(format!("{} has no {phase}", tournament.name)))
    }
}

pub async fn activate_phase(db: &Database, tournament_id: i64, phase: Phase) -> Result<u64, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    require_phase(&tournament, phase)?;
    let count = db.activate_phase(&tournament, phase).await?;
    tracing::info!(tournament_id, phase = %phase, count, "Phase activated");
    Ok(count)
}

/// Give every ready, unfinished match of the phase a random score of 0 to 4
/// goals per side, in calendar order.
pub async fn simulate_phase(
    db: &Database,
    tasks: &TaskQueue,
    tournament: &Tournament,
    phase: Phase,
) -> Result<Vec<Match>, AppError> {
    require_phase(tournament, phase)?;
    let mut pending: Vec<Match> = db
        .phase_matches(tournament, phase)
        .await?
        .into_iter()
        .filter(|m| m.ready && !m.finished && m.team1_id.is_some() && m.team2_id.is_some())
        .collect();
    pending.sort_by_key(|m| (m.match_date, m.id_number));

    let scores: Vec<(i64, i64)> = {
        let mut rng = rand::thread_rng();
        pending
            .iter()
            .map(|_| (rng.gen_range(0..=4), rng.gen_range(0..=4)))
            .collect()
    };

    let mut simulated = Vec::with_capacity(pending.len());
    for (m, (r1, r2)) in pending.iter().zip(scores) {
        simulated.push(set_result(db, tasks, tournament, m.id_number, r1, r2).await?);
    }
    Ok(simulated)
}

/// Close a match for predictions.
pub async fn block_match(db: &Database, tournament_id: i64, id_number: i64) -> Result<Match, AppError> {
    let m = db
        .get_match_by_number(tournament_id, id_number)
        .await?
        .ok_or(AppError::NotFound("Match"))?;
    db.set_can_predict(m.id, false).await?;
    db.get_match(m.id).await?.ok_or(AppError::NotFound("Match"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;
    use crate::league::test_support::{site_admin, world_cup};
    use crate::league::{join_tournament, join_tournament_as_team, predict, update_scores};

    #[tokio::test]
    async fn test_world_cup_layout() {
        let db = test_db().await;
        let (admin, t) = world_cup(&db).await;
        assert_eq!(t.name, "2014 FIFA World Cup");
        assert_eq!(t.kind, TournamentKind::WorldCup2014);
        assert_eq!(db.list_matches(t.id).await.unwrap().len(), 64);
        assert_eq!(db.list_groups(t.id).await.unwrap().len(), 8);
        assert_eq!(db.list_tteams(t.id).await.unwrap().len(), 32);

        let opener = db.get_match_by_number(t.id, 1).await.unwrap().unwrap();
        assert!(opener.ready && opener.can_predict && opener.group_id.is_some());
        let r16 = db.get_match_by_number(t.id, 49).await.unwrap().unwrap();
        assert_eq!(r16.rule, "1A 2B");
        assert!(!r16.ready && r16.team1_id.is_none());

        assert!(matches!(
            create_world_cup(&db, &admin).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(get_world_cup(&db).await.unwrap().id, t.id);
    }

    #[tokio::test]
    async fn test_seeded_kinds_are_independent() {
        let db = test_db().await;
        let admin = site_admin(&db).await;
        let euro = create_seeded(&db, &admin, TournamentKind::Euro2016).await.unwrap();
        assert_eq!(euro.kind, TournamentKind::Euro2016);
        assert_eq!(db.list_matches(euro.id).await.unwrap().len(), 51);
        assert_eq!(db.list_groups(euro.id).await.unwrap().len(), 6);
        assert_eq!(db.list_tteams(euro.id).await.unwrap().len(), 24);
        let r16 = db.get_match_by_number(euro.id, 38).await.unwrap().unwrap();
        assert_eq!(r16.rule, "1B 3A/C/D");

        let russia = create_seeded(&db, &admin, TournamentKind::WorldCup2018).await.unwrap();
        assert_eq!(db.list_matches(russia.id).await.unwrap().len(), 64);
        assert!(matches!(get_world_cup(&db).await, Err(AppError::NotFound(_))));
        assert_eq!(get_seeded(&db, TournamentKind::Euro2016).await.unwrap().id, euro.id);
        assert!(matches!(
            create_seeded(&db, &admin, TournamentKind::Custom).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            create_seeded(&db, &admin, TournamentKind::Euro2016).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_set_result_updates_group_and_rejects_bad_input() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;

        let m = set_result(&db, &tasks, &t, 1, 3, 1).await.unwrap();
        assert!(m.finished && !m.can_predict);
        assert_eq!(tasks.depth(), 1);

        let group = db.get_match_by_number(t.id, 1).await.unwrap().unwrap().group_id.unwrap();
        let rows = db.group_standings(group).await.unwrap();
        let brazil = rows.iter().find(|r| r.name == "Brazil").unwrap();
        assert_eq!((brazil.points, brazil.goals_for, brazil.goals_against), (3, 3, 1));

        // setting the same result again does not count it twice
        set_result(&db, &tasks, &t, 1, 3, 1).await.unwrap();
        let rows = db.group_standings(group).await.unwrap();
        assert_eq!(rows.iter().find(|r| r.name == "Brazil").unwrap().points, 3);

        assert!(matches!(
            set_result(&db, &tasks, &t, 2, -1, 0).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            set_result(&db, &tasks, &t, 49, 1, 0).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            set_result(&db, &tasks, &t, 99, 1, 0).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_first_stage_fills_round_of_16() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;

        // team1 of every group match wins 1-0
        for m in db.phase_matches(&t, Phase::FirstStage).await.unwrap() {
            set_result(&db, &tasks, &t, m.id_number, 1, 0).await.unwrap();
        }

        for m in db.phase_matches(&t, Phase::RoundOf16).await.unwrap() {
            assert!(m.ready && m.can_predict, "match {} not opened", m.id_number);
            assert!(m.rule.is_empty());
            assert_ne!(m.team1_id, m.team2_id);
        }
        assert!(!db.get_match_by_number(t.id, 57).await.unwrap().unwrap().ready);
    }

    #[tokio::test]
    async fn test_euro_first_stage_places_best_thirds() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let admin = site_admin(&db).await;
        let t = create_seeded(&db, &admin, TournamentKind::Euro2016).await.unwrap();

        for m in db.phase_matches(&t, Phase::FirstStage).await.unwrap() {
            let goals = m.id_number % 3;
            set_result(&db, &tasks, &t, m.id_number, goals, 1).await.unwrap();
        }

        let mut group_of = HashMap::new();
        for group in db.list_groups(t.id).await.unwrap() {
            for row in db.group_standings(group.id).await.unwrap() {
                group_of.insert(row.tteam_id, group.name.clone());
            }
        }
        let mut seen = Vec::new();
        for (n, allowed) in [(38, "ACD"), (39, "BEF"), (40, "CDE"), (41, "ABF")] {
            let m = db.get_match_by_number(t.id, n).await.unwrap().unwrap();
            assert!(m.ready && m.rule.is_empty(), "match {n} not resolved");
            let third = m.team2_id.unwrap();
            assert!(allowed.contains(group_of[&third].as_str()), "match {n}");
            assert!(!seen.contains(&third));
            seen.push(third);
        }
    }
    #[tokio::test]
    async fn test_simulate_and_reset() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;

        let played = simulate_phase(&db, &tasks, &t, Phase::FirstStage).await.unwrap();
        assert_eq!(played.len(), 48);
        for phase in [Phase::RoundOf16, Phase::QuarterFinals, Phase::SemiFinals] {
            simulate_phase(&db, &tasks, &t, phase).await.unwrap();
        }
        let third = db.get_match_by_number(t.id, 63).await.unwrap().unwrap();
        let last = db.get_match_by_number(t.id, 64).await.unwrap().unwrap();
        assert!(third.ready && last.ready);
        assert!(simulate_phase(&db, &tasks, &t, Phase::Finals).await.unwrap().len() == 1);

        reset_tournament(&db, t.id).await.unwrap();
        assert_eq!(db.finished_match_count(t.id).await.unwrap(), 0);
        let opener = db.get_match_by_number(t.id, 1).await.unwrap().unwrap();
        assert!(!opener.finished && opener.can_predict);
        assert_eq!((opener.result1, opener.result2), (0, 0));
        let r16 = db.get_match_by_number(t.id, 49).await.unwrap().unwrap();
        assert_eq!(r16.rule, "1A 2B");
        assert!(r16.team1_id.is_none() && !r16.ready && !r16.can_predict);
        for group in db.list_groups(t.id).await.unwrap() {
            assert!(db
                .group_standings(group.id)
                .await
                .unwrap()
                .iter()
                .all(|r| r.points == 0 && r.goals_for == 0));
        }
    }

    #[tokio::test]
    async fn test_activate_and_block() {
        let db = test_db().await;
        let (_, t) = world_cup(&db).await;

        assert_eq!(activate_phase(&db, t.id, Phase::QuarterFinals).await.unwrap(), 4);
        assert!(db.get_match_by_number(t.id, 57).await.unwrap().unwrap().can_predict);

        assert!(matches!(
            activate_phase(&db, t.id, Phase::ThirdPlace).await,
            Ok(1)
        ));
        let admin = user(&db, "uefa").await;
        let euro = create_seeded(&db, &admin, TournamentKind::Euro2016).await.unwrap();
        assert!(matches!(
            activate_phase(&db, euro.id, Phase::ThirdPlace).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            simulate_phase(&db, &TaskQueue::new(), &euro, Phase::ThirdPlace).await,
            Err(AppError::BadRequest(_))
        ));

        let m = block_match(&db, t.id, 1).await.unwrap();
        assert!(!m.can_predict);
        assert!(matches!(block_match(&db, t.id, 99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reset_lets_replayed_matches_score_again() {
        let db = test_db().await;
        let tasks = TaskQueue::new();
        let (_, t) = world_cup(&db).await;
        let ana = user(&db, "ana").await;
        join_tournament(&db, &ana, t.id).await.unwrap();
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();
        join_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();

        predict(&db, &ana, &t, 1, 1, 0).await.unwrap();
        let m = set_result(&db, &tasks, &t, 1, 1, 0).await.unwrap();
        update_scores(&db, t.id, m.id).await.unwrap();
        assert_eq!(db.get_user(ana.id).await.unwrap().unwrap().score, 3);

        reset_tournament(&db, t.id).await.unwrap();
        assert_eq!(db.get_user(ana.id).await.unwrap().unwrap().score, 0);
        assert!(db.user_scores(ana.id).await.unwrap().is_empty());
        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert!(series.values.is_empty());

        predict(&db, &ana, &t, 1, 2, 2).await.unwrap();
        set_result(&db, &tasks, &t, 1, 2, 2).await.unwrap();
        let report = update_scores(&db, t.id, m.id).await.unwrap();
        assert_eq!(report.users_scored, 1);
        assert_eq!(report.teams_updated, 1);
        assert_eq!(db.get_user(ana.id).await.unwrap().unwrap().score, 3);
        let series = db.team_accuracy(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(series.values.len(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_rule_is_reported() {
        let db = test_db().await;
        let admin = user(&db, "admin").await;
        let t = db
            .create_tournament("Mini", "", date("2014-06-12"), date("2014-07-13"), admin.id)
            .await
            .unwrap();
        let a = db.create_tteam(t.id, "A", "").await.unwrap();
        let b = db.create_tteam(t.id, "B", "").await.unwrap();
        for (n, rule) in [(61, ""), (62, ""), (63, "L61 L62"), (64, "W61 W99")] {
            let scheduled = rule.is_empty();
            db.create_match(&NewMatch {
                tournament_id: t.id,
                id_number: n,
                match_date: date("2014-07-08"),
                team1_id: scheduled.then_some(a.id),
                team2_id: scheduled.then_some(b.id),
                location: String::new(),
                rule: rule.into(),
                ready: scheduled,
                group_id: None,
            })
            .await
            .unwrap();
        }
        let tasks = TaskQueue::new();
        set_result(&db, &tasks, &t, 61, 2, 0).await.unwrap();
        let err = set_result(&db, &tasks, &t, 62, 0, 1).await.unwrap_err();
        assert!(err.to_string().starts_with("cannot parse rule"));
        // the result itself was kept
        assert!(db.get_match_by_number(t.id, 62).await.unwrap().unwrap().finished);
        // the resolvable third place match was not filled either
        let third = db.get_match_by_number(t.id, 63).await.unwrap().unwrap();
        assert_eq!(third.rule, "L61 L62");
        assert!(!third.ready && third.team1_id.is_none());
    }
}
