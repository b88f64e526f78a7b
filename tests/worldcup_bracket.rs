// Seeded tournaments played end to end through the library: every phase
// simulated in order, the bracket filling itself, then a full reset.

use gonawin_backend::db::{Database, Match, Tournament, User};
use gonawin_backend::league;
use gonawin_backend::tasks::{Task, TaskQueue};
use gonawin_backend::tournament::{Phase, TournamentKind};

async fn setup() -> (Database, User) {
    let db = Database::new("sqlite::memory:").await.unwrap();
    let admin = db
        .create_user("root", "root@example.com", None, "Root", "admin", "key")
        .await
        .unwrap();
    (db, admin)
}

/// Simulate every phase in calendar order, checking that each one opens the
/// matches it feeds, then run the queued score updates.
async fn play_through(db: &Database, tasks: &TaskQueue, t: &Tournament) {
    for phase in t.kind.phases() {
        let played = league::simulate_phase(db, tasks, t, phase).await.unwrap();
        let (low, high) = t.kind.interval(phase).unwrap();
        assert_eq!(played.len() as i64, high - low + 1, "{phase}");
        assert!(played.iter().all(|m| m.finished));

        for target in t.kind.targets(phase) {
            for m in db.phase_matches(t, target).await.unwrap() {
                assert!(m.ready && m.can_predict, "match {} not opened", m.id_number);
                assert!(m.rule.is_empty());
                assert!(m.team1_id.is_some() && m.team2_id.is_some());
            }
        }
    }

    // one score update per match
    while let Some(task) = tasks.dequeue() {
        let Task::UpdateScores { tournament_id, match_id } = task else {
            panic!("unexpected task");
        };
        league::update_scores(db, tournament_id, match_id).await.unwrap();
    }
}

fn winner(m: &Match) -> i64 {
    if m.result1 >= m.result2 {
        m.team1_id.unwrap()
    } else {
        m.team2_id.unwrap()
    }
}

#[tokio::test]
async fn test_full_tournament_simulation() {
    let (db, admin) = setup().await;
    let tasks = TaskQueue::new();
    let t = league::create_world_cup(&db, &admin).await.unwrap();

    play_through(&db, &tasks, &t).await;
    assert_eq!(db.finished_match_count(t.id).await.unwrap(), 64);
    assert_eq!(tasks.depth(), 0);

    // the final is played by the semi-final winners
    let semis: Vec<_> = db.phase_matches(&t, Phase::SemiFinals).await.unwrap();
    let winners: Vec<i64> = semis.iter().map(winner).collect();
    let final_match = db.get_match_by_number(t.id, 64).await.unwrap().unwrap();
    assert_eq!(final_match.team1_id, Some(winners[0]));
    assert_eq!(final_match.team2_id, Some(winners[1]));

    league::reset_tournament(&db, t.id).await.unwrap();
    assert_eq!(db.finished_match_count(t.id).await.unwrap(), 0);
    let r16 = db.get_match_by_number(t.id, 49).await.unwrap().unwrap();
    assert_eq!(r16.rule, "1A 2B");
    assert!(r16.team1_id.is_none() && !r16.ready && !r16.can_predict);
    let opener = db.get_match_by_number(t.id, 1).await.unwrap().unwrap();
    assert!(opener.ready && opener.can_predict && opener.team1_id.is_some());
    for group in db.list_groups(t.id).await.unwrap() {
        for row in db.group_standings(group.id).await.unwrap() {
            assert_eq!((row.points, row.goals_for, row.goals_against), (0, 0, 0));
        }
    }

    // the reset bracket plays through again
    play_through(&db, &tasks, &t).await;
    assert_eq!(db.finished_match_count(t.id).await.unwrap(), 64);
}

#[tokio::test]
async fn test_euro_simulation_without_third_place_match() {
    let (db, admin) = setup().await;
    let tasks = TaskQueue::new();
    let t = league::create_seeded(&db, &admin, TournamentKind::Euro2016).await.unwrap();
    assert!(!t.kind.phases().any(|p| p == Phase::ThirdPlace));

    play_through(&db, &tasks, &t).await;
    assert_eq!(db.finished_match_count(t.id).await.unwrap(), 51);

    // sixteen different teams reached the round of 16
    let mut qualified: Vec<i64> = db
        .phase_matches(&t, Phase::RoundOf16)
        .await
        .unwrap()
        .iter()
        .flat_map(|m| [m.team1_id.unwrap(), m.team2_id.unwrap()])
        .collect();
    qualified.sort();
    qualified.dedup();
    assert_eq!(qualified.len(), 16);

    let semis = db.phase_matches(&t, Phase::SemiFinals).await.unwrap();
    let final_match = db.get_match_by_number(t.id, 51).await.unwrap().unwrap();
    assert_eq!(final_match.team1_id, Some(winner(&semis[0])));
    assert_eq!(final_match.team2_id, Some(winner(&semis[1])));
}

#[tokio::test]
async fn test_world_cup_2018_simulation() {
    let (db, admin) = setup().await;
    let tasks = TaskQueue::new();
    let t = league::create_seeded(&db, &admin, TournamentKind::WorldCup2018).await.unwrap();
    play_through(&db, &tasks, &t).await;
    assert_eq!(db.finished_match_count(t.id).await.unwrap(), 64);
    let third = db.get_match_by_number(t.id, 63).await.unwrap().unwrap();
    assert!(third.finished && third.team1_id.is_some());
}

#[tokio::test]
async fn test_group_winner_reaches_round_of_16() {
    let (db, admin) = setup().await;
    let tasks = TaskQueue::new();
    let t = league::create_world_cup(&db, &admin).await.unwrap();

    // the first listed team of every group wins all its games 1-0
    let groups = db.list_groups(t.id).await.unwrap();
    let group_a = &groups[0];
    let favourite = db.group_standings(group_a.id).await.unwrap()[0].tteam_id;

    let mut first_stage = db.phase_matches(&t, Phase::FirstStage).await.unwrap();
    first_stage.sort_by_key(|m| (m.match_date, m.id_number));
    for m in &first_stage {
        let (r1, r2) = if m.team1_id == Some(favourite) {
            (1, 0)
        } else if m.team2_id == Some(favourite) {
            (0, 1)
        } else {
            (0, 0)
        };
        league::set_result(&db, &tasks, &t, m.id_number, r1, r2).await.unwrap();
    }

    // match 49 is "1A 2B"
    let m49 = db.get_match_by_number(t.id, 49).await.unwrap().unwrap();
    assert_eq!(m49.team1_id, Some(favourite));
    assert!(m49.ready);

    let standings = db.group_standings(group_a.id).await.unwrap();
    let fav_row = standings.iter().find(|r| r.tteam_id == favourite).unwrap();
    assert_eq!(fav_row.points, 9);
    assert_eq!((fav_row.goals_for, fav_row.goals_against), (3, 0));
}
