// Database access layer (SQLite via sqlx).

mod activities;
mod matches;
mod outbox;
mod requests;
mod search;
mod teams;
mod tournaments;
mod users;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::tournament::TournamentKind;

pub use matches::NewMatch;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub score: i64,
    #[serde(skip_serializing)]
    pub auth_key: String,
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub keyname: String,
    pub description: String,
    pub private: bool,
    pub accuracy: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub keyname: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: TournamentKind,
    pub created_at: String,
}

/// A national team playing inside a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TTeam {
    pub id: i64,
    pub tournament_id: i64,
    pub name: String,
    pub iso: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub tournament_id: i64,
    pub name: String,
}

/// One team's line in a group table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupStanding {
    pub group_id: i64,
    pub tteam_id: i64,
    pub position: i64,
    pub name: String,
    pub iso: String,
    pub points: i64,
    pub goals_for: i64,
    pub goals_against: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Match {
    pub id: i64,
    pub tournament_id: i64,
    pub id_number: i64,
    pub match_date: NaiveDate,
    pub team1_id: Option<i64>,
    pub team2_id: Option<i64>,
    pub location: String,
    pub rule: String,
    pub result1: i64,
    pub result2: i64,
    pub finished: bool,
    pub ready: bool,
    pub can_predict: bool,
    pub group_id: Option<i64>,
}

impl crate::tournament::Scheduled for Match {
    fn id_number(&self) -> i64 {
        self.id_number
    }

    fn date(&self) -> NaiveDate {
        self.match_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Predict {
    pub id: i64,
    pub user_id: i64,
    pub match_id: i64,
    pub result1: i64,
    pub result2: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Points a user earned on one match of a tournament.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScoreEntry {
    pub id: i64,
    pub user_id: i64,
    pub tournament_id: i64,
    pub match_id: i64,
    pub points: i64,
    pub created_at: String,
}

/// A user's total within one tournament, for rankings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserScore {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub score: i64,
}

/// A team's latest accuracy within one tournament, for rankings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamAccuracy {
    pub id: i64,
    pub name: String,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracySeries {
    pub id: i64,
    pub team_id: i64,
    pub tournament_id: i64,
    pub tournament_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Price {
    pub id: i64,
    pub team_id: i64,
    pub tournament_id: i64,
    pub tournament_name: String,
    pub description: String,
    pub created_at: String,
}

/// A user asking to join a team.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamRequest {
    pub id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub user_id: i64,
    pub user_name: String,
    pub created_at: String,
}

/// A team inviting a user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRequest {
    pub id: i64,
    pub team_id: i64,
    pub user_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub verb: String,
    pub actor: crate::activity::ActivityEntity,
    pub object: Option<crate::activity::ActivityEntity>,
    pub target: Option<crate::activity::ActivityEntity>,
    pub published: String,
    pub creator_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OutboxMessage {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub created_at: String,
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL DEFAULT '',
        keyname TEXT NOT NULL DEFAULT '',
        password_hash TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        score INTEGER NOT NULL DEFAULT 0,
        auth_key TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        keyname TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        private INTEGER NOT NULL DEFAULT 0,
        accuracy REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_members (
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (team_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_admins (
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (team_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tournaments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        keyname TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT '',
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        kind TEXT NOT NULL DEFAULT 'custom',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tournament_admins (
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (tournament_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tournament_participants (
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        PRIMARY KEY (tournament_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tournament_teams (
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        PRIMARY KEY (tournament_id, team_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tteams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        iso TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tgroups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tgroup_teams (
        group_id INTEGER NOT NULL REFERENCES tgroups(id) ON DELETE CASCADE,
        tteam_id INTEGER NOT NULL REFERENCES tteams(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        points INTEGER NOT NULL DEFAULT 0,
        goals_for INTEGER NOT NULL DEFAULT 0,
        goals_against INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (group_id, tteam_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tmatches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        id_number INTEGER NOT NULL,
        match_date TEXT NOT NULL,
        team1_id INTEGER REFERENCES tteams(id),
        team2_id INTEGER REFERENCES tteams(id),
        location TEXT NOT NULL DEFAULT '',
        rule TEXT NOT NULL DEFAULT '',
        seed_rule TEXT NOT NULL DEFAULT '',
        result1 INTEGER NOT NULL DEFAULT 0,
        result2 INTEGER NOT NULL DEFAULT 0,
        finished INTEGER NOT NULL DEFAULT 0,
        ready INTEGER NOT NULL DEFAULT 0,
        can_predict INTEGER NOT NULL DEFAULT 0,
        group_id INTEGER REFERENCES tgroups(id) ON DELETE SET NULL,
        UNIQUE(tournament_id, id_number)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS predicts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        match_id INTEGER NOT NULL REFERENCES tmatches(id) ON DELETE CASCADE,
        result1 INTEGER NOT NULL,
        result2 INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, match_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS score_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        match_id INTEGER NOT NULL REFERENCES tmatches(id) ON DELETE CASCADE,
        points INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(user_id, match_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accuracies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        UNIQUE(team_id, tournament_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accuracy_values (
        accuracy_id INTEGER NOT NULL REFERENCES accuracies(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        match_id INTEGER,
        value REAL NOT NULL,
        PRIMARY KEY (accuracy_id, position)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
        tournament_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(team_id, tournament_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS team_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        team_name TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        user_name TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(team_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(team_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        verb TEXT NOT NULL,
        actor_id INTEGER NOT NULL,
        actor_type TEXT NOT NULL,
        actor_name TEXT NOT NULL,
        object_id INTEGER,
        object_type TEXT,
        object_name TEXT,
        target_id INTEGER,
        target_type TEXT,
        target_name TEXT,
        published TEXT NOT NULL DEFAULT (datetime('now')),
        creator_id INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS activity_feed (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        activity_id INTEGER NOT NULL REFERENCES activities(id) ON DELETE CASCADE,
        UNIQUE(user_id, activity_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS search_words (
        kind TEXT NOT NULL,
        word TEXT NOT NULL,
        entity_id INTEGER NOT NULL,
        PRIMARY KEY (kind, word, entity_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS outbox (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender TEXT NOT NULL,
        recipient TEXT NOT NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
];

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        // every in-memory connection would otherwise see its own empty database
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    pub async fn user(db: &Database, username: &str) -> User {
        db.create_user(
            username,
            &format!("{username}@example.com"),
            Some("hash"),
            username,
            "user",
            "key",
        )
        .await
        .unwrap()
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }
}
