use sqlx::Row;

use super::{Activity, Database};
use crate::activity::{ActivityEntity, Audience, NewActivity};
use crate::scoring::page_window;

const ACTIVITY_COLUMNS: &str = "id, kind, verb, actor_id, actor_type, actor_name, \
     object_id, object_type, object_name, target_id, target_type, target_name, \
     published, creator_id";

fn entity(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> Result<Option<ActivityEntity>, sqlx::Error> {
    let id: Option<i64> = row.try_get(format!("{prefix}_id").as_str())?;
    let kind: Option<String> = row.try_get(format!("{prefix}_type").as_str())?;
    let name: Option<String> = row.try_get(format!("{prefix}_name").as_str())?;
    Ok(match (id, kind, name) {
        (Some(id), Some(kind), Some(name)) => Some(ActivityEntity {
            id,
            kind,
            display_name: name,
        }),
        _ => None,
    })
}

fn activity_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Activity, sqlx::Error> {
    let actor = entity(row, "actor")?.ok_or_else(|| sqlx::Error::ColumnNotFound("actor_id".into()))?;
    Ok(Activity {
        id: row.try_get("id")?,
        kind: row.try_get("kind")?,
        verb: row.try_get("verb")?,
        actor,
        object: entity(row, "object")?,
        target: entity(row, "target")?,
        published: row.try_get("published")?,
        creator_id: row.try_get("creator_id")?,
    })
}

impl Database {
    // ── Activity feed ─────────────────────────────────────────────────

    /// Save an activity and append it to the feed of everyone in `audience`.
    pub async fn publish(&self, activity: NewActivity, audience: Audience) -> Result<Activity, sqlx::Error> {
        let object = activity.object.as_ref();
        let target = activity.target.as_ref();
        let row = sqlx::query(&format!(
            "INSERT INTO activities (kind, verb, actor_id, actor_type, actor_name, \
                                 object_id, object_type, object_name, \
                                 target_id, target_type, target_name, creator_id) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(activity.kind)
        .bind(&activity.verb)
        .bind(activity.actor.id)
        .bind(&activity.actor.kind)
        .bind(&activity.actor.display_name)
        .bind(object.map(|o| o.id))
        .bind(object.map(|o| o.kind.as_str()))
        .bind(object.map(|o| o.display_name.as_str()))
        .bind(target.map(|t| t.id))
        .bind(target.map(|t| t.kind.as_str()))
        .bind(target.map(|t| t.display_name.as_str()))
        .bind(activity.creator_id)
        .fetch_one(&self.pool)
        .await?;
        let saved = activity_from_row(&row)?;

        let recipients: Vec<i64> = match audience {
            Audience::User(id) => vec![id],
            Audience::TeamMembers(team_id) => {
                sqlx::query_scalar("SELECT user_id FROM team_members WHERE team_id = ? ORDER BY user_id")
                    .bind(team_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            Audience::Participants(tournament_id) => {
                sqlx::query_scalar(
                    "SELECT user_id FROM tournament_participants WHERE tournament_id = ? ORDER BY user_id",
                )
                .bind(tournament_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        for user_id in recipients {
            sqlx::query("INSERT OR IGNORE INTO activity_feed (user_id, activity_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(saved.id)
                .execute(&self.pool)
                .await?;
        }
        Ok(saved)
    }

    pub async fn feed_size(&self, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_feed WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    /// One page of a user's feed, newest first.
    pub async fn feed_page(&self, user_id: i64, count: i64, page: i64) -> Result<Vec<Activity>, sqlx::Error> {
        let size = self.feed_size(user_id).await?;
        let Some((start, end)) = page_window(size, count, page) else {
            return Ok(Vec::new());
        };
        // feed positions are 0-based in insertion order
        let rows = sqlx::query(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             JOIN (SELECT activity_id, id AS feed_id FROM activity_feed WHERE user_id = ?) f \
               ON f.activity_id = activities.id \
             ORDER BY f.feed_id DESC LIMIT ? OFFSET ?"
        ))
        .bind(user_id)
        .bind(start - end + 1)
        .bind(size - 1 - start)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(activity_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::activity::{ActivityEntity, Audience, NewActivity};
    use crate::db::test_support::*;

    #[tokio::test]
    async fn test_publish_to_team_members() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let eve = user(&db, "eve").await;
        let team = db.create_team("Reds", "", false, ana.id).await.unwrap();
        db.add_team_member(team.id, bob.id).await.unwrap();

        let a = db
            .publish(
                NewActivity::new("team", "joined team", ActivityEntity::user(bob.id, "bob"))
                    .object(ActivityEntity::team(team.id, "Reds")),
                Audience::TeamMembers(team.id),
            )
            .await
            .unwrap();
        assert_eq!(a.verb, "joined team");
        assert_eq!(a.object.as_ref().unwrap().display_name, "Reds");
        assert!(a.target.is_none());

        assert_eq!(db.feed_size(ana.id).await.unwrap(), 1);
        assert_eq!(db.feed_size(bob.id).await.unwrap(), 1);
        assert_eq!(db.feed_size(eve.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_feed_pages_newest_first() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        for i in 0..7 {
            db.publish(
                NewActivity::new("user", format!("did {i}"), ActivityEntity::user(ana.id, "ana")),
                Audience::User(ana.id),
            )
            .await
            .unwrap();
        }

        let first = db.feed_page(ana.id, 5, 1).await.unwrap();
        let verbs: Vec<&str> = first.iter().map(|a| a.verb.as_str()).collect();
        assert_eq!(verbs, vec!["did 6", "did 5", "did 4", "did 3", "did 2"]);

        let second = db.feed_page(ana.id, 5, 2).await.unwrap();
        let verbs: Vec<&str> = second.iter().map(|a| a.verb.as_str()).collect();
        assert_eq!(verbs, vec!["did 1", "did 0"]);

        assert!(db.feed_page(ana.id, 5, 3).await.unwrap().is_empty());
    }
}
