// Activity feed: entities taking part in an activity, who receives it, and
// feed pagination.

use serde::{Deserialize, Serialize};

/// One side of an activity (actor, object or target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub display_name: String,
}

impl ActivityEntity {
    pub fn new(id: i64, kind: &str, display_name: &str) -> Self {
        Self {
            id,
            kind: kind.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn user(id: i64, name: &str) -> Self {
        Self::new(id, "user", name)
    }

    pub fn team(id: i64, name: &str) -> Self {
        Self::new(id, "team", name)
    }

    pub fn tournament(id: i64, name: &str) -> Self {
        Self::new(id, "tournament", name)
    }
}

/// An activity about to be published.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub kind: &'static str,
    pub verb: String,
    pub actor: ActivityEntity,
    pub object: Option<ActivityEntity>,
    pub target: Option<ActivityEntity>,
    pub creator_id: i64,
}

impl NewActivity {
    pub fn new(kind: &'static str, verb: impl Into<String>, actor: ActivityEntity) -> Self {
        let creator_id = actor.id;
        Self {
            kind,
            verb: verb.into(),
            actor,
            object: None,
            target: None,
            creator_id,
        }
    }

    pub fn object(mut self, object: ActivityEntity) -> Self {
        self.object = Some(object);
        self
    }

    pub fn target(mut self, target: ActivityEntity) -> Self {
        self.target = Some(target);
        self
    }
}

/// Whose feeds receive a published activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Only the acting user.
    User(i64),
    /// Every member of a team.
    TeamMembers(i64),
    /// Every participant of a tournament.
    Participants(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_activity_builder() {
        let a = NewActivity::new("team", "joined team", ActivityEntity::user(4, "ana"))
            .object(ActivityEntity::team(9, "Reds"));
        assert_eq!(a.creator_id, 4);
        assert_eq!(a.object.as_ref().map(|o| o.kind.as_str()), Some("team"));
        assert!(a.target.is_none());
    }

    #[test]
    fn test_entity_serializes_type_field() {
        let json = serde_json::to_value(ActivityEntity::tournament(1, "Cup")).unwrap();
        assert_eq!(json["type"], "tournament");
        assert_eq!(json["display_name"], "Cup");
    }
}
