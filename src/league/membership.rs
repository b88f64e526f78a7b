use chrono::NaiveDate;

use super::{find_team, find_tournament, find_user, require_team_admin, require_tournament_admin};
use crate::activity::{ActivityEntity, Audience, NewActivity};
use crate::db::{is_unique_violation, Database, Price, Team, TeamRequest, Tournament, User, UserRequest};
use crate::error::AppError;

fn user_entity(user: &User) -> ActivityEntity {
    ActivityEntity::user(user.id, &user.username)
}

fn non_empty(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required"));
    }
    Ok(name)
}

// ── Teams ────────────────────────────────────────────────────────────

pub async fn create_team(
    db: &Database,
    user: &User,
    name: &str,
    description: &str,
    private: bool,
) -> Result<Team, AppError> {
    let name = non_empty(name)?;
    let team = match db.create_team(name, description, private, user.id).await {
        Ok(team) => team,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::conflict(format!("team {name} already exists")))
        }
        Err(e) => return Err(e.into()),
    };

    db.publish(
        NewActivity::new("team", "created a new team", user_entity(user))
            .object(ActivityEntity::team(team.id, &team.name)),
        Audience::User(user.id),
    )
    .await?;
    tracing::info!(team_id = team.id, user_id = user.id, "Team created");
    Ok(team)
}

pub async fn update_team(
    db: &Database,
    user: &User,
    team_id: i64,
    name: &str,
    description: &str,
    private: bool,
) -> Result<Team, AppError> {
    require_team_admin(db, team_id, user).await?;
    let name = non_empty(name)?;
    match db.update_team(team_id, name, description, private).await {
        Ok(Some(team)) => Ok(team),
        Ok(None) => Err(AppError::NotFound("Team")),
        Err(e) if is_unique_violation(&e) => Err(AppError::conflict(format!("team {name} already exists"))),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_team(db: &Database, user: &User, team_id: i64) -> Result<(), AppError> {
    find_team(db, team_id).await?;
    require_team_admin(db, team_id, user).await?;
    db.delete_team(team_id).await?;
    tracing::info!(team_id, "Team deleted");
    Ok(())
}

/// Add a user to a team and to every tournament the team has joined.
async fn add_member(db: &Database, team: &Team, user: &User) -> Result<(), AppError> {
    if !db.add_team_member(team.id, user.id).await? {
        return Err(AppError::conflict("already a member of this team"));
    }
    for tournament in db.team_tournaments(team.id).await? {
        db.add_participant(tournament.id, user.id).await?;
    }
    db.publish(
        NewActivity::new("team", "joined team", user_entity(user))
            .object(ActivityEntity::team(team.id, &team.name)),
        Audience::TeamMembers(team.id),
    )
    .await?;
    Ok(())
}

/// Join a public team.
pub async fn join_team(db: &Database, user: &User, team_id: i64) -> Result<Team, AppError> {
    let team = find_team(db, team_id).await?;
    if team.private {
        return Err(AppError::forbidden("team is private, send a request instead"));
    }
    add_member(db, &team, user).await?;
    Ok(team)
}

pub async fn leave_team(db: &Database, user: &User, team_id: i64) -> Result<Team, AppError> {
    let team = find_team(db, team_id).await?;
    if !db.is_team_member(team.id, user.id).await? {
        return Err(AppError::bad_request("not a member of this team"));
    }
    if db.is_team_admin(team.id, user.id).await? && db.count_team_admins(team.id).await? <= 1 {
        return Err(AppError::bad_request("the last admin cannot leave the team"));
    }

    // published first so the leaving user still sees it
    db.publish(
        NewActivity::new("team", "left team", user_entity(user))
            .object(ActivityEntity::team(team.id, &team.name)),
        Audience::TeamMembers(team.id),
    )
    .await?;
    db.remove_team_member(team.id, user.id).await?;
    Ok(team)
}

// ── Team requests ────────────────────────────────────────────────────

/// A user asks to join a team.
pub async fn request_join(db: &Database, user: &User, team_id: i64) -> Result<TeamRequest, AppError> {
    let team = find_team(db, team_id).await?;
    if db.is_team_member(team.id, user.id).await? {
        return Err(AppError::conflict("already a member of this team"));
    }
    if db.has_team_request(team.id, user.id).await? {
        return Err(AppError::conflict("request already sent"));
    }
    Ok(db
        .create_team_request(team.id, &team.name, user.id, &user.username)
        .await?)
}

async fn find_team_request(db: &Database, admin: &User, request_id: i64) -> Result<TeamRequest, AppError> {
    let request = db
        .get_team_request(request_id)
        .await?
        .ok_or(AppError::NotFound("Team request"))?;
    require_team_admin(db, request.team_id, admin).await?;
    Ok(request)
}

pub async fn allow_team_request(db: &Database, admin: &User, request_id: i64) -> Result<TeamRequest, AppError> {
    let request = find_team_request(db, admin, request_id).await?;
    let team = find_team(db, request.team_id).await?;
    let user = find_user(db, request.user_id).await?;
    if !db.is_team_member(team.id, user.id).await? {
        add_member(db, &team, &user).await?;
    }
    db.delete_team_request(request.id).await?;
    Ok(request)
}

pub async fn deny_team_request(db: &Database, admin: &User, request_id: i64) -> Result<TeamRequest, AppError> {
    let request = find_team_request(db, admin, request_id).await?;
    db.delete_team_request(request.id).await?;
    Ok(request)
}

// ── Invitations ──────────────────────────────────────────────────────

/// A team admin invites a user into the team.
pub async fn invite_user(db: &Database, admin: &User, team_id: i64, user_id: i64) -> Result<UserRequest, AppError> {
    let team = find_team(db, team_id).await?;
    require_team_admin(db, team.id, admin).await?;
    let user = find_user(db, user_id).await?;
    if db.is_team_member(team.id, user.id).await? {
        return Err(AppError::conflict("user is already a member of this team"));
    }
    if db.get_user_request(team.id, user.id).await?.is_some() {
        return Err(AppError::conflict("user is already invited"));
    }

    let request = db.create_user_request(team.id, user.id).await?;
    let mut invitation = NewActivity::new("invitation", "has been invited to join team", user_entity(&user))
        .object(ActivityEntity::team(team.id, &team.name));
    invitation.creator_id = admin.id;
    db.publish(invitation, Audience::User(user.id)).await?;
    Ok(request)
}

pub async fn accept_invitation(db: &Database, user: &User, team_id: i64) -> Result<Team, AppError> {
    let team = find_team(db, team_id).await?;
    if db.get_user_request(team.id, user.id).await?.is_none() {
        return Err(AppError::NotFound("Invitation"));
    }
    if !db.is_team_member(team.id, user.id).await? {
        add_member(db, &team, user).await?;
    }
    db.delete_user_request(team.id, user.id).await?;
    Ok(team)
}

pub async fn decline_invitation(db: &Database, user: &User, team_id: i64) -> Result<(), AppError> {
    if !db.delete_user_request(team_id, user.id).await? {
        return Err(AppError::NotFound("Invitation"));
    }
    Ok(())
}

// ── Team admins and prices ───────────────────────────────────────────

pub async fn add_team_admin(db: &Database, admin: &User, team_id: i64, user_id: i64) -> Result<(), AppError> {
    find_team(db, team_id).await?;
    require_team_admin(db, team_id, admin).await?;
    if !db.is_team_member(team_id, user_id).await? {
        return Err(AppError::bad_request("only members can become admins"));
    }
    if !db.add_team_admin(team_id, user_id).await? {
        return Err(AppError::conflict("user is already an admin"));
    }
    Ok(())
}

pub async fn remove_team_admin(db: &Database, admin: &User, team_id: i64, user_id: i64) -> Result<(), AppError> {
    find_team(db, team_id).await?;
    require_team_admin(db, team_id, admin).await?;
    if !db.is_team_admin(team_id, user_id).await? {
        return Err(AppError::bad_request("user is not an admin"));
    }
    if db.count_team_admins(team_id).await? <= 1 {
        return Err(AppError::bad_request("a team needs at least one admin"));
    }
    db.remove_team_admin(team_id, user_id).await?;
    Ok(())
}

pub async fn update_price(
    db: &Database,
    admin: &User,
    team_id: i64,
    tournament_id: i64,
    description: &str,
) -> Result<Price, AppError> {
    require_team_admin(db, team_id, admin).await?;
    db.update_price(team_id, tournament_id, description)
        .await?
        .ok_or(AppError::NotFound("Price"))
}

// ── Tournaments ──────────────────────────────────────────────────────

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::bad_request("end date is before start date"));
    }
    Ok(())
}

pub async fn create_tournament(
    db: &Database,
    admin: &User,
    name: &str,
    description: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Tournament, AppError> {
    let name = non_empty(name)?;
    check_dates(start, end)?;
    let tournament = match db.create_tournament(name, description, start, end, admin.id).await {
        Ok(t) => t,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::conflict(format!("tournament {name} already exists")))
        }
        Err(e) => return Err(e.into()),
    };

    db.publish(
        NewActivity::new("tournament", "created a tournament", user_entity(admin))
            .object(ActivityEntity::tournament(tournament.id, &tournament.name)),
        Audience::User(admin.id),
    )
    .await?;
    tracing::info!(tournament_id = tournament.id, "Tournament created");
    Ok(tournament)
}

pub async fn update_tournament(
    db: &Database,
    admin: &User,
    tournament_id: i64,
    name: &str,
    description: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Tournament, AppError> {
    find_tournament(db, tournament_id).await?;
    require_tournament_admin(db, tournament_id, admin).await?;
    let name = non_empty(name)?;
    check_dates(start, end)?;
    match db
        .update_tournament(tournament_id, name, description, start, end)
        .await
    {
        Ok(Some(t)) => Ok(t),
        Ok(None) => Err(AppError::NotFound("Tournament")),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::conflict(format!("tournament {name} already exists")))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_tournament(db: &Database, admin: &User, tournament_id: i64) -> Result<(), AppError> {
    find_tournament(db, tournament_id).await?;
    require_tournament_admin(db, tournament_id, admin).await?;
    db.delete_tournament(tournament_id).await?;
    tracing::info!(tournament_id, "Tournament deleted");
    Ok(())
}

pub async fn join_tournament(db: &Database, user: &User, tournament_id: i64) -> Result<Tournament, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    if !db.add_participant(tournament.id, user.id).await? {
        return Err(AppError::conflict("already joined this tournament"));
    }
    db.publish(
        NewActivity::new("tournament", "joined tournament", user_entity(user))
            .object(ActivityEntity::tournament(tournament.id, &tournament.name)),
        Audience::User(user.id),
    )
    .await?;
    Ok(tournament)
}

pub async fn leave_tournament(db: &Database, user: &User, tournament_id: i64) -> Result<Tournament, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    if !db.remove_participant(tournament.id, user.id).await? {
        return Err(AppError::bad_request("not a participant of this tournament"));
    }
    db.publish(
        NewActivity::new("tournament", "left tournament", user_entity(user))
            .object(ActivityEntity::tournament(tournament.id, &tournament.name)),
        Audience::User(user.id),
    )
    .await?;
    Ok(tournament)
}

/// Enter a team in a tournament. Its members become participants, and the
/// team gets a price and an accuracy series padded for matches already
/// played.
pub async fn join_tournament_as_team(
    db: &Database,
    admin: &User,
    tournament_id: i64,
    team_id: i64,
) -> Result<Team, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    let team = find_team(db, team_id).await?;
    require_team_admin(db, team.id, admin).await?;
    if !db.add_tournament_team(tournament.id, team.id).await? {
        return Err(AppError::conflict("team already joined this tournament"));
    }

    for member in db.team_members(team.id).await? {
        db.add_participant(tournament.id, member.id).await?;
    }
    db.create_price(team.id, tournament.id, &tournament.name, "")
        .await?;
    let finished = db.finished_match_ids(tournament.id).await?;
    db.ensure_accuracy(team.id, tournament.id, &finished).await?;

    let mut joined = NewActivity::new(
        "tournament",
        "joined tournament",
        ActivityEntity::team(team.id, &team.name),
    )
    .object(ActivityEntity::tournament(tournament.id, &tournament.name));
    joined.creator_id = admin.id;
    db.publish(joined, Audience::TeamMembers(team.id)).await?;

    tracing::info!(tournament_id, team_id, "Team joined tournament");
    Ok(team)
}

/// Withdraw a team. Its members stay participants.
pub async fn leave_tournament_as_team(
    db: &Database,
    admin: &User,
    tournament_id: i64,
    team_id: i64,
) -> Result<Team, AppError> {
    let tournament = find_tournament(db, tournament_id).await?;
    let team = find_team(db, team_id).await?;
    require_team_admin(db, team.id, admin).await?;
    if !db.remove_tournament_team(tournament.id, team.id).await? {
        return Err(AppError::bad_request("team has not joined this tournament"));
    }
    db.delete_price(team.id, tournament.id).await?;

    let mut left = NewActivity::new(
        "tournament",
        "left tournament",
        ActivityEntity::team(team.id, &team.name),
    )
    .object(ActivityEntity::tournament(tournament.id, &tournament.name));
    left.creator_id = admin.id;
    db.publish(left, Audience::TeamMembers(team.id)).await?;
    Ok(team)
}

pub async fn add_tournament_admin(
    db: &Database,
    admin: &User,
    tournament_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    find_tournament(db, tournament_id).await?;
    require_tournament_admin(db, tournament_id, admin).await?;
    find_user(db, user_id).await?;
    if !db.add_tournament_admin(tournament_id, user_id).await? {
        return Err(AppError::conflict("user is already an admin"));
    }
    Ok(())
}

pub async fn remove_tournament_admin(
    db: &Database,
    admin: &User,
    tournament_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    find_tournament(db, tournament_id).await?;
    require_tournament_admin(db, tournament_id, admin).await?;
    if !db.is_tournament_admin(tournament_id, user_id).await? {
        return Err(AppError::bad_request("user is not an admin"));
    }
    if db.count_tournament_admins(tournament_id).await? <= 1 {
        return Err(AppError::bad_request("a tournament needs at least one admin"));
    }
    db.remove_tournament_admin(tournament_id, user_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;
    use crate::league::test_support::site_admin;

    #[tokio::test]
    async fn test_create_team_conflict() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let team = create_team(&db, &ana, "Reds", "", false).await.unwrap();
        assert!(db.is_team_admin(team.id, ana.id).await.unwrap());

        let err = create_team(&db, &ana, " reds ", "", false).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(matches!(
            create_team(&db, &ana, "  ", "", false).await,
            Err(AppError::BadRequest(_))
        ));

        let feed = db.feed_page(ana.id, 10, 1).await.unwrap();
        assert_eq!(feed[0].verb, "created a new team");
    }

    #[tokio::test]
    async fn test_join_and_leave_team() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let team = create_team(&db, &ana, "Reds", "", false).await.unwrap();

        join_team(&db, &bob, team.id).await.unwrap();
        assert!(matches!(join_team(&db, &bob, team.id).await, Err(AppError::Conflict(_))));
        let feed = db.feed_page(ana.id, 1, 1).await.unwrap();
        assert_eq!(feed[0].verb, "joined team");
        assert_eq!(feed[0].actor.display_name, "bob");

        let err = leave_team(&db, &ana, team.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        leave_team(&db, &bob, team.id).await.unwrap();
        assert!(!db.is_team_member(team.id, bob.id).await.unwrap());
        assert!(matches!(leave_team(&db, &bob, team.id).await, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_private_team_needs_request() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let team = create_team(&db, &ana, "Secret", "", true).await.unwrap();

        assert!(matches!(join_team(&db, &bob, team.id).await, Err(AppError::Forbidden(_))));

        let request = request_join(&db, &bob, team.id).await.unwrap();
        assert!(matches!(request_join(&db, &bob, team.id).await, Err(AppError::Conflict(_))));
        assert!(matches!(
            allow_team_request(&db, &bob, request.id).await,
            Err(AppError::Forbidden(_))
        ));

        allow_team_request(&db, &ana, request.id).await.unwrap();
        assert!(db.is_team_member(team.id, bob.id).await.unwrap());
        assert!(db.team_requests(team.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invitation_flow() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let carl = user(&db, "carl").await;
        let team = create_team(&db, &ana, "Reds", "", true).await.unwrap();

        invite_user(&db, &ana, team.id, bob.id).await.unwrap();
        assert!(matches!(
            invite_user(&db, &ana, team.id, bob.id).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            invite_user(&db, &carl, team.id, bob.id).await,
            Err(AppError::Forbidden(_))
        ));

        let feed = db.feed_page(bob.id, 1, 1).await.unwrap();
        assert_eq!(feed[0].verb, "has been invited to join team");
        assert_eq!(feed[0].creator_id, ana.id);

        accept_invitation(&db, &bob, team.id).await.unwrap();
        assert!(db.is_team_member(team.id, bob.id).await.unwrap());
        assert!(matches!(
            accept_invitation(&db, &bob, team.id).await,
            Err(AppError::NotFound(_))
        ));

        invite_user(&db, &ana, team.id, carl.id).await.unwrap();
        decline_invitation(&db, &carl, team.id).await.unwrap();
        assert!(!db.is_team_member(team.id, carl.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_team_admins() {
        let db = test_db().await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let team = create_team(&db, &ana, "Reds", "", false).await.unwrap();

        assert!(matches!(
            add_team_admin(&db, &ana, team.id, bob.id).await,
            Err(AppError::BadRequest(_))
        ));
        join_team(&db, &bob, team.id).await.unwrap();
        add_team_admin(&db, &ana, team.id, bob.id).await.unwrap();
        remove_team_admin(&db, &bob, team.id, ana.id).await.unwrap();
        assert!(matches!(
            remove_team_admin(&db, &bob, team.id, bob.id).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_tournament_join_leave() {
        let db = test_db().await;
        let root = site_admin(&db).await;
        let ana = user(&db, "ana").await;
        let t = create_tournament(&db, &root, "Cup", "", date("2024-01-01"), date("2024-02-01"))
            .await
            .unwrap();
        assert!(matches!(
            create_tournament(&db, &root, "cup", "", date("2024-01-01"), date("2024-02-01")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            create_tournament(&db, &root, "Late", "", date("2024-02-01"), date("2024-01-01")).await,
            Err(AppError::BadRequest(_))
        ));

        join_tournament(&db, &ana, t.id).await.unwrap();
        assert!(matches!(join_tournament(&db, &ana, t.id).await, Err(AppError::Conflict(_))));
        leave_tournament(&db, &ana, t.id).await.unwrap();
        assert!(!db.is_participant(t.id, ana.id).await.unwrap());

        let verbs: Vec<String> = db
            .feed_page(ana.id, 10, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.verb)
            .collect();
        assert_eq!(verbs, vec!["left tournament", "joined tournament"]);

        assert!(matches!(
            update_tournament(&db, &ana, t.id, "Mine", "", t.start_date, t.end_date).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_team_in_tournament() {
        let db = test_db().await;
        let root = site_admin(&db).await;
        let ana = user(&db, "ana").await;
        let bob = user(&db, "bob").await;
        let t = create_tournament(&db, &root, "Cup", "", date("2024-01-01"), date("2024-02-01"))
            .await
            .unwrap();
        let team = create_team(&db, &ana, "Reds", "", false).await.unwrap();

        assert!(matches!(
            join_tournament_as_team(&db, &bob, t.id, team.id).await,
            Err(AppError::Forbidden(_))
        ));
        join_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();
        assert!(matches!(
            join_tournament_as_team(&db, &ana, t.id, team.id).await,
            Err(AppError::Conflict(_))
        ));
        assert!(db.is_participant(t.id, ana.id).await.unwrap());
        let price = db.get_price(team.id, t.id).await.unwrap().unwrap();
        assert_eq!(price.tournament_name, "Cup");
        assert_eq!(price.description, "");

        // joining the team later makes bob a participant too
        join_team(&db, &bob, team.id).await.unwrap();
        assert!(db.is_participant(t.id, bob.id).await.unwrap());

        leave_tournament_as_team(&db, &ana, t.id, team.id).await.unwrap();
        assert!(db.get_price(team.id, t.id).await.unwrap().is_none());
        assert!(db.is_participant(t.id, bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_tournament_admins() {
        let db = test_db().await;
        let root = site_admin(&db).await;
        let ana = user(&db, "ana").await;
        let t = create_tournament(&db, &root, "Cup", "", date("2024-01-01"), date("2024-02-01"))
            .await
            .unwrap();

        add_tournament_admin(&db, &root, t.id, ana.id).await.unwrap();
        remove_tournament_admin(&db, &ana, t.id, root.id).await.unwrap();
        assert!(matches!(
            remove_tournament_admin(&db, &ana, t.id, ana.id).await,
            Err(AppError::BadRequest(_))
        ));
        update_tournament(&db, &ana, t.id, "Cup 2", "", t.start_date, t.end_date)
            .await
            .unwrap();
    }
}
