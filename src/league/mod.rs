// Domain operations spanning several tables: bracket progression, scoring
// and membership. Each publishes the matching activity.

mod bracket;
mod membership;
mod scores;

pub use bracket::*;
pub use membership::*;
pub use scores::*;

use crate::db::{Database, Team, Tournament, User};
use crate::error::AppError;

pub(crate) async fn find_tournament(db: &Database, id: i64) -> Result<Tournament, AppError> {
    db.get_tournament(id)
        .await?
        .ok_or(AppError::NotFound("Tournament"))
}

pub(crate) async fn find_team(db: &Database, id: i64) -> Result<Team, AppError> {
    db.get_team(id).await?.ok_or(AppError::NotFound("Team"))
}

pub(crate) async fn find_user(db: &Database, id: i64) -> Result<User, AppError> {
    db.get_user(id).await?.ok_or(AppError::NotFound("User"))
}

/// Site admins may act on any tournament.
pub async fn require_tournament_admin(
    db: &Database,
    tournament_id: i64,
    user: &User,
) -> Result<(), AppError> {
    if user.is_admin() || db.is_tournament_admin(tournament_id, user.id).await? {
        Ok(())
    } else {
        Err(AppError::forbidden("tournament admin rights required"))
    }
}

/// Site admins may act on any team.
pub async fn require_team_admin(db: &Database, team_id: i64, user: &User) -> Result<(), AppError> {
    if user.is_admin() || db.is_team_admin(team_id, user.id).await? {
        Ok(())
    } else {
        Err(AppError::forbidden("team admin rights required"))
    }
}
