//! Club visibility and posting rules
//!
//! These are pure functions over an already-loaded club and the caller's
//! membership row, so every entry point (HTTP read, HTTP post, live
//! subscription) asks the same question the same way.

use crate::entities::{Club, ClubMember};
use crate::error::DomainError;
use crate::value_objects::{Actor, AuthenticatedActor, UserId};

/// Management actions on a club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageAction {
    Invite,
    Rename,
    Delete,
}

fn belongs(user_id: UserId, club: &Club, membership: Option<&ClubMember>) -> bool {
    club.is_owned_by(user_id)
        || membership.is_some_and(|m| m.club_id == club.id && m.user_id == user_id)
}

/// Public clubs are visible to everyone; private clubs to members only
pub fn authorize_view(
    actor: &Actor,
    club: &Club,
    membership: Option<&ClubMember>,
) -> Result<(), DomainError> {
    if club.is_public {
        return Ok(());
    }
    match actor.id() {
        Some(user_id) if belongs(user_id, club, membership) => Ok(()),
        _ => Err(DomainError::NotClubMember),
    }
}

/// Posting needs a signed-in, unmuted caller who can see the club
pub fn authorize_post(
    actor: &Actor,
    club: &Club,
    membership: Option<&ClubMember>,
) -> Result<(), DomainError> {
    let actor = actor.require_authenticated()?;
    if club.is_private() && !belongs(actor.id, club, membership) {
        return Err(DomainError::NotClubMember);
    }
    actor.status.ensure_can_post()
}

/// Owners may do everything; moderators may only invite
pub fn authorize_manage(
    actor: &AuthenticatedActor,
    club: &Club,
    membership: Option<&ClubMember>,
    action: ManageAction,
) -> Result<(), DomainError> {
    if club.is_owned_by(actor.id) {
        return Ok(());
    }
    let membership = membership.filter(|m| m.club_id == club.id && m.user_id == actor.id);
    match (action, membership) {
        (_, Some(m)) if m.is_owner() => Ok(()),
        (ManageAction::Invite, Some(m)) if m.can_moderate() => Ok(()),
        (ManageAction::Invite, _) => Err(DomainError::NotClubModerator),
        (ManageAction::Rename | ManageAction::Delete, _) => Err(DomainError::NotClubOwner),
    }
}

#[inline]
pub fn can_view(actor: &Actor, club: &Club, membership: Option<&ClubMember>) -> bool {
    authorize_view(actor, club, membership).is_ok()
}

#[inline]
pub fn can_post(actor: &Actor, club: &Club, membership: Option<&ClubMember>) -> bool {
    authorize_post(actor, club, membership).is_ok()
}
