use sqlx::SqlitePool;

use crate::database::{communities_repo, community_members_repo};
use crate::models::CommunityMemberRow;

pub const MEMBER_STATUSES: [&str; 4] = ["pending", "approved", "rejected", "banned"];

/// Joining admits directly as an approved member; moderation happens after
/// the fact through `update_member`.
pub async fn join_community(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<Option<CommunityMemberRow>> {
    if communities_repo::find_community_by_id(pool, community_id)
        .await?
        .is_none()
    {
        return Ok(None);
    }

    community_members_repo::insert_member(
        pool,
        community_id,
        profile_id,
        "member",
        false,
        "approved",
    )
    .await?;

    community_members_repo::find_member(pool, community_id, profile_id).await
}

pub async fn leave_community(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<u64> {
    community_members_repo::delete_member(pool, community_id, profile_id).await
}

pub async fn get_membership(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<Option<CommunityMemberRow>> {
    community_members_repo::find_member(pool, community_id, profile_id).await
}

pub async fn list_members(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Vec<CommunityMemberRow>> {
    community_members_repo::list_members(pool, community_id).await
}

pub async fn is_admin(
    pool: &SqlitePool,
    community_id: &str,
    profile_id: &str,
) -> sqlx::Result<bool> {
    let member = community_members_repo::find_member(pool, community_id, profile_id).await?;
    Ok(matches!(member, Some(m) if m.is_admin == 1 && m.status == "approved"))
}

/// Admin moderation: change a member's status and/or admin flag. Returns the
/// refreshed row, or None when the subject is not a member.
pub async fn update_member(
    pool: &SqlitePool,
    community_id: &str,
    subject_profile_id: &str,
    status: Option<&str>,
    make_admin: Option<bool>,
) -> sqlx::Result<Option<CommunityMemberRow>> {
    if let Some(status) = status {
        if !MEMBER_STATUSES.contains(&status) {
            return Err(sqlx::Error::Protocol("invalid member status".into()));
        }
    }

    if community_members_repo::find_member(pool, community_id, subject_profile_id)
        .await?
        .is_none()
    {
        return Ok(None);
    }

    if let Some(status) = status {
        community_members_repo::update_member_status(pool, community_id, subject_profile_id, status)
            .await?;
    }
    if let Some(make_admin) = make_admin {
        community_members_repo::update_member_admin(
            pool,
            community_id,
            subject_profile_id,
            make_admin,
        )
        .await?;
    }

    community_members_repo::find_member(pool, community_id, subject_profile_id).await
}

pub async fn remove_member(
    pool: &SqlitePool,
    community_id: &str,
    subject_profile_id: &str,
) -> sqlx::Result<u64> {
    community_members_repo::delete_member(pool, community_id, subject_profile_id).await
}
