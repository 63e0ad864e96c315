use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::profiles_repo;
use crate::models::{ProfileRow, RelationshipRow};

#[derive(Debug, Deserialize, Default)]
pub struct ProfileUpdateInput {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub occupation: Option<String>,
    pub interests: Option<Vec<String>>,
    pub country: Option<String>,
    pub city: Option<String>,
}

pub async fn load_profile(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    profiles_repo::find_profile_by_id(pool, profile_id).await
}

/// Upserts the caller's profile; fields absent from the input fall back to
/// the stored value so a partial update never blanks the rest.
pub async fn update_own_profile(
    pool: &SqlitePool,
    profile_id: &str,
    input: &ProfileUpdateInput,
) -> sqlx::Result<Option<ProfileRow>> {
    let existing = profiles_repo::find_profile_by_id(pool, profile_id).await?;

    let username = input
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| existing.as_ref().map(|p| p.username.clone()));
    let Some(username) = username else {
        return Err(sqlx::Error::Protocol("username is required".into()));
    };

    let interests_json = match &input.interests {
        Some(list) => Some(serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())),
        None => existing.as_ref().and_then(|p| p.interests.clone()),
    };

    let pick = |new: &Option<String>, old: Option<&str>| -> Option<String> {
        new.clone().or_else(|| old.map(str::to_string))
    };

    profiles_repo::upsert_profile(
        pool,
        profiles_repo::ProfileUpsert {
            id: profile_id,
            username: &username,
            full_name: pick(&input.full_name, existing.as_ref().and_then(|p| p.full_name.as_deref())).as_deref(),
            avatar_url: pick(&input.avatar_url, existing.as_ref().and_then(|p| p.avatar_url.as_deref())).as_deref(),
            bio: pick(&input.bio, existing.as_ref().and_then(|p| p.bio.as_deref())).as_deref(),
            location: pick(&input.location, existing.as_ref().and_then(|p| p.location.as_deref())).as_deref(),
            website: pick(&input.website, existing.as_ref().and_then(|p| p.website.as_deref())).as_deref(),
            occupation: pick(&input.occupation, existing.as_ref().and_then(|p| p.occupation.as_deref())).as_deref(),
            interests: interests_json.as_deref(),
            country: pick(&input.country, existing.as_ref().and_then(|p| p.country.as_deref())).as_deref(),
            city: pick(&input.city, existing.as_ref().and_then(|p| p.city.as_deref())).as_deref(),
        },
    )
    .await?;

    profiles_repo::find_profile_by_id(pool, profile_id).await
}

pub async fn follow(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> sqlx::Result<u64> {
    if follower_id == following_id {
        return Err(sqlx::Error::Protocol("cannot follow yourself".into()));
    }
    profiles_repo::insert_relationship(pool, follower_id, following_id).await
}

pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> sqlx::Result<u64> {
    profiles_repo::delete_relationship(pool, follower_id, following_id).await
}

pub async fn list_followers(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<RelationshipRow>> {
    profiles_repo::list_followers(pool, profile_id).await
}

pub async fn list_following(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<RelationshipRow>> {
    profiles_repo::list_following(pool, profile_id).await
}
