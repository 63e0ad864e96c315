use sqlx::SqlitePool;

use crate::models::{ProfileRow, RelationshipRow};

const SQL_FIND_PROFILE: &str = r#"
SELECT
  id,
  username,
  full_name,
  avatar_url,
  bio,
  location,
  website,
  occupation,
  interests,
  country,
  city,
  created_at,
  updated_at
FROM profiles
WHERE id = ?
"#;

pub async fn find_profile_by_id(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>(SQL_FIND_PROFILE)
        .bind(profile_id)
        .fetch_optional(pool)
        .await
}

const SQL_UPSERT_PROFILE: &str = r#"
INSERT INTO profiles (id, username, full_name, avatar_url, bio, location, website, occupation, interests, country, city)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
ON CONFLICT (id) DO UPDATE SET
  username = excluded.username,
  full_name = excluded.full_name,
  avatar_url = excluded.avatar_url,
  bio = excluded.bio,
  location = excluded.location,
  website = excluded.website,
  occupation = excluded.occupation,
  interests = excluded.interests,
  country = excluded.country,
  city = excluded.city,
  updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')
"#;

#[allow(dead_code)]
pub struct ProfileUpsert<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub full_name: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
    pub website: Option<&'a str>,
    pub occupation: Option<&'a str>,
    pub interests: Option<&'a str>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
}

pub async fn upsert_profile(pool: &SqlitePool, profile: ProfileUpsert<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPSERT_PROFILE)
        .bind(profile.id)
        .bind(profile.username)
        .bind(profile.full_name)
        .bind(profile.avatar_url)
        .bind(profile.bio)
        .bind(profile.location)
        .bind(profile.website)
        .bind(profile.occupation)
        .bind(profile.interests)
        .bind(profile.country)
        .bind(profile.city)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_INSERT_RELATIONSHIP: &str = r#"
INSERT INTO user_relationships (follower_id, following_id, status)
VALUES (?, ?, 'accepted')
"#;

pub async fn insert_relationship(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_RELATIONSHIP)
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_RELATIONSHIP: &str = r#"
DELETE FROM user_relationships
WHERE follower_id = ? AND following_id = ?
"#;

pub async fn delete_relationship(
    pool: &SqlitePool,
    follower_id: &str,
    following_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_RELATIONSHIP)
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_FOLLOWERS: &str = r#"
SELECT
  r.follower_id,
  r.following_id,
  r.status,
  r.created_at,
  p.username,
  p.avatar_url
FROM user_relationships r
LEFT JOIN profiles p ON p.id = r.follower_id
WHERE r.following_id = ? AND r.status = 'accepted'
ORDER BY r.created_at DESC
"#;

pub async fn list_followers(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<RelationshipRow>> {
    sqlx::query_as::<_, RelationshipRow>(SQL_LIST_FOLLOWERS)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}

const SQL_LIST_FOLLOWING: &str = r#"
SELECT
  r.follower_id,
  r.following_id,
  r.status,
  r.created_at,
  p.username,
  p.avatar_url
FROM user_relationships r
LEFT JOIN profiles p ON p.id = r.following_id
WHERE r.follower_id = ? AND r.status = 'accepted'
ORDER BY r.created_at DESC
"#;

pub async fn list_following(
    pool: &SqlitePool,
    profile_id: &str,
) -> sqlx::Result<Vec<RelationshipRow>> {
    sqlx::query_as::<_, RelationshipRow>(SQL_LIST_FOLLOWING)
        .bind(profile_id)
        .fetch_all(pool)
        .await
}
