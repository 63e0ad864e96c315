use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{communities_repo, community_members_repo};
use crate::models::CommunityRow;

#[derive(Debug, Deserialize)]
pub struct NewCommunityInput {
    pub name: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Creates the community and seats the creator as an approved admin member
/// in the same transaction, so the creator can immediately manage what they
/// created.
pub async fn create_community(
    pool: &SqlitePool,
    creator_profile_id: &str,
    input: &NewCommunityInput,
) -> sqlx::Result<Option<CommunityRow>> {
    if input.name.trim().is_empty() {
        return Err(sqlx::Error::Protocol("community name is required".into()));
    }

    let id = Uuid::new_v4().to_string();
    let mut tx = pool.begin().await?;

    communities_repo::insert_community(
        &mut *tx,
        communities_repo::NewCommunity {
            id: &id,
            name: input.name.trim(),
            description: input.description.as_deref(),
            cover_image: input.cover_image.as_deref(),
            country: input.country.as_deref(),
            city: input.city.as_deref(),
            created_by: creator_profile_id,
        },
    )
    .await?;

    community_members_repo::insert_member(
        &mut *tx,
        &id,
        creator_profile_id,
        "owner",
        true,
        "approved",
    )
    .await?;

    tx.commit().await?;

    communities_repo::find_community_by_id(pool, &id).await
}

pub async fn load_community(
    pool: &SqlitePool,
    community_id: &str,
) -> sqlx::Result<Option<CommunityRow>> {
    communities_repo::find_community_by_id(pool, community_id).await
}

pub async fn list_communities(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<CommunityRow>> {
    communities_repo::list_communities(pool, limit.clamp(1, 200)).await
}
