pub mod middleware;
pub mod routes;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};

use crate::app_state::AppState;
use self::routes::{attendance, communities, events, health, members, messages, profiles, threads};

pub fn api_router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/events",
            post(events::create_event_handler).get(events::list_events_handler),
        )
        .route("/api/events/:event_id", get(events::event_detail_handler))
        .route(
            "/api/events/:event_id/attendance",
            post(attendance::request_attendance_handler)
                .get(attendance::list_attendance_handler)
                .patch(attendance::change_status_handler)
                .delete(attendance::cancel_attendance_handler),
        )
        .route(
            "/api/communities",
            post(communities::create_community_handler).get(communities::list_communities_handler),
        )
        .route(
            "/api/communities/:community_id",
            get(communities::community_detail_handler),
        )
        .route(
            "/api/communities/:community_id/membership",
            post(communities::join_community_handler)
                .delete(communities::leave_community_handler),
        )
        .route(
            "/api/communities/:community_id/members",
            get(members::list_members_handler),
        )
        .route(
            "/api/communities/:community_id/members/:profile_id",
            patch(members::update_member_handler).delete(members::remove_member_handler),
        )
        .route(
            "/api/communities/:community_id/threads",
            get(threads::list_threads_handler).post(threads::create_thread_handler),
        )
        .route(
            "/api/threads/:thread_id",
            get(threads::thread_detail_handler).patch(threads::pin_thread_handler),
        )
        .route(
            "/api/threads/:thread_id/replies",
            post(threads::create_reply_handler),
        )
        .route(
            "/api/threads/:thread_id/like",
            post(threads::toggle_like_handler),
        )
        .route(
            "/api/conversations",
            get(messages::list_conversations_handler).post(messages::ensure_conversation_handler),
        )
        .route(
            "/api/conversations/:conversation_id/messages",
            get(messages::list_messages_handler).post(messages::send_message_handler),
        )
        .route(
            "/api/conversations/:conversation_id/read",
            post(messages::mark_read_handler),
        )
        .route(
            "/api/profiles/me",
            patch(profiles::update_own_profile_handler),
        )
        .route(
            "/api/profiles/:profile_id",
            get(profiles::profile_detail_handler),
        )
        .route(
            "/api/profiles/:profile_id/follow",
            post(profiles::follow_handler).delete(profiles::unfollow_handler),
        )
        .route(
            "/api/profiles/:profile_id/followers",
            get(profiles::list_followers_handler),
        )
        .route(
            "/api/profiles/:profile_id/following",
            get(profiles::list_following_handler),
        )
        .layer(axum_middleware::from_fn(middleware::auth::require_auth));

    Router::new()
        .route("/api/health", get(health::health_handler))
        .merge(protected)
        .with_state(state)
}
