pub mod attendance_service;
pub mod community_service;
pub mod events_service;
pub mod membership_service;
pub mod messages_service;
pub mod profile_service;
pub mod threads_service;
