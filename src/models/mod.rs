pub mod communities;
pub mod community_members;
pub mod conversations;
pub mod event_attendees;
pub mod events;
pub mod messages;
pub mod profiles;
pub mod threads;

pub use communities::CommunityRow;
pub use community_members::CommunityMemberRow;
pub use conversations::ConversationListRow;
pub use event_attendees::EventAttendeeRow;
pub use events::{EventDetailRow, EventRow};
pub use messages::MessageRow;
pub use profiles::{ProfileRow, RelationshipRow};
pub use threads::{ThreadReplyRow, ThreadRow};
