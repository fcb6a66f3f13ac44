//! Core domain types shared by every component.

pub mod category;
pub mod community;
pub mod ids;
pub mod message;
pub mod offense;
pub mod scores;

pub use category::Category;
pub use community::CommunityConfig;
pub use ids::{ChannelId, CommunityId, MessageId, RoleId, UserId};
pub use message::{Author, InboundMessage};
pub use offense::{OffenseEntry, OffenseKey, OffenseRecord};
pub use scores::ScoreSet;
