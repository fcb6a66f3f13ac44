//! Chat platform capability trait

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ModerationError;
use crate::types::{ChannelId, CommunityId, InboundMessage, MessageId, RoleId, UserId};

/// Handle to a message the engine posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHandle {
    pub channel: ChannelId,
    pub id: MessageId,
}

/// A role that resolved inside a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

impl Role {
    pub fn mention(&self) -> String {
        self.id.mention()
    }
}

/// A channel that resolved inside a community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// Platform primitives the engine consumes.
///
/// Failures map onto `PermissionDenied`, `ResourceNotFound` and
/// `RateLimited`; anything else is `PlatformError`.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Account the engine runs as; its own messages are never moderated.
    fn current_user(&self) -> UserId;

    async fn send_message(
        &self,
        channel: ChannelId,
        text: &str,
        auto_expire: Option<Duration>,
    ) -> Result<MessageHandle, ModerationError>;

    async fn delete_message(&self, message: &InboundMessage) -> Result<(), ModerationError>;

    async fn timeout_user(
        &self,
        community: CommunityId,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<(), ModerationError>;

    async fn resolve_role(
        &self,
        community: CommunityId,
        role: RoleId,
    ) -> Result<Option<Role>, ModerationError>;

    async fn resolve_channel(
        &self,
        community: CommunityId,
        channel: ChannelId,
    ) -> Result<Option<Channel>, ModerationError>;
}
