//! Inbound chat messages

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, CommunityId, MessageId, UserId};

/// Author of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub is_bot: bool,
}

impl Author {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot: false,
        }
    }

    pub fn bot(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, name)
        }
    }

    pub fn mention(&self) -> String {
        self.id.mention()
    }
}

/// A message delivered by the chat platform.
///
/// `community` is `None` for direct messages, which are never moderated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: MessageId,
    pub author: Author,
    pub community: Option<CommunityId>,
    pub channel: ChannelId,
    pub content: String,
}

impl InboundMessage {
    pub fn new(
        id: impl Into<MessageId>,
        author: Author,
        community: Option<CommunityId>,
        channel: impl Into<ChannelId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author,
            community,
            channel: channel.into(),
            content: content.into(),
        }
    }

    /// Leading part of the content, cut on a char boundary.
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}…")
        } else {
            head
        }
    }
}
