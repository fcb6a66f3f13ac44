//! Shared fixtures for the integration tests
//!
//! - `RecordingPlatform`: in-memory chat platform that records every call and
//!   can be told to refuse specific actions
//! - `ScriptedClassifier`: replays queued classifier results
#![allow(dead_code)]

use async_trait::async_trait;
use modguard::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub const COMMUNITY: CommunityId = CommunityId(1000);
pub const BOT_USER: UserId = UserId(1);
pub const GENERAL: ChannelId = ChannelId(2000);
pub const MOD_LOG: ChannelId = ChannelId(2001);
pub const MODERATORS: RoleId = RoleId(3000);

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub channel: ChannelId,
    pub text: String,
    pub auto_expire: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutCall {
    pub community: CommunityId,
    pub user: UserId,
    pub duration: Duration,
    pub reason: String,
}

/// Platform actions that can be configured to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Send,
    Delete,
    Timeout,
}

#[derive(Default)]
pub struct RecordingPlatform {
    roles: Mutex<HashMap<RoleId, Role>>,
    channels: Mutex<HashMap<ChannelId, Channel>>,
    denied: Mutex<HashSet<Action>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub deleted: Mutex<Vec<MessageId>>,
    pub timeouts: Mutex<Vec<TimeoutCall>>,
    next_id: AtomicU64,
}

impl RecordingPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(9_000),
            ..Self::default()
        })
    }

    pub fn with_role(self: Arc<Self>, id: RoleId, name: &str) -> Arc<Self> {
        self.roles.lock().unwrap().insert(
            id,
            Role {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn with_channel(self: Arc<Self>, id: ChannelId, name: &str) -> Arc<Self> {
        self.channels.lock().unwrap().insert(
            id,
            Channel {
                id,
                name: name.to_string(),
            },
        );
        self
    }

    pub fn deny(self: Arc<Self>, action: Action) -> Arc<Self> {
        self.denied.lock().unwrap().insert(action);
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, channel: ChannelId) -> Vec<SentMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.channel == channel)
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<TimeoutCall> {
        self.timeouts.lock().unwrap().clone()
    }

    fn check(&self, action: Action) -> Result<()> {
        if self.denied.lock().unwrap().contains(&action) {
            return Err(ModerationError::PermissionDenied(format!("{action:?} refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    fn current_user(&self) -> UserId {
        BOT_USER
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        text: &str,
        auto_expire: Option<Duration>,
    ) -> Result<MessageHandle> {
        self.check(Action::Send)?;
        self.sent.lock().unwrap().push(SentMessage {
            channel,
            text: text.to_string(),
            auto_expire,
        });
        Ok(MessageHandle {
            channel,
            id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
        })
    }

    async fn delete_message(&self, message: &InboundMessage) -> Result<()> {
        self.check(Action::Delete)?;
        self.deleted.lock().unwrap().push(message.id);
        Ok(())
    }

    async fn timeout_user(
        &self,
        community: CommunityId,
        user: UserId,
        duration: Duration,
        reason: &str,
    ) -> Result<()> {
        self.check(Action::Timeout)?;
        self.timeouts.lock().unwrap().push(TimeoutCall {
            community,
            user,
            duration,
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn resolve_role(&self, _community: CommunityId, role: RoleId) -> Result<Option<Role>> {
        Ok(self.roles.lock().unwrap().get(&role).cloned())
    }

    async fn resolve_channel(
        &self,
        _community: CommunityId,
        channel: ChannelId,
    ) -> Result<Option<Channel>> {
        Ok(self.channels.lock().unwrap().get(&channel).cloned())
    }
}

/// Replays queued results in order, then repeats `fallback`.
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<Result<HashMap<Category, f64>>>>,
    fallback: HashMap<Category, f64>,
    pub calls: AtomicUsize,
    pub last_requested: Mutex<Option<BTreeSet<Category>>>,
}

impl ScriptedClassifier {
    pub fn always(scores: &[(Category, f64)]) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: scores.iter().copied().collect(),
            calls: AtomicUsize::new(0),
            last_requested: Mutex::new(None),
        })
    }

    pub fn then(self: Arc<Self>, result: Result<HashMap<Category, f64>>) -> Arc<Self> {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn analyze(
        &self,
        _text: &str,
        requested: &BTreeSet<Category>,
    ) -> Result<HashMap<Category, f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_requested.lock().unwrap() = Some(requested.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn scores(pairs: &[(Category, f64)]) -> HashMap<Category, f64> {
    pairs.iter().copied().collect()
}

pub fn message(id: u64, author: u64, content: &str) -> InboundMessage {
    InboundMessage::new(
        id,
        Author::new(author, format!("user-{author}")),
        Some(COMMUNITY),
        GENERAL,
        content,
    )
}

pub fn filters(categories: &[Category]) -> BTreeSet<Category> {
    categories.iter().copied().collect()
}

/// Coordinator wired to an in-memory store and the given collaborators.
pub struct Harness {
    pub coordinator: Arc<ModerationCoordinator>,
    pub platform: Arc<RecordingPlatform>,
    pub classifier: Arc<ScriptedClassifier>,
    pub store: Arc<InMemoryStore>,
    pub admin: AdminService,
}

impl Harness {
    pub fn new(platform: Arc<RecordingPlatform>, classifier: Arc<ScriptedClassifier>) -> Self {
        Self::with_config(platform, classifier, EngineConfig::default())
    }

    pub fn with_config(
        platform: Arc<RecordingPlatform>,
        classifier: Arc<ScriptedClassifier>,
        config: EngineConfig,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let coordinator = ModerationCoordinator::builder()
            .classifier(classifier.clone())
            .platform(platform.clone())
            .settings(store.clone())
            .offenses(store.clone())
            .config(config)
            .build()
            .unwrap();
        let admin = AdminService::new(store.clone(), coordinator.ledger().clone());
        Self {
            coordinator: Arc::new(coordinator),
            platform,
            classifier,
            store,
            admin,
        }
    }
}
