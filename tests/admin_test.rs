//! Administrative configuration flows over both store implementations.

mod support;

use modguard::defaults::enforcement::RESET_CONFIRMATION_PHRASE;
use modguard::prelude::*;
use std::sync::Arc;
use support::*;

fn admin_over(store: Arc<InMemoryStore>) -> AdminService {
    AdminService::new(store.clone(), OffenseLedger::new(store))
}

#[tokio::test]
async fn show_config_returns_defaults_when_unconfigured() {
    let admin = admin_over(Arc::new(InMemoryStore::new()));
    let config = admin.show_config(COMMUNITY).await.unwrap();

    assert_eq!(config, CommunityConfig::default());
    assert_eq!(config.timeout_minutes, 5);
    assert_eq!(config.filter_count(), 5);
    assert!(config.moderator_role_id.is_none());
    assert!(config.logging_channel_id.is_none());
}

#[tokio::test]
async fn mention_inputs_are_parsed_before_reaching_the_store() {
    let admin = admin_over(Arc::new(InMemoryStore::new()));

    let role = parse_role_mention("<@&3000>").unwrap();
    let channel = parse_channel_mention("<#2001>").unwrap();
    let categories = parse_categories("toxicity, threat").unwrap();

    admin.set_moderator_role(COMMUNITY, role).await.unwrap();
    admin.set_logging_channel(COMMUNITY, channel).await.unwrap();
    let config = admin.set_active_filters(COMMUNITY, categories).await.unwrap();

    assert_eq!(config.moderator_role_id, Some(MODERATORS));
    assert_eq!(config.logging_channel_id, Some(MOD_LOG));
    assert_eq!(
        config.active_filters,
        filters(&[Category::Toxicity, Category::Threat])
    );

    assert!(matches!(
        parse_role_mention("<#2001>"),
        Err(ModerationError::ParseError(_))
    ));
    assert!(matches!(
        parse_categories("toxicity, spam"),
        Err(ModerationError::ParseError(_))
    ));
}

#[tokio::test]
async fn invalid_updates_leave_config_untouched() {
    let admin = admin_over(Arc::new(InMemoryStore::new()));
    admin.set_timeout_minutes(COMMUNITY, 30).await.unwrap();

    let err = admin.set_timeout_minutes(COMMUNITY, 0).await.unwrap_err();
    assert!(matches!(err, ModerationError::InvalidConfiguration(_)));

    let err = admin
        .set_active_filters(COMMUNITY, Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::InvalidConfiguration(_)));

    let config = admin.show_config(COMMUNITY).await.unwrap();
    assert_eq!(config.timeout_minutes, 30);
    assert_eq!(config.filter_count(), 5);
}

#[tokio::test]
async fn reset_requires_exact_phrase() {
    let classifier = ScriptedClassifier::always(&[(Category::Insult, 0.9)]);
    let h = Harness::new(RecordingPlatform::new(), classifier);
    h.admin
        .set_active_filters(COMMUNITY, filters(&[Category::Insult]))
        .await
        .unwrap();
    h.coordinator.process(&message(1, 42, "rude")).await;
    h.coordinator.process(&message(2, 43, "rude")).await;

    let err = h
        .admin
        .reset_community(COMMUNITY, "reset all moderation data")
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::ConfirmationRequired { .. }));
    assert_eq!(h.store.record_count().await, 2);

    let summary = h
        .admin
        .reset_community(COMMUNITY, RESET_CONFIRMATION_PHRASE)
        .await
        .unwrap();
    assert_eq!(summary.offense_records_removed, 2);
    assert_eq!(h.store.record_count().await, 0);
    assert_eq!(
        h.admin.show_config(COMMUNITY).await.unwrap(),
        CommunityConfig::default()
    );
}

#[tokio::test]
async fn json_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("modguard.json");

    {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let ledger = OffenseLedger::new(store.clone());
        let admin = AdminService::new(store, ledger.clone());
        admin.set_timeout_minutes(COMMUNITY, 15).await.unwrap();
        admin.set_moderator_role(COMMUNITY, MODERATORS).await.unwrap();
        ledger
            .record_offense(COMMUNITY, UserId(42), Category::Threat, "first")
            .await
            .unwrap();
        ledger
            .record_offense(COMMUNITY, UserId(42), Category::Insult, "second")
            .await
            .unwrap();
    }

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let ledger = OffenseLedger::new(store.clone());
    let admin = AdminService::new(store, ledger);

    let config = admin.show_config(COMMUNITY).await.unwrap();
    assert_eq!(config.timeout_minutes, 15);
    assert_eq!(config.moderator_role_id, Some(MODERATORS));

    let record = admin.offense_history(COMMUNITY, UserId(42)).await.unwrap();
    assert_eq!(record.offense_count, 2);
    assert_eq!(record.last().unwrap().category, Category::Insult);
    assert_eq!(record.last().unwrap().message_snippet, "second");
}
