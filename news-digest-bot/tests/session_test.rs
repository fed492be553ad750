use news_digest_bot::{CommitOutcome, PreferenceStore, SessionStore, Topic, UserId};
use std::collections::BTreeSet;

const USER: UserId = UserId(1001);

#[tokio::test]
async fn toggling_twice_restores_the_selection() {
    let sessions = SessionStore::new();
    sessions.open(USER, &[Topic::Health]).await;
    let before = sessions.current(USER).await.unwrap();

    for topic in [Topic::Health, Topic::Politics] {
        let once = sessions.toggle(USER, topic).await;
        assert_ne!(once, before);
        let twice = sessions.toggle(USER, topic).await;
        assert_eq!(twice, before);
    }
}

#[tokio::test]
async fn toggle_without_session_starts_empty() {
    let sessions = SessionStore::new();
    let selected = sessions.toggle(USER, Topic::Crypto).await;
    assert_eq!(selected, BTreeSet::from([Topic::Crypto]));
    assert!(sessions.is_open(USER).await);
}

#[tokio::test]
async fn open_replaces_an_existing_session() {
    let sessions = SessionStore::new();
    sessions.toggle(USER, Topic::Sports).await;
    sessions.open(USER, &[Topic::Science, Topic::Science]).await;
    assert_eq!(sessions.current(USER).await, Some(BTreeSet::from([Topic::Science])));
}

#[tokio::test]
async fn commit_without_session_is_rejected() {
    let sessions = SessionStore::new();
    let preferences = PreferenceStore::new();

    assert_eq!(sessions.commit(USER, &preferences).await, CommitOutcome::Rejected);
    assert_eq!(preferences.get(USER).await, None);
}

#[tokio::test]
async fn empty_commit_is_rejected_and_leaves_everything_alone() {
    let sessions = SessionStore::new();
    let preferences = PreferenceStore::new();
    preferences.set(USER, vec![Topic::Business]).await;

    sessions.open(USER, &[]).await;
    assert_eq!(sessions.commit(USER, &preferences).await, CommitOutcome::Rejected);

    assert_eq!(preferences.get(USER).await, Some(vec![Topic::Business]));
    assert!(sessions.is_open(USER).await);
    assert_eq!(sessions.current(USER).await, Some(BTreeSet::new()));
}

#[tokio::test]
async fn commit_writes_preferences_and_closes_the_session() {
    let sessions = SessionStore::new();
    let preferences = PreferenceStore::new();

    sessions.open(USER, &[]).await;
    sessions.toggle(USER, Topic::Technology).await;
    sessions.toggle(USER, Topic::Sports).await;

    let outcome = sessions.commit(USER, &preferences).await;
    assert_eq!(outcome, CommitOutcome::Committed(vec![Topic::Technology, Topic::Sports]));
    assert_eq!(preferences.get(USER).await, Some(vec![Topic::Technology, Topic::Sports]));
    assert!(!sessions.is_open(USER).await);

    // A later menu is seeded from what was committed.
    let seed = preferences.get(USER).await.unwrap();
    sessions.open(USER, &seed).await;
    assert_eq!(
        sessions.current(USER).await,
        Some(BTreeSet::from([Topic::Technology, Topic::Sports]))
    );
}

#[tokio::test]
async fn commit_order_is_declaration_order() {
    let sessions = SessionStore::new();
    let preferences = PreferenceStore::new();

    for topic in [Topic::Crypto, Topic::Health, Topic::Business] {
        sessions.toggle(USER, topic).await;
    }
    assert_eq!(
        sessions.commit(USER, &preferences).await,
        CommitOutcome::Committed(vec![Topic::Business, Topic::Health, Topic::Crypto])
    );
}

#[tokio::test]
async fn recommit_overwrites_the_whole_record() {
    let sessions = SessionStore::new();
    let preferences = PreferenceStore::new();

    sessions.open(USER, &[Topic::Sports, Topic::Politics]).await;
    sessions.commit(USER, &preferences).await;

    sessions.open(USER, &[Topic::Sports, Topic::Politics]).await;
    sessions.toggle(USER, Topic::Politics).await;
    sessions.toggle(USER, Topic::Science).await;
    sessions.commit(USER, &preferences).await;

    assert_eq!(preferences.get(USER).await, Some(vec![Topic::Sports, Topic::Science]));
}

#[tokio::test]
async fn sessions_are_per_user() {
    let sessions = SessionStore::new();
    let other = UserId(2002);

    sessions.toggle(USER, Topic::Health).await;
    sessions.toggle(other, Topic::Crypto).await;

    assert_eq!(sessions.current(USER).await, Some(BTreeSet::from([Topic::Health])));
    assert_eq!(sessions.current(other).await, Some(BTreeSet::from([Topic::Crypto])));
}

#[tokio::test]
async fn concurrent_toggles_for_one_user_are_not_lost() {
    let sessions = SessionStore::new();
    let handles: Vec<_> = Topic::ALL
        .into_iter()
        .map(|topic| {
            let sessions = sessions.clone();
            tokio::spawn(async move { sessions.toggle(USER, topic).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(sessions.current(USER).await.unwrap().len(), Topic::ALL.len());
}
