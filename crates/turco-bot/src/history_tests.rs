//! Unit tests for InMemoryHistory

#[cfg(test)]
mod tests {
    use crate::history::{HistoryStore, InMemoryHistory};
    use turco_types::{session_key, Origin, Role, SessionKey};

    fn dm(user: u64) -> SessionKey {
        session_key(Origin::Direct, user)
    }

    fn channel(channel_id: u64, user: u64) -> SessionKey {
        session_key(Origin::Channel(channel_id), user)
    }

    #[tokio::test]
    async fn test_unknown_session_snapshot_is_empty() {
        let store = InMemoryHistory::new();
        assert!(store.snapshot(&dm(1)).await.is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryHistory::new();
        let key = dm(1);
        store.append(&key, Role::User, "first").await;
        store.append(&key, Role::Model, "second").await;
        store.append(&key, Role::User, "third").await;

        let history = store.snapshot(&key).await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(history[2].content, "third");
    }

    #[tokio::test]
    async fn test_default_window_is_twenty_turns() {
        let store = InMemoryHistory::default();
        assert_eq!(store.max_entries(), 20);
    }

    #[tokio::test]
    async fn test_history_never_exceeds_window_and_keeps_latest() {
        let store = InMemoryHistory::new();
        let key = dm(1);
        for i in 0..25u32 {
            store.append(&key, Role::User, &format!("msg {}", i)).await;
            assert!(store.snapshot(&key).await.len() <= 20);
        }

        let history = store.snapshot(&key).await;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].content, "msg 5");
        assert_eq!(history[19].content, "msg 24");
    }

    #[tokio::test]
    async fn test_custom_window_counts_pairs() {
        let store = InMemoryHistory::with_max_history(2);
        let key = dm(1);
        for i in 0..7u32 {
            store.append(&key, Role::User, &format!("msg {}", i)).await;
        }
        let contents: Vec<String> = store
            .snapshot(&key)
            .await
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["msg 3", "msg 4", "msg 5", "msg 6"]);
    }

    #[tokio::test]
    async fn test_clear_empties_only_that_session() {
        let store = InMemoryHistory::new();
        store.append(&channel(10, 7), Role::User, "no canal").await;
        store.append(&dm(7), Role::User, "no privado").await;

        store.clear(&channel(10, 7)).await;

        assert!(store.snapshot(&channel(10, 7)).await.is_empty());
        let dm_history = store.snapshot(&dm(7)).await;
        assert_eq!(dm_history.len(), 1);
        assert_eq!(dm_history[0].content, "no privado");
    }

    #[tokio::test]
    async fn test_clear_unknown_session_is_noop() {
        let store = InMemoryHistory::new();
        store.clear(&dm(404)).await;
        assert_eq!(store.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_append_after_clear_starts_fresh() {
        let store = InMemoryHistory::new();
        let key = dm(1);
        store.append(&key, Role::User, "old").await;
        store.clear(&key).await;
        store.append(&key, Role::User, "new").await;

        let history = store.snapshot(&key).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "new");
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_later_appends() {
        let store = InMemoryHistory::new();
        let key = dm(1);
        store.append(&key, Role::User, "one").await;
        let before = store.snapshot(&key).await;
        store.append(&key, Role::Model, "two").await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot(&key).await.len(), 2);
    }

    #[tokio::test]
    async fn test_active_sessions_counts_keys() {
        let store = InMemoryHistory::new();
        store.append(&dm(1), Role::User, "a").await;
        store.append(&dm(2), Role::User, "b").await;
        store.append(&channel(3, 1), Role::User, "c").await;
        assert_eq!(store.active_sessions().await, 3);

        store.clear(&dm(2)).await;
        assert_eq!(store.active_sessions().await, 2);
    }
}
