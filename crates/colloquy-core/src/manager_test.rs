#[cfg(test)]
mod tests {
    use crate::backend::{
        AnalyticsReport, AppendReceipt, BatchDeleteReceipt, CleanupReceipt, ContextWindow,
        ConversationBackend, DeleteReceipt, HealthStatus, Reply, Responder, SearchResults,
    };
    use crate::conversation::convert::{CONTROL_MARKER, NEW_CONVERSATION_TITLE};
    use crate::conversation::record::BackendRecord;
    use crate::conversation::summary::ConversationSummary;
    use crate::error::{ColloquyError, Result};
    use crate::manager::ConversationManager;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // Mock backend for testing
    struct MockBackend {
        summaries: Mutex<Vec<ConversationSummary>>,
        history: Mutex<HashMap<String, Vec<BackendRecord>>>,
        appended: Mutex<Vec<(String, String, String, String)>>,
        removed: Mutex<Vec<String>>,
        fail_next: Mutex<Option<ColloquyError>>,
        call_count: Mutex<u32>,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                summaries: Mutex::new(Vec::new()),
                history: Mutex::new(HashMap::new()),
                appended: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
                fail_next: Mutex::new(None),
                call_count: Mutex::new(0),
            }
        }

        fn with_summaries(self, summaries: Vec<ConversationSummary>) -> Self {
            *self.summaries.lock().unwrap() = summaries;
            self
        }

        fn with_history(self, conversation_id: &str, records: Vec<BackendRecord>) -> Self {
            self.history
                .lock()
                .unwrap()
                .insert(conversation_id.to_string(), records);
            self
        }

        fn fail_next(&self, err: ColloquyError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        fn calls(&self) -> u32 {
            *self.call_count.lock().unwrap()
        }

        fn check(&self) -> Result<()> {
            *self.call_count.lock().unwrap() += 1;
            match self.fail_next.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ConversationBackend for MockBackend {
        async fn health(&self) -> Result<HealthStatus> {
            self.check()?;
            Ok(HealthStatus {
                status: "ok".to_string(),
            })
        }

        async fn list_summaries(
            &self,
            _user_id: &str,
            _limit: Option<u32>,
            _include_tools: bool,
        ) -> Result<Vec<ConversationSummary>> {
            self.check()?;
            Ok(self.summaries.lock().unwrap().clone())
        }

        async fn get_history(
            &self,
            _user_id: &str,
            conversation_id: &str,
            _limit: Option<u32>,
        ) -> Result<Vec<BackendRecord>> {
            self.check()?;
            Ok(self
                .history
                .lock()
                .unwrap()
                .get(conversation_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn append(
            &self,
            user_id: &str,
            conversation_id: &str,
            user_query: &str,
            agent_response: &str,
            _timestamp: Option<DateTime<Utc>>,
        ) -> Result<AppendReceipt> {
            self.check()?;
            self.appended.lock().unwrap().push((
                user_id.to_string(),
                conversation_id.to_string(),
                user_query.to_string(),
                agent_response.to_string(),
            ));
            Ok(AppendReceipt {
                status: "success".to_string(),
                message: "stored".to_string(),
            })
        }

        async fn remove(&self, _user_id: &str, conversation_id: &str) -> Result<DeleteReceipt> {
            self.check()?;
            self.removed.lock().unwrap().push(conversation_id.to_string());
            Ok(DeleteReceipt {
                status: "success".to_string(),
                message: "deleted".to_string(),
                deleted_count: 1,
            })
        }

        async fn search(
            &self,
            _user_id: &str,
            term: &str,
            _conversation_id: Option<&str>,
            _limit: u32,
        ) -> Result<SearchResults> {
            self.check()?;
            Ok(SearchResults {
                results: Vec::new(),
                total_count: 0,
                search_term: term.to_string(),
            })
        }

        async fn get_context(
            &self,
            _user_id: &str,
            conversation_id: &str,
            context_limit: u32,
        ) -> Result<ContextWindow> {
            self.check()?;
            Ok(ContextWindow {
                conversation_id: conversation_id.to_string(),
                context: Vec::new(),
                context_limit,
            })
        }

        async fn cleanup(&self, _user_id: &str, days_old: u32) -> Result<CleanupReceipt> {
            self.check()?;
            Ok(CleanupReceipt {
                status: "success".to_string(),
                message: "cleaned".to_string(),
                deleted_count: 0,
                days_old,
            })
        }

        async fn batch_remove(
            &self,
            _user_id: &str,
            conversation_ids: &[String],
        ) -> Result<BatchDeleteReceipt> {
            self.check()?;
            Ok(BatchDeleteReceipt {
                status: "success".to_string(),
                total_deleted: conversation_ids.len() as u32,
                requested_deletions: conversation_ids.len() as u32,
            })
        }

        async fn analytics(&self, _user_id: &str, days_back: u32) -> Result<AnalyticsReport> {
            self.check()?;
            Ok(AnalyticsReport {
                total_conversations: 0,
                total_messages: 0,
                days_back,
                average_messages_per_conversation: 0.0,
                last_activity: None,
            })
        }
    }

    // Mock responder with a scripted reply
    struct ScriptedResponder {
        content: String,
        conversation_id: Option<String>,
        fail: bool,
    }

    impl ScriptedResponder {
        fn replying(content: &str) -> Self {
            Self {
                content: content.to_string(),
                conversation_id: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                content: String::new(),
                conversation_id: None,
                fail: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl Responder for ScriptedResponder {
        async fn respond(&self, _conversation_id: Option<&str>, _prompt: &str) -> Result<Reply> {
            if self.fail {
                return Err(ColloquyError::network("assistant unreachable"));
            }
            Ok(Reply {
                content: self.content.clone(),
                conversation_id: self.conversation_id.clone(),
            })
        }
    }

    fn summary(id: Option<&str>, query: &str, age_secs: i64) -> ConversationSummary {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap() - Duration::seconds(age_secs);
        ConversationSummary {
            conversation_id: id.map(str::to_string),
            first_message_time: Some(t),
            last_message_time: Some(t),
            message_count: 2,
            latest_user_query: Some(query.to_string()),
            latest_agent_response: None,
        }
    }

    fn record(id: &str, conversation_id: &str, query: &str, offset_secs: i64) -> BackendRecord {
        BackendRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            conversation_id: conversation_id.to_string(),
            user_query: query.to_string(),
            agent_response: format!("answer to {query}"),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    async fn manager_with_user(backend: Arc<MockBackend>) -> ConversationManager {
        let mut manager = ConversationManager::new(backend);
        manager.set_user("u1").await.unwrap();
        manager
    }

    #[tokio::test]
    async fn test_create_new_prepends_and_sets_current() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = manager_with_user(backend.clone()).await;
        let calls_before = backend.calls();

        let id = manager.create_new().id.clone();

        assert_eq!(manager.conversations().len(), 1);
        assert_eq!(manager.current().unwrap().id, id);
        assert_eq!(manager.current().unwrap().title, NEW_CONVERSATION_TITLE);
        assert!(manager.error().is_none());
        // create_new makes no network call
        assert_eq!(backend.calls(), calls_before);

        let second = manager.create_new().id.clone();
        assert_eq!(manager.conversations()[0].id, second);
        assert_eq!(manager.conversations().len(), 2);
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = manager_with_user(backend.clone()).await;
        manager.create_new();

        manager
            .send("Hello", &ScriptedResponder::replying("Hi there!"))
            .await
            .unwrap();

        let current = manager.current().unwrap();
        assert_eq!(current.messages.len(), 2);
        assert_eq!(current.messages[0].content, "Hello");
        assert!(current.messages[0].is_user);
        assert_eq!(current.messages[1].content, "Hi there!");
        assert!(!current.messages[1].is_user);
        assert!(current.messages[1].timestamp >= current.messages[0].timestamp);
        assert_eq!(current.last_message, "Hi there!");
        // The stored exchange is reflected in the record count.
        assert_eq!(current.message_count, Some(1));

        let appended = backend.appended.lock().unwrap();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0].2, "Hello");
        assert_eq!(appended[0].3, "Hi there!");
    }

    #[tokio::test]
    async fn test_send_failure_keeps_optimistic_message() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = manager_with_user(backend.clone()).await;
        manager.create_new();

        let err = manager
            .send("Hello", &ScriptedResponder::failing())
            .await
            .unwrap_err();

        assert!(matches!(err, ColloquyError::Network(_)));
        // The user's message stays visible with no reply; nothing was
        // stored, so the record count does not move.
        let current = manager.current().unwrap();
        assert_eq!(current.messages.len(), 1);
        assert!(current.messages[0].is_user);
        assert_eq!(current.message_count, None);
        assert!(manager.error().is_some());
        assert!(backend.appended.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_append_failure_keeps_optimistic_message() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = manager_with_user(backend.clone()).await;
        manager.create_new();

        backend.fail_next(ColloquyError::http(503, "unavailable"));
        let err = manager
            .send("Hello", &ScriptedResponder::replying("Hi there!"))
            .await
            .unwrap_err();

        assert!(matches!(err, ColloquyError::Http { status: 503, .. }));
        let current = manager.current().unwrap();
        assert_eq!(current.messages.len(), 1);
        assert!(manager.error().is_some());
    }

    #[tokio::test]
    async fn test_send_blank_reply_is_not_stored() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = manager_with_user(backend.clone()).await;
        manager.create_new();

        let err = manager
            .send("Hello", &ScriptedResponder::replying("   "))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(backend.appended.lock().unwrap().is_empty());
        assert_eq!(manager.current().unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_send_without_user_is_rejected_before_network() {
        let backend = Arc::new(MockBackend::new());
        let mut manager = ConversationManager::new(backend.clone());

        let err = manager
            .send("Hello", &ScriptedResponder::replying("Hi"))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_drops_summaries_without_identifier() {
        let backend = Arc::new(
            MockBackend::new().with_summaries(vec![
                summary(Some("c1"), "kept", 0),
                summary(None, "dropped", 0),
            ]),
        );
        let mut manager = ConversationManager::new(backend);

        manager.set_user("u1").await.unwrap();

        assert_eq!(manager.conversations().len(), 1);
        assert_eq!(manager.conversations()[0].id, "c1");
    }

    #[tokio::test]
    async fn test_refresh_sorts_most_recent_first() {
        let backend = Arc::new(
            MockBackend::new().with_summaries(vec![
                summary(Some("old"), "older", 3600),
                summary(Some("new"), "newer", 0),
            ]),
        );
        let mut manager = ConversationManager::new(backend);

        manager.set_user("u1").await.unwrap();

        assert_eq!(manager.conversations()[0].id, "new");
        assert_eq!(manager.conversations()[1].id, "old");
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_previous_list() {
        let backend = Arc::new(
            MockBackend::new().with_summaries(vec![summary(Some("c1"), "kept", 0)]),
        );
        let mut manager = ConversationManager::new(backend.clone());
        manager.set_user("u1").await.unwrap();
        assert_eq!(manager.conversations().len(), 1);

        backend.fail_next(ColloquyError::network("offline"));
        let err = manager.refresh().await.unwrap_err();

        assert!(matches!(err, ColloquyError::Network(_)));
        assert_eq!(manager.conversations().len(), 1);
        assert!(manager.error().is_some());
    }

    #[tokio::test]
    async fn test_select_hydrates_with_filter_and_expand() {
        let backend = Arc::new(
            MockBackend::new()
                .with_summaries(vec![summary(Some("c1"), "hello", 0)])
                .with_history(
                    "c1",
                    vec![
                        record("r1", "c1", "hello", 0),
                        record("r2", "c1", &format!("{CONTROL_MARKER} scan"), 10),
                        record("r3", "c1", "how are you", 20),
                    ],
                ),
        );
        let mut manager = manager_with_user(backend).await;

        manager.select("c1").await.unwrap();

        let current = manager.current().unwrap();
        // Two visible records expand to four messages; the control record
        // is hidden.
        assert_eq!(current.messages.len(), 4);
        assert!(current
            .messages
            .iter()
            .all(|m| !m.content.contains(CONTROL_MARKER)));
        assert_eq!(current.messages[0].content, "hello");
        assert!(current.messages[0].is_user);
    }

    #[tokio::test]
    async fn test_select_failure_preserves_previous_selection() {
        let backend = Arc::new(
            MockBackend::new().with_summaries(vec![
                summary(Some("c1"), "first", 0),
                summary(Some("c2"), "second", 10),
            ]),
        );
        let mut manager = manager_with_user(backend.clone()).await;
        // c1 has no stored history in the mock, so hydration of c2 fails
        // while c1 stays selected.
        backend
            .history
            .lock()
            .unwrap()
            .insert("c1".to_string(), vec![record("r1", "c1", "first", 0)]);
        manager.select("c1").await.unwrap();

        backend.fail_next(ColloquyError::timeout("/api/conversations", 30_000));
        let err = manager.select("c2").await.unwrap_err();

        assert!(matches!(err, ColloquyError::Timeout { .. }));
        assert_eq!(manager.current().unwrap().id, "c1");
        assert!(manager.error().is_some());
    }

    #[tokio::test]
    async fn test_remove_drops_conversation_and_clears_current() {
        let backend = Arc::new(
            MockBackend::new().with_summaries(vec![
                summary(Some("c1"), "first", 0),
                summary(Some("c2"), "second", 10),
            ]),
        );
        let mut manager = manager_with_user(backend.clone()).await;
        manager.select("c2").await.unwrap();

        manager.remove("c2").await.unwrap();

        assert_eq!(manager.conversations().len(), 1);
        assert_eq!(manager.conversations()[0].id, "c1");
        assert!(manager.current().is_none());
        assert_eq!(backend.removed.lock().unwrap().as_slice(), ["c2"]);
    }
}
