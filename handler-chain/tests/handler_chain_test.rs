//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: before/after order, a before hook stopping the chain, Reply ending the handle phase
//! and reaching after hooks, Ignore passing to the next handler, and error propagation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use dbot_core::{Chat, DbotError, Handler, HandlerError, HandlerResponse, Message, User};
use handler_chain::HandlerChain;

fn create_test_message(content: &str) -> Message {
    Message {
        id: "42".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("anna".to_string()),
            first_name: Some("Anna".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        created_at: Utc::now(),
    }
}

/// Records every phase it sees into a shared log.
struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
    response: HandlerResponse,
}

impl Recorder {
    fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>, response: HandlerResponse) -> Self {
        Self { name, log, response }
    }
}

#[async_trait::async_trait]
impl Handler for Recorder {
    async fn before(&self, _message: &Message) -> dbot_core::Result<bool> {
        self.log.lock().unwrap().push(format!("before_{}", self.name));
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
        self.log.lock().unwrap().push(format!("handle_{}", self.name));
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> dbot_core::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("after_{}:{:?}", self.name, response));
        Ok(())
    }
}

/// **Test: Phases run before (in order) → handle → after (reverse).**
///
/// **Setup:** Two recorders that both return Continue.
/// **Action:** `chain.handle(&message)`.
/// **Expected:** before_first, before_second, handle_first, handle_second, after_second, after_first.
#[tokio::test]
async fn test_phases_executed_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Recorder::new("first", log.clone(), HandlerResponse::Continue)))
        .add_handler(Arc::new(Recorder::new("second", log.clone(), HandlerResponse::Continue)));

    let result = chain.handle(&create_test_message("/summary")).await.unwrap();

    assert_eq!(result, HandlerResponse::Continue);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "before_first",
            "before_second",
            "handle_first",
            "handle_second",
            "after_second:Continue",
            "after_first:Continue",
        ]
    );
}

/// **Test: A before hook returning false stops the chain; no handle runs.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    struct Gate;

    #[async_trait::async_trait]
    impl Handler for Gate {
        async fn before(&self, _message: &Message) -> dbot_core::Result<bool> {
            Ok(false)
        }
    }

    let handle_count = Arc::new(AtomicUsize::new(0));

    struct Counter(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl Handler for Counter {
        async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(HandlerResponse::Continue)
        }
    }

    let chain = HandlerChain::new()
        .add_handler(Arc::new(Gate))
        .add_handler(Arc::new(Counter(handle_count.clone())));

    let result = chain.handle(&create_test_message("/register")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert_eq!(handle_count.load(Ordering::SeqCst), 0);
}

/// **Test: Reply ends the handle phase and is what after hooks receive.**
///
/// **Setup:** Ignore handler, Reply handler, Continue handler.
/// **Expected:** The third handler's handle never runs; every after sees the Reply.
#[tokio::test]
async fn test_reply_ends_handle_phase() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let reply = HandlerResponse::Reply("Noted: 7 h 30 min".to_string());
    let chain = HandlerChain::new()
        .add_handler(Arc::new(Recorder::new("ignore", log.clone(), HandlerResponse::Ignore)))
        .add_handler(Arc::new(Recorder::new("reply", log.clone(), reply.clone())))
        .add_handler(Arc::new(Recorder::new("late", log.clone(), HandlerResponse::Continue)));

    let result = chain.handle(&create_test_message("/y 07 30")).await.unwrap();

    assert_eq!(result, reply);
    let log = log.lock().unwrap();
    assert!(log.contains(&"handle_ignore".to_string()));
    assert!(log.contains(&"handle_reply".to_string()));
    assert!(!log.contains(&"handle_late".to_string()));
    let afters: Vec<_> = log.iter().filter(|l| l.starts_with("after_")).collect();
    assert_eq!(afters.len(), 3);
    assert!(afters.iter().all(|l| l.ends_with("Reply(\"Noted: 7 h 30 min\")")));
}

/// **Test: A handler error is returned to the caller.**
#[tokio::test]
async fn test_handler_error_propagates() {
    struct Failing;

    #[async_trait::async_trait]
    impl Handler for Failing {
        async fn handle(&self, _message: &Message) -> dbot_core::Result<HandlerResponse> {
            Err(HandlerError::UnknownSender.into())
        }
    }

    let chain = HandlerChain::new().add_handler(Arc::new(Failing));
    let err = chain.handle(&create_test_message("")).await.unwrap_err();

    assert!(matches!(err, DbotError::Handler(HandlerError::UnknownSender)));
}

#[test]
fn test_len_and_is_empty() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = chain.add_handler(Arc::new(Recorder::new("a", log, HandlerResponse::Continue)));
    assert_eq!(chain.len(), 1);
    assert!(!chain.is_empty());
}
