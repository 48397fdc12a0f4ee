//! Integration tests for [`poll_handlers::StrawpollHandler`] driven through a [`HandlerChain`].
//!
//! The poll API is either a mockito server behind the real [`StrawpollClient`] or an in-process
//! fake; replies are captured by a recording [`Bot`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dbot_core::{Bot, Chat, HandlerResponse, Message, User};
use handler_chain::HandlerChain;
use mockito::Matcher;
use poll_handlers::{SessionRegistry, Stage, StrawpollHandler};
use serde_json::json;
use strawpoll_client::{
    CreatedPoll, PollApi, PollDefinition, PollResult, StrawpollClient, StrawpollConfig,
    StrawpollError,
};

const USER_ID: i64 = 123;
const CHAT_ID: i64 = 456;

/// Records every reply instead of sending it.
#[derive(Default)]
struct RecordingBot {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingBot {
    fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    fn last(&self) -> String {
        self.texts().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> dbot_core::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }
}

/// Fake API: counts submissions and fails them with the configured error kind.
struct FailingApi {
    submissions: AtomicUsize,
}

#[async_trait]
impl PollApi for FailingApi {
    async fn submit_poll(&self, _poll: &PollDefinition) -> strawpoll_client::Result<CreatedPoll> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        Err(StrawpollError::MissingId)
    }

    async fn fetch_results(&self, _poll_id: &str) -> strawpoll_client::Result<PollResult> {
        Err(StrawpollError::MissingId)
    }
}

struct Harness {
    chain: HandlerChain,
    bot: Arc<RecordingBot>,
    sessions: Arc<SessionRegistry>,
}

impl Harness {
    fn new(api: Arc<dyn PollApi>) -> Self {
        let bot = Arc::new(RecordingBot::default());
        let sessions = Arc::new(SessionRegistry::new());
        let handler = StrawpollHandler::new(sessions.clone(), api, bot.clone());
        let chain = HandlerChain::new().add_handler(Arc::new(handler));
        Self {
            chain,
            bot,
            sessions,
        }
    }

    fn with_server(server: &mockito::ServerGuard) -> Self {
        let client = StrawpollClient::new(StrawpollConfig {
            api_url: format!("{}/api/v2/polls", server.url()),
            poll_url: server.url(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        Self::new(Arc::new(client))
    }

    /// Client pointed at a local port nobody listens on.
    fn unreachable() -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let base = format!("http://{}", addr);
        let client = StrawpollClient::new(StrawpollConfig {
            api_url: format!("{}/api/v2/polls", base),
            poll_url: base,
            timeout: Duration::from_secs(2),
        })
        .unwrap();
        Self::new(Arc::new(client))
    }

    async fn say_in(&self, chat_id: i64, text: &str) -> HandlerResponse {
        let message = Message::new(
            "1",
            User {
                id: USER_ID,
                username: Some("poller".to_string()),
                first_name: None,
                last_name: None,
            },
            Chat {
                id: chat_id,
                chat_type: "group".to_string(),
            },
            text,
        );
        self.chain.handle(&message).await.unwrap()
    }

    async fn say(&self, text: &str) -> HandlerResponse {
        self.say_in(CHAT_ID, text).await
    }
}

/// **Test: full dialogue submits the exact payload and announces id + URL; session removed.**
#[tokio::test]
async fn test_create_poll_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/polls")
        .match_body(Matcher::Json(json!({
            "title": "Best color?",
            "options": ["Red", "Blue"],
            "multi": true,
            "captcha": false,
            "dupcheck": "normal"
        })))
        .with_status(201)
        .with_body(r#"{"id": 42}"#)
        .create_async()
        .await;
    let h = Harness::with_server(&server);

    for text in ["strawpoll create", "Best color?", "Red", "Blue", "done", "yes"] {
        assert!(matches!(h.say(text).await, HandlerResponse::Reply(_)));
    }
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().stage(), Stage::Captcha);

    let response = h.say("no").await;

    mock.assert_async().await;
    let reply = h.bot.last();
    assert_eq!(response, HandlerResponse::Reply(reply.clone()));
    assert!(reply.contains("42"));
    assert!(reply.ends_with("/42"), "{}", reply);
    assert!(h.sessions.get_session(USER_ID).is_none());
    assert!(h.bot.sent.lock().unwrap().iter().all(|(chat, _)| *chat == CHAT_ID));
}

/// **Test: view prints the quoted title and one line per option in API order.**
#[tokio::test]
async fn test_view_results() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/polls/42")
        .with_status(200)
        .with_body(r#"{"title":"Best color?","multi":true,"options":["Red","Blue"],"votes":[3,5]}"#)
        .create_async()
        .await;
    let h = Harness::with_server(&server);

    h.say("strawpoll view 42").await;

    let lines: Vec<String> = h.bot.last().lines().map(String::from).collect();
    assert_eq!(lines, vec!["\"Best color?\"", "Red: 3", "Blue: 5"]);
}

/// **Test: error-marked results body yields the lookup-failure reply, not an error.**
#[tokio::test]
async fn test_view_unknown_poll() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/polls/badid")
        .with_status(200)
        .with_body(r#"{"error":"Poll not found"}"#)
        .create_async()
        .await;
    let h = Harness::with_server(&server);

    let response = h.say("strawpoll view badid").await;

    assert!(matches!(response, HandlerResponse::Reply(_)));
    let reply = h.bot.last();
    assert!(reply.starts_with("Could not get results of the poll \"badid\""));
    assert!(reply.contains("Is it a valid poll id?"));
}

/// **Test: a server error on create still removes the session; a new create starts fresh.**
#[tokio::test]
async fn test_submission_failure_removes_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/polls")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let h = Harness::with_server(&server);

    for text in ["strawpoll create", "T", "A", "B", "done", "no", "yes"] {
        h.say(text).await;
    }

    mock.assert_async().await;
    assert!(h.bot.last().starts_with("Could not create the poll!"));
    assert!(h.sessions.get_session(USER_ID).is_none());

    h.say("strawpoll create").await;
    let fresh = h.sessions.get_session(USER_ID).unwrap();
    assert_eq!(fresh.stage(), Stage::Title);
    assert!(fresh.options().is_empty());
}

/// **Test: a second create is refused and the open builder is untouched.**
#[tokio::test]
async fn test_second_create_is_refused() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    h.say("strawpoll create").await;
    h.say("Best color?").await;
    h.say("Red").await;
    let before = h.sessions.get_session(USER_ID).unwrap();

    h.say("spoll create").await;

    assert!(h.bot.last().starts_with("You are already in the process of creating a poll!"));
    assert_eq!(h.sessions.get_session(USER_ID).unwrap(), before);
}

/// **Test: "done" with one option is rejected; a second option then "done" reaches MULTI.**
#[tokio::test]
async fn test_options_need_two_answers() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    for text in ["strawpoll create", "Title", "Only"] {
        h.say(text).await;
    }
    h.say("done").await;
    assert!(h.bot.last().starts_with("You need to set at least 2 poll answers!"));
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().stage(), Stage::Options);

    h.say("Second").await;
    h.say("Done").await;
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().stage(), Stage::Multi);
}

/// **Test: invalid yes/no answers re-prompt without submitting; exit cancels.**
#[tokio::test]
async fn test_invalid_answers_and_exit() {
    let api = Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    });
    let h = Harness::new(api.clone());

    for text in ["strawpoll create", "T", "A", "B", "done", "YES"] {
        h.say(text).await;
    }
    h.say("perhaps").await;
    assert!(h.bot.last().starts_with("Invalid input \"perhaps\"!"));
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().stage(), Stage::Captcha);
    assert_eq!(api.submissions.load(Ordering::SeqCst), 0);

    h.say("EXIT").await;
    assert!(h.bot.last().starts_with("Exited the poll creation!"));
    assert!(h.sessions.get_session(USER_ID).is_none());
    assert_eq!(api.submissions.load(Ordering::SeqCst), 0);
}

/// **Test: failed submission without transport error asks the user to check the setup.**
#[tokio::test]
async fn test_missing_id_reply() {
    let api = Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    });
    let h = Harness::new(api.clone());

    for text in ["strawpoll create", "T", "A", "B", "done", "no", "no"] {
        h.say(text).await;
    }

    assert_eq!(api.submissions.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.bot.last(),
        "Could not create the poll! Make sure you setup the poll correctly."
    );
    assert!(h.sessions.is_empty());
}

/// **Test: ordinary chat, other chats and non-text messages pass through untouched.**
#[tokio::test]
async fn test_unowned_messages_continue() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    assert_eq!(h.say("hello everyone").await, HandlerResponse::Continue);

    h.say("strawpoll create").await;
    let sent_before = h.bot.texts().len();

    assert_eq!(h.say_in(CHAT_ID + 1, "Title from elsewhere").await, HandlerResponse::Continue);
    assert_eq!(h.say_in(CHAT_ID + 1, "exit").await, HandlerResponse::Continue);
    assert_eq!(h.say("").await, HandlerResponse::Continue);

    assert_eq!(h.bot.texts().len(), sent_before);
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().stage(), Stage::Title);
}

/// **Test: usage and argument errors.**
#[tokio::test]
async fn test_usage_replies() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    h.say("strawpoll").await;
    assert!(h.bot.last().starts_with("Usage:"));

    h.say("/strawpoll frobnicate").await;
    assert!(h.bot.last().starts_with("Usage:"));

    h.say("strawpoll view").await;
    assert!(h.bot.last().starts_with("Invalid command arguments!"));
    assert!(h.sessions.is_empty());
}

/// **Test: an unreachable API on create reports the transport error and drops the session.**
#[tokio::test]
async fn test_create_transport_failure_reports_error() {
    let h = Harness::unreachable();

    for text in ["strawpoll create", "T", "A", "B", "done", "no"] {
        h.say(text).await;
    }
    let response = h.say("yes").await;

    let reply = h.bot.last();
    assert_eq!(response, HandlerResponse::Reply(reply.clone()));
    assert!(reply.starts_with("Could not create the poll! "), "{}", reply);
    assert!(!reply.contains("Make sure you setup the poll correctly."));
    assert!(reply.len() > "Could not create the poll! ".len());
    assert!(h.sessions.is_empty());
}

/// **Test: an unreachable API on view reads exactly like an unknown poll id.**
#[tokio::test]
async fn test_view_transport_failure_reads_like_not_found() {
    let h = Harness::unreachable();

    let response = h.say("strawpoll view 42").await;

    assert!(matches!(response, HandlerResponse::Reply(_)));
    assert_eq!(h.bot.last(), poll_handlers::messages::lookup_failed("42"));
}

/// **Test: dialogue text starting with the command name or an alias feeds the builder.**
#[tokio::test]
async fn test_alias_words_are_dialogue_input_inside_a_session() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    h.say("strawpoll create").await;
    h.say("Strawpoll night: which movie?").await;
    h.say("Movie A").await;
    h.say("spoll").await;
    h.say("strawpoll view from the balcony").await;

    let builder = h.sessions.get_session(USER_ID).unwrap();
    assert_eq!(builder.title(), Some("Strawpoll night: which movie?"));
    assert_eq!(
        builder.options(),
        ["Movie A", "spoll", "strawpoll view from the balcony"]
    );
    assert!(h.bot.last().starts_with("Added \"strawpoll view from the balcony\""));

    // Exact command forms still act as commands.
    h.say("spoll create").await;
    assert!(h.bot.last().starts_with("You are already in the process of creating a poll!"));
    assert_eq!(h.sessions.get_session(USER_ID).unwrap().options().len(), 3);
}

/// **Test: outside a session the same words are still the command.**
#[tokio::test]
async fn test_alias_words_are_commands_without_a_session() {
    let h = Harness::new(Arc::new(FailingApi {
        submissions: AtomicUsize::new(0),
    }));

    h.say("spoll").await;
    assert!(h.bot.last().starts_with("Usage:"));
    assert!(h.sessions.is_empty());
}
