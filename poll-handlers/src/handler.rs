//! Strawpoll Handler: `strawpoll view|create` commands plus the poll builder dialogue.

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use strawpoll_client::PollApi;
use tracing::{debug, error, info, instrument, warn};

use crate::builder::Advance;
use crate::command::{parse_command, parse_session_command, StrawpollCommand};
use crate::messages;
use crate::session::{SessionError, SessionEvent, SessionRegistry};

/// Handles the strawpoll command and routes follow-up messages of users with an open builder.
///
/// Every outcome, including API failures, becomes a chat reply; `handle` only errors when the
/// reply itself cannot be sent. Messages it does not own pass through as `Continue`.
#[derive(Clone)]
pub struct StrawpollHandler {
    sessions: Arc<SessionRegistry>,
    api: Arc<dyn PollApi>,
    bot: Arc<dyn Bot>,
}

impl StrawpollHandler {
    pub fn new(sessions: Arc<SessionRegistry>, api: Arc<dyn PollApi>, bot: Arc<dyn Bot>) -> Self {
        Self { sessions, api, bot }
    }

    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    async fn run_command(&self, message: &Message, command: StrawpollCommand) -> String {
        match command {
            StrawpollCommand::Usage => messages::usage(),
            StrawpollCommand::MissingViewId => messages::missing_view_id(),
            StrawpollCommand::View(poll_id) => self.view(&poll_id).await,
            StrawpollCommand::Create => {
                match self.sessions.start_session(message.user.id, message.chat.id) {
                    Ok(_) => messages::session_started(),
                    Err(SessionError::AlreadyInProgress { chat_id }) => {
                        debug!(
                            user_id = message.user.id,
                            session_chat_id = chat_id,
                            "Create refused, session already open"
                        );
                        messages::already_in_progress()
                    }
                }
            }
        }
    }

    /// Results lookup. Transport errors and unknown ids read the same to the user.
    async fn view(&self, poll_id: &str) -> String {
        match self.api.fetch_results(poll_id).await {
            Ok(result) => messages::results(&result),
            Err(e) => {
                warn!(poll_id = %poll_id, error = %e, "Could not get poll results");
                messages::lookup_failed(poll_id)
            }
        }
    }

    async fn on_session_event(&self, message: &Message, event: SessionEvent) -> String {
        match event {
            SessionEvent::Cancelled => messages::CANCELLED.to_string(),
            SessionEvent::Rejected { stage, error } => messages::rejected(&error, stage),
            SessionEvent::Stepped(Advance::Finished(poll)) => {
                // The session is already gone; a failed submission means starting over.
                match self.api.submit_poll(&poll).await {
                    Ok(created) => {
                        info!(
                            user_id = message.user.id,
                            poll_id = created.id,
                            "Poll created"
                        );
                        messages::created(&created)
                    }
                    Err(e) => {
                        error!(user_id = message.user.id, error = %e, "Poll submission failed");
                        messages::submission_failed(&e)
                    }
                }
            }
            SessionEvent::Stepped(Advance::TitleSet(title)) => messages::title_set(&title),
            SessionEvent::Stepped(Advance::OptionAdded(option)) => messages::option_added(&option),
            SessionEvent::Stepped(Advance::OptionsLocked(count)) => messages::options_locked(count),
            SessionEvent::Stepped(Advance::MultiSet(allowed)) => messages::multi_set(allowed),
        }
    }

    async fn reply(&self, message: &Message, text: String) -> Result<HandlerResponse> {
        self.bot.reply_to(message, &text).await?;
        Ok(HandlerResponse::Reply(text))
    }
}

#[async_trait]
impl Handler for StrawpollHandler {
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.trim().is_empty() {
            return Ok(HandlerResponse::Continue);
        }

        // With an open builder here, only the exact command forms bypass the dialogue.
        let command = if self.sessions.has_session_in(message.user.id, message.chat.id) {
            parse_session_command(&message.content)
        } else {
            parse_command(&message.content)
        };
        if let Some(command) = command {
            debug!(command = ?command, "strawpoll command");
            let text = self.run_command(message, command).await;
            return self.reply(message, text).await;
        }

        match self
            .sessions
            .advance(message.user.id, message.chat.id, &message.content)
        {
            Some(event) => {
                let text = self.on_session_event(message, event).await;
                self.reply(message, text).await
            }
            None => Ok(HandlerResponse::Continue),
        }
    }
}
