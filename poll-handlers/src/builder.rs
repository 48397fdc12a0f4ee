//! One user's in-progress poll, built step by step from chat messages.

use std::fmt;

use strawpoll_client::PollDefinition;
use thiserror::Error;

/// Ends the OPTIONS step (whole message, case-insensitive).
pub const DONE_KEYWORD: &str = "done";
/// A poll needs at least this many answers.
pub const MIN_OPTIONS: usize = 2;

/// Dialogue step. Only ever moves forward; ordering follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Title,
    Options,
    Multi,
    Captcha,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Title => "title",
            Stage::Options => "options",
            Stage::Multi => "multi",
            Stage::Captcha => "captcha",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful step changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    TitleSet(String),
    OptionAdded(String),
    /// "done" with enough options; now at MULTI.
    OptionsLocked(usize),
    MultiSet(bool),
    /// Captcha answered; the builder is at DONE and this is what to submit.
    Finished(PollDefinition),
}

/// Input the current step does not accept. The builder is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("empty input")]
    Empty,

    #[error("need at least 2 answers, have {count}")]
    TooFewOptions { count: usize },

    #[error("invalid input \"{input}\" at {stage} step, expected yes or no")]
    NotYesNo { stage: Stage, input: String },

    #[error("poll is already complete")]
    AlreadyDone,
}

/// Maps `yes`/`true`/`no`/`false` (any case) to a bool. The whole message must be the token;
/// surrounding whitespace is not stripped.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    let lower = input.to_lowercase();
    match lower.as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

/// Poll definition under construction, bound to the chat it was started in.
///
/// A field is only written by the step that owns it, and only when that step's input is valid,
/// so the getters below report `None` until their step has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollBuilder {
    chat_id: i64,
    stage: Stage,
    title: String,
    options: Vec<String>,
    is_multi: bool,
    is_captcha: bool,
}

impl PollBuilder {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            stage: Stage::Title,
            title: String::new(),
            options: Vec::new(),
            is_multi: false,
            is_captcha: false,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn title(&self) -> Option<&str> {
        (self.stage > Stage::Title).then_some(self.title.as_str())
    }

    /// Options collected so far (growing while at OPTIONS).
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_multi(&self) -> Option<bool> {
        (self.stage > Stage::Multi).then_some(self.is_multi)
    }

    pub fn is_captcha(&self) -> Option<bool> {
        (self.stage > Stage::Captcha).then_some(self.is_captcha)
    }

    /// Feeds one message to the current step.
    pub fn apply(&mut self, input: &str) -> Result<Advance, InvalidInput> {
        if self.stage == Stage::Done {
            return Err(InvalidInput::AlreadyDone);
        }
        if input.trim().is_empty() {
            return Err(InvalidInput::Empty);
        }

        match self.stage {
            Stage::Title => {
                self.title = input.to_string();
                self.stage = Stage::Options;
                Ok(Advance::TitleSet(self.title.clone()))
            }
            Stage::Options if input.eq_ignore_ascii_case(DONE_KEYWORD) => {
                if self.options.len() < MIN_OPTIONS {
                    return Err(InvalidInput::TooFewOptions {
                        count: self.options.len(),
                    });
                }
                self.stage = Stage::Multi;
                Ok(Advance::OptionsLocked(self.options.len()))
            }
            Stage::Options => {
                self.options.push(input.to_string());
                Ok(Advance::OptionAdded(input.to_string()))
            }
            Stage::Multi => {
                self.is_multi = self.yes_no(input)?;
                self.stage = Stage::Captcha;
                Ok(Advance::MultiSet(self.is_multi))
            }
            Stage::Captcha => {
                self.is_captcha = self.yes_no(input)?;
                self.stage = Stage::Done;
                Ok(Advance::Finished(self.definition()))
            }
            Stage::Done => Err(InvalidInput::AlreadyDone),
        }
    }

    fn yes_no(&self, input: &str) -> Result<bool, InvalidInput> {
        parse_yes_no(input).ok_or_else(|| InvalidInput::NotYesNo {
            stage: self.stage,
            input: input.to_string(),
        })
    }

    fn definition(&self) -> PollDefinition {
        PollDefinition::new(
            self.title.clone(),
            self.options.clone(),
            self.is_multi,
            self.is_captcha,
        )
    }
}
