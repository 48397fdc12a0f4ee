//! Reply texts of the strawpoll command and the poll builder dialogue.

use strawpoll_client::{CreatedPoll, PollResult, StrawpollError};

use crate::builder::{InvalidInput, Stage};

pub const EXIT_HINT: &str = "Say \"exit\" to cancel the poll creation at any time.";

const ASK_TITLE: &str = ">> What should the topic of the poll (the title) be?";
const ASK_MORE_OPTIONS: &str =
    ">> To add another answer, send a new message.\n>> Once you have finished, say \"done\".";
const ASK_MULTI: &str = ">> Should voters be allowed to vote on multiple answers? (yes/no)";
const ASK_CAPTCHA: &str = ">> Should voters have to fill in a captcha before voting? (yes/no)\n\
This prevents the poll from being 'botted' and uses Google's 'one click' captcha system";

pub const INVALID_ARGUMENTS: &str = "Invalid command arguments!";

pub const CANCELLED: &str =
    "Exited the poll creation! Create another one any time with 'strawpoll create'.";

pub fn usage() -> String {
    "Usage:\
     \nstrawpoll view [id] - shows results for the poll (you find the id at the end of the URL)\
     \nstrawpoll create - makes a new poll using the poll builder"
        .to_string()
}

pub fn missing_view_id() -> String {
    format!("{}\n{}", INVALID_ARGUMENTS, usage())
}

pub fn session_started() -> String {
    format!(
        "Created a new poll. You are now in the poll builder. {}\n{}",
        EXIT_HINT, ASK_TITLE
    )
}

pub fn already_in_progress() -> String {
    "You are already in the process of creating a poll! To exit this, say \"exit\". \
     If you are not in the chat you created it in, please go back to that chat and say \"exit\" in there."
        .to_string()
}

pub fn title_set(title: &str) -> String {
    format!(
        "Set the poll topic to \"{}\". {}\n>> What should the poll answers be? Say each answer in a new message.\n>> Once you have finished, say \"done\".",
        title, EXIT_HINT
    )
}

pub fn option_added(option: &str) -> String {
    format!(
        "Added \"{}\" as an answer to the poll. {}\n{}",
        option, EXIT_HINT, ASK_MORE_OPTIONS
    )
}

pub fn options_locked(count: usize) -> String {
    format!("Set the {} poll answers! {}\n{}", count, EXIT_HINT, ASK_MULTI)
}

pub fn multi_set(allowed: bool) -> String {
    format!(
        "Multi-votes allowed? \"{}\" {}\n{}",
        yes_no(allowed),
        EXIT_HINT,
        ASK_CAPTCHA
    )
}

/// Re-prompt for the step that rejected the input.
pub fn rejected(invalid: &InvalidInput, stage: Stage) -> String {
    match invalid {
        InvalidInput::TooFewOptions { .. } => format!(
            "You need to set at least 2 poll answers! {}\n>> To add an answer, send a new message.\n>> Once you have finished, say \"done\".",
            EXIT_HINT
        ),
        InvalidInput::NotYesNo { input, .. } => {
            format!("Invalid input \"{}\"! {}\n{}", input, EXIT_HINT, ask_for(stage))
        }
        InvalidInput::Empty | InvalidInput::AlreadyDone => {
            format!("{}\n{}", EXIT_HINT, ask_for(stage))
        }
    }
}

fn ask_for(stage: Stage) -> &'static str {
    match stage {
        Stage::Title => ASK_TITLE,
        Stage::Options => ASK_MORE_OPTIONS,
        Stage::Multi => ASK_MULTI,
        Stage::Captcha | Stage::Done => ASK_CAPTCHA,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn created(poll: &CreatedPoll) -> String {
    format!("Poll created with id \"{}\": {}", poll.id, poll.url)
}

/// Transport failures carry their description; everything else points at the poll setup.
pub fn submission_failed(error: &StrawpollError) -> String {
    match error {
        StrawpollError::Transport(e) => format!("Could not create the poll! {}", e),
        _ => "Could not create the poll! Make sure you setup the poll correctly.".to_string(),
    }
}

pub fn lookup_failed(poll_id: &str) -> String {
    format!(
        "Could not get results of the poll \"{}\". Is it a valid poll id? (You find this at the end of the poll link)",
        poll_id
    )
}

/// Quoted title, then one `<option>: <count>` line per option in API order.
pub fn results(result: &PollResult) -> String {
    let mut text = format!("\"{}\"", result.title);
    for (option, count) in &result.votes {
        text.push_str(&format!("\n{}: {}", option, count));
    }
    text
}
