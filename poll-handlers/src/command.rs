//! Parsing of the `strawpoll` chat command.

/// Command name and aliases, matched case-insensitively.
pub const COMMAND_NAMES: &[&str] = &["strawpoll", "strawpoll.me", "strawvote", "spoll"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrawpollCommand {
    /// No or unknown sub-command.
    Usage,
    /// `view` without an id.
    MissingViewId,
    View(String),
    Create,
}

/// Parses `[/]strawpoll[@bot] [view <id> | create]`. Returns `None` when the message is not this command.
pub fn parse_command(text: &str) -> Option<StrawpollCommand> {
    let mut words = text.split_whitespace();
    let head = words.next()?;
    let head = head.strip_prefix('/').unwrap_or(head);
    let name = head.split('@').next().unwrap_or(head);
    if !COMMAND_NAMES.iter().any(|n| n.eq_ignore_ascii_case(name)) {
        return None;
    }

    let sub = words.next().map(str::to_lowercase);
    let command = match sub.as_deref() {
        Some("view") => match words.next() {
            Some(id) => StrawpollCommand::View(id.to_string()),
            None => StrawpollCommand::MissingViewId,
        },
        Some("create") => StrawpollCommand::Create,
        _ => StrawpollCommand::Usage,
    };
    Some(command)
}

/// Narrow form checked while the user has an open builder in the chat: only `create` and
/// `view <id>` with nothing after them count. Anything else is dialogue input.
pub fn parse_session_command(text: &str) -> Option<StrawpollCommand> {
    let command = parse_command(text)?;
    let words = text.split_whitespace().count();
    match (&command, words) {
        (StrawpollCommand::Create, 2) | (StrawpollCommand::View(_), 3) => Some(command),
        _ => None,
    }
}
