//! Text commands.
//!
//! Every input line becomes a [`Command`]. Lines starting with `/` are
//! commands; anything else is message text for the open conversation.

use thiserror::Error;

/// Command parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Unknown `/command`.
    #[error("unknown command: /{0}")]
    Unknown(String),

    /// Required argument missing.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Numeric argument did not parse.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// A user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// Sign out.
    Logout,
    /// Show the chat list, optionally filtered.
    Chats {
        /// Username filter.
        query: String,
    },
    /// Search the user directory.
    Users {
        /// Username filter.
        query: String,
    },
    /// Start a chat with a user from the directory.
    Start {
        /// User id.
        user_id: String,
    },
    /// Open the conversation with a contact.
    Open {
        /// Contact id.
        contact: String,
    },
    /// Close the open conversation.
    Close,
    /// Attach a picked file to the open conversation.
    Attach {
        /// Picker hint, e.g. a file path. May be empty.
        path: String,
    },
    /// Reveal one-time-view media.
    View {
        /// Message id.
        message: String,
    },
    /// Toggle a reaction.
    React {
        /// Message id.
        message: String,
        /// Emoji symbol.
        emoji: String,
    },
    /// Send a disappearing message.
    Vanish {
        /// TTL in seconds. `None` uses the default timer.
        secs: Option<u64>,
        /// Message text.
        text: String,
    },
    /// Toggle notifications.
    Notifications,
    /// Set the default disappearing timer.
    Timer {
        /// Seconds.
        secs: u64,
    },
    /// Change the username.
    Rename {
        /// New username.
        name: String,
    },
    /// Show the command list.
    Help,
    /// Quit.
    Quit,
    /// Send text to the open conversation.
    Say(String),
}

/// Command reference shown by `/help`.
pub const HELP: &str = "/login <user> <pass>  /logout  /chats [query]  /users [query]  \
/start <user-id>  /open <contact>  /close  /attach [path]  /view <msg>  /react <msg> <emoji>  \
/vanish [secs] <text>  /notifications  /timer <secs>  /rename <name>  /quit";

impl Command {
    /// Parse an input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Say(line.to_string()));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        match name {
            "login" => {
                let mut parts = args.split_whitespace();
                let username = parts.next().unwrap_or_default().to_string();
                let password = parts.next().unwrap_or_default().to_string();
                Ok(Self::Login { username, password })
            },
            "logout" => Ok(Self::Logout),
            "chats" => Ok(Self::Chats { query: args.to_string() }),
            "users" => Ok(Self::Users { query: args.to_string() }),
            "start" => {
                Ok(Self::Start { user_id: required(args, "/start <user-id>")?.to_string() })
            },
            "open" => Ok(Self::Open { contact: required(args, "/open <contact>")?.to_string() }),
            "close" => Ok(Self::Close),
            "attach" => Ok(Self::Attach { path: args.to_string() }),
            "view" => Ok(Self::View { message: required(args, "/view <msg>")?.to_string() }),
            "react" => {
                let (message, emoji) = args
                    .split_once(char::is_whitespace)
                    .map(|(m, e)| (m, e.trim()))
                    .filter(|(_, e)| !e.is_empty())
                    .ok_or(CommandError::Usage("/react <msg> <emoji>"))?;
                Ok(Self::React { message: message.to_string(), emoji: emoji.to_string() })
            },
            "vanish" => {
                let args = required(args, "/vanish [secs] <text>")?;
                match args.split_once(char::is_whitespace) {
                    Some((first, text)) if first.parse::<u64>().is_ok() => Ok(Self::Vanish {
                        secs: first.parse().ok(),
                        text: text.trim().to_string(),
                    }),
                    _ => Ok(Self::Vanish { secs: None, text: args.to_string() }),
                }
            },
            "notifications" => Ok(Self::Notifications),
            "timer" => {
                let secs = required(args, "/timer <secs>")?;
                secs.parse()
                    .map(|secs| Self::Timer { secs })
                    .map_err(|_| CommandError::InvalidNumber(secs.to_string()))
            },
            "rename" => Ok(Self::Rename { name: args.to_string() }),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn required<'a>(args: &'a str, usage: &'static str) -> Result<&'a str, CommandError> {
    if args.is_empty() { Err(CommandError::Usage(usage)) } else { Ok(args) }
}
