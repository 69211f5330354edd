// Command registry - turns a typed line into a `Command`.
//
// Every command key is two tokens, `critter` followed by a verb. The key
// selects an entry in `REGISTRY`; that entry's parser checks the
// remaining tokens. Parsing does no I/O, so the whole grammar is tested
// here without a network or a terminal.

use crate::api::Credentials;
use crate::error::{CritterError, Result};

pub const PREFIX: &str = "critter";
pub const EXIT: &str = "exit";

pub mod usage {
    pub const REGISTER: &str = "critter register <username> <password>";
    pub const LOGIN: &str = "critter login <username> <password>";
    pub const ADMIN: &str = "critter admin users | critter admin remove <userid>";
    pub const FRIENDS: &str =
        "critter friends all | critter friends pending | critter friends add <username>";
}

/// A fully parsed, ready to run command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(Credentials),
    Login(Credentials),
    AdminUsers,
    AdminRemove(i64),
    FriendsAll,
    FriendsPending,
    FriendsAdd(String),
    Help,
    Exit,
}

/// One line of the help screen.
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

/// Everything `critter help` prints, in display order.
pub static REFERENCE: &[CommandHelp] = &[
    CommandHelp {
        usage: usage::REGISTER,
        description: "Create a new account",
    },
    CommandHelp {
        usage: usage::LOGIN,
        description: "Log in and remember the user for friends commands",
    },
    CommandHelp {
        usage: "critter admin users",
        description: "List every registered user",
    },
    CommandHelp {
        usage: "critter admin remove <userid>",
        description: "Delete the user with the given numeric id",
    },
    CommandHelp {
        usage: "critter friends all",
        description: "List your friends",
    },
    CommandHelp {
        usage: "critter friends pending",
        description: "List friend requests waiting on you",
    },
    CommandHelp {
        usage: "critter friends add <username>",
        description: "Send a friend request",
    },
    CommandHelp {
        usage: "critter help",
        description: "Show this list",
    },
    CommandHelp {
        usage: "exit",
        description: "Quit",
    },
];

/// A registered two-token key and the parser for its arguments.
struct Entry {
    key: &'static str,
    parse: fn(&[&str]) -> Result<Command>,
}

static REGISTRY: &[Entry] = &[
    Entry {
        key: "critter register",
        parse: parse_register,
    },
    Entry {
        key: "critter login",
        parse: parse_login,
    },
    Entry {
        key: "critter admin",
        parse: parse_admin,
    },
    Entry {
        key: "critter friends",
        parse: parse_friends,
    },
];

fn find_entry(key: &str) -> Option<&'static Entry> {
    REGISTRY.iter().find(|entry| entry.key == key)
}

/// Registry key for a token list: the first two tokens, lowercased.
pub fn command_key(tokens: &[&str]) -> String {
    tokens
        .iter()
        .take(2)
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Command {
    /// Parse one input line.
    ///
    /// Blank lines are `Invalid`, unregistered keys are `UnknownCommand`
    /// carrying the trimmed input, and argument problems are `Usage` or
    /// `InvalidUserId`.
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CritterError::Invalid);
        }
        if line.eq_ignore_ascii_case(EXIT) {
            return Ok(Command::Exit);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let key = command_key(&tokens);

        if key == "critter help" && tokens.len() == 2 {
            return Ok(Command::Help);
        }

        match find_entry(&key) {
            Some(entry) => (entry.parse)(&tokens),
            None => Err(CritterError::UnknownCommand(line.to_string())),
        }
    }
}

fn parse_credentials(tokens: &[&str], usage: &'static str) -> Result<Credentials> {
    match tokens {
        [_, _, username, password] => Ok(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => Err(CritterError::Usage(usage)),
    }
}

fn parse_register(tokens: &[&str]) -> Result<Command> {
    parse_credentials(tokens, usage::REGISTER).map(Command::Register)
}

fn parse_login(tokens: &[&str]) -> Result<Command> {
    parse_credentials(tokens, usage::LOGIN).map(Command::Login)
}

fn sub_action(tokens: &[&str]) -> Option<String> {
    tokens.get(2).map(|t| t.to_lowercase())
}

fn parse_admin(tokens: &[&str]) -> Result<Command> {
    match (sub_action(tokens).as_deref(), tokens.len()) {
        (Some("users"), 3) => Ok(Command::AdminUsers),
        (Some("remove"), 4) => {
            let raw = tokens[3];
            raw.parse::<i64>()
                .map(Command::AdminRemove)
                .map_err(|_| CritterError::InvalidUserId(raw.to_string()))
        }
        _ => Err(CritterError::Usage(usage::ADMIN)),
    }
}

fn parse_friends(tokens: &[&str]) -> Result<Command> {
    match (sub_action(tokens).as_deref(), tokens.len()) {
        (Some("all"), 3) => Ok(Command::FriendsAll),
        (Some("pending"), 3) => Ok(Command::FriendsPending),
        (Some("add"), 4) => Ok(Command::FriendsAdd(tokens[3].to_string())),
        _ => Err(CritterError::Usage(usage::FRIENDS)),
    }
}
