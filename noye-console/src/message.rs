//! Chat message types and identity parsing.
//!
//! The console fabricates these and feeds them to the script manager as if
//! they had arrived from a real connection.

use std::fmt;

/// A user identity in `nick!user@host` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub nick: String,
    pub user: String,
    pub host: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.user, self.host)
    }
}

/// Parses a `nick!user@host` identity string.
///
/// Missing segments are left empty rather than rejected; the console builds
/// identities itself, so a lenient parse is all that is needed.
pub fn parse_user(raw: &str) -> User {
    let (nick, rest) = raw.split_once('!').unwrap_or((raw, ""));
    let (user, host) = rest.split_once('@').unwrap_or((rest, ""));
    User {
        nick: nick.to_string(),
        user: user.to_string(),
        host: host.to_string(),
    }
}

/// A fabricated chat message delivered through [`crate::sandbox::Manager::respond`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: User,
    pub target: String,
    pub text: String,
}

/// A fabricated low-level protocol event delivered through
/// [`crate::sandbox::Manager::listen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub source: User,
    pub command: String,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_identity() {
        let user = parse_user("test!user@localhost");
        assert_eq!(user.nick, "test");
        assert_eq!(user.user, "user");
        assert_eq!(user.host, "localhost");
        assert_eq!(user.to_string(), "test!user@localhost");
    }

    #[test]
    fn tolerates_partial_identities() {
        let nick_only = parse_user("test");
        assert_eq!(nick_only.nick, "test");
        assert!(nick_only.user.is_empty());
        assert!(nick_only.host.is_empty());

        let no_host = parse_user("test!user");
        assert_eq!(no_host.user, "user");
        assert!(no_host.host.is_empty());
    }
}
