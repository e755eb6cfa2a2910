use std::env;
use std::fmt;

use crate::DEFAULT_SCHEME;

/// Environment variables consulted for the current user name, in order.
const USER_VARIABLES: [&str; 3] = ["USERNAME", "USER", "LOGNAME"];

/// A `user@host` string derived from an incoming URL.
///
/// Parsing never fails. Anything that is not a well-formed URL simply ends up
/// in the target verbatim, where the user can still fix it in the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget(String);

impl ConnectionTarget {
    /// Parse an `ssh://[user@]host[/]` URL.
    pub fn parse(url: &str, user: Option<&str>) -> Self {
        Self::parse_with_scheme(DEFAULT_SCHEME, url, user)
    }

    /// Parse a URL for an arbitrary scheme. Every occurrence of
    /// `<scheme>://` is removed and trailing slashes are trimmed. When no
    /// `@` remains, `user@` is prepended if a user name is known.
    pub fn parse_with_scheme(scheme: &str, url: &str, user: Option<&str>) -> Self {
        let prefix = format!("{scheme}://");
        let stripped = url.replace(&prefix, "");
        let host = stripped.trim_end_matches('/');

        let target = match user.filter(|u| !u.is_empty()) {
            Some(user) if !host.contains('@') => format!("{user}@{host}"),
            _ => host.to_string(),
        };
        log::debug!("parsed '{url}' into target '{target}'");
        ConnectionTarget(target)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The user portion, if the target carries one.
    pub fn user(&self) -> Option<&str> {
        self.0.split_once('@').map(|(user, _)| user)
    }

    /// Everything after the first `@`, or the whole target.
    pub fn host(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(_, host)| host)
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The name of the user running this process, if the environment exposes one.
pub fn current_user() -> Option<String> {
    current_user_from(|name| env::var(name).ok())
}

fn current_user_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    USER_VARIABLES
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}
