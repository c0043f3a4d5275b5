//! Positional argument binding for bot commands.
//!
//! Commands declare their parameters by pulling typed values off the argument text in
//! order.  A failure names the parameter so the user is told exactly what was wrong,
//! rather than getting a stack trace or silence.

use serenity::all::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    #[error("⚠️ Missing argument: `{0}`")]
    Missing(&'static str),
    #[error("⚠️ Invalid argument: `{0}`")]
    Invalid(&'static str),
}

/// The argument text following a command token.
pub struct Args<'a> {
    rest: &'a str,
}

impl<'a> Args<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { rest: raw.trim() }
    }

    /// Pop the next whitespace-delimited token.  Double quotes group words into a
    /// single token; an unterminated quote runs to the end of the line.
    fn next_token(&mut self) -> Option<&'a str> {
        self.rest = self.rest.trim_start();
        if self.rest.is_empty() {
            return None;
        }

        if let Some(quoted) = self.rest.strip_prefix('"') {
            return match quoted.find('"') {
                Some(end) => {
                    let token = &quoted[..end];
                    self.rest = &quoted[end + 1..];
                    Some(token)
                }
                None => {
                    self.rest = "";
                    Some(quoted)
                }
            };
        }

        match self.rest.find(char::is_whitespace) {
            Some(end) => {
                let token = &self.rest[..end];
                self.rest = &self.rest[end..];
                Some(token)
            }
            None => {
                let token = self.rest;
                self.rest = "";
                Some(token)
            }
        }
    }

    pub fn string(&mut self, name: &'static str) -> Result<&'a str, ArgError> {
        self.next_token().ok_or(ArgError::Missing(name))
    }

    pub fn integer<T: std::str::FromStr>(&mut self, name: &'static str) -> Result<T, ArgError> {
        let token = self.next_token().ok_or(ArgError::Missing(name))?;
        token.parse().map_err(|_| ArgError::Invalid(name))
    }

    /// A `<@123>` / `<@!123>` mention, or a bare numeric user id.
    pub fn user_mention(&mut self, name: &'static str) -> Result<UserId, ArgError> {
        let token = self.next_token().ok_or(ArgError::Missing(name))?;
        parse_user_mention(token).ok_or(ArgError::Invalid(name))
    }

    /// Everything remaining on the line, whitespace and all.
    pub fn rest_of_line(&mut self, name: &'static str) -> Result<&'a str, ArgError> {
        let rest = std::mem::take(&mut self.rest).trim();
        if rest.is_empty() {
            Err(ArgError::Missing(name))
        } else {
            Ok(rest)
        }
    }
}

fn parse_user_mention(token: &str) -> Option<UserId> {
    let id = match token.strip_prefix("<@").and_then(|t| t.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => token,
    };

    id.parse::<u64>().ok().map(UserId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_split_on_whitespace() {
        let mut args = Args::new("rust-study weekly 48");
        assert_eq!(args.string("name"), Ok("rust-study"));
        assert_eq!(args.string("description"), Ok("weekly"));
        assert_eq!(args.integer::<u32>("duration"), Ok(48));
    }

    #[test]
    fn quoted_token_groups_words() {
        let mut args = Args::new("\"Rust study group\" \"meet every week\" 48");
        assert_eq!(args.string("name"), Ok("Rust study group"));
        assert_eq!(args.string("description"), Ok("meet every week"));
        assert_eq!(args.integer::<u32>("duration"), Ok(48));
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let mut args = Args::new("\"no closing quote here");
        assert_eq!(args.string("name"), Ok("no closing quote here"));
        assert_eq!(args.string("next"), Err(ArgError::Missing("next")));
    }

    #[test]
    fn missing_and_invalid_name_the_parameter() {
        let mut args = Args::new("");
        assert_eq!(args.integer::<u64>("seconds"), Err(ArgError::Missing("seconds")));

        let mut args = Args::new("soon");
        assert_eq!(args.integer::<u64>("seconds"), Err(ArgError::Invalid("seconds")));
    }

    #[test]
    fn mentions_parse_in_both_formats_and_bare() {
        for token in ["<@123456>", "<@!123456>", "123456"] {
            let mut args = Args::new(token);
            assert_eq!(args.user_mention("user"), Ok(UserId::new(123456)));
        }

        let mut args = Args::new("@somebody");
        assert_eq!(args.user_mention("user"), Err(ArgError::Invalid("user")));
    }

    #[test]
    fn rest_of_line_keeps_interior_whitespace() {
        let mut args = Args::new("15 water the plants  twice");
        assert_eq!(args.integer::<u64>("minutes"), Ok(15));
        assert_eq!(args.rest_of_line("reminder"), Ok("water the plants  twice"));
    }

    #[test]
    fn rest_of_line_empty_is_missing() {
        let mut args = Args::new("15");
        let _ = args.integer::<u64>("minutes");
        assert_eq!(args.rest_of_line("reminder"), Err(ArgError::Missing("reminder")));
    }
}
