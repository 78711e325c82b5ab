use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrcError {
    #[error("empty IRC line")]
    Empty,
    #[error("malformed IRC line: {0}")]
    Malformed(String),
}

/// A parsed IRC line with IRCv3 tags. The trailing parameter, if any, is the
/// last entry of `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrcMessage {
    pub tags: HashMap<String, String>,
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcMessage {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Nickname part of a `nick!user@host` prefix.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let nick = prefix.split_once('!').map_or(prefix, |(nick, _)| nick);
        Some(nick)
    }

    pub fn param(&self, idx: usize) -> Option<&str> {
        self.params.get(idx).map(String::as_str)
    }
}

pub fn parse_line(line: &str) -> Result<IrcMessage, IrcError> {
    let mut rest = line.trim_end_matches(&['\r', '\n'][..]);
    if rest.trim().is_empty() {
        return Err(IrcError::Empty);
    }

    let mut message = IrcMessage::default();

    if let Some(tagged) = rest.strip_prefix('@') {
        let (raw_tags, after) = tagged
            .split_once(' ')
            .ok_or_else(|| IrcError::Malformed(line.to_string()))?;
        message.tags = parse_tags(raw_tags);
        rest = after.trim_start();
    }

    if let Some(prefixed) = rest.strip_prefix(':') {
        let (prefix, after) = prefixed
            .split_once(' ')
            .ok_or_else(|| IrcError::Malformed(line.to_string()))?;
        message.prefix = Some(prefix.to_string());
        rest = after.trim_start();
    }

    let (command, mut params) = match rest.split_once(' ') {
        Some((command, params)) => (command, params),
        None => (rest, ""),
    };
    if command.is_empty() {
        return Err(IrcError::Malformed(line.to_string()));
    }
    message.command = command.to_string();

    loop {
        params = params.trim_start();
        if params.is_empty() {
            break;
        }
        if let Some(trailing) = params.strip_prefix(':') {
            message.params.push(trailing.to_string());
            break;
        }
        match params.split_once(' ') {
            Some((param, after)) => {
                message.params.push(param.to_string());
                params = after;
            }
            None => {
                message.params.push(params.to_string());
                break;
            }
        }
    }

    Ok(message)
}

fn parse_tags(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), unescape_tag(value)),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn unescape_tag(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(';'),
            Some('s') => out.push(' '),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
