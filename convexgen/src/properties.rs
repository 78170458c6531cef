//! `local.properties` lookup.
//!
//! Projects keep their deploy key out of version control in a
//! `local.properties` file next to the manifest:
//!
//! ```text
//! # not committed
//! convex.key=prod:happy-otter-123|...
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

/// File name looked up next to the crate manifest.
pub const PROPERTIES_FILE: &str = "local.properties";

/// Property holding the deploy key.
pub const KEY_PROPERTY: &str = "convex.key";

/// Key/value pairs of a properties file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parses `key=value` lines. `:` also separates; `#` and `!` start comments.
    ///
    /// A line ending in an unescaped `\` continues on the next line, whose
    /// leading whitespace is dropped. Keys and values are unescaped after
    /// trimming: `\t`, `\n`, `\uXXXX` and escaped separators.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let entries = logical_lines(text)
            .into_iter()
            .filter(|line| !line.is_empty() && !line.starts_with(['#', '!']))
            .filter_map(|line| {
                let split = separator(&line)?;
                let (key, value) = (&line[..split], &line[split + 1..]);
                Some((unescape(key.trim()), unescape(value.trim())))
            })
            .collect();
        Self { entries }
    }

    /// Loads a properties file. A missing file yields `None`.
    ///
    /// # Errors
    /// Returns any read error other than `NotFound`.
    pub fn load(path: &Path) -> io::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(Self::parse(&text))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Returns the value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the deploy key, if set and non-empty.
    #[must_use]
    pub fn deploy_key(&self) -> Option<&str> {
        self.get(KEY_PROPERTY).filter(|key| !key.is_empty())
    }
}

/// Joins continued lines. Comment lines never continue.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim_start();
        let mut current = match pending.take() {
            Some(mut joined) => {
                joined.push_str(line);
                joined
            }
            None if line.starts_with(['#', '!']) => {
                lines.push(line.to_string());
                continue;
            }
            None => line.to_string(),
        };
        if ends_with_continuation(&current) {
            current.pop();
            pending = Some(current);
        } else {
            lines.push(current);
        }
    }
    lines.extend(pending);
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Byte offset of the first unescaped `=` or `:`.
fn separator(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return Some(index),
            _ => {}
        }
    }
    None
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    // Malformed escapes are kept as written.
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
