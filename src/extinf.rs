//! `#EXTINF:` metadata lines.
//!
//! A line is split into a header and a trailing display name:
//!
//! ```text
//! #EXTINF:-1 tvg-id="1" group-title="Old",ESPN
//!         \__________ header __________/ \name/
//! ```
//!
//! The header is kept as a token list so that untouched text survives a
//! parse/serialize cycle byte for byte. The separator is the first comma outside
//! double quotes, which keeps commas inside quoted attribute values from being
//! mistaken for the start of the name.

use std::fmt;

use crate::overrides::ChannelOverride;

pub const EXTINF_MARKER: &str = "#EXTINF:";
pub const GROUP_TITLE: &str = "group-title";

const OVERRIDE_DURATION: &str = "-1";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Attr { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtInf {
    header: Vec<Token>,
    /// Raw text after the separator comma, untrimmed.
    name: Option<String>,
}

impl ExtInf {
    /// Parse a metadata line. Returns `None` if it does not start with `#EXTINF:`.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix(EXTINF_MARKER)?;
        let bytes = rest.as_bytes();

        let mut header = Vec::new();
        let mut text_start = 0;
        let mut separator = None;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b',' => {
                    separator = Some(i);
                    break;
                }
                b'=' if bytes.get(i + 1) == Some(&b'"') => {
                    let key_start = (text_start..i)
                        .rev()
                        .take_while(|&j| is_key_byte(bytes[j]))
                        .last();
                    let value_start = i + 2;
                    match (key_start, rest[value_start..].find('"')) {
                        (Some(key_start), Some(len)) => {
                            let value_end = value_start + len;
                            if key_start > text_start {
                                header.push(Token::Text(rest[text_start..key_start].to_string()));
                            }
                            header.push(Token::Attr {
                                key: rest[key_start..i].to_string(),
                                value: rest[value_start..value_end].to_string(),
                            });
                            i = value_end + 1;
                            text_start = i;
                        }
                        _ => i += 1,
                    }
                }
                b'"' => match rest[i + 1..].find('"') {
                    Some(len) => i += len + 2,
                    None => i += 1,
                },
                _ => i += 1,
            }
        }

        let header_end = separator.unwrap_or(rest.len());
        if header_end > text_start {
            header.push(Token::Text(rest[text_start..header_end].to_string()));
        }

        Some(Self {
            header,
            name: separator.map(|sep| rest[sep + 1..].to_string()),
        })
    }

    /// Rebuild a line entirely from an override record.
    ///
    /// `fallback_name` is used when the record leaves `display-name` empty.
    pub fn from_override(record: &ChannelOverride, group: &str, fallback_name: &str) -> Self {
        let mut header = vec![Token::Text(OVERRIDE_DURATION.to_string())];
        let attrs = [
            ("tvg-id", record.tvg_id.as_str()),
            ("tvg-name", record.tvg_name.as_str()),
            ("tvg-logo", record.tvg_logo.as_str()),
            ("tvg-chno", record.tvg_chno.as_str()),
            (GROUP_TITLE, group),
        ];
        for (key, value) in attrs {
            header.push(Token::Text(" ".to_string()));
            header.push(Token::Attr {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        let name = if record.display_name.is_empty() {
            fallback_name
        } else {
            record.display_name.as_str()
        };

        Self {
            header,
            name: Some(name.to_string()),
        }
    }

    /// Display name, trimmed. Empty when the line has no separator comma.
    pub fn name(&self) -> &str {
        self.name.as_deref().map(str::trim).unwrap_or("")
    }

    /// Value of the first attribute named `key`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header.iter().filter_map(|token| match token {
            Token::Attr { key, value } => Some((key.as_str(), value.as_str())),
            Token::Text(_) => None,
        })
    }

    /// Replace the value of the first attribute named `key`, or append the
    /// attribute to the end of the header if it is not present.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        let existing = self.header.iter_mut().find_map(|token| match token {
            Token::Attr { key: k, value } if k.as_str() == key => Some(value),
            _ => None,
        });

        match existing {
            Some(current) => *current = value.to_string(),
            None => {
                self.header.push(Token::Text(" ".to_string()));
                self.header.push(Token::Attr {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
}

impl fmt::Display for ExtInf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(EXTINF_MARKER)?;
        for token in &self.header {
            match token {
                Token::Text(text) => f.write_str(text)?,
                Token::Attr { key, value } => write!(f, "{}=\"{}\"", key, value)?,
            }
        }
        if let Some(name) = &self.name {
            write!(f, ",{}", name)?;
        }
        Ok(())
    }
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
