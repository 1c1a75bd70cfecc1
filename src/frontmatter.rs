//! Metadata block extraction for skill documents.
//!
//! Skill documents open with a block delimited by `---` lines. The block is
//! read with a small line-oriented parser rather than a full YAML parser: only
//! flat `key: value` scalars and `key:` headers followed by indented `- item`
//! lines are understood. Everything else inside the block is skipped.

use std::{collections::BTreeMap, mem};

/// Marker line that opens and closes the metadata block.
const MARKER: &str = "---";

/// Field holding the free-text skill description.
pub const DESCRIPTION_FIELD: &str = "description";

/// Field holding the trigger phrase list.
pub const TRIGGERS_FIELD: &str = "triggers";

/// A single extracted metadata value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// A `key: value` entry.
    Scalar(String),
    /// A `key:` entry followed by indented list items.
    List(Vec<String>),
}

/// Flat mapping of field names to values extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Extracted fields keyed by name.
    fields: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.fields.get(key)
    }

    /// Return the description when it was declared as a scalar.
    pub fn description(&self) -> Option<&str> {
        match self.get(DESCRIPTION_FIELD)? {
            MetadataValue::Scalar(value) => Some(value),
            MetadataValue::List(_) => None,
        }
    }

    /// Return the triggers when they were declared as a list.
    pub fn triggers(&self) -> Option<&[String]> {
        match self.get(TRIGGERS_FIELD)? {
            MetadataValue::List(items) => Some(items),
            MetadataValue::Scalar(_) => None,
        }
    }

    /// Number of extracted fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields were extracted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Extract the metadata block from a skill document.
///
/// Documents without a well-formed block produce an empty [`Metadata`].
pub fn parse_metadata(contents: &str) -> Metadata {
    let Some(block) = metadata_block(contents) else {
        return Metadata::default();
    };

    let mut parser = Parser::default();
    for line in block.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Locate the text between the opening and closing marker lines.
fn metadata_block(contents: &str) -> Option<&str> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != MARKER || !first.ends_with('\n') {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if line.trim_end() == MARKER {
            return Some(&contents[start..offset]);
        }
        offset += line.len();
    }

    None
}

/// Classification of one line inside the block.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `key: value` with a non-empty value.
    Scalar {
        /// Field name.
        key: &'a str,
        /// Raw trimmed value, quotes still attached.
        value: &'a str,
    },
    /// `key:` with nothing after the colon.
    ListHeader {
        /// Field name.
        key: &'a str,
    },
    /// Indented `- item`.
    ListItem(&'a str),
    /// Blank, malformed or otherwise unrecognized.
    Ignored,
}

/// Classify a single line of the block.
fn classify(line: &str) -> Line<'_> {
    if let Some(item) = list_item(line) {
        return Line::ListItem(item);
    }

    let Some((key, value)) = entry(line) else {
        return Line::Ignored;
    };
    if value.is_empty() {
        Line::ListHeader { key }
    } else {
        Line::Scalar { key, value }
    }
}

/// Match `<ws>+-<ws>+<text>` and return the trimmed text.
fn list_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    if rest.len() == line.len() {
        return None;
    }
    let rest = rest.strip_prefix('-')?;
    let item = rest.trim_start();
    if item.len() == rest.len() || item.is_empty() {
        return None;
    }
    Some(item.trim())
}

/// Match `key<ws>*:<ws>*value` where the key starts at column zero.
fn entry(line: &str) -> Option<(&str, &str)> {
    let mut chars = line.char_indices();
    let (_, first) = chars.next()?;
    if !is_word_char(first) {
        return None;
    }
    let key_end = chars
        .find(|(_, ch)| !(is_word_char(*ch) || *ch == '-'))
        .map_or(line.len(), |(index, _)| index);
    let key = &line[..key_end];
    let value = line[key_end..].trim_start().strip_prefix(':')?;
    Some((key, value.trim()))
}

/// Word characters allowed in field names.
fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Remove one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parser state between lines.
#[derive(Debug, Default)]
enum State {
    /// Waiting for the next `key:` line.
    #[default]
    ScanningKey,
    /// A `key:` header was seen; list items are collected under it.
    AccumulatingList {
        /// Pending field name.
        key: String,
        /// Items collected so far.
        items: Vec<String>,
    },
}

/// Two-state metadata parser.
#[derive(Debug, Default)]
struct Parser {
    /// Current state.
    state: State,
    /// Fields completed so far.
    fields: BTreeMap<String, MetadataValue>,
}

impl Parser {
    /// Advance the parser by one line.
    fn feed(&mut self, line: &str) {
        match classify(line) {
            Line::Scalar { key, value } => {
                self.flush();
                self.fields.insert(
                    key.to_string(),
                    MetadataValue::Scalar(unquote(value).to_string()),
                );
            }
            Line::ListHeader { key } => {
                self.flush();
                self.state = State::AccumulatingList {
                    key: key.to_string(),
                    items: Vec::new(),
                };
            }
            Line::ListItem(item) => {
                if let State::AccumulatingList { items, .. } = &mut self.state {
                    items.push(item.to_string());
                }
            }
            Line::Ignored => {}
        }
    }

    /// Leave the list state, storing the pending list if it collected items.
    fn flush(&mut self) {
        if let State::AccumulatingList { key, items } = mem::take(&mut self.state)
            && !items.is_empty()
        {
            self.fields.insert(key, MetadataValue::List(items));
        }
    }

    /// Flush any pending list and return the extracted fields.
    fn finish(mut self) -> Metadata {
        self.flush();
        Metadata {
            fields: self.fields,
        }
    }
}
