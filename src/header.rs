use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\+(\w+):[ \t]*(.*)$").expect("header pattern is valid"));

/// Keys whose values are space-separated lists.
const LIST_KEYS: &[&str] = &["tags", "categories", "aliases"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Single(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Single(value) => Some(value),
            MetaValue::List(_) => None,
        }
    }
}

/// Document settings read from the leading `#+KEY: value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(&key.to_ascii_lowercase())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(MetaValue::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, key: String, value: &str) {
        if LIST_KEYS.contains(&key.as_str()) {
            let words = value.split_whitespace().map(str::to_string);
            match self.0.get_mut(&key) {
                Some(MetaValue::List(list)) => list.extend(words),
                _ => {
                    self.0.insert(key, MetaValue::List(words.collect()));
                }
            }
        } else {
            self.0.insert(key, MetaValue::Single(value.to_string()));
        }
    }
}

/// Reads the header block: `#+KEY: value` lines (blank lines allowed between them) up
/// to the first other line. Greater block markers are not settings and end the header.
pub fn extract(input: &str) -> Metadata {
    let mut metadata = Metadata::default();

    for line in input.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = HEADER_LINE.captures(line) else {
            break;
        };
        let key = caps[1].to_ascii_lowercase();
        if key.starts_with("begin_") {
            break;
        }
        log::trace!("Header {key} = {:?}", &caps[2]);
        metadata.insert(key, &caps[2]);
    }

    log::debug!("Extracted {} header keys", metadata.0.len());
    metadata
}
