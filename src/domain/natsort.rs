//! Natural ordering for version tags, so that `v2` sorts before `v10`.

use regex::Regex;
use std::sync::OnceLock;

fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit run pattern is valid"))
}

/// One run of a natural sort key.
///
/// Keys always alternate text and number runs starting with text (which may be
/// empty), so two keys only ever compare runs of the same kind position by position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    /// Non-digit run, lowercased
    Text(String),
    /// Digit run compared by magnitude
    Number(Digits),
}

/// Digit run with leading zeros stripped; ordering by length first then by
/// digits is numeric ordering with no width limit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Digits {
    len: usize,
    digits: String,
}

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Digits {
            len: digits.len(),
            digits: digits.to_string(),
        }
    }
}

/// Split `value` into alternating text and digit runs.
pub fn natural_key(value: &str) -> Vec<Segment> {
    let mut key = Vec::new();
    let mut last = 0;

    for run in digit_runs().find_iter(value) {
        key.push(Segment::Text(value[last..run.start()].to_lowercase()));
        key.push(Segment::Number(Digits::new(run.as_str())));
        last = run.end();
    }
    key.push(Segment::Text(value[last..].to_lowercase()));

    key
}

/// Return `items` in natural order. Equal keys keep their input order.
pub fn natsorted<I, S>(items: I) -> Vec<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<S> = items.into_iter().collect();
    sorted.sort_by_cached_key(|item| natural_key(item.as_ref()));
    sorted
}

/// The natural-order maximum of `tags`, ignoring blank entries.
pub fn latest_tag<I, S>(tags: I) -> Option<S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    natsorted(tags.into_iter().filter(|tag| !tag.as_ref().trim().is_empty())).pop()
}
