//! Search response normalization.
//!
//! The search endpoint answers with structurally different JSON depending on
//! the query and account. Known shapes are tried in priority order:
//!
//! 1. Composite envelope: `{"c": {"answers": "...", "refs": [...]}}`, also
//!    nested under `data`
//! 2. Record list: a top-level array, `data` as an array, or an array under
//!    one of [`LIST_KEYS`] in `data` or at the top level
//! 3. Single record: an object carrying note content
//!
//! Anything else parses as [`SearchResponse::Empty`].

use crate::types::{Note, UNSCORED_RELEVANCE};
use serde_json::{Map, Value};

/// Keys that may hold a list of note records.
pub const LIST_KEYS: [&str; 5] = ["items", "list", "notes", "documents", "results"];

const ID_KEYS: [&str; 2] = ["id", "note_id"];
const TITLE_KEYS: [&str; 2] = ["title", "note_title"];
const CONTENT_KEYS: [&str; 3] = ["content", "snippet", "text"];
const SCORE_KEYS: [&str; 2] = ["relevance_score", "score"];

const UNTITLED: &str = "Untitled note";

/// A note record as the upstream sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: String,
    pub score: Option<f32>,
}

/// A parsed search response.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// Upstream-synthesized answer plus its supporting snippets
    Composite {
        answer: Option<String>,
        snippets: Vec<RawRecord>,
    },
    /// Plain list of note records
    Records(Vec<RawRecord>),
    /// No known shape matched
    Empty,
}

impl SearchResponse {
    /// Parse a response body, trying each known shape in priority order.
    pub fn parse(body: &Value) -> Self {
        if let Some(composite) = parse_composite(body) {
            return composite;
        }

        if let Some(records) = parse_record_list(body) {
            return SearchResponse::Records(records);
        }

        if let Some(record) = parse_single_record(body) {
            return SearchResponse::Records(vec![record]);
        }

        SearchResponse::Empty
    }

    /// Shape name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchResponse::Composite { .. } => "composite",
            SearchResponse::Records(_) => "records",
            SearchResponse::Empty => "empty",
        }
    }

    /// Convert into notes. The composite answer, when present, comes first.
    pub fn into_notes(self) -> Vec<Note> {
        match self {
            SearchResponse::Composite { answer, snippets } => {
                let mut notes = Vec::with_capacity(snippets.len() + 1);
                if let Some(answer) = answer {
                    notes.push(Note::ai_answer(answer));
                }
                notes.extend(
                    snippets
                        .into_iter()
                        .enumerate()
                        .map(|(i, record)| record.into_note(i + 1)),
                );
                notes
            }
            SearchResponse::Records(records) => records
                .into_iter()
                .enumerate()
                .map(|(i, record)| record.into_note(i + 1))
                .collect(),
            SearchResponse::Empty => Vec::new(),
        }
    }
}

impl RawRecord {
    /// Read a record from an object, or from a bare string used as content.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                id: first_of(map, &ID_KEYS).and_then(scalar_to_string),
                title: first_of(map, &TITLE_KEYS)
                    .and_then(scalar_to_string)
                    .filter(|t| !t.trim().is_empty()),
                content: first_of(map, &CONTENT_KEYS)
                    .map(text_of)
                    .unwrap_or_default(),
                score: first_of(map, &SCORE_KEYS).and_then(score_of),
            }),
            Value::String(text) => Some(Self {
                id: None,
                title: None,
                content: text.clone(),
                score: None,
            }),
            _ => None,
        }
    }

    /// Convert into a raw snippet note; `position` is 1-based.
    pub fn into_note(self, position: usize) -> Note {
        Note::snippet(
            self.id.unwrap_or_else(|| format!("snippet-{}", position)),
            self.title.unwrap_or_else(|| UNTITLED.to_string()),
            self.content,
            self.score.unwrap_or(UNSCORED_RELEVANCE),
        )
    }
}

fn parse_composite(body: &Value) -> Option<SearchResponse> {
    let envelope = body
        .get("c")
        .or_else(|| body.get("data").and_then(|data| data.get("c")))?
        .as_object()?;

    let answer = envelope
        .get("answers")
        .map(text_of)
        .filter(|a| !a.trim().is_empty());

    let snippets: Vec<RawRecord> = envelope
        .get("refs")
        .and_then(Value::as_array)
        .map(|refs| refs.iter().filter_map(RawRecord::from_value).collect())
        .unwrap_or_default();

    if answer.is_none() && snippets.is_empty() {
        return None;
    }

    Some(SearchResponse::Composite { answer, snippets })
}

fn parse_record_list(body: &Value) -> Option<Vec<RawRecord>> {
    let list = match body {
        Value::Array(items) => Some(items),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => Some(items),
            Some(Value::Object(data)) => list_under_keys(data).or_else(|| list_under_keys(map)),
            _ => list_under_keys(map),
        },
        _ => None,
    }?;

    let records: Vec<RawRecord> = list.iter().filter_map(RawRecord::from_value).collect();
    (!records.is_empty()).then_some(records)
}

fn parse_single_record(body: &Value) -> Option<RawRecord> {
    let candidate = match body.get("data") {
        Some(data @ Value::Object(_)) => data,
        _ => body,
    };

    let map = candidate.as_object()?;
    first_of(map, &CONTENT_KEYS)?;
    RawRecord::from_value(candidate)
}

fn list_under_keys(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    LIST_KEYS
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_array))
        .find(|items| !items.is_empty())
}

fn first_of<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Content is always a string: null is empty, other values are stringified.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn score_of(value: &Value) -> Option<f32> {
    let score = match value {
        Value::Number(n) => n.as_f64()? as f32,
        Value::String(s) => s.trim().parse::<f32>().ok()?,
        _ => return None,
    };
    score.is_finite().then(|| score.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoteSource;
    use serde_json::json;

    fn notes_of(body: Value) -> Vec<Note> {
        SearchResponse::parse(&body).into_notes()
    }

    #[test]
    fn test_composite_answer_and_refs() {
        let notes = notes_of(json!({
            "h": {"c": 0, "e": ""},
            "c": {
                "answers": "Sleep 7-9 hours.",
                "refs": [
                    {"title": "Sleep basics", "content": "Adults need 7-9 hours."},
                    {"content": "Avoid screens before bed.", "score": 0.4}
                ]
            }
        }));

        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].source, NoteSource::AiAnswer);
        assert_eq!(notes[0].content, "Sleep 7-9 hours.");
        assert_eq!(notes[1].source, NoteSource::RawSnippet);
        assert_eq!(notes[1].title, "Sleep basics");
        assert_eq!(notes[1].relevance_score, UNSCORED_RELEVANCE);
        assert_eq!(notes[2].id, "snippet-2");
        assert_eq!(notes[2].title, UNTITLED);
        assert_eq!(notes[2].relevance_score, 0.4);
    }

    #[test]
    fn test_composite_under_data() {
        let response = SearchResponse::parse(&json!({"data": {"c": {"answers": "Yes."}}}));
        assert_eq!(response.kind(), "composite");
        assert_eq!(response.into_notes().len(), 1);
    }

    #[test]
    fn test_empty_composite_falls_through_to_list() {
        let notes = notes_of(json!({
            "c": {"answers": "", "refs": []},
            "data": [{"id": 7, "title": "Fallback", "content": "from data"}]
        }));

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "7");
        assert_eq!(notes[0].source, NoteSource::RawSnippet);
    }

    #[test]
    fn test_flat_list() {
        let notes = notes_of(json!([
            {"id": "1", "title": "A", "content": "a", "score": 0.9},
            {"id": "2", "title": "B", "content": "b", "relevance_score": 0.6}
        ]));

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].relevance_score, 0.9);
        assert_eq!(notes[1].relevance_score, 0.6);
    }

    #[test]
    fn test_nested_lists_under_varying_keys() {
        for key in LIST_KEYS {
            let body = json!({"data": {key: [{"id": "1", "title": "T", "content": "c"}]}});
            assert_eq!(notes_of(body).len(), 1, "data.{}", key);

            let body = json!({key: [{"id": "1", "title": "T", "content": "c"}]});
            assert_eq!(notes_of(body).len(), 1, "top-level {}", key);
        }
    }

    #[test]
    fn test_single_record() {
        let notes = notes_of(json!({"data": {"id": "x", "title": "Only", "content": "one"}}));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "x");
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert_eq!(
            SearchResponse::parse(&json!({"h": {"c": 401, "e": "unauthorized"}})),
            SearchResponse::Empty
        );
        assert_eq!(SearchResponse::parse(&json!("plain text")), SearchResponse::Empty);
        assert_eq!(SearchResponse::parse(&json!({"data": []})), SearchResponse::Empty);
    }

    #[test]
    fn test_content_always_a_string() {
        let notes = notes_of(json!({
            "c": {"answers": "A", "refs": [{"title": "no content"}, {"content": null}]}
        }));
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[1].content, "");
        assert_eq!(notes[2].content, "");

        let notes = notes_of(json!([{"title": "missing"}, {"content": 42}, {"snippet": "alias"}]));
        assert_eq!(notes[0].content, "");
        assert_eq!(notes[1].content, "42");
        assert_eq!(notes[2].content, "alias");

        let notes = notes_of(json!({"data": {"notes": [{"text": ["x"]}]}}));
        assert_eq!(notes[0].content, "[\"x\"]");
    }

    #[test]
    fn test_score_parsing() {
        let notes = notes_of(json!([
            {"content": "a", "score": "0.85"},
            {"content": "b", "score": 3.0},
            {"content": "c", "score": "high"}
        ]));

        assert_eq!(notes[0].relevance_score, 0.85);
        assert_eq!(notes[1].relevance_score, 1.0);
        assert_eq!(notes[2].relevance_score, UNSCORED_RELEVANCE);
    }
}
