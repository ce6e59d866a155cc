//! Coerces the model's structured roadmap output into a `Roadmap`.
//!
//! The model is asked for an exact JSON shape but is not trusted to honor it. Parsing
//! goes through an intermediate `serde_json::Value`, then every field is coerced on its
//! own: wrong-typed strings become `""`, wrong-typed lists become `[]`, and list
//! elements that are not strings are dropped without discarding the rest of the list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm_client::strip_json_fences;

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("roadmap output is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub vision: String,
    pub phases: Vec<Phase>,
    pub habits: Vec<String>,
    pub support: Vec<String>,
    pub final_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub title: String,
    pub timeframe: String,
    pub focus: String,
    pub steps: Vec<String>,
}

impl Roadmap {
    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.vision.trim().is_empty()
            && self.phases.is_empty()
            && self.habits.is_empty()
            && self.support.is_empty()
            && self.final_message.trim().is_empty()
    }
}

/// Parses raw model output. Fails only when the text is not JSON at all; any valid
/// JSON value is sanitized (non-objects yield the empty roadmap).
pub fn parse_roadmap(raw: &str) -> Result<Roadmap, RoadmapError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;
    Ok(sanitize_roadmap(&value))
}

pub fn sanitize_roadmap(value: &Value) -> Roadmap {
    let Some(obj) = value.as_object() else {
        return Roadmap::default();
    };

    let phases = obj
        .get("phases")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(sanitize_phase).collect())
        .unwrap_or_default();

    Roadmap {
        vision: string_field(obj, &["vision"]),
        phases,
        habits: string_list(obj, "habits"),
        support: string_list(obj, "support"),
        final_message: string_field(obj, &["finalMessage", "final_message"]),
    }
}

/// A phase with blank title, blank focus and no steps carries nothing and is dropped.
fn sanitize_phase(value: &Value) -> Option<Phase> {
    let obj = value.as_object()?;
    let phase = Phase {
        title: string_field(obj, &["title"]),
        timeframe: string_field(obj, &["timeframe"]),
        focus: string_field(obj, &["focus"]),
        steps: string_list(obj, "steps"),
    };

    if phase.title.trim().is_empty() && phase.focus.trim().is_empty() && phase.steps.is_empty() {
        None
    } else {
        Some(phase)
    }
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
