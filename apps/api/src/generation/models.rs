//! Request-scoped value types for report generation.
//!
//! Assessment payloads arrive loosely typed: profile and test fields may be missing,
//! misnamed (English or Portuguese keys), or carry the wrong JSON type. Everything in
//! this module is built from `serde_json::Value` with explicit presence checks, and
//! construction never fails.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::generation::labels::{labels, Labels};

// ────────────────────────────────────────────────────────────────────────────
// Language
// ────────────────────────────────────────────────────────────────────────────

/// Output language for narratives, labels and sentinels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Pt,
}

impl Lang {
    /// Any value other than `pt`, including none, selects English.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pt") => Lang::Pt,
            _ => Lang::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Pt => "pt",
        }
    }

    pub fn labels(&self) -> &'static Labels {
        labels(*self)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Participant profile
// ────────────────────────────────────────────────────────────────────────────

/// Biographical fields rendered in the participant summary, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Age,
    City,
    Education,
    Occupation,
    Interests,
    Goals,
}

impl ProfileField {
    pub const ALL: [ProfileField; 7] = [
        ProfileField::Name,
        ProfileField::Age,
        ProfileField::City,
        ProfileField::Education,
        ProfileField::Occupation,
        ProfileField::Interests,
        ProfileField::Goals,
    ];

    /// Accepted payload keys, canonical first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ProfileField::Name => &["name", "fullName", "nomeCompleto", "nome"],
            ProfileField::Age => &["age", "idade"],
            ProfileField::City => &["city", "cidade", "location", "localizacao"],
            ProfileField::Education => &["education", "escolaridade", "formacao", "formacaoAcademica"],
            ProfileField::Occupation => &["occupation", "profissao", "ocupacao", "cargo", "currentRole"],
            ProfileField::Interests => &["interests", "interesses"],
            ProfileField::Goals => &["goals", "objetivos", "metas", "careerGoals"],
        }
    }
}

/// Free-form participant data. Only JSON objects are accepted as profiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantProfile {
    fields: Map<String, Value>,
}

impl ParticipantProfile {
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|fields| ParticipantProfile {
            fields: fields.clone(),
        })
    }

    /// Renders the first alias carrying a present value as display text.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .find_map(display_text)
    }

    pub fn field(&self, field: ProfileField) -> Option<String> {
        self.text(field.aliases())
    }

    /// True when none of the known fields carries a present value.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        ProfileField::ALL.iter().all(|f| self.field(*f).is_none())
    }
}

/// Display text for a loosely-typed scalar or list value.
///
/// Blank strings, booleans, nulls and objects are absent. Arrays join their present
/// scalar elements with `, ` and are absent when no element is present.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(format_number)
            }
        }
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter(|item| !item.is_array())
                .filter_map(display_text)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests and results
// ────────────────────────────────────────────────────────────────────────────

/// The assessments the report knows how to narrate and chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestKey {
    #[serde(rename = "disc-insight")]
    DiscInsight,
    #[serde(rename = "multiple-intelligences")]
    MultipleIntelligences,
    #[serde(rename = "riasec")]
    Riasec,
    #[serde(rename = "archetypes")]
    Archetypes,
}

impl TestKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "disc-insight" => Some(TestKey::DiscInsight),
            "multiple-intelligences" => Some(TestKey::MultipleIntelligences),
            "riasec" => Some(TestKey::Riasec),
            "archetypes" => Some(TestKey::Archetypes),
            _ => None,
        }
    }
}

const SCORE_CONTAINERS: &[&str] = &["results", "scores", "resultados", "pontuacoes"];
const SCORE_FIELDS: &[&str] = &["score", "value", "percentage", "pontuacao", "valor"];
const NAME_FIELDS: &[&str] = &["name", "label", "key", "nome"];
const SUMMARY_FIELDS: &[&str] = &["summary", "resumo", "description", "descricao"];
const HIGHLIGHT_FIELDS: &[&str] = &["highlights", "destaques"];

/// One assessment's outcome: ordered metric scores plus optional narrative hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestResult {
    /// Metric name → score, in payload order.
    pub scores: Vec<(String, f64)>,
    pub summary: Option<String>,
    pub highlights: Vec<String>,
}

impl TestResult {
    /// Builds a result from whatever shape the payload has.
    ///
    /// Scores are read from the first score container (`results`, `scores`, ...) that
    /// is an object or an array of `{name, score}` objects. Without a container, numeric
    /// top-level fields are taken as scores.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return TestResult::default();
        };

        let container = SCORE_CONTAINERS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find(|v| v.is_object() || v.is_array());

        let scores = match container {
            Some(Value::Object(map)) => scores_from_map(map),
            Some(Value::Array(items)) => scores_from_list(items),
            _ => scores_from_map(obj),
        };

        let summary = SUMMARY_FIELDS
            .iter()
            .filter_map(|key| obj.get(*key))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string);

        let highlights = HIGHLIGHT_FIELDS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        TestResult {
            scores,
            summary,
            highlights,
        }
    }

    /// First score whose metric name matches one of `aliases` (case-insensitive).
    pub fn score(&self, aliases: &[&str]) -> Option<f64> {
        self.scores.iter().find_map(|(metric, value)| {
            let metric = metric.trim().to_lowercase();
            aliases
                .iter()
                .any(|alias| alias.to_lowercase() == metric)
                .then_some(*value)
        })
    }
}

fn scores_from_map(map: &Map<String, Value>) -> Vec<(String, f64)> {
    map.iter()
        .filter(|(key, _)| {
            !SUMMARY_FIELDS.contains(&key.as_str()) && !HIGHLIGHT_FIELDS.contains(&key.as_str())
        })
        .filter_map(|(key, value)| score_value(value).map(|score| (key.clone(), score)))
        .collect()
}

fn scores_from_list(items: &[Value]) -> Vec<(String, f64)> {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = NAME_FIELDS
                .iter()
                .filter_map(|key| item.get(*key))
                .filter_map(Value::as_str)
                .map(str::trim)
                .find(|s| !s.is_empty())?;
            let score = SCORE_FIELDS
                .iter()
                .filter_map(|key| item.get(*key))
                .find_map(score_value)?;
            Some((name.to_string(), score))
        })
        .collect()
}

/// Reads a numeric score from a number, a numeric string (`"45"`, `"45%"`), or an
/// object wrapping one under a score field.
fn score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        Value::Object(obj) => SCORE_FIELDS
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(|v| match v {
                Value::Object(_) => None,
                other => score_value(other),
            }),
        _ => None,
    };
    score.filter(|f| f.is_finite())
}

/// Test results in request order. Order decides narrative and document section order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestResultSet {
    entries: Vec<(TestKey, TestResult)>,
}

impl TestResultSet {
    /// Builds the set from a JSON object keyed by test key. Unknown keys are skipped.
    /// Returns `None` when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut entries: Vec<(TestKey, TestResult)> = Vec::with_capacity(obj.len());
        for (key, raw) in obj {
            match TestKey::from_key(key) {
                Some(test) if !entries.iter().any(|(k, _)| *k == test) => {
                    entries.push((test, TestResult::from_value(raw)));
                }
                Some(_) => {}
                None => tracing::debug!(key = %key, "Skipping unknown test key"),
            }
        }
        Some(TestResultSet { entries })
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<(TestKey, TestResult)>) -> Self {
        let mut set = TestResultSet::default();
        for (key, result) in entries {
            if set.get(key).is_none() {
                set.entries.push((key, result));
            }
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = (TestKey, &TestResult)> {
        self.entries.iter().map(|(key, result)| (*key, result))
    }

    pub fn get(&self, key: TestKey) -> Option<&TestResult> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, result)| result)
    }

    pub fn keys(&self) -> Vec<TestKey> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
