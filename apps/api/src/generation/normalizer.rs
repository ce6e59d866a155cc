//! Turns assessment payloads into prompt lines and chart values.
//!
//! Nothing here fails: absent or malformed input degrades to a per-language sentinel,
//! so the prompt composer always receives a well-formed string.

use serde::Serialize;

use crate::generation::models::{
    Lang, ParticipantProfile, ProfileField, TestKey, TestResult, TestResultSet,
};

/// Number of scores rendered per test line. Keeps prompts compact and stops the
/// model from dwelling on low-signal axes.
pub const TOP_SCORES: usize = 4;

const SEGMENT_SEPARATOR: &str = " | ";

// ────────────────────────────────────────────────────────────────────────────
// Prompt lines
// ────────────────────────────────────────────────────────────────────────────

/// Renders the participant as one pipe-delimited `label: value` line.
pub fn summarize_profile(profile: Option<&ParticipantProfile>, lang: Lang) -> String {
    let labels = lang.labels();
    let segments: Vec<String> = profile
        .map(|profile| {
            ProfileField::ALL
                .iter()
                .filter_map(|field| {
                    profile
                        .field(*field)
                        .map(|value| format!("{}: {}", labels.profile_field(*field), value))
                })
                .collect()
        })
        .unwrap_or_default();

    if segments.is_empty() {
        labels.profile_unavailable.to_string()
    } else {
        segments.join(SEGMENT_SEPARATOR)
    }
}

/// Highest `n` finite scores, descending. Equal scores keep their payload order.
pub fn top_scores(result: &TestResult, n: usize) -> Vec<(String, f64)> {
    let mut scores: Vec<(String, f64)> = result
        .scores
        .iter()
        .filter(|(_, value)| value.is_finite())
        .cloned()
        .collect();
    // sort_by is stable
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scores.truncate(n);
    scores
}

/// Renders one test as `label: top=M:v, ... | details`.
///
/// Highlights win over the free-text summary. With neither scores nor details the
/// line carries the "no additional details" marker.
pub fn summarize_test(key: TestKey, result: Option<&TestResult>, lang: Lang) -> String {
    let labels = lang.labels();
    let label = labels.test_label(key);

    let Some(result) = result else {
        return format!("{label}: {}", labels.data_unavailable);
    };

    let mut segments = Vec::new();

    let top = top_scores(result, TOP_SCORES);
    if !top.is_empty() {
        let rendered: Vec<String> = top
            .iter()
            .map(|(metric, value)| format!("{metric}:{}", round_score(*value)))
            .collect();
        segments.push(format!("top={}", rendered.join(", ")));
    }

    if !result.highlights.is_empty() {
        segments.push(format!("{}: {}", labels.highlights, result.highlights.join("; ")));
    } else if let Some(summary) = result.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        segments.push(format!("{}: {}", labels.summary, summary.trim()));
    }

    if segments.is_empty() {
        format!("{label}: {}", labels.no_details)
    } else {
        format!("{label}: {}", segments.join(SEGMENT_SEPARATOR))
    }
}

fn round_score(value: f64) -> i64 {
    value.round() as i64
}

// ────────────────────────────────────────────────────────────────────────────
// Chart values
// ────────────────────────────────────────────────────────────────────────────

const DISC_ALIASES: [&[&str]; 4] = [
    &["d", "dominance", "dominancia", "dominância", "dominante"],
    &["i", "influence", "influencia", "influência", "influente"],
    &["s", "steadiness", "stability", "estabilidade", "estavel", "estável"],
    &["c", "conscientiousness", "compliance", "conformidade", "cautela"],
];

const RIASEC_ALIASES: [&[&str]; 6] = [
    &["r", "realistic", "realista"],
    &["i", "investigative", "investigativo"],
    &["a", "artistic", "artistico", "artístico"],
    &["s", "social"],
    &["e", "enterprising", "empreendedor"],
    &["c", "conventional", "convencional"],
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DiscAxes {
    pub d: f64,
    pub i: f64,
    pub s: f64,
    pub c: f64,
}

impl DiscAxes {
    /// Axes in D, I, S, C order.
    pub fn values(&self) -> [f64; 4] {
        [self.d, self.i, self.s, self.c]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiasecAxes {
    pub r: f64,
    pub i: f64,
    pub a: f64,
    pub s: f64,
    pub e: f64,
    pub c: f64,
}

impl RiasecAxes {
    /// Axes in R, I, A, S, E, C order.
    pub fn values(&self) -> [f64; 6] {
        [self.r, self.i, self.a, self.s, self.e, self.c]
    }
}

/// Fixed-shape numeric projection of the results, used only to draw charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartValues {
    pub disc: DiscAxes,
    pub riasec: RiasecAxes,
    pub intelligences: Vec<(String, f64)>,
    pub dominant_archetype: Option<String>,
}

/// Projects the result set onto chart axes. Unresolved axes are zero.
pub fn extract_chart_values(tests: &TestResultSet) -> ChartValues {
    let disc = tests.get(TestKey::DiscInsight);
    let riasec = tests.get(TestKey::Riasec);

    let axis = |result: Option<&TestResult>, aliases: &[&str]| {
        result.and_then(|r| r.score(aliases)).unwrap_or(0.0)
    };

    ChartValues {
        disc: DiscAxes {
            d: axis(disc, DISC_ALIASES[0]),
            i: axis(disc, DISC_ALIASES[1]),
            s: axis(disc, DISC_ALIASES[2]),
            c: axis(disc, DISC_ALIASES[3]),
        },
        riasec: RiasecAxes {
            r: axis(riasec, RIASEC_ALIASES[0]),
            i: axis(riasec, RIASEC_ALIASES[1]),
            a: axis(riasec, RIASEC_ALIASES[2]),
            s: axis(riasec, RIASEC_ALIASES[3]),
            e: axis(riasec, RIASEC_ALIASES[4]),
            c: axis(riasec, RIASEC_ALIASES[5]),
        },
        intelligences: tests
            .get(TestKey::MultipleIntelligences)
            .map(|r| r.scores.clone())
            .unwrap_or_default(),
        dominant_archetype: tests.get(TestKey::Archetypes).and_then(dominant_archetype),
    }
}

/// The first archetype holding the maximum score.
// TODO: replace the first-wins tie-break once product defines one for equal scores.
fn dominant_archetype(result: &TestResult) -> Option<String> {
    let mut best: Option<&(String, f64)> = None;
    for entry in result.scores.iter().filter(|(_, v)| v.is_finite()) {
        match best {
            Some((_, top)) if *top >= entry.1 => {}
            _ => best = Some(entry),
        }
    }
    best.map(|(name, _)| name.clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(scores: &[(&str, f64)]) -> TestResult {
        TestResult {
            scores: scores.iter().map(|(m, v)| (m.to_string(), *v)).collect(),
            ..TestResult::default()
        }
    }

    #[test]
    fn test_top_scores_fewer_than_limit_returns_all_sorted() {
        let top = top_scores(&result(&[("A", 10.0), ("B", 30.0), ("C", 20.0)]), TOP_SCORES);
        let names: Vec<&str> = top.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_top_scores_truncates_to_four_with_stable_ties() {
        let top = top_scores(
            &result(&[
                ("R", 50.0),
                ("I", 70.0),
                ("A", 50.0),
                ("S", 90.0),
                ("E", 50.0),
                ("C", 10.0),
            ]),
            TOP_SCORES,
        );
        let names: Vec<&str> = top.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(names, vec!["S", "I", "R", "A"]);
    }

    #[test]
    fn test_summarize_profile_empty_returns_sentinel() {
        assert_eq!(summarize_profile(None, Lang::En), "Participant data unavailable");
        let empty = ParticipantProfile::from_value(&json!({})).unwrap();
        assert_eq!(
            summarize_profile(Some(&empty), Lang::Pt),
            "Dados do participante indisponíveis"
        );
    }

    #[test]
    fn test_summarize_profile_renders_present_fields_only() {
        let profile = ParticipantProfile::from_value(&json!({
            "nomeCompleto": "Erik",
            "idade": 30,
            "cidade": "",
            "interesses": ["música", "tecnologia"],
            "objetivos": []
        }))
        .unwrap();
        assert_eq!(
            summarize_profile(Some(&profile), Lang::Pt),
            "Nome: Erik | Idade: 30 | Interesses: música, tecnologia"
        );
    }

    #[test]
    fn test_summarize_disc_example_in_portuguese() {
        let set = TestResultSet::from_value(&json!({
            "disc-insight": {"results": {"D": 45, "I": 30, "S": 10, "C": 15}}
        }))
        .unwrap();
        let line = summarize_test(TestKey::DiscInsight, set.get(TestKey::DiscInsight), Lang::Pt);
        assert_eq!(line, "DISC: top=D:45, I:30, C:15, S:10");
    }

    #[test]
    fn test_summarize_test_rounds_scores() {
        let line = summarize_test(
            TestKey::Riasec,
            Some(&result(&[("R", 44.6), ("I", 12.2)])),
            Lang::En,
        );
        assert_eq!(line, "RIASEC: top=R:45, I:12");
    }

    #[test]
    fn test_highlights_take_precedence_over_summary() {
        let mut r = result(&[("Hero", 80.0)]);
        r.summary = Some("Driven by achievement".to_string());
        r.highlights = vec!["Courageous".to_string(), "Competitive".to_string()];
        let line = summarize_test(TestKey::Archetypes, Some(&r), Lang::En);
        assert_eq!(line, "Archetypes: top=Hero:80 | highlights: Courageous; Competitive");
    }

    #[test]
    fn test_summary_used_without_highlights() {
        let mut r = TestResult::default();
        r.summary = Some("  Prefers structured environments ".to_string());
        let line = summarize_test(TestKey::DiscInsight, Some(&r), Lang::Pt);
        assert_eq!(line, "DISC: resumo: Prefers structured environments");
    }

    #[test]
    fn test_no_details_marker_per_language() {
        let empty = TestResult::default();
        assert_eq!(
            summarize_test(TestKey::Riasec, Some(&empty), Lang::En),
            "RIASEC: no additional details"
        );
        assert_eq!(
            summarize_test(TestKey::MultipleIntelligences, Some(&empty), Lang::Pt),
            "Inteligências Múltiplas: sem detalhes adicionais"
        );
    }

    #[test]
    fn test_absent_result_uses_unavailable_sentinel() {
        assert_eq!(
            summarize_test(TestKey::Archetypes, None, Lang::En),
            "Archetypes: data unavailable"
        );
    }

    #[test]
    fn test_extract_chart_values_disc_example() {
        let set = TestResultSet::from_value(&json!({
            "disc-insight": {"results": {"D": 45, "I": 30, "S": 10, "C": 15}}
        }))
        .unwrap();
        let values = extract_chart_values(&set);
        assert_eq!(
            values.disc,
            DiscAxes {
                d: 45.0,
                i: 30.0,
                s: 10.0,
                c: 15.0
            }
        );
        assert_eq!(values.riasec, RiasecAxes::default());
        assert!(values.intelligences.is_empty());
        assert_eq!(values.dominant_archetype, None);
    }

    #[test]
    fn test_extract_chart_values_accepts_portuguese_riasec_labels() {
        let set = TestResultSet::from_value(&json!({
            "riasec": {"results": {
                "Realista": 20, "Investigativo": 80, "Artístico": 55,
                "Social": 60, "Empreendedor": 35
            }}
        }))
        .unwrap();
        let values = extract_chart_values(&set);
        assert_eq!(values.riasec.values(), [20.0, 80.0, 55.0, 60.0, 35.0, 0.0]);
    }

    #[test]
    fn test_extract_chart_values_keeps_intelligence_order() {
        let set = TestResultSet::from_value(&json!({
            "multiple-intelligences": {"results": {"Musical": 90, "Linguística": 40, "Lógica": 65}}
        }))
        .unwrap();
        let names: Vec<String> = extract_chart_values(&set)
            .intelligences
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Musical", "Linguística", "Lógica"]);
    }

    #[test]
    fn test_dominant_archetype_first_maximum_wins() {
        let set = TestResultSet::from_entries(vec![(
            TestKey::Archetypes,
            result(&[("Sage", 70.0), ("Hero", 85.0), ("Explorer", 85.0)]),
        )]);
        assert_eq!(
            extract_chart_values(&set).dominant_archetype.as_deref(),
            Some("Hero")
        );
    }

    #[test]
    fn test_chart_values_do_not_depend_on_language() {
        let set = TestResultSet::from_value(&json!({
            "riasec": {"results": {"R": 1, "I": 2}},
            "disc-insight": {"results": {"D": 3}}
        }))
        .unwrap();
        let en = summarize_test(TestKey::Riasec, set.get(TestKey::Riasec), Lang::En);
        let pt = summarize_test(TestKey::Riasec, set.get(TestKey::Riasec), Lang::Pt);
        assert_eq!(en, pt);
        assert_eq!(extract_chart_values(&set).disc.d, 3.0);
    }
}
