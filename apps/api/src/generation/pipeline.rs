//! Pipeline orchestrator: one report request from normalized input to finished bundle.
//!
//! The three model calls share one user prompt and run concurrently. The document
//! render waits only for the roadmap and the long-form text, so it overlaps with the
//! short narrative. The first failure aborts the remaining work and no partial bundle
//! is returned.

use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::models::{Lang, ParticipantProfile, TestResultSet};
use crate::generation::prompts::{
    build_prompt, long_form_system, roadmap_system, short_narrative_system,
};
use crate::generation::roadmap::{parse_roadmap, Roadmap};
use crate::layout::{render, DocumentInput};
use crate::llm_client::{ArtifactKind, GenerationOptions, LlmError, NarrativeGenerator};

/// Everything produced for one report.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub narrative: String,
    /// Empty when the model's roadmap could not be parsed.
    pub roadmap: Roadmap,
    pub document: Vec<u8>,
    pub filename: String,
}

pub async fn generate_report(
    generator: &dyn NarrativeGenerator,
    profile: &ParticipantProfile,
    tests: &TestResultSet,
    lang: Lang,
) -> Result<ReportBundle, AppError> {
    let report_id = Uuid::new_v4();
    let span = info_span!("report", %report_id, lang = lang.code());

    async move {
        let prompt = build_prompt(Some(profile), tests, lang);
        info!(tests = tests.len(), "Generating report artifacts");

        let narrative = generate_artifact(
            generator,
            ArtifactKind::ShortNarrative,
            short_narrative_system(lang),
            &prompt,
        );

        let document = async {
            let (roadmap_raw, long_form) = tokio::try_join!(
                generate_artifact(generator, ArtifactKind::Roadmap, roadmap_system(lang), &prompt),
                generate_artifact(generator, ArtifactKind::LongForm, long_form_system(lang), &prompt),
            )?;

            let roadmap = recover_roadmap(&roadmap_raw);
            let generated_at = Utc::now();
            let input = DocumentInput::new(
                profile.clone(),
                tests.clone(),
                Some(roadmap.clone()),
                long_form,
                generated_at,
            );
            let bytes = render_document(input, lang).await?;
            Ok::<_, AppError>((roadmap, bytes, generated_at))
        };

        let (narrative, (roadmap, document, generated_at)) = tokio::try_join!(narrative, document)?;

        let filename = report_filename(lang, generated_at);
        info!(
            bytes = document.len(),
            roadmap_phases = roadmap.phases.len(),
            "Report generated: {filename}"
        );

        Ok(ReportBundle {
            narrative,
            roadmap,
            document,
            filename,
        })
    }
    .instrument(span)
    .await
}

/// `profile-report-YYYYMMDD-HHMMSS.pdf`, prefix per language, UTC.
pub fn report_filename(lang: Lang, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}.pdf",
        lang.labels().filename_prefix,
        at.format("%Y%m%d-%H%M%S")
    )
}

/// Runs one generation. Blank output is a failure no matter which generator produced it.
async fn generate_artifact(
    generator: &dyn NarrativeGenerator,
    artifact: ArtifactKind,
    system: &str,
    prompt: &str,
) -> Result<String, AppError> {
    let options = GenerationOptions::for_artifact(artifact);
    let text = generator
        .generate(system, prompt, &options)
        .await
        .map_err(|e| AppError::generation(artifact, e))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::generation(artifact, LlmError::EmptyContent));
    }

    info!(%artifact, chars = text.len(), "Artifact generated");
    Ok(text.to_string())
}

fn recover_roadmap(raw: &str) -> Roadmap {
    match parse_roadmap(raw) {
        Ok(roadmap) => roadmap,
        Err(e) => {
            warn!("Discarding malformed roadmap, the section will be omitted: {e}");
            Roadmap::default()
        }
    }
}

async fn render_document(input: DocumentInput, lang: Lang) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || render(&input, lang))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed while rendering: {e}")))?
        .map_err(AppError::from)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    enum Script {
        Text(&'static str),
        Fail(fn() -> LlmError),
    }

    struct ScriptedGenerator {
        short: Script,
        roadmap: Script,
        long: Script,
        calls: Mutex<Vec<(ArtifactKind, String, String)>>,
    }

    const ROADMAP_JSON: &str = r#"{
        "vision": "Lead a design team",
        "phases": [
            {"title": "Foundation", "timeframe": "Months 1-3", "focus": "Delegation", "steps": ["Find a mentor"]},
            {"title": "Growth", "timeframe": "Months 4-9", "focus": "Visibility", "steps": ["Present monthly"]}
        ],
        "habits": ["Weekly review"],
        "support": ["Design community"],
        "finalMessage": "Keep going."
    }"#;

    impl ScriptedGenerator {
        fn ok() -> Self {
            Self {
                short: Script::Text("A short narrative about Ana."),
                roadmap: Script::Text(ROADMAP_JSON),
                long: Script::Text("## Strengths\nClear thinker.\n- Direct\n- Curious"),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with(mut self, artifact: ArtifactKind, script: Script) -> Self {
            match artifact {
                ArtifactKind::ShortNarrative => self.short = script,
                ArtifactKind::Roadmap => self.roadmap = script,
                ArtifactKind::LongForm => self.long = script,
            }
            self
        }
    }

    #[async_trait]
    impl NarrativeGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            system: &str,
            prompt: &str,
            options: &GenerationOptions,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push((
                options.artifact,
                system.to_string(),
                prompt.to_string(),
            ));
            let script = match options.artifact {
                ArtifactKind::ShortNarrative => &self.short,
                ArtifactKind::Roadmap => &self.roadmap,
                ArtifactKind::LongForm => &self.long,
            };
            match script {
                Script::Text(text) => Ok(text.to_string()),
                Script::Fail(make) => Err(make()),
            }
        }
    }

    fn profile() -> ParticipantProfile {
        ParticipantProfile::from_value(&json!({"name": "Ana Souza", "age": 34})).unwrap()
    }

    fn tests() -> TestResultSet {
        TestResultSet::from_value(&json!({
            "disc-insight": {"results": {"D": 45, "I": 30, "S": 10, "C": 15}},
            "archetypes": {"results": {"Sage": 80}}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_run_builds_bundle() {
        let generator = ScriptedGenerator::ok();
        let bundle = generate_report(&generator, &profile(), &tests(), Lang::En)
            .await
            .unwrap();

        assert_eq!(bundle.narrative, "A short narrative about Ana.");
        assert_eq!(bundle.roadmap.phases.len(), 2);
        assert_eq!(bundle.roadmap.final_message, "Keep going.");
        assert!(bundle.document.starts_with(b"%PDF"));
        assert!(bundle.filename.starts_with("profile-report-"));
        assert!(bundle.filename.ends_with(".pdf"));

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for (artifact, system, prompt) in calls.iter() {
            let expected = match artifact {
                ArtifactKind::ShortNarrative => short_narrative_system(Lang::En),
                ArtifactKind::Roadmap => roadmap_system(Lang::En),
                ArtifactKind::LongForm => long_form_system(Lang::En),
            };
            assert_eq!(system.as_str(), expected);
            assert_eq!(prompt, &build_prompt(Some(&profile()), &tests(), Lang::En));
        }
    }

    #[tokio::test]
    async fn test_blank_completion_fails_for_each_artifact() {
        for artifact in [
            ArtifactKind::ShortNarrative,
            ArtifactKind::Roadmap,
            ArtifactKind::LongForm,
        ] {
            let generator = ScriptedGenerator::ok().with(artifact, Script::Text("  \n\t "));
            let result = generate_report(&generator, &profile(), &tests(), Lang::En).await;
            match result {
                Err(AppError::GenerationFailed {
                    artifact: Some(failed),
                    source: LlmError::EmptyContent,
                }) => assert_eq!(failed, artifact),
                other => panic!("expected empty-content failure for {artifact}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_roadmap_is_replaced_with_empty() {
        let generator =
            ScriptedGenerator::ok().with(ArtifactKind::Roadmap, Script::Text("Sure! Here it is"));
        let bundle = generate_report(&generator, &profile(), &tests(), Lang::Pt)
            .await
            .unwrap();

        assert_eq!(bundle.roadmap, Roadmap::default());
        assert!(bundle.document.starts_with(b"%PDF"));
        assert!(bundle.filename.starts_with("relatorio-perfil-"));
    }

    #[tokio::test]
    async fn test_generator_error_fails_whole_request() {
        let generator = ScriptedGenerator::ok().with(
            ArtifactKind::LongForm,
            Script::Fail(|| LlmError::Timeout {
                after: Duration::from_secs(90),
            }),
        );
        let err = generate_report(&generator, &profile(), &tests(), Lang::En)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::GenerationFailed {
                artifact: Some(ArtifactKind::LongForm),
                source: LlmError::Timeout { .. },
            }
        ));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_refusal_fails_with_bad_gateway() {
        let generator = ScriptedGenerator::ok().with(
            ArtifactKind::ShortNarrative,
            Script::Fail(|| LlmError::Blocked {
                reason: "refusal".to_string(),
            }),
        );
        let err = generate_report(&generator, &profile(), &tests(), Lang::En)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_report_filename_format() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 5).unwrap();
        assert_eq!(
            report_filename(Lang::En, at),
            "profile-report-20260314-093005.pdf"
        );
        assert_eq!(
            report_filename(Lang::Pt, at),
            "relatorio-perfil-20260314-093005.pdf"
        );
    }

    #[test]
    fn test_recover_roadmap_accepts_fenced_json() {
        let fenced = format!("```json\n{ROADMAP_JSON}\n```");
        assert_eq!(recover_roadmap(&fenced).phases.len(), 2);
        assert!(recover_roadmap("{not json").is_empty());
    }
}
