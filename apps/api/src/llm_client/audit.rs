use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::ArtifactKind;

/// Appends every prompt sent to the model to `<dir>/<artifact>.jsonl`.
///
/// Writes happen on a spawned task. A failed write is logged and otherwise ignored,
/// so report generation never waits on or fails because of the audit trail.
#[derive(Debug, Clone)]
pub struct PromptAuditLog {
    dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    ts: String,
    artifact: ArtifactKind,
    system: &'a str,
    prompt: &'a str,
}

impl PromptAuditLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, artifact: ArtifactKind) -> PathBuf {
        self.dir.join(format!("{}.jsonl", artifact.as_str()))
    }

    /// Fire-and-forget write. Must be called from within a tokio runtime.
    pub fn record(&self, artifact: ArtifactKind, system: &str, prompt: &str) {
        let log = self.clone();
        let system = system.to_string();
        let prompt = prompt.to_string();
        tokio::spawn(async move {
            if let Err(e) = log.append(artifact, &system, &prompt).await {
                tracing::warn!(
                    "Failed to append prompt audit entry to {:?}: {}",
                    log.path_for(artifact),
                    e
                );
            }
        });
    }

    pub async fn append(
        &self,
        artifact: ArtifactKind,
        system: &str,
        prompt: &str,
    ) -> std::io::Result<()> {
        let entry = AuditEntry {
            ts: Utc::now().to_rfc3339(),
            artifact,
            system,
            prompt,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        tokio::fs::create_dir_all(&self.dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(artifact))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[tokio::test]
    async fn test_append_writes_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let log = PromptAuditLog::new(dir.path().join("audit"));

        log.append(ArtifactKind::Roadmap, "system one", "prompt one")
            .await
            .unwrap();
        log.append(ArtifactKind::Roadmap, "system two", "prompt\nwith newline")
            .await
            .unwrap();

        let contents = std::fs::read_to_string(log.path_for(ArtifactKind::Roadmap)).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["artifact"], "roadmap");
        assert_eq!(lines[0]["system"], "system one");
        assert_eq!(lines[1]["prompt"], "prompt\nwith newline");
        assert!(lines[1]["ts"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_artifacts_go_to_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let log = PromptAuditLog::new(dir.path().to_path_buf());

        log.append(ArtifactKind::ShortNarrative, "s", "p").await.unwrap();
        log.append(ArtifactKind::LongForm, "s", "p").await.unwrap();

        assert!(dir.path().join("short_narrative.jsonl").exists());
        assert!(dir.path().join("long_form.jsonl").exists());
        assert!(!dir.path().join("roadmap.jsonl").exists());
    }

    #[tokio::test]
    async fn test_unwritable_dir_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let log = PromptAuditLog::new(blocker.join("audit"));

        assert!(log.append(ArtifactKind::Roadmap, "s", "p").await.is_err());
    }
}
