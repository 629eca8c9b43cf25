// Normalized session export
// Writes parsed sessions to ~/.agentreflect/sessions/<format>/<date>/<id>/

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use color_eyre::{eyre::Context, Result};
use reflect_core::{Session, SessionFormat};
use serde_json::json;

/// Writes `session.json` and `messages.jsonl` for a parsed session
pub struct SessionExporter {
    base_dir: PathBuf,
}

impl SessionExporter {
    /// Create an exporter under `$HOME/.agentreflect/sessions`
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME not set")?;
        let base_dir = PathBuf::from(home).join(".agentreflect").join("sessions");
        Ok(SessionExporter { base_dir })
    }

    /// Create an exporter with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        SessionExporter { base_dir }
    }

    fn session_dir(&self, format: SessionFormat, date: &str, session_id: &str) -> PathBuf {
        self.base_dir.join(format.as_str()).join(date).join(session_id)
    }

    /// Export a session, replacing any earlier export with the same id and date.
    /// Returns the session directory.
    pub fn export(&self, session: &Session, session_id: &str) -> Result<PathBuf> {
        let now = chrono::Utc::now();
        let date = now.format("%Y-%m-%d").to_string();
        let session_dir = self.session_dir(session.format(), &date, session_id);

        fs::create_dir_all(&session_dir)
            .with_context(|| format!("Failed to create directory: {}", session_dir.display()))?;

        let metadata = json!({
            "id": session_id,
            "source": session.source(),
            "format_detected": session.format(),
            "stats": session.stats(),
            "created_at": now.to_rfc3339(),
        });

        let session_json_path = session_dir.join("session.json");
        let file = fs::File::create(&session_json_path)
            .with_context(|| format!("Failed to create {}", session_json_path.display()))?;
        serde_json::to_writer_pretty(file, &metadata)?;

        let messages_path = session_dir.join("messages.jsonl");
        let file = fs::File::create(&messages_path)
            .with_context(|| format!("Failed to create {}", messages_path.display()))?;
        let mut writer = BufWriter::new(file);
        for (idx, message) in session.messages().iter().enumerate() {
            let line = json!({
                "id": idx + 1,
                "role": message.role,
                "content": message.content,
                "metadata": message.metadata,
            });
            serde_json::to_writer(&mut writer, &line)?;
            writeln!(writer)?;
        }
        writer.flush()?;

        tracing::info!(
            id = session_id,
            messages = session.message_count(),
            dir = %session_dir.display(),
            "exported session"
        );
        Ok(session_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflect_core::parse_session;
    use tempfile::TempDir;

    #[test]
    fn test_export_layout() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let exporter = SessionExporter::with_base_dir(temp_dir.path().to_path_buf());
        let session = parse_session(
            r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello","id":"m2"}]"#,
            "chat.json",
        )?;

        let session_dir = exporter.export(&session, "chat")?;

        assert!(session_dir.starts_with(temp_dir.path().join("structured-array")));
        assert!(session_dir.ends_with("chat"));

        let metadata: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(session_dir.join("session.json"))?)?;
        assert_eq!(metadata["id"], "chat");
        assert_eq!(metadata["source"], "chat.json");
        assert_eq!(metadata["format_detected"], "structured-array");
        assert_eq!(metadata["stats"]["total_messages"], 2);
        Ok(())
    }

    #[test]
    fn test_export_messages_jsonl() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let exporter = SessionExporter::with_base_dir(temp_dir.path().to_path_buf());
        let session = parse_session("Human: ping\nBot: pong", "stdin")?;

        let session_dir = exporter.export(&session, "stdin")?;
        let content = fs::read_to_string(session_dir.join("messages.jsonl"))?;
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(serde_json::from_str)
            .collect::<std::result::Result<_, _>>()?;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[0]["role"], "user");
        assert_eq!(lines[1]["role"], "assistant");
        assert_eq!(lines[1]["content"], "pong");
        Ok(())
    }

    #[test]
    fn test_reexport_overwrites() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let exporter = SessionExporter::with_base_dir(temp_dir.path().to_path_buf());
        let session = parse_session("User: once", "")?;

        exporter.export(&session, "s1")?;
        let session_dir = exporter.export(&session, "s1")?;

        let content = fs::read_to_string(session_dir.join("messages.jsonl"))?;
        assert_eq!(content.lines().count(), 1);
        Ok(())
    }
}
