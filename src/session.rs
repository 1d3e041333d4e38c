use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::AnswerService;
use crate::context::chunker::{ChunkConfig, chunk_words};
use crate::context::score::KeywordScorer;
use crate::context::select::select_relevant;
use crate::error::{AppError, AppResult};

pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl Turn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), created_at: now_iso() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No document loaded; questions are rejected.
    Empty,
    /// Document loaded, no conversation yet.
    Loaded,
    /// Document loaded and at least one turn recorded.
    Active,
}

/// One per user session. Owns the combined document text and the
/// conversation history exclusively; nothing else mutates them, and
/// sessions are never shared across users.
pub struct ContextSession {
    id: String,
    document: Option<String>,
    history: Vec<Turn>,
    config: ChunkConfig,
}

impl ContextSession {
    pub fn new(config: ChunkConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            document: None,
            history: Vec::new(),
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        match (&self.document, self.history.is_empty()) {
            (None, _) => SessionState::Empty,
            (Some(_), true) => SessionState::Loaded,
            (Some(_), false) => SessionState::Active,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Replace the document wholesale and reset the conversation. Blank
    /// text is rejected and leaves the session untouched, so a failed
    /// re-process never clobbers a working session.
    pub fn load(&mut self, document_text: impl Into<String>) -> AppResult<()> {
        let text = document_text.into();
        if text.trim().is_empty() {
            return Err(AppError::NoUsableText);
        }
        self.document = Some(text);
        self.history.clear();
        Ok(())
    }

    /// Drop the document and history. Always succeeds.
    pub fn clear(&mut self) {
        self.document = None;
        self.history.clear();
    }

    /// Answer a question using the single most relevant chunk of the loaded
    /// document. The turn pair is recorded only after the service call
    /// succeeds. A failed call leaves history exactly as it was.
    pub async fn ask(
        &mut self,
        question: &str,
        service: &dyn AnswerService,
    ) -> AppResult<String> {
        let document = self.document.as_deref().ok_or(AppError::NotLoaded)?;

        let chunks = chunk_words(document, &self.config)?;
        let relevant = select_relevant(&chunks, question, &KeywordScorer)?;
        eprintln!(
            "[session] question routed to chunk {} of {} ({} words)",
            relevant.id,
            chunks.len(),
            relevant.word_count
        );

        let answer = service.answer(&relevant.text, question).await?;

        self.history.push(Turn::new(Role::User, question));
        self.history.push(Turn::new(Role::Assistant, answer.clone()));
        Ok(answer)
    }
}

impl Default for ContextSession {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}
