use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::fallback::Notice;
use crate::api::types::{ChatResponse, CitedDocument};
use crate::api::KnowledgeBase;
use crate::resolver::Selector;

use super::render_citation_list;
use super::route::{render_nav, Route};
use super::session::ViewSession;
use super::CitationSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub author: Author,
    pub content: String,
    pub citations: Vec<CitedDocument>,
    pub timestamp: DateTime<Utc>,
}

/// Chat history for one session. Only the newest answer's citations can
/// be expanded.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    selector: Selector<usize>,
    next_id: u64,
}

impl ChatTranscript {
    pub fn push_user(&mut self, text: &str) -> u64 {
        self.selector.reset();
        self.push(Author::User, text.to_string(), Vec::new())
    }

    pub fn push_answer(&mut self, response: ChatResponse) -> &ChatMessage {
        let mut citations = response.citations;
        for doc in &mut citations {
            doc.normalize_path();
        }
        self.selector.reset();
        self.push(Author::Assistant, response.response, citations);
        &self.messages[self.messages.len() - 1]
    }

    fn push(&mut self, author: Author, content: String, citations: Vec<CitedDocument>) -> u64 {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: self.next_id,
            author,
            content,
            citations,
            timestamp: Utc::now(),
        });
        self.next_id
    }

    fn latest_answer(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.author == Author::Assistant)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.selector.reset();
    }

    /// The user message `answer` replies to, as it was stored.
    fn question_for(&self, answer: &ChatMessage) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.author == Author::User && m.id < answer.id)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Render an assistant message, the question it answers, and its
    /// numbered citations.
    pub fn render_answer(&self, message: &ChatMessage) -> String {
        let question = self.question_for(message);
        let mut out = format!("{}\n\n**Q:** {}\n\n**A:** {}", render_nav(Route::Chat), question, message.content);
        if !message.citations.is_empty() {
            out.push_str("\n\n**Cited Documents:**\n");
            out.push_str(&render_citation_list(
                &message.citations,
                self.selector.selected().copied(),
                2,
            ));
            out.push_str("Use `/kb open <n>` to view a cited document.");
        }
        out
    }
}

impl CitationSurface for ChatTranscript {
    fn citations(&self) -> &[CitedDocument] {
        self.latest_answer().map(|m| m.citations.as_slice()).unwrap_or(&[])
    }

    fn selector(&self) -> &Selector<usize> {
        &self.selector
    }

    fn selector_mut(&mut self) -> &mut Selector<usize> {
        &mut self.selector
    }
}

#[derive(Debug)]
pub enum AskOutcome {
    /// Blank question; nothing was sent.
    Ignored,
    Answered(ChatMessage),
    /// The question stays in the transcript; no answer is appended.
    Failed(Notice),
}

pub const ASK_FAILED: &str = "Failed to get a response from the knowledge base";

/// Append the question, ask the knowledge base, append the answer.
pub async fn ask(session: &Mutex<ViewSession>, api: &dyn KnowledgeBase, question: &str) -> AskOutcome {
    let question = question.trim();
    {
        let mut guard = session.lock().await;
        guard.navigate(Route::Chat);
        if question.is_empty() {
            return AskOutcome::Ignored;
        }
        guard.chat.push_user(question);
    }

    match api.query(question).await {
        Ok(response) => {
            info!(citations = response.citations.len(), "answer received");
            let mut guard = session.lock().await;
            AskOutcome::Answered(guard.chat.push_answer(response).clone())
        }
        Err(e) => {
            warn!(error = %e, "query failed");
            AskOutcome::Failed(Notice::error(ASK_FAILED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::{doc, StubKnowledgeBase};

    #[tokio::test]
    async fn test_failed_query_keeps_only_user_message() {
        let api = StubKnowledgeBase::failing();
        let session = Mutex::new(ViewSession::default());

        match ask(&session, &api, "How do I reset the BIOS?").await {
            AskOutcome::Failed(notice) => {
                assert!(notice.is_error());
                assert_eq!(notice, Notice::error(ASK_FAILED));
            }
            other => panic!("unexpected {other:?}"),
        }

        let guard = session.lock().await;
        assert_eq!(guard.chat.messages.len(), 1);
        assert_eq!(guard.chat.messages[0].author, Author::User);
        assert_eq!(guard.chat.messages[0].content, "How do I reset the BIOS?");
    }

    #[tokio::test]
    async fn test_answer_normalizes_citations() {
        let api = StubKnowledgeBase {
            answer: Some(ChatResponse {
                response: "Hold the power button.".to_string(),
                citations: vec![doc(r"C:\kb\tmp\bios\reset.md", "# Reset", 0.77)],
            }),
            ..Default::default()
        };
        let session = Mutex::new(ViewSession::default());

        let AskOutcome::Answered(message) = ask(&session, &api, "reset?").await else {
            panic!("expected an answer");
        };
        assert_eq!(message.author, Author::Assistant);
        assert_eq!(message.citations[0].file_path, r"bios\reset.md");

        let guard = session.lock().await;
        assert_eq!(guard.route, Route::Chat);
        assert_eq!(guard.chat.messages.len(), 2);
        assert_eq!(guard.chat.citations().len(), 1);
        let rendered = guard.chat.render_answer(&message);
        assert!(rendered.contains("`1` bios\\reset.md (score 0.77)"));
    }

    #[tokio::test]
    async fn test_rendered_question_is_trimmed() {
        let api = StubKnowledgeBase {
            answer: Some(ChatResponse {
                response: "Yes.".to_string(),
                citations: Vec::new(),
            }),
            ..Default::default()
        };
        let session = Mutex::new(ViewSession::default());
        ask(&session, &api, "first?").await;

        let AskOutcome::Answered(message) = ask(&session, &api, "   padded question?  \n").await else {
            panic!("expected an answer");
        };
        let rendered = session.lock().await.chat.render_answer(&message);
        assert!(rendered.contains("**Q:** padded question?\n\n**A:** Yes."));
        assert!(!rendered.contains("first?"));
    }

    #[tokio::test]
    async fn test_blank_question_ignored() {
        let api = StubKnowledgeBase::default();
        let session = Mutex::new(ViewSession::default());
        assert!(matches!(ask(&session, &api, "  ").await, AskOutcome::Ignored));
        assert_eq!(api.calls(), 0);
        assert!(session.lock().await.chat.messages.is_empty());
    }

    #[test]
    fn test_new_question_resets_selection() {
        let mut chat = ChatTranscript::default();
        chat.push_answer(ChatResponse {
            response: "a".to_string(),
            citations: vec![doc("x.md", "", 0.1)],
        });
        chat.selector_mut().select(0);
        chat.push_user("next");
        assert!(chat.selector().selected().is_none());
        // Citations still come from the last answer until a new one lands.
        assert_eq!(chat.citations().len(), 1);
    }
}
