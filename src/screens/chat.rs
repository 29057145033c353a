//! Kundali Q&A chat

use std::sync::Arc;

use kundali_core::{AstroService, BirthQuery, ChatMessage, KundaliPayload, RouteParams};
use tokio::task::JoinHandle;

use super::input::TextInput;
use super::take_finished;

pub const WELCOME_MESSAGE: &str =
    "Welcome to AstroGo! 🌠 How can I assist you with your Kundali today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Draft was empty after trimming; nothing changed
    Empty,
    /// A reply is still pending; nothing changed
    Busy,
}

pub struct ChatScreen {
    pub query: BirthQuery,
    pub kundali: Option<KundaliPayload>,
    /// Append-only transcript, display order
    pub messages: Vec<ChatMessage>,
    pub input: TextInput,
    /// Reason the last send got no reply, cleared by the next send
    pub last_error: Option<String>,
    pub scroll: u16,
    // Inner size of the transcript area, updated during render
    pub chat_height: u16,
    pub chat_width: u16,
    // Keep the newest message in view until the user scrolls up
    follow_bottom: bool,
    service: Arc<dyn AstroService>,
    task: Option<JoinHandle<kundali_core::Result<String>>>,
}

impl ChatScreen {
    pub fn new(params: &RouteParams, service: Arc<dyn AstroService>) -> Self {
        let kundali = params.payload().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable kundali parameter: {}", e);
            None
        });

        Self {
            query: params.birth_query(),
            kundali,
            messages: vec![ChatMessage::bot(WELCOME_MESSAGE)],
            input: TextInput::default(),
            last_error: None,
            scroll: 0,
            chat_height: 0,
            chat_width: 0,
            follow_bottom: true,
            service,
            task: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    /// Send the trimmed draft. The user message is appended before the
    /// request goes out; the reply is appended by [`poll`](Self::poll).
    pub fn send_message(&mut self) -> SendOutcome {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            return SendOutcome::Empty;
        }
        if self.task.is_some() {
            tracing::debug!("Send rejected, previous reply still pending");
            return SendOutcome::Busy;
        }

        self.messages.push(ChatMessage::user(text.clone()));
        self.input.clear();
        self.last_error = None;

        let service = Arc::clone(&self.service);
        let kundali = self.kundali.clone();
        self.task = Some(tokio::spawn(async move {
            service.chat(&text, kundali.as_ref()).await
        }));

        self.scroll_to_bottom();
        SendOutcome::Sent
    }

    pub fn poll(&mut self) {
        let Some(outcome) = take_finished(&mut self.task) else {
            return;
        };

        match outcome {
            Ok(Ok(reply)) => self.messages.push(ChatMessage::bot(reply)),
            Ok(Err(e)) => {
                tracing::error!("Error sending message: {}", e);
                self.last_error = Some(e.to_string());
            }
            Err(e) => {
                tracing::error!("Chat request task ended abnormally: {}", e);
                self.last_error = Some(format!("request was interrupted: {}", e));
            }
        }
        self.scroll_to_bottom();
    }

    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!("Cancelling pending chat reply");
            task.abort();
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        if lines > 0 {
            self.follow_bottom = false;
        }
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max);
        self.follow_bottom = self.scroll >= max;
    }

    /// Scroll so the newest message (or "Thinking...") is visible
    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.scroll = self.max_scroll();
    }

    /// Record the transcript area size and re-apply the scroll limit,
    /// following the newest message unless the user scrolled away
    pub fn fit_to_view(&mut self, width: u16, height: u16) {
        self.chat_width = width;
        self.chat_height = height;
        let max = self.max_scroll();
        self.scroll = if self.follow_bottom {
            max
        } else {
            self.scroll.min(max)
        };
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.transcript_lines().saturating_sub(visible_height)
    }

    /// Rendered height of the transcript, wrapped exactly as drawn
    fn transcript_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width
        } else {
            50
        };
        // Widest animation frame, so "Thinking..." never wraps past the limit
        let rows = crate::ui::chat_transcript(self, 2).line_count(wrap_width);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}
