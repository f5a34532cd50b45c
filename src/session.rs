//! The chat session: an append-only transcript plus the line being typed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::message::Message;
use crate::recommend::{Recommendation, RecommendError, Recommender};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Map the outcome of one request to the bot message it produces
pub fn reply_for(result: Result<Recommendation, RecommendError>) -> Message {
    match result {
        Ok(Recommendation::Items(items)) => Message::bot_items(items),
        Ok(Recommendation::Empty(message)) => Message::bot_text(message),
        Err(e) => Message::bot_text(e.user_message()),
    }
}

pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    cursor: usize, // in chars, not bytes
    pending: usize,
    recommender: Arc<dyn Recommender>,
    reply_tx: mpsc::UnboundedSender<Message>,
}

impl ChatSession {
    /// Create an empty session. Replies to submitted queries arrive on the
    /// returned receiver and must be handed back through [`ChatSession::receive`].
    pub fn new(recommender: Arc<dyn Recommender>) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let session = Self {
            messages: Vec::new(),
            input: String::new(),
            cursor: 0,
            pending: 0,
            recommender,
            reply_tx,
        };
        (session, reply_rx)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of requests still in flight
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Send the current input.
    ///
    /// Blank input is ignored. Otherwise the user message is appended and the
    /// input cleared before this returns; the bot reply is delivered later on
    /// the reply channel. Returns the handle of the spawned request.
    pub fn submit(&mut self) -> Option<JoinHandle<()>> {
        if self.input.trim().is_empty() {
            return None;
        }

        let query = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.messages.push(Message::user(query.clone()));
        self.pending += 1;

        tracing::debug!(query = %query, pending = self.pending, "submitting query");

        let recommender = Arc::clone(&self.recommender);
        let reply_tx = self.reply_tx.clone();
        Some(tokio::spawn(async move {
            let reply = reply_for(recommender.recommend(&query).await);
            // The receiver is gone once the UI has shut down
            let _ = reply_tx.send(reply);
        }))
    }

    /// Append a finished reply to the transcript.
    pub fn receive(&mut self, reply: Message) {
        self.pending = self.pending.saturating_sub(1);
        self.messages.push(reply);
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor = self.input.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}
