use crate::config::{Config, ViewMode};
use crate::message::Message;
use crate::session::ChatSession;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: ChatSession,
    pub view_mode: ViewMode,
    pub endpoint: String,

    // Transcript scroll state
    pub chat_scroll: u16,
    pub follow_tail: bool,  // pin the view to the newest message
    pub chat_height: u16,   // inner height of the chat area, set on render
    pub chat_width: u16,    // inner width of the chat area, set on render

    // Animation state for "Thinking..." indicator
    pub animation_frame: u8,
}

impl App {
    pub fn new(session: ChatSession, config: &Config) -> Self {
        Self {
            should_quit: false,
            session,
            view_mode: config.view_mode,
            endpoint: config.endpoint.clone(),
            chat_scroll: 0,
            follow_tail: true,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    /// Send whatever is in the input box
    pub fn submit(&mut self) {
        // The reply comes back as an event, so the handle isn't needed here
        if self.session.submit().is_some() {
            self.follow_tail = true;
        }
    }

    /// A request finished
    pub fn on_reply(&mut self, reply: Message) {
        self.session.receive(reply);
        self.follow_tail = true;
    }

    pub fn is_loading(&self) -> bool {
        self.session.pending() > 0
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggle();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_tail = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        // Clamped against the content height on the next render
        self.chat_scroll = self.chat_scroll.saturating_add(lines);
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }

    /// Reconcile the scroll offset with the rendered transcript height.
    pub fn sync_scroll(&mut self, content_height: u16) {
        let max_scroll = content_height.saturating_sub(self.chat_height);
        if self.follow_tail || self.chat_scroll >= max_scroll {
            self.chat_scroll = max_scroll;
            self.follow_tail = true;
        }
    }
}
