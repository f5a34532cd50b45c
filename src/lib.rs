pub mod app;
pub mod config;
pub mod handler;
pub mod logging;
pub mod message;
pub mod recommend;
pub mod render;
pub mod session;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use config::{Config, ResponseShape, ViewMode};
pub use message::{Item, Message, MessageKind, Payload, Sender};
pub use recommend::{RecommendClient, RecommendError, Recommendation, Recommender};
pub use session::ChatSession;
