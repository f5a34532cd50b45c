//! Chat transcript types
//!
//! These don't depend on the terminal UI, so both the full-screen chat and the
//! one-shot `ask` command render from the same data.

use serde::{Deserialize, Deserializer, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// Discriminant of a message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Items,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Text(String),
    Items(Vec<Item>),
}

/// One entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub payload: Payload,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            payload: Payload::Text(text.into()),
        }
    }

    pub fn bot_text(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            payload: Payload::Text(text.into()),
        }
    }

    pub fn bot_items(items: Vec<Item>) -> Self {
        Self {
            sender: Sender::Bot,
            payload: Payload::Items(items),
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self.payload {
            Payload::Text(_) => MessageKind::Text,
            Payload::Items(_) => MessageKind::Items,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Items(_) => None,
        }
    }

    pub fn items(&self) -> Option<&[Item]> {
        match &self.payload {
            Payload::Items(items) => Some(items),
            Payload::Text(_) => None,
        }
    }
}

// Text columns can be NaN in the dataframe, which arrives as `null`
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A recommended phone as returned by the backend.
///
/// Numeric columns come straight out of a dataframe, so any of them may be
/// missing, null, or a float where an integer would be expected.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "brand_name", default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(rename = "ram_capacity", default)]
    pub ram_gb: Option<f64>,
    #[serde(rename = "battery_capacity", default)]
    pub battery_mah: Option<f64>,
    #[serde(rename = "primary_camera_rear", default)]
    pub camera_mp: Option<f64>,
    #[serde(rename = "avg_rating", default)]
    pub rating: Option<f64>,
}

impl Item {
    /// Display key used to tell items apart in a rendered list
    pub fn key(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }

    pub fn price_label(&self) -> String {
        format!("₹{}", format_number(self.price))
    }

    pub fn ram_label(&self) -> String {
        format!("{}GB", format_number(self.ram_gb))
    }

    pub fn battery_label(&self) -> String {
        format!("{}mAh", format_number(self.battery_mah))
    }

    pub fn camera_label(&self) -> String {
        format!("{}MP", format_number(self.camera_mp))
    }

    pub fn rating_label(&self) -> String {
        format_number(self.rating)
    }
}

/// Format a dataframe number: whole values without a fraction, missing as "-"
pub fn format_number(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if !v.is_finite() => "-".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => {
            let s = format!("{:.2}", v);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}
