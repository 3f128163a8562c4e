//! Safety and communication events

use std::fmt;
use serde::{Serialize, Deserialize};

/// Kind of event a vehicle reports
///
/// Encoded on the wire as an integer: 0 = Accident, 1 = Communication,
/// 2 = Multimedia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MessageType {
    /// Accident report
    #[default]
    Accident,

    /// Vehicle-to-vehicle communication
    Communication,

    /// Multimedia payload
    Multimedia,
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        match kind {
            MessageType::Accident => 0,
            MessageType::Communication => 1,
            MessageType::Multimedia => 2,
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = UnknownMessageType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageType::Accident),
            1 => Ok(MessageType::Communication),
            2 => Ok(MessageType::Multimedia),
            other => Err(UnknownMessageType(other)),
        }
    }
}

/// Integer that does not name a message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessageType(pub u8);

impl fmt::Display for UnknownMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message type: {}", self.0)
    }
}

/// Message payload stored in the event log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Message {
    /// Caller-assigned message number
    #[serde(rename = "message_id", default)]
    pub id: i64,

    /// Kind of event
    #[serde(rename = "message_type", default)]
    pub kind: MessageType,

    /// Event body
    #[serde(rename = "message_content", default)]
    pub content: String,
}

/// A message together with the real identity of the car that sent it
///
/// The message fields are flattened into the same JSON object as `car_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Originating car identity
    #[serde(rename = "car_id", default)]
    pub car_id: String,

    /// Embedded message payload
    #[serde(flatten)]
    pub message: Message,
}
