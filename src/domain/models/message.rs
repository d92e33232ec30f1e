#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use uuid::Uuid;

use super::Role;
use super::Source;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub sources: Option<Vec<Source>>,
    pub timestamp: DateTime<Local>,
    mtype: MessageType,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.replace('\t', "  "),
            sources: None,
            timestamp: Local::now(),
            mtype: MessageType::Normal,
        };
    }

    pub fn new_with_type(role: Role, mtype: MessageType, content: &str) -> Message {
        let mut message = Message::new(role, content);
        message.mtype = mtype;
        return message;
    }

    pub fn with_sources(role: Role, content: &str, sources: Vec<Source>) -> Message {
        let mut message = Message::new(role, content);
        message.sources = Some(sources);
        return message;
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn sources(&self) -> &[Source] {
        return self.sources.as_deref().unwrap_or_default();
    }

    pub fn time_label(&self) -> String {
        return self.timestamp.format("%H:%M:%S").to_string();
    }
}
