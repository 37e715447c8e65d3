use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub conversation_id: ObjectId,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bson::Document>,
    pub created_at: bson::DateTime,
}

impl Message {
    pub fn new(conversation_id: ObjectId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: None,
            conversation_id,
            role,
            content: content.into(),
            tokens: None,
            latency_ms: None,
            metadata: None,
            created_at: bson::DateTime::now(),
        }
    }

    pub fn user(conversation_id: ObjectId, content: impl Into<String>) -> Self {
        Self::new(conversation_id, MessageRole::User, content)
    }

    pub fn assistant(conversation_id: ObjectId, content: impl Into<String>) -> Self {
        Self::new(conversation_id, MessageRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_names() {
        let conversation_id = ObjectId::new();
        let raw = bson::to_document(&Message::assistant(conversation_id, "hi")).unwrap();
        assert_eq!(raw.get_object_id("conversationId").unwrap(), conversation_id);
        assert_eq!(raw.get_str("role").unwrap(), "assistant");
        assert!(!raw.contains_key("latencyMs"));
        assert!(raw.contains_key("createdAt"));
    }
}
