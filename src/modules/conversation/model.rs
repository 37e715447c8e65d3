use bson::oid::ObjectId;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Conversation {
    pub fn new(user_id: Option<String>, title: impl Into<String>) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: None,
            user_id,
            title: Some(title.into()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.user_id.is_none()
    }
}

/// Reporting projection of a conversation. Legacy documents may lack
/// `title` or `createdAt`, so both are optional here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSample {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<bson::DateTime>,
}

impl ConversationSample {
    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.map(|dt| dt.to_chrono())
    }

    pub fn created_at_rfc3339(&self) -> String {
        self.created_at_utc()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationId {
    #[serde(rename = "_id")]
    pub id: ObjectId,
}
