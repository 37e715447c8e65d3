use async_trait::async_trait;
use bson::oid::ObjectId;
use mongodb::Database;

use crate::error::CleanupError;
use crate::modules::conversation::{crud::ConversationCrud, model::ConversationSample};
use crate::modules::message::crud::MessageCrud;

/// The database operations the cleanup procedure relies on.
#[async_trait]
pub trait OrphanStore: Send + Sync {
    async fn count_orphaned_conversations(&self) -> Result<u64, CleanupError>;
    async fn sample_orphaned_conversations(&self, limit: i64) -> Result<Vec<ConversationSample>, CleanupError>;
    async fn orphaned_conversation_ids(&self) -> Result<Vec<ObjectId>, CleanupError>;
    /// Deletes messages whose `conversationId` is in `conversation_ids`.
    async fn delete_messages_for(&self, conversation_ids: &[ObjectId]) -> Result<u64, CleanupError>;
    async fn delete_orphaned_conversations(&self) -> Result<u64, CleanupError>;
}

pub struct MongoStore {
    conversations: ConversationCrud,
    messages: MessageCrud,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            conversations: ConversationCrud::new(db),
            messages: MessageCrud::new(db),
        }
    }
}

#[async_trait]
impl OrphanStore for MongoStore {
    async fn count_orphaned_conversations(&self) -> Result<u64, CleanupError> {
        Ok(self.conversations.count_orphaned().await?)
    }

    async fn sample_orphaned_conversations(&self, limit: i64) -> Result<Vec<ConversationSample>, CleanupError> {
        Ok(self.conversations.find_orphaned_samples(limit).await?)
    }

    async fn orphaned_conversation_ids(&self) -> Result<Vec<ObjectId>, CleanupError> {
        Ok(self.conversations.find_orphaned_ids().await?)
    }

    async fn delete_messages_for(&self, conversation_ids: &[ObjectId]) -> Result<u64, CleanupError> {
        Ok(self.messages.delete_by_conversation_ids(conversation_ids).await?)
    }

    async fn delete_orphaned_conversations(&self) -> Result<u64, CleanupError> {
        Ok(self.conversations.delete_orphaned().await?)
    }
}
