use crate::modules::conversation::model::{Conversation, ConversationId, ConversationSample};
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

pub const COLLECTION_NAME: &str = "conversations";

pub struct ConversationCrud {
    collection: Collection<Conversation>,
}

impl ConversationCrud {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    /// Conversations with no `userId` field at all.
    pub fn orphan_filter() -> Document {
        doc! { "userId": { "$exists": false } }
    }

    pub async fn create(&self, mut conversation: Conversation) -> Result<ObjectId, mongodb::error::Error> {
        let id = *conversation.id.get_or_insert_with(ObjectId::new);
        self.collection.insert_one(conversation).await?;
        Ok(id)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Conversation>, mongodb::error::Error> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    pub async fn count_orphaned(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.count_documents(Self::orphan_filter()).await
    }

    pub async fn find_orphaned_samples(&self, limit: i64) -> Result<Vec<ConversationSample>, mongodb::error::Error> {
        let cursor = self
            .collection
            .clone_with_type::<ConversationSample>()
            .find(Self::orphan_filter())
            .projection(doc! { "_id": 1, "title": 1, "createdAt": 1 })
            .limit(limit)
            .await?;

        cursor.try_collect().await
    }

    pub async fn find_orphaned_ids(&self) -> Result<Vec<ObjectId>, mongodb::error::Error> {
        let cursor = self
            .collection
            .clone_with_type::<ConversationId>()
            .find(Self::orphan_filter())
            .projection(doc! { "_id": 1 })
            .await?;

        let ids: Vec<ConversationId> = cursor.try_collect().await?;
        Ok(ids.into_iter().map(|c| c.id).collect())
    }

    pub async fn delete_orphaned(&self) -> Result<u64, mongodb::error::Error> {
        let result = self.collection.delete_many(Self::orphan_filter()).await?;
        Ok(result.deleted_count)
    }
}
