use crate::modules::message::model::Message;
use bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};

pub const COLLECTION_NAME: &str = "messages";

pub struct MessageCrud {
    collection: Collection<Message>,
}

impl MessageCrud {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_NAME),
        }
    }

    pub async fn create(&self, mut message: Message) -> Result<ObjectId, mongodb::error::Error> {
        let id = *message.id.get_or_insert_with(ObjectId::new);
        self.collection.insert_one(message).await?;
        Ok(id)
    }

    pub async fn count_by_conversation(&self, conversation_id: &ObjectId) -> Result<u64, mongodb::error::Error> {
        self.collection
            .count_documents(doc! { "conversationId": conversation_id })
            .await
    }

    pub async fn delete_by_conversation_ids(&self, conversation_ids: &[ObjectId]) -> Result<u64, mongodb::error::Error> {
        if conversation_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .delete_many(doc! { "conversationId": { "$in": conversation_ids.to_vec() } })
            .await?;
        Ok(result.deleted_count)
    }
}
