//! Needs a running MongoDB: `cargo test --test cleanup_test -- --ignored`

use bson::oid::ObjectId;
use mongodb::Database;
use sr_robot_maintenance::config::database::{self, DatabaseConfig};
use sr_robot_maintenance::modules::conversation::{crud::ConversationCrud, model::Conversation};
use sr_robot_maintenance::modules::message::{crud::MessageCrud, model::Message};
use sr_robot_maintenance::services::cleanup::{Cleanup, CleanupOptions, CleanupOutcome, CleanupSummary};
use sr_robot_maintenance::services::store::MongoStore;
use std::io::Cursor;

/// Connects to a throwaway database on the server named by `MONGODB_URI`.
async fn setup_test_db() -> Database {
    dotenvy::dotenv().ok();

    let mut config = DatabaseConfig::from_env().expect("MONGODB_URI must be set");
    config.name = format!("cleanup_test_{}", ObjectId::new().to_hex());

    database::connect(&config).await.expect("Failed to connect to MongoDB")
}

async fn seed_conversation(db: &Database, user_id: Option<&str>, messages: usize) -> ObjectId {
    let conversations = ConversationCrud::new(db);
    let message_crud = MessageCrud::new(db);

    let id = conversations
        .create(Conversation::new(user_id.map(str::to_string), "Nova Conversa"))
        .await
        .unwrap();
    for n in 0..messages {
        message_crud
            .create(Message::user(id, format!("message {}", n)))
            .await
            .unwrap();
    }
    id
}

async fn run_cleanup(db: &Database, options: CleanupOptions, input: &str) -> CleanupOutcome {
    let store = MongoStore::new(db);
    let mut out = Vec::new();
    let mut input = Cursor::new(input.as_bytes().to_vec());
    Cleanup::new(&store, options)
        .run(&mut out, &mut input)
        .await
        .unwrap()
}

fn confirmed() -> CleanupOptions {
    CleanupOptions {
        assume_yes: true,
        ..CleanupOptions::default()
    }
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_cleanup_removes_orphans_and_their_messages() {
    let db = setup_test_db().await;

    let a = seed_conversation(&db, None, 5).await;
    let b = seed_conversation(&db, None, 2).await;
    let c = seed_conversation(&db, Some("user-1"), 3).await;

    let outcome = run_cleanup(&db, confirmed(), "").await;

    assert_eq!(
        outcome,
        CleanupOutcome::Completed(CleanupSummary {
            conversations_deleted: 2,
            messages_deleted: 7,
            remaining: 0,
        })
    );

    let conversations = ConversationCrud::new(&db);
    let messages = MessageCrud::new(&db);
    assert!(conversations.find_by_id(&a).await.unwrap().is_none());
    assert!(conversations.find_by_id(&b).await.unwrap().is_none());
    assert!(conversations.find_by_id(&c).await.unwrap().is_some());
    assert_eq!(messages.count_by_conversation(&a).await.unwrap(), 0);
    assert_eq!(messages.count_by_conversation(&c).await.unwrap(), 3);

    // Second pass has nothing left to do
    let outcome = run_cleanup(&db, confirmed(), "").await;
    assert_eq!(outcome, CleanupOutcome::AlreadyClean);

    db.drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_empty_user_id_is_not_orphaned() {
    let db = setup_test_db().await;

    let id = seed_conversation(&db, Some(""), 1).await;

    let outcome = run_cleanup(&db, confirmed(), "").await;

    assert_eq!(outcome, CleanupOutcome::AlreadyClean);
    let conversations = ConversationCrud::new(&db);
    assert!(conversations.find_by_id(&id).await.unwrap().is_some());

    db.drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_declined_prompt_leaves_data_intact() {
    let db = setup_test_db().await;

    let id = seed_conversation(&db, None, 2).await;

    let outcome = run_cleanup(&db, CleanupOptions::default(), "no\n").await;

    assert_eq!(outcome, CleanupOutcome::Cancelled { orphaned: 1 });
    let messages = MessageCrud::new(&db);
    assert_eq!(messages.count_by_conversation(&id).await.unwrap(), 2);
    assert_eq!(ConversationCrud::new(&db).count_orphaned().await.unwrap(), 1);

    db.drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires MONGODB_URI"]
async fn test_samples_read_legacy_documents() {
    let db = setup_test_db().await;

    db.collection::<bson::Document>("conversations")
        .insert_one(bson::doc! { "_id": ObjectId::new() })
        .await
        .unwrap();

    let samples = ConversationCrud::new(&db).find_orphaned_samples(5).await.unwrap();
    assert_eq!(samples.len(), 1);
    assert!(samples[0].title.is_none());

    db.drop().await.unwrap();
}
