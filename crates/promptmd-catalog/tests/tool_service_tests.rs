//! Integration tests for the mutation layer over the in-memory store.

use std::sync::Arc;

use promptmd_catalog::ToolService;
use promptmd_core::{
    CreateToolRequest, Error, StoreEvent, ToolKind, ToolStatus, ToolStore, ToolTags,
};
use promptmd_store::MemoryStore;

fn service(store: &MemoryStore) -> ToolService {
    ToolService::new(
        Arc::new(store.tools.clone()),
        Arc::new(store.saves.clone()),
        Arc::new(store.ratings.clone()),
    )
}

fn draft_request(title: &str) -> CreateToolRequest {
    CreateToolRequest {
        kind: ToolKind::Prompt,
        status: ToolStatus::Draft,
        title: title.to_string(),
        content: "You are a clinical documentation assistant.".to_string(),
        ..Default::default()
    }
}

fn published_request(title: &str) -> CreateToolRequest {
    CreateToolRequest {
        status: ToolStatus::Published,
        ..draft_request(title)
    }
}

// =============================================================================
// CREATE / UPDATE / DELETE / PUBLISH
// =============================================================================

#[tokio::test]
async fn test_create_zeroes_counters_and_assigns_authorship() {
    let store = MemoryStore::new();
    let service = service(&store);

    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();
    assert_eq!(tool.author_id, "u1");
    assert_eq!(tool.version, 1);
    assert_eq!(tool.save_count, 0);
    assert_eq!(tool.rating_avg, 0.0);
    assert_eq!(tool.rating_count, 0);
    assert!(!tool.id.is_empty());
}

#[tokio::test]
async fn test_create_rejects_blank_title_and_content() {
    let store = MemoryStore::new();
    let service = service(&store);

    let blank_title = CreateToolRequest {
        title: "   ".to_string(),
        ..draft_request("ignored")
    };
    assert!(matches!(
        service.create("u1", blank_title).await,
        Err(Error::Validation(_))
    ));

    let blank_content = CreateToolRequest {
        content: String::new(),
        ..draft_request("Triage Note")
    };
    assert!(matches!(
        service.create("u1", blank_content).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_update_requires_ownership() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();

    let update = promptmd_core::UpdateToolRequest {
        title: Some("Handoff Note".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.update("u2", &tool.id, update.clone()).await,
        Err(Error::Permission(_))
    ));
    assert!(matches!(
        service.update("u1", "missing", update.clone()).await,
        Err(Error::ToolNotFound(_))
    ));

    let updated = service.update("u1", &tool.id, update).await.unwrap();
    assert_eq!(updated.title, "Handoff Note");
    assert!(updated.updated_at >= tool.updated_at);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();

    assert!(matches!(
        service.delete("u2", &tool.id).await,
        Err(Error::Permission(_))
    ));

    service.delete("u1", &tool.id).await.unwrap();
    assert!(matches!(
        service.delete("u1", &tool.id).await,
        Err(Error::ToolNotFound(_))
    ));
}

#[tokio::test]
async fn test_publish_is_idempotent() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();

    let published = service.publish("u1", &tool.id).await.unwrap();
    assert_eq!(published.status, ToolStatus::Published);
    assert_eq!(published.id, tool.id);

    let again = service.publish("u1", &tool.id).await.unwrap();
    assert_eq!(again.status, ToolStatus::Published);
    assert_eq!(again.updated_at, published.updated_at);
}

#[tokio::test]
async fn test_publish_requires_ownership() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();

    assert!(matches!(
        service.publish("u2", &tool.id).await,
        Err(Error::Permission(_))
    ));
}

// =============================================================================
// SAVE / UNSAVE
// =============================================================================

#[tokio::test]
async fn test_save_increments_once_and_is_idempotent() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    service.save("u2", &tool.id).await.unwrap();
    service.save("u2", &tool.id).await.unwrap();
    assert_eq!(store.tools.fetch(&tool.id).await.unwrap().save_count, 1);

    service.save("u3", &tool.id).await.unwrap();
    assert_eq!(store.tools.fetch(&tool.id).await.unwrap().save_count, 2);
}

#[tokio::test]
async fn test_unsave_on_unsaved_tool_is_noop() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    service.unsave("u2", &tool.id).await.unwrap();
    assert_eq!(store.tools.fetch(&tool.id).await.unwrap().save_count, 0);

    service.save("u2", &tool.id).await.unwrap();
    service.unsave("u2", &tool.id).await.unwrap();
    service.unsave("u2", &tool.id).await.unwrap();
    assert_eq!(store.tools.fetch(&tool.id).await.unwrap().save_count, 0);
}

#[tokio::test]
async fn test_save_unknown_tool_fails() {
    let store = MemoryStore::new();
    let service = service(&store);
    assert!(matches!(
        service.save("u1", "missing").await,
        Err(Error::ToolNotFound(_))
    ));
}

// =============================================================================
// RATINGS
// =============================================================================

#[tokio::test]
async fn test_first_rating_then_rerate_updates_in_place() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    service.rate("u2", &tool.id, 4, None).await.unwrap();
    let rated = store.tools.fetch(&tool.id).await.unwrap();
    assert_eq!(rated.rating_count, 1);
    assert_eq!(rated.rating_avg, 4.0);

    // Same viewer re-rates: update, not accumulate.
    service.rate("u2", &tool.id, 2, None).await.unwrap();
    let rerated = store.tools.fetch(&tool.id).await.unwrap();
    assert_eq!(rerated.rating_count, 1);
    assert_eq!(rerated.rating_avg, 2.0);
}

#[tokio::test]
async fn test_rating_average_across_users() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    service.rate("u2", &tool.id, 2, None).await.unwrap();
    service.rate("u3", &tool.id, 5, None).await.unwrap();

    let rated = store.tools.fetch(&tool.id).await.unwrap();
    assert_eq!(rated.rating_count, 2);
    assert_eq!(rated.rating_avg, 3.5);
}

#[tokio::test]
async fn test_rating_value_bounds() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    for value in [0, 6, -1] {
        assert!(matches!(
            service.rate("u2", &tool.id, value, None).await,
            Err(Error::Validation(_))
        ));
    }
}

#[tokio::test]
async fn test_delete_rating_restores_zero_at_empty() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    service.rate("u2", &tool.id, 2, None).await.unwrap();
    service.rate("u3", &tool.id, 5, None).await.unwrap();

    service.delete_rating("u3", &tool.id).await.unwrap();
    let after_one = store.tools.fetch(&tool.id).await.unwrap();
    assert_eq!(after_one.rating_count, 1);
    assert_eq!(after_one.rating_avg, 2.0);

    service.delete_rating("u2", &tool.id).await.unwrap();
    let empty = store.tools.fetch(&tool.id).await.unwrap();
    assert_eq!(empty.rating_count, 0);
    assert_eq!(empty.rating_avg, 0.0);

    assert!(matches!(
        service.delete_rating("u2", &tool.id).await,
        Err(Error::RatingNotFound(_))
    ));
}

#[tokio::test]
async fn test_user_rating_point_read() {
    let store = MemoryStore::new();
    let service = service(&store);
    let tool = service
        .create("u1", published_request("Triage Note"))
        .await
        .unwrap();

    assert!(service.user_rating("u2", &tool.id).await.unwrap().is_none());
    service.rate("u2", &tool.id, 5, Some("excellent".to_string())).await.unwrap();

    let rating = service.user_rating("u2", &tool.id).await.unwrap().unwrap();
    assert_eq!(rating.value, 5);
    assert_eq!(rating.comment.as_deref(), Some("excellent"));
}

// =============================================================================
// EVENTS
// =============================================================================

#[tokio::test]
async fn test_mutations_emit_store_events() {
    let store = MemoryStore::new();
    let service = service(&store);
    let mut events = service.events().subscribe();

    let tool = service.create("u1", draft_request("Triage Note")).await.unwrap();
    service.publish("u1", &tool.id).await.unwrap();
    service.save("u2", &tool.id).await.unwrap();
    service.rate("u2", &tool.id, 4, None).await.unwrap();

    assert!(matches!(
        events.recv().await.unwrap(),
        StoreEvent::ToolCreated { .. }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        StoreEvent::ToolPublished { .. }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        StoreEvent::ToolSaved { .. }
    ));
    match events.recv().await.unwrap() {
        StoreEvent::ToolRated { tool_id, viewer_id, value } => {
            assert_eq!(tool_id, tool.id);
            assert_eq!(viewer_id, "u2");
            assert_eq!(value, 4);
        }
        other => panic!("Expected ToolRated, got {:?}", other),
    }
}

#[tokio::test]
async fn test_tags_are_deduped_on_create() {
    let store = MemoryStore::new();
    let service = service(&store);

    let mut request = published_request("Triage Note");
    request.tags = ToolTags {
        specialty: vec!["Cardiology".to_string(), "cardiology".to_string()],
        ..Default::default()
    };

    let tool = service.create("u1", request).await.unwrap();
    assert_eq!(tool.tags.specialty, vec!["Cardiology"]);
}
