mod common;

use docrag::domain::entities::document::{Document, DocumentMetadata};
use docrag::domain::ports::document_store::DocumentStore;
use docrag::infrastructure::sqlite::document_store::SqliteDocumentStore;

fn metadata(path: &str) -> DocumentMetadata {
    let mut extra = serde_json::Map::new();
    extra.insert("page".into(), serde_json::json!(12));
    DocumentMetadata {
        file_path: Some(path.into()),
        extra,
    }
}

#[tokio::test]
async fn test_list_preserves_insertion_order_and_fields() {
    let store = common::memory_store();
    let first = store
        .insert(&Document::new("first", vec![1.0, 0.5], Some(metadata("a.pdf"))))
        .await
        .unwrap();
    let second = store
        .insert(&Document::new("second", vec![-0.25, 2.0], None))
        .await
        .unwrap();

    let docs = store.list().await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, first);
    assert_eq!(docs[1].id, second);
    assert_eq!(docs[0].document.vector, vec![1.0, 0.5]);
    assert_eq!(docs[0].document.source_file(), Some("a.pdf"));
    assert_eq!(docs[0].document.metadata.as_ref().unwrap().extra["page"], 12);
    assert!(docs[1].document.metadata.is_none());
    assert!(docs[0].created_at.is_some());
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.db");
    let path = path.to_str().unwrap();

    {
        let store = SqliteDocumentStore::open(path).unwrap();
        store
            .insert(&Document::new("persisted", vec![0.1, 0.2, 0.3], None))
            .await
            .unwrap();
    }

    let reopened = SqliteDocumentStore::open(path).unwrap();
    let docs = reopened.list().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].document.content, "persisted");
    assert!(!reopened.supports_vector_search());
}

#[tokio::test]
async fn test_native_search_is_unsupported() {
    let store = common::memory_store();
    assert!(store.search_similar(&[1.0], 1).await.is_err());
}
