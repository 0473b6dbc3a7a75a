//! Integration tests for the document and question repositories.
//!
//! Tests verify:
//! - create-then-read returns identical title/content with a non-null created_at
//! - question rows start pending with no answer
//! - fenced status transitions (answered/error only from pending)
//! - deleting a document cascades to its questions
//!
//! Requires a running Postgres; see `test_fixtures::DEFAULT_TEST_DATABASE_URL`.

use docqa_db::test_fixtures::TestDatabase;
use docqa_db::{
    CreateDocumentRequest, DocumentRepository, Error, QuestionRepository, QuestionStatus,
};

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_document_create_then_read_round_trip() {
    let test_db = TestDatabase::new().await;

    let created = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();

    let fetched = test_db.db.documents.fetch(created.id).await.unwrap();
    assert_eq!(fetched.title, "T");
    assert_eq!(fetched.content, "C");
    assert_eq!(fetched.created_at, created.created_at);
    assert!(fetched.updated_at.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_document_insert_rejects_empty_fields() {
    let test_db = TestDatabase::new().await;

    let err = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "".into(),
            content: "C".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(test_db.db.documents.count().await.unwrap(), 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_question_starts_pending_without_answer() {
    let test_db = TestDatabase::new().await;

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();

    let q = test_db
        .db
        .questions
        .insert(doc.id, "What is C?")
        .await
        .unwrap();
    assert_eq!(q.status, QuestionStatus::Pending);
    assert!(q.answer.is_none());
    assert_eq!(q.document_id, doc.id);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_mark_answered_is_fenced_on_pending() {
    let test_db = TestDatabase::new().await;

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();
    let q = test_db
        .db
        .questions
        .insert(doc.id, "What is C?")
        .await
        .unwrap();

    assert!(test_db.db.questions.mark_answered(q.id, "answer").await.unwrap());

    let answered = test_db.db.questions.fetch(q.id).await.unwrap();
    assert_eq!(answered.status, QuestionStatus::Answered);
    assert_eq!(answered.answer.as_deref(), Some("answer"));
    assert!(answered.updated_at.is_some());

    // Terminal state: a second pass touches nothing.
    assert!(!test_db.db.questions.mark_answered(q.id, "other").await.unwrap());
    assert!(!test_db.db.questions.mark_error(q.id).await.unwrap());
    let unchanged = test_db.db.questions.fetch(q.id).await.unwrap();
    assert_eq!(unchanged.answer.as_deref(), Some("answer"));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_mark_answered_after_delete_touches_nothing() {
    let test_db = TestDatabase::new().await;

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();
    let q = test_db
        .db
        .questions
        .insert(doc.id, "What is C?")
        .await
        .unwrap();

    test_db.db.questions.delete(q.id).await.unwrap();

    // A late background unit cannot resurrect the deleted row.
    assert!(!test_db.db.questions.mark_answered(q.id, "late").await.unwrap());
    let err = test_db.db.questions.fetch(q.id).await.unwrap_err();
    assert!(matches!(err, Error::QuestionNotFound(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_list_for_document_newest_first() {
    let test_db = TestDatabase::new().await;

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();

    let first = test_db.db.questions.insert(doc.id, "first").await.unwrap();
    let second = test_db.db.questions.insert(doc.id, "second").await.unwrap();

    let listed = test_db
        .db
        .questions
        .list_for_document(doc.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at >= listed[1].created_at);
    let ids: Vec<i64> = listed.iter().map(|q| q.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_document_delete_cascades_to_questions() {
    let test_db = TestDatabase::new().await;

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: "T".into(),
            content: "C".into(),
        })
        .await
        .unwrap();
    let q = test_db
        .db
        .questions
        .insert(doc.id, "What is C?")
        .await
        .unwrap();

    test_db.db.documents.delete(doc.id).await.unwrap();

    let err = test_db.db.questions.fetch(q.id).await.unwrap_err();
    assert!(matches!(err, Error::QuestionNotFound(_)));
    assert_eq!(test_db.db.questions.count().await.unwrap(), 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running Postgres test database"]
async fn test_fetch_missing_is_not_found() {
    let test_db = TestDatabase::new().await;

    let err = test_db.db.documents.fetch(999_999).await.unwrap_err();
    assert!(matches!(err, Error::DocumentNotFound(999_999)));

    let err = test_db.db.questions.fetch(999_999).await.unwrap_err();
    assert!(matches!(err, Error::QuestionNotFound(999_999)));

    test_db.cleanup().await;
}
