//! User snapshot and dataset import against real files.

use anyhow::Result;
use docgraph::dataset::{Dataset, DatasetError};
use docgraph::graph::GraphOptions;
use docgraph::{EntityKind, NewDocument, NewUser, Store, snapshot};
use tempfile::tempdir;

#[test]
fn test_users_survive_restart_and_ids_continue() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let path = dir.path().join("nested").join("users.db");
    let first = Store::new();
    first.create_user(NewUser::new("ada", "ada@example.com", "h1"))?;
    let bob = first.create_user(NewUser::new("bob", "bob@example.com", "h2"))?;
    snapshot::save_users(&first, &path)?;

    // Act
    let second = Store::new();
    let restored = snapshot::load_users(&second, &path)?;
    let carol = second.create_user(NewUser::new("carol", "carol@example.com", "h3"))?;

    // Assert
    assert_eq!(restored, 2);
    assert_eq!(second.find_user_by_username("bob"), Some(bob.clone()));
    assert!(carol.id > bob.id);
    assert_eq!(second.ids().last_issued(EntityKind::User), carol.id.get());

    Ok(())
}

#[test]
fn test_restored_users_can_own_documents() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let path = dir.path().join("users.db");
    let first = Store::new();
    let ada = first.create_user(NewUser::new("ada", "ada@example.com", "h"))?;
    snapshot::save_users(&first, &path)?;

    // Act
    let second = Store::new();
    snapshot::load_users(&second, &path)?;
    let doc = second.create_document(ada.id, NewDocument::new("t", "t.md", "md"))?;

    // Assert
    assert_eq!(doc.owner, ada.id);
    assert_eq!(second.list_user_documents(ada.id).len(), 1);

    Ok(())
}

#[test]
fn test_missing_snapshot_starts_empty() -> Result<()> {
    let dir = tempdir()?;
    let store = Store::new();

    let restored = snapshot::load_users(&store, &dir.path().join("absent.db"))?;

    assert_eq!(restored, 0);
    assert!(store.list_users().is_empty());
    Ok(())
}

#[test]
fn test_dataset_file_builds_expected_graph() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let path = dir.path().join("dataset.json");
    std::fs::write(
        &path,
        r#"{
            "users": [{"username": "ada", "email": "ada@example.com"}],
            "documents": [
                {"key": "one", "owner": "ada", "title": "One",
                 "filename": "1.md", "file_type": "md"},
                {"key": "two", "owner": "ada", "title": "Two",
                 "filename": "2.md", "file_type": "md"},
                {"key": "three", "owner": "ada", "title": "Three",
                 "filename": "3.md", "file_type": "md"}
            ],
            "links": [
                {"source": "one", "target": "two", "link_type": "related", "strength": 4},
                {"source": "two", "target": "one", "link_type": "related", "strength": 7}
            ]
        }"#,
    )?;
    let store = Store::new();

    // Act
    let ids = Dataset::from_path(&path)?.load_into(&store)?;
    let graph = store.document_graph(ids.users["ada"], GraphOptions::default())?;
    let full = store.document_graph(ids.users["ada"], GraphOptions::default().keep_isolated(true))?;

    // Assert
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].strength, 7);
    assert_eq!(full.nodes.len(), 3);
    assert_eq!(full.stats().isolated_count, 1);

    Ok(())
}

#[test]
fn test_missing_dataset_is_io_error() {
    let dir = tempdir().expect("failed to create temp dir");

    let result = Dataset::from_path(&dir.path().join("nope.json"));

    assert!(matches!(result, Err(DatasetError::Io(_))));
}
