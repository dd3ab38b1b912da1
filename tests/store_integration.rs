//! End-to-end store workflows through the public crate API only.

use std::collections::HashSet;

use anyhow::Result;
use docgraph::graph::GraphOptions;
use docgraph::ingest::UploadRequest;
use docgraph::{DocumentId, NewDocument, NewLink, NewUser, Store, StoreError, UserId};

/// Creates a store with one registered user.
fn create_test_store() -> Result<(Store, UserId)> {
    let store = Store::new();
    let user = store.create_user(NewUser::new("ada", "ada@example.com", "hash"))?;
    Ok((store, user.id))
}

fn upload(store: &Store, owner: UserId, title: &str, tags: &[&str]) -> Result<DocumentId> {
    let request = UploadRequest {
        title: title.to_string(),
        filename: format!("{title}.pdf"),
        file_type: "pdf".to_string(),
        tag_names: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    };
    Ok(store.ingest_upload(owner, &request)?.document_id)
}

#[test]
fn test_upload_tag_link_and_query() -> Result<()> {
    // Arrange
    let (store, user) = create_test_store()?;
    let attention = upload(&store, user, "attention", &["NLP", "Deep Learning"])?;
    let bert = upload(&store, user, "bert", &["nlp", "Pretraining"])?;

    // Act
    store.create_link(NewLink::new(bert, attention, "extends").with_strength(8))?;
    let aggregates = store.user_documents_with_tags(user)?;
    let graph = store.document_graph(user, GraphOptions::default())?;

    // Assert
    assert_eq!(aggregates.len(), 2);
    assert_eq!(aggregates[1].tags[0].name(), "NLP");
    assert_eq!(store.list_tags().len(), 3);
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].source, bert);

    Ok(())
}

#[test]
fn test_delete_then_query_sees_no_dangling_rows() -> Result<()> {
    // Arrange
    let (store, user) = create_test_store()?;
    let a = upload(&store, user, "a", &["x"])?;
    let b = upload(&store, user, "b", &["x"])?;
    let c = upload(&store, user, "c", &[])?;
    store.record_links(vec![
        NewLink::new(a, b, "cites").with_strength(3),
        NewLink::new(b, c, "cites").with_strength(2),
        NewLink::new(c, a, "cites").with_strength(5),
    ])?;

    // Act
    let report = store
        .delete_document_with_report(a)
        .expect("document a exists");

    // Assert
    assert_eq!(report.document_tags, 1);
    assert_eq!(report.links, 2);
    assert!(store.document_with_tags(a).is_none());
    assert_eq!(store.document_links(b)?.len(), 1);
    assert_eq!(store.document_links(c)?.len(), 1);

    let tag = store.find_tag("X").expect("tag survives document deletion");
    let tagged: Vec<DocumentId> = store
        .documents_with_tag(tag.id())?
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(tagged, vec![b]);

    let graph = store.graph_for(&[a, b, c], GraphOptions::default());
    assert_eq!(graph.nodes, vec![b, c]);
    assert_eq!(graph.edges.len(), 1);

    Ok(())
}

#[test]
fn test_graph_threshold_applies_after_dedup() -> Result<()> {
    // Arrange
    let (store, user) = create_test_store()?;
    let one = store.create_document(user, NewDocument::new("one", "1.md", "md"))?.id;
    let two = store.create_document(user, NewDocument::new("two", "2.md", "md"))?.id;
    store.create_link(NewLink::new(one, two, "related").with_strength(4))?;
    store.create_link(NewLink::new(two, one, "related").with_strength(7))?;

    // Act
    let at_seven = store.graph_for(&[one, two], GraphOptions::default().min_strength(7));
    let at_eight = store.graph_for(&[one, two], GraphOptions::default().min_strength(8));

    // Assert
    assert_eq!(at_seven.edges.len(), 1);
    assert_eq!(at_seven.edges[0].strength, 7);
    assert!(at_eight.edges.is_empty());
    assert!(at_eight.nodes.is_empty());

    Ok(())
}

#[test]
fn test_errors_name_the_offending_entity() -> Result<()> {
    // Arrange
    let (store, user) = create_test_store()?;
    let doc = upload(&store, user, "doc", &[])?;

    // Act
    let duplicate = store
        .create_user(NewUser::new("ada", "x@example.com", "hash"))
        .unwrap_err();
    let dangling = store
        .create_link(NewLink::new(doc, DocumentId::new(404), "cites"))
        .unwrap_err();

    // Assert
    assert_eq!(duplicate.to_string(), "user with username 'ada' already exists");
    assert!(duplicate.is_user_error());
    assert!(matches!(dangling, StoreError::InvalidReference { id: 404, .. }));

    Ok(())
}

#[test]
fn test_ids_unique_across_workers() -> Result<()> {
    // Arrange
    let (store, user) = create_test_store()?;
    let store = std::sync::Arc::new(store);

    // Act
    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || -> Vec<DocumentId> {
                (0..25)
                    .map(|i| {
                        store
                            .create_document(
                                user,
                                NewDocument::new(format!("w{worker}-{i}"), "f.md", "md"),
                            )
                            .expect("owner exists")
                            .id
                    })
                    .collect()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().expect("worker panicked") {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }

    // Assert
    assert_eq!(ids.len(), 200);
    assert_eq!(store.counts().documents, 200);

    Ok(())
}
