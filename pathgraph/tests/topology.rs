mod common;

use pathgraph::{ChangeKind, DeleteOutcome, Document, EdgeId, Vec2, VertexId};

#[test]
fn rect_deleted_vertex_by_vertex_is_removed() {
    common::init_tracing();
    let mut doc = Document::new();
    let id = doc.create_rect_path(0.0, 0.0, 10.0, 10.0);
    let ids: Vec<VertexId> = doc.path(id).unwrap().vertex_ids().collect();
    assert_eq!(ids.len(), 4);

    assert_eq!(doc.delete_vertex(id, ids[0]), DeleteOutcome::Merged);
    assert_eq!(doc.delete_vertex(id, ids[1]), DeleteOutcome::Merged);
    let p = doc.path(id).unwrap();
    assert_eq!((p.vertex_count(), p.edge_count()), (2, 2));
    p.check_invariants().unwrap();

    // Two-vertex loop collapses onto a zero-length self-loop and goes away
    assert_eq!(doc.delete_vertex(id, ids[2]), DeleteOutcome::PathEmptied);
    assert!(doc.path(id).is_none());
    assert!(doc.is_empty());
    assert_eq!(doc.delete_vertex(id, ids[3]), DeleteOutcome::NotFound);

    let kinds: Vec<ChangeKind> = doc.take_changes().into_iter().map(|c| c.kind).collect();
    assert_eq!(kinds.last(), Some(&ChangeKind::Remove));
}

#[test]
fn two_vertex_closed_loop_delete_removes_path() {
    common::init_tracing();
    let mut doc = Document::new();
    let id = doc.insert("M 0 0 L 10 0 Z", 0).unwrap();
    assert_eq!(doc.delete_vertex(id, VertexId(1)), DeleteOutcome::PathEmptied);
    assert!(doc.path(id).is_none());
}

#[test]
fn split_adds_one_vertex_and_one_edge() {
    common::init_tracing();
    let mut doc = Document::new();
    let id = doc.insert("M 0 0 C 0 10 10 10 10 0 L 10 -5 Z", 0).unwrap();
    let (nv, ne) = {
        let p = doc.path(id).unwrap();
        (p.vertex_count(), p.edge_count())
    };
    let v = doc.split_edge(id, EdgeId(0), Vec2::new(5.0, 7.5)).unwrap();
    let p = doc.path(id).unwrap();
    assert_eq!(p.vertex_count(), nv + 1);
    assert_eq!(p.edge_count(), ne + 1);
    let vx = p.vertex(v).unwrap();
    let e1 = p.edge(vx.incoming.unwrap()).unwrap();
    let e2 = p.edge(vx.outgoing.unwrap()).unwrap();
    assert_eq!(e1.end, v);
    assert_eq!(e2.start, v);
    p.check_invariants().unwrap();

    // the new vertex has a visual the host can resolve back
    let h = vx.visual().unwrap();
    assert_eq!(
        doc.resolve(h),
        Some(pathgraph::Entity::Vertex { path: id, vertex: v })
    );
}

#[test]
fn stale_references_are_noops() {
    common::init_tracing();
    let mut doc = Document::new();
    let id = doc.insert("M 0 0 L 10 0 L 10 10", 0).unwrap();
    doc.take_changes();
    assert_eq!(doc.split_edge(id, EdgeId(40), Vec2::ZERO), None);
    assert_eq!(doc.delete_vertex(id, VertexId(40)), DeleteOutcome::NotFound);
    let before = doc.descriptor(id).unwrap();

    // An edge that was released by a delete is stale too
    assert_eq!(doc.delete_vertex(id, VertexId(1)), DeleteOutcome::Merged);
    assert_eq!(doc.split_edge(id, EdgeId(1), Vec2::new(1.0, 1.0)), None);
    assert_ne!(doc.descriptor(id).unwrap(), before);
    assert_eq!(doc.take_changes().len(), 1);
}

#[test]
fn descriptor_after_delete_can_be_reinserted() {
    common::init_tracing();
    let mut doc = Document::new();
    for d in [
        "M 0 0 C 0 10 10 10 10 0 L 0 0 Z",
        "M 0 0 C 0 10 10 10 10 0 L 0 0 Z M 20 0 L 30 0",
        "M 0 0 L 10 0 L 10 10 L 0 10 Z",
        "M 0 0 A 5 5 0 0 1 10 0 L 0 0 Z",
    ] {
        let id = doc.insert(d, 0).unwrap();
        let ids: Vec<VertexId> = doc.path(id).unwrap().vertex_ids().collect();
        for v in ids {
            doc.delete_vertex(id, v);
            let Some(out) = doc.descriptor(id) else { break };
            assert!(
                doc.insert_strict(&out, usize::MAX).is_ok(),
                "{:?} -> {:?}",
                d,
                out
            );
        }
    }
}
