mod common;

use pathgraph::{
    ChangeKind, Document, EditSession, EditorConfig, Entity, Modifiers, Rect, RenderHost,
    VisualHandle, VisualKind, VisualParams, Vec2,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct Log {
    created: usize,
    updated: usize,
    removed: usize,
    live: HashMap<u64, VisualParams>,
}

/// Host that records every call into a shared log.
struct RecordingHost {
    next: u64,
    log: Rc<RefCell<Log>>,
}

impl RenderHost for RecordingHost {
    fn create_visual(&mut self, _kind: VisualKind, params: &VisualParams) -> VisualHandle {
        self.next += 1;
        let mut log = self.log.borrow_mut();
        log.created += 1;
        log.live.insert(self.next, params.clone());
        VisualHandle(self.next)
    }

    fn update_visual(&mut self, handle: VisualHandle, params: &VisualParams) {
        let mut log = self.log.borrow_mut();
        log.updated += 1;
        log.live.insert(handle.0, params.clone());
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        let mut log = self.log.borrow_mut();
        log.removed += 1;
        log.live.remove(&handle.0);
    }

    fn resolve_handle(&self, handle: VisualHandle) -> Option<Entity> {
        self.log.borrow().live.get(&handle.0).map(|p| p.entity())
    }

    fn bounding_box(&self, handle: VisualHandle) -> Option<Rect> {
        self.log.borrow().live.get(&handle.0).and_then(|p| p.extent())
    }
}

fn recording_doc() -> (Document, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let host = RecordingHost {
        next: 0,
        log: Rc::clone(&log),
    };
    (Document::with_config(EditorConfig::default(), Box::new(host)), log)
}

#[test]
fn visuals_track_entities() {
    common::init_tracing();
    let (mut doc, log) = recording_doc();
    let id = doc.insert("M 0 0 L 10 0 L 10 10 L 0 10 Z", 0).unwrap();
    // 1 path + 4 vertices + 4 edges
    assert_eq!(log.borrow().created, 9);
    assert_eq!(log.borrow().live.len(), 9);

    doc.remove_path(id);
    assert_eq!(log.borrow().removed, 9);
    assert!(log.borrow().live.is_empty());
}

#[test]
fn drag_from_resolved_handle() {
    common::init_tracing();
    let (mut doc, log) = recording_doc();
    let id = doc.insert("M 0 0 L 10 0 L 10 10 L 0 10 Z", 0).unwrap();
    doc.take_changes();

    // The host hands back a vertex handle from a pointer event
    let handle = {
        let log = log.borrow();
        let (h, _) = log
            .live
            .iter()
            .find(|(_, p)| matches!(p, VisualParams::Vertex { pos, .. } if *pos == Vec2::new(10.0, 10.0)))
            .unwrap();
        VisualHandle(*h)
    };
    let target = doc.resolve(handle).unwrap();
    assert!(matches!(target, Entity::Vertex { path, .. } if path == id));

    let mut s = EditSession::new();
    let m = Modifiers::default();
    s.pointer_down(&mut doc, target, Vec2::new(10.0, 10.0), m).unwrap();
    s.pointer_move(&mut doc, Vec2::new(5.0, 5.0), m);
    assert_eq!(
        doc.bounding_box(Entity::Path { path: id }),
        Some(Rect::from_bounds(0.0, 0.0, 15.0, 15.0))
    );
    match log.borrow().live.get(&handle.0) {
        Some(VisualParams::Vertex { pos, .. }) => assert_eq!(*pos, Vec2::new(15.0, 15.0)),
        other => panic!("unexpected {:?}", other),
    }
    assert!(s.commit(&mut doc));
    let changes = doc.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Transform);
    assert_eq!(changes[0].path, Some(id));
}

#[test]
fn cancelled_split_releases_its_visuals() {
    common::init_tracing();
    let (mut doc, log) = recording_doc();
    let id = doc.insert("M 0 0 L 10 0 L 10 10 L 0 10 Z", 0).unwrap();
    let live_before = log.borrow().live.len();

    let mut s = EditSession::new();
    let m = Modifiers {
        split: true,
        ..Default::default()
    };
    let target = Entity::Edge {
        path: id,
        edge: pathgraph::EdgeId(2),
    };
    s.pointer_down(&mut doc, target, Vec2::new(5.0, 10.0), m).unwrap();
    assert_eq!(log.borrow().live.len(), live_before + 2);
    s.pointer_move(&mut doc, Vec2::new(0.0, 3.0), m);
    s.cancel(&mut doc);
    assert_eq!(log.borrow().live.len(), live_before);
    assert_eq!(
        doc.descriptor(id).unwrap(),
        "M 0 0 L 10 0 L 10 10 L 0 10 L 0 0 Z"
    );
}

#[test]
fn create_drag_respects_configured_minimum() {
    common::init_tracing();
    let cfg = EditorConfig {
        min_create_size: 8.0,
        ..Default::default()
    };
    let mut doc = Document::with_config(cfg, Box::new(pathgraph::HandleTable::new()));
    let mut s = EditSession::new();
    let m = Modifiers::default();
    s.pointer_down(&mut doc, Entity::Root, Vec2::new(0.0, 0.0), m);
    s.pointer_move(&mut doc, Vec2::new(5.0, 20.0), m);
    assert!(!s.commit(&mut doc));
    assert!(doc.is_empty());

    s.pointer_down(&mut doc, Entity::Root, Vec2::new(0.0, 0.0), m);
    s.pointer_move(&mut doc, Vec2::new(-9.0, 20.0), m);
    assert!(s.commit(&mut doc));
    let p = doc.get(0).unwrap();
    assert_eq!(p.bbox(), Some(Rect::from_bounds(-9.0, 0.0, 0.0, 20.0)));
    assert_eq!(p.vertex_count(), 4);
}

#[test]
fn cancelled_split_restores_zero_length_loop() {
    common::init_tracing();
    for d in ["M 0 0 L 0 0 Z M 5 5 L 6 6", "M 3 3 L 3 3 Z"] {
        let (mut doc, log) = recording_doc();
        let id = doc.insert(d, 0).unwrap();
        let before = doc.descriptor(id).unwrap();
        let live_before = log.borrow().live.len();
        doc.take_changes();

        let mut s = EditSession::new();
        let m = Modifiers {
            split: true,
            ..Default::default()
        };
        let at = doc.path(id).unwrap().vertex(pathgraph::VertexId(0)).unwrap().pos;
        let target = Entity::Edge {
            path: id,
            edge: pathgraph::EdgeId(0),
        };
        s.pointer_down(&mut doc, target, at, m).unwrap();
        s.pointer_move(&mut doc, Vec2::new(4.0, 1.0), m);
        assert!(s.cancel(&mut doc));

        assert_eq!(doc.len(), 1, "{:?}", d);
        assert_eq!(doc.descriptor(id).unwrap(), before);
        doc.path(id).unwrap().check_invariants().unwrap();
        assert_eq!(log.borrow().live.len(), live_before);
        assert!(doc.take_changes().is_empty());
    }
}
