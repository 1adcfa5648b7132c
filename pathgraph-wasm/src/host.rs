use pathgraph::{Entity, HandleTable, Rect, RenderHost, VisualHandle, VisualKind, VisualParams};
use std::cell::RefCell;
use std::rc::Rc;

/// Handle table shared between the document and the JS-facing getters.
pub struct SharedTable(Rc<RefCell<HandleTable>>);

impl SharedTable {
    pub fn new(table: Rc<RefCell<HandleTable>>) -> Self {
        SharedTable(table)
    }
}

impl RenderHost for SharedTable {
    fn create_visual(&mut self, kind: VisualKind, params: &VisualParams) -> VisualHandle {
        self.0.borrow_mut().create_visual(kind, params)
    }
    fn update_visual(&mut self, handle: VisualHandle, params: &VisualParams) {
        self.0.borrow_mut().update_visual(handle, params)
    }
    fn remove_visual(&mut self, handle: VisualHandle) {
        self.0.borrow_mut().remove_visual(handle)
    }
    fn resolve_handle(&self, handle: VisualHandle) -> Option<Entity> {
        self.0.borrow().resolve_handle(handle)
    }
    fn bounding_box(&self, handle: VisualHandle) -> Option<Rect> {
        self.0.borrow().bounding_box(handle)
    }
}
