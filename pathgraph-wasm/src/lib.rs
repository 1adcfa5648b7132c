use pathgraph::{EditSession, EditorConfig, HandleTable, PathId, Snapshot};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod host;
mod interop;

pub use api::normalize_descriptor;

#[wasm_bindgen]
pub struct Editor {
    pub(crate) inner: pathgraph::Document,
    pub(crate) table: Rc<RefCell<HandleTable>>,
    pub(crate) session: EditSession,
    pub(crate) snapshots: HashMap<PathId, Snapshot>,
}

impl Editor {
    pub fn rs_new(config: EditorConfig) -> Editor {
        let table = Rc::new(RefCell::new(HandleTable::new()));
        let host = host::SharedTable::new(Rc::clone(&table));
        Editor {
            inner: pathgraph::Document::with_config(config, Box::new(host)),
            table,
            session: EditSession::new(),
            snapshots: HashMap::new(),
        }
    }
    pub fn rs_version(&self) -> u64 {
        self.inner.version()
    }
}
