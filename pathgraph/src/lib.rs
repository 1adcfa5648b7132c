pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod model;
pub mod path;
pub mod session;
pub mod svg;
pub mod geometry {
    pub mod arc;
    pub mod cubic;
    pub mod limits;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod normalize;
    pub mod topology;
    pub mod transform;
}

pub use algorithms::normalize::{normalize, normalize_descriptor, Normalized};
pub use algorithms::topology::DeleteOutcome;
pub use algorithms::transform::{Rotation, Snapshot, SnapshotScope, TransformOptions};
pub use config::EditorConfig;
pub use document::Document;
pub use error::{PathError, Result};
pub use host::{
    ChangeKind, ChangeNotification, HandleTable, RenderHost, VisualHandle, VisualKind, VisualParams,
};
pub use model::{
    ArcParams, Edge, EdgeId, EdgeKind, Entity, PathCommand, PathId, Rect, Segment, Vec2, Vertex,
    VertexId,
};
pub use path::{HandleEnd, Path, Subpath};
pub use session::{DragKind, EditSession, Modifiers};
