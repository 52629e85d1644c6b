//! Seam between the adapter and a native engine implementation.
//!
//! The traits describe the engine as the adapter sees it: a library with two
//! constructors, an engine that turns frames into a result graph, and the
//! read-only nodes of that graph. All nodes are owned by the engine and
//! reached through shared references whose lifetime is bound to the engine
//! borrow, so nothing here ever frees a node.

use crate::{Capabilities, FaceEngineConfig, Frame, Marker, Region, ScriptSetup, ShoreResult};

/// Library-level entry points of a native engine.
pub trait NativeLibrary {
    /// Version identifier, forwarded verbatim.
    fn version(&self) -> String;

    /// Optional features of this build.
    fn capabilities(&self) -> Capabilities;

    /// Creates an engine from the face configuration bundle.
    fn create_face_engine(&self, config: &FaceEngineConfig) -> ShoreResult<Box<dyn NativeEngine>>;

    /// Creates an engine from a setup script.
    fn create_engine(&self, setup: &ScriptSetup) -> ShoreResult<Box<dyn NativeEngine>>;
}

/// A live engine instance. Dropping it releases the native engine.
pub trait NativeEngine {
    /// Processes one frame. `None` means the engine produced no content.
    ///
    /// The frame's buffer must not be retained after the call returns.
    fn process(&mut self, frame: &Frame<'_>) -> Option<&dyn ContentNode>;

    /// Content of the most recent successful `process` call.
    fn content(&self) -> Option<&dyn ContentNode>;
}

/// Result graph root of one processed frame.
pub trait ContentNode {
    fn object_count(&self) -> usize;
    fn object(&self, index: usize) -> Option<&dyn ObjectNode>;

    fn info_count(&self) -> usize;
    fn info_key(&self, index: usize) -> Option<&str>;
    fn info(&self, index: usize) -> Option<&str>;
    fn info_of(&self, key: &str) -> Option<&str>;
}

/// One detected object, or one part of an object.
pub trait ObjectNode {
    /// `None` when the engine reports no type or one that is not UTF-8.
    fn object_type(&self) -> Option<&str>;
    fn region(&self) -> Option<Region>;

    fn marker_count(&self) -> usize;
    fn marker_key(&self, index: usize) -> Option<&str>;
    fn marker(&self, index: usize) -> Option<Marker>;
    fn marker_of(&self, key: &str) -> Option<Marker>;

    fn attribute_count(&self) -> usize;
    fn attribute_key(&self, index: usize) -> Option<&str>;
    fn attribute(&self, index: usize) -> Option<&str>;
    fn attribute_of(&self, key: &str) -> Option<&str>;

    fn rating_count(&self) -> usize;
    fn rating_key(&self, index: usize) -> Option<&str>;
    fn rating(&self, index: usize) -> Option<f32>;
    fn rating_of(&self, key: &str) -> Option<f32>;

    fn part_count(&self) -> usize;
    fn part_key(&self, index: usize) -> Option<&str>;
    fn part(&self, index: usize) -> Option<&dyn ObjectNode>;
    fn part_of(&self, key: &str) -> Option<&dyn ObjectNode>;
}
