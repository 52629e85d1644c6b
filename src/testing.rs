use std::{
    cell::{Cell, RefCell},
    path::PathBuf,
    rc::Rc,
};

use ndarray::{Array2, Array3};
use rstest::fixture;

use crate::{
    native::{ContentNode, NativeEngine, NativeLibrary, ObjectNode},
    Capabilities, FaceEngineConfig, Frame, FrameLayout, Marker, Region, ScriptSetup, ShoreError,
    ShoreResult,
};

/// Model name the mock library refuses, standing in for a rejected configuration.
pub const REJECTED_MODEL: &str = "Face.Rejected";

#[derive(Debug, Clone, Default)]
pub struct MockObject {
    pub object_type: Option<String>,
    pub region: Option<Region>,
    pub markers: Vec<(String, Marker)>,
    pub attributes: Vec<(String, String)>,
    pub ratings: Vec<(String, f32)>,
    pub parts: Vec<(String, MockObject)>,
}

impl MockObject {
    fn typed(object_type: &str) -> Self {
        Self {
            object_type: Some(object_type.to_string()),
            ..Default::default()
        }
    }
}

fn find<'a, V>(entries: &'a [(String, V)], key: &str) -> Option<&'a V> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

impl ObjectNode for MockObject {
    fn object_type(&self) -> Option<&str> {
        self.object_type.as_deref()
    }

    fn region(&self) -> Option<Region> {
        self.region
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn marker_key(&self, index: usize) -> Option<&str> {
        self.markers.get(index).map(|(k, _)| k.as_str())
    }

    fn marker(&self, index: usize) -> Option<Marker> {
        self.markers.get(index).map(|(_, v)| *v)
    }

    fn marker_of(&self, key: &str) -> Option<Marker> {
        find(&self.markers, key).copied()
    }

    fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    fn attribute_key(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|(k, _)| k.as_str())
    }

    fn attribute(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|(_, v)| v.as_str())
    }

    fn attribute_of(&self, key: &str) -> Option<&str> {
        find(&self.attributes, key).map(|v| v.as_str())
    }

    fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    fn rating_key(&self, index: usize) -> Option<&str> {
        self.ratings.get(index).map(|(k, _)| k.as_str())
    }

    fn rating(&self, index: usize) -> Option<f32> {
        self.ratings.get(index).map(|(_, v)| *v)
    }

    fn rating_of(&self, key: &str) -> Option<f32> {
        find(&self.ratings, key).copied()
    }

    fn part_count(&self) -> usize {
        self.parts.len()
    }

    fn part_key(&self, index: usize) -> Option<&str> {
        self.parts.get(index).map(|(k, _)| k.as_str())
    }

    fn part(&self, index: usize) -> Option<&dyn ObjectNode> {
        self.parts.get(index).map(|(_, v)| v as &dyn ObjectNode)
    }

    fn part_of(&self, key: &str) -> Option<&dyn ObjectNode> {
        find(&self.parts, key).map(|v| v as &dyn ObjectNode)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockContent {
    pub objects: Vec<MockObject>,
    pub infos: Vec<(String, String)>,
}

impl ContentNode for MockContent {
    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn object(&self, index: usize) -> Option<&dyn ObjectNode> {
        self.objects.get(index).map(|o| o as &dyn ObjectNode)
    }

    fn info_count(&self) -> usize {
        self.infos.len()
    }

    fn info_key(&self, index: usize) -> Option<&str> {
        self.infos.get(index).map(|(k, _)| k.as_str())
    }

    fn info(&self, index: usize) -> Option<&str> {
        self.infos.get(index).map(|(_, v)| v.as_str())
    }

    fn info_of(&self, key: &str) -> Option<&str> {
        find(&self.infos, key).map(|v| v.as_str())
    }
}

/// Engine that "detects" its scripted graph in any frame with a non-zero sample.
pub struct MockEngine {
    graph: MockContent,
    content: Option<MockContent>,
    fail_processing: bool,
    layouts: Rc<RefCell<Vec<FrameLayout>>>,
    deleted: Rc<Cell<usize>>,
}

fn is_blank(frame: &Frame<'_>) -> bool {
    let layout = frame.layout();
    (0..layout.height).all(|y| {
        (0..layout.width)
            .all(|x| (0..layout.planes).all(|plane| frame.sample(x, y, plane) == Some(0)))
    })
}

impl NativeEngine for MockEngine {
    fn process(&mut self, frame: &Frame<'_>) -> Option<&dyn ContentNode> {
        self.layouts.borrow_mut().push(*frame.layout());
        if self.fail_processing {
            self.content = None;
            return None;
        }

        let infos = vec![("FrameRate".to_string(), "25.0".to_string())];
        self.content = Some(if is_blank(frame) {
            MockContent {
                objects: Vec::new(),
                infos,
            }
        } else {
            self.graph.clone()
        });
        self.content.as_ref().map(|c| c as &dyn ContentNode)
    }

    fn content(&self) -> Option<&dyn ContentNode> {
        self.content.as_ref().map(|c| c as &dyn ContentNode)
    }
}

impl Drop for MockEngine {
    fn drop(&mut self) {
        self.deleted.set(self.deleted.get() + 1);
    }
}

/// In-memory library handing out [`MockEngine`]s.
#[derive(Clone)]
pub struct MockLibrary {
    pub capabilities: Capabilities,
    pub fail_processing: bool,
    /// Configuration of the last face engine created.
    pub last_config: Rc<RefCell<Option<FaceEngineConfig>>>,
    /// Layouts of every frame processed by engines of this library.
    pub layouts: Rc<RefCell<Vec<FrameLayout>>>,
    /// Number of engines released so far.
    pub deleted: Rc<Cell<usize>>,
}

impl Default for MockLibrary {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::all(),
            fail_processing: false,
            last_config: Default::default(),
            layouts: Default::default(),
            deleted: Default::default(),
        }
    }
}

impl MockLibrary {
    fn engine(&self) -> Box<dyn NativeEngine> {
        Box::new(MockEngine {
            graph: sample_graph(),
            content: None,
            fail_processing: self.fail_processing,
            layouts: self.layouts.clone(),
            deleted: self.deleted.clone(),
        })
    }
}

impl NativeLibrary for MockLibrary {
    fn version(&self) -> String {
        "mock 1.0".to_string()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn create_face_engine(&self, config: &FaceEngineConfig) -> ShoreResult<Box<dyn NativeEngine>> {
        if config.model_type == REJECTED_MODEL {
            return Err(ShoreError::Initialization(format!(
                "engine rejected model `{}`",
                config.model_type
            )));
        }
        *self.last_config.borrow_mut() = Some(config.clone());
        Ok(self.engine())
    }

    fn create_engine(&self, setup: &ScriptSetup) -> ShoreResult<Box<dyn NativeEngine>> {
        if setup.setup_script.is_empty() {
            return Err(ShoreError::Initialization("empty setup script".to_string()));
        }
        Ok(self.engine())
    }
}

#[fixture]
pub fn sample_graph() -> MockContent {
    let mouth = MockObject {
        region: Some(Region::new(30.0, 60.0, 45.0, 70.0)),
        ratings: vec![("Open".to_string(), 12.0)],
        ..MockObject::typed("Mouth")
    };
    let face = MockObject {
        region: Some(Region::new(10.0, 20.0, 60.0, 80.0)),
        markers: vec![
            ("LeftEye".to_string(), Marker::new(25.0, 40.0)),
            ("RightEye".to_string(), Marker::new(45.0, 40.0)),
        ],
        attributes: vec![("Gender".to_string(), "Female".to_string())],
        ratings: vec![("Age".to_string(), 31.0), ("Happy".to_string(), 80.5)],
        parts: vec![("Mouth".to_string(), mouth)],
        ..MockObject::typed("Face")
    };

    MockContent {
        objects: vec![face, MockObject::typed("Face")],
        infos: vec![("FrameRate".to_string(), "25.0".to_string())],
    }
}

#[fixture]
pub fn library() -> MockLibrary {
    MockLibrary::default()
}

#[fixture]
pub fn blank_image() -> Array2<u8> {
    Array2::zeros((100, 100))
}

/// Grayscale image with a bright square in the middle.
#[fixture]
pub fn sample_image() -> Array2<u8> {
    let mut image = Array2::zeros((100, 100));
    image
        .slice_mut(ndarray::s![30..70, 30..70])
        .fill(200);
    image
}

#[fixture]
pub fn sample_color_image() -> Array3<u8> {
    let mut image = Array3::zeros((48, 64, 3));
    image[[10, 20, 2]] = 255;
    image
}

#[fixture]
pub fn output_dir() -> PathBuf {
    let output_path = PathBuf::from("tests/output");
    std::fs::create_dir_all(output_path.clone()).expect("Can't create output directory");
    output_path
}
