#![allow(non_snake_case)]

use numpy::PyReadonlyArrayDyn;
use pyo3::{
    exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyValueError},
    prelude::*,
};
#[cfg(feature = "shore")]
use pyo3::{
    exceptions::PyTypeError,
    types::{PyBool, PyDict, PyFloat, PyLong, PyString},
};
use rust_shore as rust;

mod session;

use session::{ExceptionKind, ObjectPath, PartStep, Session, SessionError};

impl From<SessionError> for PyErr {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err.exception_kind() {
            ExceptionKind::Index => PyIndexError::new_err(message),
            ExceptionKind::Key => PyKeyError::new_err(message),
            ExceptionKind::Value => PyValueError::new_err(message),
            ExceptionKind::Runtime => PyRuntimeError::new_err(message),
        }
    }
}

fn to_py_err(err: rust::ShoreError) -> PyErr {
    SessionError::from(err).into()
}

/// SHORE engine instance.
#[pyclass(unsendable)]
struct Engine {
    session: Session,
}

impl Engine {
    fn new(inner: rust::Engine) -> Self {
        Self {
            session: Session::new(inner),
        }
    }
}

#[pymethods]
impl Engine {
    /// Processes one image.
    ///
    /// # Arguments
    ///
    /// * `image` - uint8 array of shape (height, width) for GRAYSCALE or
    ///   (height, width, 3) for RGB and BGR.
    /// * `colorSpace` - One of "GRAYSCALE", "RGB" or "BGR".
    ///
    /// # Returns
    ///
    /// The frame's `Content`, valid until the next successful call or engine
    /// deletion. A rejected image leaves the previous `Content` valid.
    #[pyo3(signature = (image, colorSpace="GRAYSCALE"))]
    fn Process(
        mut slf: PyRefMut<'_, Self>,
        image: PyReadonlyArrayDyn<'_, u8>,
        colorSpace: &str,
    ) -> PyResult<Content> {
        let generation = slf.session.process(image.as_array(), colorSpace)?;
        Ok(Content {
            engine: slf.into(),
            generation,
        })
    }
}

/// Result graph of one processed frame.
#[pyclass(unsendable)]
struct Content {
    engine: Py<Engine>,
    generation: u64,
}

impl Content {
    fn with<T>(
        &self,
        py: Python<'_>,
        read: impl FnOnce(rust::Content<'_>) -> rust::ShoreResult<T>,
    ) -> PyResult<T> {
        let engine = self.engine.borrow(py);
        let content = engine.session.content(self.generation)?;
        read(content).map_err(to_py_err)
    }
}

#[pymethods]
impl Content {
    fn getObjectCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |content| Ok(content.object_count()))
    }

    fn getObject(&self, py: Python<'_>, index: usize) -> PyResult<Object> {
        self.with(py, |content| content.object(index).map(drop))?;
        Ok(Object {
            engine: self.engine.clone_ref(py),
            generation: self.generation,
            path: ObjectPath::new(index),
        })
    }

    fn getInfoCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |content| Ok(content.info_count()))
    }

    fn getInfoKey(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |content| content.infos().key_at(index).map(str::to_string))
    }

    fn getInfo(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |content| content.infos().value_at(index).map(str::to_string))
    }

    fn getInfoOf(&self, py: Python<'_>, key: &str) -> PyResult<String> {
        self.with(py, |content| content.info_of(key).map(str::to_string))
    }

    fn __str__(&self, py: Python<'_>) -> PyResult<String> {
        self.with(py, |content| Ok(content.to_string()))
    }
}

/// One node of the result graph.
#[pyclass(unsendable)]
struct Object {
    engine: Py<Engine>,
    generation: u64,
    path: ObjectPath,
}

impl Object {
    fn with<T>(
        &self,
        py: Python<'_>,
        read: impl FnOnce(rust::Object<'_>) -> rust::ShoreResult<T>,
    ) -> PyResult<T> {
        let engine = self.engine.borrow(py);
        let object = engine.session.object(self.generation, &self.path)?;
        read(object).map_err(to_py_err)
    }

    fn child(&self, py: Python<'_>, step: PartStep) -> Object {
        Object {
            engine: self.engine.clone_ref(py),
            generation: self.generation,
            path: self.path.child(step),
        }
    }
}

#[pymethods]
impl Object {
    fn getType(&self, py: Python<'_>) -> PyResult<String> {
        self.with(py, |object| object.object_type().map(str::to_string))
    }

    fn getRegion(&self, py: Python<'_>) -> PyResult<Option<Region>> {
        self.with(py, |object| Ok(object.region().map(|inner| Region { inner })))
    }

    fn getMarkerCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |object| Ok(object.markers().count()))
    }

    fn getMarkerKey(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |object| object.markers().key_at(index).map(str::to_string))
    }

    fn getMarker(&self, py: Python<'_>, index: usize) -> PyResult<Marker> {
        self.with(py, |object| object.markers().value_at(index).map(|inner| Marker { inner }))
    }

    fn getMarkerOf(&self, py: Python<'_>, key: &str) -> PyResult<Marker> {
        self.with(py, |object| object.marker_of(key).map(|inner| Marker { inner }))
    }

    fn getAttributeCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |object| Ok(object.attributes().count()))
    }

    fn getAttributeKey(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |object| object.attributes().key_at(index).map(str::to_string))
    }

    fn getAttribute(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |object| object.attributes().value_at(index).map(str::to_string))
    }

    fn getAttributeOf(&self, py: Python<'_>, key: &str) -> PyResult<String> {
        self.with(py, |object| object.attribute_of(key).map(str::to_string))
    }

    fn getRatingCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |object| Ok(object.ratings().count()))
    }

    fn getRatingKey(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |object| object.ratings().key_at(index).map(str::to_string))
    }

    fn getRating(&self, py: Python<'_>, index: usize) -> PyResult<f32> {
        self.with(py, |object| object.ratings().value_at(index))
    }

    fn getRatingOf(&self, py: Python<'_>, key: &str) -> PyResult<f32> {
        self.with(py, |object| object.rating_of(key))
    }

    fn getPartCount(&self, py: Python<'_>) -> PyResult<usize> {
        self.with(py, |object| Ok(object.parts().count()))
    }

    fn getPartKey(&self, py: Python<'_>, index: usize) -> PyResult<String> {
        self.with(py, |object| object.parts().key_at(index).map(str::to_string))
    }

    fn getPart(&self, py: Python<'_>, index: usize) -> PyResult<Object> {
        self.with(py, |object| object.parts().value_at(index).map(drop))?;
        Ok(self.child(py, PartStep::At(index)))
    }

    fn getPartOf(&self, py: Python<'_>, key: &str) -> PyResult<Object> {
        self.with(py, |object| object.part_of(key).map(drop))?;
        Ok(self.child(py, PartStep::Of(key.to_string())))
    }

    fn __str__(&self, py: Python<'_>) -> PyResult<String> {
        self.with(py, |object| Ok(format!("{:#}", object)))
    }
}

/// Axis-aligned region in image coordinates.
#[pyclass]
#[derive(Clone, Copy)]
struct Region {
    inner: rust::Region,
}

#[pymethods]
impl Region {
    fn getLeft(&self) -> f32 {
        self.inner.left
    }

    fn getTop(&self) -> f32 {
        self.inner.top
    }

    fn getRight(&self) -> f32 {
        self.inner.right
    }

    fn getBottom(&self) -> f32 {
        self.inner.bottom
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Point in image coordinates.
#[pyclass]
#[derive(Clone, Copy)]
struct Marker {
    inner: rust::Marker,
}

#[pymethods]
impl Marker {
    fn getX(&self) -> f32 {
        self.inner.x
    }

    fn getY(&self) -> f32 {
        self.inner.y
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

#[cfg(feature = "shore")]
fn option_value(name: &str, value: &PyAny) -> PyResult<rust::OptionValue> {
    if value.is_instance_of::<PyBool>() {
        Ok(rust::OptionValue::Bool(value.extract()?))
    } else if value.is_instance_of::<PyLong>() {
        Ok(rust::OptionValue::Int(value.extract()?))
    } else if value.is_instance_of::<PyFloat>() {
        Ok(rust::OptionValue::Float(value.extract()?))
    } else if value.is_instance_of::<PyString>() {
        Ok(rust::OptionValue::Str(value.extract()?))
    } else {
        Err(PyTypeError::new_err(format!(
            "option `{}` has unsupported type {}",
            name,
            value.get_type().name()?
        )))
    }
}

/// Creates a face engine.
///
/// Options are passed by keyword with the engine's names, e.g.
/// `CreateFaceEngine(threadCount=4, analyzeGender=True)`. Omitted options
/// keep their defaults.
#[cfg(feature = "shore")]
#[pyfunction]
#[pyo3(signature = (**options))]
fn CreateFaceEngine(options: Option<&PyDict>) -> PyResult<Engine> {
    let mut config = rust::FaceEngineConfig::default();
    if let Some(options) = options {
        for (name, value) in options {
            let name: &str = name.extract()?;
            config
                .set(name, option_value(name, value)?)
                .map_err(to_py_err)?;
        }
    }
    rust::create_face_engine(&config)
        .map(Engine::new)
        .map_err(to_py_err)
}

/// Creates an engine from a setup script and the call that configures it.
#[cfg(feature = "shore")]
#[pyfunction]
fn CreateEngine(setupScript: &str, setupCall: &str) -> PyResult<Engine> {
    rust::create_engine(setupScript, setupCall)
        .map(Engine::new)
        .map_err(to_py_err)
}

/// Releases the engine. Contents obtained from it raise `RuntimeError`
/// afterwards; deleting twice has no effect.
#[pyfunction]
fn DeleteEngine(mut engine: PyRefMut<'_, Engine>) {
    engine.session.delete();
}

/// Version identifier of the linked SHORE library.
#[cfg(feature = "shore")]
#[pyfunction]
fn Version() -> String {
    rust::version()
}

/// Python bindings to the SHORE face detection and analysis engine.
#[pymodule]
fn shore(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    let _ = env_logger::try_init();

    m.add_class::<Engine>()?;
    m.add_class::<Content>()?;
    m.add_class::<Object>()?;
    m.add_class::<Region>()?;
    m.add_class::<Marker>()?;
    m.add_function(wrap_pyfunction!(DeleteEngine, m)?)?;
    #[cfg(feature = "shore")]
    {
        m.add_function(wrap_pyfunction!(CreateFaceEngine, m)?)?;
        m.add_function(wrap_pyfunction!(CreateEngine, m)?)?;
        m.add_function(wrap_pyfunction!(Version, m)?)?;
    }
    Ok(())
}
