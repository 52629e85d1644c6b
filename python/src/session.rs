//! Engine state behind the Python classes, free of any pyo3 types.
//!
//! Python objects cannot borrow the engine the way `rust_shore::Content`
//! does, so a `Content` or `Object` handed to Python keeps the generation it
//! was produced in plus the route to its node, and re-resolves both on every
//! access.

use numpy::ndarray::ArrayViewD;
use rust_shore::{Content, Engine, Object, ShoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("content is no longer valid: the engine processed another frame or was deleted")]
    Stale,
    #[error("engine was deleted")]
    Deleted,
    #[error(transparent)]
    Shore(#[from] ShoreError),
}

pub type SessionResult<R> = Result<R, SessionError>;

/// Python exception class an error is raised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    Index,
    Key,
    Value,
    Runtime,
}

impl SessionError {
    pub fn exception_kind(&self) -> ExceptionKind {
        match self {
            SessionError::Shore(ShoreError::IndexOutOfRange { .. }) => ExceptionKind::Index,
            SessionError::Shore(ShoreError::KeyNotFound(_)) => ExceptionKind::Key,
            SessionError::Shore(
                ShoreError::UnsupportedDimensionality { .. }
                | ShoreError::UnsupportedColorSpace(_)
                | ShoreError::UnsupportedLayout(_),
            ) => ExceptionKind::Value,
            _ => ExceptionKind::Runtime,
        }
    }
}

/// One step from an object down to one of its parts.
#[derive(Debug, Clone, PartialEq)]
pub enum PartStep {
    At(usize),
    Of(String),
}

/// Route from the content root to an object or a nested part.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPath {
    object: usize,
    parts: Vec<PartStep>,
}

impl ObjectPath {
    pub fn new(object: usize) -> Self {
        Self {
            object,
            parts: Vec::new(),
        }
    }

    pub fn child(&self, step: PartStep) -> Self {
        let mut parts = self.parts.clone();
        parts.push(step);
        Self {
            object: self.object,
            parts,
        }
    }
}

/// An engine plus the generation of its current content.
///
/// The generation advances on every successful `process` and on `delete`.
/// A rejected image leaves the engine untouched and keeps the generation.
pub struct Session {
    engine: Option<Engine>,
    generation: u64,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Some(engine),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Processes one image and returns the generation of its content.
    ///
    /// Two-axis images are copied to standard layout first when needed.
    pub fn process(&mut self, image: ArrayViewD<'_, u8>, tag: &str) -> SessionResult<u64> {
        let engine = self.engine.as_mut().ok_or(SessionError::Deleted)?;
        if image.ndim() == 2 {
            let contiguous = image.as_standard_layout();
            engine.process_tagged(contiguous.view(), tag)?;
        } else {
            engine.process_tagged(image, tag)?;
        }
        self.generation += 1;
        Ok(self.generation)
    }

    /// Releases the engine. Deleting twice has no effect.
    pub fn delete(&mut self) {
        self.generation += 1;
        if let Some(engine) = self.engine.take() {
            engine.delete();
        }
    }

    /// Content produced in `generation`, if it is still current.
    pub fn content(&self, generation: u64) -> SessionResult<Content<'_>> {
        if generation != self.generation {
            return Err(SessionError::Stale);
        }
        self.engine
            .as_ref()
            .and_then(|engine| engine.content())
            .ok_or(SessionError::Stale)
    }

    /// Walks `path` through the content produced in `generation`.
    pub fn object(&self, generation: u64, path: &ObjectPath) -> SessionResult<Object<'_>> {
        let content = self.content(generation)?;
        let mut object = content.object(path.object)?;
        for step in &path.parts {
            object = match step {
                PartStep::At(index) => object.parts().value_at(*index)?,
                PartStep::Of(key) => object.part_of(key)?,
            };
        }
        Ok(object)
    }
}
