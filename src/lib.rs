//! Safe bindings to the SHORE face detection and analysis engine.
//!
//! The crate validates caller images, computes the strides the engine
//! expects, forwards engine configuration and exposes the engine-owned
//! result graph through borrowed, read-only views. The engine itself is
//! reached through the [`native`] traits; the `shore` feature provides the
//! implementation backed by the linked library.

mod error;
pub use error::{ShoreError, ShoreResult};

mod color;
pub use color::ColorSpace;

mod frame;
pub use frame::{Frame, FrameLayout};

mod imaging;
pub use imaging::AsArrayView;

mod config;
pub use config::{Capabilities, FaceEngineConfig, OptionValue, ScriptSetup};

mod region;
pub use region::{Marker, Region};

pub mod native;

mod keyed;
pub use keyed::{Keyed, KeyedIter, KeyedSource};

mod content;
pub use content::{Attributes, Content, Infos, Markers, Object, Parts, Ratings};

mod engine;
pub use engine::Engine;

mod builder;
pub use builder::EngineBuilder;

#[cfg(feature = "shore")]
mod ffi;

#[cfg(feature = "shore")]
mod shore;
#[cfg(feature = "shore")]
pub use shore::{create_engine, create_face_engine, delete_engine, version, ShoreLibrary};

#[cfg(feature = "viz")]
pub mod viz;

#[cfg(test)]
pub mod testing;
