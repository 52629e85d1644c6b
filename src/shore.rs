//! Backend for the native SHORE library, linked through the C shim.

use std::{
    ffi::{CStr, CString},
    os::raw::{c_char, c_float, c_int, c_long, c_ulong},
    ptr::{self, NonNull},
};

use crate::{
    ffi,
    native::{ContentNode, NativeEngine, NativeLibrary, ObjectNode},
    Capabilities, Engine, EngineBuilder, FaceEngineConfig, Frame, Marker, Region, ScriptSetup,
    ShoreError, ShoreResult,
};

/// Reads a string owned by the engine.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
unsafe fn engine_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    let raw = CStr::from_ptr(ptr);
    match raw.to_str() {
        Ok(s) => Some(s),
        Err(err) => {
            log::warn!(
                "Engine string {:?} is not valid UTF-8: {}",
                raw.to_string_lossy(),
                err
            );
            None
        }
    }
}

fn tri_state(value: Option<bool>) -> c_int {
    value.map_or(ffi::SHORE_UNSET, c_int::from)
}

/// The linked SHORE library.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoreLibrary;

impl NativeLibrary for ShoreLibrary {
    fn version(&self) -> String {
        // SAFETY: the shim returns a static string.
        unsafe { engine_str(ffi::shore_version()) }
            .unwrap_or_default()
            .to_string()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::from_bits(unsafe { ffi::shore_capabilities() })
    }

    fn create_face_engine(&self, config: &FaceEngineConfig) -> ShoreResult<Box<dyn NativeEngine>> {
        let model_type = CString::new(config.model_type.as_str())?;
        let id_memory_type = CString::new(config.id_memory_type.as_str())?;
        let phantom_trap = CString::new(config.phantom_trap.as_str())?;
        let point_locator = config
            .point_locator
            .as_deref()
            .map(CString::new)
            .transpose()?;

        let raw = ffi::shore_face_config {
            time_base: config.time_base,
            update_time_base: config.update_time_base,
            thread_count: config.thread_count,
            model_type: model_type.as_ptr(),
            image_scale: config.image_scale,
            min_face_size: config.min_face_size,
            min_face_score: config.min_face_score,
            id_memory_length: config.id_memory_length as c_ulong,
            id_memory_type: id_memory_type.as_ptr(),
            track_faces: config.track_faces,
            phantom_trap: phantom_trap.as_ptr(),
            search_eyes: config.search_eyes,
            search_nose: config.search_nose,
            search_mouth: config.search_mouth,
            analyze_eyes: config.analyze_eyes,
            analyze_mouth: config.analyze_mouth,
            analyze_gender: config.analyze_gender,
            analyze_age: config.analyze_age,
            analyze_happy: config.analyze_happy,
            analyze_sad: config.analyze_sad,
            analyze_surprised: config.analyze_surprised,
            analyze_angry: config.analyze_angry,
            point_locator: point_locator.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
            single_face: tri_state(config.single_face),
            heart_rate: tri_state(config.heart_rate),
        };

        // SAFETY: every pointer in `raw` outlives the call.
        let engine = unsafe { ffi::shore_create_face_engine(&raw) };
        ShoreEngine::wrap(engine).ok_or_else(|| {
            ShoreError::Initialization(format!(
                "SHORE rejected the face engine configuration (model: {})",
                config.model_type
            ))
        })
    }

    fn create_engine(&self, setup: &ScriptSetup) -> ShoreResult<Box<dyn NativeEngine>> {
        let script = CString::new(setup.setup_script.as_str())?;
        let call = CString::new(setup.setup_call.as_str())?;

        let engine = unsafe { ffi::shore_create_engine(script.as_ptr(), call.as_ptr()) };
        ShoreEngine::wrap(engine).ok_or_else(|| {
            ShoreError::Initialization(format!(
                "SHORE rejected the setup script (call: {})",
                setup.setup_call
            ))
        })
    }
}

struct ShoreEngine {
    raw: NonNull<ffi::shore_engine>,
    content: *const ffi::shore_content,
}

impl ShoreEngine {
    fn wrap(raw: *mut ffi::shore_engine) -> Option<Box<dyn NativeEngine>> {
        NonNull::new(raw).map(|raw| {
            Box::new(ShoreEngine {
                raw,
                content: ptr::null(),
            }) as Box<dyn NativeEngine>
        })
    }
}

impl NativeEngine for ShoreEngine {
    fn process(&mut self, frame: &Frame<'_>) -> Option<&dyn ContentNode> {
        let layout = frame.layout();
        // SAFETY: the frame borrows a buffer that matches its layout for the
        // whole call, and the engine does not keep the pointer afterwards.
        self.content = unsafe {
            ffi::shore_process(
                self.raw.as_ptr(),
                frame.as_ptr(),
                layout.width as c_ulong,
                layout.height as c_ulong,
                layout.planes as c_ulong,
                layout.pixel_stride as c_long,
                layout.line_stride as c_long,
                layout.plane_stride as c_long,
                layout.color_space.as_c_str().as_ptr(),
            )
        };
        self.content()
    }

    fn content(&self) -> Option<&dyn ContentNode> {
        // SAFETY: the content stays valid until the next process call, which
        // needs `&mut self`.
        unsafe { self.content.as_ref() }.map(|content| content as &dyn ContentNode)
    }
}

impl Drop for ShoreEngine {
    fn drop(&mut self) {
        unsafe { ffi::shore_delete_engine(self.raw.as_ptr()) }
    }
}

impl ContentNode for ffi::shore_content {
    fn object_count(&self) -> usize {
        unsafe { ffi::shore_content_object_count(self) as usize }
    }

    fn object(&self, index: usize) -> Option<&dyn ObjectNode> {
        unsafe { ffi::shore_content_object(self, index as c_ulong).as_ref() }
            .map(|object| object as &dyn ObjectNode)
    }

    fn info_count(&self) -> usize {
        unsafe { ffi::shore_content_info_count(self) as usize }
    }

    fn info_key(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_content_info_key(self, index as c_ulong)) }
    }

    fn info(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_content_info(self, index as c_ulong)) }
    }

    fn info_of(&self, key: &str) -> Option<&str> {
        let key = CString::new(key).ok()?;
        unsafe { engine_str(ffi::shore_content_info_of(self, key.as_ptr())) }
    }
}

fn read_marker(read: impl FnOnce(*mut c_float) -> c_int) -> Option<Marker> {
    let mut out = [0.0; 2];
    (read(out.as_mut_ptr()) != 0).then(|| Marker::new(out[0], out[1]))
}

fn read_rating(read: impl FnOnce(*mut c_float) -> c_int) -> Option<f32> {
    let mut out = 0.0;
    (read(&mut out) != 0).then_some(out)
}

impl ObjectNode for ffi::shore_object {
    fn object_type(&self) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_type(self)) }
    }

    fn region(&self) -> Option<Region> {
        let mut out = [0.0; 4];
        let found = unsafe { ffi::shore_object_region(self, out.as_mut_ptr()) } != 0;
        found.then(|| Region::new(out[0], out[1], out[2], out[3]))
    }

    fn marker_count(&self) -> usize {
        unsafe { ffi::shore_object_marker_count(self) as usize }
    }

    fn marker_key(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_marker_key(self, index as c_ulong)) }
    }

    fn marker(&self, index: usize) -> Option<Marker> {
        read_marker(|out| unsafe { ffi::shore_object_marker(self, index as c_ulong, out) })
    }

    fn marker_of(&self, key: &str) -> Option<Marker> {
        let key = CString::new(key).ok()?;
        read_marker(|out| unsafe { ffi::shore_object_marker_of(self, key.as_ptr(), out) })
    }

    fn attribute_count(&self) -> usize {
        unsafe { ffi::shore_object_attribute_count(self) as usize }
    }

    fn attribute_key(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_attribute_key(self, index as c_ulong)) }
    }

    fn attribute(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_attribute(self, index as c_ulong)) }
    }

    fn attribute_of(&self, key: &str) -> Option<&str> {
        let key = CString::new(key).ok()?;
        unsafe { engine_str(ffi::shore_object_attribute_of(self, key.as_ptr())) }
    }

    fn rating_count(&self) -> usize {
        unsafe { ffi::shore_object_rating_count(self) as usize }
    }

    fn rating_key(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_rating_key(self, index as c_ulong)) }
    }

    fn rating(&self, index: usize) -> Option<f32> {
        read_rating(|out| unsafe { ffi::shore_object_rating(self, index as c_ulong, out) })
    }

    fn rating_of(&self, key: &str) -> Option<f32> {
        let key = CString::new(key).ok()?;
        read_rating(|out| unsafe { ffi::shore_object_rating_of(self, key.as_ptr(), out) })
    }

    fn part_count(&self) -> usize {
        unsafe { ffi::shore_object_part_count(self) as usize }
    }

    fn part_key(&self, index: usize) -> Option<&str> {
        unsafe { engine_str(ffi::shore_object_part_key(self, index as c_ulong)) }
    }

    fn part(&self, index: usize) -> Option<&dyn ObjectNode> {
        unsafe { ffi::shore_object_part(self, index as c_ulong).as_ref() }
            .map(|part| part as &dyn ObjectNode)
    }

    fn part_of(&self, key: &str) -> Option<&dyn ObjectNode> {
        let key = CString::new(key).ok()?;
        unsafe { ffi::shore_object_part_of(self, key.as_ptr()).as_ref() }
            .map(|part| part as &dyn ObjectNode)
    }
}

/// Version identifier of the linked SHORE library.
pub fn version() -> String {
    ShoreLibrary.version()
}

/// Creates a face engine. Options left at their defaults use the engine's
/// built-in values.
pub fn create_face_engine(config: &FaceEngineConfig) -> ShoreResult<Engine> {
    EngineBuilder::face(config.clone()).build()
}

/// Creates an engine from a setup script and its entry point.
pub fn create_engine(setup_script: &str, setup_call: &str) -> ShoreResult<Engine> {
    EngineBuilder::script(setup_script, setup_call).build()
}

/// Releases an engine. Any content it produced is unusable afterwards.
pub fn delete_engine(engine: Engine) {
    engine.delete()
}
