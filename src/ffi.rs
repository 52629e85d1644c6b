//! Raw declarations of the C shim in `shim/shore_c.h`.
//!
//! The vendor API is C++; the shim flattens it into plain functions over
//! opaque handles. Linking is configured by `build.rs`.

#![allow(non_camel_case_types)]

use std::marker::{PhantomData, PhantomPinned};
use std::os::raw::{c_char, c_float, c_int, c_long, c_uint, c_ulong};

macro_rules! opaque {
    ($name:ident) => {
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: PhantomData<(*mut u8, PhantomPinned)>,
        }
    };
}

opaque!(shore_engine);
opaque!(shore_content);
opaque!(shore_object);

/// Tri-state used for optional boolean options.
pub const SHORE_UNSET: c_int = -1;

#[repr(C)]
pub struct shore_face_config {
    pub time_base: c_float,
    pub update_time_base: bool,
    pub thread_count: c_uint,
    pub model_type: *const c_char,
    pub image_scale: c_float,
    pub min_face_size: c_float,
    pub min_face_score: c_float,
    pub id_memory_length: c_ulong,
    pub id_memory_type: *const c_char,
    pub track_faces: bool,
    pub phantom_trap: *const c_char,
    pub search_eyes: bool,
    pub search_nose: bool,
    pub search_mouth: bool,
    pub analyze_eyes: bool,
    pub analyze_mouth: bool,
    pub analyze_gender: bool,
    pub analyze_age: bool,
    pub analyze_happy: bool,
    pub analyze_sad: bool,
    pub analyze_surprised: bool,
    pub analyze_angry: bool,
    /// Null when unset.
    pub point_locator: *const c_char,
    pub single_face: c_int,
    pub heart_rate: c_int,
}

extern "C" {
    pub fn shore_version() -> *const c_char;
    pub fn shore_capabilities() -> c_uint;

    pub fn shore_create_face_engine(config: *const shore_face_config) -> *mut shore_engine;
    pub fn shore_create_engine(
        setup_script: *const c_char,
        setup_call: *const c_char,
    ) -> *mut shore_engine;
    pub fn shore_delete_engine(engine: *mut shore_engine);

    pub fn shore_process(
        engine: *mut shore_engine,
        image: *const u8,
        width: c_ulong,
        height: c_ulong,
        planes: c_ulong,
        pixel_feed: c_long,
        line_feed: c_long,
        plane_feed: c_long,
        color_space: *const c_char,
    ) -> *const shore_content;

    pub fn shore_content_object_count(content: *const shore_content) -> c_ulong;
    pub fn shore_content_object(content: *const shore_content, index: c_ulong)
        -> *const shore_object;
    pub fn shore_content_info_count(content: *const shore_content) -> c_ulong;
    pub fn shore_content_info_key(content: *const shore_content, index: c_ulong)
        -> *const c_char;
    pub fn shore_content_info(content: *const shore_content, index: c_ulong) -> *const c_char;
    pub fn shore_content_info_of(
        content: *const shore_content,
        key: *const c_char,
    ) -> *const c_char;

    pub fn shore_object_type(object: *const shore_object) -> *const c_char;
    /// Writes left, top, right, bottom. Returns 0 when the object has no region.
    pub fn shore_object_region(object: *const shore_object, out: *mut c_float) -> c_int;

    pub fn shore_object_marker_count(object: *const shore_object) -> c_ulong;
    pub fn shore_object_marker_key(object: *const shore_object, index: c_ulong) -> *const c_char;
    /// Writes x, y. Returns 0 when absent.
    pub fn shore_object_marker(
        object: *const shore_object,
        index: c_ulong,
        out: *mut c_float,
    ) -> c_int;
    pub fn shore_object_marker_of(
        object: *const shore_object,
        key: *const c_char,
        out: *mut c_float,
    ) -> c_int;

    pub fn shore_object_attribute_count(object: *const shore_object) -> c_ulong;
    pub fn shore_object_attribute_key(
        object: *const shore_object,
        index: c_ulong,
    ) -> *const c_char;
    pub fn shore_object_attribute(object: *const shore_object, index: c_ulong) -> *const c_char;
    pub fn shore_object_attribute_of(
        object: *const shore_object,
        key: *const c_char,
    ) -> *const c_char;

    pub fn shore_object_rating_count(object: *const shore_object) -> c_ulong;
    pub fn shore_object_rating_key(object: *const shore_object, index: c_ulong) -> *const c_char;
    pub fn shore_object_rating(
        object: *const shore_object,
        index: c_ulong,
        out: *mut c_float,
    ) -> c_int;
    pub fn shore_object_rating_of(
        object: *const shore_object,
        key: *const c_char,
        out: *mut c_float,
    ) -> c_int;

    pub fn shore_object_part_count(object: *const shore_object) -> c_ulong;
    pub fn shore_object_part_key(object: *const shore_object, index: c_ulong) -> *const c_char;
    pub fn shore_object_part(object: *const shore_object, index: c_ulong) -> *const shore_object;
    pub fn shore_object_part_of(
        object: *const shore_object,
        key: *const c_char,
    ) -> *const shore_object;
}
