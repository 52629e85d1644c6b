use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{ShoreError, ShoreResult};

/// Face engine configuration.
///
/// Every option defaults to the engine's built-in value, so partial
/// configurations are completed with `..Default::default()` or by
/// deserializing a document that names only some options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FaceEngineConfig {
    /// Seconds between two frames. `0` lets the engine measure it.
    pub time_base: f32,
    pub update_time_base: bool,
    /// Threads used inside the engine.
    pub thread_count: u32,
    /// Detection model, e.g. `Face.Front` or `Face.Profile`.
    pub model_type: String,
    pub image_scale: f32,
    /// Minimum face size in percent of the image.
    pub min_face_size: f32,
    pub min_face_score: f32,
    pub id_memory_length: u32,
    pub id_memory_type: String,
    pub track_faces: bool,
    pub phantom_trap: String,
    pub search_eyes: bool,
    pub search_nose: bool,
    pub search_mouth: bool,
    pub analyze_eyes: bool,
    pub analyze_mouth: bool,
    pub analyze_gender: bool,
    pub analyze_age: bool,
    pub analyze_happy: bool,
    pub analyze_sad: bool,
    #[serde(rename = "analyzeSurprized", alias = "analyzeSurprised")]
    pub analyze_surprised: bool,
    pub analyze_angry: bool,
    /// Facial point locator, e.g. `Face68`. Needs [`Capabilities::point_locator`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_locator: Option<String>,
    /// Needs [`Capabilities::single_face`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_face: Option<bool>,
    /// Needs [`Capabilities::heart_rate`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<bool>,
}

impl Default for FaceEngineConfig {
    fn default() -> Self {
        Self {
            time_base: 0.0,
            update_time_base: true,
            thread_count: 2,
            model_type: "Face.Front".to_string(),
            image_scale: 1.0,
            min_face_size: 0.0,
            min_face_score: 0.0,
            id_memory_length: 0,
            id_memory_type: "Spatial".to_string(),
            track_faces: true,
            phantom_trap: "Off".to_string(),
            search_eyes: true,
            search_nose: false,
            search_mouth: false,
            analyze_eyes: false,
            analyze_mouth: false,
            analyze_gender: false,
            analyze_age: false,
            analyze_happy: false,
            analyze_sad: false,
            analyze_surprised: false,
            analyze_angry: false,
            point_locator: None,
            single_face: None,
            heart_rate: None,
        }
    }
}

/// Loosely typed option value, as received from a scripting caller.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{}", value),
            OptionValue::Int(value) => write!(f, "{}", value),
            OptionValue::Float(value) => write!(f, "{}", value),
            OptionValue::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

impl OptionValue {
    fn into_bool(self, name: &str) -> ShoreResult<bool> {
        match self {
            OptionValue::Bool(value) => Ok(value),
            other => Err(type_mismatch(name, "a boolean", &other)),
        }
    }

    fn into_f32(self, name: &str) -> ShoreResult<f32> {
        match self {
            OptionValue::Float(value) => Ok(value as f32),
            OptionValue::Int(value) => Ok(value as f32),
            other => Err(type_mismatch(name, "a number", &other)),
        }
    }

    fn into_u32(self, name: &str) -> ShoreResult<u32> {
        match self {
            OptionValue::Int(value) => u32::try_from(value).map_err(|_| {
                ShoreError::Initialization(format!(
                    "option `{}` is out of range: {}",
                    name, value
                ))
            }),
            other => Err(type_mismatch(name, "a non-negative integer", &other)),
        }
    }

    fn into_string(self, name: &str) -> ShoreResult<String> {
        match self {
            OptionValue::Str(value) => Ok(value),
            other => Err(type_mismatch(name, "a string", &other)),
        }
    }
}

fn type_mismatch(name: &str, expected: &str, got: &OptionValue) -> ShoreError {
    ShoreError::Initialization(format!(
        "option `{}` expects {}, got {}",
        name, expected, got
    ))
}

impl FaceEngineConfig {
    /// Sets one option by name.
    ///
    /// Accepts the engine's camelCase names (`minFaceSize`) as well as the
    /// field names (`min_face_size`).
    ///
    /// # Errors
    ///
    /// `ShoreError::Initialization` for unknown names and for values that
    /// cannot be coerced to the option's type.
    pub fn set(&mut self, name: &str, value: OptionValue) -> ShoreResult<()> {
        match name {
            "timeBase" | "time_base" => self.time_base = value.into_f32(name)?,
            "updateTimeBase" | "update_time_base" => {
                self.update_time_base = value.into_bool(name)?
            }
            "threadCount" | "thread_count" => self.thread_count = value.into_u32(name)?,
            "modelType" | "model_type" => self.model_type = value.into_string(name)?,
            "imageScale" | "image_scale" => self.image_scale = value.into_f32(name)?,
            "minFaceSize" | "min_face_size" => self.min_face_size = value.into_f32(name)?,
            "minFaceScore" | "min_face_score" => self.min_face_score = value.into_f32(name)?,
            "idMemoryLength" | "id_memory_length" => {
                self.id_memory_length = value.into_u32(name)?
            }
            "idMemoryType" | "id_memory_type" => self.id_memory_type = value.into_string(name)?,
            "trackFaces" | "track_faces" => self.track_faces = value.into_bool(name)?,
            "phantomTrap" | "phantom_trap" => self.phantom_trap = value.into_string(name)?,
            "searchEyes" | "search_eyes" => self.search_eyes = value.into_bool(name)?,
            "searchNose" | "search_nose" => self.search_nose = value.into_bool(name)?,
            "searchMouth" | "search_mouth" => self.search_mouth = value.into_bool(name)?,
            "analyzeEyes" | "analyze_eyes" => self.analyze_eyes = value.into_bool(name)?,
            "analyzeMouth" | "analyze_mouth" => self.analyze_mouth = value.into_bool(name)?,
            "analyzeGender" | "analyze_gender" => self.analyze_gender = value.into_bool(name)?,
            "analyzeAge" | "analyze_age" => self.analyze_age = value.into_bool(name)?,
            "analyzeHappy" | "analyze_happy" => self.analyze_happy = value.into_bool(name)?,
            "analyzeSad" | "analyze_sad" => self.analyze_sad = value.into_bool(name)?,
            "analyzeSurprized" | "analyzeSurprised" | "analyze_surprised" => {
                self.analyze_surprised = value.into_bool(name)?
            }
            "analyzeAngry" | "analyze_angry" => self.analyze_angry = value.into_bool(name)?,
            "pointLocator" | "point_locator" => {
                self.point_locator = Some(value.into_string(name)?)
            }
            "singleFace" | "single_face" => self.single_face = Some(value.into_bool(name)?),
            "heartRate" | "heart_rate" => self.heart_rate = Some(value.into_bool(name)?),
            _ => {
                return Err(ShoreError::Initialization(format!(
                    "unrecognized option `{}`",
                    name
                )))
            }
        }
        Ok(())
    }

    /// Checks that every optional option is backed by an engine capability.
    pub fn check_capabilities(&self, capabilities: &Capabilities) -> ShoreResult<()> {
        let unsupported = [
            ("pointLocator", self.point_locator.is_some(), capabilities.point_locator),
            ("singleFace", self.single_face.is_some(), capabilities.single_face),
            ("heartRate", self.heart_rate.is_some(), capabilities.heart_rate),
        ]
        .into_iter()
        .find(|(_, requested, supported)| *requested && !supported);

        match unsupported {
            Some((name, _, _)) => Err(ShoreError::Initialization(format!(
                "option `{}` is not supported by this engine",
                name
            ))),
            None => Ok(()),
        }
    }
}

/// Script-based engine setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSetup {
    /// Source of the setup script.
    pub setup_script: String,
    /// Entry point called with the script loaded.
    pub setup_call: String,
}

/// Optional features of the native engine build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// RGB and BGR input.
    pub color: bool,
    pub point_locator: bool,
    pub single_face: bool,
    pub heart_rate: bool,
    /// Script-based setup through [`ScriptSetup`].
    pub scripting: bool,
}

impl Capabilities {
    pub const COLOR: u32 = 1;
    pub const POINT_LOCATOR: u32 = 1 << 1;
    pub const SINGLE_FACE: u32 = 1 << 2;
    pub const HEART_RATE: u32 = 1 << 3;
    pub const SCRIPTING: u32 = 1 << 4;

    /// Every capability enabled.
    pub fn all() -> Self {
        Self::from_bits(u32::MAX)
    }

    /// Decodes the bitmask reported by the native shim.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            color: bits & Self::COLOR != 0,
            point_locator: bits & Self::POINT_LOCATOR != 0,
            single_face: bits & Self::SINGLE_FACE != 0,
            heart_rate: bits & Self::HEART_RATE != 0,
            scripting: bits & Self::SCRIPTING != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn should_complete_partial_documents_with_defaults() {
        let config: FaceEngineConfig =
            serde_json::from_str(r#"{"modelType": "Face.Profile", "imageScale": 0.5}"#).unwrap();

        assert_eq!(
            config,
            FaceEngineConfig {
                model_type: "Face.Profile".to_string(),
                image_scale: 0.5,
                ..Default::default()
            }
        );
    }

    #[test]
    fn should_parse_empty_document_as_default() {
        let config: FaceEngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FaceEngineConfig::default());
    }

    #[test]
    fn should_reject_unknown_document_fields() {
        let result = serde_json::from_str::<FaceEngineConfig>(r#"{"searchEars": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_keep_engine_spelling_when_serializing() {
        let json = serde_json::to_value(FaceEngineConfig::default()).unwrap();
        assert_eq!(json["analyzeSurprized"], serde_json::Value::Bool(false));
        assert_eq!(json["threadCount"], serde_json::json!(2));
        assert!(json.get("pointLocator").is_none());
    }

    #[rstest]
    #[case("threadCount", OptionValue::Int(8))]
    #[case("thread_count", OptionValue::Int(8))]
    fn should_set_by_either_name(#[case] name: &str, #[case] value: OptionValue) {
        let mut config = FaceEngineConfig::default();
        config.set(name, value).unwrap();
        assert_eq!(config.thread_count, 8);
    }

    #[test]
    fn should_coerce_integers_to_floats() {
        let mut config = FaceEngineConfig::default();
        config.set("timeBase", OptionValue::Int(1)).unwrap();
        config.set("minFaceSize", OptionValue::Float(9.5)).unwrap();

        assert_eq!(config.time_base, 1.0);
        assert_eq!(config.min_face_size, 9.5);
    }

    #[test]
    fn should_set_optional_options() {
        let mut config = FaceEngineConfig::default();
        config
            .set("pointLocator", OptionValue::Str("Face68".to_string()))
            .unwrap();
        config.set("singleFace", OptionValue::Bool(true)).unwrap();

        assert_eq!(config.point_locator.as_deref(), Some("Face68"));
        assert_eq!(config.single_face, Some(true));
        assert_eq!(config.heart_rate, None);
    }

    #[rstest]
    #[case("searchEars", OptionValue::Bool(true))]
    #[case("searchEyes", OptionValue::Int(1))]
    #[case("threadCount", OptionValue::Int(-1))]
    #[case("threadCount", OptionValue::Float(2.5))]
    #[case("modelType", OptionValue::Bool(false))]
    #[case("imageScale", OptionValue::Str("1".to_string()))]
    #[case("searchParts", OptionValue::Str("On".to_string()))]
    #[case("analyzeExpression", OptionValue::Str("Dnn".to_string()))]
    #[case("analyzeDemography", OptionValue::Str("Dnn".to_string()))]
    fn should_reject_bad_options(#[case] name: &str, #[case] value: OptionValue) {
        let mut config = FaceEngineConfig::default();
        let err = config.set(name, value).unwrap_err();

        assert!(matches!(err, ShoreError::Initialization(_)));
        assert!(err.to_string().contains(name));
        assert_eq!(config, FaceEngineConfig::default());
    }

    #[test]
    fn should_require_capabilities_for_optional_options() {
        let config = FaceEngineConfig {
            point_locator: Some("Face68".to_string()),
            ..Default::default()
        };

        assert!(config.check_capabilities(&Capabilities::all()).is_ok());
        let err = config
            .check_capabilities(&Capabilities::default())
            .unwrap_err();
        assert!(err.to_string().contains("pointLocator"));
        assert!(FaceEngineConfig::default()
            .check_capabilities(&Capabilities::default())
            .is_ok());
    }

    #[test]
    fn should_decode_capability_bits() {
        let capabilities = Capabilities::from_bits(Capabilities::COLOR | Capabilities::SCRIPTING);

        assert!(capabilities.color);
        assert!(capabilities.scripting);
        assert!(!capabilities.point_locator);
        assert!(!capabilities.single_face);
        assert!(!capabilities.heart_rate);
    }
}
