use crate::{
    native::NativeLibrary, Engine, FaceEngineConfig, ScriptSetup, ShoreError, ShoreResult,
};

#[derive(Clone, Debug)]
enum Setup {
    Face(FaceEngineConfig),
    Script(ScriptSetup),
}

/// Builder for configuring and creating engines.
#[derive(Clone, Debug)]
pub struct EngineBuilder {
    setup: Setup,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::face(FaceEngineConfig::default())
    }
}

impl EngineBuilder {
    /// Create a new builder for a face engine with the given configuration.
    pub fn face(config: FaceEngineConfig) -> Self {
        Self {
            setup: Setup::Face(config),
        }
    }

    /// Create a new builder for an engine set up by a script.
    ///
    /// # Arguments
    ///
    /// * `setup_script` - Source of the setup script.
    /// * `setup_call` - Entry point to call once the script is loaded.
    pub fn script(setup_script: impl Into<String>, setup_call: impl Into<String>) -> Self {
        Self {
            setup: Setup::Script(ScriptSetup {
                setup_script: setup_script.into(),
                setup_call: setup_call.into(),
            }),
        }
    }

    /// Replaces the face configuration. Turns a script builder into a face builder.
    pub fn config(mut self, config: FaceEngineConfig) -> Self {
        self.setup = Setup::Face(config);
        self
    }

    /// Sets the detection model, e.g. `Face.Profile`.
    pub fn model_type(self, model_type: impl Into<String>) -> Self {
        let model_type = model_type.into();
        self.with_config(|config| config.model_type = model_type)
    }

    /// Sets the number of threads used inside the engine.
    pub fn thread_count(self, thread_count: u32) -> Self {
        self.with_config(|config| config.thread_count = thread_count)
    }

    /// Sets the seconds between two frames.
    pub fn time_base(self, time_base: f32) -> Self {
        self.with_config(|config| config.time_base = time_base)
    }

    pub fn image_scale(self, image_scale: f32) -> Self {
        self.with_config(|config| config.image_scale = image_scale)
    }

    /// Enables the facial point locator, e.g. `Face68`.
    pub fn point_locator(self, point_locator: impl Into<String>) -> Self {
        let point_locator = point_locator.into();
        self.with_config(|config| config.point_locator = Some(point_locator))
    }

    fn with_config(mut self, update: impl FnOnce(&mut FaceEngineConfig)) -> Self {
        if let Setup::Face(config) = &mut self.setup {
            update(config);
        }
        self
    }

    /// Builds a new engine from the given native library.
    pub fn build_with(&self, library: &dyn NativeLibrary) -> ShoreResult<Engine> {
        let capabilities = library.capabilities();
        let native = match &self.setup {
            Setup::Face(config) => {
                config.check_capabilities(&capabilities)?;
                log::debug!(
                    "Creating face engine (model: {}, threads: {})",
                    config.model_type,
                    config.thread_count
                );
                library.create_face_engine(config)?
            }
            Setup::Script(setup) => {
                if !capabilities.scripting {
                    return Err(ShoreError::Initialization(
                        "script setup is not supported by this engine".to_string(),
                    ));
                }
                log::debug!("Creating engine from script (call: {})", setup.setup_call);
                library.create_engine(setup)?
            }
        };

        Ok(Engine::from_native(native, capabilities))
    }

    /// Builds a new engine backed by the linked SHORE library.
    #[cfg(feature = "shore")]
    pub fn build(&self) -> ShoreResult<Engine> {
        self.build_with(&crate::shore::ShoreLibrary)
    }
}
