use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

/// The environment variable read by [`ShaderLibrary::from_env`](struct.ShaderLibrary.html#method.from_env).
pub const SHADER_DIR_VAR: &str = "IGLOO_SHADER_DIR";

const DEFAULT_DIR: &str = "shaders";
const DEFAULT_EXTENSION: &str = "glsl";

/// Resolves shader names to source files, `<root>/<name>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderLibrary {
    root: PathBuf,
    extension: String,
}

impl ShaderLibrary {
    /// A library rooted at `root`, using the `glsl` extension.
    pub fn new<P: Into<PathBuf>>(root: P) -> ShaderLibrary {
        ShaderLibrary {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// A library rooted at `$IGLOO_SHADER_DIR`, or `shaders` if that is not set.
    pub fn from_env() -> ShaderLibrary {
        match env::var_os(SHADER_DIR_VAR) {
            Some(root) => ShaderLibrary::new(root),
            None => ShaderLibrary::new(DEFAULT_DIR),
        }
    }

    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> ShaderLibrary {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, self.extension))
    }

    /// Reads the full source of the named shader. Fails if the file can not be found or is
    /// not valid utf8.
    pub fn fetch(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(source) => {
                debug!("Loaded shader \"{}\" from {}", name, path.display());
                Ok(source)
            },
            Err(source) => Err(Error::ShaderResource { name: name.to_owned(), path, source }),
        }
    }
}

impl Default for ShaderLibrary {
    fn default() -> ShaderLibrary {
        ShaderLibrary::new(DEFAULT_DIR)
    }
}
