use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::framebuffer::FramebufferError;
use crate::shader::ShaderStage;

/// Errors which can occur while building driver objects. Misuse of an already built object
/// (drawing without a vertex array, reading back an empty texture, ...) panics instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to compile {stage} shader:\n{log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("failed to link shader program:\n{0}")]
    ProgramLink(String),

    #[error("could not read shader \"{name}\" from {}: {source}", path.display())]
    ShaderResource {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid uniform dimension {0}, expected a value in 0..=4")]
    InvalidDimension(usize),

    #[error("failed to decode image: {0}")]
    Image(#[from] png::DecodingError),

    #[error("failed to create OpenGL context: {0}")]
    Context(String),

    #[error(transparent)]
    Framebuffer(#[from] FramebufferError),
}

pub type Result<T> = std::result::Result<T, Error>;
