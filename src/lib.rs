//! Thin, owning wrappers around OpenGL shader programs, vertex arrays, buffers, textures and
//! framebuffers.
//!
//! Every wrapper holds a [`Context`](type.Context.html), a shared handle to the [`Driver`]
//! issuing its calls, and releases its driver object when dropped. A real context is created
//! through [`Igloo`]:
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use igloo::*;
//!
//! fn main() -> igloo::Result<()> {
//!     let igloo = Igloo::new()?;
//!     let ctx = igloo.context();
//!
//!     let mut program = Program::load(&ctx, &ShaderLibrary::from_env(), "passthrough_vertex", "passthrough_fragment")?;
//!     let vertex_array = VertexArray::new(&ctx)
//!         .with_vertex_buffer(VertexBuffer::with_data(&ctx, &[-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0], None, None))
//!         .with_attribute("position", 3)
//!         .finish(&mut program);
//!
//!     program.attach_vertex_array(Rc::new(vertex_array));
//!     program.draw_arrays(PrimitiveMode::Triangles, 3);
//!     Ok(())
//! }
//! ```

use std::rc::Rc;

pub mod buffer;
pub mod context;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod graphics;
pub mod logging;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use crate::buffer::{Buffer, BufferTarget, BufferUsage, IndexBuffer, IndexType, PrimitiveMode, VertexBuffer};
pub use crate::context::{ContextAttributes, Igloo};
pub use crate::driver::{Driver, GlDriver};
pub use crate::error::{Error, Result};
pub use crate::framebuffer::{Framebuffer, FramebufferError};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::shader::{Dimension, Program, ShaderLibrary, ShaderStage, Uniform, UniformValue, VectorWidth};
pub use crate::texture::{Image, Texture, TextureOptions};
pub use crate::vertex_array::VertexArray;

/// The driver every wrapper issues its calls through. Being an `Rc`, wrappers can not leave the
/// thread the context is current on.
pub type Context = Rc<dyn Driver>;
