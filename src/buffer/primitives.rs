//! Basic types used in all buffers

use gl;
use gl::types::*;

/// Represents different types of primitives which can be drawn on the GPU.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveMode {
    Points                      = gl::POINTS,
    LineStrip                   = gl::LINE_STRIP,
    LineLoop                    = gl::LINE_LOOP,
    Lines                       = gl::LINES,
    TriangleStrip               = gl::TRIANGLE_STRIP,
    TriangleFan                 = gl::TRIANGLE_FAN,
    Triangles                   = gl::TRIANGLES,
}

/// Represents different gl buffer usage hints. Note that these are hints,
/// and drivers will not necessarily respect these.
///
/// The first part of the name indicates how frequently the data will be used:
///
/// * Static - Data is set once and used often
/// * Dynamic - Data is set frequently and used frequently
/// * Stream - Data is set once and used at most a few times
///
/// The second part indicates how it will be used:
///
/// * Draw - Data will be set by the application and read by the GPU
/// * Read - Data is set by the GPU and read by the application
/// * Copy - Data is set and read by the GPU
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum BufferUsage {
    StaticDraw  = gl::STATIC_DRAW,
    DynamicDraw = gl::DYNAMIC_DRAW,
    StreamDraw  = gl::STREAM_DRAW,
    StaticRead  = gl::STATIC_READ,
    DynamicRead = gl::DYNAMIC_READ,
    StreamRead  = gl::STREAM_READ,
    StaticCopy  = gl::STATIC_COPY,
    DynamicCopy = gl::DYNAMIC_COPY,
    StreamCopy  = gl::STREAM_COPY,
}

impl Default for BufferUsage {
    /// Buffers are uploaded once and drawn often unless told otherwise.
    fn default() -> BufferUsage { BufferUsage::StaticDraw }
}

/// Represents a target to which a buffer can be bound
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    Array               = gl::ARRAY_BUFFER,
    ElementArray        = gl::ELEMENT_ARRAY_BUFFER,
    Uniform             = gl::UNIFORM_BUFFER,
}

/// The type of the indices stored in an [`IndexBuffer`](struct.IndexBuffer.html).
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexType {
    UnsignedByte  = gl::UNSIGNED_BYTE,
    UnsignedShort = gl::UNSIGNED_SHORT,
    UnsignedInt   = gl::UNSIGNED_INT,
}

/// This trait is used to mark types which are OpenGL primitives and thus can be stored in a
/// [`Buffer`]. You should not implement this trait yourself.
///
/// This trait is implemented for all the basic OpenGL primitives: `GLfloat`, `GLint`, `GLshort`,
/// `GLbyte`, `GLuint`, `GLushort` and `GLubyte`, which correspond to the rust primitives `f32`,
/// `i32`, `i16`, `i8`, `u32`, `u16` and `u8`.
///
/// [`Buffer`]: struct.Buffer.html
pub trait GlPrimitive: bytemuck::Pod {
    fn gl_name() -> &'static str;
}

impl GlPrimitive for GLfloat {
    fn gl_name() -> &'static str   { "GLfloat" }
}
impl GlPrimitive for GLint {
    fn gl_name() -> &'static str   { "GLint" }
}
impl GlPrimitive for GLshort {
    fn gl_name() -> &'static str   { "GLshort" }
}
impl GlPrimitive for GLbyte {
    fn gl_name() -> &'static str   { "GLbyte" }
}
impl GlPrimitive for GLuint {
    fn gl_name() -> &'static str   { "GLuint" }
}
impl GlPrimitive for GLushort {
    fn gl_name() -> &'static str   { "GLushort" }
}
impl GlPrimitive for GLubyte {
    fn gl_name() -> &'static str   { "GLubyte" }
}

/// This trait is used to mark types which can be used as indices in a index buffer.
/// You should not implement this trait yourself.
///
/// This trait is implemented for `GLuint`, `GLushort` and `GLubyte`, which correspond to `u32`,
/// `u16` and `u8`.
pub trait GlIndex: GlPrimitive {
    fn index_type() -> IndexType;
}

impl GlIndex for GLuint {
    fn index_type() -> IndexType { IndexType::UnsignedInt }
}
impl GlIndex for GLushort {
    fn index_type() -> IndexType { IndexType::UnsignedShort }
}
impl GlIndex for GLubyte {
    fn index_type() -> IndexType { IndexType::UnsignedByte }
}
