//! Utilities for storing data in GPU buffers.

mod primitives;
mod vertex_buffer;

pub use self::primitives::*;
pub use self::vertex_buffer::*;

use std::marker::PhantomData;

use gl::types::*;
use log::debug;

use crate::Context;

/// A GPU buffer holding a list of `T`. The data is copied to the driver on upload, no copy is
/// kept on the CPU side.
pub struct Buffer<T: GlPrimitive> {
    ctx: Context,
    buffer: GLuint,
    target: BufferTarget,
    len: usize,
    phantom: PhantomData<T>,
}

impl<T: GlPrimitive> Buffer<T> {
    /// Allocates a new buffer handle without uploading any data.
    pub fn new(ctx: &Context, target: BufferTarget) -> Buffer<T> {
        let buffer = ctx.gen_buffer();
        debug!("Created {:?} buffer {} of {}", target, buffer, T::gl_name());

        Buffer {
            ctx: ctx.clone(),
            buffer,
            target,
            len: 0,
            phantom: PhantomData,
        }
    }

    /// Allocates a new buffer and stores the given data in it. If no usage is given
    /// `BufferUsage::StaticDraw` is used.
    pub fn with_data(ctx: &Context, target: BufferTarget, data: &[T], usage: Option<BufferUsage>) -> Buffer<T> {
        let mut buffer = Buffer::new(ctx, target);
        buffer.update(data, usage);
        buffer
    }

    /// Replaces the entire contents of this buffer with the given data. If no usage is given
    /// `BufferUsage::StaticDraw` is used. Note that this leaves the buffer bound.
    pub fn update(&mut self, data: &[T], usage: Option<BufferUsage>) -> &mut Self {
        let usage = usage.unwrap_or_default();

        self.bind();
        self.ctx.buffer_data(self.target, bytemuck::cast_slice(data), usage);
        self.len = data.len();

        self
    }

    /// Binds this buffer to the target specified in the constructor. This replaces whatever
    /// buffer was previously bound to that target.
    pub fn bind(&self) -> &Self {
        self.ctx.bind_buffer(self.target, self.buffer);
        self
    }

    /// The number of primitives stored by the last upload. Note that this is *different* from
    /// the number of bytes stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// The raw OpenGL handle of this buffer
    pub fn handle(&self) -> GLuint {
        self.buffer
    }
}

impl<T: GlPrimitive> Drop for Buffer<T> {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.buffer);
    }
}
