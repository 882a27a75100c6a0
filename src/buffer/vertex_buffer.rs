use std::ops::{Deref, DerefMut};

use gl::types::*;

use super::*;
use crate::Context;

/// A buffer of interleaved `f32` vertex data, bound to `GL_ARRAY_BUFFER`.
///
/// The stride is the distance in bytes between consecutive vertices. A stride of `0` lets
/// [`VertexArray::finish`](../vertex_array/struct.VertexArray.html#method.finish) derive it from
/// the declared attributes.
///
/// This struct dereferences to [`Buffer`](struct.Buffer.html).
pub struct VertexBuffer {
    buffer: Buffer<GLfloat>,
    stride: usize,
}

impl VertexBuffer {
    pub fn new(ctx: &Context) -> VertexBuffer {
        VertexBuffer {
            buffer: Buffer::new(ctx, BufferTarget::Array),
            stride: 0,
        }
    }

    /// Creates a new vertex buffer, storing the given vertices on the GPU.
    pub fn with_data(
        ctx: &Context,
        data: &[GLfloat],
        usage: Option<BufferUsage>,
        stride: Option<usize>,
    ) -> VertexBuffer {
        let mut buffer = VertexBuffer::new(ctx);
        if let Some(stride) = stride {
            buffer.stride = stride;
        }
        buffer.update(data, usage);
        buffer
    }

    /// Stride in bytes. `0` means tightly packed.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn set_stride(&mut self, stride: usize) {
        self.stride = stride;
    }
}

impl Deref for VertexBuffer {
    type Target = Buffer<GLfloat>;
    fn deref(&self) -> &Buffer<GLfloat> { &self.buffer }
}

impl DerefMut for VertexBuffer {
    fn deref_mut(&mut self) -> &mut Buffer<GLfloat> { &mut self.buffer }
}

/// A buffer of indices, bound to `GL_ELEMENT_ARRAY_BUFFER`. The indices can be `u8`, `u16` or
/// `u32` (see [`GlIndex`](trait.GlIndex.html)); the type of the last upload is remembered so
/// indexed draw calls know how to read the buffer.
pub struct IndexBuffer {
    buffer: Buffer<GLubyte>,
    index_type: IndexType,
    count: usize,
}

impl IndexBuffer {
    /// Allocates a new index buffer without uploading any data. Until data is uploaded the
    /// buffer is treated as holding zero `u8` indices.
    pub fn new(ctx: &Context) -> IndexBuffer {
        IndexBuffer {
            buffer: Buffer::new(ctx, BufferTarget::ElementArray),
            index_type: IndexType::UnsignedByte,
            count: 0,
        }
    }

    pub fn with_data<E: GlIndex>(ctx: &Context, indices: &[E], usage: Option<BufferUsage>) -> IndexBuffer {
        let mut buffer = IndexBuffer::new(ctx);
        buffer.update(indices, usage);
        buffer
    }

    /// Replaces all indices in this buffer. If no usage is given `BufferUsage::StaticDraw` is
    /// used.
    pub fn update<E: GlIndex>(&mut self, indices: &[E], usage: Option<BufferUsage>) -> &mut Self {
        self.buffer.update(bytemuck::cast_slice(indices), usage);
        self.index_type = E::index_type();
        self.count = indices.len();
        self
    }

    pub fn bind(&self) -> &Self {
        self.buffer.bind();
        self
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// The number of indices stored, as opposed to the number of bytes.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn handle(&self) -> GLuint {
        self.buffer.handle()
    }
}
