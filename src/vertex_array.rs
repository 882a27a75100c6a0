use std::mem::size_of;

use gl::types::*;
use log::{debug, warn};

use crate::buffer::{BufferTarget, IndexBuffer, VertexBuffer};
use crate::shader::Program;
use crate::Context;

/// A named vertex attribute with `components` consecutive `f32` values per vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub components: usize,
}

/// Where an attribute is read from in the vertex buffer, in bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub offset: usize,
    pub stride: usize,
}

/// A OpenGL vertex array object, owning the vertex and index buffer it reads from.
///
/// Attributes are declared in the order they are interleaved in the vertex buffer. Once all
/// buffers and attributes are declared, [`finish`](#method.finish) looks up the attribute
/// locations in a program and sets up the attribute pointers.
///
/// # Example
/// ```rust,ignore
/// let vertex_array = VertexArray::new(&ctx)
///     .with_vertex_buffer(VertexBuffer::with_data(&ctx, &vertices, None, None))
///     .with_attribute("position", 3)
///     .with_attribute("uv", 2)
///     .finish(&mut program);
/// ```
pub struct VertexArray {
    ctx: Context,
    array: GLuint,

    vertex_buffer: Option<VertexBuffer>,
    index_buffer: Option<IndexBuffer>,
    attributes: Vec<Attribute>,
}

impl VertexArray {
    pub fn new(ctx: &Context) -> VertexArray {
        let array = ctx.gen_vertex_array();
        debug!("Created vertex array {}", array);

        VertexArray {
            ctx: ctx.clone(),
            array,
            vertex_buffer: None,
            index_buffer: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_vertex_buffer(mut self, buffer: VertexBuffer) -> VertexArray {
        self.vertex_buffer = Some(buffer);
        self
    }

    pub fn with_index_buffer(mut self, buffer: IndexBuffer) -> VertexArray {
        self.index_buffer = Some(buffer);
        self
    }

    /// Declares the next attribute in the vertex buffer.
    pub fn with_attribute<S: Into<String>>(mut self, name: S, components: usize) -> VertexArray {
        self.attributes.push(Attribute { name: name.into(), components });
        self
    }

    /// Binds the declared attributes to their locations in the given program. Attributes which
    /// are not active in the program are skipped. If no vertex buffer is set a warning is
    /// logged and no attributes are enabled.
    pub fn finish(self, program: &mut Program) -> VertexArray {
        let driver = &*self.ctx;
        driver.bind_vertex_array(self.array);

        if let Some(ref vertex_buffer) = self.vertex_buffer {
            vertex_buffer.bind();

            let layouts = self.layout();
            for (attribute, layout) in self.attributes.iter().zip(layouts) {
                let location = program.attrib_location(&attribute.name);
                if location < 0 {
                    warn!("Attribute \"{}\" is not used by program {}, skipping it", attribute.name, program.handle());
                    continue;
                }

                driver.enable_vertex_attrib_array(location as GLuint);
                driver.vertex_attrib_pointer(
                    location as GLuint,
                    attribute.components as GLint,
                    layout.stride as GLsizei,
                    layout.offset,
                );
            }
        } else {
            warn!("Vertex array {} has no vertex buffer, no attributes enabled", self.array);
        }

        if let Some(ref index_buffer) = self.index_buffer {
            index_buffer.bind();
        }

        driver.bind_buffer(BufferTarget::Array, 0);
        driver.bind_vertex_array(0);

        self
    }

    /// Computes where each declared attribute lives in the vertex buffer. Attributes are packed
    /// back to back in declaration order. The stride is the vertex buffers stride, or the size
    /// of all attributes together if that is `0`.
    pub fn layout(&self) -> Vec<AttributeLayout> {
        let float_size = size_of::<GLfloat>();
        let total: usize = self.attributes.iter().map(|a| a.components * float_size).sum();

        let stride = match self.vertex_buffer {
            Some(ref buffer) if buffer.stride() != 0 => buffer.stride(),
            _ => total,
        };

        let mut offset = 0;
        self.attributes.iter().map(|attribute| {
            let layout = AttributeLayout { offset, stride };
            offset += attribute.components * float_size;
            layout
        }).collect()
    }

    /// Binds this vertex array, replacing the previously bound one.
    pub fn bind(&self) -> &Self {
        self.ctx.bind_vertex_array(self.array);
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn vertex_buffer(&self) -> Option<&VertexBuffer> {
        self.vertex_buffer.as_ref()
    }

    pub fn index_buffer(&self) -> Option<&IndexBuffer> {
        self.index_buffer.as_ref()
    }

    /// The raw OpenGL handle of this vertex array
    pub fn handle(&self) -> GLuint {
        self.array
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.ctx.delete_vertex_array(self.array);
    }
}
