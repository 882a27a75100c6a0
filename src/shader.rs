//! Shader programs, their uniforms, and loading shader sources by name.

mod library;
mod uniform;

pub use self::library::*;
pub use self::uniform::*;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use gl;
use gl::types::*;
use log::{debug, error, warn};

use crate::buffer::PrimitiveMode;
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::vertex_array::VertexArray;
use crate::Context;

#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex   = gl::VERTEX_SHADER,
    Fragment = gl::FRAGMENT_SHADER,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Compiles a single shader stage. On failure the shader object is deleted and the compiler
/// log is returned.
pub fn compile(driver: &dyn Driver, source: &str, stage: ShaderStage) -> Result<GLuint> {
    let shader = driver.create_shader(stage);
    if shader == 0 {
        return Err(Error::ShaderCompile {
            stage,
            log: String::from("Could not create shader object"),
        });
    }

    driver.shader_source(shader, source);
    driver.compile_shader(shader);

    if driver.compile_status(shader) {
        Ok(shader)
    } else {
        let log = driver.shader_info_log(shader);
        driver.delete_shader(shader);
        Err(Error::ShaderCompile { stage, log })
    }
}

/// A linked vertex + fragment shader program, together with the uniforms and vertex array it
/// draws with.
///
/// # Example
/// ```rust,ignore
/// let mut program = Program::load(&ctx, &ShaderLibrary::from_env(), "quad_vertex", "quad_fragment")?;
///
/// let vertex_array = VertexArray::new(&ctx)
///     .with_vertex_buffer(VertexBuffer::with_data(&ctx, &QUAD_VERTICES, None, None))
///     .with_index_buffer(IndexBuffer::with_data(&ctx, &QUAD_INDICES, None))
///     .with_attribute("position", 3)
///     .finish(&mut program);
///
/// program.attach_vertex_array(Rc::new(vertex_array));
/// program.add_uniform(Uniform::float("tint", vec![1.0, 0.0, 0.0, 1.0], 4));
/// program.draw_elements(PrimitiveMode::Triangles, 6);
/// ```
pub struct Program {
    ctx: Context,

    program: GLuint,
    vertex_shader: GLuint,
    fragment_shader: GLuint,

    // Filled lazily, a name is only ever queried once
    attrib_locations: HashMap<String, GLint>,
    uniform_locations: HashMap<String, GLint>,

    uniforms: Vec<Uniform>,
    vertex_array: Option<Rc<VertexArray>>,
}

impl Program {
    /// Compiles and links a program from vertex and fragment shader sources.
    pub fn new(ctx: &Context, vertex_source: &str, fragment_source: &str) -> Result<Program> {
        let driver: &dyn Driver = &**ctx;

        let vertex_shader = compile(driver, vertex_source, ShaderStage::Vertex)?;
        let fragment_shader = match compile(driver, fragment_source, ShaderStage::Fragment) {
            Ok(shader) => shader,
            Err(err) => {
                driver.delete_shader(vertex_shader);
                return Err(err);
            },
        };

        let program = driver.create_program();
        driver.attach_shader(program, vertex_shader);
        driver.attach_shader(program, fragment_shader);
        driver.link_program(program);

        if !driver.link_status(program) {
            let log = driver.program_info_log(program);

            driver.delete_program(program);
            driver.delete_shader(vertex_shader);
            driver.delete_shader(fragment_shader);

            return Err(Error::ProgramLink(log));
        }

        debug!("Linked program {}", program);

        Ok(Program {
            ctx: ctx.clone(),
            program,
            vertex_shader,
            fragment_shader,
            attrib_locations: HashMap::new(),
            uniform_locations: HashMap::new(),
            uniforms: Vec::new(),
            vertex_array: None,
        })
    }

    /// Fetches the named vertex and fragment shaders from the library, then compiles and
    /// links them.
    pub fn load(
        ctx: &Context,
        library: &ShaderLibrary,
        vertex_name: &str,
        fragment_name: &str,
    ) -> Result<Program> {
        let vertex_source = library.fetch(vertex_name)?;
        let fragment_source = library.fetch(fragment_name)?;
        Program::new(ctx, &vertex_source, &fragment_source)
    }

    /// Binds this program, replacing the previously used program.
    pub fn bind(&self) -> &Self {
        self.ctx.use_program(self.program);
        self
    }

    /// The raw OpenGL handle of this program
    pub fn handle(&self) -> GLuint {
        self.program
    }

    /// The location of the named uniform, or `-1` if the program has no such active uniform.
    /// The driver is only queried the first time a name is looked up.
    pub fn uniform_location(&mut self, name: &str) -> GLint {
        let program = self.program;
        let driver = &*self.ctx;
        resolve(&mut self.uniform_locations, name, "uniform", || driver.uniform_location(program, name))
    }

    /// The location of the named vertex attribute, or `-1` if the program has no such active
    /// attribute. The driver is only queried the first time a name is looked up.
    pub fn attrib_location(&mut self, name: &str) -> GLint {
        let program = self.program;
        let driver = &*self.ctx;
        resolve(&mut self.attrib_locations, name, "attribute", || driver.attrib_location(program, name))
    }

    /// Adds a uniform which is pushed before every draw call. Uniforms are pushed in the order
    /// they were added, so if two uniforms share a slot the last one added wins.
    pub fn add_uniform(&mut self, uniform: Uniform) -> &mut Self {
        self.uniforms.push(uniform);
        self
    }

    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    /// The uniform which was added last for the given slot, i.e. the one whose value ends up in
    /// the program.
    pub fn uniform_mut(&mut self, slot: &str) -> Option<&mut Uniform> {
        self.uniforms.iter_mut().rev().find(|uniform| uniform.slot() == slot)
    }

    /// Sets the vertex array used by subsequent draw calls, returning the previous one.
    pub fn attach_vertex_array(&mut self, vertex_array: Rc<VertexArray>) -> Option<Rc<VertexArray>> {
        self.vertex_array.replace(vertex_array)
    }

    pub fn vertex_array(&self) -> Option<&Rc<VertexArray>> {
        self.vertex_array.as_ref()
    }

    /// Draws `count` vertices from the start of the attached vertex array.
    ///
    /// # Panics
    /// If no vertex array is attached.
    pub fn draw_arrays(&mut self, mode: PrimitiveMode, count: usize) {
        self.draw(|driver, _| {
            driver.draw_arrays(mode, 0, count as GLsizei);
        });
    }

    /// Draws `count` indices from the start of the attached vertex arrays index buffer. If the
    /// vertex array has no index buffer an error is logged and nothing is drawn.
    ///
    /// # Panics
    /// If no vertex array is attached.
    pub fn draw_elements(&mut self, mode: PrimitiveMode, count: usize) {
        self.draw(|driver, vertex_array| {
            match vertex_array.index_buffer() {
                Some(indices) => {
                    driver.draw_elements(mode, count as GLsizei, indices.index_type(), 0);
                },
                None => {
                    error!("draw_elements called with a vertex array without an index buffer");
                },
            }
        });
    }

    fn draw<F>(&mut self, draw_function: F) where F: FnOnce(&dyn Driver, &VertexArray) {
        let vertex_array = match self.vertex_array {
            Some(ref vertex_array) => vertex_array.clone(),
            None => panic!("Tried to draw with program {}, but no vertex array attached", self.program),
        };

        let driver = &*self.ctx;
        driver.use_program(self.program);
        vertex_array.bind();

        let program = self.program;
        for uniform in self.uniforms.iter() {
            let slot = uniform.slot();
            let location = resolve(&mut self.uniform_locations, slot, "uniform", || {
                driver.uniform_location(program, slot)
            });
            uniform.push(driver, location);
        }

        draw_function(driver, &vertex_array);
        driver.bind_vertex_array(0);
    }
}

fn resolve<F>(cache: &mut HashMap<String, GLint>, name: &str, kind: &str, query: F) -> GLint
    where F: FnOnce() -> GLint,
{
    if let Some(&location) = cache.get(name) {
        return location;
    }

    let location = query();
    if location < 0 {
        warn!("No active {} named \"{}\"", kind, name);
    }
    cache.insert(name.to_owned(), location);
    location
}

impl Drop for Program {
    fn drop(&mut self) {
        self.ctx.delete_program(self.program);
        self.ctx.delete_shader(self.vertex_shader);
        self.ctx.delete_shader(self.fragment_shader);
    }
}
