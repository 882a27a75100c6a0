//! A `Driver` which records every call instead of talking to a GPU.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gl::types::*;

use igloo::texture::{InternalFormat, PixelFormat, PixelType};
use igloo::{BufferTarget, BufferUsage, Context, Driver, IndexType, PrimitiveMode, ShaderStage, VectorWidth};

/// The value every byte of a read back texture is set to.
pub const READ_BACK_FILL: u8 = 0xab;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, GLuint),
    ShaderSource(GLuint, String),
    CompileShader(GLuint),
    DeleteShader(GLuint),

    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    UniformLocation(GLuint, String),
    AttribLocation(GLuint, String),

    Uniform1i(GLint, GLint),
    Uniform1ui(GLint, GLuint),
    Uniform1f(GLint, GLfloat),
    UniformIv(GLint, VectorWidth, GLsizei, Vec<GLint>),
    UniformUiv(GLint, VectorWidth, GLsizei, Vec<GLuint>),
    UniformFv(GLint, VectorWidth, GLsizei, Vec<GLfloat>),

    GenBuffer(GLuint),
    BindBuffer(BufferTarget, GLuint),
    BufferData(BufferTarget, Vec<u8>, BufferUsage),
    DeleteBuffer(GLuint),

    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    EnableVertexAttribArray(GLuint),
    VertexAttribPointer { index: GLuint, components: GLint, stride: GLsizei, offset: usize },
    DeleteVertexArray(GLuint),

    GenTexture(GLuint),
    ActiveTexture(u32),
    BindTexture(GLuint),
    TexParameter(GLenum, GLint),
    TexImage2D { width: GLsizei, height: GLsizei, data_len: Option<usize> },
    GetTexImage(usize),
    DeleteTexture(GLuint),
    PixelStore(GLenum, GLint),

    GenFramebuffer(GLuint),
    BindFramebuffer(GLuint),
    FramebufferTexture2D(GLenum, GLuint),
    DrawBuffers(Vec<GLenum>),
    CheckFramebufferStatus,
    DeleteFramebuffer(GLuint),

    GenRenderbuffer(GLuint),
    BindRenderbuffer(GLuint),
    RenderbufferStorage(GLenum, GLsizei, GLsizei),
    FramebufferRenderbuffer(GLenum, GLuint),
    DeleteRenderbuffer(GLuint),

    DrawArrays(PrimitiveMode, GLint, GLsizei),
    DrawElements(PrimitiveMode, GLsizei, IndexType, usize),

    Viewport(GLint, GLint, GLsizei, GLsizei),
    ClearColor([f32; 4]),
    Clear(GLbitfield),
    GetInteger(GLenum),
}

pub struct RecordingDriver {
    calls: RefCell<Vec<Call>>,
    next_handle: Cell<GLuint>,

    // Shared between uniforms and attributes, unknown names resolve to -1
    locations: RefCell<HashMap<String, GLint>>,
    shader_stages: RefCell<HashMap<GLuint, ShaderStage>>,

    fail_compile: Cell<Option<ShaderStage>>,
    fail_link: Cell<bool>,
    framebuffer_status: Cell<GLenum>,
    errors: RefCell<Vec<GLenum>>,
    // Pixel store parameters, anything unset reads as the driver default of 4
    pixel_store: RefCell<HashMap<GLenum, GLint>>,
}

impl RecordingDriver {
    pub fn new() -> Rc<RecordingDriver> {
        Rc::new(RecordingDriver {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            locations: RefCell::new(HashMap::new()),
            shader_stages: RefCell::new(HashMap::new()),
            fail_compile: Cell::new(None),
            fail_link: Cell::new(false),
            framebuffer_status: Cell::new(gl::FRAMEBUFFER_COMPLETE),
            errors: RefCell::new(Vec::new()),
            pixel_store: RefCell::new(HashMap::new()),
        })
    }

    pub fn set_location(&self, name: &str, location: GLint) {
        self.locations.borrow_mut().insert(name.to_owned(), location);
    }

    pub fn fail_compile(&self, stage: ShaderStage) {
        self.fail_compile.set(Some(stage));
    }

    pub fn fail_link(&self) {
        self.fail_link.set(true);
    }

    pub fn set_framebuffer_status(&self, status: GLenum) {
        self.framebuffer_status.set(status);
    }

    /// Errors returned by `get_error`, first one first.
    pub fn push_error(&self, error: GLenum) {
        self.errors.borrow_mut().insert(0, error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, predicate: F) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn handle(&self) -> GLuint {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        handle
    }

    fn location(&self, name: &str) -> GLint {
        self.locations.borrow().get(name).cloned().unwrap_or(-1)
    }
}

/// Creates a recording driver together with a context issuing calls into it.
pub fn context() -> (Rc<RecordingDriver>, Context) {
    let driver = RecordingDriver::new();
    let ctx: Context = driver.clone();
    (driver, ctx)
}

pub fn is_draw(call: &Call) -> bool {
    match *call {
        Call::DrawArrays(..) | Call::DrawElements(..) => true,
        _ => false,
    }
}

pub fn is_uniform_upload(call: &Call) -> bool {
    match *call {
        Call::Uniform1i(..) | Call::Uniform1ui(..) | Call::Uniform1f(..) |
        Call::UniformIv(..) | Call::UniformUiv(..) | Call::UniformFv(..) => true,
        _ => false,
    }
}

pub const PASSTHROUGH_VERTEX: &str = "#version 150 core\nin vec3 position;\nvoid main() { gl_Position = vec4(position, 1.0); }\n";
pub const PASSTHROUGH_FRAGMENT: &str = "#version 150 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n";

impl Driver for RecordingDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        let shader = self.handle();
        self.shader_stages.borrow_mut().insert(shader, stage);
        self.record(Call::CreateShader(stage, shader));
        shader
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.record(Call::ShaderSource(shader, source.to_owned()));
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record(Call::CompileShader(shader));
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let stage = self.shader_stages.borrow().get(&shader).cloned();
        stage != self.fail_compile.get() || stage.is_none()
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        format!("0:1(1): error: shader {} is broken", shader)
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let program = self.handle();
        self.record(Call::CreateProgram(program));
        program
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
    }

    fn link_status(&self, _program: GLuint) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        String::from("error: linking failed")
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        self.record(Call::UniformLocation(program, name.to_owned()));
        self.location(name)
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        self.record(Call::AttribLocation(program, name.to_owned()));
        self.location(name)
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        self.record(Call::Uniform1i(location, value));
    }

    fn uniform_1ui(&self, location: GLint, value: GLuint) {
        self.record(Call::Uniform1ui(location, value));
    }

    fn uniform_1f(&self, location: GLint, value: GLfloat) {
        self.record(Call::Uniform1f(location, value));
    }

    fn uniform_iv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLint]) {
        self.record(Call::UniformIv(location, width, count, values.to_vec()));
    }

    fn uniform_uiv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLuint]) {
        self.record(Call::UniformUiv(location, width, count, values.to_vec()));
    }

    fn uniform_fv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLfloat]) {
        self.record(Call::UniformFv(location, width, count, values.to_vec()));
    }

    fn gen_buffer(&self) -> GLuint {
        let buffer = self.handle();
        self.record(Call::GenBuffer(buffer));
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.record(Call::BufferData(target, data.to_vec(), usage));
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let array = self.handle();
        self.record(Call::GenVertexArray(array));
        array
    }

    fn bind_vertex_array(&self, array: GLuint) {
        self.record(Call::BindVertexArray(array));
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer(&self, index: GLuint, components: GLint, stride: GLsizei, offset: usize) {
        self.record(Call::VertexAttribPointer { index, components, stride, offset });
    }

    fn delete_vertex_array(&self, array: GLuint) {
        self.record(Call::DeleteVertexArray(array));
    }

    fn gen_texture(&self) -> GLuint {
        let texture = self.handle();
        self.record(Call::GenTexture(texture));
        texture
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: GLuint) {
        self.record(Call::BindTexture(texture));
    }

    fn tex_parameter(&self, parameter: GLenum, value: GLint) {
        self.record(Call::TexParameter(parameter, value));
    }

    fn tex_image_2d(
        &self,
        _internal_format: InternalFormat,
        width: GLsizei, height: GLsizei,
        _format: PixelFormat, _pixel_type: PixelType,
        data: Option<&[u8]>,
    ) {
        self.record(Call::TexImage2D { width, height, data_len: data.map(|data| data.len()) });
    }

    fn get_tex_image(&self, _format: PixelFormat, _pixel_type: PixelType, out: &mut [u8]) {
        for byte in out.iter_mut() {
            *byte = READ_BACK_FILL;
        }
        self.record(Call::GetTexImage(out.len()));
    }

    fn delete_texture(&self, texture: GLuint) {
        self.record(Call::DeleteTexture(texture));
    }

    fn pixel_store(&self, parameter: GLenum, value: GLint) {
        self.pixel_store.borrow_mut().insert(parameter, value);
        self.record(Call::PixelStore(parameter, value));
    }

    fn gen_framebuffer(&self) -> GLuint {
        let framebuffer = self.handle();
        self.record(Call::GenFramebuffer(framebuffer));
        framebuffer
    }

    fn bind_framebuffer(&self, framebuffer: GLuint) {
        self.record(Call::BindFramebuffer(framebuffer));
    }

    fn framebuffer_texture_2d(&self, attachment: GLenum, texture: GLuint) {
        self.record(Call::FramebufferTexture2D(attachment, texture));
    }

    fn draw_buffers(&self, buffers: &[GLenum]) {
        self.record(Call::DrawBuffers(buffers.to_vec()));
    }

    fn check_framebuffer_status(&self) -> GLenum {
        self.record(Call::CheckFramebufferStatus);
        self.framebuffer_status.get()
    }

    fn delete_framebuffer(&self, framebuffer: GLuint) {
        self.record(Call::DeleteFramebuffer(framebuffer));
    }

    fn gen_renderbuffer(&self) -> GLuint {
        let renderbuffer = self.handle();
        self.record(Call::GenRenderbuffer(renderbuffer));
        renderbuffer
    }

    fn bind_renderbuffer(&self, renderbuffer: GLuint) {
        self.record(Call::BindRenderbuffer(renderbuffer));
    }

    fn renderbuffer_storage(&self, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        self.record(Call::RenderbufferStorage(internal_format, width, height));
    }

    fn framebuffer_renderbuffer(&self, attachment: GLenum, renderbuffer: GLuint) {
        self.record(Call::FramebufferRenderbuffer(attachment, renderbuffer));
    }

    fn delete_renderbuffer(&self, renderbuffer: GLuint) {
        self.record(Call::DeleteRenderbuffer(renderbuffer));
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: GLint, count: GLsizei) {
        self.record(Call::DrawArrays(mode, first, count));
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: GLsizei, index_type: IndexType, offset: usize) {
        self.record(Call::DrawElements(mode, count, index_type, offset));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear(&self, mask: GLbitfield) {
        self.record(Call::Clear(mask));
    }

    fn get_error(&self) -> GLenum {
        self.errors.borrow_mut().pop().unwrap_or(gl::NO_ERROR)
    }

    fn get_integer(&self, parameter: GLenum) -> GLint {
        self.record(Call::GetInteger(parameter));
        self.pixel_store.borrow().get(&parameter).cloned().unwrap_or(4)
    }
}
