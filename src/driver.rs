//! The boundary between the wrappers and the OpenGL function pointers.
//!
//! Every wrapper holds a [`Context`](../type.Context.html) and issues all of its calls through
//! it. [`GlDriver`] forwards to the `gl` crate, which requires a context to be current on the
//! calling thread (see [`Igloo`](../context/struct.Igloo.html)).

use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr;

use gl;
use gl::types::*;

use crate::buffer::{BufferTarget, BufferUsage, IndexType, PrimitiveMode};
use crate::shader::{ShaderStage, VectorWidth};
use crate::texture::{InternalFormat, PixelFormat, PixelType};

/// One method per driver call issued by this crate. Handles are plain integers, `0` meaning
/// "no object" as in OpenGL.
pub trait Driver {
    // Shaders and programs
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn attrib_location(&self, program: GLuint, name: &str) -> GLint;

    // Uniform uploads. `count` is the number of vectors, not the number of elements.
    fn uniform_1i(&self, location: GLint, value: GLint);
    fn uniform_1ui(&self, location: GLint, value: GLuint);
    fn uniform_1f(&self, location: GLint, value: GLfloat);
    fn uniform_iv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLint]);
    fn uniform_uiv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLuint]);
    fn uniform_fv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLfloat]);

    // Buffers
    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint);
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: GLuint);

    // Vertex arrays
    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, array: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    /// Always a non-normalized `GL_FLOAT` attribute. `offset` is in bytes.
    fn vertex_attrib_pointer(&self, index: GLuint, components: GLint, stride: GLsizei, offset: usize);
    fn delete_vertex_array(&self, array: GLuint);

    // Textures. All texture calls use the `GL_TEXTURE_2D` target.
    fn gen_texture(&self) -> GLuint;
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, texture: GLuint);
    fn tex_parameter(&self, parameter: GLenum, value: GLint);
    fn tex_image_2d(
        &self,
        internal_format: InternalFormat,
        width: GLsizei, height: GLsizei,
        format: PixelFormat, pixel_type: PixelType,
        data: Option<&[u8]>,
    );
    fn get_tex_image(&self, format: PixelFormat, pixel_type: PixelType, out: &mut [u8]);
    fn delete_texture(&self, texture: GLuint);

    /// `glPixelStorei`, e.g. `GL_UNPACK_ALIGNMENT`.
    fn pixel_store(&self, parameter: GLenum, value: GLint);

    // Framebuffers and renderbuffers. All framebuffer calls use the `GL_FRAMEBUFFER` target.
    fn gen_framebuffer(&self) -> GLuint;
    fn bind_framebuffer(&self, framebuffer: GLuint);
    fn framebuffer_texture_2d(&self, attachment: GLenum, texture: GLuint);
    fn draw_buffers(&self, buffers: &[GLenum]);
    fn check_framebuffer_status(&self) -> GLenum;
    fn delete_framebuffer(&self, framebuffer: GLuint);

    fn gen_renderbuffer(&self) -> GLuint;
    fn bind_renderbuffer(&self, renderbuffer: GLuint);
    fn renderbuffer_storage(&self, internal_format: GLenum, width: GLsizei, height: GLsizei);
    fn framebuffer_renderbuffer(&self, attachment: GLenum, renderbuffer: GLuint);
    fn delete_renderbuffer(&self, renderbuffer: GLuint);

    // Drawing
    fn draw_arrays(&self, mode: PrimitiveMode, first: GLint, count: GLsizei);
    /// `offset` is a byte offset into the bound element array buffer.
    fn draw_elements(&self, mode: PrimitiveMode, count: GLsizei, index_type: IndexType, offset: usize);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);

    fn get_error(&self) -> GLenum;
    fn get_integer(&self, parameter: GLenum) -> GLint;
}

/// Forwards every call to the global `gl` function pointers.
///
/// This type is neither `Send` nor `Sync`, as the function pointers are only valid on the
/// thread where the context is current.
#[derive(Debug)]
pub struct GlDriver {
    _not_send: PhantomData<*const ()>,
}

impl GlDriver {
    /// Loads the OpenGL function pointers through `loader`.
    ///
    /// # Safety
    /// A OpenGL context must be current on this thread, and `loader` must return valid
    /// function pointers for that context (or null for missing functions).
    pub unsafe fn load_with<F>(loader: F) -> GlDriver
        where F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        GlDriver { _not_send: PhantomData }
    }
}

fn c_string(value: &str) -> CString {
    // Interior nul bytes can not reach the driver, so we cut the string at the first one
    let bytes = match value.find('\0') {
        Some(end) => &value.as_bytes()[..end],
        None => value.as_bytes(),
    };
    CString::new(bytes).unwrap_or_default()
}

fn read_info_log(len: GLint, fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }

    let mut buffer = vec![0u8; len as usize];
    let mut written = 0;
    fetch(len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl Driver for GlDriver {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage as GLenum) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut log_len = 0;
        unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len) };
        read_info_log(log_len, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buffer)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut log_len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len) };
        read_info_log(log_len, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, len, written, buffer)
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let name = c_string(name);
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn attrib_location(&self, program: GLuint, name: &str) -> GLint {
        let name = c_string(name);
        unsafe { gl::GetAttribLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1ui(&self, location: GLint, value: GLuint) {
        unsafe { gl::Uniform1ui(location, value) }
    }

    fn uniform_1f(&self, location: GLint, value: GLfloat) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_iv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLint]) {
        debug_assert!(count as usize * width.components() <= values.len());
        unsafe { match width {
            VectorWidth::One   => gl::Uniform1iv(location, count, values.as_ptr()),
            VectorWidth::Two   => gl::Uniform2iv(location, count, values.as_ptr()),
            VectorWidth::Three => gl::Uniform3iv(location, count, values.as_ptr()),
            VectorWidth::Four  => gl::Uniform4iv(location, count, values.as_ptr()),
        } }
    }

    fn uniform_uiv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLuint]) {
        debug_assert!(count as usize * width.components() <= values.len());
        unsafe { match width {
            VectorWidth::One   => gl::Uniform1uiv(location, count, values.as_ptr()),
            VectorWidth::Two   => gl::Uniform2uiv(location, count, values.as_ptr()),
            VectorWidth::Three => gl::Uniform3uiv(location, count, values.as_ptr()),
            VectorWidth::Four  => gl::Uniform4uiv(location, count, values.as_ptr()),
        } }
    }

    fn uniform_fv(&self, location: GLint, width: VectorWidth, count: GLsizei, values: &[GLfloat]) {
        debug_assert!(count as usize * width.components() <= values.len());
        unsafe { match width {
            VectorWidth::One   => gl::Uniform1fv(location, count, values.as_ptr()),
            VectorWidth::Two   => gl::Uniform2fv(location, count, values.as_ptr()),
            VectorWidth::Three => gl::Uniform3fv(location, count, values.as_ptr()),
            VectorWidth::Four  => gl::Uniform4fv(location, count, values.as_ptr()),
        } }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer) };
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        unsafe { gl::BindBuffer(target as GLenum, buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            gl::BufferData(
                target as GLenum,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const GLvoid,
                usage as GLenum,
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut array = 0;
        unsafe { gl::GenVertexArrays(1, &mut array) };
        array
    }

    fn bind_vertex_array(&self, array: GLuint) {
        unsafe { gl::BindVertexArray(array) }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn vertex_attrib_pointer(&self, index: GLuint, components: GLint, stride: GLsizei, offset: usize) {
        unsafe {
            gl::VertexAttribPointer(
                index, components,
                gl::FLOAT, gl::FALSE,
                stride, offset as *const GLvoid,
            );
        }
    }

    fn delete_vertex_array(&self, array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &array) }
    }

    fn gen_texture(&self) -> GLuint {
        let mut texture = 0;
        unsafe { gl::GenTextures(1, &mut texture) };
        texture
    }

    fn active_texture(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit as GLenum) }
    }

    fn bind_texture(&self, texture: GLuint) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture) }
    }

    fn tex_parameter(&self, parameter: GLenum, value: GLint) {
        unsafe { gl::TexParameteri(gl::TEXTURE_2D, parameter, value) }
    }

    fn tex_image_2d(
        &self,
        internal_format: InternalFormat,
        width: GLsizei, height: GLsizei,
        format: PixelFormat, pixel_type: PixelType,
        data: Option<&[u8]>,
    ) {
        let data = data.map_or(ptr::null(), |data| data.as_ptr() as *const GLvoid);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D, 0, // Mipmap level
                internal_format as GLint,
                width, height, 0, // Size and border
                format as GLenum, pixel_type as GLenum,
                data,
            );
        }
    }

    fn get_tex_image(&self, format: PixelFormat, pixel_type: PixelType, out: &mut [u8]) {
        unsafe {
            gl::GetTexImage(
                gl::TEXTURE_2D, 0,
                format as GLenum, pixel_type as GLenum,
                out.as_mut_ptr() as *mut GLvoid,
            );
        }
    }

    fn delete_texture(&self, texture: GLuint) {
        unsafe { gl::DeleteTextures(1, &texture) }
    }

    fn pixel_store(&self, parameter: GLenum, value: GLint) {
        unsafe { gl::PixelStorei(parameter, value) }
    }

    fn gen_framebuffer(&self) -> GLuint {
        let mut framebuffer = 0;
        unsafe { gl::GenFramebuffers(1, &mut framebuffer) };
        framebuffer
    }

    fn bind_framebuffer(&self, framebuffer: GLuint) {
        unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer) }
    }

    fn framebuffer_texture_2d(&self, attachment: GLenum, texture: GLuint) {
        unsafe { gl::FramebufferTexture2D(gl::FRAMEBUFFER, attachment, gl::TEXTURE_2D, texture, 0) }
    }

    fn draw_buffers(&self, buffers: &[GLenum]) {
        unsafe { gl::DrawBuffers(buffers.len() as GLsizei, buffers.as_ptr()) }
    }

    fn check_framebuffer_status(&self) -> GLenum {
        unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) }
    }

    fn delete_framebuffer(&self, framebuffer: GLuint) {
        unsafe { gl::DeleteFramebuffers(1, &framebuffer) }
    }

    fn gen_renderbuffer(&self) -> GLuint {
        let mut renderbuffer = 0;
        unsafe { gl::GenRenderbuffers(1, &mut renderbuffer) };
        renderbuffer
    }

    fn bind_renderbuffer(&self, renderbuffer: GLuint) {
        unsafe { gl::BindRenderbuffer(gl::RENDERBUFFER, renderbuffer) }
    }

    fn renderbuffer_storage(&self, internal_format: GLenum, width: GLsizei, height: GLsizei) {
        unsafe { gl::RenderbufferStorage(gl::RENDERBUFFER, internal_format, width, height) }
    }

    fn framebuffer_renderbuffer(&self, attachment: GLenum, renderbuffer: GLuint) {
        unsafe { gl::FramebufferRenderbuffer(gl::FRAMEBUFFER, attachment, gl::RENDERBUFFER, renderbuffer) }
    }

    fn delete_renderbuffer(&self, renderbuffer: GLuint) {
        unsafe { gl::DeleteRenderbuffers(1, &renderbuffer) }
    }

    fn draw_arrays(&self, mode: PrimitiveMode, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode as GLenum, first, count) }
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: GLsizei, index_type: IndexType, offset: usize) {
        unsafe { gl::DrawElements(mode as GLenum, count, index_type as GLenum, offset as *const GLvoid) }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn get_integer(&self, parameter: GLenum) -> GLint {
        let mut value = 0;
        unsafe { gl::GetIntegerv(parameter, &mut value) };
        value
    }
}
