//! Framebuffers are used to draw to off-screen render targets

use gl;
use gl::types::*;
use log::debug;
use thiserror::Error;

use crate::texture::Texture;
use crate::Context;

/// Set to 8, which 97% of all cards support, acording to the [wildfiregames report][1]
/// [1]: http://feedback.wildfiregames.com/report/opengl/feature/GL_MAX_COLOR_ATTACHMENTS_EXT
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// A OpenGL framebuffer. Color attachments are textures owned by the caller, while the depth
/// attachment is a renderbuffer owned by the framebuffer.
pub struct Framebuffer {
    ctx: Context,
    framebuffer: GLuint,
    depth_buffer: Option<GLuint>,
    depth_size: Option<(u32, u32)>,
}

impl Framebuffer {
    pub fn new(ctx: &Context) -> Framebuffer {
        let framebuffer = ctx.gen_framebuffer();
        debug!("Created framebuffer {}", framebuffer);

        Framebuffer {
            ctx: ctx.clone(),
            framebuffer,
            depth_buffer: None,
            depth_size: None,
        }
    }

    /// Binds this framebuffer. Subsequent draw operations will modify this framebuffer
    /// rather than the backbuffer. Note that you probably want to modify the viewport
    /// to fit this framebuffers size.
    pub fn bind(&self) -> &Self {
        self.ctx.bind_framebuffer(self.framebuffer);
        self
    }

    /// Binds framebuffer 0, resulting in draw operations drawing to the backbuffer.
    pub fn unbind(&self) {
        self.ctx.bind_framebuffer(0);
    }

    /// Attaches the given texture as the first color attachment. Note that this leaves the
    /// framebuffer bound.
    pub fn attach(&mut self, texture: &Texture) -> &mut Self {
        self.bind();
        self.ctx.framebuffer_texture_2d(gl::COLOR_ATTACHMENT0, texture.handle());
        self
    }

    /// Attaches the given textures to consecutive color attachments and draws to exactly those
    /// attachments, in order. Texture `i` receives fragment shader output `i`. Note that this
    /// leaves the framebuffer bound.
    ///
    /// # Panics
    /// If more than [`MAX_COLOR_ATTACHMENTS`](constant.MAX_COLOR_ATTACHMENTS.html) textures
    /// are given.
    pub fn attach_bundle(&mut self, textures: &[&Texture]) -> &mut Self {
        if textures.len() > MAX_COLOR_ATTACHMENTS {
            panic!(
                "Tried attaching {} textures to a framebuffer, but at most {} color attachments are supported",
                textures.len(), MAX_COLOR_ATTACHMENTS,
            );
        }

        self.bind();

        let mut draw_buffers = Vec::with_capacity(textures.len());
        for (i, texture) in textures.iter().enumerate() {
            let attachment = gl::COLOR_ATTACHMENT0 + i as GLenum;
            self.ctx.framebuffer_texture_2d(attachment, texture.handle());
            draw_buffers.push(attachment);
        }
        self.ctx.draw_buffers(&draw_buffers);

        self
    }

    /// Attaches a depth buffer of the given size. The depth buffer is created on the first call,
    /// later calls resize it. Note that this leaves the framebuffer bound.
    pub fn attach_depth(&mut self, width: u32, height: u32) -> &mut Self {
        let depth_buffer = match self.depth_buffer {
            Some(depth_buffer) => depth_buffer,
            None => {
                let depth_buffer = self.ctx.gen_renderbuffer();
                self.depth_buffer = Some(depth_buffer);
                depth_buffer
            },
        };

        self.bind();
        self.ctx.bind_renderbuffer(depth_buffer);
        self.ctx.renderbuffer_storage(gl::DEPTH_COMPONENT, width as GLsizei, height as GLsizei);
        self.ctx.framebuffer_renderbuffer(gl::DEPTH_ATTACHMENT, depth_buffer);
        self.depth_size = Some((width, height));

        self
    }

    /// The handle of the depth renderbuffer, if [`attach_depth`](#method.attach_depth) has been
    /// called.
    pub fn depth_buffer(&self) -> Option<GLuint> {
        self.depth_buffer
    }

    pub fn depth_size(&self) -> Option<(u32, u32)> {
        self.depth_size
    }

    /// Checks whether this framebuffer can be drawn to. Note that this leaves the framebuffer
    /// bound.
    pub fn status(&self) -> Result<(), FramebufferError> {
        self.bind();
        match self.ctx.check_framebuffer_status() {
            gl::FRAMEBUFFER_COMPLETE => Ok(()),
            status => Err(FramebufferError::from(status)),
        }
    }

    /// The raw OpenGL handle of this framebuffer
    pub fn handle(&self) -> GLuint {
        self.framebuffer
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.ctx.delete_framebuffer(self.framebuffer);
        if let Some(depth_buffer) = self.depth_buffer {
            self.ctx.delete_renderbuffer(depth_buffer);
        }
        // Color attachments are owned by their `Texture`s
    }
}

/// A error which can occure while drawing to a incomplete framebuffer. The variants of this enum
/// corespond to those `gl::FRAMEBUFFER_*` constants which are errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramebufferError {
    #[error("Framebuffer error: Undefined framebuffer")]
    Undefined,
    #[error("Framebuffer error: Incompelete attachment")]
    IncompleteAttachment,
    #[error("Framebuffer error: Incompelete missing attachment")]
    IncompleteMissingAttachment,
    #[error("Framebuffer error: Incomplete draw buffer")]
    IncompleteDrawBuffer,
    #[error("Framebuffer error: Incomplete read buffer")]
    IncompleteReadBuffer,
    #[error("Framebuffer error: Unsuported")]
    Unsuported,
    #[error("Framebuffer error: Incomplete multisample")]
    IncompleteMultisample,
    #[error("Framebuffer error: Incomplete layer targets")]
    IncompleteLayerTargets,
    #[error("Framebuffer error: Unkown error code: 0x{0:x}")]
    UnkownError(GLenum),
}

impl From<GLenum> for FramebufferError {
    fn from(err: GLenum) -> FramebufferError {
        match err {
            gl::FRAMEBUFFER_UNDEFINED                     => FramebufferError::Undefined,
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT         => FramebufferError::IncompleteAttachment,
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => FramebufferError::IncompleteMissingAttachment,
            gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER        => FramebufferError::IncompleteDrawBuffer,
            gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER        => FramebufferError::IncompleteReadBuffer,
            gl::FRAMEBUFFER_UNSUPPORTED                   => FramebufferError::Unsuported,
            gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE        => FramebufferError::IncompleteMultisample,
            gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS      => FramebufferError::IncompleteLayerTargets,
            _                                             => FramebufferError::UnkownError(err),
        }
    }
}
