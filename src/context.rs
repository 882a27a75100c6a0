//! One-time creation of a native OpenGL context.

use std::rc::Rc;

use crate::driver::GlDriver;
use crate::error::{Error, Result};
use crate::Context;

/// The pixel format and OpenGL version requested when creating a context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextAttributes {
    pub version: (u8, u8),
    pub core: bool,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub double_buffer: bool,
    pub depth_bits: u8,
}

impl Default for ContextAttributes {
    fn default() -> ContextAttributes {
        ContextAttributes {
            version: (3, 2),
            core: true,
            color_bits: 24,
            alpha_bits: 8,
            double_buffer: true,
            depth_bits: 32,
        }
    }
}

/// Owns a native OpenGL context which is current on the creating thread, and the driver
/// issuing calls into it.
///
/// All wrappers created from [`context`](#method.context) should be dropped before the
/// `Igloo` itself, as their cleanup calls need the context to still exist.
pub struct Igloo {
    driver: Rc<GlDriver>,
    attributes: ContextAttributes,
    #[allow(dead_code)]
    native: native::NativeContext,
}

impl Igloo {
    /// Creates a context with the default attributes, see
    /// [`ContextAttributes`](struct.ContextAttributes.html).
    pub fn new() -> Result<Igloo> {
        Igloo::with_attributes(ContextAttributes::default())
    }

    pub fn with_attributes(attributes: ContextAttributes) -> Result<Igloo> {
        let (native, driver) = native::NativeContext::create(&attributes)?;
        Ok(Igloo {
            driver: Rc::new(driver),
            attributes,
            native,
        })
    }

    /// The context every wrapper issues its calls through.
    pub fn context(&self) -> Context {
        self.driver.clone()
    }

    pub fn attributes(&self) -> &ContextAttributes {
        &self.attributes
    }
}

#[cfg(not(target_os = "linux"))]
mod native {
    use super::*;

    pub(super) struct NativeContext;

    impl NativeContext {
        pub(super) fn create(_attributes: &ContextAttributes) -> Result<(NativeContext, GlDriver)> {
            Err(Error::Context(String::from("native contexts are only supported through GLX on linux")))
        }
    }
}

#[cfg(target_os = "linux")]
mod native {
    extern crate x11_dl;

    use super::*;

    use std::ffi::CStr;
    use std::mem;
    use std::os::raw::{c_int, c_void};
    use std::ptr;

    use gl;
    use log::{debug, error, info};

    // We access all ffi stuff through `ffi::whatever` instead of through each apis specific
    // bindings. This allows us to easily add custom stuff that is missing in bindings.
    mod ffi {
        pub(super) use super::x11_dl::xlib::*;
        pub(super) use super::x11_dl::glx::*;
        pub(super) use super::x11_dl::glx::arb::*;

        #[allow(non_camel_case_types)]
        pub type glXCreateContextAttribsARB = unsafe extern "C" fn(
            *mut Display,
            GLXFBConfig,
            GLXContext,
            Bool,
            *const i32,
        ) -> GLXContext;
    }

    // The window is only there to make the context current, it is never mapped
    const WINDOW_SIZE: u32 = 16;

    impl ContextAttributes {
        /// The attribute list passed to `glXChooseFBConfig`, terminated by `0`.
        pub(crate) fn glx_fb_attributes(&self) -> Vec<c_int> {
            let channel_bits = (self.color_bits / 3) as c_int;

            vec![
                ffi::GLX_X_RENDERABLE,  1,
                ffi::GLX_DRAWABLE_TYPE, ffi::GLX_WINDOW_BIT,
                ffi::GLX_RENDER_TYPE,   ffi::GLX_RGBA_BIT,
                ffi::GLX_X_VISUAL_TYPE, ffi::GLX_TRUE_COLOR,
                ffi::GLX_RED_SIZE,      channel_bits,
                ffi::GLX_GREEN_SIZE,    channel_bits,
                ffi::GLX_BLUE_SIZE,     channel_bits,
                ffi::GLX_ALPHA_SIZE,    self.alpha_bits as c_int,
                ffi::GLX_DEPTH_SIZE,    self.depth_bits as c_int,
                ffi::GLX_DOUBLEBUFFER,  self.double_buffer as c_int,

                0,
            ]
        }

        /// The attribute list passed to `glXCreateContextAttribsARB`, terminated by `0`.
        pub(crate) fn glx_context_attributes(&self) -> Vec<c_int> {
            let profile_mask = if self.core {
                ffi::GLX_CONTEXT_CORE_PROFILE_BIT_ARB
            } else {
                ffi::GLX_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB
            };

            vec![
                ffi::GLX_CONTEXT_MAJOR_VERSION_ARB, self.version.0 as c_int,
                ffi::GLX_CONTEXT_MINOR_VERSION_ARB, self.version.1 as c_int,
                ffi::GLX_CONTEXT_PROFILE_MASK_ARB,  profile_mask,
                0,
            ]
        }
    }

    pub(super) struct NativeContext {
        xlib: ffi::Xlib,
        glx: ffi::Glx,

        display: *mut ffi::Display,
        window: ffi::Window,
        colormap: ffi::Colormap,
        context: ffi::GLXContext,
    }

    impl NativeContext {
        pub(super) fn create(attributes: &ContextAttributes) -> Result<(NativeContext, GlDriver)> {
            // Load xlib and glx
            let xlib = ffi::Xlib::open()
                .map_err(|err| Error::Context(format!("Could not load xlib: {}", err)))?;
            let glx = ffi::Glx::open()
                .map_err(|err| Error::Context(format!("Could not load glx: {}", err)))?;

            unsafe { (xlib.XSetErrorHandler)(Some(x_error_callback)) };

            let display = unsafe { (xlib.XOpenDisplay)(ptr::null()) };
            if display.is_null() {
                return Err(Error::Context(String::from("Could not connect to the X server")));
            }

            // From here on `native` closes whatever has been created so far when we bail out
            let mut native = NativeContext {
                xlib, glx,
                display,
                window: 0,
                colormap: 0,
                context: ptr::null_mut(),
            };

            let xlib = &native.xlib;
            let glx = &native.glx;

            let mut fb_attributes = attributes.glx_fb_attributes();
            let default_screen = unsafe { (xlib.XDefaultScreen)(display) };

            let mut count = 0;
            let fb_configs = unsafe { (glx.glXChooseFBConfig)(
                display,
                default_screen,
                fb_attributes.as_mut_ptr(),
                &mut count,
            ) };
            if fb_configs.is_null() || count <= 0 {
                if !fb_configs.is_null() {
                    unsafe { (xlib.XFree)(fb_configs as *mut _) };
                }
                return Err(Error::Context(format!("No FB config matches {:?}", attributes)));
            }

            let fb_config = unsafe { *fb_configs }; // Just use the first one, they are sorted by preference
            unsafe { (xlib.XFree)(fb_configs as *mut _) };

            let visual = unsafe { (glx.glXGetVisualFromFBConfig)(display, fb_config) };
            if visual.is_null() {
                return Err(Error::Context(String::from("No appropriate visual found")));
            }

            // Create window
            let root = unsafe { (xlib.XDefaultRootWindow)(display) };
            let colormap = unsafe { (xlib.XCreateColormap)(display, root, (*visual).visual, ffi::AllocNone) };

            let mut win_attributes = ffi::XSetWindowAttributes {
                colormap,
                .. unsafe { mem::zeroed() }
            };

            let window = unsafe { (xlib.XCreateWindow)(
                display, root,
                0, 0,
                WINDOW_SIZE, WINDOW_SIZE,
                0, // Border

                (*visual).depth,
                ffi::InputOutput as _,
                (*visual).visual,

                ffi::CWColormap,
                &mut win_attributes,
            ) };

            unsafe { (xlib.XFree)(visual as *mut _) };

            native.colormap = colormap;
            native.window = window;
            let glx = &native.glx;

            // Finish setting up OpenGL
            let create_fn = unsafe { (glx.glXGetProcAddress)(b"glXCreateContextAttribsARB\0".as_ptr()) };
            let create_fn = match create_fn {
                Some(create_fn) => unsafe { mem::transmute::<_, ffi::glXCreateContextAttribsARB>(create_fn) },
                None => return Err(Error::Context(String::from("glXCreateContextAttribsARB is not present"))),
            };

            let context_attributes = attributes.glx_context_attributes();
            let context = unsafe { create_fn(
                display, fb_config,
                ptr::null_mut(), 1,
                context_attributes.as_ptr(),
            ) };
            if context.is_null() {
                return Err(Error::Context(format!("Could not create GLX context for {:?}", attributes)));
            }
            native.context = context;

            if unsafe { (glx.glXMakeCurrent)(display, window, context) } == 0 {
                return Err(Error::Context(String::from("Could not make the GLX context current")));
            }

            let mut gl_name_buf = Vec::with_capacity(64);
            let driver = unsafe {
                GlDriver::load_with(|name| {
                    gl_name_buf.clear();
                    gl_name_buf.extend_from_slice(name.as_bytes());
                    gl_name_buf.push(0);

                    match (glx.glXGetProcAddress)(gl_name_buf.as_ptr()) {
                        Some(function) => function as *const c_void,
                        None => ptr::null(),
                    }
                })
            };

            let version = unsafe { gl::GetString(gl::VERSION) };
            if version.is_null() {
                return Err(Error::Context(String::from("glGetString(GL_VERSION) returned null")));
            }
            let version = unsafe { CStr::from_ptr(version as *const _) };
            info!("Created OpenGL context, version {}", version.to_string_lossy());
            debug!("Context attributes: {:?}", attributes);

            Ok((native, driver))
        }
    }

    impl Drop for NativeContext {
        fn drop(&mut self) {
            let xlib = &self.xlib;
            let glx = &self.glx;

            unsafe {
                if !self.context.is_null() {
                    (glx.glXMakeCurrent)(self.display, 0, ptr::null_mut());
                    (glx.glXDestroyContext)(self.display, self.context);
                }
                if self.window != 0 {
                    (xlib.XDestroyWindow)(self.display, self.window);
                }
                if self.colormap != 0 {
                    (xlib.XFreeColormap)(self.display, self.colormap);
                }
                (xlib.XCloseDisplay)(self.display);
            }
        }
    }

    unsafe extern "C" fn x_error_callback(
        _display: *mut ffi::Display,
        event: *mut ffi::XErrorEvent,
    ) -> c_int
    {
        error!("X error: {}", (*event).error_code);
        0
    }

}
