//! Small helpers for global driver state

use gl;
use gl::types::*;
use log::error;

use crate::driver::Driver;

/// Sets the viewport to the given rectangle, in pixels from the bottom left.
pub fn viewport(driver: &dyn Driver, x: u32, y: u32, width: u32, height: u32) {
    driver.viewport(x as GLint, y as GLint, width as GLsizei, height as GLsizei);
}

/// Clears the currently bound framebuffer. The color buffer is only cleared if a color is given.
/// If neither a color is given nor `depth` is set nothing is cleared.
pub fn clear(driver: &dyn Driver, color: Option<[f32; 4]>, depth: bool) {
    let mut mask = 0;

    if let Some([r, g, b, a]) = color {
        driver.clear_color(r, g, b, a);
        mask |= gl::COLOR_BUFFER_BIT;
    }
    if depth {
        mask |= gl::DEPTH_BUFFER_BIT;
    }

    if mask != 0 {
        driver.clear(mask);
    }
}

/// Logs all pending driver errors, returning how many there were.
pub fn log_errors(driver: &dyn Driver) -> usize {
    let mut count = 0;
    while let Some(message) = error_message(driver.get_error()) {
        error!("OpenGL error: {}", message);
        count += 1;
    }
    count
}

/// A readable message for a `glGetError` code, or `None` for `GL_NO_ERROR`.
pub fn error_message(error: GLenum) -> Option<String> {
    let value = match error {
        gl::INVALID_VALUE                   => "Invalid value",
        gl::INVALID_ENUM                    => "Invalid enum",
        gl::INVALID_OPERATION               => "Invalid operation",
        gl::INVALID_FRAMEBUFFER_OPERATION   => "Invalid framebuffer operation",
        gl::OUT_OF_MEMORY                   => "Out of memory",

        gl::NO_ERROR                        => return None,
        _                                   => return Some(format!("Invalid error code: {:x}", error)),
    };
    Some(String::from(value))
}
