use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use gl;
use gl::types::*;
use log::debug;

use crate::driver::Driver;
use crate::error::Result;
use crate::Context;

/// Sampling and storage settings for a [`Texture`](struct.Texture.html). These are fixed once
/// the texture is created.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureOptions {
    /// The layout of pixel data passed to and read from the texture
    pub format: PixelFormat,
    /// The type of each component of pixel data passed to and read from the texture
    pub pixel_type: PixelType,
    pub wrap: TextureWrap,
    /// Used both when magnifying and minifying
    pub filter: TextureFilter,
    /// How the driver stores the texture internally
    pub internal_format: InternalFormat,
}

impl Default for TextureOptions {
    fn default() -> TextureOptions {
        TextureOptions {
            format: PixelFormat::Rgba,
            pixel_type: PixelType::UnsignedByte,
            wrap: TextureWrap::ClampToEdge,
            filter: TextureFilter::Nearest,
            internal_format: InternalFormat::Rgba,
        }
    }
}

/// A wraper around a OpenGL texture object which can be modified
pub struct Texture {
    ctx: Context,
    texture: GLuint,
    options: TextureOptions,
    size: Option<(u32, u32)>,
}

impl Texture {
    /// Creates a new texture without any ascociated data, setting its sampling parameters.
    pub fn new(ctx: &Context, options: TextureOptions) -> Texture {
        let texture = ctx.gen_texture();

        ctx.bind_texture(texture);
        ctx.tex_parameter(gl::TEXTURE_MIN_FILTER, options.filter as GLint);
        ctx.tex_parameter(gl::TEXTURE_MAG_FILTER, options.filter as GLint);
        ctx.tex_parameter(gl::TEXTURE_WRAP_S, options.wrap as GLint);
        ctx.tex_parameter(gl::TEXTURE_WRAP_T, options.wrap as GLint);

        debug!("Created texture {} with {:?}", texture, options);

        Texture {
            ctx: ctx.clone(),
            texture,
            options,
            size: None,
        }
    }

    /// Binds this texture to the given texture unit
    pub fn bind(&self, unit: u32) -> &Self {
        self.ctx.active_texture(unit);
        self.ctx.bind_texture(self.texture);
        self
    }

    /// Allocates storage for a `width` by `height` texture without uploading any data. Used for
    /// textures which are rendered to.
    pub fn blank(&mut self, width: u32, height: u32) -> &mut Self {
        self.upload(None, width, height);
        self
    }

    /// Uploads pixel data in this textures format, replacing any previous data.
    ///
    /// # Panics
    /// If `data` holds less than `width * height` pixels.
    pub fn set(&mut self, data: &[u8], width: u32, height: u32) -> &mut Self {
        let required = self.byte_len(width, height);
        if data.len() < required {
            panic!(
                "Tried uploading {} bytes to a {}x{} texture, which needs {} bytes",
                data.len(), width, height, required,
            );
        }

        self.upload(Some(data), width, height);
        self
    }

    /// Uploads a decoded image. The texture should use the default `Rgba`/`UnsignedByte` format.
    pub fn set_image(&mut self, image: &Image) -> &mut Self {
        self.set(&image.pixels, image.width, image.height)
    }

    fn upload(&mut self, data: Option<&[u8]>, width: u32, height: u32) {
        self.size = Some((width, height));
        self.bind(0);

        // Rows are tightly packed in `data`
        let ctx = &*self.ctx;
        with_alignment(ctx, gl::UNPACK_ALIGNMENT, || {
            ctx.tex_image_2d(
                self.options.internal_format,
                width as GLsizei, height as GLsizei,
                self.options.format, self.options.pixel_type,
                data,
            );
        });
    }

    /// Reads the pixel data of this texture back from the driver.
    ///
    /// # Panics
    /// If no data has been stored with [`set`](#method.set) or [`blank`](#method.blank).
    pub fn read_back(&self) -> Vec<u8> {
        let (width, height) = match self.size {
            Some(size) => size,
            None => panic!("no image data stored in texture {}", self.texture),
        };

        let mut data = vec![0; self.byte_len(width, height)];
        self.bind(0);

        let ctx = &*self.ctx;
        with_alignment(ctx, gl::PACK_ALIGNMENT, || {
            ctx.get_tex_image(self.options.format, self.options.pixel_type, &mut data);
        });
        data
    }

    /// The number of bytes needed to store one pixel in this textures format.
    pub fn bytes_per_pixel(&self) -> usize {
        self.options.format.components() * self.options.pixel_type.size()
    }

    fn byte_len(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }

    pub fn width(&self) -> Option<u32> {
        self.size.map(|(width, _)| width)
    }

    pub fn height(&self) -> Option<u32> {
        self.size.map(|(_, height)| height)
    }

    pub fn options(&self) -> &TextureOptions {
        &self.options
    }

    /// The raw OpenGL handle of this texture
    pub fn handle(&self) -> GLuint {
        self.texture
    }
}

/// Runs `f` with the given pack or unpack alignment set to 1, restoring the previous value
/// afterwards. Without this, rows which are not a multiple of 4 bytes long are padded by the
/// driver and no longer match `width * height * bytes_per_pixel`.
fn with_alignment<F: FnOnce()>(driver: &dyn Driver, parameter: GLenum, f: F) {
    let previous = driver.get_integer(parameter);
    driver.pixel_store(parameter, 1);
    f();
    driver.pixel_store(parameter, previous);
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("texture", &self.texture)
            .field("options", &self.options)
            .field("size", &self.size)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.ctx.delete_texture(self.texture);
    }
}

/// Decoded RGBA8 pixel data with premultiplied alpha, ready for [`Texture::set_image`].
///
/// [`Texture::set_image`]: struct.Texture.html#method.set_image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Image {
    /// Loads and decodes a png file
    pub fn open_png<P: AsRef<Path>>(path: P) -> Result<Image> {
        let file = File::open(path.as_ref()).map_err(png::DecodingError::from)?;
        Image::decode_png(BufReader::new(file))
    }

    /// Decodes a png image. Grayscale, palette and 16 bit images are converted to RGBA8.
    pub fn decode_png<R: Read>(reader: R) -> Result<Image> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::normalize_to_color8());

        let mut reader = decoder.read_info()?;
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer)?;
        buffer.truncate(info.buffer_size());

        let mut pixels = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => expand(&buffer, 3, |p| [p[0], p[1], p[2], 255]),
            png::ColorType::GrayscaleAlpha => expand(&buffer, 2, |p| [p[0], p[0], p[0], p[1]]),
            png::ColorType::Grayscale => expand(&buffer, 1, |p| [p[0], p[0], p[0], 255]),
            // Palettes are expanded by `normalize_to_color8`
            png::ColorType::Indexed => {
                let err = io::Error::new(io::ErrorKind::InvalidData, "unexpanded palette image");
                return Err(png::DecodingError::from(err).into());
            },
        };
        premultiply(&mut pixels);

        Ok(Image { width: info.width, height: info.height, pixels })
    }
}

fn expand<F>(data: &[u8], components: usize, to_rgba: F) -> Vec<u8> where F: Fn(&[u8]) -> [u8; 4] {
    let mut result = Vec::with_capacity(data.len() / components * 4);
    for pixel in data.chunks_exact(components) {
        result.extend_from_slice(&to_rgba(pixel));
    }
    result
}

/// Multiplies the color channels of RGBA8 data with their alpha, rounding to nearest.
pub fn premultiply(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        for channel in pixel[..3].iter_mut() {
            *channel = ((*channel as u16 * alpha + 127) / 255) as u8;
        }
    }
}

/// Represents an OpenGL texture filter. Use in OpenGL functions like ´TextureFilter::* as GLenum´
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFilter {
    Nearest = gl::NEAREST,
    Linear  = gl::LINEAR,
}

/// How texture coordinates outside of `0..1` are handled.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureWrap {
    ClampToEdge    = gl::CLAMP_TO_EDGE,
    ClampToBorder  = gl::CLAMP_TO_BORDER,
    Repeat         = gl::REPEAT,
    MirroredRepeat = gl::MIRRORED_REPEAT,
}

/// The layout of pixel data passed to or read from a texture.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Red            = gl::RED,
    Rg             = gl::RG,
    Rgb            = gl::RGB,
    Bgr            = gl::BGR,
    Rgba           = gl::RGBA,
    Bgra           = gl::BGRA,
    DepthComponent = gl::DEPTH_COMPONENT,
}

impl PixelFormat {
    pub fn components(&self) -> usize {
        match *self {
            PixelFormat::Red | PixelFormat::DepthComponent => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra => 4,
        }
    }
}

/// The type of each component of pixel data.
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelType {
    UnsignedByte  = gl::UNSIGNED_BYTE,
    Byte          = gl::BYTE,
    UnsignedShort = gl::UNSIGNED_SHORT,
    Short         = gl::SHORT,
    UnsignedInt   = gl::UNSIGNED_INT,
    Int           = gl::INT,
    HalfFloat     = gl::HALF_FLOAT,
    Float         = gl::FLOAT,
}

impl PixelType {
    /// Size of one component, in bytes
    pub fn size(&self) -> usize {
        match *self {
            PixelType::UnsignedByte | PixelType::Byte => 1,
            PixelType::UnsignedShort | PixelType::Short | PixelType::HalfFloat => 2,
            PixelType::UnsignedInt | PixelType::Int | PixelType::Float => 4,
        }
    }
}

#[allow(non_camel_case_types)]
/// Represents a OpenGL internal texture format. Use in OpenGL functions like `InternalFormat::* as GLenum`
#[repr(u32)] // GLenum is u32
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum InternalFormat {
    Rgba           = gl::RGBA,
    Rgb            = gl::RGB,
    Red            = gl::RED,

    RGBA_F32       = gl::RGBA32F,
    RGBA_F16       = gl::RGBA16F,
    RGB_F32        = gl::RGB32F,
    R_F32          = gl::R32F,

    RGBA_8         = gl::RGBA8,
    RGB_8          = gl::RGB8,
    R_8            = gl::R8,

    DepthComponent = gl::DEPTH_COMPONENT,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn premultiplies_rgba() {
        let mut pixels = [255, 128, 0, 128, 10, 20, 30, 0, 200, 100, 50, 255];
        premultiply(&mut pixels);
        assert_eq!(pixels, [128, 64, 0, 128, 0, 0, 0, 0, 200, 100, 50, 255]);
    }

    #[test]
    fn decodes_rgba_png() {
        let data = [
            255, 0, 0, 255,   0, 255, 0, 0,
            0, 0, 255, 51,    255, 255, 255, 255,
        ];
        let png_data = encode_png(2, 2, png::ColorType::Rgba, &data);

        let image = Image::decode_png(&png_data[..]).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.pixels, vec![
            255, 0, 0, 255,   0, 0, 0, 0,
            0, 0, 51, 51,     255, 255, 255, 255,
        ]);
    }

    #[test]
    fn decodes_rgb_and_grayscale_as_opaque_rgba() {
        let rgb = encode_png(1, 1, png::ColorType::Rgb, &[10, 20, 30]);
        assert_eq!(Image::decode_png(&rgb[..]).unwrap().pixels, vec![10, 20, 30, 255]);

        let gray = encode_png(2, 1, png::ColorType::Grayscale, &[0, 90]);
        assert_eq!(Image::decode_png(&gray[..]).unwrap().pixels, vec![0, 0, 0, 255, 90, 90, 90, 255]);
    }

    #[test]
    fn garbage_is_not_a_png() {
        assert!(Image::decode_png(&b"definitely not a png"[..]).is_err());
    }

    #[test]
    fn bytes_per_pixel() {
        assert_eq!(PixelFormat::Rgba.components() * PixelType::UnsignedByte.size(), 4);
        assert_eq!(PixelFormat::Rgb.components() * PixelType::Float.size(), 12);
        assert_eq!(PixelFormat::DepthComponent.components() * PixelType::UnsignedShort.size(), 2);
    }
}
