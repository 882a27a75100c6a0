use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

use gl::types::*;

use crate::driver::Driver;
use crate::error::Error;
use crate::texture::Texture;

/// The width of a uniform vector, selecting between the `glUniform{1,2,3,4}*v` functions.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VectorWidth {
    One   = 1,
    Two   = 2,
    Three = 3,
    Four  = 4,
}

impl VectorWidth {
    pub fn components(&self) -> usize {
        *self as usize
    }

    /// The number of whole vectors of this width in `len` elements.
    pub fn count(&self, len: usize) -> GLsizei {
        (len / self.components()) as GLsizei
    }
}

/// How the values of a uniform are uploaded. `Scalar` uploads exactly the first value, while
/// `Vector` uploads as many vectors of the given width as fit in the values.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Dimension {
    Scalar,
    Vector(VectorWidth),
}

impl Dimension {
    /// Retrieves the dimension for the given index, where `0` is a scalar and `1` through `4`
    /// are vectors of that width.
    ///
    /// # Panics
    /// If `dim` is greater than `4`. Use `Dimension::try_from` to handle this case.
    pub fn new(dim: usize) -> Dimension {
        match Dimension::try_from(dim) {
            Ok(dimension) => dimension,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn index(&self) -> usize {
        match *self {
            Dimension::Scalar => 0,
            Dimension::Vector(width) => width.components(),
        }
    }
}

impl TryFrom<usize> for Dimension {
    type Error = Error;

    fn try_from(dim: usize) -> Result<Dimension, Error> {
        Ok(match dim {
            0 => Dimension::Scalar,
            1 => Dimension::Vector(VectorWidth::One),
            2 => Dimension::Vector(VectorWidth::Two),
            3 => Dimension::Vector(VectorWidth::Three),
            4 => Dimension::Vector(VectorWidth::Four),
            _ => return Err(Error::InvalidDimension(dim)),
        })
    }
}

/// The value stored in a [`Uniform`](struct.Uniform.html).
#[derive(Clone)]
pub enum UniformValue {
    Int   { dimension: Dimension, values: Vec<GLint> },
    UInt  { dimension: Dimension, values: Vec<GLuint> },
    Float { dimension: Dimension, values: Vec<GLfloat> },
    /// Binds `texture` to texture unit `site` and sets the uniform to `site`.
    Texture { texture: Rc<Texture>, site: u32 },
}

impl UniformValue {
    fn element_count(&self) -> Option<usize> {
        match *self {
            UniformValue::Int { ref values, .. } => Some(values.len()),
            UniformValue::UInt { ref values, .. } => Some(values.len()),
            UniformValue::Float { ref values, .. } => Some(values.len()),
            UniformValue::Texture { .. } => None,
        }
    }
}

impl fmt::Debug for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UniformValue::Int { dimension, ref values } =>
                write!(f, "Int({}, {:?})", dimension.index(), values),
            UniformValue::UInt { dimension, ref values } =>
                write!(f, "UInt({}, {:?})", dimension.index(), values),
            UniformValue::Float { dimension, ref values } =>
                write!(f, "Float({}, {:?})", dimension.index(), values),
            UniformValue::Texture { ref texture, site } =>
                write!(f, "Texture({} at unit {})", texture.handle(), site),
        }
    }
}

/// A value bound to a named uniform slot in a shader program. Uniforms are added to a
/// [`Program`](struct.Program.html), which pushes them before every draw call.
///
/// # Example
/// ```rust,ignore
/// program.add_uniform(Uniform::float("tint", vec![1.0, 0.5, 0.5, 1.0], 4));
/// program.add_uniform(Uniform::int("frame", vec![0], 0));
/// ```
#[derive(Debug, Clone)]
pub struct Uniform {
    slot: String,
    value: UniformValue,
}

impl Uniform {
    /// Creates a uniform with the given value.
    ///
    /// # Panics
    /// If the value holds no elements, as there would be nothing to upload.
    pub fn new<S: Into<String>>(slot: S, value: UniformValue) -> Uniform {
        validate(&value);
        Uniform { slot: slot.into(), value }
    }

    /// A `int`/`ivecN` uniform. `dim` is `0` for a single scalar, or the vector width.
    ///
    /// # Panics
    /// If `dim` is not in `0..=4`, or `values` is empty.
    pub fn int<S: Into<String>>(slot: S, values: Vec<GLint>, dim: usize) -> Uniform {
        Uniform::new(slot, UniformValue::Int { dimension: Dimension::new(dim), values })
    }

    /// A `uint`/`uvecN` uniform. `dim` is `0` for a single scalar, or the vector width.
    ///
    /// # Panics
    /// If `dim` is not in `0..=4`, or `values` is empty.
    pub fn uint<S: Into<String>>(slot: S, values: Vec<GLuint>, dim: usize) -> Uniform {
        Uniform::new(slot, UniformValue::UInt { dimension: Dimension::new(dim), values })
    }

    /// A `float`/`vecN` uniform. `dim` is `0` for a single scalar, or the vector width.
    /// Multiple vectors can be packed into `values` to set a uniform array.
    ///
    /// # Panics
    /// If `dim` is not in `0..=4`, or `values` is empty.
    pub fn float<S: Into<String>>(slot: S, values: Vec<GLfloat>, dim: usize) -> Uniform {
        Uniform::new(slot, UniformValue::Float { dimension: Dimension::new(dim), values })
    }

    /// A sampler uniform. The texture is bound to unit `site` whenever this uniform is pushed.
    pub fn texture<S: Into<String>>(slot: S, texture: Rc<Texture>, site: u32) -> Uniform {
        Uniform::new(slot, UniformValue::Texture { texture, site })
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn value(&self) -> &UniformValue {
        &self.value
    }

    /// Replaces the value of this uniform. The new value is uploaded the next time the uniform
    /// is pushed.
    ///
    /// # Panics
    /// If the value holds no elements.
    pub fn set_value(&mut self, value: UniformValue) {
        validate(&value);
        self.value = value;
    }

    /// Uploads this uniforms value to the given location of the currently used program.
    pub fn push(&self, driver: &dyn Driver, location: GLint) {
        match self.value {
            UniformValue::Int { dimension: Dimension::Scalar, ref values } => {
                driver.uniform_1i(location, values[0]);
            },
            UniformValue::Int { dimension: Dimension::Vector(width), ref values } => {
                driver.uniform_iv(location, width, width.count(values.len()), values);
            },

            UniformValue::UInt { dimension: Dimension::Scalar, ref values } => {
                driver.uniform_1ui(location, values[0]);
            },
            UniformValue::UInt { dimension: Dimension::Vector(width), ref values } => {
                driver.uniform_uiv(location, width, width.count(values.len()), values);
            },

            UniformValue::Float { dimension: Dimension::Scalar, ref values } => {
                driver.uniform_1f(location, values[0]);
            },
            UniformValue::Float { dimension: Dimension::Vector(width), ref values } => {
                driver.uniform_fv(location, width, width.count(values.len()), values);
            },

            // The texture has to be bound before the sampler is pointed at its unit
            UniformValue::Texture { ref texture, site } => {
                driver.active_texture(site);
                driver.bind_texture(texture.handle());
                driver.uniform_1i(location, site as GLint);
            },
        }
    }
}

fn validate(value: &UniformValue) {
    if value.element_count() == Some(0) {
        panic!("Tried creating a uniform without any values: {:?}", value);
    }
}
