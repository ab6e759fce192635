use core::fmt;

// -----------------------------------------------------------------------------
// Number

/// A numeric document value.
///
/// Construction through the `From` impls is canonical: every integer that
/// fits in `i64` is stored as [`Number::Int`], so `Number::from(3_u64)`
/// equals `Number::from(3_i8)`. [`Number::UInt`] only holds values above
/// `i64::MAX`.
///
/// # Examples
///
/// ```
/// use vc_mapper::document::Number;
///
/// assert_eq!(Number::from(7_u64), Number::Int(7));
/// assert_eq!(Number::from(u64::MAX), Number::UInt(u64::MAX));
/// assert_eq!(Number::from(1.5_f32).as_f64(), 1.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// Canonical constructor for unsigned values.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Number::Int(value as i64)
        } else {
            Number::UInt(value)
        }
    }

    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Lossy conversion to `f64`.
    #[inline]
    pub const fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(v) => v as f64,
            Number::UInt(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// The value as `i128` when it is integral.
    ///
    /// Floats qualify when they have no fractional part and are finite.
    pub fn as_integral(&self) -> Option<i128> {
        match *self {
            Number::Int(v) => Some(v as i128),
            Number::UInt(v) => Some(v as i128),
            Number::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1.8e19 {
                    Some(v as i128)
                } else {
                    None
                }
            }
        }
    }

    /// Whether the number is zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Int(v) => v == 0,
            Number::UInt(v) => v == 0,
            Number::Float(v) => v == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => fmt::Display::fmt(v, f),
            Number::UInt(v) => fmt::Display::fmt(v, f),
            Number::Float(v) => fmt::Debug::fmt(v, f),
        }
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Number {
            #[inline]
            fn from(value: $ty) -> Self {
                Number::Int(value as i64)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Number {
            #[inline]
            fn from(value: $ty) -> Self {
                Number::from_u64(value as u64)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Number {
    #[inline]
    fn from(value: f32) -> Self {
        Number::Float(value as f64)
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Number;

    #[test]
    fn integers_are_canonical() {
        assert_eq!(Number::from(5_u8), Number::from(5_i64));
        assert_eq!(Number::from(i64::MAX as u64), Number::Int(i64::MAX));
        assert_eq!(Number::from(i64::MAX as u64 + 1), Number::UInt(i64::MAX as u64 + 1));
    }

    #[test]
    fn integral_view() {
        assert_eq!(Number::Float(4.0).as_integral(), Some(4));
        assert_eq!(Number::Float(4.5).as_integral(), None);
        assert_eq!(Number::Float(f64::NAN).as_integral(), None);
        assert_eq!(Number::UInt(u64::MAX).as_integral(), Some(u64::MAX as i128));
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(Number::Float(1.0).to_string(), "1.0");
        assert_eq!(Number::Int(-3).to_string(), "-3");
    }
}
