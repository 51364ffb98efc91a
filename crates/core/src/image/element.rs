//! Sample trait for generic pixel values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in an image pixel.
///
/// Integer camera data (`u8`, `u16`, ...) and floating point data are
/// both accepted; every algorithm works on `f64` after [`Sample::to_f64`].
pub trait Sample:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Whether this value is finite (always true for integers)
    fn is_finite_sample(&self) -> bool;

    /// Convert self to f64
    fn to_f64(self) -> f64 {
        // Every supported type converts losslessly or by rounding
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }
}

macro_rules! impl_sample_int {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                fn is_finite_sample(&self) -> bool {
                    true
                }
            }
        )*
    };
}

macro_rules! impl_sample_float {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                fn is_finite_sample(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_sample_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_sample_float!(f32, f64);
