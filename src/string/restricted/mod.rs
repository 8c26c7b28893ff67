//! Handling of restricted character strings.
//!
//! Each character string type is represented by a zero-sized type that
//! implements the [`CharSet`] trait. These types are used as type
//! parameters of the writer’s and reader’s character string methods.

pub use self::bmp::BmpString;
pub use self::charset::{CharSet, CharSetError};
pub use self::ia5::Ia5String;
pub use self::numeric::NumericString;
pub use self::printable::PrintableString;
pub use self::utf8::Utf8String;
pub use self::visible::VisibleString;

mod bmp;
mod charset;
mod ia5;
mod numeric;
mod printable;
mod utf8;
mod visible;
