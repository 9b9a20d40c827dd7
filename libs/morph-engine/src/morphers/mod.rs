//! Leaf morphers for single scalar types.

mod big;
mod class;
mod parse;
mod primitive;
mod string;
mod wrapper;

pub use big::{BigDecimalMorpher, BigIntegerMorpher};
pub use class::ClassMorpher;
pub use primitive::PrimitiveMorpher;
pub use string::StringMorpher;
pub use wrapper::WrapperMorpher;
