pub mod bean;
pub mod descriptor;

pub use morph_api_derive::Bean;
pub mod dyna;
pub mod error;
pub mod json;
pub mod morpher;
pub mod value;
