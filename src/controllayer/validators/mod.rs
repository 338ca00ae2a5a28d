pub mod validators;

pub use validators::*;
