mod env;

pub use env::*;
