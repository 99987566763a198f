pub mod contest;

pub use contest::*;
