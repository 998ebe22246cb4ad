pub mod args;
pub mod play;

pub use args::*;
pub use play::*;
