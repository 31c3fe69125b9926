pub mod input;
pub mod runtime;
pub mod timer;
