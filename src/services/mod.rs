pub mod error;
pub mod observer;
pub mod sync;
