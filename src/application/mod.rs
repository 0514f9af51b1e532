//! Application layer: reading record files and driving the engine

pub mod error;
pub mod error_ext;
pub mod loader;

pub use error::{AppError, AppResult};
pub use error_ext::IoResultExt;
pub use loader::{InputShape, Loader};
