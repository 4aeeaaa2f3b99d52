//! Core ETL (Extract, Transform, Load) abstractions
//!
//! Every migration job is an extractor feeding a transformer feeding a
//! loader. The jobs themselves live in [`crate::cli`].

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{Passthrough, Transformer};
