//! Cityblock Assembler -- builds a complete city block from a recipe.
//!
//! # Usage
//!
//! ```rust,ignore
//! let library = TemplateLibrary::builtin()?;
//! let recipe = load_recipe(Path::new("gears.toml"))?;
//! let exchange = Assembler::new(&library).assemble(&recipe)?;
//! ```
//!
//! Slots beyond the library's branch count are rejected up front with
//! [`AssembleError::CapacityExceeded`]; nothing is merged in that case.

pub mod assembler;
pub mod error;

pub use assembler::{Assembler, Assembly, AssemblyStats, LABEL_PREFIX};
pub use error::AssembleError;
