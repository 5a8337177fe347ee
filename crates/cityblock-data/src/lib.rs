//! Data files for city block assembly: recipes, slot layout, and the
//! Template Library.

pub mod library;
pub mod loader;
pub mod schema;

pub use library::{TemplateLibrary, TransportKind};
pub use loader::{DataLoadError, Format};
pub use schema::{LayoutConfig, Recipe, Slot, SlotRole, load_recipe};
