//! Map catalog wiring.
//!
//! This module tracks which maps are available (`MapCatalog`) and how their
//! `map.json` descriptors are parsed into `MapDefinition`s. Maps live under a
//! static asset root; each map directory holds the display geometry
//! (`map.svg`), the descriptor (`map.json`) and per-locale label files under
//! `locale/`.

pub mod index;
pub mod model;

pub use index::{MapCatalog, MapIds};
pub use model::{MAX_DESCRIPTOR_BYTES, MapDefinition, load_definition, validate_descriptor};

/// Descriptor file name inside a map directory.
pub const DESCRIPTOR_FILE: &str = "map.json";
/// Display geometry file name inside a map directory.
pub const DISPLAY_FILE: &str = "map.svg";
/// Directory holding per-locale label files.
pub const LOCALE_DIR: &str = "locale";
