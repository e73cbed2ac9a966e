// Phrasecloud - Core Library
// Exposes the pipeline stages for use in the CLI and tests

pub mod cloud;
pub mod loader;
pub mod normalize;
pub mod palette;
#[cfg(feature = "viewer")]
pub mod present;

// Re-export commonly used types
pub use cloud::occupancy::OccupancyMap;
pub use cloud::typeset::{load_font, BlockTypeface, FontTypeface, Typeface, WordSprite};
pub use cloud::{Cloud, CloudConfig, PlacedWord};
pub use loader::{load_headings, HeadingRecord, DEFAULT_HEADING_COLUMN};
pub use normalize::{normalize_headings, title_case, DuplicatePolicy, FrequencyTable};
pub use palette::{parse_color, parse_palette, VIVID};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
