pub mod model;
pub mod sweep;

// Re-export commonly used types/functions for consumers
pub use model::{load_raw_bin, Image, Segment};
pub use sweep::{Stats, Sweep};
