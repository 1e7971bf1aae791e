pub mod curve;
pub mod format;
pub mod milestone;

pub use curve::*;
pub use format::*;
pub use milestone::*;
