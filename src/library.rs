//! Song catalog: the `Track` model, the directory scanners that build it and
//! catalog search.

mod model;
mod scan;
mod search;

pub use model::Track;
pub use scan::{ScanReport, scan};
pub use search::search;
