pub mod features;
pub mod outcome;
pub mod dataset;
pub mod stims;

pub use features::*;
pub use outcome::*;
pub use dataset::*;
pub use stims::*;
