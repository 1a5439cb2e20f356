pub mod params;
pub mod pipeline;
pub mod estimator;
pub mod split;
pub mod errors;

pub use params::*;
pub use pipeline::*;
pub use estimator::*;
pub use split::*;
pub use errors::*;
