pub mod grid;
pub mod workspace;
pub mod scoreboard;
pub mod metrics;
pub mod runner;
pub mod driver;
pub mod finalizer;
pub mod report;

pub use grid::*;
pub use workspace::*;
pub use scoreboard::*;
pub use metrics::*;
pub use runner::*;
pub use driver::*;
pub use finalizer::*;
pub use report::*;
