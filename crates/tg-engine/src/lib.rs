pub mod cli;
pub mod process;

pub use cli::*;
pub use process::*;
