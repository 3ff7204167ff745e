pub mod config;
pub mod post;
pub mod task;

pub use config::*;
pub use post::*;
pub use task::*;
