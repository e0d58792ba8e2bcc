mod build;
mod serve;

pub use build::cmd_build;
pub use serve::cmd_serve;
