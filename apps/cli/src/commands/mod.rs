//! 命令定义和实现

pub mod config;
pub mod quantize;
pub mod resolve;

pub use config::ConfigCommand;
pub use quantize::QuantizeCommand;
pub use resolve::ResolveCommand;
