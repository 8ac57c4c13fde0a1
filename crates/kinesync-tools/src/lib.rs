//! # Kinesync Tools - 共享配置
//!
//! **依赖原则**: 只依赖 `kinesync-types`，不依赖 `kinesync-core`
//!
//! ## 包含模块
//!
//! - `config` - 引擎配置（显示模式、拖拽灵敏度、通知队列），TOML 格式

pub mod config;

// 重新导出常用类型
pub use config::{ConfigError, DisplayConfig, DragConfig, EngineConfig, NotificationConfig};
