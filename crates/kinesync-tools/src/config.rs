//! # 引擎配置
//!
//! 同步引擎的可调参数，以 TOML 文件保存：
//!
//! ```toml
//! [display]
//! integer_angles = ["gripper"]
//! integer_pose = ["gripper"]
//!
//! [drag]
//! position_factor = 0.3333333333333333
//! orientation_factor = 0.25
//!
//! [notifications]
//! channel_capacity = 64
//! ```
//!
//! 所有分节都可省略，缺省值与交互窗口的原始常量一致。

use kinesync_types::{Actuator, DisplayField, PoseAxis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 文件读写失败
    #[error("Config I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析失败
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 参数无效
    #[error("Invalid config value '{key}': {reason}")]
    Invalid {
        /// 配置项
        key: &'static str,
        /// 原因
        reason: String,
    },
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 显示设置
    pub display: DisplayConfig,

    /// 拖拽设置
    pub drag: DragConfig,

    /// 通知设置
    pub notifications: NotificationConfig,
}

impl EngineConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML 字符串
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验参数范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.drag.position_factor.is_finite() && self.drag.position_factor > 0.0) {
            return Err(ConfigError::Invalid {
                key: "drag.position_factor",
                reason: format!("must be positive, got {}", self.drag.position_factor),
            });
        }
        if !(self.drag.orientation_factor.is_finite() && self.drag.orientation_factor > 0.0) {
            return Err(ConfigError::Invalid {
                key: "drag.orientation_factor",
                reason: format!("must be positive, got {}", self.drag.orientation_factor),
            });
        }
        if self.notifications.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "notifications.channel_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// 字段是否按整数显示
    pub fn is_integer_field(&self, field: DisplayField) -> bool {
        match field {
            DisplayField::Angle(actuator) => self.display.integer_angles.contains(&actuator),
            DisplayField::Pose(axis) => self.display.integer_pose.contains(&axis),
        }
    }
}

/// 显示设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 按整数显示的关节角字段
    pub integer_angles: Vec<Actuator>,

    /// 按整数显示的位姿字段
    pub integer_pose: Vec<PoseAxis>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            // 夹爪只需要整数精度
            integer_angles: vec![Actuator::Gripper],
            integer_pose: vec![PoseAxis::Gripper],
        }
    }
}

/// 拖拽设置
///
/// 指针位移（像素）乘以系数后叠加到位姿字段上。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// 位置系数（毫米/像素）
    pub position_factor: f64,

    /// 姿态系数（度/像素）
    pub orientation_factor: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            position_factor: 1.0 / 3.0,
            orientation_factor: 1.0 / 4.0,
        }
    }
}

/// 通知设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// 通道监听器的队列容量（满时丢弃）
    pub channel_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
        }
    }
}
