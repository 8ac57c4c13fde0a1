//! # Kinesync Types
//!
//! 机械臂姿态的三种表示及其辅助类型（无运动学计算、无界面依赖）：
//!
//! - `actuator`: 执行器索引、关节角向量、角度限位
//! - `pose`: 末端目标位姿及其编辑分量
//! - `configuration`: 离散运动学构型（朝向 / 翻转 / 前臂）
//! - `solution`: 逆解及当前位姿的有效解集合
//! - `display`: 界面显示字段
//! - `units`: 弧度 / 角度
//!
//! ## Feature Flags
//!
//! - `serde` - 为所有数据类型派生 `Serialize` / `Deserialize`

pub mod actuator;
pub mod configuration;
pub mod display;
pub mod pose;
pub mod solution;
pub mod units;

// 重新导出常用类型
pub use actuator::{ACTUATOR_COUNT, Actuator, ActuatorArray, AngleLimit, JointAngleVector};
pub use configuration::{
    AxisValue, CONFIG_AXIS_COUNT, ConfigAxis, Direction, Flip, KinematicConfiguration,
    ParseConfigError, Turn,
};
pub use display::{DISPLAY_FIELD_COUNT, DisplayField};
pub use pose::{POSE_AXIS_COUNT, Pose, PoseAxis};
pub use solution::{KinematicsSolution, MAX_SOLUTIONS, ValidSolutionSet};
pub use units::{Deg, Rad};
