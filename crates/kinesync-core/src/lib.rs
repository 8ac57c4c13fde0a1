//! # Kinesync Core
//!
//! 机械臂交互编辑的构型解析与状态同步引擎：
//! - 数值量化（防闪烁、防卡滞）
//! - 构型解析（有界轮询，被改动的轴永不回退）
//! - 状态同步（关节角 ↔ 位姿 ↔ 构型，写入抑制）
//! - 输入节流（每个渲染周期最多一次拖拽更新）
//!
//! 正解/逆解由调用方通过 [`Kinematics`] trait 提供。
//!
//! # 使用场景
//!
//! 大多数界面层只需要 [`Session`]（单线程）或 [`SharedSession`]（渲染与输入分线程）。
//! 需要自行管理节流和快照时，可直接使用 [`StateSynchronizer`]。

pub mod display;
pub mod drag;
mod error;
pub mod gate;
pub mod hooks;
mod kinematics;
pub mod quantizer;
pub mod resolver;
pub mod session;
pub mod state;
pub mod synchronizer;

pub use display::{DisplayState, DisplayWrite, DisplayWrites, FieldModes};
pub use drag::{DragMotion, DragPlane, DragTracker};
pub use error::{KinematicsError, ResolutionFailure};
pub use gate::InputGate;
pub use hooks::{ChannelListener, Notification, NotificationHub, NotificationListener};
pub use kinematics::Kinematics;
pub use quantizer::{QuantizeMode, quantize, round_to_step};
pub use resolver::{MAX_FALLBACK_ATTEMPTS, Resolution, resolve};
pub use session::{Session, SharedSession};
pub use state::{AxisEnablement, ManipulatorSnapshot, ManipulatorState};
pub use synchronizer::{
    EditEvent, EditOutcome, EditStatus, PoseFieldEdit, StateSynchronizer, SyncPhase, SyncSettings,
};

/// 常用类型
pub mod prelude {
    pub use crate::{
        AxisEnablement, DragPlane, EditEvent, EditOutcome, EditStatus, Kinematics,
        KinematicsError, Notification, ResolutionFailure, Session, SharedSession,
        StateSynchronizer, SyncPhase, SyncSettings,
    };
    pub use kinesync_tools::EngineConfig;
    pub use kinesync_types::*;
}
