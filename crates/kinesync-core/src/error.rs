//! 错误类型定义
//!
//! 引擎内部只有两类失败，均可由用户恢复（给出可达的位姿或构型即可）：
//!
//! - 逆解失败：位姿在请求的构型下没有关节角解，且没有其他可用分支
//! - 构型解析失败：有限轮询内找不到其他可用分支
//!
//! 两者都不会改变已有状态，只通过通知和编辑结果报告。

use kinesync_types::{ConfigAxis, KinematicConfiguration, Pose};
use thiserror::Error;

/// 运动学协作方返回的错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// 位姿超出工作空间
    #[error("Pose is out of reach")]
    Unreachable,

    /// 位姿可达，但在指定构型下无解
    #[error("No solution for configuration {config}")]
    NoSolution {
        /// 请求的构型
        config: KinematicConfiguration,
    },
}

/// 解析失败原因
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionFailure {
    /// 位姿没有任何可实现的关节角解
    #[error("Inverse kinematics failed for pose {pose}: {source}")]
    InverseKinematics {
        /// 目标位姿
        pose: Pose,
        /// 协作方返回的错误
        #[source]
        source: KinematicsError,
    },

    /// 有限轮询内找不到可用分支
    #[error("No valid configuration near {requested} (changed axis: {changed_axis})")]
    NoAlternativeConfiguration {
        /// 请求的构型
        requested: KinematicConfiguration,
        /// 用户改动（或被固定）的轴
        changed_axis: ConfigAxis,
    },
}

impl ResolutionFailure {
    /// 是否为逆解失败
    pub fn is_inverse_kinematics(&self) -> bool {
        matches!(self, ResolutionFailure::InverseKinematics { .. })
    }
}
