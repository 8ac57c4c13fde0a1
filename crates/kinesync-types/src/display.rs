//! 界面显示字段
//!
//! 同步层向界面推送的每一个数值都对应一个显示字段：7 个关节角字段和 7 个位姿字段。

use crate::actuator::{ACTUATOR_COUNT, Actuator};
use crate::pose::{POSE_AXIS_COUNT, PoseAxis};
use std::fmt;

/// 显示字段总数
pub const DISPLAY_FIELD_COUNT: usize = ACTUATOR_COUNT + POSE_AXIS_COUNT;

/// 显示字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayField {
    /// 关节角字段（度）
    Angle(Actuator),
    /// 位姿字段（毫米或度）
    Pose(PoseAxis),
}

impl DisplayField {
    /// 稠密索引：关节角在前，位姿在后
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            DisplayField::Angle(actuator) => actuator.index(),
            DisplayField::Pose(axis) => ACTUATOR_COUNT + axis.index(),
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < ACTUATOR_COUNT {
            Actuator::from_index(index).map(DisplayField::Angle)
        } else {
            PoseAxis::from_index(index - ACTUATOR_COUNT).map(DisplayField::Pose)
        }
    }

    /// 所有字段（按稠密索引顺序）
    pub fn all() -> impl Iterator<Item = DisplayField> {
        Actuator::ALL
            .into_iter()
            .map(DisplayField::Angle)
            .chain(PoseAxis::ALL.into_iter().map(DisplayField::Pose))
    }
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayField::Angle(actuator) => write!(f, "angle.{}", actuator),
            DisplayField::Pose(axis) => write!(f, "pose.{}", axis),
        }
    }
}
