//! 末端目标位姿
//!
//! 位姿由 3 个位置分量（毫米）、3 个姿态分量（弧度）和一个夹爪角组成。
//! 位姿与关节角之间只能通过运动学协作方的正解/逆解互相换算。
//!
//! 界面上每个分量是一个独立的编辑字段，由 [`PoseAxis`] 标识：
//! 位置字段按毫米显示，姿态和夹爪字段按角度显示。

use crate::units::{Deg, Rad};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// 位姿分量数量
pub const POSE_AXIS_COUNT: usize = 7;

/// 位姿分量（编辑字段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum PoseAxis {
    X = 0,
    Y = 1,
    Z = 2,
    /// 绕 X 轴旋转
    Roll = 3,
    /// 绕 Y 轴旋转
    Pitch = 4,
    /// 绕 Z 轴旋转
    Yaw = 5,
    /// 夹爪开合角
    Gripper = 6,
}

impl PoseAxis {
    pub const ALL: [PoseAxis; POSE_AXIS_COUNT] = [
        PoseAxis::X,
        PoseAxis::Y,
        PoseAxis::Z,
        PoseAxis::Roll,
        PoseAxis::Pitch,
        PoseAxis::Yaw,
        PoseAxis::Gripper,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .and_then(|value| PoseAxis::try_from(value).ok())
    }

    /// 是否为角度字段（显示单位为度）
    #[inline]
    pub const fn is_angular(self) -> bool {
        !matches!(self, PoseAxis::X | PoseAxis::Y | PoseAxis::Z)
    }

    pub const fn name(self) -> &'static str {
        match self {
            PoseAxis::X => "x",
            PoseAxis::Y => "y",
            PoseAxis::Z => "z",
            PoseAxis::Roll => "roll",
            PoseAxis::Pitch => "pitch",
            PoseAxis::Yaw => "yaw",
            PoseAxis::Gripper => "gripper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|axis| axis.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PoseAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 末端位姿
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// 位置（毫米）[x, y, z]
    pub position: [f64; 3],
    /// 姿态 [roll, pitch, yaw]
    pub orientation: [Rad; 3],
    /// 夹爪角
    pub gripper: Rad,
}

impl Pose {
    /// 原点位姿（全零）
    pub const ZERO: Self = Pose {
        position: [0.0; 3],
        orientation: [Rad::ZERO; 3],
        gripper: Rad::ZERO,
    };

    pub const fn new(position: [f64; 3], orientation: [Rad; 3], gripper: Rad) -> Self {
        Pose {
            position,
            orientation,
            gripper,
        }
    }

    /// 读取某个分量的显示值（位置为毫米，角度为度）
    pub fn display_value(&self, axis: PoseAxis) -> f64 {
        match axis {
            PoseAxis::X => self.position[0],
            PoseAxis::Y => self.position[1],
            PoseAxis::Z => self.position[2],
            PoseAxis::Roll => self.orientation[0].to_deg().0,
            PoseAxis::Pitch => self.orientation[1].to_deg().0,
            PoseAxis::Yaw => self.orientation[2].to_deg().0,
            PoseAxis::Gripper => self.gripper.to_deg().0,
        }
    }

    /// 按显示值写入某个分量
    pub fn set_display_value(&mut self, axis: PoseAxis, value: f64) {
        match axis {
            PoseAxis::X => self.position[0] = value,
            PoseAxis::Y => self.position[1] = value,
            PoseAxis::Z => self.position[2] = value,
            PoseAxis::Roll => self.orientation[0] = Deg(value).to_rad(),
            PoseAxis::Pitch => self.orientation[1] = Deg(value).to_rad(),
            PoseAxis::Yaw => self.orientation[2] = Deg(value).to_rad(),
            PoseAxis::Gripper => self.gripper = Deg(value).to_rad(),
        }
    }

    /// 返回修改了一个分量的新位姿
    #[must_use]
    pub fn with_display_value(mut self, axis: PoseAxis, value: f64) -> Self {
        self.set_display_value(axis, value);
        self
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos=({:.1}, {:.1}, {:.1}) rpy=({:.1}, {:.1}, {:.1}) gripper={:.0}",
            self.position[0],
            self.position[1],
            self.position[2],
            self.orientation[0].to_deg().0,
            self.orientation[1].to_deg().0,
            self.orientation[2].to_deg().0,
            self.gripper.to_deg().0,
        )
    }
}
