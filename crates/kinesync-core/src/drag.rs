//! 指针拖拽操作
//!
//! 在 3D 视图中按住指针拖动时，位移被映射到两个位姿字段上：
//!
//! | 平面 | 横向 (dx) | 纵向 (dy) |
//! |------|-----------|-----------|
//! | [`DragPlane::PositionYZ`] | y += dx·p | z −= dy·p |
//! | [`DragPlane::PositionXZ`] | x += dx·p | z −= dy·p |
//! | [`DragPlane::OrientationRollPitch`] | roll += dx·o | pitch += dy·o |
//! | [`DragPlane::OrientationYawPitch`] | yaw += dx·o | pitch += dy·o |
//!
//! `p` / `o` 为位置 / 姿态系数。新值在当前显示值基础上计算并按 0.1 取整。
//! 锚点只在位移被闸门放行后更新，被丢弃的位移会累积到下一次放行的位移中。

use crate::quantizer::{QuantizeMode, round_to_step};
use crate::synchronizer::PoseFieldEdit;
use kinesync_tools::DragConfig;
use kinesync_types::PoseAxis;
use std::fmt;

/// 拖拽平面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPlane {
    PositionYZ,
    PositionXZ,
    OrientationRollPitch,
    OrientationYawPitch,
}

impl DragPlane {
    /// 横向和纵向位移分别驱动的字段
    pub const fn axes(self) -> (PoseAxis, PoseAxis) {
        match self {
            DragPlane::PositionYZ => (PoseAxis::Y, PoseAxis::Z),
            DragPlane::PositionXZ => (PoseAxis::X, PoseAxis::Z),
            DragPlane::OrientationRollPitch => (PoseAxis::Roll, PoseAxis::Pitch),
            DragPlane::OrientationYawPitch => (PoseAxis::Yaw, PoseAxis::Pitch),
        }
    }

    pub const fn is_position(self) -> bool {
        matches!(self, DragPlane::PositionYZ | DragPlane::PositionXZ)
    }

    /// 把指针位移换算为两字段编辑
    ///
    /// `current` 返回字段当前的显示值。
    pub fn edits(
        self,
        dx: f64,
        dy: f64,
        factors: &DragConfig,
        current: impl Fn(PoseAxis) -> f64,
    ) -> [PoseFieldEdit; 2] {
        let (horizontal, vertical) = self.axes();
        let (dh, dv) = if self.is_position() {
            // 屏幕纵轴向下，z 向上
            (
                dx * factors.position_factor,
                -dy * factors.position_factor,
            )
        } else {
            (
                dx * factors.orientation_factor,
                dy * factors.orientation_factor,
            )
        };
        let step = |axis: PoseAxis, delta: f64| {
            PoseFieldEdit::new(
                axis,
                round_to_step(current(axis) + delta, QuantizeMode::Continuous),
            )
        };
        [step(horizontal, dh), step(vertical, dv)]
    }
}

impl fmt::Display for DragPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DragPlane::PositionYZ => "position-yz",
            DragPlane::PositionXZ => "position-xz",
            DragPlane::OrientationRollPitch => "orientation-roll-pitch",
            DragPlane::OrientationYawPitch => "orientation-yaw-pitch",
        };
        write!(f, "{}", name)
    }
}

/// 一次被接受的指针位移
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMotion {
    pub plane: DragPlane,
    pub dx: f64,
    pub dy: f64,
}

/// 拖拽状态跟踪
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    active: Option<DragPlane>,
    anchor: (f64, f64),
}

impl DragTracker {
    pub const fn new() -> Self {
        Self {
            active: None,
            anchor: (0.0, 0.0),
        }
    }

    /// 按下指针，选择平面并设置锚点
    pub fn press(&mut self, plane: DragPlane, x: f64, y: f64) {
        self.active = Some(plane);
        self.anchor = (x, y);
    }

    /// 松开指针，结束拖拽
    pub fn release(&mut self) {
        self.active = None;
    }

    pub fn active_plane(&self) -> Option<DragPlane> {
        self.active
    }

    pub fn anchor(&self) -> (f64, f64) {
        self.anchor
    }

    /// 相对锚点的位移（不更新锚点）
    pub fn pending(&self, x: f64, y: f64) -> Option<DragMotion> {
        self.active.map(|plane| DragMotion {
            plane,
            dx: x - self.anchor.0,
            dy: y - self.anchor.1,
        })
    }

    /// 位移已被放行，移动锚点
    pub fn commit(&mut self, x: f64, y: f64) {
        self.anchor = (x, y);
    }
}
