//! 显示状态与写入抑制
//!
//! 同步层把每个数值量化后推送给界面层。为了打断 关节角 ↔ 位姿 ↔ 构型 之间的相互更新，
//! 某个字段**当且仅当**新的量化值与该字段上次写入的值不同时才产生一次写入。
//!
//! 每个字段保存两份历史：
//!
//! - `last_written`: 上次推送给界面的量化值（从未推送过时为 `None`）
//! - `last_raw`: 上次的原始输入，供防卡滞规则判断输入是否移动

use crate::quantizer::{QuantizeMode, quantize, round_to_step};
use kinesync_types::{
    Actuator, DISPLAY_FIELD_COUNT, DisplayField, JointAngleVector, Pose, PoseAxis,
};
use smallvec::SmallVec;
use std::fmt;

/// 一次字段写入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayWrite {
    pub field: DisplayField,
    /// 量化后的显示值（度或毫米）
    pub value: f64,
}

impl fmt::Display for DisplayWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// 一次编辑产生的全部写入（最多每个字段一次）
pub type DisplayWrites = SmallVec<[DisplayWrite; DISPLAY_FIELD_COUNT]>;

/// 各字段的量化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldModes {
    modes: [QuantizeMode; DISPLAY_FIELD_COUNT],
}

impl FieldModes {
    /// 全部为连续模式
    pub const fn continuous() -> Self {
        Self {
            modes: [QuantizeMode::Continuous; DISPLAY_FIELD_COUNT],
        }
    }

    /// 按谓词为每个字段选择模式
    pub fn from_fn(mut is_integer: impl FnMut(DisplayField) -> bool) -> Self {
        let mut modes = Self::continuous();
        for field in DisplayField::all() {
            modes.modes[field.index()] = QuantizeMode::from_integer(is_integer(field));
        }
        modes
    }

    #[inline]
    pub fn get(&self, field: DisplayField) -> QuantizeMode {
        self.modes[field.index()]
    }

    pub fn set(&mut self, field: DisplayField, mode: QuantizeMode) {
        self.modes[field.index()] = mode;
    }
}

impl Default for FieldModes {
    /// 夹爪字段为整数模式，其余为连续模式
    fn default() -> Self {
        Self::from_fn(|field| {
            matches!(
                field,
                DisplayField::Angle(Actuator::Gripper) | DisplayField::Pose(PoseAxis::Gripper)
            )
        })
    }
}

/// 显示状态
#[derive(Debug, Clone)]
pub struct DisplayState {
    modes: FieldModes,
    last_written: [Option<f64>; DISPLAY_FIELD_COUNT],
    last_raw: [f64; DISPLAY_FIELD_COUNT],
}

impl DisplayState {
    pub fn new(modes: FieldModes) -> Self {
        Self {
            modes,
            last_written: [None; DISPLAY_FIELD_COUNT],
            last_raw: [0.0; DISPLAY_FIELD_COUNT],
        }
    }

    pub fn modes(&self) -> &FieldModes {
        &self.modes
    }

    /// 字段上次写入的值
    pub fn last_written(&self, field: DisplayField) -> Option<f64> {
        self.last_written[field.index()]
    }

    /// 字段上次的原始输入
    pub fn last_raw(&self, field: DisplayField) -> f64 {
        self.last_raw[field.index()]
    }

    /// 量化一次用户输入（不修改状态）
    ///
    /// 编辑被拒绝时调用方直接丢弃结果，历史保持不变。
    pub fn quantize_input(&self, field: DisplayField, raw: f64) -> f64 {
        let mode = self.modes.get(field);
        match self.last_written(field) {
            Some(displayed) => quantize(raw, displayed, self.last_raw(field), mode),
            None => round_to_step(raw, mode),
        }
    }

    /// 记录已被采纳的原始输入
    pub fn record_raw(&mut self, field: DisplayField, raw: f64) {
        self.last_raw[field.index()] = raw;
    }

    /// 推送一个计算值
    ///
    /// 按字段模式取整；与上次写入相同则不产生写入。
    pub fn push(&mut self, field: DisplayField, value: f64) -> Option<DisplayWrite> {
        let index = field.index();
        let quantized = round_to_step(value, self.modes.get(field));
        if self.last_written[index] == Some(quantized) {
            return None;
        }
        self.last_written[index] = Some(quantized);
        self.last_raw[index] = quantized;
        Some(DisplayWrite {
            field,
            value: quantized,
        })
    }

    /// 推送全部关节角字段（度）
    pub fn push_angles(&mut self, angles: &JointAngleVector, writes: &mut DisplayWrites) {
        for (actuator, angle) in angles.enumerate() {
            writes.extend(self.push(DisplayField::Angle(actuator), angle.to_deg().0));
        }
    }

    /// 推送全部位姿字段（毫米 / 度）
    pub fn push_pose(&mut self, pose: &Pose, writes: &mut DisplayWrites) {
        for axis in PoseAxis::ALL {
            writes.extend(self.push(DisplayField::Pose(axis), pose.display_value(axis)));
        }
    }

    /// 清空历史，下一次推送会写入所有字段
    pub fn clear(&mut self) {
        self.last_written = [None; DISPLAY_FIELD_COUNT];
        self.last_raw = [0.0; DISPLAY_FIELD_COUNT];
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(FieldModes::default())
    }
}
