//! 执行器索引和数组
//!
//! 机械臂共 7 个执行器（部分为舵机，部分为步进电机），按固定顺序编号。
//! 关节角向量按执行器身份索引，使用枚举防止越界。
//!
//! # 示例
//!
//! ```rust
//! use kinesync_types::{Actuator, ActuatorArray, Rad};
//!
//! let mut angles = ActuatorArray::splat(Rad::ZERO);
//! angles[Actuator::Elbow] = Rad(0.5);
//!
//! for (actuator, angle) in Actuator::ALL.iter().zip(angles.iter()) {
//!     println!("{}: {}", actuator, angle);
//! }
//! ```

use crate::units::Rad;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::ops::{Index, IndexMut};

/// 执行器数量
pub const ACTUATOR_COUNT: usize = 7;

/// 执行器枚举
///
/// 顺序与控制板固件的执行器编号一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Actuator {
    /// 夹爪
    Gripper = 0,
    /// 手部旋转
    Hand = 1,
    /// 腕部
    Wrist = 2,
    /// 肘部
    Elbow = 3,
    /// 前臂
    Forearm = 4,
    /// 上臂
    Upperarm = 5,
    /// 肩部（基座）
    Shoulder = 6,
}

impl Actuator {
    /// 所有执行器（按索引顺序）
    pub const ALL: [Actuator; ACTUATOR_COUNT] = [
        Actuator::Gripper,
        Actuator::Hand,
        Actuator::Wrist,
        Actuator::Elbow,
        Actuator::Forearm,
        Actuator::Upperarm,
        Actuator::Shoulder,
    ];

    /// 获取执行器索引（0-6）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建执行器（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .and_then(|value| Actuator::try_from(value).ok())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Actuator::Gripper => "gripper",
            Actuator::Hand => "hand",
            Actuator::Wrist => "wrist",
            Actuator::Elbow => "elbow",
            Actuator::Forearm => "forearm",
            Actuator::Upperarm => "upperarm",
            Actuator::Shoulder => "shoulder",
        }
    }

    /// 按名称查找（不区分大小写）
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|actuator| actuator.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 执行器数组
///
/// 类型安全的 7 执行器容器，支持按 [`Actuator`] 或 `usize` 索引。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuatorArray<T> {
    data: [T; ACTUATOR_COUNT],
}

impl<T: Copy> Copy for ActuatorArray<T> {}

impl<T> ActuatorArray<T> {
    #[inline]
    pub const fn new(data: [T; ACTUATOR_COUNT]) -> Self {
        ActuatorArray { data }
    }

    #[inline]
    pub fn as_array(&self) -> &[T; ACTUATOR_COUNT] {
        &self.data
    }

    #[inline]
    pub fn into_array(self) -> [T; ACTUATOR_COUNT] {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// 按执行器遍历
    pub fn enumerate(&self) -> impl Iterator<Item = (Actuator, &T)> {
        Actuator::ALL.into_iter().zip(self.data.iter())
    }

    /// 映射转换
    pub fn map<U, F>(self, f: F) -> ActuatorArray<U>
    where
        F: FnMut(T) -> U,
    {
        ActuatorArray::new(self.data.map(f))
    }

    /// 与另一个数组逐元素组合
    pub fn map_with<U, V, F>(self, other: ActuatorArray<U>, mut f: F) -> ActuatorArray<V>
    where
        F: FnMut(T, U) -> V,
    {
        let [a1, b1, c1, d1, e1, f1, g1] = self.data;
        let [a2, b2, c2, d2, e2, f2, g2] = other.data;
        ActuatorArray::new([
            f(a1, a2),
            f(b1, b2),
            f(c1, c2),
            f(d1, d2),
            f(e1, e2),
            f(f1, f2),
            f(g1, g2),
        ])
    }
}

impl<T: Copy> ActuatorArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        ActuatorArray::new([value; ACTUATOR_COUNT])
    }
}

impl<T: Default + Copy> Default for ActuatorArray<T> {
    fn default() -> Self {
        ActuatorArray::splat(T::default())
    }
}

impl<T> Index<Actuator> for ActuatorArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, actuator: Actuator) -> &T {
        &self.data[actuator.index()]
    }
}

impl<T> IndexMut<Actuator> for ActuatorArray<T> {
    #[inline]
    fn index_mut(&mut self, actuator: Actuator) -> &mut T {
        &mut self.data[actuator.index()]
    }
}

impl<T> Index<usize> for ActuatorArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T> From<[T; ACTUATOR_COUNT]> for ActuatorArray<T> {
    fn from(data: [T; ACTUATOR_COUNT]) -> Self {
        ActuatorArray::new(data)
    }
}

impl<T> IntoIterator for ActuatorArray<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, ACTUATOR_COUNT>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// 关节角向量（弧度）
pub type JointAngleVector = ActuatorArray<Rad>;

/// 单个执行器的角度限位
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngleLimit {
    /// 下限
    pub min: Rad,
    /// 上限
    pub max: Rad,
}

impl AngleLimit {
    pub const fn new(min: Rad, max: Rad) -> Self {
        AngleLimit { min, max }
    }

    /// 不限位（±π）
    pub const UNBOUNDED: Self = AngleLimit::new(Rad(-std::f64::consts::PI), Rad::PI);

    /// 将角度限制在 [min, max] 内
    #[inline]
    pub fn clamp(&self, angle: Rad) -> Rad {
        angle.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, angle: Rad) -> bool {
        angle >= self.min && angle <= self.max
    }
}

impl Default for AngleLimit {
    fn default() -> Self {
        AngleLimit::UNBOUNDED
    }
}
