//! 运动学构型
//!
//! 同一末端位姿通常对应多组逆解（最多 8 组），用三个独立的离散轴区分：
//!
//! | 轴 | 取值 | 含义 |
//! |----|------|------|
//! | [`Direction`] | Front / Back | 机身朝前或朝后 |
//! | [`Flip`] | Flip / NoFlip | 上臂-前臂三角形翻转（肘部） |
//! | [`Turn`] | Up / Down | 前臂翻转 |
//!
//! 三个轴的一种取值组合即一个分支（[`KinematicConfiguration`]）。
//!
//! # 示例
//!
//! ```rust
//! use kinesync_types::{ConfigAxis, Direction, Flip, KinematicConfiguration, Turn};
//!
//! let config = KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Up);
//! let toggled = config.toggled(ConfigAxis::Turn);
//! assert_eq!(toggled.turn, Turn::Down);
//! assert_eq!(config.single_axis_difference(&toggled), Some(ConfigAxis::Turn));
//! ```

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 构型轴数量
pub const CONFIG_AXIS_COUNT: usize = 3;

/// 构型解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseConfigError {
    /// 未知的轴名
    #[error("Unknown configuration axis: {0}")]
    UnknownAxis(String),

    /// 轴值与轴不匹配
    #[error("Invalid value '{value}' for configuration axis {axis}")]
    InvalidValue {
        /// 轴
        axis: ConfigAxis,
        /// 原始输入
        value: String,
    },

    /// 构型字符串不是三段
    #[error("Expected 3 comma-separated axis values, got {0}")]
    WrongArity(usize),
}

/// 机身朝向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    #[default]
    Front = 0,
    Back = 1,
}

/// 肘部三角形翻转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Flip {
    #[default]
    Flip = 0,
    NoFlip = 1,
}

/// 前臂翻转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Turn {
    #[default]
    Up = 0,
    Down = 1,
}

impl Direction {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Direction::Front => Direction::Back,
            Direction::Back => Direction::Front,
        }
    }
}

impl Flip {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Flip::Flip => Flip::NoFlip,
            Flip::NoFlip => Flip::Flip,
        }
    }
}

impl Turn {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Turn::Up => Turn::Down,
            Turn::Down => Turn::Up,
        }
    }
}

/// 构型轴
///
/// 数值顺序决定构型搜索时的轮询顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ConfigAxis {
    Direction = 0,
    Flip = 1,
    Turn = 2,
}

impl ConfigAxis {
    pub const ALL: [ConfigAxis; CONFIG_AXIS_COUNT] =
        [ConfigAxis::Direction, ConfigAxis::Flip, ConfigAxis::Turn];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 下一个轴（按索引回绕）
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            ConfigAxis::Direction => ConfigAxis::Flip,
            ConfigAxis::Flip => ConfigAxis::Turn,
            ConfigAxis::Turn => ConfigAxis::Direction,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ConfigAxis::Direction => "direction",
            ConfigAxis::Flip => "flip",
            ConfigAxis::Turn => "turn",
        }
    }
}

impl fmt::Display for ConfigAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConfigAxis {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigAxis::ALL
            .into_iter()
            .find(|axis| axis.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseConfigError::UnknownAxis(s.to_string()))
    }
}

/// 单个轴上的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisValue {
    Direction(Direction),
    Flip(Flip),
    Turn(Turn),
}

impl AxisValue {
    /// 取值所属的轴
    pub const fn axis(self) -> ConfigAxis {
        match self {
            AxisValue::Direction(_) => ConfigAxis::Direction,
            AxisValue::Flip(_) => ConfigAxis::Flip,
            AxisValue::Turn(_) => ConfigAxis::Turn,
        }
    }

    /// 按界面单选组的序号构造（0 / 1）
    pub fn from_selector(axis: ConfigAxis, selector: u8) -> Option<Self> {
        match axis {
            ConfigAxis::Direction => Direction::try_from(selector).ok().map(AxisValue::Direction),
            ConfigAxis::Flip => Flip::try_from(selector).ok().map(AxisValue::Flip),
            ConfigAxis::Turn => Turn::try_from(selector).ok().map(AxisValue::Turn),
        }
    }

    /// 界面单选组的序号
    pub fn selector(self) -> u8 {
        match self {
            AxisValue::Direction(v) => v.into(),
            AxisValue::Flip(v) => v.into(),
            AxisValue::Turn(v) => v.into(),
        }
    }

    /// 解析某个轴上的取值（如 `front`、`no-flip`、`down`）
    pub fn parse(axis: ConfigAxis, value: &str) -> Result<Self, ParseConfigError> {
        let normalized = value.to_ascii_lowercase().replace(['-', '_'], "");
        let parsed = match (axis, normalized.as_str()) {
            (ConfigAxis::Direction, "front") => Some(AxisValue::Direction(Direction::Front)),
            (ConfigAxis::Direction, "back") => Some(AxisValue::Direction(Direction::Back)),
            (ConfigAxis::Flip, "flip") => Some(AxisValue::Flip(Flip::Flip)),
            (ConfigAxis::Flip, "noflip" | "no") => Some(AxisValue::Flip(Flip::NoFlip)),
            (ConfigAxis::Turn, "up") => Some(AxisValue::Turn(Turn::Up)),
            (ConfigAxis::Turn, "down") => Some(AxisValue::Turn(Turn::Down)),
            _ => None,
        };
        parsed.ok_or_else(|| ParseConfigError::InvalidValue {
            axis,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Direction(v) => write!(f, "{:?}", v),
            AxisValue::Flip(v) => write!(f, "{:?}", v),
            AxisValue::Turn(v) => write!(f, "{:?}", v),
        }
    }
}

/// 运动学构型（逆解分支）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicConfiguration {
    pub direction: Direction,
    pub flip: Flip,
    pub turn: Turn,
}

impl KinematicConfiguration {
    pub const fn new(direction: Direction, flip: Flip, turn: Turn) -> Self {
        KinematicConfiguration {
            direction,
            flip,
            turn,
        }
    }

    /// 读取某个轴的取值
    pub const fn value(&self, axis: ConfigAxis) -> AxisValue {
        match axis {
            ConfigAxis::Direction => AxisValue::Direction(self.direction),
            ConfigAxis::Flip => AxisValue::Flip(self.flip),
            ConfigAxis::Turn => AxisValue::Turn(self.turn),
        }
    }

    /// 返回将某个轴设为指定值后的构型
    #[must_use]
    pub const fn with(mut self, value: AxisValue) -> Self {
        match value {
            AxisValue::Direction(v) => self.direction = v,
            AxisValue::Flip(v) => self.flip = v,
            AxisValue::Turn(v) => self.turn = v,
        }
        self
    }

    /// 返回翻转某个轴后的构型
    #[must_use]
    pub const fn toggled(mut self, axis: ConfigAxis) -> Self {
        match axis {
            ConfigAxis::Direction => self.direction = self.direction.toggled(),
            ConfigAxis::Flip => self.flip = self.flip.toggled(),
            ConfigAxis::Turn => self.turn = self.turn.toggled(),
        }
        self
    }

    /// 若两个构型恰好只在一个轴上不同，返回该轴
    pub fn single_axis_difference(&self, other: &Self) -> Option<ConfigAxis> {
        let mut differing = ConfigAxis::ALL
            .into_iter()
            .filter(|axis| self.value(*axis) != other.value(*axis));
        match (differing.next(), differing.next()) {
            (Some(axis), None) => Some(axis),
            _ => None,
        }
    }
}

impl fmt::Display for KinematicConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {:?})", self.direction, self.flip, self.turn)
    }
}

/// 解析 `direction,flip,turn` 形式的构型（如 `front,no-flip,up`）
impl FromStr for KinematicConfiguration {
    type Err = ParseConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [direction, flip, turn] = parts.as_slice() else {
            return Err(ParseConfigError::WrongArity(parts.len()));
        };
        Ok(KinematicConfiguration::default()
            .with(AxisValue::parse(ConfigAxis::Direction, direction)?)
            .with(AxisValue::parse(ConfigAxis::Flip, flip)?)
            .with(AxisValue::parse(ConfigAxis::Turn, turn)?))
    }
}
