//! 数值量化
//!
//! 把连续变化的原始数值稳定为阶梯式的显示值，避免实时界面闪烁。
//!
//! # 规则
//!
//! - 连续模式按 0.1 取整，整数模式按 1 取整，均为"远离零的四舍五入"
//! - **防卡滞**: 若取整结果与上次显示值相同、但原始输入确实变化了，
//!   则沿输入变化方向推进一个步长。用户每一次可感知的编辑都会产生可见变化。
//!
//! # 示例
//!
//! ```rust
//! use kinesync_core::quantizer::{QuantizeMode, quantize, round_to_step};
//!
//! assert_eq!(round_to_step(2.34, QuantizeMode::Continuous), 2.3);
//! assert_eq!(round_to_step(-2.5, QuantizeMode::Integer), -3.0);
//!
//! // 输入从 2.30 微调到 2.32，取整后仍是 2.3，防卡滞推进到 2.4
//! assert_eq!(quantize(2.32, 2.3, 2.30, QuantizeMode::Continuous), 2.4);
//! ```

/// 量化模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantizeMode {
    /// 0.1 步长
    #[default]
    Continuous,
    /// 整数步长
    Integer,
}

impl QuantizeMode {
    /// 按是否整数字段选择模式
    #[inline]
    pub const fn from_integer(is_integer: bool) -> Self {
        if is_integer {
            QuantizeMode::Integer
        } else {
            QuantizeMode::Continuous
        }
    }

    /// 量化步长
    #[inline]
    pub const fn step(self) -> f64 {
        match self {
            QuantizeMode::Continuous => 0.1,
            QuantizeMode::Integer => 1.0,
        }
    }
}

/// 符号函数（0 的符号为 0）
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// 按步长取整（远离零的四舍五入，无防卡滞）
///
/// 用于运动学协作方算出的数值：这些值不是用户输入，不需要推进。
#[inline]
pub fn round_to_step(raw: f64, mode: QuantizeMode) -> f64 {
    match mode {
        QuantizeMode::Continuous => sign(raw) * (raw.abs() * 10.0 + 0.5).floor() / 10.0,
        QuantizeMode::Integer => sign(raw) * (raw.abs() + 0.5).floor(),
    }
}

/// 量化用户输入
///
/// # 参数
///
/// - `raw`: 本次原始输入
/// - `last_displayed`: 该字段上次显示的值
/// - `last_raw`: 该字段上次的原始输入
/// - `mode`: 量化模式
///
/// 纯函数；调用方负责保存 `last_displayed` / `last_raw` 供下次使用。
pub fn quantize(raw: f64, last_displayed: f64, last_raw: f64, mode: QuantizeMode) -> f64 {
    let rounded = round_to_step(raw, mode);
    if rounded == last_displayed && raw != last_raw {
        // 再次取整，消除 0.1 累加的浮点误差
        round_to_step(rounded + sign(raw - last_raw) * mode.step(), mode)
    } else {
        rounded
    }
}
