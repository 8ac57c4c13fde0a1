//! 量化命令
//!
//! 复现界面输入框的量化过程，便于排查“数值卡住不动”一类问题。

use anyhow::Result;
use clap::Args;
use kinesync_core::{QuantizeMode, quantize, round_to_step};

/// 量化参数
#[derive(Args, Debug)]
pub struct QuantizeCommand {
    /// 原始输入值
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// 整数模式（默认 0.1 精度）
    #[arg(short, long)]
    pub integer: bool,

    /// 该字段上次显示的值（提供后启用防卡滞）
    #[arg(long, requires = "last_raw", allow_negative_numbers = true)]
    pub last_displayed: Option<f64>,

    /// 该字段上次的原始输入
    #[arg(long, requires = "last_displayed", allow_negative_numbers = true)]
    pub last_raw: Option<f64>,
}

impl QuantizeCommand {
    pub fn execute(self) -> Result<()> {
        println!("{}", self.compute());
        Ok(())
    }

    fn compute(&self) -> f64 {
        let mode = QuantizeMode::from_integer(self.integer);
        match (self.last_displayed, self.last_raw) {
            (Some(last_displayed), Some(last_raw)) => {
                quantize(self.value, last_displayed, last_raw, mode)
            },
            _ => round_to_step(self.value, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(value: f64, integer: bool, history: Option<(f64, f64)>) -> QuantizeCommand {
        QuantizeCommand {
            value,
            integer,
            last_displayed: history.map(|h| h.0),
            last_raw: history.map(|h| h.1),
        }
    }

    #[test]
    fn test_plain_rounding() {
        assert_eq!(command(2.36, false, None).compute(), 2.4);
        assert_eq!(command(-2.5, true, None).compute(), -3.0);
    }

    #[test]
    fn test_anti_stall() {
        assert_eq!(command(2.34, false, Some((2.3, 2.31))).compute(), 2.4);
    }
}
