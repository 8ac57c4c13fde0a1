//! 构型解析命令
//!
//! 给定请求的构型、被改动的轴和可用分支，打印轮询过程和结果。

use anyhow::{Context, Result};
use clap::Args;
use kinesync_core::resolve;
use kinesync_core::resolver::fallback_candidates;
use kinesync_types::{
    ActuatorArray, ConfigAxis, KinematicConfiguration, KinematicsSolution, Rad, ValidSolutionSet,
};

/// 解析参数
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// 请求的构型（如 front,no-flip,up）
    pub requested: String,

    /// 被改动（固定）的轴
    #[arg(short, long, default_value = "direction")]
    pub changed: String,

    /// 可用分支（可重复）
    #[arg(short, long = "available")]
    pub available: Vec<String>,
}

impl ResolveCommand {
    pub fn execute(self) -> Result<()> {
        let requested: KinematicConfiguration = self
            .requested
            .parse()
            .with_context(|| format!("无效的构型: {}", self.requested))?;
        let changed_axis: ConfigAxis = self
            .changed
            .parse()
            .with_context(|| format!("无效的轴: {}", self.changed))?;
        let solutions = parse_available(&self.available)?;

        println!("请求: {} (固定 {})", requested, changed_axis);
        for (axis, config) in fallback_candidates(requested, changed_axis) {
            let mark = if solutions.contains(&config) { "✓" } else { "✗" };
            println!("  翻转 {:<9} → {} {}", axis.to_string(), config, mark);
        }

        match resolve(requested, changed_axis, &solutions) {
            Ok(resolution) => {
                println!(
                    "✅ 采用 {}（回退 {} 次）",
                    resolution.config, resolution.attempts
                );
                Ok(())
            },
            Err(failure) => Err(failure.into()),
        }
    }
}

fn parse_available(values: &[String]) -> Result<ValidSolutionSet> {
    values
        .iter()
        .map(|value| {
            let config: KinematicConfiguration = value
                .parse()
                .with_context(|| format!("无效的构型: {}", value))?;
            Ok(KinematicsSolution::new(config, ActuatorArray::splat(Rad::ZERO)))
        })
        .collect()
}
