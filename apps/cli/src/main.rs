//! # Kinesync CLI
//!
//! 引擎配置管理和离线调试工具。
//!
//! ```bash
//! # 生成默认配置
//! kinesync-cli config init
//!
//! # 查看量化结果（含防卡滞）
//! kinesync-cli quantize 2.34 --last-displayed 2.3 --last-raw 2.31
//!
//! # 查看构型解析过程
//! kinesync-cli resolve front,no-flip,up --changed direction --available front,no-flip,down
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, QuantizeCommand, ResolveCommand};

/// Kinesync CLI - 构型解析与状态同步引擎工具
#[derive(Parser, Debug)]
#[command(name = "kinesync-cli")]
#[command(about = "Command-line tools for the kinesync posture engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 量化一个输入值
    Quantize {
        #[command(flatten)]
        args: QuantizeCommand,
    },

    /// 在给定的可用分支中解析构型
    Resolve {
        #[command(flatten)]
        args: ResolveCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kinesync_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(),
        Commands::Quantize { args } => args.execute(),
        Commands::Resolve { args } => args.execute(),
    }
}
