//! 配置管理命令
//!
//! 管理引擎配置文件（显示精度、拖拽系数、通知队列容量）。

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use kinesync_tools::EngineConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 默认配置文件路径
fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("kinesync");
    path.push("config.toml");
    Ok(path)
}

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => default_config_file(),
    }
}

fn load(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        info!("{} 不存在，使用默认配置", path.display());
        return Ok(EngineConfig::default());
    }
    EngineConfig::load_from_file(path)
        .with_context(|| format!("加载配置文件失败: {}", path.display()))
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认配置
    Init {
        /// 配置文件路径（默认为用户配置目录下的 kinesync/config.toml）
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(short, long)]
        force: bool,
    },

    /// 打印生效的配置
    Show {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// 校验配置文件
    Check {
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Init { path, force } => Self::init_(resolve_path(path)?, force),

            ConfigCommand::Show { path } => Self::show_(resolve_path(path)?),

            ConfigCommand::Check { path } => Self::check_(resolve_path(path)?),
        }
    }

    fn init_(path: PathBuf, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} 已存在（使用 --force 覆盖）", path.display());
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        EngineConfig::default()
            .save_to_file(&path)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;

        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }

    fn show_(path: PathBuf) -> Result<()> {
        let config = load(&path)?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn check_(path: PathBuf) -> Result<()> {
        if !path.exists() {
            bail!("配置文件不存在: {}", path.display());
        }
        let config = load(&path)?;

        println!("✅ 配置有效: {}", path.display());
        println!("  位置拖拽系数: {}", config.drag.position_factor);
        println!("  姿态拖拽系数: {}", config.drag.orientation_factor);
        println!("  通知队列容量: {}", config.notifications.channel_capacity);
        Ok(())
    }
}
