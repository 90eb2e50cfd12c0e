//! 配置管理命令

use crate::config::CliConfig;
use anyhow::{Result, bail};
use clap::Subcommand;
use std::path::Path;

/// 配置管理
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示当前生效的配置
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(&self, config: &CliConfig, path: &Path) -> Result<()> {
        match *self {
            ConfigCommand::Show => {
                println!("# {}", path.display());
                if !path.exists() {
                    println!("# (文件不存在，使用默认配置)");
                }
                print!("{}", config.to_toml()?);
            },
            ConfigCommand::Init { force } => {
                if path.exists() && !force {
                    bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
                }
                CliConfig::default().save(path)?;
                println!("✅ 已写入配置文件: {}", path.display());
            },
        }
        Ok(())
    }
}
