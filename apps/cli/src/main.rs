//! # Kobuki CLI
//!
//! Command-line interface for the Kobuki mobile base.
//!
//! 每条命令都是 one-shot：打开串口，执行，退出。
//!
//! ```bash
//! # 生成默认配置，再按需修改串口
//! kobuki-cli config init
//!
//! # 查看传感器反馈
//! kobuki-cli --port /dev/ttyUSB0 monitor --count 100
//!
//! # 原地左转 90°
//! kobuki-cli turn --angle 90
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{
    ConfigCommand, DriveCommand, InfoCommand, MonitorCommand, PidCommand, SoundCommand,
    TurnCommand,
};
use config::CliConfig;

/// Kobuki CLI - 移动底盘命令行工具
#[derive(Parser, Debug)]
#[command(name = "kobuki-cli")]
#[command(about = "Command-line interface for the Kobuki mobile base", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 串口设备（覆盖配置文件）
    #[arg(short, long, global = true)]
    port: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出串口
    Ports,

    /// 监控传感器反馈
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },

    /// 按左右轮速行驶
    Drive {
        #[command(flatten)]
        args: DriveCommand,
    },

    /// 固定半径转弯
    Turn {
        #[command(flatten)]
        args: TurnCommand,
    },

    /// 播放声音
    Sound {
        #[command(flatten)]
        args: SoundCommand,
    },

    /// PID 控制器设置
    #[command(subcommand)]
    Pid(PidCommand),

    /// 查询版本、唯一 ID 和控制器增益
    Info {
        #[command(flatten)]
        args: InfoCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kobuki_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let path = match cli.config {
        Some(path) => path,
        None => CliConfig::default_path()?,
    };
    let config = CliConfig::load(&path)?;
    tracing::debug!("Loaded configuration from {}", path.display());
    let port = cli.port.as_deref();

    match cli.command {
        Commands::Ports => commands::ports::execute(),
        Commands::Monitor { args } => args.execute(&config, port),
        Commands::Drive { args } => args.execute(&config, port),
        Commands::Turn { args } => args.execute(&config, port),
        Commands::Sound { args } => args.execute(&config, port),
        Commands::Pid(cmd) => cmd.execute(&config, port),
        Commands::Info { args } => args.execute(&config, port),
        Commands::Config(cmd) => cmd.execute(&config, &path),
    }
}
