//! # Gantry CLI
//!
//! 在模拟的两轴机台上执行单次运动命令（连接 -> 执行 -> 断开）。
//!
//! ```bash
//! gantry-cli move 600,300 --speed 2000
//! gantry-cli arc 0,1000 --center 0,0 --clockwise
//! gantry-cli --config gantry.toml calibrate --trailer 1 --measure
//! ```
//!
//! 运动过程中按 Ctrl-C 会停止两轴。日志级别由 `RUST_LOG` 控制。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod session;
mod utils;

use commands::{ArcCommand, CalibrateCommand, MoveCommand};
use session::Session;

/// Gantry CLI - 两轴机台命令行工具
#[derive(Parser, Debug)]
#[command(name = "gantry-cli")]
#[command(about = "Command-line interface for an emulated two-axis gantry", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件（TOML）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 同时连接仪器
    #[arg(long, global = true)]
    instrument: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 直线移动到目标点
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 圆弧移动
    Arc {
        #[command(flatten)]
        args: ArcCommand,
    },

    /// 回零到限位，或测量可用范围
    Calibrate {
        #[command(flatten)]
        args: CalibrateCommand,
    },
}

fn main() -> Result<()> {
    gantry_sdk::init_logger();

    let cli = Cli::parse();
    let session = Session::open(cli.config.as_deref(), cli.instrument)?;
    session.install_stop_handler()?;

    let result = match &cli.command {
        Commands::Move { args } => args.execute(&session),
        Commands::Arc { args } => args.execute(&session),
        Commands::Calibrate { args } => args.execute(&session),
    };
    session.report();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::parse_from(["gantry-cli", "move", "600,-300", "--speed", "2000", "-r"]);
        match cli.command {
            Commands::Move { args } => {
                assert_eq!(args.to.x, 600);
                assert_eq!(args.to.y, -300);
                assert_eq!(args.speed, 2000.0);
                assert!(args.relative);
                assert!(!args.no_sync);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::parse_from(["gantry-cli", "calibrate", "--config", "a.toml", "-t", "2", "-m"]);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        match cli.command {
            Commands::Calibrate { args } => {
                assert_eq!(args.trailer, gantry_sdk::device::TrailerId::Trailer2);
                assert!(args.measure);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_arc_defaults() {
        let cli = Cli::parse_from(["gantry-cli", "arc", "0,1000", "--center", "0,0"]);
        match cli.command {
            Commands::Arc { args } => {
                assert!(!args.clockwise);
                assert_eq!(args.ratio, 1.0);
                assert_eq!(args.center.x, 0);
            },
            other => panic!("unexpected command {other:?}"),
        }
    }
}
