//! 圆弧命令

use crate::session::Session;
use crate::utils::parse_point;
use anyhow::{Context, Result};
use clap::Args;
use gantry_sdk::prelude::*;

/// 圆弧命令参数
#[derive(Args, Debug)]
pub struct ArcCommand {
    /// 终点（步）
    #[arg(value_parser = parse_point, allow_hyphen_values = true)]
    pub to: MotorPoint,

    /// 圆心（步）
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub center: MotorPoint,

    /// 顺时针（默认逆时针）
    #[arg(long)]
    pub clockwise: bool,

    /// 速度（步/秒）
    #[arg(short, long, default_value_t = 1000.0)]
    pub speed: f32,

    /// Y/X 比例，1.0 为正圆
    #[arg(long, default_value_t = 1.0)]
    pub ratio: f64,
}

impl ArcCommand {
    pub fn direction(&self) -> ArcDirection {
        if self.clockwise {
            ArcDirection::Clockwise
        } else {
            ArcDirection::CounterClockwise
        }
    }

    pub fn execute(&self, session: &Session) -> Result<()> {
        let plane = session.plane();
        println!(
            "圆弧 {} -> {}，圆心 {}，{:?}",
            plane.position(),
            self.to,
            self.center,
            self.direction()
        );
        plane
            .arc(self.to, self.center, self.direction(), self.speed, true, self.ratio)
            .with_context(|| format!("Arc to {} failed", self.to))?;
        println!("✅ 到达 {}", plane.position());
        Ok(())
    }
}
