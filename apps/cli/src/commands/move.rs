//! 直线移动命令

use crate::session::Session;
use crate::utils::parse_point;
use anyhow::{Context, Result};
use clap::Args;
use gantry_sdk::prelude::*;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标点（步），例如：600,300
    #[arg(value_parser = parse_point, allow_hyphen_values = true)]
    pub to: MotorPoint,

    /// 速度（步/秒）
    #[arg(short, long, default_value_t = 1000.0)]
    pub speed: f32,

    /// 两轴各自全速运动，不按位移比例分配速度
    #[arg(long)]
    pub no_sync: bool,

    /// 目标点相对当前位置
    #[arg(short, long)]
    pub relative: bool,
}

impl MoveCommand {
    pub fn target(&self, current: MotorPoint) -> MotorPoint {
        if self.relative {
            current + self.to
        } else {
            self.to
        }
    }

    pub fn execute(&self, session: &Session) -> Result<()> {
        let plane = session.plane();
        let dest = self.target(plane.position());
        println!("移动到 {dest}，速度 {}", self.speed);
        plane
            .move_to(dest, self.speed, !self.no_sync)
            .with_context(|| format!("Move to {dest} failed"))?;
        println!("✅ 到达 {}", plane.position());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(relative: bool) -> MoveCommand {
        MoveCommand {
            to: MotorPoint::new(100, -50),
            speed: 1000.0,
            no_sync: false,
            relative,
        }
    }

    #[test]
    fn test_absolute_target() {
        assert_eq!(command(false).target(MotorPoint::new(10, 10)), MotorPoint::new(100, -50));
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(command(true).target(MotorPoint::new(10, 10)), MotorPoint::new(110, -40));
    }
}
