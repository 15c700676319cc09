//! 回零 / 测量命令

use crate::session::Session;
use crate::utils::parse_trailer;
use anyhow::{Context, Result};
use clap::Args;
use gantry_sdk::prelude::*;

/// 回零命令参数
#[derive(Args, Debug)]
pub struct CalibrateCommand {
    /// 限位编号：1 或 2
    #[arg(short, long, value_parser = parse_trailer, default_value = "1")]
    pub trailer: TrailerId,

    /// 先到对侧限位，测量可用范围
    #[arg(short, long)]
    pub measure: bool,
}

impl CalibrateCommand {
    pub fn execute(&self, session: &Session) -> Result<()> {
        let plane = session.plane();
        if self.measure {
            println!("测量范围，最终停在 {}", self.trailer);
            plane.measure(self.trailer).context("Measure failed")?;
            println!("✅ 范围 {:?}", plane.size()?);
        } else {
            println!("回零到 {}", self.trailer);
            plane.calibrate(self.trailer).context("Calibrate failed")?;
            println!("✅ 位置 {}", plane.position());
        }
        Ok(())
    }
}
