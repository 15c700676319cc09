//! 单次会话：加载配置、连接模拟机台、组装平面栈
//!
//! 每条命令都是 连接 -> 执行 -> 断开。

use anyhow::{Context, Result};
use gantry_sdk::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub struct Session {
    manager: EmuDeviceManager,
    rig: Rig,
    stack: CoordPlaneStack,
}

impl Session {
    /// 打开会话；`config` 为空时使用内置默认值
    pub fn open(config: Option<&Path>, with_instrument: bool) -> Result<Self> {
        let catalogue = match config {
            Some(path) => load_catalogue(path)?,
            None => ConfigurationCatalogue::new(),
        };

        let manager =
            EmuDeviceManager::with_catalogue(EmuConfig::from_catalogue(&catalogue), catalogue.clone());
        let rig = Rig::connect(
            &manager,
            &DeviceConnectionParams::default(),
            with_instrument,
            &catalogue,
        )
        .context("Failed to connect emulated rig")?;
        rig.enable_power(true).context("Failed to enable motor power")?;

        let stack = rig.stack(&catalogue);
        info!(layers = ?stack.layers(), "Session opened");
        Ok(Self {
            manager,
            rig,
            stack,
        })
    }

    pub fn plane(&self) -> &CoordPlaneStack {
        &self.stack
    }

    /// Ctrl-C 时停止当前运动
    pub fn install_stop_handler(&self) -> Result<()> {
        let handle = self.stack.stop_handle();
        ctrlc::set_handler(move || {
            eprintln!("\n收到中断信号，正在停止...");
            handle.stop();
        })
        .context("Failed to install Ctrl-C handler")
    }

    /// 打印最终状态和设备错误队列
    pub fn report(&self) {
        println!("位置: {}", self.stack.position());
        if let Ok(size) = self.stack.size() {
            println!("范围: {size:?}");
        }
        println!("功率: X={:?} Y={:?}", self.rig.x().power_state(), self.rig.y().power_state());
        while let Some(error) = self.manager.poll_error() {
            warn!("Device error: {error}");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.manager.terminate();
    }
}

fn load_catalogue(path: &Path) -> Result<ConfigurationCatalogue> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    ConfigurationCatalogue::from_toml_str(&source)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
