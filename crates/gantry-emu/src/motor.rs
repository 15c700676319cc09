//! 模拟电机
//!
//! 每个 [`EmuMotor`] 拥有一个后台时钟线程。每个周期位置向目标推进
//! `min(剩余距离, step_per_tick(speed))` 步，剩余距离不足一步时直接到位。

use crate::config::EmuConfig;
use gantry_config::ConfigurationCatalogue;
use gantry_device::{
    Device, DeviceCore, DeviceError, DeviceErrorKind, DeviceId, DeviceKind, Motor, Power,
    Result, TrailerId,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, AtomicU32, Ordering};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, trace};

/// 单轴的共享状态（时钟线程与调用方之间）
#[derive(Debug)]
struct EmuAxis {
    position: AtomicI64,
    destination: AtomicI64,
    /// f32 位模式
    speed: AtomicU32,
    power: AtomicU8,
    /// 冻结时钟（模拟卡死的后端）
    stalled: AtomicBool,
    terminated: AtomicBool,
    /// 时钟推进与 start / stop 互斥，避免 stop 之后又被推进一步
    motion: Mutex<()>,
}

impl EmuAxis {
    fn new() -> Self {
        Self {
            position: AtomicI64::new(0),
            destination: AtomicI64::new(0),
            speed: AtomicU32::new(0f32.to_bits()),
            power: AtomicU8::new(Power::NoPower as u8),
            stalled: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            motion: Mutex::new(()),
        }
    }

    fn tick(&self, config: &EmuConfig) {
        if self.stalled.load(Ordering::Acquire) {
            return;
        }

        let _motion = self.motion.lock();
        let position = self.position.load(Ordering::Acquire);
        let destination = self.destination.load(Ordering::Acquire);
        if position == destination {
            return;
        }

        let speed = f32::from_bits(self.speed.load(Ordering::Relaxed));
        let step = config.step_per_tick(speed);
        let remaining = destination - position;

        let next = if remaining.abs() <= step {
            destination
        } else {
            position + step * remaining.signum()
        };
        self.position.store(next, Ordering::Release);
    }
}

/// 模拟电机
///
/// - `is_running()` 等价于 `position != destination`
/// - `stop()` 把目标设为当前位置
/// - 限位：`position <= -size/2` 为 Trailer1，`position >= size/2` 为 Trailer2
/// - 供电：`enable_power(true)` 为 HalfPower，`start` 提升到 FullPower；
///   未上电时 `start` 被接受但不产生运动
pub struct EmuMotor {
    core: DeviceCore,
    config: EmuConfig,
    axis: Arc<EmuAxis>,
    /// 时钟线程运行标志
    is_running: Arc<AtomicBool>,
    clock: Option<JoinHandle<()>>,
}

impl EmuMotor {
    /// 创建模拟电机并启动时钟线程
    pub fn new(id: DeviceId, config: EmuConfig) -> std::io::Result<Self> {
        Self::with_catalogue(id, config, ConfigurationCatalogue::new())
    }

    /// 创建模拟电机，并把配置目录附加到设备上
    pub fn with_catalogue(
        id: DeviceId,
        config: EmuConfig,
        catalogue: ConfigurationCatalogue,
    ) -> std::io::Result<Self> {
        let axis = Arc::new(EmuAxis::new());
        let is_running = Arc::new(AtomicBool::new(true));

        let axis_clone = axis.clone();
        let is_running_clone = is_running.clone();
        let config_clone = config.clone();
        let clock = Builder::new()
            .name(format!("emu-motor-{id}"))
            .spawn(move || clock_loop(id, axis_clone, config_clone, is_running_clone))?;

        debug!(device = id, size = config.motor_size, tick_hz = config.tick_hz, "Emu motor started");

        Ok(Self {
            core: DeviceCore::with_config(id, DeviceKind::Motor, catalogue),
            config,
            axis,
            is_running,
            clock: Some(clock),
        })
    }

    pub fn emu_config(&self) -> &EmuConfig {
        &self.config
    }

    pub fn destination(&self) -> i64 {
        self.axis.destination.load(Ordering::Acquire)
    }

    /// 冻结或恢复时钟推进（测试用：模拟不响应的后端）
    pub fn set_stalled(&self, stalled: bool) {
        self.axis.stalled.store(stalled, Ordering::Release);
    }

    /// 直接设置位置（测试用）
    pub fn set_position(&self, position: i64) {
        let _motion = self.axis.motion.lock();
        self.axis.position.store(position, Ordering::Release);
        self.axis.destination.store(position, Ordering::Release);
    }

    fn check_terminated(&self) -> Result<()> {
        if self.axis.terminated.load(Ordering::Acquire) {
            return Err(DeviceError::rejected(
                self.id(),
                DeviceErrorKind::Disconnected,
                "motor terminated",
            ));
        }
        Ok(())
    }
}

/// 时钟线程主循环
fn clock_loop(id: DeviceId, axis: Arc<EmuAxis>, config: EmuConfig, is_running: Arc<AtomicBool>) {
    let period = Duration::from_secs_f64(1.0 / f64::from(config.tick_hz.max(1)));

    loop {
        // Acquire: 看到 false 时必须能看到之前所有的清理写入
        if !is_running.load(Ordering::Acquire) {
            trace!("Emu motor #{} clock: is_running flag is false, exiting", id);
            break;
        }

        axis.tick(&config);
        spin_sleep::sleep(period);
    }

    trace!("Emu motor #{} clock loop exited", id);
}

impl Device for EmuMotor {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn device_info(&self) -> String {
        format!(
            "Emulated motor #{} (travel {} steps, {} Hz)",
            self.id(),
            self.config.motor_size,
            self.config.tick_hz
        )
    }

    fn runtime_info(&self) -> String {
        format!(
            "position={} destination={} power={:?}",
            self.position(),
            self.destination(),
            self.power_state()
        )
    }

    fn terminate(&self) {
        let _motion = self.axis.motion.lock();
        let position = self.axis.position.load(Ordering::Acquire);
        self.axis.destination.store(position, Ordering::Release);
        self.axis.terminated.store(true, Ordering::Release);
        self.is_running.store(false, Ordering::Release);
        debug!(device = self.id(), position, "Emu motor terminated");
    }
}

impl Motor for EmuMotor {
    fn position(&self) -> i64 {
        self.axis.position.load(Ordering::Acquire)
    }

    fn is_trailer_pressed(&self, trailer: TrailerId) -> bool {
        let position = self.position();
        let half = self.config.motor_size / 2;
        match trailer {
            TrailerId::Trailer1 => position <= -half,
            TrailerId::Trailer2 => position >= half,
        }
    }

    fn is_running(&self) -> bool {
        self.axis.position.load(Ordering::Acquire) != self.axis.destination.load(Ordering::Acquire)
    }

    fn power_state(&self) -> Power {
        Power::from_u8(self.axis.power.load(Ordering::Acquire))
    }

    fn enable_power(&self, enable: bool) -> Result<()> {
        self.check_terminated()?;
        let power = if enable { Power::HalfPower } else { Power::NoPower };
        self.axis.power.store(power as u8, Ordering::Release);
        Ok(())
    }

    fn start(&self, dest: i64, speed: f32) -> Result<()> {
        self.check_terminated()?;
        if self.power_state() == Power::NoPower {
            return Ok(());
        }
        let _motion = self.axis.motion.lock();
        self.axis.power.store(Power::FullPower as u8, Ordering::Release);
        self.axis.speed.store(speed.to_bits(), Ordering::Relaxed);
        self.axis.destination.store(dest, Ordering::Release);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let _motion = self.axis.motion.lock();
        let position = self.axis.position.load(Ordering::Acquire);
        self.axis.destination.store(position, Ordering::Release);
        Ok(())
    }
}

impl Drop for EmuMotor {
    fn drop(&mut self) {
        self.is_running.store(false, Ordering::Release);
        if let Some(handle) = self.clock.take()
            && handle.join().is_err()
        {
            error!("Emu motor #{} clock thread panicked", self.core.id());
        }
    }
}
