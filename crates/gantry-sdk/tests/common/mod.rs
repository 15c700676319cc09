//! 集成测试共用的模拟设备与事件记录器

#![allow(dead_code)]

use crossbeam_channel::{Receiver, Sender, unbounded};
use gantry_sdk::ctrl::events::{
    InstrumentEventListener, MotorErrorEvent, MotorEventListener, MotorMoveEvent, MotorRollEvent,
};
use gantry_sdk::device::{
    Device, DeviceCore, DeviceId, DeviceKind, Instrument, InstrumentMode, Motor, Power, Result,
    TrailerId,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};

/// 瞬时到位的电机
///
/// - 行程为 `[min, max]`，到达端点即按下对应限位
/// - 目标越过限位时停在限位上并保持运行，交给控制器的互锁处理
/// - `hold` 为 true 时 `start` 后一直运行，直到 `stop`
pub struct MockMotor {
    core: DeviceCore,
    position: AtomicI64,
    power: AtomicU8,
    running: AtomicBool,
    pub hold: AtomicBool,
    min: i64,
    max: i64,
    starts: Mutex<Vec<(i64, f32)>>,
}

impl MockMotor {
    pub fn new(id: DeviceId, min: i64, max: i64) -> Self {
        Self {
            core: DeviceCore::new(id, DeviceKind::Motor),
            position: AtomicI64::new(0),
            power: AtomicU8::new(Power::HalfPower as u8),
            running: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            min,
            max,
            starts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_position(&self, position: i64) {
        self.position.store(position, Ordering::SeqCst);
    }

    /// 已收到的 `start(dest, speed)` 调用
    pub fn starts(&self) -> Vec<(i64, f32)> {
        self.starts.lock().clone()
    }
}

impl Device for MockMotor {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn device_info(&self) -> String {
        format!("mock motor [{}, {}]", self.min, self.max)
    }

    fn terminate(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Motor for MockMotor {
    fn position(&self) -> i64 {
        self.position.load(Ordering::SeqCst)
    }

    fn is_trailer_pressed(&self, trailer: TrailerId) -> bool {
        match trailer {
            TrailerId::Trailer1 => self.position() <= self.min,
            TrailerId::Trailer2 => self.position() >= self.max,
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn power_state(&self) -> Power {
        Power::from_u8(self.power.load(Ordering::SeqCst))
    }

    fn enable_power(&self, enable: bool) -> Result<()> {
        let power = if enable { Power::HalfPower } else { Power::NoPower };
        self.power.store(power as u8, Ordering::SeqCst);
        Ok(())
    }

    fn start(&self, dest: i64, speed: f32) -> Result<()> {
        self.starts.lock().push((dest, speed));
        if self.hold.load(Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
            return Ok(());
        }
        let clamped = dest.clamp(self.min, self.max);
        self.position.store(clamped, Ordering::SeqCst);
        self.running.store(clamped != dest, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MockInstrumentState {
    session: bool,
    enabled: bool,
    mode: InstrumentMode,
}

/// 宽松的仪器：不需要会话也可以打开
pub struct MockInstrument {
    core: DeviceCore,
    state: Mutex<MockInstrumentState>,
}

impl MockInstrument {
    pub fn new(id: DeviceId) -> Self {
        Self {
            core: DeviceCore::new(id, DeviceKind::Instrument),
            state: Mutex::new(MockInstrumentState::default()),
        }
    }
}

impl Device for MockInstrument {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn device_info(&self) -> String {
        "mock instrument".to_string()
    }

    fn terminate(&self) {
        self.state.lock().enabled = false;
    }
}

impl Instrument for MockInstrument {
    fn open_session(&self) -> Result<()> {
        self.state.lock().session = true;
        Ok(())
    }

    fn close_session(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.session = false;
        state.enabled = false;
        Ok(())
    }

    fn is_session_opened(&self) -> bool {
        self.state.lock().session
    }

    fn enable(&self, enable: bool) -> Result<()> {
        self.state.lock().enabled = enable;
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.state.lock().enabled
    }

    fn working_mode(&self) -> InstrumentMode {
        self.state.lock().mode
    }

    fn set_working_mode(&self, mode: InstrumentMode) -> Result<()> {
        self.state.lock().mode = mode;
        Ok(())
    }
}

/// 把事件转成字符串送入 channel，按顺序检查
pub struct EventRecorder {
    tx: Sender<String>,
}

impl EventRecorder {
    pub fn new() -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn record(&self, event: String) {
        let _ = self.tx.send(event);
    }
}

impl MotorEventListener for EventRecorder {
    fn moving(&self, event: &MotorMoveEvent) {
        self.record(format!("moving {}", event.destination));
    }

    fn moved(&self, event: &MotorMoveEvent) {
        self.record(format!("moved {}", event.destination));
    }

    fn stopped(&self, event: &MotorErrorEvent) {
        self.record(format!("stopped {}", event.error));
    }

    fn rolling(&self, event: &MotorRollEvent) {
        self.record(format!("rolling {}", event.trailer));
    }

    fn rolled(&self, event: &MotorRollEvent) {
        self.record(format!("rolled {}", event.trailer));
    }

    fn on_use(&self) {
        self.record("use".to_string());
    }

    fn on_unuse(&self) {
        self.record("unuse".to_string());
    }
}

impl InstrumentEventListener for EventRecorder {
    fn state_changed(&self, runnable: bool, enabled: bool) {
        self.record(format!("state runnable={runnable} enabled={enabled}"));
    }

    fn on_use(&self) {
        self.record("use".to_string());
    }

    fn on_unuse(&self) {
        self.record("unuse".to_string());
    }
}

/// 取出 channel 中当前所有事件
pub fn drain(rx: &Receiver<String>) -> Vec<String> {
    rx.try_iter().collect()
}
