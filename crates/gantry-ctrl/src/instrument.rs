//! 仪器控制器

use crate::error::{MotionError, Result};
use crate::events::{EventSource, InstrumentEventListener};
use crate::usage::UsageCounter;
use gantry_device::{Device, DeviceId, Instrument, InstrumentMode};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

/// 仪器控制器
///
/// 在仪器之上增加 `runnable` 标志：不可运行的仪器永远不会被真正打开，
/// `enable(true)` 只会把它保持在关闭状态。每次状态变化都发出 `state_changed`。
pub struct InstrumentController {
    instrument: Arc<dyn Instrument>,
    runnable: AtomicBool,
    /// 串行化所有状态变更
    op_lock: Mutex<()>,
    listeners: EventSource<dyn InstrumentEventListener>,
    usage: UsageCounter,
}

impl InstrumentController {
    pub fn new(instrument: Arc<dyn Instrument>) -> Self {
        Self {
            instrument,
            runnable: AtomicBool::new(true),
            op_lock: Mutex::new(()),
            listeners: EventSource::new(),
            usage: UsageCounter::new(),
        }
    }

    pub fn instrument(&self) -> &Arc<dyn Instrument> {
        &self.instrument
    }

    pub fn id(&self) -> DeviceId {
        self.instrument.id()
    }

    pub fn is_session_opened(&self) -> bool {
        self.instrument.is_session_opened()
    }

    pub fn is_enabled(&self) -> bool {
        self.instrument.enabled()
    }

    pub fn is_runnable(&self) -> bool {
        self.runnable.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> InstrumentMode {
        self.instrument.working_mode()
    }

    pub fn open_session(&self) -> Result<()> {
        let _lock = self.op_lock.lock();
        self.open_session_locked()?;
        self.send_state_changed();
        Ok(())
    }

    /// 关闭会话；仍处于打开状态的仪器先被关闭
    pub fn close_session(&self) -> Result<()> {
        let _lock = self.op_lock.lock();
        if self.instrument.is_session_opened() {
            if self.instrument.enabled() {
                self.instrument.enable(false).map_err(|e| self.low_level(e))?;
            }
            self.instrument.close_session().map_err(|e| self.low_level(e))?;
            debug!(device = self.id(), "Instrument session closed");
        }
        self.send_state_changed();
        Ok(())
    }

    /// 打开或关闭仪器
    ///
    /// 实际状态为 `enable && runnable`。需要打开且会话未建立时先自动打开会话。
    pub fn enable(&self, enable: bool) -> Result<()> {
        let _lock = self.op_lock.lock();
        let effective = enable && self.is_runnable();
        if effective != self.instrument.enabled() {
            if effective && !self.instrument.is_session_opened() {
                self.open_session_locked()?;
            }
            self.instrument.enable(effective).map_err(|e| self.low_level(e))?;
        }
        self.send_state_changed();
        Ok(())
    }

    pub fn flip_state(&self) -> Result<()> {
        self.enable(!self.is_enabled())
    }

    pub fn set_runnable(&self, runnable: bool) {
        let _lock = self.op_lock.lock();
        self.runnable.store(runnable, Ordering::Release);
        self.send_state_changed();
    }

    pub fn set_mode(&self, mode: InstrumentMode) -> Result<()> {
        let _lock = self.op_lock.lock();
        self.instrument
            .set_working_mode(mode)
            .map_err(|e| self.low_level(e))?;
        self.send_state_changed();
        Ok(())
    }

    pub fn use_resource(&self) {
        self.usage.acquire();
        self.listeners.emit("on_use", |l| l.on_use());
    }

    pub fn unuse_resource(&self) {
        self.usage.release();
        self.listeners.emit("on_unuse", |l| l.on_unuse());
    }

    pub fn usage_count(&self) -> usize {
        self.usage.count()
    }

    pub fn add_event_listener(&self, listener: Arc<dyn InstrumentEventListener>) {
        self.listeners.add_listener(listener);
    }

    pub fn remove_event_listener(&self, listener: &Arc<dyn InstrumentEventListener>) -> bool {
        self.listeners.remove_listener(listener)
    }

    fn open_session_locked(&self) -> Result<()> {
        if !self.instrument.is_session_opened() {
            self.instrument.open_session().map_err(|e| self.low_level(e))?;
            debug!(device = self.id(), "Instrument session opened");
        }
        Ok(())
    }

    fn send_state_changed(&self) {
        let runnable = self.is_runnable();
        let enabled = self.is_enabled();
        self.listeners
            .emit("state_changed", |l| l.state_changed(runnable, enabled));
    }

    fn low_level(&self, e: gantry_device::DeviceError) -> MotionError {
        error!(device = self.id(), "instrument rejected operation: {}", e);
        MotionError::from(e)
    }
}

impl std::fmt::Debug for InstrumentController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstrumentController")
            .field("id", &self.id())
            .field("runnable", &self.is_runnable())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
