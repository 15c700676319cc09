//! 模拟仪器
//!
//! 会话策略：会话未打开时拒绝 `enable(true)` 和模式切换，并把故障写入设备错误队列。
//! 每条被接受的命令都会发送到命令日志 channel，供测试或 UI 检查。

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use gantry_config::ConfigurationCatalogue;
use gantry_device::{
    Device, DeviceCore, DeviceError, DeviceErrorKind, DeviceId, DeviceKind, Instrument,
    InstrumentMode, Result,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// 命令日志容量
const COMMAND_LOG_CAPACITY: usize = 1024;

/// 模拟仪器接受的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentCommand {
    OpenSession,
    CloseSession,
    Enable(bool),
    SetMode(InstrumentMode),
}

#[derive(Debug, Default)]
struct InstrumentState {
    session: bool,
    enabled: bool,
    mode: InstrumentMode,
}

/// 模拟仪器
pub struct EmuInstrument {
    core: DeviceCore,
    state: Mutex<InstrumentState>,
    terminated: AtomicBool,
    log_tx: Sender<InstrumentCommand>,
    log_rx: Receiver<InstrumentCommand>,
}

impl EmuInstrument {
    pub fn new(id: DeviceId) -> Self {
        Self::with_catalogue(id, ConfigurationCatalogue::new())
    }

    pub fn with_catalogue(id: DeviceId, catalogue: ConfigurationCatalogue) -> Self {
        let (log_tx, log_rx) = bounded(COMMAND_LOG_CAPACITY);
        Self {
            core: DeviceCore::with_config(id, DeviceKind::Instrument, catalogue),
            state: Mutex::new(InstrumentState::default()),
            terminated: AtomicBool::new(false),
            log_tx,
            log_rx,
        }
    }

    /// 命令日志接收端（多个接收端共享同一队列）
    pub fn command_log(&self) -> Receiver<InstrumentCommand> {
        self.log_rx.clone()
    }

    fn record(&self, command: InstrumentCommand) {
        // 日志满时丢弃最新命令，不阻塞调用方
        if let Err(TrySendError::Full(command)) = self.log_tx.try_send(command) {
            debug!(device = self.id(), ?command, "Instrument command log full, dropping");
        }
    }

    fn reject(&self, kind: DeviceErrorKind, message: &str) -> DeviceError {
        self.core.push_error(message);
        DeviceError::rejected(self.id(), kind, message)
    }

    fn check_terminated(&self) -> Result<()> {
        if self.terminated.load(Ordering::Acquire) {
            return Err(self.reject(DeviceErrorKind::Disconnected, "instrument terminated"));
        }
        Ok(())
    }
}

impl Device for EmuInstrument {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn device_info(&self) -> String {
        format!("Emulated instrument #{}", self.id())
    }

    fn runtime_info(&self) -> String {
        let state = self.state.lock();
        format!(
            "session={} enabled={} mode={:?}",
            state.session, state.enabled, state.mode
        )
    }

    fn terminate(&self) {
        let mut state = self.state.lock();
        state.enabled = false;
        state.session = false;
        self.terminated.store(true, Ordering::Release);
        warn!(device = self.id(), "Emu instrument terminated");
    }
}

impl Instrument for EmuInstrument {
    fn open_session(&self) -> Result<()> {
        self.check_terminated()?;
        self.state.lock().session = true;
        self.record(InstrumentCommand::OpenSession);
        Ok(())
    }

    fn close_session(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            state.enabled = false;
            state.session = false;
        }
        self.record(InstrumentCommand::CloseSession);
        Ok(())
    }

    fn is_session_opened(&self) -> bool {
        self.state.lock().session
    }

    fn enable(&self, enable: bool) -> Result<()> {
        self.check_terminated()?;
        let mut state = self.state.lock();
        if enable && !state.session {
            drop(state);
            return Err(self.reject(
                DeviceErrorKind::SessionClosed,
                "cannot enable instrument: session is not opened",
            ));
        }
        state.enabled = enable;
        drop(state);
        self.record(InstrumentCommand::Enable(enable));
        Ok(())
    }

    fn enabled(&self) -> bool {
        self.state.lock().enabled
    }

    fn working_mode(&self) -> InstrumentMode {
        self.state.lock().mode
    }

    fn set_working_mode(&self, mode: InstrumentMode) -> Result<()> {
        self.check_terminated()?;
        let mut state = self.state.lock();
        if !state.session {
            drop(state);
            return Err(self.reject(
                DeviceErrorKind::SessionClosed,
                "cannot change working mode: session is not opened",
            ));
        }
        state.mode = mode;
        drop(state);
        self.record(InstrumentCommand::SetMode(mode));
        Ok(())
    }
}
