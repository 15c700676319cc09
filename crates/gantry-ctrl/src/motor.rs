//! 电机控制器
//!
//! 在 [`Motor`] 设备之上实现运动状态机：
//!
//! - 每个控制器同一时刻最多一个进行中的操作，占用 `work` 时领取一个 [`WorkToken`]，
//!   第二个请求直接返回 [`MotionError::MotorRunning`]，不排队
//! - `stop()` 作废当前凭证；被作废的操作不会再触碰设备、目标方向或 `work`，
//!   即使新的操作已经领取了新凭证
//! - 阻塞操作在调用方线程上以 `poll_interval` 轮询设备状态，每轮检查凭证和限位
//! - 任意路径退出后目标方向回到 `Stop`，`work` 被清除

use crate::config::MotorControllerConfig;
use crate::error::{MotionError, Result};
use crate::events::{
    EventSource, MotorErrorEvent, MotorEventListener, MotorMoveEvent, MotorRollEvent,
};
use crate::mode::{AtomicMoveType, MoveType};
use crate::usage::UsageCounter;
use gantry_device::{Device, DeviceId, Motor, Power, TrailerId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, trace, warn};

/// 一次 `work` 占用的凭证
///
/// 由 [`MotorController::async_move`] 返回，传回
/// [`poll_claim`](MotorController::poll_claim) 和
/// [`async_stop`](MotorController::async_stop)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkToken(u64);

/// 电机控制器
///
/// 控制器持有设备的共享句柄，不决定设备寿命。所有方法都只需要 `&self`，
/// 因此控制器本身可以放在 `Arc` 中跨线程共享；[`stop`](Self::stop) 可从任意线程调用。
pub struct MotorController {
    motor: Arc<dyn Motor>,
    config: MotorControllerConfig,
    destination: AtomicMoveType,
    /// 当前凭证编号，0 表示空闲
    work: AtomicU64,
    next_token: AtomicU64,
    /// 串行化占用、释放、取消以及凭证持有者对设备的操作
    transition: Mutex<()>,
    listeners: EventSource<dyn MotorEventListener>,
    usage: UsageCounter,
}

/// `work` 占用凭证的持有者
///
/// Drop 时若凭证仍然有效，把目标方向恢复为 `Stop` 并释放 `work`。两阶段异步运动通过
/// [`keep`](Self::keep) 把释放推迟到 `async_stop`。
struct WorkGuard<'a> {
    controller: &'a MotorController,
    token: WorkToken,
    armed: bool,
}

impl WorkGuard<'_> {
    fn token(&self) -> WorkToken {
        self.token
    }

    fn keep(mut self) -> WorkToken {
        self.armed = false;
        self.token
    }
}

impl Drop for WorkGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.release(self.token);
        }
    }
}

impl MotorController {
    pub fn new(motor: Arc<dyn Motor>, config: MotorControllerConfig) -> Self {
        Self {
            motor,
            config,
            destination: AtomicMoveType::new(MoveType::Stop),
            work: AtomicU64::new(0),
            next_token: AtomicU64::new(1),
            transition: Mutex::new(()),
            listeners: EventSource::new(),
            usage: UsageCounter::new(),
        }
    }

    /// 使用设备自身附带的配置目录构造
    pub fn from_device(motor: Arc<dyn Motor>) -> Self {
        let config = MotorControllerConfig::from_catalogue(&motor.config());
        Self::new(motor, config)
    }

    pub fn motor(&self) -> &Arc<dyn Motor> {
        &self.motor
    }

    pub fn id(&self) -> DeviceId {
        self.motor.id()
    }

    pub fn config(&self) -> &MotorControllerConfig {
        &self.config
    }

    pub fn position(&self) -> i64 {
        self.motor.position()
    }

    pub fn power_state(&self) -> Power {
        self.motor.power_state()
    }

    pub fn is_trailer_pressed(&self, trailer: TrailerId) -> bool {
        self.motor.is_trailer_pressed(trailer)
    }

    /// 设备是否在运动
    pub fn is_moving(&self) -> bool {
        self.motor.is_running()
    }

    /// 是否有进行中的操作
    pub fn is_working(&self) -> bool {
        self.work.load(Ordering::Acquire) != 0
    }

    /// `token` 是否仍是当前有效的凭证
    pub fn holds_claim(&self, token: WorkToken) -> bool {
        self.work.load(Ordering::Acquire) == token.0
    }

    /// 当前目标方向
    pub fn destination(&self) -> MoveType {
        self.destination.get(Ordering::Acquire)
    }

    // ---------------------------------------------------------------
    // 供电
    // ---------------------------------------------------------------

    pub fn enable_power(&self, enable: bool) -> Result<()> {
        self.motor.enable_power(enable).map_err(|e| {
            error!(device = self.id(), "enable_power({}) rejected: {}", enable, e);
            MotionError::from(e)
        })
    }

    /// 切换供电：未上电则上电，否则断电
    pub fn flip_power(&self) -> Result<()> {
        self.enable_power(self.power_state() == Power::NoPower)
    }

    // ---------------------------------------------------------------
    // 阻塞运动
    // ---------------------------------------------------------------

    /// 运动到绝对位置，阻塞直到完成、限位触发或被 `stop()` 取消
    pub fn start_move(&self, dest: i64, speed: f32) -> Result<()> {
        let guard = self.claim()?;
        self.run_move(guard.token(), dest, speed)
    }

    /// 相对当前位置运动
    pub fn start_relative_move(&self, delta: i64, speed: f32) -> Result<()> {
        self.start_move(self.position() + delta, speed)
    }

    /// 向限位翻滚直到触发，然后回退 `trailer_comeback`
    ///
    /// `rolling` 事件在开始前发出，`rolled` 事件在所有路径上都会发出。
    /// 被 `stop()` 取消时跳过回退，返回 [`MotionError::Stopped`]。
    pub fn move_to_trailer(&self, trailer: TrailerId) -> Result<()> {
        let guard = self.claim()?;
        let token = guard.token();

        let event = MotorRollEvent { trailer };
        self.with_claim(token, || {
            self.destination
                .set(MoveType::roll_toward(trailer), Ordering::Release);
            Ok(())
        })?;
        self.listeners.emit("rolling", |l| l.rolling(&event));
        debug!(device = self.id(), %trailer, "Rolling to trailer");

        let result = self.roll_to(token, trailer);

        self.listeners.emit("rolled", |l| l.rolled(&event));
        result
    }

    // ---------------------------------------------------------------
    // 两阶段异步运动
    // ---------------------------------------------------------------

    /// 发出运动指令后立即返回本次占用的凭证
    ///
    /// 前置条件与 [`start_move`](Self::start_move) 相同。成功后 `work` 保持占用，
    /// 调用方负责用凭证轮询 [`poll_claim`](Self::poll_claim) 并以
    /// [`async_stop`](Self::async_stop) 结束。`is_calibration` 为 true 时发出
    /// `rolling` 事件而不是 `moving`。
    pub fn async_move(&self, dest: i64, speed: f32, is_calibration: bool) -> Result<WorkToken> {
        let guard = self.claim()?;

        let direction = MoveType::toward(dest, self.position());
        if is_calibration {
            let event = MotorRollEvent {
                trailer: direction.trailer().unwrap_or(TrailerId::Trailer1),
            };
            self.listeners.emit("rolling", |l| l.rolling(&event));
        } else {
            let event = MotorMoveEvent {
                destination: dest,
                speed,
            };
            self.listeners.emit("moving", |l| l.moving(&event));
        }

        match self.start_claimed(guard.token(), direction, dest, speed) {
            Ok(()) => Ok(guard.keep()),
            Err(error) => {
                error!(device = self.id(), "async start rejected: {}", error);
                self.emit_stopped(&error);
                Err(error)
            },
        }
    }

    pub fn async_relative_move(
        &self,
        delta: i64,
        speed: f32,
        is_calibration: bool,
    ) -> Result<WorkToken> {
        self.async_move(self.position() + delta, speed, is_calibration)
    }

    /// 结束一次异步运动
    ///
    /// 根据 `result` 发出 `stopped` / `moved` / `rolled` 事件。凭证仍然有效时停止设备，
    /// 清除目标方向和 `work`；凭证已被 `stop()` 作废时不再触碰设备。
    /// 返回 `result`；若结果为成功但设备停止失败，返回该失败。
    pub fn async_stop(
        &self,
        token: WorkToken,
        result: Result<()>,
        dest: i64,
        speed: f32,
        is_calibration: bool,
    ) -> Result<()> {
        match &result {
            Err(error) => self.emit_stopped(error),
            Ok(()) if is_calibration => {
                let trailer = self
                    .destination()
                    .trailer()
                    .unwrap_or(if dest > self.position() {
                        TrailerId::Trailer2
                    } else {
                        TrailerId::Trailer1
                    });
                let event = MotorRollEvent { trailer };
                self.listeners.emit("rolled", |l| l.rolled(&event));
            },
            Ok(()) => {
                let event = MotorMoveEvent {
                    destination: dest,
                    speed,
                };
                self.listeners.emit("moved", |l| l.moved(&event));
            },
        }

        let stop_result = {
            let _transition = self.transition.lock();
            if self.holds_claim(token) {
                self.destination.set(MoveType::Stop, Ordering::Release);
                let stop_result = self.motor.stop();
                self.work.store(0, Ordering::Release);
                stop_result
            } else {
                trace!(device = self.id(), "Claim already revoked, leaving device alone");
                Ok(())
            }
        };

        match (result, stop_result) {
            (Err(e), _) => Err(e),
            (Ok(()), Err(e)) => Err(MotionError::from(e)),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    // ---------------------------------------------------------------
    // 互锁与取消
    // ---------------------------------------------------------------

    /// 检查当前方向上的限位
    ///
    /// 设备未运动时不做任何事。限位触发时停止设备、清除目标方向，
    /// 返回对应的 `Trailer{1,2}Pressed`。
    pub fn check_trailers(&self) -> Result<()> {
        if !self.motor.is_running() {
            return Ok(());
        }

        let trailer = match self.destination() {
            MoveType::MoveUp => TrailerId::Trailer2,
            MoveType::MoveDown => TrailerId::Trailer1,
            _ => return Ok(()),
        };
        if !self.motor.is_trailer_pressed(trailer) {
            return Ok(());
        }

        warn!(
            device = self.id(),
            position = self.position(),
            %trailer,
            "Trailer pressed, stopping motor"
        );
        let stop_result = self.motor.stop();
        self.destination.set(MoveType::Stop, Ordering::Release);
        stop_result?;
        Err(MotionError::trailer_pressed(trailer))
    }

    /// 凭证持有者的一轮轮询
    ///
    /// 凭证已被作废时返回 [`MotionError::Stopped`]；否则检查限位，
    /// 返回设备是否仍在运动。检查与 `stop()` 互斥，不会作用到后来者的运动上。
    pub fn poll_claim(&self, token: WorkToken) -> Result<bool> {
        self.with_claim(token, || {
            self.check_trailers()?;
            Ok(self.motor.is_running())
        })
    }

    /// 取消当前操作
    ///
    /// 清除目标方向、停止设备、作废当前凭证并释放 `work`。非阻塞、幂等，可从任意线程调用。
    pub fn stop(&self) {
        let _transition = self.transition.lock();
        self.destination.set(MoveType::Stop, Ordering::Release);
        if let Err(e) = self.motor.stop() {
            warn!(device = self.id(), "stop rejected by device: {}", e);
        }
        self.work.store(0, Ordering::Release);
    }

    // ---------------------------------------------------------------
    // 使用标记与监听器
    // ---------------------------------------------------------------

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

    pub fn add_event_listener(&self, listener: Arc<dyn MotorEventListener>) {
        self.listeners.add_listener(listener);
    }

    pub fn remove_event_listener(&self, listener: &Arc<dyn MotorEventListener>) -> bool {
        self.listeners.remove_listener(listener)
    }

    // ---------------------------------------------------------------
    // 内部实现
    // ---------------------------------------------------------------

    /// 原子地占用 `work` 并领取新凭证
    ///
    /// 顺序：已有操作 / 设备在运动 -> `MotorRunning`；未上电 -> `PowerOff`。
    fn claim(&self) -> Result<WorkGuard<'_>> {
        let _transition = self.transition.lock();
        if self.is_working() || self.motor.is_running() {
            return Err(MotionError::MotorRunning);
        }
        if self.motor.power_state() == Power::NoPower {
            return Err(MotionError::PowerOff);
        }
        let token = WorkToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.work.store(token.0, Ordering::Release);
        Ok(WorkGuard {
            controller: self,
            token,
            armed: true,
        })
    }

    /// 凭证有效时释放 `work`
    fn release(&self, token: WorkToken) {
        let _transition = self.transition.lock();
        if self.holds_claim(token) {
            self.destination.set(MoveType::Stop, Ordering::Release);
            self.work.store(0, Ordering::Release);
        }
    }

    /// 在凭证有效的前提下执行 `f`，与 `stop()` 和其他占用变化互斥
    fn with_claim<T>(&self, token: WorkToken, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _transition = self.transition.lock();
        if !self.holds_claim(token) {
            return Err(MotionError::Stopped);
        }
        f()
    }

    /// 设置目标方向并发出运动指令
    fn start_claimed(
        &self,
        token: WorkToken,
        direction: MoveType,
        dest: i64,
        speed: f32,
    ) -> Result<()> {
        self.with_claim(token, || {
            self.destination.set(direction, Ordering::Release);
            self.motor.start(dest, speed).map_err(MotionError::from)
        })
    }

    /// 已占用 `work` 的阻塞运动
    fn run_move(&self, token: WorkToken, dest: i64, speed: f32) -> Result<()> {
        let event = MotorMoveEvent {
            destination: dest,
            speed,
        };
        self.listeners.emit("moving", |l| l.moving(&event));
        trace!(device = self.id(), dest, speed, "Move started");

        let result = self
            .start_claimed(token, MoveType::toward(dest, self.position()), dest, speed)
            .and_then(|()| self.wait_while_running(token));

        match &result {
            Ok(()) => self.listeners.emit("moved", |l| l.moved(&event)),
            Err(error) => {
                debug!(device = self.id(), dest, "Move ended with error: {}", error);
                self.emit_stopped(error);
            },
        }
        let _ = self.with_claim(token, || {
            self.destination.set(MoveType::Stop, Ordering::Release);
            Ok(())
        });
        result
    }

    fn wait_while_running(&self, token: WorkToken) -> Result<()> {
        while self.poll_claim(token)? {
            std::thread::sleep(self.config.poll_interval);
        }
        Ok(())
    }

    /// 翻滚到限位并回退
    fn roll_to(&self, token: WorkToken, trailer: TrailerId) -> Result<()> {
        let step = match trailer {
            TrailerId::Trailer1 => -self.config.roll_step,
            TrailerId::Trailer2 => self.config.roll_step,
        };

        loop {
            let reached = self.with_claim(token, || {
                if self.motor.is_trailer_pressed(trailer) {
                    self.motor.stop()?;
                    self.destination.set(MoveType::Stop, Ordering::Release);
                    return Ok(true);
                }
                if !self.motor.is_running() {
                    if self.motor.power_state() == Power::NoPower {
                        if let Err(e) = self.motor.stop() {
                            warn!(device = self.id(), "stop rejected by device: {}", e);
                        }
                        return Err(MotionError::PowerOff);
                    }
                    self.motor
                        .start(self.position() + step, self.config.roll_speed)
                        .map_err(|e| {
                            error!(device = self.id(), "roll step rejected: {}", e);
                            MotionError::from(e)
                        })?;
                }
                Ok(false)
            });
            match reached {
                Ok(true) => break,
                Ok(false) => std::thread::sleep(self.config.poll_interval),
                Err(MotionError::Stopped) => {
                    debug!(device = self.id(), %trailer, "Roll cancelled, skipping comeback");
                    return Err(MotionError::Stopped);
                },
                Err(e) => return Err(e),
            }
        }

        let comeback = match trailer {
            TrailerId::Trailer1 => self.config.trailer_comeback,
            TrailerId::Trailer2 => -self.config.trailer_comeback,
        };
        debug!(
            device = self.id(),
            %trailer,
            position = self.position(),
            comeback,
            "Trailer reached, coming back"
        );
        self.run_move(token, self.position() + comeback, self.config.roll_speed)
    }

    fn emit_stopped(&self, error: &MotionError) {
        let event = MotorErrorEvent {
            error: error.clone(),
        };
        self.listeners.emit("stopped", |l| l.stopped(&event));
    }
}

impl std::fmt::Debug for MotorController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotorController")
            .field("id", &self.id())
            .field("destination", &self.destination())
            .field("work", &self.is_working())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
