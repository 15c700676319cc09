//! 事件系统
//!
//! 控制器的生命周期事件广播给所有已注册的监听器。
//!
//! - 监听器以 `Arc<dyn ...Listener>` 形式注册，可跨线程共享
//! - 所有回调方法都有默认空实现，监听器只需实现关心的事件
//! - 广播前先复制监听器列表，回调中可以安全地增删监听器
//! - 回调 panic 会被捕获并记录日志，不会中断运动操作
//!
//! # 示例
//!
//! ```rust
//! use gantry_ctrl::events::{MotorEventListener, MotorMoveEvent};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct MoveCounter {
//!     moves: AtomicUsize,
//! }
//!
//! impl MotorEventListener for MoveCounter {
//!     fn moved(&self, _event: &MotorMoveEvent) {
//!         self.moves.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```

use crate::error::MotionError;
use gantry_device::TrailerId;
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::warn;

/// 运动事件：目标与速度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorMoveEvent {
    pub destination: i64,
    pub speed: f32,
}

/// 运动异常结束事件
#[derive(Debug, Clone)]
pub struct MotorErrorEvent {
    pub error: MotionError,
}

/// 回零事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorRollEvent {
    pub trailer: TrailerId,
}

/// 电机控制器事件监听器
pub trait MotorEventListener: Send + Sync {
    /// 运动开始
    fn moving(&self, event: &MotorMoveEvent) {
        let _ = event;
    }

    /// 运动正常完成
    fn moved(&self, event: &MotorMoveEvent) {
        let _ = event;
    }

    /// 运动因错误或取消结束
    fn stopped(&self, event: &MotorErrorEvent) {
        let _ = event;
    }

    /// 回零开始
    fn rolling(&self, event: &MotorRollEvent) {
        let _ = event;
    }

    /// 回零结束（无论成功与否）
    fn rolled(&self, event: &MotorRollEvent) {
        let _ = event;
    }

    fn on_use(&self) {}

    fn on_unuse(&self) {}
}

/// 仪器控制器事件监听器
pub trait InstrumentEventListener: Send + Sync {
    /// 任一状态变化（runnable / enabled / 会话 / 模式）
    fn state_changed(&self, runnable: bool, enabled: bool) {
        let _ = (runnable, enabled);
    }

    fn on_use(&self) {}

    fn on_unuse(&self) {}
}

/// 监听器列表
pub struct EventSource<L: ?Sized> {
    listeners: RwLock<Vec<Arc<L>>>,
}

impl<L: ?Sized> EventSource<L> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn add_listener(&self, listener: Arc<L>) {
        self.listeners.write().push(listener);
    }

    /// 按指针相等移除，返回是否找到
    pub fn remove_listener(&self, listener: &Arc<L>) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
        listeners.len() != before
    }

    pub fn clear(&self) {
        self.listeners.write().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// 把事件广播给所有监听器
    ///
    /// `event` 是事件名，只用于 panic 日志。
    pub fn emit(&self, event: &'static str, f: impl Fn(&L)) {
        let snapshot: Vec<Arc<L>> = self.listeners.read().clone();
        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| f(listener.as_ref()))).is_err() {
                warn!("Event listener panicked while handling '{}', continuing", event);
            }
        }
    }
}

impl<L: ?Sized> Default for EventSource<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        moved: AtomicUsize,
        rolled: AtomicUsize,
    }

    impl MotorEventListener for Counter {
        fn moved(&self, _event: &MotorMoveEvent) {
            self.moved.fetch_add(1, Ordering::SeqCst);
        }

        fn rolled(&self, _event: &MotorRollEvent) {
            self.rolled.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicking;

    impl MotorEventListener for Panicking {
        fn moved(&self, _event: &MotorMoveEvent) {
            panic!("listener bug");
        }
    }

    fn move_event() -> MotorMoveEvent {
        MotorMoveEvent {
            destination: 10,
            speed: 1.0,
        }
    }

    #[test]
    fn test_broadcast_to_all() {
        let source: EventSource<dyn MotorEventListener> = EventSource::new();
        let a = Arc::new(Counter::default());
        let b = Arc::new(Counter::default());
        source.add_listener(a.clone());
        source.add_listener(b.clone());
        assert_eq!(source.len(), 2);

        source.emit("moved", |l| l.moved(&move_event()));
        assert_eq!(a.moved.load(Ordering::SeqCst), 1);
        assert_eq!(b.moved.load(Ordering::SeqCst), 1);
        // 默认实现为空操作
        source.emit("moving", |l| l.moving(&move_event()));
        assert_eq!(a.rolled.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let source: EventSource<dyn MotorEventListener> = EventSource::new();
        let counter = Arc::new(Counter::default());
        source.add_listener(Arc::new(Panicking));
        source.add_listener(counter.clone());

        source.emit("moved", |l| l.moved(&move_event()));
        assert_eq!(counter.moved.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_listener() {
        let source: EventSource<dyn MotorEventListener> = EventSource::default();
        let counter = Arc::new(Counter::default());
        let as_dyn: Arc<dyn MotorEventListener> = counter.clone();
        source.add_listener(as_dyn.clone());

        assert!(source.remove_listener(&as_dyn));
        assert!(!source.remove_listener(&as_dyn));
        assert!(source.is_empty());

        source.emit("moved", |l| l.moved(&move_event()));
        assert_eq!(counter.moved.load(Ordering::SeqCst), 0);
    }
}
