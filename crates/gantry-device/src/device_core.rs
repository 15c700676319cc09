//! 设备公共状态：标识、错误队列、配置

use crate::types::{DeviceId, DeviceKind};
use gantry_config::ConfigurationCatalogue;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::VecDeque;
use tracing::warn;

/// 软错误队列
///
/// 追加于故障发生时，按 FIFO 顺序在轮询时取出。线程安全。
#[derive(Debug, Default)]
pub struct ErrorQueue {
    errors: Mutex<VecDeque<String>>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        self.errors.lock().push_back(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    /// 取出最早的一条错误；队列为空时返回 `None`
    pub fn poll(&self) -> Option<String> {
        self.errors.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }
}

/// 每个设备都持有的公共部分
///
/// 后端实现把它嵌入自己的结构体，并通过 [`Device::core`](crate::Device::core) 暴露。
#[derive(Debug)]
pub struct DeviceCore {
    id: DeviceId,
    kind: DeviceKind,
    errors: ErrorQueue,
    config: RwLock<ConfigurationCatalogue>,
}

impl DeviceCore {
    pub fn new(id: DeviceId, kind: DeviceKind) -> Self {
        Self::with_config(id, kind, ConfigurationCatalogue::new())
    }

    pub fn with_config(id: DeviceId, kind: DeviceKind, config: ConfigurationCatalogue) -> Self {
        Self {
            id,
            kind,
            errors: ErrorQueue::new(),
            config: RwLock::new(config),
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// 记录一条软错误
    pub fn push_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(device = self.id, kind = ?self.kind, "device fault: {}", message);
        self.errors.push(message);
    }

    pub fn errors(&self) -> &ErrorQueue {
        &self.errors
    }

    pub fn config(&self) -> RwLockReadGuard<'_, ConfigurationCatalogue> {
        self.config.read()
    }

    pub fn config_mut(&self) -> RwLockWriteGuard<'_, ConfigurationCatalogue> {
        self.config.write()
    }
}
