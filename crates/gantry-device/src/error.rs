//! 设备层错误类型定义

use crate::types::{DeviceConnectionType, DeviceId};
use thiserror::Error;

/// 设备拒绝操作的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceErrorKind {
    Unknown,
    /// 设备已断开或已被 terminate
    Disconnected,
    /// 需要先打开会话
    SessionClosed,
    /// 设备不支持该参数
    UnsupportedParameter,
    /// 后端内部故障
    Backend,
}

/// 设备层统一错误类型
///
/// 这些是"硬"失败，作为操作结果直接返回。软异常不走这里，而是追加到设备的错误队列。
#[derive(Error, Debug, Clone)]
pub enum DeviceError {
    #[error("Device #{id} rejected operation ({kind:?}): {message}")]
    Rejected {
        id: DeviceId,
        kind: DeviceErrorKind,
        message: String,
    },

    #[error("Connection type {0:?} is not supported")]
    UnsupportedConnection(DeviceConnectionType),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Device manager terminated")]
    Terminated,
}

impl DeviceError {
    pub fn rejected(id: DeviceId, kind: DeviceErrorKind, message: impl Into<String>) -> Self {
        DeviceError::Rejected {
            id,
            kind,
            message: message.into(),
        }
    }

    /// 设备是否已不可用（之后的所有操作都会失败）
    pub fn is_fatal(&self) -> bool {
        match self {
            DeviceError::Rejected { kind, .. } => *kind == DeviceErrorKind::Disconnected,
            DeviceError::Terminated => true,
            _ => false,
        }
    }
}
