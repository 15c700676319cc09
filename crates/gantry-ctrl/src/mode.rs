//! 电机控制器的目标方向状态

use gantry_device::TrailerId;
use std::sync::atomic::{AtomicU8, Ordering};

/// 目标方向
///
/// 初始状态和每次操作结束后的状态都是 `Stop`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MoveType {
    #[default]
    Stop = 0,
    MoveUp = 1,
    MoveDown = 2,
    RollUp = 3,
    RollDown = 4,
}

impl MoveType {
    /// 从 u8 转换，无效值视为 Stop
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::MoveUp,
            2 => Self::MoveDown,
            3 => Self::RollUp,
            4 => Self::RollDown,
            _ => Self::Stop,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 普通运动的方向
    pub fn toward(dest: i64, position: i64) -> Self {
        if dest > position {
            Self::MoveUp
        } else {
            Self::MoveDown
        }
    }

    /// 回零运动的方向
    pub fn roll_toward(trailer: TrailerId) -> Self {
        match trailer {
            TrailerId::Trailer1 => Self::RollDown,
            TrailerId::Trailer2 => Self::RollUp,
        }
    }

    /// 该方向会撞上的限位
    pub fn trailer(self) -> Option<TrailerId> {
        match self {
            Self::MoveUp | Self::RollUp => Some(TrailerId::Trailer2),
            Self::MoveDown | Self::RollDown => Some(TrailerId::Trailer1),
            Self::Stop => None,
        }
    }
}

/// 目标方向（原子版本，用于线程间共享）
#[derive(Debug)]
pub struct AtomicMoveType {
    inner: AtomicU8,
}

impl AtomicMoveType {
    pub fn new(value: MoveType) -> Self {
        Self {
            inner: AtomicU8::new(value.as_u8()),
        }
    }

    pub fn get(&self, ordering: Ordering) -> MoveType {
        MoveType::from_u8(self.inner.load(ordering))
    }

    pub fn set(&self, value: MoveType, ordering: Ordering) {
        self.inner.store(value.as_u8(), ordering);
    }
}

impl Default for AtomicMoveType {
    fn default() -> Self {
        Self::new(MoveType::Stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8() {
        for value in [
            MoveType::Stop,
            MoveType::MoveUp,
            MoveType::MoveDown,
            MoveType::RollUp,
            MoveType::RollDown,
        ] {
            assert_eq!(MoveType::from_u8(value.as_u8()), value);
        }
        assert_eq!(MoveType::from_u8(255), MoveType::Stop); // 无效值
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(MoveType::toward(10, 0), MoveType::MoveUp);
        assert_eq!(MoveType::toward(-10, 0), MoveType::MoveDown);
        // 原地运动按向下处理
        assert_eq!(MoveType::toward(0, 0), MoveType::MoveDown);

        assert_eq!(MoveType::roll_toward(TrailerId::Trailer1), MoveType::RollDown);
        assert_eq!(MoveType::MoveUp.trailer(), Some(TrailerId::Trailer2));
        assert_eq!(MoveType::RollDown.trailer(), Some(TrailerId::Trailer1));
        assert_eq!(MoveType::Stop.trailer(), None);
    }

    #[test]
    fn test_atomic_move_type() {
        let value = AtomicMoveType::default();
        assert_eq!(value.get(Ordering::Relaxed), MoveType::Stop);

        value.set(MoveType::RollUp, Ordering::Relaxed);
        assert_eq!(value.get(Ordering::Relaxed), MoveType::RollUp);
    }
}
