//! 资源使用计数

use std::sync::atomic::{AtomicUsize, Ordering};

/// 引用计数式的使用标记
///
/// 上层（例如坐标平面）在持有控制器期间调用 `use_resource`，释放时调用 `unuse_resource`。
/// 计数不会低于零。
#[derive(Debug, Default)]
pub struct UsageCounter {
    count: AtomicUsize,
}

impl UsageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 增加计数，返回新值
    pub fn acquire(&self) -> usize {
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// 减少计数（饱和到 0），返回新值
    pub fn release(&self) -> usize {
        let previous = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some(c.saturating_sub(1)))
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_used(&self) -> bool {
        self.count() > 0
    }
}
