//! 输入闸门
//!
//! 把高频的指针拖拽流节流到渲染节奏：每个渲染周期最多放行一次未被消费的更新。
//!
//! # 行为
//!
//! - 初始为打开状态
//! - [`InputGate::try_admit`] 在打开期间只有第一次调用返回 `true`，并关闭闸门
//! - 关闭期间的输入直接**丢弃**（不排队），避免积压过时的位移
//! - 被放行的编辑完成后调用 [`InputGate::settle`] 记下它产生的快照版本
//! - 渲染完成后调用 [`InputGate::release_rendered`]：只有渲染的快照已包含被放行的编辑时才重新打开
//!
//! # 状态
//!
//! 单个 `AtomicU64`：
//!
//! | 值 | 含义 |
//! |----|------|
//! | `OPEN` | 打开 |
//! | `IN_FLIGHT` | 已放行，编辑尚未完成 |
//! | `r` | 已关闭，等待渲染版本 ≥ `r` |
//!
//! 放行和释放都是 compare-exchange，渲染线程和输入线程可以分别持有 `Arc<InputGate>`。

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

const OPEN: u64 = u64::MAX;
const IN_FLIGHT: u64 = u64::MAX - 1;

/// 输入闸门
#[derive(Debug)]
pub struct InputGate {
    state: AtomicU64,
    admitted: AtomicU64,
    rejected: AtomicU64,
}

impl InputGate {
    /// 创建打开的闸门
    pub const fn new() -> Self {
        Self {
            state: AtomicU64::new(OPEN),
            admitted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// 尝试放行一次输入
    ///
    /// 返回 `true` 表示本次输入被接受，闸门随之关闭。
    pub fn try_admit(&self) -> bool {
        let admitted = self
            .state
            .compare_exchange(OPEN, IN_FLIGHT, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if admitted {
            self.admitted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.reject();
        }
        admitted
    }

    /// 不占用闸门的检查：关闭时计为一次丢弃
    pub fn check_open(&self) -> bool {
        let open = self.is_open();
        if !open {
            self.reject();
        }
        open
    }

    /// 被放行的编辑已完成，结果包含在快照版本 `revision` 中
    pub fn settle(&self, revision: u64) {
        // 只有放行者会调用；闸门已被强制打开时保持打开
        let _ = self.state.compare_exchange(
            IN_FLIGHT,
            revision.min(IN_FLIGHT - 1),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// 渲染完成，渲染的快照版本为 `rendered_revision`
    ///
    /// 编辑仍在进行或渲染的快照早于它时闸门保持关闭，返回是否已打开。
    pub fn release_rendered(&self, rendered_revision: u64) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current == OPEN {
                return true;
            }
            if current == IN_FLIGHT || rendered_revision < current {
                trace!(
                    "Render of revision {} does not show the admitted edit, gate stays closed",
                    rendered_revision
                );
                return false;
            }
            match self.state.compare_exchange_weak(
                current,
                OPEN,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// 无条件重新打开
    pub fn release(&self) {
        self.state.store(OPEN, Ordering::Release);
    }

    /// 闸门是否打开
    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire) == OPEN
    }

    /// 累计放行次数
    pub fn admitted_count(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    /// 累计丢弃次数
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    fn reject(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        trace!("Input gate closed, delta dropped");
    }
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_gate_starts_open() {
        let gate = InputGate::new();
        assert!(gate.is_open());
    }

    #[test]
    fn test_burst_admits_exactly_one() {
        let gate = InputGate::new();
        let admitted = (0..10).filter(|_| gate.try_admit()).count();

        assert_eq!(admitted, 1);
        assert_eq!(gate.admitted_count(), 1);
        assert_eq!(gate.rejected_count(), 9);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_release_reopens() {
        let gate = InputGate::new();
        assert!(gate.try_admit());
        assert!(!gate.try_admit());

        gate.release();
        assert!(gate.is_open());
        assert!(gate.try_admit());
    }

    #[test]
    fn test_release_is_idempotent() {
        let gate = InputGate::new();
        gate.release();
        gate.release();
        assert!(gate.try_admit());
        assert!(!gate.try_admit());
    }

    #[test]
    fn test_render_before_settle_keeps_gate_closed() {
        let gate = InputGate::new();
        assert!(gate.try_admit());

        // 编辑尚未完成
        assert!(!gate.release_rendered(0));
        assert!(!gate.try_admit());

        gate.settle(1);
        // 渲染的是编辑之前的快照
        assert!(!gate.release_rendered(0));
        assert!(!gate.is_open());

        assert!(gate.release_rendered(1));
        assert!(gate.try_admit());
    }

    #[test]
    fn test_newer_render_releases() {
        let gate = InputGate::new();
        assert!(gate.try_admit());
        gate.settle(4);
        assert!(gate.release_rendered(7));
        assert!(gate.release_rendered(0));
    }

    #[test]
    fn test_check_open_counts_drops() {
        let gate = InputGate::new();
        assert!(gate.check_open());
        assert!(gate.try_admit());
        assert!(!gate.check_open());
        assert!(!gate.check_open());

        assert_eq!(gate.admitted_count(), 1);
        assert_eq!(gate.rejected_count(), 2);
    }

    #[test]
    fn test_concurrent_burst() {
        let gate = Arc::new(InputGate::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                thread::spawn(move || (0..100).filter(|_| gate.try_admit()).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 1);
        assert_eq!(gate.rejected_count(), 799);
    }
}
