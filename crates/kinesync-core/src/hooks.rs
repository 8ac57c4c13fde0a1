//! 变更通知
//!
//! 同步器在编辑结束时向所有监听器广播通知，供界面刷新和动作分发方使用。
//!
//! # 约束
//!
//! - **非阻塞**: 通知在同步器的锁内发出，监听器必须立即返回
//! - **Channel 模式**: 需要跨线程处理时使用 [`ChannelListener`]，队列满时丢弃而不是阻塞
//!
//! # 使用示例
//!
//! ```rust
//! use kinesync_core::hooks::{ChannelListener, Notification, NotificationHub};
//! use kinesync_types::KinematicConfiguration;
//! use std::sync::Arc;
//!
//! let mut hub = NotificationHub::new();
//! let (listener, rx) = ChannelListener::new(16);
//! hub.add_listener(Arc::new(listener));
//!
//! hub.notify(&Notification::ConfigChanged(KinematicConfiguration::default()));
//! assert!(matches!(rx.try_recv(), Ok(Notification::ConfigChanged(_))));
//! ```

use crate::error::ResolutionFailure;
use crate::state::AxisEnablement;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use kinesync_types::{JointAngleVector, KinematicConfiguration, Pose};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// 变更通知
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// 关节角已更新
    AngleChanged(JointAngleVector),
    /// 目标位姿已更新
    PoseChanged(Pose),
    /// 构型已切换
    ConfigChanged(KinematicConfiguration),
    /// 编辑被拒绝，状态未改变
    ResolutionFailed(ResolutionFailure),
    /// 构型轴可切换状态变化
    EnablementChanged(AxisEnablement),
}

impl Notification {
    /// 通知名称（用于日志）
    pub const fn name(&self) -> &'static str {
        match self {
            Notification::AngleChanged(_) => "angle_changed",
            Notification::PoseChanged(_) => "pose_changed",
            Notification::ConfigChanged(_) => "config_changed",
            Notification::ResolutionFailed(_) => "resolution_failed",
            Notification::EnablementChanged(_) => "enablement_changed",
        }
    }
}

/// 通知监听器
///
/// # 性能要求
///
/// - 禁止阻塞操作（I/O、等待锁）
/// - 推荐使用 `try_send` 而非 `send`
pub trait NotificationListener: Send + Sync {
    /// 收到一条通知
    fn on_notification(&self, notification: &Notification);
}

impl<F> NotificationListener for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn on_notification(&self, notification: &Notification) {
        self(notification)
    }
}

/// 监听器注册表
///
/// 列表本身不做同步，由持有它的同步器（通常在会话锁内）保证独占访问。
#[derive(Default)]
pub struct NotificationHub {
    listeners: Vec<Arc<dyn NotificationListener>>,
}

impl NotificationHub {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// 添加监听器
    pub fn add_listener(&mut self, listener: Arc<dyn NotificationListener>) {
        self.listeners.push(listener);
    }

    /// 移除所有监听器
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// 广播一条通知
    pub fn notify(&self, notification: &Notification) {
        for listener in self.listeners.iter() {
            listener.on_notification(notification);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// 基于有界通道的监听器
///
/// 队列满或接收端已断开时丢弃通知，并累加 `dropped` 计数器。
pub struct ChannelListener {
    tx: Sender<Notification>,
    dropped: Arc<AtomicU64>,
}

impl ChannelListener {
    /// 创建监听器和对应的接收端
    pub fn new(capacity: usize) -> (Self, Receiver<Notification>) {
        let (tx, rx) = bounded(capacity);
        let listener = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (listener, rx)
    }

    /// 丢弃计数器（可在注册前克隆持有）
    pub fn dropped(&self) -> &Arc<AtomicU64> {
        &self.dropped
    }
}

impl NotificationListener for ChannelListener {
    fn on_notification(&self, notification: &Notification) {
        match self.tx.try_send(notification.clone()) {
            Ok(()) => {},
            Err(TrySendError::Full(dropped)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(
                    "Notification queue full, dropped {} (total dropped: {})",
                    dropped.name(),
                    total
                );
            },
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesync_types::{ActuatorArray, Rad};
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_hub_add_and_clear() {
        let mut hub = NotificationHub::new();
        assert!(hub.is_empty());

        let (listener, _rx) = ChannelListener::new(4);
        hub.add_listener(Arc::new(listener));
        assert_eq!(hub.len(), 1);

        hub.clear();
        assert!(hub.is_empty());
    }

    #[test]
    fn test_hub_notifies_all_listeners() {
        let mut hub = NotificationHub::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            hub.add_listener(Arc::new(move |_: &Notification| {
                count.fetch_add(1, Ordering::Relaxed);
            }));
        }

        hub.notify(&Notification::AngleChanged(ActuatorArray::splat(Rad::ZERO)));
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_channel_listener_drops_when_full() {
        let (listener, rx) = ChannelListener::new(2);
        let dropped = listener.dropped().clone();

        for _ in 0..5 {
            listener.on_notification(&Notification::PoseChanged(Pose::ZERO));
        }

        assert_eq!(dropped.load(Ordering::Relaxed), 3);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_channel_listener_disconnected() {
        let (listener, rx) = ChannelListener::new(2);
        drop(rx);

        listener.on_notification(&Notification::PoseChanged(Pose::ZERO));
        assert_eq!(listener.dropped().load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_notification_name() {
        let notification = Notification::ConfigChanged(KinematicConfiguration::default());
        assert_eq!(notification.name(), "config_changed");
    }
}
