//! 交互会话
//!
//! 把同步器、输入闸门、拖拽跟踪和快照发布组合成一个会话对象，对应一个交互窗口。
//!
//! # 线程模型
//!
//! - 编辑入口和指针事件在同一把锁（[`SharedSession`]）内串行执行，同一时刻只有一个写者
//! - 渲染线程只需读取快照并调用 [`SharedSession::render_complete`]，两者都不取锁
//! - 重绘请求在快照发布之后才置位
//! - `render_complete` 传入实际渲染的快照版本；被放行的拖拽编辑出现在渲染结果中之前，闸门不会重新打开
//!
//! # 使用示例
//!
//! ```rust
//! use kinesync_core::{DragPlane, Kinematics, KinematicsError, Session};
//! use kinesync_tools::EngineConfig;
//! use kinesync_types::*;
//!
//! struct Fixed;
//!
//! impl Kinematics for Fixed {
//!     fn forward(&self, _angles: &JointAngleVector) -> Pose {
//!         Pose::ZERO
//!     }
//!
//!     fn inverse(
//!         &self,
//!         _pose: &Pose,
//!         _config: KinematicConfiguration,
//!     ) -> Result<JointAngleVector, KinematicsError> {
//!         Ok(ActuatorArray::splat(Rad::ZERO))
//!     }
//!
//!     fn possible_solutions(&self, _pose: &Pose) -> ValidSolutionSet {
//!         ValidSolutionSet::empty()
//!     }
//!
//!     fn limits(&self) -> ActuatorArray<AngleLimit> {
//!         ActuatorArray::splat(AngleLimit::UNBOUNDED)
//!     }
//! }
//!
//! let mut session = Session::new(Fixed, &EngineConfig::default());
//! session.pointer_press(DragPlane::PositionYZ, 0.0, 0.0);
//!
//! // 同一渲染周期内只有第一次位移被处理
//! assert!(session.pointer_motion(3.0, 0.0).is_some());
//! assert!(session.pointer_motion(6.0, 0.0).is_none());
//!
//! assert!(session.take_redraw_request());
//! let rendered = session.snapshot();
//! session.render_complete(rendered.revision);
//! assert!(session.pointer_motion(9.0, 0.0).is_some());
//! ```

use crate::drag::{DragPlane, DragTracker};
use crate::gate::InputGate;
use crate::hooks::{ChannelListener, Notification, NotificationListener};
use crate::kinematics::Kinematics;
use crate::state::ManipulatorSnapshot;
use crate::synchronizer::{EditEvent, EditOutcome, StateSynchronizer, SyncSettings};
use arc_swap::ArcSwap;
use crossbeam_channel::Receiver;
use kinesync_tools::{DragConfig, EngineConfig};
use kinesync_types::DisplayField;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace};

/// 交互会话
pub struct Session<K> {
    synchronizer: StateSynchronizer<K>,
    gate: Arc<InputGate>,
    tracker: DragTracker,
    drag: DragConfig,
    channel_capacity: usize,
    redraw: Arc<AtomicBool>,
    snapshot: Arc<ArcSwap<ManipulatorSnapshot>>,
}

impl<K: Kinematics> Session<K> {
    /// 按配置创建会话
    pub fn new(kinematics: K, config: &EngineConfig) -> Self {
        let synchronizer = StateSynchronizer::new(kinematics, SyncSettings::from(config));
        Self::from_synchronizer(synchronizer, config)
    }

    /// 用已有的同步器创建会话
    pub fn from_synchronizer(synchronizer: StateSynchronizer<K>, config: &EngineConfig) -> Self {
        let snapshot = Arc::new(ArcSwap::from_pointee(synchronizer.snapshot()));
        Self {
            synchronizer,
            gate: Arc::new(InputGate::new()),
            tracker: DragTracker::new(),
            drag: config.drag.clone(),
            channel_capacity: config.notifications.channel_capacity,
            // 首帧需要绘制
            redraw: Arc::new(AtomicBool::new(true)),
            snapshot,
        }
    }

    pub fn synchronizer(&self) -> &StateSynchronizer<K> {
        &self.synchronizer
    }

    pub fn gate(&self) -> &Arc<InputGate> {
        &self.gate
    }

    pub fn drag_tracker(&self) -> &DragTracker {
        &self.tracker
    }

    /// 注册通知监听器
    pub fn add_listener(&mut self, listener: Arc<dyn NotificationListener>) {
        self.synchronizer.add_listener(listener);
    }

    /// 订阅通知（按配置的队列容量）
    ///
    /// 返回接收端和丢弃计数器。
    pub fn subscribe(&mut self) -> (Receiver<Notification>, Arc<AtomicU64>) {
        let (listener, rx) = ChannelListener::new(self.channel_capacity);
        let dropped = listener.dropped().clone();
        self.synchronizer.add_listener(Arc::new(listener));
        (rx, dropped)
    }

    /// 处理一个编辑事件
    ///
    /// 编辑被采纳后发布新快照并请求重绘。
    pub fn dispatch(&mut self, event: EditEvent) -> EditOutcome {
        let outcome = self.apply(event);
        if outcome.is_applied() {
            self.redraw.store(true, Ordering::Release);
        }
        outcome
    }

    /// 执行编辑并发布快照（不请求重绘）
    fn apply(&mut self, event: EditEvent) -> EditOutcome {
        let outcome = self.synchronizer.dispatch(event);
        if outcome.is_applied() {
            self.snapshot.store(Arc::new(self.synchronizer.snapshot()));
        }
        outcome
    }

    /// 按下指针，开始在某个平面上拖拽
    pub fn pointer_press(&mut self, plane: DragPlane, x: f64, y: f64) {
        debug!("Drag started on {} at ({}, {})", plane, x, y);
        self.tracker.press(plane, x, y);
    }

    /// 松开指针
    pub fn pointer_release(&mut self) {
        if let Some(plane) = self.tracker.active_plane() {
            debug!("Drag on {} released", plane);
        }
        self.tracker.release();
    }

    /// 指针移动
    ///
    /// 没有进行中的拖拽或闸门关闭时返回 `None`（位移被丢弃）。
    pub fn pointer_motion(&mut self, x: f64, y: f64) -> Option<EditOutcome> {
        let motion = self.tracker.pending(x, y)?;
        if !self.gate.try_admit() {
            return None;
        }
        self.tracker.commit(x, y);

        let synchronizer = &self.synchronizer;
        let edits = motion.plane.edits(motion.dx, motion.dy, &self.drag, |axis| {
            synchronizer.display_value(DisplayField::Pose(axis))
        });
        trace!("Drag {} by ({}, {})", motion.plane, motion.dx, motion.dy);
        let outcome = self.apply(EditEvent::PoseDrag(edits));

        self.gate.settle(self.synchronizer.revision());
        // 无论编辑结果如何都需要一次渲染来重新打开闸门
        self.redraw.store(true, Ordering::Release);
        Some(outcome)
    }

    /// 渲染周期结束
    ///
    /// `rendered_revision` 为本次渲染所用快照的版本。
    pub fn render_complete(&self, rendered_revision: u64) {
        self.gate.release_rendered(rendered_revision);
    }

    /// 取走重绘请求（取走后清除）
    pub fn take_redraw_request(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }

    /// 最新快照
    pub fn snapshot(&self) -> Arc<ManipulatorSnapshot> {
        self.snapshot.load_full()
    }
}

/// 跨线程共享的会话
///
/// 编辑和指针事件取会话锁；闸门释放、重绘标志和快照读取不取锁。
pub struct SharedSession<K> {
    inner: Arc<Mutex<Session<K>>>,
    gate: Arc<InputGate>,
    redraw: Arc<AtomicBool>,
    snapshot: Arc<ArcSwap<ManipulatorSnapshot>>,
}

impl<K: Kinematics> SharedSession<K> {
    pub fn new(session: Session<K>) -> Self {
        Self {
            gate: session.gate.clone(),
            redraw: session.redraw.clone(),
            snapshot: session.snapshot.clone(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn gate(&self) -> &Arc<InputGate> {
        &self.gate
    }

    /// 获取会话锁
    pub fn lock(&self) -> MutexGuard<'_, Session<K>> {
        self.inner.lock()
    }

    pub fn dispatch(&self, event: EditEvent) -> EditOutcome {
        self.inner.lock().dispatch(event)
    }

    pub fn pointer_press(&self, plane: DragPlane, x: f64, y: f64) {
        self.inner.lock().pointer_press(plane, x, y);
    }

    pub fn pointer_release(&self) {
        self.inner.lock().pointer_release();
    }

    pub fn pointer_motion(&self, x: f64, y: f64) -> Option<EditOutcome> {
        // 闸门关闭时不必等锁
        if !self.gate.check_open() {
            return None;
        }
        self.inner.lock().pointer_motion(x, y)
    }

    /// 渲染周期结束（不取锁）
    ///
    /// `rendered_revision` 为本次渲染所用快照的版本。
    pub fn render_complete(&self, rendered_revision: u64) {
        self.gate.release_rendered(rendered_revision);
    }

    /// 取走重绘请求（不取锁）
    pub fn take_redraw_request(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }

    /// 最新快照（不取锁）
    pub fn snapshot(&self) -> Arc<ManipulatorSnapshot> {
        self.snapshot.load_full()
    }
}

impl<K> Clone for SharedSession<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            gate: self.gate.clone(),
            redraw: self.redraw.clone(),
            snapshot: self.snapshot.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KinematicsError;
    use kinesync_types::{
        Actuator, ActuatorArray, AngleLimit, JointAngleVector, KinematicConfiguration,
        KinematicsSolution, Pose, PoseAxis, Rad, ValidSolutionSet,
    };
    use std::thread;

    /// 任意位姿都可达，单一分支
    struct Reachable;

    impl Kinematics for Reachable {
        fn forward(&self, angles: &JointAngleVector) -> Pose {
            let mut pose = Pose::ZERO;
            pose.position[2] = angles[Actuator::Forearm].to_deg().0;
            pose
        }

        fn inverse(
            &self,
            pose: &Pose,
            _config: KinematicConfiguration,
        ) -> Result<JointAngleVector, KinematicsError> {
            let mut angles = ActuatorArray::splat(Rad::ZERO);
            angles[Actuator::Forearm] = kinesync_types::Deg(pose.position[2]).to_rad();
            Ok(angles)
        }

        fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
            let config = KinematicConfiguration::default();
            self.inverse(pose, config)
                .map(|angles| KinematicsSolution::new(config, angles))
                .into_iter()
                .collect()
        }

        fn limits(&self) -> ActuatorArray<AngleLimit> {
            ActuatorArray::splat(AngleLimit::UNBOUNDED)
        }
    }

    fn session() -> Session<Reachable> {
        Session::new(Reachable, &EngineConfig::default())
    }

    #[test]
    fn test_initial_redraw_requested() {
        let session = session();
        assert!(session.take_redraw_request());
        assert!(!session.take_redraw_request());
        assert_eq!(session.snapshot().revision, 0);
    }

    #[test]
    fn test_dispatch_publishes_snapshot() {
        let mut session = session();
        session.take_redraw_request();

        let outcome = session.dispatch(EditEvent::PoseEdit {
            axis: PoseAxis::Z,
            value: 30.0,
        });
        assert!(outcome.is_applied());
        assert!(session.take_redraw_request());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.revision, 1);
        assert!((snapshot.pose.position[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_motion_without_drag_ignored() {
        let mut session = session();
        assert!(session.pointer_motion(10.0, 10.0).is_none());
        // 闸门未被消耗
        assert!(session.gate().is_open());
    }

    #[test]
    fn test_drag_moves_z_and_throttles() {
        let mut session = session();
        session.pointer_press(DragPlane::PositionYZ, 100.0, 100.0);

        // 指针上移 30 像素 → z += 10
        let outcome = session.pointer_motion(100.0, 70.0).unwrap();
        assert!(outcome.is_applied());
        assert!((session.synchronizer().pose().position[2] - 10.0).abs() < 1e-9);

        // 渲染前的位移被丢弃，锚点不动
        assert!(session.pointer_motion(100.0, 40.0).is_none());
        assert_eq!(session.drag_tracker().anchor(), (100.0, 70.0));

        session.render_complete(session.snapshot().revision);
        session.pointer_motion(100.0, 40.0).unwrap();
        assert!((session.synchronizer().pose().position[2] - 20.0).abs() < 1e-9);

        session.pointer_release();
        session.render_complete(session.snapshot().revision);
        assert!(session.pointer_motion(100.0, 10.0).is_none());
    }

    #[test]
    fn test_subscribe_receives_notifications() {
        let mut session = session();
        let (rx, dropped) = session.subscribe();

        session.dispatch(EditEvent::AngleEdit {
            actuator: Actuator::Forearm,
            value: 15.0,
        });

        let names: Vec<_> = rx.try_iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["angle_changed", "pose_changed"]);
        assert_eq!(dropped.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_shared_session_across_threads() {
        let shared = SharedSession::new(session());
        shared.pointer_press(DragPlane::PositionXZ, 0.0, 0.0);

        let input = {
            let shared = shared.clone();
            thread::spawn(move || {
                (1..=50)
                    .filter(|i| shared.pointer_motion(*i as f64 * 3.0, 0.0).is_some())
                    .count()
            })
        };
        let admitted = input.join().unwrap();

        // 没有渲染：只有第一次位移被处理，其余都计入丢弃
        assert_eq!(admitted, 1);
        assert_eq!(shared.gate().rejected_count(), 49);
        assert!(shared.take_redraw_request());
        assert_eq!(shared.snapshot().revision, 1);

        shared.render_complete(shared.snapshot().revision);
        assert!(shared.pointer_motion(300.0, 0.0).is_some());
        assert_eq!(shared.lock().synchronizer().revision(), 2);
    }

    /// 第一次求逆解时阻塞，直到测试放行
    struct Blocking {
        armed: Arc<AtomicBool>,
        entered: crossbeam_channel::Sender<()>,
        proceed: crossbeam_channel::Receiver<()>,
    }

    impl Kinematics for Blocking {
        fn forward(&self, angles: &JointAngleVector) -> Pose {
            Reachable.forward(angles)
        }

        fn inverse(
            &self,
            pose: &Pose,
            config: KinematicConfiguration,
        ) -> Result<JointAngleVector, KinematicsError> {
            if self.armed.swap(false, Ordering::SeqCst) {
                let _ = self.entered.send(());
                let _ = self.proceed.recv();
            }
            Reachable.inverse(pose, config)
        }

        fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
            Reachable.possible_solutions(pose)
        }

        fn limits(&self) -> ActuatorArray<AngleLimit> {
            Reachable.limits()
        }
    }

    #[test]
    fn test_render_during_edit_keeps_gate_closed() {
        let armed = Arc::new(AtomicBool::new(false));
        let (entered_tx, entered_rx) = crossbeam_channel::bounded(1);
        let (proceed_tx, proceed_rx) = crossbeam_channel::bounded(1);
        let kinematics = Blocking {
            armed: armed.clone(),
            entered: entered_tx,
            proceed: proceed_rx,
        };
        let shared = SharedSession::new(Session::new(kinematics, &EngineConfig::default()));
        assert!(shared.take_redraw_request());
        shared.pointer_press(DragPlane::PositionYZ, 0.0, 0.0);
        armed.store(true, Ordering::SeqCst);

        let input = {
            let shared = shared.clone();
            thread::spawn(move || shared.pointer_motion(0.0, -30.0).is_some())
        };
        entered_rx.recv().unwrap();

        // 编辑进行中：没有重绘请求，渲染只能看到旧快照
        assert!(!shared.take_redraw_request());
        let stale = shared.snapshot();
        assert_eq!(stale.revision, 0);
        shared.render_complete(stale.revision);
        assert!(shared.pointer_motion(0.0, -60.0).is_none());

        proceed_tx.send(()).unwrap();
        assert!(input.join().unwrap());

        // 编辑发布后才请求重绘；旧快照的渲染仍不能打开闸门
        assert!(shared.take_redraw_request());
        shared.render_complete(stale.revision);
        assert!(shared.pointer_motion(0.0, -60.0).is_none());

        let fresh = shared.snapshot();
        assert_eq!(fresh.revision, 1);
        assert!((fresh.pose.position[2] - 10.0).abs() < 1e-9);
        shared.render_complete(fresh.revision);
        assert!(shared.pointer_motion(0.0, -60.0).is_some());
        assert_eq!(shared.snapshot().revision, 2);
        assert_eq!(shared.gate().admitted_count(), 2);
        assert_eq!(shared.gate().rejected_count(), 2);
    }
}
