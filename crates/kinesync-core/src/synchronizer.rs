//! 状态同步器
//!
//! 保持关节角、目标位姿、构型三种表示相互一致。
//!
//! # 编辑入口
//!
//! | 入口 | 协作方调用 | 说明 |
//! |------|-----------|------|
//! | [`on_angle_edited`](StateSynchronizer::on_angle_edited) | 正解 + 有效解 | 输入先量化，再按限位钳制 |
//! | [`on_pose_edited`](StateSynchronizer::on_pose_edited) | 逆解 + 有效解 | 当前构型无解时保持朝向不变，轮询其余两个轴 |
//! | [`on_config_axis_toggled`](StateSynchronizer::on_config_axis_toggled) | 无 | 在当前有效解集合中解析 |
//! | [`reset`](StateSynchronizer::reset) | 正解 + 有效解 | 所有关节角归零 |
//!
//! 每次编辑单向执行：编辑 → 解析 → 量化 → 推送，入口之间不会互相调用。
//! 编辑被拒绝时状态保持不变，只发出 [`Notification::ResolutionFailed`]。
//!
//! # 单位
//!
//! 编辑入口接收界面显示单位：关节角、姿态和夹爪为度，位置为毫米。

use crate::display::{DisplayState, DisplayWrites, FieldModes};
use crate::error::ResolutionFailure;
use crate::hooks::{Notification, NotificationHub, NotificationListener};
use crate::kinematics::Kinematics;
use crate::resolver::resolve;
use crate::state::{AxisEnablement, ManipulatorSnapshot, ManipulatorState};
use kinesync_tools::EngineConfig;
use kinesync_types::{
    Actuator, ActuatorArray, AngleLimit, AxisValue, ConfigAxis, Deg, DisplayField,
    JointAngleVector, KinematicConfiguration, Pose, PoseAxis, Rad, ValidSolutionSet,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 关节角与某个分支的解视为同一分支的容差（弧度）
const BRANCH_MATCH_TOLERANCE: f64 = 1e-3;

/// 同步器设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncSettings {
    /// 各显示字段的量化模式
    pub field_modes: FieldModes,
}

impl From<&EngineConfig> for SyncSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            field_modes: FieldModes::from_fn(|field| config.is_integer_field(field)),
        }
    }
}

/// 单次编辑的处理阶段
///
/// `Idle → Resolving → {Applied, Rejected} → Idle`
///
/// 编辑在 `&mut self` 下同步完成，调用方只会通过 [`EditOutcome::phase`] 看到终止阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    Resolving,
    Applied,
    Rejected,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Resolving => "resolving",
            SyncPhase::Applied => "applied",
            SyncPhase::Rejected => "rejected",
        };
        write!(f, "{}", name)
    }
}

/// 单个位姿字段的新值（显示单位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseFieldEdit {
    pub axis: PoseAxis,
    pub value: f64,
}

impl PoseFieldEdit {
    pub const fn new(axis: PoseAxis, value: f64) -> Self {
        Self { axis, value }
    }
}

/// 编辑事件
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// 单个关节角字段被编辑（度）
    AngleEdit { actuator: Actuator, value: f64 },
    /// 整组关节角被替换（弧度）
    AnglesSet(JointAngleVector),
    /// 单个位姿字段被编辑（毫米 / 度）
    PoseEdit { axis: PoseAxis, value: f64 },
    /// 拖拽产生的两字段位姿编辑（值已取整，不做防卡滞）
    PoseDrag([PoseFieldEdit; 2]),
    /// 构型轴被切换
    ConfigToggle(AxisValue),
    /// 所有关节角归零
    Reset,
}

/// 编辑结果状态
#[derive(Debug, Clone, PartialEq)]
pub enum EditStatus {
    /// 已采纳
    Applied,
    /// 被拒绝，状态未改变
    Rejected(ResolutionFailure),
    /// 无效输入或无需处理
    Ignored,
}

/// 编辑结果
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub status: EditStatus,
    /// 需要推送给界面的字段写入
    pub writes: DisplayWrites,
}

impl EditOutcome {
    fn applied(writes: DisplayWrites) -> Self {
        Self {
            status: EditStatus::Applied,
            writes,
        }
    }

    fn rejected(failure: ResolutionFailure) -> Self {
        Self {
            status: EditStatus::Rejected(failure),
            writes: DisplayWrites::new(),
        }
    }

    fn ignored() -> Self {
        Self {
            status: EditStatus::Ignored,
            writes: DisplayWrites::new(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, EditStatus::Applied)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.status, EditStatus::Rejected(_))
    }

    /// 拒绝原因
    pub fn failure(&self) -> Option<&ResolutionFailure> {
        match &self.status {
            EditStatus::Rejected(failure) => Some(failure),
            _ => None,
        }
    }

    /// 编辑的终止阶段（被忽略的编辑停留在 `Idle`）
    pub fn phase(&self) -> SyncPhase {
        match self.status {
            EditStatus::Applied => SyncPhase::Applied,
            EditStatus::Rejected(_) => SyncPhase::Rejected,
            EditStatus::Ignored => SyncPhase::Idle,
        }
    }
}

/// 编辑来源（决定必发的通知）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditSource {
    Angles,
    Pose,
    Config,
}

/// 状态同步器
pub struct StateSynchronizer<K> {
    kinematics: K,
    limits: ActuatorArray<AngleLimit>,
    state: ManipulatorState,
    display: DisplayState,
    hub: NotificationHub,
    revision: u64,
}

impl<K: Kinematics> StateSynchronizer<K> {
    /// 以全零关节角和默认构型启动
    pub fn new(kinematics: K, settings: SyncSettings) -> Self {
        Self::with_initial(
            kinematics,
            settings,
            ActuatorArray::splat(Rad::ZERO),
            KinematicConfiguration::default(),
        )
    }

    /// 以指定的关节角和构型启动
    pub fn with_initial(
        kinematics: K,
        settings: SyncSettings,
        angles: JointAngleVector,
        config: KinematicConfiguration,
    ) -> Self {
        let limits = kinematics.limits();
        let angles = clamp_angles(&limits, angles);
        let pose = pose_of(&kinematics, &angles);
        let solutions = kinematics.possible_solutions(&pose);
        let enablement = AxisEnablement::compute(config, &solutions);

        let mut sync = Self {
            kinematics,
            limits,
            state: ManipulatorState {
                angles,
                pose,
                config,
                solutions,
                enablement,
            },
            display: DisplayState::new(settings.field_modes),
            hub: NotificationHub::new(),
            revision: 0,
        };
        sync.refresh_display();
        sync
    }

    pub fn kinematics(&self) -> &K {
        &self.kinematics
    }

    pub fn limits(&self) -> &ActuatorArray<AngleLimit> {
        &self.limits
    }

    pub fn state(&self) -> &ManipulatorState {
        &self.state
    }

    pub fn angles(&self) -> &JointAngleVector {
        &self.state.angles
    }

    pub fn pose(&self) -> &Pose {
        &self.state.pose
    }

    pub fn configuration(&self) -> KinematicConfiguration {
        self.state.config
    }

    pub fn solutions(&self) -> &ValidSolutionSet {
        &self.state.solutions
    }

    /// 构型轴可切换状态
    pub fn axis_enablement(&self) -> AxisEnablement {
        self.state.enablement
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// 字段当前的显示值
    pub fn display_value(&self, field: DisplayField) -> f64 {
        self.display.last_written(field).unwrap_or_else(|| match field {
            DisplayField::Angle(actuator) => self.state.angles[actuator].to_deg().0,
            DisplayField::Pose(axis) => self.state.pose.display_value(axis),
        })
    }

    /// 已采纳编辑的计数
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> ManipulatorSnapshot {
        self.state.snapshot(self.revision)
    }

    /// 注册通知监听器
    pub fn add_listener(&mut self, listener: Arc<dyn NotificationListener>) {
        self.hub.add_listener(listener);
    }

    pub fn listeners_mut(&mut self) -> &mut NotificationHub {
        &mut self.hub
    }

    /// 重新推送所有字段（界面重建后使用）
    pub fn refresh_display(&mut self) -> DisplayWrites {
        self.display.clear();
        let mut writes = DisplayWrites::new();
        self.display.push_angles(&self.state.angles, &mut writes);
        self.display.push_pose(&self.state.pose, &mut writes);
        writes
    }

    /// 处理一个编辑事件
    pub fn dispatch(&mut self, event: EditEvent) -> EditOutcome {
        match event {
            EditEvent::AngleEdit { actuator, value } => self.on_angle_edited(actuator, value),
            EditEvent::AnglesSet(angles) => self.on_angles_set(angles),
            EditEvent::PoseEdit { axis, value } => self.on_pose_edited(axis, value),
            EditEvent::PoseDrag(edits) => self.on_pose_fields_edited(&edits),
            EditEvent::ConfigToggle(value) => self.on_config_axis_toggled(value),
            EditEvent::Reset => self.reset(),
        }
    }

    /// 关节角字段被编辑
    ///
    /// `raw` 为度；先量化（含防卡滞），再按限位钳制。
    pub fn on_angle_edited(&mut self, actuator: Actuator, raw: f64) -> EditOutcome {
        if !raw.is_finite() {
            warn!("Ignoring non-finite input {} for {}", raw, actuator);
            return EditOutcome::ignored();
        }

        let field = DisplayField::Angle(actuator);
        let value = self.display.quantize_input(field, raw);
        self.begin(format_args!("angle.{} = {} (raw {})", actuator, value, raw));

        let mut angles = self.state.angles;
        angles[actuator] = Deg(value).to_rad();
        let outcome = self.apply_angles(angles);
        self.display.record_raw(field, raw);
        self.finish(outcome)
    }

    /// 整组关节角被替换（弧度）
    pub fn on_angles_set(&mut self, angles: JointAngleVector) -> EditOutcome {
        if angles.iter().any(|angle| !angle.0.is_finite()) {
            warn!("Ignoring non-finite joint angles");
            return EditOutcome::ignored();
        }

        self.begin(format_args!("angles set"));
        let outcome = self.apply_angles(angles);
        self.finish(outcome)
    }

    /// 所有关节角归零
    pub fn reset(&mut self) -> EditOutcome {
        self.begin(format_args!("reset"));
        let outcome = self.apply_angles(ActuatorArray::splat(Rad::ZERO));
        self.finish(outcome)
    }

    /// 位姿字段被编辑
    ///
    /// `raw` 为显示单位；先量化（含防卡滞），再以当前构型求逆解。
    pub fn on_pose_edited(&mut self, axis: PoseAxis, raw: f64) -> EditOutcome {
        if !raw.is_finite() {
            warn!("Ignoring non-finite input {} for pose.{}", raw, axis);
            return EditOutcome::ignored();
        }

        let field = DisplayField::Pose(axis);
        let value = self.display.quantize_input(field, raw);
        self.begin(format_args!("pose.{} = {} (raw {})", axis, value, raw));

        let pose = self.state.pose.with_display_value(axis, value);
        let outcome = self.apply_pose(pose);
        if outcome.is_applied() {
            self.display.record_raw(field, raw);
        }
        self.finish(outcome)
    }

    /// 多个位姿字段同时被编辑（值按原样使用）
    pub fn on_pose_fields_edited(&mut self, edits: &[PoseFieldEdit]) -> EditOutcome {
        if edits.is_empty() {
            return EditOutcome::ignored();
        }
        if edits.iter().any(|edit| !edit.value.is_finite()) {
            warn!("Ignoring non-finite pose edit");
            return EditOutcome::ignored();
        }

        self.begin(format_args!("{} pose fields", edits.len()));
        let pose = edits.iter().fold(self.state.pose, |pose, edit| {
            pose.with_display_value(edit.axis, edit.value)
        });
        let outcome = self.apply_pose(pose);
        self.finish(outcome)
    }

    /// 构型轴被切换
    ///
    /// 在当前有效解集合中解析；被切换的轴不会被翻回。位姿保持不变。
    pub fn on_config_axis_toggled(&mut self, value: AxisValue) -> EditOutcome {
        let axis = value.axis();
        let current = self.state.config;
        if current.value(axis) == value {
            debug!("Configuration axis {} already {}", axis, value);
            return EditOutcome::ignored();
        }

        let requested = current.with(value);
        self.begin(format_args!("{} -> {}", axis, value));

        let outcome = match resolve(requested, axis, &self.state.solutions) {
            Ok(resolution) => {
                if resolution.config != requested {
                    debug!(
                        "Requested {} unavailable, adopting {}",
                        requested, resolution.config
                    );
                }
                let mut angles = resolution.angles;
                angles[Actuator::Gripper] = self.state.pose.gripper;
                let clamped = clamp_angles(&self.limits, angles);
                if clamped != angles {
                    debug!("Solution for {} clamped to actuator limits", resolution.config);
                    self.commit_angles(clamped, resolution.config, EditSource::Config)
                } else {
                    let pose = self.state.pose;
                    let solutions = self.state.solutions.clone();
                    self.commit(angles, pose, resolution.config, solutions, EditSource::Config)
                }
            },
            Err(failure) => self.reject(failure),
        };
        self.finish(outcome)
    }

    fn begin(&self, what: fmt::Arguments<'_>) {
        debug!("Edit {}: {}", SyncPhase::Resolving, what);
    }

    fn finish(&mut self, outcome: EditOutcome) -> EditOutcome {
        debug!(
            "Edit {} with {} display writes (revision {})",
            outcome.phase(),
            outcome.writes.len(),
            self.revision
        );
        outcome
    }

    fn apply_angles(&mut self, angles: JointAngleVector) -> EditOutcome {
        let angles = clamp_angles(&self.limits, angles);
        self.commit_angles(angles, self.state.config, EditSource::Angles)
    }

    /// 正解路径：关节角 → 位姿 → 有效解 → 分支
    ///
    /// `angles` 必须已在限位内；没有匹配的分支时采用 `preferred`。
    fn commit_angles(
        &mut self,
        angles: JointAngleVector,
        preferred: KinematicConfiguration,
        source: EditSource,
    ) -> EditOutcome {
        let pose = pose_of(&self.kinematics, &angles);
        let solutions = self.kinematics.possible_solutions(&pose);
        let config = branch_of(&solutions, &angles, preferred);
        self.commit(angles, pose, config, solutions, source)
    }

    /// 逆解路径：位姿 → 关节角（必要时重新解析构型）
    fn apply_pose(&mut self, mut pose: Pose) -> EditOutcome {
        pose.gripper = self.limits[Actuator::Gripper].clamp(pose.gripper);

        let current = self.state.config;
        let (angles, config, solutions) = match self.kinematics.inverse(&pose, current) {
            Ok(angles) => (angles, current, self.kinematics.possible_solutions(&pose)),
            Err(source) => {
                debug!("No solution in {}: {}", current, source);
                let solutions = self.kinematics.possible_solutions(&pose);
                if solutions.is_empty() {
                    return self.reject(ResolutionFailure::InverseKinematics { pose, source });
                }
                // 位姿编辑不改变机身朝向
                match resolve(current, ConfigAxis::Direction, &solutions) {
                    Ok(resolution) => (resolution.angles, resolution.config, solutions),
                    Err(failure) => return self.reject(failure),
                }
            },
        };

        let mut angles = angles;
        angles[Actuator::Gripper] = pose.gripper;
        let clamped = clamp_angles(&self.limits, angles);
        if clamped != angles {
            // 限位后的关节角达不到请求的位姿，位姿和分支以正解为准
            debug!("Inverse kinematics result clamped to actuator limits");
            return self.commit_angles(clamped, config, EditSource::Pose);
        }
        self.commit(angles, pose, config, solutions, EditSource::Pose)
    }

    fn commit(
        &mut self,
        angles: JointAngleVector,
        pose: Pose,
        config: KinematicConfiguration,
        solutions: ValidSolutionSet,
        source: EditSource,
    ) -> EditOutcome {
        let angles_changed = self.state.angles != angles;
        let pose_changed = self.state.pose != pose;
        let config_changed = self.state.config != config;
        let previous_enablement = self.state.enablement;

        self.state.angles = angles;
        self.state.pose = pose;
        self.state.config = config;
        self.state.replace_solutions(solutions);
        let enablement = self.state.enablement;

        let mut writes = DisplayWrites::new();
        self.display.push_angles(&self.state.angles, &mut writes);
        self.display.push_pose(&self.state.pose, &mut writes);

        self.revision += 1;

        if angles_changed || source == EditSource::Angles {
            self.hub.notify(&Notification::AngleChanged(angles));
        }
        if pose_changed || source == EditSource::Pose {
            self.hub.notify(&Notification::PoseChanged(pose));
        }
        if config_changed {
            debug!("Configuration changed to {}", config);
            self.hub.notify(&Notification::ConfigChanged(config));
        }
        if enablement != previous_enablement {
            self.hub.notify(&Notification::EnablementChanged(enablement));
        }

        EditOutcome::applied(writes)
    }

    fn reject(&mut self, failure: ResolutionFailure) -> EditOutcome {
        warn!("Edit rejected: {}", failure);
        self.hub
            .notify(&Notification::ResolutionFailed(failure.clone()));
        EditOutcome::rejected(failure)
    }
}

impl<K> fmt::Debug for StateSynchronizer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSynchronizer")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

fn clamp_angles(
    limits: &ActuatorArray<AngleLimit>,
    angles: JointAngleVector,
) -> JointAngleVector {
    limits.map_with(angles, |limit, angle| limit.clamp(angle))
}

/// 正解，夹爪角直接取自夹爪执行器
fn pose_of<K: Kinematics>(kinematics: &K, angles: &JointAngleVector) -> Pose {
    let mut pose = kinematics.forward(angles);
    pose.gripper = angles[Actuator::Gripper];
    pose
}

fn angle_distance(a: &JointAngleVector, b: &JointAngleVector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x.0 - y.0).abs())
        .fold(0.0, f64::max)
}

/// 关节角实际所在的分支
///
/// 当前构型的解与关节角一致时保持不变；否则取容差内最接近的解；都不匹配时保持当前构型。
fn branch_of(
    solutions: &ValidSolutionSet,
    angles: &JointAngleVector,
    current: KinematicConfiguration,
) -> KinematicConfiguration {
    if let Some(solution) = solutions.find(&current)
        && angle_distance(&solution.angles, angles) <= BRANCH_MATCH_TOLERANCE
    {
        return current;
    }

    solutions
        .iter()
        .map(|solution| (solution.config, angle_distance(&solution.angles, angles)))
        .filter(|(_, distance)| *distance <= BRANCH_MATCH_TOLERANCE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(current, |(config, _)| config)
}
