//! 机械臂姿态状态
//!
//! [`ManipulatorState`] 是关节角、目标位姿、构型三种表示的唯一所有者，
//! 只能通过同步器的编辑入口修改。对外发布时复制为不可变的 [`ManipulatorSnapshot`]。

use kinesync_types::{
    ConfigAxis, JointAngleVector, KinematicConfiguration, Pose, ValidSolutionSet,
};
use std::fmt;

/// 构型轴可切换状态
///
/// 某个轴可切换 ⇔ 有效解集合中存在一个仅在该轴上与当前构型不同的解。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisEnablement {
    pub direction: bool,
    pub flip: bool,
    pub turn: bool,
}

impl AxisEnablement {
    /// 根据当前构型和有效解集合计算
    pub fn compute(current: KinematicConfiguration, solutions: &ValidSolutionSet) -> Self {
        let mut enablement = AxisEnablement::default();
        for config in solutions.configurations() {
            match current.single_axis_difference(&config) {
                Some(ConfigAxis::Direction) => enablement.direction = true,
                Some(ConfigAxis::Flip) => enablement.flip = true,
                Some(ConfigAxis::Turn) => enablement.turn = true,
                None => {},
            }
        }
        enablement
    }

    /// 读取某个轴
    #[inline]
    pub const fn get(&self, axis: ConfigAxis) -> bool {
        match axis {
            ConfigAxis::Direction => self.direction,
            ConfigAxis::Flip => self.flip,
            ConfigAxis::Turn => self.turn,
        }
    }
}

impl fmt::Display for AxisEnablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |enabled: bool| if enabled { "on" } else { "off" };
        write!(
            f,
            "direction={} flip={} turn={}",
            flag(self.direction),
            flag(self.flip),
            flag(self.turn)
        )
    }
}

/// 姿态状态
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulatorState {
    /// 关节角（已按限位钳制）
    pub angles: JointAngleVector,
    /// 目标位姿
    pub pose: Pose,
    /// 当前构型
    pub config: KinematicConfiguration,
    /// 当前位姿的有效解集合（位姿变化时整体替换）
    pub solutions: ValidSolutionSet,
    /// 构型轴可切换状态
    pub enablement: AxisEnablement,
}

impl ManipulatorState {
    /// 替换有效解集合并重新计算可切换状态
    pub(crate) fn replace_solutions(&mut self, solutions: ValidSolutionSet) {
        self.enablement = AxisEnablement::compute(self.config, &solutions);
        self.solutions = solutions;
    }

    /// 复制为快照
    pub fn snapshot(&self, revision: u64) -> ManipulatorSnapshot {
        ManipulatorSnapshot {
            revision,
            angles: self.angles,
            pose: self.pose,
            config: self.config,
            enablement: self.enablement,
            solution_count: self.solutions.len(),
        }
    }
}

/// 状态快照
///
/// 每次编辑被采纳后发布一次，供渲染线程和动作分发方无锁读取。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManipulatorSnapshot {
    /// 已采纳编辑的计数（每次采纳 +1）
    pub revision: u64,
    pub angles: JointAngleVector,
    pub pose: Pose,
    pub config: KinematicConfiguration,
    pub enablement: AxisEnablement,
    /// 当前位姿的有效解数量
    pub solution_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesync_types::{ActuatorArray, Direction, Flip, KinematicsSolution, Rad, Turn};

    fn solutions(configs: &[KinematicConfiguration]) -> ValidSolutionSet {
        configs
            .iter()
            .map(|c| KinematicsSolution::new(*c, ActuatorArray::splat(Rad::ZERO)))
            .collect()
    }

    #[test]
    fn test_enablement_single_axis_only() {
        let current = KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Up);
        let set = solutions(&[
            current,
            current.toggled(ConfigAxis::Turn),
            // 两个轴不同：不计入
            current
                .toggled(ConfigAxis::Direction)
                .toggled(ConfigAxis::Flip),
        ]);

        let enablement = AxisEnablement::compute(current, &set);
        assert!(!enablement.direction);
        assert!(!enablement.flip);
        assert!(enablement.turn);
        assert!(enablement.get(ConfigAxis::Turn));
    }

    #[test]
    fn test_enablement_all_front_disables_direction() {
        let current = KinematicConfiguration::new(Direction::Front, Flip::Flip, Turn::Up);
        let set = solutions(&[
            KinematicConfiguration::new(Direction::Front, Flip::Flip, Turn::Up),
            KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Up),
            KinematicConfiguration::new(Direction::Front, Flip::Flip, Turn::Down),
            KinematicConfiguration::new(Direction::Front, Flip::NoFlip, Turn::Down),
        ]);

        let enablement = AxisEnablement::compute(current, &set);
        assert!(!enablement.direction);
        assert!(enablement.flip);
        assert!(enablement.turn);
    }

    #[test]
    fn test_enablement_empty_set() {
        let enablement =
            AxisEnablement::compute(KinematicConfiguration::default(), &ValidSolutionSet::empty());
        assert_eq!(enablement, AxisEnablement::default());
        assert_eq!(enablement.to_string(), "direction=off flip=off turn=off");
    }

    #[test]
    fn test_replace_solutions_updates_enablement() {
        let config = KinematicConfiguration::default();
        let mut state = ManipulatorState {
            angles: ActuatorArray::splat(Rad::ZERO),
            pose: Pose::ZERO,
            config,
            solutions: ValidSolutionSet::empty(),
            enablement: AxisEnablement::default(),
        };

        state.replace_solutions(solutions(&[config, config.toggled(ConfigAxis::Flip)]));
        assert!(state.enablement.flip);

        let snapshot = state.snapshot(3);
        assert_eq!(snapshot.revision, 3);
        assert_eq!(snapshot.solution_count, 2);
        assert_eq!(snapshot.config, config);
    }
}
