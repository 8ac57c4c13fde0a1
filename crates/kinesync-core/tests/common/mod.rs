//! 集成测试公共设施
//!
//! `TableKinematics`: 查表式运动学模型。
//!
//! - 位置直接映射到前三个关节：x → shoulder，y → upperarm，z → forearm（1 mm / 度）
//! - roll → wrist，pitch → hand，yaw 恒为 0
//! - elbow 标记分支：构型序号 × 10°
//! - 可达分支由 z 决定：`z <= z_threshold` 时为 `low`，否则为 `high`

#![allow(dead_code)]

use kinesync_core::{Kinematics, KinematicsError};
use kinesync_types::{
    Actuator, ActuatorArray, AngleLimit, Deg, Direction, Flip, JointAngleVector,
    KinematicConfiguration, KinematicsSolution, Pose, Rad, Turn, ValidSolutionSet,
};

pub struct TableKinematics {
    pub low: Vec<KinematicConfiguration>,
    pub high: Vec<KinematicConfiguration>,
    pub z_threshold: f64,
    pub limits: ActuatorArray<AngleLimit>,
}

impl TableKinematics {
    pub fn new(low: Vec<KinematicConfiguration>, high: Vec<KinematicConfiguration>) -> Self {
        Self {
            low,
            high,
            z_threshold: 40.0,
            limits: ActuatorArray::splat(AngleLimit::new(Deg(-170.0).to_rad(), Deg(170.0).to_rad())),
        }
    }

    /// 所有位姿都有全部 8 个分支
    pub fn everywhere() -> Self {
        Self::new(all_configs(), all_configs())
    }

    fn available(&self, pose: &Pose) -> &[KinematicConfiguration] {
        if pose.position[2] <= self.z_threshold {
            &self.low
        } else {
            &self.high
        }
    }
}

impl Kinematics for TableKinematics {
    fn forward(&self, angles: &JointAngleVector) -> Pose {
        Pose::new(
            [
                angles[Actuator::Shoulder].to_deg().0,
                angles[Actuator::Upperarm].to_deg().0,
                angles[Actuator::Forearm].to_deg().0,
            ],
            [angles[Actuator::Wrist], angles[Actuator::Hand], Rad::ZERO],
            angles[Actuator::Gripper],
        )
    }

    fn inverse(
        &self,
        pose: &Pose,
        config: KinematicConfiguration,
    ) -> Result<JointAngleVector, KinematicsError> {
        if self.low.is_empty() && self.high.is_empty() {
            return Err(KinematicsError::Unreachable);
        }
        if !self.available(pose).contains(&config) {
            return Err(KinematicsError::NoSolution { config });
        }
        Ok(branch_angles(pose, config))
    }

    fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
        self.available(pose)
            .iter()
            .map(|config| KinematicsSolution::new(*config, branch_angles(pose, *config)))
            .collect()
    }

    fn limits(&self) -> ActuatorArray<AngleLimit> {
        self.limits
    }
}

/// 构型序号（0..8）
pub fn config_index(config: KinematicConfiguration) -> u8 {
    let direction: u8 = config.direction.into();
    let flip: u8 = config.flip.into();
    let turn: u8 = config.turn.into();
    direction * 4 + flip * 2 + turn
}

pub fn branch_angles(pose: &Pose, config: KinematicConfiguration) -> JointAngleVector {
    let mut angles = ActuatorArray::splat(Rad::ZERO);
    angles[Actuator::Shoulder] = Deg(pose.position[0]).to_rad();
    angles[Actuator::Upperarm] = Deg(pose.position[1]).to_rad();
    angles[Actuator::Forearm] = Deg(pose.position[2]).to_rad();
    angles[Actuator::Wrist] = pose.orientation[0];
    angles[Actuator::Hand] = pose.orientation[1];
    angles[Actuator::Elbow] = Deg(f64::from(config_index(config)) * 10.0).to_rad();
    angles[Actuator::Gripper] = pose.gripper;
    angles
}

pub fn config(direction: Direction, flip: Flip, turn: Turn) -> KinematicConfiguration {
    KinematicConfiguration::new(direction, flip, turn)
}

pub fn all_configs() -> Vec<KinematicConfiguration> {
    let mut configs = Vec::with_capacity(8);
    for direction in [Direction::Front, Direction::Back] {
        for flip in [Flip::Flip, Flip::NoFlip] {
            for turn in [Turn::Up, Turn::Down] {
                configs.push(config(direction, flip, turn));
            }
        }
    }
    configs
}

pub fn assert_float_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
