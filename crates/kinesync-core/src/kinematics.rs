//! 运动学协作方接口
//!
//! 正解/逆解的数学计算不在本 crate 内实现，由调用方通过 [`Kinematics`] trait 注入。
//!
//! # 约束
//!
//! - **同步且快速**: 每次编辑都会在锁内调用，禁止阻塞 I/O
//! - **纯函数**: 相同输入必须给出相同输出
//!
//! # 示例
//!
//! ```rust
//! use kinesync_core::{Kinematics, KinematicsError};
//! use kinesync_types::*;
//!
//! /// 只有一个分支、关节角与位姿一一对应的玩具模型
//! struct Identity;
//!
//! impl Kinematics for Identity {
//!     fn forward(&self, angles: &JointAngleVector) -> Pose {
//!         let mut pose = Pose::ZERO;
//!         pose.gripper = angles[Actuator::Gripper];
//!         pose
//!     }
//!
//!     fn inverse(
//!         &self,
//!         pose: &Pose,
//!         config: KinematicConfiguration,
//!     ) -> Result<JointAngleVector, KinematicsError> {
//!         if config != KinematicConfiguration::default() {
//!             return Err(KinematicsError::NoSolution { config });
//!         }
//!         let mut angles = ActuatorArray::splat(Rad::ZERO);
//!         angles[Actuator::Gripper] = pose.gripper;
//!         Ok(angles)
//!     }
//!
//!     fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
//!         let config = KinematicConfiguration::default();
//!         self.inverse(pose, config)
//!             .map(|angles| KinematicsSolution::new(config, angles))
//!             .into_iter()
//!             .collect()
//!     }
//!
//!     fn limits(&self) -> ActuatorArray<AngleLimit> {
//!         ActuatorArray::splat(AngleLimit::UNBOUNDED)
//!     }
//! }
//! ```

use crate::error::KinematicsError;
use kinesync_types::{
    ActuatorArray, AngleLimit, JointAngleVector, KinematicConfiguration, Pose, ValidSolutionSet,
};

/// 运动学协作方
pub trait Kinematics {
    /// 正解：关节角 → 位姿
    fn forward(&self, angles: &JointAngleVector) -> Pose;

    /// 逆解：位姿 + 构型 → 关节角
    fn inverse(
        &self,
        pose: &Pose,
        config: KinematicConfiguration,
    ) -> Result<JointAngleVector, KinematicsError>;

    /// 位姿的全部有效解
    fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet;

    /// 各执行器的角度限位
    fn limits(&self) -> ActuatorArray<AngleLimit>;
}

impl<K: Kinematics + ?Sized> Kinematics for &K {
    fn forward(&self, angles: &JointAngleVector) -> Pose {
        (**self).forward(angles)
    }

    fn inverse(
        &self,
        pose: &Pose,
        config: KinematicConfiguration,
    ) -> Result<JointAngleVector, KinematicsError> {
        (**self).inverse(pose, config)
    }

    fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
        (**self).possible_solutions(pose)
    }

    fn limits(&self) -> ActuatorArray<AngleLimit> {
        (**self).limits()
    }
}

impl<K: Kinematics + ?Sized> Kinematics for Box<K> {
    fn forward(&self, angles: &JointAngleVector) -> Pose {
        (**self).forward(angles)
    }

    fn inverse(
        &self,
        pose: &Pose,
        config: KinematicConfiguration,
    ) -> Result<JointAngleVector, KinematicsError> {
        (**self).inverse(pose, config)
    }

    fn possible_solutions(&self, pose: &Pose) -> ValidSolutionSet {
        (**self).possible_solutions(pose)
    }

    fn limits(&self) -> ActuatorArray<AngleLimit> {
        (**self).limits()
    }
}
