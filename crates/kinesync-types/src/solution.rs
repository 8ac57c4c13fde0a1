//! 逆解集合
//!
//! 运动学协作方针对某个位姿给出的全部有效解。每个解把一个构型与实现该位姿的关节角配对。
//! 集合随位姿变化整体替换，不做原地修改；最多 8 个分支，使用 `SmallVec` 内联存储。

use crate::actuator::JointAngleVector;
use crate::configuration::KinematicConfiguration;
use smallvec::SmallVec;

/// 单个分支的最大解数量
pub const MAX_SOLUTIONS: usize = 8;

/// 一组逆解：构型 + 关节角
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicsSolution {
    pub config: KinematicConfiguration,
    pub angles: JointAngleVector,
}

impl KinematicsSolution {
    pub const fn new(config: KinematicConfiguration, angles: JointAngleVector) -> Self {
        KinematicsSolution { config, angles }
    }
}

/// 当前位姿的有效解集合
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidSolutionSet {
    solutions: SmallVec<[KinematicsSolution; MAX_SOLUTIONS]>,
}

impl ValidSolutionSet {
    /// 空集合（位姿不可达）
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KinematicsSolution> {
        self.solutions.iter()
    }

    pub fn as_slice(&self) -> &[KinematicsSolution] {
        &self.solutions
    }

    /// 查找与构型完全一致的解
    pub fn find(&self, config: &KinematicConfiguration) -> Option<&KinematicsSolution> {
        self.solutions.iter().find(|solution| solution.config == *config)
    }

    pub fn contains(&self, config: &KinematicConfiguration) -> bool {
        self.find(config).is_some()
    }

    /// 所有解的构型
    pub fn configurations(&self) -> impl Iterator<Item = KinematicConfiguration> + '_ {
        self.solutions.iter().map(|solution| solution.config)
    }
}

impl FromIterator<KinematicsSolution> for ValidSolutionSet {
    fn from_iter<I: IntoIterator<Item = KinematicsSolution>>(iter: I) -> Self {
        ValidSolutionSet {
            solutions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ValidSolutionSet {
    type Item = &'a KinematicsSolution;
    type IntoIter = std::slice::Iter<'a, KinematicsSolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}
