//! 构型解析
//!
//! 连续的位姿编辑可能让当前选中的分支失效；用户切换某个构型轴时，请求的组合也未必存在。
//! 解析器在当前位姿的有效解集合中为其找一个可用分支。
//!
//! # 算法
//!
//! 1. 请求的构型本身在集合中 → 直接采用
//! 2. 否则从 `(changed_axis + 1) mod 3` 开始轮询其余两个轴，每次只翻转请求构型中的**一个**轴
//!    （翻转不累积），命中即采用
//! 3. 两次尝试都未命中 → 失败（非致命，由调用方保留原状态并报告）
//!
//! 用户刚改动的轴永远不会被翻回去；轮询顺序固定，相同输入得到相同结果。

use crate::error::ResolutionFailure;
use kinesync_types::{
    CONFIG_AXIS_COUNT, ConfigAxis, JointAngleVector, KinematicConfiguration, ValidSolutionSet,
};
use tracing::debug;

/// 请求构型失配后的最大尝试次数（除改动轴外的每个轴各一次）
pub const MAX_FALLBACK_ATTEMPTS: usize = CONFIG_AXIS_COUNT - 1;

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// 采用的构型（一定属于候选集合）
    pub config: KinematicConfiguration,
    /// 该构型下的关节角
    pub angles: JointAngleVector,
    /// 使用的回退尝试次数（0 表示请求构型直接命中）
    pub attempts: usize,
}

/// 回退候选序列
///
/// 按轮询顺序返回 `(翻转的轴, 候选构型)`，长度为 [`MAX_FALLBACK_ATTEMPTS`]。
pub fn fallback_candidates(
    requested: KinematicConfiguration,
    changed_axis: ConfigAxis,
) -> impl Iterator<Item = (ConfigAxis, KinematicConfiguration)> {
    let mut axis = changed_axis;
    (0..MAX_FALLBACK_ATTEMPTS).map(move |_| {
        axis = axis.next();
        if axis == changed_axis {
            axis = axis.next();
        }
        (axis, requested.toggled(axis))
    })
}

/// 为请求的构型在候选解中找一个可用分支
///
/// # 参数
///
/// - `requested`: 请求的构型（当前构型，或改动了 `changed_axis` 之后的构型）
/// - `changed_axis`: 不参与回退搜索的轴
/// - `candidates`: 当前位姿的有效解集合
pub fn resolve(
    requested: KinematicConfiguration,
    changed_axis: ConfigAxis,
    candidates: &ValidSolutionSet,
) -> Result<Resolution, ResolutionFailure> {
    if let Some(solution) = candidates.find(&requested) {
        return Ok(Resolution {
            config: solution.config,
            angles: solution.angles,
            attempts: 0,
        });
    }

    for (attempt, (axis, config)) in fallback_candidates(requested, changed_axis).enumerate() {
        debug!(
            "Configuration {} not available, trying {} (toggled {})",
            requested, config, axis
        );
        if let Some(solution) = candidates.find(&config) {
            return Ok(Resolution {
                config: solution.config,
                angles: solution.angles,
                attempts: attempt + 1,
            });
        }
    }

    Err(ResolutionFailure::NoAlternativeConfiguration {
        requested,
        changed_axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinesync_types::{ActuatorArray, Direction, Flip, KinematicsSolution, Rad, Turn};

    fn config(direction: Direction, flip: Flip, turn: Turn) -> KinematicConfiguration {
        KinematicConfiguration::new(direction, flip, turn)
    }

    fn set_of(configs: &[KinematicConfiguration]) -> ValidSolutionSet {
        configs
            .iter()
            .enumerate()
            .map(|(i, c)| KinematicsSolution::new(*c, ActuatorArray::splat(Rad(i as f64))))
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let requested = config(Direction::Front, Flip::NoFlip, Turn::Up);
        let candidates = set_of(&[requested.toggled(ConfigAxis::Turn), requested]);

        let resolution = resolve(requested, ConfigAxis::Flip, &candidates).unwrap();
        assert_eq!(resolution.config, requested);
        assert_eq!(resolution.angles, ActuatorArray::splat(Rad(1.0)));
        assert_eq!(resolution.attempts, 0);
    }

    #[test]
    fn test_fallback_order_skips_changed_axis() {
        let requested = KinematicConfiguration::default();

        let axes: Vec<_> = fallback_candidates(requested, ConfigAxis::Direction)
            .map(|(axis, _)| axis)
            .collect();
        assert_eq!(axes, vec![ConfigAxis::Flip, ConfigAxis::Turn]);

        let axes: Vec<_> = fallback_candidates(requested, ConfigAxis::Flip)
            .map(|(axis, _)| axis)
            .collect();
        assert_eq!(axes, vec![ConfigAxis::Turn, ConfigAxis::Direction]);

        let axes: Vec<_> = fallback_candidates(requested, ConfigAxis::Turn)
            .map(|(axis, _)| axis)
            .collect();
        assert_eq!(axes, vec![ConfigAxis::Direction, ConfigAxis::Flip]);
    }

    #[test]
    fn test_fallback_toggles_do_not_accumulate() {
        let requested = config(Direction::Front, Flip::NoFlip, Turn::Up);
        let candidates: Vec<_> = fallback_candidates(requested, ConfigAxis::Direction)
            .map(|(_, c)| c)
            .collect();
        assert_eq!(
            candidates,
            vec![
                config(Direction::Front, Flip::Flip, Turn::Up),
                config(Direction::Front, Flip::NoFlip, Turn::Down),
            ]
        );
    }

    #[test]
    fn test_second_attempt_hits() {
        let requested = config(Direction::Front, Flip::NoFlip, Turn::Up);
        let target = config(Direction::Front, Flip::NoFlip, Turn::Down);
        let candidates = set_of(&[config(Direction::Back, Flip::Flip, Turn::Down), target]);

        let resolution = resolve(requested, ConfigAxis::Direction, &candidates).unwrap();
        assert_eq!(resolution.config, target);
        assert_eq!(resolution.attempts, 2);
    }

    #[test]
    fn test_changed_axis_never_reverted() {
        // 用户把 Turn 切到 Down；唯一可用解是 Turn=Up，解析必须失败而不是翻回去
        let requested = config(Direction::Front, Flip::Flip, Turn::Down);
        let candidates = set_of(&[config(Direction::Front, Flip::Flip, Turn::Up)]);

        let err = resolve(requested, ConfigAxis::Turn, &candidates).unwrap_err();
        assert_eq!(
            err,
            ResolutionFailure::NoAlternativeConfiguration {
                requested,
                changed_axis: ConfigAxis::Turn,
            }
        );
    }

    #[test]
    fn test_two_axis_difference_not_found() {
        let requested = config(Direction::Front, Flip::Flip, Turn::Up);
        let candidates = set_of(&[config(Direction::Front, Flip::NoFlip, Turn::Down)]);
        assert!(resolve(requested, ConfigAxis::Direction, &candidates).is_err());
    }

    #[test]
    fn test_empty_candidates() {
        let requested = KinematicConfiguration::default();
        assert!(resolve(requested, ConfigAxis::Flip, &ValidSolutionSet::empty()).is_err());
    }
}
