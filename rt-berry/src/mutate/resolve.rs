//! 轮廓重叠裁决.
//!
//! 裁决是纯局部的: 对每个查询点, 只需要各轮廓 "是否包含该点" 与
//! 各轮廓自身的绕向符号, 不需要构建轮廓之间的包含树.

use super::opts::ContourOverlap;

/// 单个轮廓对某空间点的包含判定.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ContainsHit {
    /// 该点是否在轮廓 (闭) 内部.
    pub inside: bool,

    /// 该轮廓是否为正 (逆时针) 绕向.
    pub positive: bool,
}

/// 按策略 `policy` 把一组逐轮廓判定合并为一个最终裁决.
///
/// 不被任何轮廓包含的点在所有策略下都判为外部.
pub(crate) fn resolve<I>(policy: ContourOverlap, hits: I) -> bool
where
    I: IntoIterator<Item = ContainsHit>,
{
    let contained = hits.into_iter().filter(|h| h.inside);
    match policy {
        ContourOverlap::Ignore => contained.count() > 0,
        ContourOverlap::HonourOppositeOrientations => {
            let sum: i64 = contained.map(|h| if h.positive { 1 } else { -1 }).sum();
            sum != 0
        }
        ContourOverlap::ImplicitOrientations => contained.count() % 2 == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve, ContainsHit, ContourOverlap};

    fn hit(inside: bool, positive: bool) -> ContainsHit {
        ContainsHit { inside, positive }
    }

    /// 零包含在所有策略下均为外部.
    #[test]
    fn test_resolve_empty() {
        for policy in [
            ContourOverlap::Ignore,
            ContourOverlap::HonourOppositeOrientations,
            ContourOverlap::ImplicitOrientations,
        ] {
            assert!(!resolve(policy, []));
            assert!(!resolve(policy, [hit(false, true), hit(false, false)]));
        }
    }

    /// 单轮廓包含在所有策略下均为内部 (策略无关).
    #[test]
    fn test_resolve_single_contour_policy_invariant() {
        for policy in [
            ContourOverlap::Ignore,
            ContourOverlap::HonourOppositeOrientations,
            ContourOverlap::ImplicitOrientations,
        ] {
            assert!(resolve(policy, [hit(true, true)]));
            assert!(resolve(policy, [hit(true, false)]));
        }
    }

    /// `Ignore` 将洞摊平为并集.
    #[test]
    fn test_resolve_ignore_flattens_holes() {
        assert!(resolve(
            ContourOverlap::Ignore,
            [hit(true, true), hit(true, false)]
        ));
        assert!(resolve(
            ContourOverlap::Ignore,
            [hit(true, true), hit(true, true), hit(true, true)]
        ));
    }

    /// 外正内负时洞抵消外轮廓.
    #[test]
    fn test_resolve_honour_cancels() {
        let policy = ContourOverlap::HonourOppositeOrientations;
        assert!(!resolve(policy, [hit(true, true), hit(true, false)]));
        // 去掉洞后恢复内部.
        assert!(resolve(policy, [hit(true, true), hit(false, false)]));
        // 双层外轮廓 + 单洞: 符号和为 +1.
        assert!(resolve(
            policy,
            [hit(true, true), hit(true, true), hit(true, false)]
        ));
    }

    /// 隐式绕向: 偶数重叠抵消, 与符号无关.
    #[test]
    fn test_resolve_implicit_parity() {
        let policy = ContourOverlap::ImplicitOrientations;
        assert!(resolve(policy, [hit(true, true)]));
        assert!(!resolve(policy, [hit(true, true), hit(true, true)]));
        assert!(resolve(
            policy,
            [hit(true, true), hit(true, true), hit(true, false)]
        ));
        assert!(!resolve(
            policy,
            [hit(true, false), hit(true, false), hit(true, true), hit(true, true)]
        ));
    }
}
