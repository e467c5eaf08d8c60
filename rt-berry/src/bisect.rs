//! 面积二分平面搜索.
//!
//! 沿固定法向在轮廓集合的投影范围内二分切割平面的偏移量, 使正法向
//! 一侧的轮廓总面积比例收敛到目标值. 用于剂量子分割 (dose
//! sub-segmentation): 例如取 `target_fraction = 0.25` 可以分出体积
//! (面积) 四分之一的子区域.
//!
//! 搜索是单调的: 对单连通、不自交的轮廓集合, 平面沿法向扫过时
//! 正侧面积比例从 1 单调降到 0.
//!
//! 每次调用持有自己的裁剪缓冲, 不共享可变状态, 因此可以在并行
//! 图像任务内部安全使用.

use nalgebra::{Point3, Unit, Vector3};

use crate::geom::{split_contour, Contour, ContourSet, Plane};

/// 一次面积二分搜索的结果.
///
/// 未收敛不是错误: `iterations` 与 `achieved_fraction` 会如实报告
/// 达到的程度, 由调用方判断可接受性.
#[derive(Clone, Debug)]
pub struct BisectOutcome {
    /// 最终切割平面.
    pub plane: Plane,

    /// 实际使用的迭代次数.
    pub iterations: u32,

    /// 最终达到的正侧面积比例.
    pub achieved_fraction: f64,

    /// 以最终平面裁剪输入轮廓得到的正法向一侧的多边形片段.
    pub above: Vec<Contour>,

    /// 以最终平面裁剪输入轮廓得到的负法向一侧的多边形片段.
    pub below: Vec<Contour>,
}

/// 计算 `set` 中严格位于 `cut` 正法向一侧的轮廓总面积.
///
/// 每条轮廓先以 `cut` 裁剪, 再在其自身最佳拟合平面 (法向以 `hint`
/// 为提示) 下累加片段绝对面积. 退化轮廓被跳过.
pub fn area_above_plane(set: &ContourSet, cut: &Plane, hint: Unit<Vector3<f64>>) -> f64 {
    set.contours
        .iter()
        .filter_map(|c| {
            let plane = c.best_fit_plane(hint)?;
            let (above, _) = split_contour(c, cut);
            Some(
                above
                    .iter()
                    .map(|piece| piece.signed_area(&plane).abs())
                    .sum::<f64>(),
            )
        })
        .sum()
}

/// 沿 `normal` 方向二分搜索切割平面, 使正法向一侧的总面积比例
/// 收敛到 `target_fraction`.
///
/// 偏差不超过 `acceptable_deviation` 或迭代达到 `max_iters` 次时停止,
/// 返回期间找到的最优平面. 轮廓集合习惯上应先统一为逆时针绕向
/// (面积按绝对值累加, 绕向不影响结果, 只影响语义约定).
///
/// # 返回值
///
/// 以下情况返回 `None`:
///
/// - `target_fraction` 不在开区间 `(0, 1)` 内;
/// - `acceptable_deviation` 不是正有限值;
/// - `set` 中没有非退化轮廓, 或总面积为零.
///
/// 其他情况下返回 `Some(BisectOutcome)`; 未收敛时同样返回结果,
/// 由 `achieved_fraction` 报告实际达到的比例.
pub fn bisect_total_area(
    set: &ContourSet,
    normal: Unit<Vector3<f64>>,
    target_fraction: f64,
    acceptable_deviation: f64,
    max_iters: u32,
) -> Option<BisectOutcome> {
    if !(target_fraction.is_finite() && 0.0 < target_fraction && target_fraction < 1.0) {
        return None;
    }
    if !(acceptable_deviation.is_finite() && acceptable_deviation > 0.0) {
        return None;
    }

    let total = set.total_area(normal);
    if total <= 0.0 {
        return None;
    }
    let (mut lo, mut hi) = set.extreme_offsets(&normal)?;

    let base = Plane::new(Point3::origin(), normal);
    let cut_at = |offset: f64| base.offset_along_normal(offset);
    let fraction_at = |offset: f64| area_above_plane(set, &cut_at(offset), normal) / total;

    // 偏移增大时正侧比例单调减小, 因此比例偏大就抬高下界.
    let mut best: Option<(f64, f64)> = None;
    let mut iterations = 0;
    for i in 1..=max_iters {
        iterations = i;
        let mid = (lo + hi) * 0.5;
        let frac = fraction_at(mid);

        let better = best
            .map(|(_, bf)| (frac - target_fraction).abs() < (bf - target_fraction).abs())
            .unwrap_or(true);
        if better {
            best = Some((mid, frac));
        }

        if (frac - target_fraction).abs() <= acceptable_deviation {
            break;
        }
        if frac > target_fraction {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let (offset, achieved_fraction) = best.unwrap_or_else(|| {
        // max_iters == 0: 不迭代, 直接报告区间中点.
        let mid = (lo + hi) * 0.5;
        (mid, fraction_at(mid))
    });

    let plane = cut_at(offset);
    let mut above = Vec::new();
    let mut below = Vec::new();
    for c in set.contours.iter() {
        let (a, b) = split_contour(c, &plane);
        above.extend(a);
        below.extend(b);
    }

    Some(BisectOutcome {
        plane,
        iterations,
        achieved_fraction,
        above,
        below,
    })
}
