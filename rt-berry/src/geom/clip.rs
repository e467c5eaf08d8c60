use nalgebra::Point3;

use super::{Contour, Plane};
use crate::consts::MIN_CONTOUR_POINTS;

/// 用平面 `plane` 切割轮廓, 返回 (正法向一侧, 负法向一侧) 的多边形片段.
///
/// 切割采用逐边半空间裁剪: 沿切割线插入交点, 保留目标一侧的顶点.
/// 恰好落在平面上的顶点同时属于两侧. 每一侧退化 (顶点数不足) 时
/// 该侧返回空列表. 片段继承原轮廓的元数据.
pub fn split_contour(contour: &Contour, plane: &Plane) -> (Vec<Contour>, Vec<Contour>) {
    let above = clip_halfspace(contour, plane, true);
    let below = clip_halfspace(contour, plane, false);
    (above, below)
}

/// 保留 `contour` 在 `plane` 一侧 (由 `keep_positive` 决定) 的部分.
fn clip_halfspace(contour: &Contour, plane: &Plane, keep_positive: bool) -> Vec<Contour> {
    if contour.is_degenerate() {
        return vec![];
    }

    let sign = if keep_positive { 1.0 } else { -1.0 };
    let pts = contour.points();
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(pts.len() + 2);

    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        let da = sign * plane.signed_distance(&a);
        let db = sign * plane.signed_distance(&b);

        if da >= 0.0 {
            kept.push(a);
            if db < 0.0 {
                kept.push(crossing(a, da, b, db));
            }
        } else if db >= 0.0 {
            kept.push(crossing(a, da, b, db));
        }
    }

    if kept.len() < MIN_CONTOUR_POINTS {
        return vec![];
    }
    vec![Contour::with_metadata(kept, contour.metadata().clone())]
}

/// 线段 `a -> b` 与平面的交点. `da`, `db` 为两端点的有向距离, 符号必须相反.
#[inline]
fn crossing(a: Point3<f64>, da: f64, b: Point3<f64>, db: f64) -> Point3<f64> {
    debug_assert!(da * db <= 0.0);
    let t = da / (da - db);
    a + (b - a) * t
}
