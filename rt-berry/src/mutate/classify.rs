//! 体素包含分类.
//!
//! 轮廓在 pass 开始时一次性 "预备": 求最佳拟合平面、把顶点投影为
//! 平面局部 2D 环、记录绕向符号. 之后每次体素查询只做投影 + 闭测试,
//! 避免逐体素重复投影整条轮廓.

use nalgebra::{Point3, Unit, Vector3};

use super::opts::{ContourOverlap, Inclusivity};
use super::resolve::{resolve, ContainsHit};
use crate::geom::{point_in_ring_closed, Contour, Plane};
use crate::img::ImageFrame;

/// 预投影轮廓: 一次 pass 内只读共享的分类快照.
#[derive(Clone, Debug)]
pub(crate) struct PreparedContour {
    plane: Plane,
    ring: Vec<[f64; 2]>,
    positive: bool,
    mean: Point3<f64>,
}

impl PreparedContour {
    /// 预备一条轮廓. 退化轮廓返回 `None` (跳过, 不报错).
    ///
    /// `hint` 使一次 pass 内所有轮廓的拟合平面法向同侧,
    /// 从而绕向符号可比.
    pub(crate) fn build(contour: &Contour, hint: Unit<Vector3<f64>>) -> Option<Self> {
        let plane = contour.best_fit_plane(hint)?;
        let ring: Vec<[f64; 2]> = contour
            .points()
            .iter()
            .map(|p| plane.local_coords(p))
            .collect();
        Some(Self {
            plane,
            positive: contour.signed_area(&plane) >= 0.0,
            mean: contour.centroid()?,
            ring,
        })
    }

    /// 该轮廓是否与图像平面关联 (平均点落在切片厚度范围内)?
    #[inline]
    pub(crate) fn applies_to(&self, image_plane: &Plane, half_thickness: f64) -> bool {
        image_plane.signed_distance(&self.mean).abs() <= half_thickness
    }

    /// 点 `p` 正交投影后是否在该轮廓 (闭) 内?
    #[inline]
    pub(crate) fn contains(&self, p: &Point3<f64>) -> bool {
        point_in_ring_closed(self.plane.local_coords(p), &self.ring)
    }
}

/// 对单个空间点, 在一个轮廓集合内做重叠裁决.
pub(crate) fn point_verdict(
    contours: &[&PreparedContour],
    policy: ContourOverlap,
    p: &Point3<f64>,
) -> bool {
    resolve(
        policy,
        contours.iter().map(|c| ContainsHit {
            inside: c.contains(p),
            positive: c.positive,
        }),
    )
}

/// 对 `(row, col)` 体素, 在一个轮廓集合内按包含策略求裁决.
///
/// 角点模式下每个角点都先经过完整的重叠裁决, 再做 OR / AND 合并.
/// 裁决与通道无关: 同一 `(row, col)` 的所有通道共享一次计算.
pub(crate) fn voxel_verdict(
    contours: &[&PreparedContour],
    overlap: ContourOverlap,
    inclusivity: Inclusivity,
    frame: &ImageFrame,
    row: usize,
    col: usize,
) -> bool {
    match inclusivity {
        Inclusivity::Centre => point_verdict(contours, overlap, &frame.position(row, col)),
        Inclusivity::CornerInclusive => frame
            .planar_corners(row, col)
            .iter()
            .any(|c| point_verdict(contours, overlap, c)),
        Inclusivity::CornerExclusive => frame
            .planar_corners(row, col)
            .iter()
            .all(|c| point_verdict(contours, overlap, c)),
    }
}

#[cfg(test)]
mod tests {
    use super::{voxel_verdict, PreparedContour};
    use crate::mutate::opts::{ContourOverlap, Inclusivity};
    use crate::phantom;
    use nalgebra::{Point3, Unit, Vector3};

    fn z_hint() -> Unit<Vector3<f64>> {
        Unit::new_normalize(Vector3::z())
    }

    #[test]
    fn test_prepared_degenerate() {
        let c = crate::Contour::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert!(PreparedContour::build(&c, z_hint()).is_none());
    }

    #[test]
    fn test_prepared_orientation_sign() {
        let ccw = phantom::square_contour(Point3::origin(), 10.0);
        let cw = crate::Contour::new(ccw.points().iter().rev().copied().collect());

        let p_ccw = PreparedContour::build(&ccw, z_hint()).unwrap();
        let p_cw = PreparedContour::build(&cw, z_hint()).unwrap();
        assert!(p_ccw.positive);
        assert!(!p_cw.positive);

        // 包含判定与绕向无关.
        let q = Point3::new(1.0, 1.0, 0.0);
        assert!(p_ccw.contains(&q));
        assert!(p_cw.contains(&q));
    }

    #[test]
    fn test_prepared_applies_to() {
        let c = phantom::square_contour(Point3::new(0.0, 0.0, 2.0), 10.0);
        let p = PreparedContour::build(&c, z_hint()).unwrap();
        let image_plane = crate::Plane::new(Point3::origin(), z_hint());
        assert!(!p.applies_to(&image_plane, 0.5));
        assert!(p.applies_to(&image_plane, 2.5));
    }

    /// 包含策略的单调嵌套: CornerInclusive ⊇ Centre ⊇ CornerExclusive.
    #[test]
    fn test_inclusivity_nesting() {
        let frame = phantom::axial_frame(Point3::new(-10.0, -10.0, 0.0), 1.0, 1.0, 1.0);
        // 中心相对体素网格错开 1/4 步, 避免角点恰好落在边界容差上.
        let square = phantom::square_contour(Point3::new(0.25, 0.25, 0.0), 6.6);
        let prepared = PreparedContour::build(&square, z_hint()).unwrap();
        let set = [&prepared];

        let mut n_inc = 0u32;
        let mut n_centre = 0u32;
        let mut n_exc = 0u32;
        for row in 0..21 {
            for col in 0..21 {
                let inc = voxel_verdict(
                    &set,
                    ContourOverlap::Ignore,
                    Inclusivity::CornerInclusive,
                    &frame,
                    row,
                    col,
                );
                let centre = voxel_verdict(
                    &set,
                    ContourOverlap::Ignore,
                    Inclusivity::Centre,
                    &frame,
                    row,
                    col,
                );
                let exc = voxel_verdict(
                    &set,
                    ContourOverlap::Ignore,
                    Inclusivity::CornerExclusive,
                    &frame,
                    row,
                    col,
                );

                // 集合包含关系逐体素成立.
                assert!(inc >= centre);
                assert!(centre >= exc);

                n_inc += u32::from(inc);
                n_centre += u32::from(centre);
                n_exc += u32::from(exc);
            }
        }

        // 三种策略严格分层: 8x8 ⊋ 7x7 ⊋ 6x6.
        assert_eq!(n_inc, 64);
        assert_eq!(n_centre, 49);
        assert_eq!(n_exc, 36);
    }
}
