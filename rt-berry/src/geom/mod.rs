//! 平面几何原语.
//!
//! 所有坐标均为毫米单位的右手系 3D 实数坐标. 多边形 (轮廓) 的绕向符号
//! 由其在给定平面局部坐标系下的有向面积决定: 逆着平面法向看,
//! 逆时针为正. 正绕向代表外边界, 负绕向代表洞 (hole).

use nalgebra::{Unit, Vector3};

mod clip;
mod contour;
mod line;
mod plane;

pub use clip::split_contour;
pub use contour::{Contour, ContourSet};
pub use line::Line;
pub use plane::Plane;

pub(crate) use contour::point_in_ring_closed;

/// 对 `(u, v, w)` 做 Gram-Schmidt 正交化, 返回三个正交单位向量.
///
/// `u` 的方向保持不变. 当任一向量在前面向量张成的子空间内
/// (即无法正交化) 时返回 `None`.
pub fn orthogonalize3(
    u: Vector3<f64>,
    v: Vector3<f64>,
    w: Vector3<f64>,
) -> Option<[Unit<Vector3<f64>>; 3]> {
    let eps = 1e-12;
    let u = Unit::try_new(u, eps)?;
    let v = Unit::try_new(v - u.scale(u.dot(&v)), eps)?;
    let w = w - u.scale(u.dot(&w)) - v.scale(v.dot(&w));
    let w = Unit::try_new(w, eps)?;
    Some([u, v, w])
}

#[cfg(test)]
mod tests {
    use super::orthogonalize3;
    use nalgebra::Vector3;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_orthogonalize3_skewed() {
        let [u, v, w] = orthogonalize3(
            Vector3::new(1.0, 0.1, 0.0),
            Vector3::new(0.0, 1.0, 0.2),
            Vector3::new(0.1, 0.0, 1.0),
        )
        .unwrap();

        assert!(f64_eq(u.dot(&v), 0.0));
        assert!(f64_eq(u.dot(&w), 0.0));
        assert!(f64_eq(v.dot(&w), 0.0));
        assert!(f64_eq(u.norm(), 1.0));
        assert!(f64_eq(v.norm(), 1.0));
        assert!(f64_eq(w.norm(), 1.0));
    }

    #[test]
    fn test_orthogonalize3_degenerate() {
        // v 与 u 共线, 无法正交化.
        let ans = orthogonalize3(
            Vector3::x(),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::z(),
        );
        assert!(ans.is_none());
    }
}
