//! 测试与实验用合成数据 (phantom).
//!
//! 提供规则形状的轮廓与均匀图像, 供单元测试和上层实验二进制搭建
//! 可控场景. 生产数据应由调用方从外部数据源组织.

use nalgebra::{Point3, Unit, Vector3};

use crate::img::{GridImage, ImageFrame};
use crate::{Contour, Idx3d};

/// 生成 XY 平面上以 `center` 为中心、边长为 `side` 的正方形轮廓.
///
/// 顶点按逆时针 (相对 +z 法向) 排列, 有向面积为正.
pub fn square_contour(center: Point3<f64>, side: f64) -> Contour {
    let h = side * 0.5;
    Contour::new(vec![
        center + Vector3::new(-h, -h, 0.0),
        center + Vector3::new(h, -h, 0.0),
        center + Vector3::new(h, h, 0.0),
        center + Vector3::new(-h, h, 0.0),
    ])
}

/// 生成 XY 平面上以 `center` 为中心、半径为 `radius` 的近似圆轮廓
/// (正 `segments` 边形).
///
/// 顶点按逆时针 (相对 +z 法向) 排列. `segments` 小于 3 时返回的
/// 轮廓是退化的.
pub fn circle_contour(center: Point3<f64>, radius: f64, segments: usize) -> Contour {
    let pts = (0..segments)
        .map(|k| {
            let theta = std::f64::consts::TAU * k as f64 / segments.max(1) as f64;
            center + Vector3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
        })
        .collect();
    Contour::new(pts)
}

/// 生成轴向 (axial) 图像空间元数据: 行方向 +x, 列方向 +y, 法向 +z.
///
/// `origin` 为第 `(0, 0)` 体素的中心. 步长与厚度必须满足
/// [`ImageFrame::new`] 的约束, 否则 panic (合成数据应当总是合法的).
pub fn axial_frame(origin: Point3<f64>, row_step: f64, col_step: f64, thickness: f64) -> ImageFrame {
    ImageFrame::new(
        origin,
        Unit::new_normalize(Vector3::x()),
        Unit::new_normalize(Vector3::y()),
        row_step,
        col_step,
        thickness,
    )
    .unwrap()
}

/// 生成 `shape` 形状、以 `fill` 均匀填充的图像.
#[inline]
pub fn uniform_image(frame: ImageFrame, shape: Idx3d, fill: f32) -> GridImage {
    GridImage::filled(frame, shape, fill)
}

#[cfg(test)]
mod tests {
    use super::{circle_contour, square_contour};
    use nalgebra::{Point3, Unit, Vector3};

    #[test]
    fn test_square_ccw() {
        let c = square_contour(Point3::origin(), 2.0);
        let plane = c.best_fit_plane(Unit::new_normalize(Vector3::z())).unwrap();
        assert!(c.is_counter_clockwise(&plane));
        assert!((c.signed_area(&plane) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_area_approaches_pi() {
        let c = circle_contour(Point3::origin(), 1.0, 512);
        let plane = c.best_fit_plane(Unit::new_normalize(Vector3::z())).unwrap();
        let area = c.signed_area(&plane);
        assert!(area > 0.0);
        assert!((area - std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_circle_degenerate() {
        assert!(circle_contour(Point3::origin(), 1.0, 2).is_degenerate());
    }
}
