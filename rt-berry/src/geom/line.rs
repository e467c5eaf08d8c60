use nalgebra::{Point3, Unit, Vector3};

/// 3D 空间中的无限直线, 由直线上一点和单位方向组成.
///
/// 主要用于在图像上绘制线状图案 (pattern drawing) 时的距离查询.
#[derive(Copy, Clone, Debug)]
pub struct Line {
    anchor: Point3<f64>,
    direction: Unit<Vector3<f64>>,
}

impl Line {
    /// 创建经过点 `a` 和 `b` 的直线.
    ///
    /// 当两点过近而无法确定方向时返回 `None`.
    #[inline]
    pub fn through(a: Point3<f64>, b: Point3<f64>) -> Option<Self> {
        let direction = Unit::try_new(b - a, 1e-12)?;
        Some(Self {
            anchor: a,
            direction,
        })
    }

    /// 获取直线上的参考点.
    #[inline]
    pub fn anchor(&self) -> Point3<f64> {
        self.anchor
    }

    /// 获取直线单位方向.
    #[inline]
    pub fn direction(&self) -> Unit<Vector3<f64>> {
        self.direction
    }

    /// 计算点 `p` 到直线的 (垂直) 距离.
    #[inline]
    pub fn distance_to_point(&self, p: &Point3<f64>) -> f64 {
        (p - self.anchor).cross(&self.direction).norm()
    }
}
