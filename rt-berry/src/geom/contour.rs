use std::collections::HashMap;

use itertools::Itertools;
use nalgebra::{Point3, Unit, Vector3};
use ordered_float::OrderedFloat;

use super::Plane;
use crate::consts::{keys, BOUNDARY_EPS, MIN_CONTOUR_POINTS};

/// 闭合轮廓: 近似共面的有序 3D 顶点环, 以及字符串键元数据 (如 ROI 名称).
///
/// 顶点序列隐式闭合, 即最后一点与第一点相连, 不需要重复存储首点.
/// 顶点数少于 [`MIN_CONTOUR_POINTS`] 的轮廓是退化的: 它不会参与
/// 任何包含判定 (恒判为外部), 也不会被视为错误.
#[derive(Clone, Debug)]
pub struct Contour {
    points: Vec<Point3<f64>>,
    metadata: HashMap<String, String>,
}

impl Contour {
    /// 由顶点序列创建轮廓, 元数据为空.
    #[inline]
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            metadata: HashMap::new(),
        }
    }

    /// 由顶点序列和元数据创建轮廓.
    #[inline]
    pub fn with_metadata(points: Vec<Point3<f64>>, metadata: HashMap<String, String>) -> Self {
        Self { points, metadata }
    }

    /// 获取顶点序列.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// 获取元数据.
    #[inline]
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// 获取可变元数据.
    #[inline]
    pub fn metadata_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.metadata
    }

    /// 获取 ROI 名称 (元数据 `"ROIName"` 键). 不存在时返回 `None`.
    #[inline]
    pub fn roi_name(&self) -> Option<&str> {
        self.metadata.get(keys::ROI_NAME).map(String::as_str)
    }

    /// 该轮廓是否是退化的 (顶点数不足以构成闭合多边形)?
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < MIN_CONTOUR_POINTS
    }

    /// 计算顶点质心. 轮廓为空时返回 `None`.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.points.len() as f64))
    }

    /// 求经过顶点质心的最佳拟合平面, 法向与 `hint` 同侧.
    ///
    /// 法向由 Newell 方法估计: 对平面多边形该结果是精确的,
    /// 对近似共面多边形则是稳健的近似. 共线退化 (估计法向为零)
    /// 时直接采用 `hint` 作为法向. 轮廓退化时返回 `None`.
    ///
    /// 拟合残差不设上限: 偏离平面较远的轮廓同样被接受.
    pub fn best_fit_plane(&self, hint: Unit<Vector3<f64>>) -> Option<Plane> {
        if self.is_degenerate() {
            return None;
        }
        let c = self.centroid()?;

        let mut n = Vector3::zeros();
        for (a, b) in self.points.iter().copied().circular_tuple_windows::<(_, _)>() {
            n += (a - c).cross(&(b - c));
        }

        let mut normal = Unit::try_new(n, 1e-12).unwrap_or(hint);
        if normal.dot(&hint) < 0.0 {
            normal = -normal;
        }
        Some(Plane::new(c, normal))
    }

    /// 计算轮廓在 `plane` 局部坐标下的有向面积 (shoelace 公式).
    ///
    /// 逆着平面法向看, 逆时针绕行为正. 退化轮廓的面积为 0.
    pub fn signed_area(&self, plane: &Plane) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        let area2: f64 = self
            .points
            .iter()
            .map(|p| plane.local_coords(p))
            .circular_tuple_windows::<(_, _)>()
            .map(|([ax, ay], [bx, by])| ax * by - bx * ay)
            .sum();
        area2 * 0.5
    }

    /// 该轮廓在 `plane` 下是否为逆时针 (正) 绕向?
    #[inline]
    pub fn is_counter_clockwise(&self, plane: &Plane) -> bool {
        self.signed_area(plane) > 0.0
    }

    /// 将轮廓统一为逆时针 (正) 绕向. 若实际发生了翻转则返回 `true`.
    pub fn reorient_counter_clockwise(&mut self, plane: &Plane) -> bool {
        if self.signed_area(plane) < 0.0 {
            self.points.reverse();
            return true;
        }
        false
    }

    /// 判断点 `p` 正交投影到 `plane` 后是否落在轮廓的投影多边形内.
    ///
    /// 采用闭测试: 边界点 (容差 [`BOUNDARY_EPS`]) 算作内部.
    /// 退化轮廓恒返回 `false`.
    pub fn contains_projected(&self, plane: &Plane, p: &Point3<f64>) -> bool {
        if self.is_degenerate() {
            return false;
        }
        let ring: Vec<[f64; 2]> = self.points.iter().map(|q| plane.local_coords(q)).collect();
        point_in_ring_closed(plane.local_coords(p), &ring)
    }

    /// 求所有顶点沿方向 `direction` 的有向投影的最小值和最大值.
    ///
    /// 轮廓为空时返回 `None`.
    pub fn extreme_offsets(&self, direction: &Unit<Vector3<f64>>) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|p| OrderedFloat(direction.dot(&p.coords)))
            .minmax()
            .into_option()
            .map(|(lo, hi)| (lo.0, hi.0))
    }
}

/// 共享同一 ROI 标签的轮廓集合.
///
/// 通常 (但不要求) 各轮廓共面于同一成像切片. 该结构完全透明,
/// 用户可以直接操作 `contours` 来实现上层功能.
#[derive(Clone, Debug, Default)]
pub struct ContourSet {
    /// 集合内的全部轮廓.
    pub contours: Vec<Contour>,
}

impl ContourSet {
    /// 由轮廓序列创建集合.
    #[inline]
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    /// 集合是否不含任何轮廓?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// 获取集合的 ROI 名称, 即第一个携带名称的轮廓的名称.
    pub fn roi_name(&self) -> Option<&str> {
        self.contours.iter().find_map(Contour::roi_name)
    }

    /// 估计集合的公共平面法向: 取第一个非退化轮廓的最佳拟合平面法向.
    ///
    /// 集合中没有可用轮廓时返回 `None`.
    pub fn estimate_normal(&self, hint: Unit<Vector3<f64>>) -> Option<Unit<Vector3<f64>>> {
        self.contours
            .iter()
            .find_map(|c| c.best_fit_plane(hint))
            .map(|p| p.normal())
    }

    /// 将集合内所有非退化轮廓统一为逆时针 (正) 绕向.
    /// 返回实际被翻转的轮廓数.
    pub fn reorient_counter_clockwise(&mut self, hint: Unit<Vector3<f64>>) -> usize {
        let mut flipped = 0;
        for c in self.contours.iter_mut() {
            if let Some(plane) = c.best_fit_plane(hint) {
                if c.reorient_counter_clockwise(&plane) {
                    flipped += 1;
                }
            }
        }
        flipped
    }

    /// 计算集合内所有轮廓的绝对面积之和.
    /// 每个轮廓的面积在其自身最佳拟合平面下计算.
    pub fn total_area(&self, hint: Unit<Vector3<f64>>) -> f64 {
        self.contours
            .iter()
            .filter_map(|c| {
                let plane = c.best_fit_plane(hint)?;
                Some(c.signed_area(&plane).abs())
            })
            .sum()
    }

    /// 求集合内所有顶点沿 `direction` 的有向投影的最小值和最大值.
    ///
    /// 集合中没有顶点时返回 `None`.
    pub fn extreme_offsets(&self, direction: &Unit<Vector3<f64>>) -> Option<(f64, f64)> {
        self.contours
            .iter()
            .flat_map(|c| c.points().iter())
            .map(|p| OrderedFloat(direction.dot(&p.coords)))
            .minmax()
            .into_option()
            .map(|(lo, hi)| (lo.0, hi.0))
    }
}

/// 闭测试: 判断 2D 点 `q` 是否在多边形环 `ring` 内或其边界上.
///
/// 边界容差为 [`BOUNDARY_EPS`]. 内部采用 even-odd (射线穿越计数) 规则.
pub(crate) fn point_in_ring_closed(q: [f64; 2], ring: &[[f64; 2]]) -> bool {
    if ring.len() < MIN_CONTOUR_POINTS {
        return false;
    }

    // 边界点算内部. 该选择必须与相邻体素的分类保持一致.
    for (&a, &b) in ring.iter().circular_tuple_windows::<(_, _)>() {
        if point_on_segment(q, a, b) {
            return true;
        }
    }

    let [qx, qy] = q;
    let mut inside = false;
    for (&[ax, ay], &[bx, by]) in ring.iter().circular_tuple_windows::<(_, _)>() {
        if (ay > qy) != (by > qy) {
            let t = (qy - ay) / (by - ay);
            let x = ax + t * (bx - ax);
            if qx < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// 2D 点到线段的距离是否不超过 [`BOUNDARY_EPS`]?
fn point_on_segment([qx, qy]: [f64; 2], [ax, ay]: [f64; 2], [bx, by]: [f64; 2]) -> bool {
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((qx - ax) * dx + (qy - ay) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (ex, ey) = (ax + t * dx - qx, ay + t * dy - qy);
    (ex * ex + ey * ey).sqrt() <= BOUNDARY_EPS
}

#[cfg(test)]
mod tests {
    use super::{Contour, ContourSet};
    use crate::phantom;
    use nalgebra::{Point3, Unit, Vector3};

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn z_hint() -> Unit<Vector3<f64>> {
        Unit::new_normalize(Vector3::z())
    }

    #[test]
    fn test_contour_degenerate() {
        let c = Contour::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert!(c.is_degenerate());
        assert!(c.best_fit_plane(z_hint()).is_none());

        // 退化轮廓的包含判定恒为 false.
        let square = phantom::square_contour(Point3::origin(), 10.0);
        let plane = square.best_fit_plane(z_hint()).unwrap();
        assert!(!c.contains_projected(&plane, &Point3::origin()));
    }

    #[test]
    fn test_contour_signed_area_square() {
        let c = phantom::square_contour(Point3::origin(), 10.0);
        let plane = c.best_fit_plane(z_hint()).unwrap();
        assert!(f64_eq(c.signed_area(&plane), 100.0));
        assert!(c.is_counter_clockwise(&plane));

        // 翻转顶点序后面积变号.
        let mut flipped = Contour::new(c.points().iter().rev().copied().collect());
        assert!(f64_eq(flipped.signed_area(&plane), -100.0));
        assert!(flipped.reorient_counter_clockwise(&plane));
        assert!(f64_eq(flipped.signed_area(&plane), 100.0));
    }

    #[test]
    fn test_contour_best_fit_plane_tilted() {
        // 倾斜平面上的三角形: 法向 (1, 1, 1) / sqrt(3).
        let c = Contour::new(vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]);
        let hint = Unit::new_normalize(Vector3::new(1.0, 1.0, 1.0));
        let plane = c.best_fit_plane(hint).unwrap();
        assert!(f64_eq(plane.normal().dot(&hint), 1.0));

        // hint 反向时, 法向跟着反向.
        let plane2 = c.best_fit_plane(-hint).unwrap();
        assert!(f64_eq(plane2.normal().dot(&hint), -1.0));
    }

    #[test]
    fn test_contour_contains_projected() {
        let c = phantom::square_contour(Point3::origin(), 10.0);
        let plane = c.best_fit_plane(z_hint()).unwrap();

        assert!(c.contains_projected(&plane, &Point3::origin()));
        assert!(c.contains_projected(&plane, &Point3::new(4.99, 4.99, 0.0)));
        assert!(!c.contains_projected(&plane, &Point3::new(5.01, 0.0, 0.0)));
        assert!(!c.contains_projected(&plane, &Point3::new(-7.0, 7.0, 0.0)));

        // 闭测试: 边界点与角点算内部.
        assert!(c.contains_projected(&plane, &Point3::new(5.0, 0.0, 0.0)));
        assert!(c.contains_projected(&plane, &Point3::new(5.0, 5.0, 0.0)));

        // 投影是正交的: 离开平面的点投影后判定不变.
        assert!(c.contains_projected(&plane, &Point3::new(0.0, 0.0, 42.0)));
    }

    #[test]
    fn test_contour_extreme_offsets() {
        let c = phantom::square_contour(Point3::new(1.0, 2.0, 3.0), 10.0);
        let (lo, hi) = c.extreme_offsets(&z_hint()).unwrap();
        assert!(f64_eq(lo, 3.0));
        assert!(f64_eq(hi, 3.0));

        let x = Unit::new_normalize(Vector3::x());
        let (lo, hi) = c.extreme_offsets(&x).unwrap();
        assert!(f64_eq(lo, -4.0));
        assert!(f64_eq(hi, 6.0));
    }

    #[test]
    fn test_contour_set_basic() {
        let mut set = ContourSet::new(vec![
            phantom::square_contour(Point3::origin(), 10.0),
            phantom::square_contour(Point3::new(20.0, 0.0, 0.0), 2.0),
        ]);
        set.contours[0]
            .metadata_mut()
            .insert("ROIName".into(), "Gross_Liver".into());

        assert_eq!(set.roi_name(), Some("Gross_Liver"));
        assert!(f64_eq(set.total_area(z_hint()), 104.0));
        assert_eq!(set.reorient_counter_clockwise(z_hint()), 0);

        let (lo, hi) = set.extreme_offsets(&Unit::new_normalize(Vector3::x())).unwrap();
        assert!(f64_eq(lo, -5.0));
        assert!(f64_eq(hi, 21.0));
    }
}
