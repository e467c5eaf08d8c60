use nalgebra::{Point3, Unit, Vector3};

/// 3D 空间中的有向平面, 由平面上一点和单位法向组成.
///
/// 该结构是只读的. 若要修改平面参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug)]
pub struct Plane {
    origin: Point3<f64>,
    normal: Unit<Vector3<f64>>,
}

impl Plane {
    /// 以 `origin` 为平面上一点, `normal` 为单位法向, 创建平面.
    #[inline]
    pub fn new(origin: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self { origin, normal }
    }

    /// 以 `origin` 为平面上一点, `normal` 为 (未必单位化的) 法向量, 创建平面.
    ///
    /// 当 `normal` 过短而无法单位化时返回 `None`.
    #[inline]
    pub fn from_vector(origin: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let normal = Unit::try_new(normal, 1e-12)?;
        Some(Self { origin, normal })
    }

    /// 获取平面上的参考点.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// 获取平面单位法向.
    #[inline]
    pub fn normal(&self) -> Unit<Vector3<f64>> {
        self.normal
    }

    /// 计算点 `p` 到平面的有向距离. 法向一侧为正.
    #[inline]
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.origin))
    }

    /// 将点 `p` 正交投影到平面上.
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        p - self.normal.scale(self.signed_distance(p))
    }

    /// 返回沿法向平移 `offset` 后的新平面.
    #[inline]
    pub fn offset_along_normal(&self, offset: f64) -> Self {
        Self {
            origin: self.origin + self.normal.scale(offset),
            normal: self.normal,
        }
    }

    /// 获取平面内的一组确定性正交单位基 `(u, v)`.
    ///
    /// `(u, v, normal)` 构成右手系, 因此逆着法向看,
    /// 在 `(u, v)` 坐标下逆时针绕行的多边形有向面积为正.
    /// 相同法向的平面返回相同的基.
    pub fn basis(&self) -> (Unit<Vector3<f64>>, Unit<Vector3<f64>>) {
        let n = self.normal.as_ref();

        // 选与法向夹角最大的坐标轴, 保证数值稳定.
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        let axis = if ax <= ay && ax <= az {
            Vector3::x()
        } else if ay <= az {
            Vector3::y()
        } else {
            Vector3::z()
        };

        let u = Unit::new_normalize(axis - n.scale(axis.dot(n)));
        let v = Unit::new_normalize(n.cross(&u));
        (u, v)
    }

    /// 将点 `p` 先投影到平面, 再表示为平面局部基 `(u, v)` 下的 2D 坐标.
    #[inline]
    pub fn local_coords(&self, p: &Point3<f64>) -> [f64; 2] {
        let (u, v) = self.basis();
        let d = p - self.origin;
        [d.dot(&u), d.dot(&v)]
    }
}
