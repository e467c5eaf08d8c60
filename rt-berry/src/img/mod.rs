//! 3D 医学图像的内存表示.
//!
//! 一幅 [`GridImage`] 是 `(行, 列, 通道)` 布局的体素网格
//! ([`ndarray::Array3<f32>`]) 加上空间元数据 [`ImageFrame`].
//! 体素值的文件编解码 (DICOM / nifti) 由外部负责.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use nalgebra::{Point3, Unit, Vector3};
use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::geom::Plane;
use crate::Idx3d;

mod window;

pub use window::WindowLevel;

/// 图像的空间元数据: 原点、行 / 列方向单位向量、行 / 列间距、
/// 切片厚度, 以及字符串键元数据.
///
/// 约定第 `(0, 0)` 体素的中心即 `origin`; `(row, col)` 体素的中心为
/// `origin + row_unit * (row_step * row) + col_unit * (col_step * col)`.
/// 行 / 列间距相互独立, 各向异性体素同样适用.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    origin: Point3<f64>,
    row_unit: Unit<Vector3<f64>>,
    col_unit: Unit<Vector3<f64>>,
    row_step: f64,
    col_step: f64,
    thickness: f64,
    metadata: HashMap<String, String>,
}

impl ImageFrame {
    /// 创建空间元数据. 元数据映射初始为空.
    ///
    /// `row_step` 和 `col_step` 必须为正的有限值, `thickness`
    /// 必须为非负的有限值, 否则返回 `None`.
    pub fn new(
        origin: Point3<f64>,
        row_unit: Unit<Vector3<f64>>,
        col_unit: Unit<Vector3<f64>>,
        row_step: f64,
        col_step: f64,
        thickness: f64,
    ) -> Option<Self> {
        if !(row_step.is_finite() && row_step > 0.0) {
            return None;
        }
        if !(col_step.is_finite() && col_step > 0.0) {
            return None;
        }
        if !(thickness.is_finite() && thickness >= 0.0) {
            return None;
        }
        Some(Self {
            origin,
            row_unit,
            col_unit,
            row_step,
            col_step,
            thickness,
            metadata: HashMap::new(),
        })
    }

    /// 获取第 `(0, 0)` 体素的中心.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// 获取行索引增长方向的单位向量.
    #[inline]
    pub fn row_unit(&self) -> Unit<Vector3<f64>> {
        self.row_unit
    }

    /// 获取列索引增长方向的单位向量.
    #[inline]
    pub fn col_unit(&self) -> Unit<Vector3<f64>> {
        self.col_unit
    }

    /// 获取相邻行之间的距离, 以毫米为单位.
    #[inline]
    pub fn row_step(&self) -> f64 {
        self.row_step
    }

    /// 获取相邻列之间的距离, 以毫米为单位.
    #[inline]
    pub fn col_step(&self) -> f64 {
        self.col_step
    }

    /// 获取切片厚度, 以毫米为单位.
    #[inline]
    pub fn thickness(&self) -> f64 {
        self.thickness
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

    /// 计算 `(row, col)` 体素中心的空间位置.
    #[inline]
    pub fn position(&self, row: usize, col: usize) -> Point3<f64> {
        self.position_f(row as f64, col as f64)
    }

    /// 以实数索引计算空间位置. 供亚体素位置 (如图像中心) 使用.
    #[inline]
    pub fn position_f(&self, row: f64, col: f64) -> Point3<f64> {
        self.origin
            + self.row_unit.scale(self.row_step * row)
            + self.col_unit.scale(self.col_step * col)
    }

    /// 计算 `(row, col)` 体素投影到图像平面上的四个角的位置,
    /// 即中心沿行 / 列方向各偏移半步.
    pub fn planar_corners(&self, row: usize, col: usize) -> [Point3<f64>; 4] {
        let c = self.position(row, col);
        let dr = self.row_unit.scale(self.row_step * 0.5);
        let dc = self.col_unit.scale(self.col_step * 0.5);
        [c - dr - dc, c - dr + dc, c + dr + dc, c + dr - dc]
    }

    /// 获取图像平面的法向 (行方向叉乘列方向).
    #[inline]
    pub fn ortho_unit(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.row_unit.cross(&self.col_unit))
    }

    /// 获取图像所在的有向平面.
    #[inline]
    pub fn plane(&self) -> Plane {
        Plane::new(self.origin, self.ortho_unit())
    }
}

/// 一幅带空间元数据的体素图像. 体素按 `(行, 列, 通道)` 存储为 `f32`.
#[derive(Clone, Debug)]
pub struct GridImage {
    frame: ImageFrame,
    data: Array3<f32>,
}

impl Index<Idx3d> for GridImage {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<Idx3d> for GridImage {
    #[inline]
    fn index_mut(&mut self, index: Idx3d) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl GridImage {
    /// 创建 `(rows, cols, channels)` 形状、以 `fill` 填充的图像.
    #[inline]
    pub fn filled(frame: ImageFrame, shape: Idx3d, fill: f32) -> Self {
        Self {
            frame,
            data: Array3::from_elem(shape, fill),
        }
    }

    /// 由现成的体素数组和空间元数据直接创建图像.
    #[inline]
    pub fn from_parts(frame: ImageFrame, data: Array3<f32>) -> Self {
        Self { frame, data }
    }

    /// 获取数据形状大小, 格式为 (行数, 列数, 通道数).
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取行数.
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape().0
    }

    /// 获取列数.
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape().1
    }

    /// 获取通道数.
    #[inline]
    pub fn channels(&self) -> usize {
        self.shape().2
    }

    /// 获取空间元数据.
    #[inline]
    pub fn frame(&self) -> &ImageFrame {
        &self.frame
    }

    /// 获取可变空间元数据.
    #[inline]
    pub fn frame_mut(&mut self) -> &mut ImageFrame {
        &mut self.frame
    }

    /// 获取给定位置 (行, 列, 通道) 的体素值. 越界时返回 `None`.
    #[inline]
    pub fn get(&self, pos: Idx3d) -> Option<f32> {
        self.data.get(pos).copied()
    }

    /// 获取给定位置 (行, 列, 通道) 的体素值, 并可就地修改. 越界时返回 `None`.
    #[inline]
    pub fn get_mut(&mut self, pos: Idx3d) -> Option<&mut f32> {
        self.data.get_mut(pos)
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// 获得数据的一份可变 shallow copy.
    #[inline]
    pub fn data_mut(&mut self) -> ArrayViewMut3<'_, f32> {
        self.data.view_mut()
    }

    /// 同时借用空间元数据 (只读) 与体素数据 (可变).
    /// 变换驱动在回调中需要二者并存.
    #[inline]
    pub(crate) fn split_mut(&mut self) -> (&ImageFrame, ArrayViewMut3<'_, f32>) {
        let Self { frame, data } = self;
        (&*frame, data.view_mut())
    }

    /// 将所有体素填充为 `value`.
    #[inline]
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// 获取全部有限体素值的最小值和最大值, 忽略 NaN / inf.
    ///
    /// 不存在有限体素时返回 `None`.
    pub fn finite_minmax(&self) -> Option<(f32, f32)> {
        let mut ans: Option<(f32, f32)> = None;
        for &v in self.data.iter().filter(|v| v.is_finite()) {
            ans = Some(match ans {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
        ans
    }

    /// 计算图像几何中心 (全部体素中心的均值) 的空间位置.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        let (rows, cols, _) = self.shape();
        self.frame
            .position_f((rows.saturating_sub(1)) as f64 * 0.5, (cols.saturating_sub(1)) as f64 * 0.5)
    }
}

/// 有序的图像序列.
///
/// 该结构完全透明, 用户可以直接操作 `images` 来实现上层功能.
#[derive(Clone, Debug, Default)]
pub struct ImageSet {
    /// 序列内的全部图像.
    pub images: Vec<GridImage>,
}

impl ImageSet {
    /// 由图像序列创建集合.
    #[inline]
    pub fn new(images: Vec<GridImage>) -> Self {
        Self { images }
    }

    /// 集合是否不含任何图像?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 获取图像个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// 计算集合内全部图像几何中心的均值. 集合为空时返回 `None`.
    pub fn center(&self) -> Option<Point3<f64>> {
        if self.images.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.images.iter().map(|i| i.center().coords).sum();
        Some(Point3::from(sum / self.images.len() as f64))
    }
}
