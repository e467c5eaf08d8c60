//! 通用常量.

/// 图像 / 轮廓元数据的字符串键.
pub mod keys {
    /// ROI 名称.
    pub const ROI_NAME: &str = "ROIName";

    /// 规范化 ROI 名称.
    pub const NORMALIZED_ROI_NAME: &str = "NormalizedROIName";

    /// 图像描述.
    pub const DESCRIPTION: &str = "Description";

    /// 窗口中心 (window level).
    pub const WINDOW_CENTER: &str = "WindowCenter";

    /// 窗口宽度 (window width).
    pub const WINDOW_WIDTH: &str = "WindowWidth";

    /// 窗口对哪个描述有效.
    pub const WINDOW_VALID_FOR: &str = "WindowValidFor";

    /// 体素最小值.
    pub const PIXEL_MIN: &str = "PixelMin";

    /// 体素最大值.
    pub const PIXEL_MAX: &str = "PixelMax";

    /// 体素极值对哪个描述有效.
    pub const PIXEL_MINMAX_VALID_FOR: &str = "PixelMinMaxValidFor";
}

/// 一个轮廓可用 (非退化) 所需的最少顶点数.
pub const MIN_CONTOUR_POINTS: usize = 3;

/// 判定投影点落在多边形边界上的绝对容差, 以毫米为单位.
pub const BOUNDARY_EPS: f64 = 1e-6;

/// 判定轮廓落在图像平面上的附加容差, 以毫米为单位.
///
/// 轮廓的平均点到图像平面的距离不超过 `厚度 / 2 + PLANE_EPS`
/// 时, 该轮廓参与此图像的体素分类.
pub const PLANE_EPS: f64 = 1e-6;

/// 面积二分搜索的默认可接受偏差.
pub const BISECT_DEVIATION: f64 = 0.01;

/// 面积二分搜索的默认最大迭代次数.
pub const BISECT_MAX_ITERS: u32 = 20;
