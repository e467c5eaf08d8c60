#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 给定若干 ROI (region of interest) 的闭合轮廓 (contour) 集合,
//! 对 3D 医学图像的每个体素判定 "内部 / 外部", 并原位 (in-place) 执行调用方
//! 提供的体素变换回调.
//!
//! 该 crate 目前仅提供 `safe` 接口. 将来可能为部分高性能场景关键路径提供 `unsafe` 接口.
//!
//! # 注意
//!
//! 1. 轮廓、图像的文件读写 (DICOM / nifti) 不由本 crate 负责, 调用方应自行
//!   将数据组织为 [`Contour`] 与 [`GridImage`].
//! 2. 在非期望情况下, 程序会直接 panic, 而不会导致内存错误. As what Rust promises.
//!
//! # 开发计划
//!
//! ### 平面几何原语 ✅
//!
//! 点 / 直线 / 平面运算, 多边形有向面积与绕向, 最佳拟合平面,
//! 投影点是否在多边形内 (闭测试, 边界点算内部).
//!
//! 实现位于 `rt-berry/src/geom`.
//!
//! ### 轮廓重叠裁决 ✅
//!
//! 将同一空间点上多个 (可能嵌套、可能反向) 轮廓的包含结果合并为一个裁决.
//! 支持 `Ignore` / `HonourOppositeOrientations` / `ImplicitOrientations`
//! 三种重叠策略. 洞 (hole) 语义由每个轮廓的绕向符号 + 局部求和规则表达,
//! 不需要构建包含树.
//!
//! 实现位于 `rt-berry/src/mutate/resolve.rs`.
//!
//! ### 体素包含分类 ✅
//!
//! 体素中心点或平面四角采样, 支持 `Centre` / `CornerInclusive` /
//! `CornerExclusive` 三种包含策略.
//!
//! 实现位于 `rt-berry/src/mutate/classify.rs`.
//!
//! ### 体素变换驱动 ✅
//!
//! 按图像划分任务, 遍历所选图像的全部体素, 分类后分派给调用方注册的
//! bounded (内部) / unbounded (外部) / visitor (无条件) 回调.
//! 各图像相互独立, 可借助 `rayon` 并行运行.
//!
//! 实现位于 `rt-berry/src/mutate/driver.rs`.
//!
//! ### 面积二分平面搜索 ✅
//!
//! 沿固定法向迭代移动切割平面, 使正法向一侧的轮廓总面积收敛到目标比例.
//! 用于剂量子分割 (dose sub-segmentation).
//!
//! 实现位于 `rt-berry/src/bisect.rs`.
//!
//! ### 窗口元数据刷新 ✅
//!
//! 变换结束后根据体素极值刷新 `WindowCenter` / `WindowWidth` 等元数据.
//!
//! 实现位于 `rt-berry/src/img/window.rs`.
//!
//! ### 合成数据 ✅
//!
//! 正方形 / 近似圆轮廓与均匀图像, 供测试和上层实验二进制使用.
//!
//! 实现位于 `rt-berry/src/phantom.rs`.

/// 二维体素索引, 格式为 (行, 列).
pub type Idx2d = (usize, usize);

/// 三维体素索引, 格式为 (行, 列, 通道).
pub type Idx3d = (usize, usize, usize);

pub mod consts;

pub mod geom;

pub use geom::{Contour, ContourSet, Line, Plane};

mod img;

pub use img::{GridImage, ImageFrame, ImageSet, WindowLevel};

pub mod mutate;

pub use mutate::{MutateError, MutateOpts, MutateResult, VoxelVisitors};

pub mod bisect;

pub use bisect::BisectOutcome;

pub mod phantom;

pub mod prelude;
