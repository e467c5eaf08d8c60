//! 体素分类与原位变换引擎.
//!
//! 一次变换 pass 的流程: 调用方选好图像集合与轮廓集合, 配置一份只读的
//! [`MutateOpts`] 策略包与一组可选回调 [`VoxelVisitors`], 然后调用
//! [`mutate_voxels`] (或 `rayon` feature 下的 [`par_mutate_voxels`]).
//! 驱动对每幅图像的每个体素求 "内部 / 外部" 裁决, 并分派给对应回调.
//!
//! 引擎在 pass 期间只持有调用方数据的借用视图: 轮廓与策略包只读共享,
//! 每幅图像的体素存储由恰好一个 worker 独占修改, 因此无需加锁.

mod classify;
mod driver;
mod error;
mod opts;
mod resolve;

pub use driver::{mutate_voxels, VoxelFn, VoxelVisitors};

#[cfg(feature = "rayon")]
pub use driver::par_mutate_voxels;

pub use error::{MutateError, ParsePolicyError};

pub use opts::{
    Adjacency, Aggregate, ChannelSelect, ContourOverlap, EditStyle, Inclusivity, MaskMod,
    MutateOpts, Overwrite,
};

/// 体素变换的运行时结果.
pub type MutateResult<T> = Result<T, MutateError>;
