//! 体素变换驱动.
//!
//! 以图像为任务粒度: 每幅图像由一个 worker 独占处理, 图像之间没有
//! 顺序保证; 图像内部的体素遍历顺序未定, 回调契约要求逐体素结果与
//! 遍历顺序无关 (回调之间不得传递跨体素状态).

use either::Either;

use super::classify::{voxel_verdict, PreparedContour};
use super::error::MutateError;
use super::opts::{Aggregate, ChannelSelect, MaskMod, MutateOpts};
use super::MutateResult;
use crate::consts::PLANE_EPS;
use crate::geom::ContourSet;
use crate::img::{GridImage, ImageFrame, ImageSet};
use crate::Idx3d;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
    }
}

/// 体素回调: 参数依次为 (行, 列, 通道) 索引、图像空间元数据、
/// 体素值的可变引用.
///
/// 回调自身不得持有跨体素可变状态 (逐体素结果必须与遍历顺序无关),
/// 并且需要 `Sync` 以便在并行 pass 中跨 worker 共享.
pub type VoxelFn<'a> = &'a (dyn Fn(Idx3d, &ImageFrame, &mut f32) + Sync);

/// 一次 pass 注册的回调组. 三个回调均可缺省, 缺省等价于无操作.
///
/// 只想做单侧覆写的调用方只注册相应一侧的回调即可.
#[derive(Copy, Clone, Default)]
pub struct VoxelVisitors<'a> {
    /// 体素判为内部时调用.
    pub bounded: Option<VoxelFn<'a>>,

    /// 体素判为外部时调用.
    pub unbounded: Option<VoxelFn<'a>>,

    /// 无论裁决如何, 在上述分派之后无条件调用.
    pub visitor: Option<VoxelFn<'a>>,
}

impl VoxelVisitors<'_> {
    /// 是否一个回调都没有注册?
    #[inline]
    fn is_vacant(&self) -> bool {
        self.bounded.is_none() && self.unbounded.is_none() && self.visitor.is_none()
    }
}

/// 顺序执行一次体素分类 + 变换 pass.
///
/// 对 `images` 中每幅图像的每个体素, 按 `opts` 在 `rois`
/// 上求内外裁决, 并分派给 `visitors` 中注册的回调.
///
/// # 返回值
///
/// - 配置一个回调都没有注册时, 返回 `Err(MutateError::NoCallbacks)`;
/// - 轮廓选择为空 (或全部退化) 时, 返回 `Err(MutateError::EmptyContours)`;
/// - 图像选择为空时, 返回 `Err(MutateError::EmptyImages)`;
/// - 以上校验都在任何体素被修改之前完成 (fail-fast);
/// - 逐图像处理中发现通道越界时, 返回
///   `Err(MutateError::ChannelOutOfRange)`. 此时先于该图像完成的图像
///   **不会** 被回滚 (变换不是事务性的);
/// - 其他情况下成功, 返回 `Ok(())`.
pub fn mutate_voxels(
    images: &mut ImageSet,
    rois: &[ContourSet],
    opts: &MutateOpts,
    visitors: &VoxelVisitors<'_>,
) -> MutateResult<()> {
    let prepared = prepare(images, rois, visitors)?;
    images
        .images
        .iter_mut()
        .try_for_each(|img| mutate_one(img, &prepared, opts, visitors))
}

/// 借助 `rayon`, 并行执行一次体素分类 + 变换 pass.
///
/// 每幅图像恰好由一个 worker 独占处理; 轮廓与策略包只读共享.
/// 校验与错误语义同 [`mutate_voxels`]: 某幅图像失败会中止整个
/// pass, 但已完成的图像不会回滚.
#[cfg(feature = "rayon")]
pub fn par_mutate_voxels(
    images: &mut ImageSet,
    rois: &[ContourSet],
    opts: &MutateOpts,
    visitors: &VoxelVisitors<'_>,
) -> MutateResult<()> {
    let prepared = prepare(images, rois, visitors)?;
    images
        .images
        .par_iter_mut()
        .try_for_each(|img| mutate_one(img, &prepared, opts, visitors))
}

/// pass 前置校验, 并把轮廓集合逐一预投影.
///
/// 返回的外层 `Vec` 与 `rois` 一一对应; 退化轮廓被静默跳过.
fn prepare(
    images: &ImageSet,
    rois: &[ContourSet],
    visitors: &VoxelVisitors<'_>,
) -> MutateResult<Vec<Vec<PreparedContour>>> {
    if visitors.is_vacant() {
        return Err(MutateError::NoCallbacks);
    }
    if images.is_empty() {
        return Err(MutateError::EmptyImages);
    }

    // 以第一幅图像的法向为拟合提示, 让整个 pass 共享同一个
    // "上 / 下" 方向语义.
    let hint = images.images[0].frame().ortho_unit();

    let prepared: Vec<Vec<PreparedContour>> = rois
        .iter()
        .map(|set| {
            set.contours
                .iter()
                .filter_map(|c| PreparedContour::build(c, hint))
                .collect()
        })
        .collect();

    if prepared.iter().all(Vec::is_empty) {
        return Err(MutateError::EmptyContours);
    }
    Ok(prepared)
}

/// 处理一幅图像的全部体素. worker 粒度的入口.
fn mutate_one(
    img: &mut GridImage,
    sets: &[Vec<PreparedContour>],
    opts: &MutateOpts,
    visitors: &VoxelVisitors<'_>,
) -> MutateResult<()> {
    let (rows, cols, channels) = img.shape();
    if let ChannelSelect::Only(c) = opts.channel {
        if c >= channels {
            return Err(MutateError::ChannelOutOfRange(c, channels));
        }
    }

    // 与图像平面关联的集合 (保持调用方给定的集合顺序).
    let image_plane = img.frame().plane();
    let half_thickness = img.frame().thickness() * 0.5 + PLANE_EPS;
    let assoc: Vec<Vec<&PreparedContour>> = sets
        .iter()
        .map(|set| {
            set.iter()
                .filter(|c| c.applies_to(&image_plane, half_thickness))
                .collect::<Vec<_>>()
        })
        .filter(|set: &Vec<_>| !set.is_empty())
        .collect();

    let (frame, mut data) = img.split_mut();
    for row in 0..rows {
        for col in 0..cols {
            // 裁决与通道无关, 每个 (行, 列) 只求一次.
            let mut verdict = aggregate_verdict(&assoc, opts, frame, row, col);
            if opts.maskmod == MaskMod::Invert {
                verdict = !verdict;
            }

            let chan_iter = match opts.channel {
                ChannelSelect::All => Either::Left(0..channels),
                ChannelSelect::Only(c) => Either::Right(std::iter::once(c)),
            };
            for chan in chan_iter {
                let value = &mut data[(row, col, chan)];
                if verdict {
                    if let Some(f) = visitors.bounded {
                        f((row, col, chan), frame, value);
                    }
                } else if let Some(f) = visitors.unbounded {
                    f((row, col, chan), frame, value);
                }
                if let Some(f) = visitors.visitor {
                    f((row, col, chan), frame, value);
                }
            }
        }
    }
    Ok(())
}

/// 跨轮廓集合聚合 `(row, col)` 体素的最终裁决.
///
/// `assoc` 只包含与当前图像平面关联的集合; 没有任何关联集合的体素
/// 在所有聚合策略下都判为外部.
fn aggregate_verdict(
    assoc: &[Vec<&PreparedContour>],
    opts: &MutateOpts,
    frame: &ImageFrame,
    row: usize,
    col: usize,
) -> bool {
    let verdict_of = |set: &Vec<&PreparedContour>| {
        voxel_verdict(set, opts.contouroverlap, opts.inclusivity, frame, row, col)
    };
    match opts.aggregate {
        Aggregate::First => assoc.first().map(verdict_of).unwrap_or(false),
        Aggregate::Union => assoc.iter().any(verdict_of),
        Aggregate::Intersection => !assoc.is_empty() && assoc.iter().all(verdict_of),
    }
}
