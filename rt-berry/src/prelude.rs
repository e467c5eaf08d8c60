//! 🍒一次引入🍒
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::geom::{orthogonalize3, split_contour, Contour, ContourSet, Line, Plane};

pub use crate::img::{GridImage, ImageFrame, ImageSet, WindowLevel};

pub use crate::mutate::{
    mutate_voxels, Adjacency, Aggregate, ChannelSelect, ContourOverlap, EditStyle, Inclusivity,
    MaskMod, MutateError, MutateOpts, MutateResult, Overwrite, ParsePolicyError, VoxelFn,
    VoxelVisitors,
};

#[cfg(feature = "rayon")]
pub use crate::mutate::par_mutate_voxels;

pub use crate::bisect::{area_above_plane, bisect_total_area, BisectOutcome};

pub use crate::consts::keys;

pub use crate::phantom;
