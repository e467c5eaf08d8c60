//! 在 ROI 内绘制 3D 网格图案的操作实验.
//!
//! 流程: 搭建合成图像栈与正方形 ROI 轮廓, 生成三族相互正交的网格
//! 直线, 然后通过体素变换驱动把 "距任一直线足够近" 的体素覆写为
//! 给定值, 其余覆写为 0. 覆写被限制在 ROI 内部 (或外部, 由
//! `OVERWRITE` 决定).

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use rt_berry::prelude::*;

/// 网格线间距, 以毫米为单位.
const GRID_SEP: f64 = 15.0;

/// 网格线半径 (线条粗细的一半), 以毫米为单位.
const GRID_RAD: f64 = 1.5;

/// 落在网格线上的体素被覆写的值.
const VOXEL_VALUE: f32 = 1.0;

/// 覆写目标. 改为 `"exterior"` 即可反转绘制区域.
const OVERWRITE: &str = "interior";

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
fn sep() {
    println!("{SEP}");
}

/// 搭建 3 层轴向切片栈, 体素中心覆盖 [-10, 10]^2, z = 0, 1, 2.
fn build_images() -> ImageSet {
    let images = (0..3)
        .map(|k| {
            let frame = phantom::axial_frame(
                Point3::new(-10.0, -10.0, k as f64),
                1.0,
                1.0,
                1.0,
            );
            phantom::uniform_image(frame, (21, 21, 1), 0.0)
        })
        .collect();
    ImageSet::new(images)
}

/// 每层切片一个边长 16 的正方形 ROI 轮廓.
fn build_rois() -> ContourSet {
    let contours = (0..3)
        .map(|k| {
            let mut c = phantom::square_contour(Point3::new(0.0, 0.0, k as f64), 16.0);
            c.metadata_mut()
                .insert(keys::ROI_NAME.into(), "Phantom_Body".into());
            c
        })
        .collect();
    ContourSet::new(contours)
}

/// 以图像栈中心为原点生成三族相互正交的网格直线.
///
/// 三个方向由图像行 / 列 / 法向单位向量微旋后再正交化得到,
/// 以免网格与体素网格平行而退化为整面覆写.
fn build_grid_lines(images: &ImageSet) -> Vec<Line> {
    let frame = images.images[0].frame();
    let img_unit_x = frame.row_unit().into_inner();
    let img_unit_y = frame.col_unit().into_inner();
    let img_unit_z = frame.ortho_unit().into_inner();

    use std::f64::consts::PI;
    let rot = |axis: Vector3<f64>, angle: f64| {
        Rotation3::from_axis_angle(&Unit::new_normalize(axis), angle)
    };
    let unit_x = rot(img_unit_y, PI * 0.05) * rot(img_unit_z, PI * 0.03) * img_unit_x;
    let unit_y = rot(img_unit_z, PI * 0.15) * rot(img_unit_x, PI * 0.05) * img_unit_y;
    let unit_z = rot(img_unit_x, PI * 0.25) * rot(img_unit_y, -PI * 0.07) * img_unit_z;
    let [unit_x, unit_y, unit_z] =
        orthogonalize3(unit_x, unit_y, unit_z).expect("网格方向无法正交化");

    let grid_origin = images.center().expect("图像栈为空");
    let img_halfspan = (grid_origin - images.images[0].frame().origin()).norm();
    let n_lines = (img_halfspan / GRID_SEP).ceil() as i64;

    // 三族直线: 分别沿 unit_x / unit_z / unit_y 延伸,
    // 在与之正交的两个方向上按 GRID_SEP 平铺.
    let mut lines = Vec::new();
    let families = [
        (unit_y, unit_z, unit_x),
        (unit_x, unit_y, unit_z),
        (unit_x, unit_z, unit_y),
    ];
    for (tile_a, tile_b, along) in families {
        for a in -n_lines..=n_lines {
            for b in -n_lines..=n_lines {
                let anchor = grid_origin
                    + tile_a.scale(GRID_SEP * a as f64)
                    + tile_b.scale(GRID_SEP * b as f64);
                if let Some(line) = Line::through(anchor, anchor + along.into_inner()) {
                    lines.push(line);
                }
            }
        }
    }
    lines
}

fn main() {
    let mut images = build_images();
    let rois = [build_rois()];
    let grid_lines = build_grid_lines(&images);

    sep();
    println!("网格直线数: {}", grid_lines.len());

    let opts = MutateOpts {
        inclusivity: "center".parse().unwrap(),
        contouroverlap: "ignore".parse().unwrap(),
        channel: ChannelSelect::Only(0),
        ..Default::default()
    };

    // 覆写回调: 距任一网格线小于 GRID_RAD 的体素记为 VOXEL_VALUE,
    // 其余清零.
    let f_overwrite = |(row, col, _chan): Idx3d, frame: &ImageFrame, v: &mut f32| {
        let pos = frame.position(row, col);
        for line in &grid_lines {
            if line.distance_to_point(&pos) < GRID_RAD {
                *v = VOXEL_VALUE;
                return;
            }
        }
        *v = 0.0;
    };

    // 单侧覆写: 只在选定一侧挂回调, 另一侧保持无操作.
    let overwrite: Overwrite = OVERWRITE.parse().expect("未识别的覆写目标");
    let visitors = match overwrite {
        Overwrite::Interior => VoxelVisitors {
            bounded: Some(&f_overwrite),
            ..Default::default()
        },
        Overwrite::Exterior => VoxelVisitors {
            unbounded: Some(&f_overwrite),
            ..Default::default()
        },
    };

    par_mutate_voxels(&mut images, &rois, &opts, &visitors).expect("体素变换失败");

    sep();
    for (k, img) in images.images.iter_mut().enumerate() {
        img.refresh_window_metadata("Drawn geometry");
        let on_grid = img.data().iter().filter(|&&v| v == VOXEL_VALUE).count();
        let meta = img.frame().metadata();
        println!(
            "切片 {k}: 网格体素 {on_grid} 个, 窗口 [{}, {}]",
            meta.get(keys::WINDOW_CENTER).map_or("-", String::as_str),
            meta.get(keys::WINDOW_WIDTH).map_or("-", String::as_str),
        );
    }
    sep();
}
