use super::GridImage;
use crate::consts::keys;

/// 显示窗口, 包含窗位 (window level) 和窗宽 (window width).
///
/// 该窗口是只读的. 若要修改窗口参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowLevel {
    level: f32,
    width: f32,
}

impl WindowLevel {
    /// 构建显示窗口.
    ///
    /// `level` 和 `width` 必须在合理范围内, 否则返回 `None`.
    pub fn new(level: f32, width: f32) -> Option<WindowLevel> {
        if (-1e5..=1e5).contains(&level) && 0.0 < width && width <= 1e5 {
            Some(Self { level, width })
        } else {
            None
        }
    }

    /// 由体素极值构建恰好覆盖 `[min, max]` 的窗口.
    ///
    /// 要求 `min < max` 且二者有限, 否则返回 `None`.
    pub fn from_minmax(min: f32, max: f32) -> Option<WindowLevel> {
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }
        Self::new(min * 0.5 + max * 0.5, max - min)
    }

    /// 窗位.
    #[inline]
    pub fn level(&self) -> f32 {
        self.level
    }

    /// 窗宽.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// 窗下限.
    #[inline]
    pub fn lower_bound(&self) -> f32 {
        self.level - self.width / 2.0
    }

    /// 窗上限.
    #[inline]
    pub fn upper_bound(&self) -> f32 {
        self.level + self.width / 2.0
    }
}

/// 窗口元数据刷新.
impl GridImage {
    /// 变换结束后刷新图像元数据: 写入 `Description`, 并根据当前体素
    /// 极值更新 `WindowCenter` / `WindowWidth` / `PixelMin` / `PixelMax`
    /// 及相应的 `*ValidFor` 键.
    ///
    /// 若图像不存在有限体素 (或极值无法构成合法窗口), 则删除
    /// `WindowValidFor` 和 `PixelMinMaxValidFor` 两个失效键并返回
    /// `false`; 否则返回 `true`.
    pub fn refresh_window_metadata(&mut self, description: &str) -> bool {
        let minmax = self.finite_minmax();
        let meta = self.frame_mut().metadata_mut();
        meta.insert(keys::DESCRIPTION.into(), description.into());

        let window = minmax.and_then(|(lo, hi)| WindowLevel::from_minmax(lo, hi));
        let (Some((lo, hi)), Some(w)) = (minmax, window) else {
            meta.remove(keys::WINDOW_VALID_FOR);
            meta.remove(keys::PIXEL_MINMAX_VALID_FOR);
            return false;
        };

        meta.insert(keys::WINDOW_VALID_FOR.into(), description.into());
        meta.insert(keys::WINDOW_CENTER.into(), format!("{}", w.level()));
        meta.insert(keys::WINDOW_WIDTH.into(), format!("{}", w.width()));

        meta.insert(keys::PIXEL_MINMAX_VALID_FOR.into(), description.into());
        meta.insert(keys::PIXEL_MIN.into(), format!("{lo}"));
        meta.insert(keys::PIXEL_MAX.into(), format!("{hi}"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::WindowLevel;
    use crate::consts::keys;
    use crate::phantom;
    use nalgebra::Point3;

    fn float_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_window_invalid_input() {
        assert!(WindowLevel::new(0.0, -1.0).is_none());
        assert!(WindowLevel::new(0.0, 0.0).is_none());
        assert!(WindowLevel::from_minmax(1.0, 1.0).is_none());
        assert!(WindowLevel::from_minmax(f32::NAN, 1.0).is_none());
    }

    #[test]
    fn test_window_from_minmax() {
        let w = WindowLevel::from_minmax(-50.0, 150.0).unwrap();
        assert!(float_eq(w.level(), 50.0));
        assert!(float_eq(w.width(), 200.0));
        assert!(float_eq(w.lower_bound(), -50.0));
        assert!(float_eq(w.upper_bound(), 150.0));
    }

    #[test]
    fn test_refresh_window_metadata() {
        let mut img = phantom::uniform_image(
            phantom::axial_frame(Point3::origin(), 1.0, 1.0, 1.0),
            (2, 2, 1),
            0.0,
        );
        img[(0, 0, 0)] = -10.0;
        img[(1, 1, 0)] = 30.0;

        assert!(img.refresh_window_metadata("draw"));
        let meta = img.frame().metadata();
        assert_eq!(meta.get(keys::DESCRIPTION).unwrap(), "draw");
        assert_eq!(meta.get(keys::WINDOW_VALID_FOR).unwrap(), "draw");
        assert_eq!(meta.get(keys::WINDOW_CENTER).unwrap(), "10");
        assert_eq!(meta.get(keys::WINDOW_WIDTH).unwrap(), "40");
        assert_eq!(meta.get(keys::PIXEL_MIN).unwrap(), "-10");
        assert_eq!(meta.get(keys::PIXEL_MAX).unwrap(), "30");
    }

    #[test]
    fn test_refresh_window_metadata_no_finite() {
        let mut img = phantom::uniform_image(
            phantom::axial_frame(Point3::origin(), 1.0, 1.0, 1.0),
            (2, 2, 1),
            f32::NAN,
        );
        assert!(!img.refresh_window_metadata("draw"));
        let meta = img.frame().metadata();
        assert_eq!(meta.get(keys::DESCRIPTION).unwrap(), "draw");
        assert!(!meta.contains_key(keys::WINDOW_VALID_FOR));
        assert!(!meta.contains_key(keys::PIXEL_MINMAX_VALID_FOR));
    }
}
