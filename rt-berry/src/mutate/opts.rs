//! 一次变换 pass 的策略配置.
//!
//! 每个策略都是一个封闭枚举, 并提供 [`FromStr`] 以便外部参数层把
//! 字符串解析为类型化策略. 未识别的字符串一律解析失败
//! ([`ParsePolicyError`]), 绝不静默退回默认值.

use std::str::FromStr;

use num::ToPrimitive;

use super::error::ParsePolicyError;

/// 重叠策略: 同一空间点被多个轮廓包含时如何合并裁决.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContourOverlap {
    /// 对所有轮廓取并集, 完全不考虑绕向.
    ///
    /// 注意: 反绕向的洞轮廓在该模式下 **不会** 被挖掉,
    /// 而是被摊平进并集.
    Ignore,

    /// 尊重相反绕向: 正绕向轮廓计 +1, 负绕向轮廓计 -1,
    /// 符号和非零即为内部. 嵌套的洞会抵消外轮廓.
    HonourOppositeOrientations,

    /// 隐式绕向: 忽略符号, 被包含次数为奇数即为内部 (XOR 并集).
    /// 任何偶数重叠都会抵消为外部.
    ImplicitOrientations,
}

impl FromStr for ContourOverlap {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "honour_opposite_orientations" | "honour_opps" => {
                Ok(Self::HonourOppositeOrientations)
            }
            "overlapping_contours_cancel" | "overlap_cancel" => Ok(Self::ImplicitOrientations),
            _ => Err(ParsePolicyError::ContourOverlap(s.into())),
        }
    }
}

/// 包含策略: 如何从中心 / 角点采样决定体素的内外.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Inclusivity {
    /// 仅判定体素中心点.
    Centre,

    /// 判定平面四角, 任一角在内部即算内部.
    CornerInclusive,

    /// 判定平面四角, 四角全部在内部才算内部.
    CornerExclusive,
}

impl FromStr for Inclusivity {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "centre" | "center" => Ok(Self::Centre),
            "planar_corner_inclusive" | "planar_inc" => Ok(Self::CornerInclusive),
            "planar_corner_exclusive" | "planar_exc" => Ok(Self::CornerExclusive),
            _ => Err(ParsePolicyError::Inclusivity(s.into())),
        }
    }
}

/// 聚合策略: 一次 pass 提供多个轮廓集合时如何合并各集合的裁决.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregate {
    /// 采用第一个与该图像平面关联的集合的裁决.
    First,

    /// 任一关联集合判为内部即算内部.
    Union,

    /// 全部关联集合都判为内部才算内部.
    Intersection,
}

impl FromStr for Aggregate {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            _ => Err(ParsePolicyError::Aggregate(s.into())),
        }
    }
}

/// 编辑风格. 本引擎只承诺原位修改: 需要整图原子替换的调用方应自行缓冲.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditStyle {
    /// 通过回调的输出参数原位修改体素存储.
    InPlace,
}

impl FromStr for EditStyle {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inplace" | "in_place" => Ok(Self::InPlace),
            _ => Err(ParsePolicyError::EditStyle(s.into())),
        }
    }
}

/// 掩码修饰策略: 对最终裁决的后处理.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskMod {
    /// 不做修饰.
    Noop,

    /// 反转裁决 (内部与外部互换).
    Invert,
}

impl FromStr for MaskMod {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noop" => Ok(Self::Noop),
            "invert" => Ok(Self::Invert),
            _ => Err(ParsePolicyError::MaskMod(s.into())),
        }
    }
}

/// 体素邻接粒度.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Adjacency {
    /// 每个体素独立判定, 不考虑邻居.
    SingleVoxel,
}

impl FromStr for Adjacency {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single_voxel" | "singlevoxel" => Ok(Self::SingleVoxel),
            _ => Err(ParsePolicyError::Adjacency(s.into())),
        }
    }
}

/// 通道选择: 选定单个通道或全部通道.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelSelect {
    /// 操作全部通道.
    All,

    /// 仅操作第 `0` 开始计数的指定通道.
    Only(usize),
}

impl FromStr for ChannelSelect {
    type Err = ParsePolicyError;

    /// 按整数惯例解析: 负数代表全部通道, 非负数代表单个通道.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| ParsePolicyError::Channel(s.into()))?;
        if raw < 0 {
            return Ok(Self::All);
        }
        raw.to_usize()
            .map(Self::Only)
            .ok_or_else(|| ParsePolicyError::Channel(s.into()))
    }
}

/// 覆写目标: 上层操作用它决定把覆写回调挂到内部还是外部.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overwrite {
    /// 覆写 ROI 内部体素.
    Interior,

    /// 覆写 ROI 外部体素.
    Exterior,
}

impl FromStr for Overwrite {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interior" => Ok(Self::Interior),
            "exterior" => Ok(Self::Exterior),
            _ => Err(ParsePolicyError::Overwrite(s.into())),
        }
    }
}

/// 一次变换 pass 的完整策略包.
///
/// 该结构完全透明且在 pass 期间只读. 每次操作调用构建一份即可.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MutateOpts {
    /// 编辑风格.
    pub editstyle: EditStyle,

    /// 包含策略.
    pub inclusivity: Inclusivity,

    /// 重叠策略.
    pub contouroverlap: ContourOverlap,

    /// 聚合策略.
    pub aggregate: Aggregate,

    /// 掩码修饰策略.
    pub maskmod: MaskMod,

    /// 邻接粒度.
    pub adjacency: Adjacency,

    /// 通道选择.
    pub channel: ChannelSelect,
}

impl Default for MutateOpts {
    /// 默认策略: 原位编辑, 中心采样, 重叠取并,
    /// 首个集合聚合, 无掩码修饰, 单体素邻接, 全部通道.
    fn default() -> Self {
        Self {
            editstyle: EditStyle::InPlace,
            inclusivity: Inclusivity::Centre,
            contouroverlap: ContourOverlap::Ignore,
            aggregate: Aggregate::First,
            maskmod: MaskMod::Noop,
            adjacency: Adjacency::SingleVoxel,
            channel: ChannelSelect::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contour_overlap() {
        assert_eq!("ignore".parse(), Ok(ContourOverlap::Ignore));
        assert_eq!(
            "Honour_Opposite_Orientations".parse(),
            Ok(ContourOverlap::HonourOppositeOrientations)
        );
        assert_eq!("honour_opps".parse(), Ok(ContourOverlap::HonourOppositeOrientations));
        assert_eq!(
            "overlapping_contours_cancel".parse(),
            Ok(ContourOverlap::ImplicitOrientations)
        );
        assert_eq!("overlap_cancel".parse(), Ok(ContourOverlap::ImplicitOrientations));

        // 未识别的字符串必须失败, 不允许静默钳制.
        assert_eq!(
            "ignore_holes".parse::<ContourOverlap>(),
            Err(ParsePolicyError::ContourOverlap("ignore_holes".into()))
        );
    }

    #[test]
    fn test_parse_inclusivity() {
        assert_eq!("centre".parse(), Ok(Inclusivity::Centre));
        assert_eq!("center".parse(), Ok(Inclusivity::Centre));
        assert_eq!("planar_corner_inclusive".parse(), Ok(Inclusivity::CornerInclusive));
        assert_eq!("planar_inc".parse(), Ok(Inclusivity::CornerInclusive));
        assert_eq!("planar_corner_exclusive".parse(), Ok(Inclusivity::CornerExclusive));
        assert_eq!("planar_exc".parse(), Ok(Inclusivity::CornerExclusive));
        assert!("corner".parse::<Inclusivity>().is_err());
    }

    #[test]
    fn test_parse_channel() {
        assert_eq!("-1".parse(), Ok(ChannelSelect::All));
        assert_eq!("-7".parse(), Ok(ChannelSelect::All));
        assert_eq!("0".parse(), Ok(ChannelSelect::Only(0)));
        assert_eq!(" 2 ".parse(), Ok(ChannelSelect::Only(2)));
        assert!("one".parse::<ChannelSelect>().is_err());
        assert!("".parse::<ChannelSelect>().is_err());
    }

    #[test]
    fn test_parse_misc_policies() {
        assert_eq!("interior".parse(), Ok(Overwrite::Interior));
        assert_eq!("Exterior".parse(), Ok(Overwrite::Exterior));
        assert!("both".parse::<Overwrite>().is_err());

        assert_eq!("inplace".parse(), Ok(EditStyle::InPlace));
        assert_eq!("noop".parse(), Ok(MaskMod::Noop));
        assert_eq!("invert".parse(), Ok(MaskMod::Invert));
        assert_eq!("single_voxel".parse(), Ok(Adjacency::SingleVoxel));
        assert_eq!("union".parse(), Ok(Aggregate::Union));
        assert!("mean".parse::<Aggregate>().is_err());
    }

    #[test]
    fn test_default_opts() {
        let opts = MutateOpts::default();
        assert_eq!(opts.inclusivity, Inclusivity::Centre);
        assert_eq!(opts.contouroverlap, ContourOverlap::Ignore);
        assert_eq!(opts.aggregate, Aggregate::First);
        assert_eq!(opts.channel, ChannelSelect::All);
    }
}
