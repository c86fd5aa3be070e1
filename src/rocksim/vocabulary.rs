//! Rocksim element names, units and code tables.

use rocketfile_core::models::{
    AxialMethod, AxialPosition, CrossSection, FinPoint, Finish, RingUsage, TransitionShape,
};

use crate::warnings::{Warning, WarningSet};

/// Rocksim lengths are millimetres; native lengths are metres.
pub const ROCKSIM_TO_NATIVE_LENGTH: f64 = 1000.0;

pub const ROCKSIM_DOCUMENT: &str = "RockSimDocument";
pub const DESIGN_INFORMATION: &str = "DesignInformation";
pub const ROCKET_DESIGN: &str = "RocketDesign";
pub const STAGE3_PARTS: &str = "Stage3Parts";
pub const STAGE2_PARTS: &str = "Stage2Parts";
pub const STAGE1_PARTS: &str = "Stage1Parts";
pub const ATTACHED_PARTS: &str = "AttachedParts";

pub const NOSE_CONE: &str = "NoseCone";
pub const BODY_TUBE: &str = "BodyTube";
pub const TRANSITION: &str = "Transition";
pub const FIN_SET: &str = "FinSet";
pub const CUSTOM_FIN_SET: &str = "CustomFinSet";
pub const RING: &str = "Ring";

pub const NAME: &str = "Name";
pub const LEN: &str = "Len";
pub const BASE_DIA: &str = "BaseDia";
pub const FRONT_DIA: &str = "FrontDia";
pub const REAR_DIA: &str = "RearDia";
pub const OD: &str = "OD";
pub const ID: &str = "ID";
pub const SHAPE_CODE: &str = "ShapeCode";
pub const SHAPE_PARAMETER: &str = "ShapeParameter";
pub const WALL_THICKNESS: &str = "WallThickness";
pub const FINISH_CODE: &str = "FinishCode";
pub const LOCATION_MODE: &str = "LocationMode";
pub const XB: &str = "Xb";

pub const FIN_COUNT: &str = "FinCount";
pub const ROOT_CHORD: &str = "RootChord";
pub const TIP_CHORD: &str = "TipChord";
pub const SEMI_SPAN: &str = "SemiSpan";
pub const SWEEP_DISTANCE: &str = "SweepDistance";
pub const THICKNESS: &str = "Thickness";
pub const TIP_SHAPE_CODE: &str = "TipShapeCode";
pub const POINT_LIST: &str = "PointList";
pub const USAGE_CODE: &str = "UsageCode";

pub fn to_native_length(value: f64) -> f64 {
    value / ROCKSIM_TO_NATIVE_LENGTH
}

pub fn from_native_length(value: f64) -> f64 {
    value * ROCKSIM_TO_NATIVE_LENGTH
}

const SHAPES: &[(i64, TransitionShape)] = &[
    (0, TransitionShape::Conical),
    (1, TransitionShape::Ogive),
    (2, TransitionShape::Parabolic),
    (3, TransitionShape::Ellipsoid),
    (4, TransitionShape::Power),
    (5, TransitionShape::Haack),
];

pub fn shape(code: i64, warnings: &mut WarningSet) -> TransitionShape {
    SHAPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, shape)| *shape)
        .unwrap_or_else(|| {
            warnings.add(Warning::unknown_value(SHAPE_CODE, &code.to_string()));
            TransitionShape::Conical
        })
}

pub fn shape_code(shape: TransitionShape) -> i64 {
    SHAPES
        .iter()
        .find(|(_, s)| *s == shape)
        .map(|(code, _)| *code)
        .unwrap_or(0)
}

pub fn finish(code: i64, warnings: &mut WarningSet) -> Finish {
    match code {
        0 => Finish::Polished,
        1 => Finish::Smooth,
        2 => Finish::Normal,
        3 => Finish::Unfinished,
        _ => {
            warnings.add(Warning::unknown_value(FINISH_CODE, &code.to_string()));
            Finish::default()
        }
    }
}

pub fn finish_code(finish: Finish) -> i64 {
    match finish {
        Finish::Mirror | Finish::Polished => 0,
        Finish::Smooth => 1,
        Finish::Normal => 2,
        Finish::Unfinished | Finish::Rough => 3,
    }
}

pub fn cross_section(code: i64, warnings: &mut WarningSet) -> CrossSection {
    match code {
        0 => CrossSection::Square,
        1 => CrossSection::Rounded,
        2 => CrossSection::Airfoil,
        _ => {
            warnings.add(Warning::unknown_value(TIP_SHAPE_CODE, &code.to_string()));
            CrossSection::Square
        }
    }
}

pub fn cross_section_code(cross_section: CrossSection) -> i64 {
    match cross_section {
        CrossSection::Square => 0,
        CrossSection::Rounded => 1,
        CrossSection::Airfoil => 2,
    }
}

/// Ring role for a Rocksim `UsageCode`; unknown codes warn and become centering rings.
pub fn ring_usage(code: i64, warnings: &mut WarningSet) -> RingUsage {
    match code {
        0 => RingUsage::CenteringRing,
        1 => RingUsage::Bulkhead,
        2 => RingUsage::EngineBlock,
        _ => {
            warnings.add(Warning::unknown_value(USAGE_CODE, &code.to_string()));
            RingUsage::CenteringRing
        }
    }
}

pub fn ring_usage_code(usage: RingUsage) -> i64 {
    match usage {
        RingUsage::CenteringRing => 0,
        RingUsage::Bulkhead => 1,
        RingUsage::EngineBlock => 2,
    }
}

/// Native position for a Rocksim `LocationMode` and `Xb` (already in metres).
pub fn position(mode: i64, xb: f64, warnings: &mut WarningSet) -> AxialPosition {
    match mode {
        0 => AxialPosition::new(AxialMethod::Top, xb),
        1 => AxialPosition::new(AxialMethod::Bottom, -xb),
        2 => AxialPosition::new(AxialMethod::Absolute, xb),
        _ => {
            warnings.add(Warning::unknown_value(LOCATION_MODE, &mode.to_string()));
            AxialPosition::new(AxialMethod::Top, xb)
        }
    }
}

/// Rocksim `(LocationMode, Xb)` for a native position, `Xb` in metres.
pub fn location(position: AxialPosition) -> (i64, f64) {
    match position.method {
        AxialMethod::Top | AxialMethod::After => (0, position.offset),
        AxialMethod::Bottom => (1, -position.offset),
        AxialMethod::Absolute => (2, position.offset),
    }
}

/// Parse a `PointList` of `x,y` pairs in millimetres separated by `|`.
pub fn parse_point_list(list: &str) -> Option<Vec<FinPoint>> {
    list.split('|')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (x, y) = pair.split_once(',')?;
            let x = x.trim().parse::<f64>().ok()?;
            let y = y.trim().parse::<f64>().ok()?;
            Some(FinPoint::new(to_native_length(x), to_native_length(y)))
        })
        .collect::<Option<Vec<_>>>()
        .filter(|points| points.len() >= 3)
}

pub fn format_point_list(points: &[FinPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", from_native_length(p.x), from_native_length(p.y)))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_point_lists() {
        let points = parse_point_list("0,0|25,50|75,50|100,0").unwrap();
        assert_eq!(points.len(), 4);
        assert!((points[1].x - 0.025).abs() < 1e-12);
        assert!((points[2].y - 0.05).abs() < 1e-12);

        assert!(parse_point_list("0,0|25").is_none());
        assert!(parse_point_list("0,0|1,1").is_none());
        assert!(parse_point_list("a,b|1,1|2,0").is_none());
    }

    #[test]
    fn location_modes_invert() {
        let mut warnings = WarningSet::new();
        for mode in 0..3 {
            let (back, xb) = location(position(mode, 0.25, &mut warnings));
            assert_eq!((back, xb), (mode, 0.25));
        }
        assert!(warnings.is_empty());
        position(7, 0.0, &mut warnings);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn finish_codes() {
        let mut warnings = WarningSet::new();
        assert_eq!(finish(0, &mut warnings), Finish::Polished);
        assert_eq!(finish(3, &mut warnings), Finish::Unfinished);
        assert_eq!(finish_code(Finish::Smooth), 1);
        assert_eq!(finish(9, &mut warnings), Finish::Normal);
        assert_eq!(warnings.len(), 1);
    }
}
