//! RASAero element names, units and keyword tables.

use rocketfile_core::models::{Color, CrossSection, Finish, TransitionShape};

use crate::warnings::{Warning, WarningSet};

/// RASAero lengths are inches; native lengths are metres.
pub const RASAERO_TO_NATIVE_LENGTH: f64 = 39.37;

/// Wall thickness applied to imported components, which RASAero does not specify.
pub const DEFAULT_WALL_THICKNESS: f64 = 0.002;

pub const RASAERO_DOCUMENT: &str = "RASAeroDocument";
pub const ROCKET_DESIGN: &str = "RocketDesign";
pub const SURFACE: &str = "Surface";

pub const NOSE_CONE: &str = "NoseCone";
pub const BODY_TUBE: &str = "BodyTube";
pub const TRANSITION: &str = "Transition";
pub const BOOSTER: &str = "Booster";
pub const FIN: &str = "Fin";

pub const LENGTH: &str = "Length";
pub const DIAMETER: &str = "Diameter";
pub const REAR_DIAMETER: &str = "RearDiameter";
pub const LOCATION: &str = "Location";
pub const COLOR: &str = "Color";

pub const SHAPE: &str = "Shape";
pub const POWER_LAW: &str = "PowerLaw";
pub const BLUNT_RADIUS: &str = "BluntRadius";

pub const BOAT_TAIL_LENGTH: &str = "BoatTailLength";
pub const BOAT_TAIL_REAR_DIAMETER: &str = "BoatTailRearDiameter";
pub const SHOULDER_LENGTH: &str = "ShoulderLength";

pub const FIN_COUNT: &str = "Count";
pub const FIN_CHORD: &str = "Chord";
pub const FIN_SPAN: &str = "Span";
pub const FIN_SWEEP_DISTANCE: &str = "SweepDistance";
pub const FIN_TIP_CHORD: &str = "TipChord";
pub const FIN_THICKNESS: &str = "Thickness";
pub const AIRFOIL_SECTION: &str = "AirfoilSection";

pub const SIMULATION_LIST: &str = "SimulationList";
pub const SIMULATION: &str = "Simulation";
pub const SUSTAINER_ENGINE: &str = "SustainerEngine";
pub const BOOSTER1_ENGINE: &str = "Booster1Engine";
pub const BOOSTER2_ENGINE: &str = "Booster2Engine";
pub const USE_BOOSTER1: &str = "UseBooster1";
pub const USE_BOOSTER2: &str = "UseBooster2";

pub const SUSTAINER_NAME: &str = "Sustainer";

pub fn to_native_length(value: f64) -> f64 {
    value / RASAERO_TO_NATIVE_LENGTH
}

pub fn from_native_length(value: f64) -> f64 {
    value * RASAERO_TO_NATIVE_LENGTH
}

const NOSE_CONE_SHAPES: &[(&str, TransitionShape, f64)] = &[
    ("Conical", TransitionShape::Conical, 0.0),
    ("Tangent Ogive", TransitionShape::Ogive, 1.0),
    ("Von Karman Ogive", TransitionShape::Haack, 0.0),
    ("LV-Haack", TransitionShape::Haack, 1.0 / 3.0),
    ("Power Law", TransitionShape::Power, 0.5),
    ("Parabolic", TransitionShape::Parabolic, 1.0),
    ("Elliptical", TransitionShape::Ellipsoid, 0.0),
];

/// Native shape and its implied shape parameter for a RASAero nose cone keyword.
pub fn nose_cone_shape(keyword: &str, warnings: &mut WarningSet) -> Option<(TransitionShape, f64)> {
    let found = NOSE_CONE_SHAPES
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(keyword))
        .map(|(_, shape, parameter)| (*shape, *parameter));
    if found.is_none() {
        warnings.add(Warning::unknown_value(SHAPE, keyword));
    }
    found
}

/// RASAero keyword for a native nose cone shape and parameter.
pub fn nose_cone_keyword(shape: TransitionShape, parameter: f64) -> &'static str {
    match shape {
        TransitionShape::Conical => "Conical",
        TransitionShape::Ogive => "Tangent Ogive",
        TransitionShape::Haack if parameter > 0.0 => "LV-Haack",
        TransitionShape::Haack => "Von Karman Ogive",
        TransitionShape::Power => "Power Law",
        TransitionShape::Parabolic => "Parabolic",
        TransitionShape::Ellipsoid => "Elliptical",
    }
}

/// Shape parameter a RASAero nose cone keyword implies without a `PowerLaw` element.
pub fn implied_shape_parameter(keyword: &str) -> Option<f64> {
    NOSE_CONE_SHAPES
        .iter()
        .find(|(name, _, _)| *name == keyword)
        .map(|(_, _, parameter)| *parameter)
}

const SURFACE_FINISHES: &[(&str, Finish)] = &[
    ("Smooth (Zero Roughness)", Finish::Mirror),
    ("Polished", Finish::Polished),
    ("Sanded", Finish::Smooth),
    ("Smooth Paint", Finish::Normal),
    ("Anodized Aluminum", Finish::Normal),
    ("Camouflage Paint", Finish::Unfinished),
    ("Rough Sanded", Finish::Rough),
];

pub fn surface_finish(keyword: &str, warnings: &mut WarningSet) -> Finish {
    SURFACE_FINISHES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
        .map(|(_, finish)| *finish)
        .unwrap_or_else(|| {
            warnings.add(Warning::unknown_value(SURFACE, keyword));
            Finish::default()
        })
}

pub fn surface_keyword(finish: Finish) -> &'static str {
    SURFACE_FINISHES
        .iter()
        .find(|(_, f)| *f == finish)
        .map(|(name, _)| *name)
        .unwrap_or("Smooth Paint")
}

pub fn fin_cross_section(keyword: &str, warnings: &mut WarningSet) -> CrossSection {
    match keyword {
        "Square" => CrossSection::Square,
        "Rounded" => CrossSection::Rounded,
        "Subsonic NACA" | "Biconvex" => CrossSection::Airfoil,
        "Double Wedge" | "Hexagonal" => {
            warnings.add(Warning::unsupported(
                "Fin airfoil section",
                Some(format!("'{}' imported as square", keyword)),
            ));
            CrossSection::Square
        }
        _ => {
            warnings.add(Warning::unknown_value(AIRFOIL_SECTION, keyword));
            CrossSection::Square
        }
    }
}

pub fn airfoil_keyword(cross_section: CrossSection) -> &'static str {
    match cross_section {
        CrossSection::Square => "Square",
        CrossSection::Rounded => "Rounded",
        CrossSection::Airfoil => "Subsonic NACA",
    }
}

pub const DEFAULT_COLOR: Color = Color::BLACK;

const COLORS: &[(&str, Color)] = &[
    ("Black", Color::rgb(0, 0, 0)),
    ("White", Color::rgb(255, 255, 255)),
    ("Red", Color::rgb(255, 0, 0)),
    ("Green", Color::rgb(0, 128, 0)),
    ("Blue", Color::rgb(0, 0, 255)),
    ("Yellow", Color::rgb(255, 255, 0)),
    ("Orange", Color::rgb(255, 165, 0)),
    ("Purple", Color::rgb(128, 0, 128)),
    ("Brown", Color::rgb(165, 42, 42)),
    ("Gray", Color::rgb(128, 128, 128)),
    ("Silver", Color::rgb(192, 192, 192)),
    ("Lime", Color::rgb(0, 255, 0)),
    ("Navy", Color::rgb(0, 0, 128)),
    ("Maroon", Color::rgb(128, 0, 0)),
];

/// Native color for a RASAero color name; unknown names warn and use the default.
pub fn color(name: &str, warnings: &mut WarningSet) -> Color {
    COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, c)| *c)
        .unwrap_or_else(|| {
            warnings.add(Warning::unknown_value(COLOR, name));
            DEFAULT_COLOR
        })
}

/// Closest RASAero color name for a native color.
pub fn color_name(color: Color) -> &'static str {
    let distance = |c: &Color| {
        let dr = i32::from(c.red) - i32::from(color.red);
        let dg = i32::from(c.green) - i32::from(color.green);
        let db = i32::from(c.blue) - i32::from(color.blue);
        dr * dr + dg * dg + db * db
    };
    COLORS
        .iter()
        .min_by_key(|(_, c)| distance(c))
        .map(|(name, _)| *name)
        .unwrap_or("Black")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nose_cone_keywords_imply_parameters() {
        let mut warnings = WarningSet::new();
        assert_eq!(
            nose_cone_shape("Tangent Ogive", &mut warnings),
            Some((TransitionShape::Ogive, 1.0))
        );
        assert_eq!(
            nose_cone_shape("Von Karman Ogive", &mut warnings),
            Some((TransitionShape::Haack, 0.0))
        );
        assert!(nose_cone_shape("Blobby", &mut warnings).is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn shape_keywords_invert() {
        let mut warnings = WarningSet::new();
        for (keyword, _, _) in NOSE_CONE_SHAPES {
            let (shape, parameter) = nose_cone_shape(keyword, &mut warnings).unwrap();
            assert_eq!(nose_cone_keyword(shape, parameter), *keyword);
        }
    }

    #[test]
    fn unknown_color_warns_and_defaults() {
        let mut warnings = WarningSet::new();
        assert_eq!(color("blue", &mut warnings), Color::rgb(0, 0, 255));
        assert_eq!(color("Chartreuse", &mut warnings), DEFAULT_COLOR);
        assert_eq!(warnings.len(), 1);
        assert_eq!(color_name(Color::rgb(250, 5, 5)), "Red");
    }

    #[test]
    fn unsupported_airfoil_falls_back_to_square() {
        let mut warnings = WarningSet::new();
        assert_eq!(fin_cross_section("Hexagonal", &mut warnings), CrossSection::Square);
        assert_eq!(fin_cross_section("Rounded", &mut warnings), CrossSection::Rounded);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn inches_convert_to_metres() {
        assert!((to_native_length(39.37) - 1.0).abs() < 1e-12);
        assert!((from_native_length(to_native_length(12.0)) - 12.0).abs() < 1e-9);
    }
}
