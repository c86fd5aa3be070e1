use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::motor::MotorMount;

/// A dimension that is either stored explicitly or resolved from the axial neighbour.
///
/// - `Explicit`: the value is stored on the component (metres, never negative)
/// - `Automatic`: the value follows the neighbouring component
/// - `Unset`: no value and no neighbour rule; resolves to zero
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum Radius {
    Explicit(f64),
    Automatic,
    Unset,
}

impl Radius {
    pub fn explicit(value: f64) -> Self {
        Self::Explicit(non_negative(value))
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::Automatic)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Explicit(v) => Some(*v),
            _ => None,
        }
    }
}

/// Clamp a length to the non-negative range. NaN becomes zero.
pub fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Reference point an axial offset is measured from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxialMethod {
    /// Directly behind the previous sibling (stage-level components).
    #[default]
    After,
    /// Top of the component relative to the top of its parent.
    Top,
    /// Bottom of the component relative to the bottom of its parent.
    Bottom,
    /// Top of the component relative to the tip of the vehicle.
    Absolute,
}

impl AxialMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::After => "after",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Absolute => "absolute",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct AxialPosition {
    pub method: AxialMethod,
    pub offset: f64,
}

impl AxialPosition {
    pub fn new(method: AxialMethod, offset: f64) -> Self {
        Self { method, offset }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Surface finish of an external component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Rough,
    Unfinished,
    #[default]
    Normal,
    Smooth,
    Polished,
    Mirror,
}

impl Finish {
    /// Average roughness height in metres.
    pub fn roughness(&self) -> f64 {
        match self {
            Self::Rough => 500e-6,
            Self::Unfinished => 150e-6,
            Self::Normal => 60e-6,
            Self::Smooth => 20e-6,
            Self::Polished => 2e-6,
            Self::Mirror => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rough => "rough",
            Self::Unfinished => "unfinished",
            Self::Normal => "normal",
            Self::Smooth => "smooth",
            Self::Polished => "polished",
            Self::Mirror => "mirror",
        }
    }
}

/// Profile of a nose cone or transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionShape {
    #[default]
    Conical,
    Ogive,
    Ellipsoid,
    Power,
    Parabolic,
    Haack,
}

impl TransitionShape {
    /// Shape parameter used when none is given explicitly.
    pub fn default_parameter(&self) -> f64 {
        match self {
            Self::Conical | Self::Ellipsoid | Self::Haack => 0.0,
            Self::Ogive => 1.0,
            Self::Power | Self::Parabolic => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrossSection {
    #[default]
    Square,
    Rounded,
    Airfoil,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RingUsage {
    Bulkhead,
    EngineBlock,
    CenteringRing,
}

impl RingUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bulkhead => "bulkhead",
            Self::EngineBlock => "engine block",
            Self::CenteringRing => "centering ring",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoseCone {
    pub shape: TransitionShape,
    pub shape_parameter: f64,
    pub length: f64,
    pub aft_radius: Radius,
    pub thickness: f64,
    pub finish: Finish,
}

impl Default for NoseCone {
    fn default() -> Self {
        Self {
            shape: TransitionShape::Ogive,
            shape_parameter: TransitionShape::Ogive.default_parameter(),
            length: 0.0,
            aft_radius: Radius::Automatic,
            thickness: 0.0,
            finish: Finish::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyTube {
    pub length: f64,
    pub outer_radius: Radius,
    pub thickness: f64,
    pub finish: Finish,
    pub motor: Option<MotorMount>,
}

impl Default for BodyTube {
    fn default() -> Self {
        Self {
            length: 0.0,
            outer_radius: Radius::Automatic,
            thickness: 0.0,
            finish: Finish::default(),
            motor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    pub shape: TransitionShape,
    pub shape_parameter: f64,
    pub length: f64,
    pub fore_radius: Radius,
    pub aft_radius: Radius,
    pub thickness: f64,
    pub finish: Finish,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            shape: TransitionShape::Conical,
            shape_parameter: 0.0,
            length: 0.0,
            fore_radius: Radius::Automatic,
            aft_radius: Radius::Automatic,
            thickness: 0.0,
            finish: Finish::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FinPoint {
    pub x: f64,
    pub y: f64,
}

impl FinPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Planform of a fin set.
///
/// Every trapezoid has an exact free-form equivalent; see [`FinShape::to_freeform`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FinShape {
    Trapezoid {
        root_chord: f64,
        tip_chord: f64,
        span: f64,
        sweep: f64,
    },
    Freeform {
        points: Vec<FinPoint>,
    },
}

impl FinShape {
    /// Fin length along the parent axis (root chord for trapezoids).
    pub fn length(&self) -> f64 {
        match self {
            Self::Trapezoid { root_chord, .. } => *root_chord,
            Self::Freeform { points } => {
                let min = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
                let max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
                if points.is_empty() {
                    0.0
                } else {
                    max - min
                }
            }
        }
    }

    /// Outline polygon, starting at the leading root corner.
    pub fn points(&self) -> Vec<FinPoint> {
        match self {
            Self::Trapezoid {
                root_chord,
                tip_chord,
                span,
                sweep,
            } => vec![
                FinPoint::new(0.0, 0.0),
                FinPoint::new(*sweep, *span),
                FinPoint::new(sweep + tip_chord, *span),
                FinPoint::new(*root_chord, 0.0),
            ],
            Self::Freeform { points } => points.clone(),
        }
    }

    pub fn to_freeform(&self) -> FinShape {
        FinShape::Freeform {
            points: self.points(),
        }
    }

    pub fn is_trapezoid(&self) -> bool {
        matches!(self, Self::Trapezoid { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinSet {
    pub fin_count: u32,
    pub shape: FinShape,
    pub thickness: f64,
    pub cross_section: CrossSection,
    pub finish: Finish,
}

impl Default for FinSet {
    fn default() -> Self {
        Self {
            fin_count: 3,
            shape: FinShape::Trapezoid {
                root_chord: 0.0,
                tip_chord: 0.0,
                span: 0.0,
                sweep: 0.0,
            },
            thickness: 0.0,
            cross_section: CrossSection::default(),
            finish: Finish::default(),
        }
    }
}

/// One ring entity for bulkheads, engine blocks and centering rings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ring {
    pub usage: RingUsage,
    pub length: f64,
    pub outer_radius: Radius,
    pub inner_radius: Radius,
}

impl Ring {
    pub fn new(usage: RingUsage) -> Self {
        Self {
            usage,
            length: 0.0,
            outer_radius: Radius::Automatic,
            inner_radius: Radius::Unset,
        }
    }
}

/// Closed set of component variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ComponentKind {
    Rocket,
    Stage,
    NoseCone(NoseCone),
    BodyTube(BodyTube),
    Transition(Transition),
    FinSet(FinSet),
    Ring(Ring),
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Rocket => "Rocket",
            Self::Stage => "Stage",
            Self::NoseCone(_) => "NoseCone",
            Self::BodyTube(_) => "BodyTube",
            Self::Transition(_) => "Transition",
            Self::FinSet(f) if f.shape.is_trapezoid() => "TrapezoidFinSet",
            Self::FinSet(_) => "FreeformFinSet",
            Self::Ring(r) => match r.usage {
                RingUsage::Bulkhead => "Bulkhead",
                RingUsage::EngineBlock => "EngineBlock",
                RingUsage::CenteringRing => "CenteringRing",
            },
        }
    }

    /// Whether a component of kind `child` may be attached directly below this kind.
    pub fn can_contain(&self, child: &ComponentKind) -> bool {
        use ComponentKind::*;
        match (self, child) {
            (Rocket, Stage) => true,
            (Stage, NoseCone(_) | BodyTube(_) | Transition(_)) => true,
            (BodyTube(_), FinSet(_) | Ring(_)) => true,
            (NoseCone(_) | Transition(_), FinSet(f)) => !f.shape.is_trapezoid(),
            (NoseCone(_) | Transition(_), Ring(_)) => true,
            _ => false,
        }
    }

    pub fn finish(&self) -> Option<Finish> {
        match self {
            Self::NoseCone(c) => Some(c.finish),
            Self::BodyTube(c) => Some(c.finish),
            Self::Transition(c) => Some(c.finish),
            Self::FinSet(c) => Some(c.finish),
            _ => None,
        }
    }

    /// Set the surface finish. Returns `false` for kinds without an outer surface.
    pub fn set_finish(&mut self, finish: Finish) -> bool {
        match self {
            Self::NoseCone(c) => c.finish = finish,
            Self::BodyTube(c) => c.finish = finish,
            Self::Transition(c) => c.finish = finish,
            Self::FinSet(c) => c.finish = finish,
            _ => return false,
        }
        true
    }

    pub fn supports_finish(&self) -> bool {
        self.finish().is_some()
    }

    /// Whether this kind sits on the vehicle axis as one of a stage's ordered parts.
    pub fn is_axial(&self) -> bool {
        matches!(
            self,
            Self::NoseCone(_) | Self::BodyTube(_) | Self::Transition(_)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    pub color: Option<Color>,
    pub position: AxialPosition,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: None,
            position: AxialPosition::default(),
            kind,
        }
    }

    pub fn stage(name: impl Into<String>) -> Self {
        Self::new(name, ComponentKind::Stage)
    }

    /// Compare everything except instance identity.
    pub fn same_structure(&self, other: &Component) -> bool {
        self.name == other.name
            && self.color == other.color
            && self.position == other.position
            && self.kind == other.kind
    }

    pub fn length(&self) -> f64 {
        match &self.kind {
            ComponentKind::NoseCone(c) => c.length,
            ComponentKind::BodyTube(c) => c.length,
            ComponentKind::Transition(c) => c.length,
            ComponentKind::FinSet(c) => c.shape.length(),
            ComponentKind::Ring(c) => c.length,
            ComponentKind::Rocket | ComponentKind::Stage => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_radius_is_clamped() {
        assert_eq!(Radius::explicit(-1.0), Radius::Explicit(0.0));
        assert_eq!(Radius::explicit(f64::NAN), Radius::Explicit(0.0));
        assert_eq!(Radius::explicit(0.25).value(), Some(0.25));
        assert_eq!(Radius::Automatic.value(), None);
    }

    #[test]
    fn trapezoid_converts_to_identical_polygon() {
        let trapezoid = FinShape::Trapezoid {
            root_chord: 0.1,
            tip_chord: 0.04,
            span: 0.05,
            sweep: 0.03,
        };
        let freeform = trapezoid.to_freeform();
        assert!(!freeform.is_trapezoid());
        assert_eq!(freeform.points(), trapezoid.points());
        assert_eq!(
            freeform.points(),
            vec![
                FinPoint::new(0.0, 0.0),
                FinPoint::new(0.03, 0.05),
                FinPoint::new(0.07, 0.05),
                FinPoint::new(0.1, 0.0),
            ]
        );
        assert!((freeform.length() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn transitions_only_host_freeform_fins() {
        let transition = ComponentKind::Transition(Transition::default());
        let trapezoid = ComponentKind::FinSet(FinSet::default());
        let mut freeform = FinSet::default();
        freeform.shape = freeform.shape.to_freeform();

        assert!(!transition.can_contain(&trapezoid));
        assert!(transition.can_contain(&ComponentKind::FinSet(freeform)));
        assert!(ComponentKind::BodyTube(BodyTube::default()).can_contain(&trapezoid));
        assert!(!ComponentKind::Stage.can_contain(&trapezoid));
    }

    #[test]
    fn rings_and_stages_have_no_finish() {
        let mut ring = ComponentKind::Ring(Ring::new(RingUsage::Bulkhead));
        assert!(!ring.set_finish(Finish::Polished));
        assert!(!ComponentKind::Stage.supports_finish());
        assert!(ComponentKind::NoseCone(NoseCone::default()).supports_finish());
    }
}
