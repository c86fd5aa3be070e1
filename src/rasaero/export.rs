//! RASAero export.
//!
//! The sustainer's axial components become `NoseCone`, `BodyTube` and
//! `Transition` records. Every later stage becomes one `Booster`, with its
//! shoulder and boat tail folded back into the booster's flat fields.

use rocketfile_core::models::{
    AxialMethod, Component, ComponentId, ComponentKind, FinSet, FinShape, MotorMount, Rocket,
    TransitionShape,
};
use serde::Serialize;

use super::vocabulary::*;
use crate::document::{write_xml, ExportOutcome};
use crate::error::ExportError;
use crate::warnings::{Warning, WarningSet};

const FILE_FORMAT_VERSION: u32 = 2;
const MAX_STAGES: usize = 3;
const THICKNESS_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Serialize)]
#[serde(rename = "RASAeroDocument")]
struct DocumentDto {
    #[serde(rename = "FileVersion")]
    file_version: u32,
    #[serde(rename = "RocketDesign")]
    design: RocketDesignDto,
    #[serde(rename = "SimulationList")]
    simulations: SimulationListDto,
}

#[derive(Debug, Serialize)]
struct RocketDesignDto {
    #[serde(rename = "$value")]
    parts: Vec<PartDto>,
    #[serde(rename = "Surface")]
    surface: &'static str,
}

#[derive(Debug, Serialize)]
enum PartDto {
    NoseCone(NoseConeDto),
    BodyTube(BodyTubeDto),
    Transition(TransitionDto),
    Booster(BoosterDto),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NoseConeDto {
    part_type: &'static str,
    length: f64,
    diameter: f64,
    shape: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    power_law: Option<f64>,
    location: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BodyTubeDto {
    part_type: &'static str,
    length: f64,
    diameter: f64,
    location: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fin: Option<FinDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransitionDto {
    part_type: &'static str,
    length: f64,
    diameter: f64,
    rear_diameter: f64,
    location: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fin: Option<FinDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BoosterDto {
    part_type: &'static str,
    length: f64,
    diameter: f64,
    location: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    shoulder_length: f64,
    boat_tail_length: f64,
    boat_tail_rear_diameter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fin: Option<FinDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FinDto {
    count: u32,
    chord: f64,
    span: f64,
    sweep_distance: f64,
    tip_chord: f64,
    thickness: f64,
    airfoil_section: &'static str,
    location: f64,
}

#[derive(Debug, Serialize)]
struct SimulationListDto {
    #[serde(rename = "Simulation")]
    simulation: SimulationDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SimulationDto {
    sustainer_engine: String,
    booster1_engine: String,
    booster2_engine: String,
    use_booster1: &'static str,
    use_booster2: &'static str,
}

/// Render a rocket as a RASAero document.
pub fn save(rocket: &Rocket) -> Result<ExportOutcome, ExportError> {
    let mut exporter = Exporter {
        rocket,
        warnings: WarningSet::new(),
        location: 0.0,
    };
    let document = exporter.document()?;
    let xml = write_xml(&document)?;
    tracing::info!(
        parts = document.design.parts.len(),
        warnings = exporter.warnings.len(),
        "RASAero export complete"
    );
    Ok(ExportOutcome {
        xml,
        warnings: exporter.warnings.seal(),
    })
}

struct Exporter<'r> {
    rocket: &'r Rocket,
    warnings: WarningSet,
    /// Distance from the nose tip to the fore end of the next part, in metres.
    location: f64,
}

impl<'r> Exporter<'r> {
    fn document(&mut self) -> Result<DocumentDto, ExportError> {
        let rocket = self.rocket;
        let stages = rocket.stages();
        if stages.len() > MAX_STAGES {
            self.warnings.add(Warning::unsupported(
                "More than two boosters",
                Some(format!("{} stages after the second booster were skipped", stages.len() - MAX_STAGES)),
            ));
        }

        let mut parts = Vec::new();
        let mut engines: [String; MAX_STAGES] = Default::default();
        for (index, stage) in stages.iter().take(MAX_STAGES).enumerate() {
            if index == 0 {
                for id in rocket.children(*stage) {
                    if let Some(part) = self.sustainer_part(*id)? {
                        parts.push(part);
                    }
                }
            } else if let Some(booster) = self.booster(*stage)? {
                parts.push(PartDto::Booster(booster));
            }
            engines[index] = self.engine(*stage);
        }

        let [sustainer_engine, booster1_engine, booster2_engine] = engines;
        let use_booster = |index: usize| if stages.len() > index { "True" } else { "False" };
        Ok(DocumentDto {
            file_version: FILE_FORMAT_VERSION,
            design: RocketDesignDto {
                parts,
                surface: self.surface(),
            },
            simulations: SimulationListDto {
                simulation: SimulationDto {
                    sustainer_engine,
                    booster1_engine,
                    booster2_engine,
                    use_booster1: use_booster(1),
                    use_booster2: use_booster(2),
                },
            },
        })
    }

    fn sustainer_part(&mut self, id: ComponentId) -> Result<Option<PartDto>, ExportError> {
        let rocket = self.rocket;
        let component = rocket.component(id)?;
        let location = from_native_length(self.location);
        let color = color_of(component);
        let part = match &component.kind {
            ComponentKind::NoseCone(nose) => {
                self.check_thickness(nose.thickness);
                let keyword = nose_cone_keyword(nose.shape, nose.shape_parameter);
                PartDto::NoseCone(NoseConeDto {
                    part_type: NOSE_CONE,
                    length: from_native_length(nose.length),
                    diameter: from_native_length(rocket.resolved_aft_radius(id) * 2.0),
                    shape: keyword,
                    power_law: power_law(nose.shape, keyword, nose.shape_parameter),
                    location,
                    color,
                })
            }
            ComponentKind::BodyTube(tube) => {
                self.check_thickness(tube.thickness);
                PartDto::BodyTube(BodyTubeDto {
                    part_type: BODY_TUBE,
                    length: from_native_length(tube.length),
                    diameter: from_native_length(rocket.resolved_outer_radius(id) * 2.0),
                    location,
                    color,
                    fin: self.attachments(id)?,
                })
            }
            ComponentKind::Transition(transition) => {
                self.check_thickness(transition.thickness);
                PartDto::Transition(TransitionDto {
                    part_type: TRANSITION,
                    length: from_native_length(transition.length),
                    diameter: from_native_length(rocket.resolved_fore_radius(id) * 2.0),
                    rear_diameter: from_native_length(rocket.resolved_aft_radius(id) * 2.0),
                    location,
                    color,
                    fin: self.attachments(id)?,
                })
            }
            _ => return Ok(None),
        };
        self.location += component.length();
        Ok(Some(part))
    }

    /// One booster stage: `[shoulder] body-tube [boat-tail]`.
    fn booster(&mut self, stage: ComponentId) -> Result<Option<BoosterDto>, ExportError> {
        let rocket = self.rocket;
        let children = rocket.children(stage);
        let Some(tube_index) = children
            .iter()
            .position(|id| matches!(rocket.get(*id).map(|c| &c.kind), Some(ComponentKind::BodyTube(_))))
        else {
            self.warnings.add(Warning::unsupported(
                "Booster without a body tube",
                Some(rocket.component(stage)?.name.clone()),
            ));
            return Ok(None);
        };
        let tube_id = children[tube_index];
        let tube = rocket.component(tube_id)?;

        let transition_at = |index: Option<usize>| {
            index
                .and_then(|i| children.get(i))
                .copied()
                .filter(|id| matches!(rocket.get(*id).map(|c| &c.kind), Some(ComponentKind::Transition(_))))
        };
        let shoulder = transition_at(tube_index.checked_sub(1));
        let boat_tail = transition_at(Some(tube_index + 1));

        for id in children {
            if *id != tube_id && Some(*id) != shoulder && Some(*id) != boat_tail {
                self.warnings.add(Warning::unsupported(
                    "Extra booster components",
                    Some(format!("'{}' was not exported", rocket.component(*id)?.name)),
                ));
            }
        }

        let shoulder_length = match shoulder {
            Some(id) => {
                let c = rocket.component(id)?;
                self.location += c.length();
                c.length()
            }
            None => 0.0,
        };
        let location = from_native_length(self.location);
        self.location += tube.length();

        let (boat_tail_length, boat_tail_rear_diameter) = match boat_tail {
            Some(id) => {
                let c = rocket.component(id)?;
                self.location += c.length();
                (c.length(), rocket.resolved_aft_radius(id) * 2.0)
            }
            None => (0.0, 0.0),
        };

        for id in [shoulder, Some(tube_id), boat_tail].into_iter().flatten() {
            if let Some(thickness) = wall_thickness(rocket.component(id)?) {
                self.check_thickness(thickness);
            }
        }

        Ok(Some(BoosterDto {
            part_type: BOOSTER,
            length: from_native_length(tube.length()),
            diameter: from_native_length(rocket.resolved_outer_radius(tube_id) * 2.0),
            location,
            color: color_of(tube),
            shoulder_length: from_native_length(shoulder_length),
            boat_tail_length: from_native_length(boat_tail_length),
            boat_tail_rear_diameter: from_native_length(boat_tail_rear_diameter),
            fin: self.attachments(tube_id)?,
        }))
    }

    /// The first fin set below `parent`. Other attachments cannot be represented.
    fn attachments(&mut self, parent: ComponentId) -> Result<Option<FinDto>, ExportError> {
        let rocket = self.rocket;
        let parent_length = rocket.component(parent)?.length();
        let mut fin = None;
        for id in rocket.children(parent) {
            let child = rocket.component(*id)?;
            match &child.kind {
                ComponentKind::FinSet(fin_set) if fin.is_none() => {
                    fin = Some(self.fin(child, fin_set, parent_length));
                }
                ComponentKind::FinSet(_) => {
                    self.warnings.add(Warning::unsupported(
                        "Multiple fin sets on one component",
                        Some(format!("'{}' was not exported", child.name)),
                    ));
                }
                other => {
                    self.warnings.add(Warning::unsupported(
                        other.type_name(),
                        Some("RASAero has no internal components".to_string()),
                    ));
                }
            }
        }
        Ok(fin)
    }

    fn fin(&mut self, component: &Component, fin_set: &FinSet, parent_length: f64) -> FinDto {
        let (root_chord, tip_chord, span, sweep) = match trapezoid_of(&fin_set.shape) {
            Some(planform) => planform,
            None => {
                self.warnings.add(Warning::unsupported(
                    "Free-form fins",
                    Some(format!("'{}' exported as its bounding trapezoid", component.name)),
                ));
                bounding_trapezoid(&fin_set.shape)
            }
        };

        // leading-edge distance from the aft end of the parent
        let offset = component.position.offset;
        let location = match component.position.method {
            AxialMethod::Bottom => root_chord - offset,
            AxialMethod::Top => parent_length - offset,
            AxialMethod::After | AxialMethod::Absolute => {
                self.warnings.add(Warning::unsupported(
                    "Fin position",
                    Some(format!(
                        "'{}' is positioned relative to the {} and was placed at the aft end",
                        component.name,
                        component.position.method.as_str()
                    )),
                ));
                root_chord
            }
        };

        FinDto {
            count: fin_set.fin_count,
            chord: from_native_length(root_chord),
            span: from_native_length(span),
            sweep_distance: from_native_length(sweep),
            tip_chord: from_native_length(tip_chord),
            thickness: from_native_length(fin_set.thickness),
            airfoil_section: airfoil_keyword(fin_set.cross_section),
            location: from_native_length(location),
        }
    }

    /// Descriptor of the motor in the last motor-carrying tube of a stage.
    fn engine(&self, stage: ComponentId) -> String {
        self.rocket
            .children(stage)
            .iter()
            .rev()
            .find_map(|id| match &self.rocket.get(*id)?.kind {
                ComponentKind::BodyTube(tube) => tube.motor.as_ref(),
                _ => None,
            })
            .map(motor_descriptor)
            .unwrap_or_default()
    }

    /// RASAero has one surface for the whole vehicle; the first finish found wins.
    fn surface(&mut self) -> &'static str {
        let rocket = self.rocket;
        let mut finishes = rocket.iter().filter_map(|(_, c)| c.kind.finish());
        let Some(first) = finishes.next() else {
            return surface_keyword(Default::default());
        };
        if finishes.any(|f| f != first) {
            self.warnings.add(Warning::unsupported(
                "Per-component surface finish",
                Some(format!("exported as {}", surface_keyword(first))),
            ));
        }
        surface_keyword(first)
    }

    fn check_thickness(&mut self, thickness: f64) {
        if (thickness - DEFAULT_WALL_THICKNESS).abs() > THICKNESS_TOLERANCE {
            self.warnings.add(Warning::unsupported("Wall thickness", None));
        }
    }
}

fn wall_thickness(component: &Component) -> Option<f64> {
    match &component.kind {
        ComponentKind::NoseCone(c) => Some(c.thickness),
        ComponentKind::BodyTube(c) => Some(c.thickness),
        ComponentKind::Transition(c) => Some(c.thickness),
        _ => None,
    }
}

fn color_of(component: &Component) -> Option<&'static str> {
    component.color.map(color_name)
}

/// `PowerLaw` is written for power series and whenever the parameter differs from the keyword's own.
fn power_law(shape: TransitionShape, keyword: &str, parameter: f64) -> Option<f64> {
    let implied = implied_shape_parameter(keyword);
    let differs = implied.map_or(true, |implied| (implied - parameter).abs() > 1e-9);
    (shape == TransitionShape::Power || differs).then_some(parameter)
}

/// `"<designation>[-delay]  (<manufacturer>)"`, the form the importer resolves.
fn motor_descriptor(mount: &MotorMount) -> String {
    let delay = mount
        .ejection_delay
        .map(|d| format!("-{}", d))
        .unwrap_or_default();
    format!(
        "{}{}  ({})",
        mount.motor.designation, delay, mount.motor.manufacturer
    )
}

/// Recover `(root, tip, span, sweep)` from a trapezoid or a four-point outline of one.
fn trapezoid_of(shape: &FinShape) -> Option<(f64, f64, f64, f64)> {
    match shape {
        FinShape::Trapezoid {
            root_chord,
            tip_chord,
            span,
            sweep,
        } => Some((*root_chord, *tip_chord, *span, *sweep)),
        FinShape::Freeform { points } => match points.as_slice() {
            [a, b, c, d] if a.x == 0.0 && a.y == 0.0 && d.y == 0.0 && b.y == c.y && c.x >= b.x => {
                Some((d.x, c.x - b.x, b.y, b.x))
            }
            _ => None,
        },
    }
}

fn bounding_trapezoid(shape: &FinShape) -> (f64, f64, f64, f64) {
    let points = shape.points();
    let span = points.iter().map(|p| p.y).fold(0.0, f64::max);
    (shape.length(), 0.0, span, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketfile_core::models::{FinPoint, Motor};

    #[test]
    fn recovers_trapezoid_from_its_outline() {
        let trapezoid = FinShape::Trapezoid {
            root_chord: 1.0,
            tip_chord: 0.5,
            span: 0.75,
            sweep: 0.25,
        };
        assert_eq!(
            trapezoid_of(&trapezoid.to_freeform()),
            Some((1.0, 0.5, 0.75, 0.25))
        );

        let pentagon = FinShape::Freeform {
            points: vec![
                FinPoint::new(0.0, 0.0),
                FinPoint::new(0.02, 0.04),
                FinPoint::new(0.05, 0.05),
                FinPoint::new(0.08, 0.03),
                FinPoint::new(0.1, 0.0),
            ],
        };
        assert_eq!(trapezoid_of(&pentagon), None);
        assert_eq!(bounding_trapezoid(&pentagon), (0.1, 0.0, 0.05, 0.0));
    }

    #[test]
    fn power_law_written_only_when_keyword_does_not_imply_it() {
        assert_eq!(power_law(TransitionShape::Power, "Power Law", 0.5), Some(0.5));
        assert_eq!(power_law(TransitionShape::Parabolic, "Parabolic", 1.0), None);
        assert_eq!(power_law(TransitionShape::Parabolic, "Parabolic", 0.3), Some(0.3));
        assert_eq!(power_law(TransitionShape::Conical, "Conical", 0.0), None);
    }

    #[test]
    fn motor_descriptor_uses_double_space() {
        let mount = MotorMount {
            motor: Motor {
                manufacturer: "AP".to_string(),
                designation: "1/4A2".to_string(),
                digest: "d".to_string(),
                diameter: 0.013,
                length: 0.045,
                total_impulse: 0.6,
            },
            ejection_delay: Some(3.0),
        };
        assert_eq!(motor_descriptor(&mount), "1/4A2-3  (AP)");
    }
}
