//! Rocksim export.

use rocketfile_core::models::{Component, ComponentId, ComponentKind, FinShape, Rocket};
use serde::Serialize;

use super::vocabulary::*;
use crate::document::{write_xml, ExportOutcome};
use crate::error::ExportError;
use crate::warnings::{Warning, WarningSet};

const FILE_FORMAT_VERSION: u32 = 4;
const MAX_STAGES: usize = 3;

#[derive(Debug, Serialize)]
#[serde(rename = "RockSimDocument")]
struct DocumentDto {
    #[serde(rename = "FileVersion")]
    file_version: u32,
    #[serde(rename = "DesignInformation")]
    design_information: DesignInformationDto,
}

#[derive(Debug, Serialize)]
struct DesignInformationDto {
    #[serde(rename = "RocketDesign")]
    design: RocketDesignDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RocketDesignDto {
    name: String,
    stage_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage3_parts: Option<StagePartsDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage2_parts: Option<StagePartsDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage1_parts: Option<StagePartsDto>,
}

#[derive(Debug, Serialize)]
struct StagePartsDto {
    #[serde(rename = "$value")]
    parts: Vec<PartDto>,
}

#[derive(Debug, Serialize)]
enum PartDto {
    NoseCone(NoseConeDto),
    BodyTube(BodyTubeDto),
    Transition(TransitionDto),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NoseConeDto {
    name: String,
    len: f64,
    base_dia: f64,
    shape_code: i64,
    shape_parameter: f64,
    wall_thickness: f64,
    finish_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    attached_parts: Option<AttachedPartsDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct BodyTubeDto {
    name: String,
    len: f64,
    #[serde(rename = "OD")]
    outer_diameter: f64,
    #[serde(rename = "ID")]
    inner_diameter: f64,
    finish_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    attached_parts: Option<AttachedPartsDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TransitionDto {
    name: String,
    len: f64,
    front_dia: f64,
    rear_dia: f64,
    shape_code: i64,
    shape_parameter: f64,
    wall_thickness: f64,
    finish_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    attached_parts: Option<AttachedPartsDto>,
}

#[derive(Debug, Serialize)]
struct AttachedPartsDto {
    #[serde(rename = "$value")]
    parts: Vec<AttachedDto>,
}

#[derive(Debug, Serialize)]
enum AttachedDto {
    FinSet(FinSetDto),
    CustomFinSet(FinSetDto),
    Ring(RingDto),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct FinSetDto {
    name: String,
    fin_count: u32,
    root_chord: f64,
    tip_chord: f64,
    semi_span: f64,
    sweep_distance: f64,
    thickness: f64,
    tip_shape_code: i64,
    finish_code: i64,
    location_mode: i64,
    xb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    point_list: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RingDto {
    name: String,
    #[serde(rename = "OD")]
    outer_diameter: f64,
    #[serde(rename = "ID")]
    inner_diameter: f64,
    len: f64,
    usage_code: i64,
    location_mode: i64,
    xb: f64,
}

/// Render a rocket as a Rocksim document.
pub fn save(rocket: &Rocket) -> Result<ExportOutcome, ExportError> {
    let mut warnings = WarningSet::new();
    let stages = rocket.stages();
    if stages.len() > MAX_STAGES {
        warnings.add(Warning::unsupported(
            "More than three stages",
            Some(format!("{} stages were skipped", stages.len() - MAX_STAGES)),
        ));
    }

    let mut stage_parts = Vec::new();
    for stage in stages.iter().take(MAX_STAGES) {
        stage_parts.push(Some(stage_dto(rocket, *stage)?));
    }
    stage_parts.resize_with(MAX_STAGES, || None);
    let mut stage_parts = stage_parts.into_iter();

    let document = DocumentDto {
        file_version: FILE_FORMAT_VERSION,
        design_information: DesignInformationDto {
            design: RocketDesignDto {
                name: rocket.name().to_string(),
                stage_count: stages.len().min(MAX_STAGES),
                stage3_parts: stage_parts.next().flatten(),
                stage2_parts: stage_parts.next().flatten(),
                stage1_parts: stage_parts.next().flatten(),
            },
        },
    };
    let xml = write_xml(&document)?;
    tracing::info!(
        stages = document.design_information.design.stage_count,
        warnings = warnings.len(),
        "Rocksim export complete"
    );
    Ok(ExportOutcome {
        xml,
        warnings: warnings.seal(),
    })
}

fn stage_dto(rocket: &Rocket, stage: ComponentId) -> Result<StagePartsDto, ExportError> {
    let mut parts = Vec::new();
    for id in rocket.children(stage) {
        let component = rocket.component(*id)?;
        let finish = component.kind.finish().map(finish_code).unwrap_or(2);
        let name = component.name.clone();
        let part = match &component.kind {
            ComponentKind::NoseCone(nose) => PartDto::NoseCone(NoseConeDto {
                name,
                len: from_native_length(nose.length),
                base_dia: from_native_length(rocket.resolved_aft_radius(*id) * 2.0),
                shape_code: shape_code(nose.shape),
                shape_parameter: nose.shape_parameter,
                wall_thickness: from_native_length(nose.thickness),
                finish_code: finish,
                attached_parts: attached_parts(rocket, *id)?,
            }),
            ComponentKind::BodyTube(tube) => {
                let outer = rocket.resolved_outer_radius(*id);
                let inner = if tube.thickness > 0.0 {
                    (outer - tube.thickness).max(0.0)
                } else {
                    0.0
                };
                PartDto::BodyTube(BodyTubeDto {
                    name,
                    len: from_native_length(tube.length),
                    outer_diameter: from_native_length(outer * 2.0),
                    inner_diameter: from_native_length(inner * 2.0),
                    finish_code: finish,
                    attached_parts: attached_parts(rocket, *id)?,
                })
            }
            ComponentKind::Transition(transition) => PartDto::Transition(TransitionDto {
                name,
                len: from_native_length(transition.length),
                front_dia: from_native_length(rocket.resolved_fore_radius(*id) * 2.0),
                rear_dia: from_native_length(rocket.resolved_aft_radius(*id) * 2.0),
                shape_code: shape_code(transition.shape),
                shape_parameter: transition.shape_parameter,
                wall_thickness: from_native_length(transition.thickness),
                finish_code: finish,
                attached_parts: attached_parts(rocket, *id)?,
            }),
            _ => continue,
        };
        parts.push(part);
    }
    Ok(StagePartsDto { parts })
}

fn attached_parts(rocket: &Rocket, parent: ComponentId) -> Result<Option<AttachedPartsDto>, ExportError> {
    let mut parts = Vec::new();
    for id in rocket.children(parent) {
        let component = rocket.component(*id)?;
        if let Some(part) = attached_dto(component) {
            parts.push(part);
        }
    }
    Ok((!parts.is_empty()).then_some(AttachedPartsDto { parts }))
}

fn attached_dto(component: &Component) -> Option<AttachedDto> {
    let (location_mode, xb) = location(component.position);
    let xb = from_native_length(xb);
    match &component.kind {
        ComponentKind::FinSet(fin_set) => {
            let mut dto = FinSetDto {
                name: component.name.clone(),
                fin_count: fin_set.fin_count,
                root_chord: 0.0,
                tip_chord: 0.0,
                semi_span: 0.0,
                sweep_distance: 0.0,
                thickness: from_native_length(fin_set.thickness),
                tip_shape_code: cross_section_code(fin_set.cross_section),
                finish_code: finish_code(fin_set.finish),
                location_mode,
                xb,
                point_list: None,
            };
            match &fin_set.shape {
                FinShape::Trapezoid {
                    root_chord,
                    tip_chord,
                    span,
                    sweep,
                } => {
                    dto.root_chord = from_native_length(*root_chord);
                    dto.tip_chord = from_native_length(*tip_chord);
                    dto.semi_span = from_native_length(*span);
                    dto.sweep_distance = from_native_length(*sweep);
                    Some(AttachedDto::FinSet(dto))
                }
                FinShape::Freeform { points } => {
                    dto.root_chord = from_native_length(fin_set.shape.length());
                    dto.point_list = Some(format_point_list(points));
                    Some(AttachedDto::CustomFinSet(dto))
                }
            }
        }
        ComponentKind::Ring(ring) => Some(AttachedDto::Ring(RingDto {
            name: component.name.clone(),
            outer_diameter: from_native_length(ring.outer_radius.value().unwrap_or(0.0) * 2.0),
            inner_diameter: from_native_length(ring.inner_radius.value().unwrap_or(0.0) * 2.0),
            len: from_native_length(ring.length),
            usage_code: ring_usage_code(ring.usage),
            location_mode,
            xb,
        })),
        _ => None,
    }
}
