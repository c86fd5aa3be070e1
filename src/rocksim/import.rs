//! Rocksim (`.rkt`) import.
//!
//! `Stage3Parts` is the sustainer; `Stage2Parts` and `Stage1Parts` follow
//! as boosters. A stage element with no parts adds no stage. Fin sets and
//! rings live in each part's `AttachedParts`.

use std::io::BufRead;

use rocketfile_core::models::{
    AxialPosition, BodyTube, Component, ComponentId, ComponentKind, FinSet, FinShape, NoseCone,
    Radius, Ring, RingUsage, Rocket, Transition,
};

use super::vocabulary::*;
use crate::document::ImportOutcome;
use crate::error::ImportError;
use crate::sax::{self, Attributes, ElementHandler, ScalarFields};
use crate::warnings::{Warning, WarningSet};

pub struct ImportContext {
    pub rocket: Rocket,
    pub warnings: WarningSet,
    design_seen: bool,
}

enum Handler {
    Start,
    Document,
    DesignInformation,
    RocketDesign,
    Stage(StageHandler),
    Part(PartHandler),
    AttachedParts(ComponentId),
    FinSet(FinSetHandler),
    Ring(RingHandler),
    PlainText,
}

impl ElementHandler<ImportContext> for Handler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        ctx: &mut ImportContext,
    ) -> Result<Self, ImportError> {
        Ok(match self {
            Handler::Start if element == ROCKSIM_DOCUMENT => Handler::Document,
            Handler::Start => {
                return Err(ImportError::InvalidDocument(format!(
                    "expected {} root element, found {}",
                    ROCKSIM_DOCUMENT, element
                )))
            }
            Handler::Document if element == DESIGN_INFORMATION => Handler::DesignInformation,
            Handler::DesignInformation if element == ROCKET_DESIGN => {
                if ctx.design_seen {
                    return Err(ImportError::InvalidDocument(format!(
                        "more than one {} element",
                        ROCKET_DESIGN
                    )));
                }
                ctx.design_seen = true;
                Handler::RocketDesign
            }
            Handler::RocketDesign => match element {
                STAGE3_PARTS | STAGE2_PARTS | STAGE1_PARTS => Handler::Stage(StageHandler { stage: None }),
                _ => Handler::PlainText,
            },
            Handler::Stage(h) => match element {
                NOSE_CONE | BODY_TUBE | TRANSITION => {
                    let stage = h.stage(ctx)?;
                    Handler::Part(PartHandler::new(ctx, stage, element)?)
                }
                _ => {
                    tracing::debug!(element, "skipping Rocksim part");
                    Handler::PlainText
                }
            },
            Handler::Part(h) if element == ATTACHED_PARTS => Handler::AttachedParts(h.id),
            Handler::AttachedParts(parent) => match element {
                FIN_SET => Handler::FinSet(FinSetHandler::new(ctx, *parent, false)?),
                CUSTOM_FIN_SET => Handler::FinSet(FinSetHandler::new(ctx, *parent, true)?),
                RING => Handler::Ring(RingHandler::new(*parent)),
                _ => {
                    tracing::debug!(element, "skipping Rocksim attached part");
                    Handler::PlainText
                }
            },
            _ => Handler::PlainText,
        })
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        ctx: &mut ImportContext,
    ) -> Result<(), ImportError> {
        match self {
            Handler::RocketDesign if element == NAME && !content.is_empty() => {
                let root = ctx.rocket.root();
                ctx.rocket.component_mut(root)?.name = content.to_string();
            }
            Handler::Part(h) => h.record.close_element(element, content, ctx),
            Handler::FinSet(h) => {
                if element == POINT_LIST {
                    h.point_list = Some(content.to_string());
                } else {
                    h.record.close_element(element, content, ctx);
                }
            }
            Handler::Ring(h) => h.record.close_element(element, content, ctx),
            _ => {}
        }
        Ok(())
    }

    fn end_handler(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        ctx: &mut ImportContext,
    ) -> Result<(), ImportError> {
        match self {
            Handler::Part(h) => h.end_handler(ctx),
            Handler::FinSet(h) => h.end_handler(ctx),
            Handler::Ring(h) => h.end_handler(ctx),
            _ => Ok(()),
        }
    }
}

/// Name plus numeric fields of one Rocksim record.
struct Record {
    name: Option<String>,
    fields: ScalarFields,
}

impl Record {
    fn new(fields: ScalarFields) -> Self {
        Self { name: None, fields }
    }

    fn close_element(&mut self, element: &str, content: &str, ctx: &mut ImportContext) {
        if element == NAME {
            if !content.is_empty() {
                self.name = Some(content.to_string());
            }
        } else {
            self.fields.accept(element, content, &mut ctx.warnings);
        }
    }

    fn length(&self, element: &str) -> f64 {
        to_native_length(self.fields.get_or(element, 0.0)).max(0.0)
    }

    fn code(&self, element: &str) -> Option<i64> {
        self.fields.get_int(element)
    }

    fn position(&self, ctx: &mut ImportContext) -> AxialPosition {
        let xb = to_native_length(self.fields.get_or(XB, 0.0));
        position(self.code(LOCATION_MODE).unwrap_or(0), xb, &mut ctx.warnings)
    }

    fn rename(&self, component: &mut Component) {
        if let Some(name) = &self.name {
            component.name = name.clone();
        }
    }
}

/// A `StageNParts` element. The stage is created with its first part.
struct StageHandler {
    stage: Option<ComponentId>,
}

impl StageHandler {
    fn stage(&mut self, ctx: &mut ImportContext) -> Result<ComponentId, ImportError> {
        if let Some(stage) = self.stage {
            return Ok(stage);
        }
        let name = match ctx.rocket.stage_count() {
            0 => "Sustainer".to_string(),
            n => format!("Booster {}", n),
        };
        let root = ctx.rocket.root();
        let stage = ctx.rocket.add_child(root, Component::stage(name))?;
        self.stage = Some(stage);
        Ok(stage)
    }
}

/// `NoseCone`, `BodyTube` or `Transition`.
struct PartHandler {
    id: ComponentId,
    record: Record,
}

impl PartHandler {
    fn new(ctx: &mut ImportContext, stage: ComponentId, element: &str) -> Result<Self, ImportError> {
        let component = match element {
            NOSE_CONE => Component::new(
                "Nose Cone",
                ComponentKind::NoseCone(NoseCone {
                    aft_radius: Radius::Unset,
                    ..NoseCone::default()
                }),
            ),
            BODY_TUBE => Component::new("Body Tube", ComponentKind::BodyTube(BodyTube::default())),
            _ => Component::new("Transition", ComponentKind::Transition(Transition::default())),
        };
        let id = ctx.rocket.add_child(stage, component)?;
        Ok(Self {
            id,
            record: Record::new(
                ScalarFields::new()
                    .real(&[
                        LEN,
                        BASE_DIA,
                        FRONT_DIA,
                        REAR_DIA,
                        OD,
                        ID,
                        SHAPE_PARAMETER,
                        WALL_THICKNESS,
                    ])
                    .integer(&[SHAPE_CODE, FINISH_CODE]),
            ),
        })
    }

    fn end_handler(&mut self, ctx: &mut ImportContext) -> Result<(), ImportError> {
        let record = &self.record;
        let surface = record.code(FINISH_CODE).map(|code| finish(code, &mut ctx.warnings));
        let profile = record.code(SHAPE_CODE).map(|code| shape(code, &mut ctx.warnings));
        let parameter = record.fields.get(SHAPE_PARAMETER);

        let component = ctx.rocket.component_mut(self.id)?;
        record.rename(component);
        match &mut component.kind {
            ComponentKind::NoseCone(nose) => {
                if let Some(profile) = profile {
                    nose.shape = profile;
                    nose.shape_parameter = profile.default_parameter();
                }
                if let Some(parameter) = parameter {
                    nose.shape_parameter = parameter;
                }
                nose.length = record.length(LEN);
                nose.aft_radius = Radius::explicit(record.length(BASE_DIA) / 2.0);
                nose.thickness = record.length(WALL_THICKNESS);
            }
            ComponentKind::BodyTube(tube) => {
                let outer = record.length(OD) / 2.0;
                let inner = record.length(ID) / 2.0;
                tube.length = record.length(LEN);
                tube.outer_radius = Radius::explicit(outer);
                tube.thickness = if inner > 0.0 { (outer - inner).max(0.0) } else { 0.0 };
            }
            ComponentKind::Transition(transition) => {
                if let Some(profile) = profile {
                    transition.shape = profile;
                    transition.shape_parameter = profile.default_parameter();
                }
                if let Some(parameter) = parameter {
                    transition.shape_parameter = parameter;
                }
                transition.length = record.length(LEN);
                transition.fore_radius = Radius::explicit(record.length(FRONT_DIA) / 2.0);
                transition.aft_radius = Radius::explicit(record.length(REAR_DIA) / 2.0);
                transition.thickness = record.length(WALL_THICKNESS);
            }
            _ => {}
        }
        if let Some(surface) = surface {
            component.kind.set_finish(surface);
        }
        Ok(())
    }
}

/// `FinSet` (trapezoid) or `CustomFinSet` (point list).
struct FinSetHandler {
    parent: ComponentId,
    custom: bool,
    record: Record,
    point_list: Option<String>,
}

impl FinSetHandler {
    fn new(ctx: &mut ImportContext, parent: ComponentId, custom: bool) -> Result<Self, ImportError> {
        ctx.rocket.component(parent)?;
        Ok(Self {
            parent,
            custom,
            record: Record::new(
                ScalarFields::new()
                    .real(&[ROOT_CHORD, TIP_CHORD, SEMI_SPAN, SWEEP_DISTANCE, THICKNESS, XB])
                    .integer(&[FIN_COUNT, TIP_SHAPE_CODE, FINISH_CODE, LOCATION_MODE]),
            ),
            point_list: None,
        })
    }

    fn end_handler(&mut self, ctx: &mut ImportContext) -> Result<(), ImportError> {
        let record = &self.record;
        let shape = if self.custom {
            let list = self.point_list.as_deref().unwrap_or_default();
            match parse_point_list(list) {
                Some(points) => FinShape::Freeform { points },
                None => {
                    ctx.warnings.add(Warning::unsupported(
                        "Custom fin set",
                        Some(format!(
                            "'{}' has an unreadable point list and was skipped",
                            record.name.as_deref().unwrap_or(CUSTOM_FIN_SET)
                        )),
                    ));
                    return Ok(());
                }
            }
        } else {
            FinShape::Trapezoid {
                root_chord: record.length(ROOT_CHORD),
                tip_chord: record.length(TIP_CHORD),
                span: record.length(SEMI_SPAN),
                sweep: to_native_length(record.fields.get_or(SWEEP_DISTANCE, 0.0)),
            }
        };

        let mut fin_set = FinSet {
            shape,
            thickness: record.length(THICKNESS),
            ..FinSet::default()
        };
        if let Some(count) = record.code(FIN_COUNT) {
            match u32::try_from(count) {
                Ok(count) if count > 0 => fin_set.fin_count = count,
                _ => {
                    ctx.warnings.add(Warning::invalid_number(FIN_COUNT, &count.to_string()));
                }
            }
        }
        if let Some(code) = record.code(TIP_SHAPE_CODE) {
            fin_set.cross_section = cross_section(code, &mut ctx.warnings);
        }
        if let Some(code) = record.code(FINISH_CODE) {
            fin_set.finish = finish(code, &mut ctx.warnings);
        }
        if matches!(
            ctx.rocket.component(self.parent)?.kind,
            ComponentKind::NoseCone(_) | ComponentKind::Transition(_)
        ) {
            fin_set.shape = fin_set.shape.to_freeform();
        }

        let mut component = Component::new(
            if self.custom { "Freeform fin set" } else { "Fin set" },
            ComponentKind::FinSet(fin_set),
        );
        record.rename(&mut component);
        component.position = record.position(ctx);
        ctx.rocket.add_child(self.parent, component)?;
        Ok(())
    }
}

struct RingHandler {
    parent: ComponentId,
    record: Record,
}

impl RingHandler {
    fn new(parent: ComponentId) -> Self {
        Self {
            parent,
            record: Record::new(
                ScalarFields::new()
                    .real(&[OD, ID, LEN, XB])
                    .integer(&[USAGE_CODE, LOCATION_MODE]),
            ),
        }
    }

    fn end_handler(&mut self, ctx: &mut ImportContext) -> Result<(), ImportError> {
        let record = &self.record;
        let ring = translate_ring(
            &RingRecord {
                outer_diameter: record.length(OD),
                inner_diameter: record.length(ID),
                length: record.length(LEN),
                usage_code: record.code(USAGE_CODE).unwrap_or(0),
            },
            &mut ctx.warnings,
        );
        let default_name = match ring.usage {
            RingUsage::Bulkhead => "Bulkhead",
            RingUsage::EngineBlock => "Engine block",
            RingUsage::CenteringRing => "Centering ring",
        };
        let mut component = Component::new(default_name, ComponentKind::Ring(ring));
        record.rename(&mut component);
        component.position = record.position(ctx);
        ctx.rocket.add_child(self.parent, component)?;
        Ok(())
    }
}

/// The flat fields of a Rocksim `Ring`, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingRecord {
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub length: f64,
    pub usage_code: i64,
}

/// Build the ring geometry and role for one Rocksim ring record.
///
/// A zero diameter leaves that radius to the surrounding components.
pub fn translate_ring(record: &RingRecord, warnings: &mut WarningSet) -> Ring {
    let radius = |diameter: f64, missing: Radius| {
        if diameter > 0.0 {
            Radius::explicit(diameter / 2.0)
        } else {
            missing
        }
    };
    Ring {
        length: record.length.max(0.0),
        outer_radius: radius(record.outer_diameter, Radius::Automatic),
        inner_radius: radius(record.inner_diameter, Radius::Unset),
        ..Ring::new(ring_usage(record.usage_code, warnings))
    }
}

/// Import a Rocksim document into a fresh rocket.
pub fn load<R: BufRead>(source: R) -> Result<ImportOutcome, ImportError> {
    let mut ctx = ImportContext {
        rocket: Rocket::new("Rocket"),
        warnings: WarningSet::new(),
        design_seen: false,
    };
    sax::parse(source, Handler::Start, &mut ctx)?;
    if !ctx.design_seen {
        return Err(ImportError::InvalidDocument(format!(
            "no {} element found",
            ROCKET_DESIGN
        )));
    }
    tracing::info!(
        components = ctx.rocket.len() - 1,
        warnings = ctx.warnings.len(),
        "Rocksim import complete"
    );
    Ok(ImportOutcome {
        rocket: ctx.rocket,
        warnings: ctx.warnings.seal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(usage_code: i64) -> RingRecord {
        RingRecord {
            outer_diameter: 0.05,
            inner_diameter: 0.03,
            length: 0.01,
            usage_code,
        }
    }

    #[test]
    fn ring_usage_codes() {
        let mut warnings = WarningSet::new();
        assert_eq!(translate_ring(&record(0), &mut warnings).usage, RingUsage::CenteringRing);
        assert_eq!(translate_ring(&record(1), &mut warnings).usage, RingUsage::Bulkhead);
        assert_eq!(translate_ring(&record(2), &mut warnings).usage, RingUsage::EngineBlock);
        assert!(warnings.is_empty());

        let ring = translate_ring(&record(9), &mut warnings);
        assert_eq!(ring.usage, RingUsage::CenteringRing);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn ring_geometry_is_shared_across_usages() {
        let mut warnings = WarningSet::new();
        let bulkhead = translate_ring(&record(1), &mut warnings);
        let block = translate_ring(&record(2), &mut warnings);
        assert_eq!(bulkhead.outer_radius, block.outer_radius);
        assert_eq!(bulkhead.inner_radius, block.inner_radius);
        assert_eq!(bulkhead.length, block.length);
        assert_eq!(bulkhead.outer_radius, Radius::Explicit(0.025));
    }

    #[test]
    fn zero_diameters_are_not_explicit() {
        let mut warnings = WarningSet::new();
        let ring = translate_ring(
            &RingRecord {
                outer_diameter: 0.0,
                inner_diameter: 0.0,
                length: 0.002,
                usage_code: 1,
            },
            &mut warnings,
        );
        assert_eq!(ring.outer_radius, Radius::Automatic);
        assert_eq!(ring.inner_radius, Radius::Unset);
    }
}
