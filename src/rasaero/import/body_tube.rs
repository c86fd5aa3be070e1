use rocketfile_core::models::{
    BodyTube, Color, Component, ComponentId, ComponentKind, Radius, Transition, TransitionShape,
};

use super::fin::FinHandler;
use super::{Handler, ImportContext};
use crate::error::ImportError;
use crate::rasaero::vocabulary::*;
use crate::sax::ScalarFields;
use crate::warnings::Warning;

/// Most boosters a RASAero design can describe.
const MAX_BOOSTERS: usize = 2;

pub(super) struct BodyTubeHandler {
    id: ComponentId,
    fields: ScalarFields,
    color: Option<Color>,
}

impl BodyTubeHandler {
    pub(super) fn new(ctx: &mut ImportContext<'_>, parent: ComponentId) -> Result<Self, ImportError> {
        let id = ctx.rocket.add_child(
            parent,
            Component::new("Body Tube", ComponentKind::BodyTube(BodyTube::default())),
        )?;
        Ok(Self {
            id,
            fields: ScalarFields::new().real(&[LENGTH, DIAMETER, LOCATION]),
            color: None,
        })
    }

    pub(super) fn open_element(
        &mut self,
        element: &str,
        ctx: &mut ImportContext<'_>,
    ) -> Result<Handler, ImportError> {
        if element == FIN {
            return Ok(Handler::Fin(FinHandler::new(ctx, self.id)?));
        }
        Ok(Handler::PlainText)
    }

    pub(super) fn close_element(&mut self, element: &str, content: &str, ctx: &mut ImportContext<'_>) {
        if element == COLOR {
            self.color = Some(color(content, &mut ctx.warnings));
        } else {
            self.fields.accept(element, content, &mut ctx.warnings);
        }
    }

    pub(super) fn end_handler(&mut self, ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
        let length = to_native_length(self.fields.get_or(LENGTH, 0.0));
        let radius = to_native_length(self.fields.get_or(DIAMETER, 0.0)) / 2.0;

        let component = ctx.rocket.component_mut(self.id)?;
        if let Some(color) = self.color {
            component.color = Some(color);
        }
        if let ComponentKind::BodyTube(tube) = &mut component.kind {
            tube.length = length.max(0.0);
            // the source always supplies the diameter
            tube.outer_radius = Radius::explicit(radius);
            tube.thickness = DEFAULT_WALL_THICKNESS;
        }
        Ok(())
    }

    pub(super) fn id(&self) -> ComponentId {
        self.id
    }
}

/// A RASAero booster: a new stage holding one body tube, plus an optional
/// shoulder ahead of it and boat tail behind it.
pub(super) struct BoosterHandler {
    stage: ComponentId,
    stage_name: String,
    body: BodyTubeHandler,
    fields: ScalarFields,
}

impl BoosterHandler {
    pub(super) fn new(ctx: &mut ImportContext<'_>) -> Result<Self, ImportError> {
        // Named after the stages already present: the sustainer makes the
        // first booster "Booster 1".
        let existing = ctx.rocket.stage_count();
        if existing > MAX_BOOSTERS {
            ctx.warnings.add(Warning::other(format!(
                "RASAero designs hold at most {} boosters; found another one",
                MAX_BOOSTERS
            )));
        }
        let stage_name = format!("Booster {}", existing.max(1));

        let root = ctx.rocket.root();
        let stage = ctx.rocket.add_child(root, Component::stage(stage_name.clone()))?;
        let body = BodyTubeHandler::new(ctx, stage)?;
        Ok(Self {
            stage,
            stage_name,
            body,
            fields: ScalarFields::new().real(&[
                BOAT_TAIL_LENGTH,
                BOAT_TAIL_REAR_DIAMETER,
                SHOULDER_LENGTH,
            ]),
        })
    }

    pub(super) fn open_element(
        &mut self,
        element: &str,
        ctx: &mut ImportContext<'_>,
    ) -> Result<Handler, ImportError> {
        self.body.open_element(element, ctx)
    }

    pub(super) fn close_element(&mut self, element: &str, content: &str, ctx: &mut ImportContext<'_>) {
        if !self.fields.accept(element, content, &mut ctx.warnings) {
            self.body.close_element(element, content, ctx);
        }
    }

    pub(super) fn end_handler(&mut self, ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
        self.body.end_handler(ctx)?;

        let body = ctx.rocket.component_mut(self.body.id())?;
        body.name = format!("{} Body Tube", self.stage_name);
        let color = body.color;
        let radius = match &body.kind {
            ComponentKind::BodyTube(tube) => tube.outer_radius.value().unwrap_or(0.0),
            _ => 0.0,
        };

        let shoulder_length = to_native_length(self.fields.get_or(SHOULDER_LENGTH, 0.0));
        if shoulder_length > 0.0 {
            let mut shoulder = Component::new(
                format!("{} Shoulder", self.stage_name),
                ComponentKind::Transition(Transition {
                    shape: TransitionShape::Conical,
                    length: shoulder_length,
                    fore_radius: Radius::Automatic,
                    aft_radius: Radius::explicit(radius),
                    thickness: DEFAULT_WALL_THICKNESS,
                    ..Transition::default()
                }),
            );
            shoulder.color = color;
            ctx.rocket.insert_child(self.stage, 0, shoulder)?;
        }

        let tail_length = to_native_length(self.fields.get_or(BOAT_TAIL_LENGTH, 0.0));
        let rear_diameter = to_native_length(self.fields.get_or(BOAT_TAIL_REAR_DIAMETER, 0.0));
        if tail_length > 0.0 && rear_diameter > 0.0 {
            let mut boat_tail = Component::new(
                format!("{} Boat Tail", self.stage_name),
                ComponentKind::Transition(Transition {
                    shape: TransitionShape::Conical,
                    length: tail_length,
                    fore_radius: Radius::explicit(radius),
                    aft_radius: Radius::explicit(rear_diameter / 2.0),
                    thickness: DEFAULT_WALL_THICKNESS,
                    ..Transition::default()
                }),
            );
            boat_tail.color = color;
            ctx.rocket.add_child(self.stage, boat_tail)?;
        }
        Ok(())
    }
}
