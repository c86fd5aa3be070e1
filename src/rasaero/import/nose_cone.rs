use rocketfile_core::models::{
    Color, Component, ComponentId, ComponentKind, NoseCone, Radius, TransitionShape,
};

use super::ImportContext;
use crate::error::ImportError;
use crate::rasaero::vocabulary::*;
use crate::sax::ScalarFields;

pub(super) struct NoseConeHandler {
    id: ComponentId,
    fields: ScalarFields,
    shape: Option<(TransitionShape, f64)>,
    color: Option<Color>,
}

impl NoseConeHandler {
    pub(super) fn new(ctx: &mut ImportContext<'_>, parent: ComponentId) -> Result<Self, ImportError> {
        // A nose cone is the first component of the vehicle, so there is no
        // neighbour to take its base radius from.
        let nose_cone = NoseCone {
            aft_radius: Radius::Unset,
            ..NoseCone::default()
        };
        let id = ctx
            .rocket
            .add_child(parent, Component::new("Nose Cone", ComponentKind::NoseCone(nose_cone)))?;
        Ok(Self {
            id,
            fields: ScalarFields::new().real(&[LENGTH, DIAMETER, LOCATION, POWER_LAW, BLUNT_RADIUS]),
            shape: None,
            color: None,
        })
    }

    pub(super) fn close_element(&mut self, element: &str, content: &str, ctx: &mut ImportContext<'_>) {
        match element {
            SHAPE => {
                if let Some(shape) = nose_cone_shape(content, &mut ctx.warnings) {
                    self.shape = Some(shape);
                }
            }
            COLOR => self.color = Some(color(content, &mut ctx.warnings)),
            _ => {
                self.fields.accept(element, content, &mut ctx.warnings);
            }
        }
    }

    pub(super) fn end_handler(&mut self, ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
        if let Some(blunt) = self.fields.get(BLUNT_RADIUS).filter(|r| *r > 0.0) {
            tracing::debug!(blunt_radius = blunt, "nose cone blunt radius ignored");
        }

        let length = to_native_length(self.fields.get_or(LENGTH, 0.0));
        let radius = to_native_length(self.fields.get_or(DIAMETER, 0.0)) / 2.0;
        let power_law = self.fields.get(POWER_LAW);

        let component = ctx.rocket.component_mut(self.id)?;
        if let Some(color) = self.color {
            component.color = Some(color);
        }
        if let ComponentKind::NoseCone(nose_cone) = &mut component.kind {
            if let Some((shape, parameter)) = self.shape {
                nose_cone.shape = shape;
                nose_cone.shape_parameter = parameter;
            }
            if let Some(exponent) = power_law {
                nose_cone.shape_parameter = exponent;
            }
            nose_cone.length = length.max(0.0);
            nose_cone.aft_radius = Radius::explicit(radius);
            nose_cone.thickness = DEFAULT_WALL_THICKNESS;
        }
        Ok(())
    }
}
