use rocketfile_core::models::{
    Color, Component, ComponentId, ComponentKind, Radius, Transition, TransitionShape,
};

use super::fin::FinHandler;
use super::{Handler, ImportContext};
use crate::error::ImportError;
use crate::rasaero::vocabulary::*;
use crate::sax::ScalarFields;

pub(super) struct TransitionHandler {
    id: ComponentId,
    fields: ScalarFields,
    color: Option<Color>,
}

impl TransitionHandler {
    pub(super) fn new(ctx: &mut ImportContext<'_>, parent: ComponentId) -> Result<Self, ImportError> {
        let transition = Transition {
            shape: TransitionShape::Conical,
            ..Transition::default()
        };
        let id = ctx.rocket.add_child(
            parent,
            Component::new("Transition", ComponentKind::Transition(transition)),
        )?;
        Ok(Self {
            id,
            fields: ScalarFields::new().real(&[LENGTH, DIAMETER, REAR_DIAMETER, LOCATION]),
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
        let fore = to_native_length(self.fields.get_or(DIAMETER, 0.0)) / 2.0;
        let aft = to_native_length(self.fields.get_or(REAR_DIAMETER, 0.0)) / 2.0;

        let component = ctx.rocket.component_mut(self.id)?;
        if let Some(color) = self.color {
            component.color = Some(color);
        }
        if let ComponentKind::Transition(transition) = &mut component.kind {
            transition.length = length.max(0.0);
            transition.fore_radius = Radius::explicit(fore);
            transition.aft_radius = Radius::explicit(aft);
            transition.thickness = DEFAULT_WALL_THICKNESS;
        }
        Ok(())
    }
}
