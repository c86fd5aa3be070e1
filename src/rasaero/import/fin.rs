//! RASAero `Fin` translator.
//!
//! RASAero measures fin location from the aft end of the parent to the fin's
//! leading edge. Native fin sets are placed from the parent's bottom by their
//! own aft edge, so the offset becomes `-location + root_chord`.

use rocketfile_core::models::{
    AxialMethod, AxialPosition, Component, ComponentId, ComponentKind, FinSet, FinShape,
};
use rocketfile_core::StructureError;

use super::ImportContext;
use crate::error::ImportError;
use crate::rasaero::vocabulary::*;
use crate::sax::ScalarFields;
use crate::warnings::Warning;

pub(super) struct FinHandler {
    parent: ComponentId,
    fields: ScalarFields,
    fin_set: FinSet,
}

impl FinHandler {
    pub(super) fn new(ctx: &mut ImportContext<'_>, parent: ComponentId) -> Result<Self, ImportError> {
        ctx.rocket.component(parent)?;
        Ok(Self {
            parent,
            fields: ScalarFields::new().real(&[
                FIN_CHORD,
                FIN_SPAN,
                FIN_SWEEP_DISTANCE,
                FIN_TIP_CHORD,
                FIN_THICKNESS,
                LOCATION,
            ]),
            fin_set: FinSet::default(),
        })
    }

    pub(super) fn close_element(&mut self, element: &str, content: &str, ctx: &mut ImportContext<'_>) {
        match element {
            AIRFOIL_SECTION => {
                self.fin_set.cross_section = fin_cross_section(content, &mut ctx.warnings);
            }
            FIN_COUNT => match content.parse::<u32>() {
                Ok(count) if count > 0 => self.fin_set.fin_count = count,
                _ => {
                    ctx.warnings.add(Warning::invalid_number(element, content));
                }
            },
            _ => {
                self.fields.accept(element, content, &mut ctx.warnings);
            }
        }
    }

    pub(super) fn end_handler(&mut self, ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
        let length = |element: &str| to_native_length(self.fields.get_or(element, 0.0)).max(0.0);
        let root_chord = length(FIN_CHORD);
        let shape = FinShape::Trapezoid {
            root_chord,
            tip_chord: length(FIN_TIP_CHORD),
            span: length(FIN_SPAN),
            sweep: to_native_length(self.fields.get_or(FIN_SWEEP_DISTANCE, 0.0)),
        };

        let mut fin_set = FinSet {
            shape,
            thickness: length(FIN_THICKNESS),
            ..self.fin_set.clone()
        };

        let offset = self
            .fields
            .get(LOCATION)
            .map(|location| -to_native_length(location) + root_chord)
            .unwrap_or(0.0);

        let parent_kind = &ctx.rocket.component(self.parent)?.kind;
        match parent_kind {
            ComponentKind::BodyTube(_) => {}
            ComponentKind::Transition(_) => {
                fin_set.shape = fin_set.shape.to_freeform();
            }
            other => {
                return Err(StructureError::InvalidChild {
                    parent: other.type_name(),
                    child: "TrapezoidFinSet",
                }
                .into());
            }
        }

        let mut component = Component::new("Fin", ComponentKind::FinSet(fin_set));
        component.color = Some(DEFAULT_COLOR);
        component.position = AxialPosition::new(AxialMethod::Bottom, offset);
        ctx.rocket.add_child(self.parent, component)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rocketfile_core::models::{NoseCone, Transition};

    use super::*;
    use crate::motors::MotorIndex;

    fn finish_fin(ctx: &mut ImportContext<'_>, parent: ComponentId) -> Result<(), ImportError> {
        let mut handler = FinHandler::new(ctx, parent)?;
        handler.close_element(FIN_CHORD, "4", ctx);
        handler.close_element(LOCATION, "4", ctx);
        handler.end_handler(ctx)
    }

    #[test]
    fn fin_on_a_stage_is_a_structure_error() {
        let motors = MotorIndex::empty();
        let mut ctx = ImportContext::new(&motors);
        let root = ctx.rocket.root();
        let stage = ctx.rocket.add_child(root, Component::stage("Sustainer")).unwrap();

        let err = finish_fin(&mut ctx, stage).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Structure(StructureError::InvalidChild { parent: "Stage", child: "TrapezoidFinSet" })
        ));
        assert!(ctx.rocket.children(stage).is_empty());
    }

    #[test]
    fn fin_on_a_nose_cone_is_a_structure_error() {
        let motors = MotorIndex::empty();
        let mut ctx = ImportContext::new(&motors);
        let root = ctx.rocket.root();
        let stage = ctx.rocket.add_child(root, Component::stage("Sustainer")).unwrap();
        let nose = ctx
            .rocket
            .add_child(stage, Component::new("Nose", ComponentKind::NoseCone(NoseCone::default())))
            .unwrap();

        assert!(matches!(
            finish_fin(&mut ctx, nose),
            Err(ImportError::Structure(StructureError::InvalidChild { parent: "NoseCone", .. }))
        ));
    }

    #[test]
    fn fin_on_a_transition_becomes_freeform() {
        let motors = MotorIndex::empty();
        let mut ctx = ImportContext::new(&motors);
        let root = ctx.rocket.root();
        let stage = ctx.rocket.add_child(root, Component::stage("Sustainer")).unwrap();
        let transition = ctx
            .rocket
            .add_child(stage, Component::new("Taper", ComponentKind::Transition(Transition::default())))
            .unwrap();

        finish_fin(&mut ctx, transition).unwrap();
        let fin = ctx.rocket.get(ctx.rocket.children(transition)[0]).unwrap();
        assert_eq!(fin.kind.type_name(), "FreeformFinSet");
        assert_eq!(fin.position, AxialPosition::new(AxialMethod::Bottom, 0.0));
    }
}
