//! Engine selection from the RASAero `SimulationList`.
//!
//! Only the first `Simulation` describes the flown configuration. Its engines
//! are kept until the document closes and then mounted on the last body tube
//! of the stage each one belongs to.

use rocketfile_core::models::{ComponentId, ComponentKind, Rocket};

use super::ImportContext;
use crate::rasaero::vocabulary::*;
use crate::warnings::Warning;

#[derive(Debug, Default)]
pub(super) struct SimulationHandler {
    index: usize,
    engines: EngineSelection,
}

impl SimulationHandler {
    pub(super) fn new(index: usize) -> Self {
        Self {
            index,
            engines: EngineSelection::default(),
        }
    }

    pub(super) fn close_element(&mut self, element: &str, content: &str) {
        let engines = &mut self.engines;
        match element {
            SUSTAINER_ENGINE => engines.sustainer = Some(content.to_string()),
            BOOSTER1_ENGINE => engines.boosters[0] = Some(content.to_string()),
            BOOSTER2_ENGINE => engines.boosters[1] = Some(content.to_string()),
            USE_BOOSTER1 => engines.use_booster[0] = !content.eq_ignore_ascii_case("False"),
            USE_BOOSTER2 => engines.use_booster[1] = !content.eq_ignore_ascii_case("False"),
            _ => {}
        }
    }

    pub(super) fn end_handler(&mut self, ctx: &mut ImportContext<'_>) {
        if self.index > 0 {
            ctx.warnings.add(Warning::other(
                "Only the first RASAero simulation is imported; later simulations were ignored",
            ));
            return;
        }
        ctx.engines = Some(std::mem::take(&mut self.engines));
    }
}

/// Engine descriptors for the sustainer and up to two boosters.
#[derive(Debug)]
pub(super) struct EngineSelection {
    sustainer: Option<String>,
    boosters: [Option<String>; 2],
    use_booster: [bool; 2],
}

impl Default for EngineSelection {
    fn default() -> Self {
        Self {
            sustainer: None,
            boosters: [None, None],
            use_booster: [true, true],
        }
    }
}

impl EngineSelection {
    pub(super) fn mount(self, ctx: &mut ImportContext<'_>) {
        let mut wanted = vec![(0, self.sustainer)];
        for (i, engine) in self.boosters.into_iter().enumerate() {
            if self.use_booster[i] {
                wanted.push((i + 1, engine));
            }
        }

        let motors = ctx.motors;
        for (stage_index, descriptor) in wanted {
            let Some(descriptor) = descriptor.filter(|d| !d.trim().is_empty()) else {
                continue;
            };
            let Some(mount) = motors.resolve(&descriptor, &mut ctx.warnings) else {
                continue;
            };
            let Some(tube) = motor_tube(&ctx.rocket, stage_index) else {
                ctx.warnings.add(Warning::other(format!(
                    "No body tube to mount motor {} on",
                    descriptor
                )));
                continue;
            };
            if let Some(component) = ctx.rocket.get_mut(tube) {
                tracing::debug!(motor = %mount.motor.designation, tube = %component.name, "mounted motor");
                if let ComponentKind::BodyTube(body) = &mut component.kind {
                    body.motor = Some(mount);
                }
            }
        }
    }
}

/// Last body tube of the stage at `stage_index`.
fn motor_tube(rocket: &Rocket, stage_index: usize) -> Option<ComponentId> {
    let stage = *rocket.stages().get(stage_index)?;
    rocket
        .children(stage)
        .iter()
        .rev()
        .copied()
        .find(|id| {
            matches!(
                rocket.get(*id).map(|c| &c.kind),
                Some(ComponentKind::BodyTube(_))
            )
        })
}
