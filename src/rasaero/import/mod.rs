//! RASAero (`.CDX1`) import.
//!
//! The document is walked with the shared handler stack. `RocketDesign`
//! creates the sustainer stage; each component element below it gets a
//! translator that builds one native component (a `Booster` builds a whole
//! stage). Engines listed in the first `Simulation` are mounted once the
//! document element closes, so the order of the two sections does not matter.

mod body_tube;
mod fin;
mod nose_cone;
mod simulation;
mod surface;
mod transition;

pub use surface::apply_surface_finish;

use std::io::BufRead;

use rocketfile_core::models::{Component, ComponentId, Rocket};

use self::body_tube::{BodyTubeHandler, BoosterHandler};
use self::fin::FinHandler;
use self::nose_cone::NoseConeHandler;
use self::simulation::{EngineSelection, SimulationHandler};
use self::transition::TransitionHandler;
use super::vocabulary::*;
use crate::document::ImportOutcome;
use crate::error::ImportError;
use crate::motors::MotorIndex;
use crate::sax::{self, Attributes, ElementHandler};
use crate::warnings::WarningSet;

/// State shared by every handler during one RASAero import.
pub struct ImportContext<'m> {
    pub rocket: Rocket,
    pub warnings: WarningSet,
    motors: &'m MotorIndex,
    design_seen: bool,
    simulations: usize,
    engines: Option<EngineSelection>,
}

impl<'m> ImportContext<'m> {
    fn new(motors: &'m MotorIndex) -> Self {
        Self {
            rocket: Rocket::new("Rocket"),
            warnings: WarningSet::new(),
            motors,
            design_seen: false,
            simulations: 0,
            engines: None,
        }
    }
}

/// Handler for one level of the RASAero element nesting.
enum Handler {
    /// Outside the document element.
    Start,
    Document,
    RocketDesign(RocketDesignHandler),
    NoseCone(NoseConeHandler),
    BodyTube(BodyTubeHandler),
    Booster(BoosterHandler),
    Transition(TransitionHandler),
    Fin(FinHandler),
    SimulationList,
    Simulation(SimulationHandler),
    /// Leaf or unknown element; its text is handed to the parent, its children are ignored.
    PlainText,
}

impl<'m> ElementHandler<ImportContext<'m>> for Handler {
    fn open_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        ctx: &mut ImportContext<'m>,
    ) -> Result<Self, ImportError> {
        match self {
            Handler::Start if element == RASAERO_DOCUMENT => Ok(Handler::Document),
            Handler::Start => Err(ImportError::InvalidDocument(format!(
                "expected {} root element, found {}",
                RASAERO_DOCUMENT, element
            ))),
            Handler::Document => match element {
                ROCKET_DESIGN => RocketDesignHandler::new(ctx).map(Handler::RocketDesign),
                SIMULATION_LIST => Ok(Handler::SimulationList),
                _ => Ok(skip(element)),
            },
            Handler::RocketDesign(h) => h.open_element(element, ctx),
            Handler::BodyTube(h) => h.open_element(element, ctx),
            Handler::Booster(h) => h.open_element(element, ctx),
            Handler::Transition(h) => h.open_element(element, ctx),
            Handler::SimulationList if element == SIMULATION => {
                let index = ctx.simulations;
                ctx.simulations += 1;
                Ok(Handler::Simulation(SimulationHandler::new(index)))
            }
            _ => Ok(Handler::PlainText),
        }
    }

    fn close_element(
        &mut self,
        element: &str,
        _attributes: &Attributes,
        content: &str,
        ctx: &mut ImportContext<'m>,
    ) -> Result<(), ImportError> {
        match self {
            Handler::RocketDesign(h) => h.close_element(element, content),
            Handler::NoseCone(h) => h.close_element(element, content, ctx),
            Handler::BodyTube(h) => h.close_element(element, content, ctx),
            Handler::Booster(h) => h.close_element(element, content, ctx),
            Handler::Transition(h) => h.close_element(element, content, ctx),
            Handler::Fin(h) => h.close_element(element, content, ctx),
            Handler::Simulation(h) => h.close_element(element, content),
            _ => {}
        }
        Ok(())
    }

    fn end_handler(
        &mut self,
        _element: &str,
        _attributes: &Attributes,
        _content: &str,
        ctx: &mut ImportContext<'m>,
    ) -> Result<(), ImportError> {
        match self {
            Handler::Document => finish_document(ctx),
            Handler::RocketDesign(h) => {
                h.end_handler(ctx);
                Ok(())
            }
            Handler::NoseCone(h) => h.end_handler(ctx),
            Handler::BodyTube(h) => h.end_handler(ctx),
            Handler::Booster(h) => h.end_handler(ctx),
            Handler::Transition(h) => h.end_handler(ctx),
            Handler::Fin(h) => h.end_handler(ctx),
            Handler::Simulation(h) => {
                h.end_handler(ctx);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn skip(element: &str) -> Handler {
    tracing::debug!(element, "skipping RASAero element");
    Handler::PlainText
}

fn finish_document(ctx: &mut ImportContext<'_>) -> Result<(), ImportError> {
    if let Some(engines) = ctx.engines.take() {
        engines.mount(ctx);
    }
    Ok(())
}

/// Handler for `RocketDesign`: owns the sustainer stage and the vehicle-wide surface finish.
struct RocketDesignHandler {
    sustainer: ComponentId,
    surface: Option<String>,
}

impl RocketDesignHandler {
    fn new(ctx: &mut ImportContext<'_>) -> Result<Self, ImportError> {
        if ctx.design_seen {
            return Err(ImportError::InvalidDocument(format!(
                "more than one {} element",
                ROCKET_DESIGN
            )));
        }
        let root = ctx.rocket.root();
        let sustainer = ctx
            .rocket
            .add_child(root, Component::stage(SUSTAINER_NAME))?;
        ctx.design_seen = true;
        Ok(Self {
            sustainer,
            surface: None,
        })
    }

    fn open_element(
        &mut self,
        element: &str,
        ctx: &mut ImportContext<'_>,
    ) -> Result<Handler, ImportError> {
        let parent = self.sustainer;
        Ok(match element {
            NOSE_CONE => Handler::NoseCone(NoseConeHandler::new(ctx, parent)?),
            BODY_TUBE => Handler::BodyTube(BodyTubeHandler::new(ctx, parent)?),
            TRANSITION => Handler::Transition(TransitionHandler::new(ctx, parent)?),
            BOOSTER => Handler::Booster(BoosterHandler::new(ctx)?),
            _ => Handler::PlainText,
        })
    }

    fn close_element(&mut self, element: &str, content: &str) {
        if element == SURFACE {
            self.surface = Some(content.to_string());
        }
    }

    fn end_handler(&mut self, ctx: &mut ImportContext<'_>) {
        if let Some(surface) = &self.surface {
            apply_surface_finish(&mut ctx.rocket, surface, &mut ctx.warnings);
        }
    }
}

/// Import a RASAero document into a fresh rocket.
pub fn load<R: BufRead>(source: R, motors: &MotorIndex) -> Result<ImportOutcome, ImportError> {
    let mut ctx = ImportContext::new(motors);
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
        "RASAero import complete"
    );
    Ok(ImportOutcome {
        rocket: ctx.rocket,
        warnings: ctx.warnings.seal(),
    })
}
