use rocketfile_core::models::Rocket;

use crate::rasaero::vocabulary::surface_finish;
use crate::warnings::WarningSet;

/// Apply one RASAero surface keyword to every component that has an outer surface.
///
/// Returns the number of components updated.
pub fn apply_surface_finish(rocket: &mut Rocket, keyword: &str, warnings: &mut WarningSet) -> usize {
    let finish = surface_finish(keyword, warnings);
    let mut updated = 0;
    for id in rocket.ids() {
        if let Some(component) = rocket.get_mut(id) {
            if component.kind.set_finish(finish) {
                updated += 1;
            }
        }
    }
    tracing::debug!(finish = finish.as_str(), updated, "applied surface finish");
    updated
}
