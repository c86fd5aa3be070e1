//! Native rocket component model.
//!
//! # Core Concepts
//!
//! - [`Rocket`]: the vehicle, an arena-backed tree addressed by [`ComponentId`].
//!   Stages are direct children of the root, in axial order.
//! - [`Component`]: one node of the tree. Its [`ComponentKind`] is a closed set of
//!   variants (stage, nose cone, body tube, transition, fin set, ring).
//! - [`Radius`]: a dimension that is explicit, automatic (taken from the axial
//!   neighbour) or unset.
//! - [`Motor`]: a thrust-curve database record, mounted into body tubes via
//!   [`MotorMount`].

mod component;
mod motor;
mod rocket;

pub use component::*;
pub use motor::*;
pub use rocket::*;
