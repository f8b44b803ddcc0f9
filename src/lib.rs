//! otp-route-adapter
//!
//! Turns trip-planner responses into a normalized route model and a
//! drawable route line.

pub mod assembler;
pub mod document;
pub mod error;
pub mod haversine;
pub mod leg;
pub mod line;
pub mod maneuver;
pub mod model;
pub mod multimodal;
pub mod otp;
pub mod polyline;
pub mod traits;

pub use assembler::{assemble_batch, assemble_plan, assemble_trip, AssemblyJob, RouteDocument};
pub use error::{PolylineError, RoutingError};
pub use model::{Coordinate, Instruction, LineStyle, Route, SubRoute, Summary, Waypoint, WaypointOptions};
pub use traits::{Router, RoutingOptions};
