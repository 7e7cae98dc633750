//! Plane-sweep intersection of line segments.
//!
//! This is an implementation of the [Bentley-Ottman] algorithm that
//! reports every distinct intersection point of a collection of line
//! segments, together with the indices of all segments meeting there.
//! Degenerate inputs are handled: many segments through one point,
//! end points on the interior of other segments, collinear overlaps
//! and (by default) vertical segments.
//!
//! # Usage
//!
//! [`find_crossings`] takes an iterator of [`Line`]s and indexes them
//! by position. [`Crossings`] can also be collected directly from an
//! iterator of lines, using the default [`SweepConfig`].
//!
//! ```rust
//! use geo::Line;
//! use line_crossings::{find_crossings, largest_common_set, SweepConfig};
//!
//! let input = vec![
//!     Line::from([(0., 0.), (2., 2.)]),
//!     Line::from([(0., 2.), (2., 0.)]),
//!     Line::from([(1., 0.), (1., 2.)]),
//! ];
//! let crossings = find_crossings(input, &SweepConfig::default());
//! assert_eq!(crossings.rounded_points(3), vec![(1., 1.)]);
//!
//! let common = largest_common_set(&crossings).unwrap();
//! assert_eq!(common.indices.len(), 3);
//! ```
//!
//! The [`io`] module reads the plain text segment and point files used
//! by the `line-crossings` binary and writes its report.
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
//! [`Line`]: geo::Line
mod events;
pub use events::SweepPoint;

mod segment;
pub use segment::Segment;

pub mod geometry;

pub mod splay;
pub use splay::{NodeId, SplayList};

mod active;

mod registry;

pub mod config;
pub use config::{SweepConfig, VerticalPolicy};

pub mod crossings;
pub use crossings::{find_crossings, Crossings, Sweep};

pub mod collinear;
pub use collinear::{collinear_points, largest_common_set, CommonSet};

pub mod error;
pub use error::{Error, Result};

pub mod io;

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
