#![doc = include_str!("../../../readme.md")]

mod cell;
mod config;
mod direction;
mod heightfield;
pub(crate) mod math;
mod pre_filter;
mod span;

pub use cell::{Cell, CellError};
pub use config::FilterConfig;
pub use direction::Direction;
pub use heightfield::{
    Axis, Heightfield, HeightfieldBuilder, HeightfieldBuilderError, HeightfieldError,
};
pub use math::Aabb3d;
pub use span::{AreaType, Span, SpanBuilder, SpanError};
