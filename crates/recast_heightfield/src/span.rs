//! Spans are the vertical runs of solid voxels that make up a [`Cell`](crate::Cell).

use std::ops::{Deref, DerefMut};

use thiserror::Error;

/// Builds a [`Span`] while checking its extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Deserialize))]
pub struct SpanBuilder {
    /// Height of the floor of the solid run. `[Units: vx]`
    pub min: u16,
    /// Height of the top of the solid run, i.e. the surface an agent stands on. `[Units: vx]`
    pub max: u16,
    /// Area type ID.
    pub area: AreaType,
}

impl SpanBuilder {
    /// Builds the span.
    ///
    /// # Errors
    ///
    /// Returns [`SpanError::EmptyExtent`] if `min` is not strictly below `max`.
    pub fn build(self) -> Result<Span, SpanError> {
        if self.min >= self.max {
            return Err(SpanError::EmptyExtent {
                min: self.min,
                max: self.max,
            });
        }
        Ok(Span {
            min: self.min,
            max: self.max,
            area: self.area,
        })
    }
}

impl TryFrom<SpanBuilder> for Span {
    type Error = SpanError;

    fn try_from(builder: SpanBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// A vertical interval of solid voxels in a single column of a [`Heightfield`](crate::Heightfield).
///
/// Build with [`SpanBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SpanBuilder")
)]
pub struct Span {
    /// Height of the floor.
    min: u16,
    /// Height of the ceiling.
    max: u16,
    /// Area type ID.
    area: AreaType,
}

impl Span {
    /// The lower extent of the span. `[Units: vx]`
    #[inline]
    pub fn min(&self) -> u16 {
        self.min
    }

    #[inline]
    pub(crate) fn set_min(&mut self, min: u16) {
        self.min = min;
    }

    /// The upper extent of the span. This is the walkable surface of the span. `[Units: vx]`
    #[inline]
    pub fn max(&self) -> u16 {
        self.max
    }

    #[inline]
    pub(crate) fn set_max(&mut self, max: u16) {
        self.max = max;
    }

    /// The area type of the span. [`AreaType::NOT_WALKABLE`] if no agent can stand on it.
    #[inline]
    pub fn area(&self) -> AreaType {
        self.area
    }

    /// Reclassifies the span. The extents are left untouched.
    #[inline]
    pub fn set_area(&mut self, area: impl Into<AreaType>) {
        self.area = area.into();
    }

    /// Whether the area type of the span is anything other than [`AreaType::NOT_WALKABLE`].
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.area.is_walkable()
    }
}

/// The area classification of a [`Span`].
///
/// `0` is reserved for [`AreaType::NOT_WALKABLE`]. Every other value is walkable and is carried
/// through the filters as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct AreaType(pub u8);

impl Deref for AreaType {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for AreaType {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<u8> for AreaType {
    fn from(value: u8) -> Self {
        AreaType(value)
    }
}

impl Default for AreaType {
    fn default() -> Self {
        Self::NOT_WALKABLE
    }
}

impl AreaType {
    /// The area type 0. Spans with this area type are not walkable.
    pub const NOT_WALKABLE: Self = Self(0);
    /// Default area type for walkable spans. The highest possible area type.
    pub const WALKABLE: Self = Self(u8::MAX);

    /// Whether this is anything other than [`AreaType::NOT_WALKABLE`].
    #[inline]
    pub fn is_walkable(self) -> bool {
        self != Self::NOT_WALKABLE
    }
}

/// Errors that can occur when building a [`Span`] with [`SpanBuilder::build`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// Happens when the span would contain no voxels.
    #[error("span extent is empty: min={min} must be below max={max}")]
    EmptyExtent {
        /// The requested lower extent
        min: u16,
        /// The requested upper extent
        max: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        SpanBuilder {
            min: 2,
            max: 10,
            area: AreaType(4),
        }
        .build()
        .unwrap()
    }

    #[test]
    fn can_retrieve_span_data_after_building() {
        let span = span();
        assert_eq!(span.min(), 2);
        assert_eq!(span.max(), 10);
        assert_eq!(span.area(), AreaType(4));
        assert!(span.is_walkable());
    }

    #[test]
    fn can_retrieve_span_data_after_setting() {
        let mut span = span();

        span.set_min(1);
        span.set_max(4);
        span.set_area(3);

        assert_eq!(span.min(), 1);
        assert_eq!(span.max(), 4);
        assert_eq!(span.area(), AreaType(3));
    }

    #[test]
    fn setting_area_to_null_makes_span_unwalkable() {
        let mut span = span();
        span.set_area(AreaType::NOT_WALKABLE);
        assert!(!span.is_walkable());
        assert_eq!(span.min(), 2);
        assert_eq!(span.max(), 10);
    }

    #[test]
    fn rejects_empty_extent() {
        let result = SpanBuilder {
            min: 5,
            max: 5,
            area: AreaType::WALKABLE,
        }
        .build();
        assert_eq!(result, Err(SpanError::EmptyExtent { min: 5, max: 5 }));

        let result = Span::try_from(SpanBuilder {
            min: 6,
            max: 5,
            area: AreaType::WALKABLE,
        });
        assert!(result.is_err());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn deserializing_checks_extents() {
        let span: Span = serde_json::from_str(r#"{"min":2,"max":10,"area":4}"#).unwrap();
        assert_eq!(span, self::span());

        let result = serde_json::from_str::<Span>(r#"{"min":9,"max":2,"area":1}"#);
        assert!(result.is_err());
        let result = serde_json::from_str::<Span>(r#"{"min":3,"max":3,"area":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn only_zero_area_is_not_walkable() {
        assert!(!AreaType::NOT_WALKABLE.is_walkable());
        assert!(!AreaType::default().is_walkable());
        assert!(AreaType(1).is_walkable());
        assert!(AreaType::WALKABLE.is_walkable());
        assert_eq!(*AreaType::from(7), 7);
    }
}
