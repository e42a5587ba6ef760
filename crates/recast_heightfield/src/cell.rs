use thiserror::Error;

use crate::span::Span;

/// A single column of a [`Heightfield`](crate::Heightfield).
///
/// The spans are ordered from bottom to top and never overlap, i.e. the `max` of a span is at most
/// the `min` of the span above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCell")
)]
pub struct Cell {
    /// The spans of the column, from bottom to top
    spans: Vec<Span>,
}

impl Cell {
    /// Creates a column from spans that are already ordered from bottom to top.
    ///
    /// Unlike [`Cell::add_span`], nothing is merged. Touching spans are kept apart.
    ///
    /// # Errors
    ///
    /// Returns [`CellError::UnorderedSpans`] if a span does not lie entirely above the one before it.
    pub fn from_spans(spans: Vec<Span>) -> Result<Self, CellError> {
        if let Some(index) = spans
            .windows(2)
            .position(|pair| pair[0].max() > pair[1].min())
        {
            return Err(CellError::UnorderedSpans { index: index + 1 });
        }
        Ok(Self { spans })
    }

    /// The spans of the column, from bottom to top.
    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Mutable access to the spans. A slice, so callers can reclassify but not reorder or resize.
    #[inline]
    pub(crate) fn spans_mut(&mut self) -> &mut [Span] {
        &mut self.spans
    }

    /// The number of spans in the column, walkable or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the column contains no spans at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The number of spans whose area is not [`AreaType::NOT_WALKABLE`](crate::AreaType::NOT_WALKABLE).
    pub fn walkable_span_count(&self) -> usize {
        self.spans.iter().filter(|span| span.is_walkable()).count()
    }

    /// Returns the span whose `[min, max)` range contains the given height, if any.
    pub fn span_containing(&self, height: i32) -> Option<&Span> {
        let index = self
            .spans
            .partition_point(|span| i32::from(span.max()) <= height);
        self.spans
            .get(index)
            .filter(|span| i32::from(span.min()) <= height)
    }

    /// Iterates over the spans from bottom to top.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.spans.iter()
    }

    /// Inserts a span into the column, merging it with every span it overlaps or touches.
    ///
    /// The merged span covers the union of the extents. If the top of the merged span is within
    /// `flag_merge_threshold` of the top of a span it absorbed, the higher of the two area IDs wins,
    /// since higher area IDs indicate higher resolution priority.
    pub fn add_span(&mut self, span: Span, flag_merge_threshold: u16) {
        let mut new_span = span;
        let mut index = 0;
        while let Some(current_span) = self.spans.get(index).copied() {
            if current_span.min() > new_span.max() {
                // Current span is completely above the new span, insert here.
                break;
            }
            if current_span.max() < new_span.min() {
                // Current span is completely below the new span. Keep going.
                index += 1;
                continue;
            }
            // The new span overlaps with an existing span. Merge them.
            if current_span.min() < new_span.min() {
                new_span.set_min(current_span.min());
            }
            if current_span.max() > new_span.max() {
                new_span.set_max(current_span.max());
            }

            // Merge flags.
            if (i32::from(new_span.max()) - i32::from(current_span.max())).unsigned_abs()
                <= u32::from(flag_merge_threshold)
            {
                new_span.set_area(new_span.area().max(current_span.area()));
            }

            // The current span is now part of the new one.
            // Keep going because there might be other overlapping spans that also need to be merged.
            self.spans.remove(index);
        }
        self.spans.insert(index, new_span);
    }
}

impl<'a> IntoIterator for &'a Cell {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Errors that can occur when creating a [`Cell`] from existing spans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    /// Happens when a span overlaps or lies below the span before it.
    #[error("span {index} is not above the span before it")]
    UnorderedSpans {
        /// The index of the offending span
        index: usize,
    },
}

#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct RawCell {
    spans: Vec<Span>,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawCell> for Cell {
    type Error = CellError;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        Self::from_spans(raw.spans)
    }
}
