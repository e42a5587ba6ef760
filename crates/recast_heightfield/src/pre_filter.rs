use crate::{
    direction::Direction,
    heightfield::Heightfield,
    span::{AreaType, Span},
};

/// Stands in for the open space above the topmost span of a column.
const MAX_HEIGHT: i32 = i32::MAX;

impl Heightfield {
    /// Marks non-walkable spans as walkable if their maximum is within `walkable_climb` of the span below them.
    ///
    /// This removes small obstacles and rasterization artifacts that the agent would be able to walk over
    /// such as curbs. Reclassified spans inherit the area type of the span below them, and the
    /// reclassification carries on upwards through a column.
    ///
    /// # Arguments
    ///
    /// - `walkable_climb` - Maximum ledge height that is considered to still be traversable. `[Limit: >=0] [Units: vx]`
    pub fn filter_low_hanging_walkable_obstacles(&mut self, walkable_climb: u16) {
        let walkable_climb = i32::from(walkable_climb);
        let mut reclassified = 0_usize;
        for cell in self.cells_mut() {
            let mut previous_span: Option<Span> = None;
            for span in cell.spans_mut() {
                // If current span is not walkable, but there is walkable span just below it and the height difference
                // is small enough for the agent to walk over, mark the current span as walkable too.
                if let Some(previous_span) = previous_span {
                    if !span.is_walkable()
                        && previous_span.is_walkable()
                        && (i32::from(span.max()) - i32::from(previous_span.max())).abs()
                            < walkable_climb
                    {
                        span.set_area(previous_span.area());
                        reclassified += 1;
                    }
                }
                previous_span.replace(*span);
            }
        }
        tracing::debug!(reclassified, "filtered low hanging walkable obstacles");
    }

    /// Marks spans as not walkable if the clearance above them is at most `walkable_height`.
    ///
    /// Only the gap to the next span in the same column is considered, so the topmost span of a column
    /// is never touched.
    ///
    /// # Arguments
    ///
    /// - `walkable_height` - Minimum floor to 'ceiling' height that will still allow the floor area to be considered walkable. `[Limit: >= 3] [Units: vx]`
    pub fn filter_walkable_low_height_spans(&mut self, walkable_height: u16) {
        let walkable_height = i32::from(walkable_height);
        let mut reclassified = 0_usize;
        for cell in self.cells_mut() {
            let spans = cell.spans_mut();
            for j in 1..spans.len() {
                let floor = i32::from(spans[j - 1].max());
                let ceiling = i32::from(spans[j].min());
                if ceiling - floor <= walkable_height && spans[j - 1].is_walkable() {
                    spans[j - 1].set_area(AreaType::NOT_WALKABLE);
                    reclassified += 1;
                }
            }
        }
        tracing::debug!(reclassified, "filtered walkable low height spans");
    }

    /// Marks spans that are ledges as not walkable.
    ///
    /// A ledge is a span with one or more neighbors whose maximum is further away than `walkable_climb`
    /// from the current span's maximum, or whose reachable neighbors lie too far apart in height.
    /// Columns outside the grid count as a drop, so every span on the border of the grid is a ledge.
    ///
    /// Columns are visited with `z` as the outer loop and `x` as the inner loop. Only the extents of
    /// neighboring spans are read, so the result does not depend on that order.
    ///
    /// # Arguments
    ///
    /// - `walkable_height` - Minimum floor to 'ceiling' height that will still allow the floor area to be considered walkable. `[Limit: >= 3] [Units: vx]`
    /// - `walkable_climb` - Maximum ledge height that is considered to still be traversable. `[Limit: >=0] [Units: vx]`
    pub fn filter_ledge_spans(&mut self, walkable_height: u16, walkable_climb: u16) {
        let walkable_height = i32::from(walkable_height);
        let walkable_climb = i32::from(walkable_climb);
        let mut reclassified = 0_usize;
        for z in 0..self.length() {
            for x in 0..self.width() {
                let column_index = self.column_index(x, z);
                for i in 0..self.cells()[column_index].len() {
                    let spans = self.cells()[column_index].spans();
                    let span = spans[i];
                    // Skip non-walkable spans
                    if !span.is_walkable() {
                        continue;
                    }
                    let bottom = i32::from(span.max());
                    let top = spans
                        .get(i + 1)
                        .map_or(MAX_HEIGHT, |next| i32::from(next.min()));

                    if self.is_ledge(x, z, bottom, top, walkable_height, walkable_climb) {
                        self.cells_mut()[column_index].spans_mut()[i]
                            .set_area(AreaType::NOT_WALKABLE);
                        reclassified += 1;
                    }
                }
            }
        }
        tracing::debug!(reclassified, "filtered ledge spans");
    }

    fn is_ledge(
        &self,
        x: u16,
        z: u16,
        bottom: i32,
        top: i32,
        walkable_height: i32,
        walkable_climb: i32,
    ) -> bool {
        // The lowest drop towards any neighbor the agent fits into
        let mut min_height = MAX_HEIGHT;
        // Min and max height of accessible neighbours
        let mut accessible_min = bottom;
        let mut accessible_max = bottom;

        for direction in Direction::ALL {
            let neighbor_x = i32::from(x) + direction.offset_x();
            let neighbor_z = i32::from(z) + direction.offset_z();
            let Ok(neighbor) = self.cell(neighbor_x, neighbor_z) else {
                // Outside the grid there is nothing to stand on.
                min_height = min_height.min(-walkable_climb - bottom);
                continue;
            };
            let neighbor_spans = neighbor.spans();

            // From minus infinity to the first span.
            let neighbor_bottom = -walkable_climb;
            let neighbor_top = neighbor_spans
                .first()
                .map_or(MAX_HEIGHT, |first| i32::from(first.min()));
            // Skip neighbour if the gap between the spans is too small.
            if top.min(neighbor_top) - bottom.max(neighbor_bottom) > walkable_height {
                min_height = min_height.min(neighbor_bottom - bottom);
            }

            // The rest of the spans.
            for (k, neighbor_span) in neighbor_spans.iter().enumerate() {
                let neighbor_bottom = i32::from(neighbor_span.max());
                let neighbor_top = neighbor_spans
                    .get(k + 1)
                    .map_or(MAX_HEIGHT, |next| i32::from(next.min()));
                if top.min(neighbor_top) - bottom.max(neighbor_bottom) <= walkable_height {
                    continue;
                }
                let drop = neighbor_bottom - bottom;
                min_height = min_height.min(drop);

                // Find min/max accessible neighbour height.
                if drop.abs() <= walkable_climb {
                    accessible_min = accessible_min.min(neighbor_bottom);
                    accessible_max = accessible_max.max(neighbor_bottom);
                }
            }
        }

        // The current span is close to a ledge if the drop to any neighbour span is less than the walkable climb,
        // or if the difference between all neighbours is too large and we are on a steep slope.
        min_height < -walkable_climb || accessible_max - accessible_min > walkable_climb
    }
}
