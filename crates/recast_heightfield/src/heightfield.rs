//! The heightfield module contains the types and functions for working with [`Heightfield`]s.
//!
//! A heightfield is a 3D grid of [`Span`]s, where each column contains 0, 1, or more spans.

use std::fmt;

use glam::Vec3;
use thiserror::Error;

use crate::{cell::Cell, math::Aabb3d, span::Span};

/// A dense grid of [`Cell`]s covering a world-space box.
///
/// Build with [`HeightfieldBuilder`]. Columns are stored in `width * length` order, i.e. the
/// column at `(x, z)` lives at index `z * width + x`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialize",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawHeightfield")
)]
pub struct Heightfield {
    /// The width of the heightfield along the x-axis in cell units
    width: u16,
    /// The height of the heightfield along the y-axis in cell units
    height: u16,
    /// The length of the heightfield along the z-axis in cell units
    length: u16,
    /// The AABB of the heightfield, snapped to whole voxels
    aabb: Aabb3d,
    /// The size of each cell on the xz-plane
    cell_size: f32,
    /// The size of each cell along the y-axis
    cell_height: f32,
    /// The columns of the heightfield
    cells: Vec<Cell>,
}

impl Heightfield {
    /// The AABB of the heightfield. The max corner is snapped so that the box consists of whole voxels.
    #[inline]
    pub fn aabb(&self) -> Aabb3d {
        self.aabb
    }

    /// The number of voxels along the x-axis.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// The number of voxels along the y-axis.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The number of voxels along the z-axis.
    #[inline]
    pub fn length(&self) -> u16 {
        self.length
    }

    /// The size of each cell on the xz-plane. `[Units: wu]`
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The size of each cell along the y-axis. `[Units: wu]`
    #[inline]
    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// All columns, in `width * length` order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// The number of walkable spans over all columns.
    ///
    /// Not cached, every call walks the whole grid.
    pub fn span_count(&self) -> usize {
        self.cells.iter().map(Cell::walkable_span_count).sum()
    }

    /// Whether the given column coordinates lie inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= 0 && x < i32::from(self.width) && z >= 0 && z < i32::from(self.length)
    }

    /// The index of the column at the given coordinates.
    /// The coordinates are not checked, use [`Heightfield::contains`] for that.
    #[inline]
    pub fn column_index(&self, x: u16, z: u16) -> usize {
        x as usize + z as usize * self.width as usize
    }

    /// Returns the column at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`HeightfieldError::ColumnOutOfBounds`] if the coordinates lie outside the grid.
    pub fn cell(&self, x: i32, z: i32) -> Result<&Cell, HeightfieldError> {
        let index = self.checked_column_index(x, z)?;
        Ok(&self.cells[index])
    }

    /// Returns the column at the given coordinates mutably.
    ///
    /// # Errors
    ///
    /// Returns [`HeightfieldError::ColumnOutOfBounds`] if the coordinates lie outside the grid.
    pub fn cell_mut(&mut self, x: i32, z: i32) -> Result<&mut Cell, HeightfieldError> {
        let index = self.checked_column_index(x, z)?;
        Ok(&mut self.cells[index])
    }

    /// Returns the column at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`HeightfieldError::IndexOutOfBounds`] if `index >= width * length`.
    pub fn cell_at(&self, index: usize) -> Result<&Cell, HeightfieldError> {
        let len = self.cells.len();
        self.cells
            .get(index)
            .ok_or(HeightfieldError::IndexOutOfBounds { index, len })
    }

    /// Returns the column at the given index mutably.
    ///
    /// # Errors
    ///
    /// Returns [`HeightfieldError::IndexOutOfBounds`] if `index >= width * length`.
    pub fn cell_at_mut(&mut self, index: usize) -> Result<&mut Cell, HeightfieldError> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(HeightfieldError::IndexOutOfBounds { index, len })
    }

    /// Inserts a span into the column at `(x, z)`, merging it with the spans it overlaps.
    /// See [`Cell::add_span`] for the merge rules.
    ///
    /// # Errors
    ///
    /// Returns [`HeightfieldError::ColumnOutOfBounds`] if the coordinates lie outside the grid.
    pub fn add_span(
        &mut self,
        x: i32,
        z: i32,
        span: Span,
        flag_merge_threshold: u16,
    ) -> Result<(), HeightfieldError> {
        self.cell_mut(x, z)?.add_span(span, flag_merge_threshold);
        Ok(())
    }

    /// The world-space position of the minimum corner of the voxel at `(x, y, z)`.
    pub fn voxel_to_world(&self, x: i32, y: i32, z: i32) -> Vec3 {
        self.aabb.min
            + Vec3::new(
                x as f32 * self.cell_size,
                y as f32 * self.cell_height,
                z as f32 * self.cell_size,
            )
    }

    /// The column containing the given world-space position on the xz-plane.
    /// Returns `None` if the position lies outside the grid.
    pub fn world_to_column(&self, position: Vec3) -> Option<(u16, u16)> {
        let relative = position - self.aabb.min;
        let x = (relative.x / self.cell_size).floor();
        let z = (relative.z / self.cell_size).floor();
        if !(x >= 0.0 && x < f32::from(self.width) && z >= 0.0 && z < f32::from(self.length)) {
            return None;
        }
        Some((x as u16, z as u16))
    }

    fn checked_column_index(&self, x: i32, z: i32) -> Result<usize, HeightfieldError> {
        if !self.contains(x, z) {
            return Err(HeightfieldError::ColumnOutOfBounds {
                x,
                z,
                width: self.width,
                length: self.length,
            });
        }
        Ok(self.column_index(x as u16, z as u16))
    }
}

#[cfg(feature = "serialize")]
#[derive(serde::Deserialize)]
struct RawHeightfield {
    width: u16,
    height: u16,
    length: u16,
    aabb: Aabb3d,
    cell_size: f32,
    cell_height: f32,
    cells: Vec<Cell>,
}

#[cfg(feature = "serialize")]
impl TryFrom<RawHeightfield> for Heightfield {
    type Error = HeightfieldError;

    fn try_from(raw: RawHeightfield) -> Result<Self, Self::Error> {
        let expected = raw.width as usize * raw.length as usize;
        if raw.cells.len() != expected {
            return Err(HeightfieldError::CellCountMismatch {
                expected,
                actual: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            height: raw.height,
            length: raw.length,
            aabb: raw.aabb,
            cell_size: raw.cell_size,
            cell_height: raw.cell_height,
            cells: raw.cells,
        })
    }
}

/// A builder for [`Heightfield`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightfieldBuilder {
    /// The AABB of the heightfield
    pub aabb: Aabb3d,
    /// The size of each cell on the xz-plane
    pub cell_size: f32,
    /// The size of each cell along the y-axis
    pub cell_height: f32,
}

impl HeightfieldBuilder {
    /// Builds the heightfield.
    ///
    /// Each axis of the AABB is rounded up to whole voxels and the max corner is moved accordingly,
    /// so [`Heightfield::aabb`] may be larger than the AABB passed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the AABB is inverted on any axis, if either cell size is not positive,
    /// or if a dimension does not fit into a `u16`.
    pub fn build(self) -> Result<Heightfield, HeightfieldBuilderError> {
        let Aabb3d { min, max } = self.aabb;
        for (axis, min, max) in [
            (Axis::X, min.x, max.x),
            (Axis::Y, min.y, max.y),
            (Axis::Z, min.z, max.z),
        ] {
            if !(min <= max) {
                return Err(HeightfieldBuilderError::InvertedBounds { axis, min, max });
            }
        }
        if !(self.cell_size > 0.0) {
            return Err(HeightfieldBuilderError::InvalidCellSize(self.cell_size));
        }
        if !(self.cell_height > 0.0) {
            return Err(HeightfieldBuilderError::InvalidCellHeight(self.cell_height));
        }

        let size = self.aabb.size();
        let width = voxel_count(Axis::X, size.x, self.cell_size)?;
        let height = voxel_count(Axis::Y, size.y, self.cell_height)?;
        let length = voxel_count(Axis::Z, size.z, self.cell_size)?;

        // Downstream stages assume the box tiles into whole voxels.
        let snapped_max = min
            + Vec3::new(
                f32::from(width) * self.cell_size,
                f32::from(height) * self.cell_height,
                f32::from(length) * self.cell_size,
            );
        tracing::trace!(width, height, length, ?snapped_max, "built heightfield");

        Ok(Heightfield {
            width,
            height,
            length,
            aabb: Aabb3d::new(min, snapped_max),
            cell_size: self.cell_size,
            cell_height: self.cell_height,
            cells: vec![Cell::default(); width as usize * length as usize],
        })
    }
}

fn voxel_count(axis: Axis, extent: f32, voxel_size: f32) -> Result<u16, HeightfieldBuilderError> {
    let voxels = (extent / voxel_size).ceil();
    if voxels > f32::from(u16::MAX) {
        return Err(HeightfieldBuilderError::DimensionTooLarge { axis, voxels });
    }
    Ok(voxels as u16)
}

/// A world axis, used to report which part of a [`HeightfieldBuilder`] was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The x-axis
    X,
    /// The y-axis
    Y,
    /// The z-axis
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when building a [`Heightfield`] with [`HeightfieldBuilder::build`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightfieldBuilderError {
    /// Happens when the min corner of the AABB lies above the max corner.
    #[error("AABB is inverted along the {axis}-axis: min={min} > max={max}")]
    InvertedBounds {
        /// The offending axis
        axis: Axis,
        /// The min coordinate along that axis
        min: f32,
        /// The max coordinate along that axis
        max: f32,
    },
    /// Happens when the xz cell size is not positive.
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    /// Happens when the y cell size is not positive.
    #[error("cell height must be positive, got {0}")]
    InvalidCellHeight(f32),
    /// Happens when a dimension needs more voxels than can be addressed.
    #[error("too many voxels along the {axis}-axis: got {voxels} but max is {max}", max = u16::MAX)]
    DimensionTooLarge {
        /// The offending axis
        axis: Axis,
        /// The number of voxels the AABB would need
        voxels: f32,
    },
}

/// Errors that can occur when accessing the columns of a [`Heightfield`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeightfieldError {
    /// Happens when column coordinates lie outside the grid.
    #[error("column out of bounds: x={x}, z={z}, but the grid is {width}x{length}")]
    ColumnOutOfBounds {
        /// The requested x-coordinate
        x: i32,
        /// The requested z-coordinate
        z: i32,
        /// The width of the grid
        width: u16,
        /// The length of the grid
        length: u16,
    },
    /// Happens when a flat column index lies outside the grid.
    #[error("column index out of bounds: index={index}, but there are {len} columns")]
    IndexOutOfBounds {
        /// The requested index
        index: usize,
        /// The number of columns
        len: usize,
    },
    /// Happens when a deserialized heightfield does not have one column per grid position.
    #[error("expected {expected} columns, got {actual}")]
    CellCountMismatch {
        /// `width * length`
        expected: usize,
        /// The number of columns found
        actual: usize,
    },
}
