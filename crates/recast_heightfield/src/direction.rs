use glam::IVec2;

/// One of the four cardinal directions on the xz-plane of a [`Heightfield`](crate::Heightfield).
///
/// The discriminants are the standard Recast direction indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// Towards negative x
    West = 0,
    /// Towards positive z
    North = 1,
    /// Towards positive x
    East = 2,
    /// Towards negative z
    South = 3,
}

impl Direction {
    /// All directions, in index order. Neighbor traversal always uses this order.
    pub const ALL: [Self; 4] = [Self::West, Self::North, Self::East, Self::South];

    /// Gets the direction for an index. Only the lowest two bits are used.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        Self::ALL[index as usize & 0x03]
    }

    /// The index of the direction. [Limits: 0 <= value < 4]
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The width offset to apply to the current cell position to move in the direction.
    #[inline]
    pub fn offset_x(self) -> i32 {
        const OFFSET: [i32; 4] = [-1, 0, 1, 0];
        OFFSET[self as usize]
    }

    /// The length offset to apply to the current cell position to move in the direction.
    #[inline]
    pub fn offset_z(self) -> i32 {
        const OFFSET: [i32; 4] = [0, 1, 0, -1];
        OFFSET[self as usize]
    }

    /// The `(x, z)` grid offset of the direction.
    #[inline]
    pub fn offset(self) -> IVec2 {
        IVec2::new(self.offset_x(), self.offset_z())
    }

    /// The direction pointing the other way.
    #[inline]
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The next direction when turning clockwise (seen from above).
    #[inline]
    pub fn rotate_clockwise(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The next direction when turning counter-clockwise (seen from above).
    #[inline]
    pub fn rotate_counter_clockwise(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}
