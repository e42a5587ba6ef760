use crate::Heightfield;
#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// The agent parameters used by the [`Heightfield`] filters.
///
/// Both values are in voxels. Use [`FilterConfig::from_agent`] to derive them from an agent described in world units.
///
/// > Note:
/// >
/// > If your game world uses meters as units, a reasonable starting point for a human-sized agent
/// > is a height of 2.0 and a maximum climb of 0.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct FilterConfig {
    /// Minimum floor to 'ceiling' height that will still allow the floor area to
    /// be considered walkable. `[Limit: >= 3] [Units: vx]`
    ///
    /// This value defines the worldspace height h of the agent in voxels.
    /// The value of walkable_height should be calculated as `(h / cell_height).ceil()`.
    /// Note this is based on cell_height and not cell_size since it's a height value.
    ///
    /// Permits detection of overhangs in the source geometry that make the geometry below un-walkable.
    pub walkable_height: u16,

    /// Maximum ledge height that is considered to still be traversable. `[Limit: >=0] [Units: vx]`
    ///
    /// The walkable_climb value defines the maximum height of ledges and steps that the agent can walk up.
    /// Given a designer-defined `max_climb` distance in world units,
    /// the value of walkable_climb should be calculated as `(max_climb / cell_height).ceil()`.
    ///
    /// Allows the mesh to flow over low lying obstructions such as curbs and up/down stairways.
    pub walkable_climb: u16,
}

impl FilterConfig {
    /// Converts an agent described in world units into voxel units for a heightfield with the given `cell_height`.
    ///
    /// Values are rounded up to whole voxels and saturate at `u16::MAX`.
    pub fn from_agent(agent_height: f32, agent_max_climb: f32, cell_height: f32) -> Self {
        Self {
            walkable_height: to_voxels(agent_height, cell_height),
            walkable_climb: to_voxels(agent_max_climb, cell_height),
        }
    }
}

fn to_voxels(world_units: f32, cell_height: f32) -> u16 {
    // Float to int `as` casts saturate, and NaN becomes 0.
    (world_units / cell_height).ceil() as u16
}

impl Heightfield {
    /// Runs all filters in the usual order:
    /// [`Heightfield::filter_low_hanging_walkable_obstacles`], then
    /// [`Heightfield::filter_walkable_low_height_spans`], then [`Heightfield::filter_ledge_spans`].
    pub fn filter_walkable(&mut self, config: &FilterConfig) {
        self.filter_low_hanging_walkable_obstacles(config.walkable_climb);
        self.filter_walkable_low_height_spans(config.walkable_height);
        self.filter_ledge_spans(config.walkable_height, config.walkable_climb);
    }
}
