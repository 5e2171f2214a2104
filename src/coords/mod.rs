//! Coordinate generation: planar layout and spatial embedding.

mod embed3d;
mod forcefield;
mod layout2d;

pub use embed3d::{embed_3d, EmbedOptions, DEFAULT_EMBED_SEED, DEFAULT_MAX_REFINE_STEPS};
pub use forcefield::{minimize, total_energy, MinimizeOptions, MinimizeResult};
pub use layout2d::{layout_2d, BOND_LENGTH};
