//! Layout constants for Morton codes, node descriptors and the bootstrap
//! cooperative group.
//!
//! ```text
//! Morton code (30 bits, 10 levels of 3 bits, level 0 = most significant):
//!
//!   bit:   29 28 27 | 26 25 24 | ... | 2  1  0
//!          x  y  z  | x  y  z  | ... | x  y  z
//!          level 0  | level 1  | ... | level 9
//!
//! Node descriptor (32 bits):
//!
//!   [31 .............. 8][7 ...... 0]
//!    first child index    child mask
//! ```

/// Bits needed to index one child digit.
pub const LEVEL_BITS: u32 = 3;

/// Branching factor of the tree.
pub const ARITY: usize = 1 << LEVEL_BITS;

/// Mask selecting one child digit.
pub const DIGIT_MASK: u32 = (ARITY as u32) - 1;

/// Lane count of the bootstrap cooperative group.
pub const CTA_SIZE: usize = 1024;

/// Number of levels encoded in a Morton code.
pub const MORTON_LEVELS: u32 = 10;

/// Total significant bits of a Morton code.
pub const MORTON_BITS: u32 = MORTON_LEVELS * LEVEL_BITS;

/// Grid cells per axis at the finest level.
pub const GRID_SIZE: u32 = 1 << MORTON_LEVELS;

/// Default leaf size: nodes holding this many points or fewer are not split.
pub const MAX_POINTS_PER_LEAF: usize = 96;

/// Low bits of a descriptor reserved for the child existence mask.
pub const DESCRIPTOR_MASK_BITS: u32 = 8;

/// Largest node index a descriptor can reference as its first child.
pub const MAX_NODE_INDEX: u32 = (1 << (32 - DESCRIPTOR_MASK_BITS)) - 1;

/// Parent link stored for the root node.
pub const ROOT_PARENT: i32 = -1;

/// Low bits of a packed task reserved for the level.
pub const TASK_LEVEL_BITS: u32 = 8;
