//! Morton (Z-order) codes over a 1024³ grid.
//!
//! Each level of the octree consumes one 3-bit digit of the code, most
//! significant digit first, so the codes of all points below a node share the
//! node's code as a prefix. Points sorted by code are therefore grouped by
//! node at every level.

use glam::{UVec3, Vec3};

use crate::constants::{DIGIT_MASK, GRID_SIZE, LEVEL_BITS, MORTON_LEVELS};

/// Spread the low 10 bits of `v` so that two zero bits follow each one.
#[inline]
fn expand_bits(v: u32) -> u32 {
  let mut x = v & 0x3FF;
  x = (x | (x << 16)) & 0x0300_00FF;
  x = (x | (x << 8)) & 0x0300_F00F;
  x = (x | (x << 4)) & 0x030C_30C3;
  x = (x | (x << 2)) & 0x0924_9249;
  x
}

/// Inverse of [`expand_bits`].
#[inline]
fn compact_bits(v: u32) -> u32 {
  let mut x = v & 0x0924_9249;
  x = (x | (x >> 2)) & 0x030C_30C3;
  x = (x | (x >> 4)) & 0x0300_F00F;
  x = (x | (x >> 8)) & 0x0300_00FF;
  x = (x | (x >> 16)) & 0x0000_03FF;
  x
}

/// Interleave grid coordinates into a Morton code.
///
/// Coordinates are truncated to 10 bits. Within each digit X is the high bit
/// and Z the low bit.
#[inline]
pub fn encode(cell: UVec3) -> u32 {
  (expand_bits(cell.x) << 2) | (expand_bits(cell.y) << 1) | expand_bits(cell.z)
}

/// Recover grid coordinates from a Morton code.
#[inline]
pub fn decode(code: u32) -> UVec3 {
  UVec3::new(
    compact_bits(code >> 2),
    compact_bits(code >> 1),
    compact_bits(code),
  )
}

/// Quantize a point into the grid spanned by `min..max` and encode it.
///
/// Points outside the box are clamped onto its boundary cells. A degenerate
/// axis (zero extent) maps every point to cell 0 on that axis.
pub fn encode_point(point: Vec3, min: Vec3, max: Vec3) -> u32 {
  let extent = max - min;
  let safe_extent = extent.max(Vec3::splat(f32::MIN_POSITIVE));
  let scaled = ((point - min) / safe_extent * GRID_SIZE as f32)
    .floor()
    .clamp(Vec3::ZERO, Vec3::splat((GRID_SIZE - 1) as f32));
  let scaled = Vec3::select(extent.cmpgt(Vec3::ZERO), scaled, Vec3::ZERO);
  encode(scaled.as_uvec3())
}

/// Child digit selected by `code` at tree depth `level` (0 = below the root).
#[inline]
pub fn extract_level_code(code: u32, level: u32) -> u32 {
  debug_assert!(level < MORTON_LEVELS);
  (code >> ((MORTON_LEVELS - 1 - level) * LEVEL_BITS)) & DIGIT_MASK
}

/// Code of the node at depth `level` that contains the point with `code`.
///
/// This is the value the builder stores as the node's code: the root (level 0)
/// is 0 and each level appends one digit.
#[inline]
pub fn level_prefix(code: u32, level: u32) -> u32 {
  debug_assert!(level <= MORTON_LEVELS);
  code >> ((MORTON_LEVELS - level) * LEVEL_BITS)
}

/// Grid-space cell covered by the node with `node_code` at depth `level`.
///
/// Returns the minimum grid corner and the cell edge length in grid units.
pub fn node_cell(node_code: u32, level: u32) -> (UVec3, u32) {
  debug_assert!(level <= MORTON_LEVELS);
  let shift = (MORTON_LEVELS - level) * LEVEL_BITS;
  (decode(node_code << shift), GRID_SIZE >> level)
}

#[cfg(test)]
#[path = "morton_test.rs"]
mod morton_test;
