//! Invariant checks for a built octree.
//!
//! Used by tests and by consumers that receive storage from another stage.
//! Only published rows (`0..nodes_num`) are inspected.

use crate::constants::{DIGIT_MASK, LEVEL_BITS, MORTON_LEVELS, ROOT_PARENT};
use crate::error::ValidationError;
use crate::morton::level_prefix;
use crate::storage::OctreeStorage;

/// Check parent links, child codes, descriptors and range partitioning.
pub fn check_structure(storage: &OctreeStorage) -> Result<(), ValidationError> {
  let nodes_num = storage.nodes_num();
  if nodes_num == 0 || nodes_num > storage.len() {
    return Err(ValidationError::NodeCountMismatch {
      rows: storage.len(),
      nodes_num,
    });
  }

  let codes = storage.codes();
  let descriptors = storage.descriptors();
  let begs = storage.begs();
  let ends = storage.ends();
  let parents = storage.parents();

  if codes[0] != 0 || parents[0] != ROOT_PARENT {
    return Err(ValidationError::BadRoot);
  }

  for node in 0..nodes_num {
    let (beg, end) = (begs[node], ends[node]);
    if beg > end {
      return Err(ValidationError::InvertedRange { node, beg, end });
    }

    if node > 0 {
      let parent = parents[node];
      if parent < 0 || parent as usize >= node {
        return Err(ValidationError::BadParent { node, parent });
      }
      let parent = parent as usize;
      let code = codes[node];
      if code >> LEVEL_BITS != codes[parent] {
        return Err(ValidationError::BadCode { node, code });
      }
      let digit = (code & DIGIT_MASK) as u8;
      if descriptors[parent].child_index(digit) != Some(node as u32) {
        return Err(ValidationError::Orphan { node });
      }
    }

    let descriptor = descriptors[node];
    if descriptor.is_leaf() {
      continue;
    }

    let children = descriptor.children();
    if children.start as usize <= node || children.end as usize > nodes_num {
      return Err(ValidationError::ChildOutOfBounds { node });
    }

    let mut cursor = beg;
    for digit in 0..8u8 {
      let Some(child) = descriptor.child_index(digit) else {
        continue;
      };
      let child = child as usize;
      if parents[child] != node as i32 {
        return Err(ValidationError::ChildParentMismatch { node, child });
      }
      if codes[child] != (codes[node] << LEVEL_BITS) | digit as u32 {
        return Err(ValidationError::BadCode {
          node: child,
          code: codes[child],
        });
      }
      if begs[child] != cursor {
        return Err(ValidationError::BrokenPartition { node });
      }
      cursor = ends[child];
    }
    if cursor != end {
      return Err(ValidationError::BrokenPartition { node });
    }
  }

  Ok(())
}

/// [`check_structure`], plus every point in a node's range must lie in the
/// node's cell.
pub fn check_with_codes(storage: &OctreeStorage, codes: &[u32]) -> Result<(), ValidationError> {
  check_structure(storage)?;

  let nodes_num = storage.nodes_num();
  let mut depths = vec![0u32; nodes_num];
  for node in 1..nodes_num {
    depths[node] = depths[storage.parents()[node] as usize] + 1;
  }

  for node in 0..nodes_num {
    let depth = depths[node];
    let node_code = storage.codes()[node];
    if depth > MORTON_LEVELS {
      return Err(ValidationError::BadCode {
        node,
        code: node_code,
      });
    }
    let range = storage.begs()[node] as usize..storage.ends()[node] as usize;
    if range.end > codes.len() {
      return Err(ValidationError::PointOutsideCell {
        node,
        point: range.end - 1,
      });
    }
    if let Some(offset) = codes[range.clone()]
      .iter()
      .position(|&code| level_prefix(code, depth) != node_code)
    {
      return Err(ValidationError::PointOutsideCell {
        node,
        point: range.start + offset,
      });
    }
  }

  Ok(())
}
