//! Octree storage: one row per node across parallel arrays.
//!
//! Rows are appended level by level and addressed by node index. The only
//! write to an existing row is setting its descriptor once its children are
//! known. Readers downstream of a construction pass take `&OctreeStorage`.

use std::ops::Range;

use crate::constants::{DESCRIPTOR_MASK_BITS, MAX_NODE_INDEX, ROOT_PARENT};

/// Compact child descriptor: `(first_child << 8) | mask`.
///
/// Bit `d` of the mask is set iff the child with digit `d` exists. Children
/// are stored contiguously from `first_child` in ascending digit order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Descriptor(u32);

impl Descriptor {
  /// Descriptor of a node without children.
  pub const LEAF: Self = Self(0);

  #[inline]
  pub fn new(first_child: u32, mask: u8) -> Self {
    debug_assert!(first_child <= MAX_NODE_INDEX);
    Self((first_child << DESCRIPTOR_MASK_BITS) | mask as u32)
  }

  #[inline]
  pub fn from_raw(raw: u32) -> Self {
    Self(raw)
  }

  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }

  #[inline]
  pub fn first_child(self) -> u32 {
    self.0 >> DESCRIPTOR_MASK_BITS
  }

  #[inline]
  pub fn mask(self) -> u8 {
    self.0 as u8
  }

  #[inline]
  pub fn child_count(self) -> u32 {
    self.mask().count_ones()
  }

  #[inline]
  pub fn is_leaf(self) -> bool {
    self.mask() == 0
  }

  #[inline]
  pub fn has_child(self, digit: u8) -> bool {
    digit < 8 && self.mask() & (1 << digit) != 0
  }

  /// Node index of the child with `digit`, if present.
  pub fn child_index(self, digit: u8) -> Option<u32> {
    if !self.has_child(digit) {
      return None;
    }
    let below = self.mask() & ((1u8 << digit) - 1);
    Some(self.first_child() + below.count_ones())
  }

  /// Node indices of all children.
  pub fn children(self) -> Range<u32> {
    self.first_child()..self.first_child() + self.child_count()
  }
}

/// One node row, read out of [`OctreeStorage`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeView {
  pub code: u32,
  pub descriptor: Descriptor,
  pub beg: u32,
  pub end: u32,
  pub parent: i32,
}

impl NodeView {
  #[inline]
  pub fn point_count(&self) -> u32 {
    self.end - self.beg
  }

  #[inline]
  pub fn is_root(&self) -> bool {
    self.parent == ROOT_PARENT
  }
}

/// Structure-of-arrays octree storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OctreeStorage {
  codes: Vec<u32>,
  descriptors: Vec<Descriptor>,
  begs: Vec<u32>,
  ends: Vec<u32>,
  parents: Vec<i32>,
  /// Externally visible node count, published at the end of a pass.
  nodes_num: usize,
}

impl OctreeStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve room for `nodes` rows.
  pub fn with_capacity(nodes: usize) -> Self {
    Self {
      codes: Vec::with_capacity(nodes),
      descriptors: Vec::with_capacity(nodes),
      begs: Vec::with_capacity(nodes),
      ends: Vec::with_capacity(nodes),
      parents: Vec::with_capacity(nodes),
      nodes_num: 0,
    }
  }

  /// Published node count.
  #[inline]
  pub fn nodes_num(&self) -> usize {
    self.nodes_num
  }

  /// Rows currently written, which may run ahead of `nodes_num` mid-pass.
  #[inline]
  pub fn len(&self) -> usize {
    self.codes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.codes.is_empty()
  }

  pub fn codes(&self) -> &[u32] {
    &self.codes
  }

  pub fn descriptors(&self) -> &[Descriptor] {
    &self.descriptors
  }

  pub fn begs(&self) -> &[u32] {
    &self.begs
  }

  pub fn ends(&self) -> &[u32] {
    &self.ends
  }

  pub fn parents(&self) -> &[i32] {
    &self.parents
  }

  /// Row `index`, if written.
  pub fn node(&self, index: usize) -> Option<NodeView> {
    if index >= self.len() {
      return None;
    }
    Some(NodeView {
      code: self.codes[index],
      descriptor: self.descriptors[index],
      beg: self.begs[index],
      end: self.ends[index],
      parent: self.parents[index],
    })
  }

  /// Iterate published rows.
  pub fn iter(&self) -> impl Iterator<Item = NodeView> + '_ {
    (0..self.nodes_num.min(self.len())).filter_map(move |i| self.node(i))
  }

  /// Drop all rows and write the root covering `0..points_num`.
  pub(crate) fn reset_root(&mut self, points_num: u32) {
    self.codes.clear();
    self.descriptors.clear();
    self.begs.clear();
    self.ends.clear();
    self.parents.clear();
    self.nodes_num = 0;

    self.codes.push(0);
    self.descriptors.push(Descriptor::LEAF);
    self.begs.push(0);
    self.ends.push(points_num);
    self.parents.push(ROOT_PARENT);
  }

  /// Extend every array to `rows` entries. New descriptors are leaves.
  pub(crate) fn grow(&mut self, rows: usize) {
    debug_assert!(rows >= self.len());
    self.codes.resize(rows, 0);
    self.descriptors.resize(rows, Descriptor::LEAF);
    self.begs.resize(rows, 0);
    self.ends.resize(rows, 0);
    self.parents.resize(rows, ROOT_PARENT);
  }

  /// Split borrows for one level: descriptors of the `tasks` rows and the
  /// writable rows from `new_beg` onwards.
  ///
  pub(crate) fn level_rows_mut(
    &mut self,
    tasks: Range<usize>,
    new_beg: usize,
  ) -> (&mut [Descriptor], NodeRowsMut<'_>) {
    debug_assert!(tasks.end <= new_beg);
    let rows = NodeRowsMut {
      codes: &mut self.codes[new_beg..],
      begs: &mut self.begs[new_beg..],
      ends: &mut self.ends[new_beg..],
      parents: &mut self.parents[new_beg..],
    };
    (&mut self.descriptors[tasks], rows)
  }

  pub(crate) fn publish_nodes_num(&mut self, nodes_num: usize) {
    debug_assert!(nodes_num <= self.len());
    self.nodes_num = nodes_num;
  }
}

/// Mutable view of a contiguous block of rows (descriptor excluded).
pub(crate) struct NodeRowsMut<'a> {
  codes: &'a mut [u32],
  begs: &'a mut [u32],
  ends: &'a mut [u32],
  parents: &'a mut [i32],
}

impl<'a> NodeRowsMut<'a> {
  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.codes.len()
  }

  pub(crate) fn split_at(self, mid: usize) -> (Self, Self) {
    let (codes_a, codes_b) = self.codes.split_at_mut(mid);
    let (begs_a, begs_b) = self.begs.split_at_mut(mid);
    let (ends_a, ends_b) = self.ends.split_at_mut(mid);
    let (parents_a, parents_b) = self.parents.split_at_mut(mid);
    (
      Self {
        codes: codes_a,
        begs: begs_a,
        ends: ends_a,
        parents: parents_a,
      },
      Self {
        codes: codes_b,
        begs: begs_b,
        ends: ends_b,
        parents: parents_b,
      },
    )
  }

  #[inline]
  pub(crate) fn write(&mut self, row: usize, code: u32, beg: u32, end: u32, parent: i32) {
    self.codes[row] = code;
    self.begs[row] = beg;
    self.ends[row] = end;
    self.parents[row] = parent;
  }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;
