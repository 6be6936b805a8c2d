//! Terminal cells and the index-keyed cell map.

use crate::color::Color24;
use crate::style::StyleMask;

/// One terminal character position's full visual state.
///
/// Compared and hashed by every field, including the index: the same glyph
/// at a different position is a different cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row-major position on the grid.
    pub index: usize,
    /// Character printed in the cell.
    pub glyph: char,
    /// Foreground color.
    pub fg: Color24,
    /// Background color.
    pub bg: Color24,
    /// Style attributes.
    pub style: StyleMask,
}

impl Cell {
    /// Create a cell.
    #[must_use]
    pub const fn new(index: usize, glyph: char, fg: Color24, bg: Color24, style: StyleMask) -> Self {
        Self {
            index,
            glyph,
            fg,
            bg,
            style,
        }
    }

    /// A space in default colors with no style: what a cleared cell looks like.
    #[must_use]
    pub const fn blank(index: usize) -> Self {
        Self::new(
            index,
            ' ',
            Color24::DEFAULT_FG,
            Color24::DEFAULT_BG,
            StyleMask::NONE,
        )
    }

    /// Whether this cell is indistinguishable from an untouched screen
    /// position: a space over the default background without attributes.
    ///
    /// The foreground is irrelevant because nothing visible is printed.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.glyph == ' '
            && self.bg.r == Color24::DEFAULT_BG.r
            && self.bg.g == Color24::DEFAULT_BG.g
            && self.bg.b == Color24::DEFAULT_BG.b
            && self.style.is_empty()
    }
}

/// Map from grid index to cell, iterated in first-insertion order.
///
/// Keys are unique and the last write for an index wins. Storage is a dense
/// slot table sized to the grid plus an insertion-ordered cell list, so
/// lookups are O(1) and clearing touches only the cells that were inserted.
/// Capacity is kept across [`CellMap::clear`]; steady-state frames do not
/// allocate.
#[derive(Debug, Clone, Default)]
pub struct CellMap {
    /// Insertion-ordered cells. Entries whose slot no longer points at them
    /// are stale (removed) and skipped on iteration; they are compacted away
    /// before they outnumber the live entries.
    cells: Vec<Cell>,
    /// Per grid index: position in `cells` plus one, or 0 when absent.
    slots: Vec<u32>,
    /// Number of live entries.
    live: usize,
}

impl CellMap {
    /// Create a map for a grid of `cell_count` cells.
    #[must_use]
    pub fn new(cell_count: usize) -> Self {
        Self::with_capacity(cell_count, 0)
    }

    /// Create a map with room for `capacity` entries before reallocating.
    #[must_use]
    pub fn with_capacity(cell_count: usize, capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            slots: vec![0; cell_count],
            live: 0,
        }
    }

    /// Number of grid positions the map can key.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Insert or replace the entry for `cell.index`.
    ///
    /// A replaced entry keeps its original position in iteration order.
    pub fn insert(&mut self, cell: Cell) {
        debug_assert!(
            cell.index < self.slots.len(),
            "cell index {} outside grid of {} cells",
            cell.index,
            self.slots.len()
        );
        match self.slots[cell.index] {
            0 => {
                if self.cells.len() - self.live > self.live {
                    self.compact();
                }
                self.cells.push(cell);
                self.slots[cell.index] = self.cells.len() as u32;
                self.live += 1;
            }
            pos => self.cells[pos as usize - 1] = cell,
        }
    }

    /// Remove the entry at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<Cell> {
        let pos = *self.slots.get(index)?;
        if pos == 0 {
            return None;
        }
        self.slots[index] = 0;
        self.live -= 1;
        Some(self.cells[pos as usize - 1])
    }

    /// Drop stale entries, keeping live ones in order.
    fn compact(&mut self) {
        let mut kept = 0;
        for pos in 0..self.cells.len() {
            let cell = self.cells[pos];
            if self.slots[cell.index] as usize == pos + 1 {
                self.cells[kept] = cell;
                self.slots[cell.index] = (kept + 1) as u32;
                kept += 1;
            }
        }
        self.cells.truncate(kept);
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Cell> {
        match self.slots.get(index) {
            Some(&pos) if pos != 0 => Some(&self.cells[pos as usize - 1]),
            _ => None,
        }
    }

    /// Whether `cell` is stored exactly (same index and same contents).
    #[must_use]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.get(cell.index) == Some(cell)
    }

    /// Iterate live entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(pos, cell)| self.slots[cell.index] as usize == pos + 1)
            .map(|(_, cell)| cell)
    }

    /// Remove every entry, keeping allocations.
    pub fn clear(&mut self) {
        for cell in &self.cells {
            self.slots[cell.index] = 0;
        }
        self.cells.clear();
        self.live = 0;
    }

    /// Replace the contents with those of `other`, in `other`'s order.
    pub fn copy_from(&mut self, other: &Self) {
        self.clear();
        for cell in other.iter() {
            self.insert(*cell);
        }
    }

    /// Re-key the map for a grid of `cell_count` cells, dropping all entries.
    pub fn reset_grid(&mut self, cell_count: usize) {
        self.cells.clear();
        self.slots.clear();
        self.slots.resize(cell_count, 0);
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cell(index: usize, glyph: char) -> Cell {
        Cell::new(index, glyph, Color24::WHITE, Color24::BLACK, StyleMask::NONE)
    }

    #[test]
    fn test_cell_equality_covers_all_fields() {
        let a = cell(3, 'A');
        assert_eq!(a, cell(3, 'A'));
        assert_ne!(a, cell(4, 'A'));
        assert_ne!(a, cell(3, 'B'));
        assert_ne!(a, Cell { fg: Color24::RED, ..a });
        assert_ne!(a, Cell { bg: Color24::BLUE, ..a });
        assert_ne!(a, Cell { style: StyleMask::BOLD, ..a });
    }

    #[test]
    fn test_cell_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(cell(1, 'x'));
        set.insert(cell(1, 'x'));
        set.insert(cell(2, 'x'));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_blank_cell() {
        let blank = Cell::blank(7);
        assert_eq!(blank.index, 7);
        assert_eq!(blank.glyph, ' ');
        assert_eq!(blank.fg, Color24::DEFAULT_FG);
        assert_eq!(blank.bg, Color24::DEFAULT_BG);
        assert!(blank.is_blank());
    }

    #[test]
    fn test_is_blank_rules() {
        assert!(Cell::new(0, ' ', Color24::RED, Color24::BLACK, StyleMask::NONE).is_blank());
        assert!(!Cell::new(0, ' ', Color24::WHITE, Color24::BLUE, StyleMask::NONE).is_blank());
        assert!(!Cell::new(0, ' ', Color24::WHITE, Color24::BLACK, StyleMask::UNDERLINE).is_blank());
        assert!(!cell(0, 'A').is_blank());
    }

    #[test]
    fn test_map_insert_last_write_wins() {
        let mut map = CellMap::new(10);
        map.insert(cell(2, 'a'));
        map.insert(cell(5, 'b'));
        map.insert(cell(2, 'c'));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(2).map(|c| c.glyph), Some('c'));
        let order: Vec<usize> = map.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2, 5]);
    }

    #[test]
    fn test_map_remove() {
        let mut map = CellMap::new(10);
        map.insert(cell(1, 'a'));
        map.insert(cell(2, 'b'));
        assert_eq!(map.remove(1).map(|c| c.glyph), Some('a'));
        assert_eq!(map.remove(1), None);
        assert_eq!(map.remove(99), None);
        assert_eq!(map.len(), 1);
        assert!(map.get(1).is_none());
        let order: Vec<usize> = map.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2]);
    }

    #[test]
    fn test_map_reinsert_after_remove_moves_to_end() {
        let mut map = CellMap::new(10);
        map.insert(cell(1, 'a'));
        map.insert(cell(2, 'b'));
        map.remove(1);
        map.insert(cell(1, 'z'));
        let order: Vec<(usize, char)> = map.iter().map(|c| (c.index, c.glyph)).collect();
        assert_eq!(order, vec![(2, 'b'), (1, 'z')]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_map_insert_remove_cycles_stay_bounded() {
        let mut map = CellMap::new(10);
        for _ in 0..100_000 {
            map.insert(cell(3, 'a'));
            map.remove(3);
        }
        assert!(map.is_empty());
        assert!(map.cells.len() <= 2);
    }

    #[test]
    fn test_map_compaction_keeps_order() {
        let mut map = CellMap::new(10);
        map.insert(cell(7, 'a'));
        map.insert(cell(2, 'b'));
        for _ in 0..10 {
            map.insert(cell(5, 'x'));
            map.remove(5);
        }
        map.insert(cell(9, 'c'));
        map.insert(cell(2, 'd'));
        assert!(map.cells.len() <= 2 * map.len() + 1);
        let order: Vec<(usize, char)> = map.iter().map(|c| (c.index, c.glyph)).collect();
        assert_eq!(order, vec![(7, 'a'), (2, 'd'), (9, 'c')]);
        assert_eq!(map.get(2).map(|c| c.glyph), Some('d'));
        assert_eq!(map.get(5), None);
    }

    #[test]
    fn test_map_contains_requires_full_equality() {
        let mut map = CellMap::new(10);
        map.insert(cell(4, 'q'));
        assert!(map.contains(&cell(4, 'q')));
        assert!(!map.contains(&cell(4, 'r')));
        assert!(!map.contains(&cell(5, 'q')));
    }

    #[test]
    fn test_map_clear_keeps_capacity() {
        let mut map = CellMap::with_capacity(100, 64);
        for i in 0..50 {
            map.insert(cell(i, 'x'));
        }
        let cap = map.cells.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        assert_eq!(map.cells.capacity(), cap);
        assert!(map.slots.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_map_copy_from() {
        let mut a = CellMap::new(10);
        a.insert(cell(3, 'a'));
        a.insert(cell(1, 'b'));
        let mut b = CellMap::new(10);
        b.insert(cell(9, 'z'));
        b.copy_from(&a);
        let order: Vec<usize> = b.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![3, 1]);
        assert!(b.get(9).is_none());
    }

    #[test]
    fn test_map_reset_grid() {
        let mut map = CellMap::new(10);
        map.insert(cell(3, 'a'));
        map.reset_grid(40);
        assert_eq!(map.cell_count(), 40);
        assert!(map.is_empty());
        map.insert(cell(39, 'b'));
        assert_eq!(map.len(), 1);
    }
}
