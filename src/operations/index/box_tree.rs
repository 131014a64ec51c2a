use slotmap::SlotMap;
use tracing::trace;

use crate::error::{IndexError, Result};
use crate::geometry::Aabb;

slotmap::new_key_type! {
    /// Identifier of a tile in a [`BoxTree`].
    pub struct TileId;
}

/// Split parameters of a [`BoxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxTreeConfig {
    max_elements_per_tile: usize,
    max_depth: u32,
}

impl BoxTreeConfig {
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`] if `max_elements_per_tile` is
    /// zero.
    pub fn new(max_elements_per_tile: usize, max_depth: u32) -> Result<Self> {
        if max_elements_per_tile == 0 {
            return Err(IndexError::InvalidConfig(
                "max_elements_per_tile must be at least 1".into(),
            )
            .into());
        }
        Ok(Self {
            max_elements_per_tile,
            max_depth,
        })
    }

    #[must_use]
    pub fn max_elements_per_tile(&self) -> usize {
        self.max_elements_per_tile
    }

    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl Default for BoxTreeConfig {
    fn default() -> Self {
        Self {
            max_elements_per_tile: 64,
            max_depth: 16,
        }
    }
}

#[derive(Debug)]
struct Tile<T> {
    bounds: Aabb,
    depth: u32,
    entries: Vec<(Aabb, T)>,
    children: Option<[TileId; 2]>,
}

impl<T> Tile<T> {
    fn new(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }
}

/// A tree of overlapping tiles holding boxed entries.
///
/// A full tile splits along its larger extent into two children that each
/// cover 5/8 of it, overlapping by a quarter around the middle. Entries
/// move to the first child containing them; entries fitting no child stay
/// in the tile. Entries outside the root bounds stay in the root.
#[derive(Debug)]
pub struct BoxTree<T> {
    tiles: SlotMap<TileId, Tile<T>>,
    root: TileId,
    config: BoxTreeConfig,
    len: usize,
}

impl<T> BoxTree<T> {
    #[must_use]
    pub fn new(bounds: Aabb, config: BoxTreeConfig) -> Self {
        let mut tiles = SlotMap::with_key();
        let root = tiles.insert(Tile::new(bounds, 0));
        Self {
            tiles,
            root,
            config,
            len: 0,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.tiles[self.root].bounds
    }

    #[must_use]
    pub fn config(&self) -> BoxTreeConfig {
        self.config
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn insert(&mut self, bounds: Aabb, value: T) {
        let mut id = self.root;
        while let Some(child) = self.child_containing(id, &bounds) {
            id = child;
        }
        self.tiles[id].entries.push((bounds, value));
        self.len += 1;
        self.split_if_full(id);
    }

    /// All entries whose box intersects `query`.
    #[must_use]
    pub fn search(&self, query: &Aabb) -> Vec<(&Aabb, &T)> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let tile = &self.tiles[id];
            found.extend(
                tile.entries
                    .iter()
                    .filter(|(b, _)| b.intersects(query))
                    .map(|(b, v)| (b, v)),
            );
            if let Some(children) = tile.children {
                stack.extend(
                    children
                        .into_iter()
                        .filter(|c| self.tiles[*c].bounds.intersects(query)),
                );
            }
        }
        found
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Aabb, &T)> + '_ {
        self.tiles
            .values()
            .flat_map(|tile| tile.entries.iter().map(|(b, v)| (b, v)))
    }

    fn child_containing(&self, id: TileId, bounds: &Aabb) -> Option<TileId> {
        self.tiles[id]
            .children?
            .into_iter()
            .find(|c| self.tiles[*c].bounds.contains(bounds))
    }

    fn split_if_full(&mut self, id: TileId) {
        let tile = &self.tiles[id];
        if tile.children.is_some()
            || tile.entries.len() <= self.config.max_elements_per_tile
            || tile.depth >= self.config.max_depth
        {
            return;
        }
        let (bounds, depth) = (tile.bounds, tile.depth);
        let axis = bounds.largest_axis();
        let (lo, size) = (bounds.lower(axis), bounds.size(axis));
        let mut first = bounds;
        let mut second = bounds;
        first.max[axis] = lo + size * 5.0 / 8.0;
        second.min[axis] = lo + size * 3.0 / 8.0;

        let children = [
            self.tiles.insert(Tile::new(first, depth + 1)),
            self.tiles.insert(Tile::new(second, depth + 1)),
        ];
        let entries = std::mem::take(&mut self.tiles[id].entries);
        let mut kept = Vec::new();
        for (b, v) in entries {
            match children.into_iter().find(|c| self.tiles[*c].bounds.contains(&b)) {
                Some(c) => self.tiles[c].entries.push((b, v)),
                None => kept.push((b, v)),
            }
        }
        trace!(
            depth,
            axis,
            kept = kept.len(),
            moved = self.tiles[children[0]].entries.len() + self.tiles[children[1]].entries.len(),
            "split tile"
        );
        let tile = &mut self.tiles[id];
        tile.entries = kept;
        tile.children = Some(children);
        for c in children {
            self.split_if_full(c);
        }
    }
}
