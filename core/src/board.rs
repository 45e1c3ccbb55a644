// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point grid and incremental region maintenance
//!
//! The board owns two arenas: one [`Point`] per intersection and a table of
//! [`Region`]s. Points refer to their region by [`RegionId`] and regions list
//! their member points by index; neither reference implies ownership.
//!
//! Every mutation keeps three invariants:
//! - each point belongs to exactly one region and regions are never empty,
//! - two neighbouring points with the same content share a region,
//! - each stone region caches the number of distinct empty points next to it.

use crate::region::{Region, RegionChanges, RegionId};
use crate::vertex::{BoardSize, Direction, Vertex};
use crate::Color;
use anyhow::{bail, ensure};
use std::collections::{HashSet, VecDeque};

/// Placeholder handle for a point between leaving one region and joining another
const DETACHED: RegionId = RegionId(u32::MAX);

/// One intersection of the grid
#[derive(Debug, Clone)]
pub struct Point {
    vertex: Vertex,
    color: Option<Color>,
    region: RegionId,
    /// Neighbour indices in Up, Right, Down, Left order
    neighbors: [Option<usize>; 4],
}

impl Point {
    /// The intersection this point sits on
    pub fn vertex(&self) -> Vertex {
        self.vertex
    }

    /// Stone on this point, if any
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Handle of the region containing this point
    pub fn region(&self) -> RegionId {
        self.region
    }

    fn neighbor_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().flatten().copied()
    }
}

/// The Go board: point grid, region table and position hash
#[derive(Debug, Clone)]
pub struct Board {
    size: BoardSize,
    points: Vec<Point>,
    regions: Vec<Option<Region>>,
    free_slots: Vec<u32>,
    /// Zobrist keys per point: `[black, white]`
    zobrist_keys: Vec<[u64; 2]>,
    hash: u64,
}

impl Board {
    /// Create an empty board covered by a single empty region
    pub fn new(size: BoardSize) -> Self {
        let count = size.point_count();
        let root = RegionId(0);
        let points = (0..count)
            .map(|index| {
                let vertex = Vertex::from_index(index, size);
                let mut neighbors = [None; 4];
                for (slot, direction) in Direction::ALL.into_iter().enumerate() {
                    neighbors[slot] = vertex.neighbor(direction, size).map(|n| n.index(size));
                }
                Point {
                    vertex,
                    color: None,
                    region: root,
                    neighbors,
                }
            })
            .collect();

        Self {
            size,
            points,
            regions: vec![Some(Region::new(None, (0..count).collect()))],
            free_slots: Vec::new(),
            zobrist_keys: (0..count).map(zobrist_keys_for).collect(),
            hash: 0,
        }
    }

    /// Dimension of the board
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Whether a vertex lies on this board
    pub fn contains(&self, vertex: Vertex) -> bool {
        (1..=self.size.get()).contains(&vertex.x()) && (1..=self.size.get()).contains(&vertex.y())
    }

    /// Point at a vertex
    pub fn point(&self, vertex: Vertex) -> &Point {
        &self.points[vertex.index(self.size)]
    }

    /// All points in left-to-right, bottom-to-top order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Stone at a vertex
    pub fn get(&self, vertex: Vertex) -> Option<Color> {
        self.point(vertex).color
    }

    /// Region containing a vertex
    pub fn region_at(&self, vertex: Vertex) -> &Region {
        self.region_by_id(self.point(vertex).region)
    }

    /// Region for a handle, if the handle is live
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.slot()).and_then(Option::as_ref)
    }

    /// All live regions
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> + '_ {
        self.regions
            .iter()
            .enumerate()
            .filter_map(|(slot, region)| region.as_ref().map(|r| (RegionId(slot as u32), r)))
    }

    /// Member vertices of a region
    pub fn region_vertices(&self, id: RegionId) -> Vec<Vertex> {
        self.region(id)
            .map(|region| region.points.iter().map(|&p| self.points[p].vertex).collect())
            .unwrap_or_default()
    }

    /// Liberty count of the stone group at a vertex (0 for empty points)
    pub fn liberties_at(&self, vertex: Vertex) -> usize {
        self.region_at(vertex).liberties
    }

    /// Number of stones of a colour on the board
    pub fn stone_count(&self, color: Color) -> usize {
        self.points.iter().filter(|p| p.color == Some(color)).count()
    }

    /// Zobrist hash of the stone configuration
    pub fn position_hash(&self) -> u64 {
        self.hash
    }

    /// Canonical description of the region partition: each region as its
    /// content plus its sorted vertices, regions sorted by first vertex.
    pub fn partition(&self) -> Vec<(Option<Color>, Vec<Vertex>)> {
        let mut partition: Vec<_> = self
            .regions()
            .map(|(id, region)| {
                let mut vertices = self.region_vertices(id);
                vertices.sort_by_key(|v| v.index(self.size));
                (region.color, vertices)
            })
            .collect();
        partition.sort_by_key(|(_, vertices)| vertices[0].index(self.size));
        partition
    }

    /// Distinct regions touching a region, in order of discovery
    pub fn adjacent_regions(&self, id: RegionId) -> Vec<RegionId> {
        let mut adjacent = Vec::new();
        if let Some(region) = self.region(id) {
            for &point in &region.points {
                for n in self.neighbors_of(point) {
                    let other = self.points[n].region;
                    if other != id && !adjacent.contains(&other) {
                        adjacent.push(other);
                    }
                }
            }
        }
        adjacent
    }

    pub(crate) fn index_of(&self, vertex: Vertex) -> usize {
        vertex.index(self.size)
    }

    pub(crate) fn vertex_of(&self, index: usize) -> Vertex {
        self.points[index].vertex
    }

    pub(crate) fn color_at(&self, index: usize) -> Option<Color> {
        self.points[index].color
    }

    pub(crate) fn region_id_at(&self, index: usize) -> RegionId {
        self.points[index].region
    }

    pub(crate) fn neighbors_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.points[index].neighbor_indices()
    }

    pub(crate) fn region_by_id(&self, id: RegionId) -> &Region {
        self.regions[id.slot()]
            .as_ref()
            .expect("points only reference live regions")
    }

    pub(crate) fn zobrist_key(&self, index: usize, color: Color) -> u64 {
        self.zobrist_keys[index][color_slot(color)]
    }

    /// Change the content of one intersection, updating regions and liberties.
    ///
    /// The point leaves its region (which is discarded if it becomes empty or
    /// split if the point was its only connection), starts a fresh region and
    /// is merged with every neighbouring region of the same content.
    pub(crate) fn set_color(&mut self, index: usize, color: Option<Color>) -> RegionChanges {
        let mut changes = RegionChanges::default();
        let old_color = self.points[index].color;
        if old_color == color {
            return changes;
        }

        let old_region = self.points[index].region;
        self.detach(index, old_region, &mut changes);

        self.toggle_hash(index, old_color);
        self.toggle_hash(index, color);
        self.points[index].color = color;
        let fresh = self.allocate(Region::new(color, vec![index]));
        self.points[index].region = fresh;

        let merged = self.merge_with_neighbors(index, &mut changes);

        let mut touched: Vec<RegionId> = self.neighbors_of(index).map(|n| self.points[n].region).collect();
        touched.push(merged);
        self.refresh_liberties(touched);
        changes
    }

    /// Turn every stone of a region into empty space.
    ///
    /// Each emptied point becomes its own empty region and is then merged
    /// with neighbouring empty regions, so the captured area joins the empty
    /// space around it. Returns the indices of the removed stones.
    pub(crate) fn clear_region(&mut self, id: RegionId, changes: &mut RegionChanges) -> Vec<usize> {
        if !self.region(id).is_some_and(Region::is_stone_group) {
            return Vec::new();
        }
        let region = match self.release(id) {
            Some(region) => region,
            None => return Vec::new(),
        };
        changes.discarded += 1;

        for &point in &region.points {
            self.toggle_hash(point, region.color);
            self.points[point].color = None;
            let fresh = self.allocate(Region::new(None, vec![point]));
            self.points[point].region = fresh;
        }
        for &point in &region.points {
            self.merge_with_neighbors(point, changes);
        }

        let touched: Vec<RegionId> = region
            .points
            .iter()
            .flat_map(|&p| self.neighbors_of(p).map(|n| self.points[n].region).collect::<Vec<_>>())
            .collect();
        self.refresh_liberties(touched);

        tracing::debug!(stones = region.points.len(), color = ?region.color, "Cleared stone group");
        region.points
    }

    /// Remove a point from its region, discarding or splitting the remainder
    fn detach(&mut self, index: usize, id: RegionId, changes: &mut RegionChanges) {
        let remaining = {
            let region = self.regions[id.slot()]
                .as_mut()
                .expect("points only reference live regions");
            if let Some(position) = region.points.iter().position(|&p| p == index) {
                region.points.swap_remove(position);
            }
            region.points.len()
        };
        self.points[index].region = DETACHED;

        if remaining == 0 {
            self.release(id);
            changes.discarded += 1;
            return;
        }

        let seeds: Vec<usize> = self
            .neighbors_of(index)
            .filter(|&n| self.points[n].region == id)
            .collect();
        if seeds.len() > 1 {
            self.split_if_disconnected(id, &seeds, changes);
        }
    }

    /// After a point left region `id`, give every disconnected part its own region.
    ///
    /// Every remaining point is connected to one of `seeds`, the former
    /// neighbours of the departed point, so flooding from the seeds covers the
    /// whole region.
    fn split_if_disconnected(&mut self, id: RegionId, seeds: &[usize], changes: &mut RegionChanges) {
        let first = self.flood(seeds[0], id);
        if seeds.iter().all(|s| first.contains(s)) {
            return;
        }

        let color = self.region_by_id(id).color;
        let mut assigned = first.clone();
        for &seed in &seeds[1..] {
            if assigned.contains(&seed) {
                continue;
            }
            let component = self.flood(seed, id);
            assigned.extend(component.iter().copied());
            let points: Vec<usize> = component.into_iter().collect();
            let fresh = self.allocate(Region::new(color, points.clone()));
            for &point in &points {
                self.points[point].region = fresh;
            }
            changes.split += 1;
        }

        let region = self.regions[id.slot()]
            .as_mut()
            .expect("split region is live");
        region.points.retain(|p| first.contains(p));
        tracing::debug!(region = id.0, parts = changes.split + 1, "Split region");
    }

    /// Points reachable from `start` without leaving region `id`
    fn flood(&self, start: usize, id: RegionId) -> HashSet<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for n in self.neighbors_of(current) {
                if self.points[n].region == id && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    /// Merge the region of `index` with neighbouring regions of the same content
    fn merge_with_neighbors(&mut self, index: usize, changes: &mut RegionChanges) -> RegionId {
        let color = self.points[index].color;
        let mut id = self.points[index].region;
        let neighbors: Vec<usize> = self.neighbors_of(index).collect();
        for n in neighbors {
            let other = self.points[n].region;
            if other != id && self.points[n].color == color {
                id = self.merge(id, other);
                changes.merged += 1;
            }
        }
        id
    }

    /// Absorb the smaller region into the larger one; returns the survivor
    fn merge(&mut self, a: RegionId, b: RegionId) -> RegionId {
        let (keep, absorb) = if self.region_by_id(a).size() >= self.region_by_id(b).size() {
            (a, b)
        } else {
            (b, a)
        };
        let absorbed = match self.release(absorb) {
            Some(region) => region,
            None => return keep,
        };
        for &point in &absorbed.points {
            self.points[point].region = keep;
        }
        let survivor = self.regions[keep.slot()]
            .as_mut()
            .expect("merge target is live");
        survivor.points.extend(absorbed.points);
        tracing::debug!(region = keep.0, size = survivor.points.len(), "Merged regions");
        keep
    }

    fn refresh_liberties(&mut self, ids: Vec<RegionId>) {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            let liberties = match self.region(id) {
                Some(region) if region.color.is_some() => self.count_liberties(region),
                _ => continue,
            };
            if let Some(region) = self.regions[id.slot()].as_mut() {
                region.liberties = liberties;
            }
        }
    }

    fn count_liberties(&self, region: &Region) -> usize {
        let mut liberties = HashSet::new();
        for &point in &region.points {
            for n in self.neighbors_of(point) {
                if self.points[n].color.is_none() {
                    liberties.insert(n);
                }
            }
        }
        liberties.len()
    }

    fn allocate(&mut self, region: Region) -> RegionId {
        match self.free_slots.pop() {
            Some(slot) => {
                self.regions[slot as usize] = Some(region);
                RegionId(slot)
            }
            None => {
                self.regions.push(Some(region));
                RegionId(self.regions.len() as u32 - 1)
            }
        }
    }

    fn release(&mut self, id: RegionId) -> Option<Region> {
        let region = self.regions.get_mut(id.slot())?.take();
        if region.is_some() {
            self.free_slots.push(id.0);
        }
        region
    }

    fn toggle_hash(&mut self, index: usize, color: Option<Color>) {
        if let Some(color) = color {
            self.hash ^= self.zobrist_key(index, color);
        }
    }

    /// Check every structural invariant from scratch.
    ///
    /// This is a full recomputation and is meant for tests and debugging.
    pub fn verify_integrity(&self) -> anyhow::Result<()> {
        let mut owners = vec![0usize; self.points.len()];
        for (id, region) in self.regions() {
            ensure!(!region.points.is_empty(), "region {} has no points", id.0);
            for &point in &region.points {
                owners[point] += 1;
                ensure!(
                    self.points[point].region == id,
                    "{} is listed by region {} but points to region {}",
                    self.points[point].vertex,
                    id.0,
                    self.points[point].region.0
                );
                ensure!(
                    self.points[point].color == region.color,
                    "{} has a different colour than its region",
                    self.points[point].vertex
                );
            }

            let reachable = self.flood(region.points[0], id);
            ensure!(reachable.len() == region.points.len(), "region {} is not connected", id.0);

            let expected = if region.color.is_some() { self.count_liberties(region) } else { 0 };
            ensure!(
                region.liberties == expected,
                "region {} caches {} liberties, actual {}",
                id.0,
                region.liberties,
                expected
            );
        }

        for (index, count) in owners.into_iter().enumerate() {
            if count != 1 {
                bail!("{} belongs to {} regions", self.points[index].vertex, count);
            }
        }

        for point in &self.points {
            for n in point.neighbor_indices() {
                let other = &self.points[n];
                ensure!(
                    other.color != point.color || other.region == point.region,
                    "{} and {} have the same content but different regions",
                    point.vertex,
                    other.vertex
                );
            }
        }

        let expected_hash = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(index, p)| p.color.map(|c| self.zobrist_key(index, c)))
            .fold(0u64, |hash, key| hash ^ key);
        ensure!(expected_hash == self.hash, "position hash is stale");
        Ok(())
    }
}

fn color_slot(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

/// Deterministic Zobrist keys for one point, derived with blake3
fn zobrist_keys_for(index: usize) -> [u64; 2] {
    let mut keys = [0u64; 2];
    for (slot, key) in keys.iter_mut().enumerate() {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"goban zobrist");
        hasher.update(&(index as u32).to_le_bytes());
        hasher.update(&[slot as u8]);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest.as_bytes()[..8]);
        *key = u64::from_le_bytes(bytes);
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: u8) -> Board {
        Board::new(BoardSize::new(size).unwrap())
    }

    fn place(board: &mut Board, label: &str, color: Option<Color>) -> RegionChanges {
        let vertex = Vertex::from_label(label, board.size()).unwrap();
        let index = board.index_of(vertex);
        let changes = board.set_color(index, color);
        board.verify_integrity().unwrap();
        changes
    }

    fn at(board: &Board, label: &str) -> Vertex {
        Vertex::from_label(label, board.size()).unwrap()
    }

    #[test]
    fn new_board_is_one_empty_region() {
        let board = board(9);
        assert_eq!(board.regions().count(), 1);
        assert_eq!(board.region_at(at(&board, "E5")).size(), 81);
        assert_eq!(board.position_hash(), 0);
        board.verify_integrity().unwrap();
    }

    #[test]
    fn single_stone_in_the_center_has_four_liberties() {
        let mut board = board(9);
        place(&mut board, "E5", Some(Color::Black));
        assert_eq!(board.liberties_at(at(&board, "E5")), 4);
        assert_eq!(board.region_at(at(&board, "A1")).size(), 80);
    }

    #[test]
    fn neighbouring_stones_merge() {
        let mut board = board(9);
        place(&mut board, "C3", Some(Color::Black));
        place(&mut board, "E3", Some(Color::Black));
        let changes = place(&mut board, "D3", Some(Color::Black));
        assert_eq!(changes.merged, 2);
        let group = board.region_at(at(&board, "C3"));
        assert_eq!(group.size(), 3);
        assert_eq!(group.liberties(), 8);
        assert_eq!(board.point(at(&board, "E3")).region(), board.point(at(&board, "C3")).region());
    }

    #[test]
    fn shared_liberties_are_counted_once() {
        let mut board = board(9);
        place(&mut board, "D4", Some(Color::Black));
        place(&mut board, "E5", Some(Color::Black));
        place(&mut board, "E4", Some(Color::Black));
        // D4 E4 E5 form an L; D5 is adjacent to both D4 and E5
        assert_eq!(board.liberties_at(at(&board, "D4")), 7);
    }

    #[test]
    fn wall_splits_empty_region() {
        let mut board = board(7);
        for row in 1..=7 {
            place(&mut board, &format!("D{row}"), Some(Color::White));
        }
        let left = board.point(at(&board, "A1")).region();
        let right = board.point(at(&board, "G1")).region();
        assert_ne!(left, right);
        assert_eq!(board.region_at(at(&board, "A1")).size(), 21);
        assert_eq!(board.region_at(at(&board, "G7")).size(), 21);
        assert_eq!(board.liberties_at(at(&board, "D4")), 14);
    }

    #[test]
    fn removing_a_connecting_stone_splits_the_group() {
        let mut board = board(9);
        for label in ["C3", "D3", "E3"] {
            place(&mut board, label, Some(Color::Black));
        }
        let changes = place(&mut board, "D3", None);
        assert_eq!(changes.split, 1);
        assert_ne!(board.point(at(&board, "C3")).region(), board.point(at(&board, "E3")).region());
        assert_eq!(board.liberties_at(at(&board, "C3")), 4);
    }

    #[test]
    fn clearing_a_group_rejoins_empty_space() {
        let mut board = board(9);
        for label in ["A2", "B1"] {
            place(&mut board, label, Some(Color::Black));
        }
        place(&mut board, "A1", Some(Color::White));
        assert_eq!(board.liberties_at(at(&board, "A1")), 0);

        let id = board.point(at(&board, "A1")).region();
        let mut changes = RegionChanges::default();
        let removed = board.clear_region(id, &mut changes);
        board.verify_integrity().unwrap();
        assert_eq!(removed, vec![board.index_of(at(&board, "A1"))]);
        assert_eq!(board.get(at(&board, "A1")), None);
        assert_eq!(board.region_at(at(&board, "A1")).size(), 1);
        assert_eq!(board.liberties_at(at(&board, "A2")), 3);
    }

    #[test]
    fn hash_depends_only_on_stones() {
        let mut a = board(9);
        let mut b = board(9);
        place(&mut a, "C3", Some(Color::Black));
        place(&mut a, "D4", Some(Color::White));
        place(&mut b, "D4", Some(Color::White));
        place(&mut b, "C3", Some(Color::Black));
        assert_eq!(a.position_hash(), b.position_hash());
        place(&mut b, "C3", None);
        assert_ne!(a.position_hash(), b.position_hash());
        assert_eq!(a.partition().len(), 3);
    }
}
