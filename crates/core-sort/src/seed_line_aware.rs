use std::collections::BTreeMap;

use core_geometry::FloatCoord;
use core_path::Path;

/// `true` when the group's extreme seeds lie within `2 * seed_spacing` of
/// each other, meaning the seed line that produced it loops back on itself
/// (§4.J "if the group's extreme seeds are within `2*seed_spacing`, mark
/// the group as closed"). A closed group can be entered at any of its
/// member paths rather than only at its two ends.
fn group_is_closed(group: &[Path], seed_spacing: f64) -> bool {
    if group.len() < 2 {
        return false;
    }
    let first_seed = group.first().unwrap().seed().position;
    let last_seed = group.last().unwrap().seed().position;
    (first_seed - last_seed).norm() <= 2.0 * seed_spacing
}

/// Groups paths by their originating seed-line index, sorted ascending by
/// each path's index within that line (§4.J "group paths by originating
/// seed-line index ... sort by index"). Paths produced by the reseeding
/// fallback share the sentinel `usize::MAX` seed-line index but don't
/// originate from a common seed line, so each becomes its own singleton
/// group instead of being chained together.
fn build_groups(paths: Vec<Path>) -> Vec<Vec<Path>> {
    let mut by_line: BTreeMap<usize, Vec<Path>> = BTreeMap::new();
    let mut singles: Vec<Vec<Path>> = Vec::new();

    for path in paths {
        let line_index = path.seed().seed_line_index;
        if line_index == usize::MAX {
            singles.push(vec![path]);
        } else {
            by_line.entry(line_index).or_default().push(path);
        }
    }

    let mut groups: Vec<Vec<Path>> = by_line
        .into_values()
        .map(|mut group| {
            group.sort_by_key(|p| p.seed().index_in_line);
            group
        })
        .collect();
    groups.extend(singles);
    groups
}

/// The entry distance from `prev_end` into `group` at rotation `start` (the
/// path that will be entered first) travelling in `forward` index order
/// (wrapping for closed groups) or its reverse.
fn entry_distance(group: &[Path], start: usize, forward: bool, prev_end: FloatCoord) -> f64 {
    let entry_point = if forward {
        group[start].first_raw()
    } else {
        group[start].last_raw()
    };
    (entry_point - prev_end).norm()
}

/// Walks `group` in the given rotation/direction, starting from `prev_end`,
/// setting each path's own `reversed` flag by proximity to the running
/// previous-emission end as it goes (§4.J "choosing each path's orientation
/// by proximity to the previous emission").
fn walk_group(group: Vec<Path>, start: usize, forward: bool, mut prev_end: FloatCoord) -> (Vec<Path>, FloatCoord) {
    let n = group.len();
    let order: Vec<usize> = (0..n)
        .map(|k| {
            if forward {
                (start + k) % n
            } else {
                (start + n - (k % n)) % n
            }
        })
        .collect();

    // `group` is consumed positionally; pull paths out by index without
    // re-shuffling the remainder, since each index is visited exactly once.
    let mut slots: Vec<Option<Path>> = group.into_iter().map(Some).collect();
    let mut output = Vec::with_capacity(n);
    for idx in order {
        let mut path = slots[idx].take().expect("each index visited once");
        let start_dist = (path.first_raw() - prev_end).norm();
        let end_dist = (path.last_raw() - prev_end).norm();
        let reversed = end_dist < start_dist;
        path.set_reversed(reversed);
        prev_end = if reversed { path.first_raw() } else { path.last_raw() };
        output.push(path);
    }
    (output, prev_end)
}

/// Picks the entry index and direction that minimise the incoming travel
/// distance from `prev_end` (§4.J "choose orientation and entry index so
/// that the incoming travel distance is minimised"), then walks the group
/// from there. Open groups only ever enter at one of their two ends;
/// closed groups may enter at any member path, in either direction around
/// the loop.
fn orient_group(group: Vec<Path>, prev_end: FloatCoord, seed_spacing: f64) -> (Vec<Path>, FloatCoord) {
    let closed = group_is_closed(&group, seed_spacing);
    let n = group.len();

    let candidate_starts: Vec<usize> = if closed { (0..n).collect() } else { vec![0, n - 1] };

    let mut best = (0usize, true, f64::INFINITY);
    for &start in &candidate_starts {
        for forward in [true, false] {
            // An open group only enters its last path travelling backward,
            // and its first path travelling forward (§4.J: "entry index"
            // picks one of the two ends, the end dictates direction).
            if !closed && ((start == 0 && !forward) || (start == n - 1 && forward)) {
                continue;
            }
            let dist = entry_distance(&group, start, forward, prev_end);
            if dist < best.2 {
                best = (start, forward, dist);
            }
        }
    }

    walk_group(group, best.0, best.1, prev_end)
}

/// Orders paths by grouping them per originating seed line, entering each
/// group where travel is cheapest, and walking its members in seed order
/// (§4.J "Seed-line aware"). Groups themselves are visited in nearest-first
/// order, same as the top-level nearest-neighbour strategy.
pub fn seed_line_aware_sort(paths: Vec<Path>, seed_spacing: f64) -> Vec<Path> {
    let mut groups = build_groups(paths);
    let mut output = Vec::new();
    let mut prev_end = FloatCoord::ZERO;

    while !groups.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, group) in groups.iter().enumerate() {
            let forward_dist = (group.first().unwrap().first_raw() - prev_end).norm();
            let backward_dist = (group.last().unwrap().last_raw() - prev_end).norm();
            let dist = forward_dist.min(backward_dist);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        let group = groups.remove(best_idx);
        let (oriented, new_end) = orient_group(group, prev_end, seed_spacing);
        prev_end = new_end;
        output.extend(oriented);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_path::SeedPoint;

    fn path_at(line: usize, index: usize, x0: f64, x1: f64) -> Path {
        let seed = SeedPoint {
            position: FloatCoord::new(x0, 0.0),
            seed_line_index: line,
            index_in_line: index,
        };
        let mut path = Path::new(seed, FloatCoord::new(1.0, 0.0), 1.0);
        path.add_point(
            FloatCoord::new(x1, 0.0),
            FloatCoord::new(x1, 1.0),
            FloatCoord::new(x1, -1.0),
            0.0,
        );
        path
    }

    #[test]
    fn groups_share_a_seed_line_and_stay_in_seed_order() {
        let paths = vec![path_at(0, 1, 10.0, 20.0), path_at(0, 0, 0.0, 10.0)];
        let sorted = seed_line_aware_sort(paths, 8.0);
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].seed().index_in_line, 0);
        assert_eq!(sorted[1].seed().index_in_line, 1);
    }

    #[test]
    fn reseeded_singletons_are_never_merged_into_one_group() {
        let mut a = path_at(usize::MAX, 0, 0.0, 5.0);
        let mut b = path_at(usize::MAX, 0, 100.0, 105.0);
        a.set_reversed(false);
        b.set_reversed(false);
        let sorted = seed_line_aware_sort(vec![a, b], 8.0);
        assert_eq!(sorted.len(), 2);
    }
}
