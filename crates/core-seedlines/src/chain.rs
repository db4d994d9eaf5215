use std::collections::HashSet;

use core_geometry::Coord;

use crate::seed_line::SeedLine;

/// Segments an unordered point set into ordered polylines via a greedy
/// nearest-neighbour walk, closing a line when its walk returns within
/// `separation` of its own start, and discarding lines shorter than
/// `min_length` (§4.D). Points are visited in ascending `(x, y)` order so
/// the result is deterministic for a given input set.
pub fn chain_into_lines(points: &HashSet<Coord>, separation: f64, min_length: usize) -> Vec<SeedLine> {
    let mut remaining: Vec<Coord> = points.iter().copied().collect();
    remaining.sort();
    let mut remaining: HashSet<Coord> = remaining.into_iter().collect();

    let mut ordered_starts: Vec<Coord> = points.iter().copied().collect();
    ordered_starts.sort();

    let mut lines = Vec::new();

    for start in ordered_starts {
        if !remaining.contains(&start) {
            continue;
        }
        remaining.remove(&start);
        let mut line = vec![start];
        let mut current = start;
        loop {
            let next = nearest_within(&remaining, current, separation);
            match next {
                Some(n) => {
                    remaining.remove(&n);
                    line.push(n);
                    current = n;
                }
                None => break,
            }
        }
        let closed = line.len() > 2
            && (line[0] - *line.last().unwrap()).norm() <= 2.0;
        if line.len() >= min_length {
            lines.push(SeedLine::new(line, closed));
        }
    }

    lines
}

fn nearest_within(remaining: &HashSet<Coord>, from: Coord, separation: f64) -> Option<Coord> {
    remaining
        .iter()
        .copied()
        .map(|c| (c, (c - from).norm()))
        .filter(|&(_, d)| d <= separation)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
        .map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_a_straight_line_into_a_single_seed_line() {
        let mut points = HashSet::new();
        for x in 0..30 {
            points.insert(Coord::new(x, 0));
        }
        let lines = chain_into_lines(&points, 1.5, 20);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 30);
        assert!(!lines[0].closed);
    }

    #[test]
    fn discards_lines_shorter_than_minimum() {
        let mut points = HashSet::new();
        for x in 0..5 {
            points.insert(Coord::new(x, 0));
        }
        let lines = chain_into_lines(&points, 1.5, 20);
        assert!(lines.is_empty());
    }

    #[test]
    fn detects_a_closed_loop() {
        let mut points = HashSet::new();
        // A small square ring.
        for x in 0..10 {
            points.insert(Coord::new(x, 0));
            points.insert(Coord::new(x, 9));
        }
        for y in 0..10 {
            points.insert(Coord::new(0, y));
            points.insert(Coord::new(9, y));
        }
        let lines = chain_into_lines(&points, 1.5, 20);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
    }
}
