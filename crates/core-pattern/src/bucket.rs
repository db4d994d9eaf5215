use core_field::SplayField;
use core_geometry::Coord;

/// Bins interior (in-shape) cells into `min(width, height) / 10` buckets by
/// splay magnitude (§4.E step 4). Bucket 0 holds the highest-magnitude
/// cells; within a bucket, cells are ordered by descending magnitude too, so
/// the reseeding fallback can walk buckets front-to-back and pop
/// front-to-back to always try the highest remaining splay first.
pub fn bucket_by_splay(
    width: usize,
    height: usize,
    shape: &[bool],
    splay: &SplayField,
) -> Vec<Vec<Coord>> {
    let mut cells: Vec<(Coord, f64)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if !shape[y * width + x] {
                continue;
            }
            let p = Coord::new(x as i32, y as i32);
            cells.push((p, splay.magnitude_at(p.x, p.y)));
        }
    }
    cells.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

    let bucket_count = (width.min(height) / 10).max(1);
    let chunk_size = cells.len().div_ceil(bucket_count).max(1);

    let mut buckets: Vec<Vec<Coord>> = cells
        .chunks(chunk_size)
        .map(|chunk| {
            let mut bucket: Vec<Coord> = chunk.iter().map(|&(c, _)| c).collect();
            bucket.reverse();
            bucket
        })
        .collect();
    buckets.reverse();
    buckets
}
