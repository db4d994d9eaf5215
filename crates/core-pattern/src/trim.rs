use core_field::DirectorField;

use crate::error::PatternError;

const PADDING: i32 = 10;

struct Bounds {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

fn bounding_box(shape: &[bool], width: usize, height: usize) -> Result<Bounds, PatternError> {
    let mut min_x = width as i32;
    let mut min_y = height as i32;
    let mut max_x = -1i32;
    let mut max_y = -1i32;
    for y in 0..height {
        for x in 0..width {
            if shape[y * width + x] {
                let (xi, yi) = (x as i32, y as i32);
                min_x = min_x.min(xi);
                min_y = min_y.min(yi);
                max_x = max_x.max(xi);
                max_y = max_y.max(yi);
            }
        }
    }
    if max_x < min_x || max_y < min_y {
        return Err(PatternError::EmptyShape);
    }
    Ok(Bounds {
        x0: (min_x - PADDING).max(0),
        y0: (min_y - PADDING).max(0),
        x1: (max_x + PADDING).min(width as i32 - 1),
        y1: (max_y + PADDING).min(height as i32 - 1),
    })
}

/// Trims null rows/columns from `shape`, keeping a 10-pixel padding margin
/// around the surviving bounding box, and resamples `field` onto the same
/// trimmed window (§4.E step 1). The director field is sampled rather than
/// sliced so no raw buffer access is needed outside `core-field`.
pub fn trim(
    width: usize,
    height: usize,
    shape: &[bool],
    field: &DirectorField,
) -> Result<(usize, usize, Vec<bool>, DirectorField), PatternError> {
    let bounds = bounding_box(shape, width, height)?;
    let new_width = (bounds.x1 - bounds.x0 + 1) as usize;
    let new_height = (bounds.y1 - bounds.y0 + 1) as usize;

    let mut new_shape = vec![false; new_width * new_height];
    let mut dx = vec![0.0; new_width * new_height];
    let mut dy = vec![0.0; new_width * new_height];

    for ny in 0..new_height {
        for nx in 0..new_width {
            let ox = bounds.x0 + nx as i32;
            let oy = bounds.y0 + ny as i32;
            let idx = ny * new_width + nx;
            new_shape[idx] = shape[oy as usize * width + ox as usize];
            let d = field.at(ox, oy);
            dx[idx] = d.x;
            dy[idx] = d.y;
        }
    }

    let new_field = DirectorField::new(new_width, new_height, dx, dy);
    Ok((new_width, new_height, new_shape, new_field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_to_bounding_box_plus_padding() {
        let width = 50;
        let height = 50;
        let mut shape = vec![false; width * height];
        for y in 20..25 {
            for x in 20..25 {
                shape[y * width + x] = true;
            }
        }
        let field = DirectorField::new(width, height, vec![1.0; width * height], vec![0.0; width * height]);
        let (nw, nh, trimmed, _) = trim(width, height, &shape, &field).unwrap();
        assert_eq!(nw, 5 + 2 * 10);
        assert_eq!(nh, 5 + 2 * 10);
        assert!(trimmed.iter().any(|&b| b));
    }

    #[test]
    fn rejects_an_all_empty_shape() {
        let width = 10;
        let height = 10;
        let shape = vec![false; width * height];
        let field = DirectorField::new(width, height, vec![0.0; width * height], vec![0.0; width * height]);
        assert!(trim(width, height, &shape, &field).is_err());
    }
}
