//! Connected component bounding boxes

use crate::{RegionError, RegionResult};
use glyphtrain_core::{Box, Boxa, Pix, PixelDepth};

/// Pixel adjacency used when growing components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// Edge neighbors only
    FourWay,
    /// Edge and corner neighbors
    #[default]
    EightWay,
}

/// Find the bounding box of every connected component of a 1 bpp image.
///
/// Components are reported in raster order of their first (top-most,
/// then left-most) pixel.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] if the image is not 1 bpp.
pub fn find_connected_components(pix: &Pix, connectivity: ConnectivityType) -> RegionResult<Boxa> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }

    let (w, h) = (pix.width() as i32, pix.height() as i32);
    let mut visited = vec![false; (w * h) as usize];
    let mut boxa = Boxa::new();
    let mut stack: Vec<(i32, i32)> = Vec::new();

    let neighbors: &[(i32, i32)] = match connectivity {
        ConnectivityType::FourWay => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
        ConnectivityType::EightWay => &[
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ],
    };

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            if visited[idx] || pix.get_pixel_unchecked(x as u32, y as u32) == 0 {
                continue;
            }
            visited[idx] = true;
            stack.push((x, y));
            let (mut minx, mut miny, mut maxx, mut maxy) = (x, y, x, y);

            while let Some((cx, cy)) = stack.pop() {
                minx = minx.min(cx);
                miny = miny.min(cy);
                maxx = maxx.max(cx);
                maxy = maxy.max(cy);
                for &(dx, dy) in neighbors {
                    let (nx, ny) = (cx + dx, cy + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let nidx = (ny * w + nx) as usize;
                    if !visited[nidx] && pix.get_pixel_unchecked(nx as u32, ny as u32) != 0 {
                        visited[nidx] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            boxa.push(Box::new_unchecked(minx, miny, maxx - minx + 1, maxy - miny + 1));
        }
    }
    Ok(boxa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: &[&str]) -> Pix {
        let mut pm = Pix::new(rows[0].len() as u32, rows.len() as u32, PixelDepth::Bit1)
            .unwrap()
            .to_mut();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    pm.set_pixel(x as u32, y as u32, 1).unwrap();
                }
            }
        }
        pm.into()
    }

    #[test]
    fn test_diagonal_connectivity() {
        let pix = from_rows(&["#.....", ".#..##", "......", "...#.."]);
        let eight = find_connected_components(&pix, ConnectivityType::EightWay).unwrap();
        assert_eq!(eight.len(), 3);
        assert_eq!(*eight.get(0).unwrap(), Box::new_unchecked(0, 0, 2, 2));
        assert_eq!(*eight.get(1).unwrap(), Box::new_unchecked(4, 1, 2, 1));
        assert_eq!(*eight.get(2).unwrap(), Box::new_unchecked(3, 3, 1, 1));

        let four = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
        assert_eq!(four.len(), 4);
    }

    #[test]
    fn test_empty_and_depth() {
        let pix = Pix::new(5, 5, PixelDepth::Bit1).unwrap();
        assert!(find_connected_components(&pix, ConnectivityType::EightWay)
            .unwrap()
            .is_empty());
        let gray = Pix::new(5, 5, PixelDepth::Bit8).unwrap();
        assert!(find_connected_components(&gray, ConnectivityType::EightWay).is_err());
    }
}
