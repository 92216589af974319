use std::path::Path;

use image::{Rgb, RgbImage};

use crate::dataset::point::Point;
use crate::error::Result;
use crate::heatmap::classify::HeatCell;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const POINT_RADIUS: i64 = 2;

/// Paints the decision regions of `cells` (a `resolution × resolution`
/// grid, ordered by x then y) and overlays the training `points`.
///
/// Cell colors fade towards white as the winning output's magnitude drops.
pub fn render(cells: &[HeatCell], points: &[Point], resolution: usize, pixels: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(pixels, pixels, BACKGROUND);
    if resolution == 0 || pixels == 0 {
        return img;
    }

    for px in 0..pixels {
        for py in 0..pixels {
            let i = (px as usize * resolution) / pixels as usize;
            // Image rows grow downwards, canvas y grows upwards.
            let j = resolution - 1 - (py as usize * resolution) / pixels as usize;
            if let Some(cell) = cells.get(i * resolution + j) {
                if let Some(color) = cell.color() {
                    img.put_pixel(px, py, fade(color.rgb(), cell.value));
                }
            }
        }
    }

    for point in points {
        let cx = to_pixel(point.x, pixels);
        let cy = to_pixel(-point.y, pixels);
        let [r, g, b] = point.color.rgb();
        let outline = Rgb([r / 2, g / 2, b / 2]);
        for dx in -POINT_RADIUS..=POINT_RADIUS {
            for dy in -POINT_RADIUS..=POINT_RADIUS {
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && x < pixels as i64 && y < pixels as i64 {
                    img.put_pixel(x as u32, y as u32, outline);
                }
            }
        }
    }

    img
}

/// Renders and writes a PNG to `path`.
pub fn render_png(
    cells: &[HeatCell],
    points: &[Point],
    resolution: usize,
    pixels: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    render(cells, points, resolution, pixels).save(path)?;
    Ok(())
}

/// Canvas coordinate in `[-1, 1]` to pixel index.
fn to_pixel(v: f64, pixels: u32) -> i64 {
    ((v + 1.0) / 2.0 * pixels as f64).floor() as i64
}

fn fade(rgb: [u8; 3], strength: f64) -> Rgb<u8> {
    let s = strength.clamp(0.0, 1.0) * 0.6 + 0.2;
    let mix = |c: u8| (255.0 - (255.0 - c as f64) * s).round() as u8;
    Rgb([mix(rgb[0]), mix(rgb[1]), mix(rgb[2])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::point::PointColor;

    fn uniform_cells(resolution: usize, label: usize) -> Vec<HeatCell> {
        (0..resolution * resolution)
            .map(|_| HeatCell { x: 0.0, y: 0.0, label, value: 1.0 })
            .collect()
    }

    #[test]
    fn cells_fill_the_canvas() {
        let img = render(&uniform_cells(5, 2), &[], 5, 20);
        assert_eq!(img.dimensions(), (20, 20));
        let expected = fade(PointColor::Red.rgb(), 1.0);
        assert!(img.pixels().all(|p| *p == expected));
    }

    #[test]
    fn points_are_drawn_on_top() {
        let points = [Point { x: 0.0, y: 0.0, color: PointColor::Blue }];
        let img = render(&uniform_cells(5, 0), &points, 5, 40);
        let [r, g, b] = PointColor::Blue.rgb();
        assert_eq!(*img.get_pixel(20, 20), Rgb([r / 2, g / 2, b / 2]));
        assert_ne!(*img.get_pixel(0, 0), Rgb([r / 2, g / 2, b / 2]));
    }

    #[test]
    fn unknown_labels_leave_background() {
        let img = render(&uniform_cells(2, 9), &[], 2, 4);
        assert!(img.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn writes_png() {
        let path = std::env::temp_dir().join(format!("heatmap-{}.png", std::process::id()));
        render_png(&uniform_cells(3, 1), &[], 3, 12, &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 12);
        let _ = std::fs::remove_file(&path);
    }
}
