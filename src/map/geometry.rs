use crate::canvas::{Canvas, Rgba};

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Snap a pixel-space coordinate to its containing pixel
#[inline(always)]
fn snap(v: f64) -> i32 {
    v.floor() as i32
}

/// Stroke straight segments between consecutive points
pub fn draw_polyline(canvas: &mut Canvas, points: &[(f64, f64)], color: Rgba) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(canvas, snap(x0), snap(y0), snap(x1), snap(y1), color);
    }
}

/// Fill a polygon using scanline algorithm (even-odd, sampled at pixel centers).
/// The polygon is implicitly closed.
pub fn fill_polygon(canvas: &mut Canvas, vertices: &[(f64, f64)], color: Rgba) {
    fill_rings(canvas, &[vertices], color);
}

/// Fill several implicitly closed rings together under the even-odd rule,
/// so a ring nested in another punches a hole in it.
pub fn fill_rings<R: AsRef<[(f64, f64)]>>(canvas: &mut Canvas, rings: &[R], color: Rgba) {
    let rings: Vec<&[(f64, f64)]> = rings
        .iter()
        .map(|r| r.as_ref())
        .filter(|r| r.len() >= 3)
        .collect();
    if rings.is_empty() {
        return;
    }

    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;
    for &(_, y) in rings.iter().copied().flatten() {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let min_y = snap(min_y).max(0);
    let max_y = snap(max_y).min(canvas.size() as i32 - 1);

    let mut intersections: Vec<f64> = Vec::new();

    for y in min_y..=max_y {
        intersections.clear();
        let yf = y as f64 + 0.5;

        for ring in &rings {
            let n = ring.len();
            for i in 0..n {
                let (x1, y1) = ring[i];
                let (x2, y2) = ring[(i + 1) % n];

                if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                    intersections.push(x1 + (yf - y1) / (y2 - y1) * (x2 - x1));
                }
            }
        }

        intersections.sort_unstable_by(f64::total_cmp);
        for pair in intersections.chunks_exact(2) {
            // Pixels whose centers fall inside [x0, x1]
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            if x0 <= x1 {
                canvas.hline(x0, x1, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Rgba = [0, 0, 0, 255];
    const INK: Rgba = [255, 255, 255, 255];

    #[test]
    fn test_horizontal_line() {
        let mut canvas = Canvas::new(10, BG);
        draw_line(&mut canvas, 0, 0, 9, 0, INK);
        assert_eq!(10, canvas.count_not(BG));
        assert_eq!(Some(INK), canvas.pixel(9, 0));
    }

    #[test]
    fn test_diagonal_line_is_symmetric() {
        let mut forward = Canvas::new(8, BG);
        let mut backward = Canvas::new(8, BG);
        draw_line(&mut forward, 0, 0, 7, 7, INK);
        draw_line(&mut backward, 7, 7, 0, 0, INK);
        assert_eq!(forward, backward);
        assert_eq!(8, forward.count_not(BG));
    }

    #[test]
    fn test_line_partly_off_canvas() {
        let mut canvas = Canvas::new(4, BG);
        draw_line(&mut canvas, -5, 1, 10, 1, INK);
        assert_eq!(4, canvas.count_not(BG));
    }

    #[test]
    fn test_polyline_strokes_each_segment() {
        let mut canvas = Canvas::new(10, BG);
        draw_polyline(&mut canvas, &[(0.5, 0.5), (5.5, 0.5), (5.5, 5.5)], INK);
        assert_eq!(Some(INK), canvas.pixel(3, 0));
        assert_eq!(Some(INK), canvas.pixel(5, 3));
        assert_eq!(11, canvas.count_not(BG));
    }

    #[test]
    fn test_fill_square() {
        let mut canvas = Canvas::new(10, BG);
        fill_polygon(&mut canvas, &[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)], INK);
        assert_eq!(16, canvas.count_not(BG));
        assert_eq!(Some(INK), canvas.pixel(2, 2));
        assert_eq!(Some(INK), canvas.pixel(5, 5));
        assert_eq!(Some(BG), canvas.pixel(6, 6));
    }

    #[test]
    fn test_fill_ignores_degenerate_polygons() {
        let mut canvas = Canvas::new(10, BG);
        fill_polygon(&mut canvas, &[(1.0, 1.0), (8.0, 8.0)], INK);
        assert_eq!(0, canvas.count_not(BG));
    }

    #[test]
    fn test_nested_ring_leaves_a_hole() {
        let mut canvas = Canvas::new(10, BG);
        let outer = vec![(1.0, 1.0), (9.0, 1.0), (9.0, 9.0), (1.0, 9.0)];
        let inner = vec![(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)];
        fill_rings(&mut canvas, &[outer, inner], INK);
        assert_eq!(64 - 16, canvas.count_not(BG));
        assert_eq!(Some(INK), canvas.pixel(1, 1));
        assert_eq!(Some(BG), canvas.pixel(5, 5));
    }
}
