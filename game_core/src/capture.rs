//! Visual capture of the court as a downscaled grayscale grid.

use crate::{Body, CaptureError, Frame, MatchEngine, Side};

/// Collaborator that turns the current court into a frame
pub trait FrameCapture {
    fn capture_frame(&mut self, engine: &MatchEngine, downscale: u32)
        -> Result<Frame, CaptureError>;
}

/// Software renderer for a virtual canvas.
///
/// Objects are drawn as filled rectangles; a cell's intensity is the share
/// of its area covered by objects.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    pub width: u32,
    pub height: u32,
}

impl Rasterizer {
    pub const DEFAULT_WIDTH: u32 = 240;
    pub const DEFAULT_HEIGHT: u32 = 180;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Grid dimensions for a downscale factor
    pub fn grid_size(&self, downscale: u32) -> Result<(usize, usize), CaptureError> {
        if downscale == 0 {
            return Err(CaptureError::ZeroDownscale);
        }
        let cols = (self.width / downscale) as usize;
        let rows = (self.height / downscale) as usize;
        if cols == 0 || rows == 0 {
            return Err(CaptureError::EmptyGrid {
                width: self.width,
                height: self.height,
                downscale,
            });
        }
        Ok((cols, rows))
    }

    pub fn render(&self, bodies: &[Body], downscale: u32) -> Result<Frame, CaptureError> {
        let (cols, rows) = self.grid_size(downscale)?;
        let mut frame = Frame::zeros(cols, rows);
        let cell_w = 1.0 / cols as f32;
        let cell_h = 1.0 / rows as f32;
        let cell_area = cell_w * cell_h;

        for body in bodies {
            let half = body.half_size();
            let (x0, x1) = (body.pos.x - half.x, body.pos.x + half.x);
            let (y0, y1) = (body.pos.y - half.y, body.pos.y + half.y);

            let first_col = ((x0 / cell_w).floor().max(0.0)) as usize;
            let last_col = ((x1 / cell_w).ceil().max(0.0) as usize).min(cols);
            let first_row = ((y0 / cell_h).floor().max(0.0)) as usize;
            let last_row = ((y1 / cell_h).ceil().max(0.0) as usize).min(rows);

            for row in first_row..last_row {
                let cy0 = row as f32 * cell_h;
                let overlap_h = (y1.min(cy0 + cell_h) - y0.max(cy0)).max(0.0);
                for col in first_col..last_col {
                    let cx0 = col as f32 * cell_w;
                    let overlap_w = (x1.min(cx0 + cell_w) - x0.max(cx0)).max(0.0);
                    let cell = &mut frame.data[row * cols + col];
                    *cell = (*cell + overlap_w * overlap_h / cell_area).min(1.0);
                }
            }
        }

        Ok(frame)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl FrameCapture for Rasterizer {
    fn capture_frame(
        &mut self,
        engine: &MatchEngine,
        downscale: u32,
    ) -> Result<Frame, CaptureError> {
        let bodies = [
            engine.ball(),
            engine.paddle(Side::Left),
            engine.paddle(Side::Right),
        ];
        self.render(&bodies, downscale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use glam::Vec2;

    #[test]
    fn test_grid_size() {
        let rasterizer = Rasterizer::default();
        assert_eq!(rasterizer.grid_size(10), Ok((24, 18)));
        assert_eq!(rasterizer.grid_size(0), Err(CaptureError::ZeroDownscale));
        assert!(matches!(
            rasterizer.grid_size(500),
            Err(CaptureError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_cell_fully_covered() {
        let rasterizer = Rasterizer::new(4, 4);
        // One body exactly covering the top-left cell of a 2x2 grid
        let body = Body::new(Vec2::new(0.25, 0.25), Vec2::new(0.5, 0.5), 0.0);
        let frame = rasterizer.render(&[body], 2).unwrap();
        assert_eq!(frame.width, 2);
        assert!((frame.get(0, 0).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(frame.get(1, 0), Some(0.0));
        assert_eq!(frame.get(0, 1), Some(0.0));
    }

    #[test]
    fn test_partial_coverage() {
        let rasterizer = Rasterizer::new(4, 4);
        // Quarter of the bottom-right cell
        let body = Body::new(Vec2::new(0.625, 0.625), Vec2::new(0.25, 0.25), 0.0);
        let frame = rasterizer.render(&[body], 2).unwrap();
        assert!((frame.get(1, 1).unwrap() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_capture_draws_ball_and_paddles() {
        let engine = MatchEngine::new(Config::new(), 9).unwrap();
        let frame = Rasterizer::default().capture_frame(&engine, 10).unwrap();
        assert_eq!((frame.width, frame.height), (24, 18));
        assert!(frame.data.iter().all(|v| (0.0..=1.0).contains(v)));

        // Ball in the middle, paddles on the edge columns
        assert!(frame.get(12, 9) > Some(0.0) || frame.get(11, 8) > Some(0.0));
        assert!(frame.get(0, 9) > Some(0.0), "Left paddle is visible");
        assert!(frame.get(23, 9) > Some(0.0), "Right paddle is visible");
    }
}
