//! Pan/zoom camera for the grid canvas plus the column extrusion scale.

use crate::model::MAX_DEPTH;

pub const TILE_PX: f64 = 32.0;
/// Height, in tiles, of a column at full elevation.
pub const EXTRUDE_TILES: f64 = 1.5;
const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 6.0;
/// Pointer travel (px) below which a press-release counts as a click.
pub const CLICK_SLOP_PX: f64 = 4.0;

pub fn column_height(elevation: f64) -> f64 {
    (elevation / MAX_DEPTH).clamp(0.0, 1.0) * EXTRUDE_TILES
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub zoom: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub panning: bool,
    pub last_x: f64,
    pub last_y: f64,
    /// Total pointer travel since the last press.
    pub drag_px: f64,
    pub initialized: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
            drag_px: 0.0,
            initialized: false,
        }
    }
}

impl Camera {
    pub fn scale_px(&self) -> f64 {
        self.zoom * TILE_PX
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let s = self.scale_px();
        ((x - self.offset_x) / s, (y - self.offset_y) / s)
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        let s = self.scale_px();
        (wx * s + self.offset_x, wy * s + self.offset_y)
    }

    /// Zooms by `factor`, keeping the world point under `(x, y)` fixed on screen.
    pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
        let (wx, wy) = self.screen_to_world(x, y);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let s = self.scale_px();
        self.offset_x = x - wx * s;
        self.offset_y = y - wy * s;
    }

    pub fn center_on(&mut self, wx: f64, wy: f64, view_w: f64, view_h: f64) {
        let s = self.scale_px();
        self.offset_x = view_w * 0.5 - wx * s;
        self.offset_y = view_h * 0.5 - wy * s;
    }

    /// Fits a `(min_row, max_row, min_col, max_col)` extent into the view and centres it.
    pub fn fit(&mut self, extent: (i32, i32, i32, i32), view_w: f64, view_h: f64) {
        let (r0, r1, c0, c1) = extent;
        let cols = (c1 - c0 + 1) as f64;
        let rows = (r1 - r0 + 1) as f64 + EXTRUDE_TILES;
        let zoom = ((view_w / cols).min(view_h / rows) * 0.9 / TILE_PX).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom = zoom;
        let cx = c0 as f64 + cols * 0.5;
        let cy = r0 as f64 - EXTRUDE_TILES + rows * 0.5;
        self.center_on(cx, cy, view_w, view_h);
        self.initialized = true;
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.panning = true;
        self.last_x = x;
        self.last_y = y;
        self.drag_px = 0.0;
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        let dx = x - self.last_x;
        let dy = y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        self.offset_x += dx;
        self.offset_y += dy;
        self.drag_px += (dx * dx + dy * dy).sqrt();
    }

    /// Ends a drag; true when the pointer barely moved, i.e. the press was a click.
    pub fn end_drag(&mut self) -> bool {
        let was_click = self.panning && self.drag_px < CLICK_SLOP_PX;
        self.panning = false;
        was_click
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn screen_world_round_trip() {
        let cam = Camera { zoom: 2.0, offset_x: 10.0, offset_y: -4.0, ..Camera::default() };
        let (wx, wy) = cam.screen_to_world(138.0, 60.0);
        assert!(approx(wx, 2.0) && approx(wy, 1.0));
        let (sx, sy) = cam.world_to_screen(wx, wy);
        assert!(approx(sx, 138.0) && approx(sy, 60.0));
    }

    #[test]
    fn zoom_keeps_anchor_fixed() {
        let mut cam = Camera::default();
        let before = cam.screen_to_world(200.0, 150.0);
        cam.zoom_at(200.0, 150.0, 1.5);
        let after = cam.screen_to_world(200.0, 150.0);
        assert!(approx(before.0, after.0) && approx(before.1, after.1));
        cam.zoom_at(0.0, 0.0, 1000.0);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn small_moves_are_clicks() {
        let mut cam = Camera::default();
        cam.begin_drag(0.0, 0.0);
        cam.drag_to(1.0, 1.0);
        assert!(cam.end_drag());
        cam.begin_drag(0.0, 0.0);
        cam.drag_to(30.0, 0.0);
        assert!(!cam.end_drag());
        assert!(!cam.end_drag());
    }

    #[test]
    fn column_height_is_clamped() {
        assert_eq!(column_height(MAX_DEPTH), EXTRUDE_TILES);
        assert_eq!(column_height(-200.0), 0.0);
        assert_eq!(column_height(MAX_DEPTH * 0.5), EXTRUDE_TILES * 0.5);
    }
}
