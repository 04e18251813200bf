use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::Playfield;
use crate::geometry::Rect;

use super::Viewport;

const CLEAR_COLOR: [u8; 4] = [16, 18, 24, 255];
const REGION_COLOR: [u8; 4] = [35, 39, 46, 255];
const REGION_EDGE_COLOR: [u8; 4] = [52, 58, 70, 255];
const BOX_COLOR: [u8; 4] = [80, 220, 255, 255];
const FOOTPRINT_COLOR: [u8; 4] = [220, 220, 240, 255];

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_playfield(&mut self, playfield: &Playfield) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let viewport = self.viewport;
        let camera = playfield.camera();
        let entity = playfield.entity();
        let frame = self.pixels.frame_mut();

        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CLEAR_COLOR);
        }

        let region = to_camera_space(entity.containment(), &camera);
        fill_rect_clipped(frame, viewport, region, REGION_COLOR);
        outline_rect_clipped(frame, viewport, region, REGION_EDGE_COLOR);

        for bounds in entity.box_bounds() {
            fill_rect_clipped(frame, viewport, to_camera_space(*bounds, &camera), BOX_COLOR);
        }

        let origin = entity.screen_position(&camera);
        let extent = entity.extent();
        let footprint = Rect::new(origin.x, origin.y, extent.width, extent.height);
        outline_rect_clipped(frame, viewport, footprint, FOOTPRINT_COLOR);

        self.pixels.render()
    }
}

fn to_camera_space(rect: Rect, camera: &Rect) -> Rect {
    rect.translated(camera.x.saturating_neg(), camera.y.saturating_neg())
}

fn fill_rect_clipped(frame: &mut [u8], viewport: Viewport, rect: Rect, color: [u8; 4]) {
    let Some((left, top, right, bottom)) = clip_to_viewport(rect, viewport) else {
        return;
    };
    let width = viewport.width as usize;
    for y in top..bottom {
        for x in left..right {
            write_pixel(frame, width, x, y, color);
        }
    }
}

fn outline_rect_clipped(frame: &mut [u8], viewport: Viewport, rect: Rect, color: [u8; 4]) {
    if rect.width <= 0 || rect.height <= 0 {
        return;
    }
    let edges = [
        Rect::new(rect.x, rect.y, rect.width, 1),
        Rect::new(rect.x, rect.y.saturating_add(rect.height - 1), rect.width, 1),
        Rect::new(rect.x, rect.y, 1, rect.height),
        Rect::new(rect.x.saturating_add(rect.width - 1), rect.y, 1, rect.height),
    ];
    for edge in edges {
        fill_rect_clipped(frame, viewport, edge, color);
    }
}

/// Half-open pixel bounds of `rect` inside the viewport, or `None` when
/// nothing is visible.
fn clip_to_viewport(rect: Rect, viewport: Viewport) -> Option<(usize, usize, usize, usize)> {
    let left = rect.left().max(0);
    let top = rect.top().max(0);
    let right = rect.right().min(i64::from(viewport.width));
    let bottom = rect.bottom().min(i64::from(viewport.height));
    if left >= right || top >= bottom {
        return None;
    }
    Some((
        left as usize,
        top as usize,
        right as usize,
        bottom as usize,
    ))
}

fn write_pixel(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(byte_offset) = y
        .checked_mul(width)
        .and_then(|row| row.checked_add(x))
        .and_then(|pixel| pixel.checked_mul(4))
    else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}
