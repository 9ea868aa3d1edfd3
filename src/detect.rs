//! Mask region detection
//!
//! Turns a color-coded mask raster into sprite rectangles with a
//! connected-component pass over the 4-connected pixel grid. The pixel at
//! (0, 0) defines the background color; every other color blob becomes one
//! region, and blobs of different colors stay separate even when they touch.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use image::RgbaImage;

use crate::error::{AtlasError, Result};
use crate::model::Rect;

/// Per-channel absolute difference below which two colors count as equal.
pub const TOLERANCE: u8 = 5;

/// Borrowed row-major RGBA raster, 4 bytes per pixel.
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AtlasError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(image: &'a RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, index: usize) -> [u8; 4] {
        let offset = index * 4;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}

fn same_color(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(&a, &b)| a.abs_diff(b) < TOLERANCE)
}

/// Extracts one rectangle per same-colored, non-background region.
///
/// With `include_border == false` each box is shrunk by one pixel per side,
/// treating the outer ring of a drawn marker as its stroke. Regions that end
/// up with no width or height are dropped. Rects come out in the row-major
/// order of their first pixel, named `sprite_0`, `sprite_1`, ...
pub fn detect(buffer: &PixelBuffer<'_>, include_border: bool) -> Vec<Rect> {
    let (w, h) = (buffer.width as usize, buffer.height as usize);
    let mut rects = Vec::new();
    if w == 0 || h == 0 {
        return rects;
    }

    let background = buffer.pixel(0);
    let mut visited = vec![false; w * h];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..h {
        for x in 0..w {
            let id = y * w + x;
            if visited[id] {
                continue;
            }
            let seed = buffer.pixel(id);
            visited[id] = true;
            if same_color(seed, background) {
                continue;
            }

            let (mut min_x, mut max_x, mut min_y, mut max_y) = (x, x, y, y);
            stack.push((x, y));

            while let Some((px, py)) = stack.pop() {
                min_x = min_x.min(px);
                max_x = max_x.max(px);
                min_y = min_y.min(py);
                max_y = max_y.max(py);

                let neighbors = [
                    (px + 1 < w).then(|| (px + 1, py)),
                    px.checked_sub(1).map(|nx| (nx, py)),
                    (py + 1 < h).then(|| (px, py + 1)),
                    py.checked_sub(1).map(|ny| (px, ny)),
                ];
                for (nx, ny) in neighbors.into_iter().flatten() {
                    let nid = ny * w + nx;
                    if visited[nid] {
                        continue;
                    }
                    let color = buffer.pixel(nid);
                    if same_color(color, background) || !same_color(color, seed) {
                        continue;
                    }
                    visited[nid] = true;
                    stack.push((nx, ny));
                }
            }

            let (mut rx, mut ry) = (min_x as i64, min_y as i64);
            let (mut rw, mut rh) = ((max_x - min_x + 1) as i64, (max_y - min_y + 1) as i64);
            if !include_border {
                rx += 1;
                ry += 1;
                rw -= 2;
                rh -= 2;
            }
            if rw <= 0 || rh <= 0 {
                continue;
            }

            let name = format!("sprite_{}", rects.len());
            rects.push(Rect::new(rx as u32, ry as u32, rw as u32, rh as u32, name));
        }
    }

    rects
}

/// Runs [`detect`] over a decoded image and logs how long it took.
pub fn detect_image(image: &RgbaImage, include_border: bool) -> Vec<Rect> {
    let started = Instant::now();
    let rects = detect(&PixelBuffer::from_image(image), include_border);
    log::debug!(
        "Detected {} regions in {}x{} mask in {:?}",
        rects.len(),
        image.width(),
        image.height(),
        started.elapsed()
    );
    rects
}

/// Outcome of polling a [`DetectionJob`].
#[derive(Debug)]
pub enum DetectionPoll {
    Pending,
    Finished { mask: RgbaImage, rects: Vec<Rect> },
    /// The worker thread died without sending a result.
    Lost,
}

/// Detection running on a background thread.
///
/// The job owns its mask; dropping the job before it finishes discards the
/// result.
#[derive(Debug)]
pub struct DetectionJob {
    receiver: Receiver<(RgbaImage, Vec<Rect>)>,
}

impl DetectionJob {
    pub fn spawn(mask: RgbaImage, include_border: bool) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let rects = detect_image(&mask, include_border);
            // Receiver gone means the job was cancelled.
            let _ = sender.send((mask, rects));
        });
        Self { receiver }
    }

    /// Checks for a result without blocking.
    pub fn poll(&self) -> DetectionPoll {
        match self.receiver.try_recv() {
            Ok((mask, rects)) => DetectionPoll::Finished { mask, rects },
            Err(TryRecvError::Empty) => DetectionPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                log::warn!("Detection thread exited without a result");
                DetectionPoll::Lost
            }
        }
    }

    /// Blocks until detection is done.
    pub fn wait(self) -> Option<(RgbaImage, Vec<Rect>)> {
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn fill(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, color);
            }
        }
    }

    fn bounds(rects: &[Rect]) -> Vec<(u32, u32, u32, u32)> {
        rects.iter().map(|r| (r.x, r.y, r.w, r.h)).collect()
    }

    #[test]
    fn single_pixel_marker() {
        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        img.put_pixel(1, 1, RED);

        let with_border = detect_image(&img, true);
        assert_eq!(bounds(&with_border), vec![(1, 1, 1, 1)]);
        assert_eq!(with_border[0].name, "sprite_0");
        assert_eq!(with_border[0].group, "default");

        assert!(detect_image(&img, false).is_empty());
    }

    #[test]
    fn all_background_yields_nothing() {
        let img = RgbaImage::from_pixel(8, 8, WHITE);
        assert!(detect_image(&img, true).is_empty());
        assert!(detect_image(&img, false).is_empty());
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let buffer = PixelBuffer::new(0, 0, &[]).unwrap();
        assert!(detect(&buffer, true).is_empty());
    }

    #[test]
    fn buffer_length_is_checked() {
        let data = [0u8; 15];
        assert!(matches!(
            PixelBuffer::new(2, 2, &data),
            Err(AtlasError::BufferSize {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn touching_blobs_of_different_colors_stay_separate() {
        let mut img = RgbaImage::from_pixel(10, 6, WHITE);
        fill(&mut img, 1, 1, 4, 4, RED);
        fill(&mut img, 5, 1, 3, 4, BLUE);

        let rects = detect_image(&img, true);
        assert_eq!(bounds(&rects), vec![(1, 1, 4, 4), (5, 1, 3, 4)]);
        assert_eq!(rects[1].name, "sprite_1");
    }

    #[test]
    fn border_shrinks_by_one_pixel_per_side() {
        let mut img = RgbaImage::from_pixel(16, 16, WHITE);
        fill(&mut img, 2, 3, 5, 4, RED);
        fill(&mut img, 10, 10, 2, 5, BLUE);

        let raw = detect_image(&img, true);
        let shrunk = detect_image(&img, false);
        assert_eq!(bounds(&raw), vec![(2, 3, 5, 4), (10, 10, 2, 5)]);
        // The 2-wide blue blob collapses to zero width and is dropped.
        assert_eq!(bounds(&shrunk), vec![(3, 4, 3, 2)]);
    }

    #[test]
    fn near_colors_within_tolerance_merge() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([252, 253, 255, 255]));
        img.put_pixel(0, 0, WHITE);
        fill(&mut img, 2, 2, 2, 2, RED);
        img.put_pixel(4, 2, Rgba([251, 3, 1, 255]));

        let rects = detect_image(&img, true);
        assert_eq!(bounds(&rects), vec![(2, 2, 3, 2)]);
    }

    #[test]
    fn difference_of_exactly_tolerance_is_a_new_color() {
        let gray = |v: u8| Rgba([v, v, v, 255]);
        let mut img = RgbaImage::from_pixel(6, 3, WHITE);
        img.put_pixel(1, 1, gray(100));
        img.put_pixel(2, 1, Rgba([100 + TOLERANCE, 100, 100, 255]));
        img.put_pixel(4, 1, Rgba([255 - TOLERANCE, 255, 255, 255]));

        let rects = detect_image(&img, true);
        assert_eq!(
            bounds(&rects),
            vec![(1, 1, 1, 1), (2, 1, 1, 1), (4, 1, 1, 1)]
        );
    }

    #[test]
    fn colors_are_matched_against_the_seed() {
        let gray = |v: u8| Rgba([v, v, v, 255]);
        let mut img = RgbaImage::from_pixel(5, 3, WHITE);
        img.put_pixel(1, 1, gray(100));
        img.put_pixel(2, 1, gray(104));
        img.put_pixel(3, 1, gray(108));

        let rects = detect_image(&img, true);
        assert_eq!(bounds(&rects), vec![(1, 1, 2, 1), (3, 1, 1, 1)]);
    }

    #[test]
    fn alpha_counts_toward_background_matching() {
        let mut img = RgbaImage::from_pixel(5, 5, WHITE);
        img.put_pixel(2, 2, Rgba([255, 255, 255, 0]));

        let rects = detect_image(&img, true);
        assert_eq!(bounds(&rects), vec![(2, 2, 1, 1)]);
    }

    #[test]
    fn corner_pixel_decides_the_background() {
        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        img.put_pixel(0, 0, RED);

        assert_eq!(bounds(&detect_image(&img, true)), vec![(0, 0, 4, 4)]);
        assert_eq!(bounds(&detect_image(&img, false)), vec![(1, 1, 2, 2)]);
    }

    #[test]
    fn regions_come_out_in_scan_order() {
        let mut img = RgbaImage::from_pixel(12, 12, WHITE);
        fill(&mut img, 8, 1, 2, 2, RED);
        fill(&mut img, 1, 5, 2, 2, BLUE);
        fill(&mut img, 1, 1, 2, 2, BLUE);

        let rects = detect_image(&img, true);
        assert_eq!(bounds(&rects), vec![(1, 1, 2, 2), (8, 1, 2, 2), (1, 5, 2, 2)]);
        let names: Vec<&str> = rects.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sprite_0", "sprite_1", "sprite_2"]);
    }

    #[test]
    fn edge_touching_regions_are_kept() {
        let mut img = RgbaImage::from_pixel(6, 6, WHITE);
        fill(&mut img, 3, 0, 3, 6, RED);
        assert_eq!(bounds(&detect_image(&img, true)), vec![(3, 0, 3, 6)]);
    }

    #[test]
    fn detection_is_repeatable() {
        let mut img = RgbaImage::from_pixel(20, 20, WHITE);
        fill(&mut img, 1, 1, 6, 6, RED);
        fill(&mut img, 7, 1, 6, 6, BLUE);
        fill(&mut img, 3, 10, 12, 8, RED);

        for include_border in [true, false] {
            let first = detect_image(&img, include_border);
            let second = detect_image(&img, include_border);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn large_region_does_not_overflow_the_stack() {
        let mut img = RgbaImage::from_pixel(512, 512, WHITE);
        fill(&mut img, 1, 1, 510, 510, RED);
        assert_eq!(bounds(&detect_image(&img, false)), vec![(2, 2, 508, 508)]);
    }

    #[test]
    fn background_job_returns_mask_and_rects() {
        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        img.put_pixel(2, 2, RED);
        let job = DetectionJob::spawn(img.clone(), true);
        let (mask, rects) = loop {
            match job.poll() {
                DetectionPoll::Pending => thread::yield_now(),
                DetectionPoll::Finished { mask, rects } => break (mask, rects),
                DetectionPoll::Lost => panic!("detection thread died"),
            }
        };
        assert_eq!(mask, img);
        assert_eq!(bounds(&rects), vec![(2, 2, 1, 1)]);

        let (_, rects) = DetectionJob::spawn(img, false).wait().unwrap();
        assert!(rects.is_empty());
    }
}
