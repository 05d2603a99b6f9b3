use crate::colorize::map_color;
use mandelanim_core::FrameRequest;

/// Squared bail-out radius.
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Number of pixels evaluated together by the vectorized kernel.
pub const LANES: usize = 4;

/// Escape-time count for a single point using f64 arithmetic.
///
/// Iteration starts at `z = c` and stops once `|z|^2 > 4`.
pub fn escape_count(c_re: f64, c_im: f64, max_iterations: u32) -> u32 {
    let mut z_re = c_re;
    let mut z_im = c_im;

    for count in 0..max_iterations {
        let z_re2 = z_re * z_re;
        let z_im2 = z_im * z_im;
        if z_re2 + z_im2 > ESCAPE_RADIUS_SQ {
            return count;
        }
        let new_im = 2.0 * z_re * z_im;
        z_re = c_re + (z_re2 - z_im2);
        z_im = c_im + new_im;
    }

    max_iterations
}

/// Escape-time counts for four points sharing a real part, in f32 lanes.
///
/// Lanes that escaped are masked out and stop counting; the loop ends as soon
/// as every lane has escaped. Written lane-wise so the compiler can keep the
/// four values in one vector register.
pub fn escape_count_x4(c_re: f32, c_im: [f32; LANES], max_iterations: u32) -> [u32; LANES] {
    let four = ESCAPE_RADIUS_SQ as f32;
    let mut z_re = [c_re; LANES];
    let mut z_im = c_im;
    let mut counts = [0u32; LANES];
    let mut active = [true; LANES];

    for _ in 0..max_iterations {
        let mut any_active = false;
        for lane in 0..LANES {
            let z_re2 = z_re[lane] * z_re[lane];
            let z_im2 = z_im[lane] * z_im[lane];
            active[lane] &= z_re2 + z_im2 <= four;
            if active[lane] {
                any_active = true;
                let new_im = 2.0 * z_re[lane] * z_im[lane];
                z_re[lane] = c_re + (z_re2 - z_im2);
                z_im[lane] = c_im[lane] + new_im;
                counts[lane] += 1;
            }
        }
        if !any_active {
            break;
        }
    }

    counts
}

/// Render a frame into an RGBA buffer.
///
/// The buffer is resized to `width * height * 4` if it does not match.
pub fn render_frame(request: &FrameRequest, buffer: &mut Vec<u8>) {
    let len = request.buffer_len();
    if buffer.len() != len {
        buffer.resize(len, 0);
    }
    if len == 0 {
        return;
    }

    let options = request.render_options;
    let mut target = PixelTarget {
        buffer,
        width: request.width,
        height: request.height,
        block: if options.downscale { 2 } else { 1 },
        max_iterations: options.max_iterations,
    };
    let (width, height) = target.grid_size();

    let (x0, y0) = request.viewport.origin();
    let (xd, yd) = request.viewport.pixel_step(width, height);

    if options.use_vectorized_kernel {
        let max_iterations = options.max_iterations;
        for x in 0..width {
            let xf = (x0 + x as f64 * xd) as f32;
            for y in (0..height).step_by(LANES) {
                let yf = y0 + y as f64 * yd;
                let c_im = [
                    yf as f32,
                    (yf + yd) as f32,
                    (yf + 2.0 * yd) as f32,
                    (yf + 3.0 * yd) as f32,
                ];
                let counts = escape_count_x4(xf, c_im, max_iterations);
                for (lane, count) in counts.into_iter().enumerate() {
                    let py = y + lane as u32;
                    if py < height {
                        target.set(x, py, count);
                    }
                }
            }
        }
    } else {
        for x in 0..width {
            let xf = x0 + x as f64 * xd;
            for y in 0..height {
                let yf = y0 + y as f64 * yd;
                target.set(x, y, escape_count(xf, yf, options.max_iterations));
            }
        }
    }
}

/// Writes computed counts into the output buffer, replicating each value
/// into a `block x block` square when downscaling.
struct PixelTarget<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
    block: u32,
    max_iterations: u32,
}

impl PixelTarget<'_> {
    /// Dimensions of the grid of computed points.
    fn grid_size(&self) -> (u32, u32) {
        (
            self.width.div_ceil(self.block),
            self.height.div_ceil(self.block),
        )
    }

    fn set(&mut self, x: u32, y: u32, count: u32) {
        let rgba = map_color(count, self.max_iterations);
        for j in 0..self.block {
            let py = y * self.block + j;
            if py >= self.height {
                break;
            }
            for i in 0..self.block {
                let px = x * self.block + i;
                if px >= self.width {
                    break;
                }
                let index = 4 * (py as usize * self.width as usize + px as usize);
                self.buffer[index..index + 4].copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelanim_core::{RenderOptions, Viewport};

    fn request(width: u32, height: u32, options: RenderOptions) -> FrameRequest {
        FrameRequest {
            run_id: 1,
            sequence_number: 0,
            width,
            height,
            viewport: Viewport::new(-0.5, 0.0, 1.0),
            render_options: options,
        }
    }

    #[test]
    fn origin_is_in_set() {
        assert_eq!(escape_count(0.0, 0.0, 100), 100);
    }

    #[test]
    fn main_cardioid_point_in_set() {
        assert_eq!(escape_count(-0.5, 0.0, 500), 500);
    }

    #[test]
    fn point_outside_escapes_immediately() {
        // |c|^2 = 9 > 4 before the first iteration
        assert_eq!(escape_count(3.0, 0.0, 100), 0);
    }

    #[test]
    fn point_two_escapes_after_one_iteration() {
        // z0 = 2 (|z|^2 = 4, not > 4), z1 = 4 + 2 = 6
        assert_eq!(escape_count(2.0, 0.0, 100), 1);
    }

    #[test]
    fn vectorized_kernel_matches_scalar_on_simple_points() {
        let counts = escape_count_x4(0.0, [0.0, 3.0, 2.0, -0.5], 100);
        assert_eq!(counts[0], escape_count(0.0, 0.0, 100));
        assert_eq!(counts[1], escape_count(0.0, 3.0, 100));
        assert_eq!(counts[2], escape_count(0.0, 2.0, 100));
        assert_eq!(counts[3], escape_count(0.0, -0.5, 100));
    }

    #[test]
    fn vectorized_kernel_stops_when_all_lanes_escape() {
        assert_eq!(escape_count_x4(5.0, [5.0; LANES], 1_000_000), [0; LANES]);
    }

    #[test]
    fn render_resizes_buffer() {
        let req = request(8, 6, RenderOptions::default());
        let mut buffer = Vec::new();
        render_frame(&req, &mut buffer);
        assert_eq!(buffer.len(), 8 * 6 * 4);
        assert!(buffer.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn vectorized_render_handles_height_not_multiple_of_lanes() {
        let options = RenderOptions {
            use_vectorized_kernel: true,
            ..RenderOptions::default()
        };
        let req = request(5, 7, options);
        let mut buffer = vec![0; req.buffer_len()];
        render_frame(&req, &mut buffer);
        assert_eq!(buffer.len(), 5 * 7 * 4);
        assert!(buffer.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn scalar_and_vectorized_renders_mostly_agree() {
        let scalar = request(30, 20, RenderOptions::default());
        let vector = request(
            30,
            20,
            RenderOptions {
                use_vectorized_kernel: true,
                ..RenderOptions::default()
            },
        );
        let mut a = Vec::new();
        let mut b = Vec::new();
        render_frame(&scalar, &mut a);
        render_frame(&vector, &mut b);

        let differing = a
            .chunks(4)
            .zip(b.chunks(4))
            .filter(|(pa, pb)| pa != pb)
            .count();
        // f32 lanes may disagree on a few boundary pixels.
        assert!(differing < 60, "{differing} pixels differ");
    }

    #[test]
    fn downscale_writes_two_by_two_blocks() {
        let options = RenderOptions {
            downscale: true,
            ..RenderOptions::default()
        };
        let req = request(8, 4, options);
        let mut buffer = Vec::new();
        render_frame(&req, &mut buffer);

        let pixel = |x: usize, y: usize| &buffer[4 * (y * 8 + x)..4 * (y * 8 + x) + 4];
        for by in 0..2 {
            for bx in 0..4 {
                let (x, y) = (bx * 2, by * 2);
                assert_eq!(pixel(x, y), pixel(x + 1, y));
                assert_eq!(pixel(x, y), pixel(x, y + 1));
                assert_eq!(pixel(x, y), pixel(x + 1, y + 1));
            }
        }
    }

    #[test]
    fn downscale_handles_odd_dimensions() {
        let options = RenderOptions {
            downscale: true,
            ..RenderOptions::default()
        };
        let req = request(5, 3, options);
        let mut buffer = Vec::new();
        render_frame(&req, &mut buffer);
        assert_eq!(buffer.len(), 5 * 3 * 4);
        assert!(buffer.chunks(4).all(|px| px[3] == 255));
    }
}
