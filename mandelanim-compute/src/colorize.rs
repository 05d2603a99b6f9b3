/// Map an escape count to an RGBA pixel.
///
/// Points that never escaped are black. Others spread the normalised count
/// over the low 24 bits: red is the low byte, green the next, blue the third.
pub fn map_color(count: u32, max_iterations: u32) -> [u8; 4] {
    if count >= max_iterations {
        return [0, 0, 0, 255];
    }
    let rgb = (count as f64 * 65535.0 / max_iterations as f64 * 255.0) as u32;
    [
        (rgb & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        ((rgb >> 16) & 0xff) as u8,
        255,
    ]
}
