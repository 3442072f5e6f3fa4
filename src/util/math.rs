//! Numeric helpers for window sampling and box rescaling.

/// Rounds to the nearest integer, resolving `.5` ties to the even neighbor.
pub(crate) fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Returns `num` evenly spaced samples over `[start, stop]`, both inclusive.
///
/// Sample `i` is `start + i * step` with `step = (stop - start) / (num - 1)`;
/// the last sample is pinned to `stop` exactly. A single sample yields `start`.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            out[num - 1] = stop;
            out
        }
    }
}

/// Output size after scaling `len` by `scale`, rounded and kept at least 1.
pub(crate) fn scaled_len(len: u32, scale: f64) -> u32 {
    let scaled = (f64::from(len) * scale).round();
    if scaled < 1.0 {
        1
    } else if scaled > f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Maps a coordinate from a scaled frame back to the original frame,
/// truncating toward zero.
pub(crate) fn unscale_coord(value: f32, scale: f64) -> i64 {
    (f64::from(value) / scale) as i64
}
