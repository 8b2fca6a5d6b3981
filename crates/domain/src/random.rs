//! Injected randomness.
//!
//! The domain never owns an RNG. Callers pass a closure yielding uniform
//! draws in `[0.0, 1.0)`; the engine backs it with its `RandomPort`, tests
//! back it with fixed sequences.

/// Uniform draw in `[0.0, 1.0)`.
pub type Roll<'a> = &'a mut dyn FnMut() -> f64;

/// Map a uniform draw onto an index in `0..len`.
///
/// Out-of-range draws are clamped so a misbehaving source can never index
/// past the end. `len` must be non-zero.
pub fn pick_index(draw: f64, len: usize) -> usize {
    debug_assert!(len > 0, "pick_index called with empty range");
    let scaled = (draw.clamp(0.0, 1.0) * len as f64) as usize;
    scaled.min(len.saturating_sub(1))
}

/// Fair coin: `true` when the draw lands in the lower half.
pub fn coin_flip(draw: f64) -> bool {
    draw < 0.5
}

/// A closure replaying `draws` in order, then repeating the last one.
#[cfg(test)]
pub(crate) fn sequence(draws: Vec<f64>) -> impl FnMut() -> f64 {
    let mut idx = 0;
    move || {
        let value = draws
            .get(idx)
            .or_else(|| draws.last())
            .copied()
            .unwrap_or(0.99);
        idx += 1;
        value
    }
}
