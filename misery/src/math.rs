use num_traits::{Float, FromPrimitive};

/// Returns `start, start + step, ...` for all values below `stop`.
pub fn arange<T>(start: T, stop: T, step: T) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let n = ((stop - start) / step).ceil().to_usize().unwrap_or(0);
    (0..n).map(move |i| start + T::from_usize(i).unwrap() * step)
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be increasing. Returns `left` below `xp[0]` and `right`
/// above the last element of `xp`. A NaN `x` is returned as is.
pub fn interp<T: Float>(x: T, xp: &[T], fp: &[T], left: T, right: T) -> T {
    debug_assert_eq!(xp.len(), fp.len());
    if x.is_nan() {
        return x;
    }
    match (xp.first(), xp.last()) {
        (Some(&first), Some(&last)) => {
            if x < first {
                left
            } else if x > last {
                right
            } else if x == last {
                fp[fp.len() - 1]
            } else {
                // x in [xp[j], xp[j + 1])
                let j = xp.partition_point(|&v| v <= x) - 1;
                let (x0, x1) = (xp[j], xp[j + 1]);
                if x1 == x0 {
                    fp[j]
                } else {
                    fp[j] + (fp[j + 1] - fp[j]) * (x - x0) / (x1 - x0)
                }
            }
        }
        _ => left,
    }
}

/// Returns -1, 0 or 1.
pub(crate) fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
