use crate::core::pipeline::Interpolatable;

/// Linear interpolation `a + (b - a) * t`, written as a weighted sum so it only
/// needs the `Add + Mul<f32>` operations of [`Interpolatable`].
#[inline(always)]
pub fn lerp<V: Interpolatable>(a: V, b: V, t: f32) -> V {
    a * (1.0 - t) + b * t
}

/// Average of two values. Used for flat-shaded lines.
#[inline(always)]
pub fn average2<V: Interpolatable>(a: V, b: V) -> V {
    (a + b) * 0.5
}

/// Average of three values. Used for flat-shaded triangles.
#[inline(always)]
pub fn average3<V: Interpolatable>(a: V, b: V, c: V) -> V {
    (a + b + c) * (1.0 / 3.0)
}

/// Fractional progress of `current` along the integer interval `[start, end]`.
///
/// Returns 0.0 for an empty interval so degenerate edges reuse their first value.
#[inline]
pub fn progress(start: i32, end: i32, current: i32) -> f32 {
    let span = end - start;
    if span == 0 {
        0.0
    } else {
        (current - start) as f32 / span as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vector3::new(0.0_f32, 2.0, 4.0);
        let b = Vector3::new(2.0_f32, 4.0, 8.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert!((lerp(a, b, 1.0) - b).norm() < 1e-6);
        assert!((lerp(a, b, 0.5) - average2(a, b)).norm() < 1e-6);
    }

    #[test]
    fn average3_is_centroid() {
        let c = average3(3.0_f32, 6.0, 9.0);
        assert!((c - 6.0).abs() < 1e-6);
    }

    #[test]
    fn progress_handles_reverse_and_empty_intervals() {
        assert_eq!(progress(10, 0, 5), 0.5);
        assert_eq!(progress(3, 3, 3), 0.0);
        assert_eq!(progress(0, 4, 1), 0.25);
    }
}
