/*
4-Point Hermite Interpolation
=============================

Resampling reads the slice at fractional positions. Between two stored
samples x0 and x1 we fit a cubic using one neighbour on each side:

    xm1 ---- x0 ~~~~ x1 ---- x2
             |<- f ->|
             0       1

The tangent at each knot is half the difference of its neighbours
(Catmull-Rom), which keeps the curve C1-continuous from one sample pair
to the next. At f = 0 the result is exactly x0, at f = 1 exactly x1.
*/

/// Third-order Hermite interpolation between `x0` (f = 0) and `x1` (f = 1).
#[inline]
pub fn hermite(xm1: f32, x0: f32, x1: f32, x2: f32, frac: f32) -> f32 {
    let c = (x1 - xm1) * 0.5;
    let v = x0 - x1;
    let w = c + v;
    let a = w + v + (x2 - x0) * 0.5;
    let b_neg = w + a;
    ((a * frac - b_neg) * frac + c) * frac + x0
}

/// Interpolate a `[xm1, x0, x1, x2]` window.
#[inline]
pub fn hermite4(window: [f32; 4], frac: f32) -> f32 {
    let [xm1, x0, x1, x2] = window;
    hermite(xm1, x0, x1, x2, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_at_knots() {
        let window = [0.3, -0.7, 0.25, 0.9];
        assert_eq!(hermite4(window, 0.0), -0.7);
        assert!((hermite4(window, 1.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_reproduces_linear_ramp() {
        let window = [0.0, 1.0, 2.0, 3.0];
        for step in 0..=10 {
            let frac = step as f32 / 10.0;
            let value = hermite4(window, frac);
            assert!((value - (1.0 + frac)).abs() < 1e-5, "frac {}: {}", frac, value);
        }
    }

    #[test]
    fn test_constant_stays_constant() {
        let value = hermite(0.5, 0.5, 0.5, 0.5, 0.37);
        assert!((value - 0.5).abs() < 1e-6);
    }
}
