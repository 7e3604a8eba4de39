// tests/test_magnitude.rs — Property tests for the magnitude kernel.

use gradmag::magnitude::{compute_magnitude, magnitude};
use proptest::prelude::*;

/// Distance in units in the last place between two non-negative finite f32.
fn ulp_distance(a: f32, b: f32) -> u32 {
    (a.to_bits() as i64 - b.to_bits() as i64).unsigned_abs() as u32
}

/// Gradient-like component: exactly zero, or large enough that its square
/// does not underflow.
fn component() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0f32),
        -4080.0f32..-1e-3,
        1e-3f32..4080.0,
    ]
}

fn gradient_pair(max_len: usize) -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (0..max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(component(), n),
            prop::collection::vec(component(), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Matches a plain single-precision reference within one ULP, and the
    /// exact value within f32 rounding error.
    #[test]
    fn matches_reference((gx, gy) in gradient_pair(300)) {
        let mag = magnitude(&gx, &gy).unwrap();
        prop_assert_eq!(mag.len(), gx.len());
        for i in 0..gx.len() {
            let reference = (gx[i] * gx[i] + gy[i] * gy[i]).sqrt();
            prop_assert!(
                ulp_distance(mag[i], reference) <= 1,
                "i={} mag={} reference={}", i, mag[i], reference
            );

            let exact = ((gx[i] as f64).powi(2) + (gy[i] as f64).powi(2)).sqrt();
            let tol = exact * 2.0 * f32::EPSILON as f64;
            prop_assert!(
                (mag[i] as f64 - exact).abs() <= tol,
                "i={} mag={} exact={}", i, mag[i], exact
            );
        }
    }

    #[test]
    fn non_negative_and_zero_only_at_origin((gx, gy) in gradient_pair(300)) {
        let mag = magnitude(&gx, &gy).unwrap();
        for i in 0..gx.len() {
            prop_assert!(mag[i] >= 0.0);
            let at_origin = gx[i] == 0.0 && gy[i] == 0.0;
            prop_assert_eq!(mag[i] == 0.0, at_origin, "i={}", i);
        }
    }

    #[test]
    fn swap_invariant((gx, gy) in gradient_pair(300)) {
        let a = magnitude(&gx, &gy).unwrap();
        let b = magnitude(&gy, &gx).unwrap();
        prop_assert_eq!(a.as_slice(), b.as_slice());
    }

    /// The slice form and the allocating form agree on any prefix.
    #[test]
    fn prefix_agrees((gx, gy) in gradient_pair(200), cut in 0usize..200) {
        let n = cut.min(gx.len());
        let full = magnitude(&gx, &gy).unwrap();
        let mut out = vec![-1.0f32; gx.len()];
        compute_magnitude(&gx, &gy, &mut out, n).unwrap();
        prop_assert_eq!(&out[..n], &full[..n]);
        prop_assert!(out[n..].iter().all(|&v| v == -1.0));
    }
}

#[test]
fn large_buffer_is_uniform() {
    // Replicated-workload scale: every element identical.
    let n = 1 << 20;
    let gx = vec![6.0f32; n];
    let gy = vec![8.0f32; n];
    let mut mag = vec![0.0f32; n];
    compute_magnitude(&gx, &gy, &mut mag, n).unwrap();
    assert!(mag.iter().all(|&v| v == 10.0));
}
