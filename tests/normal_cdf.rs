use neuralsync::normal::{normal_cdf, percentile};
use statrs::function::erf::erf;

fn exact_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

#[test]
fn approximation_tracks_exact_cdf() {
    let mut z = -6.0;
    while z <= 6.0 {
        let err = (normal_cdf(z) - exact_cdf(z)).abs();
        assert!(err < 1e-7, "z = {z}, err = {err}");
        z += 0.05;
    }
}

#[test]
fn percentiles_are_monotone_and_bounded() {
    let mut last = 0;
    for score in 40..=160 {
        let p = percentile(f64::from(score));
        assert!((1..=99).contains(&p));
        assert!(p >= last);
        last = p;
    }
    assert_eq!(percentile(100.0), 50);
}
