//! Normal-distribution helpers for standardized scores.

/// Population mean of the standardized IQ/EQ scales.
pub const POPULATION_MEAN: f64 = 100.0;
/// Population standard deviation of the standardized IQ/EQ scales.
pub const POPULATION_SD: f64 = 15.0;

/// Standard normal CDF, Zelen & Severo (Abramowitz & Stegun 26.2.17).
///
/// Absolute error below 7.5e-8.
pub fn normal_cdf(z: f64) -> f64 {
    const P: f64 = 0.231_641_9;
    const B1: f64 = 0.319_381_530;
    const B2: f64 = -0.356_563_782;
    const B3: f64 = 1.781_477_937;
    const B4: f64 = -1.821_255_978;
    const B5: f64 = 1.330_274_429;
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

    if z.is_nan() {
        return 0.5;
    }
    let x = z.abs();
    let t = 1.0 / (1.0 + P * x);
    let pdf = INV_SQRT_2PI * (-0.5 * x * x).exp();
    let poly = t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));
    let upper = pdf * poly;
    if z >= 0.0 {
        1.0 - upper
    } else {
        upper
    }
}

/// Population percentile of `score` on a mean-100 / SD-15 scale, 1..=99.
pub fn percentile(score: f64) -> u32 {
    let z = (score - POPULATION_MEAN) / POPULATION_SD;
    (normal_cdf(z) * 100.0).round().clamp(1.0, 99.0) as u32
}
