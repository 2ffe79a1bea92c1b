//! Random portfolio weights
//!
//! Draw procedure (so independent implementations can be compared): for one
//! weight vector, draw `n` variates from the chosen base distribution in
//! asset order, then divide each by their sum. With
//! [`WeightSampling::Dirichlet`] the variates are Exp(1) (`rand_distr::Exp1`,
//! ziggurat method), which makes the normalised vector exactly uniform on the
//! simplex. With [`WeightSampling::NormalizedUniform`] they are uniform on
//! `[0, 1)`. A draw whose sum is not strictly positive is discarded and redrawn.

use rand::Rng;
use rand_distr::{Distribution, Exp1};

use crate::model::WeightSampling;

/// Draw one weight vector of length `num_assets`: non-negative, summing to one.
pub fn draw_weights<R: Rng + ?Sized>(
    rng: &mut R,
    num_assets: usize,
    policy: WeightSampling,
) -> Vec<f64> {
    let mut raw = vec![0.0; num_assets];
    loop {
        for value in &mut raw {
            *value = match policy {
                WeightSampling::Dirichlet => Distribution::<f64>::sample(&Exp1, rng),
                WeightSampling::NormalizedUniform => rng.random::<f64>(),
            };
        }

        let total: f64 = raw.iter().sum();
        if total > 0.0 && total.is_finite() {
            for value in &mut raw {
                *value /= total;
            }
            return raw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_weights_on_simplex() {
        let mut rng = SmallRng::seed_from_u64(7);
        for policy in [WeightSampling::Dirichlet, WeightSampling::NormalizedUniform] {
            for n in 1..=12 {
                for _ in 0..200 {
                    let w = draw_weights(&mut rng, n, policy);
                    assert_eq!(w.len(), n);
                    assert!(w.iter().all(|x| *x >= 0.0));
                    assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_single_asset_weight_is_exactly_one() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(draw_weights(&mut rng, 1, WeightSampling::Dirichlet), vec![1.0]);
        }
    }

    #[test]
    fn test_same_seed_same_weights() {
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(
                draw_weights(&mut a, 4, WeightSampling::Dirichlet),
                draw_weights(&mut b, 4, WeightSampling::Dirichlet)
            );
        }
    }

    #[test]
    fn test_dirichlet_explores_corners_more_than_uniform() {
        // Uniform on the 3-simplex puts ~1/3 of mass where some weight exceeds 2/3;
        // normalised uniforms put much less there.
        let mut rng = SmallRng::seed_from_u64(99);
        let draws = 20_000;
        let corner_share = |policy, rng: &mut SmallRng| {
            (0..draws)
                .filter(|_| draw_weights(rng, 3, policy).iter().any(|w| *w > 2.0 / 3.0))
                .count() as f64
                / draws as f64
        };

        let dirichlet = corner_share(WeightSampling::Dirichlet, &mut rng);
        let uniform = corner_share(WeightSampling::NormalizedUniform, &mut rng);

        assert!((dirichlet - 1.0 / 3.0).abs() < 0.03, "dirichlet share {dirichlet}");
        assert!(uniform < dirichlet - 0.1, "uniform share {uniform}");
    }
}
