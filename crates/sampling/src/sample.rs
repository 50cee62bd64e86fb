//! Applying a [`SamplingStrategy`] to cubes.

use ndarray::Axis;
use rand::Rng;
use tracing::{debug, info};
use ukcp_calendar::Period;
use ukcp_cube::Cube;
use ukcp_stats::{argsort, nan_mean, percentile_window};

use crate::error::SamplingError;
use crate::strategy::{SUBSET_HALF_WIDTH, SamplingStrategy, SubsetCriterion};

/// Name of the sample dimension.
pub const SAMPLE: &str = "sample";

/// Source of the supporting data ranked by subset sampling.
pub trait SupportingCubes {
    /// Cubes of `variable` averaged over `period`, each with a `sample`
    /// dimension matching the data being sampled.
    ///
    /// # Errors
    ///
    /// Implementations wrap their load failures in
    /// [`SamplingError::Support`].
    fn supporting_cubes(&self, variable: &str, period: Period) -> Result<Vec<Cube>, SamplingError>;
}

/// Support for strategies that never consult it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSupport;

impl SupportingCubes for NoSupport {
    fn supporting_cubes(&self, variable: &str, period: Period) -> Result<Vec<Cube>, SamplingError> {
        Err(SamplingError::NoSupportingCube {
            variable: variable.to_string(),
            period,
        })
    }
}

/// Apply one sample selection to every cube.
///
/// `All` returns the cubes unchanged. The other strategies compute one list
/// of sample positions and select it from each cube, so cubes must agree on
/// the length of their `sample` dimension.
///
/// # Errors
///
/// Returns [`SamplingError::SampleCountMismatch`] for disagreeing cubes,
/// [`SamplingError::IdOutOfRange`] and [`SamplingError::TooManyDraws`] for
/// impossible selections, and the subset errors of [`subset_ids`].
pub fn sample<S, R>(
    cubes: &[Cube],
    strategy: &SamplingStrategy,
    support: &S,
    rng: &mut R,
) -> Result<Vec<Cube>, SamplingError>
where
    S: SupportingCubes + ?Sized,
    R: Rng + ?Sized,
{
    if *strategy == SamplingStrategy::All || cubes.is_empty() {
        return Ok(cubes.to_vec());
    }
    let samples = sample_count(cubes)?;
    let ids = match strategy {
        SamplingStrategy::All => (0..samples).collect(),
        SamplingStrategy::Ids(ids) => {
            if let Some(&id) = ids.iter().find(|&&id| id >= samples) {
                return Err(SamplingError::IdOutOfRange { id, samples });
            }
            ids.clone()
        }
        SamplingStrategy::Random { count } => random_ids(samples, *count, rng)?,
        SamplingStrategy::Subset(criteria) => subset_ids(samples, criteria, support)?,
    };
    info!(samples, kept = ids.len(), "samples selected");
    cubes
        .iter()
        .map(|c| c.select(SAMPLE, &ids).map_err(SamplingError::from))
        .collect()
}

fn sample_count(cubes: &[Cube]) -> Result<usize, SamplingError> {
    let mut expected = None;
    for cube in cubes {
        let found = cube.shape()[cube.require_dim(SAMPLE)?];
        match expected {
            None => expected = Some(found),
            Some(e) if e != found => {
                return Err(SamplingError::SampleCountMismatch {
                    cube: cube.name().to_string(),
                    expected: e,
                    found,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(0))
}

/// `count` distinct positions from `0..samples`, ascending.
///
/// # Errors
///
/// Returns [`SamplingError::TooManyDraws`] when `count > samples`.
pub fn random_ids<R: Rng + ?Sized>(samples: usize, count: usize, rng: &mut R) -> Result<Vec<usize>, SamplingError> {
    if count > samples {
        return Err(SamplingError::TooManyDraws { count, samples });
    }
    let mut ids = rand::seq::index::sample(rng, samples, count).into_vec();
    ids.sort_unstable();
    Ok(ids)
}

/// Mean of each sample over every other dimension.
pub fn sample_means(cube: &Cube) -> Result<Vec<f64>, SamplingError> {
    let ax = cube.require_dim(SAMPLE)?;
    Ok(cube
        .data()
        .axis_iter(Axis(ax))
        .map(|lane| {
            let values: Vec<f64> = lane.iter().copied().collect();
            nan_mean(&values)
        })
        .collect())
}

/// Positions kept by successive subset criteria, ascending.
///
/// Each step ranks the remaining samples by their supporting mean and keeps
/// the window `[floor((P - 10) n / 100), floor((P + 10) n / 100))` of the
/// `n` ranked samples.
///
/// # Errors
///
/// Returns [`SamplingError::NoSupportingCube`] or
/// [`SamplingError::AmbiguousSupportingCubes`] unless exactly one cube
/// supports a criterion, [`SamplingError::SampleCountMismatch`] when it has
/// a different number of samples, and [`SamplingError::EmptySubset`] when a
/// window is empty.
pub fn subset_ids<S>(samples: usize, criteria: &[SubsetCriterion], support: &S) -> Result<Vec<usize>, SamplingError>
where
    S: SupportingCubes + ?Sized,
{
    let mut kept: Vec<usize> = (0..samples).collect();
    for c in criteria {
        let cube = supporting_cube(support, c)?;
        let means = sample_means(&cube)?;
        if means.len() != samples {
            return Err(SamplingError::SampleCountMismatch {
                cube: cube.name().to_string(),
                expected: samples,
                found: means.len(),
            });
        }
        let values: Vec<f64> = kept.iter().map(|&i| means[i]).collect();
        let ranked = argsort(&values);
        let (lo, hi) = percentile_window(kept.len(), c.percentile, SUBSET_HALF_WIDTH);
        let mut window: Vec<usize> = ranked[lo..hi].iter().map(|&r| kept[r]).collect();
        window.sort_unstable();
        debug!(
            variable = %c.variable,
            period = %c.period,
            percentile = c.percentile,
            from = kept.len(),
            to = window.len(),
            "subset narrowed"
        );
        if window.is_empty() {
            return Err(SamplingError::EmptySubset {
                variable: c.variable.clone(),
                period: c.period,
            });
        }
        kept = window;
    }
    Ok(kept)
}

fn supporting_cube<S>(support: &S, c: &SubsetCriterion) -> Result<Cube, SamplingError>
where
    S: SupportingCubes + ?Sized,
{
    let mut cubes = support.supporting_cubes(&c.variable, c.period)?;
    match cubes.len() {
        1 => Ok(cubes.remove(0)),
        0 => Err(SamplingError::NoSupportingCube {
            variable: c.variable.clone(),
            period: c.period,
        }),
        count => Err(SamplingError::AmbiguousSupportingCubes {
            variable: c.variable.clone(),
            period: c.period,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ukcp_cube::{Coord, TIME};

    use super::*;

    fn samples(n: usize) -> Cube {
        let data = ArrayD::from_shape_fn(IxDyn(&[n, 2]), |ix| ix[0] as f64);
        Cube::new(
            "tasAnom",
            data,
            vec![
                Coord::numeric(SAMPLE, (0..n).map(|i| i as f64).collect()),
                Coord::numeric(TIME, vec![15.0, 45.0]).with_units("days since 2050-01-01"),
            ],
            "degC",
        )
        .unwrap()
    }

    #[test]
    fn random_ids_are_sorted_distinct_and_seeded() {
        let a = random_ids(3000, 200, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = random_ids(3000, 200, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 200);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
        assert!(a.iter().all(|&i| i < 3000));
    }

    #[test]
    fn too_many_draws() {
        assert!(matches!(
            random_ids(10, 11, &mut StdRng::seed_from_u64(0)),
            Err(SamplingError::TooManyDraws { .. })
        ));
    }

    #[test]
    fn ids_select_positions() {
        let out = sample(
            &[samples(5)],
            &SamplingStrategy::Ids(vec![1, 3]),
            &NoSupport,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(out[0].dim(SAMPLE).unwrap().points(), Some(&[1.0, 3.0][..]));
    }

    #[test]
    fn id_out_of_range() {
        let err = sample(
            &[samples(5)],
            &SamplingStrategy::Ids(vec![5]),
            &NoSupport,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, SamplingError::IdOutOfRange { id: 5, samples: 5 }));
    }

    #[test]
    fn all_is_identity() {
        let cubes = vec![samples(3)];
        let out = sample(&cubes, &SamplingStrategy::All, &NoSupport, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(out, cubes);
    }

    #[test]
    fn disagreeing_sample_counts() {
        let err = sample(
            &[samples(5), samples(6)],
            &SamplingStrategy::Random { count: 2 },
            &NoSupport,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, SamplingError::SampleCountMismatch { .. }));
    }

    #[test]
    fn means_over_other_dimensions() {
        let means = sample_means(&samples(3)).unwrap();
        assert_eq!(means.len(), 3);
        for (i, m) in means.iter().enumerate() {
            assert_relative_eq!(*m, i as f64);
        }
    }
}
