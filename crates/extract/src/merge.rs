//! Joining file fragments and ensemble members.

use std::cmp::Ordering;

use tracing::debug;
use ukcp_cube::{Coord, Cube, TIME, concatenate, stack};

use crate::error::ExtractError;

/// Attribute that differs between members' files and would block merging.
pub const ENSEMBLE_MEMBER_ID: &str = "ensemble_member_id";

/// Name of the ensemble member dimension.
pub const ENSEMBLE_MEMBER: &str = "ensemble_member";

fn first_time(cube: &Cube) -> Option<f64> {
    cube.dim(TIME)?.points()?.first().copied()
}

/// Join the fragments of one member into a single cube along `time`.
///
/// Fragments are put in time order first. The per-file
/// `ensemble_member_id` attribute is removed.
///
/// # Errors
///
/// Returns [`ExtractError::DataNotFound`] for no fragments and cube errors
/// when fragments disagree on anything but time.
pub fn join_fragments(mut fragments: Vec<Cube>) -> Result<Cube, ExtractError> {
    for f in &mut fragments {
        f.remove_attribute(ENSEMBLE_MEMBER_ID);
    }
    match fragments.len() {
        0 => Err(ExtractError::not_found("no fragments to join")),
        1 => Ok(fragments.remove(0)),
        n => {
            fragments.sort_by(|a, b| match (first_time(a), first_time(b)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            });
            debug!(fragments = n, name = fragments[0].name(), "joining along time");
            Ok(concatenate(&fragments, TIME)?)
        }
    }
}

/// Merge per-member cubes along `ensemble_member`.
///
/// Cubes that already carry a length-1 member dimension are concatenated;
/// others are stacked under a new dimension labelled with the member ids.
/// A single cube without a member id is returned as is.
///
/// # Errors
///
/// Returns [`ExtractError::DataNotFound`] for no cubes and cube errors when
/// members disagree.
pub fn merge_members(mut members: Vec<(Option<String>, Cube)>) -> Result<Cube, ExtractError> {
    if members.is_empty() {
        return Err(ExtractError::not_found("no ensemble members to merge"));
    }
    if members.len() == 1 && members[0].0.is_none() {
        return Ok(members.remove(0).1);
    }
    let (ids, cubes): (Vec<Option<String>>, Vec<Cube>) = members.into_iter().unzip();
    if cubes.iter().all(|c| c.dim(ENSEMBLE_MEMBER).is_some()) {
        return Ok(concatenate(&cubes, ENSEMBLE_MEMBER)?);
    }
    let labels: Vec<String> = ids
        .into_iter()
        .enumerate()
        .map(|(i, id)| id.unwrap_or_else(|| i.to_string()))
        .collect();
    Ok(stack(&cubes, Coord::labels(ENSEMBLE_MEMBER, labels))?)
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};
    use ukcp_cube::PROJECTION_Y;

    use super::*;

    fn fragment(times: &[f64], member: &str) -> Cube {
        let data = ArrayD::from_shape_vec(IxDyn(&[times.len(), 1]), times.to_vec()).unwrap();
        Cube::new(
            "tas",
            data,
            vec![
                Coord::numeric(TIME, times.to_vec()).with_units("days since 1970-01-01"),
                Coord::numeric(PROJECTION_Y, vec![6_000.0]),
            ],
            "degC",
        )
        .unwrap()
        .with_attribute(ENSEMBLE_MEMBER_ID, member)
        .with_attribute("scenario", "rcp85")
    }

    #[test]
    fn fragments_join_in_time_order() {
        let joined = join_fragments(vec![fragment(&[60.0, 90.0], "a"), fragment(&[0.0, 30.0], "b")]).unwrap();
        assert_eq!(
            joined.dim(TIME).unwrap().points(),
            Some(&[0.0, 30.0, 60.0, 90.0][..])
        );
        assert_eq!(joined.attribute(ENSEMBLE_MEMBER_ID), None);
        assert_eq!(joined.attribute("scenario"), Some("rcp85"));
    }

    #[test]
    fn no_fragments_is_not_found() {
        assert!(matches!(
            join_fragments(Vec::new()),
            Err(ExtractError::DataNotFound { .. })
        ));
    }

    #[test]
    fn members_stack_in_order() {
        let a = join_fragments(vec![fragment(&[0.0], "x")]).unwrap();
        let b = join_fragments(vec![fragment(&[0.0], "y")]).unwrap();
        let merged = merge_members(vec![(Some("04".into()), a), (Some("01".into()), b)]).unwrap();
        assert_eq!(merged.dim_names(), [ENSEMBLE_MEMBER, TIME, PROJECTION_Y]);
        assert_eq!(
            merged.dim(ENSEMBLE_MEMBER).unwrap().label_points().unwrap(),
            &["04".to_string(), "01".to_string()]
        );
    }

    #[test]
    fn single_unnamed_member_passes_through() {
        let a = join_fragments(vec![fragment(&[0.0], "x")]).unwrap();
        let merged = merge_members(vec![(None, a.clone())]).unwrap();
        assert_eq!(merged, a);
    }
}
