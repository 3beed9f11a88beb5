//! Whole-operation transform built from a pairwise component transform.
//!
//! Works for any operation type that is an ordered list of components and
//! can transform one component against another. Transforming a component may
//! yield zero, one or several components; a split is resolved by recursing on
//! the remaining left components and the split pieces.

use crate::types::Side;

/// Hooks an operation type provides to get [`transform_x`] and
/// [`transform`].
pub trait ComponentTransform {
    type Component: Clone;
    type Error;

    fn check_valid_op(&self, op: &[Self::Component]) -> Result<(), Self::Error>;

    /// Pushes the result of transforming `c` against `other` onto `dest`.
    fn transform_component(
        &self,
        dest: &mut Vec<Self::Component>,
        c: &Self::Component,
        other: &Self::Component,
        side: Side,
    ) -> Result<(), Self::Error>;

    /// Pushes `c` onto `dest`, merging with the last component if possible.
    fn append(&self, dest: &mut Vec<Self::Component>, c: Self::Component) -> Result<(), Self::Error>;
}

/// Transforms two concurrent operations against each other.
///
/// Returns `(left', right')` such that applying `left` then `right'` gives
/// the same result as applying `right` then `left'`. `left` wins ties.
#[allow(clippy::type_complexity)]
pub fn transform_x<T>(
    t: &T,
    left: &[T::Component],
    right: &[T::Component],
) -> Result<(Vec<T::Component>, Vec<T::Component>), T::Error>
where
    T: ComponentTransform + ?Sized,
{
    t.check_valid_op(left)?;
    t.check_valid_op(right)?;

    let mut left = left.to_vec();
    let mut new_right = Vec::with_capacity(right.len());

    for right_component in right {
        let mut pending = Some(right_component.clone());
        let mut new_left = Vec::with_capacity(left.len());

        let mut k = 0;
        while k < left.len() {
            let Some(rc) = pending.take() else { break };
            let mut next = Vec::new();
            t.transform_component(&mut new_left, &left[k], &rc, Side::Left)?;
            t.transform_component(&mut next, &rc, &left[k], Side::Right)?;
            k += 1;

            match next.len() {
                1 => pending = next.pop(),
                0 => {
                    for c in &left[k..] {
                        t.append(&mut new_left, c.clone())?;
                    }
                    break;
                }
                splits => {
                    tracing::trace!(splits, remaining = left.len() - k, "right component split");
                    let (l, r) = transform_x(t, &left[k..], &next)?;
                    for c in l {
                        t.append(&mut new_left, c)?;
                    }
                    for c in r {
                        t.append(&mut new_right, c)?;
                    }
                    break;
                }
            }
        }

        if let Some(rc) = pending {
            t.append(&mut new_right, rc)?;
        }
        left = new_left;
    }

    Ok((left, new_right))
}

/// Transforms `op` so it applies after `other`, breaking ties as `side`.
pub fn transform<T>(
    t: &T,
    op: &[T::Component],
    other: &[T::Component],
    side: Side,
) -> Result<Vec<T::Component>, T::Error>
where
    T: ComponentTransform + ?Sized,
{
    if other.is_empty() {
        return Ok(op.to_vec());
    }

    if op.len() == 1 && other.len() == 1 {
        let mut dest = Vec::new();
        t.transform_component(&mut dest, &op[0], &other[0], side)?;
        return Ok(dest);
    }

    match side {
        Side::Left => Ok(transform_x(t, op, other)?.0),
        Side::Right => Ok(transform_x(t, other, op)?.1),
    }
}
