//! Ragged (event × particle) array snapshots.
//!
//! Physics branches arrive as jagged arrays: one variable-length list of
//! per-particle values per event. [`Jagged<T>`] stores them as flat data plus
//! event offsets and is immutable after construction. All co-indexed branches
//! in an analysis must share exactly the same ragged shape; every combinator
//! here checks that and fails fast rather than broadcasting a bad pairing.
//!
//! Per-event scalars (interaction flags, neutrino PDG) are expanded across
//! particles with [`Jagged::broadcast`] — an explicit index-aligned
//! expansion, so shape invariants stay auditable.

use crate::error::{Error, Result};

/// An immutable ragged array indexed by (event, particle-within-event).
#[derive(Debug, Clone, PartialEq)]
pub struct Jagged<T> {
    data: Vec<T>,
    /// `offsets[e]..offsets[e + 1]` is the flat range of event `e`.
    offsets: Vec<usize>,
}

/// A boolean selection mask with the same ragged shape as the branches it
/// selects from.
pub type Mask = Jagged<bool>;

impl<T> Jagged<T> {
    /// Build from nested per-event vectors.
    pub fn from_nested(events: Vec<Vec<T>>) -> Self {
        let mut offsets = Vec::with_capacity(events.len() + 1);
        offsets.push(0);
        let mut data = Vec::new();
        for ev in events {
            data.extend(ev);
            offsets.push(data.len());
        }
        Self { data, offsets }
    }

    /// Build from flat data plus per-event particle counts.
    ///
    /// Returns [`Error::ShapeMismatch`] if the counts do not sum to the flat
    /// length.
    pub fn from_flat(data: Vec<T>, counts: &[usize]) -> Result<Self> {
        let total: usize = counts.iter().sum();
        if total != data.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{total} items from counts"),
                actual: format!("{} items", data.len()),
            });
        }
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        offsets.push(0);
        let mut acc = 0;
        for &c in counts {
            acc += c;
            offsets.push(acc);
        }
        Ok(Self { data, offsets })
    }

    /// Number of events.
    pub fn n_events(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of particles across all events.
    pub fn n_items(&self) -> usize {
        self.data.len()
    }

    /// Per-particle values of event `e`.
    ///
    /// # Panics
    /// Panics if `e >= n_events()`.
    pub fn event(&self, e: usize) -> &[T] {
        &self.data[self.offsets[e]..self.offsets[e + 1]]
    }

    /// Iterate over events as slices.
    pub fn events(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.data[w[0]..w[1]])
    }

    /// Flat view over all particles, event boundaries erased.
    pub fn flat(&self) -> &[T] {
        &self.data
    }

    /// Whether `other` has exactly the same ragged shape.
    pub fn same_shape<U>(&self, other: &Jagged<U>) -> bool {
        self.offsets == other.offsets
    }

    /// Short shape description for error messages.
    pub fn shape_desc(&self) -> String {
        format!("{} events / {} items", self.n_events(), self.n_items())
    }

    pub(crate) fn check_shape<U>(&self, other: &Jagged<U>) -> Result<()> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.shape_desc(),
                actual: other.shape_desc(),
            })
        }
    }

    /// Element-wise map preserving the ragged shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Jagged<U> {
        Jagged {
            data: self.data.iter().map(&mut f).collect(),
            offsets: self.offsets.clone(),
        }
    }
}

impl<T: Copy> Jagged<T> {
    /// Repeat one value per event across all particles of that event.
    ///
    /// `shape` supplies the ragged layout; `per_event` must have one entry
    /// per event.
    pub fn broadcast<S>(per_event: &[T], shape: &Jagged<S>) -> Result<Jagged<T>> {
        if per_event.len() != shape.n_events() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} events", shape.n_events()),
                actual: format!("{} per-event values", per_event.len()),
            });
        }
        let mut data = Vec::with_capacity(shape.n_items());
        for (e, ev) in shape.events().enumerate() {
            data.extend(std::iter::repeat(per_event[e]).take(ev.len()));
        }
        Ok(Jagged {
            data,
            offsets: shape.offsets.clone(),
        })
    }

    /// Build a mask by applying a predicate to every particle.
    pub fn to_mask(&self, mut pred: impl FnMut(T) -> bool) -> Mask {
        self.map(|&v| pred(v))
    }

    /// Flat vector of the values where `mask` is set.
    pub fn select(&self, mask: &Mask) -> Result<Vec<T>> {
        self.check_shape(mask)?;
        Ok(self
            .data
            .iter()
            .zip(mask.data.iter())
            .filter_map(|(&v, &m)| m.then_some(v))
            .collect())
    }
}

impl Jagged<bool> {
    /// A mask with every particle selected, shaped like `shape`.
    pub fn ones_like<S>(shape: &Jagged<S>) -> Mask {
        Jagged {
            data: vec![true; shape.n_items()],
            offsets: shape.offsets.clone(),
        }
    }

    /// Logical AND with shape checking.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.check_shape(other)?;
        Ok(Jagged {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| a && b)
                .collect(),
            offsets: self.offsets.clone(),
        })
    }

    /// Logical OR with shape checking.
    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.check_shape(other)?;
        Ok(Jagged {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| a || b)
                .collect(),
            offsets: self.offsets.clone(),
        })
    }

    /// Logical NOT.
    pub fn not(&self) -> Mask {
        self.map(|&v| !v)
    }

    /// Number of selected particles.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_from_nested_layout() {
        let j = Jagged::from_nested(vec![vec![1, 2, 3], vec![], vec![4]]);
        assert_eq!(j.n_events(), 3);
        assert_eq!(j.n_items(), 4);
        assert_eq!(j.event(0), &[1, 2, 3]);
        assert_eq!(j.event(1), &[] as &[i32]);
        assert_eq!(j.event(2), &[4]);
        assert_eq!(j.flat(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_flat_counts_must_sum() {
        let ok = Jagged::from_flat(vec![1, 2, 3], &[2, 0, 1]);
        assert!(ok.is_ok());
        let bad = Jagged::from_flat(vec![1, 2, 3], &[2, 2]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_mask_combinators() {
        let a = Jagged::from_nested(vec![vec![true, false], vec![true]]);
        let b = Jagged::from_nested(vec![vec![true, true], vec![false]]);
        assert_eq!(a.and(&b).unwrap().flat(), &[true, false, false]);
        assert_eq!(a.or(&b).unwrap().flat(), &[true, true, true]);
        assert_eq!(a.not().flat(), &[false, true, false]);
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn test_and_rejects_shape_mismatch() {
        // Same flat length, different event boundaries.
        let a = Jagged::from_nested(vec![vec![true, false], vec![true]]);
        let b = Jagged::from_nested(vec![vec![true], vec![false, true]]);
        assert!(a.and(&b).is_err());
    }

    #[test]
    fn test_broadcast_expansion() {
        let shape = Jagged::from_nested(vec![vec![0, 0, 0], vec![], vec![0, 0]]);
        let b = Jagged::broadcast(&[7, 8, 9], &shape).unwrap();
        assert_eq!(b.flat(), &[7, 7, 7, 9, 9]);
        assert!(b.same_shape(&shape));

        assert!(Jagged::broadcast(&[7, 8], &shape).is_err());
    }

    #[test]
    fn test_select() {
        let v = Jagged::from_nested(vec![vec![1.0, 2.0], vec![3.0]]);
        let m = v.to_mask(|x| x > 1.5);
        assert_eq!(v.select(&m).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_broadcast_random_shapes() {
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let n_events = rng.gen_range(1..8);
            let counts: Vec<usize> = (0..n_events).map(|_| rng.gen_range(0..6)).collect();
            let total: usize = counts.iter().sum();
            let shape = Jagged::from_flat(vec![0u8; total], &counts).unwrap();
            let per_event: Vec<i32> = (0..n_events as i32).collect();
            let b = Jagged::broadcast(&per_event, &shape).unwrap();
            assert!(b.same_shape(&shape));
            for (e, ev) in b.events().enumerate() {
                assert!(ev.iter().all(|&v| v == e as i32));
            }
        }
    }
}
