#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Extended Moore neighbourhood offsets.
//!
//! A ring at radius `n` holds every offset whose Chebyshev length is exactly
//! `n`, so rings at different radii never overlap and ring `n` contains `8n`
//! offsets.

use contagion_core::Offset;

/// Enumerates the offsets at Chebyshev distance exactly `radius`.
///
/// Offsets are produced row by row from the north-west corner. A radius of
/// zero yields no offsets since the origin never belongs to a ring.
#[must_use]
pub fn ring(radius: u32) -> Vec<Offset> {
    let Ok(r) = i32::try_from(radius) else {
        return Vec::new();
    };
    if r == 0 {
        return Vec::new();
    }

    let mut offsets = Vec::with_capacity(8 * radius as usize);
    for dy in -r..=r {
        if dy == -r || dy == r {
            offsets.extend((-r..=r).map(|dx| Offset::new(dy, dx)));
        } else {
            offsets.push(Offset::new(dy, -r));
            offsets.push(Offset::new(dy, r));
        }
    }
    offsets
}

/// Enumerates every offset within Chebyshev distance `radius`, origin excluded.
///
/// Offsets cover the full square row by row rather than ring by ring.
#[must_use]
pub fn within(radius: u32) -> Vec<Offset> {
    let Ok(r) = i32::try_from(radius) else {
        return Vec::new();
    };

    (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| Offset::new(dy, dx)))
        .filter(|offset| offset.chebyshev_radius() != 0)
        .collect()
}

/// Precomputed rings for radii `1..=max_radius`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    rings: Vec<Vec<Offset>>,
}

impl Neighborhood {
    /// Builds and caches every ring up to and including `max_radius`.
    #[must_use]
    pub fn new(max_radius: u32) -> Self {
        Self {
            rings: (1..=max_radius).map(ring).collect(),
        }
    }

    /// Largest cached radius.
    #[must_use]
    pub fn max_radius(&self) -> u32 {
        self.rings.len() as u32
    }

    /// Offsets of the ring at `radius`, or an empty slice when the radius is
    /// zero or beyond the cache.
    #[must_use]
    pub fn ring(&self, radius: u32) -> &[Offset] {
        radius
            .checked_sub(1)
            .and_then(|index| self.rings.get(index as usize))
            .map_or(&[][..], Vec::as_slice)
    }

    /// Iterates `(radius, offsets)` pairs from the innermost ring outward.
    pub fn rings(&self) -> impl Iterator<Item = (u32, &[Offset])> {
        self.rings
            .iter()
            .enumerate()
            .map(|(index, offsets)| (index as u32 + 1, offsets.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_size_grows_linearly() {
        for radius in 1..=10 {
            assert_eq!(ring(radius).len(), 8 * radius as usize);
        }
    }

    #[test]
    fn radius_zero_is_empty() {
        assert!(ring(0).is_empty());
        assert!(within(0).is_empty());
        assert!(Neighborhood::new(3).ring(0).is_empty());
    }

    #[test]
    fn cache_matches_direct_enumeration() {
        let neighborhood = Neighborhood::new(4);
        assert_eq!(neighborhood.max_radius(), 4);
        for radius in 1..=4 {
            assert_eq!(neighborhood.ring(radius), ring(radius).as_slice());
        }
        assert!(neighborhood.ring(5).is_empty());
    }
}
