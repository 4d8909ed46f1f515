// Spin configuration with incrementally maintained bond sum and magnetization.

use std::sync::Arc;

use crate::error::{IsingError, Result};
use crate::lattice::NeighborTable;

/// Ising spin system on an arbitrary neighbor relation.
///
/// Two aggregates are kept up to date on every flip so that energy and
/// magnetization reads are O(1):
///
/// * `same_direction` is the bond sum over neighbor pairs, `+1` per aligned
///   pair and `-1` per anti-aligned pair. With every spin equal it is the
///   total number of pairs.
/// * `total_magnetization` is `#up - #down`.
#[derive(Debug, Clone)]
pub struct SpinSystem {
    spin_up: Vec<bool>,
    same_direction: i64,
    total_magnetization: i64,
    interaction: f64,
    neighbors: Arc<NeighborTable>,
}

impl SpinSystem {
    /// Build a system of `site_count` spins, all down, with coupling `interaction`.
    pub fn new(site_count: usize, interaction: f64, neighbors: Arc<NeighborTable>) -> Result<Self> {
        if site_count == 0 {
            return Err(IsingError::EmptySystem);
        }
        if neighbors.len() != site_count {
            return Err(IsingError::NeighborCountMismatch {
                sites: site_count,
                table: neighbors.len(),
            });
        }
        if !interaction.is_finite() {
            return Err(IsingError::InvalidCoupling(interaction));
        }

        // Uniform start: every pair is aligned, so the bond sum is the pair count.
        // Valid only here, before any flip.
        let same_direction = (neighbors.total_degree() / 2) as i64;

        Ok(Self {
            spin_up: vec![false; site_count],
            same_direction,
            total_magnetization: -(site_count as i64),
            interaction,
            neighbors,
        })
    }

    /// Convenience constructor for a periodic `rows x columns` square lattice.
    pub fn square(rows: usize, columns: usize, interaction: f64) -> Result<Self> {
        let table = Arc::new(NeighborTable::square(rows, columns));
        Self::new(rows * columns, interaction, table)
    }

    /// Flip the spin at `site`, updating both aggregates in O(degree).
    pub fn flip(&mut self, site: usize) -> Result<()> {
        if site >= self.spin_up.len() {
            return Err(IsingError::SiteOutOfRange {
                site,
                sites: self.spin_up.len(),
            });
        }
        self.toggle(site);
        Ok(())
    }

    /// Flip without the range check. Callers guarantee `site < site_count()`.
    #[inline]
    pub(crate) fn toggle(&mut self, site: usize) {
        let up = !self.spin_up[site];
        self.spin_up[site] = up;
        self.total_magnetization += if up { 2 } else { -2 };

        for &neighbor in self.neighbors.neighbors(site) {
            // A self-bond is aligned before and after the flip.
            if neighbor == site {
                continue;
            }
            self.same_direction += if up == self.spin_up[neighbor] { 2 } else { -2 };
        }
    }

    /// `E = -J * same_direction`, extensive (not per spin).
    #[inline(always)]
    pub fn energy(&self) -> f64 {
        -self.interaction * self.same_direction as f64
    }

    /// Raw magnetization `M = #up - #down`.
    #[inline(always)]
    pub fn magnetization(&self) -> i64 {
        self.total_magnetization
    }

    /// `(M / N)^2`, in `[0, 1]`.
    #[inline(always)]
    pub fn magnetization_squared_normalized(&self) -> f64 {
        let m = self.total_magnetization as f64 / self.site_count() as f64;
        m * m
    }

    #[inline(always)]
    pub fn site_count(&self) -> usize {
        self.spin_up.len()
    }

    #[inline(always)]
    pub fn same_direction(&self) -> i64 {
        self.same_direction
    }

    pub fn interaction(&self) -> f64 {
        self.interaction
    }

    /// Orientation of `site`, `true` meaning up.
    pub fn spin(&self, site: usize) -> Option<bool> {
        self.spin_up.get(site).copied()
    }

    pub fn spins(&self) -> &[bool] {
        &self.spin_up
    }

    pub fn neighbors(&self) -> &Arc<NeighborTable> {
        &self.neighbors
    }

    /// Bond sum recomputed from scratch, O(N * degree).
    pub fn recount_same_direction(&self) -> i64 {
        let directed: i64 = self
            .neighbors
            .iter()
            .flat_map(|(i, list)| list.iter().map(move |&j| (i, j)))
            .map(|(i, j)| if self.spin_up[i] == self.spin_up[j] { 1 } else { -1 })
            .sum();
        directed / 2
    }

    /// Magnetization recomputed from the spin array, O(N).
    pub fn recount_magnetization(&self) -> i64 {
        self.spin_up.iter().map(|&up| if up { 1 } else { -1 }).sum()
    }

    /// Compare both tracked aggregates against a full recount.
    pub fn verify_invariants(&self) -> Result<()> {
        let recounted = self.recount_same_direction();
        if recounted != self.same_direction {
            return Err(IsingError::CorruptedAggregate {
                name: "same_direction",
                tracked: self.same_direction,
                recounted,
            });
        }
        let recounted = self.recount_magnetization();
        if recounted != self.total_magnetization {
            return Err(IsingError::CorruptedAggregate {
                name: "total_magnetization",
                tracked: self.total_magnetization,
                recounted,
            });
        }
        Ok(())
    }
}
