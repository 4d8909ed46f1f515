// Neighbor relation for the spin system, plus the periodic square-lattice builder.

use crate::error::{IsingError, Result};

/// Displacements `(d_row, d_col)` in the order the builder lists neighbors.
const SQUARE_OFFSETS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Adjacency lists indexed by site.
///
/// Entry `i` is the ordered neighbor sequence of site `i`. Repeated entries are
/// meaningful: on a lattice of extent 2 the `+1` and `-1` neighbors along an
/// axis coincide and both are listed, and on extent 1 a site is its own
/// neighbor. Once built the table never changes, so one table can back any
/// number of systems of the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    lists: Vec<Vec<usize>>,
}

impl NeighborTable {
    /// Periodic `rows x columns` square lattice, 4 neighbors per site.
    pub fn square(rows: usize, columns: usize) -> Self {
        assert!(
            rows >= 1 && columns >= 1,
            "lattice extents must be >= 1, got {rows}x{columns}"
        );

        let mut lists = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                let neighbors = SQUARE_OFFSETS
                    .iter()
                    .map(|&(dr, dc)| {
                        let r = (row as isize + dr).rem_euclid(rows as isize) as usize;
                        let c = (col as isize + dc).rem_euclid(columns as isize) as usize;
                        r * columns + c
                    })
                    .collect();
                lists.push(neighbors);
            }
        }

        Self { lists }
    }

    /// Wrap caller-built adjacency lists.
    ///
    /// The relation is expected to be symmetric (if `j` appears in list `i`,
    /// `i` appears in list `j` the same number of times); only index bounds are
    /// checked here.
    pub fn from_lists(lists: Vec<Vec<usize>>) -> Result<Self> {
        let sites = lists.len();
        for (site, neighbors) in lists.iter().enumerate() {
            if let Some(&neighbor) = neighbors.iter().find(|&&j| j >= sites) {
                return Err(IsingError::NeighborOutOfRange {
                    site,
                    neighbor,
                    sites,
                });
            }
        }
        Ok(Self { lists })
    }

    /// Number of sites.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Ordered neighbors of `site`.
    #[inline(always)]
    pub fn neighbors(&self, site: usize) -> &[usize] {
        &self.lists[site]
    }

    /// Sum of all list lengths, i.e. twice the number of bonds.
    pub fn total_degree(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    /// Iterate over `(site, neighbors)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.lists.iter().enumerate().map(|(i, l)| (i, l.as_slice()))
    }
}

/// Build the neighbor relation of a periodic `rows x columns` square lattice.
///
/// Sites are linearized row-major as `row * columns + col`; each site lists
/// `(row+1, col)`, `(row-1, col)`, `(row, col+1)`, `(row, col-1)` in that order.
///
/// # Panics
/// If `rows` or `columns` is zero.
pub fn build_square_lattice(rows: usize, columns: usize) -> NeighborTable {
    NeighborTable::square(rows, columns)
}
