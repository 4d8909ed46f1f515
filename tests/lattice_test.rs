//! Neighbor tables for periodic square lattices.

use ising::lattice::{build_square_lattice, NeighborTable};
use ising::IsingError;

/// Number of times `needle` occurs in `list`.
fn count(list: &[usize], needle: usize) -> usize {
    list.iter().filter(|&&x| x == needle).count()
}

#[test]
fn test_rectangular_neighbor_order() {
    // 3x4 lattice, row-major.
    let lat = build_square_lattice(3, 4);
    assert_eq!(lat.len(), 12);

    // Site 0 = (0,0): down (1,0)=4, up wraps to (2,0)=8, right (0,1)=1, left wraps to (0,3)=3
    assert_eq!(lat.neighbors(0), &[4, 8, 1, 3]);

    // Site 11 = (2,3): every direction but "up" and "left" wraps
    assert_eq!(lat.neighbors(11), &[3, 7, 8, 10]);

    // Site 5 = (1,1): interior, no wrap
    assert_eq!(lat.neighbors(5), &[9, 1, 6, 4]);
}

#[test]
fn test_extent_two_lists_each_neighbor_twice() {
    let lat = build_square_lattice(2, 2);
    assert_eq!(lat.neighbors(0), &[2, 2, 1, 1]);
    assert_eq!(lat.neighbors(1), &[3, 3, 0, 0]);
    assert_eq!(lat.neighbors(2), &[0, 0, 3, 3]);
    assert_eq!(lat.neighbors(3), &[1, 1, 2, 2]);
    assert_eq!(lat.total_degree(), 16);
}

#[test]
fn test_extent_one_is_its_own_neighbor() {
    let lat = build_square_lattice(1, 1);
    assert_eq!(lat.neighbors(0), &[0, 0, 0, 0]);

    // A single row: vertical neighbors collapse onto the site itself.
    let row = build_square_lattice(1, 3);
    assert_eq!(row.neighbors(1), &[1, 1, 2, 0]);
}

#[test]
fn test_every_site_has_four_neighbors_and_relation_is_symmetric() {
    for (rows, cols) in [(1, 1), (2, 2), (2, 5), (3, 3), (4, 7), (10, 10)] {
        let lat = NeighborTable::square(rows, cols);
        assert_eq!(lat.len(), rows * cols);
        assert_eq!(lat.total_degree(), 4 * rows * cols);

        for (i, list) in lat.iter() {
            assert_eq!(list.len(), 4, "site {i} on {rows}x{cols}");
            for &j in list {
                assert!(j < lat.len());
                assert_eq!(
                    count(list, j),
                    count(lat.neighbors(j), i),
                    "asymmetric bond {i}-{j} on {rows}x{cols}"
                );
            }
        }
    }
}

#[test]
fn test_builder_is_deterministic() {
    assert_eq!(build_square_lattice(6, 5), build_square_lattice(6, 5));
}

#[test]
fn test_from_lists_accepts_custom_relation() {
    // Open chain 0-1-2
    let chain = NeighborTable::from_lists(vec![vec![1], vec![0, 2], vec![1]]).unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.total_degree(), 4);
    assert_eq!(chain.neighbors(1), &[0, 2]);
}

#[test]
fn test_from_lists_rejects_out_of_range_neighbor() {
    let err = NeighborTable::from_lists(vec![vec![1], vec![0, 5]]).unwrap_err();
    match err {
        IsingError::NeighborOutOfRange { site, neighbor, sites } => {
            assert_eq!((site, neighbor, sites), (1, 5, 2));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
#[should_panic(expected = "lattice extents must be >= 1")]
fn test_zero_extent_panics() {
    build_square_lattice(0, 4);
}
