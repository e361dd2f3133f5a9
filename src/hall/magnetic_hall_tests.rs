use std::collections::HashSet;

use nalgebra::Matrix3;

use crate::hall::hall_tables::LatticeSymbol;
use crate::hall::magnetic_hall::{traverse, CosetTraversalParams, MagneticHallSymbol};
use crate::hall::HallSymbolError;
use crate::operation::{twelfths, Operation};

#[test]
fn test_magnetic_hall_coset_order() {
    for (symbol, order, unitary_order) in [
        ("P 31 2 1c' (0 0 4)", 12, 6),
        ("P 6c 2c' -1'", 24, 24),
        ("F 4d 2 3 1'", 192, 96),
    ] {
        let mhall = MagneticHallSymbol::new(symbol).unwrap();
        assert_eq!(mhall.coset().len(), order, "Unexpected order for `{symbol}`.");
        assert_eq!(mhall.unitary_operations().len(), unitary_order);
        assert!(mhall.coset()[0].is_identity());
        assert_eq!(
            mhall.coset().iter().filter(|op| op.is_identity()).count(),
            1
        );
        assert!(mhall.coset().iter().all(|op| *op == op.reduced()));
    }
}

#[test]
fn test_magnetic_hall_generators() {
    let mhall = MagneticHallSymbol::new("F 4d 2 3 1'").unwrap();
    assert_eq!(mhall.lattice(), LatticeSymbol::F);
    assert!(!mhall.inversion_at_origin());
    // Three non-zero centerings followed by four listed generators.
    assert_eq!(mhall.generators().len(), 7);
    assert_eq!(
        mhall.generators()[0],
        Operation::from_translation(twelfths([0, 6, 6]))
    );
    assert_eq!(
        mhall.generators()[6],
        Operation::identity().with_time_reversal(true)
    );
    assert!(mhall.is_grey());

    let mhall = MagneticHallSymbol::new("-P 1 (0 0 3)").unwrap();
    assert_eq!(
        mhall.generators()[0],
        Operation::new(-Matrix3::<i32>::identity(), twelfths([0, 0, 6]), false)
    );

    // An anti-translation does not make the group grey.
    let mhall = MagneticHallSymbol::new("P 31 2 1c' (0 0 4)").unwrap();
    assert!(!mhall.is_grey());
    assert!(mhall
        .coset()
        .contains(&Operation::from_translation(twelfths([0, 0, 6])).with_time_reversal(true)));
}

#[test]
fn test_magnetic_hall_time_reversal_split() {
    // Every linear part appears exactly once in a non-grey coset.
    let mhall = MagneticHallSymbol::new("P 6c 2c' -1'").unwrap();
    let linears = mhall
        .coset()
        .iter()
        .map(|op| *op.linear())
        .collect::<HashSet<_>>();
    assert_eq!(linears.len(), 24);
    let antiunitary = mhall
        .coset()
        .iter()
        .filter(|op| op.time_reversal())
        .count();
    assert_eq!(antiunitary, 12);
}

#[test]
fn test_magnetic_hall_determinism() {
    let first = MagneticHallSymbol::new("F 4d 2 3 1'").unwrap();
    let second = MagneticHallSymbol::new("F 4d 2 3 1'").unwrap();
    assert_eq!(first.coset(), second.coset());
    assert_eq!(first.symbol(), "F 4d 2 3 1'");
}

#[test]
fn test_coset_traversal() {
    let params = CosetTraversalParams::default();
    assert_eq!(traverse(&[], &params).unwrap(), vec![Operation::identity()]);

    let theta = Operation::identity().with_time_reversal(true);
    let c4 = Operation::from_linear(Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1));
    let coset = traverse(&[c4, theta], &params).unwrap();
    assert_eq!(coset.len(), 8);
    assert_eq!(coset[0], Operation::identity());
}

#[test]
fn test_coset_traversal_nontermination() {
    let params = CosetTraversalParams::builder()
        .max_steps(10)
        .build()
        .unwrap();
    match MagneticHallSymbol::with_params("F 4d 2 3 1'", &params) {
        Err(HallSymbolError::CosetNontermination(err)) => {
            assert_eq!(err.hall_symbol.as_deref(), Some("F 4d 2 3 1'"));
            assert_eq!(err.max_steps, 10);
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_coset_traversal_params() {
    let params = CosetTraversalParams::builder().build().unwrap();
    assert_eq!(params.max_steps, CosetTraversalParams::default().max_steps);
    assert_eq!(params.max_steps, 4096);

    let params: CosetTraversalParams = serde_yaml::from_str("max_steps: 512").unwrap();
    assert_eq!(params.max_steps, 512);
    assert!(params.to_string().contains("512"));
}
