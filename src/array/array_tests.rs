use crate::array::DeterminantArray;
use crate::determinant::{Determinant, DeterminantError};

#[test]
fn test_array_construction() {
    let arr = DeterminantArray::new(3, 5);
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.n_mos(), 5);
    assert!(!arr.is_empty());
    assert!(arr.iter().all(|det| det == &Determinant::new(5)));

    let empty = DeterminantArray::new(0, 5);
    assert!(empty.is_empty());
    assert_eq!(empty.to_string(), "");

    let dets = vec![
        Determinant::from_orbitals(4, &[0], &[0]).unwrap(),
        Determinant::from_orbitals(4, &[1], &[0]).unwrap(),
    ];
    let arr = DeterminantArray::from_determinants(4, dets.clone()).unwrap();
    assert_eq!(arr.as_slice(), dets.as_slice());
    assert_eq!(arr.clone().into_vec(), dets);

    assert_eq!(
        DeterminantArray::from_determinants(5, dets),
        Err(DeterminantError::DimensionMismatch { lhs: 5, rhs: 4 })
    );
}

#[test]
fn test_array_get_set() {
    let mut arr = DeterminantArray::new(2, 4);
    let det = Determinant::from_orbitals(4, &[0, 1], &[2]).unwrap();

    arr.set(1, &det).unwrap();
    assert_eq!(arr.get(1), Some(&det));
    assert_eq!(arr[1], det);
    assert_eq!(arr[0], Determinant::new(4));
    assert_eq!(arr.get(2), None);

    assert_eq!(
        arr.set(2, &det),
        Err(DeterminantError::InvalidArrayIndex { index: 2, len: 2 })
    );
    assert_eq!(
        arr.set(0, &Determinant::new(6)),
        Err(DeterminantError::DimensionMismatch { lhs: 4, rhs: 6 })
    );
}

#[test]
fn test_array_iteration_and_display() {
    let dets = vec![
        Determinant::from_orbitals(3, &[0], &[1]).unwrap(),
        Determinant::from_orbitals(3, &[2], &[0]).unwrap(),
    ];
    let arr = DeterminantArray::from_determinants(3, dets.clone()).unwrap();

    let mut count = 0;
    for det in &arr {
        assert_eq!(det.popcount(), 2);
        count += 1;
    }
    assert_eq!(count, 2);
    assert_eq!(arr.to_string(), "0  100|010\n1  001|100\n");
    assert_eq!(arr.into_iter().collect::<Vec<_>>(), dets);
}

#[test]
fn test_array_deserialise_checks_orbital_count() {
    let arr = DeterminantArray::new(2, 3);
    let bytes = bincode::serialize(&arr).unwrap();
    assert_eq!(bincode::deserialize::<DeterminantArray>(&bytes).unwrap(), arr);

    let mismatched = bincode::serialize(&(5usize, vec![Determinant::new(3)])).unwrap();
    assert!(bincode::deserialize::<DeterminantArray>(&mismatched).is_err());
}
