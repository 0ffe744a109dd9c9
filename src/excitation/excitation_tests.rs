use std::collections::HashSet;

use crate::determinant::{Determinant, DeterminantError, SpinChannel};
use crate::excitation::{
    all_singles, connected_determinants, connected_determinants_of,
    constrained_connected_determinants, constrained_opposite_spin_doubles,
    constrained_same_spin_doubles, constrained_singles, generate, generate_constrained,
    opposite_spin_doubles, same_spin_doubles, Excitation, ExcitationConstraint, ExcitationKind,
    ExcitationMasks,
};
use crate::phase::Phase;

fn reference_4() -> Determinant {
    Determinant::from_orbitals(4, &[0, 1], &[0, 1]).unwrap()
}

#[test]
fn test_excitation_masks_unconstrained() {
    let det = reference_4();
    let masks = ExcitationMasks::unconstrained(&det);
    for spin in SpinChannel::ALL {
        assert_eq!(masks.channel(spin).hole_indices(), vec![0, 1]);
        assert_eq!(masks.channel(spin).particle_indices(), vec![2, 3]);
    }
    assert_eq!(
        ExcitationMasks::resolve(&det, None, None).unwrap(),
        masks
    );
}

#[test]
fn test_excitation_masks_constrained() {
    let det = Determinant::from_orbitals(6, &[0, 1, 2], &[0, 1]).unwrap();
    let cons = ExcitationConstraint::new(&[1, 2, 4], &[0, 3, 5]);
    let masks = ExcitationMasks::resolve(&det, Some(&cons), Some(5)).unwrap();

    let alpha = masks.channel(SpinChannel::Alpha);
    assert_eq!(alpha.hole_indices(), vec![1, 2]);
    assert_eq!(alpha.particle_indices(), vec![3]);
    let beta = masks.channel(SpinChannel::Beta);
    assert_eq!(beta.hole_indices(), vec![1]);
    assert_eq!(beta.particle_indices(), vec![3]);

    for spin in SpinChannel::ALL {
        let chan = masks.channel(spin);
        assert!(chan.holes().bitwise_and(chan.particles()).unwrap().is_empty());
    }
}

#[test]
fn test_excitation_masks_errors() {
    let det = reference_4();
    assert_eq!(
        ExcitationMasks::resolve(&det, None, Some(5)),
        Err(DeterminantError::InvalidOrbitalIndex { index: 5, n_mos: 4 })
    );
    assert!(matches!(
        ExcitationMasks::resolve(&det, Some(&ExcitationConstraint::new(&[1, 1], &[2])), None),
        Err(DeterminantError::MalformedConstraint(_))
    ));
    assert!(matches!(
        ExcitationMasks::resolve(&det, Some(&ExcitationConstraint::new(&[1], &[7])), None),
        Err(DeterminantError::MalformedConstraint(_))
    ));

    let masks = ExcitationMasks::resolve(&det, Some(&ExcitationConstraint::new(&[], &[])), None)
        .unwrap();
    for spin in SpinChannel::ALL {
        assert!(masks.channel(spin).holes().is_empty());
        assert!(masks.channel(spin).particles().is_empty());
    }
}

#[test]
fn test_excitation_singles_order_and_phases() {
    let det = reference_4();
    let singles = all_singles(&det);
    assert_eq!(singles.len(), 8);
    assert_eq!(singles.n_mos(), 4);

    let alpha_strings = singles
        .iter()
        .take(4)
        .map(|d| d.alpha().to_string())
        .collect::<Vec<_>>();
    assert_eq!(alpha_strings, vec!["0110", "0101", "1010", "1001"]);
    assert!(singles.iter().take(4).all(|d| d.beta() == det.beta()));
    assert!(singles.iter().skip(4).all(|d| d.alpha() == det.alpha()));

    let phases = [(0, 2), (0, 3), (1, 2), (1, 3)]
        .iter()
        .map(|&(h, p)| det.phase_single_excitation(SpinChannel::Alpha, h, p).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        phases,
        vec![
            Phase::Negative,
            Phase::Negative,
            Phase::Positive,
            Phase::Positive
        ]
    );
}

#[test]
fn test_excitation_constrained_singles() {
    let det = reference_4();
    let cons = ExcitationConstraint::new(&[1], &[3]);
    let singles = constrained_singles(&det, Some(&cons), None).unwrap();
    assert_eq!(singles.len(), 2);
    assert_eq!(singles[0].to_string(), "1001|1100");
    assert_eq!(singles[1].to_string(), "1100|1001");
    assert_eq!(
        Excitation::between(&det, &singles[0])
            .unwrap()
            .unwrap()
            .phase(&det)
            .unwrap(),
        Phase::Positive
    );

    // Holes listed on unoccupied orbitals are ignored.
    let cons = ExcitationConstraint::new(&[1, 3], &[2, 3]);
    assert_eq!(constrained_singles(&det, Some(&cons), None).unwrap().len(), 4);

    let cut = constrained_singles(&det, None, Some(3)).unwrap();
    assert_eq!(cut.len(), 4);
    assert!(cut
        .iter()
        .all(|d| !d.alpha().get(3).unwrap() && !d.beta().get(3).unwrap()));

    let empty = constrained_singles(&det, Some(&ExcitationConstraint::new(&[], &[])), None).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_excitation_counts() {
    let det = reference_4();
    assert_eq!(same_spin_doubles(&det).len(), 2);
    assert_eq!(opposite_spin_doubles(&det).len(), 16);
    assert_eq!(connected_determinants(&det).len(), 26);

    // n_occ = 3, n_virt = 3 in α; n_occ = 2, n_virt = 4 in β.
    let det = Determinant::from_orbitals(6, &[0, 1, 2], &[0, 1]).unwrap();
    assert_eq!(all_singles(&det).len(), 9 + 8);
    assert_eq!(same_spin_doubles(&det).len(), 3 * 3 + 6);
    assert_eq!(opposite_spin_doubles(&det).len(), 9 * 8);
    assert_eq!(
        connected_determinants(&det).len(),
        all_singles(&det).len() + same_spin_doubles(&det).len() + opposite_spin_doubles(&det).len()
    );

    let unique = connected_determinants(&det)
        .into_iter()
        .collect::<HashSet<_>>();
    assert_eq!(unique.len(), 17 + 15 + 72);
    assert!(!unique.contains(&det));
}

#[test]
fn test_excitation_doubles_order() {
    let det = Determinant::from_orbitals(6, &[0, 1, 2], &[]).unwrap();
    let doubles = same_spin_doubles(&det);
    assert_eq!(doubles.len(), 9);
    assert_eq!(doubles[0].alpha().occupied_orbitals(), vec![2, 3, 4]);
    assert_eq!(doubles[1].alpha().occupied_orbitals(), vec![2, 3, 5]);
    assert_eq!(doubles[3].alpha().occupied_orbitals(), vec![1, 3, 4]);
    assert_eq!(doubles[8].alpha().occupied_orbitals(), vec![0, 4, 5]);

    let det = reference_4();
    let os = opposite_spin_doubles(&det);
    assert_eq!(os[0].to_string(), "0110|0110");
    assert_eq!(os[1].to_string(), "0110|0101");
    assert_eq!(os[4].to_string(), "0101|0110");
}

#[test]
fn test_excitation_constrained_doubles() {
    let det = Determinant::from_orbitals(6, &[0, 1, 2], &[0, 1, 2]).unwrap();
    let cons = ExcitationConstraint::new(&[1, 2], &[3, 4]);
    let ss = constrained_same_spin_doubles(&det, Some(&cons), None).unwrap();
    assert_eq!(ss.len(), 2);
    assert_eq!(ss[0].alpha().occupied_orbitals(), vec![0, 3, 4]);

    let os = constrained_opposite_spin_doubles(&det, Some(&cons), Some(4)).unwrap();
    // Only particle 3 survives the cut-off.
    assert_eq!(os.len(), 4);

    let all = constrained_connected_determinants(&det, Some(&cons), None).unwrap();
    assert_eq!(all.len(), 8 + 2 + 16);
    assert_eq!(
        generate_constrained(&det, ExcitationKind::Connected, Some(&cons), None).unwrap(),
        all
    );
    assert_eq!(
        generate_constrained(&det, ExcitationKind::Singles, None, None).unwrap(),
        generate(&det, ExcitationKind::Singles)
    );
}

#[test]
fn test_excitation_between() {
    let det = reference_4();

    let target = Determinant::from_orbitals(4, &[0, 2], &[0, 1]).unwrap();
    let exc = Excitation::between(&det, &target).unwrap().unwrap();
    assert_eq!(
        exc,
        Excitation::Single {
            spin: SpinChannel::Alpha,
            h: 1,
            p: 2
        }
    );
    assert_eq!(exc.degree(), 1);
    assert_eq!(exc.apply(&det).unwrap(), target);
    assert_eq!(exc.phase(&det).unwrap(), Phase::Positive);
    assert_eq!(exc.to_string(), "1α → 2α");

    let target = Determinant::from_orbitals(4, &[0, 1], &[2, 3]).unwrap();
    let exc = Excitation::between(&det, &target).unwrap().unwrap();
    assert_eq!(
        exc,
        Excitation::SameSpinDouble {
            spin: SpinChannel::Beta,
            h1: 0,
            h2: 1,
            p1: 2,
            p2: 3
        }
    );
    assert_eq!(exc.apply(&det).unwrap(), target);

    let target = Determinant::from_orbitals(4, &[1, 3], &[0, 2]).unwrap();
    let exc = Excitation::between(&det, &target).unwrap().unwrap();
    assert_eq!(
        exc,
        Excitation::OppositeSpinDouble {
            h_alpha: 0,
            p_alpha: 3,
            h_beta: 1,
            p_beta: 2
        }
    );
    assert_eq!(exc.degree(), 2);
    assert_eq!(exc.apply(&det).unwrap(), target);
    assert_eq!(exc.phase(&det).unwrap(), Phase::Negative);

    assert_eq!(Excitation::between(&det, &det).unwrap(), None);
    let triple = Determinant::from_orbitals(4, &[2, 3], &[0, 2]).unwrap();
    assert_eq!(Excitation::between(&det, &triple).unwrap(), None);
    let ionised = Determinant::from_orbitals(4, &[0], &[0, 1]).unwrap();
    assert_eq!(Excitation::between(&det, &ionised).unwrap(), None);
    assert!(Excitation::between(&det, &Determinant::new(5)).is_err());
}

#[test]
fn test_excitation_between_recovers_generated() {
    let det = Determinant::from_orbitals(5, &[0, 1, 3], &[0, 2]).unwrap();
    connected_determinants(&det).iter().for_each(|target| {
        let exc = Excitation::between(&det, target).unwrap().unwrap();
        assert_eq!(&exc.apply(&det).unwrap(), target);
    });
}

#[test]
fn test_excitation_connected_of_sources() {
    let a = reference_4();
    let b = Determinant::from_orbitals(4, &[0, 2], &[0, 1]).unwrap();
    let sources = vec![a.clone(), b.clone()];

    let excluded =
        connected_determinants_of(&sources, ExcitationKind::Singles, None, None, true).unwrap();
    assert_eq!(excluded.len(), 12);
    assert!(!excluded.iter().any(|d| d == &a || d == &b));
    assert_eq!(
        excluded.iter().collect::<HashSet<_>>().len(),
        excluded.len()
    );
    // The first source's singles lead, in generation order.
    assert_eq!(excluded[0], all_singles(&a)[0]);

    let included =
        connected_determinants_of(&sources, ExcitationKind::Singles, None, None, false).unwrap();
    assert_eq!(included.len(), 14);
    assert!(included.iter().any(|d| d == &a));
    assert!(included.iter().any(|d| d == &b));

    let single_source =
        connected_determinants_of(&[a.clone()], ExcitationKind::Connected, None, None, true)
            .unwrap();
    assert_eq!(single_source, connected_determinants(&a));

    let empty = connected_determinants_of(&[], ExcitationKind::Connected, None, None, true).unwrap();
    assert!(empty.is_empty());

    assert_eq!(
        connected_determinants_of(
            &[a, Determinant::new(5)],
            ExcitationKind::Singles,
            None,
            None,
            true
        ),
        Err(DeterminantError::DimensionMismatch { lhs: 4, rhs: 5 })
    );
}

#[test]
fn test_excitation_constrained_singles_alpha_only() {
    let det = Determinant::from_orbitals(4, &[0, 1], &[]).unwrap();

    let singles = all_singles(&det);
    assert_eq!(singles.len(), 4);
    assert!(singles.iter().all(|d| d.beta().is_empty()));

    let cons = ExcitationConstraint::new(&[1], &[3]);
    let constrained = constrained_singles(&det, Some(&cons), None).unwrap();
    assert_eq!(constrained.len(), 1);
    assert_eq!(constrained[0].to_string(), "1001|0000");
    assert_eq!(
        Excitation::between(&det, &constrained[0]).unwrap(),
        Some(Excitation::Single {
            spin: SpinChannel::Alpha,
            h: 1,
            p: 3
        })
    );
    assert_eq!(
        det.phase_single_excitation(SpinChannel::Alpha, 1, 3).unwrap(),
        Phase::Positive
    );
}

#[test]
fn test_excitation_kind_default() {
    assert_eq!(ExcitationKind::default(), ExcitationKind::Connected);
}
