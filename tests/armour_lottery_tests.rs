use duelsim::combat::{
    armour_for_hit, coverage_bands, select_armour, Armour, ArmourCandidate, ArmourSlot, BodyPart,
    Combatant, FighterTemplate, Rng, ARMOUR_DRAW_MAX,
};
use duelsim::data::GameData;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn candidate(slot: ArmourSlot, value: f64, coverage: f64) -> ArmourCandidate {
    ArmourCandidate {
        slot,
        value,
        coverage,
    }
}

fn assert_contiguous_from_one(candidates: &[ArmourCandidate]) {
    let bands = coverage_bands(candidates);
    let mut next = 1;
    for band in &bands {
        assert_eq!(band.lo, next, "bands {bands:?}");
        assert!(band.hi >= band.lo);
        next = band.hi + 1;
    }
}

#[test]
fn partial_coverage_leaves_the_top_of_the_draw_unprotected() {
    let candidates = [
        candidate(ArmourSlot::Head, 40.0, 40.0),
        candidate(ArmourSlot::Body, 35.0, 30.0),
    ];
    assert_contiguous_from_one(&candidates);
    assert_eq!(select_armour(&candidates, 1).map(|c| c.slot), Some(ArmourSlot::Head));
    assert_eq!(select_armour(&candidates, 4_000).map(|c| c.slot), Some(ArmourSlot::Head));
    assert_eq!(select_armour(&candidates, 4_001).map(|c| c.slot), Some(ArmourSlot::Body));
    assert_eq!(select_armour(&candidates, 7_000).map(|c| c.slot), Some(ArmourSlot::Body));
    assert_eq!(select_armour(&candidates, 7_001), None);
    assert_eq!(select_armour(&candidates, ARMOUR_DRAW_MAX), None);
}

fn owner(candidates: &[ArmourCandidate], draw: u32) -> Option<ArmourSlot> {
    select_armour(candidates, draw).map(|c| c.slot)
}

/// Upper band edge, owner up to and at the edge, owner just past it.
type Edge = (u32, Option<ArmourSlot>, Option<ArmourSlot>);

fn assert_edges(candidates: &[ArmourCandidate], edges: &[Edge]) {
    for &(edge, below, above) in edges {
        assert_eq!(owner(candidates, edge - 1), below, "draw {}", edge - 1);
        assert_eq!(owner(candidates, edge), below, "draw {edge}");
        assert_eq!(owner(candidates, edge + 1), above, "draw {}", edge + 1);
    }
}

#[test]
fn four_pieces_below_full_coverage_split_the_draw_in_slot_order() {
    let candidates = [
        candidate(ArmourSlot::Head, 45.0, 10.0),
        candidate(ArmourSlot::Body, 30.0, 25.0),
        candidate(ArmourSlot::Hands, 25.0, 15.0),
        candidate(ArmourSlot::Legs, 20.0, 30.0),
    ];
    assert_contiguous_from_one(&candidates);

    let edges: Vec<(u32, u32)> = coverage_bands(&candidates)
        .iter()
        .map(|band| (band.lo, band.hi))
        .collect();
    assert_eq!(edges, vec![(1, 1_000), (1_001, 3_500), (3_501, 5_000), (5_001, 8_000)]);

    assert_eq!(owner(&candidates, 1), Some(ArmourSlot::Head));
    assert_edges(
        &candidates,
        &[
            (1_000, Some(ArmourSlot::Head), Some(ArmourSlot::Body)),
            (3_500, Some(ArmourSlot::Body), Some(ArmourSlot::Hands)),
            (5_000, Some(ArmourSlot::Hands), Some(ArmourSlot::Legs)),
            (8_000, Some(ArmourSlot::Legs), None),
        ],
    );
    assert_eq!(owner(&candidates, ARMOUR_DRAW_MAX), None);

    let protected = (1..=ARMOUR_DRAW_MAX)
        .filter(|&draw| owner(&candidates, draw).is_some())
        .count();
    assert_eq!(protected, 8_000);
}

#[test]
fn full_coverage_ranks_by_value_and_spans_every_draw() {
    let candidates = [
        candidate(ArmourSlot::Body, 30.0, 100.0),
        candidate(ArmourSlot::Hands, 25.0, 60.0),
        candidate(ArmourSlot::Head, 45.0, 40.0),
        candidate(ArmourSlot::Legs, 20.0, 10.0),
    ];
    assert_contiguous_from_one(&candidates);

    // Head has the highest value and takes the bottom of the draw; body fills the rest.
    assert_eq!(owner(&candidates, 1), Some(ArmourSlot::Head));
    assert_edges(&candidates, &[(4_000, Some(ArmourSlot::Head), Some(ArmourSlot::Body))]);
    assert_eq!(owner(&candidates, ARMOUR_DRAW_MAX), Some(ArmourSlot::Body));
    assert!((1..=ARMOUR_DRAW_MAX).all(|draw| {
        matches!(owner(&candidates, draw), Some(ArmourSlot::Head | ArmourSlot::Body))
    }));
}

#[test]
fn lowest_piece_fills_the_remainder_past_the_ranked_bands() {
    let candidates = [
        candidate(ArmourSlot::Head, 50.0, 20.0),
        candidate(ArmourSlot::Body, 40.0, 20.0),
        candidate(ArmourSlot::Hands, 30.0, 20.0),
        candidate(ArmourSlot::Legs, 20.0, 20.0),
        candidate(ArmourSlot::Feet, 10.0, 20.0),
    ];
    assert_contiguous_from_one(&candidates);
    assert_edges(
        &candidates,
        &[
            (2_000, Some(ArmourSlot::Head), Some(ArmourSlot::Body)),
            (4_000, Some(ArmourSlot::Body), Some(ArmourSlot::Hands)),
            (6_000, Some(ArmourSlot::Hands), Some(ArmourSlot::Feet)),
        ],
    );
    assert_eq!(owner(&candidates, ARMOUR_DRAW_MAX), Some(ArmourSlot::Feet));
}

#[test]
fn uncovered_part_has_no_bands() {
    assert!(coverage_bands(&[]).is_empty());
    assert_eq!(select_armour(&[candidate(ArmourSlot::Feet, 30.0, 0.0)], 1), None);
}

#[test]
fn full_cover_helmet_absorbs_every_head_hit_without_a_draw() {
    let mut defender = Combatant::named("Tank");
    defender.armour.head = Some(Armour {
        name: "Riot Helmet".into(),
        value: 500.0,
        effect: None,
    });
    let template = FighterTemplate::prepare(&defender, &GameData::builtin());
    let candidates = template.armour_candidates(BodyPart::Head);
    assert_eq!(candidates.len(), 1);

    let mut rng = Rng::new(1);
    let mut untouched = rng;
    for _ in 0..100 {
        let piece = armour_for_hit(&candidates, &mut rng).expect("helmet covers the head");
        approx_eq(piece.value, 500.0, 1e-12);
    }
    assert_eq!(rng.next_u64(), untouched.next_u64());
}
