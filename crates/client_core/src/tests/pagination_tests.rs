use super::*;

fn shape(model: &DisplayModel) -> Vec<String> {
    model
        .slots
        .iter()
        .map(|slot| match slot {
            Slot::Page { number, .. } => number.to_string(),
            Slot::Ellipsis => "…".to_string(),
        })
        .collect()
}

#[test]
fn same_arguments_give_same_model() {
    for (page, total) in [(1, 1), (5, 10), (3, 7), (10, 10)] {
        assert_eq!(
            compute_display_model(page, total, DEFAULT_MIN_SLOTS),
            compute_display_model(page, total, DEFAULT_MIN_SLOTS)
        );
    }
}

#[test]
fn single_page_is_padded_to_min_slots() {
    let model = compute_display_model(1, 1, 3);

    assert_eq!(
        model.slots,
        vec![
            Slot::Page {
                number: 1,
                enabled: true,
                current: true
            },
            Slot::Page {
                number: 2,
                enabled: false,
                current: false
            },
            Slot::Page {
                number: 3,
                enabled: false,
                current: false
            },
        ]
    );
    assert!(!model.can_go_prev);
    assert!(!model.can_go_next);
}

#[test]
fn long_collection_is_compacted_around_current_page() {
    let model = compute_display_model(5, 10, DEFAULT_MIN_SLOTS);
    assert_eq!(shape(&model), ["1", "…", "4", "5", "6", "…", "10"]);
    assert!(model.can_go_prev);
    assert!(model.can_go_next);
}

#[test]
fn seven_pages_are_listed_in_full() {
    let model = compute_display_model(1, 7, DEFAULT_MIN_SLOTS);
    assert_eq!(model.page_numbers(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert!(!model.slots.contains(&Slot::Ellipsis));
}

#[test]
fn edges_of_long_collection_have_one_ellipsis() {
    let first = compute_display_model(1, 10, DEFAULT_MIN_SLOTS);
    assert_eq!(shape(&first), ["1", "2", "…", "10"]);
    assert!(!first.can_go_prev);

    let last = compute_display_model(10, 10, DEFAULT_MIN_SLOTS);
    assert_eq!(shape(&last), ["1", "…", "9", "10"]);
    assert!(!last.can_go_next);

    let near_start = compute_display_model(3, 10, DEFAULT_MIN_SLOTS);
    assert_eq!(shape(&near_start), ["1", "2", "3", "4", "…", "10"]);
}

#[test]
fn padding_page_beyond_total_is_never_current() {
    let model = compute_display_model(3, 2, 3);
    assert_eq!(model.page_numbers(), vec![1, 2, 3]);
    assert!(model.slots.iter().all(|slot| !matches!(
        slot,
        Slot::Page { current: true, .. }
    )));
    assert!(!model.can_go_next);
}

#[test]
fn every_valid_input_yields_a_well_formed_model() {
    for total in 1..=20 {
        for page in 1..=total.max(DEFAULT_MIN_SLOTS) {
            let model = compute_display_model(page, total, DEFAULT_MIN_SLOTS);
            let numbers = model.page_numbers();

            assert!(!numbers.is_empty());
            assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{numbers:?}");
            assert!(model.slots.first() != Some(&Slot::Ellipsis));
            assert!(model.slots.last() != Some(&Slot::Ellipsis));
            assert!(!model
                .slots
                .windows(2)
                .any(|w| w[0] == Slot::Ellipsis && w[1] == Slot::Ellipsis));
        }
    }
}

#[test]
fn render_marks_current_and_disabled_slots() {
    assert_eq!(compute_display_model(5, 10, 3).render(), "‹ 1 … 4 [5] 6 … 10 ›");
    assert_eq!(compute_display_model(1, 1, 3).render(), "  [1] (2) (3)  ");
}
