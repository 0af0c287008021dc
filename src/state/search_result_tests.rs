//! Tests for SearchResult.

use super::*;
use std::sync::atomic::AtomicUsize;

fn at(row: usize, column: usize) -> SearchMatch {
    SearchMatch::new(CellRef::new(row, column), 0, 1)
}

fn result_with(positions: &[(usize, usize)]) -> SearchResult {
    let result = SearchResult::new();
    result.set_matches(positions.iter().map(|&(r, c)| at(r, c)).collect());
    result
}

fn position(m: Option<SearchMatch>) -> Option<(usize, usize)> {
    m.map(|m| (m.row_index(), m.column_index()))
}

// ===== Queries & Lifecycle =====

#[test]
fn new_result_is_empty_and_idle() {
    let result = SearchResult::new();

    assert!(result.is_empty());
    assert_eq!(result.size(), 0);
    assert!(!result.is_updating());
    assert!(result.selected().is_none());
    assert_eq!(result.generation(), 0);
}

#[test]
fn clear_drops_matches_and_selection() {
    let result = result_with(&[(0, 0), (1, 1)]);
    result.select_next(ScrollPolicy::Horizontal);
    assert!(result.selected().is_some());

    result.clear();

    assert!(result.is_empty());
    assert!(result.selected().is_none());
}

#[test]
fn start_updating_resets_in_place() {
    let result = result_with(&[(0, 0)]);
    result.select_next(ScrollPolicy::Horizontal);

    result.start_updating(17);

    assert_eq!(result.generation(), 17);
    assert!(result.is_updating());
    assert!(result.is_empty());
    assert!(result.selected().is_none());
}

#[test]
fn stop_updating_is_idempotent() {
    let result = SearchResult::new();
    result.start_updating(1);

    result.stop_updating();
    result.stop_updating();

    assert!(!result.is_updating());
}

#[test]
fn check_generation_accepts_current_generation() {
    let result = SearchResult::new();
    result.start_updating(5);

    assert_eq!(result.check_generation(5), Ok(()));
}

#[test]
fn check_generation_fails_after_newer_start() {
    let result = SearchResult::new();
    result.start_updating(1);
    result.start_updating(2);

    assert_eq!(
        result.check_generation(1),
        Err(ScanAbort::StaleGeneration {
            expected: 1,
            current: 2
        })
    );
}

#[test]
fn next_generation_strictly_increases() {
    let result = SearchResult::new();

    let first = result.next_generation();
    let second = result.next_generation();

    assert!(second > first);
}

#[test]
fn next_generation_skips_past_externally_started_generation() {
    let result = SearchResult::new();
    result.start_updating(100);

    assert!(result.next_generation() > 100);
}

#[test]
fn set_matches_replaces_list() {
    let result = result_with(&[(0, 0)]);

    result.set_matches(vec![at(1, 1), at(2, 2)]);

    assert_eq!(result.size(), 2);
    assert_eq!(result.matches()[0], at(1, 1));
}

#[test]
fn set_matches_keeps_selection_present_in_new_list() {
    let result = result_with(&[(0, 0), (1, 1)]);
    result.select_first(1, 0, ScrollPolicy::Horizontal);

    result.set_matches(vec![at(0, 5), at(1, 1)]);

    assert_eq!(position(result.selected()), Some((1, 1)));
    assert_eq!(result.selected_position(), Some((2, 2)));
}

#[test]
fn set_matches_drops_selection_missing_from_new_list() {
    let result = result_with(&[(0, 0), (1, 1)]);
    result.select_next(ScrollPolicy::Horizontal);

    result.set_matches(vec![at(3, 3)]);

    assert!(result.selected().is_none());
}

#[test]
fn publish_with_current_generation_replaces_matches() {
    let result = SearchResult::new();
    result.start_updating(3);

    let published = result.publish(3, vec![at(0, 0), at(0, 1)], false);

    assert_eq!(published, Ok(2));
    assert_eq!(result.size(), 2);
    assert!(!result.is_truncated());
}

#[test]
fn publish_with_stale_generation_is_rejected() {
    let result = SearchResult::new();
    result.start_updating(3);
    result.start_updating(4);

    let published = result.publish(3, vec![at(0, 0)], false);

    assert!(matches!(published, Err(ScanAbort::StaleGeneration { .. })));
    assert!(result.is_empty());
}

#[test]
fn publish_records_truncation_until_next_scan() {
    let result = SearchResult::new();
    result.start_updating(1);
    result.publish(1, vec![at(0, 0)], true).expect("current");
    assert!(result.is_truncated());

    result.start_updating(2);

    assert!(!result.is_truncated());
}

#[test]
fn finish_only_stops_current_generation() {
    let result = SearchResult::new();
    result.start_updating(1);
    result.start_updating(2);

    assert!(!result.finish(1));
    assert!(result.is_updating());
    assert!(result.finish(2));
    assert!(!result.is_updating());
}

#[test]
fn try_start_updating_accepts_newest_allocation() {
    let result = result_with(&[(0, 0)]);
    let generation = result.next_generation();

    assert!(result.try_start_updating(generation));
    assert_eq!(result.generation(), generation);
    assert!(result.is_updating());
    assert!(result.is_empty());
}

#[test]
fn try_start_updating_rejects_generation_allocated_before_newer_one() {
    let result = result_with(&[(0, 0)]);
    let older = result.next_generation();
    let newer = result.next_generation();

    assert!(!result.try_start_updating(older));
    assert_eq!(result.size(), 1);
    assert!(!result.is_updating());

    assert!(result.try_start_updating(newer));
    assert!(!result.try_start_updating(older));
    assert_eq!(result.generation(), newer);
}

#[test]
fn try_start_updating_runs_a_generation_once() {
    let result = Arc::new(SearchResult::new());
    let generation = result.next_generation();

    assert!(result.start_scan(generation).is_some());
    assert!(result.start_scan(generation).is_none());
}

#[test]
fn match_limit_round_trips() {
    let result = SearchResult::new();
    assert_eq!(result.match_limit(), None);

    result.set_match_limit(Some(10));

    assert_eq!(result.match_limit(), Some(10));
}

// ===== matches_for_cell =====

#[test]
fn matches_for_cell_yields_contiguous_run_in_offset_order() {
    let cell = CellRef::new(1, 1);
    let result = SearchResult::new();
    result.set_matches(vec![
        at(0, 0),
        SearchMatch::new(cell, 0, 3),
        SearchMatch::new(cell, 8, 11),
        at(2, 0),
    ]);

    let offsets: Vec<_> = result
        .matches_for_cell(cell)
        .expect("cell has matches")
        .map(|m| (m.start_offset(), m.end_offset()))
        .collect();

    assert_eq!(offsets, vec![(0, 3), (8, 11)]);
}

#[test]
fn matches_for_cell_without_matches_is_none() {
    let result = result_with(&[(0, 0)]);

    assert!(result.matches_for_cell(CellRef::new(5, 5)).is_none());
}

#[test]
fn matches_for_cell_on_empty_result_is_none() {
    assert!(SearchResult::new()
        .matches_for_cell(CellRef::new(0, 0))
        .is_none());
}

#[test]
fn matches_for_cell_stops_at_first_other_cell() {
    // Not a list the scan can produce: the iterator only follows the first run.
    let cell = CellRef::new(0, 0);
    let result = SearchResult::new();
    result.set_matches(vec![
        SearchMatch::new(cell, 0, 1),
        at(0, 1),
        SearchMatch::new(cell, 4, 5),
    ]);

    let count = result.matches_for_cell(cell).expect("cell has matches").count();

    assert_eq!(count, 1);
}

#[test]
fn matches_for_cell_iterates_snapshot() {
    let cell = CellRef::new(0, 0);
    let result = SearchResult::new();
    result.set_matches(vec![SearchMatch::new(cell, 0, 1), SearchMatch::new(cell, 2, 3)]);
    let mut iter = result.matches_for_cell(cell).expect("cell has matches");

    result.clear();

    assert!(iter.next().is_some());
    assert!(iter.next().is_some());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

// ===== Navigation =====

#[test]
fn select_next_without_selection_starts_at_origin() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);

    assert_eq!(position(result.select_next(ScrollPolicy::Horizontal)), Some((0, 1)));
}

#[test]
fn select_next_advances_in_reading_order() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);
    result.select_next(ScrollPolicy::Horizontal);

    assert_eq!(position(result.select_next(ScrollPolicy::Horizontal)), Some((2, 3)));
    assert_eq!(position(result.select_next(ScrollPolicy::Horizontal)), Some((4, 0)));
}

#[test]
fn select_next_wraps_from_last_to_first() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);
    result.select_first(4, 0, ScrollPolicy::Horizontal);

    assert_eq!(position(result.select_next(ScrollPolicy::Horizontal)), Some((0, 1)));
}

#[test]
fn select_previous_wraps_from_first_to_last() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);
    result.select_first(0, 1, ScrollPolicy::Horizontal);

    assert_eq!(
        position(result.select_previous(ScrollPolicy::Horizontal)),
        Some((4, 0))
    );
}

#[test]
fn select_previous_without_selection_starts_at_end() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);

    assert_eq!(
        position(result.select_previous(ScrollPolicy::Horizontal)),
        Some((4, 0))
    );
}

#[test]
fn select_previous_walks_backwards() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);
    result.select_first(4, 0, ScrollPolicy::Horizontal);

    assert_eq!(
        position(result.select_previous(ScrollPolicy::Horizontal)),
        Some((2, 3))
    );
    assert_eq!(
        position(result.select_previous(ScrollPolicy::Horizontal)),
        Some((0, 1))
    );
}

#[test]
fn policies_order_matches_differently() {
    let horizontal = result_with(&[(0, 5), (3, 1)]);
    let vertical = result_with(&[(0, 5), (3, 1)]);

    assert_eq!(
        position(horizontal.select_first(0, 0, ScrollPolicy::Horizontal)),
        Some((0, 5))
    );
    assert_eq!(
        position(vertical.select_first(0, 0, ScrollPolicy::Vertical)),
        Some((3, 1))
    );
}

#[test]
fn vertical_next_wraps_to_first_in_column_order() {
    let result = result_with(&[(0, 5), (3, 1)]);

    assert_eq!(
        position(result.select_first(0, 6, ScrollPolicy::Vertical)),
        Some((3, 1))
    );
}

#[test]
fn vertical_previous_without_selection_starts_at_last_column() {
    let result = result_with(&[(0, 5), (3, 1)]);

    assert_eq!(
        position(result.select_previous(ScrollPolicy::Vertical)),
        Some((0, 5))
    );
}

#[test]
fn vertical_next_steps_down_the_column() {
    let result = result_with(&[(0, 0), (1, 0), (0, 1)]);
    result.select_first(0, 0, ScrollPolicy::Vertical);

    assert_eq!(position(result.select_next(ScrollPolicy::Vertical)), Some((1, 0)));
}

#[test]
fn same_cell_matches_are_skipped_by_next() {
    let cell = CellRef::new(0, 0);
    let result = SearchResult::new();
    result.set_matches(vec![
        SearchMatch::new(cell, 0, 1),
        SearchMatch::new(cell, 4, 5),
        at(1, 0),
    ]);
    result.select_next(ScrollPolicy::Horizontal);

    assert_eq!(position(result.select_next(ScrollPolicy::Horizontal)), Some((1, 0)));
}

#[test]
fn select_first_picks_match_at_start_position() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);

    assert_eq!(
        position(result.select_first(2, 3, ScrollPolicy::Horizontal)),
        Some((2, 3))
    );
    assert_eq!(position(result.selected()), Some((2, 3)));
}

#[test]
fn select_first_past_last_match_wraps() {
    let result = result_with(&[(0, 1), (2, 3)]);

    assert_eq!(
        position(result.select_first(9, 9, ScrollPolicy::Horizontal)),
        Some((0, 1))
    );
}

#[test]
fn navigation_is_noop_while_updating() {
    let result = result_with(&[(0, 1)]);
    result.select_next(ScrollPolicy::Horizontal);
    result.start_updating(1);
    result.set_matches(vec![at(0, 1), at(1, 1)]);

    assert!(result.select_next(ScrollPolicy::Horizontal).is_none());
    assert!(result.select_previous(ScrollPolicy::Horizontal).is_none());
    assert!(result.select_first(0, 0, ScrollPolicy::Horizontal).is_none());
    assert!(result.selected().is_none());
}

#[test]
fn navigation_on_empty_result_selects_nothing() {
    let result = SearchResult::new();

    assert!(result.select_next(ScrollPolicy::Horizontal).is_none());
    assert!(result.select_previous(ScrollPolicy::Vertical).is_none());
    assert!(result.selected_position().is_none());
}

#[test]
fn selected_position_is_one_based() {
    let result = result_with(&[(0, 1), (2, 3), (4, 0)]);
    result.select_first(2, 0, ScrollPolicy::Horizontal);

    assert_eq!(result.selected_position(), Some((2, 3)));
}

// ===== Listeners =====

#[test]
fn notify_listeners_calls_every_listener() {
    let result = SearchResult::new();
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        result.add_listener(move |_: &SearchResult| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    result.notify_listeners();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn listener_can_read_result_during_notification() {
    let result = result_with(&[(0, 0), (1, 1)]);
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_listener = Arc::clone(&seen);
    result.add_listener(move |r: &SearchResult| {
        seen_in_listener.store(r.size(), Ordering::SeqCst);
    });

    result.notify_listeners();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
