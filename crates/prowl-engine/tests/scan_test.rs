//! Phase-2 properties: fixed-increment traversal, the frozen entry extent,
//! and the horizontal probe's round-trip contract.

mod common;

use common::{fast_tuning, FakeHorizontal, FakePage};
use prowl_engine::explore::scan;
use prowl_engine::trace::{Step, Trace};

fn scroll_positions(trace: &Trace) -> Vec<f64> {
    trace
        .steps
        .iter()
        .filter_map(|s| match s {
            Step::Scroll { position } => Some(*position),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn positions_advance_by_the_scan_step() {
    let mut page = FakePage::with_page(600.0, 500.0);
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert_eq!(scroll_positions(&trace), vec![0.0, 20.0, 40.0, 60.0, 80.0]);
}

#[tokio::test]
async fn non_scrolling_page_still_gets_one_pass() {
    let mut page = FakePage::with_page(500.0, 500.0);
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert_eq!(scroll_positions(&trace), vec![0.0]);
}

#[tokio::test]
async fn extent_is_frozen_at_entry() {
    // Content grows on every scroll, but the loop bound was measured once.
    let mut page = FakePage::with_page(1000.0, 500.0);
    page.grow_step = 500.0;
    page.grow_limit = 4000.0;
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    let positions = scroll_positions(&trace);
    assert!(positions.iter().all(|p| *p < 500.0));
    assert!(page.content_height > 1000.0);
}

#[tokio::test]
async fn horizontal_probe_round_trips_and_marks_visited() {
    let mut page = FakePage::with_page(700.0, 500.0);
    page.horizontals = vec![FakeHorizontal {
        id: 40,
        content_width: 900.0,
        viewport_width: 300.0,
        position: 0.0,
        overflow_x: "auto".into(),
        in_viewport: true,
        immovable: false,
    }];
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    // Exercised exactly once across all iterations, offset restored.
    let hsteps: Vec<&Step> = trace
        .steps
        .iter()
        .filter(|s| matches!(s, Step::HorizontalScroll { .. }))
        .collect();
    assert_eq!(hsteps.len(), 1);
    assert!(matches!(hsteps[0], Step::HorizontalScroll { count: 1 }));
    assert_eq!(page.horizontals[0].position, 0.0);
}

#[tokio::test]
async fn small_overflow_below_tolerance_is_ignored() {
    let mut page = FakePage::with_page(500.0, 500.0);
    page.horizontals = vec![FakeHorizontal {
        id: 41,
        content_width: 303.0,
        viewport_width: 300.0,
        position: 0.0,
        overflow_x: "visible".into(),
        in_viewport: true,
        immovable: false,
    }];
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert!(
        !trace
            .steps
            .iter()
            .any(|s| matches!(s, Step::HorizontalScroll { .. }))
    );
}

#[tokio::test]
async fn styled_overflow_qualifies_even_below_tolerance() {
    let mut page = FakePage::with_page(500.0, 500.0);
    page.horizontals = vec![FakeHorizontal {
        id: 42,
        content_width: 303.0,
        viewport_width: 300.0,
        position: 0.0,
        overflow_x: "scroll".into(),
        in_viewport: true,
        immovable: false,
    }];
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert!(
        trace
            .steps
            .iter()
            .any(|s| matches!(s, Step::HorizontalScroll { count: 1 }))
    );
}

#[tokio::test]
async fn immovable_region_is_never_marked_or_counted() {
    let mut page = FakePage::with_page(700.0, 500.0);
    page.horizontals = vec![FakeHorizontal {
        id: 43,
        content_width: 900.0,
        viewport_width: 300.0,
        position: 0.0,
        overflow_x: "auto".into(),
        in_viewport: true,
        immovable: true,
    }];
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert!(
        !trace
            .steps
            .iter()
            .any(|s| matches!(s, Step::HorizontalScroll { .. }))
    );
    assert_eq!(page.horizontals[0].position, 0.0);
}

#[tokio::test]
async fn out_of_viewport_region_is_left_alone() {
    let mut page = FakePage::with_page(500.0, 500.0);
    page.horizontals = vec![FakeHorizontal {
        id: 44,
        content_width: 900.0,
        viewport_width: 300.0,
        position: 0.0,
        overflow_x: "auto".into(),
        in_viewport: false,
        immovable: false,
    }];
    let tuning = fast_tuning();
    let mut trace = Trace::default();

    scan::interaction_pass(&mut page, &tuning, &mut trace, 20)
        .await
        .unwrap();

    assert!(
        !trace
            .steps
            .iter()
            .any(|s| matches!(s, Step::HorizontalScroll { .. }))
    );
}
