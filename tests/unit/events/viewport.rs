use std::cell::Cell;

use super::*;
use crate::events::EventOrigin;

fn counting_listener(hits: &Rc<Cell<u32>>) -> Listener {
    let hits = Rc::clone(hits);
    Rc::new(move |ev: &MotionEvent| {
        assert_eq!(ev.origin, EventOrigin::Window);
        hits.set(hits.get() + 1);
    })
}

#[test]
fn dispatch_reaches_only_matching_kind() {
    let viewport = Viewport::new();
    let hits = Rc::new(Cell::new(0));
    let listener = counting_listener(&hits);
    viewport.add_listener(EventKind::Scroll, &listener);

    assert_eq!(viewport.dispatch(EventKind::Scroll), 1);
    assert_eq!(viewport.dispatch(EventKind::Resize), 0);
    assert_eq!(hits.get(), 1);
}

#[test]
fn duplicate_registration_is_ignored() {
    let viewport = Viewport::new();
    let hits = Rc::new(Cell::new(0));
    let listener = counting_listener(&hits);
    viewport.add_listener(EventKind::Wheel, &listener);
    viewport.add_listener(EventKind::Wheel, &listener);
    assert_eq!(viewport.listener_count(EventKind::Wheel), 1);

    viewport.dispatch(EventKind::Wheel);
    assert_eq!(hits.get(), 1);
}

#[test]
fn remove_is_by_identity() {
    let viewport = Viewport::new();
    let hits = Rc::new(Cell::new(0));
    let a = counting_listener(&hits);
    let b = counting_listener(&hits);
    viewport.add_listener(EventKind::Load, &a);
    viewport.add_listener(EventKind::Load, &b);

    assert!(viewport.remove_listener(EventKind::Load, &a));
    assert!(!viewport.remove_listener(EventKind::Load, &a));
    assert_eq!(viewport.listener_count(EventKind::Load), 1);

    viewport.dispatch(EventKind::Load);
    assert_eq!(hits.get(), 1);
}

#[test]
fn listener_removed_during_dispatch_still_runs_this_time() {
    let viewport = Viewport::new();
    let hits = Rc::new(Cell::new(0));
    let victim = counting_listener(&hits);

    let remover: Listener = {
        let viewport = viewport.clone();
        let victim = Rc::clone(&victim);
        Rc::new(move |_ev: &MotionEvent| {
            viewport.remove_listener(EventKind::TouchMove, &victim);
        })
    };
    viewport.add_listener(EventKind::TouchMove, &remover);
    viewport.add_listener(EventKind::TouchMove, &victim);

    assert_eq!(viewport.dispatch(EventKind::TouchMove), 2);
    assert_eq!(hits.get(), 1);
    assert_eq!(viewport.dispatch(EventKind::TouchMove), 1);
    assert_eq!(hits.get(), 1);
}
