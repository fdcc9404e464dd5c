#[macro_use]
extern crate interval_gate;

use interval_gate::test_utilities::current_moment;
use interval_gate::test_utilities::variants::Variant;
use interval_gate::Gate;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const ZERO: Duration = Duration::from_secs(0);

#[test]
fn accepts_first_caller() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let gate = G::construct(now);
            assert_eq!(ZERO, gate.try_take(now, Duration::from_secs(1)), "{:?}", v);
        });
    }
}

#[test]
fn accepts_first_caller_long_after_construction() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let start = current_moment();
            let gate = G::construct(start);
            let later = start + Duration::from_secs(3600);
            assert_eq!(ZERO, gate.try_take(later, Duration::from_secs(1)), "{:?}", v);
        });
    }
}

#[test]
fn reports_remaining_wait() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let ms = Duration::from_millis(1);
            let s = Duration::from_secs(1);
            let gate = G::construct(now);
            assert_eq!(ZERO, gate.try_take(now, s));
            assert_eq!(s, gate.try_take(now, s), "{:?}", v);
            assert_eq!(ms * 750, gate.try_take(now + ms * 250, s), "{:?}", v);
            assert_eq!(ms, gate.try_take(now + ms * 999, s), "{:?}", v);
            assert_eq!(ZERO, gate.try_take(now + s, s), "{:?}", v);
        });
    }
}

#[test]
fn waiting_does_not_change_state() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let s = Duration::from_secs(1);
            let gate = G::construct(now);
            gate.try_take(now, s);
            let next = gate.next_permitted();
            for _ in 0..10 {
                assert!(gate.try_take(now, s) > ZERO);
            }
            assert_eq!(next, gate.next_permitted(), "{:?}", v);
        });
    }
}

#[test]
fn slots_begin_one_interval_after_each_grant() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let ms = Duration::from_millis(1);
            let s = Duration::from_secs(1);
            let gate = G::construct(now);
            assert_eq!(ZERO, gate.try_take(now, s));
            assert_eq!(now + s, gate.next_permitted());

            // A late caller moves the next slot relative to its own arrival:
            assert_eq!(ZERO, gate.try_take(now + ms * 1500, s));
            assert_eq!(now + ms * 2500, gate.next_permitted(), "{:?}", v);
        });
    }
}

#[test]
fn prevents_time_travel() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let ms = Duration::from_millis(1);
            let s = Duration::from_secs(1);
            let gate = G::construct(now);
            assert_eq!(ZERO, gate.try_take(now + ms * 10, s));
            // Asking with an instant before the gate's start counts as the start:
            assert_eq!(ms * 1010, gate.try_take(now - ms * 500, s), "{:?}", v);
        });
    }
}

#[test]
fn works_with_mock_instants() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let s = Duration::from_secs(1);
            let gate: G<Duration> = Gate::construct(ZERO);
            assert_eq!(ZERO, gate.try_take(ZERO, s));
            assert_eq!(s / 2, gate.try_take(s / 2, s), "{:?}", v);
            assert_eq!(s, gate.next_permitted());
        });
    }
}

#[test]
fn actual_threadsafety() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let s = Duration::from_secs(1);
            let gate = Arc::new(G::construct(now));
            let mut children = vec![];

            for _i in 0..20 {
                let gate = gate.clone();
                children.push(thread::spawn(move || gate.try_take(now, s) == ZERO));
            }
            let granted = children
                .into_iter()
                .map(|child| child.join().unwrap())
                .filter(|granted| *granted)
                .count();
            assert_eq!(1, granted, "{:?}", v);
            assert!(gate.try_take(now, s) > ZERO);
            assert_eq!(ZERO, gate.try_take(now + s, s));
        });
    }
}

#[test]
fn contended_slots_are_granted_once_each() {
    for v in Variant::ALL {
        test_with_gate_variants!(v, G, {
            let now = current_moment();
            let ms = Duration::from_millis(1);
            let gate = Arc::new(G::construct(now));
            let mut children = vec![];

            // Every thread asks at each millisecond of a 100ms window,
            // with a 10ms interval: exactly 10 slots exist.
            for _i in 0..8 {
                let gate = gate.clone();
                children.push(thread::spawn(move || {
                    (0..100u32)
                        .filter(|i| gate.try_take(now + ms * *i, ms * 10) == ZERO)
                        .count()
                }));
            }
            let granted: usize = children.into_iter().map(|c| c.join().unwrap()).sum();
            assert!(granted <= 10, "{:?}: {} grants", v, granted);
            assert!(granted >= 1, "{:?}", v);
        });
    }
}
