//! Integration Tests for Dispatch and Formatting
//!
//! These tests drive signals and `printf` through the public API only.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chime_core::dispatch::{ConnectionId, Packed, Signal};
use chime_core::printf::{Arg, IoSink};
use chime_core::{printf, sprintf, FormatError};

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn free_a() -> i32 {
    1
}

fn free_b() -> i32 {
    2
}

/// A receiver that records every call it gets.
struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, log: &Log) -> Rc<Self> {
        Rc::new(Self {
            name,
            log: log.clone(),
        })
    }

    fn full(&self, a: i32, b: f64, c: &'static str) {
        self.log
            .borrow_mut()
            .push(format!("{}.full({a}, {b}, {c})", self.name));
    }

    fn first(&self, a: i32) {
        self.log.borrow_mut().push(format!("{}.first({a})", self.name));
    }

    fn value(&self) -> i32 {
        self.log.borrow_mut().push(format!("{}.value", self.name));
        self.name.len() as i32
    }
}

/// Test that slots of every arity fire in connection order.
#[test]
fn mixed_arity_slots_fire_in_connection_order() {
    let log = new_log();
    let signal: Signal<(i32, f64, &'static str)> = Signal::new();
    let recorder = Recorder::new("rec", &log);

    let l = log.clone();
    signal.connect(move || l.borrow_mut().push("none".into()));
    signal.connect_bound(&recorder, Recorder::first);
    let l = log.clone();
    signal.connect(move |a: i32, b: f64| l.borrow_mut().push(format!("pair({a}, {b})")));
    signal.connect_bound(&recorder, Recorder::full);

    signal.emit((7, 0.5, "x"));

    assert_eq!(
        *log.borrow(),
        vec![
            "none".to_string(),
            "rec.first(7)".to_string(),
            "pair(7, 0.5)".to_string(),
            "rec.full(7, 0.5, x)".to_string(),
        ]
    );
}

/// Test that every slot runs but only the last value is returned.
#[test]
fn last_connected_value_is_returned_after_all_side_effects() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let signal: Signal<(), i32> = Signal::new();

    for value in 1..=3 {
        let calls = calls.clone();
        signal.connect(move || {
            calls.borrow_mut().push(value);
            value
        });
    }

    assert_eq!(signal.emit(()), 3);
    assert_eq!(*calls.borrow(), vec![1, 2, 3]);
}

/// Test that an empty signal returns the default of its return type.
#[test]
fn empty_signals_return_defaults() {
    let number: Signal<(u8, u8), i64> = Signal::new();
    let text: Signal<(), String> = Signal::new();
    let list: Signal<(bool,), Vec<u32>> = Signal::new();

    assert_eq!(number.emit((1, 2)), 0);
    assert_eq!(text.emit(()), "");
    assert!(list.emit((true,)).is_empty());
}

/// Test that free and bound slots live side by side and are told apart.
#[test]
fn free_and_bound_slots_on_one_signal() {
    let log = new_log();
    let signal: Signal<(), i32> = Signal::new();
    let recorder = Recorder::new("abcd", &log);

    signal.connect(free_a as fn() -> i32);
    signal.connect_bound(&recorder, Recorder::value as fn(&Recorder) -> i32);
    assert_eq!(signal.emit(()), 4);

    // A different receiver with the same method does not match.
    let other = Recorder::new("zz", &log);
    assert!(!signal.disconnect_bound(&other, Recorder::value as fn(&Recorder) -> i32));
    assert_eq!(signal.len(), 2);

    assert!(signal.disconnect_bound(&recorder, Recorder::value as fn(&Recorder) -> i32));
    assert_eq!(signal.emit(()), 1);
    assert_eq!(Rc::strong_count(&recorder), 1);
}

/// Test that disconnecting something never connected changes nothing.
#[test]
fn unmatched_disconnect_is_a_no_op() {
    let signal: Signal<(), i32> = Signal::new();
    signal.connect(free_a as fn() -> i32);

    assert!(!signal.disconnect(free_b as fn() -> i32));
    assert!(!signal.disconnect(Packed(free_a as fn() -> i32)));
    assert_eq!(signal.len(), 1);
    assert_eq!(signal.emit(()), 1);
}

/// Test that a callable connected twice runs twice and disconnects once per call.
#[test]
fn duplicate_connections_are_independent() {
    let hits = Rc::new(Cell::new(0));
    let signal: Signal<(i32,)> = Signal::new();

    let h = hits.clone();
    let bump = move |n: i32| h.set(h.get() + n);
    let first = signal.connect(bump.clone());
    let second = signal.connect(bump);
    assert_ne!(first, second);

    signal.emit((5,));
    assert_eq!(hits.get(), 10);

    signal.disconnect_connection(first);
    signal.emit((5,));
    assert_eq!(hits.get(), 15);
}

/// Test that disconnect_all removes slots of every kind.
#[test]
fn disconnect_all_removes_everything() {
    let log = new_log();
    let signal: Signal<(i32,)> = Signal::new();
    let recorder = Recorder::new("r", &log);

    signal.connect(|_: i32| {});
    signal.connect_bound(&recorder, Recorder::first);
    signal.connect(Packed(|(_n,): (i32,)| {}));
    assert_eq!(signal.len(), 3);

    signal.disconnect_all();
    signal.emit((1,));

    assert!(signal.is_empty());
    assert!(log.borrow().is_empty());
    assert_eq!(Rc::strong_count(&recorder), 1);
}

/// Test that slots see only the leading arguments they declare.
#[test]
fn slots_receive_argument_prefixes() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let signal: Signal<(u32, String, char), usize> = Signal::new();

    let s = seen.clone();
    signal.connect(move || {
        s.borrow_mut().push("()".to_string());
        0
    });
    let s = seen.clone();
    signal.connect(move |n: u32, text: String| {
        s.borrow_mut().push(format!("({n}, {text})"));
        text.len()
    });

    assert_eq!(signal.emit((3, "four".into(), 'z')), 4);
    assert_eq!(*seen.borrow(), vec!["()".to_string(), "(3, four)".to_string()]);
}

/// Test that a packed callable receives the whole tuple.
#[test]
fn packed_callable_gets_whole_tuple() {
    let signal: Signal<(i32, i32, i32), i32> = Signal::new();
    let sum: Box<dyn Fn((i32, i32, i32)) -> i32> = Box::new(|(a, b, c)| a + b + c);
    signal.connect(Packed(sum));

    assert_eq!(signal.emit((1, 2, 3)), 6);
}

/// Test that a slot can disconnect itself while the signal is emitting.
#[test]
fn slot_disconnects_itself_during_emit() {
    let signal: Rc<Signal<()>> = Rc::new(Signal::new());
    let runs = Rc::new(Cell::new(0));
    let own_id: Rc<Cell<Option<ConnectionId>>> = Rc::new(Cell::new(None));

    let weak: Weak<Signal<()>> = Rc::downgrade(&signal);
    let (r, id_cell) = (runs.clone(), own_id.clone());
    let id = signal.connect(move || {
        r.set(r.get() + 1);
        if let (Some(signal), Some(id)) = (weak.upgrade(), id_cell.get()) {
            signal.disconnect_connection(id);
        }
    });
    own_id.set(Some(id));

    let after = Rc::new(Cell::new(false));
    let a = after.clone();
    signal.connect(move || a.set(true));

    signal.emit(());
    assert_eq!(runs.get(), 1);
    assert!(after.get(), "slots after the removed one still run");
    assert!(!signal.is_connected(id));

    signal.emit(());
    assert_eq!(runs.get(), 1);
}

/// Test that a slot may emit the signal it is connected to.
#[test]
fn slots_may_emit_recursively() {
    let signal: Rc<Signal<(u32,), u32>> = Rc::new(Signal::new());
    let weak = Rc::downgrade(&signal);

    signal.connect(move |depth: u32| match (depth, weak.upgrade()) {
        (0, _) | (_, None) => 0,
        (n, Some(signal)) => signal.emit((n - 1,)) + 1,
    });

    assert_eq!(signal.emit((4,)), 4);
}

/// Test that one slot connected to several signals serves them all.
#[test]
fn one_receiver_many_signals() {
    let log = new_log();
    let recorder = Recorder::new("shared", &log);
    let opened: Signal<(i32,)> = Signal::new();
    let closed: Signal<(i32, bool)> = Signal::new();

    opened.connect_bound(&recorder, Recorder::first);
    closed.connect_bound(&recorder, Recorder::first);

    opened.emit((1,));
    closed.emit((2, false));
    assert_eq!(
        *log.borrow(),
        vec!["shared.first(1)".to_string(), "shared.first(2)".to_string()]
    );
    assert_eq!(Rc::strong_count(&recorder), 3);
}

/// Test that dropping a signal releases every slot's captures.
#[test]
fn dropping_signal_releases_slots() {
    let token = Rc::new(());
    let log = new_log();
    let recorder = Recorder::new("r", &log);

    let signal: Signal<(i32,)> = Signal::new();
    let t = token.clone();
    signal.connect(move |_: i32| drop(t.clone()));
    signal.connect_bound(&recorder, Recorder::first);
    assert_eq!(Rc::strong_count(&token), 2);

    drop(signal);
    assert_eq!(Rc::strong_count(&token), 1);
    assert_eq!(Rc::strong_count(&recorder), 1);
}

/// Test that signals with the maximum parameter count work end to end.
#[test]
fn six_parameter_signal() {
    let signal: Signal<(u8, u8, u8, u8, u8, u8), u32> = Signal::new();
    signal.connect(|a: u8, b: u8, c: u8, d: u8, e: u8, f: u8| -> u32 {
        [a, b, c, d, e, f].iter().map(|&v| u32::from(v)).sum()
    });

    assert_eq!(signal.emit((1, 2, 3, 4, 5, 6)), 21);
}

// ----------------------------------------------------------------------------
// printf
// ----------------------------------------------------------------------------

/// Test the happy path through an io sink.
#[test]
fn printf_writes_formatted_text() {
    let mut sink = IoSink::new(Vec::new());
    let written = printf!(&mut sink, "1234567%s%c\n", " ", 'A').unwrap();

    assert_eq!(written, 10);
    assert_eq!(sink.into_inner(), b"1234567 A\n");
}

/// Test that a string specifier rejects an integer.
#[test]
fn printf_rejects_wrong_type() {
    let mut out = String::new();
    let err = printf!(&mut out, "%s\n", 123).unwrap_err();

    assert!(matches!(err, FormatError::TypeMismatch { conversion: 's', .. }));
    assert_eq!(err.as_label(), "format_type_mismatch");
    assert!(out.is_empty());
}

/// Test that running out of arguments is an error.
#[test]
fn printf_rejects_missing_argument() {
    let mut out = String::new();
    let err = printf!(&mut out, "%d, %s\n", 123).unwrap_err();

    assert!(matches!(err, FormatError::MissingArgument { .. }));
    assert!(out.is_empty());
}

/// Test that unused arguments are an error.
#[test]
fn printf_rejects_extra_argument() {
    let mut out = String::new();
    let err = printf!(&mut out, "%d\n", 123, "123").unwrap_err();

    assert!(matches!(err, FormatError::TooFewSpecifiers { .. }));
    assert!(out.is_empty());
}

/// Test numeric formatting through the function API.
#[test]
fn printf_numbers() {
    let mut out = String::new();
    let args = [Arg::from(&-42i64), Arg::from(&255u8), Arg::from(&3.5f64)];
    chime_core::printf::printf(&mut out, "%+d %#X %.3e", &args).unwrap();

    assert_eq!(out, "-42 0XFF 3.500e+00");
}

/// Test that a signal can forward its arguments to printf.
#[test]
fn signal_drives_printf() {
    let out = Rc::new(RefCell::new(String::new()));
    let signal: Signal<(&'static str, i32), bool> = Signal::new();

    let o = out.clone();
    signal.connect(move |name: &'static str, score: i32| {
        printf!(&mut *o.borrow_mut(), "%-6s%4d\n", name, score).is_ok()
    });

    assert!(signal.emit(("ada", 97)));
    assert!(signal.emit(("grace", 100)));
    assert_eq!(*out.borrow(), "ada     97\ngrace  100\n");
    assert_eq!(sprintf!("%s", "done").unwrap(), "done");
}
