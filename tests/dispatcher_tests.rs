//! End-to-end dispatch through stream backends writing to shared buffers.

use std::sync::Arc;

use rstest::{fixture, rstest};
use sievelog::{
    Dispatcher, Frontend, FullFrontend, LightFrontend, Location, Placeholder, Predicate,
    RecordLayout, Severity, StreamBackend, log_error, log_info, log_throw, log_warning,
};

mod test_utils;
use test_utils::SharedBuf;

struct TwoSinks {
    dispatcher: Dispatcher,
    chatty: Arc<LightFrontend>,
    verbose: SharedBuf,
    problems: SharedBuf,
}

fn plain() -> RecordLayout {
    RecordLayout::parse("{severity} {message}").expect("valid layout")
}

/// Sink A accepts Debug or Info, sink B accepts Warning and above.
#[fixture]
fn two_sinks() -> TwoSinks {
    let dispatcher = Dispatcher::new();
    let verbose = SharedBuf::new();
    let problems = SharedBuf::new();
    let chatty = Arc::new(
        LightFrontend::with_filter(Predicate::from(Severity::Debug) | Predicate::from(Severity::Info))
            .expect("satisfiable")
            .with_layout(plain())
            .expect("no clock slots"),
    );
    dispatcher.add(chatty.clone(), Arc::new(StreamBackend::new(verbose.clone())));
    dispatcher.add(
        Arc::new(
            LightFrontend::with_filter(Placeholder.at_least(Severity::Warning))
                .expect("satisfiable")
                .with_layout(plain())
                .expect("no clock slots"),
        ),
        Arc::new(StreamBackend::new(problems.clone())),
    );
    TwoSinks {
        dispatcher,
        chatty,
        verbose,
        problems,
    }
}

#[rstest]
fn info_reaches_only_the_verbose_sink(two_sinks: TwoSinks) {
    log_info!(&two_sinks.dispatcher, "argc: %1%", 5);
    assert_eq!(two_sinks.verbose.text(), "INF argc: 5\n");
    assert_eq!(two_sinks.problems.text(), "");
}

#[rstest]
fn warning_reaches_only_the_problem_sink(two_sinks: TwoSinks) {
    log_warning!(&two_sinks.dispatcher, "disk %1%%% full", 91);
    log_error!(&two_sinks.dispatcher, "disk full");
    assert_eq!(two_sinks.verbose.text(), "");
    assert_eq!(two_sinks.problems.lines(), ["WRN disk 91% full", "ERR disk full"]);
}

#[rstest]
fn trace_is_dropped_everywhere(two_sinks: TwoSinks) {
    two_sinks
        .dispatcher
        .log(Severity::Trace, Location::unknown(), "noise")
        .expect("trace never throws");
    assert_eq!(two_sinks.verbose.text(), "");
    assert_eq!(two_sinks.problems.text(), "");
}

#[rstest]
fn throw_is_delivered_before_the_error_returns(two_sinks: TwoSinks) {
    let err = log_throw!(&two_sinks.dispatcher, "bad input `%1%`", "x");
    assert_eq!(err.to_string(), "bad input `x`");
    assert_eq!(two_sinks.problems.text(), "THR bad input `x`\n");
}

#[rstest]
fn replacing_a_filter_affects_later_calls_only(two_sinks: TwoSinks) {
    log_info!(&two_sinks.dispatcher, "before");
    two_sinks
        .chatty
        .set_filter(Placeholder.at_least(Severity::Error))
        .expect("satisfiable");
    log_info!(&two_sinks.dispatcher, "after");
    log_error!(&two_sinks.dispatcher, "both");
    assert_eq!(two_sinks.verbose.lines(), ["INF before", "ERR both"]);
    assert_eq!(two_sinks.problems.lines(), ["ERR both"]);
}

#[rstest]
fn unsatisfiable_filter_is_rejected_and_previous_kept(two_sinks: TwoSinks) {
    let never = Placeholder.less_than(Severity::Trace);
    assert!(two_sinks.chatty.set_filter(never).is_err());
    log_info!(&two_sinks.dispatcher, "still here");
    assert_eq!(two_sinks.verbose.text(), "INF still here\n");
}

#[test]
fn full_frontend_stamps_time_and_thread() {
    let dispatcher = Dispatcher::new();
    let buffer = SharedBuf::new();
    let frontend = FullFrontend::new()
        .with_layout(RecordLayout::parse("{thread}|{time}|{message}").expect("valid layout"))
        .with_time_format("%Y")
        .expect("valid time format");
    dispatcher.add(Arc::new(frontend), Arc::new(StreamBackend::new(buffer.clone())));

    std::thread::Builder::new()
        .name("worker-7".into())
        .spawn(move || log_info!(&dispatcher, "tick"))
        .expect("spawn")
        .join()
        .expect("join");

    let text = buffer.text();
    let fields: Vec<&str> = text.trim_end().split('|').collect();
    assert_eq!(fields[0], "worker-7");
    assert_eq!(fields[1].len(), 4);
    assert!(fields[1].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(fields[2], "tick");
}
