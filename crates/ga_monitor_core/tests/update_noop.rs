use ga_monitor_core::{update, MonitorState, Msg};

#[test]
fn placeholder_message_changes_nothing() {
    let state = MonitorState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn stop_without_job_sends_nothing() {
    let state = MonitorState::new();
    let (next, effects) = update(state.clone(), Msg::StopClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
