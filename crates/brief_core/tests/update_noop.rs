use brief_core::{update, AppState, Msg, Route};

#[test]
fn inapplicable_message_changes_nothing() {
    let (mut state, _) = AppState::enter(Route::Projects);
    assert!(state.consume_dirty());

    // A document action has no meaning on the projects screen.
    let (mut next, effects) = update(state.clone(), Msg::ShowDocument);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert_eq!(state, next);
}
