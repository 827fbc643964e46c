use watch_core::{update, AppState, Msg};

#[test]
fn clearing_without_endpoint_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::EndpointCleared);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn mutation_requests_without_endpoint_are_noop() {
    let state = AppState::new();
    for msg in [
        Msg::KeywordAddRequested("rust".to_string()),
        Msg::KeywordDeleteRequested("rust".to_string()),
        Msg::ChatAddRequested("42".to_string()),
        Msg::ChatDeleteRequested(42),
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}
