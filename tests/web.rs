//! Browser smoke tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use deep_space::{generate_system_json, init, seed_from_text, SystemSession};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn same_seed_text_gives_same_json() {
    init(false);
    let a = generate_system_json("Andromeda").ok().expect("system");
    let b = generate_system_json("Andromeda").ok().expect("system");
    assert_eq!(a, b);
    assert!(a.contains("\"star\""));
}

#[wasm_bindgen_test]
fn empty_seed_text_has_no_seed() {
    assert_eq!(seed_from_text(""), None);
    assert!(seed_from_text("Vega").is_some());
}

#[wasm_bindgen_test]
fn session_ticks_and_pauses() {
    let mut session = SystemSession::new("Vega").ok().expect("session");
    let moving = session.tick(0.5);
    assert!(moving.contains("star_rotation"));

    session.pause();
    assert!(session.is_paused());
    assert_eq!(session.time_scale(), 0.0);
    session.resume();
    session.set_speed(4.0);
    assert_eq!(session.time_scale(), 4.0);
    session.reset_speed();
    assert_eq!(session.time_scale(), 1.0);
}

#[wasm_bindgen_test]
fn malformed_config_is_rejected() {
    assert!(SystemSession::with_config("Vega", Some("{ nope".to_string())).is_err());
}
