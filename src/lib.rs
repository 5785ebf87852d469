use wasm_bindgen::prelude::*;

pub mod easing;
pub mod game;
mod logging;

use game::config::SystemConfig;
use game::Session;

/// Installs the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen]
pub fn init(verbose: bool) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // Already installed by an earlier call; the level still applies.
    let _ = logging::init(level);
}

/// Seed derived from typed text, or `undefined` for empty text.
#[wasm_bindgen]
pub fn seed_from_text(text: &str) -> Option<u64> {
    game::seed_from_text(text)
}

/// Generates one system from seed text and returns it as JSON.
#[wasm_bindgen]
pub fn generate_system_json(seed: &str) -> Result<String, JsError> {
    let session = Session::from_text(seed, SystemConfig::default())?;
    Ok(session.json())
}

/// A generated system owned by the page, advanced once per frame.
#[wasm_bindgen]
pub struct SystemSession {
    inner: Session,
}

#[wasm_bindgen]
impl SystemSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: &str) -> Result<SystemSession, JsError> {
        Self::with_config(seed, None)
    }

    /// `config` is a JSON system config; `None` uses the built-in tables.
    pub fn with_config(seed: &str, config: Option<String>) -> Result<SystemSession, JsError> {
        let config = match config {
            Some(json) => SystemConfig::from_json(&json)?,
            None => SystemConfig::default(),
        };
        Ok(Self {
            inner: Session::from_text(seed, config)?,
        })
    }

    pub fn system_json(&self) -> String {
        self.inner.json()
    }

    pub fn report(&self) -> String {
        self.inner.report()
    }

    /// Advances by `delta` seconds and returns the body positions as JSON.
    pub fn tick(&mut self, delta: f64) -> String {
        let snapshot = self.inner.tick(delta);
        serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn pause(&mut self) {
        self.inner.clock_mut().pause();
    }

    pub fn resume(&mut self) {
        self.inner.clock_mut().resume();
    }

    pub fn is_paused(&self) -> bool {
        self.inner.clock().is_paused()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.inner.clock_mut().set_speed(speed);
    }

    pub fn reset_speed(&mut self) {
        self.inner.clock_mut().reset_speed();
    }

    pub fn time_scale(&self) -> f64 {
        self.inner.clock().time_scale()
    }
}
