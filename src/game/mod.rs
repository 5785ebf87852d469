pub mod body;
pub mod clock;
pub mod config;
pub mod naming;
pub mod orbit;
pub mod system;
pub mod zones;

use clock::SimulationClock;
use config::{ConfigError, SystemConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use system::{Snapshot, SolarSystem, SystemGenerator};

/// Folds typed seed text into a generator seed. Empty text has no seed.
pub fn seed_from_text(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    let seed = text.chars().fold(0u64, |acc, c| {
        let code = c as u64;
        acc.wrapping_add(code | (code << 16))
    });
    Some(seed)
}

/// One generated system plus the clock that drives it.
pub struct Session {
    system: SolarSystem,
    clock: SimulationClock,
}

impl Session {
    pub fn new(seed: u64) -> Result<Self, ConfigError> {
        Self::with_config(seed, SystemConfig::default())
    }

    pub fn with_config(seed: u64, config: SystemConfig) -> Result<Self, ConfigError> {
        Self::from_generator(SystemGenerator::with_config(seed, config)?)
    }

    /// Seeds from OS entropy, for sessions started without seed text.
    pub fn from_entropy(config: SystemConfig) -> Result<Self, ConfigError> {
        Self::from_generator(SystemGenerator::from_rng(ChaCha8Rng::from_entropy(), config)?)
    }

    /// Uses the text's seed when there is one, entropy otherwise.
    pub fn from_text(text: &str, config: SystemConfig) -> Result<Self, ConfigError> {
        match seed_from_text(text) {
            Some(seed) => Self::with_config(seed, config),
            None => Self::from_entropy(config),
        }
    }

    fn from_generator(mut generator: SystemGenerator) -> Result<Self, ConfigError> {
        Ok(Self {
            system: generator.generate()?,
            clock: SimulationClock::default(),
        })
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Advances the system by a wall-clock delta scaled by the clock.
    pub fn tick(&mut self, delta: f64) -> Snapshot {
        let scaled = self.clock.scaled(delta);
        self.system.advance(scaled)
    }

    pub fn json(&self) -> String {
        system::system_json(&self.system)
    }

    pub fn report(&self) -> String {
        system::system_report(&self.system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_text_sums_character_codes() {
        assert_eq!(seed_from_text(""), None);
        // 'A' = 65 -> 65 | 65 << 16
        assert_eq!(seed_from_text("A"), Some(65 + (65 << 16)));
        assert_eq!(
            seed_from_text("AB"),
            Some(65 + (65 << 16) + 66 + (66 << 16))
        );
        // Anagrams share a seed.
        assert_eq!(seed_from_text("star"), seed_from_text("rats"));
    }

    #[test]
    fn sessions_from_the_same_text_match() {
        let a = Session::from_text("Andromeda", SystemConfig::default()).expect("session");
        let b = Session::from_text("Andromeda", SystemConfig::default()).expect("session");
        assert_eq!(a.system(), b.system());
        assert_eq!(a.json(), b.json());
    }

    #[test]
    fn entropy_sessions_still_generate() {
        let session = Session::from_text("", SystemConfig::default()).expect("session");
        assert!(session.system().body_count() >= 1);
        assert!(session.report().starts_with(&session.system().star.name));
    }

    #[test]
    fn paused_clock_freezes_the_system() {
        let mut session = Session::new(42).expect("session");
        session.clock_mut().pause();
        let before = session.system().clone();
        let snapshot = session.tick(10.0);
        assert_eq!(session.system(), &before);
        assert_eq!(snapshot.planets.len(), before.planets.len());

        session.clock_mut().resume();
        session.clock_mut().set_speed(2.0);
        session.tick(1.0);
        for (planet, old) in session.system().planets.iter().zip(&before.planets) {
            assert!((planet.orbit.phase - (old.orbit.phase + 2.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_config_blocks_the_session() {
        let mut config = SystemConfig::default();
        config.planet_separation = -1.0;
        assert!(Session::with_config(1, config).is_err());
    }
}
