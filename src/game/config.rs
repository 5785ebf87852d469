use crate::easing::EasingCurve;
use crate::game::body::{PlanetType, StarType};
use crate::game::zones::Zone;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{table} table has no entries")]
    EmptyTable { table: String },
    #[error("{table} table entry {index} has threshold {threshold} outside [0, 1]")]
    ThresholdOutOfRange {
        table: String,
        index: usize,
        threshold: f64,
    },
    #[error("{table} table thresholds must ascend (entry {index} is below the one before it)")]
    ThresholdsNotAscending { table: String, index: usize },
    #[error("{field} range is malformed: min {min} > max {max} or not finite")]
    InvalidRange { field: String, min: f64, max: f64 },
    #[error("{field} count range {start}..={end} is inverted")]
    InvalidCount { field: String, start: u32, end: u32 },
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NegativeValue { field: String, value: f64 },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: String, value: f64 },
    #[error("{field} bound {value} is not a multiple of 0.01")]
    OffGrid { field: String, value: f64 },
    #[error("{field} probability {value} is outside [0, 1]")]
    InvalidProbability { field: String, value: f64 },
    #[error("{field} scale bands must ascend")]
    InvalidScaleBands { field: String },
    #[error("could not parse system config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Closed interval of floats, written `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn lerp(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field: field.to_string(),
                min: self.min,
                max: self.max,
            })
        }
    }

    fn validate_positive(&self, field: &str) -> Result<(), ConfigError> {
        self.validate(field)?;
        if self.min > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NotPositive {
                field: field.to_string(),
                value: self.min,
            })
        }
    }

    fn validate_non_negative(&self, field: &str) -> Result<(), ConfigError> {
        self.validate(field)?;
        validate_non_negative(self.min, field)
    }

    /// Mass and radius are rounded to hundredths, so their bounds must be too.
    fn validate_hundredths(&self, field: &str) -> Result<(), ConfigError> {
        self.validate_non_negative(field)?;
        match [self.min, self.max].into_iter().find(|v| !on_hundredths(*v)) {
            Some(value) => Err(ConfigError::OffGrid {
                field: field.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }
}

fn on_hundredths(value: f64) -> bool {
    let scaled = value * 100.0;
    (scaled - scaled.round()).abs() < 1e-9
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Weighted<T> {
    /// Cumulative probability; the first entry whose threshold reaches the
    /// draw is chosen.
    pub threshold: f64,
    pub item: T,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedTable<T> {
    entries: Vec<Weighted<T>>,
}

impl<T> WeightedTable<T> {
    pub fn new(entries: Vec<(f64, T)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(threshold, item)| Weighted { threshold, item })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.threshold).collect()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| &e.item)
    }

    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.item)
    }

    fn validate_thresholds(&self, table: &str) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::EmptyTable {
                table: table.to_string(),
            });
        }
        let mut previous = 0.0;
        for (index, entry) in self.entries.iter().enumerate() {
            if !(0.0..=1.0).contains(&entry.threshold) {
                return Err(ConfigError::ThresholdOutOfRange {
                    table: table.to_string(),
                    index,
                    threshold: entry.threshold,
                });
            }
            if entry.threshold < previous {
                return Err(ConfigError::ThresholdsNotAscending {
                    table: table.to_string(),
                    index,
                });
            }
            previous = entry.threshold;
        }
        Ok(())
    }
}

/// Ranges and curves every body archetype shares.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BodyTemplate {
    pub mass: ValueRange,
    pub mass_curve: EasingCurve,
    pub radius: ValueRange,
    /// Radius reuses the mass draw, shaped by this curve.
    pub radius_curve: EasingCurve,
    pub revolution_speed: ValueRange,
    pub revolution_curve: EasingCurve,
}

impl BodyTemplate {
    pub fn new(mass: (f64, f64), radius: (f64, f64)) -> Self {
        Self {
            mass: ValueRange::new(mass.0, mass.1),
            mass_curve: EasingCurve::CubeOut,
            radius: ValueRange::new(radius.0, radius.1),
            radius_curve: EasingCurve::Linear,
            revolution_speed: ValueRange::new(0.1, 1.0),
            revolution_curve: EasingCurve::CubeOut,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        self.mass.validate_hundredths(&format!("{field}.mass"))?;
        self.radius.validate_hundredths(&format!("{field}.radius"))?;
        self.revolution_speed
            .validate(&format!("{field}.revolution_speed"))
    }
}

/// Maps a star's physical radius onto a display scale in three bands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScaleBands {
    /// Low, mid and max radius bounds.
    pub radius_bounds: [f64; 3],
    /// Scales reached at each bound.
    pub scales: [f64; 3],
    pub low_mid_curve: EasingCurve,
    pub mid_max_curve: EasingCurve,
}

impl Default for ScaleBands {
    fn default() -> Self {
        Self {
            radius_bounds: [0.5, 1.0, 150.0],
            scales: [15.0, 50.0, 100.0],
            low_mid_curve: EasingCurve::CubeIn,
            mid_max_curve: EasingCurve::CubeOut,
        }
    }
}

impl ScaleBands {
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let [low, mid, max] = self.radius_bounds;
        let [small, middle, large] = self.scales;
        let finite = self.radius_bounds.iter().chain(&self.scales).all(|v| v.is_finite());
        if finite && low < mid && mid < max && small <= middle && middle <= large {
            Ok(())
        } else {
            Err(ConfigError::InvalidScaleBands {
                field: field.to_string(),
            })
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StarTemplate {
    pub kind: StarType,
    pub body: BodyTemplate,
    /// Surface temperature in Kelvin.
    pub temperature: ValueRange,
    pub temperature_curve: EasingCurve,
    #[serde(default)]
    pub scale: ScaleBands,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MoonTemplate {
    pub label: String,
    pub body: BodyTemplate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanetTemplate {
    pub kind: PlanetType,
    pub body: BodyTemplate,
    pub water_chance: f64,
    pub moon_count: RangeInclusive<u32>,
    pub moon_count_curve: EasingCurve,
    /// Distance band moons orbit in, around the planet.
    pub moon_orbit: ValueRange,
    pub moon_orbit_curve: EasingCurve,
    pub moon_separation: f64,
    pub moons: WeightedTable<MoonTemplate>,
}

impl PlanetTemplate {
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        self.body.validate(field)?;
        if !(0.0..=1.0).contains(&self.water_chance) {
            return Err(ConfigError::InvalidProbability {
                field: format!("{field}.water_chance"),
                value: self.water_chance,
            });
        }
        validate_count(&self.moon_count, &format!("{field}.moon_count"))?;
        self.moon_orbit
            .validate_non_negative(&format!("{field}.moon_orbit"))?;
        validate_non_negative(self.moon_separation, &format!("{field}.moon_separation"))?;
        let moons_field = format!("{field}.moons");
        self.moons.validate_thresholds(&moons_field)?;
        for (i, moon) in self.moons.items().enumerate() {
            moon.body.validate(&format!("{moons_field}[{i}]"))?;
        }
        Ok(())
    }
}

/// Everything the generator needs to build one solar system.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemConfig {
    pub stars: WeightedTable<StarTemplate>,
    pub hot_planets: WeightedTable<PlanetTemplate>,
    pub habitable_planets: WeightedTable<PlanetTemplate>,
    pub cold_planets: WeightedTable<PlanetTemplate>,
    pub ice_planets: WeightedTable<PlanetTemplate>,
    pub planet_count: RangeInclusive<u32>,
    /// Minimum gap between two planet orbits.
    pub planet_separation: f64,
    /// Seconds per full orbit.
    pub planet_orbit_period: ValueRange,
    pub moon_orbit_period: ValueRange,
}

impl SystemConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn planet_table(&self, zone: Zone) -> &WeightedTable<PlanetTemplate> {
        match zone {
            Zone::Hot => &self.hot_planets,
            Zone::Habitable => &self.habitable_planets,
            Zone::Cold => &self.cold_planets,
            Zone::Ice => &self.ice_planets,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stars.validate_thresholds("stars")?;
        for (i, star) in self.stars.items().enumerate() {
            let field = format!("stars[{i}]");
            star.body.validate(&field)?;
            star.temperature
                .validate_non_negative(&format!("{field}.temperature"))?;
            star.scale.validate(&format!("{field}.scale"))?;
        }

        for (name, table) in [
            ("hot_planets", &self.hot_planets),
            ("habitable_planets", &self.habitable_planets),
            ("cold_planets", &self.cold_planets),
            ("ice_planets", &self.ice_planets),
        ] {
            table.validate_thresholds(name)?;
            for (i, planet) in table.items().enumerate() {
                planet.validate(&format!("{name}[{i}]"))?;
            }
        }

        validate_count(&self.planet_count, "planet_count")?;
        validate_non_negative(self.planet_separation, "planet_separation")?;
        self.planet_orbit_period
            .validate_positive("planet_orbit_period")?;
        self.moon_orbit_period.validate_positive("moon_orbit_period")?;
        Ok(())
    }
}

fn validate_count(range: &RangeInclusive<u32>, field: &str) -> Result<(), ConfigError> {
    if range.start() > range.end() {
        return Err(ConfigError::InvalidCount {
            field: field.to_string(),
            start: *range.start(),
            end: *range.end(),
        });
    }
    Ok(())
}

fn validate_non_negative(value: f64, field: &str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue {
            field: field.to_string(),
            value,
        })
    }
}

fn star(
    kind: StarType,
    mass: (f64, f64),
    radius: (f64, f64),
    temperature: (f64, f64),
) -> StarTemplate {
    StarTemplate {
        kind,
        body: BodyTemplate::new(mass, radius),
        temperature: ValueRange::new(temperature.0, temperature.1),
        temperature_curve: EasingCurve::CubeInOut,
        scale: ScaleBands::default(),
    }
}

fn moon(label: &str, mass: (f64, f64), radius: (f64, f64)) -> MoonTemplate {
    MoonTemplate {
        label: label.to_string(),
        body: BodyTemplate::new(mass, radius),
    }
}

fn default_moons() -> WeightedTable<MoonTemplate> {
    WeightedTable::new(vec![
        (0.6, moon("Rocky", (0.01, 0.08), (0.1, 0.3))),
        (0.9, moon("Icy", (0.01, 0.12), (0.15, 0.45))),
        (1.0, moon("Captured", (0.01, 0.03), (0.02, 0.12))),
    ])
}

fn planet(
    kind: PlanetType,
    mass: (f64, f64),
    radius: (f64, f64),
    water_chance: f64,
    moon_count: RangeInclusive<u32>,
) -> PlanetTemplate {
    PlanetTemplate {
        kind,
        body: BodyTemplate::new(mass, radius),
        water_chance,
        moon_count,
        moon_count_curve: EasingCurve::CubeIn,
        moon_orbit: ValueRange::new(4.0, 20.0),
        moon_orbit_curve: EasingCurve::Linear,
        moon_separation: 3.0,
        moons: default_moons(),
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        use PlanetType::*;

        Self {
            stars: WeightedTable::new(vec![
                (0.30, star(StarType::RedDwarf, (0.08, 0.6), (0.1, 0.6), (2400.0, 3900.0))),
                (0.70, star(StarType::MainSequence, (0.6, 1.8), (0.7, 1.6), (3900.0, 7500.0))),
                (0.80, star(StarType::WhiteDwarf, (0.5, 1.4), (0.01, 0.05), (8000.0, 40000.0))),
                (0.90, star(StarType::RedGiant, (0.3, 8.0), (10.0, 100.0), (3000.0, 5000.0))),
                (0.97, star(StarType::BlueGiant, (10.0, 50.0), (5.0, 15.0), (20000.0, 40000.0))),
                (
                    1.00,
                    star(
                        StarType::RedSupergiant,
                        (10.0, 40.0),
                        (100.0, 1000.0),
                        (3400.0, 4100.0),
                    ),
                ),
            ]),
            hot_planets: WeightedTable::new(vec![
                (0.35, planet(Lava, (0.1, 5.0), (0.4, 1.8), 0.0, 0..=1)),
                (0.60, planet(Iron, (0.05, 3.0), (0.3, 1.2), 0.0, 0..=1)),
                (0.85, planet(Desert, (0.1, 4.0), (0.4, 1.6), 0.05, 0..=2)),
                (1.00, planet(Carbon, (0.5, 8.0), (0.5, 2.0), 0.0, 0..=2)),
            ]),
            habitable_planets: WeightedTable::new(vec![
                (0.40, planet(Terrestrial, (0.3, 5.0), (0.6, 1.8), 0.6, 0..=3)),
                (0.65, planet(Ocean, (0.5, 8.0), (0.8, 2.2), 1.0, 0..=2)),
                (0.80, planet(Desert, (0.1, 4.0), (0.4, 1.6), 0.1, 0..=2)),
                (1.00, planet(GasDwarf, (2.0, 20.0), (1.5, 4.0), 0.2, 1..=4)),
            ]),
            cold_planets: WeightedTable::new(vec![
                (0.45, planet(GasGiant, (20.0, 3000.0), (6.0, 20.0), 0.1, 2..=12)),
                (0.70, planet(IceGiant, (10.0, 50.0), (3.0, 6.0), 0.3, 1..=8)),
                (0.85, planet(GasDwarf, (2.0, 20.0), (1.5, 4.0), 0.1, 1..=4)),
                (1.00, planet(Silicate, (0.1, 5.0), (0.4, 1.8), 0.2, 0..=2)),
            ]),
            ice_planets: WeightedTable::new(vec![
                (0.40, planet(Ice, (0.05, 3.0), (0.3, 1.5), 0.4, 0..=2)),
                (0.70, planet(IceGiant, (10.0, 50.0), (3.0, 6.0), 0.3, 1..=8)),
                (1.00, planet(Plutoid, (0.01, 0.1), (0.1, 0.3), 0.1, 0..=1)),
            ]),
            planet_count: 1..=16,
            planet_separation: 20.0,
            planet_orbit_period: ValueRange::new(60.0, 600.0),
            moon_orbit_period: ValueRange::new(45.0, 300.0),
        }
    }
}
