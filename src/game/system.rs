use crate::easing::{shaped_fraction, EasingCurve};
use crate::game::body::{
    advance_phase, advance_rotation, generate_star, generate_stats, sample_attribute,
    value_in_range, BodyKind, CelestialBody, Inventory, MoonDetails, Offset, Orbit,
    PlanetDetails,
};
use crate::game::config::{ConfigError, PlanetTemplate, SystemConfig, WeightedTable};
use crate::game::naming::{moon_designation, planet_designation, star_name};
use crate::game::orbit::{OrbitPlacer, Placement};
use crate::game::zones::{Zone, ZoneRadii};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::ops::RangeInclusive;

/// One star, its planets in generation order, and the zones they fall in.
#[derive(Clone, Debug, PartialEq)]
pub struct SolarSystem {
    pub star: CelestialBody,
    pub planets: Vec<CelestialBody>,
    pub zones: ZoneRadii,
    pub spin_clockwise: bool,
}

impl SolarSystem {
    pub fn moon_count(&self) -> usize {
        self.planets.iter().map(|p| p.moons().len()).sum()
    }

    pub fn body_count(&self) -> usize {
        1 + self.planets.len() + self.moon_count()
    }

    pub fn planets_in(&self, zone: Zone) -> impl Iterator<Item = &CelestialBody> {
        self.planets
            .iter()
            .filter(move |p| p.as_planet().map_or(false, |d| d.zone == zone))
    }

    /// Moves every body along its orbit and about its axis.
    pub fn advance(&mut self, delta: f64) -> Snapshot {
        let star_rotation = advance_rotation(&mut self.star, delta);
        let planets = self
            .planets
            .iter_mut()
            .map(|planet| {
                let offset = advance_phase(planet, delta);
                let rotation = advance_rotation(planet, delta);
                let moons = planet
                    .moons_mut()
                    .iter_mut()
                    .map(|moon| BodyPosition {
                        name: moon.name.clone(),
                        offset: advance_phase(moon, delta),
                        rotation: advance_rotation(moon, delta),
                        moons: Vec::new(),
                    })
                    .collect();
                BodyPosition {
                    name: planet.name.clone(),
                    offset,
                    rotation,
                    moons,
                }
            })
            .collect();

        Snapshot {
            star_rotation,
            planets,
        }
    }
}

/// Display state after a tick. Planet offsets are relative to the star,
/// moon offsets relative to their planet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub star_rotation: f64,
    pub planets: Vec<BodyPosition>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodyPosition {
    pub name: String,
    pub offset: Offset,
    pub rotation: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub moons: Vec<BodyPosition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    /// No threshold reached the draw, so the last entry was taken.
    pub fallback: bool,
}

/// First ascending threshold at or above `draw`; the last entry otherwise.
pub fn select_index(thresholds: &[f64], draw: f64) -> Option<Selection> {
    let last = thresholds.len().checked_sub(1)?;
    Some(match thresholds.iter().position(|t| *t >= draw) {
        Some(index) => Selection {
            index,
            fallback: false,
        },
        None => Selection {
            index: last,
            fallback: true,
        },
    })
}

fn pick<'a, T>(
    rng: &mut ChaCha8Rng,
    table: &'a WeightedTable<T>,
    label: &str,
) -> Result<&'a T, ConfigError> {
    let empty = || ConfigError::EmptyTable {
        table: label.to_string(),
    };
    let draw: f64 = rng.gen();
    let selection = select_index(&table.thresholds(), draw).ok_or_else(empty)?;
    if selection.fallback {
        log::warn!(
            "no {} threshold reached draw {:.4}; using the last entry",
            label,
            draw
        );
    }
    table.get(selection.index).ok_or_else(empty)
}

pub struct SystemGenerator {
    rng: ChaCha8Rng,
    used_names: HashSet<String>,
    config: SystemConfig,
}

impl SystemGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            used_names: HashSet::new(),
            config: SystemConfig::default(),
        }
    }

    pub fn with_config(seed: u64, config: SystemConfig) -> Result<Self, ConfigError> {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed), config)
    }

    pub fn from_rng(rng: ChaCha8Rng, config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng,
            used_names: HashSet::new(),
            config,
        })
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Builds star, zones, planets and moons in one pass.
    pub fn generate(&mut self) -> Result<SolarSystem, ConfigError> {
        let Self {
            rng,
            used_names,
            config,
        } = self;

        let spin_clockwise = rng.gen_bool(0.5);

        let template = pick(rng, &config.stars, "stars")?;
        let name = star_name(rng, used_names);
        let star = generate_star(rng, name, template, spin_clockwise);

        let zones = ZoneRadii::from_luminosity(star.luminosity().unwrap_or(0.0));
        let planets = make_planets(rng, config, &star.name, &zones, spin_clockwise)?;

        let system = SolarSystem {
            star,
            planets,
            zones,
            spin_clockwise,
        };
        log::info!(
            "generated {} ({}) with {} planets and {} moons",
            system.star.name,
            system.star.kind_label(),
            system.planets.len(),
            system.moon_count()
        );
        Ok(system)
    }
}

/// Validates `config` and generates one system from `seed`.
pub fn generate_system(seed: u64, config: SystemConfig) -> Result<SolarSystem, ConfigError> {
    SystemGenerator::with_config(seed, config)?.generate()
}

fn make_planets(
    rng: &mut ChaCha8Rng,
    config: &SystemConfig,
    star_name: &str,
    zones: &ZoneRadii,
    spin_clockwise: bool,
) -> Result<Vec<CelestialBody>, ConfigError> {
    if !zones.is_populated() {
        log::warn!("{} gives off no usable light; no planets placed", star_name);
        return Ok(Vec::new());
    }

    let count = rng.gen_range(config.planet_count.clone()) as usize;
    let range = zones.placement_range();
    let mut placer = OrbitPlacer::new(config.planet_separation);
    let mut planets = Vec::with_capacity(count);

    for index in 0..count {
        // SineIn keeps most orbits close to the star.
        let draw = || value_in_range(&range, EasingCurve::SineIn, rng.gen());
        let radius = match placer.place(draw) {
            Placement::Placed(radius) => radius,
            Placement::Exhausted { attempts } => {
                log::debug!(
                    "{}: stopped at {} of {} planets after {} rejected orbits",
                    star_name,
                    index,
                    count,
                    attempts
                );
                break;
            }
        };

        let zone = zones.classify(radius);
        let template = pick(rng, config.planet_table(zone), zone.label())?;
        let name = planet_designation(star_name, index);
        planets.push(make_planet(
            rng,
            config,
            template,
            name,
            zone,
            radius,
            spin_clockwise,
        )?);
    }

    Ok(planets)
}

fn make_planet(
    rng: &mut ChaCha8Rng,
    config: &SystemConfig,
    template: &PlanetTemplate,
    name: String,
    zone: Zone,
    radius: f64,
    spin_clockwise: bool,
) -> Result<CelestialBody, ConfigError> {
    let stats = generate_stats(rng, &template.body, spin_clockwise);
    let period = sample_attribute(rng, &config.planet_orbit_period, EasingCurve::Linear);
    let tilt = rng.gen_range(0.0..360.0);
    let has_water = rng.gen::<f64>() < template.water_chance;
    let moons = make_moons(rng, config, template, &name, spin_clockwise)?;

    Ok(CelestialBody::new(
        name,
        stats,
        Orbit::circular(radius, period, tilt),
        BodyKind::Planet(PlanetDetails {
            planet_type: template.kind,
            zone,
            has_water,
            moons,
        }),
    ))
}

/// `min + round(f * (max - min))` with `f` the curve-shaped draw `u`.
fn moon_count(range: &RangeInclusive<u32>, curve: EasingCurve, u: f64) -> u32 {
    let (min, max) = (*range.start(), *range.end());
    let fraction = shaped_fraction(curve, u).clamp(0.0, 1.0);
    min + (fraction * max.saturating_sub(min) as f64).round() as u32
}

fn make_moons(
    rng: &mut ChaCha8Rng,
    config: &SystemConfig,
    template: &PlanetTemplate,
    planet_name: &str,
    spin_clockwise: bool,
) -> Result<Vec<CelestialBody>, ConfigError> {
    let count = moon_count(&template.moon_count, template.moon_count_curve, rng.gen()) as usize;
    let mut placer = OrbitPlacer::new(template.moon_separation);
    let mut moons = Vec::with_capacity(count);

    for index in 0..count {
        let draw = || value_in_range(&template.moon_orbit, template.moon_orbit_curve, rng.gen());
        let radius = match placer.place(draw) {
            Placement::Placed(radius) => radius,
            Placement::Exhausted { .. } => {
                log::debug!("{}: room for only {} of {} moons", planet_name, index, count);
                break;
            }
        };

        let moon = pick(rng, &template.moons, "moons")?;
        let stats = generate_stats(rng, &moon.body, spin_clockwise);
        let period = sample_attribute(rng, &config.moon_orbit_period, EasingCurve::Linear);
        let tilt = rng.gen_range(0.0..360.0);
        moons.push(CelestialBody::new(
            moon_designation(planet_name, index),
            stats,
            Orbit::circular(radius, period, tilt),
            BodyKind::Moon(MoonDetails {
                label: moon.label.clone(),
            }),
        ));
    }

    Ok(moons)
}

#[derive(Serialize)]
struct OrbitView {
    radius: f64,
    width: f64,
    depth: f64,
    period: f64,
    tilt_degrees: f64,
}

#[derive(Serialize)]
struct BodyView {
    name: String,
    kind: &'static str,
    category: String,
    mass: f64,
    radius: f64,
    spin_clockwise: bool,
    revolution_speed: f64,
    surface_tint: f64,
    inventory: Inventory,
    #[serde(skip_serializing_if = "Option::is_none")]
    orbit: Option<OrbitView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    luminosity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zone: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_water: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    moons: Vec<BodyView>,
}

#[derive(Serialize)]
struct SystemView {
    spin_clockwise: bool,
    zones: ZoneRadii,
    star: BodyView,
    planets: Vec<BodyView>,
}

impl From<&CelestialBody> for BodyView {
    fn from(body: &CelestialBody) -> Self {
        let mut view = Self {
            name: body.name.clone(),
            kind: "Moon",
            category: body.kind_label().to_string(),
            mass: body.stats.mass,
            radius: body.stats.radius,
            spin_clockwise: body.stats.spin_clockwise,
            revolution_speed: body.stats.revolution_speed,
            surface_tint: body.stats.surface_tint,
            inventory: body.inventory,
            orbit: Some(OrbitView {
                radius: body.orbit.radius(),
                width: body.orbit.width,
                depth: body.orbit.depth,
                period: body.orbit.period,
                tilt_degrees: body.orbit.tilt_degrees,
            }),
            temperature: None,
            luminosity: None,
            display_scale: None,
            color_fraction: None,
            zone: None,
            has_water: None,
            moons: Vec::new(),
        };

        match &body.kind {
            BodyKind::Star(star) => {
                view.kind = "Star";
                view.orbit = None;
                view.temperature = Some(star.temperature);
                view.luminosity = Some(star.luminosity);
                view.display_scale = Some(star.display_scale);
                view.color_fraction = Some(star.color_fraction);
            }
            BodyKind::Planet(planet) => {
                view.kind = "Planet";
                view.zone = Some(planet.zone.label());
                view.has_water = Some(planet.has_water);
                view.moons = planet.moons.iter().map(BodyView::from).collect();
            }
            BodyKind::Moon(_) => {}
        }
        view
    }
}

impl From<&SolarSystem> for SystemView {
    fn from(system: &SolarSystem) -> Self {
        Self {
            spin_clockwise: system.spin_clockwise,
            zones: system.zones,
            star: BodyView::from(&system.star),
            planets: system.planets.iter().map(BodyView::from).collect(),
        }
    }
}

pub fn system_json(system: &SolarSystem) -> String {
    let view = SystemView::from(system);
    serde_json::to_string(&view).unwrap_or_else(|_| "{}".to_string())
}

pub fn system_report(system: &SolarSystem) -> String {
    let mut output = String::new();
    let star = &system.star;
    let _ = writeln!(
        output,
        "{} [{}] mass={:.2} radius={:.2} spin={}",
        star.name,
        star.kind_label(),
        star.stats.mass,
        star.stats.radius,
        if system.spin_clockwise { "cw" } else { "ccw" }
    );
    if let Some(details) = star.as_star() {
        let _ = writeln!(
            output,
            "  temperature={}K luminosity={:.3e} scale={:.1}",
            details.temperature, details.luminosity, details.display_scale
        );
    }
    let zones = &system.zones;
    let _ = writeln!(
        output,
        "  zones hot={:.1} habitable={:.1}-{:.1} cold={:.1} ice={:.1}",
        zones.hot, zones.habitable_inner, zones.habitable_outer, zones.cold, zones.ice
    );

    for planet in &system.planets {
        write_body(&mut output, planet, 2);
    }
    output
}

fn write_body(buf: &mut String, body: &CelestialBody, indent: usize) {
    let pad = " ".repeat(indent);
    let extra = match &body.kind {
        BodyKind::Planet(planet) => format!(
            " zone={} water={}",
            planet.zone.label(),
            if planet.has_water { "yes" } else { "no" }
        ),
        _ => String::new(),
    };
    let _ = writeln!(
        buf,
        "{}- {} [{}] orbit={:.1} period={:.0}s mass={:.2} radius={:.2}{}",
        pad,
        body.name,
        body.kind_label(),
        body.orbit.radius(),
        body.orbit.period,
        body.stats.mass,
        body.stats.radius,
        extra
    );
    for moon in body.moons() {
        write_body(buf, moon, indent + 4);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::body::StarType;
    use crate::game::config::{BodyTemplate, ScaleBands, StarTemplate, ValueRange};

    fn single_star(radius: (f64, f64)) -> WeightedTable<StarTemplate> {
        WeightedTable::new(vec![(
            1.0,
            StarTemplate {
                kind: StarType::MainSequence,
                body: BodyTemplate::new((1.0, 1.0), radius),
                temperature: ValueRange::new(5800.0, 5800.0),
                temperature_curve: EasingCurve::Linear,
                scale: ScaleBands::default(),
            },
        )])
    }

    #[test]
    fn weighted_selection_picks_first_reached_threshold() {
        let table = [0.2, 0.5, 1.0];
        let picked: Vec<usize> = [0.1, 0.3, 0.9, 1.0]
            .iter()
            .map(|d| select_index(&table, *d).map(|s| s.index))
            .collect::<Option<_>>()
            .expect("non-empty table");
        assert_eq!(picked, vec![0, 1, 2, 2]);
        assert_eq!(select_index(&table, 0.2).map(|s| s.index), Some(0));
    }

    #[test]
    fn weighted_selection_falls_back_to_last_entry() {
        let table = [0.2, 0.5, 0.9];
        assert_eq!(
            select_index(&table, 0.95),
            Some(Selection {
                index: 2,
                fallback: true
            })
        );
        assert_eq!(select_index(&[], 0.5), None);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = SystemGenerator::new(1234).generate().expect("system");
        let b = SystemGenerator::new(1234).generate().expect("system");
        assert_eq!(a, b);
        assert_eq!(system_json(&a), system_json(&b));

        let c = SystemGenerator::new(4321).generate().expect("system");
        assert_ne!(a, c);
    }

    #[test]
    fn planets_sit_in_their_zone_and_keep_apart() {
        for seed in 0..40 {
            let mut gen = SystemGenerator::new(seed);
            let config = gen.config().clone();
            let system = gen.generate().expect("system");
            let range = system.zones.placement_range();
            assert!(system.planets.len() <= *config.planet_count.end() as usize);
            let by_zone: usize = Zone::ALL.iter().map(|z| system.planets_in(*z).count()).sum();
            assert_eq!(by_zone, system.planets.len());

            for (i, planet) in system.planets.iter().enumerate() {
                let details = planet.as_planet().expect("planet details");
                let r = planet.orbit.radius();
                assert!(range.contains(r), "seed {seed}: orbit {r} outside zones");
                assert_eq!(system.zones.classify(r), details.zone);
                assert!(config
                    .planet_table(details.zone)
                    .items()
                    .any(|t| t.kind == details.planet_type));
                assert!(config.planet_orbit_period.contains(planet.orbit.period));

                for other in system.planets.iter().skip(i + 1) {
                    assert!((r - other.orbit.radius()).abs() > config.planet_separation);
                }
            }
        }
    }

    #[test]
    fn moon_count_spans_the_whole_range() {
        assert_eq!(moon_count(&(2..=6), EasingCurve::CubeIn, 0.0), 2);
        assert_eq!(moon_count(&(2..=6), EasingCurve::CubeIn, 1.0), 6);
        assert_eq!(moon_count(&(2..=6), EasingCurve::Linear, 0.5), 4);
        // CubeIn(0.5) = 0.125 -> 2 + round(0.5)
        assert_eq!(moon_count(&(2..=6), EasingCurve::CubeIn, 0.5), 3);
        for u in [0.0, 0.3, 0.99, 1.0] {
            assert_eq!(moon_count(&(3..=3), EasingCurve::CubeOut, u), 3);
            assert_eq!(moon_count(&(0..=0), EasingCurve::Linear, u), 0);
        }
        // Jitter curves dip below zero; the count never drops under the minimum.
        for i in 0..=100 {
            let n = moon_count(&(1..=4), EasingCurve::JitterOutsideStay, i as f64 / 100.0);
            assert!((1..=4).contains(&n));
        }
    }

    #[test]
    fn moons_respect_their_planet_template() {
        let config = SystemConfig::default();
        for seed in 0..40 {
            let system = SystemGenerator::new(seed).generate().expect("system");
            for planet in &system.planets {
                let details = planet.as_planet().expect("planet details");
                let template = config
                    .planet_table(details.zone)
                    .items()
                    .find(|t| t.kind == details.planet_type)
                    .expect("template for planet");
                assert!(details.moons.len() <= *template.moon_count.end() as usize);

                for (i, moon) in details.moons.iter().enumerate() {
                    let r = moon.orbit.radius();
                    assert!(template.moon_orbit.contains(r));
                    assert!(config.moon_orbit_period.contains(moon.orbit.period));
                    assert!(moon.name.starts_with(&planet.name));
                    assert_eq!(moon.stats.spin_clockwise, system.spin_clockwise);
                    for other in details.moons.iter().skip(i + 1) {
                        assert!((r - other.orbit.radius()).abs() > template.moon_separation);
                    }
                }
            }
        }
    }

    #[test]
    fn crowded_orbits_shrink_the_system_instead_of_failing() {
        let mut config = SystemConfig::default();
        config.stars = single_star((1.0, 1.0));
        config.planet_count = 5..=5;
        config.planet_separation = 1.0e6;

        let system = generate_system(8, config).expect("valid config");
        assert_eq!(system.planets.len(), 1);
    }

    #[test]
    fn dark_star_has_no_planets() {
        let mut config = SystemConfig::default();
        config.stars = single_star((0.0, 0.0));
        let system = generate_system(99, config).expect("valid config");
        assert_eq!(system.star.luminosity(), Some(0.0));
        assert!(system.planets.is_empty());
        assert_eq!(system.body_count(), 1);
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let mut config = SystemConfig::default();
        config.habitable_planets = WeightedTable::new(Vec::new());
        assert!(matches!(
            generate_system(1, config),
            Err(ConfigError::EmptyTable { .. })
        ));
    }

    #[test]
    fn fixed_star_matches_reference_luminosity() {
        let mut config = SystemConfig::default();
        config.stars = single_star((1.0, 1.0));
        let system = generate_system(5, config).expect("valid config");
        let star = system.star.as_star().expect("star details");
        assert_eq!(star.temperature, 5800.0);
        let expected = 4.0 * std::f64::consts::PI * 5.670367e-8 * 5800f64.powi(4);
        assert!((star.luminosity - expected).abs() / expected < 1e-12);
        assert_eq!(system.zones, ZoneRadii::from_luminosity(star.luminosity));
    }

    #[test]
    fn repeated_generation_keeps_star_names_unique() {
        let mut gen = SystemGenerator::new(17);
        let mut names = HashSet::new();
        for _ in 0..20 {
            let system = gen.generate().expect("system");
            assert!(names.insert(system.star.name.clone()));
            for planet in &system.planets {
                assert!(planet.name.starts_with(&system.star.name));
            }
        }
    }

    #[test]
    fn advancing_moves_planets_along_their_orbits() {
        let mut system = SystemGenerator::new(3).generate().expect("system");
        let before: Vec<f64> = system.planets.iter().map(|p| p.orbit.phase).collect();
        let snapshot = system.advance(1.5);
        assert_eq!(snapshot.planets.len(), system.planets.len());

        let moved = system.planets.iter().zip(&snapshot.planets).zip(before);
        for ((planet, position), phase) in moved {
            assert!((planet.orbit.phase - (phase + 1.5)).abs() < 1e-9);
            let distance = (position.offset.x.powi(2) + position.offset.z.powi(2)).sqrt();
            assert!((distance - planet.orbit.radius()).abs() < 1e-6);
            assert_eq!(position.moons.len(), planet.moons().len());
        }
    }

    #[test]
    fn json_view_exposes_body_attributes() {
        let system = SystemGenerator::new(21).generate().expect("system");
        let json: serde_json::Value =
            serde_json::from_str(&system_json(&system)).expect("valid json");

        assert_eq!(json["star"]["kind"], "Star");
        assert!(json["star"]["luminosity"].as_f64().is_some());
        assert!(json["star"].get("orbit").is_none());
        let planets = json["planets"].as_array().expect("planet list");
        assert_eq!(planets.len(), system.planets.len());
        for planet in planets {
            assert_eq!(planet["kind"], "Planet");
            assert!(planet["has_water"].is_boolean());
            assert!(planet["orbit"]["period"].as_f64().is_some());
        }
    }

    #[test]
    fn report_lists_every_body() {
        let system = SystemGenerator::new(11).generate().expect("system");
        let report = system_report(&system);
        assert!(report.starts_with(&system.star.name));
        assert_eq!(report.lines().count(), 3 + system.body_count() - 1);
    }
}
