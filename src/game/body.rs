use crate::easing::{shaped_fraction, EasingCurve};
use crate::game::config::{BodyTemplate, ScaleBands, StarTemplate, ValueRange};
use crate::game::zones::Zone;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Stefan–Boltzmann constant.
pub const STEFAN_BOLTZMANN: f64 = 5.670367e-8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarType {
    MainSequence,
    RedGiant,
    RedSupergiant,
    YellowSupergiant,
    BlueGiant,
    BlueSupergiant,
    RedDwarf,
    BlueDwarf,
    WhiteDwarf,
    BlackDwarf,
    Neutron,
    BlackHole,
}

impl StarType {
    pub fn label(self) -> &'static str {
        match self {
            StarType::MainSequence => "Main Sequence",
            StarType::RedGiant => "Red Giant",
            StarType::RedSupergiant => "Red Supergiant",
            StarType::YellowSupergiant => "Yellow Supergiant",
            StarType::BlueGiant => "Blue Giant",
            StarType::BlueSupergiant => "Blue Supergiant",
            StarType::RedDwarf => "Red Dwarf",
            StarType::BlueDwarf => "Blue Dwarf",
            StarType::WhiteDwarf => "White Dwarf",
            StarType::BlackDwarf => "Black Dwarf",
            StarType::Neutron => "Neutron",
            StarType::BlackHole => "Black Hole",
        }
    }
}

/// Terrain archetypes a planet can spawn as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    Terrestrial,
    Silicate,
    GasDwarf,
    GasGiant,
    Ice,
    IceGiant,
    Iron,
    Lava,
    Ocean,
    Desert,
    Carbon,
    Plutoid,
}

impl PlanetType {
    pub const ALL: [PlanetType; 12] = [
        PlanetType::Terrestrial,
        PlanetType::Silicate,
        PlanetType::GasDwarf,
        PlanetType::GasGiant,
        PlanetType::Ice,
        PlanetType::IceGiant,
        PlanetType::Iron,
        PlanetType::Lava,
        PlanetType::Ocean,
        PlanetType::Desert,
        PlanetType::Carbon,
        PlanetType::Plutoid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlanetType::Terrestrial => "Terrestrial",
            PlanetType::Silicate => "Silicate",
            PlanetType::GasDwarf => "Gas Dwarf",
            PlanetType::GasGiant => "Gas Giant",
            PlanetType::Ice => "Ice",
            PlanetType::IceGiant => "Ice Giant",
            PlanetType::Iron => "Iron",
            PlanetType::Lava => "Lava",
            PlanetType::Ocean => "Ocean",
            PlanetType::Desert => "Desert",
            PlanetType::Carbon => "Carbon",
            PlanetType::Plutoid => "Plutoid",
        }
    }
}

/// Attributes shared by stars, planets and moons. Stars use solar units,
/// planets and moons earth units.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyStats {
    pub mass: f64,
    pub radius: f64,
    pub spin_clockwise: bool,
    /// Degrees of self-rotation per second.
    pub revolution_speed: f64,
    /// Position on the body's colour gradient.
    pub surface_tint: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offset {
    pub const ORIGIN: Offset = Offset {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// Elliptical orbit around the parent body. `width` and `depth` are the
/// half-axes along x and z.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Orbit {
    pub width: f64,
    pub depth: f64,
    pub period: f64,
    pub phase: f64,
    pub tilt_degrees: f64,
}

impl Orbit {
    pub fn circular(radius: f64, period: f64, tilt_degrees: f64) -> Self {
        Self {
            width: radius,
            depth: radius,
            period,
            phase: 0.0,
            tilt_degrees,
        }
    }

    pub fn radius(&self) -> f64 {
        self.width
    }

    pub fn offset(&self) -> Offset {
        if self.period <= 0.0 {
            return Offset::ORIGIN;
        }
        let angle = (self.phase / self.period) * 2.0 * PI;
        Offset {
            x: angle.cos() * self.width,
            y: 0.0,
            z: angle.sin() * self.depth,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stock {
    pub current: u32,
    pub max: u32,
}

impl Stock {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub fn room(&self) -> u32 {
        self.max.saturating_sub(self.current)
    }

    /// Adds as much as fits and returns the amount taken.
    pub fn add(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.room());
        self.current += taken;
        taken
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Supply {
    All,
    Energy,
    Minerals,
    Colonies,
}

/// Resources a body can hold. The generator leaves every capacity at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub energy: Stock,
    pub minerals: Stock,
    pub colonies: Stock,
}

impl Inventory {
    fn stocks_mut(&mut self, supply: Supply) -> Vec<&mut Stock> {
        match supply {
            Supply::All => vec![&mut self.energy, &mut self.minerals, &mut self.colonies],
            Supply::Energy => vec![&mut self.energy],
            Supply::Minerals => vec![&mut self.minerals],
            Supply::Colonies => vec![&mut self.colonies],
        }
    }

    /// Adds `amount` to each selected stock; returns the total taken.
    pub fn add(&mut self, supply: Supply, amount: u32) -> u32 {
        self.stocks_mut(supply)
            .into_iter()
            .map(|stock| stock.add(amount))
            .sum()
    }

    /// Moves as much of the selected supplies into `other` as it can hold.
    pub fn transfer(&mut self, supply: Supply, other: &mut Inventory) {
        for (from, to) in self
            .stocks_mut(supply)
            .into_iter()
            .zip(other.stocks_mut(supply))
        {
            from.current -= to.add(from.current);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StarDetails {
    pub star_type: StarType,
    /// Kelvin, rounded to the nearest hundred.
    pub temperature: f64,
    pub luminosity: f64,
    pub display_scale: f64,
    /// Gradient position for the star's colour; follows the temperature draw.
    pub color_fraction: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanetDetails {
    pub planet_type: PlanetType,
    pub zone: Zone,
    pub has_water: bool,
    pub moons: Vec<CelestialBody>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoonDetails {
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind {
    Star(StarDetails),
    Planet(PlanetDetails),
    Moon(MoonDetails),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub stats: BodyStats,
    pub orbit: Orbit,
    /// Self-rotation angle in degrees.
    pub rotation: f64,
    pub inventory: Inventory,
    pub kind: BodyKind,
}

impl CelestialBody {
    pub fn new(name: String, stats: BodyStats, orbit: Orbit, kind: BodyKind) -> Self {
        Self {
            name,
            stats,
            orbit,
            rotation: 0.0,
            inventory: Inventory::default(),
            kind,
        }
    }

    pub fn kind_label(&self) -> &str {
        match &self.kind {
            BodyKind::Star(star) => star.star_type.label(),
            BodyKind::Planet(planet) => planet.planet_type.label(),
            BodyKind::Moon(moon) => &moon.label,
        }
    }

    pub fn as_star(&self) -> Option<&StarDetails> {
        match &self.kind {
            BodyKind::Star(star) => Some(star),
            _ => None,
        }
    }

    pub fn as_planet(&self) -> Option<&PlanetDetails> {
        match &self.kind {
            BodyKind::Planet(planet) => Some(planet),
            _ => None,
        }
    }

    pub fn temperature(&self) -> Option<f64> {
        self.as_star().map(|s| s.temperature)
    }

    pub fn luminosity(&self) -> Option<f64> {
        self.as_star().map(|s| s.luminosity)
    }

    pub fn has_water(&self) -> Option<bool> {
        self.as_planet().map(|p| p.has_water)
    }

    pub fn moons(&self) -> &[CelestialBody] {
        match &self.kind {
            BodyKind::Planet(planet) => &planet.moons,
            _ => &[],
        }
    }

    pub fn moons_mut(&mut self) -> &mut [CelestialBody] {
        match &mut self.kind {
            BodyKind::Planet(planet) => &mut planet.moons,
            _ => &mut [],
        }
    }
}

pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Maps a uniform draw `u` onto `range` through `curve`. Curves that swing
/// outside [0, 1] are folded back to the range ends.
pub fn value_in_range(range: &ValueRange, curve: EasingCurve, u: f64) -> f64 {
    let fraction = shaped_fraction(curve, u).clamp(0.0, 1.0);
    range.clamp(range.lerp(fraction))
}

pub fn sample_attribute(rng: &mut ChaCha8Rng, range: &ValueRange, curve: EasingCurve) -> f64 {
    value_in_range(range, curve, rng.gen())
}

/// Config validation keeps the bounds on the hundredths grid, so the clamp
/// never moves a value off it.
fn rounded_in_range(range: &ValueRange, curve: EasingCurve, u: f64) -> f64 {
    range.clamp(round_hundredths(value_in_range(range, curve, u)))
}

pub fn generate_stats(
    rng: &mut ChaCha8Rng,
    template: &BodyTemplate,
    spin_clockwise: bool,
) -> BodyStats {
    // Mass and radius share one draw so big bodies come out big on both.
    let size_draw: f64 = rng.gen();
    let mass = rounded_in_range(&template.mass, template.mass_curve, size_draw);
    let radius = rounded_in_range(&template.radius, template.radius_curve, size_draw);
    let revolution_speed =
        sample_attribute(rng, &template.revolution_speed, template.revolution_curve);

    BodyStats {
        mass,
        radius,
        spin_clockwise,
        revolution_speed,
        surface_tint: rng.gen(),
    }
}

/// Radiant power from the surface area and the fourth power of temperature.
pub fn luminosity(radius: f64, temperature: f64) -> f64 {
    4.0 * PI * radius * radius * STEFAN_BOLTZMANN * temperature.powi(4)
}

pub fn display_scale(radius: f64, bands: &ScaleBands) -> f64 {
    let [low, mid, max] = bands.radius_bounds;
    let [small, middle, large] = bands.scales;

    let band = |from: f64, to: f64, curve: EasingCurve, lo: f64, hi: f64| {
        let percent = (radius - from) / (to - from);
        let eased = shaped_fraction(curve, percent).clamp(0.0, 1.0);
        lo + eased * (hi - lo)
    };

    if radius <= low {
        small
    } else if radius <= mid {
        band(low, mid, bands.low_mid_curve, small, middle)
    } else if radius <= max {
        band(mid, max, bands.mid_max_curve, middle, large)
    } else {
        large
    }
}

pub fn generate_star(
    rng: &mut ChaCha8Rng,
    name: String,
    template: &StarTemplate,
    spin_clockwise: bool,
) -> CelestialBody {
    let stats = generate_stats(rng, &template.body, spin_clockwise);

    let color_fraction = shaped_fraction(template.temperature_curve, rng.gen()).clamp(0.0, 1.0);
    let raw = template.temperature.lerp(color_fraction);
    let temperature = template.temperature.clamp((raw / 100.0).round() * 100.0);

    let details = StarDetails {
        star_type: template.kind,
        temperature,
        luminosity: luminosity(stats.radius, temperature),
        display_scale: display_scale(stats.radius, &template.scale),
        color_fraction,
    };

    CelestialBody::new(name, stats, Orbit::default(), BodyKind::Star(details))
}

/// Moves the body along its orbit and returns its offset from the parent.
pub fn advance_phase(body: &mut CelestialBody, delta: f64) -> Offset {
    let orbit = &mut body.orbit;
    if orbit.period <= 0.0 || !delta.is_finite() {
        return orbit.offset();
    }
    orbit.phase = (orbit.phase + delta).rem_euclid(orbit.period);
    if orbit.phase >= orbit.period {
        orbit.phase = 0.0;
    }
    orbit.offset()
}

/// Turns the body about its own axis; returns the new angle in degrees.
pub fn advance_rotation(body: &mut CelestialBody, delta: f64) -> f64 {
    if !delta.is_finite() {
        return body.rotation;
    }
    let direction = if body.stats.spin_clockwise { 1.0 } else { -1.0 };
    let turned = body.rotation + body.stats.revolution_speed * direction * delta;
    body.rotation = turned.rem_euclid(360.0);
    if body.rotation >= 360.0 {
        body.rotation = 0.0;
    }
    body.rotation
}
