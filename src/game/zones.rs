use crate::game::config::ValueRange;
use serde::{Deserialize, Serialize};

/// Concentric temperature band around a star.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hot,
    Habitable,
    Cold,
    Ice,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Hot, Zone::Habitable, Zone::Cold, Zone::Ice];

    pub fn label(self) -> &'static str {
        match self {
            Zone::Hot => "Hot",
            Zone::Habitable => "Habitable",
            Zone::Cold => "Cold",
            Zone::Ice => "Ice",
        }
    }
}

// (multiplier, flux) per boundary. Distances are eighth roots of
// luminosity / flux, scaled so systems fit the play area.
const HOT: (f64, f64) = (5.0, 9.0);
const HABITABLE_INNER: (f64, f64) = (9.0, 1.1);
const HABITABLE_OUTER: (f64, f64) = (10.0, 0.53);
const COLD: (f64, f64) = (12.0, 0.1);
const ICE: (f64, f64) = (20.0, 0.033);

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ZoneRadii {
    /// Closest orbit a planet may take.
    pub hot: f64,
    pub habitable_inner: f64,
    pub habitable_outer: f64,
    pub cold: f64,
    /// Furthest orbit a planet may take.
    pub ice: f64,
}

fn boundary(luminosity: f64, (multiplier, flux): (f64, f64)) -> f64 {
    multiplier * (luminosity / flux).sqrt().sqrt().sqrt()
}

impl ZoneRadii {
    pub fn from_luminosity(luminosity: f64) -> Self {
        if !(luminosity.is_finite() && luminosity > 0.0) {
            return Self::default();
        }
        Self {
            hot: boundary(luminosity, HOT),
            habitable_inner: boundary(luminosity, HABITABLE_INNER),
            habitable_outer: boundary(luminosity, HABITABLE_OUTER),
            cold: boundary(luminosity, COLD),
            ice: boundary(luminosity, ICE),
        }
    }

    pub fn classify(&self, radius: f64) -> Zone {
        if radius < self.habitable_inner {
            Zone::Hot
        } else if radius < self.habitable_outer {
            Zone::Habitable
        } else if radius < self.cold {
            Zone::Cold
        } else {
            Zone::Ice
        }
    }

    pub fn placement_range(&self) -> ValueRange {
        ValueRange::new(self.hot, self.ice)
    }

    /// True when there is room to place at least one orbit.
    pub fn is_populated(&self) -> bool {
        self.ice > self.hot
    }
}
