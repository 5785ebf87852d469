/// Consecutive rejected draws after which a tier stops growing.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Placed(f64),
    /// No collision-free radius was found.
    Exhausted { attempts: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementBatch {
    pub radii: Vec<f64>,
    pub complete: bool,
}

/// Hands out orbit radii that keep clear of every sibling placed before.
#[derive(Clone, Debug)]
pub struct OrbitPlacer {
    min_separation: f64,
    placed: Vec<f64>,
}

impl OrbitPlacer {
    pub fn new(min_separation: f64) -> Self {
        Self {
            min_separation,
            placed: Vec::new(),
        }
    }

    pub fn placed(&self) -> &[f64] {
        &self.placed
    }

    fn collides(&self, candidate: f64) -> bool {
        self.placed
            .iter()
            .any(|existing| (candidate - existing).abs() <= self.min_separation)
    }

    /// Draws candidates until one is clear of all siblings.
    pub fn place(&mut self, mut draw: impl FnMut() -> f64) -> Placement {
        let mut attempts = 0;
        while attempts < MAX_PLACEMENT_ATTEMPTS {
            let candidate = draw();
            if !self.collides(candidate) {
                self.placed.push(candidate);
                return Placement::Placed(candidate);
            }
            attempts += 1;
        }
        Placement::Exhausted { attempts }
    }

    /// Places up to `count` radii, stopping at the first exhausted slot.
    pub fn place_all(&mut self, count: usize, mut draw: impl FnMut() -> f64) -> PlacementBatch {
        let mut radii = Vec::with_capacity(count);
        for _ in 0..count {
            match self.place(&mut draw) {
                Placement::Placed(radius) => radii.push(radius),
                Placement::Exhausted { .. } => {
                    return PlacementBatch {
                        radii,
                        complete: false,
                    }
                }
            }
        }
        PlacementBatch {
            radii,
            complete: true,
        }
    }
}
