//! Layout configuration

/// Physics constants and canvas size for the force layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Coulomb constant for pairwise inverse-square repulsion
    pub repulsion: f64,

    /// Hooke constant for edge springs
    pub spring: f64,

    /// Rest length of an edge spring
    pub ideal_length: f64,

    /// Velocity multiplier applied every step
    pub damping: f64,

    /// Base pull toward the canvas center, scaled by trust
    pub gravity: f64,

    /// Kinetic energy below which the layout counts as settled
    pub convergence: f64,

    /// Step cap for [`crate::run_simulation`]
    pub max_iterations: usize,

    /// Half-width of the square around the center where nodes spawn
    pub spawn_spread: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            repulsion: 5000.0,
            spring: 0.01,
            ideal_length: 100.0,
            damping: 0.85,
            gravity: 0.5,
            convergence: 0.1,
            max_iterations: 200,
            spawn_spread: 100.0,
        }
    }
}

impl LayoutConfig {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}
