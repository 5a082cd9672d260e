use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const BARNES_HUT_THETA: f32 = 0.72;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepulsionMode {
    /// Every unordered pair, O(n²) per tick.
    #[default]
    Exact,
    /// Quadtree approximation; cells narrower than `theta` times their distance
    /// act as a single mass.
    BarnesHut { theta: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: f32,
    pub height: f32,
    /// Radius of the circle new nodes are seeded on.
    pub initial_radius: f32,
    /// Negative values repel.
    pub repulsion: f32,
    pub repulsion_mode: RepulsionMode,
    pub spring_length: f32,
    pub spring_strength: f32,
    pub gravity: f32,
    pub velocity_damping: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            initial_radius: 200.0,
            repulsion: -300.0,
            repulsion_mode: RepulsionMode::Exact,
            spring_length: 120.0,
            spring_strength: 0.05,
            gravity: 0.01,
            velocity_damping: 0.6,
            alpha_decay: 0.0228,
            alpha_min: 0.001,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("width", self.width),
            ("height", self.height),
            ("initial_radius", self.initial_radius),
            ("repulsion", self.repulsion),
            ("spring_length", self.spring_length),
            ("spring_strength", self.spring_strength),
            ("gravity", self.gravity),
            ("velocity_damping", self.velocity_damping),
            ("alpha_decay", self.alpha_decay),
            ("alpha_min", self.alpha_min),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{name} must be finite, got {value}")));
            }
        }

        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(invalid(format!(
                "canvas must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if self.initial_radius < 0.0 || self.spring_length < 0.0 {
            return Err(invalid("initial_radius and spring_length must not be negative"));
        }
        if self.spring_strength < 0.0 || self.gravity < 0.0 {
            return Err(invalid("spring_strength and gravity must not be negative"));
        }
        if !(self.velocity_damping > 0.0 && self.velocity_damping <= 1.0) {
            return Err(invalid(format!(
                "velocity_damping must be in (0, 1], got {}",
                self.velocity_damping
            )));
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            return Err(invalid(format!(
                "alpha_decay must be in (0, 1), got {}",
                self.alpha_decay
            )));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < 1.0) {
            return Err(invalid(format!(
                "alpha_min must be in (0, 1), got {}",
                self.alpha_min
            )));
        }
        if let RepulsionMode::BarnesHut { theta } = self.repulsion_mode
            && !(theta.is_finite() && theta > 0.0)
        {
            return Err(invalid(format!("barnes_hut theta must be positive, got {theta}")));
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Wheel-in multiplies the scale by this, wheel-out divides by it.
    pub zoom_step: f32,
    /// Screen-space pick radius for hover and click.
    pub hover_radius: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.2,
            zoom_max: 3.0,
            zoom_step: 1.1,
            hover_radius: 14.0,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [self.zoom_min, self.zoom_max, self.zoom_step, self.hover_radius];
        if values.iter().any(|value| !value.is_finite()) {
            return Err(invalid("view settings must be finite"));
        }
        if self.zoom_min <= 0.0 || self.zoom_min > self.zoom_max {
            return Err(invalid(format!(
                "zoom range [{}, {}] is empty or not positive",
                self.zoom_min, self.zoom_max
            )));
        }
        if self.zoom_step <= 1.0 {
            return Err(invalid(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if self.hover_radius < 0.0 {
            return Err(invalid("hover_radius must not be negative"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simulation: SimulationConfig,
    pub view: ViewConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.view.validate()
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn bundled_demo_config_is_valid() {
        let config = EngineConfig::from_toml_str(include_str!("../demos/lexgraph.toml")).unwrap();
        assert_eq!(config.simulation.width, 1000.0);
        assert_eq!(
            config.simulation.repulsion_mode,
            RepulsionMode::BarnesHut { theta: 0.8 }
        );
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [simulation]
            spring_length = 150.0
            repulsion_mode = { kind = "barnes_hut", theta = 0.8 }

            [view]
            zoom_max = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.spring_length, 150.0);
        assert_eq!(config.simulation.gravity, SimulationConfig::default().gravity);
        assert_eq!(
            config.simulation.repulsion_mode,
            RepulsionMode::BarnesHut { theta: 0.8 }
        );
        assert_eq!(config.view.zoom_max, 4.0);
        assert_eq!(config.view.zoom_min, 0.2);
    }

    #[test]
    fn rejects_out_of_range_tunables() {
        let err = EngineConfig::from_toml_str("[simulation]\nvelocity_damping = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = EngineConfig::from_toml_str("[view]\nzoom_min = 4.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = EngineConfig::from_toml_str("[simulation]\ngravity = \"strong\"\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
