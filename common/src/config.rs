use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Minimum winding depth at which a point counts as inside each source of a
/// Boolean operation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BooleanConfig {
    pub min_depth_a: i32,
    pub min_depth_b: i32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct OffsetConfig {
    /// Signed offset distance. Positive grows the solid, negative shrinks it.
    pub distance: f64,
    /// Results with an area under `tolerance²` are discarded.
    pub tolerance: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DecimateConfig {
    pub tolerance: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfillPattern {
    Linear,
    Grid,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct InfillConfig {
    pub pattern: InfillPattern,
    /// Scan line angle in degrees.
    pub angle: f64,
    /// Distance between scan lines at full density.
    pub spacing: f64,
    /// Fill fraction in (0, 1]. The effective spacing is `spacing / density`.
    pub density: f64,
    /// Puts the scan lines on multiples of the spacing instead of halfway
    /// between them. Alternating this per layer staggers the lines.
    pub parity: bool,
    /// Joins the end of each scan line to the start of the next one when
    /// they are close enough.
    pub connect_lines: bool,
    pub min_depth: i32,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct LayerConfig {
    /// Number of decimal digits kept by the fixed point lattice.
    pub precision: u32,
    /// Distance between consecutive slicing planes.
    pub layer_height: f64,
    pub walls: u32,
    pub wall_spacing: f64,
    pub decimate: f64,
    pub infill: InfillConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPattern(pub String);

impl InfillConfig {
    /// Line spacing after applying the density, never below `f64::EPSILON`.
    pub fn effective_spacing(&self) -> f64 {
        let density = self.density.clamp(f64::EPSILON, 1.0);
        (self.spacing / density).max(f64::EPSILON)
    }
}

impl Default for BooleanConfig {
    fn default() -> Self {
        Self {
            min_depth_a: 1,
            min_depth_b: 1,
        }
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            distance: -0.4,
            tolerance: 0.01,
        }
    }
}

impl Default for DecimateConfig {
    fn default() -> Self {
        Self { tolerance: 0.01 }
    }
}

impl Default for InfillConfig {
    fn default() -> Self {
        Self {
            pattern: InfillPattern::Linear,
            angle: 45.0,
            spacing: 0.4,
            density: 0.2,
            parity: false,
            connect_lines: false,
            min_depth: 1,
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            precision: 3,
            layer_height: 0.2,
            walls: 2,
            wall_spacing: 0.4,
            decimate: 0.01,
            infill: InfillConfig::default(),
        }
    }
}

impl FromStr for InfillPattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "lines" => Ok(Self::Linear),
            "grid" => Ok(Self::Grid),
            _ => Err(UnknownPattern(s.to_owned())),
        }
    }
}

impl fmt::Display for InfillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::Grid => "grid",
        })
    }
}

impl fmt::Display for UnknownPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown infill pattern `{}`", self.0)
    }
}

impl std::error::Error for UnknownPattern {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_names() {
        assert_eq!("Grid".parse(), Ok(InfillPattern::Grid));
        assert_eq!("lines".parse(), Ok(InfillPattern::Linear));
        assert!("gyroid".parse::<InfillPattern>().is_err());
    }

    #[test]
    fn density_scales_spacing() {
        let config = InfillConfig {
            spacing: 0.4,
            density: 0.5,
            ..Default::default()
        };
        assert!((config.effective_spacing() - 0.8).abs() < 1e-12);
    }
}
