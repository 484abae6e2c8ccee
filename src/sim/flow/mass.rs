use anyhow::{Result, ensure};

/// Uniform per-node mass and its inverse square root.
///
/// On a uniform grid every degree of freedom carries the same mass
/// `rho * dx * dy`, so the mass matrix is a scalar multiple of the identity.
/// It is exposed as scalars rather than a materialized matrix; only the
/// projection build ever folds it into an operator.
#[derive(Debug, Clone, Copy)]
pub struct MassScaling {
    mass: f64,
    inv_sqrt: f64,
}

impl MassScaling {
    pub fn new(density: f64, dx: f64, dy: f64) -> Result<Self> {
        let mass = density * dx * dy;
        ensure!(
            mass > 0.0 && mass.is_finite(),
            "Node mass must be positive and finite, got {mass}"
        );
        Ok(Self {
            mass,
            inv_sqrt: 1.0 / mass.sqrt(),
        })
    }

    /// Mass per node in kg.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Scalar value of M^(-1/2).
    pub fn inv_sqrt(&self) -> f64 {
        self.inv_sqrt
    }
}
