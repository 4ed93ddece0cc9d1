//! Annealing run parameters and cooling schedules.

use crate::error::{Error, Result};

/// Cooling schedule mapping an epoch number to a temperature-like
/// scale.
///
/// Both variants are geometric decays; the piecewise variant holds the
/// scale constant over blocks of `flat_epochs` epochs. Epochs are
/// never rewound, so the schedule is a pure function of construction
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Continuous decay: `scale0 * base^epoch`.
    Geometric {
        /// Initial scale, strictly positive.
        scale0: f64,
        /// Decay base in (0, 1).
        base: f64,
    },

    /// Piecewise-constant decay: `scale0 * base^(epoch / flat_epochs)`
    /// with the integer quotient.
    PiecewiseGeometric {
        scale0: f64,
        base: f64,
        /// Block length over which the scale stays flat, strictly
        /// positive.
        flat_epochs: u64,
    },
}

impl CoolingSchedule {
    /// Temperature-like scale at the given epoch.
    pub fn temperature(&self, epoch: u64) -> f64 {
        match *self {
            CoolingSchedule::Geometric { scale0, base } => scale0 * base.powf(epoch as f64),
            CoolingSchedule::PiecewiseGeometric {
                scale0,
                base,
                flat_epochs,
            } => scale0 * base.powf((epoch / flat_epochs) as f64),
        }
    }

    /// Human-readable description embedded in checkpoint files.
    pub fn describe(&self) -> String {
        match *self {
            CoolingSchedule::Geometric { scale0, base } => {
                format!("Geometric cooling schedule:\n{scale0} * ({base}^epoch)")
            }
            CoolingSchedule::PiecewiseGeometric {
                scale0,
                base,
                flat_epochs,
            } => format!(
                "Piecewise constant geometric cooling schedule:\n\
                 {scale0} * {base}^(epoch / {flat_epochs})"
            ),
        }
    }

    /// Validates the construction parameters.
    pub fn validate(&self) -> Result<()> {
        let (scale0, base) = match *self {
            CoolingSchedule::Geometric { scale0, base } => (scale0, base),
            CoolingSchedule::PiecewiseGeometric {
                scale0,
                base,
                flat_epochs,
            } => {
                if flat_epochs == 0 {
                    return Err(Error::InvalidParameter {
                        name: "flat_epochs",
                        message: "must be strictly positive".into(),
                    });
                }
                (scale0, base)
            }
        };
        if scale0 <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "scale0",
                message: format!("must be strictly positive, got {scale0}"),
            });
        }
        if base <= 0.0 || base >= 1.0 {
            return Err(Error::InvalidParameter {
                name: "base",
                message: format!("must be strictly between 0 and 1, got {base}"),
            });
        }
        Ok(())
    }
}

/// Configuration for a single annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Number of Metropolis epochs to execute.
    pub epochs: u64,

    /// Emit a progress message every this many epochs; 0 disables.
    pub verbose_every: u64,

    /// How much the best objective must decrease before the best state
    /// is checkpointed once more.
    pub save_tolerance: f64,

    /// Include the current state alongside the best state in
    /// checkpoints.
    pub checkpoint_current: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            epochs: 1,
            verbose_every: 50,
            save_tolerance: 0.1,
            checkpoint_current: false,
        }
    }
}

impl AnnealConfig {
    pub fn with_epochs(mut self, epochs: u64) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_verbose_every(mut self, every: u64) -> Self {
        self.verbose_every = every;
        self
    }

    pub fn with_save_tolerance(mut self, tolerance: f64) -> Self {
        self.save_tolerance = tolerance;
        self
    }

    pub fn with_checkpoint_current(mut self, include: bool) -> Self {
        self.checkpoint_current = include;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidParameter {
                name: "epochs",
                message: "must be strictly positive".into(),
            });
        }
        if !self.save_tolerance.is_finite() || self.save_tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "save_tolerance",
                message: format!(
                    "must be finite and non-negative, got {}",
                    self.save_tolerance
                ),
            });
        }
        Ok(())
    }
}
