use thiserror::Error;

pub const DEFAULT_SVD_EPSILON: f64 = f64::EPSILON;
pub const DEFAULT_SVD_MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Convergence controls for the 3×3 singular value decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdConfig {
    /// Tolerance used to decide that an off-diagonal element has vanished.
    pub epsilon: f64,
    /// Iteration cap; exceeding it is reported as a numeric failure.
    pub max_iterations: usize,
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_SVD_EPSILON,
            max_iterations: DEFAULT_SVD_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentConfig {
    /// Exclude hydrogens (atomic number 1) before aligning.
    pub heavy_atoms_only: bool,
    pub svd: SvdConfig,
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    heavy_atoms_only: Option<bool>,
    svd_epsilon: Option<f64>,
    svd_max_iterations: Option<usize>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heavy_atoms_only(mut self, enabled: bool) -> Self {
        self.heavy_atoms_only = Some(enabled);
        self
    }
    pub fn svd_epsilon(mut self, epsilon: f64) -> Self {
        self.svd_epsilon = Some(epsilon);
        self
    }
    pub fn svd_max_iterations(mut self, iterations: usize) -> Self {
        self.svd_max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let epsilon = self.svd_epsilon.unwrap_or(DEFAULT_SVD_EPSILON);
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "svd_epsilon",
                reason: format!("must be a positive finite number, got {}", epsilon),
            });
        }
        let max_iterations = self
            .svd_max_iterations
            .unwrap_or(DEFAULT_SVD_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "svd_max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(AlignmentConfig {
            heavy_atoms_only: self.heavy_atoms_only.unwrap_or(false),
            svd: SvdConfig {
                epsilon,
                max_iterations,
            },
        })
    }
}
