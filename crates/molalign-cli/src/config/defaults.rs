use molalign::engine::config::{DEFAULT_SVD_EPSILON, DEFAULT_SVD_MAX_ITERATIONS};

pub struct DefaultsConfig {
    pub heavy_atoms_only: bool,
    pub svd_epsilon: f64,
    pub svd_max_iterations: usize,
    pub precision: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            heavy_atoms_only: false,
            svd_epsilon: DEFAULT_SVD_EPSILON,
            svd_max_iterations: DEFAULT_SVD_MAX_ITERATIONS,
            precision: 6,
        }
    }
}
