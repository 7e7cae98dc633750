/// How segments with (nearly) equal end-point `x` coordinates are
/// treated by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalPolicy {
    /// Vertical segments never enter the active set, but are
    /// intersected against it with a range query at their `x`.
    ///
    /// This is the default. Earlier `line-crossings` releases dropped
    /// vertical segments instead; [`VerticalPolicy::Exclude`]
    /// (`--exclude-vertical`) keeps that behaviour.
    Include,
    /// Vertical segments are dropped before the sweep starts.
    Exclude,
}

impl Default for VerticalPolicy {
    fn default() -> Self {
        VerticalPolicy::Include
    }
}

/// Tunables of a sweep run.
///
/// Event batching and incidence use `eps`. Active segments are told
/// apart by `order_eps`, which only has to absorb rounding of computed
/// intersection points.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Absolute tolerance for coordinate comparisons.
    pub eps: f64,
    /// Difference in `y` below which two active segments meet at the
    /// sweep line and are ordered by slope.
    pub order_eps: f64,
    /// Number of decimal digits of the grid intersection points are
    /// snapped to in the registry.
    pub precision: u32,
    /// Decimal digits used when reporting points.
    pub output_digits: usize,
    pub vertical: VerticalPolicy,
    /// Check the order of the active segments after every batch of
    /// events. Expensive; on by default only in debug builds.
    pub validate: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            eps: 1e-6,
            order_eps: 1e-9,
            precision: 6,
            output_digits: 3,
            vertical: VerticalPolicy::default(),
            validate: cfg!(debug_assertions),
        }
    }
}

impl SweepConfig {
    #[must_use]
    pub fn with_eps(mut self, eps: f64) -> Self {
        assert!(eps >= 0. && eps.is_finite(), "tolerance must be finite and non-negative");
        self.eps = eps;
        self.order_eps = self.order_eps.min(eps);
        self
    }

    #[must_use]
    pub fn with_order_eps(mut self, order_eps: f64) -> Self {
        assert!(
            order_eps >= 0. && order_eps.is_finite(),
            "tolerance must be finite and non-negative"
        );
        self.order_eps = order_eps;
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_output_digits(mut self, digits: usize) -> Self {
        self.output_digits = digits;
        self
    }

    #[must_use]
    pub fn with_vertical(mut self, vertical: VerticalPolicy) -> Self {
        self.vertical = vertical;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.vertical, VerticalPolicy::Include);
        assert_eq!(config.eps, 1e-6);
        assert_eq!(config.order_eps, 1e-9);

        // Ordering is never looser than incidence.
        let config = config.with_eps(1e-12);
        assert_eq!(config.order_eps, 1e-12);
    }
}
