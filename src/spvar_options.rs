use crate::elite::{elite_size, ObjectiveSense};
use crate::spvar_error::{SpvarError, SpvarResult};
use crate::statistics::DispersionMetric;

/// Options for one SPVAR reduction
#[derive(Clone, Debug, PartialEq)]
pub struct SpvarOptions {
    /// samples drawn from the oracle to estimate the statistics
    pub sample_size: usize,
    pub fixing_threshold: f64,
    pub elite_fraction: f64,
    /// passed to the oracle untouched
    pub duration_hint: usize,
    pub metric: DispersionMetric,
    pub sense: ObjectiveSense,
}

impl SpvarOptions {
    pub fn new() -> Self {
        Self {
            sample_size: 100,
            fixing_threshold: 0.0,
            elite_fraction: 0.2,
            duration_hint: 1000,
            metric: DispersionMetric::StdDev,
            sense: ObjectiveSense::Minimize,
        }
    }

    /// Checks the options before any sample is spent on them.
    pub fn validate(&self) -> SpvarResult<()> {
        if self.sample_size == 0 {
            return Err(SpvarError::InvalidParameter(
                "SPVAR needs a positive sample size".to_string(),
            ));
        }

        if !(self.fixing_threshold >= 0.0 && self.fixing_threshold.is_finite()) {
            return Err(SpvarError::InvalidParameter(format!(
                "fixing threshold must be a finite non-negative number, got {}",
                self.fixing_threshold
            )));
        }

        elite_size(self.sample_size, self.elite_fraction).map(|_| ())
    }

    pub fn set_metric(&mut self, metric: Option<String>) {
        if let Some(m) = metric.as_deref().and_then(DispersionMetric::from_name) {
            self.metric = m;
        }
    }

    pub fn set_sense(&mut self, sense: Option<String>) {
        if let Some(s) = sense.as_deref().and_then(ObjectiveSense::from_name) {
            self.sense = s;
        }
    }
}

impl Default for SpvarOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_setters() {
        let mut options = SpvarOptions::new();
        options.set_metric(Some("DisagreementFraction".to_string()));
        options.set_sense(Some("Maximize".to_string()));
        assert_eq!(options.metric, DispersionMetric::DisagreementFraction);
        assert_eq!(options.sense, ObjectiveSense::Maximize);

        // unknown names and None leave the options alone
        options.set_metric(Some("Entropy".to_string()));
        options.set_sense(None);
        assert_eq!(options.metric, DispersionMetric::DisagreementFraction);
        assert_eq!(options.sense, ObjectiveSense::Maximize);
    }

    #[test]
    fn test_validate() {
        assert!(SpvarOptions::new().validate().is_ok());

        let mut options = SpvarOptions::new();
        options.sample_size = 0;
        assert!(options.validate().is_err());

        let mut options = SpvarOptions::new();
        options.fixing_threshold = -1.0;
        assert!(options.validate().is_err());

        // 100 * 0.001 rounds down to an empty elite set
        let mut options = SpvarOptions::new();
        options.elite_fraction = 0.001;
        assert!(matches!(
            options.validate(),
            Err(SpvarError::InvalidParameter(_))
        ));
    }
}
