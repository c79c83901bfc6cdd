use crate::evaluation::{EvaluationReport, EvaluationStage, HonestConfig};
use crate::ising::IsingModel;

/// This is the main logic behind the evaluation output
///
/// It has varying levels of output, where 0 means nothing is logged, and each
/// additional level includes everything previous
///
/// 0 - Nothing
/// 1 - Header and Report
/// 2 - Each Stage of the Evaluation
///
pub struct EvaluationLogger {
    pub output_level: usize,
}

impl EvaluationLogger {
    pub const fn new(level: usize) -> Self {
        Self {
            output_level: level,
        }
    }

    pub fn output_header(&self, model: &IsingModel, config: &HonestConfig) {
        if self.output_level < 1 {
            return;
        }

        let version_number = env!("CARGO_PKG_VERSION");
        let num_variables = model.num_variables();
        let num_couplings = model.couplings().len();
        let total = config.total_samples;
        let spvar_samples = config.options.sample_size;
        let threshold = config.options.fixing_threshold;
        let elite = config.options.elite_fraction;

        log::info!("SPVAR honest evaluation, version {version_number}");
        log::info!("Problem size: {num_variables} variables, {num_couplings} couplings");
        log::info!(
            "Budget: {total} samples, {spvar_samples} for SPVAR, threshold {threshold}, elite fraction {elite}"
        );
    }

    pub fn output_stage(&self, stage: EvaluationStage, detail: &str) {
        if self.output_level < 2 {
            return;
        }

        log::info!("{stage:?}: {detail}");
    }

    pub fn output_report(&self, report: &EvaluationReport) {
        if self.output_level < 1 {
            return;
        }

        let without = report.objective_without_reduction;
        let with = report.objective_with_reduction;
        let fixed = report.count_fixed;
        let percent = report.fixed_percent();

        log::info!("Result without SPVAR: {without}");
        log::info!("Result with SPVAR: {with}");
        log::info!("Fixed variables: {fixed} ({percent:.1}%)");
        if let Some(change) = report.relative_change_percent() {
            log::info!("Change of the objective: {change:.1}%");
        }
    }
}
