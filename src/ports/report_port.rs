//! Report generation port trait.

use crate::domain::analysis::AnalysisReport;
use crate::domain::error::EtfLensError;

/// Port for writing analysis reports.
pub trait ReportPort {
    fn write(&self, report: &AnalysisReport, output_path: &str) -> Result<(), EtfLensError>;
}
