//! Report rendering port trait.

use crate::domain::analysis::Analysis;
use crate::domain::error::MastraderError;

/// Port for turning analyses into text output.
pub trait ReportPort {
    fn render(&self, analysis: &Analysis) -> Result<String, MastraderError>;

    /// Default implementation: renders each analysis and joins them with a blank line.
    fn render_many(&self, analyses: &[Analysis]) -> Result<String, MastraderError> {
        let parts = analyses
            .iter()
            .map(|a| self.render(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join("\n"))
    }
}
