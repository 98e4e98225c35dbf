//! Report generation port trait.

use crate::domain::aggregation::DashboardViews;
use crate::domain::error::DashboardError;

/// Port for writing the dashboard views to a report file.
pub trait ReportPort {
    fn write(
        &self,
        views: &DashboardViews,
        title: &str,
        output_path: &str,
    ) -> Result<(), DashboardError>;
}
