//! Typst-based dashboard report generation.
//!
//! Orchestrates placeholder resolution: reads a Typst template (either the
//! built-in default or a custom file via `template_path`), resolves all
//! `{{PLACEHOLDER}}` markers by calling helpers from `chart_svg` and `tables`,
//! and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::Path;

use crate::domain::aggregation::DashboardViews;
use crate::domain::error::DashboardError;
use crate::ports::report_port::ReportPort;

/// Wrap an SVG document in Typst `image.decode`, or fall back to a note.
fn embed_svg(svg: &str, empty_note: &str) -> String {
    if svg.is_empty() {
        format!("_{}_", empty_note)
    } else {
        format!(
            "#image.decode(\n\"{}\",\n  width: 100%,\n)",
            svg.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup ready to be written to a `.typ` file.
pub fn resolve(template: &str, views: &DashboardViews, title: &str) -> String {
    let mut output = template.to_string();

    output = output.replace("{{TITLE}}", &tables::escape(title));
    output = output.replace("{{TOTAL_SALES}}", &tables::escape(&views.total_sales_label));

    let category = tables::render_sales_share(
        "Category",
        views.category_sales.iter().map(|r| (&r.category, r.sales)),
        views.total_sales,
    );
    output = output.replace("{{CATEGORY_SALES}}", &category);

    let segment = tables::render_sales_share(
        "Segment",
        views.segment_sales.iter().map(|r| (&r.segment, r.sales)),
        views.total_sales,
    );
    output = output.replace("{{SEGMENT_SALES}}", &segment);

    output = output.replace(
        "{{SEGMENT_HIERARCHY}}",
        &tables::render_segment_hierarchy(&views.segment_hierarchy),
    );

    let years = views.top_customer_years();
    let mut top_customers = tables::render_top_customers(&views.top_customers);
    top_customers.push_str(&tables::render_customer_profit_by_year(
        &views.top_customers,
        &views.top_customer_profit,
        &years,
    ));
    output = output.replace("{{TOP_CUSTOMERS}}", &top_customers);

    let customer_svg = chart_svg::generate_top_customer_svg(
        &views.top_customers,
        &views.top_customer_profit,
        &years,
    );
    output = output.replace(
        "{{TOP_CUSTOMER_CHART_SVG}}",
        &embed_svg(&customer_svg, "No customer profit data."),
    );

    output = output.replace(
        "{{YEARLY_TRENDS}}",
        &tables::render_yearly_trends(&views.yearly_totals),
    );
    let yearly_svg = chart_svg::generate_yearly_svg(&views.yearly_totals);
    output = output.replace(
        "{{YEARLY_CHART_SVG}}",
        &embed_svg(&yearly_svg, "No yearly data."),
    );

    output = output.replace(
        "{{SEGMENT_SUMMARY}}",
        &tables::render_segment_summary(&views.segment_totals),
    );

    output
}

/// Writes `.typ` reports from the default or a custom template.
pub struct TypstReportAdapter {
    template: Option<String>,
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self { template: None }
    }

    pub fn with_template(template: String) -> Self {
        Self {
            template: Some(template),
        }
    }

    pub fn from_template_file<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let template = fs::read_to_string(path).map_err(|e| {
            DashboardError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to read template {}: {}", path.display(), e),
            ))
        })?;
        if template.trim().is_empty() {
            return Err(DashboardError::Render {
                reason: format!("template {} is empty", path.display()),
            });
        }
        Ok(Self::with_template(template))
    }

    fn template(&self) -> &str {
        self.template
            .as_deref()
            .unwrap_or(default_template::template())
    }
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(
        &self,
        views: &DashboardViews,
        title: &str,
        output_path: &str,
    ) -> Result<(), DashboardError> {
        let content = resolve(self.template(), views, title);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
