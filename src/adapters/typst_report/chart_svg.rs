//! SVG line charts for the yearly and top-customer trend views.

use crate::domain::aggregation::{CustomerProfit, CustomerYearProfit, YearlyTotals};
use crate::domain::transaction::label;
use chrono::Datelike;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING: f64 = 40.0;
const LEGEND_HEIGHT: f64 = 20.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

/// One line on a chart; `None` leaves a gap at that x position.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render series sharing one x axis. Returns an empty string when there is
/// nothing to plot.
pub fn generate_line_chart_svg(x_labels: &[String], series: &[ChartSeries]) -> String {
    let values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .collect();
    if x_labels.is_empty() || values.is_empty() {
        return String::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(0.0);
    let range = max - min;

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING - LEGEND_HEIGHT;
    let step_x = if x_labels.len() > 1 {
        plot_width / (x_labels.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |i: usize| {
        if x_labels.len() > 1 {
            PADDING + i as f64 * step_x
        } else {
            PADDING + plot_width / 2.0
        }
    };
    let y_at = |v: f64| {
        if range > 0.0 {
            PADDING + plot_height - (v - min) / range * plot_height
        } else {
            PADDING + plot_height / 2.0
        }
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="{w:.0}" height="{h:.0}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    svg.push_str(&format!(
        r##"<line x1="{x0:.1}" y1="{y:.1}" x2="{x1:.1}" y2="{y:.1}" stroke="#999" stroke-width="1"/>"##,
        x0 = PADDING,
        x1 = WIDTH - PADDING,
        y = y_at(0.0)
    ));

    for (i, text) in x_labels.iter().enumerate() {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="10" text-anchor="middle">{}</text>"#,
            x_at(i),
            PADDING + plot_height + 14.0,
            escape_xml(text)
        ));
    }

    for (idx, s) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];

        // Consecutive present values form one polyline; a gap starts a new one.
        let mut runs: Vec<Vec<String>> = vec![Vec::new()];
        for (i, value) in s.values.iter().enumerate().take(x_labels.len()) {
            match value {
                Some(v) => {
                    if let Some(run) = runs.last_mut() {
                        run.push(format!("{:.1},{:.1}", x_at(i), y_at(*v)));
                    }
                }
                None => runs.push(Vec::new()),
            }
        }
        for run in runs.iter().filter(|r| !r.is_empty()) {
            if run.len() == 1 {
                let (x, y) = run[0].split_once(',').unwrap_or(("0", "0"));
                svg.push_str(&format!(
                    r#"<circle cx="{}" cy="{}" r="3" fill="{}"/>"#,
                    x, y, color
                ));
            } else {
                svg.push_str(&format!(
                    r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
                    color,
                    run.join(" ")
                ));
            }
        }

        let legend_x = PADDING + idx as f64 * 110.0;
        let legend_y = HEIGHT - LEGEND_HEIGHT / 2.0;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="10" height="10" fill="{}"/><text x="{:.1}" y="{:.1}" font-size="10">{}</text>"#,
            legend_x,
            legend_y - 9.0,
            color,
            legend_x + 14.0,
            legend_y,
            escape_xml(&s.name)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Quantity, sales and profit per year-end bucket.
pub fn generate_yearly_svg(rows: &[YearlyTotals]) -> String {
    let labels: Vec<String> = rows.iter().map(|r| r.year_end.year().to_string()).collect();
    let series = vec![
        ChartSeries {
            name: "Quantity".into(),
            values: rows.iter().map(|r| Some(r.quantity as f64)).collect(),
        },
        ChartSeries {
            name: "Sales".into(),
            values: rows.iter().map(|r| Some(r.sales)).collect(),
        },
        ChartSeries {
            name: "Profit".into(),
            values: rows.iter().map(|r| Some(r.profit)).collect(),
        },
    ];
    generate_line_chart_svg(&labels, &series)
}

/// One line per top customer across the years they ordered in.
pub fn generate_top_customer_svg(
    customers: &[CustomerProfit],
    rows: &[CustomerYearProfit],
    years: &[i32],
) -> String {
    let labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let series: Vec<ChartSeries> = customers
        .iter()
        .map(|c| ChartSeries {
            name: label(&c.customer).to_string(),
            values: years
                .iter()
                .map(|&year| {
                    rows.iter()
                        .find(|r| r.customer == c.customer && r.year == year)
                        .map(|r| r.profit)
                })
                .collect(),
        })
        .collect();
    generate_line_chart_svg(&labels, &series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn yearly(year: i32, sales: f64, quantity: i64, profit: f64) -> YearlyTotals {
        YearlyTotals {
            year_end: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            sales,
            quantity,
            profit,
        }
    }

    #[test]
    fn empty_inputs_render_nothing() {
        assert_eq!(generate_line_chart_svg(&[], &[]), "");
        assert_eq!(generate_yearly_svg(&[]), "");
        let series = vec![ChartSeries {
            name: "Empty".into(),
            values: vec![None, None],
        }];
        assert_eq!(
            generate_line_chart_svg(&["2014".into(), "2015".into()], &series),
            ""
        );
    }

    #[test]
    fn yearly_chart_has_three_lines_and_legend() {
        let svg = generate_yearly_svg(&[
            yearly(2014, 484_247.5, 7581, 49_543.97),
            yearly(2015, 470_532.5, 7979, 61_618.6),
            yearly(2016, 609_205.6, 9837, 81_795.17),
        ]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 3);
        assert!(svg.contains(">Quantity</text>"));
        assert!(svg.contains(">Sales</text>"));
        assert!(svg.contains(">Profit</text>"));
        assert!(svg.contains(">2016</text>"));
    }

    #[test]
    fn gaps_split_lines() {
        let series = vec![ChartSeries {
            name: "Ann".into(),
            values: vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)],
        }];
        let labels: Vec<String> = (2013..2018).map(|y| y.to_string()).collect();
        let svg = generate_line_chart_svg(&labels, &series);
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn isolated_point_is_a_marker() {
        let series = vec![ChartSeries {
            name: "Solo".into(),
            values: vec![Some(5.0)],
        }];
        let svg = generate_line_chart_svg(&["2017".into()], &series);
        assert!(svg.contains("<circle"));
        assert!(!svg.contains("<polyline"));
    }

    #[test]
    fn names_are_xml_escaped() {
        let series = vec![ChartSeries {
            name: "Tom & Jerry <Co>".into(),
            values: vec![Some(1.0), Some(2.0)],
        }];
        let svg = generate_line_chart_svg(&["a".into(), "b".into()], &series);
        assert!(svg.contains("Tom &amp; Jerry &lt;Co&gt;"));
    }

    #[test]
    fn top_customer_chart_one_line_per_customer() {
        let ann = Some("Ann".to_string());
        let bob = Some("Bob".to_string());
        let customers = vec![
            CustomerProfit { customer: ann.clone(), profit: 30.0 },
            CustomerProfit { customer: bob.clone(), profit: 10.0 },
        ];
        let rows = vec![
            CustomerYearProfit { customer: ann.clone(), year: 2015, profit: 10.0 },
            CustomerYearProfit { customer: ann, year: 2016, profit: 20.0 },
            CustomerYearProfit { customer: bob.clone(), year: 2015, profit: 4.0 },
            CustomerYearProfit { customer: bob, year: 2016, profit: 6.0 },
        ];
        let svg = generate_top_customer_svg(&customers, &rows, &[2015, 2016]);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">Bob</text>"));
    }
}
