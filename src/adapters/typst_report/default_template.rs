//! Default Typst report template.
//!
//! Built-in Typst markup with `{{PLACEHOLDER}}` substitution.

const DEFAULT_TEMPLATE: &str = r#"#set page(paper: "a4", margin: (x: 1.8cm, y: 2cm))
#set text(size: 10pt)
#set table(stroke: 0.5pt + gray, inset: 5pt)

= {{TITLE}}

#align(center)[
  #text(size: 12pt)[Total Sales] \
  #text(size: 20pt, weight: "bold")[{{TOTAL_SALES}}]
]

== Sales by Category

{{CATEGORY_SALES}}

== Sales by Segment

{{SEGMENT_SALES}}

== Categories and Sub-Categories Sales by Segment

{{SEGMENT_HIERARCHY}}

== Profits by Top 5 Customers over Years

{{TOP_CUSTOMER_CHART_SVG}}

{{TOP_CUSTOMERS}}

== Profit vs Sales vs Quantity

{{YEARLY_CHART_SVG}}

{{YEARLY_TRENDS}}

== Segment Sales vs Quantity vs Profit

{{SEGMENT_SUMMARY}}
"#;

pub fn template() -> &'static str {
    DEFAULT_TEMPLATE
}
