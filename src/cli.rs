//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, DEFAULT_DATE_FORMAT, TextEncoding};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::aggregation::DashboardViews;
use crate::domain::error::DashboardError;
use crate::domain::product_table::{DEFAULT_PAGE_SIZE, ProductPage, ProductQuery, query_products};
use crate::domain::transaction::{Transaction, date_range, label};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::TransactionSource;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TITLE: &str = "Return on Investment";
pub const DEFAULT_REPORT_PATH: &str = "dashboard.typ";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8050";

#[derive(Parser, Debug)]
#[command(name = "superstore-dash", about = "Retail sales dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every dashboard view as text
    Summary {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Write the dashboard as a Typst report
    Report {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search and page through the product table
    Products {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sub_category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Check a transaction file against the expected schema
    Validate {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        encoding: Option<String>,
        #[arg(long)]
        date_format: Option<String>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Summary { config, data } => run_summary(config.as_ref(), data.as_deref()),
        Command::Report {
            config,
            data,
            output,
        } => run_report(config.as_ref(), data.as_deref(), output.as_ref()),
        Command::Products {
            config,
            data,
            search,
            category,
            sub_category,
            page,
            page_size,
        } => run_products(
            config.as_ref(),
            data.as_deref(),
            ProductFilters {
                search,
                category,
                sub_category,
                page,
                page_size,
            },
        ),
        Command::Validate {
            data,
            encoding,
            date_format,
        } => run_validate(&data, encoding.as_deref(), date_format.as_deref()),
        Command::Serve { config, data } => run_serve(&config, data.as_deref()),
    }
}

fn fail(err: DashboardError) -> ExitCode {
    log::error!("{err}");
    (&err).into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    log::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(DashboardError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

/// A config file is optional when `--data` names the CSV directly.
fn resolve_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(p) => load_config(p),
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn load_transactions(
    config: &dyn ConfigPort,
    data_override: Option<&Path>,
) -> Result<Vec<Transaction>, DashboardError> {
    let source = CsvAdapter::from_config(config, data_override)?;
    log::info!("Loading transactions from {}", source.describe());
    source.load_transactions()
}

pub fn dashboard_title(config: &dyn ConfigPort) -> String {
    config
        .get_setting("dashboard", "title")
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

pub fn page_size(config: &dyn ConfigPort) -> Result<usize, DashboardError> {
    let size = config.get_int("dashboard", "page_size", DEFAULT_PAGE_SIZE as i64);
    if size <= 0 {
        return Err(DashboardError::ConfigInvalid {
            section: "dashboard".into(),
            key: "page_size".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(size as usize)
}

/// Plain-text rendering of every view, used by `summary`.
pub fn render_summary(views: &DashboardViews, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", title);
    let _ = writeln!(out, "Total Sales: {}", views.total_sales_label);

    let _ = writeln!(out, "\n--- Sales by Category ---");
    for row in &views.category_sales {
        let _ = writeln!(out, "  {:<24} {:>16.2}", label(&row.category), row.sales);
    }

    let _ = writeln!(out, "\n--- Sales by Segment ---");
    for row in &views.segment_sales {
        let _ = writeln!(out, "  {:<24} {:>16.2}", label(&row.segment), row.sales);
    }

    let _ = writeln!(out, "\n--- Sales by Segment / Category / Sub-Category ---");
    for row in &views.segment_hierarchy {
        let _ = writeln!(
            out,
            "  {:<14} {:<18} {:<14} {:>14.2}",
            label(&row.segment),
            label(&row.category),
            label(&row.sub_category),
            row.sales
        );
    }

    let _ = writeln!(out, "\n--- Top Customers by Profit ---");
    for (rank, customer) in views.top_customers.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<24} {:>14.2}",
            rank + 1,
            label(&customer.customer),
            customer.profit
        );
    }
    for row in &views.top_customer_profit {
        let _ = writeln!(
            out,
            "     {:<24} {} {:>14.2}",
            label(&row.customer),
            row.year,
            row.profit
        );
    }

    let _ = writeln!(out, "\n--- Sales / Quantity / Profit by Year ---");
    for row in &views.yearly_totals {
        let _ = writeln!(
            out,
            "  {}  {:>14.2} {:>10} {:>14.2}",
            row.year_end, row.sales, row.quantity, row.profit
        );
    }

    let _ = writeln!(out, "\n--- Sales / Quantity / Profit by Segment ---");
    for row in &views.segment_totals {
        let _ = writeln!(
            out,
            "  {:<24} {:>14.2} {:>10} {:>14.2}",
            label(&row.segment),
            row.sales,
            row.quantity,
            row.profit
        );
    }

    out
}

fn run_summary(config_path: Option<&PathBuf>, data: Option<&Path>) -> ExitCode {
    let config = match resolve_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let transactions = match load_transactions(&config, data) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let views = DashboardViews::compute(&transactions);
    print!("{}", render_summary(&views, &dashboard_title(&config)));
    ExitCode::SUCCESS
}

fn run_report(
    config_path: Option<&PathBuf>,
    data: Option<&Path>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let config = match resolve_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let transactions = match load_transactions(&config, data) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let adapter = match config.get_setting("report", "template_path") {
        Some(path) => {
            log::info!("Using report template {}", path);
            match TypstReportAdapter::from_template_file(&path) {
                Ok(a) => a,
                Err(e) => return fail(e),
            }
        }
        None => TypstReportAdapter::new(),
    };

    let output = output_path
        .cloned()
        .or_else(|| config.get_setting("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    let views = DashboardViews::compute(&transactions);
    match adapter.write(&views, &dashboard_title(&config), &output.to_string_lossy()) {
        Ok(()) => {
            log::info!("Report written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Product-table options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub page: usize,
    pub page_size: Option<usize>,
}

pub fn build_product_query(
    filters: ProductFilters,
    config: &dyn ConfigPort,
) -> Result<ProductQuery, DashboardError> {
    let page_size = match filters.page_size {
        Some(size) => size,
        None => page_size(config)?,
    };
    Ok(ProductQuery {
        search: filters.search,
        category: filters.category,
        sub_category: filters.sub_category,
        page: filters.page,
        page_size,
    })
}

pub fn render_product_page(page: &ProductPage) -> String {
    let mut out = String::from("Product ID\tProduct Name\tCategory\tSub-Category\n");
    for row in &page.rows {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            label(&row.product_id),
            label(&row.product_name),
            label(&row.category),
            label(&row.sub_category)
        );
    }
    out
}

fn run_products(
    config_path: Option<&PathBuf>,
    data: Option<&Path>,
    filters: ProductFilters,
) -> ExitCode {
    let config = match resolve_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let query = match build_product_query(filters, &config) {
        Ok(q) => q,
        Err(e) => return fail(e),
    };

    let transactions = match load_transactions(&config, data) {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let page = match query_products(&transactions, &query) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    print!("{}", render_product_page(&page));
    log::info!(
        "Page {} of {} ({} matching rows)",
        page.page,
        page.total_pages,
        page.total_rows
    );
    ExitCode::SUCCESS
}

fn run_validate(data: &Path, encoding: Option<&str>, date_format: Option<&str>) -> ExitCode {
    let encoding = match encoding.map(str::parse::<TextEncoding>) {
        None => TextEncoding::Latin1,
        Some(Ok(e)) => e,
        Some(Err(reason)) => {
            return fail(DashboardError::ConfigInvalid {
                section: "cli".into(),
                key: "encoding".into(),
                reason,
            });
        }
    };

    let adapter = CsvAdapter::new(data.to_path_buf())
        .with_encoding(encoding)
        .with_date_format(date_format.unwrap_or(DEFAULT_DATE_FORMAT));

    log::info!("Validating {}", adapter.describe());
    let transactions = match adapter.load_transactions() {
        Ok(t) => t,
        Err(e) => return fail(e),
    };

    let customers: BTreeSet<&Option<String>> =
        transactions.iter().map(|t| &t.customer_name).collect();

    println!("rows: {}", transactions.len());
    println!("customers: {}", customers.len());
    match date_range(&transactions) {
        Some((first, last)) => println!("order dates: {} to {}", first, last),
        None => log::warn!("{} contains no transactions", adapter.describe()),
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf, data: Option<&Path>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let listen = config
            .get_setting("web", "listen")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(e) => {
                return fail(DashboardError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("{e}"),
                });
            }
        };

        let page_size = match page_size(&config) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };

        let transactions = match load_transactions(&config, data) {
            Ok(t) => t,
            Err(e) => return fail(e),
        };

        let state = AppState::new(transactions, dashboard_title(&config), page_size);
        let router = build_router(state);

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => return fail(DashboardError::Io(e)),
        };

        log::info!("Starting web server on http://{}/returnoninvestment", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(DashboardError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, data);
        log::error!("web feature is required for serve");
        ExitCode::from(1)
    }
}
