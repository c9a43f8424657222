mod bootstrap;
mod presenter;

use anyhow::Result;
use bikeshare_core::settings::{OutputFormat, Settings};
use bikeshare_data::{compute_statistics_with, fetch_raw_page, load_and_filter, TimeFilter};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    tracing::info!("bikeshare v{} starting", env!("CARGO_PKG_VERSION"));

    let query = settings.query()?;
    let filter = TimeFilter::new(query.month, query.weekday)?;
    bootstrap::check_data_dir(&settings.data_dir)?;
    let registry = settings.registry();

    let text = settings.format == OutputFormat::Text;
    if text {
        println!("{}", presenter::render_query(query.city, query.month, query.weekday));
    }

    let view = load_and_filter(&registry, query.city, &filter)?;
    tracing::info!("{}: {} trips after filtering", query.city, view.row_count());

    if text {
        println!("{}", presenter::render_view_summary(view.row_count(), view.date_range()));
    }

    if view.is_empty() {
        if !text {
            eprintln!("{}", presenter::render_view_summary(0, None));
        }
        return Ok(());
    }

    let report = compute_statistics_with(&view, settings.rounding)?;
    match settings.format {
        OutputFormat::Text => print!("{}", presenter::render_text(&report)?),
        OutputFormat::Json => println!("{}", presenter::render_json(&report)?),
    }

    let page_size = settings.page_size;
    for page in 0..settings.raw_pages as u64 {
        let rows = fetch_raw_page(&registry, query.city, page * page_size, page_size)?;
        print!("\n{}", presenter::render_raw_page(&rows));
        if rows.is_empty() {
            break;
        }
    }

    Ok(())
}
