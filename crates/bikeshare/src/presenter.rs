//! Human-readable and JSON rendering of reports and raw pages.

use std::fmt::{self, Write};

use bikeshare_core::cities::City;
use bikeshare_core::formatting::{format_count, format_minutes, format_number};
use bikeshare_core::models::DateRange;
use bikeshare_core::time_utils::{month_name, weekday_name};
use bikeshare_data::report::{GroupMean, Report, Statistic, ValueCount};
use bikeshare_data::RawRow;
use tabled::builder::Builder;
use tabled::settings::Style;

const RULE_WIDTH: usize = 79;

// ── Header ────────────────────────────────────────────────────────────────────

/// The "loading" banner printed before the data is read.
pub fn render_query(city: City, month: Option<u32>, weekday: Option<u32>) -> String {
    let month = month.and_then(month_name).unwrap_or("All");
    let day = weekday.and_then(weekday_name).unwrap_or("All");
    format!("Loading the {city} bikeshare data filtered for month: {month}, day: {day}.")
}

/// One-line summary of a filtered view.
pub fn render_view_summary(row_count: usize, date_range: Option<DateRange>) -> String {
    match date_range {
        Some(range) => format!(
            "The bikeshare system recorded {} trips between {} & {}.",
            format_count(row_count as i64),
            range.start,
            range.end
        ),
        None => "The filtered dataset is empty. Choose different filters and try again.".to_string(),
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Render every statistic group as text, one ruled section per group.
pub fn render_text(report: &Report) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let timings = &report.metadata.timings;

    write_users(&mut out, report)?;
    write_elapsed(&mut out, timings.user_seconds)?;

    write_time(&mut out, report)?;
    write_elapsed(&mut out, timings.time_seconds)?;

    write_stations(&mut out, report)?;
    write_elapsed(&mut out, timings.station_seconds)?;

    write_durations(&mut out, report)?;
    write_elapsed(&mut out, timings.duration_seconds)?;

    Ok(out)
}

/// Pretty-printed JSON of the whole report.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn write_users(out: &mut String, report: &Report) -> fmt::Result {
    let users = &report.users;
    writeln!(out, "\nUser statistics\n")?;

    writeln!(out, "User type counts:")?;
    write_counts(out, &users.user_types, 11)?;

    writeln!(out, "\nGender counts:")?;
    match &users.genders {
        Statistic::Available(genders) => write_counts(out, genders, 8)?,
        Statistic::Unavailable => writeln!(out, "Data on users' gender is not available.")?,
    }

    writeln!(out, "\nBirth year statistics:")?;
    match &users.birth_years {
        Statistic::Available(Some(range)) => {
            writeln!(
                out,
                "Youngest user : {} - {} years old",
                range.youngest.birth_year, range.youngest.age
            )?;
            writeln!(
                out,
                "Oldest user   : {} - {} years old",
                range.oldest.birth_year, range.oldest.age
            )?;
        }
        Statistic::Available(None) => writeln!(out, "No birth years recorded for these trips.")?,
        Statistic::Unavailable => writeln!(out, "Data on users' birth year is not available.")?,
    }
    Ok(())
}

fn write_time(out: &mut String, report: &Report) -> fmt::Result {
    let t = &report.time;
    writeln!(out, "\nPopular times of travel\n")?;
    writeln!(
        out,
        "Popular month     : {:10} Number of trips: {}",
        month_name(t.popular_month.value).unwrap_or("?"),
        format_count(t.popular_month.count as i64)
    )?;
    writeln!(
        out,
        "Popular weekday   : {:10} Number of trips: {}",
        weekday_name(t.popular_weekday.value).unwrap_or("?"),
        format_count(t.popular_weekday.count as i64)
    )?;
    writeln!(
        out,
        "Popular hour      : {:10} Number of trips: {}",
        t.popular_hour.value,
        format_count(t.popular_hour.count as i64)
    )?;
    writeln!(
        out,
        "Least busy hour   : {:10} Number of trips: {}",
        t.least_popular_hour.value,
        format_count(t.least_popular_hour.count as i64)
    )
}

fn write_stations(out: &mut String, report: &Report) -> fmt::Result {
    let s = &report.stations;
    writeln!(out, "\nStations and routes\n")?;
    for (label, vc) in [
        ("Popular start station", &s.popular_start),
        ("Least popular start station", &s.least_popular_start),
        ("Popular end station", &s.popular_end),
        ("Least popular end station", &s.least_popular_end),
    ] {
        writeln!(
            out,
            "{label}: {}    Number of trips: {}",
            vc.value,
            format_count(vc.count as i64)
        )?;
    }
    writeln!(
        out,
        "Most frequent route:\n  {} to {}    Number of trips: {}",
        s.popular_route.start_station,
        s.popular_route.end_station,
        format_count(s.popular_route.count as i64)
    )
}

fn write_durations(out: &mut String, report: &Report) -> fmt::Result {
    let d = &report.durations;
    writeln!(out, "\nTrip durations\n")?;
    writeln!(out, "Minimum travel time: {}", format_minutes(d.min_minutes))?;
    writeln!(out, "Average travel time: {}", format_minutes(d.mean_minutes))?;
    writeln!(out, "Maximum travel time: {}", format_minutes(d.max_minutes))?;
    writeln!(out, "Total travel time: {}", format_minutes(d.total_minutes))?;

    writeln!(out, "\nStart stations with the highest average trip duration:")?;
    write_means(out, &d.longest_mean_stations, 0)?;

    writeln!(out, "\nAverage trip duration by user type:")?;
    write_means(out, &d.mean_by_user_type, 10)?;

    match &d.mean_by_gender {
        Statistic::Available(means) => {
            writeln!(out, "\nAverage trip duration by gender:")?;
            write_means(out, means, 8)?;
        }
        Statistic::Unavailable => {
            writeln!(out, "\nData on users' gender is not available.")?;
        }
    }

    match &d.age_correlation {
        Statistic::Available(Some(r)) => writeln!(
            out,
            "\nCorrelation between trip duration and age: {}",
            format_number(*r, 4)
        ),
        Statistic::Available(None) => writeln!(
            out,
            "\nCorrelation between trip duration and age: undefined for these trips"
        ),
        Statistic::Unavailable => writeln!(out, "\nData on users' age is not available."),
    }
}

fn write_counts(out: &mut String, counts: &[ValueCount<String>], width: usize) -> fmt::Result {
    for vc in counts {
        writeln!(out, "{:width$}: {}", vc.value, format_count(vc.count as i64))?;
    }
    Ok(())
}

fn write_means(out: &mut String, means: &[GroupMean], width: usize) -> fmt::Result {
    for m in means {
        writeln!(out, "{:width$}: {}", m.key, format_minutes(m.mean_minutes))?;
    }
    Ok(())
}

fn write_elapsed(out: &mut String, seconds: f64) -> fmt::Result {
    writeln!(out, "\nThis took {} seconds.", format_number(seconds, 4))?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

// ── Raw pages ─────────────────────────────────────────────────────────────────

/// Render source rows as a psql-style table with a header line.
pub fn render_raw_page(rows: &[RawRow]) -> String {
    let Some(first) = rows.first() else {
        return "No more rows.\n".to_string();
    };

    let mut builder = Builder::default();
    builder.push_record(first.fields.iter().map(|(header, _)| header.clone()));
    for row in rows {
        builder.push_record(row.fields.iter().map(|(_, value)| value.clone()));
    }

    let mut table = builder.build();
    table.with(Style::psql());

    let mut out = table.to_string();
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
