//! The four descriptive statistic groups over a filtered view.

use std::hash::Hash;
use std::time::Instant;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::{seconds_to_minutes, MinuteRounding};
use chrono::Utc;
use tracing::debug;

use crate::aggregator::{mean, pearson, FrequencyTable, GroupMeans};
use crate::filter::TripView;
use crate::report::{
    BirthYearAge, BirthYearRange, DurationStats, GroupMean, GroupTimings, Report, ReportMetadata,
    RouteCount, StationStats, Statistic, TimeStats, UserStats, ValueCount,
};

/// Number of start stations listed by highest mean duration.
pub const TOP_MEAN_STATIONS: usize = 3;

/// Compute every statistic group with the default minute rounding.
pub fn compute_statistics(view: &TripView) -> Result<Report> {
    compute_statistics_with(view, MinuteRounding::default())
}

/// Compute every statistic group over `view`.
///
/// Fails with [`BikeshareError::EmptyView`] on a zero-row view. Demographic
/// sub-statistics are `Unavailable` when the view's schema has none.
pub fn compute_statistics_with(view: &TripView, rounding: MinuteRounding) -> Result<Report> {
    if view.is_empty() {
        return Err(BikeshareError::EmptyView);
    }

    // ── Step 1: Users ─────────────────────────────────────────────────────────
    let started = Instant::now();
    let users = user_stats(view);
    let user_seconds = started.elapsed().as_secs_f64();

    // ── Step 2: Time of travel ────────────────────────────────────────────────
    let started = Instant::now();
    let time = time_stats(view)?;
    let time_seconds = started.elapsed().as_secs_f64();

    // ── Step 3: Stations ──────────────────────────────────────────────────────
    let started = Instant::now();
    let stations = station_stats(view)?;
    let station_seconds = started.elapsed().as_secs_f64();

    // ── Step 4: Durations ─────────────────────────────────────────────────────
    let started = Instant::now();
    let durations = duration_stats(view, rounding)?;
    let duration_seconds = started.elapsed().as_secs_f64();

    let timings = GroupTimings {
        user_seconds,
        time_seconds,
        station_seconds,
        duration_seconds,
    };
    debug!("Statistics over {} rows computed: {:?}", view.row_count(), timings);

    Ok(Report {
        metadata: ReportMetadata {
            city: view.city(),
            row_count: view.row_count(),
            date_range: view.date_range(),
            generated_at: Utc::now().to_rfc3339(),
            rounding,
            timings,
        },
        users,
        time,
        stations,
        durations,
    })
}

// ── Groups ────────────────────────────────────────────────────────────────────

fn user_stats(view: &TripView) -> UserStats {
    let user_types: FrequencyTable<&str> = view.iter().filter_map(|r| r.user_type.as_deref()).collect();
    let demographics = view.has_demographics();

    let genders = Statistic::when(demographics, || {
        let table: FrequencyTable<&str> = view.iter().filter_map(|r| r.gender()).collect();
        owned_counts(&table)
    });

    let birth_years = Statistic::when(demographics, || birth_year_range(view));

    UserStats {
        user_types: owned_counts(&user_types),
        genders,
        birth_years,
    }
}

fn birth_year_range(view: &TripView) -> Option<BirthYearRange> {
    let years: Vec<i32> = view.iter().filter_map(|r| r.birth_year()).collect();
    let ages: Vec<i32> = view.iter().filter_map(|r| r.age()).collect();

    Some(BirthYearRange {
        youngest: BirthYearAge {
            birth_year: *years.iter().max()?,
            age: *ages.iter().min()?,
        },
        oldest: BirthYearAge {
            birth_year: *years.iter().min()?,
            age: *ages.iter().max()?,
        },
    })
}

fn time_stats(view: &TripView) -> Result<TimeStats> {
    let months: FrequencyTable<u32> = view.iter().map(|r| r.month).collect();
    let weekdays: FrequencyTable<u32> = view.iter().map(|r| r.day_of_week).collect();
    let hours: FrequencyTable<&str> = view.iter().map(|r| r.hour_of_day.as_str()).collect();

    Ok(TimeStats {
        popular_month: most(&months)?,
        popular_weekday: most(&weekdays)?,
        popular_hour: owned(most(&hours)?),
        least_popular_hour: owned(fewest(&hours)?),
    })
}

fn station_stats(view: &TripView) -> Result<StationStats> {
    let starts: FrequencyTable<&str> = view.iter().map(|r| r.start_station.as_str()).collect();
    let ends: FrequencyTable<&str> = view.iter().map(|r| r.end_station.as_str()).collect();
    let pairs: FrequencyTable<&str> = view.iter().map(|r| r.station_pair.as_str()).collect();

    // Station names may themselves contain the pair separator, so the route is
    // split by looking up a row that carries it.
    let route = most(&pairs)?;
    let exemplar = view
        .iter()
        .find(|r| r.station_pair == route.value)
        .ok_or(BikeshareError::EmptyView)?;

    Ok(StationStats {
        popular_start: owned(most(&starts)?),
        least_popular_start: owned(fewest(&starts)?),
        popular_end: owned(most(&ends)?),
        least_popular_end: owned(fewest(&ends)?),
        popular_route: RouteCount {
            start_station: exemplar.start_station.clone(),
            end_station: exemplar.end_station.clone(),
            count: route.count,
        },
    })
}

fn duration_stats(view: &TripView, rounding: MinuteRounding) -> Result<DurationStats> {
    let seconds: Vec<f64> = view.iter().map(|r| r.trip_duration_seconds).collect();

    let total_seconds: f64 = seconds.iter().sum();
    let mean_seconds = mean(&seconds).ok_or(BikeshareError::EmptyView)?;
    let min_seconds = seconds.iter().copied().fold(f64::INFINITY, f64::min);
    let max_seconds = seconds.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut by_station = GroupMeans::new();
    let mut by_user_type = GroupMeans::new();
    for r in view.iter() {
        by_station.add(r.start_station.as_str(), r.trip_duration_seconds);
        if let Some(user_type) = r.user_type.as_deref() {
            by_user_type.add(user_type, r.trip_duration_seconds);
        }
    }

    let demographics = view.has_demographics();

    let mean_by_gender = Statistic::when(demographics, || {
        let mut by_gender = GroupMeans::new();
        for r in view.iter() {
            if let Some(gender) = r.gender() {
                by_gender.add(gender, r.trip_duration_seconds);
            }
        }
        group_means(by_gender.sorted_desc(), rounding)
    });

    let age_correlation = Statistic::when(demographics, || {
        let (durations, ages): (Vec<f64>, Vec<f64>) = view
            .iter()
            .filter_map(|r| r.age().map(|age| (r.trip_duration_seconds, f64::from(age))))
            .unzip();
        pearson(&durations, &ages)
    });

    Ok(DurationStats {
        min_minutes: seconds_to_minutes(min_seconds, rounding),
        mean_minutes: seconds_to_minutes(mean_seconds, rounding),
        max_minutes: seconds_to_minutes(max_seconds, rounding),
        total_minutes: seconds_to_minutes(total_seconds, rounding),
        total_seconds,
        mean_seconds,
        longest_mean_stations: group_means(by_station.top(TOP_MEAN_STATIONS), rounding),
        mean_by_user_type: group_means(by_user_type.sorted_desc(), rounding),
        mean_by_gender,
        age_correlation,
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn most<K: Eq + Hash + Clone>(table: &FrequencyTable<K>) -> Result<ValueCount<K>> {
    table
        .mode()
        .map(|(k, count)| ValueCount {
            value: k.clone(),
            count,
        })
        .ok_or(BikeshareError::EmptyView)
}

fn fewest<K: Eq + Hash + Clone>(table: &FrequencyTable<K>) -> Result<ValueCount<K>> {
    table
        .least()
        .map(|(k, count)| ValueCount {
            value: k.clone(),
            count,
        })
        .ok_or(BikeshareError::EmptyView)
}

fn owned(vc: ValueCount<&str>) -> ValueCount<String> {
    ValueCount {
        value: vc.value.to_string(),
        count: vc.count,
    }
}

fn owned_counts(table: &FrequencyTable<&str>) -> Vec<ValueCount<String>> {
    table
        .sorted_desc()
        .into_iter()
        .map(|(k, count)| (k.to_string(), count).into())
        .collect()
}

fn group_means(means: Vec<(&str, f64)>, rounding: MinuteRounding) -> Vec<GroupMean> {
    means
        .into_iter()
        .map(|(key, mean_seconds)| GroupMean {
            key: key.to_string(),
            mean_seconds,
            mean_minutes: seconds_to_minutes(mean_seconds, rounding),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
