//! End-to-end runs over on-disk city files.

use bikeshare_core::cities::{City, CityRegistry};
use bikeshare_core::error::BikeshareError;
use bikeshare_core::formatting::MinuteRounding;
use bikeshare_data::{
    compute_statistics, compute_statistics_with, fetch_raw_page, load_and_filter, Statistic,
    TimeFilter,
};
use tempfile::TempDir;

const NEW_YORK: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
5688089,2017-06-11 14:55:05,2017-06-11 15:08:21,795,Suffolk St & Stanton St,W Broadway & Spring St,Subscriber,Male,1998.0
4096714,2017-05-11 15:30:11,2017-05-11 15:41:43,692,Lexington Ave & E 63 St,1 Ave & E 78 St,Subscriber,Male,1981.0
2173887,2017-03-29 13:26:26,2017-03-29 13:48:31,1325,E 27 St & 1 Ave,Broadway & W 32 St,Subscriber,Male,1987.0
3945638,2017-05-08 19:47:18,2017-05-08 19:59:01,703,Suffolk St & Stanton St,W Broadway & Spring St,Subscriber,Female,1986.0
6208972,2017-06-21 07:49:16,2017-06-21 07:54:46,329,Suffolk St & Stanton St,Cleveland Pl & Spring St,Customer,,
1285652,2017-02-22 18:55:24,2017-02-22 19:12:03,998,Park Pl & Church St,Cliff St & Fulton St,Subscriber,Male,1890.0
";

const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
1621326,2017-06-21 08:36:34,2017-06-21 08:44:43,30,14th & Belmont St NW,15th & K St NW,Subscriber
482740,2017-03-11 10:40:00,2017-03-11 10:46:00,90,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
1330037,2017-04-30 10:58:00,2017-04-30 11:08:00,150,Georgetown Harbor,Jefferson Dr & 14th St SW,Customer
";

fn registry_with(files: &[(&str, &str)]) -> (TempDir, CityRegistry) {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    let registry = CityRegistry::new(dir.path());
    (dir, registry)
}

#[test]
fn test_new_york_full_report() {
    let (_dir, registry) = registry_with(&[("new_york_city.csv", NEW_YORK)]);

    let view = load_and_filter(&registry, City::NewYorkCity, &TimeFilter::NONE).unwrap();
    // The 1890 rider is dropped as an outlier.
    assert_eq!(view.row_count(), 5);

    let report = compute_statistics(&view).unwrap();
    assert_eq!(report.metadata.city, Some(City::NewYorkCity));
    assert_eq!(report.users.user_types[0].value, "Subscriber");
    assert_eq!(report.users.user_types[0].count, 4);

    let genders = report.users.genders.available().unwrap();
    assert_eq!(genders[0].value, "Male");
    assert_eq!(genders[0].count, 3);
    assert!(genders.iter().any(|g| g.value == "Unknown"));

    let range = report.users.birth_years.available().unwrap().unwrap();
    assert_eq!(range.youngest.birth_year, 1998);
    assert_eq!(range.youngest.age, 19);
    assert_eq!(range.oldest.birth_year, 1981);
    assert_eq!(range.oldest.age, 36);

    assert_eq!(report.stations.popular_start.value, "Suffolk St & Stanton St");
    assert_eq!(report.stations.popular_start.count, 3);
    assert_eq!(report.stations.popular_route.start_station, "Suffolk St & Stanton St");
    assert_eq!(report.stations.popular_route.end_station, "W Broadway & Spring St");
    assert_eq!(report.stations.popular_route.count, 2);

    assert_eq!(report.time.popular_month.value, 6);
    assert!(report.durations.age_correlation.is_available());
}

#[test]
fn test_washington_has_no_demographic_statistics() {
    let (_dir, registry) = registry_with(&[("washington.csv", WASHINGTON)]);

    let view = load_and_filter(&registry, City::Washington, &TimeFilter::NONE).unwrap();
    let report = compute_statistics(&view).unwrap();

    assert_eq!(report.users.genders, Statistic::Unavailable);
    assert_eq!(report.users.birth_years, Statistic::Unavailable);
    assert_eq!(report.durations.mean_by_gender, Statistic::Unavailable);
    assert_eq!(report.durations.age_correlation, Statistic::Unavailable);
    assert_eq!(report.durations.total_minutes, 4);

    let away = compute_statistics_with(&view, MinuteRounding::HalfAwayFromZero).unwrap();
    assert_eq!(away.durations.min_minutes, 1);
    assert_eq!(away.durations.max_minutes, 3);
    assert_eq!(away.durations.total_minutes, 5);
}

#[test]
fn test_filter_to_empty_then_statistics_fail() {
    let (_dir, registry) = registry_with(&[("washington.csv", WASHINGTON)]);

    let view =
        load_and_filter(&registry, City::Washington, &TimeFilter::by_month(1).unwrap()).unwrap();

    assert_eq!(view.row_count(), 0);
    assert!(matches!(compute_statistics(&view), Err(BikeshareError::EmptyView)));
}

#[test]
fn test_raw_pages_walk_the_source() {
    let (_dir, registry) = registry_with(&[("new_york_city.csv", NEW_YORK)]);

    let first = fetch_raw_page(&registry, City::NewYorkCity, 0, 5).unwrap();
    let second = fetch_raw_page(&registry, City::NewYorkCity, 5, 5).unwrap();
    let past_end = fetch_raw_page(&registry, City::NewYorkCity, 10, 5).unwrap();

    assert_eq!(first.len(), 5);
    // Raw pages are uncleaned: the outlier row is still there.
    assert_eq!(second.len(), 1);
    assert!(past_end.is_empty());
    assert_eq!(first[0].fields[0].0, "Start Time");
}

#[test]
fn test_malformed_source_fails_the_load() {
    let broken = WASHINGTON.replace("2017-03-11 10:40:00", "11/03/2017 ten o'clock");
    let (_dir, registry) = registry_with(&[("washington.csv", broken.as_str())]);

    let err = load_and_filter(&registry, City::Washington, &TimeFilter::NONE).unwrap_err();

    assert!(err.is_parse_error());
    assert!(matches!(err, BikeshareError::TimestampParse { row: 2, .. }));
}
