mod common;

use chrono::NaiveDate;
use common::{date, days_before, insert_dream, insert_user};
use dreamlog_core::db::open_db_in_memory;
use dreamlog_core::{
    BreakdownEntry, CategoryFrequency, CategoryKind, DateRange, DreamRecord, DreamRecordStore,
    DreamStatsService, FixedClock, InMemoryDreamStore, LuciditySum, RangeError, RepoError,
    RepoResult, SqliteDreamStore, StatsConfig, StatsError, User, UserId,
};

// Wednesday
const TODAY: &str = "2024-05-15";

fn journal() -> (InMemoryDreamStore, UserId) {
    let mut store = InMemoryDreamStore::new();
    let user = store
        .insert_user(User::new("Ada", "ada@example.com"))
        .unwrap();
    (store, user)
}

fn service(store: &InMemoryDreamStore) -> DreamStatsService<&InMemoryDreamStore, FixedClock> {
    DreamStatsService::with_clock(store, FixedClock(date(TODAY)), StatsConfig::default())
}

fn add(store: &mut InMemoryDreamStore, user: UserId, day: NaiveDate, lucidity: i64) {
    store
        .insert_dream(DreamRecord::new(user, day, lucidity))
        .unwrap();
}

#[test]
fn current_streak_counts_back_from_today() {
    let today = date(TODAY);
    for n in 1..=4_u64 {
        let (mut store, user) = journal();
        for offset in 0..n {
            add(&mut store, user, days_before(today, offset), 1);
        }
        add(&mut store, user, days_before(today, n + 1), 1);

        assert_eq!(service(&store).current_streak(user).unwrap(), n);
    }
}

#[test]
fn current_streak_is_zero_without_dream_today() {
    let (mut store, user) = journal();
    let today = date(TODAY);
    add(&mut store, user, days_before(today, 1), 1);
    add(&mut store, user, days_before(today, 2), 1);

    assert_eq!(service(&store).current_streak(user).unwrap(), 0);
}

#[test]
fn longest_streak_finds_largest_run() {
    let (mut store, user) = journal();
    for day in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-06", "2024-01-07"] {
        add(&mut store, user, date(day), 1);
    }
    assert_eq!(service(&store).longest_streak(user).unwrap(), 3);
}

#[test]
fn longest_streak_counts_same_day_dreams_once() {
    let (mut store, user) = journal();
    for day in ["2024-01-01", "2024-01-02", "2024-01-02", "2024-01-03"] {
        add(&mut store, user, date(day), 1);
    }
    assert_eq!(service(&store).longest_streak(user).unwrap(), 3);
}

#[test]
fn empty_journal_yields_defined_values() {
    let (store, user) = journal();
    let stats = service(&store);

    assert_eq!(stats.longest_streak(user).unwrap(), 0);
    assert_eq!(stats.current_streak(user).unwrap(), 0);
    assert_eq!(stats.total_dreams(user).unwrap(), 0);
    assert_eq!(stats.average_lucidity(user).unwrap(), None);
    let other = vec![BreakdownEntry {
        name: "other".to_string(),
        frequency: 0,
        percent: 0.0,
    }];
    assert_eq!(stats.top_tags(user).unwrap(), other);
    assert_eq!(stats.top_emotions(user).unwrap(), other);
}

#[test]
fn average_lucidity_rounds_mean() {
    let (mut store, user) = journal();
    for (offset, lucidity) in [1, 2, 3, 4].into_iter().enumerate() {
        add(
            &mut store,
            user,
            days_before(date(TODAY), offset as u64),
            lucidity,
        );
    }
    assert_eq!(service(&store).average_lucidity(user).unwrap(), Some(2.5));
}

#[test]
fn week_count_includes_both_boundaries_only() {
    let (mut store, user) = journal();
    // week of 2024-05-15 runs Sunday 05-12 through Saturday 05-18
    for day in ["2024-05-11", "2024-05-12", "2024-05-15", "2024-05-18", "2024-05-19"] {
        add(&mut store, user, date(day), 1);
    }
    assert_eq!(service(&store).dreams_this_week(user).unwrap(), 3);
}

#[test]
fn month_count_includes_both_boundaries_only() {
    let (mut store, user) = journal();
    for day in ["2024-04-30", "2024-05-01", "2024-05-20", "2024-05-31", "2024-06-01"] {
        add(&mut store, user, date(day), 1);
    }
    let stats = service(&store);
    assert_eq!(stats.dreams_this_month(user).unwrap(), 3);
    assert_eq!(stats.total_dreams(user).unwrap(), 5);
}

#[test]
fn configured_week_start_shifts_window() {
    let (mut store, user) = journal();
    for day in ["2024-05-12", "2024-05-13", "2024-05-19"] {
        add(&mut store, user, date(day), 1);
    }
    let config = StatsConfig::from_json_str(r#"{"week_start": "Mon"}"#).unwrap();
    let stats = DreamStatsService::with_clock(&store, FixedClock(date(TODAY)), config);
    // Monday 05-13 through Sunday 05-19
    assert_eq!(stats.dreams_this_week(user).unwrap(), 2);
}

#[test]
fn tag_breakdown_ranks_and_synthesizes_other() {
    let (mut store, user) = journal();
    let tag_sets: [&[&str]; 4] = [
        &["ocean", "falling", "school"],
        &["ocean", "teeth", "forest"],
        &["ocean", "falling", "city"],
        &["falling", "school"],
    ];
    for (offset, tags) in tag_sets.into_iter().enumerate() {
        store
            .insert_dream(
                DreamRecord::new(user, days_before(date(TODAY), offset as u64), 1)
                    .with_tags(tags.iter().copied()),
            )
            .unwrap();
    }

    let breakdown = service(&store).top_tags(user).unwrap();
    let names: Vec<&str> = breakdown.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["falling", "ocean", "school", "city", "forest", "other"]
    );
    assert_eq!(breakdown[0].frequency, 3);
    assert_eq!(breakdown[0].percent, 27.27);
    assert_eq!(breakdown[5].frequency, 1);

    let total: f64 = breakdown.iter().map(|entry| entry.percent).sum();
    assert!((total - 100.0).abs() <= 0.02, "percent sum was {total}");
}

#[test]
fn emotion_breakdown_with_full_capture_has_exact_zero_other() {
    let (mut store, user) = journal();
    store
        .insert_dream(
            DreamRecord::new(user, date(TODAY), 1).with_emotions(["joy", "fear", "awe"]),
        )
        .unwrap();

    let breakdown = service(&store).top_emotions(user).unwrap();
    let other = breakdown.last().unwrap();
    assert_eq!(other.name, "other");
    assert_eq!(other.frequency, 0);
    assert_eq!(other.percent, 0.0);
    assert!(other.percent.is_sign_positive());
    assert_eq!(breakdown[0].name, "awe");
    assert_eq!(breakdown[0].percent, 33.33);
}

#[test]
fn statistics_are_idempotent() {
    let (mut store, user) = journal();
    store
        .insert_dream(DreamRecord::new(user, date(TODAY), 3).with_tags(["sky"]))
        .unwrap();
    add(&mut store, user, days_before(date(TODAY), 1), 2);

    let stats = service(&store);
    assert_eq!(
        stats.user_stats(user).unwrap(),
        stats.user_stats(user).unwrap()
    );
}

#[test]
fn count_between_rejects_out_of_order_bounds() {
    let (store, user) = journal();
    let err = service(&store)
        .count_dreams_between(user, date("2024-05-02"), date("2024-05-01"))
        .unwrap_err();
    assert!(matches!(
        err,
        StatsError::InvalidRange(RangeError::Unordered { .. })
    ));
}

#[test]
fn user_stats_requires_known_user() {
    let (store, _) = journal();
    let err = service(&store).user_stats(uuid::Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, StatsError::UserNotFound(_)));
}

#[test]
fn user_stats_over_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let user = insert_user(&conn, "ada");
    insert_dream(&conn, user, "2024-05-15", 4, &["ocean"], &["joy"]);
    insert_dream(&conn, user, "2024-05-14", 2, &["ocean", "city"], &["joy"]);
    insert_dream(&conn, user, "2024-05-14", 0, &[], &["fear"]);
    insert_dream(&conn, user, "2024-04-20", 0, &[], &[]);

    let store = SqliteDreamStore::try_new(&conn).unwrap();
    let stats =
        DreamStatsService::with_clock(store, FixedClock(date(TODAY)), StatsConfig::default())
            .user_stats(user)
            .unwrap();

    assert_eq!(stats.as_of, date(TODAY));
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.longest_streak, 2);
    assert_eq!(stats.dreams_this_week, 3);
    assert_eq!(stats.dreams_this_month, 3);
    assert_eq!(stats.total_dreams, 4);
    assert_eq!(stats.average_lucidity, Some(1.5));
    assert_eq!(stats.top_tags[0].name, "ocean");
    assert_eq!(stats.top_tags[0].percent, 66.67);
    assert_eq!(stats.top_emotions[0].frequency, 2);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["as_of"], "2024-05-15");
    assert_eq!(json["top_emotions"][2]["name"], "other");
}

struct OfflineStore;

fn offline<T>() -> RepoResult<T> {
    Err(RepoError::InvalidData("store offline".to_string()))
}

impl DreamRecordStore for OfflineStore {
    fn list_dream_dates(&self, _: UserId) -> RepoResult<Vec<NaiveDate>> {
        offline()
    }

    fn count_dreams_in_range(&self, _: UserId, _: &DateRange) -> RepoResult<u64> {
        offline()
    }

    fn total_dream_count(&self, _: UserId) -> RepoResult<u64> {
        offline()
    }

    fn sum_and_count_lucidity(&self, _: UserId) -> RepoResult<LuciditySum> {
        offline()
    }

    fn category_frequencies(
        &self,
        _: UserId,
        _: CategoryKind,
    ) -> RepoResult<Vec<CategoryFrequency>> {
        offline()
    }

    fn total_category_occurrences(&self, _: UserId, _: CategoryKind) -> RepoResult<u64> {
        offline()
    }

    fn exists_dream_on_date(&self, _: UserId, _: NaiveDate) -> RepoResult<bool> {
        offline()
    }

    fn get_user(&self, _: UserId) -> RepoResult<Option<User>> {
        offline()
    }

    fn list_dreams(&self, _: UserId) -> RepoResult<Vec<DreamRecord>> {
        offline()
    }
}

#[test]
fn store_failures_propagate_unmodified() {
    let stats = DreamStatsService::with_clock(
        OfflineStore,
        FixedClock(date(TODAY)),
        StatsConfig::default(),
    );
    let user = uuid::Uuid::new_v4();

    for err in [
        stats.current_streak(user).unwrap_err(),
        stats.longest_streak(user).unwrap_err(),
        stats.dreams_this_week(user).unwrap_err(),
        stats.average_lucidity(user).unwrap_err(),
        stats.top_tags(user).unwrap_err(),
    ] {
        match err {
            StatsError::StoreUnavailable(RepoError::InvalidData(message)) => {
                assert_eq!(message, "store offline")
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
