// Criterion benchmarks for the matrimonial match engine

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matrimonial_match::core::{build_status_map, height_to_cm, MatchInputs, Matcher};
use matrimonial_match::models::{
    BlockedProfile, ExtendedFilters, Gender, Interest, InterestStatus, PartnerPreferences, Profile,
    ProfileStatus, RangeFilter, RelationLogs, SortStrategy,
};

const RELIGIONS: [&str; 4] = ["Hindu", "Muslim", "Jain", "Christian"];
const HEIGHTS: [&str; 4] = ["5'4\"", "168 cm", "5.7", "5 ft 2 in"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn create_candidate(id: usize) -> Profile {
    Profile {
        profile_id: format!("p{}", id),
        first_name: format!("User {}", id),
        age: Some(21 + (id % 20) as u8),
        gender: Some(if id % 2 == 0 { Gender::Female } else { Gender::Male }),
        religion: Some(RELIGIONS[id % RELIGIONS.len()].to_string()),
        mother_tongue: Some("Marathi".to_string()),
        height: Some(HEIGHTS[id % HEIGHTS.len()].to_string()),
        salary: Some(format!("{} LPA", id % 40)),
        status: if id % 3 == 0 {
            ProfileStatus::Pending
        } else {
            ProfileStatus::Verified
        },
        created_at: Some(now() - Duration::minutes((id % 500) as i64)),
        ..Default::default()
    }
}

fn create_population(count: usize) -> Vec<Profile> {
    let mut profiles = vec![Profile {
        profile_id: "viewer".to_string(),
        gender: Some(Gender::Male),
        status: ProfileStatus::Verified,
        partner_preferences: Some(PartnerPreferences {
            min_age: Some(23),
            max_age: Some(35),
            religions: vec!["Hindu".to_string(), "Jain".to_string()],
            ..Default::default()
        }),
        ..Default::default()
    }];
    profiles.extend((0..count).map(create_candidate));
    profiles
}

fn create_relations(count: usize) -> RelationLogs {
    RelationLogs {
        interests: (0..count / 10)
            .map(|i| Interest {
                from_profile_id: Some("viewer".to_string()),
                to_profile_id: Some(format!("p{}", i * 10)),
                status: InterestStatus::Pending,
                created_at: None,
            })
            .collect(),
        blocks: (0..count / 50)
            .map(|i| BlockedProfile {
                blocker_profile_id: Some(format!("p{}", i * 50)),
                blocked_profile_id: Some("viewer".to_string()),
                is_unblocked: false,
            })
            .collect(),
        ..Default::default()
    }
}

fn bench_height_parsing(c: &mut Criterion) {
    c.bench_function("height_to_cm", |b| {
        b.iter(|| {
            for raw in HEIGHTS {
                black_box(height_to_cm(black_box(Some(raw))));
            }
        });
    });
}

fn bench_relation_index(c: &mut Criterion) {
    let profiles = create_population(10_000);
    let relations = create_relations(10_000);

    c.bench_function("relation_index_10000", |b| {
        b.iter(|| build_status_map(black_box("viewer"), black_box(&relations), black_box(&profiles)));
    });
}

fn bench_compute(c: &mut Criterion) {
    let matcher = Matcher::default();
    let filters = ExtendedFilters {
        age_range: RangeFilter::new(25, 30),
        ..Default::default()
    };

    let mut group = c.benchmark_group("compute");

    for candidate_count in [100, 1_000, 10_000].iter() {
        let profiles = create_population(*candidate_count);
        let relations = create_relations(*candidate_count);

        for sort in [SortStrategy::Newest, SortStrategy::Compatibility] {
            let inputs = MatchInputs {
                viewer: &profiles[0],
                profiles: &profiles,
                relations: &relations,
                filters: &filters,
                use_preferences: true,
                search: "",
                sort,
                now: now(),
            };

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", sort), candidate_count),
                candidate_count,
                |b, _| {
                    b.iter(|| matcher.compute(black_box(&inputs), 1));
                },
            );
        }
    }

    group.finish();
}

fn bench_empty_result_diagnostics(c: &mut Criterion) {
    let matcher = Matcher::default();
    let profiles = create_population(10_000);
    let relations = RelationLogs::default();
    let filters = ExtendedFilters {
        religions: vec!["Parsi".to_string()],
        age_range: RangeFilter::new(22, 23),
        ..Default::default()
    };
    let inputs = MatchInputs {
        viewer: &profiles[0],
        profiles: &profiles,
        relations: &relations,
        filters: &filters,
        use_preferences: true,
        search: "",
        sort: SortStrategy::Newest,
        now: now(),
    };

    c.bench_function("diagnostics_10000", |b| {
        b.iter(|| matcher.compute(black_box(&inputs), 1));
    });
}

criterion_group!(
    benches,
    bench_height_parsing,
    bench_relation_index,
    bench_compute,
    bench_empty_result_diagnostics
);

criterion_main!(benches);
