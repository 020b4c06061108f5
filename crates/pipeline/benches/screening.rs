//! Benchmarks for the candidate evaluation pipeline
//!
//! Run with: cargo bench --package pipeline
//!
//! Synthetic candidates are generated deterministically so runs are comparable.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pipeline::{FilterPipeline, Scorer, evaluate, rank};
use records::{CandidateMetadata, CandidateRecord, EducationEntry, WorkEntry};
use sources::{QueryCriteria, SalaryRange};

const SKILLS: [&str; 8] = ["Python", "Rust", "Go", "SQL", "Redis", "Kafka", "React", "Docker"];
const CITIES: [&str; 4] = ["Beijing", "Shanghai", "Shenzhen", "Hangzhou"];
const DEGREES: [&str; 4] = ["associate", "bachelor", "master", "doctorate"];

fn synthetic_candidates(count: usize) -> Vec<CandidateRecord> {
    (0..count)
        .map(|i| {
            let metadata = CandidateMetadata {
                name: Some(format!("Candidate {}", i)),
                skills: (0..3).map(|k| SKILLS[(i + k * 3) % SKILLS.len()].to_string()).collect(),
                work_history: vec![WorkEntry {
                    company: format!("Company {}", i % 17),
                    start_date: format!("{}-01", 2005 + i % 12),
                    end_date: "2023-06".to_string(),
                    ..WorkEntry::default()
                }],
                education: vec![EducationEntry {
                    degree: DEGREES[i % DEGREES.len()].to_string(),
                    ..EducationEntry::default()
                }],
                expected_salary: Some(format!("{}K-{}K", 15 + i % 20, 25 + i % 20)),
                preferred_locations: vec![CITIES[i % CITIES.len()].to_string()],
                summary: Some("reliable engineer who enjoys mentoring".to_string()),
                ..CandidateMetadata::default()
            };
            CandidateRecord::new(format!("c{}", i), metadata)
        })
        .collect()
}

fn bench_criteria() -> QueryCriteria {
    QueryCriteria {
        keywords: vec!["mentoring".to_string()],
        required_skills: vec!["Python".to_string()],
        preferred_skills: vec!["Redis".to_string(), "Kafka".to_string()],
        min_experience_years: Some(3),
        required_industries: vec!["company 3".to_string()],
        salary_range: Some(SalaryRange {
            min: Some("20K".to_string()),
            max: Some("35K".to_string()),
        }),
        locations: CITIES[..2].iter().map(|c| c.to_string()).collect(),
        ..QueryCriteria::default()
    }
}

fn bench_filter(c: &mut Criterion) {
    let candidates = synthetic_candidates(1000);
    let criteria = bench_criteria();
    let pipeline = FilterPipeline::eligibility();

    c.bench_function("eligibility_filter_1000", |b| {
        b.iter(|| {
            let eligible = pipeline.apply(black_box(candidates.clone()), &criteria).unwrap();
            black_box(eligible)
        })
    });
}

fn bench_score_and_rank(c: &mut Criterion) {
    let candidates = synthetic_candidates(1000);
    let criteria = bench_criteria();
    let scorer = Scorer::new();

    c.bench_function("score_and_rank_1000", |b| {
        b.iter(|| {
            let scored = scorer.score(black_box(candidates.clone()), &criteria);
            black_box(rank(scored))
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let criteria = bench_criteria();
    let mut group = c.benchmark_group("evaluate");
    for size in [100, 1000, 5000] {
        let candidates = synthetic_candidates(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| black_box(evaluate(candidates.clone(), &criteria).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_score_and_rank, bench_evaluate);
criterion_main!(benches);
