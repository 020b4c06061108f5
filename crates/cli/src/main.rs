use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use records::{parse_metadata, InMemoryRepository, ResumeRepository, RetrievalHit};
use serde_json::json;
use server::{ScoreBreakdownAnalyst, ScreeningOptions, ScreeningOrchestrator};
use sources::{normalize, LexicalSource, QueryCriteria, RawQuery};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// resume-screen - Resume Screening Engine
#[derive(Parser)]
#[command(name = "resume-screen")]
#[command(about = "Screen retrieved resumes against a hiring query", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, score and rank candidates for a hiring query
    Screen {
        /// JSON file with an array of retrieval hits
        #[arg(long, default_value = "data/sample_candidates.json")]
        candidates: PathBuf,

        /// JSON file with the hiring query
        #[arg(long, default_value = "data/sample_query.json")]
        query: PathBuf,

        /// Keep only the best N candidates
        #[arg(long)]
        top: Option<usize>,

        /// Drop candidates whose overall score is below this
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum number of hits to retrieve
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Attach a score breakdown to each candidate
        #[arg(long)]
        explain: bool,

        /// Write the report as JSON to this file
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Write the plain-text report to this file
        #[arg(long)]
        text_out: Option<PathBuf>,
    },

    /// Show how a stored candidate's metadata was normalized
    Inspect {
        /// JSON file with an array of retrieval hits
        #[arg(long, default_value = "data/sample_candidates.json")]
        candidates: PathBuf,

        /// Candidate ID to display
        #[arg(long)]
        id: String,
    },

    /// Run benchmark on synthetic candidates
    Benchmark {
        /// Number of synthetic candidates
        #[arg(long, default_value = "1000")]
        candidates: usize,

        /// Number of screening runs
        #[arg(long, default_value = "20")]
        rounds: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Screen {
            candidates,
            query,
            top,
            min_score,
            limit,
            explain,
            json_out,
            text_out,
        } => {
            let mut options = ScreeningOptions::new()
                .with_limit(limit)
                .with_analysis(explain);
            options.top_n = top;
            options.min_score = min_score;
            handle_screen(&candidates, &query, &options, json_out, text_out).await?
        }
        Commands::Inspect { candidates, id } => handle_inspect(&candidates, &id)?,
        Commands::Benchmark { candidates, rounds } => handle_benchmark(candidates, rounds).await?,
    }

    Ok(())
}

/// Load the resume repository, reporting how long it took
fn load_repository(path: &Path) -> Result<Arc<InMemoryRepository>> {
    println!("Loading candidates from {}...", path.display());
    let start = Instant::now();
    let repository = InMemoryRepository::load_from_file(path)
        .with_context(|| format!("Failed to load candidates from {}", path.display()))?;
    println!(
        "{} Loaded {} candidates in {:?}",
        "✓".green(),
        repository.len(),
        start.elapsed()
    );
    Ok(Arc::new(repository))
}

fn load_criteria(path: &Path) -> Result<QueryCriteria> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query from {}", path.display()))?;
    let criteria = normalize(RawQuery::from_json(&text)?);
    debug!("Normalized criteria: {:?}", criteria);
    Ok(criteria)
}

/// Handle the 'screen' command
async fn handle_screen(
    candidates: &Path,
    query: &Path,
    options: &ScreeningOptions,
    json_out: Option<PathBuf>,
    text_out: Option<PathBuf>,
) -> Result<()> {
    let repository = load_repository(candidates)?;
    let criteria = load_criteria(query)?;

    let orchestrator = ScreeningOrchestrator::new(
        Arc::new(LexicalSource::new(repository)),
        Arc::new(ScoreBreakdownAnalyst),
    );
    let report = orchestrator.screen(&criteria, options).await?;

    print_report(&report, options.analyze);

    if let Some(path) = json_out {
        std::fs::write(&path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} Wrote JSON report to {}", "✓".green(), path.display());
    }
    if let Some(path) = text_out {
        std::fs::write(&path, report.to_string())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} Wrote text report to {}", "✓".green(), path.display());
    }
    Ok(())
}

/// Handle the 'inspect' command
fn handle_inspect(candidates: &Path, id: &str) -> Result<()> {
    let repository = load_repository(candidates)?;
    let hit = repository
        .get(id)
        .map_err(|e| anyhow!("Candidate {} not found: {}", id, e))?;

    let (metadata, shapes) = parse_metadata(&hit.metadata);

    println!("{}", format!("Candidate {}", hit.id).bold().blue());
    if let Some(distance) = hit.distance {
        println!("{}Distance: {:.3}", "• ".green(), distance);
    }
    println!("{}Experience: {} years", "• ".green(), metadata.total_experience_years());
    println!("{}Best degree level: {}", "• ".green(), metadata.best_degree_level());

    println!("Field shapes:");
    for (field, shape) in &shapes {
        let label = shape.to_string();
        let label = if metadata.is_malformed(*field) {
            label.red()
        } else {
            label.cyan()
        };
        println!("  - {}: {}", field, label);
    }

    println!("Normalized metadata:");
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(candidates: usize, rounds: usize) -> Result<()> {
    if rounds == 0 {
        return Err(anyhow!("Benchmark needs at least one round"));
    }

    let repository = Arc::new(InMemoryRepository::from_hits(synthetic_hits(candidates))?);
    let orchestrator = ScreeningOrchestrator::new(
        Arc::new(LexicalSource::new(repository)),
        Arc::new(ScoreBreakdownAnalyst),
    );
    let criteria = QueryCriteria {
        keywords: vec!["backend".to_string()],
        required_skills: vec!["Rust".to_string()],
        preferred_skills: vec!["Kafka".to_string(), "SQL".to_string()],
        min_experience_years: Some(2),
        locations: vec!["Berlin".to_string(), "Remote".to_string()],
        ..QueryCriteria::default()
    };
    let options = ScreeningOptions::new().with_limit(candidates).with_top_n(20);

    // Use tokio::spawn to run screening rounds concurrently
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for _ in 0..rounds {
        let orchestrator = orchestrator.clone();
        let criteria = criteria.clone();
        let options = options.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.screen(&criteria, &options).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let busy: Duration = timings.iter().sum();
    let avg_latency = busy / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = rounds as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Candidates per run: {}", candidates);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} runs/second", throughput);

    Ok(())
}

/// Random candidates with a mix of native and string-encoded fields
fn synthetic_hits(count: usize) -> Vec<RetrievalHit> {
    const SKILLS: [&str; 8] = ["Rust", "Go", "Python", "SQL", "Kafka", "Redis", "React", "Java"];
    const CITIES: [&str; 4] = ["Berlin", "Munich", "Remote", "Hamburg"];
    const DEGREES: [&str; 4] = ["associate", "bachelor", "master", "doctorate"];

    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let skills: Vec<&str> = SKILLS
                .iter()
                .copied()
                .filter(|_| rng.random_bool(0.4))
                .collect();
            let start = rng.random_range(2000..2020);
            let end = start + rng.random_range(1..8);
            let low = rng.random_range(10..40);
            let city = CITIES[rng.random_range(0..CITIES.len())];

            // Every third candidate arrives with flattened list fields
            let skills = if i % 3 == 0 {
                json!(skills.join(", "))
            } else {
                json!(skills)
            };
            RetrievalHit::new(
                format!("candidate-{}", i),
                format!("{} backend engineer", city),
                json!({
                    "name": format!("Candidate {}", i),
                    "skills": skills,
                    "work_experience": [{
                        "company": format!("Company {}", i % 50),
                        "start_date": format!("{}-01", start),
                        "end_date": format!("{}-01", end)
                    }],
                    "education": [{"degree": DEGREES[rng.random_range(0..DEGREES.len())]}],
                    "expected_salary": format!("{}K-{}K", low, low + 10),
                    "preferred_locations": [city]
                }),
            )
            .with_distance(rng.random::<f64>())
        })
        .collect()
}

/// Format and print the screening report
fn print_report(report: &pipeline::ScreeningReport, explain: bool) {
    println!("{}", "Candidate Screening Report".bold().blue());
    let conditions = report.query.conditions();
    if conditions.is_empty() {
        println!("Query conditions: none");
    } else {
        println!("Query conditions:");
        for condition in &conditions {
            println!("  {}", condition);
        }
    }
    println!(
        "Reporting {} of {} ranked candidates",
        report.candidates.len(),
        report.total_candidates
    );

    for candidate in &report.candidates {
        let s = &candidate.scores;
        println!(
            "{}. {} ({}) - Score: {:.2}",
            candidate.rank.to_string().green(),
            candidate.name.as_deref().unwrap_or("unknown"),
            candidate.id,
            s.overall
        );
        println!(
            "   skill {:.2} | industry {:.2} | salary {:.2} | education {:.2} | location {:.2} | affinity {:.2}",
            s.skill, s.industry, s.salary, s.education, s.location, s.affinity
        );
        if !candidate.basic_info.skills.is_empty() {
            println!("   Skills: {}", candidate.basic_info.skills.join(", "));
        }
        if explain {
            if let Some(analysis) = &candidate.analysis {
                for line in analysis.lines() {
                    println!("   {}", line.dimmed());
                }
            }
        }
    }

    let summary = &report.summary;
    println!(
        "{} average {:.2}, top {:.2}, bottom {:.2}",
        "Summary:".bold(),
        summary.average,
        summary.maximum,
        summary.minimum
    );
}
