mod export;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, UserId};
use recommender::{
    GenreQuery, RecommendError, RecommendationEngine, RecommendedMovie, RecommenderConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const MIN_GENRE_LIMIT: usize = 5;
const MAX_GENRE_LIMIT: usize = 20;

/// MovieRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Genre popularity, collaborative and hybrid movie recommendations", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// JSON file overriding the default recommender settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum number of ratings for a movie to be ranked
    #[arg(long)]
    min_ratings: Option<u32>,

    /// Number of similar users consulted by collaborative filtering
    #[arg(long)]
    neighbors: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Most popular movies carrying every genre of a query
    Genre {
        /// Genres joined with '+', e.g. "Comedy+Romance"
        #[arg(long)]
        query: String,

        /// Number of movies to show (clamped to 5..=20)
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Also write the list to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Recommendations from users with similar taste
    Collaborative {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Genre popularity and collaborative results combined
    Hybrid {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Genres joined with '+'
        #[arg(long)]
        query: String,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List every genre in the dataset
    Genres,

    /// Show dataset statistics
    Summary,

    /// Evaluate baseline accuracy, optionally precision@k for a user
    Evaluate {
        /// User whose collaborative recommendations are scored
        #[arg(long)]
        user_id: Option<UserId>,

        /// Cut-off for precision@k
        #[arg(long, default_value = "10")]
        k: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Load data index (this may take a moment)
    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let mut engine = RecommendationEngine::new(data_index, config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Genre {
            query,
            limit,
            export,
        } => handle_genre(&engine, &query, limit, export)?,
        Commands::Collaborative { user_id, limit } => {
            let limit = limit.unwrap_or(engine.config().collaborative_limit);
            handle_collaborative(&mut engine, user_id, limit)
        }
        Commands::Hybrid {
            user_id,
            query,
            limit,
        } => {
            let limit = limit.unwrap_or(engine.config().hybrid_limit);
            handle_hybrid(&mut engine, user_id, &query, limit)
        }
        Commands::Genres => handle_genres(&engine),
        Commands::Summary => handle_summary(&engine),
        Commands::Evaluate { user_id, k } => handle_evaluate(&engine, user_id, k),
    }

    Ok(())
}

/// Defaults, then the config file, then command line flags
fn load_config(cli: &Cli) -> Result<RecommenderConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = RecommenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        }
        None => RecommenderConfig::default(),
    };

    if let Some(min_ratings) = cli.min_ratings {
        config.min_rating_count = min_ratings;
    }
    if let Some(neighbors) = cli.neighbors {
        anyhow::ensure!(neighbors > 0, "--neighbors must be positive");
        config.neighbors = neighbors;
    }
    Ok(config)
}

/// Handle the 'genre' command
fn handle_genre(
    engine: &RecommendationEngine,
    input: &str,
    limit: usize,
    export: Option<PathBuf>,
) -> Result<()> {
    let limit = limit.clamp(MIN_GENRE_LIMIT, MAX_GENRE_LIMIT);

    let result = GenreQuery::parse(input).and_then(|query| {
        let recs = engine.by_genre(&query, limit)?;
        Ok((query, recs))
    });
    let (query, recs) = match result {
        Ok(found) => found,
        Err(err) => {
            report_error(&err);
            return Ok(());
        }
    };

    let rows = engine.describe(&recs);
    print_recommendations(&format!("Top {} movies", query.display_name()), &rows);

    if let Some(path) = export {
        export::write_csv(&path, &rows)?;
        println!("{} Exported {} movies to {}", "✓".green(), rows.len(), path.display());
    }
    Ok(())
}

/// Handle the 'collaborative' command
fn handle_collaborative(engine: &mut RecommendationEngine, user_id: UserId, limit: usize) {
    match engine.collaborative(user_id, limit) {
        Ok(recs) if recs.is_empty() => {
            println!("No recommendations available for user {}", user_id);
        }
        Ok(recs) => {
            let rows = engine.describe(&recs);
            print_recommendations(&format!("Recommended for user {}", user_id), &rows);
        }
        Err(err) => report_error(&err),
    }
}

/// Handle the 'hybrid' command
fn handle_hybrid(engine: &mut RecommendationEngine, user_id: UserId, input: &str, limit: usize) {
    let query = match GenreQuery::parse(input) {
        Ok(query) => query,
        Err(err) => return report_error(&err),
    };

    let known_user = !engine.data_index().get_user_ratings(user_id).is_empty();

    match engine.hybrid(user_id, &query, limit) {
        Ok(recs) if recs.is_empty() => {
            println!("No recommendations available for user {}", user_id);
        }
        Ok(recs) => {
            if !known_user {
                println!(
                    "{} User {} has no ratings, showing popular {} movies only",
                    "!".yellow(),
                    user_id,
                    query.display_name()
                );
            }
            let rows = engine.describe(&recs);
            print_recommendations(
                &format!("Hybrid picks for user {} ({})", user_id, query.display_name()),
                &rows,
            );
        }
        Err(err) => report_error(&err),
    }
}

/// Handle the 'genres' command
fn handle_genres(engine: &RecommendationEngine) {
    println!("{}", format!("{} genres:", engine.genres().len()).bold().blue());
    for genre in engine.genres().iter() {
        println!("  {} {}", "•".green(), genre);
    }
}

/// Handle the 'summary' command
fn handle_summary(engine: &RecommendationEngine) {
    let summary = engine.summary();

    println!("{}", "Dataset summary:".bold().blue());
    println!("{}Movies: {}", "• ".green(), summary.total_movies);
    println!("{}Rated movies: {}", "• ".green(), summary.rated_movies);
    println!("{}Ratings: {}", "• ".green(), summary.total_ratings);
    println!("{}Users: {}", "• ".green(), summary.unique_users);
    println!("{}Average rating: {:.2}", "• ".green(), summary.avg_rating);
    println!("{}Ratings per user: {:.1}", "• ".green(), summary.ratings_per_user);

    println!("Rating distribution:");
    for bucket in &summary.rating_distribution {
        println!(
            "  {:>3.1}: {:>7} ({:>5.1}%)",
            bucket.value, bucket.count, bucket.percent
        );
    }

    println!("Most common genres:");
    for (genre, count) in summary.genre_counts.iter().take(10) {
        println!("  - {}: {}", genre, count);
    }

    println!(
        "Highest rated (at least {} ratings):",
        recommender::summary::TOP_RATED_MIN_COUNT
    );
    for movie in &summary.top_rated {
        println!(
            "  - {} ({:.2}, {} ratings)",
            movie.title, movie.avg_rating, movie.rating_count
        );
    }
}

/// Handle the 'evaluate' command
fn handle_evaluate(engine: &RecommendationEngine, user_id: Option<UserId>, k: usize) {
    let report = match engine.evaluate() {
        Ok(report) => report,
        Err(err) => return report_error(&err),
    };

    println!("{}", "Evaluation results:".bold().blue());
    println!(
        "{}Train / test ratings: {} / {}",
        "• ".cyan(),
        report.train_size,
        report.test_size
    );
    println!(
        "{}Global mean baseline: RMSE {:.4}, MAE {:.4}",
        "• ".cyan(),
        report.baseline.rmse,
        report.baseline.mae
    );
    println!(
        "{}User mean baseline:   RMSE {:.4}, MAE {:.4}",
        "• ".cyan(),
        report.user_average.rmse,
        report.user_average.mae
    );

    if let Some(user_id) = user_id {
        match engine.collaborative_precision(user_id, k) {
            Ok(precision) => println!(
                "{}Collaborative precision@{} for user {}: {:.3}",
                "• ".cyan(),
                k,
                user_id,
                precision
            ),
            Err(err) => report_error(&err),
        }
    }
}

/// Print a recoverable error the way the user should act on it
fn report_error(err: &RecommendError) {
    match err {
        RecommendError::UnknownGenre { genres } => {
            println!("{} Unknown genres: {}", "✗".red(), genres.join(", "));
            println!("  Run `movie-recs genres` to see the available genres");
        }
        RecommendError::NoResults { query, reason } => {
            println!("No movies found for {}: {}", query, reason);
        }
        RecommendError::UnknownUser(user_id) => {
            println!("{} User {} has no ratings", "✗".red(), user_id);
            println!("  Try `movie-recs genre --query <genres>` for popular movies instead");
        }
        other => println!("{} {}", "✗".red(), other),
    }
}

/// Helper function to format and print recommendations
fn print_recommendations(title: &str, rows: &[RecommendedMovie]) {
    println!("{}", format!("{}:", title).bold().blue());
    for row in rows {
        let avg = row
            .avg_rating
            .map(|avg| format!("{:.2}", avg))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{}. {} [{}] - avg {} ({} ratings) - {}",
            row.rank.to_string().green(),
            row.title,
            row.genres.join(", "),
            avg,
            row.rating_count,
            row.source
        );
    }
}
