use clap::{Parser, Subcommand, ValueEnum};
use wardrobe_planner::core::analytics::write_performance_csv;
use wardrobe_planner::core::combinations::generate_combinations;
use wardrobe_planner::core::planner::{liked_combinations, DEFAULT_MAX_ATTEMPTS};
use wardrobe_planner::domain::model::{AnalyticsReport, ItemPerformance, WardrobeData};
use wardrobe_planner::utils::error::{ErrorSeverity, WardrobeError};
use wardrobe_planner::utils::logger;
use wardrobe_planner::{LocalStorage, PlannerConfig, WardrobeService, WeeklyPlanner};

#[derive(Parser)]
#[command(name = "wardrobe-report")]
#[command(about = "Offline reports and planning over a wardrobe data file")]
struct Args {
    /// Directory holding the data file
    #[arg(short, long, default_value = ".")]
    data_dir: String,

    #[arg(long, default_value = "wardrobe_data.json")]
    data_file: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show catalog counts
    Summary,
    /// Regenerate all shirt x pants combinations
    Combinations {
        /// Persist the regenerated set to the data file
        #[arg(long)]
        write: bool,
    },
    /// Pick a 7-day plan from liked combinations
    Plan {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        attempts: usize,

        /// Per-attempt ceiling on examined candidates
        #[arg(long)]
        max_steps: Option<usize>,

        /// Persist the plan as weekly_outfits
        #[arg(long)]
        write: bool,
    },
    /// Per-item like rates, worst first
    Analytics {
        #[arg(short, long, value_enum, default_value = "table")]
        format: ReportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Csv,
    Json,
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Reading {}/{}", args.data_dir, args.data_file);
    let storage = LocalStorage::new(&args.data_dir);

    let result = match args.command {
        Command::Summary => {
            let service = WardrobeService::new(storage, &args.data_file, PlannerConfig::default());
            service.load().await.map(|data| display_summary(&data))
        }
        Command::Combinations { write } => {
            let service = WardrobeService::new(storage, &args.data_file, PlannerConfig::default());
            run_combinations(&service, write).await
        }
        Command::Plan {
            seed,
            attempts,
            max_steps,
            write,
        } => {
            let mut planner_config = PlannerConfig {
                max_attempts: attempts,
                seed,
                ..PlannerConfig::default()
            };
            if let Some(steps) = max_steps {
                planner_config.max_steps_per_attempt = steps;
            }
            let service = WardrobeService::new(storage, &args.data_file, planner_config);
            run_plan(&service, planner_config, write).await
        }
        Command::Analytics { format, output } => {
            let service = WardrobeService::new(storage, &args.data_file, PlannerConfig::default());
            run_analytics(&service, format, output.as_deref()).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn display_summary(data: &WardrobeData) {
    let liked = data.preferences.values().filter(|&&v| v).count();
    println!("📋 Wardrobe Summary:");
    println!("  Shirts: {}", data.shirts.len());
    println!("  Pants: {}", data.pants.len());
    println!("  Combinations: {}", data.combinations.len());
    println!("  Rated: {} ({} liked)", data.preferences.len(), liked);
    println!("  Weekly plan: {} outfits", data.weekly_outfits.len());
}

async fn run_combinations(
    service: &WardrobeService<LocalStorage>,
    write: bool,
) -> Result<(), WardrobeError> {
    let combinations = if write {
        service.generate_combinations().await?
    } else {
        let data = service.load().await?;
        generate_combinations(&data.shirts, &data.pants)?
    };

    for combo in &combinations {
        println!(
            "  {}  {} + {}",
            combo.id, combo.shirt.original_name, combo.pants.original_name
        );
    }
    println!("✅ {} combinations{}", combinations.len(), if write { " saved" } else { "" });
    Ok(())
}

async fn run_plan(
    service: &WardrobeService<LocalStorage>,
    planner_config: PlannerConfig,
    write: bool,
) -> Result<(), WardrobeError> {
    let plan = if write {
        service.generate_weekly().await?
    } else {
        let data = service.load().await?;
        let liked = liked_combinations(&data.combinations, &data.preferences);
        WeeklyPlanner::new(planner_config).plan(&liked)?
    };

    println!("🗓️ Weekly plan:");
    for (day, outfit) in WEEKDAYS.iter().zip(plan.outfits()) {
        println!(
            "  {}  {} + {}",
            day, outfit.shirt.original_name, outfit.pants.original_name
        );
    }
    if write {
        println!("✅ Plan saved");
    }
    Ok(())
}

async fn run_analytics(
    service: &WardrobeService<LocalStorage>,
    format: ReportFormat,
    output: Option<&str>,
) -> Result<(), WardrobeError> {
    let report = service.analytics().await?;

    let rendered: Vec<u8> = match format {
        ReportFormat::Table => render_table(&report).into_bytes(),
        ReportFormat::Json => serde_json::to_vec_pretty(&report)?,
        ReportFormat::Csv => {
            let mut buf = Vec::new();
            write_performance_csv(&report, &mut buf)?;
            buf
        }
    };

    match output {
        Some(path) => {
            tokio::fs::write(path, &rendered).await?;
            println!("📁 Report saved to: {}", path);
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }
    Ok(())
}

fn render_table(report: &AnalyticsReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str(&format!(
        "📊 {} shirts, {} pants, {} combinations, {} liked, {} disliked\n",
        stats.shirts, stats.pants, stats.combinations, stats.liked, stats.disliked
    ));
    push_section(&mut out, "Shirts", &report.shirt_performance);
    push_section(&mut out, "Pants", &report.pants_performance);
    out
}

fn push_section(out: &mut String, title: &str, rows: &[ItemPerformance]) {
    out.push_str(&format!("\n{} (worst first):\n", title));
    for row in rows {
        out.push_str(&format!(
            "  {:>5.1}%  {:>3}/{:<3}  {}\n",
            row.performance, row.liked, row.total, row.item.original_name
        ));
    }
}
