use anyhow::Context;
use clap::Parser;
use target_planner::domain::model::{PlanDraft, Track};
use target_planner::domain::ports::SettingsProvider;
use target_planner::utils::{logger, validation::Validate};
use target_planner::{CliConfig, LocalStorage, PlanReport, PlanRunner, RunOptions, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let toml = match &config.config {
        Some(path) => Some(
            TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?,
        ),
        None => None,
    };

    // 初始化日誌
    let verbose = config.verbose || toml.as_ref().is_some_and(|t| t.verbose());
    if config.json_logs || toml.as_ref().is_some_and(|t| t.json_logs()) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting target-planner");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let validation = config
        .validate()
        .and_then(|_| toml.as_ref().map_or(Ok(()), |t| t.validate()));
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let content = std::fs::read_to_string(&config.plan)
        .with_context(|| format!("Failed to read plan '{}'", config.plan))?;
    let draft = PlanDraft::from_json(&content)
        .with_context(|| format!("Plan '{}' is not a valid draft", config.plan))?;

    let options = RunOptions {
        centre_id: config.centre_id.clone(),
        save: config.save,
    };

    let result = match toml {
        Some(toml) => run(toml, &draft, &options).await,
        None => run(config.clone(), &draft, &options).await,
    };

    match result {
        Ok(report) => print_summary(&report),
        Err(e) => {
            tracing::error!(
                "❌ Planning failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn run<P: SettingsProvider>(
    settings: P,
    draft: &PlanDraft,
    options: &RunOptions,
) -> target_planner::Result<PlanReport> {
    let storage = LocalStorage::new(settings.output_path().to_string());
    PlanRunner::new(storage, settings).run(draft, options).await
}

fn print_summary(report: &PlanReport) {
    println!(
        "Work order {}: target {}",
        report.work_order_id, report.total_target
    );
    match &report.centre {
        Some(centre) => println!(
            "Centre: {} ({}), capacity {}, course {} months",
            centre.name, centre.id, centre.capacity, centre.course_duration
        ),
        None => println!("Centre: not selected"),
    }
    for track in Track::ALL {
        if let Some(summary) = report.track(track) {
            println!(
                "  {:<13} total {:>6}  remaining {:>6}",
                track.as_str(),
                summary.total,
                summary.remaining
            );
        }
    }
    if !report.frozen_months.is_empty() {
        let months: Vec<String> = report.frozen_months.iter().map(|m| m.to_string()).collect();
        println!("Frozen enrolment months: {}", months.join(", "));
    }
    match &report.blocking_reason {
        Some(reason) => println!("⚠️  Not ready to save: {}", reason),
        None if report.saved => println!("✅ Targets saved"),
        None => println!("✅ Ready to save"),
    }
}
