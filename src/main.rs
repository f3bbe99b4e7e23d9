use clap::Parser;
use params_codemod::utils::error::ErrorSeverity;
use params_codemod::utils::{logger, validation::Validate};
use params_codemod::{BatchReport, CliConfig, FileStatus, LocalStorage, Migrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting params-codemod");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let manifest = match config.resolve_manifest() {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("❌ Failed to load manifest: {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = manifest.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(manifest.root());
    let migrator = match Migrator::new(storage, manifest) {
        Ok(migrator) => migrator,
        Err(e) => {
            tracing::error!(
                "❌ Could not build migration rules: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            let exit_code = if e.severity() >= ErrorSeverity::Critical { 3 } else { 1 };
            std::process::exit(exit_code);
        }
    };

    // stdout carries nothing but the report in JSON mode.
    if !config.report_json {
        if config.dry_run {
            println!("🔍 Dry run: no files will be written\n");
        } else {
            println!("Fixing API route files...\n");
        }
    }

    let report = migrator.run().await;

    if config.report_json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        }
    } else {
        print_report(&report);
    }

    if report.failed() > 0 {
        std::process::exit(2);
    }

    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            FileStatus::Fixed => println!("✅ Fixed: {}", outcome.path),
            FileStatus::WouldFix => println!("📝 Would fix: {}", outcome.path),
            FileStatus::SkippedNotFound => println!("⏭️  Skip (not found): {}", outcome.path),
            FileStatus::SkippedNoChange => println!("⏭️  No changes needed: {}", outcome.path),
            FileStatus::Failed { reason } => println!("❌ Failed: {} ({})", outcome.path, reason),
        }

        if let Some(stats) = &outcome.stats {
            if !stats.unanchored.is_empty() {
                println!(
                    "   ⚠️  no insertion point for handlers at lines {:?}",
                    stats.unanchored
                );
            }
        }
    }

    println!("\n✨ {}", report.summary());
}
