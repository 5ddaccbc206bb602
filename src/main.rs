mod cli;

use artcare::{
    backup::{self, RestoreEngine, Snapshot, SnapshotExporter},
    config::{self, persist, Config},
    images::StorageRouter,
    quota::{BackendUsage, QuotaAccountant},
};
use artcare_common::{PhotoRole, StorageMode, WorkId};
use artcare_db::pool::{get_conn, init_pool, DbPool};
use artcare_db::queries::works;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "./artcare.toml";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "artcare=debug,artcare_db=debug,artcare_common=debug".to_string()
        } else {
            "artcare=info,artcare_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Upload { file, role, work } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(upload(&file, role, work, config_path))
        }
        Commands::Usage { json } => usage(config_path, json),
        Commands::Export { output } => export(output, config_path),
        Commands::Restore { file, yes } => restore(&file, yes, config_path),
        Commands::Mode { mode } => storage_mode(mode, config_path),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("artcare {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_database(config: &Config) -> Result<DbPool> {
    let db_path = shellexpand::tilde(&config.database.path).into_owned();

    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
    }

    tracing::debug!("Opening database at {}", db_path);
    init_pool(&db_path).with_context(|| format!("Failed to open database: {}", db_path))
}

async fn upload(
    file: &Path,
    role: PhotoRole,
    work: Option<WorkId>,
    config_path: Option<&Path>,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    // Read fresh so a mode switch applies to the very next upload
    let config = config::load_config_or_default(config_path)?;
    let mode = config.storage.mode;

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read image file: {:?}", file))?;

    let router = StorageRouter::from_config(&config)?;
    let photo = router.store(bytes, role, mode).await?;

    if let Some(work_id) = work {
        let pool = open_database(&config)?;
        let conn = get_conn(&pool)?;
        if works::get_work(&conn, work_id)?.is_none() {
            anyhow::bail!("Work not found: {}", work_id);
        }
        works::set_work_image(&conn, work_id, Some(&photo))?;
        println!("Attached photo to work {}", work_id);
    }

    match photo.kind() {
        StorageMode::Embedded => {
            println!("Stored embedded {} photo ({} bytes)", role, photo.len())
        }
        StorageMode::External => println!("Stored external {} photo: {}", role, photo),
    }

    Ok(())
}

fn usage(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;
    let report = QuotaAccountant::new(pool, config.quota).usage();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let Some(report) = report else {
        println!("Storage usage: unknown");
        return Ok(());
    };

    print_backend_usage("Embedded", &report.embedded);
    print_backend_usage("External", &report.external);
    println!("Total photos: {}", report.total_photos());

    Ok(())
}

fn print_backend_usage(label: &str, usage: &BackendUsage) {
    println!(
        "{}: {} work / {} field photos, ~{} of {} ({:.2}%)",
        label,
        usage.counts.work,
        usage.counts.field,
        format_bytes(usage.bytes),
        format_bytes(usage.limit_bytes),
        usage.percent
    );
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn export(output: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;

    let output = output.unwrap_or_else(|| {
        PathBuf::from(backup::default_backup_file_name(
            chrono::Local::now().date_naive(),
        ))
    });

    let snapshot = SnapshotExporter::new(pool).write_snapshot(&output)?;

    println!("Backup written to {}", output.display());
    println!(
        "  Works: {}, locations: {}, seniors: {}, teaching records: {}",
        snapshot.stats.works_count,
        snapshot.stats.locations_count,
        snapshot.stats.seniors_count,
        snapshot.stats.records_count
    );

    Ok(())
}

fn restore(file: &Path, yes: bool, config_path: Option<&Path>) -> Result<()> {
    if !yes {
        anyhow::bail!(
            "Restoring deletes all current data and replaces it with {:?}. Re-run with --yes to confirm",
            file
        );
    }

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup file: {:?}", file))?;
    let snapshot = Snapshot::from_json(&content)?;

    let config = config::load_config_or_default(config_path)?;
    let pool = open_database(&config)?;

    let result = RestoreEngine::new(pool).restore(&snapshot)?;

    println!("✓ Restore complete");
    println!("  Locations: {}", result.locations);
    println!("  Seniors: {}", result.seniors);
    println!("  Works: {}", result.works);
    println!("  Teaching records: {}", result.records);
    println!("  Participants: {}", result.participants);
    println!("  Filter options: {}", result.filters);

    if !result.participant_failures.is_empty() {
        println!(
            "  {} participant rows could not be restored:",
            result.participant_failures.len()
        );
        for failure in &result.participant_failures {
            println!("    {}: {}", failure.id, failure.error);
        }
    }

    Ok(())
}

fn storage_mode(mode: Option<StorageMode>, config_path: Option<&Path>) -> Result<()> {
    let path = config::resolve_config_path(config_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match mode {
        Some(mode) => {
            persist::update_storage_mode(&path, mode)?;
            let config = config::load_config(&path)?;
            if mode == StorageMode::External && config.storage.external.is_none() {
                println!(
                    "Warning: no [storage.external] table in {:?}; uploads will fail until one is added",
                    path
                );
            }
            println!("Storage mode set to {}", mode);
        }
        None => {
            let config = if path.exists() {
                config::load_config(&path)?
            } else {
                Config::default()
            };
            println!("{}", config.storage.mode);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Database: {}", config.database.path);
    println!("  Storage mode: {}", config.storage.mode);
    match &config.storage.external {
        Some(external) => println!("  External endpoint: {}", external.endpoint),
        None => println!("  External endpoint: not configured"),
    }
    println!(
        "  Work profile: {}px @ {}",
        config.profiles.work.max_dimension, config.profiles.work.quality
    );
    println!(
        "  Field profile: {}px @ {}",
        config.profiles.field.max_dimension, config.profiles.field.quality
    );

    Ok(())
}
