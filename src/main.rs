mod cli;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio_stream::StreamExt;

use cli::{Cli, Commands, ConfigAction, OutputFormat, ScanArgs};
use expo_project_scanner::config::Config;
use expo_project_scanner::models::{ProjectMetadata, ScanEvent, ScanOutcome, ScanSummary};
use expo_project_scanner::scanner::ProjectScanner;

#[derive(Serialize)]
struct ScanReport<'a> {
    summary: &'a ScanSummary,
    projects: &'a [ProjectMetadata],
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志，--verbose 时输出调试信息
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // 根据命令执行相应操作，配置只在需要时加载
    match cli.command {
        Some(Commands::Scan(args)) => run_scan(load_config(cli.config.as_deref())?, args).await?,
        None => run_scan(load_config(cli.config.as_deref())?, ScanArgs::default()).await?,
        Some(Commands::Inspect { path, format }) => {
            let config = load_config(cli.config.as_deref())?;
            let scanner = ProjectScanner::new(&config);
            match scanner.inspect_project(&path).await {
                Some(project) => print_projects(std::slice::from_ref(&project), format)?,
                None => println!("{} 不是 Expo 项目", path),
            }
        }
        Some(Commands::Config { action }) => run_config(cli.config.as_deref(), action)?,
    }

    Ok(())
}

/// 加载配置，未指定路径时使用默认位置
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_file(path),
        None => Config::load_or_create_default(),
    }
}

async fn run_scan(mut config: Config, args: ScanArgs) -> Result<()> {
    if let Some(depth) = args.depth {
        config.scan.max_depth = depth;
    }
    if let Some(concurrency) = args.concurrency {
        config.scan.max_concurrency = concurrency;
    }
    if args.no_sizes {
        config.scan.calculate_sizes = false;
    }

    let roots = if args.paths.is_empty() {
        config.scan_paths.clone()
    } else {
        args.paths.clone()
    };

    let scanner = ProjectScanner::new(&config);
    let mut handle = scanner.start(roots);

    // Ctrl-C 时请求取消，已发现的项目仍然保留
    let token = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let progress = create_progress_bar()?;

    // 以路径为键去重，同一路径后到的结果覆盖先到的
    let mut projects: BTreeMap<PathBuf, ProjectMetadata> = BTreeMap::new();
    if let Some(mut events) = handle.events() {
        while let Some(event) = events.next().await {
            match event {
                ScanEvent::Scanning { path } => {
                    progress.set_message(format!(
                        "扫描: {} | 项目: {}",
                        path.display(),
                        projects.len()
                    ));
                }
                ScanEvent::Found { metadata } => {
                    progress.println(format!("✓ {}", metadata.path.display()));
                    projects.insert(metadata.path.clone(), *metadata);
                }
                ScanEvent::Skipped { .. } => {}
            }
        }
    }

    let summary = handle.finish().await?;
    progress.finish_and_clear();

    match summary.outcome {
        ScanOutcome::NothingToScan => {
            println!("没有可扫描的目录");
            return Ok(());
        }
        ScanOutcome::Cancelled => {
            println!("扫描已取消，已发现的 {} 个项目仍然有效", projects.len());
        }
        ScanOutcome::Completed => {
            println!(
                "扫描完成！发现 {} 个项目，扫描了 {} 个目录，用时 {}",
                projects.len(),
                summary.scanned_dirs,
                summary.duration_display()
            );
        }
    }

    let projects: Vec<ProjectMetadata> = projects.into_values().collect();
    match args.format {
        OutputFormat::Table => print_projects(&projects, OutputFormat::Table)?,
        OutputFormat::Json => {
            let report = ScanReport {
                summary: &summary,
                projects: &projects,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(output) = &args.output {
        save_projects(output, &projects)?;
        println!("结果已保存到 {}", output.display());
    }

    Ok(())
}

fn run_config(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    // reset 和 path 不读取现有文件，损坏的配置也能被重置
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::reset_file(&path)?;
            println!("配置已重置: {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

/// 创建进度条
fn create_progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn print_projects(projects: &[ProjectMetadata], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(projects)?),
        OutputFormat::Table => {
            if projects.is_empty() {
                return Ok(());
            }
            println!(
                "{:<28} {:<12} {:<10} {:<12} {}",
                "名称", "SDK", "版本", "大小", "路径"
            );
            for project in projects {
                println!(
                    "{:<28} {:<12} {:<10} {:<12} {}",
                    project.display_name(),
                    project.sdk_display(),
                    project.version.as_deref().unwrap_or("-"),
                    project.project_size.as_deref().unwrap_or("-"),
                    project.path.display()
                );
            }
        }
    }
    Ok(())
}

fn save_projects(path: &Path, projects: &[ProjectMetadata]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(projects)?)?;
    Ok(())
}
