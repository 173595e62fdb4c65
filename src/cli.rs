use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "expo-project-scanner")]
#[command(about = "在本机目录中查找 Expo 项目")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 扫描指定目录中的 Expo 项目（不指定时使用配置中的路径）
    Scan(ScanArgs),

    /// 重新读取单个项目的信息
    Inspect {
        /// 项目路径
        path: String,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Default)]
pub struct ScanArgs {
    /// 要扫描的根目录
    pub paths: Vec<String>,

    /// 最大扫描深度
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// 每层同时检查的目录数
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// 不计算项目大小
    #[arg(long)]
    pub no_sizes: bool,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// 以 JSON 保存结果到文件
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 重置为默认配置
    Reset,

    /// 显示配置文件路径
    Path,
}

#[derive(clap::ValueEnum, Clone, Copy, Default)]
pub enum OutputFormat {
    /// 表格格式
    #[default]
    Table,
    /// JSON 格式
    Json,
}
