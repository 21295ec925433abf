use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use hospital_core::{PartialReconcileConfig, ReconcileConfig};
use hospital_reconcile::{diff, parse_record, prepare_update, strip_empty, RecordGraph};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hospital-cli",
    about = "Tạo payload cập nhật một phần từ snapshot và bản chỉnh sửa JSON."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// So sánh hai bản ghi và in payload cần gửi.
    Diff {
        /// File JSON của snapshot (trạng thái server).
        #[arg(short, long)]
        original: PathBuf,
        /// File JSON của bản đã chỉnh sửa.
        #[arg(short, long)]
        updated: PathBuf,
        /// File JSON ghi đè cấu hình mặc định.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// In change-set thô, không bỏ khóa server hay làm sạch.
        #[arg(long)]
        raw: bool,
    },
    /// Loại bỏ null và phần tử rỗng khỏi một bản ghi.
    Strip {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hospital_reconcile=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let output = match args.command {
        Command::Diff {
            original,
            updated,
            config,
            raw,
        } => {
            let original = read_record(&original)?;
            let updated = read_record(&updated)?;
            if raw {
                diff(&original, &updated)
            } else {
                let config = read_config(config.as_deref())?;
                prepare_update(&original, &updated, &config)
            }
        }
        Command::Strip { input } => strip_empty(&read_record(&input)?),
    };

    tracing::debug!(keys = output.len(), "writing result");
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn read_record(path: &Path) -> anyhow::Result<RecordGraph> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {path:?}"))?;
    parse_record(&data).with_context(|| format!("File {path:?} không phải JSON object hợp lệ"))
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ReconcileConfig> {
    let Some(path) = path else {
        return Ok(ReconcileConfig::default());
    };
    let data =
        std::fs::read_to_string(path).with_context(|| format!("Không đọc được config {path:?}"))?;
    let partial: PartialReconcileConfig =
        serde_json::from_str(&data).with_context(|| format!("Config {path:?} không hợp lệ"))?;
    Ok(ReconcileConfig::from(partial))
}
