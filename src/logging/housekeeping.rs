use super::LoggingConfig;
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// 一次整理的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HousekeepingReport {
    pub removed: Vec<PathBuf>,
    pub compressed: Vec<PathBuf>,
}

/// 整理日志目录: 删除超过保留天数的日志, 按需压缩今天以前的日志
///
/// 滚动文件按 UTC 日期命名, 这里同样以 UTC 日期判断.
pub fn housekeep(config: &LoggingConfig) -> Result<HousekeepingReport> {
    housekeep_at(config, Utc::now().date_naive())
}

pub(crate) fn housekeep_at(config: &LoggingConfig, today: NaiveDate) -> Result<HousekeepingReport> {
    let mut report = HousekeepingReport::default();
    let directory = Path::new(&config.directory);
    if !directory.exists() {
        return Ok(report);
    }

    let cutoff = today - ChronoDuration::days(config.retention_days);

    let entries = fs::read_dir(directory)
        .with_context(|| format!("读取日志目录失败, path={}", directory.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let file_path = entry.path();

        let Some((date, compressed)) = parse_log_name(&file_name, &config.file_prefix) else {
            continue;
        };

        if date < cutoff {
            fs::remove_file(&file_path)
                .with_context(|| format!("删除过期日志失败, path={}", file_path.display()))?;
            report.removed.push(file_path);
            continue;
        }

        if config.compress_history && !compressed && date < today {
            if let Some(gz_path) = compress_to_gz(&file_path)? {
                report.compressed.push(gz_path);
            }
        }
    }

    report.removed.sort();
    report.compressed.sort();
    Ok(report)
}

/// 压缩为 `.gz` 并删除原文件, 目标已存在时跳过
fn compress_to_gz(path: &Path) -> Result<Option<PathBuf>> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(None);
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(Some(gz_path))
}

/// 解析 `{prefix}.{YYYY-MM-DD}.log[.gz]`, 返回日期与是否已压缩
fn parse_log_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;

    if let Some(date_part) = rest.strip_suffix(".log") {
        return parse_date(date_part).map(|date| (date, false));
    }
    if let Some(date_part) = rest.strip_suffix(".log.gz") {
        return parse_date(date_part).map(|date| (date, true));
    }
    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
