//! Panic handler module
//!
//! 进程 panic 时输出彩色报告并追加写入 crash.log

use chrono::Utc;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic::{self, PanicHookInfo};

const CRASH_LOG: &str = "crash.log";

struct CrashReport {
    timestamp: String,
    message: String,
    location: String,
    backtrace: Backtrace,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Unknown panic".to_string());

        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        Self {
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            message,
            location,
            backtrace: Backtrace::force_capture(),
        }
    }

    fn write_to_file(&self) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(CRASH_LOG)?;

        writeln!(file, "=== Crash Report - {} ===", self.timestamp)?;
        writeln!(file, "Message: {}", self.message)?;
        writeln!(file, "Location: {}", self.location)?;
        writeln!(file, "Backtrace:\n{:?}\n", self.backtrace)?;
        Ok(())
    }

    fn print(&self) {
        use colored::Colorize;

        let rule = "═".repeat(51);
        eprintln!("\n{}", rule.red().bold());
        eprintln!("{}", "PANIC".red().bold());
        eprintln!("{}\n", rule.red().bold());
        eprintln!("{} {}", "原因:".yellow().bold(), self.message.white());
        eprintln!("{} {}\n", "位置:".yellow().bold(), self.location.white());
        eprintln!("{}", "堆栈跟踪:".yellow().bold());
        eprintln!("{}", format!("{:?}", self.backtrace).dimmed());
        eprintln!("\n{}", format!("详细信息已保存到 {}", CRASH_LOG).cyan());
        eprintln!("{}\n", rule.red().bold());
    }
}

/// 安装自定义 panic hook
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let report = CrashReport::capture(info);

        if let Err(e) = report.write_to_file() {
            eprintln!("Failed to write crash log: {}", e);
        }

        report.print();
    }));
}
