//! 命令行参数解析
//!
//! 提供从命令行参数中提取配置文件路径的工具

/// 从命令行参数解析配置文件路径
///
/// 支持 `-c path` / `--config path` 与 `-c=path` / `--config=path`，
/// `args` 包含位于索引 0 的程序名。
pub fn parse_config_path(args: &[String]) -> Option<String> {
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        if arg == "-c" || arg == "--config" {
            return iter.next().cloned();
        }

        if let Some(path) = arg
            .strip_prefix("-c=")
            .or_else(|| arg.strip_prefix("--config="))
        {
            return Some(path.to_string());
        }
    }

    None
}
