use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::AppConfig;
use crate::errors::AppError;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 从文件加载配置,支持环境变量覆盖
    ///
    /// # 参数
    /// * `config_path` - 可选的配置文件路径
    ///   - `Some(path)`: 使用指定文件（不存在则创建）
    ///   - `None`: 使用默认 "config.toml"（不存在则警告）
    pub fn load(config_path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(config_path);
        config.override_with_env();
        config
    }

    /// 从 TOML 文件加载配置
    fn load_from_file(config_path: Option<&str>) -> Self {
        let path = config_path.unwrap_or("config.toml");

        if !Path::new(path).exists() {
            if config_path.is_none() {
                eprintln!("[WARN] 未找到配置文件: {}，使用内存默认配置", path);
                eprintln!("[HINT] 使用 -c/--config 指定自定义配置文件");
                return Self::default();
            }

            eprintln!("[WARN] 配置文件不存在: {}，正在创建默认配置文件...", path);
            if let Err(e) = Self::default().save_to_file(path) {
                eprintln!("[ERROR] 创建配置文件失败 {}: {}", path, e);
                return Self::default();
            }
            eprintln!("[INFO] 配置文件已创建: {}", path);
        }

        match fs::read_to_string(path).map(|content| toml::from_str::<AppConfig>(&content)) {
            Ok(Ok(config)) => {
                eprintln!("[INFO] 配置已从文件加载: {}", path);
                config
            }
            Ok(Err(e)) => {
                eprintln!("[ERROR] 解析配置文件失败 {}: {}", path, e);
                Self::default()
            }
            Err(e) => {
                eprintln!("[ERROR] 读取配置文件失败 {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// 用环境变量覆盖配置
    fn override_with_env(&mut self) {
        // 服务器配置
        if let Ok(environment) = env::var("APP_ENV") {
            self.server.environment = environment;
        }
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        override_parsed("SERVER_PORT", &mut self.server.port);
        if let Ok(dir) = env::var("STATIC_DIR") {
            self.server.static_dir = dir;
        }

        // 数据库配置
        if let Ok(database_url) = env::var("DATABASE_URL") {
            self.database.url = database_url;
        }
        override_parsed("DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        override_parsed("DATABASE_MIN_CONNECTIONS", &mut self.database.min_connections);

        // Redis 配置
        if let Ok(redis_url) = env::var("REDIS_URL") {
            self.redis.url = redis_url;
        }
        if let Ok(key) = env::var("REDIS_BLACKLIST_KEY") {
            self.redis.blacklist_key = key;
        }

        // 认证配置
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = jwt_secret;
        }
        override_parsed("ACCESS_TOKEN_EXPIRE", &mut self.auth.access_token_expire);
        if let Ok(public_path) = env::var("PUBLIC_PATH") {
            self.auth.public_path = public_path;
        }

        // 缓存配置
        if let Ok(enable) = env::var("ENABLE_REDIS_CACHE") {
            self.cache.enable_redis_cache = enable == "true" || enable == "1";
        }
        override_parsed("MEMORY_CACHE_SIZE", &mut self.cache.memory_cache_size);

        // 日志配置
        if let Ok(level) = env::var("RUST_LOG") {
            self.log.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.log.format = format;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.log.file = Some(file);
        }
        if let Ok(enable) = env::var("LOG_ENABLE_ROTATION") {
            self.log.enable_rotation = enable == "true" || enable == "1";
        }
        override_parsed("LOG_MAX_BACKUPS", &mut self.log.max_backups);
    }

    /// 保存当前配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT secret must be at least 32 characters".into(),
            ));
        }

        if self.auth.access_token_expire <= 0 {
            return Err(AppError::Config(
                "Access token expire time must be positive".into(),
            ));
        }

        Regex::new(&self.auth.public_path)
            .map_err(|e| AppError::Config(format!("Invalid public path pattern: {}", e)))?;

        if self.redis.blacklist_key.is_empty() {
            return Err(AppError::Config("Blacklist key must not be empty".into()));
        }

        Ok(())
    }
}

/// 解析环境变量并覆盖目标值，解析失败时保留原值
fn override_parsed<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = env::var(name) {
        match raw.parse() {
            Ok(value) => *target = value,
            Err(_) => eprintln!("[ERROR] 无效的 {}: {}", name, raw),
        }
    }
}

// ============ 全局配置实例 ============

/// 获取全局配置实例
pub fn get_config() -> &'static AppConfig {
    CONFIG.get().expect("配置未初始化,请先调用 init_config()")
}

/// 初始化全局配置
pub fn init_config(config_path: Option<String>) -> &'static AppConfig {
    CONFIG.get_or_init(|| AppConfig::load(config_path.as_deref()))
}
