use regex::Regex;

use crate::errors::AppError;

/// 免认证路径匹配器
#[derive(Debug, Clone)]
pub struct PublicPaths {
    pattern: Regex,
}

impl PublicPaths {
    pub fn new(pattern: &str) -> Result<Self, AppError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| AppError::Config(format!("Invalid public path pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// 路径（不含查询串）是否免认证
    pub fn is_public(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}
