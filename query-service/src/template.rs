//! 查询模板读取
//!
//! 模板文件由运维在服务外部维护，运行时只读；每次请求都重新读取，不做缓存。

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use common::errors::{AppError, AppResult};

/// Reads query templates from a fixed directory.
#[derive(Debug, Clone)]
pub struct TemplateReader {
    root: PathBuf,
}

impl TemplateReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 读取模板全文，内容原样返回
    ///
    /// 名称必须是模板目录内的相对路径；绝对路径或包含 `..` 的名称按“不存在”处理。
    pub async fn read(&self, name: &str) -> AppResult<String> {
        let path = self.resolve(name)?;

        tokio::fs::read_to_string(&path).await.map_err(|source| match source.kind() {
            ErrorKind::NotFound => AppError::TemplateNotFound(name.to_string()),
            _ => AppError::TemplateIo {
                name: name.to_string(),
                source,
            },
        })
    }

    fn resolve(&self, name: &str) -> AppResult<PathBuf> {
        let relative = Path::new(name);
        let mut components = relative.components().peekable();
        if components.peek().is_none()
            || !components.all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::TemplateNotFound(name.to_string()));
        }
        Ok(self.root.join(relative))
    }
}
