//! 错误类型模块
//!
//! 该模块定义了整个工具使用的统一错误类型。所有失败对当前运行都是
//! 终止性的：不做自动重试，也不回滚已完成的步骤。

use thiserror::Error;

/// 工具的统一错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// 外部命令以非零状态码退出。
    #[error("subprocess `{command}` exited with status {status}")]
    Subprocess { command: String, status: i32 },

    /// 存储后端调用失败（"对象不存在" 以外的任何情况）。
    #[error("storage request failed: {message}")]
    Storage { message: String },

    /// 无效的排除 glob 模式。
    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// 索引页渲染失败。
    #[error("failed to render index page: {0}")]
    Render(#[from] handlebars::RenderError),

    /// 本地文件系统或进程启动失败。
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 把任意可显示的后端错误包装为 [`Error::Storage`]。
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Error::Storage {
            message: err.to_string(),
        }
    }
}
