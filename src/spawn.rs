//! 子进程执行模块
//!
//! 该模块负责运行外部命令（构建工具、批量同步工具），执行前在日志中
//! 打印完整命令行。命令以非零状态退出时返回错误，由调用方决定是否
//! 终止整个运行。执行器通过 [`CommandRunner`] trait 注入，便于在
//! 测试中用假实现替换真实子进程。

use crate::error::Error;
use async_trait::async_trait;
use tokio::process::Command;

/// 外部命令执行器。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// 执行外部命令。
    ///
    /// # 参数
    ///
    /// * `args` - 完整的命令向量，第一个元素为程序名。
    ///
    /// # 返回值
    ///
    /// 命令以状态 0 退出时返回 `Ok(())`，否则返回携带命令行与
    /// 退出码的 [`Error::Subprocess`]。
    async fn run(&self, args: &[String]) -> Result<(), Error>;
}

/// 真实的子进程执行器，继承标准输出与标准错误。
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<(), Error> {
        let Some((program, rest)) = args.split_first() else {
            return Err(Error::Subprocess {
                command: String::new(),
                status: -1,
            });
        };

        tracing::info!("=> {}", args.join(" "));

        let status = Command::new(program).args(rest).status().await?;
        if status.success() {
            return Ok(());
        }
        Err(Error::Subprocess {
            command: args.join(" "),
            status: status.code().unwrap_or(-1),
        })
    }
}
