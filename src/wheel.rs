//! wheel 构建模块
//!
//! 该模块在全新的临时目录中调用外部构建工具生成 wheel，并在上传
//! 之前应用用户指定的排除模式。

use crate::error::Error;
use crate::spawn::CommandRunner;
use globset::{Glob, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// 在全新的临时目录中构建 wheel。
///
/// 调用 `pip wheel`，把 `--find-links` 指向桶里已托管的索引，使
/// 构建能把同一个桶中已有的 wheel 作为依赖候选。构建命令以非零
/// 状态退出时整个运行终止，此失败路径上临时目录保留在磁盘上。
///
/// # 参数
///
/// * `runner` - 注入的命令执行器。
/// * `index_url` - 已托管索引的下载 URL（find-links 提示）。
/// * `pip_args` - 透传给 `pip wheel` 的包名与选项。
/// * `exclusions` - 构建成功后要从输出目录删除的文件名 glob 模式。
///
/// # 返回值
///
/// 包含构建产物（已应用排除）的临时目录路径。
pub async fn build_wheels(
    runner: &dyn CommandRunner,
    index_url: &str,
    pip_args: &[String],
    exclusions: &[String],
) -> Result<PathBuf, Error> {
    let build_dir = tempfile::Builder::new()
        .prefix("wheelhouse-")
        .tempdir()?
        .keep();

    let mut args: Vec<String> = vec![
        "python3".to_string(),
        "-m".to_string(),
        "pip".to_string(),
        "wheel".to_string(),
        "--wheel-dir".to_string(),
        build_dir.display().to_string(),
        "--find-links".to_string(),
        index_url.to_string(),
    ];
    args.extend(pip_args.iter().cloned());
    runner.run(&args).await?;

    remove_excluded(&build_dir, exclusions)?;
    Ok(build_dir)
}

/// 删除目录中文件名匹配任一排除模式的文件。
///
/// 模式只跟文件名比较，不含目录部分。
pub fn remove_excluded(dir: &Path, exclusions: &[String]) -> Result<(), Error> {
    if exclusions.is_empty() {
        return Ok(());
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in exclusions {
        builder.add(Glob::new(pattern)?);
    }
    let matcher = builder.build()?;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if matcher.is_match(Path::new(&entry.file_name())) {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
