//! wheelhouse：构建 wheel 并发布到 S3 索引
//!
//! 这是一个瘦编排工具，主要功能包括：
//! - 调用 `pip wheel` 在本地构建 wheel 制品
//! - 把构建产物批量同步到 S3 存储桶
//! - 维护一个带预签名下载链接的可浏览 index.html
//!
//! 所有困难问题（依赖解析、存储持久性、分页、签名）完全委托给
//! 外部系统；这里只有严格顺序的编排逻辑，没有并发、缓存或重试。

pub mod cli;
pub mod error;
pub mod index;
pub mod s3;
pub mod spawn;
pub mod utils;
pub mod wheel;

use crate::cli::Args;
use crate::error::Error;
use crate::s3::bucket::Bucket;
use crate::s3::store::{ObjectStore, S3ObjectStore};
use crate::spawn::{CommandRunner, ProcessRunner};
use std::sync::Arc;

/// 索引文档的对象键。
pub const INDEX_KEY: &str = "index.html";

/// 如果索引文档尚不存在，先写入一个最小的空占位页。
///
/// 这保证桶在任何 wheel 构建出来之前就处于可浏览的有效状态；后续
/// 步骤失败时索引依然存在。
pub async fn ensure_index(bucket: &Bucket, acl: &str) -> Result<(), Error> {
    if !bucket.exists(INDEX_KEY).await? {
        bucket
            .put_object(index::EMPTY_INDEX.as_bytes().to_vec(), INDEX_KEY, acl)
            .await?;
    }
    Ok(())
}

/// 执行完整的工作流：构建 → 上传 → 重建索引 → 清理。
///
/// 存储后端使用环境中的 AWS 配置构造，命令在真实子进程中执行。
pub async fn run(args: Args) -> Result<String, Error> {
    let store = Arc::new(S3ObjectStore::from_env().await);
    run_with(args, store, Arc::new(ProcessRunner)).await
}

/// 同 [`run`]，但使用调用方提供的存储后端与命令执行器。
///
/// 严格顺序执行，任何子进程或存储失败都终止剩余步骤，不重试也不
/// 回滚已完成的步骤。构建失败时临时目录保留在磁盘上；只有全部
/// 步骤成功后才删除它。
///
/// # 返回值
///
/// 索引文档的预签名下载 URL。
pub async fn run_with(
    args: Args,
    store: Arc<dyn ObjectStore>,
    runner: Arc<dyn CommandRunner>,
) -> Result<String, Error> {
    let bucket = Bucket::new(&args.bucket, store);

    ensure_index(&bucket, &args.acl).await?;

    // 索引 URL 作为 find-links 提示传给构建步骤，让构建能解析
    // 同一个桶中已托管的依赖。
    let index_url = bucket.generate_url(INDEX_KEY).await?;

    let build_dir =
        wheel::build_wheels(runner.as_ref(), &index_url, &args.pip_args, &args.exclude).await?;
    bucket.sync_dir(runner.as_ref(), &build_dir, &args.acl).await?;

    // 从桶的当前状态整体重建索引：包含本次上传的 wheel 和所有
    // 已存在的 wheel。
    let index_html = index::make_index(&bucket).await?;
    bucket
        .put_object(index_html.into_bytes(), INDEX_KEY, &args.acl)
        .await?;

    std::fs::remove_dir_all(&build_dir)?;
    Ok(index_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::store::{ListPage, MockObjectStore};
    use crate::spawn::MockCommandRunner;
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn demo_args() -> Args {
        Args {
            exclude: vec![],
            acl: "private".to_string(),
            bucket: "my-bucket".to_string(),
            pip_args: vec!["demo".to_string()],
        }
    }

    fn wheel_dir_of(args: &[String]) -> PathBuf {
        let position = args.iter().position(|arg| arg == "--wheel-dir").unwrap();
        PathBuf::from(&args[position + 1])
    }

    /// 构建步骤以非零状态退出时整个运行终止：不发生任何上传、
    /// 列举或索引写入，错误为 Subprocess。
    #[tokio::test]
    async fn test_build_failure_aborts_before_upload() {
        let mut store = MockObjectStore::new();
        // 索引已存在，引导步骤不写入
        store.expect_head().times(1).returning(|_, _| Ok(true));
        store
            .expect_presign_get()
            .times(1)
            .returning(|_, key, _| Ok(format!("https://signed.example/{key}")));
        // put/list_page/bucket_location 没有任何预期：构建失败后
        // 任何一次调用都会让测试失败

        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|args| {
            assert_eq!(args[0], "python3");
            Err(Error::Subprocess {
                command: args.join(" "),
                status: 1,
            })
        });

        let result = run_with(demo_args(), Arc::new(store), Arc::new(runner)).await;
        assert!(matches!(result, Err(Error::Subprocess { status: 1, .. })));
    }

    /// 相同的包规格连续运行两次，桶里的键集合在第二次运行后保持
    /// 不变（构建确定性由假执行器保证）。
    #[tokio::test]
    async fn test_repeated_run_keeps_key_set_stable() {
        let uploaded: Arc<Mutex<BTreeSet<String>>> = Arc::new(Mutex::new(BTreeSet::new()));

        let mut store = MockObjectStore::new();
        store.expect_head().returning(|_, _| Ok(true));
        store
            .expect_presign_get()
            .returning(|_, key, _| Ok(format!("https://signed.example/{key}")));
        store.expect_bucket_location().returning(|_| Ok(None));
        store.expect_put().returning(|_, _, _, _, _| Ok(()));
        let keys = uploaded.clone();
        store.expect_list_page().returning(move |_, _, _| {
            Ok(ListPage {
                keys: keys.lock().unwrap().iter().cloned().collect(),
                next_token: None,
            })
        });

        let mut runner = MockCommandRunner::new();
        let bucket_keys = uploaded.clone();
        runner.expect_run().returning(move |args| {
            match args.first().map(String::as_str) {
                // 确定性的假构建：同一个包规格总是产出同一个 wheel
                Some("python3") => {
                    let dir = wheel_dir_of(args);
                    std::fs::write(dir.join("demo-1.0-py3-none-any.whl"), b"wheel").unwrap();
                }
                // 假同步：把本地目录内容并入远端键集合
                Some("aws") => {
                    let dir = Path::new(&args[3]);
                    for entry in std::fs::read_dir(dir).unwrap() {
                        let name = entry.unwrap().file_name().to_string_lossy().into_owned();
                        bucket_keys.lock().unwrap().insert(name);
                    }
                }
                other => panic!("unexpected command: {other:?}"),
            }
            Ok(())
        });

        let store = Arc::new(store);
        let runner = Arc::new(runner);

        run_with(demo_args(), store.clone(), runner.clone())
            .await
            .unwrap();
        let after_first = uploaded.lock().unwrap().clone();
        assert!(after_first.contains("demo-1.0-py3-none-any.whl"));

        run_with(demo_args(), store, runner).await.unwrap();
        let after_second = uploaded.lock().unwrap().clone();
        assert_eq!(after_second, after_first);
    }
}
