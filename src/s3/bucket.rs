//! 存储桶模块
//!
//! 该模块把一个命名的远端容器与键前缀封装为 [`Bucket`]，提供存在性
//! 检查、上传、分页列举、预签名 URL 生成和目录批量同步操作。具体的
//! 后端调用通过 [`ObjectStore`] trait 注入。

use crate::error::Error;
use crate::s3::store::ObjectStore;
use crate::spawn::CommandRunner;
use crate::utils::path::get_extension_lowercase;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// 预签名 URL 的有效期（1 小时）。
const PRESIGN_EXPIRES: Duration = Duration::from_secs(3600);

/// 把 `[s3://]name[/prefix]` 形式的桶引用拆分为桶名与前缀。
///
/// 缺少 scheme 时按带默认 scheme 处理，两种写法产生相同的结果；
/// 返回的前缀不带前导斜杠。
pub fn split_bucket_url(url: &str) -> (String, String) {
    let rest = url
        .strip_prefix("s3://")
        .or_else(|| url.strip_prefix("//"))
        .unwrap_or(url);
    match rest.split_once('/') {
        Some((name, prefix)) => (name.to_string(), prefix.trim_start_matches('/').to_string()),
        None => (rest.to_string(), String::new()),
    }
}

/// 把位置约束映射为区域标识。
///
/// S3 出于向后兼容的原因维持着位置约束与区域端点之间的区别：较新
/// 的区域两者一致，老区域的别名无法从约定推导，所以在这里按固定
/// 映射硬编码处理。
///
/// * 空的或缺失的约束对应默认区域 `us-east-1`；
/// * 遗留哨兵值 `EU` 对应 `eu-west-1`；
/// * 其余任何非空值原样作为区域标识使用。
pub fn region_for_location(location: Option<&str>) -> String {
    match location {
        None | Some("") => "us-east-1".to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(other) => other.to_string(),
    }
}

/// 一个命名的远端存储桶加键前缀。
///
/// 每次运行从用户提供的引用字符串构造一次，之后不可变；区域在首次
/// 需要时解析并缓存整个生命周期。
pub struct Bucket {
    name: String,
    prefix: String,
    store: Arc<dyn ObjectStore>,
    region: OnceCell<String>,
}

impl Bucket {
    /// 从桶引用字符串构造存储桶。
    ///
    /// # 参数
    ///
    /// * `url` - `[s3://]name[/prefix]` 形式的桶引用。
    /// * `store` - 注入的存储后端。
    pub fn new(url: &str, store: Arc<dyn ObjectStore>) -> Self {
        let (name, prefix) = split_bucket_url(url);
        Self {
            name,
            prefix,
            store,
            region: OnceCell::new(),
        }
    }

    /// 桶名。
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 键前缀（不带前导斜杠）。
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 把相对键拼接到桶前缀之下。
    fn full_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), key)
        }
    }

    /// 检查前缀下是否存在指定键。
    ///
    /// "不存在" 返回 `Ok(false)`；其余任何后端失败原样上抛。
    pub async fn exists(&self, key: &str) -> Result<bool, Error> {
        self.store.head(&self.name, &self.full_key(key)).await
    }

    /// 为前缀下的键生成限时预签名下载 URL。
    pub async fn generate_url(&self, key: &str) -> Result<String, Error> {
        self.presign(&self.full_key(key)).await
    }

    /// 为一个已经包含前缀的完整对象键生成预签名下载 URL。
    pub async fn presign(&self, key: &str) -> Result<String, Error> {
        self.store.presign_get(&self.name, key, PRESIGN_EXPIRES).await
    }

    /// 上传字节内容到前缀下的键。
    ///
    /// 内容类型根据键的扩展名推断；未知扩展名允许没有内容类型。
    pub async fn put_object(&self, body: Vec<u8>, key: &str, acl: &str) -> Result<(), Error> {
        let full_key = self.full_key(key);
        let content_type = mime_guess::from_ext(&get_extension_lowercase(&full_key))
            .first()
            .map(|mime| mime.to_string());
        self.store
            .put(&self.name, &full_key, body, content_type, acl)
            .await
    }

    /// 列出前缀下以 `suffix` 结尾的全部对象键。
    ///
    /// 后端按页返回结果，该方法沿 continuation token 聚合所有页，
    /// 直到后端不再给出 token；每页恰好对应一次后端调用。每个键都
    /// 再做一次前缀与后缀过滤，而不是只依赖后端的前缀过滤。
    pub async fn list_keys(&self, suffix: &str) -> Result<Vec<String>, Error> {
        let mut keys = Vec::new();
        let mut token = None;
        loop {
            let page = self
                .store
                .list_page(&self.name, &self.prefix, token)
                .await?;
            keys.extend(
                page.keys
                    .into_iter()
                    .filter(|key| key.starts_with(&self.prefix) && key.ends_with(suffix)),
            );
            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        Ok(keys)
    }

    /// 解析桶所在区域，首次调用后缓存整个桶生命周期。
    pub async fn region(&self) -> Result<&str, Error> {
        let region = self
            .region
            .get_or_try_init(|| async {
                let location = self.store.bucket_location(&self.name).await?;
                Ok::<String, Error>(region_for_location(location.as_deref()))
            })
            .await?;
        Ok(region.as_str())
    }

    /// 把本地目录的全部文件批量同步到桶前缀之下。
    ///
    /// 委托给外部批量同步命令执行，镜像语义（不删除桶内多余文件）
    /// 继承自该工具的默认行为。
    pub async fn sync_dir(
        &self,
        runner: &dyn CommandRunner,
        local_dir: &Path,
        acl: &str,
    ) -> Result<(), Error> {
        let region = self.region().await?.to_string();
        runner.run(&self.sync_command(local_dir, &region, acl)).await
    }

    /// 组装批量同步命令行。
    fn sync_command(&self, local_dir: &Path, region: &str, acl: &str) -> Vec<String> {
        vec![
            "aws".to_string(),
            "s3".to_string(),
            "sync".to_string(),
            local_dir.display().to_string(),
            format!("s3://{}/{}", self.name, self.prefix),
            "--region".to_string(),
            region.to_string(),
            "--acl".to_string(),
            acl.to_string(),
        ]
    }
}
