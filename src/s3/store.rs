//! 对象存储后端模块
//!
//! 该模块定义 [`ObjectStore`] trait 作为存储桶逻辑与具体 S3 客户端
//! 之间的接缝，并提供基于 `aws_sdk_s3::Client` 的真实实现。客户端
//! 配置显式传入而非依赖全局状态，便于在测试中用假实现替换。

use crate::error::Error;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use std::time::Duration;

/// 一页对象列表结果。
///
/// 后端按页返回键（每页至多 1000 个）；`next_token` 为 `None` 表示
/// 已经是最后一页。
#[derive(Debug, Clone)]
pub struct ListPage {
    /// 本页包含的对象键。
    pub keys: Vec<String>,
    /// 获取下一页所需的 continuation token。
    pub next_token: Option<String>,
}

/// 对象存储后端的能力集合。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 检查对象是否存在。
    ///
    /// "不存在" 是唯一被就地处理的预期情况，返回 `Ok(false)`；其余
    /// 任何失败都按 [`Error::Storage`] 原样上抛，不得掩盖为 "不存在"。
    async fn head(&self, bucket: &str, key: &str) -> Result<bool, Error>;

    /// 上传（或覆盖）一个对象，附带可选的内容类型与 canned ACL。
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<String>,
        acl: &str,
    ) -> Result<(), Error>;

    /// 拉取一页对象列表，每次调用恰好对应一次后端请求。
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> Result<ListPage, Error>;

    /// 查询桶的位置约束（LocationConstraint）。
    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>, Error>;

    /// 为对象生成限时的预签名 GET URL，链接本身携带临时签名，
    /// 访问者无需任何凭证。
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error>;
}

/// 基于 `aws_sdk_s3::Client` 的真实存储后端。
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// 用已配置好的客户端构造后端。
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 使用官方标准方式从环境变量中自动读取 AWS 配置信息来创建
    /// S3 客户端。
    ///
    /// # 标准 AWS 环境变量
    ///
    /// * `AWS_ACCESS_KEY_ID` - AWS 访问密钥 ID
    /// * `AWS_SECRET_ACCESS_KEY` - AWS 秘密访问密钥
    /// * `AWS_REGION` - AWS 区域
    /// * `AWS_ENDPOINT_URL` - S3 兼容服务的端点 URL
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head(&self, bucket: &str, key: &str) -> Result<bool, Error> {
        let result = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|service| service.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    Ok(false)
                } else {
                    Err(Error::storage(DisplayErrorContext(&err)))
                }
            }
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<String>,
        acl: &str,
    ) -> Result<(), Error> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .acl(ObjectCannedAcl::from(acl));
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|err| Error::storage(DisplayErrorContext(&err)))?;
        Ok(())
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> Result<ListPage, Error> {
        let mut request = self.client.list_objects_v2().bucket(bucket);
        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| Error::storage(DisplayErrorContext(&err)))?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();
        Ok(ListPage {
            keys,
            next_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>, Error> {
        let response = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| Error::storage(DisplayErrorContext(&err)))?;

        Ok(response
            .location_constraint()
            .map(|constraint| constraint.as_str().to_string()))
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, Error> {
        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(Error::storage)?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|err| Error::storage(DisplayErrorContext(&err)))?;

        Ok(presigned_request.uri().to_string())
    }
}
