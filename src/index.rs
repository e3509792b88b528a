//! 索引页渲染模块
//!
//! 该模块根据存储桶的当前内容生成完整的 wheel 索引 HTML 文档。
//! 文档在每次运行时整体重建，不做增量更新。

use crate::error::Error;
use crate::s3::bucket::Bucket;
use handlebars::Handlebars;
use serde::Serialize;

/// 最小的空占位索引文档。
///
/// 在桶里还没有索引时先写入它，保证桶从一开始就处于可浏览的有效
/// 状态，即使后续步骤失败。
pub const EMPTY_INDEX: &str = "<!DOCTYPE html><html></html>";

/// 索引页模板。`{{key}}` 与 `{{url}}` 都经过 HTML 实体转义输出。
const INDEX_TEMPLATE: &str = "<!DOCTYPE html><html><body>\
{{#each entries}}<a href=\"{{url}}\">{{key}}</a><br>{{/each}}\
</body></html>";

#[derive(Debug, Serialize)]
struct IndexEntry {
    key: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct IndexPage {
    entries: Vec<IndexEntry>,
}

/// 生成桶当前内容的完整索引页。
///
/// 按后端返回的顺序（顺序不是保证属性）列出所有以 `.whl` 结尾的
/// 键，每个键对应一个锚元素：href 为限时预签名下载 URL，链接文本
/// 为原始键，之后跟一个换行元素。
///
/// # 参数
///
/// * `bucket` - 要列举的存储桶。
///
/// # 返回值
///
/// 完整独立的 HTML 文档字符串。
pub async fn make_index(bucket: &Bucket) -> Result<String, Error> {
    let mut entries = Vec::new();
    for key in bucket.list_keys(".whl").await? {
        let url = bucket.presign(&key).await?;
        entries.push(IndexEntry { key, url });
    }

    let handlebars = Handlebars::new();
    let html = handlebars.render_template(INDEX_TEMPLATE, &IndexPage { entries })?;
    Ok(html)
}
