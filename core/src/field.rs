//! 字段描述模型：生成结构体中的一个成员

use serde::{Deserialize, Serialize};

use crate::relation::Relation;

/// 生成模型中的一个字段
///
/// 字段要么由某个列派生（`column_name` 非空），要么由 Create 选项合成
/// （`column_name` 为空）；合成字段不参与任何按列名匹配的过滤/修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// 最终的字段标识符
    pub name: String,
    /// 类型表达式（可能是关系包装后的类型，如 `Vec<User>`）
    pub ty: String,
    /// 来源列名，合成字段为空
    pub column_name: String,
    /// 序列化 tag
    pub json_tag: String,
    /// ORM tag（`column:...;type:...` 形式的分段文本）
    pub orm_tag: String,
    /// 追加 tag 的累加器
    pub new_tag: String,
    /// 非空时整体覆盖其余 tag
    pub overwrite_tag: String,
    pub comment: String,
    pub multiline_comment: bool,
    /// 生成器专用的类型提示
    pub custom_gen_type: Option<String>,
    /// 关系字段的结构链接
    pub relation: Option<Relation>,
}

impl Field {
    /// 是否为 Create 选项合成的字段
    pub fn is_synthetic(&self) -> bool {
        self.column_name.is_empty()
    }

    /// 最终渲染的 tag 文本，逐字节稳定
    ///
    /// `overwrite_tag` 非空时原样覆盖其他所有 tag
    pub fn tag_string(&self) -> String {
        if !self.overwrite_tag.is_empty() {
            return self.overwrite_tag.clone();
        }
        let mut tag = format!(r#"orm:"{}" json:"{}""#, self.orm_tag, self.json_tag);
        if !self.new_tag.trim().is_empty() {
            tag.push(' ');
            tag.push_str(self.new_tag.trim_start());
        }
        tag
    }
}
