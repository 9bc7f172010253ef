//! 模型间关系：关系类型、嵌套关系快照与目标结构描述

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::naming::{check_struct_name, to_snake_case};

/// 关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    HasOne,
    HasMany,
    BelongsTo,
    Many2Many,
}

impl RelationshipType {
    /// 集合类关系，生成 `Vec<T>` 字段
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::Many2Many)
    }
}

/// 嵌套关系快照的最大深度，互相引用的模型在此截断为回引节点
pub const MAX_RELATION_DEPTH: usize = 8;

/// 字段到另一模型的结构链接
///
/// `child_relations` 是链接时刻目标模型已解析关系的快照，
/// 不是活引用；本层不保证关系图无环
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub relationship: RelationshipType,
    pub field_name: String,
    /// 带模块前缀的完整类型名
    pub type_name: String,
    pub child_relations: Vec<Relation>,
}

impl Relation {
    pub fn new(
        relationship: RelationshipType,
        field_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            relationship,
            field_name: field_name.into(),
            type_name: type_name.into(),
            child_relations: Vec::new(),
        }
    }

    /// 追加目标模型已解析的子关系快照
    ///
    /// 深度超过 [`MAX_RELATION_DEPTH`] 的层级只保留类型名、清空子关系，
    /// 互相引用的模型因此不会被无限内联
    pub fn append_child_relations(&mut self, children: &[Relation]) {
        for child in children {
            self.child_relations.push(child.clone_capped(MAX_RELATION_DEPTH));
        }
    }

    fn clone_capped(&self, depth: usize) -> Relation {
        let child_relations = if depth <= 1 {
            // 回引节点：不再继续内联
            Vec::new()
        } else {
            self.child_relations
                .iter()
                .map(|c| c.clone_capped(depth - 1))
                .collect()
        };
        Relation {
            relationship: self.relationship,
            field_name: self.field_name.clone(),
            type_name: self.type_name.clone(),
            child_relations,
        }
    }
}

/// 关系字段的生成配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelateConfig {
    /// has-one / belongs-to 字段是否生成为 `Option<T>`
    pub pointer: bool,
    /// 缺省时取字段名的列名形式（snake_case）
    pub json_tag: String,
    pub orm_tag: String,
    pub new_tag: String,
    pub overwrite_tag: String,
}

impl RelateConfig {
    /// 依关系类型包装目标类型：集合关系 -> `Vec<T>`，指针配置 -> `Option<T>`
    pub fn wrap_type(&self, relationship: RelationshipType, type_name: &str) -> String {
        if relationship.is_collection() {
            format!("Vec<{}>", type_name)
        } else if self.pointer {
            format!("Option<{}>", type_name)
        } else {
            type_name.to_string()
        }
    }

    /// json tag，缺省取字段名而非目标类型名的列名形式
    pub fn json_tag_or_default(&self, field_name: &str) -> String {
        if self.json_tag.is_empty() {
            to_snake_case(field_name)
        } else {
            self.json_tag.clone()
        }
    }
}

/// 关系目标的结构描述接口
///
/// 同一生成批次中的模型（[`ModelMeta`]）与外部类型（[`ExternalType`]）
/// 统一经由它提供类型名与已解析的关系快照
pub trait RelationSource {
    /// 裸类型名，不含模块前缀
    fn type_name(&self) -> &str;
    /// 模块前缀，外部类型可为空
    fn module_path(&self) -> &str;
    /// 截至链接时刻已解析的关系快照
    fn relations(&self) -> &[Relation];

    /// 带模块前缀的完整类型名
    fn qualified_type_name(&self) -> String {
        if self.module_path().is_empty() {
            self.type_name().to_string()
        } else {
            format!("{}::{}", self.module_path(), self.type_name())
        }
    }
}

/// 关系目标句柄，Create 选项中持有
pub type RelationSourceHandle = Arc<dyn RelationSource + Send + Sync>;

/// 生成中的模型元信息
///
/// 跨表关系解析只读取它持有的关系快照，多个表之间互不共享可变状态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMeta {
    pub struct_name: String,
    pub module_path: String,
    pub relations: Vec<Relation>,
}

impl ModelMeta {
    /// 创建模型元信息，模型名须通过校验
    pub fn new(struct_name: impl Into<String>, module_path: impl Into<String>) -> Result<Self> {
        let struct_name = struct_name.into();
        check_struct_name(&struct_name)?;
        Ok(Self {
            struct_name,
            module_path: module_path.into(),
            relations: Vec::new(),
        })
    }

    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = relations;
        self
    }
}

impl RelationSource for ModelMeta {
    fn type_name(&self) -> &str {
        &self.struct_name
    }

    fn module_path(&self) -> &str {
        &self.module_path
    }

    fn relations(&self) -> &[Relation] {
        &self.relations
    }
}

/// 外部定义的关系目标类型，没有可解析的子关系
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalType {
    pub type_name: String,
    pub module_path: String,
}

impl ExternalType {
    pub fn new(type_name: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            module_path: module_path.into(),
        }
    }
}

impl RelationSource for ExternalType {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn module_path(&self) -> &str {
        &self.module_path
    }

    fn relations(&self) -> &[Relation] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== 类型包装测试 ==========
    #[test]
    fn test_wrap_type_collection() {
        let conf = RelateConfig::default();
        assert_eq!(
            conf.wrap_type(RelationshipType::HasMany, "User"),
            "Vec<User>"
        );
        assert_eq!(
            conf.wrap_type(RelationshipType::Many2Many, "Role"),
            "Vec<Role>"
        );
    }

    #[test]
    fn test_wrap_type_bare_and_pointer() {
        let bare = RelateConfig::default();
        assert_eq!(bare.wrap_type(RelationshipType::BelongsTo, "User"), "User");

        let pointer = RelateConfig {
            pointer: true,
            ..Default::default()
        };
        assert_eq!(
            pointer.wrap_type(RelationshipType::HasOne, "User"),
            "Option<User>"
        );
        // 集合关系不受 pointer 影响
        assert_eq!(
            pointer.wrap_type(RelationshipType::HasMany, "User"),
            "Vec<User>"
        );
    }

    #[test]
    fn test_json_tag_default_uses_field_name() {
        let conf = RelateConfig::default();
        assert_eq!(conf.json_tag_or_default("CreatedBy"), "created_by");

        let explicit = RelateConfig {
            json_tag: "creator".to_string(),
            ..Default::default()
        };
        assert_eq!(explicit.json_tag_or_default("CreatedBy"), "creator");
    }

    // ========== 关系快照测试 ==========
    #[test]
    fn test_append_child_relations_is_snapshot() {
        let mut parent = Relation::new(RelationshipType::HasOne, "Profile", "models::Profile");
        let children = vec![Relation::new(
            RelationshipType::BelongsTo,
            "User",
            "models::User",
        )];
        parent.append_child_relations(&children);
        assert_eq!(parent.child_relations.len(), 1);
        assert_eq!(parent.child_relations[0].type_name, "models::User");
    }

    #[test]
    fn test_child_relations_depth_capped() {
        // 自引用快照逐层加深，超过上限的层级应被清空
        let mut deep = Relation::new(RelationshipType::HasOne, "Parent", "Node");
        for _ in 0..(MAX_RELATION_DEPTH + 4) {
            let mut next = Relation::new(RelationshipType::HasOne, "Parent", "Node");
            next.child_relations.push(deep);
            deep = next;
        }

        let mut root = Relation::new(RelationshipType::HasOne, "Parent", "Node");
        root.append_child_relations(std::slice::from_ref(&deep));

        let mut depth = 0;
        let mut cur = &root.child_relations[0];
        while let Some(next) = cur.child_relations.first() {
            depth += 1;
            cur = next;
        }
        // 回引节点保留类型名但没有子关系
        assert_eq!(cur.type_name, "Node");
        assert!(depth < MAX_RELATION_DEPTH);
    }

    #[test]
    fn test_model_meta_name_validated() {
        assert!(ModelMeta::new("User", "models").is_ok());
        assert!(ModelMeta::new("user", "models").is_err());
    }

    #[test]
    fn test_qualified_type_name() {
        let meta = ModelMeta::new("User", "models").unwrap();
        assert_eq!(meta.qualified_type_name(), "models::User");

        let external = ExternalType::new("Clock", "");
        assert_eq!(external.qualified_type_name(), "Clock");
        assert!(external.relations().is_empty());
    }
}
