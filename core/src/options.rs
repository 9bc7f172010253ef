//! 字段选项：过滤 / 修改 / 新建 三类操作的显式标签化表示
//!
//! 每个变体把捕获的参数作为普通数据携带，可以单独记录日志与测试；
//! 三类操作互不相交，流水线按声明顺序分别执行

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{GenError, Result};
use crate::field::Field;
use crate::naming::{identity_ns, NameFn};
use crate::relation::{RelateConfig, Relation, RelationSourceHandle, RelationshipType};

/// 自定义过滤函数，返回 None 表示删除该字段
pub type FilterFn = Arc<dyn Fn(Field) -> Option<Field> + Send + Sync>;
/// 自定义修改函数，只转换不删除
pub type ModifyFn = Arc<dyn Fn(Field) -> Field + Send + Sync>;

/// 字段选项：三类操作之一
#[derive(Debug, Clone)]
pub enum FieldOption {
    /// 可能删除字段
    Filter(FilterOp),
    /// 只转换字段
    Modify(ModifyOp),
    /// 凭空合成字段
    Create(CreateOp),
}

/// 过滤操作
#[derive(Clone)]
pub enum FilterOp {
    /// 按列名忽略
    IgnoreColumns(Vec<String>),
    /// 按正则忽略
    IgnorePatterns(Vec<Regex>),
    /// 自定义过滤
    Custom(FilterFn),
}

impl FilterOp {
    /// 应用过滤，返回 None 表示字段被删除
    pub fn apply(&self, field: Field) -> Option<Field> {
        match self {
            Self::IgnoreColumns(names) => {
                if names.iter().any(|n| field.column_name == *n) {
                    None
                } else {
                    Some(field)
                }
            }
            Self::IgnorePatterns(patterns) => {
                if patterns.iter().any(|p| p.is_match(&field.column_name)) {
                    None
                } else {
                    Some(field)
                }
            }
            Self::Custom(f) => f(field),
        }
    }
}

impl fmt::Debug for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IgnoreColumns(names) => f.debug_tuple("IgnoreColumns").field(names).finish(),
            Self::IgnorePatterns(patterns) => f
                .debug_tuple("IgnorePatterns")
                .field(&patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// 修改操作
///
/// 按列名匹配的变体在不匹配时原样返回字段，不视为错误
#[derive(Clone)]
pub enum ModifyOp {
    /// 重命名字段
    Rename { column: String, new_name: String },
    /// 指定字段类型
    SetType { column: String, new_type: String },
    /// 按正则指定字段类型
    SetTypeByPattern { pattern: Regex, new_type: String },
    /// 指定字段注释
    SetComment { column: String, comment: String },
    /// 指定生成器专用类型提示
    SetGenType { column: String, gen_type: String },
    /// 按正则指定生成器专用类型提示
    SetGenTypeByPattern { pattern: Regex, gen_type: String },
    /// 同时指定 ORM tag 和 json tag
    SetTag {
        column: String,
        orm_tag: String,
        json_tag: String,
    },
    /// 指定 json tag
    SetJsonTag { column: String, json_tag: String },
    /// 用命名函数重写所有字段的 json tag
    JsonTagWithNamer(NameFn),
    /// 指定 ORM tag
    SetOrmTag { column: String, orm_tag: String },
    /// 追加 tag
    AppendNewTag { column: String, tag: String },
    /// 用命名函数为所有字段追加 tag
    NewTagWithNamer { tag_name: String, namer: NameFn },
    /// 去掉字段名前缀
    TrimPrefix(String),
    /// 去掉字段名后缀
    TrimSuffix(String),
    /// 添加字段名前缀
    AddPrefix(String),
    /// 添加字段名后缀
    AddSuffix(String),
    /// 自定义修改
    Custom(ModifyFn),
}

impl ModifyOp {
    /// 应用修改，总是返回一个字段
    pub fn apply(&self, mut field: Field) -> Field {
        match self {
            Self::Rename { column, new_name } => {
                if field.column_name == *column {
                    field.name = new_name.clone();
                }
            }
            Self::SetType { column, new_type } => {
                if field.column_name == *column {
                    field.ty = new_type.clone();
                }
            }
            Self::SetTypeByPattern { pattern, new_type } => {
                if pattern.is_match(&field.column_name) {
                    field.ty = new_type.clone();
                }
            }
            Self::SetComment { column, comment } => {
                if field.column_name == *column {
                    field.comment = comment.clone();
                    field.multiline_comment = comment.contains('\n');
                }
            }
            Self::SetGenType { column, gen_type } => {
                if field.column_name == *column {
                    field.custom_gen_type = Some(gen_type.clone());
                }
            }
            Self::SetGenTypeByPattern { pattern, gen_type } => {
                if pattern.is_match(&field.column_name) {
                    field.custom_gen_type = Some(gen_type.clone());
                }
            }
            Self::SetTag {
                column,
                orm_tag,
                json_tag,
            } => {
                if field.column_name == *column {
                    field.orm_tag = orm_tag.clone();
                    field.json_tag = json_tag.clone();
                }
            }
            Self::SetJsonTag { column, json_tag } => {
                if field.column_name == *column {
                    field.json_tag = json_tag.clone();
                }
            }
            Self::JsonTagWithNamer(namer) => {
                field.json_tag = namer(&field.column_name);
            }
            Self::SetOrmTag { column, orm_tag } => {
                if field.column_name == *column {
                    field.orm_tag = orm_tag.clone();
                }
            }
            Self::AppendNewTag { column, tag } => {
                if field.column_name == *column {
                    field.new_tag.push(' ');
                    field.new_tag.push_str(tag);
                }
            }
            Self::NewTagWithNamer { tag_name, namer } => {
                let value = namer(&field.column_name);
                field.new_tag = format!(r#"{} {}:"{}""#, field.new_tag, tag_name, value);
            }
            Self::TrimPrefix(prefix) => {
                if let Some(rest) = field.name.strip_prefix(prefix.as_str()) {
                    field.name = rest.to_string();
                }
            }
            Self::TrimSuffix(suffix) => {
                if let Some(rest) = field.name.strip_suffix(suffix.as_str()) {
                    field.name = rest.to_string();
                }
            }
            Self::AddPrefix(prefix) => {
                field.name = format!("{}{}", prefix, field.name);
            }
            Self::AddSuffix(suffix) => {
                field.name.push_str(suffix);
            }
            Self::Custom(f) => return f(field),
        }
        field
    }
}

impl fmt::Debug for ModifyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename { column, new_name } => f
                .debug_struct("Rename")
                .field("column", column)
                .field("new_name", new_name)
                .finish(),
            Self::SetType { column, new_type } => f
                .debug_struct("SetType")
                .field("column", column)
                .field("new_type", new_type)
                .finish(),
            Self::SetTypeByPattern { pattern, new_type } => f
                .debug_struct("SetTypeByPattern")
                .field("pattern", &pattern.as_str())
                .field("new_type", new_type)
                .finish(),
            Self::SetComment { column, comment } => f
                .debug_struct("SetComment")
                .field("column", column)
                .field("comment", comment)
                .finish(),
            Self::SetGenType { column, gen_type } => f
                .debug_struct("SetGenType")
                .field("column", column)
                .field("gen_type", gen_type)
                .finish(),
            Self::SetGenTypeByPattern { pattern, gen_type } => f
                .debug_struct("SetGenTypeByPattern")
                .field("pattern", &pattern.as_str())
                .field("gen_type", gen_type)
                .finish(),
            Self::SetTag {
                column,
                orm_tag,
                json_tag,
            } => f
                .debug_struct("SetTag")
                .field("column", column)
                .field("orm_tag", orm_tag)
                .field("json_tag", json_tag)
                .finish(),
            Self::SetJsonTag { column, json_tag } => f
                .debug_struct("SetJsonTag")
                .field("column", column)
                .field("json_tag", json_tag)
                .finish(),
            Self::JsonTagWithNamer(_) => f.write_str("JsonTagWithNamer(..)"),
            Self::SetOrmTag { column, orm_tag } => f
                .debug_struct("SetOrmTag")
                .field("column", column)
                .field("orm_tag", orm_tag)
                .finish(),
            Self::AppendNewTag { column, tag } => f
                .debug_struct("AppendNewTag")
                .field("column", column)
                .field("tag", tag)
                .finish(),
            Self::NewTagWithNamer { tag_name, .. } => f
                .debug_struct("NewTagWithNamer")
                .field("tag_name", tag_name)
                .finish_non_exhaustive(),
            Self::TrimPrefix(prefix) => f.debug_tuple("TrimPrefix").field(prefix).finish(),
            Self::TrimSuffix(suffix) => f.debug_tuple("TrimSuffix").field(suffix).finish(),
            Self::AddPrefix(prefix) => f.debug_tuple("AddPrefix").field(prefix).finish(),
            Self::AddSuffix(suffix) => f.debug_tuple("AddSuffix").field(suffix).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// 新建操作，不读取任何既有状态，总是产出恰好一个字段
#[derive(Clone)]
pub enum CreateOp {
    /// 新增任意字段，tag 整体由调用方给出
    New {
        name: String,
        ty: String,
        overwrite_tag: String,
    },
    /// 新增关系字段，链接到另一个模型
    Relate {
        relationship: RelationshipType,
        field_name: String,
        target: RelationSourceHandle,
        config: RelateConfig,
    },
}

impl CreateOp {
    /// 构造完整字段；合成字段不再经过过滤/修改/命名策略
    ///
    /// `table_name` 仅用于错误归属
    pub fn build(&self, table_name: &str) -> Result<Field> {
        match self {
            Self::New {
                name,
                ty,
                overwrite_tag,
            } => Ok(Field {
                name: name.clone(),
                ty: ty.clone(),
                overwrite_tag: overwrite_tag.clone(),
                ..Default::default()
            }),
            Self::Relate {
                relationship,
                field_name,
                target,
                config,
            } => {
                if target.type_name().is_empty() {
                    return Err(GenError::RelationResolution {
                        table: table_name.to_string(),
                        field: field_name.clone(),
                        detail: "relation target has no type name".to_string(),
                    });
                }
                let type_name = target.qualified_type_name();
                let mut relation =
                    Relation::new(*relationship, field_name.clone(), type_name.clone());
                relation.append_child_relations(target.relations());
                Ok(Field {
                    name: field_name.clone(),
                    ty: config.wrap_type(*relationship, &type_name),
                    json_tag: config.json_tag_or_default(field_name),
                    orm_tag: config.orm_tag.clone(),
                    new_tag: config.new_tag.clone(),
                    overwrite_tag: config.overwrite_tag.clone(),
                    relation: Some(relation),
                    ..Default::default()
                })
            }
        }
    }
}

impl fmt::Debug for CreateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New { name, ty, .. } => f
                .debug_struct("New")
                .field("name", name)
                .field("ty", ty)
                .finish_non_exhaustive(),
            Self::Relate {
                relationship,
                field_name,
                target,
                ..
            } => f
                .debug_struct("Relate")
                .field("relationship", relationship)
                .field("field_name", field_name)
                .field("target", &target.type_name())
                .finish_non_exhaustive(),
        }
    }
}

/// 选项构造入口，调用方不直接拼写变体
impl FieldOption {
    /// 按列名忽略若干列
    pub fn ignore<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Filter(FilterOp::IgnoreColumns(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    /// 按正则忽略列，正则非法时报错
    pub fn ignore_reg<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for p in patterns {
            let p = p.as_ref();
            compiled.push(Regex::new(p).map_err(|source| GenError::InvalidPattern {
                pattern: p.to_string(),
                source,
            })?);
        }
        Ok(Self::Filter(FilterOp::IgnorePatterns(compiled)))
    }

    /// 自定义过滤
    pub fn filter_with<F>(f: F) -> Self
    where
        F: Fn(Field) -> Option<Field> + Send + Sync + 'static,
    {
        Self::Filter(FilterOp::Custom(Arc::new(f)))
    }

    /// 重命名字段
    pub fn rename(column: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::Rename {
            column: column.into(),
            new_name: new_name.into(),
        })
    }

    /// 指定字段类型
    pub fn retype(column: impl Into<String>, new_type: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::SetType {
            column: column.into(),
            new_type: new_type.into(),
        })
    }

    /// 按正则指定字段类型
    pub fn retype_reg(pattern: &str, new_type: impl Into<String>) -> Result<Self> {
        Ok(Self::Modify(ModifyOp::SetTypeByPattern {
            pattern: compile_pattern(pattern)?,
            new_type: new_type.into(),
        }))
    }

    /// 指定字段注释
    pub fn comment(column: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::SetComment {
            column: column.into(),
            comment: comment.into(),
        })
    }

    /// 指定生成器专用类型提示
    pub fn gen_type(column: impl Into<String>, gen_type: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::SetGenType {
            column: column.into(),
            gen_type: gen_type.into(),
        })
    }

    /// 按正则指定生成器专用类型提示
    pub fn gen_type_reg(pattern: &str, gen_type: impl Into<String>) -> Result<Self> {
        Ok(Self::Modify(ModifyOp::SetGenTypeByPattern {
            pattern: compile_pattern(pattern)?,
            gen_type: gen_type.into(),
        }))
    }

    /// 同时指定 ORM tag 和 json tag
    pub fn tag(
        column: impl Into<String>,
        orm_tag: impl Into<String>,
        json_tag: impl Into<String>,
    ) -> Self {
        Self::Modify(ModifyOp::SetTag {
            column: column.into(),
            orm_tag: orm_tag.into(),
            json_tag: json_tag.into(),
        })
    }

    /// 指定 json tag
    pub fn json_tag(column: impl Into<String>, json_tag: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::SetJsonTag {
            column: column.into(),
            json_tag: json_tag.into(),
        })
    }

    /// 用命名函数重写所有字段的 json tag
    pub fn json_tag_with_ns<F>(namer: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Modify(ModifyOp::JsonTagWithNamer(Arc::new(namer)))
    }

    /// 指定 ORM tag
    pub fn orm_tag(column: impl Into<String>, orm_tag: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::SetOrmTag {
            column: column.into(),
            orm_tag: orm_tag.into(),
        })
    }

    /// 追加 tag
    pub fn new_tag(column: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::AppendNewTag {
            column: column.into(),
            tag: tag.into(),
        })
    }

    /// 用命名函数为所有字段追加 `tag_name:"..."` tag，未提供命名函数时用列名原文
    pub fn new_tag_with_ns(tag_name: impl Into<String>, namer: Option<NameFn>) -> Self {
        Self::Modify(ModifyOp::NewTagWithNamer {
            tag_name: tag_name.into(),
            namer: namer.unwrap_or_else(identity_ns),
        })
    }

    /// 去掉字段名前缀
    pub fn trim_prefix(prefix: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::TrimPrefix(prefix.into()))
    }

    /// 去掉字段名后缀
    pub fn trim_suffix(suffix: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::TrimSuffix(suffix.into()))
    }

    /// 添加字段名前缀
    pub fn add_prefix(prefix: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::AddPrefix(prefix.into()))
    }

    /// 添加字段名后缀
    pub fn add_suffix(suffix: impl Into<String>) -> Self {
        Self::Modify(ModifyOp::AddSuffix(suffix.into()))
    }

    /// 自定义修改
    pub fn modify_with<F>(f: F) -> Self
    where
        F: Fn(Field) -> Field + Send + Sync + 'static,
    {
        Self::Modify(ModifyOp::Custom(Arc::new(f)))
    }

    /// 新增任意字段
    pub fn new_field(
        name: impl Into<String>,
        ty: impl Into<String>,
        overwrite_tag: impl Into<String>,
    ) -> Self {
        Self::Create(CreateOp::New {
            name: name.into(),
            ty: ty.into(),
            overwrite_tag: overwrite_tag.into(),
        })
    }

    /// 新增关系字段
    ///
    /// 目标可以是同批生成的模型快照，也可以是外部类型适配器
    pub fn relate(
        relationship: RelationshipType,
        field_name: impl Into<String>,
        target: RelationSourceHandle,
        config: Option<RelateConfig>,
    ) -> Self {
        Self::Create(CreateOp::Relate {
            relationship,
            field_name: field_name.into(),
            target,
            config: config.unwrap_or_default(),
        })
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| GenError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
