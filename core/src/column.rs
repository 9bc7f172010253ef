//! 列元信息模型与列到字段的标准派生

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DataTypeMap;
use crate::field::Field;
use crate::naming::NameFn;

/// 列的详细类型信息（长度/精度/键约束等）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnType {
    /// 完整的原生类型，如 `varchar(64)`
    pub full_type: Option<String>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
    pub default: Option<String>,
    pub length: Option<i64>,
    /// (precision, scale)
    pub precision: Option<(i64, i64)>,
}

/// 一张表中单个列的元信息
///
/// `column_name` 从数据库读出后不可变，是所有按列名匹配操作的连接键；
/// 流水线中除 [`Column::set_data_type_map`] / [`Column::with_naming`]
/// 两个注入步骤外只读
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Column {
    name: String,
    column_name: String,
    data_type: String,
    nullable: bool,
    comment: String,
    column_type: Option<ColumnType>,
    /// 类型映射表命中后解析出的类型，派生前缓存
    #[serde(skip)]
    mapped_type: Option<String>,
    #[serde(skip)]
    json_tag_ns: Option<NameFn>,
    #[serde(skip)]
    new_tag_ns: Option<NameFn>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("column_name", &self.column_name)
            .field("data_type", &self.data_type)
            .field("nullable", &self.nullable)
            .field("comment", &self.comment)
            .field("column_type", &self.column_type)
            .field("mapped_type", &self.mapped_type)
            .finish()
    }
}

impl Column {
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let column_name = column_name.into();
        Self {
            name: column_name.clone(),
            column_name,
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_column_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// 完整的原生列类型（如 `varchar(64)`），没有详细信息时为 None
    pub fn full_column_type(&self) -> Option<&str> {
        self.column_type.as_ref()?.full_type.as_deref()
    }

    fn default_value(&self) -> Option<&str> {
        self.column_type.as_ref()?.default.as_deref()
    }

    /// 用类型映射表解析该列的生成类型，派生字段前调用一次
    ///
    /// 映射表按原生类型的基础名（小写、去长度）命中，命中的映射函数
    /// 接收完整原生类型，可按精度等细节决定输出
    pub fn set_data_type_map(&mut self, map: &DataTypeMap) {
        let key = base_type_key(&self.data_type);
        if let Some(mapper) = map.get(&key) {
            let detail = self.full_column_type().unwrap_or(&self.data_type);
            self.mapped_type = Some(mapper(detail));
        }
    }

    /// 注入 json tag / new tag 的命名函数，派生字段前调用一次
    pub fn with_naming(&mut self, json_tag_ns: Option<NameFn>, new_tag_ns: Option<NameFn>) {
        self.json_tag_ns = json_tag_ns;
        self.new_tag_ns = new_tag_ns;
    }

    /// 列到字段的标准派生
    ///
    /// - `nullable`：可空列生成 `Option<T>`
    /// - `coverable`：带默认值的列同样生成 `Option<T>`，插入时可不赋值
    /// - `signable`：原生类型带 unsigned 标记时使用无符号整型
    pub fn to_field(&self, nullable: bool, coverable: bool, signable: bool) -> Field {
        let base = match &self.mapped_type {
            Some(t) => t.clone(),
            None => self.default_rust_type(signable),
        };
        let needs_option =
            (nullable && self.nullable) || (coverable && self.default_value().is_some());
        let ty = if needs_option {
            format!("Option<{}>", base)
        } else {
            base
        };

        Field {
            name: self.name.clone(),
            ty,
            column_name: self.column_name.clone(),
            json_tag: match &self.json_tag_ns {
                Some(ns) => ns(&self.column_name),
                None => self.column_name.clone(),
            },
            new_tag: match &self.new_tag_ns {
                Some(ns) => ns(&self.column_name),
                None => String::new(),
            },
            orm_tag: self.orm_tag(),
            comment: self.comment.clone(),
            multiline_comment: self.comment.contains('\n'),
            ..Default::default()
        }
    }

    /// 合成 ORM tag，分段顺序固定以保证逐字节可复现
    fn orm_tag(&self) -> String {
        let mut segs = vec![format!("column:{}", self.column_name)];
        if let Some(ct) = &self.column_type {
            if let Some(full) = &ct.full_type {
                segs.push(format!("type:{}", full));
            }
            if ct.primary_key {
                segs.push("primaryKey".to_string());
            }
            if ct.auto_increment {
                segs.push("autoIncrement".to_string());
            }
            if ct.unique {
                segs.push("unique".to_string());
            }
        }
        if !self.nullable {
            segs.push("not null".to_string());
        }
        if let Some(default) = self.default_value() {
            segs.push(format!("default:{}", default));
        }
        if !self.comment.is_empty() {
            segs.push(format!("comment:{}", self.comment));
        }
        segs.join(";")
    }

    /// SQL 类型到 Rust 类型的内置映射，类型映射表未命中时的兜底
    fn default_rust_type(&self, signable: bool) -> String {
        let raw = self.full_column_type().unwrap_or(&self.data_type);

        // MySQL 的 TINYINT(1) 约定为布尔
        if raw.to_uppercase().starts_with("TINYINT(1)") {
            return "bool".to_string();
        }

        let normalized = normalize_sql_type(raw);
        let unsigned = signable && normalized.contains("UNSIGNED");
        let base = normalized.replace(" UNSIGNED", "");

        let ty = match base.as_str() {
            // 整数类型
            "BIGINT" | "BIGSERIAL" => {
                if unsigned {
                    "u64"
                } else {
                    "i64"
                }
            }
            "INT" | "INTEGER" | "INT4" | "SERIAL" | "MEDIUMINT" => {
                if unsigned {
                    "u32"
                } else {
                    "i32"
                }
            }
            "SMALLINT" | "INT2" | "SMALLSERIAL" | "TINYINT" => {
                if unsigned {
                    "u16"
                } else {
                    "i16"
                }
            }
            // 字符串类型
            "VARCHAR" | "TEXT" | "CHAR" | "CHARACTER VARYING" | "CHARACTER" | "LONGTEXT"
            | "MEDIUMTEXT" | "TINYTEXT" | "NVARCHAR" | "NCHAR" => "String",
            // 数值类型
            "DECIMAL" | "NUMERIC" | "DOUBLE PRECISION" | "DOUBLE" | "MONEY" => "f64",
            "FLOAT" | "FLOAT4" | "REAL" => "f32",
            // 布尔类型
            "BOOLEAN" | "BOOL" | "BIT" => "bool",
            // 日期时间类型
            "DATE" => "chrono::NaiveDate",
            "TIME" | "TIME WITHOUT TIME ZONE" => "chrono::NaiveTime",
            "DATETIME" | "TIMESTAMP WITHOUT TIME ZONE" => "chrono::NaiveDateTime",
            "TIMESTAMP" | "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => {
                "chrono::DateTime<chrono::Utc>"
            }
            // 二进制类型
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" | "LONGBLOB" | "MEDIUMBLOB" | "TINYBLOB" => {
                "Vec<u8>"
            }
            // JSON 类型
            "JSON" | "JSONB" => "serde_json::Value",
            "UUID" => "uuid::Uuid",
            // 默认类型
            _ => "String",
        };
        ty.to_string()
    }
}

/// 类型映射表的键：小写、去掉长度与 unsigned 修饰的基础类型名
fn base_type_key(data_type: &str) -> String {
    normalize_sql_type(data_type)
        .replace(" UNSIGNED", "")
        .to_lowercase()
}

/// 规范化原生类型：去掉括号内容、折叠空白、统一大写
fn normalize_sql_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c.to_ascii_uppercase()),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Arc;

    use crate::config::TypeMapper;

    // ========== 标准派生测试 ==========
    #[test]
    fn test_to_field_defaults() {
        let col = Column::new("user_name", "varchar");
        let field = col.to_field(false, false, false);
        assert_eq!(field.name, "user_name");
        assert_eq!(field.column_name, "user_name");
        assert_eq!(field.ty, "String");
        assert_eq!(field.json_tag, "user_name");
        assert_eq!(field.orm_tag, "column:user_name;not null");
        assert!(field.relation.is_none());
        assert!(!field.is_synthetic());
    }

    #[test]
    fn test_to_field_nullable_flag() {
        let col = Column::new("deleted_at", "datetime").with_nullable(true);
        // 标志关闭时不包 Option
        assert_eq!(col.to_field(false, false, false).ty, "chrono::NaiveDateTime");
        assert_eq!(
            col.to_field(true, false, false).ty,
            "Option<chrono::NaiveDateTime>"
        );
    }

    #[test]
    fn test_to_field_coverable_default_value() {
        let col = Column::new("status", "int").with_column_type(ColumnType {
            default: Some("1".to_string()),
            ..Default::default()
        });
        assert_eq!(col.to_field(false, false, false).ty, "i32");
        assert_eq!(col.to_field(false, true, false).ty, "Option<i32>");
    }

    #[test]
    fn test_to_field_signable_unsigned() {
        let col = Column::new("age", "int unsigned");
        assert_eq!(col.to_field(false, false, false).ty, "i32");
        assert_eq!(col.to_field(false, false, true).ty, "u32");
    }

    #[test]
    fn test_to_field_tinyint1_is_bool() {
        let col = Column::new("enabled", "tinyint").with_column_type(ColumnType {
            full_type: Some("tinyint(1)".to_string()),
            ..Default::default()
        });
        assert_eq!(col.to_field(false, false, false).ty, "bool");
    }

    #[test]
    fn test_data_type_map_overrides_default() {
        let mut map: DataTypeMap = HashMap::new();
        let mapper: TypeMapper = Arc::new(|detail: &str| {
            if detail.contains("(64)") {
                "SmolStr".to_string()
            } else {
                "String".to_string()
            }
        });
        map.insert("varchar".to_string(), mapper);

        let mut col = Column::new("nickname", "varchar").with_column_type(ColumnType {
            full_type: Some("varchar(64)".to_string()),
            ..Default::default()
        });
        col.set_data_type_map(&map);
        assert_eq!(col.to_field(false, false, false).ty, "SmolStr");
    }

    #[test]
    fn test_orm_tag_segments_in_order() {
        let col = Column::new("id", "bigint")
            .with_comment("主键")
            .with_column_type(ColumnType {
                full_type: Some("bigint(20)".to_string()),
                primary_key: true,
                auto_increment: true,
                ..Default::default()
            });
        assert_eq!(
            col.to_field(false, false, false).orm_tag,
            "column:id;type:bigint(20);primaryKey;autoIncrement;not null;comment:主键"
        );
    }

    #[test]
    fn test_with_naming_changes_tags() {
        let mut col = Column::new("user_name", "varchar");
        col.with_naming(
            Some(Arc::new(|name: &str| format!("{}_json", name))),
            Some(Arc::new(|name: &str| format!(r#"bson:"{}""#, name))),
        );
        let field = col.to_field(false, false, false);
        assert_eq!(field.json_tag, "user_name_json");
        assert_eq!(field.new_tag, r#"bson:"user_name""#);
    }

    #[test]
    fn test_normalize_sql_type() {
        assert_eq!(normalize_sql_type("int(10) unsigned"), "INT UNSIGNED");
        assert_eq!(normalize_sql_type("varchar(255)"), "VARCHAR");
        assert_eq!(base_type_key("VARCHAR(255)"), "varchar");
        assert_eq!(base_type_key("int(10) unsigned"), "int");
    }
}
