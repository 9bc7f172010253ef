//! 单次生成的配置包
//!
//! 每次流水线调用都显式传入一份配置，不依赖任何包级共享默认值，
//! 多表并行处理时各表互不影响

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::naming::NameFn;
use crate::options::{CreateOp, FieldOption, FilterOp, ModifyOp};

/// 数据类型映射函数：完整原生类型 -> 生成类型
pub type TypeMapper = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// 数据类型映射表，键为小写基础类型名
pub type DataTypeMap = HashMap<String, TypeMapper>;

/// 单次生成的配置
///
/// 三个选项列表按操作类别保持各自的声明顺序，流水线运行期间只读
#[derive(Clone, Default)]
pub struct Config {
    /// 命名策略前拼接的表前缀
    pub table_prefix: String,
    /// 生成模型所在模块，关系字段类型会剔除该前缀避免自引用
    pub model_module: String,
    pub data_type_map: DataTypeMap,
    /// 可空列生成 `Option<T>`
    pub field_nullable: bool,
    /// 带默认值的列生成 `Option<T>`
    pub field_coverable: bool,
    /// unsigned 列使用无符号整型
    pub field_signable: bool,
    /// 为 false 时修改前从 ORM tag 中剔除原生 type 标注
    pub field_with_type_tag: bool,
    /// 字段名命名策略，None 时为恒等
    pub schema_name: Option<NameFn>,
    /// json tag 命名策略
    pub json_tag_ns: Option<NameFn>,
    /// 追加 tag 命名策略
    pub new_tag_ns: Option<NameFn>,
    pub filter_opts: Vec<FilterOp>,
    pub modify_opts: Vec<ModifyOp>,
    pub create_opts: Vec<CreateOp>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按操作类别分发选项，保持各类别内的声明顺序
    pub fn add_opts(&mut self, opts: impl IntoIterator<Item = FieldOption>) {
        for opt in opts {
            match opt {
                FieldOption::Filter(op) => self.filter_opts.push(op),
                FieldOption::Modify(op) => self.modify_opts.push(op),
                FieldOption::Create(op) => self.create_opts.push(op),
            }
        }
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_model_module(mut self, module: impl Into<String>) -> Self {
        self.model_module = module.into();
        self
    }

    pub fn with_schema_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.schema_name = Some(Arc::new(f));
        self
    }

    pub fn with_json_tag_ns<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.json_tag_ns = Some(Arc::new(f));
        self
    }

    pub fn with_new_tag_ns<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.new_tag_ns = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("table_prefix", &self.table_prefix)
            .field("model_module", &self.model_module)
            .field("data_type_map_keys", &{
                let mut keys: Vec<&str> = self.data_type_map.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys
            })
            .field("field_nullable", &self.field_nullable)
            .field("field_coverable", &self.field_coverable)
            .field("field_signable", &self.field_signable)
            .field("field_with_type_tag", &self.field_with_type_tag)
            .field("filter_opts", &self.filter_opts)
            .field("modify_opts", &self.modify_opts)
            .field("create_opts", &self.create_opts)
            .finish_non_exhaustive()
    }
}
