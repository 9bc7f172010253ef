//! 字段派生流水线：过滤 -> 修改 -> 命名策略，再追加新建字段
//!
//! 对同一份输入，输出顺序与内容逐字节可复现：派生字段按列序，
//! 新建字段按选项声明序，二者依次拼接

use log::debug;

use crate::column::Column;
use crate::config::Config;
use crate::error::Result;
use crate::field::Field;
use crate::naming::identity_ns;
use crate::options::{FilterOp, ModifyOp};

/// 按选项流水线为一张表派生字段列表
///
/// `table_name` 只参与日志与错误归属，不影响派生结果
pub fn generate_fields(conf: &Config, table_name: &str, columns: &[Column]) -> Result<Vec<Field>> {
    let mut fields = Vec::with_capacity(columns.len() + conf.create_opts.len());
    let schema_name = conf.schema_name.clone().unwrap_or_else(identity_ns);

    for col in columns {
        let mut col = col.clone();
        col.set_data_type_map(&conf.data_type_map);
        col.with_naming(conf.json_tag_ns.clone(), conf.new_tag_ns.clone());

        let m = col.to_field(conf.field_nullable, conf.field_coverable, conf.field_signable);

        let mut m = match filter_field(m, &conf.filter_opts) {
            Some(m) => m,
            None => {
                debug!(
                    "table {}: column {} removed by filter",
                    table_name,
                    col.column_name()
                );
                continue;
            }
        };

        // field_with_type_tag 关闭时剔除原生 type 标注，tag 与存储引擎解耦
        if !conf.field_with_type_tag {
            if let Some(t) = col.full_column_type() {
                m.orm_tag = m.orm_tag.replace(&format!(";type:{}", t), "");
            }
        }

        m = modify_field(m, &conf.modify_opts);

        // 命名策略在修改之后应用且只应用一次，修改操作看到的是策略前的名字
        m.name = schema_name(&format!("{}{}", conf.table_prefix, m.name));

        fields.push(m);
    }

    for op in &conf.create_opts {
        let mut m = op.build(table_name)?;
        if m.relation.is_some() && !conf.model_module.is_empty() {
            // 剔除本模块前缀，避免生成代码引用自身模块
            m.ty = m.ty.replace(&format!("{}::", conf.model_module), "");
        }
        debug!("table {}: created field {}", table_name, m.name);
        fields.push(m);
    }

    Ok(fields)
}

/// 按声明顺序过滤，第一个删除即短路，后续过滤不再执行
fn filter_field(mut m: Field, opts: &[FilterOp]) -> Option<Field> {
    for opt in opts {
        m = opt.apply(m)?;
    }
    Some(m)
}

/// 按声明顺序修改，每个操作接收上一个的输出
fn modify_field(mut m: Field, opts: &[ModifyOp]) -> Field {
    for opt in opts {
        m = opt.apply(m);
    }
    m
}
