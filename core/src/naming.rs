//! 命名策略与模型名校验

use std::sync::Arc;

use crate::error::{GenError, Result};

/// 命名函数：原始标识符 -> 规范标识符
///
/// 命名策略作为能力注入，本身必须是纯函数且幂等：
/// 对已规范化的名字再应用一次应得到相同结果
pub type NameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// 恒等命名函数（未注入策略时的默认值）
pub fn identity_ns() -> NameFn {
    Arc::new(|name: &str| name.to_string())
}

/// 转换为 PascalCase
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// 转换为 snake_case（关系字段 json tag 的默认形式）
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// 校验生成的模型名是否为合法的导出结构体名
///
/// 空串表示使用默认名，直接放行；非空时只允许字母/数字/下划线，
/// 且首字符必须是大写 ASCII 字母
pub fn check_struct_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(GenError::Naming {
            name: name.to_string(),
            reason: "name cannot contain invalid character".to_string(),
        });
    }
    if !name.as_bytes()[0].is_ascii_uppercase() {
        return Err(GenError::Naming {
            name: name.to_string(),
            reason: "name must be initial capital".to_string(),
        });
    }
    Ok(())
}
