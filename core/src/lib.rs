pub mod column;
pub mod config;
pub mod error;
pub mod field;
pub mod generate;
pub mod naming;
pub mod options;
pub mod relation;

pub use column::{Column, ColumnType};
pub use config::{Config, DataTypeMap, TypeMapper};
pub use error::{GenError, Result};
pub use field::Field;
pub use generate::generate_fields;
pub use naming::{check_struct_name, to_pascal_case, to_snake_case, NameFn};
pub use options::{CreateOp, FieldOption, FilterOp, ModifyOp};
pub use relation::{
    ExternalType, ModelMeta, RelateConfig, Relation, RelationSource, RelationSourceHandle,
    RelationshipType,
};
