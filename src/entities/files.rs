use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    /// 24-char lowercase hex object id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub original_name: String,
    pub encrypted_file_name: String,
    pub extension: String,
    pub encryption_key: Option<String>,
    pub iv: Option<String>,
    pub file_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
