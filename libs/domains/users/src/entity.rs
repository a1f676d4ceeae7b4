use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the users table
///
/// Column widths and defaults mirror the latest migration so the table can
/// also be created straight from this definition.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(400))")]
    pub name: String,
    #[sea_orm(default_value = 0)]
    pub age: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))", unique)]
    pub email: String,
    #[sea_orm(default_expr = "Expr::current_date()")]
    pub birth_date: Date,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            email: model.email,
            birth_date: model.birth_date,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
