use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Person")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Person_ID")]
    pub person_id: i32,
    #[sea_orm(column_name = "Name", unique)]
    pub name: String,
    // Role recorded when the person was first credited.
    #[sea_orm(column_name = "Role_Type")]
    pub role_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_person_role::Entity")]
    MoviePersonRole,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_person_role::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_person_role::Relation::Person.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
