use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "Award")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Award_ID")]
    pub award_id: i32,
    #[sea_orm(column_name = "Movie_ID")]
    pub movie_id: i32,
    #[sea_orm(column_name = "Award_Name")]
    pub award_name: String,
    #[sea_orm(column_name = "Award_Year")]
    pub award_year: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::MovieId",
        on_delete = "Cascade"
    )]
    Movie,
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
