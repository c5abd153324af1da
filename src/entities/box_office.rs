use sea_orm::entity::prelude::*;

/// Budget and revenue are in crore (10 million) INR.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Box_Office")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "Movie_ID")]
    pub movie_id: i32,
    #[sea_orm(column_name = "Budget_INR_Cr")]
    pub budget_inr_cr: Option<f64>,
    #[sea_orm(column_name = "Revenue_INR_Cr")]
    pub revenue_inr_cr: Option<f64>,
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
