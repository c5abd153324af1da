use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "Movies")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "Movie_ID")]
    pub movie_id: i32,
    #[sea_orm(column_name = "Title_English")]
    pub title_english: String,
    #[sea_orm(column_name = "Release_Year")]
    pub release_year: i32,
    #[sea_orm(column_name = "Duration_Min")]
    pub duration_min: Option<i32>,
    #[sea_orm(column_name = "IMDB_Rating")]
    pub imdb_rating: Option<f64>,
    #[sea_orm(column_name = "Plot_Summary", column_type = "Text", nullable)]
    pub plot_summary: Option<String>,
    #[sea_orm(column_name = "Industry_ID")]
    pub industry_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::industry::Entity",
        from = "Column::IndustryId",
        to = "super::industry::Column::IndustryId"
    )]
    Industry,
    #[sea_orm(has_one = "super::box_office::Entity")]
    BoxOffice,
    #[sea_orm(has_many = "super::movie_genre::Entity")]
    MovieGenre,
    #[sea_orm(has_many = "super::movie_person_role::Entity")]
    MoviePersonRole,
    #[sea_orm(has_many = "super::award::Entity")]
    Award,
}

impl Related<super::industry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Industry.def()
    }
}

impl Related<super::box_office::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoxOffice.def()
    }
}

impl Related<super::award::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Award.def()
    }
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genre::Relation::Genre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genre::Relation::Movie.def().rev())
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_person_role::Relation::Person.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_person_role::Relation::Movie.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
