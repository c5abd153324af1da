use sea_orm_migration::{prelude::*, schema::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Industry::Table)
                    .if_not_exists()
                    .col(pk_auto(Industry::IndustryId))
                    .col(string_uniq(Industry::IndustryName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::MovieId))
                    .col(string(Movies::TitleEnglish))
                    .col(integer(Movies::ReleaseYear))
                    .col(integer_null(Movies::DurationMin))
                    .col(double_null(Movies::ImdbRating))
                    .col(text_null(Movies::PlotSummary))
                    .col(integer(Movies::IndustryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movies_industry")
                            .from(Movies::Table, Movies::IndustryId)
                            .to(Industry::Table, Industry::IndustryId)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_release_year")
                    .table(Movies::Table)
                    .col(Movies::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BoxOffice::Table)
                    .if_not_exists()
                    .col(integer(BoxOffice::MovieId).primary_key())
                    .col(double_null(BoxOffice::BudgetInrCr))
                    .col(double_null(BoxOffice::RevenueInrCr))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_box_office_movie")
                            .from(BoxOffice::Table, BoxOffice::MovieId)
                            .to(Movies::Table, Movies::MovieId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(pk_auto(Genre::GenreId))
                    .col(unique_name(manager, Genre::GenreName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenre::Table)
                    .if_not_exists()
                    .col(integer(MovieGenre::MovieId))
                    .col(integer(MovieGenre::GenreId))
                    .primary_key(Index::create().col(MovieGenre::MovieId).col(MovieGenre::GenreId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_movie")
                            .from(MovieGenre::Table, MovieGenre::MovieId)
                            .to(Movies::Table, Movies::MovieId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_genre_genre")
                            .from(MovieGenre::Table, MovieGenre::GenreId)
                            .to(Genre::Table, Genre::GenreId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .if_not_exists()
                    .col(pk_auto(Person::PersonId))
                    .col(unique_name(manager, Person::Name))
                    .col(string_null(Person::RoleType))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviePersonRole::Table)
                    .if_not_exists()
                    .col(integer(MoviePersonRole::MovieId))
                    .col(integer(MoviePersonRole::PersonId))
                    .col(string(MoviePersonRole::RoleDescription))
                    .primary_key(
                        Index::create()
                            .col(MoviePersonRole::MovieId)
                            .col(MoviePersonRole::PersonId)
                            .col(MoviePersonRole::RoleDescription),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_person_role_movie")
                            .from(MoviePersonRole::Table, MoviePersonRole::MovieId)
                            .to(Movies::Table, Movies::MovieId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_person_role_person")
                            .from(MoviePersonRole::Table, MoviePersonRole::PersonId)
                            .to(Person::Table, Person::PersonId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_person_role_person")
                    .table(MoviePersonRole::Table)
                    .col(MoviePersonRole::PersonId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Award::Table)
                    .if_not_exists()
                    .col(pk_auto(Award::AwardId))
                    .col(integer(Award::MovieId))
                    .col(string(Award::AwardName))
                    .col(integer_null(Award::AwardYear))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_award_movie")
                            .from(Award::Table, Award::MovieId)
                            .to(Movies::Table, Movies::MovieId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_award_movie")
                    .table(Award::Table)
                    .col(Award::MovieId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Award::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MoviePersonRole::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Person::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(BoxOffice::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Industry::Table).to_owned()).await?;
        Ok(())
    }
}

/// Names compare case-insensitively, as they do under MySQL's default collation.
fn unique_name<T: IntoIden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut def = string_uniq(col);
    if manager.get_database_backend() == DatabaseBackend::Sqlite {
        def.extra("COLLATE NOCASE");
    }
    def
}

#[derive(DeriveIden)]
enum Industry {
    #[sea_orm(iden = "Industry")]
    Table,
    #[sea_orm(iden = "Industry_ID")]
    IndustryId,
    #[sea_orm(iden = "Industry_Name")]
    IndustryName,
}

#[derive(DeriveIden)]
enum Movies {
    #[sea_orm(iden = "Movies")]
    Table,
    #[sea_orm(iden = "Movie_ID")]
    MovieId,
    #[sea_orm(iden = "Title_English")]
    TitleEnglish,
    #[sea_orm(iden = "Release_Year")]
    ReleaseYear,
    #[sea_orm(iden = "Duration_Min")]
    DurationMin,
    #[sea_orm(iden = "IMDB_Rating")]
    ImdbRating,
    #[sea_orm(iden = "Plot_Summary")]
    PlotSummary,
    #[sea_orm(iden = "Industry_ID")]
    IndustryId,
}

#[derive(DeriveIden)]
enum BoxOffice {
    #[sea_orm(iden = "Box_Office")]
    Table,
    #[sea_orm(iden = "Movie_ID")]
    MovieId,
    #[sea_orm(iden = "Budget_INR_Cr")]
    BudgetInrCr,
    #[sea_orm(iden = "Revenue_INR_Cr")]
    RevenueInrCr,
}

#[derive(DeriveIden)]
enum Genre {
    #[sea_orm(iden = "Genre")]
    Table,
    #[sea_orm(iden = "Genre_ID")]
    GenreId,
    #[sea_orm(iden = "Genre_Name")]
    GenreName,
}

#[derive(DeriveIden)]
enum MovieGenre {
    #[sea_orm(iden = "Movie_Genre")]
    Table,
    #[sea_orm(iden = "Movie_ID")]
    MovieId,
    #[sea_orm(iden = "Genre_ID")]
    GenreId,
}

#[derive(DeriveIden)]
enum Person {
    #[sea_orm(iden = "Person")]
    Table,
    #[sea_orm(iden = "Person_ID")]
    PersonId,
    #[sea_orm(iden = "Name")]
    Name,
    #[sea_orm(iden = "Role_Type")]
    RoleType,
}

#[derive(DeriveIden)]
enum MoviePersonRole {
    #[sea_orm(iden = "Movie_Person_Role")]
    Table,
    #[sea_orm(iden = "Movie_ID")]
    MovieId,
    #[sea_orm(iden = "Person_ID")]
    PersonId,
    #[sea_orm(iden = "Role_Description")]
    RoleDescription,
}

#[derive(DeriveIden)]
enum Award {
    #[sea_orm(iden = "Award")]
    Table,
    #[sea_orm(iden = "Award_ID")]
    AwardId,
    #[sea_orm(iden = "Movie_ID")]
    MovieId,
    #[sea_orm(iden = "Award_Name")]
    AwardName,
    #[sea_orm(iden = "Award_Year")]
    AwardYear,
}
