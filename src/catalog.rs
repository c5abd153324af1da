use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
    sea_query::{Expr, Func, OnConflict, SimpleExpr},
};
use tracing::{debug, info, warn};

use crate::{
    entities::{award, box_office, genre, industry, movie, movie_genre, movie_person_role, person},
    error::{AppError, AppResult},
    models::{CastCredit, Collaboration, CollaborationMovie, MovieRecord, MovieUpdate, NewMovie},
};

const LIKE_ESCAPE: char = '!';

#[derive(Debug, FromQueryResult)]
struct MovieRow {
    id: i32,
    title: String,
    year: i32,
    duration: Option<i32>,
    rating: Option<f64>,
    plot: Option<String>,
    industry: String,
    budget: Option<f64>,
    revenue: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct LinkedName {
    movie_id: i32,
    name: String,
}

#[derive(Debug, FromQueryResult)]
struct CreditRow {
    movie_id: i32,
    name: String,
    role: String,
}

/// All reads and writes against the movie schema. Cloning is cheap; the
/// connection handle hands out a session per statement or transaction.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Movies whose title or plot contains `q` (case-insensitive), newest first.
    pub async fn search(&self, q: &str) -> Result<Vec<MovieRecord>, DbErr> {
        let pattern = like_pattern(q);
        let matches = Condition::any()
            .add(lower_like(movie::Column::TitleEnglish, &pattern))
            .add(lower_like(movie::Column::PlotSummary, &pattern));

        // One transaction so the aggregates see the same movies as the first read.
        let txn = self.db.begin().await?;

        let rows = movie::Entity::find()
            .select_only()
            .column_as(movie::Column::MovieId, "id")
            .column_as(movie::Column::TitleEnglish, "title")
            .column_as(movie::Column::ReleaseYear, "year")
            .column_as(movie::Column::DurationMin, "duration")
            .column_as(movie::Column::ImdbRating, "rating")
            .column_as(movie::Column::PlotSummary, "plot")
            .column_as(industry::Column::IndustryName, "industry")
            .column_as(box_office::Column::BudgetInrCr, "budget")
            .column_as(box_office::Column::RevenueInrCr, "revenue")
            .join(JoinType::InnerJoin, movie::Relation::Industry.def())
            .join(JoinType::LeftJoin, movie::Relation::BoxOffice.def())
            .filter(matches.clone())
            .order_by_desc(movie::Column::ReleaseYear)
            .order_by_asc(movie::Column::MovieId)
            .into_model::<MovieRow>()
            .all(&txn)
            .await?;

        debug!(query = %q, matches = rows.len(), "movie search");

        if rows.is_empty() {
            txn.commit().await?;
            return Ok(Vec::new());
        }

        let genre_rows = movie_genre::Entity::find()
            .select_only()
            .column_as(movie_genre::Column::MovieId, "movie_id")
            .column_as(genre::Column::GenreName, "name")
            .join(JoinType::InnerJoin, movie_genre::Relation::Movie.def())
            .join(JoinType::InnerJoin, movie_genre::Relation::Genre.def())
            .filter(matches.clone())
            .order_by_asc(genre::Column::GenreName)
            .into_model::<LinkedName>()
            .all(&txn)
            .await?;

        let credit_rows = movie_person_role::Entity::find()
            .select_only()
            .column_as(movie_person_role::Column::MovieId, "movie_id")
            .column_as(person::Column::Name, "name")
            .column_as(movie_person_role::Column::RoleDescription, "role")
            .join(JoinType::InnerJoin, movie_person_role::Relation::Movie.def())
            .join(JoinType::InnerJoin, movie_person_role::Relation::Person.def())
            .filter(matches.clone())
            .order_by_asc(person::Column::PersonId)
            .order_by_asc(movie_person_role::Column::RoleDescription)
            .into_model::<CreditRow>()
            .all(&txn)
            .await?;

        let award_rows = award::Entity::find()
            .select_only()
            .column_as(award::Column::MovieId, "movie_id")
            .column_as(award::Column::AwardName, "name")
            .join(JoinType::InnerJoin, award::Relation::Movie.def())
            .filter(matches)
            .order_by_asc(award::Column::AwardId)
            .into_model::<LinkedName>()
            .all(&txn)
            .await?;
        txn.commit().await?;

        let mut genres = group_names(genre_rows.into_iter().map(|r| (r.movie_id, r.name)));
        let mut credits =
            group_names(credit_rows.into_iter().map(|r| (r.movie_id, format!("{} ({})", r.name, r.role))));
        let mut awards = group_names(award_rows.into_iter().map(|r| (r.movie_id, r.name)));

        Ok(rows
            .into_iter()
            .map(|row| MovieRecord {
                genres: joined(genres.remove(&row.id), ","),
                cast_crew: joined(credits.remove(&row.id), "; "),
                awards: joined(awards.remove(&row.id), ","),
                id: row.id,
                title: row.title,
                year: row.year,
                duration: row.duration,
                rating: row.rating,
                plot: row.plot,
                industry: row.industry,
                budget: row.budget,
                revenue: row.revenue,
            })
            .collect())
    }

    /// Movies in the year range on which every requested person is credited.
    pub async fn filmography(&self, search: &Collaboration) -> Result<Vec<CollaborationMovie>, DbErr> {
        let matched_names = Expr::cust_with_expr(
            "COUNT(DISTINCT $1)",
            Expr::col((person::Entity, person::Column::Name)),
        );

        let movies = movie::Entity::find()
            .select_only()
            .column_as(movie::Column::MovieId, "movie_id")
            .column_as(movie::Column::TitleEnglish, "title")
            .column_as(movie::Column::ReleaseYear, "year")
            .column_as(industry::Column::IndustryName, "industries")
            .join(JoinType::InnerJoin, movie::Relation::MoviePersonRole.def())
            .join(JoinType::InnerJoin, movie_person_role::Relation::Person.def())
            .join(JoinType::InnerJoin, movie::Relation::Industry.def())
            .filter(person::Column::Name.is_in(search.names.iter().cloned()))
            .filter(movie::Column::ReleaseYear.between(search.start_year, search.end_year))
            .group_by(movie::Column::MovieId)
            .group_by(movie::Column::TitleEnglish)
            .group_by(movie::Column::ReleaseYear)
            .group_by(industry::Column::IndustryName)
            .having(Expr::expr(matched_names).eq(search.names.len() as i64))
            .order_by_desc(movie::Column::ReleaseYear)
            .order_by_asc(movie::Column::MovieId)
            .into_model::<CollaborationMovie>()
            .all(&self.db)
            .await?;

        debug!(
            names = ?search.names,
            start_year = search.start_year,
            end_year = search.end_year,
            matches = movies.len(),
            "filmography search"
        );

        Ok(movies)
    }

    /// Inserts a movie with its box office figures, genres, credits and awards
    /// in one transaction. Returns the new movie id.
    pub async fn create_movie(&self, new: &NewMovie) -> AppResult<i32> {
        let txn = self.db.begin().await.map_err(AppError::write("create movie"))?;
        let result = insert_movie(&txn, new).await;
        let movie_id = finish(txn, result).await.map_err(AppError::write("create movie"))?;

        info!(
            movie_id,
            title = %new.title,
            genres = new.genres.len(),
            credits = new.cast.len(),
            awards = new.awards.len(),
            "movie created"
        );
        Ok(movie_id)
    }

    /// Applies `update` to the movie and its box office row. A missing id is not
    /// an error; the statements simply match nothing.
    pub async fn update_movie(&self, movie_id: i32, update: &MovieUpdate) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::write("update movie"))?;
        let result = apply_update(&txn, movie_id, update).await;
        finish(txn, result).await.map_err(AppError::write("update movie"))
    }

    /// Dependent rows go with the movie through the schema's cascading foreign keys.
    pub async fn delete_movie(&self, movie_id: i32) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(AppError::write("delete movie"))?;

        let deleted = match movie::Entity::delete_by_id(movie_id).exec(&txn).await {
            Ok(res) => res.rows_affected,
            Err(err) => {
                rollback(txn).await;
                return Err(AppError::write("delete movie")(err));
            },
        };

        if deleted == 0 {
            rollback(txn).await;
            return Err(AppError::NotFound(format!("Movie with ID {movie_id} not found.")));
        }

        txn.commit().await.map_err(AppError::write("delete movie"))?;
        info!(movie_id, "movie deleted");
        Ok(())
    }
}

async fn insert_movie(txn: &DatabaseTransaction, new: &NewMovie) -> Result<i32, DbErr> {
    let movie_id = movie::Entity::insert(movie::ActiveModel {
        title_english: Set(new.title.clone()),
        release_year: Set(new.year),
        duration_min: Set(new.duration),
        imdb_rating: Set(new.rating),
        plot_summary: Set(new.plot.clone()),
        industry_id: Set(new.industry_id),
        ..Default::default()
    })
    .exec(txn)
    .await?
    .last_insert_id;

    provision_box_office(txn, movie_id, new.budget, new.revenue).await?;

    // Names that differ only in case or accents can resolve to the same row
    // under the store's collation, so repeats are dropped by id.
    let mut linked_genres = HashSet::new();
    for name in &new.genres {
        let genre_id = genre_id(txn, name).await?;
        if !linked_genres.insert(genre_id) {
            continue;
        }
        movie_genre::Entity::insert(movie_genre::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
        })
        .exec_without_returning(txn)
        .await?;
    }

    let mut linked_credits = HashSet::new();
    for credit in &new.cast {
        let person_id = person_id(txn, credit).await?;
        if !linked_credits.insert((person_id, credit.role.to_lowercase())) {
            continue;
        }
        movie_person_role::Entity::insert(movie_person_role::ActiveModel {
            movie_id: Set(movie_id),
            person_id: Set(person_id),
            role_description: Set(credit.role.clone()),
        })
        .exec_without_returning(txn)
        .await?;
    }

    for name in &new.awards {
        award::Entity::insert(award::ActiveModel {
            movie_id: Set(movie_id),
            award_name: Set(name.clone()),
            award_year: Set(Some(new.year)),
            ..Default::default()
        })
        .exec(txn)
        .await?;
    }

    Ok(movie_id)
}

/// Ensures the movie owns a box office row. A row provisioned by the store
/// (e.g. a trigger) only gets the supplied figures written into it.
async fn provision_box_office<C: ConnectionTrait>(
    db: &C,
    movie_id: i32,
    budget: Option<f64>,
    revenue: Option<f64>,
) -> Result<(), DbErr> {
    match box_office::Entity::find_by_id(movie_id).one(db).await? {
        Some(existing) => {
            let mut row: box_office::ActiveModel = existing.into();
            if budget.is_some() {
                row.budget_inr_cr = Set(budget);
            }
            if revenue.is_some() {
                row.revenue_inr_cr = Set(revenue);
            }
            if row.is_changed() {
                row.update(db).await?;
            }
        },
        None => {
            box_office::Entity::insert(box_office::ActiveModel {
                movie_id: Set(movie_id),
                budget_inr_cr: Set(budget),
                revenue_inr_cr: Set(revenue),
            })
            .exec_without_returning(db)
            .await?;
        },
    }
    Ok(())
}

async fn genre_id<C: ConnectionTrait>(db: &C, name: &str) -> Result<i32, DbErr> {
    genre::Entity::insert(genre::ActiveModel { genre_name: Set(name.to_string()), ..Default::default() })
        .on_conflict(
            OnConflict::column(genre::Column::GenreName)
                .do_nothing_on([genre::Column::GenreName])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    genre::Entity::find()
        .filter(genre::Column::GenreName.eq(name))
        .one(db)
        .await?
        .map(|g| g.genre_id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("genre {name:?}")))
}

async fn person_id<C: ConnectionTrait>(db: &C, credit: &CastCredit) -> Result<i32, DbErr> {
    person::Entity::insert(person::ActiveModel {
        name: Set(credit.name.clone()),
        role_type: Set(Some(credit.role.clone())),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(person::Column::Name).do_nothing_on([person::Column::Name]).to_owned())
    .exec_without_returning(db)
    .await?;

    person::Entity::find()
        .filter(person::Column::Name.eq(credit.name.as_str()))
        .one(db)
        .await?
        .map(|p| p.person_id)
        .ok_or_else(|| DbErr::RecordNotFound(format!("person {:?}", credit.name)))
}

async fn apply_update(txn: &DatabaseTransaction, movie_id: i32, update: &MovieUpdate) -> Result<(), DbErr> {
    if !update.movie.is_empty() {
        let mut stmt = movie::Entity::update_many();
        for (col, value) in &update.movie {
            stmt = stmt.col_expr(*col, Expr::value(value.clone()));
        }
        let res = stmt.filter(movie::Column::MovieId.eq(movie_id)).exec(txn).await?;
        debug!(movie_id, columns = update.movie.len(), rows = res.rows_affected, "movie row updated");
    }

    if !update.box_office.is_empty() {
        let mut stmt = box_office::Entity::update_many();
        for (col, value) in &update.box_office {
            stmt = stmt.col_expr(*col, Expr::value(value.clone()));
        }
        let res = stmt.filter(box_office::Column::MovieId.eq(movie_id)).exec(txn).await?;
        debug!(
            movie_id,
            columns = update.box_office.len(),
            rows = res.rows_affected,
            "box office row updated"
        );
    }

    Ok(())
}

async fn finish<T>(txn: DatabaseTransaction, result: Result<T, DbErr>) -> Result<T, DbErr> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        },
        Err(err) => {
            rollback(txn).await;
            Err(err)
        },
    }
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        warn!(error = %err, "transaction rollback failed");
    }
}

/// `LOWER(col) LIKE LOWER(pattern)`. Both sides fold through the store's own
/// `LOWER`, so they agree even where it only folds ASCII (SQLite).
fn lower_like(col: movie::Column, pattern: &str) -> SimpleExpr {
    Expr::cust_with_exprs(
        format!("$1 LIKE $2 ESCAPE '{LIKE_ESCAPE}'"),
        [Func::lower(Expr::col((movie::Entity, col))).into(), Func::lower(Expr::val(pattern)).into()],
    )
}

/// `%q%` with LIKE metacharacters in `q` escaped.
fn like_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn group_names(rows: impl Iterator<Item = (i32, String)>) -> HashMap<i32, Vec<String>> {
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (movie_id, name) in rows {
        grouped.entry(movie_id).or_default().push(name);
    }
    grouped
}

fn joined(values: Option<Vec<String>>, sep: &str) -> Option<String> {
    values.filter(|v| !v.is_empty()).map(|v| v.join(sep))
}
