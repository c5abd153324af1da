use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use axum_extra::extract::WithRejection;
use serde_json::{Map, Value};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        CreateMovieRequest, CreatedResponse, FilmographyQuery, FilmographyResponse, MovieRecord, MovieUpdate,
        SearchQuery, SuccessResponse,
    },
};

const INDEX_HTML: &str = include_str!("../public/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(q), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let movies = state.catalog.search(&q.q).await.map_err(AppError::query("search movies"))?;
    Ok(Json(movies))
}

pub async fn filmography_search(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(q), _): WithRejection<Query<FilmographyQuery>, AppError>,
) -> AppResult<Json<FilmographyResponse>> {
    let search = q.validate()?;
    let movies = state.catalog.filmography(&search).await.map_err(AppError::query("search filmography"))?;
    Ok(Json(FilmographyResponse { count: movies.len(), movies }))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateMovieRequest>, AppError>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let new = req.validate()?;
    let movie_id = state.catalog.create_movie(&new).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { success: true, movie_id })))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(movie_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<Map<String, Value>>, AppError>,
) -> AppResult<Json<SuccessResponse>> {
    let update = MovieUpdate::from_json(&body)?;
    state.catalog.update_movie(movie_id, &update).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(movie_id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<SuccessResponse>> {
    state.catalog.delete_movie(movie_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
