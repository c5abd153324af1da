//! HTTP-level tests: the real router over an in-memory SQLite database
//! migrated with the production migrator.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use cinebase::{
    AppState,
    entities::{award, box_office, genre, industry, movie, movie_genre, movie_person_role, person},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOLLYWOOD: i32 = 1;
const TOLLYWOOD: i32 = 2;

async fn setup() -> (Router, DatabaseConnection) {
    let db = cinebase::db::connect("sqlite::memory:", true).await.expect("in-memory database");

    industry::Entity::insert_many([
        industry::ActiveModel { industry_name: Set("Bollywood".to_string()), ..Default::default() },
        industry::ActiveModel { industry_name: Set("Tollywood".to_string()), ..Default::default() },
    ])
    .exec(&db)
    .await
    .expect("seed industries");

    let app = cinebase::router(Arc::new(AppState::new(db.clone())));
    (app, db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        },
        None => Body::empty(),
    };

    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create(app: &Router, body: Value) -> i32 {
    let (status, resp) = send(app, Method::POST, "/api/movies", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {resp}");
    assert_eq!(resp["success"], json!(true));
    resp["Movie_ID"].as_i64().expect("Movie_ID") as i32
}

async fn search(app: &Router, q: &str) -> Vec<Value> {
    let (status, resp) = send(app, Method::GET, &format!("/api/movies?q={q}"), None).await;
    assert_eq!(status, StatusCode::OK);
    resp.as_array().expect("array").clone()
}

fn ids(movies: &[Value]) -> Vec<i64> {
    movies.iter().map(|m| m["id"].as_i64().unwrap()).collect()
}

async fn seed_catalogue(app: &Router) -> (i32, i32, i32) {
    let sholay = create(
        app,
        json!({
            "title": "Sholay",
            "year": 1975,
            "industry": BOLLYWOOD,
            "duration": 204,
            "rating": 8.1,
            "plot": "Two convicts are hired to capture a ruthless dacoit.",
            "genres": "Action, Drama",
            "cast": "Amitabh Bachchan: Lead Actor, Dharmendra: Lead Actor, Ramesh Sippy: Director",
            "awards": "Filmfare Best Editing",
        }),
    )
    .await;
    let zanjeer = create(
        app,
        json!({
            "title": "Zanjeer",
            "year": 1973,
            "industry": BOLLYWOOD,
            "plot": "An ANGRY young police officer hunts the man who killed his parents.",
            "genres": "Action, Crime",
            "cast": "Amitabh Bachchan: Lead Actor, Jaya Bhaduri: Lead Actress",
        }),
    )
    .await;
    let baahubali = create(
        app,
        json!({
            "title": "Baahubali: The Beginning",
            "year": 2015,
            "industry": TOLLYWOOD,
            "budget": 180,
            "revenue": 650,
            "genres": "Action, Fantasy",
            "cast": "Prabhas: Lead Actor, S. S. Rajamouli: Director",
        }),
    )
    .await;
    (sholay, zanjeer, baahubali)
}

#[tokio::test]
async fn search_matches_title_or_plot_case_insensitively() {
    let (app, _db) = setup().await;
    let (sholay, zanjeer, baahubali) = seed_catalogue(&app).await;

    let all = search(&app, "").await;
    assert_eq!(ids(&all), vec![baahubali as i64, sholay as i64, zanjeer as i64]);

    // "angry" only occurs, upper-cased, in Zanjeer's plot.
    let by_plot = search(&app, "angry").await;
    assert_eq!(ids(&by_plot), vec![zanjeer as i64]);

    let by_title = search(&app, "SHOLAY").await;
    assert_eq!(ids(&by_title), vec![sholay as i64]);

    for movie in search(&app, "the").await {
        let title = movie["title"].as_str().unwrap().to_lowercase();
        let plot = movie["plot"].as_str().unwrap_or_default().to_lowercase();
        assert!(title.contains("the") || plot.contains("the"));
    }
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (app, _db) = setup().await;
    seed_catalogue(&app).await;

    assert!(search(&app, "%25").await.is_empty());
    assert!(search(&app, "_").await.is_empty());
}

#[tokio::test]
async fn search_folds_case_the_same_way_on_both_sides() {
    let (app, _db) = setup().await;
    let id = create(&app, json!({ "title": "Élan", "year": 2010, "industry": BOLLYWOOD })).await;

    // "ÉLAN", percent-encoded.
    assert_eq!(ids(&search(&app, "%C3%89LAN").await), vec![id as i64]);
    assert_eq!(ids(&search(&app, "%C3%89lan").await), vec![id as i64]);
}

#[tokio::test]
async fn search_leaves_the_connection_free_for_writes() {
    let (app, _db) = setup().await;
    let (sholay, _, _) = seed_catalogue(&app).await;

    // Both the empty and the aggregated path must hand the session back.
    assert!(search(&app, "nothing-matches").await.is_empty());
    assert_eq!(search(&app, "Sholay").await.len(), 1);

    let id = create(&app, json!({ "title": "Sholay 3D", "year": 2014, "industry": BOLLYWOOD })).await;
    assert_eq!(ids(&search(&app, "Sholay").await), vec![id as i64, sholay as i64]);
}

#[tokio::test]
async fn search_returns_aggregated_record() {
    let (app, _db) = setup().await;
    let (sholay, _, _) = seed_catalogue(&app).await;

    let found = search(&app, "Sholay").await;
    assert_eq!(found.len(), 1);
    let m = &found[0];
    assert_eq!(m["id"].as_i64(), Some(sholay as i64));
    assert_eq!(m["year"], json!(1975));
    assert_eq!(m["duration"], json!(204));
    assert_eq!(m["rating"].as_f64(), Some(8.1));
    assert_eq!(m["industry"], json!("Bollywood"));
    assert_eq!(m["budget"], Value::Null);
    assert_eq!(m["genres"], json!("Action,Drama"));
    assert_eq!(
        m["cast_crew"],
        json!("Amitabh Bachchan (Lead Actor); Dharmendra (Lead Actor); Ramesh Sippy (Director)")
    );
    assert_eq!(m["awards"], json!("Filmfare Best Editing"));

    let keys: Vec<&str> = m.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "id", "title", "year", "duration", "rating", "plot", "industry", "budget", "revenue", "genres",
        "cast_crew", "awards",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

#[tokio::test]
async fn filmography_requires_every_name() {
    let (app, _db) = setup().await;
    let (sholay, zanjeer, _) = seed_catalogue(&app).await;

    let (status, resp) = send(
        &app,
        Method::GET,
        "/api/filmography_search?names=Amitabh%20Bachchan,%20Jaya%20Bhaduri&start_year=1970&end_year=1980",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["count"], json!(1));
    assert_eq!(resp["movies"][0]["Movie_ID"].as_i64(), Some(zanjeer as i64));
    assert_eq!(resp["movies"][0]["title"], json!("Zanjeer"));
    assert_eq!(resp["movies"][0]["industries"], json!("Bollywood"));

    let (_, resp) = send(
        &app,
        Method::GET,
        "/api/filmography_search?names=Amitabh%20Bachchan&start_year=1970&end_year=1980",
        None,
    )
    .await;
    let found: Vec<i64> =
        resp["movies"].as_array().unwrap().iter().map(|m| m["Movie_ID"].as_i64().unwrap()).collect();
    assert_eq!(found, vec![sholay as i64, zanjeer as i64]);

    // Year bounds are inclusive.
    let (_, resp) = send(
        &app,
        Method::GET,
        "/api/filmography_search?names=Amitabh%20Bachchan&start_year=1975&end_year=1975",
        None,
    )
    .await;
    assert_eq!(resp["count"], json!(1));
    assert_eq!(resp["movies"][0]["year"], json!(1975));
}

#[tokio::test]
async fn filmography_validates_years_then_names() {
    let (app, _db) = setup().await;

    let (status, resp) =
        send(&app, Method::GET, "/api/filmography_search?names=A&start_year=abc&end_year=2010", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("valid integers"));

    let (status, resp) =
        send(&app, Method::GET, "/api/filmography_search?names=A&start_year=2000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("valid integers"));

    let (status, resp) = send(
        &app,
        Method::GET,
        "/api/filmography_search?names=%20,%20&start_year=2000&end_year=2010",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], json!("At least one name is required."));
}

#[tokio::test]
async fn create_persists_genres() {
    let (app, _db) = setup().await;

    create(&app, json!({ "title": "X", "year": 2020, "industry": BOLLYWOOD, "genres": "Action, Drama" }))
        .await;

    let found = search(&app, "X").await;
    assert_eq!(found.len(), 1);
    let genres: Vec<&str> = found[0]["genres"].as_str().unwrap().split(',').collect();
    assert!(genres.contains(&"Action"));
    assert!(genres.contains(&"Drama"));
}

#[tokio::test]
async fn create_without_title_is_rejected_before_writing() {
    let (app, db) = setup().await;

    let (status, resp) =
        send(&app, Method::POST, "/api/movies", Some(json!({ "year": 2020, "industry": BOLLYWOOD }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], json!("Title, Year, and Industry ID required"));
    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);

    let (status, _) = send(&app, Method::POST, "/api/movies", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_skips_malformed_cast_entries() {
    let (app, db) = setup().await;

    let id = create(
        &app,
        json!({
            "title": "Lagaan",
            "year": 2001,
            "industry": BOLLYWOOD,
            "genres": "Drama, Sport",
            "cast": "NoColonHere, Aamir Khan: Lead Actor",
            "awards": "National Film Award, Filmfare Best Film",
        }),
    )
    .await;

    let credits = movie_person_role::Entity::find()
        .filter(movie_person_role::Column::MovieId.eq(id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].role_description, "Lead Actor");
    assert_eq!(person::Entity::find().count(&db).await.unwrap(), 1);

    let m = &search(&app, "Lagaan").await[0];
    assert_eq!(m["genres"], json!("Drama,Sport"));
    assert_eq!(m["awards"], json!("National Film Award,Filmfare Best Film"));
    assert_eq!(m["cast_crew"], json!("Aamir Khan (Lead Actor)"));

    let awards = award::Entity::find().filter(award::Column::MovieId.eq(id)).all(&db).await.unwrap();
    assert!(awards.iter().all(|a| a.award_year == Some(2001)));
}

#[tokio::test]
async fn create_reuses_existing_genres_and_people() {
    let (app, db) = setup().await;
    seed_catalogue(&app).await;

    let genres = genre::Entity::find().all(&db).await.unwrap();
    let mut names: Vec<&str> = genres.iter().map(|g| g.genre_name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Action", "Crime", "Drama", "Fantasy"]);

    let amitabh = person::Entity::find()
        .filter(person::Column::Name.eq("Amitabh Bachchan"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(amitabh.len(), 1);
    assert_eq!(amitabh[0].role_type.as_deref(), Some("Lead Actor"));
}

#[tokio::test]
async fn create_collapses_names_that_resolve_to_the_same_row() {
    let (app, db) = setup().await;

    let id = create(
        &app,
        json!({
            "title": "Dil Chahta Hai",
            "year": 2001,
            "industry": BOLLYWOOD,
            "genres": "Action, action, Action ",
            "cast": "Aamir Khan: Lead, aamir khan: Lead, Aamir Khan: Lead",
        }),
    )
    .await;

    let genre_links = movie_genre::Entity::find().filter(movie_genre::Column::MovieId.eq(id));
    assert_eq!(genre_links.count(&db).await.unwrap(), 1);
    assert_eq!(genre::Entity::find().count(&db).await.unwrap(), 1);

    let credits = movie_person_role::Entity::find().filter(movie_person_role::Column::MovieId.eq(id));
    assert_eq!(credits.count(&db).await.unwrap(), 1);
    assert_eq!(person::Entity::find().count(&db).await.unwrap(), 1);

    assert_eq!(search(&app, "Chahta").await[0]["cast_crew"], json!("Aamir Khan (Lead)"));
}

#[tokio::test]
async fn create_provisions_box_office_row() {
    let (app, db) = setup().await;

    let id =
        create(&app, json!({ "title": "Dangal", "year": "2016", "industry": "1", "budget": "70" })).await;

    let row = box_office::Entity::find_by_id(id).one(&db).await.unwrap().expect("box office row");
    assert_eq!(row.budget_inr_cr, Some(70.0));
    assert_eq!(row.revenue_inr_cr, None);
}

#[tokio::test]
async fn create_rolls_back_on_database_error() {
    let (app, db) = setup().await;

    let (status, resp) = send(
        &app,
        Method::POST,
        "/api/movies",
        Some(json!({ "title": "Orphan", "year": 2020, "industry": 99, "genres": "Drama" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["success"], json!(false));
    assert!(resp["error"].as_str().unwrap().starts_with("failed to create movie: "));

    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(genre::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn update_budget_leaves_movie_fields_alone() {
    let (app, _db) = setup().await;
    let (sholay, _, _) = seed_catalogue(&app).await;
    let before = search(&app, "Sholay").await[0].clone();

    let (status, resp) =
        send(&app, Method::PUT, &format!("/api/movies/{sholay}"), Some(json!({ "budget": 100 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "success": true }));

    let after = search(&app, "Sholay").await[0].clone();
    assert_eq!(after["budget"].as_f64(), Some(100.0));
    for key in ["title", "year", "duration", "rating", "plot", "industry", "revenue", "genres"] {
        assert_eq!(before[key], after[key], "{key} changed");
    }
}

#[tokio::test]
async fn update_movie_and_box_office_together() {
    let (app, db) = setup().await;
    let (_, _, baahubali) = seed_catalogue(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/movies/{baahubali}"),
        Some(json!({ "title": "Baahubali", "rating": "8.0", "revenue": 700, "plot": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let m = movie::Entity::find_by_id(baahubali).one(&db).await.unwrap().unwrap();
    assert_eq!(m.title_english, "Baahubali");
    assert_eq!(m.imdb_rating, Some(8.0));
    assert_eq!(m.plot_summary, None);
    assert_eq!(m.release_year, 2015);

    let bo = box_office::Entity::find_by_id(baahubali).one(&db).await.unwrap().unwrap();
    assert_eq!(bo.budget_inr_cr, Some(180.0));
    assert_eq!(bo.revenue_inr_cr, Some(700.0));
}

#[tokio::test]
async fn update_of_missing_movie_succeeds_without_effect() {
    let (app, db) = setup().await;
    seed_catalogue(&app).await;

    let (status, resp) =
        send(&app, Method::PUT, "/api/movies/4242", Some(json!({ "title": "Ghost", "budget": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "success": true }));
    let ghosts = movie::Entity::find().filter(movie::Column::TitleEnglish.eq("Ghost"));
    assert_eq!(ghosts.count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn update_without_recognized_fields_is_rejected() {
    let (app, _db) = setup().await;
    let (sholay, _, _) = seed_catalogue(&app).await;

    let (status, resp) = send(
        &app,
        Method::PUT,
        &format!("/api/movies/{sholay}"),
        Some(json!({ "Title_English": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], json!("No updatable fields provided"));

    let (status, _) = send(&app, Method::PUT, "/api/movies/abc", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_removes_movie_and_dependents() {
    let (app, db) = setup().await;
    let (sholay, _, _) = seed_catalogue(&app).await;

    let (status, resp) = send(&app, Method::DELETE, &format!("/api/movies/{sholay}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({ "success": true }));
    assert!(search(&app, "Sholay").await.is_empty());

    assert_eq!(box_office::Entity::find_by_id(sholay).one(&db).await.unwrap(), None);
    assert_eq!(
        movie_genre::Entity::find().filter(movie_genre::Column::MovieId.eq(sholay)).count(&db).await.unwrap(),
        0
    );
    assert_eq!(
        movie_person_role::Entity::find()
            .filter(movie_person_role::Column::MovieId.eq(sholay))
            .count(&db)
            .await
            .unwrap(),
        0
    );
    assert_eq!(award::Entity::find().filter(award::Column::MovieId.eq(sholay)).count(&db).await.unwrap(), 0);
    // Shared rows survive.
    let drama = genre::Entity::find().filter(genre::Column::GenreName.eq("Drama"));
    assert_eq!(drama.count(&db).await.unwrap(), 1);

    let (status, resp) = send(&app, Method::DELETE, &format!("/api/movies/{sholay}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["error"], json!(format!("Movie with ID {sholay} not found.")));
}

#[tokio::test]
async fn index_serves_landing_page() {
    let (app, _db) = setup().await;

    let resp = app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("Cinebase"));
}
