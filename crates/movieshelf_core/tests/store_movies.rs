use movieshelf_core::db::{open_db, open_db_in_memory};
use movieshelf_core::{
    MovieRepository, MovieUpdate, NewMovie, RepoError, SqliteMovieRepository,
    SqliteUserRepository, UserRepository, ValidationError,
};
use rusqlite::Connection;
use std::time::Duration;

fn full_movie() -> NewMovie {
    let mut movie = NewMovie::new("Civil War", 2024, 8.7);
    movie.poster = Some("https://img.example/civil-war.jpg".to_string());
    movie.notes = Some("watch again".to_string());
    movie.imdb_id = Some("tt17279496".to_string());
    movie
}

#[test]
fn add_then_list_roundtrips_every_attribute() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    let id = repo.add_movie(ana, &full_movie()).unwrap();

    let movies = repo.list_movies(ana).unwrap();
    let stored = movies.get(id).unwrap();
    assert_eq!(stored.user_id, ana);
    assert_eq!(stored.title, "Civil War");
    assert_eq!(stored.year, 2024);
    assert_eq!(stored.rating, 8.7);
    assert_eq!(
        stored.poster.as_deref(),
        Some("https://img.example/civil-war.jpg")
    );
    assert_eq!(stored.notes.as_deref(), Some("watch again"));
    assert_eq!(stored.imdb_id.as_deref(), Some("tt17279496"));

    let view = movies.title_view();
    assert_eq!(view["Civil War"].imdb_id.as_deref(), Some("tt17279496"));
}

#[test]
fn absent_optional_attributes_stay_absent() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    let id = repo.add_movie(ana, &NewMovie::new("21", 2008, 6.8)).unwrap();

    let movies = repo.list_movies(ana).unwrap();
    let stored = movies.get(id).unwrap();
    assert_eq!(stored.poster, None);
    assert_eq!(stored.notes, None);
    assert_eq!(stored.imdb_id, None);
}

#[test]
fn listings_never_leak_across_users() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    let ben = users.create_user("ben").unwrap();

    repo.add_movie(ana, &NewMovie::new("Titanic", 1997, 6.6)).unwrap();
    repo.add_movie(ana, &NewMovie::new("Venom", 2018, 6.6)).unwrap();
    repo.add_movie(ben, &NewMovie::new("Titanic", 1997, 9.0)).unwrap();

    let ana_movies = repo.list_movies(ana).unwrap();
    let ben_movies = repo.list_movies(ben).unwrap();
    assert_eq!(ana_movies.len(), 2);
    assert_eq!(ben_movies.len(), 1);
    assert!(ana_movies.as_slice().iter().all(|m| m.user_id == ana));
    assert_eq!(ben_movies.as_slice()[0].rating, 9.0);
}

#[test]
fn user_without_movies_lists_empty() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    assert!(repo.list_movies(ana).unwrap().is_empty());
    assert!(repo.list_movies(ana + 42).unwrap().is_empty());
}

#[test]
fn add_for_missing_user_fails_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();

    let err = repo
        .add_movie(99, &NewMovie::new("Heat", 1995, 8.3))
        .unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(99)));
    assert_eq!(movie_rows(&conn), 0);
}

#[test]
fn add_with_blank_title_fails_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    let err = repo.add_movie(ana, &NewMovie::new(" ", 1995, 8.3)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyTitle)
    ));
    assert_eq!(movie_rows(&conn), 0);
}

#[test]
fn rating_range_is_not_enforced_by_store() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    let id = repo.add_movie(ana, &NewMovie::new("Odd", 2001, 11.5)).unwrap();
    assert_eq!(repo.list_movies(ana).unwrap().get(id).unwrap().rating, 11.5);
}

#[test]
fn same_title_twice_creates_two_rows() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();

    let first = repo.add_movie(ana, &NewMovie::new("Dune", 1984, 6.3)).unwrap();
    let second = repo.add_movie(ana, &NewMovie::new("Dune", 2021, 8.0)).unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.find_movie_ids(ana, "Dune").unwrap(), vec![first, second]);
    let movies = repo.list_movies(ana).unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies.title_view()["Dune"].year, 2021);
}

#[test]
fn update_notes_and_rating_in_place() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    let id = repo.add_movie(ana, &full_movie()).unwrap();

    let changed = repo
        .update_movie(ana, "Civil War", &MovieUpdate::notes("seen in cinema"))
        .unwrap();
    assert_eq!(changed, 1);

    let update = MovieUpdate {
        rating: Some(9.1),
        notes: None,
    };
    repo.update_movie(ana, "Civil War", &update).unwrap();

    let movies = repo.list_movies(ana).unwrap();
    let stored = movies.get(id).unwrap();
    assert_eq!(stored.notes.as_deref(), Some("seen in cinema"));
    assert_eq!(stored.rating, 9.1);
    assert_eq!(stored.imdb_id.as_deref(), Some("tt17279496"));

    repo.update_movie(ana, "Civil War", &MovieUpdate::clear_notes())
        .unwrap();
    assert_eq!(repo.list_movies(ana).unwrap().get(id).unwrap().notes, None);
}

#[test]
fn update_of_shared_title_touches_every_match_of_that_user_only() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    let ben = users.create_user("ben").unwrap();
    repo.add_movie(ana, &NewMovie::new("Dune", 1984, 6.3)).unwrap();
    repo.add_movie(ana, &NewMovie::new("Dune", 2021, 8.0)).unwrap();
    repo.add_movie(ben, &NewMovie::new("Dune", 2021, 5.0)).unwrap();

    let changed = repo
        .update_movie(ana, "Dune", &MovieUpdate::rating(7.0))
        .unwrap();

    assert_eq!(changed, 2);
    assert!(repo
        .list_movies(ana)
        .unwrap()
        .as_slice()
        .iter()
        .all(|movie| movie.rating == 7.0));
    assert_eq!(repo.list_movies(ben).unwrap().as_slice()[0].rating, 5.0);
}

#[test]
fn update_and_delete_of_missing_title_report_zero() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    let ben = users.create_user("ben").unwrap();
    repo.add_movie(ben, &NewMovie::new("Heat", 1995, 8.3)).unwrap();

    assert_eq!(
        repo.update_movie(ana, "Heat", &MovieUpdate::rating(1.0))
            .unwrap(),
        0
    );
    assert_eq!(repo.delete_movie(ana, "Heat").unwrap(), 0);
    assert_eq!(repo.list_movies(ben).unwrap().len(), 1);
}

#[test]
fn failed_multi_row_update_rolls_back_every_match() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    repo.add_movie(ana, &NewMovie::new("Dune", 1984, 6.3)).unwrap();
    let second = repo.add_movie(ana, &NewMovie::new("Dune", 2021, 8.0)).unwrap();

    conn.execute_batch(&format!(
        "CREATE TRIGGER reject_second_dune BEFORE UPDATE ON movies
         WHEN NEW.id = {second}
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;"
    ))
    .unwrap();

    let err = repo
        .update_movie(ana, "Dune", &MovieUpdate::rating(1.0))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(!err.is_retriable());

    let ratings: Vec<f64> = repo
        .list_movies(ana)
        .unwrap()
        .as_slice()
        .iter()
        .map(|movie| movie.rating)
        .collect();
    assert_eq!(ratings, vec![6.3, 8.0]);
}

#[test]
fn empty_update_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    repo.add_movie(ana, &NewMovie::new("Heat", 1995, 8.3)).unwrap();

    let err = repo
        .update_movie(ana, "Heat", &MovieUpdate::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyUpdate)
    ));
}

#[test]
fn delete_then_list_no_longer_contains_title() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::try_new(&conn).unwrap();
    let repo = SqliteMovieRepository::try_new(&conn).unwrap();
    let ana = users.create_user("ana").unwrap();
    repo.add_movie(ana, &NewMovie::new("Titanic", 1997, 6.6)).unwrap();
    repo.add_movie(ana, &NewMovie::new("Titanic", 1953, 7.0)).unwrap();
    repo.add_movie(ana, &NewMovie::new("Venom", 2018, 6.6)).unwrap();

    assert_eq!(repo.delete_movie(ana, " Titanic ").unwrap(), 2);

    let view = repo.list_movies(ana).unwrap().title_view();
    assert!(!view.contains_key("Titanic"));
    assert!(view.contains_key("Venom"));
}

#[test]
fn writer_blocked_by_other_connection_reports_busy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.db");

    let holder = open_db(&path).unwrap();
    let ana = SqliteUserRepository::try_new(&holder)
        .unwrap()
        .create_user("ana")
        .unwrap();

    let contender = open_db(&path).unwrap();
    contender.busy_timeout(Duration::from_millis(50)).unwrap();
    let repo = SqliteMovieRepository::try_new(&contender).unwrap();

    holder.execute_batch("BEGIN IMMEDIATE;").unwrap();
    let err = repo
        .add_movie(ana, &NewMovie::new("Heat", 1995, 8.3))
        .unwrap_err();
    assert!(matches!(err, RepoError::Busy));
    assert!(err.is_retriable());
    assert!(repo.list_movies(ana).unwrap().is_empty());

    holder.execute_batch("COMMIT;").unwrap();
    repo.add_movie(ana, &NewMovie::new("Heat", 1995, 8.3))
        .unwrap();
    assert_eq!(repo.list_movies(ana).unwrap().len(), 1);
}

#[test]
fn repository_rejects_connection_missing_optional_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
         CREATE TABLE movies (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            year INTEGER NOT NULL,
            rating REAL NOT NULL
         );
         PRAGMA user_version = {};",
        movieshelf_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteMovieRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "movies",
            column: "poster"
        })
    ));
}

fn movie_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM movies;", [], |row| row.get(0))
        .unwrap()
}
