use crate::cli::{Cli, Command, MovieCommand, SortKey};
use anyhow::{bail, Context, Result};
use movieshelf_core::db::open_db;
use movieshelf_core::{
    Movie, MovieFilter, MovieService, MovieUpdate, MutationOutcome, NewMovie, Session,
    SqliteMovieRepository, SqliteUserRepository, UserService,
};
use rusqlite::Connection;

pub fn run(cli: Cli) -> Result<()> {
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open catalog `{}`", cli.db.display()))?;
    let users = UserService::new(SqliteUserRepository::try_new(&conn)?);

    match cli.command {
        Command::Users => {
            let listed = users.list_users()?;
            if listed.is_empty() {
                println!("No users registered.");
            }
            for (position, name) in listed.values().enumerate() {
                println!("{}. {}", position + 1, name);
            }
        }
        Command::Register { name } => {
            let session = users.register(&name)?;
            println!("User '{}' ready (id {}).", session.user.name, session.user_id());
        }
        Command::RemoveUser { name } => {
            let session = users.select(&name)?;
            users.remove_user(session.user_id())?;
            println!("User '{}' and their movies were removed.", session.user.name);
        }
        Command::Movie(command) => {
            let Some(name) = cli.user.as_deref() else {
                bail!("this command needs a user; pass --user or set MOVIESHELF_USER");
            };
            let session = users.select(name)?;
            run_movie_command(&conn, &session, command)?;
        }
    }

    Ok(())
}

fn run_movie_command(conn: &Connection, session: &Session, command: MovieCommand) -> Result<()> {
    let movies = MovieService::new(SqliteMovieRepository::try_new(conn)?);

    match command {
        MovieCommand::List => {
            let collection = movies.list(session)?;
            if collection.is_empty() {
                println!("No movies found.");
                return Ok(());
            }
            println!("{} movies in total:", collection.len());
            print_movies(collection.as_slice());
        }
        MovieCommand::Add {
            title,
            year,
            rating,
            poster,
            notes,
            imdb_id,
        } => {
            let mut request = NewMovie::new(title, year, rating);
            request.poster = poster;
            request.notes = notes;
            request.imdb_id = imdb_id;
            movies.add(session, &request)?;
            println!("Movie '{}' added.", request.title.trim());
        }
        MovieCommand::Update {
            title,
            rating,
            notes,
            clear_notes,
        } => {
            let update = MovieUpdate {
                rating,
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
            };
            report(&title, "updated", movies.update(session, &title, &update)?);
        }
        MovieCommand::Delete { title } => {
            report(&title, "deleted", movies.delete(session, &title)?);
        }
        MovieCommand::Stats => match movies.statistics(session)? {
            Some(stats) => {
                println!("Average rating: {:.2}", stats.mean);
                println!("Median rating: {:.2}", stats.median);
                println!("Best movie: {}, {}", stats.best.title, stats.best.rating);
                println!("Worst movie: {}, {}", stats.worst.title, stats.worst.rating);
            }
            None => println!("No movies available."),
        },
        MovieCommand::Search { query } => {
            let found = movies.search(session, &query)?;
            if found.is_empty() {
                println!("No movies match '{}'.", query.trim());
            }
            print_movies(&found);
        }
        MovieCommand::Sorted { by, newest_first } => {
            let sorted = match by {
                SortKey::Rating => movies.sorted_by_rating(session)?,
                SortKey::Year => movies.sorted_by_year(session, newest_first)?,
            };
            print_movies(&sorted);
        }
        MovieCommand::Filter {
            min_rating,
            start_year,
            end_year,
        } => {
            let bounds = MovieFilter {
                min_rating,
                start_year,
                end_year,
            };
            print_movies(&movies.filtered(session, &bounds)?);
        }
        MovieCommand::Random => match movies.random_pick(session, &mut rand::thread_rng())? {
            Some(movie) => println!(
                "Your movie for tonight: {}, it's rated {}",
                movie.title, movie.rating
            ),
            None => println!("No movies available."),
        },
        MovieCommand::Export => {
            let view = movies.list(session)?.title_view();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

fn report(title: &str, verb: &str, outcome: MutationOutcome) {
    match outcome {
        MutationOutcome::Applied(1) => println!("Movie '{}' {verb}.", title.trim()),
        MutationOutcome::Applied(count) => {
            println!("{count} movies titled '{}' {verb}.", title.trim())
        }
        MutationOutcome::NotFound => println!("Movie '{}' not found.", title.trim()),
    }
}

fn print_movies(movies: &[Movie]) {
    for movie in movies {
        println!("{} ({}): {}", movie.title, movie.year, movie.rating);
    }
}
