use std::fmt;

use learnhub_core::model::{CourseId, LessonId, Session};
use services::{AccountService, AppServices, Clock};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCommand,
    UnknownCommand(String),
    MissingArg { command: &'static str, arg: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingArg { command, arg } => {
                write!(f, "{command} requires <{arg}>")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--data <dir>] <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  seed                            Create the demo account if no users exist");
    eprintln!("  register <name> <email> <pw>    Create an account");
    eprintln!("  login <email> <pw>              Open a session");
    eprintln!("  logout                          Close the session");
    eprintln!("  whoami                          Show the active session");
    eprintln!("  courses                         List the catalog with progress");
    eprintln!("  course <id>                     Show one course and its lessons");
    eprintln!("  toggle <course-id> <lesson-id>  Toggle a lesson's completed state");
    eprintln!("  complete <course-id>            Mark every lesson of a course complete");
    eprintln!("  stats                           Show overall course counts");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARNHUB_DATA                   Data directory (default: learnhub-data)");
}

/// Pulls `--data <dir>` out of the argument list, falling back to the
/// environment and then the default directory.
fn extract_data_dir(argv: &mut Vec<String>) -> Result<String, ArgsError> {
    let mut data_dir = std::env::var("LEARNHUB_DATA")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "learnhub-data".into());

    while let Some(pos) = argv.iter().position(|arg| arg == "--data") {
        argv.remove(pos);
        if pos >= argv.len() {
            return Err(ArgsError::MissingValue { flag: "--data" });
        }
        data_dir = argv.remove(pos);
    }

    Ok(data_dir)
}

fn positional(
    argv: &[String],
    index: usize,
    command: &'static str,
    arg: &'static str,
) -> Result<String, ArgsError> {
    argv.get(index)
        .cloned()
        .ok_or(ArgsError::MissingArg { command, arg })
}

fn require_session(accounts: &AccountService) -> Result<Session, Box<dyn std::error::Error>> {
    accounts
        .current_user()?
        .ok_or_else(|| "not logged in; run `login <email> <password>` first".into())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let data_dir = extract_data_dir(&mut argv)?;
    let command = argv.first().cloned().ok_or_else(|| {
        print_usage();
        ArgsError::MissingCommand
    })?;
    let rest = &argv[1..];

    let services = AppServices::new_json_file(&data_dir, Clock::system())?;
    let accounts = services.accounts();
    let progress = services.progress();
    let catalog = services.catalog();

    match command.as_str() {
        "seed" => {
            if services.ensure_demo_user()? {
                println!("created demo account demo@learnhub.com (password: demo123)");
            } else {
                println!("accounts already exist; nothing to seed");
            }
        }
        "register" => {
            let name = positional(rest, 0, "register", "name")?;
            let email = positional(rest, 1, "register", "email")?;
            let password = positional(rest, 2, "register", "password")?;
            let profile = accounts.register(&name, &email, &password)?;
            println!("registered {} <{}>", profile.name, profile.email);
        }
        "login" => {
            let email = positional(rest, 0, "login", "email")?;
            let password = positional(rest, 1, "login", "password")?;
            let session = accounts.login(&email, &password)?;
            println!("logged in as {} <{}>", session.name(), session.email());
        }
        "logout" => {
            accounts.logout()?;
            println!("logged out");
        }
        "whoami" => match accounts.current_user()? {
            Some(session) => println!(
                "{} <{}> (since {})",
                session.name(),
                session.email(),
                session.login_time()
            ),
            None => println!("not logged in"),
        },
        "courses" => {
            require_session(&accounts)?;
            for course in catalog.courses() {
                let report = progress.course_progress(course.id())?;
                println!(
                    "{} {} {} — {} · {} · {}%",
                    course.id(),
                    course.icon(),
                    course.title(),
                    course.duration(),
                    course.level(),
                    report.percentage
                );
            }
        }
        "course" => {
            require_session(&accounts)?;
            let id: CourseId = positional(rest, 0, "course", "id")?.parse()?;
            let Some(course) = catalog.course(id) else {
                return Err(format!("no course with id {id}").into());
            };
            let report = progress.course_progress(id)?;

            println!("{} {} ({} · {})", course.icon(), course.title(), course.duration(), course.level());
            println!("{}", course.description());
            println!(
                "{} of {} lessons completed ({}%)",
                report.completed, report.total, report.percentage
            );
            for (index, lesson) in course.lessons().iter().enumerate() {
                let mark = if report.completed_lessons.contains(&lesson.id()) {
                    "x"
                } else {
                    " "
                };
                println!(
                    "  [{mark}] {}. {} ({})",
                    index + 1,
                    lesson.title(),
                    lesson.duration()
                );
            }
        }
        "toggle" => {
            require_session(&accounts)?;
            let course: CourseId = positional(rest, 0, "toggle", "course-id")?.parse()?;
            let lesson: LessonId = positional(rest, 1, "toggle", "lesson-id")?.parse()?;
            progress.toggle_lesson(course, lesson)?;

            let report = progress.course_progress(course)?;
            let state = if report.completed_lessons.contains(&lesson) {
                "completed"
            } else {
                "not completed"
            };
            println!(
                "lesson {lesson} of course {course}: {state} ({}%)",
                report.percentage
            );
        }
        "complete" => {
            require_session(&accounts)?;
            let course: CourseId = positional(rest, 0, "complete", "course-id")?.parse()?;
            progress.mark_course_complete(course)?;
            let report = progress.course_progress(course)?;
            println!(
                "course {course}: {} of {} lessons completed",
                report.completed, report.total
            );
        }
        "stats" => {
            require_session(&accounts)?;
            let stats = progress.stats()?;
            println!(
                "{} courses: {} completed, {} in progress",
                stats.total, stats.completed, stats.in_progress
            );
        }
        other => {
            print_usage();
            return Err(ArgsError::UnknownCommand(other.to_owned()).into());
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_flag_overrides_default() {
        let mut argv = vec![
            "--data".to_string(),
            "/tmp/custom".to_string(),
            "whoami".to_string(),
        ];
        let dir = extract_data_dir(&mut argv).unwrap();
        assert_eq!(dir, "/tmp/custom");
        assert_eq!(argv, vec!["whoami".to_string()]);
    }

    #[test]
    fn data_dir_flag_without_value_errors() {
        let mut argv = vec!["whoami".to_string(), "--data".to_string()];
        let err = extract_data_dir(&mut argv).unwrap_err();
        assert!(matches!(err, ArgsError::MissingValue { flag: "--data" }));
    }

    #[test]
    fn positional_reports_the_missing_argument() {
        let argv = vec!["ada@example.com".to_string()];
        assert_eq!(
            positional(&argv, 0, "login", "email").unwrap(),
            "ada@example.com"
        );
        let err = positional(&argv, 1, "login", "password").unwrap_err();
        assert_eq!(err.to_string(), "login requires <password>");
    }
}
