//! newtex's application entry point.
//! Parses arguments, collects any missing input interactively and hands the
//! validated request to the scaffolder.

use chrono::Local;
use newtex::{
    clean::clean,
    cli::{get_args, Args, Command},
    config::load_config,
    error::{default_error_handler, Error, Result},
    git::SystemRunner,
    prompt::DialoguerPrompter,
    renderer::PlaceholderRenderer,
    runner::{create_project, get_config_dir},
    scaffold::ProjectDirectory,
    setup::configure,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(args) {
        Ok(()) => {}
        Err(Error::Cancelled) => println!("Aborted. Nothing was created."),
        Err(err) => default_error_handler(err),
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Runs `clean` and returns, if requested
/// 2. Runs the setup wizard and returns, if `--reconfigure` is given
/// 3. Otherwise collects, confirms and scaffolds the project, then prints the result
fn run(args: Args) -> Result<()> {
    if let Some(Command::Clean { dir }) = &args.command {
        for path in clean(dir)? {
            println!("Removed '{}'", path.display());
        }
        return Ok(());
    }

    let prompt = DialoguerPrompter::new();
    let today = Local::now().date_naive();

    if args.reconfigure {
        let config_dir = get_config_dir(&args)?;
        let existing = load_config(&config_dir).ok();
        configure(&prompt, &config_dir, existing.as_ref(), today)?;
        return Ok(());
    }

    let engine = PlaceholderRenderer::new();
    let runner = SystemRunner;
    let project = create_project(&args, &prompt, &engine, &runner, today)?;
    print_summary(&project);
    Ok(())
}

fn print_summary(project: &ProjectDirectory) {
    println!("Created '{}'.", project.path.display());
    println!("  document:      {}", project.document.display());
    println!("  bibliography:  {}", project.bibliography.display());
    println!("  shared remote: {}", project.remote.display());
    println!("  large figures: {}", project.large_figs_dir.display());
    println!();
    println!(
        "Share '{}' with your collaborators; they can start with",
        project.remote.display()
    );
    println!();
    println!("    git clone {}", project.remote.display());
    println!();
    println!(
        "and keep large figures in '{}'.",
        project.large_figs_dir.display()
    );
}
