//! projgen's main application entry point.
//! Parses arguments, sets up logging and dispatches to the library operations.

use projgen::{
    cli::{get_args, Args, Command},
    error::{default_error_handler, Result},
    generate, inspect,
    logger::init_logger,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    match &args.command {
        Command::Version => {
            println!("projgen version {}", env!("CARGO_PKG_VERSION"));
        }
        Command::Inspect { marker } => {
            let (template_dir, project_type) = args.template_location()?;
            let params = inspect(&template_dir, &project_type, marker)?;
            println!("Template requires the following parameters:");
            for param in params {
                println!(" - {param}");
            }
        }
        Command::Generate { .. } => {
            if let Some(options) = args.generate_options()? {
                let project = generate(&options)?;
                log::debug!(
                    "{} files rendered, {} files copied",
                    project.files_rendered.len(),
                    project.files_copied.len()
                );
                println!("Project generated successfully!");
            }
        }
    }
    Ok(())
}
