mod app;

use std::process::ExitCode;

use app::error::UsageError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let program = app::program_name();

    match app::run(&program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {:#}", program, err);
            if err.downcast_ref::<UsageError>().is_some() {
                eprintln!("Try '{} -h' for more information.", program);
            }
            ExitCode::from(1)
        }
    }
}
