mod cli;
mod commands;
mod inputs;

use leadership_360::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
