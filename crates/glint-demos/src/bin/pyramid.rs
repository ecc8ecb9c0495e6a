use glint_demos::pyramid;
use glint_engine::logging::{init_logging, LoggingConfig};

fn main() {
    init_logging(LoggingConfig::stdout());

    let path = glint_demos::texture_path_from(std::env::args(), pyramid::DEFAULT_TEXTURE);
    glint_demos::exit_on_error(pyramid::run(&path));
}
