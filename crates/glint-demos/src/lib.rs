//! The two glint demos.
//!
//! - [`pyramid`]: one static textured triangle
//! - [`bounce`]: a textured sprite bouncing under integer gravity
//!
//! Each binary takes an optional texture path as its first argument.

use std::path::PathBuf;

pub mod bounce;
pub mod pyramid;

/// First command-line argument as a path, or `default` when absent.
pub fn texture_path_from<I>(args: I, default: &str) -> PathBuf
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .nth(1)
        .filter(|a| !a.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Logs a setup failure and terminates with exit code -1.
///
/// Normal shutdown returns from `main` with code 0.
pub fn exit_on_error(result: anyhow::Result<()>) {
    if let Err(err) = result {
        log::error!("{err:#}");
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_path_without_argument() {
        assert_eq!(texture_path_from(args(&["bounce"]), "Assets/ball.png"), PathBuf::from("Assets/ball.png"));
    }

    #[test]
    fn first_argument_overrides_default() {
        assert_eq!(
            texture_path_from(args(&["bounce", "sprites/red.png", "ignored"]), "Assets/ball.png"),
            PathBuf::from("sprites/red.png")
        );
    }

    #[test]
    fn empty_argument_falls_back() {
        assert_eq!(texture_path_from(args(&["pyramid", ""]), "container.jpg"), PathBuf::from("container.jpg"));
    }
}
