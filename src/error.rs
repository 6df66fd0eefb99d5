use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("No session in progress (run `tempo start` first)")]
    NotStarted,

    #[error("Not a git repository (or any of the parent directories)")]
    NotARepo,

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Git(#[from] GitError),
}

impl AppError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum GitError {
    #[error("git not found. Is git installed and on your PATH?")]
    NotFound,

    #[error("Failed to run git: {0}")]
    Spawn(std::io::Error),

    #[error("Invalid UTF-8 from git: {0}")]
    Utf8(std::string::FromUtf8Error),

    #[error("git {command} failed: {detail}")]
    Command { command: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_display_not_started() {
        assert_eq!(
            AppError::NotStarted.to_string(),
            "No session in progress (run `tempo start` first)"
        );
    }

    #[test]
    fn app_error_display_not_a_repo() {
        assert_eq!(
            AppError::NotARepo.to_string(),
            "Not a git repository (or any of the parent directories)"
        );
    }

    #[test]
    fn app_error_display_io_includes_path() {
        let e = AppError::io(
            Path::new("/tmp/tempo/checkpoint"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(e.to_string(), "/tmp/tempo/checkpoint: denied");
    }

    #[test]
    fn git_error_not_found() {
        assert_eq!(
            GitError::NotFound.to_string(),
            "git not found. Is git installed and on your PATH?"
        );
    }

    #[test]
    fn git_error_command() {
        let e = GitError::Command {
            command: "push".to_string(),
            detail: "remote rejected".to_string(),
        };
        assert_eq!(e.to_string(), "git push failed: remote rejected");
    }

    #[test]
    fn app_error_from_git_error() {
        let git = GitError::Command {
            command: "merge".to_string(),
            detail: "unrelated histories".to_string(),
        };
        let app: AppError = git.into();
        assert_eq!(app.to_string(), "git merge failed: unrelated histories");
    }
}
