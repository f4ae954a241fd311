use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("State not registered: {name}")]
    StateNotFound { name: &'static str },
    #[error("Command not registered: {name}")]
    CommandNotFound { name: &'static str },
    #[error("No tokio runtime entered; commands cannot be spawned")]
    NoRuntime,
}

impl Error {
    pub fn state_not_found<T>() -> Self {
        Self::StateNotFound {
            name: std::any::type_name::<T>(),
        }
    }

    pub fn command_not_found<T>() -> Self {
        Self::CommandNotFound {
            name: std::any::type_name::<T>(),
        }
    }
}
