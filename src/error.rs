use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolverError>;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("invalid board: {message}")]
    InvalidBoard { message: String },

    #[error("position ({x}, {y}) is out of bounds for a {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("invalid rotation x={x} y={y} n={n} on a {board_size}x{board_size} board")]
    InvalidOperation {
        x: usize,
        y: usize,
        n: usize,
        board_size: usize,
    },

    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolverError {
    pub fn invalid_board(message: impl Into<String>) -> Self {
        Self::InvalidBoard {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SolverError;

    #[test]
    fn invalid_input_renders_its_message() {
        let error = SolverError::invalid_input("entities count 3 does not match size 2");
        assert_eq!(
            error.to_string(),
            "invalid input: entities count 3 does not match size 2"
        );
    }

    #[test]
    fn invalid_operation_names_the_offending_rotation() {
        let error = SolverError::InvalidOperation {
            x: 3,
            y: 0,
            n: 2,
            board_size: 4,
        };
        assert_eq!(
            error.to_string(),
            "invalid rotation x=3 y=0 n=2 on a 4x4 board"
        );
    }
}
