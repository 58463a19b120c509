use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlToolError {
    #[error("XML parse error: {0}")]
    Parse(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    Emit(#[from] xmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no element matched tag {0:?}")]
    TagNotFound(String),

    #[error("tag {tag:?} matched {count} element(s), index {index} is out of range")]
    IndexOutOfRange {
        tag: String,
        index: usize,
        count: usize,
    },

    #[error("invalid occurrence selector {0:?}, expected \"All\" or an integer")]
    BadOccurrence(String),
}
