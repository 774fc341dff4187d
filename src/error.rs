use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "jar-utils")]
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("class parse error: {0}")]
    ClassParse(#[from] binrw::Error),

    #[error("constant pool index {index} is not a {expected} entry")]
    BadConstant { index: u16, expected: &'static str },

    #[error("class bytes not found for {0}")]
    ClassNotFound(String),
}

pub type EnhanceResult<T> = Result<T, EnhanceError>;
