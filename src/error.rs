// One error type for the whole crate.
// Every variant states *where* things went wrong.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Level or tile data that cannot be drawn (odd pillar, bad tile index, ...).
    #[error("format error: {0}")]
    Format(String),

    /// The baked image buffer could not be sized or allocated.
    #[error("resource error: {0}")]
    Resource(String),

    /// Creating or updating the window failed.
    #[error("window error: {0}")]
    Window(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("level file error: {0}")]
    Level(#[from] serde_json::Error),
}

impl Error {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(Error::format("x").to_string().starts_with("format error:"));
        assert!(Error::resource("x").to_string().starts_with("resource error:"));
        assert!(Error::window("x").to_string().starts_with("window error:"));
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = std::io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("boom"));
    }
}
