use std::fmt;

#[derive(Debug)]
pub enum AgehistError {
    Io(std::io::Error),
    Config(String),
    Pool(String),
    Report(String),
}

impl fmt::Display for AgehistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgehistError::Io(e) => write!(f, "IO error: {}", e),
            AgehistError::Config(e) => write!(f, "Configuration error: {}", e),
            AgehistError::Pool(e) => write!(f, "Thread pool error: {}", e),
            AgehistError::Report(e) => write!(f, "Report error: {}", e),
        }
    }
}

impl std::error::Error for AgehistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgehistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AgehistError {
    fn from(err: std::io::Error) -> Self {
        AgehistError::Io(err)
    }
}

impl From<serde_json::Error> for AgehistError {
    fn from(err: serde_json::Error) -> Self {
        AgehistError::Report(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for AgehistError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AgehistError::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AgehistError::Config("workers must be at least 1".to_string());
        assert_eq!(err.to_string(), "Configuration error: workers must be at least 1");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AgehistError = io.into();
        assert!(err.to_string().starts_with("IO error:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
