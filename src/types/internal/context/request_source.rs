use std::fmt;

/// Where an operation was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// HTTP endpoint
    API,

    /// Administrative CLI command
    CLI,

    /// Automated operation (seeding, maintenance)
    System,
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::API => "api",
            Self::CLI => "cli",
            Self::System => "system",
        };
        f.write_str(label)
    }
}
