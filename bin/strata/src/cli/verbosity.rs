/// Targets that follow the selected verbosity. Events from any other target are capped at
/// ``warn``.
const STRATA_TARGETS: [&str; 4] = [
    "strata",
    "strata_consensus",
    "strata_interop",
    "strata_network_spec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }

    /// ``EnvFilter`` directive scoping the level to the strata crates.
    pub fn directive(&self) -> String {
        let default = match self {
            Verbosity::Error => Verbosity::Error,
            _ => Verbosity::Warn,
        };

        let mut directive = default.as_str().to_string();
        for target in STRATA_TARGETS {
            directive.push_str(&format!(",{target}={}", self.as_str()));
        }
        directive
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, <Verbosity as TryFrom<u8>>::Error> {
        match level {
            1 => Ok(Verbosity::Error),
            2 => Ok(Verbosity::Warn),
            3 => Ok(Verbosity::Info),
            4 => Ok(Verbosity::Debug),
            5 => Ok(Verbosity::Trace),
            _ => Err(format!("verbosity must be between 1 and 5, got {level}")),
        }
    }
}

pub fn verbosity_parser(s: &str) -> Result<Verbosity, String> {
    s.parse::<u8>().map_err(|err| err.to_string())?.try_into()
}
