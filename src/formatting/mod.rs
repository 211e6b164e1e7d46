use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }

    /// Apply this mode to the `colored` crate's global switch.
    pub fn apply(&self) {
        colored::control::set_override(self.should_use_color());
    }

    /// Mode requested by the environment (`NO_COLOR`, `CLICOLOR`,
    /// `CLICOLOR_FORCE`), `Auto` otherwise.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("NO_COLOR").ok(),
            env::var("CLICOLOR").ok(),
            env::var("CLICOLOR_FORCE").ok(),
        )
    }

    fn from_vars(
        no_color: Option<String>,
        clicolor: Option<String>,
        clicolor_force: Option<String>,
    ) -> Self {
        if clicolor_force.as_deref() == Some("1") {
            Self::Always
        } else if no_color.is_some() || clicolor.as_deref() == Some("0") {
            Self::Never
        } else {
            Self::Auto
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
