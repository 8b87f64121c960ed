//! Call-site decoration for diagnostic messages

use std::fmt;
use std::path::Path;

/// Source location of the code reporting a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, module: &'static str) -> Self {
        Self { file, line, module }
    }

    /// Prefix an error with `file.rs:LINE: module(): `.
    pub fn decorate(&self, err: &dyn fmt::Display) -> String {
        format!("{}: {}", self, err)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file);
        write!(f, "{}:{}: {}()", file, self.line, self.module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decorate() {
        let site = CallSite::new("src/sinks/file.rs", 42, "rust_multilog::sinks::file");
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            site.decorate(&err),
            "file.rs:42: rust_multilog::sinks::file(): denied"
        );
    }

    #[test]
    fn test_decorate_macro_uses_invocation_site() {
        let line = line!() + 1;
        let message = crate::decorate!("boom");
        assert!(message.starts_with(&format!("call_site.rs:{}: ", line)));
        assert!(message.ends_with("(): boom"));
    }
}
