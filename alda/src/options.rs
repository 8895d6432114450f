//! Closure expansion options.

/// Options controlling how the dependency closure is expanded.
///
/// The defaults resolve runtime dependencies together with source RPMs and
/// debuginfo subpackages; self-hosting and fulltree expansion are opt-in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Ingest every alternative solution of a resolution, not just the
    /// first.
    pub greedy: bool,
    /// Include matching source RPMs in the result.
    pub source: bool,
    /// For every included source RPM, include its build dependency closure.
    pub selfhosting: bool,
    /// For every included binary package, include its debuginfo subpackage.
    pub debuginfo: bool,
    /// For every included binary package, include every sibling subpackage
    /// built from the same source RPM.
    pub fulltree: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            greedy: false,
            source: true,
            selfhosting: false,
            debuginfo: true,
            fulltree: false,
        }
    }
}
