/// What the running platform supports when launching the engine.
///
/// Chosen once with [`PlatformCaps::current`] and passed to whoever spawns
/// processes, so tests can pretend to be another platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformCaps {
    pub exe_suffix:     &'static str,
    /// Process creation flags (Windows `CreationFlags`; ignored elsewhere).
    pub creation_flags: u32,
    /// Binary data written to stdout arrives intact.
    pub binary_stdout:  bool,
}

/// `CREATE_NO_WINDOW`.
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

impl PlatformCaps {
    pub const UNIX: Self = Self {
        exe_suffix:     "",
        creation_flags: 0,
        binary_stdout:  true,
    };

    pub const WINDOWS: Self = Self {
        exe_suffix:     ".exe",
        creation_flags: CREATE_NO_WINDOW,
        binary_stdout:  false,
    };

    pub const fn current() -> Self {
        if cfg!(windows) { Self::WINDOWS } else { Self::UNIX }
    }

    pub fn executable(&self, stem: &str) -> String {
        format!("{stem}{}", self.exe_suffix)
    }
}

impl Default for PlatformCaps {
    fn default() -> Self { Self::current() }
}
