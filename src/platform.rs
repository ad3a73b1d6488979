//! Platform registry and host detection
//!
//! The tables below are the only source of truth for what the compiler can
//! target. A target is supported only when its `{os}_{arch}` string is listed
//! in [`SUPPORTED_TARGETS`]; knowing the OS and the architecture separately is
//! not enough (e.g. `freestanding_amd64` is rejected while
//! `freestanding_amd64_sysv` is accepted).
//!
//! Host detection never fails: unrecognised values are passed through as-is
//! and rejected later by [`is_supported_target`].

/// Operating systems known to the compiler
pub const SUPPORTED_OPERATING_SYSTEMS: &[&str] = &[
    "darwin",
    "essence",
    "linux",
    "windows",
    "freebsd",
    "netbsd",
    "openbsd",
    "haiku",
    "freestanding",
    "wasi",
    "js",
    "orca",
];

/// Architectures known to the compiler
pub const SUPPORTED_ARCHITECTURES: &[&str] = &[
    "i386",
    "amd64",
    "arm64",
    "arm32",
    "riscv64",
    "wasm32",
    "wasm64p32",
    "amd64_sysv",
    "amd64_win64",
];

/// `{os}_{arch}` pairs that can actually be built
pub const SUPPORTED_TARGETS: &[&str] = &[
    "darwin_amd64",
    "darwin_arm64",
    "essence_amd64",
    "linux_i386",
    "linux_amd64",
    "linux_arm64",
    "linux_arm32",
    "linux_riscv64",
    "windows_i386",
    "windows_amd64",
    "freebsd_i386",
    "freebsd_amd64",
    "freebsd_arm64",
    "netbsd_amd64",
    "netbsd_arm64",
    "openbsd_amd64",
    "haiku_amd64",
    "freestanding_wasm32",
    "wasi_wasm32",
    "js_wasm32",
    "orca_wasm32",
    "freestanding_wasm64p32",
    "js_wasm64p32",
    "wasi_wasm64p32",
    "freestanding_amd64_sysv",
    "freestanding_amd64_win64",
    "freestanding_arm64",
    "freestanding_arm32",
    "freestanding_riscv64",
];

/// Render the target string used both on the command line and as lookup key
pub fn target_string(os: &str, arch: &str) -> String {
    format!("{}_{}", os, arch)
}

pub fn is_supported_os(os: &str) -> bool {
    SUPPORTED_OPERATING_SYSTEMS.contains(&os)
}

pub fn is_supported_arch(arch: &str) -> bool {
    SUPPORTED_ARCHITECTURES.contains(&arch)
}

/// Check whether `(os, arch)` is an explicitly listed target
pub fn is_supported_target(os: &str, arch: &str) -> bool {
    let target = target_string(os, arch);
    SUPPORTED_TARGETS.contains(&target.as_str())
}

/// Iterate the supported targets as `(os, arch)` pairs
///
/// OS names never contain an underscore, so the first `_` separates the two
/// halves (`freestanding_amd64_sysv` → `("freestanding", "amd64_sysv")`).
pub fn supported_targets() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED_TARGETS
        .iter()
        .filter_map(|target| target.split_once('_'))
}

/// Normalise a raw OS name reported by the host
pub fn detect_host_os(raw: &str) -> String {
    let os = raw.to_lowercase();
    match os.as_str() {
        "linux" => "linux".to_string(),
        "darwin" => "darwin".to_string(),
        "windows" => "windows".to_string(),
        _ => os,
    }
}

/// Normalise a raw machine name reported by the host
pub fn detect_host_arch(raw: &str) -> String {
    let arch = raw.to_lowercase();
    match arch.as_str() {
        "x86_64" => "amd64".to_string(),
        "i386" => "i386".to_string(),
        "arm64" => "arm64".to_string(),
        "arm" => "arm32".to_string(),
        _ => arch,
    }
}

/// Source of raw, unnormalised host identifiers
pub trait HostEnvironment {
    /// Kernel-style OS name, e.g. `Linux`, `Darwin`, `Windows`
    fn raw_os(&self) -> String;

    /// Machine name, e.g. `x86_64`, `arm64`, `aarch64`
    fn raw_machine(&self) -> String;
}

/// Host introspection for the running process
///
/// Reports names the way `uname` does, so macOS is `darwin` and Apple
/// silicon is `arm64`, while Linux on 64-bit ARM stays `aarch64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl HostEnvironment for SystemHost {
    fn raw_os(&self) -> String {
        match std::env::consts::OS {
            "macos" => "darwin".to_string(),
            other => other.to_string(),
        }
    }

    fn raw_machine(&self) -> String {
        match (std::env::consts::OS, std::env::consts::ARCH) {
            ("macos", "aarch64") => "arm64".to_string(),
            (_, "x86") => "i386".to_string(),
            (_, arch) => arch.to_string(),
        }
    }
}

/// Detected OS of the given host
pub fn host_os_of(host: &dyn HostEnvironment) -> String {
    detect_host_os(&host.raw_os())
}

/// Detected architecture of the given host
pub fn host_arch_of(host: &dyn HostEnvironment) -> String {
    detect_host_arch(&host.raw_machine())
}

pub fn host_os() -> String {
    host_os_of(&SystemHost)
}

pub fn host_arch() -> String {
    host_arch_of(&SystemHost)
}
