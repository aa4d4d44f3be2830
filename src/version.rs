//! Build version metadata, embedded by vergen at compile time.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" outside a checkout.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Short git SHA at build time, or "unknown" outside a checkout.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Full version string: `{version}+{branch}.{sha}`, with `.dirty` appended
/// when the tree had uncommitted changes.
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!(
        "{PKG_VERSION}+{GIT_BRANCH}.{}{dirty_suffix}",
        &GIT_SHA[..7.min(GIT_SHA.len())]
    )
}

/// `User-Agent` header value sent with every provider request.
pub fn user_agent() -> String {
    format!("vetgate/{PKG_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_is_pkg_version_plus_build_metadata() {
        let version = version_string();
        let (pkg, build) = version.split_once('+').unwrap();
        assert_eq!(pkg, PKG_VERSION);
        assert!(build.starts_with(GIT_BRANCH));
    }

    #[test]
    fn version_string_abbreviates_sha() {
        let version = version_string();
        let build = version.split_once('+').unwrap().1;
        let sha = build
            .strip_suffix(".dirty")
            .unwrap_or(build)
            .rsplit('.')
            .next()
            .unwrap();
        assert!(sha.chars().count() <= 7, "sha segment {sha:?} not abbreviated");
    }

    #[test]
    fn user_agent_identifies_vetgate_release() {
        let agent = user_agent();
        assert_eq!(agent.split_once('/'), Some(("vetgate", PKG_VERSION)));
    }
}
