//! Announcement post bodies.
//!
//! Builds the HTML fragment posted to the forum for a nightly build: a
//! header with a release-notes link, a "Downloads" label, and one download
//! link per runtime identifier and build variant, followed by source
//! archive links. The output is pure — identical inputs always produce a
//! byte-identical fragment.

use maud::{html, Markup, PreEscaped, Render};

use crate::version::{version_build, version_build_hash};

/// Repository all release artifacts are published under. The URL shapes
/// derived from this are a compatibility contract with the release
/// pipeline and must not change.
pub const RELEASE_REPO_URL: &str = "https://github.com/AscensionGameDev/Intersect-Engine";

/// A packaging variant of a nightly build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildVariant {
    /// Segment used in the artifact filename.
    pub name: &'static str,
    /// Human-readable description shown in the link text.
    pub description: &'static str,
}

/// Packaging variants in the order they are listed for every platform.
pub const BUILD_VARIANTS: [BuildVariant; 3] = [
    BuildVariant {
        name: "full",
        description: "Full (includes the new engine binaries, and all stock assets)",
    },
    BuildVariant {
        name: "upgrade",
        description: "Upgrade (includes the new engine binaries, and the stock assets that have changed since the first nightly of the previous version)",
    },
    BuildVariant {
        name: "patch",
        description: "Patch (only includes the new engine binaries)",
    },
];

/// Human-readable name for a runtime identifier such as "linux-x64".
///
/// The identifier splits on the first `-` into an operating system and an
/// optional architecture. Operating systems outside the known set pass
/// through verbatim.
pub fn runtime_pretty_name(runtime_identifier: &str) -> String {
    let (system, architecture) = match runtime_identifier.split_once('-') {
        Some((system, architecture)) => (system, Some(architecture)),
        None => (runtime_identifier, None),
    };

    let system_name = match system {
        "android" => "Android",
        "browser" => "Browser",
        "ios" => "iOS",
        "linux" => "Linux",
        "osx" => "MacOS",
        "win" => "Windows",
        other => other,
    };

    match architecture {
        Some(architecture) if !architecture.is_empty() => {
            format!("{} ({})", system_name, architecture)
        }
        _ => system_name.to_string(),
    }
}

/// One download link for a runtime identifier and build variant.
struct DownloadLink<'a> {
    runtime_identifier: &'a str,
    variant: BuildVariant,
    version_build: &'a str,
    version_build_hash: &'a str,
}

impl DownloadLink<'_> {
    fn href(&self) -> String {
        // The filename segment joins the nonempty parts of
        // {runtime identifier, variant} so platform-agnostic builds have
        // no platform prefix.
        let segment = [self.runtime_identifier, self.variant.name]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("-");
        format!(
            "{}/releases/download/v{}/intersect-{}-{}.zip",
            RELEASE_REPO_URL, self.version_build, segment, self.version_build_hash
        )
    }
}

impl Render for DownloadLink<'_> {
    fn render(&self) -> Markup {
        let text = format!(
            "{} - {}",
            runtime_pretty_name(self.runtime_identifier),
            self.variant.description
        );
        html! {
            li {
                a href=(self.href()) rel="external nofollow" { (text) }
            }
        }
    }
}

/// Builds the announcement post body for a nightly build.
///
/// Platforms are listed in input order, each with every build variant in
/// the fixed [`BUILD_VARIANTS`] order. An empty `runtime_identifiers`
/// slice falls back to a single platform-agnostic entry. Duplicate
/// identifiers are kept as-is.
pub fn build_post_body(
    version: &str,
    build: u64,
    hash: &str,
    runtime_identifiers: &[String],
) -> String {
    let version_build = version_build(version, build);
    let version_build_hash = version_build_hash(version, build, hash);

    let platform_agnostic = [String::new()];
    let runtime_identifiers = if runtime_identifiers.is_empty() {
        &platform_agnostic[..]
    } else {
        runtime_identifiers
    };

    let release_tag_url = format!("{}/releases/tag/v{}", RELEASE_REPO_URL, version_build);
    let source_zip_url = format!(
        "{}/archive/refs/tags/v{}.zip",
        RELEASE_REPO_URL, version_build
    );
    let source_tar_gz_url = format!(
        "{}/archive/refs/tags/v{}.tar.gz",
        RELEASE_REPO_URL, version_build
    );

    let markup = html! {
        p {
            span style="font-size:1.5rem;" {
                strong {
                    "v" (version_build) " ("
                    a href=(release_tag_url) rel="external nofollow" { "Release Notes" }
                    ")"
                }
            }
            br;
            (PreEscaped("&nbsp;"))
        }
        p {
            span style="font-size:1rem;" {
                strong { "Downloads" }
            }
        }
        ul {
            @for runtime_identifier in runtime_identifiers {
                @for variant in BUILD_VARIANTS {
                    (DownloadLink {
                        runtime_identifier: runtime_identifier.as_str(),
                        variant,
                        version_build: &version_build,
                        version_build_hash: &version_build_hash,
                    })
                }
            }
            li {
                a href=(source_zip_url) rel="external nofollow" { "Source (.zip)" }
            }
            li {
                a href=(source_tar_gz_url) rel="external nofollow" { "Source (.tar.gz)" }
            }
        }
    };

    markup.into_string()
}
