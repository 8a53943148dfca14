// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Extractor selection

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::detect::Ecosystem;
use crate::extractors::{
    AntExtractor, Extractor, GoExtractor, GradleExtractor, MavenExtractor, PythonExtractor,
    RubyExtractor,
};

static MAVEN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Reactor Summary|mvn test)").expect("valid maven token regex"));

static GRADLE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"gradle").expect("valid gradle token regex"));

static ANT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ant").expect("valid ant token regex"));

/// Java build tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JavaTool {
    /// Apache Maven
    Maven,
    /// Gradle
    Gradle,
    /// Apache Ant
    Ant,
}

impl fmt::Display for JavaTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Ant => "ant",
        })
    }
}

fn reaches(re: &Regex, text: &str, threshold: usize) -> bool {
    re.find_iter(text).take(threshold).count() >= threshold
}

/// Find the Java build tool whose tokens reach `threshold`
///
/// Maven is tried first, then Gradle, then Ant. Returns `None` when no tool
/// left enough traces in the log.
#[must_use]
pub fn detect_java_tool(text: &str, threshold: usize) -> Option<JavaTool> {
    [
        (JavaTool::Maven, &MAVEN_TOKEN),
        (JavaTool::Gradle, &GRADLE_TOKEN),
        (JavaTool::Ant, &ANT_TOKEN),
    ]
    .into_iter()
    .find(|(_, re)| reaches(re, text, threshold))
    .map(|(tool, _)| tool)
}

/// Guess the Java build tool, falling back to Ant
#[must_use]
pub fn sniff_java_tool(text: &str, threshold: usize) -> JavaTool {
    detect_java_tool(text, threshold).unwrap_or(JavaTool::Ant)
}

/// Pick the extractor for a detected ecosystem
///
/// Returns `None` when no ecosystem was detected.
#[must_use]
pub fn select_extractor(
    ecosystem: Option<Ecosystem>,
    text: &str,
    config: &AnalyzerConfig,
) -> Option<Box<dyn Extractor>> {
    let extractor: Box<dyn Extractor> = match ecosystem? {
        Ecosystem::Java => {
            let tool = match detect_java_tool(text, config.tool_sniff_threshold) {
                Some(tool) => {
                    debug!(%tool, "Sniffed java build tool");
                    tool
                }
                None => {
                    warn!(
                        threshold = config.tool_sniff_threshold,
                        "No java build tool traces, assuming ant"
                    );
                    JavaTool::Ant
                }
            };
            match tool {
                JavaTool::Maven => Box::new(MavenExtractor::new()),
                JavaTool::Gradle => Box::new(GradleExtractor::new()),
                JavaTool::Ant => Box::new(AntExtractor::new()),
            }
        }
        Ecosystem::Ruby => Box::new(RubyExtractor::new()),
        Ecosystem::Python => Box::new(PythonExtractor::new()),
        Ecosystem::Go => Box::new(GoExtractor::new()),
    };
    Some(extractor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_sniff_maven() {
        let text = "$ mvn test -B\n[INFO] Reactor Summary:\n";
        assert_eq!(sniff_java_tool(text, 2), JavaTool::Maven);
    }

    #[test]
    fn test_sniff_gradle() {
        let text = "$ ./gradlew check\nDownloading https://services.gradle.org/distributions/gradle-2.2-bin.zip\n";
        assert_eq!(sniff_java_tool(text, 2), JavaTool::Gradle);
    }

    #[test]
    fn test_sniff_maven_beats_gradle() {
        let text = "gradle gradle gradle mvn test Reactor Summary";
        assert_eq!(sniff_java_tool(text, 2), JavaTool::Maven);
    }

    #[test]
    fn test_sniff_falls_back_to_ant() {
        assert_eq!(sniff_java_tool("$ make check", 2), JavaTool::Ant);
        assert_eq!(sniff_java_tool("", 2), JavaTool::Ant);
    }

    #[test]
    fn test_detect_requires_tool_traces() {
        assert_eq!(detect_java_tool("$ make check", 2), None);
        assert_eq!(detect_java_tool("", 2), None);
        assert_eq!(
            detect_java_tool("$ ant compile\n$ ant test\n", 2),
            Some(JavaTool::Ant)
        );
        assert_eq!(detect_java_tool("$ ant test\n", 2), None);
        assert_eq!(detect_java_tool("$ ant test\n", 1), Some(JavaTool::Ant));
    }

    #[test]
    fn test_select_by_ecosystem() {
        let config = AnalyzerConfig::default();
        let tag = |eco: Option<Ecosystem>, text: &str| {
            select_extractor(eco, text, &config)
                .map(|e| e.analyzer())
                .unwrap_or("none")
        };
        assert_eq!(tag(Some(Ecosystem::Java), "mvn test\nmvn test"), "java-maven");
        assert_eq!(tag(Some(Ecosystem::Java), "gradle\ngradle"), "java-gradle");
        assert_eq!(tag(Some(Ecosystem::Java), "javac"), "java-ant");
        assert_eq!(tag(Some(Ecosystem::Ruby), ""), "ruby");
        assert_eq!(tag(Some(Ecosystem::Python), ""), "python");
        assert_eq!(tag(Some(Ecosystem::Go), ""), "go");
        assert_eq!(tag(None, "mvn test mvn test"), "none");
    }
}
