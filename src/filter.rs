use log::debug;
use regex::Regex;

/// Compiled SSID filter. An empty or unparseable pattern degrades to
/// match-everything, so an operator typo never blanks out the scan.
pub struct SsidFilter {
    // None means match everything
    regex: Option<Regex>,
}

impl SsidFilter {
    /// Compiles the live filter text. Called fresh on every scan cycle so
    /// the user can retune the filter while scanning continues.
    pub fn compile(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self { regex: None };
        }
        // anchored: the filter matches whole SSIDs, not substrings
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => Self { regex: Some(regex) },
            Err(err) => {
                debug!("invalid SSID filter {pattern:?}, matching everything: {err}");
                Self { regex: None }
            }
        }
    }

    pub fn matches(&self, ssid: &str) -> bool {
        self.regex.as_ref().map_or(true, |regex| regex.is_match(ssid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_everything() {
        let filter = SsidFilter::compile("");
        assert!(filter.matches("CafeNet"));
        assert!(filter.matches(""));
    }

    #[test]
    fn invalid_pattern_matches_everything() {
        let filter = SsidFilter::compile("(unclosed");
        assert!(filter.matches("CafeNet"));
        assert!(filter.matches("anything at all"));
    }

    #[test]
    fn pattern_filters_ssids() {
        let filter = SsidFilter::compile("Cafe.*");
        assert!(filter.matches("CafeNet"));
        assert!(filter.matches("Cafe"));
        assert!(!filter.matches("HomeNet"));
    }

    #[test]
    fn pattern_matches_whole_ssid_only() {
        let filter = SsidFilter::compile("Cafe");
        assert!(filter.matches("Cafe"));
        assert!(!filter.matches("CafeNet"));
        assert!(!filter.matches("InternetCafe"));
    }
}
