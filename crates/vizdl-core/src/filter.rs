//! Include/exclude predicates applied to each catalog entry before download.

use crate::catalog::CatalogEntry;
use std::fmt;

/// Tag id AppSource attaches to visuals that passed Power BI certification.
pub const CERTIFIED_TAG: &str = "PowerBICertified";

/// Publisher name of first-party visuals (compared exactly).
pub const MICROSOFT_PUBLISHER: &str = "Microsoft Corporation";

/// Which entries to keep. With both flags off every entry passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadFilter {
    pub certified_only: bool,
    pub microsoft_only: bool,
}

/// Why an entry was skipped. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotCertified,
    NotMicrosoft { publisher: String },
    /// The catalog listed the entry without a download link.
    NoDownloadLink,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotCertified => write!(f, "not certified"),
            SkipReason::NotMicrosoft { publisher } => {
                write!(f, "publisher \"{}\" is not {}", publisher, MICROSOFT_PUBLISHER)
            }
            SkipReason::NoDownloadLink => write!(f, "no download link"),
        }
    }
}

impl DownloadFilter {
    pub fn new(certified_only: bool, microsoft_only: bool) -> Self {
        Self {
            certified_only,
            microsoft_only,
        }
    }

    /// `Ok(())` if `entry` passes every enabled filter; otherwise the first
    /// failing check (certification is checked before publisher).
    pub fn check(&self, entry: &CatalogEntry) -> Result<(), SkipReason> {
        if self.certified_only && !entry.has_tag(CERTIFIED_TAG) {
            return Err(SkipReason::NotCertified);
        }
        if self.microsoft_only && entry.publisher != MICROSOFT_PUBLISHER {
            return Err(SkipReason::NotMicrosoft {
                publisher: entry.publisher.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Tag;

    fn entry(publisher: &str, certified: bool) -> CatalogEntry {
        let mut tags = vec![Tag {
            id: "Visualization".to_string(),
        }];
        if certified {
            tags.push(Tag {
                id: CERTIFIED_TAG.to_string(),
            });
        }
        CatalogEntry {
            title: "Visual".to_string(),
            download_url: "https://example.com/v.pbiviz".to_string(),
            publisher: publisher.to_string(),
            tags,
        }
    }

    #[test]
    fn no_filters_accept_everything() {
        let f = DownloadFilter::default();
        assert!(f.check(&entry("Contoso", false)).is_ok());
        assert!(f.check(&entry(MICROSOFT_PUBLISHER, true)).is_ok());
    }

    #[test]
    fn certified_only_rejects_uncertified_regardless_of_publisher() {
        for microsoft_only in [false, true] {
            let f = DownloadFilter::new(true, microsoft_only);
            assert_eq!(
                f.check(&entry(MICROSOFT_PUBLISHER, false)),
                Err(SkipReason::NotCertified)
            );
            assert_eq!(f.check(&entry("Contoso", false)), Err(SkipReason::NotCertified));
        }
    }

    #[test]
    fn microsoft_only_rejects_third_party_regardless_of_certification() {
        for certified_only in [false, true] {
            let f = DownloadFilter::new(certified_only, true);
            assert_eq!(
                f.check(&entry("Contoso", true)),
                Err(SkipReason::NotMicrosoft {
                    publisher: "Contoso".to_string()
                })
            );
        }
    }

    #[test]
    fn entry_satisfying_both_passes() {
        let f = DownloadFilter::new(true, true);
        assert_eq!(f.check(&entry(MICROSOFT_PUBLISHER, true)), Ok(()));
    }

    #[test]
    fn publisher_match_is_exact() {
        let f = DownloadFilter::new(false, true);
        assert!(f.check(&entry("microsoft corporation", true)).is_err());
        assert!(f.check(&entry("Microsoft", true)).is_err());
        assert!(f.check(&entry("Microsoft Corporation ", true)).is_err());
    }

    #[test]
    fn skip_reason_message() {
        let reason = SkipReason::NotMicrosoft {
            publisher: "Contoso".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "publisher \"Contoso\" is not Microsoft Corporation"
        );
    }
}
