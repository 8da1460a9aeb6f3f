//! Shopify Admin API version selection.

use core::fmt;

/// Errors that can occur when parsing an [`ApiVersion`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiVersionError {
    /// The input string is empty.
    #[error("api version cannot be empty")]
    Empty,
    /// The input is neither `stable` nor a `YYYY-MM` release.
    #[error("invalid api version {0:?}: expected \"stable\" or a release like 2020-04")]
    Malformed(String),
}

/// Admin API version a client is bound to.
///
/// `Stable` requests omit the version segment so Shopify answers with its
/// current stable release. `Release` pins a quarterly `YYYY-MM` version.
///
/// ## Examples
///
/// ```
/// use shopnado_core::ApiVersion;
///
/// assert_eq!(ApiVersion::parse("stable").unwrap(), ApiVersion::Stable);
/// assert_eq!(ApiVersion::parse("2020-04").unwrap().to_string(), "2020-04");
///
/// assert!(ApiVersion::parse("").is_err());
/// assert!(ApiVersion::parse("latest").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    #[default]
    Stable,
    Release(String),
}

impl ApiVersion {
    /// Parse an `ApiVersion` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, or is not `stable` and not
    /// of the form `YYYY-MM` with a two-digit month.
    pub fn parse(s: &str) -> Result<Self, ApiVersionError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ApiVersionError::Empty);
        }
        if s == "stable" {
            return Ok(Self::Stable);
        }

        let malformed = || ApiVersionError::Malformed(s.to_owned());
        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
        let month_ok = month.len() == 2
            && month
                .parse::<u8>()
                .is_ok_and(|m| (1..=12).contains(&m));
        if !(year_ok && month_ok) {
            return Err(malformed());
        }

        Ok(Self::Release(s.to_owned()))
    }

    /// Version string as shown to the user.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stable => "stable",
            Self::Release(v) => v,
        }
    }

    /// Path prefix for Admin REST resources under this version.
    #[must_use]
    pub fn admin_path(&self) -> String {
        match self {
            Self::Stable => "admin".to_owned(),
            Self::Release(v) => format!("admin/api/{v}"),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = ApiVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        assert_eq!(
            ApiVersion::parse("2019-10").unwrap(),
            ApiVersion::Release("2019-10".to_owned())
        );
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        assert!(matches!(
            ApiVersion::parse("2020-13"),
            Err(ApiVersionError::Malformed(_))
        ));
        assert!(ApiVersion::parse("2020-4").is_err());
        assert!(ApiVersion::parse("20-04").is_err());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(ApiVersion::parse("  "), Err(ApiVersionError::Empty)));
    }

    #[test]
    fn test_admin_path() {
        assert_eq!(ApiVersion::Stable.admin_path(), "admin");
        assert_eq!(
            ApiVersion::parse("2020-01").unwrap().admin_path(),
            "admin/api/2020-01"
        );
    }
}
