//! Messaging-app deep links for product enquiries.
//!
//! The page already carries a floating contact link whose href is
//! `<base><digits>`. The detail view reuses those digits to build a link that
//! opens a chat with a prefilled message naming the product.

/// Phone number of the page's contact link plus the base it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    base: String,
    digits: String,
}

impl ContactLink {
    pub fn new(base: impl Into<String>, digits: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            digits: digits.into(),
        }
    }

    /// Build from the href of the page's contact link, if there is one.
    ///
    /// A missing link yields an empty number: the deep link still opens the
    /// app, just without a preselected chat.
    pub fn from_page_href(base: &str, href: Option<&str>) -> Self {
        let digits = href.map(|h| digits_from_href(h, base)).unwrap_or_default();
        Self::new(base, digits)
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// `<base><digits>?text=<url-encoded message>`.
    pub fn message_url(&self, message: &str) -> String {
        format!(
            "{}{}?text={}",
            self.base,
            self.digits,
            urlencoding::encode(message)
        )
    }
}

/// Strip the known base from a contact href and keep only the digits.
///
/// Anything that is not an ASCII digit is dropped, so a placeholder href
/// such as `#` collapses to an empty number.
pub fn digits_from_href(href: &str, base: &str) -> String {
    let rest = href.strip_prefix(base).unwrap_or(href);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    rest.chars().filter(char::is_ascii_digit).collect()
}
