//! Client display name derivation
//!
//! When the operator does not supply a name, one is derived from the site
//! URL's hostname: drop a leading `www.`, take the first DNS label, and
//! capitalize it.

use url::Url;

/// `https://www.example.com/about` → `Example`.
pub fn derive_client_name(site_url: &Url) -> Option<String> {
    let host = site_url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = host.split('.').next().filter(|l| !l.is_empty())?;

    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
