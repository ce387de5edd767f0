//! Download filename derivation.

use crowbar_extract::Identity;

/// Base name used when neither the source nor the page offers one.
pub const FALLBACK_BASENAME: &str = "untitled";

/// Derive the `.svg` filename for a source.
///
/// Preference order: the `name` attribute, the `id`, the `class`, the
/// sanitized page title, then `fallback`.  Empty values count as absent.
///
/// # Examples
///
/// ```
/// use crowbar_extract::Identity;
/// use crowbar_export::derive_filename;
///
/// let identity = Identity { id: Some("x".into()), ..Identity::default() };
/// assert_eq!(derive_filename(&identity, Some("My Report!"), "untitled"), "x.svg");
///
/// let anonymous = Identity::default();
/// assert_eq!(derive_filename(&anonymous, Some("My Report!"), "untitled"), "my-report-.svg");
/// ```
#[must_use]
pub fn derive_filename(identity: &Identity, page_title: Option<&str>, fallback: &str) -> String {
    fn present(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.is_empty())
    }

    let base = present(identity.name.as_deref())
        .or_else(|| present(identity.id.as_deref()))
        .or_else(|| present(identity.class_name.as_deref()))
        .map(str::to_owned)
        .or_else(|| present(page_title).map(sanitize_title))
        .unwrap_or_else(|| fallback.to_owned());

    format!("{base}.svg")
}

/// Replace every UTF-16 code unit that is not an ASCII letter or digit
/// with `-` and lowercase the result.
///
/// Titles come from the browser as UTF-16, so a character outside the
/// Basic Multilingual Plane (an emoji, say) is two units and becomes
/// `--`.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .encode_utf16()
        .map(|unit| match u8::try_from(unit) {
            Ok(byte) if byte.is_ascii_alphanumeric() => char::from(byte.to_ascii_lowercase()),
            _ => '-',
        })
        .collect()
}
