//! Composite transformation URL construction.
//!
//! The remote service reads a single `tr` query parameter whose value is
//! a `:`-joined chain of operation fragments. Later fragments apply to the
//! output of earlier ones, so order is preserved exactly as given.

/// Query parameter carrying the transformation chain.
pub const CHAIN_PARAM: &str = "tr";

/// Separator between chained operation fragments.
pub const FRAGMENT_SEPARATOR: &str = ":";

/// Append `fragments` to `base` as one chained transformation.
///
/// Returns `base` unchanged when `fragments` is empty. The base reference
/// is not validated or escaped; a malformed base yields a malformed
/// result.
///
/// ```rust
/// use retouch_workflow::chain::build;
///
/// assert_eq!(
///     build("https://ik.imagekit.io/demo/a.jpg", &["e-bgremove", "e-upscale"]),
///     "https://ik.imagekit.io/demo/a.jpg?tr=e-bgremove:e-upscale",
/// );
/// ```
#[must_use]
pub fn build<S: AsRef<str>>(base: &str, fragments: &[S]) -> String {
    if fragments.is_empty() {
        return base.to_owned();
    }

    let chain = fragments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR);

    let joiner = if base.ends_with('?') || base.ends_with('&') {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };

    format!("{base}{joiner}{CHAIN_PARAM}={chain}")
}
