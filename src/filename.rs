//! Readable filenames for generated images.
//!
//! Bing image ids (e.g. `OIG4.HfM5lIwyCttDOzJbyOCW`) mean nothing to a
//! person, so names are derived from the prompt instead: `<slug>_<index>.jpg`.

const MAX_SLUG_LEN: usize = 50;
const SEPARATOR: char = '-';

/// Build `<slug>_<index>.jpg` from a prompt.
///
/// The slug is the lowercased prompt with every run of characters outside
/// `[a-z0-9]` collapsed to a single `-`, trimmed of separators at both ends and
/// cut to 50 characters. A cut that lands just past a word boundary drops the
/// dangling `-`, so the slug never ends with a separator. A prompt with no
/// alphanumerics gives `_<index>.jpg`.
///
/// ```
/// use bing_image_creator::generate_filename;
///
/// assert_eq!(generate_filename("A Simple Red Circle", 0), "a-simple-red-circle_0.jpg");
/// assert_eq!(generate_filename("!!!", 2), "_2.jpg");
/// ```
pub fn generate_filename(prompt: &str, index: usize) -> String {
    format!("{}_{}.jpg", slugify(prompt), index)
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    // Slug is pure ASCII, so byte truncation is char-safe.
    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with(SEPARATOR) {
        slug.pop();
    }
    slug
}
