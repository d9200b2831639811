use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strips diacritics by decomposing to NFD and dropping combining marks,
/// so `Atlético Madrid` becomes `Atletico Madrid`. Letters with no
/// decomposition (`ø`, `ł`, `ß`, `æ`, ...) are folded by hand.
pub fn strip_diacritics(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

fn fold_letter(c: char) -> Option<&'static str> {
    let folded = match c {
        'ø' => "o",
        'Ø' => "O",
        'ł' => "l",
        'Ł' => "L",
        'đ' => "d",
        'Đ' => "D",
        'ß' => "ss",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'þ' => "th",
        'Þ' => "Th",
        'ı' => "i",
        _ => return None,
    };
    Some(folded)
}

/// Collapses runs of whitespace (including non-breaking spaces) into one space.
pub fn squash_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Display name as used in squad-page URLs: spaces become dashes.
pub fn url_slug(name: &str) -> String {
    name.replace(' ', "-")
}

/// Display name as used in file names. Path separators are replaced too.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}
