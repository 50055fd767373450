//! HTML character entity expansion.
//!
//! `expand` replaces `&name;`, `&#N;` and `&#xH;` references. Anything it
//! cannot resolve (unknown names, out-of-range code points, a lone `&`) is
//! left exactly as written.

#![allow(clippy::expect_used)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Latin-1 supplement entity names, in code point order from U+00A0.
const LATIN1_NAMES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "sup2", "sup3", "acute", "micro",
    "para", "middot", "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil", "Egrave", "Eacute",
    "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml", "ETH", "Ntilde", "Ograve", "Oacute",
    "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute",
    "THORN", "szlig", "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml", "eth", "ntilde",
    "ograve", "oacute", "ocirc", "otilde", "ouml", "divide", "oslash", "ugrave", "uacute", "ucirc",
    "uuml", "yacute", "thorn", "yuml",
];

/// Greek capitals from U+0391 (U+03A2 is unassigned).
const GREEK_UPPER: [(&str, u32); 24] = [
    ("Alpha", 913), ("Beta", 914), ("Gamma", 915), ("Delta", 916), ("Epsilon", 917),
    ("Zeta", 918), ("Eta", 919), ("Theta", 920), ("Iota", 921), ("Kappa", 922),
    ("Lambda", 923), ("Mu", 924), ("Nu", 925), ("Xi", 926), ("Omicron", 927), ("Pi", 928),
    ("Rho", 929), ("Sigma", 931), ("Tau", 932), ("Upsilon", 933), ("Phi", 934), ("Chi", 935),
    ("Psi", 936), ("Omega", 937),
];

/// Greek lower case from U+03B1, including final sigma.
const GREEK_LOWER: [(&str, u32); 25] = [
    ("alpha", 945), ("beta", 946), ("gamma", 947), ("delta", 948), ("epsilon", 949),
    ("zeta", 950), ("eta", 951), ("theta", 952), ("iota", 953), ("kappa", 954),
    ("lambda", 955), ("mu", 956), ("nu", 957), ("xi", 958), ("omicron", 959), ("pi", 960),
    ("rho", 961), ("sigmaf", 962), ("sigma", 963), ("tau", 964), ("upsilon", 965), ("phi", 966),
    ("chi", 967), ("psi", 968), ("omega", 969),
];

/// Markup-significant, typographic and mathematical entities.
const OTHER_ENTITIES: [(&str, u32); 108] = [
    ("quot", 34), ("amp", 38), ("apos", 39), ("lt", 60), ("gt", 62),
    ("OElig", 338), ("oelig", 339), ("Scaron", 352), ("scaron", 353), ("Yuml", 376),
    ("fnof", 402), ("circ", 710), ("tilde", 732),
    ("thetasym", 977), ("upsih", 978), ("piv", 982),
    ("ensp", 8194), ("emsp", 8195), ("thinsp", 8201), ("zwnj", 8204), ("zwj", 8205),
    ("lrm", 8206), ("rlm", 8207), ("ndash", 8211), ("mdash", 8212), ("lsquo", 8216),
    ("rsquo", 8217), ("sbquo", 8218), ("ldquo", 8220), ("rdquo", 8221), ("bdquo", 8222),
    ("dagger", 8224), ("Dagger", 8225), ("bull", 8226), ("hellip", 8230), ("permil", 8240),
    ("prime", 8242), ("Prime", 8243), ("lsaquo", 8249), ("rsaquo", 8250), ("oline", 8254),
    ("frasl", 8260), ("euro", 8364), ("image", 8465), ("weierp", 8472), ("real", 8476),
    ("trade", 8482), ("alefsym", 8501), ("larr", 8592), ("uarr", 8593), ("rarr", 8594),
    ("darr", 8595), ("harr", 8596), ("crarr", 8629), ("lArr", 8656), ("uArr", 8657),
    ("rArr", 8658), ("dArr", 8659), ("hArr", 8660), ("forall", 8704), ("part", 8706),
    ("exist", 8707), ("empty", 8709), ("nabla", 8711), ("isin", 8712), ("notin", 8713),
    ("ni", 8715), ("prod", 8719), ("sum", 8721), ("minus", 8722), ("lowast", 8727),
    ("radic", 8730), ("prop", 8733), ("infin", 8734), ("ang", 8736), ("and", 8743),
    ("or", 8744), ("cap", 8745), ("cup", 8746), ("int", 8747), ("there4", 8756),
    ("sim", 8764), ("cong", 8773), ("asymp", 8776), ("ne", 8800), ("equiv", 8801),
    ("le", 8804), ("ge", 8805), ("sub", 8834), ("sup", 8835), ("nsub", 8836), ("sube", 8838),
    ("supe", 8839), ("oplus", 8853), ("otimes", 8855), ("perp", 8869), ("sdot", 8901),
    ("lceil", 8968), ("rceil", 8969), ("lfloor", 8970), ("rfloor", 8971), ("lang", 9001),
    ("rang", 9002), ("loz", 9674), ("spades", 9824), ("clubs", 9827), ("hearts", 9829),
    ("diams", 9830),
];

static ENTITY_TABLE: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let latin1 = LATIN1_NAMES.iter().zip(0xA0_u32..).map(|(name, code)| (*name, code));
    latin1
        .chain(GREEK_UPPER)
        .chain(GREEK_LOWER)
        .chain(OTHER_ENTITIES)
        .filter_map(|(name, code)| char::from_u32(code).map(|c| (name, c)))
        .collect()
});

static ENTITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").expect("ENTITY_REF regex")
});

/// Character for a named entity (case-sensitive, `amp` not `&amp;`).
#[must_use]
pub fn lookup(name: &str) -> Option<char> {
    ENTITY_TABLE.get(name).copied()
}

fn decode_reference(reference: &str) -> Option<char> {
    let code = if let Some(hex) = reference.strip_prefix("#x").or_else(|| reference.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = reference.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return lookup(reference);
    };
    char::from_u32(code)
}

/// Expand the character entities found in `text`.
///
/// Returns the input unchanged (borrowed) when nothing was expanded.
///
/// # Example
///
/// ```rust
/// use rs_tagscrape::entities::expand;
///
/// assert_eq!(expand("caf&eacute; &#38; &#x263A; &bogus;"), "café & ☺ &bogus;");
/// ```
#[must_use]
pub fn expand(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_REF.replace_all(text, |caps: &Captures<'_>| match decode_reference(&caps[1]) {
        Some(c) => c.to_string(),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_html4_names() {
        assert_eq!(ENTITY_TABLE.len(), 96 + 24 + 25 + 108);
        assert_eq!(lookup("nbsp"), Some('\u{A0}'));
        assert_eq!(lookup("yuml"), Some('ÿ'));
        assert_eq!(lookup("Omega"), Some('Ω'));
        assert_eq!(lookup("sigmaf"), Some('ς'));
        assert_eq!(lookup("euro"), Some('€'));
        assert_eq!(lookup("AMP"), None);
    }

    #[test]
    fn expands_named_and_numeric_references() {
        assert_eq!(expand("&lt;b&gt; &amp;amp;"), "<b> &amp;");
        assert_eq!(expand("&#233;t&#xE9;"), "été");
        assert_eq!(expand("&#8364;"), "€");
    }

    #[test]
    fn leaves_malformed_references_verbatim() {
        assert_eq!(expand("a & b"), "a & b");
        assert_eq!(expand("&amp"), "&amp");
        assert_eq!(expand("&nope;"), "&nope;");
        assert_eq!(expand("&#xD800;"), "&#xD800;");
        assert_eq!(expand("&#99999999999;"), "&#99999999999;");
        assert_eq!(expand("a & b &amp; c"), "a & b & c");
    }

    #[test]
    fn borrows_when_nothing_to_do() {
        assert!(matches!(expand("plain text"), Cow::Borrowed(_)));
    }
}
